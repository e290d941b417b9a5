//! Engine timing knobs.

use std::time::Duration;

/// Timer settings shared by every room an [`ArenaManager`] creates.
///
/// The per-question answer window is per-room config; these are the
/// fixed cadences around it. Defaults match production; tests shrink
/// them or drive a paused clock.
///
/// [`ArenaManager`]: crate::ArenaManager
#[derive(Debug, Clone)]
pub struct EngineTimings {
    /// Pause between countdown steps (3 → 2 → 1 → first question).
    pub countdown_step: Duration,

    /// How long results stay on screen before the next question.
    pub reveal_pause: Duration,

    /// How long a room may sit in the lobby before it auto-cancels and
    /// releases its join code.
    pub lobby_timeout: Duration,
}

impl EngineTimings {
    /// Number of countdown steps announced before the first question.
    pub const COUNTDOWN_STEPS: u8 = 3;
}

impl Default for EngineTimings {
    fn default() -> Self {
        Self {
            countdown_step: Duration::from_secs(1),
            reveal_pause: Duration::from_secs(3),
            lobby_timeout: Duration::from_secs(600),
        }
    }
}
