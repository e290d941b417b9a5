//! The notification collaborator.

use quizarena_core::RoomId;

use crate::ArenaEvent;

/// Receives every room event the engine emits.
///
/// How events are rendered — chat messages, buttons, a websocket — is
/// the host application's business. Calls are fire-and-forget and must
/// not block: do the cheap thing here (push onto a queue, send on a
/// channel) and render elsewhere.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, room_id: RoomId, event: &ArenaEvent);
}

/// Discards everything. Useful for tests and headless tools.
impl Notifier for () {
    fn notify(&self, _room_id: RoomId, _event: &ArenaEvent) {}
}
