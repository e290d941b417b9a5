//! Core data model for Quizarena: the quiz-battle arena engine.
//!
//! Everything in this crate is plain data and pure functions — no async,
//! no I/O. The actor and registry layers build on top of it.
//!
//! # Key types
//!
//! - [`RoomId`], [`UserId`], [`JoinCode`] — identity newtypes
//! - [`ArenaConfig`] — per-room battle settings, with validation
//! - [`RoomStatus`] — the lifecycle state machine
//! - [`Question`], [`PlayerRecord`], [`Answer`] — room-owned records
//! - [`RoomSnapshot`] — the serializable per-room document
//! - [`scoring`] — per-answer points and final ranking
//! - [`ArenaError`] — the error taxonomy shared by all layers

mod config;
mod error;
mod ids;
mod player;
mod question;
pub mod scoring;
mod snapshot;
mod state;

pub use config::{ArenaConfig, Difficulty};
pub use error::ArenaError;
pub use ids::{JoinCode, RoomId, UserId};
pub use player::{Answer, PlayerRecord};
pub use question::{OPTION_COUNT, Question};
pub use scoring::{RankedPlayer, rank_players, score_answer};
pub use snapshot::{PlayerSnapshot, RoomSnapshot};
pub use state::RoomStatus;
