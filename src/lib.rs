//! # roomjoint
//!
//! Sidebar engine of a conferencing room: it keeps the room's participants,
//! decides who may broadcast audio and video, lets moderators grant, deny and
//! force rights and activities, and fans the results out to the room.
//!
//! Requests arrive as [`message::SidebarRequest`]s, are validated into
//! [`message::RoomCommand`]s and dispatched against a
//! [`dispatcher::RoomState`]. Invalid or refused requests never produce an
//! error for the caller; they are logged and have no effect.
//!
//! ```rust
//! use roomjoint::client::{Activity, Client, Pod};
//! use roomjoint::dispatcher::{Dispatchable, Effect, RoomState};
//! use roomjoint::message::RoomCommand;
//! use roomjoint::room::{Right, Room, RoomKind};
//!
//! let mut state = RoomState::new(Room::new(1, RoomKind::Conference));
//! state.clients.insert(
//!     Client::new("u1", 1, "alice")
//!         .with_rights(&[Right::Audio, Right::Video])
//!         .with_devices(true, true),
//! );
//!
//! let effect = state.dispatch(
//!     "u1",
//!     RoomCommand::ToggleActivity {
//!         uid: "u1".to_string(),
//!         activity: Activity::BroadcastAV,
//!         pod: Pod::None,
//!     },
//! );
//! assert!(matches!(effect, Some(Effect::ClientUpdated(c)) if c.has_activity(Activity::BroadcastAV)));
//! ```

pub mod broadcaster;
pub mod client;
pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod evaluator;
pub mod joint;
pub mod message;
pub mod response;
pub mod room;
pub mod settings;
pub mod store;
pub mod utils;
