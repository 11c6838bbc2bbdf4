pub mod axum;
pub mod mpsc;
mod test;

use crate::broadcaster::Broadcaster;
use crate::client::Client;
use crate::connection::{SinkAdapter, StreamAdapter};
use crate::dispatcher::RoomState;
use crate::message::SidebarRequest;
use crate::response::{Delivery, Response};
use crate::room::{Right, Room};
use crate::utils::new_sid;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum JointError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no listener bound")]
    NotBound,
}

/// Rights handed to participants as they join.
#[derive(Debug, Clone, Default)]
pub struct Admission {
    pub rights: Vec<Right>,
    /// The first participant of an empty room becomes its moderator.
    pub first_is_moderator: bool,
}

/// Transport-independent core of a room: its state behind one lock plus the
/// sinks of its participants.
///
/// The lock is held for the duration of a dispatch only, which serializes
/// every mutation of the room's participants; fan-out happens after it is
/// released.
pub struct RoomJoint<S: SinkAdapter> {
    state: Arc<Mutex<RoomState>>,
    broadcaster: Broadcaster<S>,
}

impl<S: SinkAdapter + Send + 'static> RoomJoint<S> {
    pub fn new(room: Room) -> Self {
        RoomJoint {
            state: Arc::new(Mutex::new(RoomState::new(room))),
            broadcaster: Broadcaster::new(),
        }
    }

    pub fn state(&self) -> Arc<Mutex<RoomState>> {
        self.state.clone()
    }

    pub fn broadcaster(&self) -> &Broadcaster<S> {
        &self.broadcaster
    }

    /// Registers `client` with its sink and announces it to the room.
    pub async fn join(&self, client: Client, sink: S) -> Client {
        self.admit(client, sink, &Admission::default()).await
    }

    /// Like [`join`](Self::join), granting the rights `admission` hands out.
    ///
    /// Every admission opens a new session with a fresh `sid`; a client
    /// rejoining under the same uid replaces its previous session.
    pub async fn admit(&self, mut client: Client, sink: S, admission: &Admission) -> Client {
        let uid = client.uid.clone();
        client.sid = new_sid();
        self.broadcaster
            .add_connection(uid.clone(), client.sid.clone(), sink)
            .await;
        let recipients = {
            let mut state = self.state.lock().await;
            client.allow(&admission.rights);
            if admission.first_is_moderator && state.clients.is_empty() {
                client.allow(&[Right::Moderator]);
            }
            if state.clients.insert(client.clone()).is_some() {
                tracing::warn!(%uid, "client replaced an existing session");
            }
            state.clients.uids()
        };
        tracing::info!(%uid, sid = %client.sid, rights = ?client.rights(), "client joined");
        let response = Response::ClientUpdated(client.clone());
        self.broadcaster.send_to(&recipients, &response).await;
        client
    }

    /// Ends session `sid` of `uid`. A session that was already replaced by a
    /// newer one, or kicked, leaves nothing behind to remove.
    pub async fn leave(&self, uid: &str, sid: &str) {
        let (removed, recipients) = {
            let mut state = self.state.lock().await;
            let current = state.clients.lookup(uid).is_some_and(|c| c.sid == sid);
            let removed = if current { state.clients.remove(uid) } else { None };
            (removed, state.clients.uids())
        };
        self.broadcaster.remove_session(uid, sid).await;
        if removed.is_some() {
            tracing::info!(%uid, %sid, "client left");
            self.broadcaster
                .send_to(&recipients, &Response::ClientLeft(uid.to_string()))
                .await;
        }
    }

    async fn is_current(&self, uid: &str, sid: &str) -> bool {
        let state = self.state.lock().await;
        state.clients.lookup(uid).is_some_and(|c| c.sid == sid)
    }

    /// Dispatches one request from `actor_uid` and delivers its outcome.
    pub async fn handle(&self, actor_uid: &str, request: SidebarRequest) -> Option<Delivery> {
        let (delivery, uids) = {
            let mut state = self.state.lock().await;
            let delivery = Delivery::from(state.handle_request(actor_uid, request)?);
            let uids = delivery.recipients.clone().resolve(state.clients.uids());
            (delivery, uids)
        };
        self.broadcaster.send_to(&uids, &delivery.response).await;
        if let Response::Kicked(uid) = &delivery.response {
            self.broadcaster.remove_connection(uid).await;
        }
        Some(delivery)
    }

    /// Reads requests of session `sid` from `stream` until it fails or the
    /// session is superseded, then ends the session.
    pub async fn handle_stream<T: StreamAdapter + Send>(&self, uid: &str, sid: &str, stream: &mut T) {
        loop {
            match stream.next().await {
                Ok(request) => {
                    if !self.is_current(uid, sid).await {
                        tracing::debug!(%uid, %sid, "request from a superseded session dropped");
                        break;
                    }
                    self.handle(uid, request).await;
                }
                Err(e) => {
                    tracing::debug!(%uid, "stream closed: {}", e);
                    break;
                }
            }
        }
        self.leave(uid, sid).await;
    }
}
