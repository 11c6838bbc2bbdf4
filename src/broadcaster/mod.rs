//! Fan-out of responses to the sinks of connected participants.
mod test;

use crate::connection::SinkAdapter;
use crate::response::Response;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// How long a single sink may take to accept a response before it is skipped.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(1);

/// The sink of one session, tagged with the session id it belongs to.
pub struct Connection<S> {
    pub sid: String,
    sink: Arc<Mutex<S>>,
}

pub struct Broadcaster<S: SinkAdapter> {
    connections: Arc<Mutex<HashMap<String, Connection<S>>>>,
    send_timeout: Duration,
}

impl<S: SinkAdapter + Send> Default for Broadcaster<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SinkAdapter + Send> Broadcaster<S> {
    pub fn new() -> Self {
        Self::with_send_timeout(DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_send_timeout(send_timeout: Duration) -> Self {
        Broadcaster {
            connections: Arc::new(Mutex::new(HashMap::new())),
            send_timeout,
        }
    }

    pub fn get_connections(&self) -> Arc<Mutex<HashMap<String, Connection<S>>>> {
        self.connections.clone()
    }

    /// Registers the sink of session `sid`, replacing any previous session of `uid`.
    pub async fn add_connection(&self, uid: String, sid: String, sink: S) {
        let connection = Connection {
            sid,
            sink: Arc::new(Mutex::new(sink)),
        };
        self.connections.lock().await.insert(uid, connection);
    }

    pub async fn remove_connection(&self, uid: &str) -> Option<Connection<S>> {
        self.connections.lock().await.remove(uid)
    }

    /// Removes the connection of `uid` only while it still belongs to session `sid`.
    pub async fn remove_session(&self, uid: &str, sid: &str) -> Option<Connection<S>> {
        let mut connections = self.connections.lock().await;
        if connections.get(uid).is_some_and(|c| c.sid == sid) {
            connections.remove(uid)
        } else {
            None
        }
    }

    /// Sends `response` to every listed uid that has a connection.
    ///
    /// The registry lock is released before sending. A sink that fails, or
    /// does not accept the response within the send timeout, is logged and
    /// skipped; the others still receive it. Returns how many sinks accepted it.
    pub async fn send_to(&self, uids: &[String], response: &Response) -> usize {
        let targets: Vec<(String, Arc<Mutex<S>>)> = {
            let connections = self.connections.lock().await;
            uids.iter()
                .filter_map(|uid| connections.get(uid).map(|c| (uid.clone(), c.sink.clone())))
                .collect()
        };

        let mut delivered = 0;
        for (uid, sink) in targets {
            let send = async {
                let mut sink = sink.lock().await;
                sink.send(response.clone()).await
            };
            match timeout(self.send_timeout, send).await {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => tracing::warn!(%uid, "failed to deliver response: {}", e),
                Err(_) => tracing::warn!(%uid, "sink stalled, response skipped"),
            }
        }
        delivered
    }
}
