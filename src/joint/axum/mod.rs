
use crate::client::Client;
use crate::config::RoomConfig;
use crate::connection::{SinkAdapter, StreamAdapter};
use crate::joint::{Admission, JointError, RoomJoint};
use crate::message::SidebarRequest;
use crate::response::Response;
use async_trait::async_trait;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use axum::extract::{Query, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::io;
use tokio::net::TcpListener;

pub struct AxumWsSink {
    sink: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl SinkAdapter for AxumWsSink {
    async fn send(
        &mut self,
        response: Response,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let message = Message::Text(Utf8Bytes::from(serde_json::to_string(&response)?));
        self.sink.send(message).await.map_err(|e| Box::new(e) as _)
    }
}

pub struct AxumWsStream {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl StreamAdapter for AxumWsStream {
    /// Yields the next well-formed request; malformed frames are logged and skipped.
    async fn next(&mut self) -> Result<SidebarRequest, Box<dyn std::error::Error + Send + Sync>> {
        loop {
            let message = self
                .stream
                .next()
                .await
                .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "Socket closed"))??;
            let text = match message {
                Message::Text(text) => text,
                Message::Close(_) => {
                    return Err(Box::new(io::Error::new(
                        io::ErrorKind::ConnectionAborted,
                        "Socket closed by peer",
                    )))
                }
                _ => continue,
            };
            match serde_json::from_str::<SidebarRequest>(text.as_str()) {
                Ok(request) => return Ok(request),
                Err(e) => tracing::warn!("dropping malformed frame: {}", e),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JoinQuery {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub label: String,
}

pub struct AxumJoint {
    joint: Arc<RoomJoint<AxumWsSink>>,
    admission: Arc<Admission>,
    tcp_listener: Option<TcpListener>,
}

impl AxumJoint {
    pub fn new(config: &RoomConfig) -> Self {
        AxumJoint {
            joint: Arc::new(RoomJoint::new(config.room())),
            admission: Arc::new(config.admission()),
            tcp_listener: None,
        }
    }

    pub fn joint(&self) -> Arc<RoomJoint<AxumWsSink>> {
        self.joint.clone()
    }

    pub async fn bind(&mut self, addr: &str) -> Result<(), JointError> {
        self.tcp_listener = Some(TcpListener::bind(addr).await?);
        Ok(())
    }

    async fn ws_handler(
        ws: WebSocketUpgrade,
        query: JoinQuery,
        joint: Arc<RoomJoint<AxumWsSink>>,
        admission: Arc<Admission>,
    ) -> axum::response::Response {
        if query.uid.is_empty() {
            return (StatusCode::BAD_REQUEST, "missing uid").into_response();
        }
        ws.on_upgrade(move |socket| async move {
            let (sink, stream) = socket.split();
            let client = Client::new(query.uid, query.user_id, query.label);
            let client = joint.admit(client, AxumWsSink { sink }, &admission).await;

            let mut stream = AxumWsStream { stream };
            joint.handle_stream(&client.uid, &client.sid, &mut stream).await;
        })
    }

    pub fn attach_router(&self, path: &str, router: Router) -> Router {
        let joint = self.joint.clone();
        let admission = self.admission.clone();
        router.route(
            path,
            get(move |ws: WebSocketUpgrade, Query(query): Query<JoinQuery>| {
                AxumJoint::ws_handler(ws, query, joint.clone(), admission.clone())
            }),
        )
    }

    /// Serves the room on the bound listener until the server stops.
    pub async fn serve(mut self, path: &str) -> Result<(), JointError> {
        let listener = self.tcp_listener.take().ok_or(JointError::NotBound)?;
        let room_id = self.joint.state().lock().await.room.id;
        tracing::info!("room {} listening on {}{}", room_id, listener.local_addr()?, path);
        let app = self.attach_router(path, Router::new());
        axum::serve(listener, app).await?;
        Ok(())
    }
}
