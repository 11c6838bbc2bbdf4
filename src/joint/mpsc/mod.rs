
use crate::client::Client;
use crate::connection::{SinkAdapter, StreamAdapter};
use crate::joint::RoomJoint;
use crate::message::SidebarRequest;
use crate::response::{Delivery, Response};
use crate::room::Room;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io;
use tokio::sync::mpsc::{self, Receiver, Sender};

/// An implementation of [`SinkAdapter`] that sends responses over a `tokio::sync::mpsc::Sender`.
#[derive(Clone)]
pub struct MpscSink {
    sender: Sender<Response>,
}

#[async_trait]
impl SinkAdapter for MpscSink {
    async fn send(
        &mut self,
        response: Response,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.sender.send(response).await.map_err(|e| {
            Box::new(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("Failed to send response: {}", e),
            )) as _
        })
    }
}

/// An implementation of [`StreamAdapter`] that receives requests from a `tokio::sync::mpsc::Receiver`.
pub struct MpscStream {
    receiver: Receiver<SidebarRequest>,
}

#[async_trait]
impl StreamAdapter for MpscStream {
    async fn next(&mut self) -> Result<SidebarRequest, Box<dyn std::error::Error + Send + Sync>> {
        self.receiver.recv().await.ok_or_else(|| {
            Box::new(io::Error::new(io::ErrorKind::BrokenPipe, "Channel closed")) as _
        })
    }
}

/// A room that participants reach through Tokio MPSC channels.
///
/// Each connected participant sends `SidebarRequest`s and receives
/// `Response`s through its own pair of channels, without any networking.
pub struct MpscJoint {
    joint: Arc<RoomJoint<MpscSink>>,
}

impl MpscJoint {
    pub fn new(room: Room) -> Self {
        MpscJoint {
            joint: Arc::new(RoomJoint::new(room)),
        }
    }

    pub fn joint(&self) -> Arc<RoomJoint<MpscSink>> {
        self.joint.clone()
    }

    /// Joins `client` to the room through a fresh pair of channels.
    ///
    /// A background task feeds the request channel into the room; dropping
    /// the returned sender makes the client leave.
    ///
    /// # Arguments
    /// * `client` - The participant joining the room.
    /// * `buffer_size` - The buffer size for the created MPSC channels.
    ///
    /// # Returns
    /// A tuple containing the sender for client requests and the receiver for room responses.
    pub async fn connect(
        &self,
        client: Client,
        buffer_size: usize,
    ) -> (Sender<SidebarRequest>, Receiver<Response>) {
        let (req_tx, req_rx) = mpsc::channel(buffer_size);
        let (resp_tx, resp_rx) = mpsc::channel(buffer_size);

        let client = self.joint.join(client, MpscSink { sender: resp_tx }).await;

        let joint = self.joint.clone();
        tokio::spawn(async move {
            let mut stream = MpscStream { receiver: req_rx };
            joint.handle_stream(&client.uid, &client.sid, &mut stream).await;
        });

        (req_tx, resp_rx)
    }

    /// Dispatches a request on behalf of `uid` directly, bypassing its channel.
    pub async fn dispatch(&self, uid: &str, request: SidebarRequest) -> Option<Delivery> {
        self.joint.handle(uid, request).await
    }
}
