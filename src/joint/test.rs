#[cfg(test)]
mod room_joint_tests {
    use crate::client::Client;
    use crate::connection::{SinkAdapter, StreamAdapter};
    use crate::joint::{Admission, RoomJoint};
    use crate::message::SidebarRequest;
    use crate::response::Response;
    use crate::room::{Right, Room};
    use std::sync::Arc;
    use crate::client::Activity;
    use crate::response::Recipients;
    use crate::room::RoomKind;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    // Mock implementation for SinkAdapter
    struct MockSink {
        responses: Arc<StdMutex<Vec<Response>>>,
    }

    #[async_trait]
    impl SinkAdapter for MockSink {
        async fn send(
            &mut self,
            response: Response,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.responses.lock().unwrap().push(response);
            Ok(())
        }
    }

    // Mock implementation for StreamAdapter
    struct MockStream {
        requests: Vec<SidebarRequest>,
        index: usize,
    }

    #[async_trait]
    impl StreamAdapter for MockStream {
        async fn next(&mut self) -> Result<SidebarRequest, Box<dyn std::error::Error + Send + Sync>> {
            if self.index < self.requests.len() {
                let request = self.requests[self.index].clone();
                self.index += 1;
                Ok(request)
            } else {
                // Return an error to stop the processing loop
                Err("No more requests".into())
            }
        }
    }

    type Responses = Arc<StdMutex<Vec<Response>>>;

    async fn join(joint: &RoomJoint<MockSink>, client: Client) -> Responses {
        join_session(joint, client).await.0
    }

    async fn join_session(joint: &RoomJoint<MockSink>, client: Client) -> (Responses, Client) {
        let responses = Arc::new(StdMutex::new(Vec::new()));
        let client = joint
            .join(
                client,
                MockSink {
                    responses: responses.clone(),
                },
            )
            .await;
        (responses, client)
    }

    fn take(responses: &Responses) -> Vec<Response> {
        std::mem::take(&mut *responses.lock().unwrap())
    }

    fn av_client(uid: &str) -> Client {
        Client::new(uid, 1, uid)
            .with_rights(&[Right::Audio, Right::Video])
            .with_devices(true, true)
    }

    fn toggle_av(uid: &str) -> SidebarRequest {
        SidebarRequest::ToggleActivity {
            uid: uid.to_string(),
            activity: "broadcastAV".to_string(),
            pod: String::new(),
        }
    }

    #[tokio::test]
    async fn test_join_announces_client() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let first = join(&joint, av_client("a")).await;
        take(&first);

        let second = join(&joint, av_client("b")).await;

        let to_first = take(&first);
        assert_eq!(to_first.len(), 1);
        assert!(matches!(&to_first[0], Response::ClientUpdated(c) if c.uid == "b"));
        assert_eq!(take(&second).len(), 1);
        assert_eq!(joint.state().lock().await.clients.len(), 2);
    }

    #[tokio::test]
    async fn test_admission_rights() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let admission = Admission {
            rights: vec![Right::Audio],
            first_is_moderator: true,
        };
        let (sink_a, sink_b) = (
            MockSink {
                responses: Arc::new(StdMutex::new(Vec::new())),
            },
            MockSink {
                responses: Arc::new(StdMutex::new(Vec::new())),
            },
        );

        let first = joint.admit(Client::new("a", 1, "a"), sink_a, &admission).await;
        let second = joint.admit(Client::new("b", 2, "b"), sink_b, &admission).await;

        assert!(first.has_right(Right::Moderator));
        assert!(first.has_right(Right::Audio));
        assert!(!second.has_right(Right::Moderator));
        assert!(second.has_right(Right::Audio));
    }

    #[tokio::test]
    async fn test_handle_broadcasts_to_room() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let a = join(&joint, av_client("a")).await;
        let b = join(&joint, av_client("b")).await;
        take(&a);
        take(&b);

        let delivery = joint.handle("a", toggle_av("a")).await.unwrap();
        assert_eq!(delivery.recipients, Recipients::Room);

        for responses in [&a, &b] {
            let received = take(responses);
            assert_eq!(received.len(), 1);
            match &received[0] {
                Response::ClientUpdated(c) => {
                    assert_eq!(c.uid, "a");
                    assert!(c.has_activity(Activity::BroadcastAV));
                }
                other => panic!("Expected ClientUpdated, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_refused_request_sends_nothing() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let a = join(&joint, av_client("a")).await;
        let b = join(&joint, Client::new("b", 2, "b")).await;
        take(&a);
        take(&b);

        assert!(joint.handle("b", toggle_av("b")).await.is_none());
        assert!(joint.handle("ghost", toggle_av("a")).await.is_none());
        assert!(joint
            .handle(
                "a",
                SidebarRequest::RoomAction {
                    action: "explode".to_string(),
                    uid: "b".to_string(),
                },
            )
            .await
            .is_none());

        assert!(take(&a).is_empty());
        assert!(take(&b).is_empty());
    }

    #[tokio::test]
    async fn test_right_request_reaches_moderators_only() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let moderator = join(&joint, Client::new("m", 1, "m").with_rights(&[Right::Moderator])).await;
        let asker = join(&joint, Client::new("q", 2, "q")).await;
        let other = join(&joint, Client::new("o", 3, "o")).await;
        take(&moderator);
        take(&asker);
        take(&other);

        let request = SidebarRequest::ToggleRight {
            uid: "q".to_string(),
            right: "presenter".to_string(),
        };
        joint.handle("q", request).await.unwrap();

        assert_eq!(
            take(&moderator),
            vec![Response::RightRequested {
                uid: "q".to_string(),
                right: Right::Presenter
            }]
        );
        assert!(take(&asker).is_empty());
        assert!(take(&other).is_empty());
    }

    #[tokio::test]
    async fn test_kick_notifies_and_disconnects() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let moderator = join(&joint, Client::new("m", 1, "m").with_rights(&[Right::Moderator])).await;
        let victim = join(&joint, Client::new("v", 2, "v")).await;
        take(&moderator);
        take(&victim);

        let request = SidebarRequest::RoomAction {
            action: "kick".to_string(),
            uid: "v".to_string(),
        };
        joint.handle("m", request).await.unwrap();

        assert_eq!(take(&moderator), vec![Response::Kicked("v".to_string())]);
        assert_eq!(take(&victim), vec![Response::Kicked("v".to_string())]);
        assert!(joint.state().lock().await.clients.lookup("v").is_none());
        assert!(!joint
            .broadcaster()
            .get_connections()
            .lock()
            .await
            .contains_key("v"));
    }

    #[tokio::test]
    async fn test_handle_stream_then_leave() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let watcher = join(&joint, av_client("w")).await;
        let (_, session) = join_session(&joint, av_client("s")).await;
        take(&watcher);

        let mut stream = MockStream {
            requests: vec![toggle_av("s"), toggle_av("s")],
            index: 0,
        };
        joint.handle_stream("s", &session.sid, &mut stream).await;

        let received = take(&watcher);
        assert_eq!(received.len(), 3);
        assert!(matches!(&received[0], Response::ClientUpdated(c) if c.has_activity(Activity::BroadcastAV)));
        assert!(matches!(&received[1], Response::ClientUpdated(c) if !c.has_activity(Activity::BroadcastAV)));
        assert_eq!(received[2], Response::ClientLeft("s".to_string()));
        assert!(joint.state().lock().await.clients.lookup("s").is_none());
    }

    #[tokio::test]
    async fn test_leave_unknown_is_silent() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let a = join(&joint, av_client("a")).await;
        take(&a);

        joint.leave("ghost", "sid").await;
        assert!(take(&a).is_empty());
    }

    #[tokio::test]
    async fn test_each_join_opens_new_session() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let client = av_client("a");
        let (_, first) = join_session(&joint, client.clone()).await;
        let (_, second) = join_session(&joint, client).await;

        assert_ne!(first.sid, second.sid);
        assert_eq!(joint.state().lock().await.clients.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_session_leaves_nothing_behind() {
        let joint = RoomJoint::new(Room::new(1, RoomKind::Conference));
        let watcher = join(&joint, av_client("w")).await;
        let (_, old) = join_session(&joint, av_client("a")).await;
        let (fresh, new) = join_session(&joint, av_client("a")).await;
        take(&watcher);
        take(&fresh);

        // the old connection closes after the reconnect
        let mut stream = MockStream {
            requests: vec![toggle_av("a")],
            index: 0,
        };
        joint.handle_stream("a", &old.sid, &mut stream).await;

        let state = joint.state();
        {
            let state = state.lock().await;
            let live = state.clients.lookup("a").expect("reconnected session removed");
            assert_eq!(live.sid, new.sid);
            // requests of the superseded session are not dispatched
            assert!(!live.has_activity(Activity::BroadcastAV));
        }
        assert_eq!(
            joint.broadcaster().get_connections().lock().await["a"].sid,
            new.sid
        );
        assert!(take(&watcher).is_empty());

        // the live session still receives and leaves normally
        joint.handle("a", toggle_av("a")).await.unwrap();
        assert_eq!(take(&fresh).len(), 1);
        joint.leave("a", &new.sid).await;
        assert!(state.lock().await.clients.lookup("a").is_none());
        assert_eq!(take(&watcher).last(), Some(&Response::ClientLeft("a".to_string())));
    }
}
