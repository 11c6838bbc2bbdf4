#[cfg(test)]
mod tests {
    use crate::broadcaster::Broadcaster;
    use crate::connection::SinkAdapter;
    use crate::response::Response;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::io;
    use tokio::time::timeout;

    #[derive(Clone, Copy, PartialEq)]
    enum Behaviour {
        Accept,
        Fail,
        Stall,
    }

    // Mock SinkAdapter for testing
    #[derive(Clone)]
    struct MockSink {
        responses: Arc<StdMutex<Vec<Response>>>,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl SinkAdapter for MockSink {
        async fn send(
            &mut self,
            response: Response,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            match self.behaviour {
                Behaviour::Accept => {
                    self.responses.lock().unwrap().push(response);
                    Ok(())
                }
                Behaviour::Fail => Err(Box::new(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))),
                // a peer that never drains its buffer
                Behaviour::Stall => std::future::pending().await,
            }
        }
    }

    fn sink(behaviour: Behaviour) -> (MockSink, Arc<StdMutex<Vec<Response>>>) {
        let responses = Arc::new(StdMutex::new(Vec::new()));
        (
            MockSink {
                responses: responses.clone(),
                behaviour,
            },
            responses,
        )
    }

    fn uids(uids: &[&str]) -> Vec<String> {
        uids.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_broadcaster_creation() {
        let broadcaster = Broadcaster::<MockSink>::new();
        assert_eq!(broadcaster.get_connections().lock().await.len(), 0);
    }

    #[tokio::test]
    async fn test_add_remove_connection() {
        let broadcaster = Broadcaster::new();
        let (sink1, _) = sink(Behaviour::Accept);
        let (sink2, _) = sink(Behaviour::Accept);

        broadcaster.add_connection("u1".to_string(), "s1".to_string(), sink1).await;
        broadcaster.add_connection("u2".to_string(), "s2".to_string(), sink2).await;
        assert_eq!(broadcaster.get_connections().lock().await.len(), 2);

        assert!(broadcaster.remove_connection("u1").await.is_some());
        assert!(broadcaster.remove_connection("u1").await.is_none());

        let connections = broadcaster.get_connections();
        let connections = connections.lock().await;
        assert_eq!(connections.len(), 1);
        assert_eq!(connections["u2"].sid, "s2");
    }

    #[tokio::test]
    async fn test_remove_session_keeps_newer_session() {
        let broadcaster = Broadcaster::new();
        let (old, _) = sink(Behaviour::Accept);
        let (new, responses) = sink(Behaviour::Accept);

        broadcaster.add_connection("u1".to_string(), "old".to_string(), old).await;
        broadcaster.add_connection("u1".to_string(), "new".to_string(), new).await;

        assert!(broadcaster.remove_session("u1", "old").await.is_none());
        let response = Response::Exclusive("u1".to_string());
        assert_eq!(broadcaster.send_to(&uids(&["u1"]), &response).await, 1);
        assert_eq!(responses.lock().unwrap().len(), 1);

        assert!(broadcaster.remove_session("u1", "new").await.is_some());
        assert!(broadcaster.get_connections().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_to_listed_only() {
        let broadcaster = Broadcaster::new();
        let (sink1, responses1) = sink(Behaviour::Accept);
        let (sink2, responses2) = sink(Behaviour::Accept);
        broadcaster.add_connection("u1".to_string(), "s1".to_string(), sink1).await;
        broadcaster.add_connection("u2".to_string(), "s2".to_string(), sink2).await;

        let response = Response::Exclusive("u1".to_string());
        let delivered = broadcaster.send_to(&uids(&["u1", "ghost"]), &response).await;

        assert_eq!(delivered, 1);
        assert_eq!(responses1.lock().unwrap().as_slice(), &[response]);
        assert!(responses2.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_sink_is_skipped() {
        let broadcaster = Broadcaster::new();
        let (broken, _) = sink(Behaviour::Fail);
        let (healthy, responses) = sink(Behaviour::Accept);
        broadcaster.add_connection("broken".to_string(), "s1".to_string(), broken).await;
        broadcaster.add_connection("healthy".to_string(), "s2".to_string(), healthy).await;

        let response = Response::Kicked("x".to_string());
        let delivered = broadcaster
            .send_to(&uids(&["broken", "healthy"]), &response)
            .await;

        assert_eq!(delivered, 1);
        assert_eq!(responses.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stalled_sink_does_not_block_room() {
        let broadcaster = Arc::new(Broadcaster::with_send_timeout(Duration::from_millis(50)));
        let (stalled, _) = sink(Behaviour::Stall);
        let (healthy, responses) = sink(Behaviour::Accept);
        broadcaster.add_connection("stalled".to_string(), "s1".to_string(), stalled).await;
        broadcaster.add_connection("healthy".to_string(), "s2".to_string(), healthy).await;

        let response = Response::Exclusive("healthy".to_string());
        let delivered = timeout(
            Duration::from_secs(2),
            broadcaster.send_to(&uids(&["stalled", "healthy"]), &response),
        )
        .await
        .expect("send_to hung on a stalled sink");
        assert_eq!(delivered, 1);
        assert_eq!(responses.lock().unwrap().len(), 1);

        // the registry stays usable while a send is stuck
        let pending = {
            let broadcaster = broadcaster.clone();
            let response = response.clone();
            tokio::spawn(async move { broadcaster.send_to(&uids(&["stalled"]), &response).await })
        };
        tokio::task::yield_now().await;
        let (late, _) = sink(Behaviour::Accept);
        timeout(
            Duration::from_millis(25),
            broadcaster.add_connection("late".to_string(), "s3".to_string(), late),
        )
        .await
        .expect("registry locked during a send");
        assert_eq!(pending.await.unwrap(), 0);
    }
}
