fn main() {
    println!("Run `cargo test -p filebay-e2e` to execute the end-to-end tests.");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use filebay_client::{ClientError, WsClient};
    use filebay_protocol::constants::CHUNK_SIZE;
    use filebay_server::{FileServer, FsHandler, ServerConfig};
    use filebay_transfer::TransferEngine;

    struct TestServer {
        server: Arc<FileServer<FsHandler>>,
        engine: Arc<TransferEngine>,
        _root: tempfile::TempDir,
        handle: tokio::task::JoinHandle<()>,
    }

    impl TestServer {
        /// Starts a server on a dynamic port with a fresh temp root.
        async fn start() -> Self {
            let root = tempfile::tempdir().unwrap();
            let engine = Arc::new(TransferEngine::new(root.path().join("served")).unwrap());
            let server = FileServer::new(
                ServerConfig { port: 0 },
                FsHandler::new(Arc::clone(&engine)),
            );

            let run = Arc::clone(&server);
            let handle = tokio::spawn(async move {
                run.run().await.unwrap();
            });

            // Wait for the listener to bind.
            for _ in 0..100 {
                if server.port().await != 0 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            assert_ne!(server.port().await, 0, "server failed to bind");

            Self {
                server,
                engine,
                _root: root,
                handle,
            }
        }

        async fn connect(&self) -> WsClient {
            let url = format!("ws://127.0.0.1:{}", self.server.port().await);
            WsClient::connect(&url).await.unwrap()
        }

        async fn stop(self) {
            self.server.shutdown();
            self.handle.await.unwrap();
        }
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn round_trip_boundary_sizes() {
        let ts = TestServer::start().await;
        let client = ts.connect().await;

        let local = tempfile::tempdir().unwrap();
        let down = tempfile::tempdir().unwrap();

        for (i, size) in [0usize, 1, CHUNK_SIZE, CHUNK_SIZE + 1].into_iter().enumerate() {
            let name = format!("file{i}.bin");
            let data = pattern(size);
            let src = local.path().join(&name);
            std::fs::write(&src, &data).unwrap();

            filebay_client::send_file(&client, &src, "").await.unwrap();

            let dest = filebay_client::receive_file(&client, &name, down.path())
                .await
                .unwrap();
            let received = std::fs::read(&dest).unwrap();
            assert_eq!(received, data, "size {size}");
        }

        assert_eq!(ts.engine.open_transfers(), 0);
        client.close().await;
        ts.stop().await;
    }

    #[tokio::test]
    async fn upload_to_existing_file_is_rejected() {
        let ts = TestServer::start().await;
        let client = ts.connect().await;

        std::fs::write(ts.engine.root().join("taken.txt"), b"original").unwrap();

        let local = tempfile::tempdir().unwrap();
        let src = local.path().join("taken.txt");
        std::fs::write(&src, b"new").unwrap();

        let err = filebay_client::send_file(&client, &src, "")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Remote { code: 409, .. }));

        // The original file is untouched.
        let content = std::fs::read(ts.engine.root().join("taken.txt")).unwrap();
        assert_eq!(&content, b"original");

        client.close().await;
        ts.stop().await;
    }

    #[tokio::test]
    async fn download_missing_file_leaves_no_local_file() {
        let ts = TestServer::start().await;
        let client = ts.connect().await;

        let down = tempfile::tempdir().unwrap();
        let err = filebay_client::receive_file(&client, "ghost.bin", down.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Remote { code: 404, .. }));
        assert!(!down.path().join("ghost.bin").exists());

        client.close().await;
        ts.stop().await;
    }

    #[tokio::test]
    async fn ls_cp_rm_scenario() {
        let ts = TestServer::start().await;
        let client = ts.connect().await;

        // Fresh server, empty listing.
        let listing = filebay_client::list(&client, None).await.unwrap();
        assert_eq!(listing, "");

        // Upload one file through the copy front end.
        let local = tempfile::tempdir().unwrap();
        let src = local.path().join("a.txt");
        std::fs::write(&src, b"contents").unwrap();
        let summary = filebay_client::copy(&client, src.to_str().unwrap(), "remote:")
            .await
            .unwrap();
        assert!(summary.starts_with("uploaded"));

        let listing = filebay_client::list(&client, None).await.unwrap();
        assert_eq!(listing, "a.txt");

        // Remove it.
        let result = filebay_client::remove(&client, &["a.txt".to_string()])
            .await
            .unwrap();
        assert_eq!(result, "removed file: a.txt");

        let listing = filebay_client::list(&client, None).await.unwrap();
        assert_eq!(listing, "");

        client.close().await;
        ts.stop().await;
    }

    #[tokio::test]
    async fn copy_direction_validation() {
        let ts = TestServer::start().await;
        let client = ts.connect().await;

        let err = filebay_client::copy(&client, "remote:a", "remote:b")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Usage(_)));

        let err = filebay_client::copy(&client, "a", "b").await.unwrap_err();
        assert!(matches!(err, ClientError::Usage(_)));

        client.close().await;
        ts.stop().await;
    }

    #[tokio::test]
    async fn escaping_path_is_rejected_on_the_wire() {
        let ts = TestServer::start().await;
        let client = ts.connect().await;

        let down = tempfile::tempdir().unwrap();
        let err = filebay_client::receive_file(&client, "../../etc/passwd", down.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Remote { code: 400, .. }));

        client.close().await;
        ts.stop().await;
    }

    #[tokio::test]
    async fn ping_round_trip() {
        use filebay_protocol::constants::MessageType;

        let ts = TestServer::start().await;
        let client = ts.connect().await;

        let reply = client
            .send_request::<()>(MessageType::Ping, None)
            .await
            .unwrap();
        assert_eq!(reply.msg_type, MessageType::Pong);

        client.close().await;
        ts.stop().await;
    }
}
