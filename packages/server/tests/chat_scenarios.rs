//! End-to-end chat scenarios against a real server on an ephemeral port.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use irori_server::{Server, ServerConfig, domain::MessageLog, lifecycle::ShutdownCoordinator};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    task::JoinHandle,
};

const LINE_TIMEOUT: Duration = Duration::from_secs(2);

/// Helper struct to manage the server task lifecycle
struct TestServer {
    addr: SocketAddr,
    shutdown: ShutdownCoordinator,
    message_log: Arc<dyn MessageLog>,
    task: JoinHandle<Result<(), irori_server::ServerError>>,
}

impl TestServer {
    /// Start a server on an ephemeral port with a fast poll interval
    async fn start() -> Self {
        let config = ServerConfig {
            port: 0,
            poll_interval: Duration::from_millis(20),
            shutdown_grace: Duration::from_secs(1),
            farewell_hold: Duration::from_millis(50),
            ..ServerConfig::default()
        };
        let server = Server::bind(config).await.expect("Failed to bind server");
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();
        let message_log = server.message_log();
        let task = tokio::spawn(server.run(std::future::pending()));

        TestServer {
            addr,
            shutdown,
            message_log,
            task,
        }
    }
}

/// Helper struct for a line-oriented TCP client
struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(server: &TestServer) -> Self {
        let stream = TcpStream::connect(server.addr)
            .await
            .expect("Failed to connect");
        let (read, writer) = stream.into_split();
        TestClient {
            lines: BufReader::new(read).lines(),
            writer,
        }
    }

    /// Connect and complete the name handshake
    async fn join(server: &TestServer, name: &str) -> Self {
        let mut client = Self::connect(server).await;
        client.send(name).await;
        assert_eq!(
            client.next_line().await.as_deref(),
            Some(format!("SERVER: Welcome to the chat, {}!", name).as_str())
        );
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .expect("Failed to send line");
    }

    /// Next line from the server, `None` once the server closed the stream
    async fn next_line(&mut self) -> Option<String> {
        tokio::time::timeout(LINE_TIMEOUT, self.lines.next_line())
            .await
            .expect("Timed out waiting for a line")
            .expect("Read error")
    }
}

async fn log_contents(server: &TestServer) -> Vec<String> {
    let length = server.message_log.length().await;
    server
        .message_log
        .slice(0, length)
        .await
        .iter()
        .map(|entry| entry.to_string())
        .collect()
}

#[tokio::test]
async fn test_second_join_is_announced_to_first_client() {
    // テスト項目: alice の後に bob が参加すると、alice に入室アナウンスが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::join(&server, "alice").await;

    // when (操作):
    let _bob = TestClient::join(&server, "bob").await;

    // then (期待する結果):
    assert_eq!(
        alice.next_line().await.as_deref(),
        Some("SERVER: bob has joined the chat")
    );
}

#[tokio::test]
async fn test_message_is_relayed_to_other_client() {
    // テスト項目: alice の発言が bob に "alice: hello" として届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::join(&server, "alice").await;
    let mut bob = TestClient::join(&server, "bob").await;
    assert_eq!(
        alice.next_line().await.as_deref(),
        Some("SERVER: bob has joined the chat")
    );

    // when (操作):
    alice.send("hello").await;

    // then (期待する結果):
    assert_eq!(bob.next_line().await.as_deref(), Some("alice: hello"));
}

#[tokio::test]
async fn test_joiner_does_not_replay_history() {
    // テスト項目: 後から参加したクライアントには過去の発言も自分の入室アナウンスも送られない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::join(&server, "alice").await;
    alice.send("before bob").await;
    assert_eq!(alice.next_line().await.as_deref(), Some("alice: before bob"));

    // when (操作):
    let mut bob = TestClient::join(&server, "bob").await;
    alice.send("after bob").await;

    // then (期待する結果):
    assert_eq!(bob.next_line().await.as_deref(), Some("alice: after bob"));
}

#[tokio::test]
async fn test_every_client_sees_the_same_order() {
    // テスト項目: すべてのクライアントが同じ順序でメッセージを受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::join(&server, "alice").await;
    let mut bob = TestClient::join(&server, "bob").await;
    assert_eq!(
        alice.next_line().await.as_deref(),
        Some("SERVER: bob has joined the chat")
    );

    // when (操作):
    for i in 0..5 {
        alice.send(&format!("a{}", i)).await;
        bob.send(&format!("b{}", i)).await;
    }
    let mut seen_by_alice = Vec::new();
    let mut seen_by_bob = Vec::new();
    for _ in 0..10 {
        seen_by_alice.push(alice.next_line().await.unwrap());
        seen_by_bob.push(bob.next_line().await.unwrap());
    }

    // then (期待する結果):
    assert_eq!(seen_by_alice, seen_by_bob);
    let log = log_contents(&server).await;
    assert_eq!(&log[2..], seen_by_alice.as_slice());
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    // テスト項目: 空の名前は拒否され、入室アナウンスは追記されない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作):
    client.send("").await;

    // then (期待する結果):
    assert_eq!(
        client.next_line().await.as_deref(),
        Some("SERVER: Name cannot be empty")
    );
    assert_eq!(client.next_line().await, None);
    assert!(log_contents(&server).await.is_empty());
}

#[tokio::test]
async fn test_reserved_name_is_rejected() {
    // テスト項目: 予約名 SERVER は拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作):
    client.send("SERVER").await;

    // then (期待する結果):
    assert_eq!(
        client.next_line().await.as_deref(),
        Some("SERVER: Name 'SERVER' is reserved")
    );
    assert_eq!(client.next_line().await, None);
    assert!(log_contents(&server).await.is_empty());
}

#[tokio::test]
async fn test_shutdown_sends_farewell_within_grace() {
    // テスト項目: シャットダウン時に接続中のクライアントへ別れの挨拶が届き、猶予期間内に切断される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::join(&server, "alice").await;

    // when (操作):
    server.shutdown.trigger();

    // then (期待する結果):
    assert_eq!(
        alice.next_line().await.as_deref(),
        Some("SERVER: Server is shutting down. Goodbye!")
    );
    assert_eq!(alice.next_line().await, None);
    let result = tokio::time::timeout(Duration::from_secs(3), server.task)
        .await
        .expect("server did not stop within the grace period")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_departure_is_announced_to_remaining_client() {
    // テスト項目: alice が切断すると bob に退室アナウンスが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestClient::join(&server, "alice").await;
    let mut bob = TestClient::join(&server, "bob").await;

    // when (操作):
    drop(alice);

    // then (期待する結果):
    assert_eq!(
        bob.next_line().await.as_deref(),
        Some("SERVER: alice has left the chat")
    );
}

#[tokio::test]
async fn test_new_connections_are_refused_after_shutdown() {
    // テスト項目: シャットダウン後は新しい接続を受け付けない
    // given (前提条件):
    let server = TestServer::start().await;
    let addr = server.addr;

    // when (操作):
    server.shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(3), server.task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    // then (期待する結果):
    assert!(TcpStream::connect(addr).await.is_err());
}
