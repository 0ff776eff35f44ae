//! End-to-end gateway handshake tests against an in-process mock server

use futures_util::{SinkExt, StreamExt};
use integration_tests::{
    bind_gateway, close_frame, dispatch_frame, frame_op, guild_data, hello_frame, ready_frame,
    wait_for, CannedApi, EventProbe,
};
use kuracord_common::ClientConfig;
use kuracord_core::Snowflake;
use kuracord_gateway::KuracordClient;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const OP_IDENTIFY: u64 = 0;
const OP_HEARTBEAT: u64 = 5;

fn client_for(url: &str, user_id: u64, api: CannedApi) -> KuracordClient {
    let config = ClientConfig::new(format!("token-{user_id}"))
        .unwrap()
        .with_gateway_url(url);
    KuracordClient::with_api(config, Arc::new(api))
}

#[tokio::test]
async fn duplicate_hello_yields_a_single_identify() {
    let (listener, url) = bind_gateway().await;
    let identifies = Arc::new(AtomicUsize::new(0));

    let server_identifies = identifies.clone();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();

        socket.send(hello_frame(60_000)).await.unwrap();
        // a second HELLO inside the session-start window must be ignored
        socket.send(hello_frame(60_000)).await.unwrap();

        while let Some(Ok(message)) = socket.next().await {
            if frame_op(&message) == Some(OP_IDENTIFY) {
                let count = server_identifies.fetch_add(1, Ordering::SeqCst) + 1;
                if count == 1 {
                    socket.send(ready_frame("sess-1", 9001, &[])).await.unwrap();
                }
            }
        }
    });

    let client = client_for(&url, 9001, CannedApi::with_user(9001));
    let (probe, mut events) = EventProbe::channel();
    client.register_handler(probe);

    client.connect().await.unwrap();
    wait_for(&mut events, "ready").await;

    // give a hypothetical second IDENTIFY time to arrive
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(identifies.load(Ordering::SeqCst), 1);

    assert_eq!(client.session_id().as_deref(), Some("sess-1"));
    assert_eq!(client.current_user().unwrap().username, "user-9001");

    client.disconnect().await;
}

#[tokio::test]
async fn ready_resolves_guilds_through_rest_and_completes_download() {
    let (listener, url) = bind_gateway().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();

        socket.send(hello_frame(60_000)).await.unwrap();

        while let Some(Ok(message)) = socket.next().await {
            if frame_op(&message) == Some(OP_IDENTIFY) {
                socket.send(ready_frame("sess-2", 9002, &[7])).await.unwrap();
                // follow with a dispatch so cache updates flow after READY
                socket
                    .send(dispatch_frame(
                        "member_join",
                        1,
                        serde_json::json!({
                            "id": 200,
                            "user": { "id": 200, "username": "liz" },
                            "guild": { "id": 7, "name": "Velvet Room", "shortName": "velvet" }
                        }),
                    ))
                    .await
                    .unwrap();
            }
        }
    });

    let api = CannedApi::with_user(9002).with_guild(guild_data(7));
    let client = client_for(&url, 9002, api);
    let (probe, mut events) = EventProbe::channel();
    client.register_handler(probe);

    client.connect().await.unwrap();

    wait_for(&mut events, "guild_available").await;
    wait_for(&mut events, "guild_download_completed").await;
    wait_for(&mut events, "ready").await;
    wait_for(&mut events, "member_joined").await;

    let guild = client.cache().guild(Snowflake::new(7)).expect("guild cached from READY");
    assert_eq!(guild.guild.name, "Velvet Room");
    assert!(guild.members.contains_key(&Snowflake::new(200)));

    client.disconnect().await;
}

#[tokio::test]
async fn heartbeats_flow_and_acks_surface_as_events() {
    let (listener, url) = bind_gateway().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();

        socket.send(hello_frame(250)).await.unwrap();

        while let Some(Ok(message)) = socket.next().await {
            match frame_op(&message) {
                Some(OP_IDENTIFY) => {
                    socket.send(ready_frame("sess-3", 9003, &[])).await.unwrap();
                }
                Some(OP_HEARTBEAT) => {
                    socket
                        .send(tokio_tungstenite::tungstenite::Message::Text(
                            serde_json::json!({ "op": 6 }).to_string(),
                        ))
                        .await
                        .unwrap();
                }
                _ => {}
            }
        }
    });

    let client = client_for(&url, 9003, CannedApi::with_user(9003));
    let (probe, mut events) = EventProbe::channel();
    client.register_handler(probe);

    client.connect().await.unwrap();
    wait_for(&mut events, "heartbeated").await;

    assert!(client.ping_ms() >= 0);

    client.disconnect().await;
}

#[tokio::test]
async fn fatal_close_code_does_not_reconnect() {
    let (listener, url) = bind_gateway().await;
    let connections = Arc::new(AtomicUsize::new(0));

    let server_connections = connections.clone();
    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => break,
            };
            server_connections.fetch_add(1, Ordering::SeqCst);

            tokio::spawn(async move {
                let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
                socket.send(hello_frame(60_000)).await.unwrap();

                while let Some(Ok(message)) = socket.next().await {
                    if frame_op(&message) == Some(OP_IDENTIFY) {
                        // authentication failed: a do-not-retry close
                        socket.send(close_frame(4004, "auth failed")).await.unwrap();
                    }
                }
            });
        }
    });

    // auto-reconnect stays at its default of true
    let client = client_for(&url, 9004, CannedApi::with_user(9004));
    let (probe, mut events) = EventProbe::channel();
    client.register_handler(probe);

    client.connect().await.unwrap();
    wait_for(&mut events, "socket_closed").await;

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reconnect_worthy_close_reconnects() {
    let (listener, url) = bind_gateway().await;
    let connections = Arc::new(AtomicUsize::new(0));

    let server_connections = connections.clone();
    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => break,
            };
            let connection_number = server_connections.fetch_add(1, Ordering::SeqCst) + 1;

            tokio::spawn(async move {
                let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
                socket.send(hello_frame(60_000)).await.unwrap();

                while let Some(Ok(message)) = socket.next().await {
                    if frame_op(&message) == Some(OP_IDENTIFY) {
                        if connection_number == 1 {
                            // a server-side restart: reconnectable
                            socket.send(close_frame(1000, "restarting")).await.unwrap();
                        } else {
                            socket
                                .send(ready_frame("sess-5b", 9005, &[]))
                                .await
                                .unwrap();
                        }
                    }
                }
            });
        }
    });

    let client = client_for(&url, 9005, CannedApi::with_user(9005));
    let (probe, mut events) = EventProbe::channel();
    client.register_handler(probe);

    client.connect().await.unwrap();
    wait_for(&mut events, "socket_closed").await;

    // the second attempt waits out the connection gate's post-HELLO release
    let deadline = tokio::time::Instant::now() + Duration::from_secs(15);
    while connections.load(Ordering::SeqCst) < 2 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "client never reconnected after a 1000 close"
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    wait_for(&mut events, "ready").await;
    client.disconnect().await;
}
