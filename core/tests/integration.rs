//! End-to-end session tests against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port, so state never
//! leaks between tests, then drives the client over real HTTP through the
//! default transport. This validates login, the bearer-token round-trip and
//! the request building/decoding of every endpoint group end to end.

use std::net::SocketAddr;
use std::time::Duration;

use uuid::Uuid;

use tsbot_core::{ApiError, BotClient, ClientConfig, InstanceSettings, UreqTransport};

fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(addr.ip().to_string(), addr.port()).timeout(Duration::from_secs(5))
}

fn connect(addr: SocketAddr) -> BotClient<UreqTransport> {
    BotClient::connect(
        config(addr),
        mock_server::USERNAME,
        mock_server::PASSWORD,
        mock_server::BOT_ID,
    )
    .expect("login against mock server")
}

#[test]
fn full_session_lifecycle() {
    let addr = spawn_server();
    let client = connect(addr);
    assert!(!client.token().is_empty());

    // general information comes back typed
    let info = client.bot_info().unwrap();
    assert!(info.system.formats.contains(&"mp3".to_string()));
    assert!(info.usage_memory > 0);
    assert!(!client.bot_log().unwrap().is_empty());
    assert_eq!(client.scripts().unwrap().len(), 1);

    // instance lifecycle
    let created = client.create_instance().unwrap();
    assert!(created.success);
    let id = created.uuid;

    let instances = client.instances().unwrap();
    assert_eq!(instances.len(), 1);
    assert!(instances[0].main_instance);
    assert!(!instances[0].running);

    assert!(client.spawn(id).unwrap().success);
    let status = client.status(id).unwrap();
    assert!(status.running);
    assert_eq!(status.volume, 100);

    let settings = InstanceSettings {
        nick: "DJ".to_string(),
        server_host: "ts.example.com".to_string(),
        server_port: 9987,
        ..InstanceSettings::default()
    };
    assert!(client.set_settings(id, &settings).unwrap().success);
    assert_eq!(client.instances().unwrap()[0].nick, "DJ");

    // playback controls reflected in status
    client.set_volume(id, 42).unwrap();
    client.volume_up(id).unwrap();
    client.set_mute(id, true).unwrap();
    client.set_repeat(id, true).unwrap();
    let status = client.status(id).unwrap();
    assert_eq!(status.volume, 47);
    assert!(status.muted);
    assert!(status.repeat);

    // file list
    assert!(client
        .add_url("http://radio.example/jazz", "Jazz", Uuid::nil())
        .unwrap()
        .success);
    let files = client.files().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].kind, "url");
    let url_track = files[0].uuid;

    let uploaded = client.upload_file("song.mp3", "", Uuid::nil()).unwrap();
    assert_eq!(uploaded.kind, "file");
    assert_eq!(uploaded.title.as_deref(), Some("song.mp3"));
    assert!(client.upload_info().unwrap().max_size > 0);

    client
        .update_file(url_track, "Renamed", "Various", "", Uuid::nil())
        .unwrap();
    let files = client.files().unwrap();
    let renamed = files.iter().find(|f| f.uuid == url_track).unwrap();
    assert_eq!(renamed.title.as_deref(), Some("Renamed"));

    // playback + queue against real tracks
    assert!(client.play_by_id(id, url_track).unwrap().success);
    let status = client.status(id).unwrap();
    assert!(status.playing);
    assert_eq!(status.current_track.as_ref().map(|t| t.uuid), Some(url_track));

    client.append_queue(id, uploaded.uuid).unwrap();
    client.prepend_queue(id, url_track).unwrap();
    let queue = client.queue(id).unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].uuid, url_track);
    assert_eq!(client.status(id).unwrap().queue_len, 2);

    client.remove_from_queue(id, 0).unwrap();
    assert_eq!(client.queue(id).unwrap().len(), 1);

    let recent = client.recent_tracks(id).unwrap();
    assert!(recent.body.contains(&url_track));

    assert!(client.say(id, "hello channel", "en").unwrap().success);
    client.seek(id, 50).unwrap();
    client.pause(id).unwrap();
    assert!(!client.status(id).unwrap().playing);
    client.stop(id).unwrap();
    assert!(client.status(id).unwrap().current_track.is_none());

    client.play_url(id, "http://radio.example/metal", "stream").unwrap();
    client.play_next(id).unwrap();
    client.play_previous(id).unwrap();
    client.play_by_list(id, Uuid::nil(), 0).unwrap();
    client.volume_down(id).unwrap();
    client.set_shuffle(id, true).unwrap();
    assert!(client.status(id).unwrap().shuffle);

    // streaming
    let stream = client.stream_token(id).unwrap();
    assert!(stream.success);
    let descriptor = client.stream(id, &stream.token).unwrap();
    assert!(descriptor.contains_key("url"));

    // instance log and channel tree
    assert!(!client.instance_log(id).unwrap().is_empty());
    let channels = client.channels(id).unwrap();
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0].clients.len(), 1);
    assert_eq!(channels[0].is_default, 1);

    // users
    client
        .create_user("alice", "secret", "tsuid=", "6", 7)
        .unwrap();
    let users = client.users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].privileges, 7);
    let alice = users[0].id;

    client.update_user(alice, "secret", "tsuid=", "6", 15).unwrap();
    assert_eq!(client.users().unwrap()[0].privileges, 15);
    assert!(client.set_instance_privileges(id, alice, 3).unwrap().success);
    client.delete_user(alice).unwrap();
    assert!(client.users().unwrap().is_empty());

    // download jobs
    let job = client.add_job("http://media.example/set.mp3").unwrap();
    assert!(job.success);
    let jobs = client.jobs().unwrap();
    assert_eq!(jobs.len(), 1);
    assert!(!jobs[0].done);
    client.clear_jobs().unwrap();
    assert_eq!(client.jobs().unwrap().len(), 1);
    client.cancel_job(job.uuid).unwrap();
    assert!(client.jobs().unwrap().is_empty());

    // radio directory
    let stations = client.radio_stations("jazz").unwrap();
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].name, "Jazz FM");

    // script settings and avatars acknowledge
    assert!(client
        .save_script_settings(id, "announcer", true, r#"{"template":"now: %s"}"#)
        .unwrap()
        .success);
    assert!(client.upload_avatar(id).unwrap().success);
    assert!(client.delete_avatar(id).unwrap().success);

    // teardown
    client.delete_file(url_track).unwrap();
    assert!(client.kill(id).unwrap().success);
    assert!(!client.status(id).unwrap().running);
    client.delete_instances().unwrap();
    assert!(client.instances().unwrap().is_empty());
}

#[test]
fn login_with_bad_credentials_is_an_auth_error() {
    let addr = spawn_server();
    let err = BotClient::connect(config(addr), mock_server::USERNAME, "wrong", mock_server::BOT_ID)
        .unwrap_err();
    assert!(matches!(err, ApiError::Auth(_)));
}

#[test]
fn unreachable_server_surfaces_a_transport_failure() {
    // Bind and immediately drop a listener so the port is very likely closed.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = BotClient::connect(
        config(addr),
        mock_server::USERNAME,
        mock_server::PASSWORD,
        mock_server::BOT_ID,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn missing_resources_surface_the_http_status() {
    let addr = spawn_server();
    let client = connect(addr);

    let err = client.delete_file(Uuid::nil()).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));

    let err = client.status(Uuid::nil()).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
}

#[test]
fn stale_tokens_are_rejected_after_a_new_login() {
    let addr = spawn_server();
    let first = connect(addr);
    let second = connect(addr);

    // the second login rotated the server-side token
    assert!(second.bot_info().is_ok());
    let err = first.bot_info().unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));
}
