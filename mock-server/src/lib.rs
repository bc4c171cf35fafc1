//! In-memory implementation of the bot-control API, used as the
//! integration-test peer for the client crate.
//!
//! Routes live under `/api/v1`. `POST /bot/login` issues a bearer token for
//! the fixed test credentials; every other route rejects requests whose
//! `Authorization` header does not carry that token. Request DTOs mirror the
//! wire format (all-string JSON bodies) and are defined independently of the
//! client crate, so integration tests catch schema drift between the two.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Credentials the login route accepts.
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "foobar";
pub const BOT_ID: &str = "default";

const VOLUME_STEP: u32 = 5;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    token: RwLock<Option<String>>,
    instances: RwLock<HashMap<Uuid, InstanceEntry>>,
    media: RwLock<HashMap<Uuid, Track>>,
    users: RwLock<HashMap<Uuid, UserEntry>>,
    jobs: RwLock<HashMap<Uuid, JobEntry>>,
}

pub type SharedState = Arc<AppState>;

struct InstanceEntry {
    info: Instance,
    volume: u32,
    muted: bool,
    repeat: bool,
    shuffle: bool,
    playing: bool,
    position: f64,
    current: Option<Uuid>,
    queue: Vec<Uuid>,
    recent: Vec<Uuid>,
    queue_version: u64,
}

impl InstanceEntry {
    fn new(name: String, main_instance: bool) -> Self {
        Self {
            info: Instance {
                uuid: Uuid::new_v4(),
                nick: "bot".to_string(),
                name,
                running: false,
                main_instance,
            },
            volume: 100,
            muted: false,
            repeat: false,
            shuffle: false,
            playing: false,
            position: 0.0,
            current: None,
            queue: Vec::new(),
            recent: Vec::new(),
            queue_version: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub uuid: Uuid,
    pub nick: String,
    pub name: String,
    pub running: bool,
    pub main_instance: bool,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub uuid: Uuid,
    pub parent: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: u64,
    pub bitrate: u32,
    pub channels: u32,
    pub samplerate: u32,
    pub filesize: u64,
}

impl Track {
    fn new(kind: &str, title: String, parent: Option<Uuid>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            parent,
            kind: kind.to_string(),
            title,
            artist: None,
            album: None,
            duration: 0,
            bitrate: 0,
            channels: 2,
            samplerate: 48_000,
            filesize: 0,
        }
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserEntry {
    id: Uuid,
    name: String,
    tsuid: String,
    tsgid: String,
    locked: bool,
    is_admin: bool,
    privileges: u32,
    #[serde(skip)]
    password: String,
    #[serde(skip)]
    instance_privileges: HashMap<Uuid, u32>,
}

#[derive(Clone, Serialize)]
struct JobEntry {
    uuid: Uuid,
    url: String,
    size: u64,
    perc: f64,
    status: String,
    #[serde(rename = "trackuuid")]
    track_uuid: Option<Uuid>,
    message: String,
    eta: u64,
    bw: f64,
    play: bool,
    temp: bool,
    done: bool,
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
    #[serde(rename = "botId")]
    bot_id: String,
}

#[derive(Serialize)]
struct LoginReply {
    token: String,
    #[serde(rename = "botId")]
    bot_id: String,
}

#[derive(Serialize)]
struct AckReply {
    success: bool,
}

#[derive(Serialize)]
struct CreatedReply {
    success: bool,
    uuid: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReply {
    v: String,
    current_track: Option<Track>,
    position: f64,
    running: bool,
    playing: bool,
    shuffle: bool,
    repeat: bool,
    volume: u32,
    needs_restart: bool,
    playlist: Option<String>,
    playlist_track: Option<i64>,
    queue_len: u32,
    queue_version: u64,
    modes: u32,
    downloaded: bool,
    #[serde(rename = "serverUID")]
    server_uid: Option<String>,
    flags: u32,
    muted: bool,
}

#[derive(Serialize)]
struct LogLine {
    message: String,
    severity: String,
    time: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BotInfoReply {
    bot: Value,
    system: SystemReply,
    usage_memory: u64,
}

#[derive(Serialize)]
struct SystemReply {
    codecs: Vec<String>,
    formats: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadInfoReply {
    max_size: u64,
}

#[derive(Serialize)]
struct StationReply {
    n: String,
    u: String,
    g: String,
    b: u32,
}

#[derive(Serialize)]
struct StreamTokenReply {
    success: bool,
    token: String,
}

#[derive(Serialize)]
struct StreamReply {
    success: bool,
    url: String,
}

#[derive(Serialize)]
struct RecentReply {
    body: Vec<Uuid>,
}

#[derive(Deserialize)]
struct CreateUserRequest {
    name: String,
    password: String,
    #[serde(default)]
    tsuid: String,
    #[serde(default)]
    tsgid: String,
    #[serde(default)]
    privileges: String,
}

#[derive(Deserialize)]
struct UpdateUserRequest {
    password: Option<String>,
    tsuid: Option<String>,
    tsgid: Option<String>,
    privileges: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn app() -> Router {
    let state: SharedState = Arc::new(AppState::default());

    let protected = Router::new()
        .route("/bot/info", get(bot_info))
        .route("/bot/log", get(bot_log))
        .route("/bot/scripts", get(list_scripts))
        .route("/bot/stations", patch(search_stations))
        .route("/bot/files", get(list_files))
        .route("/bot/files/{id}", delete(delete_file).patch(update_file))
        .route("/bot/url", post(add_url))
        .route("/bot/folders", post(create_folder))
        .route("/bot/upload", post(upload_file))
        .route("/bot/uploadInfo", get(upload_info))
        .route("/bot/jobs", get(list_jobs).post(add_job).delete(clear_jobs))
        .route("/bot/jobs/{id}", delete(cancel_job))
        .route("/bot/users", get(list_users).post(create_user))
        .route("/bot/users/{id}", patch(update_user).delete(delete_user))
        .route(
            "/bot/instances",
            get(list_instances).post(create_instance).delete(delete_instances),
        )
        .route("/bot/i/{id}/settings", post(apply_settings))
        .route("/bot/i/{id}/status", post(instance_status))
        .route("/bot/i/{id}/spawn", post(spawn_instance))
        .route("/bot/i/{id}/respawn", post(respawn_instance))
        .route("/bot/i/{id}/kill", post(kill_instance))
        .route("/bot/i/{id}/log", get(instance_log))
        .route("/bot/i/{id}/channels", get(list_channels))
        .route("/bot/i/{id}/avatar", post(upload_avatar).delete(delete_avatar))
        .route("/bot/i/{id}/scriptSettings", post(script_settings))
        .route("/bot/i/{id}/users/{user}", patch(instance_privileges))
        .route("/bot/i/{id}/volume/set/{volume}", post(set_volume))
        .route("/bot/i/{id}/volume/up", post(volume_up))
        .route("/bot/i/{id}/volume/down", post(volume_down))
        .route("/bot/i/{id}/mute/{val}", post(set_mute))
        .route("/bot/i/{id}/repeat/{val}", post(set_repeat))
        .route("/bot/i/{id}/shuffle/{val}", post(set_shuffle))
        .route("/bot/i/{id}/play/byId/{file}", post(play_by_id))
        .route("/bot/i/{id}/play/byList/{playlist}/{index}", post(play_by_list))
        .route("/bot/i/{id}/playUrl", post(play_url))
        .route("/bot/i/{id}/pause", post(pause_playback))
        .route("/bot/i/{id}/stop", post(stop_playback))
        .route("/bot/i/{id}/seek/{val}", post(seek))
        .route("/bot/i/{id}/say", post(say))
        .route("/bot/i/{id}/recent", get(recent_tracks))
        .route("/bot/i/{id}/playNext", post(play_next))
        .route("/bot/i/{id}/playPrevious", post(play_previous))
        .route("/bot/i/{id}/queue", get(get_queue))
        .route("/bot/i/{id}/queue/append/{track}", post(queue_append))
        .route("/bot/i/{id}/queue/prepend/{track}", post(queue_prepend))
        .route("/bot/i/{id}/queue/{pos}", delete(queue_remove))
        .route("/bot/i/{id}/streamToken", post(stream_token))
        .route("/bot/i/{id}/stream/{token}", get(get_stream))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state.clone());

    let public = Router::new()
        .route("/bot/login", post(login))
        .with_state(state);

    Router::new().nest("/api/v1", public.merge(protected))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Reject any request whose `Authorization` header does not match the token
/// issued by the last successful login.
async fn require_token(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let expected = state.token.read().await.clone();
    match (provided, expected) {
        (Some(header), Some(token)) if header == format!("bearer {token}") => {
            Ok(next.run(request).await)
        }
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn ack() -> Json<AckReply> {
    Json(AckReply { success: true })
}

// ---------------------------------------------------------------------------
// General
// ---------------------------------------------------------------------------

async fn login(
    State(state): State<SharedState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginReply>, StatusCode> {
    if request.username != USERNAME || request.password != PASSWORD {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let token = Uuid::new_v4().to_string();
    *state.token.write().await = Some(token.clone());
    Ok(Json(LoginReply {
        token,
        bot_id: request.bot_id,
    }))
}

async fn bot_info(State(state): State<SharedState>) -> Json<BotInfoReply> {
    let instances = state.instances.read().await;
    Json(BotInfoReply {
        bot: serde_json::json!({"version": "1.0.0-mock", "instances": instances.len()}),
        system: SystemReply {
            codecs: vec!["opus".to_string(), "mp3".to_string()],
            formats: vec!["mp3".to_string(), "ogg".to_string(), "flac".to_string()],
        },
        usage_memory: 64 * 1024 * 1024,
    })
}

async fn bot_log() -> Json<Vec<LogLine>> {
    Json(vec![
        LogLine {
            message: "server started".to_string(),
            severity: "info".to_string(),
            time: 1_700_000_000,
        },
        LogLine {
            message: "listening for api calls".to_string(),
            severity: "debug".to_string(),
            time: 1_700_000_001,
        },
    ])
}

async fn list_scripts() -> Json<Vec<Value>> {
    Json(vec![serde_json::json!({
        "name": "announcer",
        "version": "0.3.1",
        "description": "announces the current track in the channel",
        "author": "mock",
        "vars": {"template": {"title": "Announce template", "type": "string"}}
    })])
}

async fn search_stations(Query(params): Query<HashMap<String, String>>) -> Json<Vec<StationReply>> {
    let stations = vec![
        StationReply {
            n: "Jazz FM".to_string(),
            u: "http://radio.example/jazz".to_string(),
            g: "jazz".to_string(),
            b: 128,
        },
        StationReply {
            n: "Metal Storm".to_string(),
            u: "http://radio.example/metal".to_string(),
            g: "metal".to_string(),
            b: 192,
        },
    ];
    let needle = params.get("q").cloned().unwrap_or_default().to_lowercase();
    Json(
        stations
            .into_iter()
            .filter(|s| needle.is_empty() || s.n.to_lowercase().contains(&needle))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// File list
// ---------------------------------------------------------------------------

async fn list_files(State(state): State<SharedState>) -> Json<Vec<Track>> {
    let media = state.media.read().await;
    Json(media.values().cloned().collect())
}

async fn delete_file(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    state
        .media
        .write()
        .await
        .remove(&id)
        .map(|_| ack())
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_file(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut media = state.media.write().await;
    let track = media.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = fields.get("title") {
        track.title = title.clone();
    }
    if let Some(artist) = fields.get("artist") {
        track.artist = Some(artist.clone());
    }
    if let Some(album) = fields.get("album") {
        track.album = Some(album.clone());
    }
    if let Some(parent) = fields.get("parent").and_then(|p| p.parse().ok()) {
        track.parent = Some(parent);
    }
    Ok(ack())
}

async fn add_url(
    State(state): State<SharedState>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<Json<AckReply>, StatusCode> {
    let url = fields.get("url").ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let title = fields.get("title").cloned().unwrap_or_else(|| url.clone());
    let parent = fields.get("parent").and_then(|p| p.parse().ok());
    state
        .media
        .write()
        .await
        .insert(Uuid::new_v4(), Track::new("url", title, parent));
    Ok(ack())
}

async fn create_folder(
    State(state): State<SharedState>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<Json<AckReply>, StatusCode> {
    let name = fields.get("name").ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let parent = fields.get("parent").and_then(|p| p.parse().ok());
    state
        .media
        .write()
        .await
        .insert(Uuid::new_v4(), Track::new("folder", name.clone(), parent));
    Ok(ack())
}

async fn upload_file(
    State(state): State<SharedState>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<Json<Track>, StatusCode> {
    let filename = fields.get("filename").ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let folder = fields.get("folder").and_then(|p| p.parse().ok());
    let track = Track::new("file", filename.clone(), folder);
    let mut media = state.media.write().await;
    media.insert(track.uuid, track.clone());
    Ok(Json(track))
}

async fn upload_info() -> Json<UploadInfoReply> {
    Json(UploadInfoReply {
        max_size: 100 * 1024 * 1024,
    })
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

async fn list_jobs(State(state): State<SharedState>) -> Json<Vec<JobEntry>> {
    Json(state.jobs.read().await.values().cloned().collect())
}

async fn add_job(
    State(state): State<SharedState>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<Json<CreatedReply>, StatusCode> {
    let url = fields.get("url").ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let job = JobEntry {
        uuid: Uuid::new_v4(),
        url: url.clone(),
        size: 0,
        perc: 0.0,
        status: "downloading".to_string(),
        track_uuid: None,
        message: String::new(),
        eta: 0,
        bw: 0.0,
        play: false,
        temp: false,
        done: false,
    };
    let uuid = job.uuid;
    state.jobs.write().await.insert(uuid, job);
    Ok(Json(CreatedReply { success: true, uuid }))
}

async fn cancel_job(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    state
        .jobs
        .write()
        .await
        .remove(&id)
        .map(|_| ack())
        .ok_or(StatusCode::NOT_FOUND)
}

async fn clear_jobs(State(state): State<SharedState>) -> Json<AckReply> {
    state.jobs.write().await.retain(|_, job| !job.done);
    ack()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn list_users(State(state): State<SharedState>) -> Json<Vec<UserEntry>> {
    Json(state.users.read().await.values().cloned().collect())
}

async fn create_user(
    State(state): State<SharedState>,
    Json(request): Json<CreateUserRequest>,
) -> Json<AckReply> {
    let user = UserEntry {
        id: Uuid::new_v4(),
        name: request.name,
        tsuid: request.tsuid,
        tsgid: request.tsgid,
        locked: false,
        is_admin: false,
        privileges: request.privileges.parse().unwrap_or(0),
        password: request.password,
        instance_privileges: HashMap::new(),
    };
    state.users.write().await.insert(user.id, user);
    ack()
}

async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut users = state.users.write().await;
    let user = users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(password) = request.password {
        user.password = password;
    }
    if let Some(tsuid) = request.tsuid {
        user.tsuid = tsuid;
    }
    if let Some(tsgid) = request.tsgid {
        user.tsgid = tsgid;
    }
    if let Some(privileges) = request.privileges.and_then(|p| p.parse().ok()) {
        user.privileges = privileges;
    }
    Ok(ack())
}

async fn delete_user(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    state
        .users
        .write()
        .await
        .remove(&id)
        .map(|_| ack())
        .ok_or(StatusCode::NOT_FOUND)
}

async fn instance_privileges(
    State(state): State<SharedState>,
    Path((instance, user_id)): Path<(Uuid, Uuid)>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<Json<AckReply>, StatusCode> {
    if !state.instances.read().await.contains_key(&instance) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut users = state.users.write().await;
    let user = users.get_mut(&user_id).ok_or(StatusCode::NOT_FOUND)?;
    let privileges = fields
        .get("privileges")
        .and_then(|p| p.parse().ok())
        .ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    user.instance_privileges.insert(instance, privileges);
    Ok(ack())
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

async fn list_instances(State(state): State<SharedState>) -> Json<Vec<Instance>> {
    let instances = state.instances.read().await;
    Json(instances.values().map(|entry| entry.info.clone()).collect())
}

async fn create_instance(State(state): State<SharedState>) -> Json<CreatedReply> {
    let mut instances = state.instances.write().await;
    let entry = InstanceEntry::new(
        format!("Instance {}", instances.len() + 1),
        instances.is_empty(),
    );
    let uuid = entry.info.uuid;
    instances.insert(uuid, entry);
    Json(CreatedReply { success: true, uuid })
}

async fn delete_instances(State(state): State<SharedState>) -> Json<AckReply> {
    state.instances.write().await.clear();
    ack()
}

async fn apply_settings(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(nick) = fields.get("nick") {
        entry.info.nick = nick.clone();
    }
    Ok(ack())
}

async fn instance_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusReply>, StatusCode> {
    let instances = state.instances.read().await;
    let entry = instances.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let media = state.media.read().await;
    let current_track = entry.current.and_then(|uuid| media.get(&uuid).cloned());
    Ok(Json(StatusReply {
        v: "1.0.0-mock".to_string(),
        current_track,
        position: entry.position,
        running: entry.info.running,
        playing: entry.playing,
        shuffle: entry.shuffle,
        repeat: entry.repeat,
        volume: entry.volume,
        needs_restart: false,
        playlist: None,
        playlist_track: None,
        queue_len: entry.queue.len() as u32,
        queue_version: entry.queue_version,
        modes: 0,
        downloaded: false,
        server_uid: Some("mockserveruid".to_string()),
        flags: 0,
        muted: entry.muted,
    }))
}

async fn spawn_instance(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    set_running(&state, id, true).await
}

async fn respawn_instance(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    set_running(&state, id, true).await
}

async fn kill_instance(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.info.running = false;
    entry.playing = false;
    Ok(ack())
}

async fn set_running(
    state: &SharedState,
    id: Uuid,
    running: bool,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.info.running = running;
    Ok(ack())
}

async fn instance_log(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LogLine>>, StatusCode> {
    if !state.instances.read().await.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(vec![LogLine {
        message: format!("instance {id} ready"),
        severity: "info".to_string(),
        time: 1_700_000_002,
    }]))
}

async fn list_channels(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    if !state.instances.read().await.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(vec![
        serde_json::json!({
            "id": 1, "parent": 0, "name": "Lobby", "topic": "welcome",
            "codec": 4, "quality": 10, "maxClients": -1, "order": 0,
            "perm": 1, "sperm": 0, "default": 1, "pw": 0, "enc": 1,
            "clients": [{
                "id": 17, "uid": "mockclientuid=", "nick": "listener",
                "idle": 0, "recording": false, "outputMuted": false,
                "outputOnlyMuted": false, "inputMuted": false, "away": false
            }]
        }),
        serde_json::json!({
            "id": 2, "parent": 1, "name": "Music", "topic": null,
            "codec": 4, "quality": 10, "maxClients": 25, "order": 1,
            "perm": 1, "sperm": 0, "default": 0, "pw": 0, "enc": 1,
            "clients": []
        }),
    ]))
}

async fn upload_avatar(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    exists(&state, id).await.map(|_| ack())
}

async fn delete_avatar(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    exists(&state, id).await.map(|_| ack())
}

async fn script_settings(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(_fields): Json<HashMap<String, String>>,
) -> Result<Json<AckReply>, StatusCode> {
    exists(&state, id).await.map(|_| ack())
}

async fn exists(state: &SharedState, id: Uuid) -> Result<(), StatusCode> {
    if state.instances.read().await.contains_key(&id) {
        Ok(())
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

async fn set_volume(
    State(state): State<SharedState>,
    Path((id, volume)): Path<(Uuid, u32)>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.volume = volume.min(100);
    Ok(ack())
}

async fn volume_up(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.volume = (entry.volume + VOLUME_STEP).min(100);
    Ok(ack())
}

async fn volume_down(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.volume = entry.volume.saturating_sub(VOLUME_STEP);
    Ok(ack())
}

async fn set_mute(
    State(state): State<SharedState>,
    Path((id, val)): Path<(Uuid, u8)>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.muted = val != 0;
    Ok(ack())
}

async fn set_repeat(
    State(state): State<SharedState>,
    Path((id, val)): Path<(Uuid, u8)>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.repeat = val != 0;
    Ok(ack())
}

async fn set_shuffle(
    State(state): State<SharedState>,
    Path((id, val)): Path<(Uuid, u8)>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.shuffle = val != 0;
    Ok(ack())
}

async fn play_by_id(
    State(state): State<SharedState>,
    Path((id, file)): Path<(Uuid, Uuid)>,
) -> Result<Json<AckReply>, StatusCode> {
    if !state.media.read().await.contains_key(&file) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.current = Some(file);
    entry.playing = true;
    entry.position = 0.0;
    entry.recent.push(file);
    Ok(ack())
}

async fn play_by_list(
    State(state): State<SharedState>,
    Path((id, _playlist, _index)): Path<(Uuid, Uuid, u32)>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.playing = true;
    Ok(ack())
}

async fn play_url(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.playing = true;
    Ok(ack())
}

async fn pause_playback(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.playing = false;
    Ok(ack())
}

async fn stop_playback(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.playing = false;
    entry.current = None;
    entry.position = 0.0;
    Ok(ack())
}

async fn seek(
    State(state): State<SharedState>,
    Path((id, val)): Path<(Uuid, u32)>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.position = f64::from(val.min(100));
    Ok(ack())
}

async fn say(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<Json<AckReply>, StatusCode> {
    exists(&state, id).await?;
    if !fields.contains_key("text") {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    Ok(ack())
}

async fn recent_tracks(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecentReply>, StatusCode> {
    let instances = state.instances.read().await;
    let entry = instances.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(RecentReply {
        body: entry.recent.clone(),
    }))
}

async fn play_next(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if !entry.queue.is_empty() {
        let next = entry.queue.remove(0);
        entry.current = Some(next);
        entry.recent.push(next);
        entry.playing = true;
        entry.queue_version += 1;
    }
    Ok(ack())
}

async fn play_previous(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.current = entry.recent.last().copied();
    Ok(ack())
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

async fn get_queue(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Track>>, StatusCode> {
    let instances = state.instances.read().await;
    let entry = instances.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let media = state.media.read().await;
    Ok(Json(
        entry
            .queue
            .iter()
            .filter_map(|uuid| media.get(uuid).cloned())
            .collect(),
    ))
}

async fn queue_append(
    State(state): State<SharedState>,
    Path((id, track)): Path<(Uuid, Uuid)>,
) -> Result<Json<AckReply>, StatusCode> {
    if !state.media.read().await.contains_key(&track) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.queue.push(track);
    entry.queue_version += 1;
    Ok(ack())
}

async fn queue_prepend(
    State(state): State<SharedState>,
    Path((id, track)): Path<(Uuid, Uuid)>,
) -> Result<Json<AckReply>, StatusCode> {
    if !state.media.read().await.contains_key(&track) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.queue.insert(0, track);
    entry.queue_version += 1;
    Ok(ack())
}

async fn queue_remove(
    State(state): State<SharedState>,
    Path((id, pos)): Path<(Uuid, usize)>,
) -> Result<Json<AckReply>, StatusCode> {
    let mut instances = state.instances.write().await;
    let entry = instances.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if pos >= entry.queue.len() {
        return Err(StatusCode::NOT_FOUND);
    }
    entry.queue.remove(pos);
    entry.queue_version += 1;
    Ok(ack())
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

async fn stream_token(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StreamTokenReply>, StatusCode> {
    exists(&state, id).await?;
    Ok(Json(StreamTokenReply {
        success: true,
        token: Uuid::new_v4().to_string(),
    }))
}

async fn get_stream(
    State(state): State<SharedState>,
    Path((id, token)): Path<(Uuid, String)>,
) -> Result<Json<StreamReply>, StatusCode> {
    exists(&state, id).await?;
    Ok(Json(StreamReply {
        success: true,
        url: format!("/stream/{token}"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_serializes_with_camel_case_names() {
        let entry = InstanceEntry::new("Instance 1".to_string(), true);
        let json = serde_json::to_value(&entry.info).unwrap();
        assert_eq!(json["mainInstance"], true);
        assert_eq!(json["running"], false);
        assert!(json["uuid"].is_string());
    }

    #[test]
    fn track_serializes_kind_under_type() {
        let track = Track::new("url", "Jazz FM".to_string(), None);
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["type"], "url");
        assert_eq!(json["title"], "Jazz FM");
        assert_eq!(json["samplerate"], 48_000);
    }

    #[test]
    fn job_serializes_track_uuid_lowercase() {
        let job = JobEntry {
            uuid: Uuid::nil(),
            url: "http://x".to_string(),
            size: 0,
            perc: 0.0,
            status: "downloading".to_string(),
            track_uuid: Some(Uuid::nil()),
            message: String::new(),
            eta: 0,
            bw: 0.0,
            play: false,
            temp: false,
            done: false,
        };
        let json = serde_json::to_value(&job).unwrap();
        assert!(json.get("trackuuid").is_some());
        assert!(json.get("trackUuid").is_none());
    }

    #[test]
    fn login_request_requires_bot_id_wire_name() {
        let request: LoginRequest = serde_json::from_str(
            r#"{"username":"admin","password":"foobar","botId":"default"}"#,
        )
        .unwrap();
        assert_eq!(request.bot_id, "default");
    }
}
