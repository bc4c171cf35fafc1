//! Typed records for the API's request and response shapes.
//!
//! # Design
//! The server documents each endpoint's response informally; these types pin
//! the documented fields down so decoding fails loudly on a shape mismatch
//! instead of handing back an opaque blob. Fields the server may omit carry
//! `#[serde(default)]`. Wire names that are not clean camelCase (`type`,
//! `serverUID`, `trackuuid`, `annonuceString`) keep their exact spelling via
//! explicit renames — they are the contract, typos included.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// `POST /bot/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "botId", default)]
    pub bot_id: Option<String>,
}

/// The ubiquitous `{"success": ...}` acknowledgement.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Ack {
    pub success: bool,
}

/// Acknowledgement carrying the uuid of a newly created resource
/// (instances, download jobs).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Created {
    pub success: bool,
    pub uuid: Uuid,
}

/// One entry of the instance list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub uuid: Uuid,
    #[serde(default)]
    pub nick: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub main_instance: bool,
}

/// Track metadata as the server reports it (file list, queue, current track).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    pub uuid: Uuid,
    #[serde(default)]
    pub parent: Option<Uuid>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    /// Title of the current track for radio streams, when the stream
    /// supplies one.
    #[serde(default)]
    pub temp_title: Option<String>,
    #[serde(default)]
    pub temp_artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub album_artist: Option<String>,
    #[serde(default)]
    pub track: Option<u32>,
    #[serde(default)]
    pub total_tracks: Option<u32>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    /// Served under `/cache/<thumbnail>` on the remote host.
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub codec: Option<String>,
    /// Milliseconds.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub bitrate: u32,
    #[serde(default)]
    pub channels: u32,
    #[serde(default)]
    pub samplerate: u32,
    #[serde(default)]
    pub filesize: u64,
}

/// `POST /bot/i/:instanceId/status` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceStatus {
    /// Version of the bot process.
    #[serde(default)]
    pub v: String,
    #[serde(default)]
    pub current_track: Option<TrackInfo>,
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub playing: bool,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub volume: u32,
    /// Set after an update has been applied.
    #[serde(default)]
    pub needs_restart: bool,
    #[serde(default)]
    pub playlist: Option<String>,
    #[serde(default)]
    pub playlist_track: Option<i64>,
    #[serde(default)]
    pub queue_len: u32,
    #[serde(default)]
    pub queue_version: u64,
    #[serde(default)]
    pub modes: u32,
    #[serde(default)]
    pub downloaded: bool,
    #[serde(rename = "serverUID", default)]
    pub server_uid: Option<String>,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub muted: bool,
}

/// One bot-log or instance-log line.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    pub message: String,
    #[serde(default)]
    pub severity: String,
    /// Unix time.
    #[serde(default)]
    pub time: u64,
}

/// `GET /bot/info` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotInfo {
    #[serde(default)]
    pub bot: Value,
    #[serde(default)]
    pub system: SystemInfo,
    /// Memory used across all instances, excluding client resources.
    #[serde(default)]
    pub usage_memory: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub codecs: Vec<String>,
    #[serde(default)]
    pub formats: Vec<String>,
}

/// `GET /bot/uploadInfo` response.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInfo {
    pub max_size: u64,
}

/// One entry of the download-job list.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub uuid: Uuid,
    #[serde(default)]
    pub url: String,
    /// Estimated size of the target.
    #[serde(default)]
    pub size: u64,
    /// Estimated progression in percent.
    #[serde(default)]
    pub perc: f64,
    #[serde(default)]
    pub status: String,
    /// Track generated out of the job, once one exists.
    #[serde(rename = "trackuuid", default)]
    pub track_uuid: Option<Uuid>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub eta: Option<u64>,
    #[serde(default)]
    pub bw: Option<f64>,
    /// Autoplay when done.
    #[serde(default)]
    pub play: bool,
    /// Delete after playback.
    #[serde(default)]
    pub temp: bool,
    #[serde(default)]
    pub done: bool,
}

/// One entry of the user list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// TeamSpeak unique identifier bound to the user, if any.
    #[serde(default)]
    pub tsuid: Option<String>,
    /// TeamSpeak group-id bound to the user, if any.
    #[serde(default)]
    pub tsgid: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub is_admin: bool,
    /// Privilege bitmask.
    #[serde(default)]
    pub privileges: u32,
}

/// One channel of the TeamSpeak channel tree.
///
/// The `perm`/`sperm`/`default`/`pw`/`enc` flags come over the wire as 0/1.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: u64,
    #[serde(default)]
    pub parent: u64,
    pub name: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub codec: u32,
    #[serde(default)]
    pub quality: u32,
    #[serde(default)]
    pub max_clients: i32,
    #[serde(default)]
    pub order: u64,
    #[serde(default)]
    pub perm: u8,
    #[serde(default)]
    pub sperm: u8,
    #[serde(rename = "default", default)]
    pub is_default: u8,
    #[serde(default)]
    pub pw: u8,
    #[serde(default)]
    pub enc: u8,
    #[serde(default)]
    pub clients: Vec<ChannelClient>,
}

/// One client sitting in a [`Channel`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelClient {
    pub id: u64,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub nick: String,
    #[serde(default)]
    pub idle: u64,
    #[serde(default)]
    pub recording: bool,
    #[serde(default)]
    pub output_muted: bool,
    #[serde(default)]
    pub output_only_muted: bool,
    #[serde(default)]
    pub input_muted: bool,
    #[serde(default)]
    pub away: bool,
}

/// One station from the radio directory. The server abbreviates the field
/// names on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RadioStation {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "u")]
    pub url: String,
    #[serde(rename = "g", default)]
    pub genre: String,
    #[serde(rename = "b", default)]
    pub bitrate: u32,
}

/// One installed script and its configurable variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub vars: Value,
}

/// `GET /bot/i/:instanceId/recent` response: uuids of recently played
/// tracks, wrapped in a `body` field by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentTracks {
    #[serde(default)]
    pub body: Vec<Uuid>,
}

/// `POST /bot/i/:instanceId/streamToken` response.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamToken {
    pub success: bool,
    pub token: String,
}

/// Request-side record for the instance settings call.
///
/// All fields are sent on every call; the wire key for `announce_string`
/// really is `annonuceString`.
#[derive(Debug, Clone, Default)]
pub struct InstanceSettings {
    pub nick: String,
    pub server_host: String,
    pub server_port: u16,
    pub server_password: String,
    pub channel_name: String,
    pub channel_password: String,
    /// Update the client description to contain track information.
    pub update_description: bool,
    /// Announce new tracks in the channel.
    pub announce: bool,
    pub announce_string: String,
    /// TeamSpeak identity the bot should use.
    pub identity: String,
    /// Ducking reduces music volume while somebody is talking.
    pub enable_ducking: bool,
    pub ducking_volume: u32,
    pub channel_commander: bool,
    /// Return to the original channel when moved.
    pub stick_to_channel: bool,
    /// Text-to-speech URL; should contain `__TEXT` and `__LOCALE` variables.
    pub tts_external_url: String,
    pub tts_default_locale: String,
    pub ignore_chat_server: bool,
    pub ignore_chat_private: bool,
    pub ignore_chat_channel: bool,
    /// Media url played when the bot becomes idle.
    pub idle_track: String,
    /// Media url played when the bot starts up.
    pub startup_track: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_info_tolerates_sparse_objects() {
        let track: TrackInfo = serde_json::from_str(
            r#"{"uuid":"00000000-0000-0000-0000-000000000001","type":"file","title":"Song"}"#,
        )
        .unwrap();
        assert_eq!(track.kind, "file");
        assert_eq!(track.title.as_deref(), Some("Song"));
        assert_eq!(track.duration, 0);
        assert!(track.parent.is_none());
    }

    #[test]
    fn status_reads_server_uid_wire_name() {
        let status: InstanceStatus =
            serde_json::from_str(r#"{"running":true,"volume":50,"serverUID":"abc"}"#).unwrap();
        assert!(status.running);
        assert_eq!(status.volume, 50);
        assert_eq!(status.server_uid.as_deref(), Some("abc"));
    }

    #[test]
    fn radio_station_reads_abbreviated_fields() {
        let station: RadioStation =
            serde_json::from_str(r#"{"n":"Jazz FM","u":"http://radio/jazz","g":"jazz","b":128}"#)
                .unwrap();
        assert_eq!(station.name, "Jazz FM");
        assert_eq!(station.bitrate, 128);
    }

    #[test]
    fn job_reads_lowercase_trackuuid() {
        let job: Job = serde_json::from_str(
            r#"{"uuid":"00000000-0000-0000-0000-000000000002","trackuuid":"00000000-0000-0000-0000-000000000003","done":true}"#,
        )
        .unwrap();
        assert!(job.done);
        assert!(job.track_uuid.is_some());
    }

    #[test]
    fn login_response_requires_token() {
        let result: Result<LoginResponse, _> = serde_json::from_str(r#"{"botId":"b1"}"#);
        assert!(result.is_err());
    }
}
