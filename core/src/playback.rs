//! Playback control: transport buttons, volume, TTS and web streaming.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::args::CallArgs;
use crate::client::BotClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{Ack, RecentTracks, StreamToken};

impl<T: Transport> BotClient<T> {
    /// Play a file from the file list.
    pub fn play_by_id(&self, instance_id: Uuid, file_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("id", file_id);
        self.call_json("/bot/i/:instanceId/play/byId/:id", &args, HttpMethod::Post)
    }

    /// Play track number `index` of a playlist.
    pub fn play_by_list(&self, instance_id: Uuid, playlist_id: Uuid, index: u32) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("playlistId", playlist_id)
            .arg("index", index);
        self.call_json(
            "/bot/i/:instanceId/play/byList/:playlistId/:index",
            &args,
            HttpMethod::Post,
        )
    }

    /// Play a URL directly. `plugin` names the resolver that produced the
    /// URL; both values travel in the query string and in the body.
    pub fn play_url(&self, instance_id: Uuid, url: &str, plugin: &str) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("url", url)
            .arg("plugin", plugin);
        self.call_json(
            "/bot/i/:instanceId/playUrl?url=:url&plugin=:plugin",
            &args,
            HttpMethod::Post,
        )
    }

    /// Pause playback.
    pub fn pause(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/pause", &args, HttpMethod::Post)
    }

    /// Stop playback.
    pub fn stop(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/stop", &args, HttpMethod::Post)
    }

    /// Seek to a position, in percent of the current track.
    pub fn seek(&self, instance_id: Uuid, percent: u32) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("val", percent);
        self.call_json("/bot/i/:instanceId/seek/:val", &args, HttpMethod::Post)
    }

    /// Set the volume, 0–100.
    pub fn set_volume(&self, instance_id: Uuid, volume: u32) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("volume", volume);
        self.call_json("/bot/i/:instanceId/volume/set/:volume", &args, HttpMethod::Post)
    }

    /// Raise the volume by 5%.
    pub fn volume_up(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/volume/up", &args, HttpMethod::Post)
    }

    /// Lower the volume by 5%.
    pub fn volume_down(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/volume/down", &args, HttpMethod::Post)
    }

    /// Mute or unmute. The wire encodes the flag as `1`/`0`.
    pub fn set_mute(&self, instance_id: Uuid, muted: bool) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("val", flag(muted));
        self.call_json("/bot/i/:instanceId/mute/:val", &args, HttpMethod::Post)
    }

    /// Enable or disable repeat.
    pub fn set_repeat(&self, instance_id: Uuid, enabled: bool) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("val", flag(enabled));
        self.call_json("/bot/i/:instanceId/repeat/:val", &args, HttpMethod::Post)
    }

    /// Enable or disable shuffle.
    pub fn set_shuffle(&self, instance_id: Uuid, enabled: bool) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("val", flag(enabled));
        self.call_json("/bot/i/:instanceId/shuffle/:val", &args, HttpMethod::Post)
    }

    /// Speak `text` via text-to-speech. An empty locale selects the
    /// instance's default.
    pub fn say(&self, instance_id: Uuid, text: &str, locale: &str) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("text", text)
            .arg("locale", locale);
        self.call_json("/bot/i/:instanceId/say", &args, HttpMethod::Post)
    }

    /// Uuids of recently played tracks.
    pub fn recent_tracks(&self, instance_id: Uuid) -> Result<RecentTracks> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/recent", &args, HttpMethod::Get)
    }

    /// Skip to the next playlist track.
    pub fn play_next(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/playNext", &args, HttpMethod::Post)
    }

    /// Go back to the previous playlist track.
    pub fn play_previous(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/playPrevious", &args, HttpMethod::Post)
    }

    /// Acquire a token for the web stream.
    pub fn stream_token(&self, instance_id: Uuid) -> Result<StreamToken> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/streamToken", &args, HttpMethod::Post)
    }

    /// Fetch the audio stream descriptor for a token acquired via
    /// [`stream_token`](Self::stream_token). The shape of this response is
    /// not documented, so it comes back as a raw object.
    pub fn stream(&self, instance_id: Uuid, token: &str) -> Result<Map<String, Value>> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("token", token);
        self.call_object("/bot/i/:instanceId/stream/:token", &args, HttpMethod::Get)
    }
}

fn flag(enabled: bool) -> u8 {
    if enabled {
        1
    } else {
        0
    }
}
