//! Instance lifecycle and per-instance administration.

use uuid::Uuid;

use crate::args::CallArgs;
use crate::client::BotClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{Ack, Channel, Created, Instance, InstanceSettings, InstanceStatus, LogEntry};

impl<T: Transport> BotClient<T> {
    /// Create a fresh instance; the returned uuid identifies it from then on.
    pub fn create_instance(&self) -> Result<Created> {
        self.call_json("/bot/instances", &CallArgs::new(), HttpMethod::Post)
    }

    /// Remove the instances registered on the server.
    pub fn delete_instances(&self) -> Result<Ack> {
        self.call_json("/bot/instances", &CallArgs::new(), HttpMethod::Delete)
    }

    /// All instances the server manages.
    pub fn instances(&self) -> Result<Vec<Instance>> {
        self.call_json("/bot/instances", &CallArgs::new(), HttpMethod::Get)
    }

    /// Apply the full settings record to an instance.
    pub fn set_settings(&self, instance_id: Uuid, settings: &InstanceSettings) -> Result<Ack> {
        let args = settings_args(instance_id, settings);
        self.call_json("/bot/i/:instanceId/settings", &args, HttpMethod::Post)
    }

    /// Runtime status of an instance: playback state, volume, queue length.
    pub fn status(&self, instance_id: Uuid) -> Result<InstanceStatus> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/status", &args, HttpMethod::Post)
    }

    /// Launch an instance.
    pub fn spawn(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/spawn", &args, HttpMethod::Post)
    }

    /// Restart an instance.
    pub fn respawn(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/respawn", &args, HttpMethod::Post)
    }

    /// Shut an instance down.
    pub fn kill(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/kill", &args, HttpMethod::Post)
    }

    /// Request an avatar upload for an instance.
    pub fn upload_avatar(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/avatar", &args, HttpMethod::Post)
    }

    /// Remove an instance's avatar.
    pub fn delete_avatar(&self, instance_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/avatar", &args, HttpMethod::Delete)
    }

    /// Recent log entries of one instance.
    pub fn instance_log(&self, instance_id: Uuid) -> Result<Vec<LogEntry>> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/log", &args, HttpMethod::Get)
    }

    /// Channel tree of the TeamSpeak server the instance is connected to,
    /// including the clients sitting in each channel.
    pub fn channels(&self, instance_id: Uuid) -> Result<Vec<Channel>> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/channels", &args, HttpMethod::Get)
    }
}

fn settings_args(instance_id: Uuid, s: &InstanceSettings) -> CallArgs {
    CallArgs::new()
        .arg("instanceId", instance_id)
        .arg("nick", &s.nick)
        .arg("serverHost", &s.server_host)
        .arg("serverPort", s.server_port)
        .arg("serverPassword", &s.server_password)
        .arg("channelName", &s.channel_name)
        .arg("channelPassword", &s.channel_password)
        .arg("updateDescription", s.update_description)
        .arg("announce", s.announce)
        .arg("annonuceString", &s.announce_string)
        .arg("identity", &s.identity)
        .arg("enableDucking", s.enable_ducking)
        .arg("duckingVolume", s.ducking_volume)
        .arg("channelCommander", s.channel_commander)
        .arg("stickToChannel", s.stick_to_channel)
        .arg("ttsExternalURL", &s.tts_external_url)
        .arg("ttsDefaultLocale", &s.tts_default_locale)
        .arg("ignoreChatServer", s.ignore_chat_server)
        .arg("ignoreChatPrivate", s.ignore_chat_private)
        .arg("ignoreChatChannel", s.ignore_chat_channel)
        .arg("idleTrack", &s.idle_track)
        .arg("startupTrack", &s.startup_track)
}
