//! Queue manipulation.

use uuid::Uuid;

use crate::args::CallArgs;
use crate::client::BotClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{Ack, TrackInfo};

impl<T: Transport> BotClient<T> {
    /// Tracks currently queued on an instance.
    pub fn queue(&self, instance_id: Uuid) -> Result<Vec<TrackInfo>> {
        let args = CallArgs::new().arg("instanceId", instance_id);
        self.call_json("/bot/i/:instanceId/queue", &args, HttpMethod::Get)
    }

    /// Append a track to the end of the queue.
    pub fn append_queue(&self, instance_id: Uuid, track_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("uuid", track_id);
        self.call_json("/bot/i/:instanceId/queue/append/:uuid", &args, HttpMethod::Post)
    }

    /// Put a track at the front of the queue.
    pub fn prepend_queue(&self, instance_id: Uuid, track_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("uuid", track_id);
        self.call_json("/bot/i/:instanceId/queue/prepend/:uuid", &args, HttpMethod::Post)
    }

    /// Remove the track at `position` from the queue.
    pub fn remove_from_queue(&self, instance_id: Uuid, position: u32) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("queuePos", position);
        self.call_json("/bot/i/:instanceId/queue/:queuePos", &args, HttpMethod::Delete)
    }
}
