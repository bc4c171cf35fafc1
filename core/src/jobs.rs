//! Download-job management.

use uuid::Uuid;

use crate::args::CallArgs;
use crate::client::BotClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{Ack, Created, Job};

impl<T: Transport> BotClient<T> {
    /// Ask the server to download `url` into the file list.
    pub fn add_job(&self, url: &str) -> Result<Created> {
        let args = CallArgs::new().arg("url", url);
        self.call_json("/bot/jobs", &args, HttpMethod::Post)
    }

    /// Cancel a running job. Takes the job's uuid, not the track's.
    pub fn cancel_job(&self, job_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("jobId", job_id);
        self.call_json("/bot/jobs/:jobId", &args, HttpMethod::Delete)
    }

    /// Drop finished entries from the job list.
    pub fn clear_jobs(&self) -> Result<Ack> {
        self.call_json("/bot/jobs", &CallArgs::new(), HttpMethod::Delete)
    }

    /// All known jobs with their progress.
    pub fn jobs(&self) -> Result<Vec<Job>> {
        self.call_json("/bot/jobs", &CallArgs::new(), HttpMethod::Get)
    }
}
