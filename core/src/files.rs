//! File-list CRUD: tracks, folders, remote URLs and upload coordination.

use uuid::Uuid;

use crate::args::CallArgs;
use crate::client::BotClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{Ack, TrackInfo, UploadInfo};

impl<T: Transport> BotClient<T> {
    /// The full file list, folders included.
    pub fn files(&self) -> Result<Vec<TrackInfo>> {
        self.call_json("/bot/files", &CallArgs::new(), HttpMethod::Get)
    }

    /// Delete a file.
    pub fn delete_file(&self, file_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("id", file_id);
        self.call_json("/bot/files/:id", &args, HttpMethod::Delete)
    }

    /// Update a file's tags, or move it by changing `parent`.
    pub fn update_file(
        &self,
        file_id: Uuid,
        title: &str,
        artist: &str,
        album: &str,
        parent: Uuid,
    ) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("id", file_id)
            .arg("title", title)
            .arg("artist", artist)
            .arg("album", album)
            .arg("parent", parent);
        self.call_json("/bot/files/:id", &args, HttpMethod::Patch)
    }

    /// Register an upload; the response carries the metadata of the track
    /// the server created for it.
    pub fn upload_file(&self, filename: &str, playlist: &str, folder: Uuid) -> Result<TrackInfo> {
        let args = CallArgs::new()
            .arg("filename", filename)
            .arg("playlist", playlist)
            .arg("folder", folder);
        self.call_json("/bot/upload", &args, HttpMethod::Post)
    }

    /// Upload restrictions, currently just the maximum file size.
    pub fn upload_info(&self) -> Result<UploadInfo> {
        self.call_json("/bot/uploadInfo", &CallArgs::new(), HttpMethod::Get)
    }

    /// Add a remote URL to the file list.
    pub fn add_url(&self, url: &str, title: &str, parent: Uuid) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("url", url)
            .arg("title", title)
            .arg("parent", parent);
        self.call_json("/bot/url", &args, HttpMethod::Post)
    }

    /// Create a folder under `parent`.
    pub fn create_folder(&self, name: &str, parent: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("name", name).arg("parent", parent);
        self.call_json("/bot/folders", &args, HttpMethod::Post)
    }
}
