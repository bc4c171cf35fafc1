//! User administration.

use uuid::Uuid;

use crate::args::CallArgs;
use crate::client::BotClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{Ack, User};

impl<T: Transport> BotClient<T> {
    /// All accounts known to the web interface.
    pub fn users(&self) -> Result<Vec<User>> {
        self.call_json("/bot/users", &CallArgs::new(), HttpMethod::Get)
    }

    /// Create an account. `tsuid`/`tsgid` bind the account to a TeamSpeak
    /// identity and group; `privileges` is the privilege bitmask.
    pub fn create_user(
        &self,
        name: &str,
        password: &str,
        tsuid: &str,
        tsgid: &str,
        privileges: u32,
    ) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("name", name)
            .arg("password", password)
            .arg("tsuid", tsuid)
            .arg("tsgid", tsgid)
            .arg("privileges", privileges);
        self.call_json("/bot/users", &args, HttpMethod::Post)
    }

    /// Update an account's password, TeamSpeak binding and privileges.
    pub fn update_user(
        &self,
        user_id: Uuid,
        password: &str,
        tsuid: &str,
        tsgid: &str,
        privileges: u32,
    ) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("userId", user_id)
            .arg("password", password)
            .arg("tsuid", tsuid)
            .arg("tsgid", tsgid)
            .arg("privileges", privileges);
        self.call_json("/bot/users/:userId", &args, HttpMethod::Patch)
    }

    /// Delete an account.
    pub fn delete_user(&self, user_id: Uuid) -> Result<Ack> {
        let args = CallArgs::new().arg("userId", user_id);
        self.call_json("/bot/users/:userId", &args, HttpMethod::Delete)
    }

    /// Set an account's privilege bitmask for a single instance.
    pub fn set_instance_privileges(
        &self,
        instance_id: Uuid,
        user_id: Uuid,
        privileges: u32,
    ) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("userId", user_id)
            .arg("privileges", privileges);
        self.call_json("/bot/i/:instanceId/users/:userId", &args, HttpMethod::Patch)
    }
}
