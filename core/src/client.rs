//! Session bootstrap and the generic call primitive.
//!
//! # Design
//! One mechanism carries every endpoint: [`BotClient::call`] substitutes
//! `:name` placeholders from a [`CallArgs`] map, serializes the map as the
//! JSON body, attaches the bearer token and issues the request through the
//! [`Transport`] seam. The typed endpoint wrappers in the sibling modules
//! are one-line instantiations of it with a fixed path template and verb.
//!
//! The client is constructed by [`BotClient::login`]: credentials are
//! exchanged for a token once, and the token is immutable for the client's
//! lifetime — there is no refresh or re-authentication.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::args::CallArgs;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Ack, BotInfo, LogEntry, LoginResponse, RadioStation, Script};

const API_ROOT: &str = "/api/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Connection coordinates and call policy for one session.
///
/// Immutable once the client is constructed; cloning it is cheap enough to
/// hand a copy to every client that needs one.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single HTTP round-trip.
    pub timeout: Duration,
    /// Extra attempts for GET calls that fail at the transport level.
    /// Mutating verbs are never retried.
    pub get_retries: u32,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
            get_retries: 0,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn get_retries(mut self, retries: u32) -> Self {
        self.get_retries = retries;
        self
    }
}

/// Authenticated client for one bot server.
///
/// Holds the session configuration and the token issued at login; both are
/// read-only afterwards, so sharing a client across threads needs no
/// coordination beyond what the transport provides.
pub struct BotClient<T: Transport> {
    config: ClientConfig,
    token: String,
    transport: T,
}

impl<T: Transport> std::fmt::Debug for BotClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotClient")
            .field("config", &self.config)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl BotClient<UreqTransport> {
    /// Log in over the default blocking transport.
    pub fn connect(
        config: ClientConfig,
        username: &str,
        password: &str,
        bot_id: &str,
    ) -> Result<Self> {
        let transport = UreqTransport::new(config.timeout);
        Self::login(config, username, password, bot_id, transport)
    }
}

impl<T: Transport> BotClient<T> {
    /// Exchange credentials for a bearer token.
    ///
    /// Performs `POST /bot/login` immediately; a rejected login or a
    /// response without a usable `token` field fails construction — the
    /// client cannot operate without one.
    pub fn login(
        config: ClientConfig,
        username: &str,
        password: &str,
        bot_id: &str,
        transport: T,
    ) -> Result<Self> {
        if config.host.is_empty() {
            return Err(ApiError::Transport("host must not be empty".to_string()));
        }

        let args = CallArgs::new()
            .arg("username", username)
            .arg("password", password)
            .arg("botId", bot_id);
        let request = build_request(&config, "/bot/login", &args, HttpMethod::Post, None);

        debug!(host = %config.host, port = config.port, username, "logging in");
        let response = transport.execute(&request)?;
        let body = match success_body(response) {
            Ok(body) => body,
            Err(ApiError::Http { status: 401, body }) => {
                warn!(username, "login rejected");
                return Err(ApiError::Auth(format!("credentials rejected: {body}")));
            }
            Err(err) => return Err(err),
        };

        let login: LoginResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Auth(format!("login response unusable: {e}")))?;
        if login.token.is_empty() {
            return Err(ApiError::Auth("login response carried an empty token".to_string()));
        }

        debug!(bot_id = login.bot_id.as_deref().unwrap_or(bot_id), "login succeeded");
        Ok(Self {
            config,
            token: login.token,
            transport,
        })
    }

    /// The bearer token issued at login.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Build the request for one call without executing it.
    ///
    /// Every `:name` placeholder with a matching argument is substituted
    /// into the path; the full argument map — substituted entries included —
    /// becomes the JSON body when non-empty. The bearer token rides on every
    /// request.
    pub fn build_call(&self, template: &str, args: &CallArgs, method: HttpMethod) -> HttpRequest {
        build_request(&self.config, template, args, method, Some(&self.token))
    }

    /// Execute one call and return the raw response body.
    ///
    /// Non-2xx statuses surface as [`ApiError::Http`], failures below HTTP
    /// as [`ApiError::Transport`]. GET calls are retried on transport
    /// failures up to the configured bound; mutating verbs go out exactly
    /// once.
    pub fn call(&self, template: &str, args: &CallArgs, method: HttpMethod) -> Result<String> {
        let request = self.build_call(template, args, method);
        let attempts = match method {
            HttpMethod::Get => self.config.get_retries + 1,
            _ => 1,
        };

        let mut failure = None;
        for attempt in 1..=attempts {
            debug!(method = method.as_str(), url = %request.url, attempt, "issuing call");
            match self.transport.execute(&request) {
                Ok(response) => return success_body(response),
                Err(err @ ApiError::Transport(_)) => {
                    if attempt < attempts {
                        warn!(url = %request.url, error = %err, "transport failure, retrying");
                        thread::sleep(RETRY_DELAY);
                    }
                    failure = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(failure.unwrap_or_else(|| ApiError::Transport("no attempt was made".to_string())))
    }

    /// Execute one call and parse the body as a single JSON object.
    pub fn call_object(
        &self,
        template: &str,
        args: &CallArgs,
        method: HttpMethod,
    ) -> Result<serde_json::Map<String, Value>> {
        let body = self.call(template, args, method)?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(object)) => Ok(object),
            Ok(other) => Err(ApiError::Decode(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }

    /// Execute one call and parse the body as a JSON array.
    pub fn call_array(
        &self,
        template: &str,
        args: &CallArgs,
        method: HttpMethod,
    ) -> Result<Vec<Value>> {
        let body = self.call(template, args, method)?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(ApiError::Decode(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }

    /// Execute one call and decode the body into the endpoint's record type.
    pub(crate) fn call_json<R: DeserializeOwned>(
        &self,
        template: &str,
        args: &CallArgs,
        method: HttpMethod,
    ) -> Result<R> {
        let body = self.call(template, args, method)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// General endpoints that are not scoped to one functional group.
impl<T: Transport> BotClient<T> {
    /// General information about the bot process: version, supported codecs
    /// and formats, memory usage.
    pub fn bot_info(&self) -> Result<BotInfo> {
        self.call_json("/bot/info", &CallArgs::new(), HttpMethod::Get)
    }

    /// Recent entries of the bot-wide log.
    pub fn bot_log(&self) -> Result<Vec<LogEntry>> {
        self.call_json("/bot/log", &CallArgs::new(), HttpMethod::Get)
    }

    /// Installed scripts and their configurable variables.
    pub fn scripts(&self) -> Result<Vec<Script>> {
        self.call_json("/bot/scripts", &CallArgs::new(), HttpMethod::Get)
    }

    /// Search the radio station directory. The server expects PATCH on this
    /// route, and the search term travels both in the query string and in
    /// the body.
    pub fn radio_stations(&self, search: &str) -> Result<Vec<RadioStation>> {
        let args = CallArgs::new().arg("search", search);
        self.call_json("/bot/stations?q=:search", &args, HttpMethod::Patch)
    }

    /// Persist the per-instance settings of a script. `config_json` is the
    /// JSON-encoded settings blob the script defines.
    pub fn save_script_settings(
        &self,
        instance_id: Uuid,
        script: &str,
        enabled: bool,
        config_json: &str,
    ) -> Result<Ack> {
        let args = CallArgs::new()
            .arg("instanceId", instance_id)
            .arg("ScriptName", script)
            .arg("ScriptName_enabled", enabled)
            .arg("ScriptName_config", config_json);
        self.call_json("/bot/i/:instanceId/scriptSettings", &args, HttpMethod::Post)
    }
}

fn build_request(
    config: &ClientConfig,
    template: &str,
    args: &CallArgs,
    method: HttpMethod,
    token: Option<&str>,
) -> HttpRequest {
    let path = args.fill_path(template);
    let url = format!("http://{}:{}{API_ROOT}{path}", config.host, config.port);
    let body = args.json_body();

    let mut headers = Vec::new();
    if let Some(token) = token {
        headers.push(("Authorization".to_string(), format!("bearer {token}")));
    }
    if body.is_some() {
        headers.push((
            "Content-Type".to_string(),
            "application/json; charset=UTF-8".to_string(),
        ));
    }

    HttpRequest {
        method,
        url,
        headers,
        body,
    }
}

fn success_body(response: HttpResponse) -> Result<String> {
    if (200..300).contains(&response.status) {
        Ok(response.body)
    } else {
        Err(ApiError::Http {
            status: response.status,
            body: response.body,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::MockTransport;

    const TOKEN: &str = "tok-123";

    fn config() -> ClientConfig {
        ClientConfig::new("127.0.0.1", 8087)
    }

    fn logged_in() -> (BotClient<MockTransport>, MockTransport) {
        let transport = MockTransport::new();
        transport.queue(200, &format!(r#"{{"token":"{TOKEN}","botId":"b1"}}"#));
        let client = BotClient::login(config(), "admin", "foobar", "b1", transport.clone())
            .expect("login should succeed");
        (client, transport)
    }

    #[test]
    fn login_posts_credentials_and_extracts_token() {
        let (client, transport) = logged_in();
        assert_eq!(client.token(), TOKEN);

        let login = &transport.requests()[0];
        assert_eq!(login.method, HttpMethod::Post);
        assert_eq!(login.url, "http://127.0.0.1:8087/api/v1/bot/login");
        assert!(login.header("Authorization").is_none());
        let body: Value = serde_json::from_str(login.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["username"], "admin");
        assert_eq!(body["password"], "foobar");
        assert_eq!(body["botId"], "b1");
    }

    #[test]
    fn login_without_token_field_fails_construction() {
        let transport = MockTransport::new();
        transport.queue(200, r#"{"botId":"b1"}"#);
        let err = BotClient::login(config(), "admin", "foobar", "b1", transport).unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
    }

    #[test]
    fn login_with_rejected_credentials_is_an_auth_error() {
        let transport = MockTransport::new();
        transport.queue(401, r#"{"success":false}"#);
        let err = BotClient::login(config(), "admin", "wrong", "b1", transport).unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
    }

    #[test]
    fn login_transport_failure_is_not_an_auth_error() {
        let transport = MockTransport::new();
        transport.fail_next("connection refused");
        let err = BotClient::login(config(), "admin", "foobar", "b1", transport).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn calls_substitute_path_and_repeat_arguments_in_body() {
        let (client, transport) = logged_in();
        let args = CallArgs::new().arg("instanceId", "abc").arg("volume", 50);
        client
            .call("/bot/i/:instanceId/volume/set/:volume", &args, HttpMethod::Post)
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.url,
            "http://127.0.0.1:8087/api/v1/bot/i/abc/volume/set/50"
        );
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"instanceId": "abc", "volume": "50"}));
        assert_eq!(
            request.header("Content-Type"),
            Some("application/json; charset=UTF-8")
        );
    }

    #[test]
    fn every_call_carries_the_bearer_token() {
        let (client, transport) = logged_in();
        client.call("/bot/files", &CallArgs::new(), HttpMethod::Get).unwrap();

        let request = transport.last_request();
        assert_eq!(request.header("Authorization"), Some("bearer tok-123"));
    }

    #[test]
    fn empty_argument_map_sends_no_body_and_no_content_type() {
        let (client, transport) = logged_in();
        client.call("/bot/files", &CallArgs::new(), HttpMethod::Get).unwrap();

        let request = transport.last_request();
        assert!(request.body.is_none());
        assert!(request.header("Content-Type").is_none());
    }

    #[test]
    fn non_2xx_surfaces_status_and_body() {
        let (client, transport) = logged_in();
        transport.queue(500, "boom");
        let err = client
            .call("/bot/info", &CallArgs::new(), HttpMethod::Get)
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn transport_failure_is_distinguishable_from_empty_response() {
        let (client, transport) = logged_in();
        transport.fail_next("connection refused");
        let err = client.bot_info().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn get_calls_retry_transport_failures_within_bounds() {
        let transport = MockTransport::new();
        transport.queue(200, &format!(r#"{{"token":"{TOKEN}"}}"#));
        let client = BotClient::login(
            config().get_retries(1),
            "admin",
            "foobar",
            "b1",
            transport.clone(),
        )
        .unwrap();

        transport.fail_next("reset by peer");
        transport.queue(200, "[]");
        let body = client.call("/bot/files", &CallArgs::new(), HttpMethod::Get).unwrap();
        assert_eq!(body, "[]");
        // login + first attempt + retry
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn mutating_calls_are_never_retried() {
        let transport = MockTransport::new();
        transport.queue(200, &format!(r#"{{"token":"{TOKEN}"}}"#));
        let client = BotClient::login(
            config().get_retries(3),
            "admin",
            "foobar",
            "b1",
            transport.clone(),
        )
        .unwrap();

        transport.fail_next("reset by peer");
        let args = CallArgs::new().arg("instanceId", "abc");
        let err = client
            .call("/bot/i/:instanceId/spawn", &args, HttpMethod::Post)
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn call_object_rejects_arrays() {
        let (client, transport) = logged_in();
        transport.queue(200, "[1,2]");
        let err = client
            .call_object("/bot/info", &CallArgs::new(), HttpMethod::Get)
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn call_array_rejects_objects() {
        let (client, transport) = logged_in();
        transport.queue(200, "{}");
        let err = client
            .call_array("/bot/files", &CallArgs::new(), HttpMethod::Get)
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn unmatched_placeholder_is_left_in_the_url() {
        let (client, _transport) = logged_in();
        let request = client.build_call(
            "/bot/i/:instanceId/status",
            &CallArgs::new().arg("volume", 50),
            HttpMethod::Post,
        );
        assert_eq!(
            request.url,
            "http://127.0.0.1:8087/api/v1/bot/i/:instanceId/status"
        );
    }
}
