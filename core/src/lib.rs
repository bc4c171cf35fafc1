//! Blocking client for the bot-control REST API.
//!
//! # Overview
//! Authenticates once (`POST /bot/login`), then translates typed method
//! calls into HTTP requests against the fixed `/api/v1` URL scheme: `:name`
//! placeholders in a path template are substituted from a flat string
//! argument map, the same map is serialized as the JSON request body, and
//! the bearer token from login rides on every call.
//!
//! # Design
//! - [`BotClient`] holds immutable session state (host, port, token); there
//!   is no refresh logic, and concurrent reads need no coordination.
//! - Requests are built as plain [`HttpRequest`] data and executed through
//!   the [`Transport`] seam, so tests drive the client without a network.
//! - Every endpoint wrapper is a one-line instantiation of the generic call
//!   primitive with a fixed path template and verb; responses decode into
//!   the records in [`types`].

pub mod args;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

mod files;
mod instances;
mod jobs;
mod playback;
mod queue;
mod users;

pub use args::CallArgs;
pub use client::{BotClient, ClientConfig};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Ack, BotInfo, Channel, ChannelClient, Created, Instance, InstanceSettings, InstanceStatus,
    Job, LogEntry, LoginResponse, RadioStation, RecentTracks, Script, StreamToken, SystemInfo,
    TrackInfo, UploadInfo, User,
};
