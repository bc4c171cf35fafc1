//! HTTP transport types.
//!
//! # Design
//! Requests and responses are described as plain data. The client builds
//! [`HttpRequest`] values without touching the network; everything that
//! performs I/O sits behind the [`Transport`](crate::transport::Transport)
//! seam. All fields use owned types so values can be recorded and replayed
//! freely in tests.

/// HTTP verb for a request.
///
/// The remote API only ever uses these four; anything else is
/// unrepresentable rather than a runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by [`BotClient::build_call`](crate::BotClient::build_call); `url` is
/// absolute and already has every path placeholder substituted.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First value of a header, compared case-insensitively by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
