//! Blocking HTTP transport.

use std::time::Duration;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// The client builds requests and interprets responses; everything that
/// actually touches the network sits behind this trait, so tests can inject
/// a canned transport instead of a live server.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Default transport backed by a blocking `ureq` agent.
///
/// Non-2xx statuses are returned as data, not errors — the client owns
/// status interpretation. The global timeout bounds the whole round-trip,
/// so a hung server cannot block the calling thread indefinitely.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let headers = &request.headers;
        let sent = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), headers).send_empty(),
        };

        let mut response = sent.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(
    builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    headers
        .iter()
        .fold(builder, |b, (name, value)| b.header(name.as_str(), value.as_str()))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Canned transport for unit tests.

    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};

    /// Records every request and replays queued responses in order.
    ///
    /// Clones share state, so a test can keep a handle for inspection after
    /// handing the transport to the client. An empty queue answers
    /// `200 {"success": true}` so lifecycle tests only queue what they assert.
    #[derive(Clone, Default)]
    pub(crate) struct MockTransport {
        inner: Rc<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn queue(&self, status: u16, body: &str) {
            self.inner.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
        }

        pub fn fail_next(&self, message: &str) {
            self.inner
                .responses
                .borrow_mut()
                .push_back(Err(ApiError::Transport(message.to_string())));
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.inner.requests.borrow().clone()
        }

        pub fn last_request(&self) -> HttpRequest {
            self.inner
                .requests
                .borrow()
                .last()
                .expect("no request was issued")
                .clone()
        }
    }

    impl Transport for MockTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.inner.requests.borrow_mut().push(request.clone());
            self.inner
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(HttpResponse {
                        status: 200,
                        body: r#"{"success":true}"#.to_string(),
                    })
                })
        }
    }
}
