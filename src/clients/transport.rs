//! # Transport Seam
//!
//! The [`FeedClient`](crate::clients::FeedClient) builds feed requests; a
//! [`Transport`] sends them. Keeping HTTP behind this trait means the client's
//! URL building, header handling and feed parsing can be tested without a
//! network, and that any blocking HTTP library can be plugged in.

use crate::framework::FeedResult;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        };
        f.write_str(verb)
    }
}

/// One request against a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl FeedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What came back. Status interpretation is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub status: u16,
    pub body: String,
}

impl FeedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and blocks until the response arrives.
///
/// Implementations report connection-level failures as
/// [`FeedError::Transport`](crate::framework::FeedError::Transport) and return
/// every HTTP response, successful or not, as a [`FeedResponse`].
pub trait Transport {
    fn execute(&self, request: &FeedRequest) -> FeedResult<FeedResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &FeedRequest) -> FeedResult<FeedResponse> {
        (**self).execute(request)
    }
}
