//! Test doubles shared by the unit tests of this crate.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::TransportError;
use crate::gateway::{HttpRequest, HttpResponse, HttpTransport};

/// Transport that records requests and answers with a fixed response.
pub(crate) struct RecordingTransport {
    pub requests: Mutex<Vec<HttpRequest>>,
    status: u16,
    body: Vec<u8>,
    fail: bool,
}

impl RecordingTransport {
    pub fn answering(status: u16, body: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            status,
            body: body.as_bytes().to_vec(),
            fail: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail: true,
            ..Self::answering(200, "")
        }
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().await.push(request);
        if self.fail {
            return Err(TransportError::connection("connection refused"));
        }
        Ok(HttpResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}
