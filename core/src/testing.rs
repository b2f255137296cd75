//! In-memory transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Replays queued responses in order and records every request.
/// With an empty queue `send` fails like a refused connection.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn respond(&self, status: u16, body: &str) {
        self.respond_bytes(status, body.as_bytes());
    }

    pub fn respond_bytes(&self, status: u16, body: &[u8]) {
        self.responses.borrow_mut().push_back(HttpResponse {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_vec(),
        });
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        self.responses.borrow_mut().pop_front().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "no response queued").into()
        })
    }
}
