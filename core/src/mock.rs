//! Scripted in-memory transport.
//!
//! `MockTransport` replays queued responses in order and records every
//! request it receives. Clones share the same queue and log, so a test can
//! keep one handle while the `HttpClient` owns another.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{Result, TrelloError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

#[derive(Debug)]
enum Reply {
    Response(HttpResponse),
    Failure(String),
}

#[derive(Debug, Default)]
struct State {
    replies: VecDeque<Reply>,
    requests: Vec<HttpRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push_response(HttpResponse::new(status, body.to_string()))
    }

    pub fn push_response(&self, response: HttpResponse) -> &Self {
        self.state
            .borrow_mut()
            .replies
            .push_back(Reply::Response(response));
        self
    }

    /// Queue a connectivity failure.
    pub fn push_failure(&self, message: &str) -> &Self {
        self.state
            .borrow_mut()
            .replies
            .push_back(Reply::Failure(message.to_string()));
        self
    }

    /// Every request executed so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state.borrow().requests.last().cloned()
    }

    /// Number of queued replies not yet consumed.
    pub fn pending(&self) -> usize {
        self.state.borrow().replies.len()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());
        match state.replies.pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(message)) => Err(TrelloError::Transport(message)),
            None => Err(TrelloError::Transport(format!(
                "no scripted response for {} {}",
                request.method, request.url
            ))),
        }
    }
}
