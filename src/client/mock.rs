//! Scripted transport for unit tests
//!
//! Replies are queued per method and popped in order. Every call is
//! recorded so tests can assert on the exact requests issued.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::transport::{Headers, Method, Response, Transport};
use crate::error::TransportError;

/// A request as seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

enum Reply {
    Ok(Response),
    Timeout,
    Status(u16),
}

#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<Method, VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(reply);
    }

    pub fn reply(&self, method: Method, body: &str) -> &Self {
        self.reply_with_headers(method, &[], body)
    }

    pub fn reply_with_headers(&self, method: Method, headers: &[(&str, &str)], body: &str) -> &Self {
        let mut map = Headers::new();
        for (name, value) in headers {
            map.append(name, *value);
        }
        self.push(
            method,
            Reply::Ok(Response {
                status: 200,
                headers: map,
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn reply_timeout(&self, method: Method) -> &Self {
        self.push(method, Reply::Timeout);
        self
    }

    pub fn reply_status(&self, method: Method, status: u16) -> &Self {
        self.push(method, Reply::Status(status));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Response, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&method)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Ok(response)) => Ok(response),
            Some(Reply::Timeout) => Err(TransportError::Timeout {
                method,
                url: path.to_string(),
                timeout: Duration::from_secs(2),
            }),
            Some(Reply::Status(status)) => Err(TransportError::Status {
                method,
                url: path.to_string(),
                status,
                body: String::new(),
            }),
            None => panic!("no scripted reply for {} {}", method, path),
        }
    }
}
