//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::Client;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Records every request and answers from a queue of canned responses.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// A client for `http://localhost:9011` with API key `key123`.
    pub(crate) fn client() -> (Arc<Self>, Client) {
        let transport = Arc::new(Self::default());
        let client = Client::with_transport("http://localhost:9011", "key123", None, transport.clone()).unwrap();
        (transport, client)
    }

    pub(crate) fn client_with_tenant(tenant_id: &str) -> (Arc<Self>, Client) {
        let transport = Arc::new(Self::default());
        let client =
            Client::with_transport("http://localhost:9011", "key123", Some(tenant_id), transport.clone()).unwrap();
        (transport, client)
    }

    pub(crate) fn push(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
    }

    pub(crate) fn push_network_error(&self, message: &str) {
        self.responses.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ApiError::Network(message)),
            None => Err(ApiError::Network("no scripted response".to_string())),
        }
    }
}
