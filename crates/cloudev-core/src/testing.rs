// In-process transport for unit tests: answers from a closure and records
// every call it receives.

use std::sync::{Arc, Mutex};

use cloudev_api::{Error, Operation, Transport};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::session::Session;

type Handler = dyn Fn(Operation, &Value) -> Result<Value, Error> + Send + Sync;

#[derive(Clone)]
pub(crate) struct FakeTransport {
    handler: Arc<Handler>,
    calls: Arc<Mutex<Vec<(Operation, Value)>>>,
    token: Option<String>,
}

#[allow(clippy::unwrap_used)]
impl FakeTransport {
    pub(crate) fn new(
        handler: impl Fn(Operation, &Value) -> Result<Value, Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Arc::new(handler),
            calls: Arc::new(Mutex::new(Vec::new())),
            token: None,
        }
    }

    pub(crate) fn calls(&self) -> Vec<(Operation, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// A session over this transport with test-friendly defaults.
    pub(crate) fn session(&self) -> Session<Self> {
        Session::with_transport(ClientConfig::default(), self.clone())
    }
}

#[allow(clippy::unwrap_used)]
impl Transport for FakeTransport {
    async fn invoke(&self, operation: Operation, params: Value) -> Result<Value, Error> {
        let result = (self.handler)(operation, &params);
        self.calls.lock().unwrap().push((operation, params));
        result
    }

    fn rebind(&self, token: Option<&SecretString>) -> Result<Self, Error> {
        Ok(Self {
            token: token.map(|t| t.expose_secret().to_owned()),
            ..self.clone()
        })
    }
}

// ── Canned responses ────────────────────────────────────────────────

pub(crate) fn remote_error(status: u16, code: &str) -> Error {
    Error::Remote {
        status,
        code: code.to_owned(),
        message: format!("{code} from fake"),
        request_id: Some("req-fake".into()),
        headers: Vec::new(),
    }
}

pub(crate) fn env_record(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "organizationName": "acme",
        "projectName": "rocket",
        "status": status,
        "ides": [{ "name": "VSCode" }],
    })
}

pub(crate) fn user_record(id: &str, version: &str) -> Value {
    json!({
        "userId": id,
        "userName": format!("{id}-name"),
        "displayName": format!("User {id}"),
        "primaryEmail": { "email": format!("{id}@example.com"), "verified": true },
        "version": version,
    })
}

pub(crate) fn secret(token: &str) -> SecretString {
    SecretString::from(token.to_owned())
}
