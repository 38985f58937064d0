use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Credential pair accepted by the gate. A single account, checked verbatim;
/// the original product makes no stronger claim.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// An issued session with explicit creation (login) and teardown (logout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("missing or unknown session token")]
    Unauthorized,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

static TOKEN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Explicit session state replacing the original's ambient auth token.
pub struct SessionStore {
    credentials: Credentials,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Session>>, SessionError> {
        self.sessions
            .lock()
            .map_err(|_| SessionError::Unavailable("session lock poisoned".to_string()))
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Session, SessionError> {
        if username != self.credentials.username || password != self.credentials.password {
            return Err(SessionError::InvalidCredentials);
        }

        let sequence = TOKEN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let issued_at = Utc::now();
        let session = Session {
            token: format!("session-{sequence:06}-{:x}", issued_at.timestamp_millis()),
            username: username.to_string(),
            issued_at,
        };

        self.lock()?.insert(session.token.clone(), session.clone());
        Ok(session)
    }

    pub fn authorize(&self, token: &str) -> Result<Session, SessionError> {
        self.lock()?
            .get(token)
            .cloned()
            .ok_or(SessionError::Unauthorized)
    }

    pub fn logout(&self, token: &str) -> Result<(), SessionError> {
        match self.lock()?.remove(token) {
            Some(_) => Ok(()),
            None => Err(SessionError::Unauthorized),
        }
    }
}
