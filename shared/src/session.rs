//! Demo login. The record is advisory only: nothing here authenticates anyone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FormError, StorageError};

pub const SESSION_KEY: &str = "entrega.session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    Apple,
    Facebook,
}

impl SocialProvider {
    pub const ALL: [SocialProvider; 3] = [
        SocialProvider::Google,
        SocialProvider::Apple,
        SocialProvider::Facebook,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SocialProvider::Google => "Google",
            SocialProvider::Apple => "Apple",
            SocialProvider::Facebook => "Facebook",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialProvider>,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub token: String,
}

/// Raw text of the login form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub phone: String,
    pub remember: bool,
}

impl LoginForm {
    pub fn to_credentials(&self, social: Option<SocialProvider>) -> Result<Credentials, FormError> {
        let non_blank = |raw: &str| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        let email = non_blank(&self.email);
        let phone = non_blank(&self.phone);
        if email.is_none() && phone.is_none() && social.is_none() {
            return Err(FormError::MissingIdentity);
        }
        Ok(Credentials {
            email,
            phone,
            social,
            remember: self.remember,
        })
    }
}

/// Key-value persistence backing the session, e.g. browser local storage.
pub trait SessionStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

pub struct SessionStore<S> {
    storage: S,
    current: Option<SessionRecord>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Wrap `storage` and pick up any record already persisted there.
    pub fn new(storage: S) -> Self {
        let mut store = Self {
            storage,
            current: None,
        };
        store.current = store.load();
        store
    }

    pub fn login(&mut self, credentials: Credentials) -> Result<&SessionRecord, StorageError> {
        let record = SessionRecord {
            credentials,
            token: generate_token(),
        };
        let payload = serde_json::to_string(&record)?;
        self.storage.write(SESSION_KEY, &payload)?;
        Ok(&*self.current.insert(record))
    }

    /// The in-memory record is only dropped once storage has forgotten it.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_KEY)?;
        self.current = None;
        Ok(())
    }

    /// Presence check only. Tokens are never verified.
    pub fn validate(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&SessionRecord> {
        self.current.as_ref()
    }

    /// Read the persisted record. Unreadable payloads count as logged out and are cleared.
    pub fn load(&mut self) -> Option<SessionRecord> {
        let raw = self.storage.read(SESSION_KEY).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(_) => {
                let _ = self.storage.remove(SESSION_KEY);
                None
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

pub fn badge_text(record: Option<&SessionRecord>) -> String {
    let Some(record) = record else {
        return "Visitante".to_string();
    };
    let creds = &record.credentials;
    match (&creds.email, &creds.phone, creds.social) {
        (Some(email), _, _) => format!("Conectado: {email}"),
        (None, Some(phone), _) => format!("Conectado: {phone}"),
        (None, None, Some(provider)) => format!("Conectado via {}", provider.label()),
        (None, None, None) => "Conectado".to_string(),
    }
}

fn generate_token() -> String {
    format!("demo-{}", Uuid::new_v4().simple())
}
