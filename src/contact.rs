//! Contacting a lister about one of their listings.
//!
//! The lister's name and email come from a [`ListerDirectory`]; the message is
//! composed here and handed back as a `mailto:` link for the caller's mail
//! client. Nothing is sent by this crate.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Public profile of a user who lists properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lister {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Look up listers by user ID.
#[async_trait]
pub trait ListerDirectory: Send + Sync {
    async fn lister(&self, user_id: &str) -> Result<Option<Lister>, StoreError>;
}

/// A composed message to a lister.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub listing_id: String,
    pub to_name: String,
    pub to_email: String,
    /// The listing's property name.
    pub subject: String,
    pub body: String,
}

impl ContactMessage {
    /// `mailto:` link with the subject and body percent-encoded.
    pub fn mailto(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to_email,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

/// In-memory lister directory.
#[derive(Clone, Default)]
pub struct InMemoryListerDirectory {
    listers: Arc<RwLock<HashMap<String, Lister>>>,
}

impl InMemoryListerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a lister.
    pub fn insert(&self, lister: Lister) -> Result<(), StoreError> {
        let mut listers = self
            .listers
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert lister"))?;
        listers.insert(lister.user_id.clone(), lister);
        Ok(())
    }
}

#[async_trait]
impl ListerDirectory for InMemoryListerDirectory {
    async fn lister(&self, user_id: &str) -> Result<Option<Lister>, StoreError> {
        let listers = self
            .listers
            .read()
            .map_err(|_| StoreError::LockPoisoned("lister"))?;
        Ok(listers.get(user_id).cloned())
    }
}
