//! In-memory role store.
//!
//! Lays documents out the way the remote document store does: one
//! collection of account records, and one grant collection plus one request
//! collection per configured role, each keyed by uid.

use crate::config::RolesConfiguration;
use crate::error::{ConfigError, RoleStoreError};
use crate::store::RoleStore;
use async_trait::async_trait;
use roles_auth_core::{Account, Result, RoleName, Uid};
use serde_json::{Value as JsonValue, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

type Collection = BTreeMap<String, JsonValue>;

/// Role store keeping every collection in process memory.
#[derive(Clone)]
pub struct InMemoryRoleStore {
    config: Arc<RolesConfiguration>,
    collections: Arc<Mutex<BTreeMap<String, Collection>>>,
}

impl InMemoryRoleStore {
    /// Creates an empty store for the configured role set.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration is invalid.
    pub fn new(config: RolesConfiguration) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            collections: Arc::new(Mutex::new(BTreeMap::new())),
        })
    }

    /// Returns the number of documents in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    fn require_role(&self, role: &RoleName) -> Result<(), RoleStoreError> {
        if !self.config.contains_role(role.as_str()) {
            return Err(RoleStoreError::UnknownRole {
                role: role.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn contains(&self, collection: &str, id: &Uid) -> bool {
        self.collections
            .lock()
            .await
            .get(collection)
            .is_some_and(|docs| docs.contains_key(id.as_str()))
    }

    async fn put(&self, collection: String, id: &Uid, document: JsonValue) {
        self.collections
            .lock()
            .await
            .entry(collection)
            .or_default()
            .insert(id.to_string(), document);
    }

    async fn remove(&self, collection: &str, id: &Uid) {
        if let Some(docs) = self.collections.lock().await.get_mut(collection) {
            docs.remove(id.as_str());
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Uid>, RoleStoreError> {
        let collections = self.collections.lock().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut uids = Vec::with_capacity(docs.len());
        for key in docs.keys() {
            let uid = Uid::new(key.clone()).map_err(|e| RoleStoreError::InvalidInput {
                details: e.to_string(),
            })?;
            uids.push(uid);
        }
        Ok(uids)
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    #[instrument(skip_all, fields(uid = %uid))]
    async fn user_exists(&self, uid: &Uid) -> Result<bool, RoleStoreError> {
        let exists = self.contains(self.config.accounts_collection(), uid).await;
        debug!(exists, "user exists result");
        Ok(exists)
    }

    #[instrument(skip_all, fields(uid = %account.uid()))]
    async fn register_user(&self, account: &Account) -> Result<(), RoleStoreError> {
        account
            .validate()
            .map_err(|e| RoleStoreError::InvalidInput {
                details: e.to_string(),
            })?;

        let document = serde_json::to_value(account).map_err(|e| RoleStoreError::InvalidInput {
            details: e.to_string(),
        })?;

        let mut collections = self.collections.lock().await;
        let accounts = collections
            .entry(self.config.accounts_collection().to_string())
            .or_default();
        if accounts.contains_key(account.uid().as_str()) {
            return Err(RoleStoreError::AccountExists {
                uid: account.uid().to_string(),
            }
            .into());
        }
        accounts.insert(account.uid().to_string(), document);

        debug!("account registered");
        Ok(())
    }

    #[instrument(skip_all, fields(uid = %uid, role = %role))]
    async fn has_role(&self, uid: &Uid, role: &RoleName) -> Result<bool, RoleStoreError> {
        self.require_role(role)?;
        let granted = self.contains(&self.config.role_collection(role), uid).await;
        debug!(granted, "has role result");
        Ok(granted)
    }

    #[instrument(skip_all, fields(uid = %uid, role = %role))]
    async fn is_role_requested_by_user(
        &self,
        uid: &Uid,
        role: &RoleName,
    ) -> Result<bool, RoleStoreError> {
        self.require_role(role)?;
        let requested = self
            .contains(&self.config.role_requests_collection(role), uid)
            .await;
        debug!(requested, "role request result");
        Ok(requested)
    }

    #[instrument(skip_all, fields(role = %role))]
    async fn get_uids_in_role(&self, role: &RoleName) -> Result<Vec<Uid>, RoleStoreError> {
        self.require_role(role)?;
        self.list(&self.config.role_collection(role)).await
    }

    #[instrument(skip_all, fields(role = %role))]
    async fn get_uids_requesting_role(
        &self,
        role: &RoleName,
    ) -> Result<Vec<Uid>, RoleStoreError> {
        self.require_role(role)?;
        self.list(&self.config.role_requests_collection(role)).await
    }

    #[instrument(skip_all, fields(uid = %uid))]
    async fn get_account_record(&self, uid: &Uid) -> Result<Account, RoleStoreError> {
        let document = self
            .collections
            .lock()
            .await
            .get(self.config.accounts_collection())
            .and_then(|docs| docs.get(uid.as_str()))
            .cloned()
            .ok_or_else(|| RoleStoreError::AccountNotFound {
                uid: uid.to_string(),
            })?;

        let account = serde_json::from_value(document).map_err(|e| RoleStoreError::InvalidInput {
            details: e.to_string(),
        })?;
        Ok(account)
    }

    #[instrument(skip_all, fields(uid = %uid, role = %role))]
    async fn enable_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError> {
        self.require_role(role)?;
        let document = json!({ "uid": uid.as_str(), "role": role.as_str() });
        self.put(self.config.role_collection(role), uid, document).await;
        debug!("role enabled");
        Ok(())
    }

    #[instrument(skip_all, fields(uid = %uid, role = %role))]
    async fn disable_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError> {
        self.require_role(role)?;
        self.remove(&self.config.role_collection(role), uid).await;
        debug!("role disabled");
        Ok(())
    }

    #[instrument(skip_all, fields(uid = %uid, role = %role))]
    async fn request_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError> {
        self.require_role(role)?;
        let document = json!({ "uid": uid.as_str(), "role": role.as_str() });
        self.put(self.config.role_requests_collection(role), uid, document)
            .await;
        debug!("role requested");
        Ok(())
    }

    #[instrument(skip_all, fields(uid = %uid, role = %role))]
    async fn remove_role_request(
        &self,
        uid: &Uid,
        role: &RoleName,
    ) -> Result<(), RoleStoreError> {
        self.require_role(role)?;
        self.remove(&self.config.role_requests_collection(role), uid)
            .await;
        debug!("role request removed");
        Ok(())
    }
}
