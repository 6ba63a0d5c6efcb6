//! A role store that records every call (for testing).

use crate::config::RolesConfiguration;
use crate::error::{ConfigError, RoleStoreError};
use crate::memory::InMemoryRoleStore;
use crate::store::RoleStore;
use async_trait::async_trait;
use roles_auth_core::{Account, Result, RoleName, Uid};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A call made against a [`RecordingRoleStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    UserExists(Uid),
    RegisterUser(Account),
    HasRole(Uid, RoleName),
    IsRoleRequestedByUser(Uid, RoleName),
    GetUidsInRole(RoleName),
    GetUidsRequestingRole(RoleName),
    GetAccountRecord(Uid),
    EnableRole(Uid, RoleName),
    DisableRole(Uid, RoleName),
    RequestRole(Uid, RoleName),
    RemoveRoleRequest(Uid, RoleName),
}

#[derive(Default)]
struct Recording {
    calls: Vec<StoreCall>,
    failure: Option<String>,
}

/// Role store that records calls and delegates to an in-memory store.
///
/// Seed data through [`RecordingRoleStore::backing`]; calls made that way
/// are not recorded. A failure can be injected for every subsequent call.
pub struct RecordingRoleStore {
    backing: InMemoryRoleStore,
    recording: Mutex<Recording>,
}

impl RecordingRoleStore {
    /// Creates an empty recording store.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration is invalid.
    pub fn new(config: RolesConfiguration) -> Result<Self, ConfigError> {
        Ok(Self {
            backing: InMemoryRoleStore::new(config)?,
            recording: Mutex::new(Recording::default()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.recording.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the store holding the data, for seeding.
    #[must_use]
    pub fn backing(&self) -> &InMemoryRoleStore {
        &self.backing
    }

    /// Returns every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Returns the number of recorded calls matching the predicate.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&StoreCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Makes every subsequent call fail with the given details.
    pub fn fail_with(&self, details: &str) {
        self.lock().failure = Some(details.to_string());
    }

    /// Stops injecting failures.
    pub fn clear_failure(&self) {
        self.lock().failure = None;
    }

    fn record(&self, call: StoreCall) -> Result<(), RoleStoreError> {
        let mut recording = self.lock();
        recording.calls.push(call);
        match &recording.failure {
            Some(details) => Err(RoleStoreError::RequestFailed {
                details: details.clone(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RoleStore for RecordingRoleStore {
    async fn user_exists(&self, uid: &Uid) -> Result<bool, RoleStoreError> {
        self.record(StoreCall::UserExists(uid.clone()))?;
        self.backing.user_exists(uid).await
    }

    async fn register_user(&self, account: &Account) -> Result<(), RoleStoreError> {
        self.record(StoreCall::RegisterUser(account.clone()))?;
        self.backing.register_user(account).await
    }

    async fn has_role(&self, uid: &Uid, role: &RoleName) -> Result<bool, RoleStoreError> {
        self.record(StoreCall::HasRole(uid.clone(), role.clone()))?;
        self.backing.has_role(uid, role).await
    }

    async fn is_role_requested_by_user(
        &self,
        uid: &Uid,
        role: &RoleName,
    ) -> Result<bool, RoleStoreError> {
        self.record(StoreCall::IsRoleRequestedByUser(uid.clone(), role.clone()))?;
        self.backing.is_role_requested_by_user(uid, role).await
    }

    async fn get_uids_in_role(&self, role: &RoleName) -> Result<Vec<Uid>, RoleStoreError> {
        self.record(StoreCall::GetUidsInRole(role.clone()))?;
        self.backing.get_uids_in_role(role).await
    }

    async fn get_uids_requesting_role(
        &self,
        role: &RoleName,
    ) -> Result<Vec<Uid>, RoleStoreError> {
        self.record(StoreCall::GetUidsRequestingRole(role.clone()))?;
        self.backing.get_uids_requesting_role(role).await
    }

    async fn get_account_record(&self, uid: &Uid) -> Result<Account, RoleStoreError> {
        self.record(StoreCall::GetAccountRecord(uid.clone()))?;
        self.backing.get_account_record(uid).await
    }

    async fn enable_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError> {
        self.record(StoreCall::EnableRole(uid.clone(), role.clone()))?;
        self.backing.enable_role(uid, role).await
    }

    async fn disable_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError> {
        self.record(StoreCall::DisableRole(uid.clone(), role.clone()))?;
        self.backing.disable_role(uid, role).await
    }

    async fn request_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError> {
        self.record(StoreCall::RequestRole(uid.clone(), role.clone()))?;
        self.backing.request_role(uid, role).await
    }

    async fn remove_role_request(
        &self,
        uid: &Uid,
        role: &RoleName,
    ) -> Result<(), RoleStoreError> {
        self.record(StoreCall::RemoveRoleRequest(uid.clone(), role.clone()))?;
        self.backing.remove_role_request(uid, role).await
    }
}
