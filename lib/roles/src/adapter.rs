//! Role store access bound to the configured role set.

use crate::config::RolesConfiguration;
use crate::error::RoleStoreError;
use crate::store::RoleStore;
use roles_auth_core::{Account, Result, RoleName, Uid};
use std::sync::Arc;

/// Wraps a role store together with the configured role set.
///
/// Every role-scoped operation rejects role names outside the configured
/// set with `RoleStoreError::UnknownRole` before the store is contacted.
#[derive(Clone)]
pub struct RolesAdapter {
    store: Arc<dyn RoleStore>,
    available_roles: Vec<RoleName>,
}

impl RolesAdapter {
    /// Creates an adapter for the configured role set.
    #[must_use]
    pub fn new(config: &RolesConfiguration, store: Arc<dyn RoleStore>) -> Self {
        Self {
            store,
            available_roles: config.role_names(),
        }
    }

    /// Returns the configured role names.
    #[must_use]
    pub fn available_roles(&self) -> &[RoleName] {
        &self.available_roles
    }

    /// Returns true if the role is part of the configured role set.
    #[must_use]
    pub fn is_available_role(&self, role: &str) -> bool {
        self.available_roles.iter().any(|r| r.as_str() == role)
    }

    /// Resolves a role name from the configured set.
    ///
    /// # Errors
    ///
    /// Returns `RoleStoreError::UnknownRole` if the name is not configured.
    pub fn resolve_role(&self, role: &str) -> Result<RoleName, RoleStoreError> {
        self.available_roles
            .iter()
            .find(|r| r.as_str() == role)
            .cloned()
            .ok_or_else(|| {
                RoleStoreError::UnknownRole {
                    role: role.to_string(),
                }
                .into()
            })
    }

    fn require_role(&self, role: &RoleName) -> Result<(), RoleStoreError> {
        self.resolve_role(role.as_str()).map(|_| ())
    }

    /// Returns true if an account record exists for the uid.
    pub async fn user_exists(&self, uid: &Uid) -> Result<bool, RoleStoreError> {
        self.store.user_exists(uid).await
    }

    /// Stores a new account record.
    pub async fn register_user(&self, account: &Account) -> Result<(), RoleStoreError> {
        self.store.register_user(account).await
    }

    /// Returns true if the role is granted to the uid.
    pub async fn has_role(&self, uid: &Uid, role: &RoleName) -> Result<bool, RoleStoreError> {
        self.require_role(role)?;
        self.store.has_role(uid, role).await
    }

    /// Returns true if the uid has a pending request for the role.
    pub async fn is_role_requested_by_user(
        &self,
        uid: &Uid,
        role: &RoleName,
    ) -> Result<bool, RoleStoreError> {
        self.require_role(role)?;
        self.store.is_role_requested_by_user(uid, role).await
    }

    /// Lists the uids holding the role.
    pub async fn get_uids_in_role(&self, role: &RoleName) -> Result<Vec<Uid>, RoleStoreError> {
        self.require_role(role)?;
        self.store.get_uids_in_role(role).await
    }

    /// Lists the uids requesting the role.
    pub async fn get_uids_requesting_role(
        &self,
        role: &RoleName,
    ) -> Result<Vec<Uid>, RoleStoreError> {
        self.require_role(role)?;
        self.store.get_uids_requesting_role(role).await
    }

    /// Fetches the account record for the uid.
    pub async fn get_account_record(&self, uid: &Uid) -> Result<Account, RoleStoreError> {
        self.store.get_account_record(uid).await
    }

    /// Grants the role to the uid.
    pub async fn enable_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError> {
        self.require_role(role)?;
        self.store.enable_role(uid, role).await
    }

    /// Revokes the role from the uid.
    pub async fn disable_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError> {
        self.require_role(role)?;
        self.store.disable_role(uid, role).await
    }

    /// Files a request for the role on behalf of the uid.
    pub async fn request_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError> {
        self.require_role(role)?;
        self.store.request_role(uid, role).await
    }

    /// Withdraws the uid's request for the role.
    pub async fn remove_role_request(
        &self,
        uid: &Uid,
        role: &RoleName,
    ) -> Result<(), RoleStoreError> {
        self.require_role(role)?;
        self.store.remove_role_request(uid, role).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRoleStore;

    fn config() -> RolesConfiguration {
        RolesConfiguration::builder()
            .role("admin", &[])
            .role("editor", &[])
            .build()
            .expect("valid config")
    }

    fn adapter() -> RolesAdapter {
        let config = config();
        let store = InMemoryRoleStore::new(config.clone()).expect("valid store");
        RolesAdapter::new(&config, Arc::new(store))
    }

    #[test]
    fn available_roles_come_from_configuration() {
        let adapter = adapter();
        let names: Vec<&str> = adapter.available_roles().iter().map(RoleName::as_str).collect();
        assert_eq!(names, vec!["admin", "editor"]);
        assert!(adapter.is_available_role("admin"));
        assert!(!adapter.is_available_role("viewer"));
    }

    #[test]
    fn resolve_role_rejects_unknown_names() {
        let adapter = adapter();
        assert_eq!(adapter.resolve_role("editor").unwrap().as_str(), "editor");
        let err = adapter.resolve_role("viewer").unwrap_err();
        assert!(err.to_string().contains("viewer"));
    }

    #[tokio::test]
    async fn role_operations_pass_through() {
        let adapter = adapter();
        let uid = Uid::new("u1").unwrap();
        let admin = RoleName::new("admin").unwrap();

        adapter
            .register_user(&Account::new(uid.clone(), "password"))
            .await
            .unwrap();
        assert!(adapter.user_exists(&uid).await.unwrap());

        adapter.request_role(&uid, &admin).await.unwrap();
        assert!(adapter.is_role_requested_by_user(&uid, &admin).await.unwrap());
        assert_eq!(adapter.get_uids_requesting_role(&admin).await.unwrap(), vec![uid.clone()]);

        adapter.enable_role(&uid, &admin).await.unwrap();
        adapter.remove_role_request(&uid, &admin).await.unwrap();
        assert!(adapter.has_role(&uid, &admin).await.unwrap());
        assert!(adapter.get_uids_requesting_role(&admin).await.unwrap().is_empty());
        assert_eq!(adapter.get_uids_in_role(&admin).await.unwrap(), vec![uid.clone()]);

        adapter.disable_role(&uid, &admin).await.unwrap();
        assert!(!adapter.has_role(&uid, &admin).await.unwrap());

        let record = adapter.get_account_record(&uid).await.unwrap();
        assert_eq!(record.provider_id(), "password");
    }

    #[tokio::test]
    async fn unknown_role_never_reaches_store() {
        let config = config();
        // A store configured with a wider role set would accept "viewer".
        let wide = RolesConfiguration::builder()
            .role("admin", &[])
            .role("editor", &[])
            .role("viewer", &[])
            .build()
            .unwrap();
        let store = InMemoryRoleStore::new(wide).unwrap();
        let adapter = RolesAdapter::new(&config, Arc::new(store.clone()));

        let uid = Uid::new("u1").unwrap();
        let viewer = RoleName::new("viewer").unwrap();
        let err = adapter.enable_role(&uid, &viewer).await.unwrap_err();

        assert!(err.to_string().contains("not one of the configured roles"));
        assert_eq!(store.document_count("role_viewer").await, 0);
    }
}
