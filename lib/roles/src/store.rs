//! The role store collaborator.

use crate::error::RoleStoreError;
use async_trait::async_trait;
use roles_auth_core::{Account, Result, RoleName, Uid};

/// Remote store of account records, role grants and role requests.
///
/// Implementations are constructed from a `RolesConfiguration`; role names
/// passed in are expected to belong to its role set.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Returns true if an account record exists for the uid.
    async fn user_exists(&self, uid: &Uid) -> Result<bool, RoleStoreError>;

    /// Stores a new account record.
    async fn register_user(&self, account: &Account) -> Result<(), RoleStoreError>;

    /// Returns true if the role is granted to the uid.
    async fn has_role(&self, uid: &Uid, role: &RoleName) -> Result<bool, RoleStoreError>;

    /// Returns true if the uid has a pending request for the role.
    async fn is_role_requested_by_user(
        &self,
        uid: &Uid,
        role: &RoleName,
    ) -> Result<bool, RoleStoreError>;

    /// Lists the uids holding the role.
    async fn get_uids_in_role(&self, role: &RoleName) -> Result<Vec<Uid>, RoleStoreError>;

    /// Lists the uids requesting the role.
    async fn get_uids_requesting_role(
        &self,
        role: &RoleName,
    ) -> Result<Vec<Uid>, RoleStoreError>;

    /// Fetches the account record for the uid.
    async fn get_account_record(&self, uid: &Uid) -> Result<Account, RoleStoreError>;

    /// Grants the role to the uid.
    async fn enable_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError>;

    /// Revokes the role from the uid.
    async fn disable_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError>;

    /// Files a request for the role on behalf of the uid.
    async fn request_role(&self, uid: &Uid, role: &RoleName) -> Result<(), RoleStoreError>;

    /// Withdraws the uid's request for the role.
    async fn remove_role_request(
        &self,
        uid: &Uid,
        role: &RoleName,
    ) -> Result<(), RoleStoreError>;
}
