//! Drives a scripted roles-auth session against in-process collaborators.
//!
//! Usage: `roles-auth-console [config.toml]`

mod config;

use config::ConsoleConfig;
use roles_auth_core::Uid;
use roles_auth_identity::LocalIdentityProvider;
use roles_auth_module::{Callbacks, Configuration, RolesAuthModule};
use roles_auth_roles::{InMemoryRoleStore, RoleStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ConsoleConfig::load(path.as_deref()).expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let store = Arc::new(
        InMemoryRoleStore::new(config.roles.clone()).expect("invalid roles configuration"),
    );
    let uid = Uid::new(config.user.uid.clone()).expect("invalid user uid");
    for role in &config.granted_roles {
        store
            .enable_role(&uid, role)
            .await
            .expect("failed to seed role grant");
    }
    for role in &config.requested_roles {
        store
            .request_role(&uid, role)
            .await
            .expect("failed to seed role request");
    }

    let provider = LocalIdentityProvider::new();
    let module = RolesAuthModule::new(
        Configuration::new(config.roles.clone(), Callbacks::logging()),
        Arc::new(provider.clone()),
        store.clone(),
    )
    .expect("failed to create roles-auth module");

    // Log every observed state change until the module is dropped
    let mut receiver = module.subscribe();
    let watcher = tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let snapshot = receiver.borrow_and_update().clone();
            tracing::info!(
                state = %snapshot.state(),
                uid = ?snapshot.account().map(|account| account.uid().to_string()),
                roles = ?snapshot.roles(),
                role_requests = ?snapshot.role_requests(),
                "State changed"
            );
        }
    });

    module.initialize().expect("failed to initialize roles-auth module");

    provider.sign_in(config.user.to_user_info());
    module.settle().await;

    for role in &config.check_roles {
        module.check_role(role).await;
        tracing::info!(
            role = %role,
            granted = ?module.has_role(role),
            requested = ?module.is_role_requested(role),
            "Checked role"
        );
    }

    match store.get_account_record(&uid).await {
        Ok(account) => tracing::info!(?account, "Account record"),
        Err(e) => tracing::warn!(error = %e, "No account record"),
    }

    module.logout().await;
    tracing::info!(state = %module.state(), "Session finished");

    drop(module);
    if let Err(e) = watcher.await {
        tracing::warn!(error = %e, "State watcher failed");
    }
}
