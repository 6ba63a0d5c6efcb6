//! Shared fixtures for the module's unit tests.

use crate::config::Callbacks;
use roles_auth_identity::UserInfo;
use roles_auth_roles::{RecordingRoleStore, RolesConfiguration};
use std::sync::{Arc, Mutex};

/// A callback invocation seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Authenticated(String),
    NotAuthenticated,
    Error(String),
}

/// Records every callback invocation.
#[derive(Clone, Default)]
pub struct CallbackLog {
    events: Arc<Mutex<Vec<HostEvent>>>,
}

impl CallbackLog {
    pub fn callbacks(&self) -> Callbacks {
        let (a, b, c) = (self.events.clone(), self.events.clone(), self.events.clone());
        Callbacks::new(
            move |account| {
                a.lock()
                    .unwrap()
                    .push(HostEvent::Authenticated(account.uid().to_string()));
            },
            move || b.lock().unwrap().push(HostEvent::NotAuthenticated),
            move |message| c.lock().unwrap().push(HostEvent::Error(message.to_string())),
        )
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

pub fn roles_config() -> RolesConfiguration {
    RolesConfiguration::builder()
        .role("admin", &["editor"])
        .role("editor", &[])
        .build()
        .expect("valid config")
}

pub fn recording_store() -> Arc<RecordingRoleStore> {
    Arc::new(RecordingRoleStore::new(roles_config()).expect("valid config"))
}

pub fn user(uid: &str) -> UserInfo {
    UserInfo::new(uid.to_string(), "password".to_string())
        .with_display_name(Some("Ada".to_string()))
        .with_email(Some(format!("{uid}@example.com")))
        .with_phone_number(Some("+15550100".to_string()))
}
