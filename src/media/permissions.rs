use std::future::Future;
use serde::Serialize;
use crate::core::Permission;

/// Collaborator that asks the user for a device permission.
pub trait PermissionPrompt: Send + Sync {
    /// Resolves to `true` when the user grants `permission`.
    fn request(&self, permission: Permission) -> impl Future<Output = bool> + Send;
}

/// Grant/deny outcomes recorded by the explicit permission request step.
///
/// A permission that was never requested counts as not granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionStore {
    camera: Option<bool>,
    media_library: Option<bool>,
}

impl PermissionStore {
    pub fn is_granted(&self, permission: Permission) -> bool {
        self.slot(permission).unwrap_or(false)
    }

    pub fn record(&mut self, permission: Permission, granted: bool) {
        match permission {
            Permission::Camera => self.camera = Some(granted),
            Permission::MediaLibrary => self.media_library = Some(granted),
        }
    }

    pub fn all_granted(&self) -> bool {
        self.is_granted(Permission::Camera) && self.is_granted(Permission::MediaLibrary)
    }

    fn slot(&self, permission: Permission) -> Option<bool> {
        match permission {
            Permission::Camera => self.camera,
            Permission::MediaLibrary => self.media_library,
        }
    }
}

/// Prompt with fixed answers, for hosts where consent is given up front
/// (CLI flags, tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetPrompt {
    pub camera: bool,
    pub media_library: bool,
}

impl PresetPrompt {
    pub fn grant_all() -> Self {
        Self { camera: true, media_library: true }
    }

    pub fn deny_all() -> Self {
        Self { camera: false, media_library: false }
    }
}

impl PermissionPrompt for PresetPrompt {
    async fn request(&self, permission: Permission) -> bool {
        match permission {
            Permission::Camera => self.camera,
            Permission::MediaLibrary => self.media_library,
        }
    }
}
