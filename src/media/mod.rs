//! Media acquisition: camera capture and library picking.
//!
//! Both paths require a permission granted by an earlier, explicit
//! [`MediaAcquisition::request_permissions`] call; neither prompts on its own.

mod permissions;
mod camera;
mod library;

pub use permissions::{PermissionPrompt, PermissionStore, PresetPrompt};
pub use camera::{Camera, CameraFacing, CaptureSettings, CommandCamera};

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};
use crate::core::{ImageReference, ImageSource, Permission};
use crate::utils::{AcquisitionFailure, ensure_dir, remove_owned_file, timestamped_path, validate_image_path};

/// Produces [`ImageReference`]s from a camera or the media library.
pub struct MediaAcquisition<C> {
    camera: C,
    capture_dir: PathBuf,
    permissions: RwLock<PermissionStore>,
    settings: RwLock<CaptureSettings>,
}

impl<C: Camera> MediaAcquisition<C> {
    pub fn new(camera: C, capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            camera,
            capture_dir: capture_dir.into(),
            permissions: RwLock::new(PermissionStore::default()),
            settings: RwLock::new(CaptureSettings::default()),
        }
    }

    /// Asks for camera and media library access and records the answers.
    pub async fn request_permissions<P: PermissionPrompt>(&self, prompt: &P) -> PermissionStore {
        let camera = prompt.request(Permission::Camera).await;
        let media_library = prompt.request(Permission::MediaLibrary).await;

        let mut store = self.permissions.write().unwrap_or_else(PoisonError::into_inner);
        store.record(Permission::Camera, camera);
        store.record(Permission::MediaLibrary, media_library);

        if store.all_granted() {
            info!("Camera and media library permissions granted");
        } else {
            warn!(
                "Camera and media library permissions are required (camera: {}, media library: {})",
                camera, media_library
            );
        }
        *store
    }

    pub fn permissions(&self) -> PermissionStore {
        *self.permissions.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capture_settings(&self) -> CaptureSettings {
        *self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switches between the back and front lens; returns the new facing.
    pub fn toggle_facing(&self) -> CameraFacing {
        let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        settings.facing = settings.facing.toggled();
        settings.facing
    }

    /// Sets the capture quality, clamped to `0.0..=1.0`; NaN and infinities
    /// restore the default.
    pub fn set_quality(&self, quality: f32) {
        let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        settings.quality = if quality.is_finite() {
            quality.clamp(0.0, 1.0)
        } else {
            warn!("Ignoring non-finite capture quality {}", quality);
            CaptureSettings::default().quality
        };
    }

    pub fn is_camera_ready(&self) -> bool {
        self.camera.is_ready()
    }

    /// Takes a picture into the capture directory.
    pub async fn capture_from_camera(&self) -> Result<ImageReference, AcquisitionFailure> {
        self.require(Permission::Camera)?;
        if !self.camera.is_ready() {
            return Err(AcquisitionFailure::capture("camera not ready"));
        }
        self.prepare_capture_dir().await?;

        let output = timestamped_path(&self.capture_dir, "capture", "jpg");
        let settings = self.capture_settings();
        if let Err(failure) = self.camera.capture(settings, &output).await {
            self.remove_capture(&output).await;
            return Err(failure);
        }

        if !validate_image_path(&output).await {
            self.remove_capture(&output).await;
            return Err(AcquisitionFailure::capture("no frame was produced"));
        }
        debug!("Captured {} ({} camera)", output.display(), settings.facing.as_str());
        Ok(ImageReference::new(output, ImageSource::Camera))
    }

    /// Imports an image chosen from the media library.
    pub async fn pick_from_library(
        &self,
        selection: Option<&Path>,
    ) -> Result<ImageReference, AcquisitionFailure> {
        self.require(Permission::MediaLibrary)?;
        self.prepare_capture_dir().await?;
        library::import_from_library(selection, &self.capture_dir).await
    }

    /// Deletes the file behind a reference this acquisition produced.
    ///
    /// Images outside the capture directory are never touched.
    pub async fn discard(&self, image: &ImageReference) {
        self.remove_capture(image.path()).await;
    }

    async fn remove_capture(&self, path: &Path) {
        match remove_owned_file(&self.capture_dir, path).await {
            Ok(true) => debug!("Removed {}", path.display()),
            Ok(false) => {}
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }

    fn require(&self, permission: Permission) -> Result<(), AcquisitionFailure> {
        if self.permissions().is_granted(permission) {
            Ok(())
        } else {
            Err(AcquisitionFailure::PermissionDenied(permission))
        }
    }

    async fn prepare_capture_dir(&self) -> Result<(), AcquisitionFailure> {
        ensure_dir(&self.capture_dir)
            .await
            .map_err(|e| AcquisitionFailure::capture(format!("capture directory unavailable: {e}")))
    }
}
