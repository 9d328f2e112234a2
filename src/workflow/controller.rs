//! State machine driving capture, validation, connectivity, and submission.
//!
//! One controller per session owns the active [`ImageReference`] and the
//! [`WorkflowState`]. Operations run one at a time: a capture, pick, analyze
//! or reset that arrives while another is in flight is rejected with
//! [`WorkflowError::Busy`] and changes nothing.

use std::path::Path;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use crate::backend::{ConnectivityProber, SubmissionClient, http_client};
use crate::config::AppConfig;
use crate::core::{ConnectivityStatus, ImageReference, WorkflowSnapshot, WorkflowState};
use crate::media::{Camera, MediaAcquisition, PermissionPrompt, PermissionStore};
use crate::utils::{AcquisitionFailure, ValuerResult, WorkflowError, WorkflowFailure, validate_image};

pub struct WorkflowController<C> {
    media: MediaAcquisition<C>,
    prober: ConnectivityProber,
    client: SubmissionClient,
    snapshot: watch::Sender<WorkflowSnapshot>,
    in_flight: Mutex<()>,
}

impl<C: Camera> WorkflowController<C> {
    pub fn new(media: MediaAcquisition<C>, prober: ConnectivityProber, client: SubmissionClient) -> Self {
        let (snapshot, _) = watch::channel(WorkflowSnapshot::default());
        Self {
            media,
            prober,
            client,
            snapshot,
            in_flight: Mutex::new(()),
        }
    }

    /// Wires a controller against the configured backend.
    pub fn from_config(config: &AppConfig, camera: C) -> ValuerResult<Self> {
        let http = http_client()?;
        let base = config.backend_url().clone();
        info!("Using {:?} backend at {}", config.environment, base);

        Ok(Self::new(
            MediaAcquisition::new(camera, config.capture_dir.clone()),
            ConnectivityProber::new(http.clone(), base.clone(), config.probe_timeout),
            SubmissionClient::new(http, base, config.submit_timeout, config.platform.clone()),
        ))
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> WorkflowState {
        self.snapshot.borrow().state.clone()
    }

    pub fn image(&self) -> Option<ImageReference> {
        self.snapshot.borrow().image.clone()
    }

    pub fn media(&self) -> &MediaAcquisition<C> {
        &self.media
    }

    /// Explicit permission step; acquisition never prompts by itself.
    pub async fn request_permissions<P: PermissionPrompt>(&self, prompt: &P) -> PermissionStore {
        self.media.request_permissions(prompt).await
    }

    /// Probes the backend and records the result without touching the state.
    pub async fn refresh_connectivity(&self) -> ConnectivityStatus {
        let status = self.prober.check().await;
        self.snapshot.send_modify(|snap| snap.connectivity = Some(status));
        info!(
            "Backend {}",
            if status.reachable { "connected" } else { "offline" }
        );
        status
    }

    pub async fn capture_from_camera(&self) -> Result<WorkflowState, WorkflowError> {
        let _guard = self.in_flight.try_lock().map_err(|_| WorkflowError::Busy)?;
        self.transition(WorkflowState::Capturing);
        let acquired = self.media.capture_from_camera().await;
        Ok(self.finish_acquisition(acquired).await)
    }

    /// `None` models a dismissed picker.
    pub async fn pick_from_library(&self, selection: Option<&Path>) -> Result<WorkflowState, WorkflowError> {
        let _guard = self.in_flight.try_lock().map_err(|_| WorkflowError::Busy)?;
        self.transition(WorkflowState::Capturing);
        let acquired = self.media.pick_from_library(selection).await;
        Ok(self.finish_acquisition(acquired).await)
    }

    /// Validates, checks connectivity, and submits the active image.
    ///
    /// Each precondition short-circuits to `Failed` before any POST is made.
    pub async fn analyze(&self) -> Result<WorkflowState, WorkflowError> {
        let _guard = self.in_flight.try_lock().map_err(|_| WorkflowError::Busy)?;

        let Some(image) = self.image() else {
            return Ok(self.fail(WorkflowFailure::NoImage));
        };

        self.transition(WorkflowState::Validating);
        if !validate_image(&image).await {
            return Ok(self.fail(WorkflowFailure::InvalidImage));
        }

        self.transition(WorkflowState::CheckingConnectivity);
        let known_good = self.snapshot.borrow().is_backend_connected();
        let reachable = if known_good {
            debug!("Backend already known reachable; skipping probe");
            true
        } else {
            self.refresh_connectivity().await.reachable
        };
        if !reachable {
            return Ok(self.fail(WorkflowFailure::Unreachable));
        }

        self.transition(WorkflowState::Submitting);
        let state = match self.client.submit(&image).await {
            Ok(appraisal) => WorkflowState::Succeeded(appraisal),
            Err(failure) => {
                if failure.is_connectivity_loss() {
                    // next analyze re-probes
                    self.snapshot.send_modify(|snap| snap.connectivity = None);
                }
                WorkflowState::Failed(failure.into())
            }
        };
        self.transition(state.clone());
        Ok(state)
    }

    /// Returns to `Idle` and deletes the active image.
    pub async fn reset(&self) -> Result<(), WorkflowError> {
        let _guard = self.in_flight.try_lock().map_err(|_| WorkflowError::Busy)?;
        let mut discarded = None;
        self.snapshot.send_modify(|snap| {
            discarded = snap.image.take();
            snap.state = WorkflowState::Idle;
        });
        if let Some(image) = discarded {
            self.media.discard(&image).await;
        }
        debug!("Workflow reset");
        Ok(())
    }

    async fn finish_acquisition(&self, acquired: Result<ImageReference, AcquisitionFailure>) -> WorkflowState {
        match acquired {
            Ok(image) => {
                info!("Image ready: {}", image.path().display());
                let mut replaced = None;
                self.snapshot.send_modify(|snap| {
                    replaced = snap.image.replace(image);
                    snap.state = WorkflowState::ImageReady;
                });
                if let Some(previous) = replaced {
                    self.media.discard(&previous).await;
                }
                WorkflowState::ImageReady
            }
            Err(failure) => self.fail(failure.into()),
        }
    }

    fn fail(&self, failure: WorkflowFailure) -> WorkflowState {
        warn!("Workflow failed: {}", failure);
        let state = WorkflowState::Failed(failure);
        self.transition(state.clone());
        state
    }

    fn transition(&self, next: WorkflowState) {
        self.snapshot.send_modify(|snap| {
            info!("Workflow state: {} -> {}", snap.state.label(), next.label());
            snap.state = next;
        });
    }
}
