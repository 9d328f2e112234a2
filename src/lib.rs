// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod config;
pub mod media;
pub mod backend;
pub mod workflow;
pub mod commands;

// Public exports for external consumers
pub use config::{AppConfig, BackendUrl, Environment};
pub use crate::core::{
    Appraisal,
    ConnectivityStatus,
    ImageReference,
    ImageSource,
    Permission,
    SubmissionRequest,
    SubmissionResult,
    WorkflowSnapshot,
    WorkflowState,
};
pub use media::{Camera, CommandCamera, MediaAcquisition, PresetPrompt};
pub use backend::{ConnectivityProber, SubmissionClient};
pub use workflow::WorkflowController;
pub use utils::{
    AcquisitionFailure,
    SubmissionFailure,
    ValuerError,
    ValuerResult,
    WorkflowError,
    WorkflowFailure,
};

// This library file is the public API; the CLI entry point is in main.rs.
