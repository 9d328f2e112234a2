//! The workflow controller: the single owner of workflow state.

mod controller;

pub use controller::WorkflowController;
