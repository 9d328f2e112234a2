//! Command handlers for the display layer.
//!
//! This module exposes what the CLI invokes:
//! - [`check_health`]: backend reachability and camera readiness
//! - [`analyze_garment`]: acquire an image and run the analysis workflow
//! - [`render_state`] / [`render_report`]: text output for the user

mod analyze;

pub use analyze::*;
