pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{
    AcquisitionFailure,
    SubmissionFailure,
    ValuerError,
    ValuerResult,
    WorkflowError,
    WorkflowFailure,
};
pub use validation::{validate_image, validate_image_path};
pub use formats::{ImageFormat, format_from_extension};
pub use fs::{ensure_dir, remove_owned_file, timestamped_path};
