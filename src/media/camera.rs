//! Camera capture through an external capture program.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};
use crate::utils::AcquisitionFailure;

const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(20);

/// Which lens to capture from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    #[default]
    Back,
    Front,
}

impl CameraFacing {
    pub fn toggled(self) -> Self {
        match self {
            Self::Back => Self::Front,
            Self::Front => Self::Back,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Front => "front",
        }
    }
}

/// Per-capture options handed to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaptureSettings {
    pub facing: CameraFacing,
    /// JPEG quality in `0.0..=1.0`
    pub quality: f32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Back,
            quality: 0.8,
        }
    }
}

/// A device that can write one frame to a file.
pub trait Camera: Send + Sync {
    /// Whether the device is initialised and can take a picture.
    fn is_ready(&self) -> bool;

    /// Writes a single frame to `output`.
    fn capture(
        &self,
        settings: CaptureSettings,
        output: &Path,
    ) -> impl Future<Output = Result<(), AcquisitionFailure>> + Send;
}

/// Camera backed by a capture program such as `fswebcam`.
///
/// Arguments may contain the placeholders `{output}`, `{quality}` (0-100) and
/// `{facing}` (`back`/`front`).
#[derive(Debug, Clone)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCamera {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_CAPTURE_TIMEOUT,
        }
    }

    /// `fswebcam --no-banner --jpeg {quality} {output}`
    pub fn fswebcam(program: impl Into<String>) -> Self {
        Self::new(
            program,
            ["--no-banner", "--jpeg", "{quality}", "{output}"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn render_args(&self, settings: CaptureSettings, output: &Path) -> Vec<String> {
        let quality = (settings.quality.clamp(0.0, 1.0) * 100.0).round() as u32;
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{output}", &output)
                    .replace("{quality}", &quality.to_string())
                    .replace("{facing}", settings.facing.as_str())
            })
            .collect()
    }

    fn resolve_program(&self) -> Option<PathBuf> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file().then(|| program.to_path_buf());
        }
        let paths = std::env::var_os("PATH")?;
        std::env::split_paths(&paths)
            .map(|dir| dir.join(&self.program))
            .find(|candidate| candidate.is_file())
    }
}

impl Camera for CommandCamera {
    fn is_ready(&self) -> bool {
        self.resolve_program().is_some()
    }

    async fn capture(&self, settings: CaptureSettings, output: &Path) -> Result<(), AcquisitionFailure> {
        let args = self.render_args(settings, output);
        debug!("Running camera command: {} {:?}", self.program, args);

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let out = match timeout(self.timeout, child).await {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => return Err(AcquisitionFailure::capture(format!("{}: {}", self.program, e))),
            Err(_) => {
                warn!("Camera command exceeded {:?}", self.timeout);
                return Err(AcquisitionFailure::capture("camera did not produce a frame in time"));
            }
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(AcquisitionFailure::capture(format!(
                "{} exited with {}: {}",
                self.program,
                out.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
