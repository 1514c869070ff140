//! Document analysis: upload validation, the simulated progress run, and the remote
//! analysis endpoint. The two paths are selected explicitly through [`AnalysisMode`].

mod backend;
mod desk;
mod simulator;
mod upload;
pub mod views;


pub use backend::{
    AnalysisBackend, DocumentUpload, HttpAnalysisBackend, RemoteAnalysis, RemoteAnalysisError,
};
pub use desk::{AnalysisDesk, AnalysisError, Pacing, SimulationEnd};
pub use simulator::{
    AnalysisPhase, AnalysisSession, FixedIncrements, IncrementSource, ProgressSimulator,
    ProgressSnapshot, RandomIncrements, RunTicket, TickOutcome, ANALYSIS_STEPS,
    COMPLETION_LABEL, MAX_INCREMENT, MIN_INCREMENT,
};
pub use upload::{
    validate_upload, UploadCandidate, UploadRejection, ACCEPTED_EXTENSIONS,
    ACCEPTED_MEDIA_TYPES, MAX_UPLOAD_BYTES,
};
pub use views::{AnalysisReport, DOWNLOAD_NOTICE, KEY_FINDINGS};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which analysis path handles an accepted upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Local timer-driven progress run that ends in a canned report.
    #[default]
    Simulated,
    /// One-shot multipart request to the configured analysis endpoint.
    Remote,
}

impl AnalysisMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown analysis mode '{0}' (expected 'simulated' or 'remote')")]
pub struct UnknownAnalysisMode(pub String);

impl FromStr for AnalysisMode {
    type Err = UnknownAnalysisMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "remote" => Ok(Self::Remote),
            _ => Err(UnknownAnalysisMode(value.to_string())),
        }
    }
}
