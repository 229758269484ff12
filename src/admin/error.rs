use reqwest::StatusCode;
use std::{fmt, io, path::PathBuf};

/// The request stage a failure happened within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reset,
    Authenticate,
    Enroll,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Reset => "database reset",
            Stage::Authenticate => "admin authentication",
            Stage::Enroll => "application enrollment",
        };
        f.write_str(name)
    }
}

/// Possible failures while provisioning the admin server.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("ERROR in configuration: {0}")]
    Config(String),

    #[error("ERROR reaching the admin server during {stage}: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("ERROR resetting database! (status {status})")]
    DatabaseReset { status: StatusCode },

    #[error("ERROR authenticating admin! (status {status})")]
    Authentication { status: StatusCode },

    #[error("ERROR authenticating admin! response did not contain an access_token")]
    MissingAccessToken,

    #[error("ERROR parsing {stage} response: {source}")]
    MalformedResponse {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("ERROR creating enrollment application! (status {status})")]
    Enrollment { status: StatusCode },

    #[error("ERROR writing keys to {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ProvisionError {
    /// The process exit code reported for this failure.
    /// Every failure class has its own code; success is 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProvisionError::Config(_) => 1,
            ProvisionError::Transport { .. } => 2,
            ProvisionError::DatabaseReset { .. } => 3,
            ProvisionError::Authentication { .. } => 4,
            ProvisionError::MissingAccessToken => 5,
            ProvisionError::MalformedResponse { .. } => 6,
            ProvisionError::Enrollment { .. } => 7,
            ProvisionError::Output { .. } => 8,
        }
    }
}
