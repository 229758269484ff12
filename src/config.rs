//! Provisioning configuration.
//!
//! Defaults match the local development admin server and the fixture the
//! Android instrumentation tests read. Every field can be overridden from the
//! environment (or a `.env` file loaded by the binary).
//!
//! | Variable                   | Default                              |
//! |----------------------------|--------------------------------------|
//! | `PROVISION_SERVER_URL`     | `http://localhost:8888`              |
//! | `PROVISION_ADMIN_USERNAME` | `admin`                              |
//! | `PROVISION_ADMIN_PASSWORD` | `admin`                              |
//! | `PROVISION_OUTPUT_PATH`    | `src/androidTest/res/raw/keys.json`  |
//! | `PROVISION_TIMEOUT_SECS`   | `30`                                 |

use crate::admin::ProvisionError;
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8888";
pub const DEFAULT_OUTPUT_PATH: &str = "src/androidTest/res/raw/keys.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials for the admin session endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Metadata for the test application registered during enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMetadata {
    pub tag: String,
    pub client_name: String,
    pub client_description: String,
    pub owner_email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    /// Base URL of the admin server. Endpoint paths are joined onto it.
    pub server_url: String,
    pub admin: AdminCredentials,
    pub app: AppMetadata,
    /// Where the enrollment response is written, relative to the working directory.
    pub output_path: PathBuf,
    /// Applied to every request to the admin server.
    pub timeout: Duration,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            admin: AdminCredentials {
                username: "admin".to_string(),
                password: "admin".to_string(),
            },
            app: AppMetadata {
                tag: "mobile".to_string(),
                client_name: "test.magnet.com".to_string(),
                client_description: "Test Application".to_string(),
                owner_email: "no-reply@magnet.com".to_string(),
                password: "password".to_string(),
            },
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProvisionConfig {
    /// Builds a configuration from the process environment.
    pub fn from_env() -> Result<Self, ProvisionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from defaults, overriding any field whose
    /// variable `lookup` returns a value for.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProvisionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(server_url) = lookup("PROVISION_SERVER_URL") {
            config.server_url = server_url;
        }
        if let Some(username) = lookup("PROVISION_ADMIN_USERNAME") {
            config.admin.username = username;
        }
        if let Some(password) = lookup("PROVISION_ADMIN_PASSWORD") {
            config.admin.password = password;
        }
        if let Some(output_path) = lookup("PROVISION_OUTPUT_PATH") {
            config.output_path = PathBuf::from(output_path);
        }
        if let Some(timeout) = lookup("PROVISION_TIMEOUT_SECS") {
            let secs: u64 = timeout.trim().parse().map_err(|_| {
                ProvisionError::Config(format!(
                    "PROVISION_TIMEOUT_SECS must be a positive integer, got {timeout:?}"
                ))
            })?;
            if secs == 0 {
                return Err(ProvisionError::Config(
                    "PROVISION_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
