//! The provisioning sequence itself.
//!
//! Each stage must succeed before the next one is attempted:
//! reset the database, authenticate as admin, enroll the test application,
//! then write its keys to disk. The first failure ends the run; nothing is
//! retried or rolled back.

use crate::{
    admin::{self, AdminClient, EnrollmentResult, ProvisionError},
    config::ProvisionConfig,
    storage,
};

/// Runs the full provisioning sequence against the configured admin server.
pub async fn run(config: &ProvisionConfig) -> Result<EnrollmentResult, ProvisionError> {
    let client = AdminClient::new(&config.server_url, config.timeout)?;
    tracing::info!(server = %client.base_url(), "Provisioning admin server");

    admin::reset_database(&client).await?;
    let session = admin::authenticate(&client, &config.admin).await?;
    let result = admin::create_enrollment(&client, &session, &config.app).await?;

    println!("writing data to keys.json ...\n");
    println!("{}", String::from_utf8_lossy(result.as_bytes()));
    storage::write_keys(&config.output_path, &result).await?;

    Ok(result)
}
