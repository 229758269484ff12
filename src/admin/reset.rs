use super::{
    http_client::{read_body, AdminClient, RESET_DB_PATH},
    ProvisionError, Stage,
};
use reqwest::StatusCode;

/// Wipes the admin server's database.
///
/// This is a bodiless `PUT`; anything other than 200 OK means the server
/// is not in a state we can provision, so we stop here.
pub async fn reset_database(client: &AdminClient) -> Result<(), ProvisionError> {
    let url = client.endpoint(RESET_DB_PATH)?;
    tracing::debug!(%url, "Resetting database");

    let response = client
        .http()
        .put(url)
        .send()
        .await
        .map_err(|source| ProvisionError::Transport {
            stage: Stage::Reset,
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = read_body(Stage::Reset, response).await.unwrap_or_default();
        tracing::error!(
            %status,
            body = %String::from_utf8_lossy(&body),
            "Database reset was rejected"
        );
        return Err(ProvisionError::DatabaseReset { status });
    }

    tracing::info!("Database reset");
    Ok(())
}
