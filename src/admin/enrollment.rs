use super::{
    http_client::{read_body, AdminClient, ENROLLMENT_PATH},
    session::Session,
    ProvisionError, Stage,
};
use crate::config::AppMetadata;
use reqwest::{header, StatusCode};
use serde::Serialize;

/// The JSON body the enrollment endpoint expects.
#[derive(Serialize, Debug)]
struct EnrollmentRequest<'a> {
    tag: &'a str,
    client_name: &'a str,
    client_description: &'a str,
    owner_email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a AppMetadata> for EnrollmentRequest<'a> {
    fn from(app: &'a AppMetadata) -> Self {
        Self {
            tag: &app.tag,
            client_name: &app.client_name,
            client_description: &app.client_description,
            owner_email: &app.owner_email,
            password: &app.password,
        }
    }
}

/// The server's record of a newly registered application.
///
/// We keep the exact bytes the server sent: they are written to disk as-is,
/// never re-serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentResult {
    body: Vec<u8>,
    client_id: Option<String>,
}

impl EnrollmentResult {
    /// Wraps a response body, which must at least be valid JSON.
    pub fn from_body(body: Vec<u8>) -> Result<Self, ProvisionError> {
        let parsed: serde_json::Value =
            serde_json::from_slice(&body).map_err(|source| ProvisionError::MalformedResponse {
                stage: Stage::Enroll,
                source,
            })?;

        // Only used for the operator's benefit; the consumer of the file reads it itself.
        let client_id = parsed
            .get("client_id")
            .and_then(|value| value.as_str())
            .map(str::to_string);

        Ok(Self { body, client_id })
    }

    /// The response body, byte for byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// The registered application's client id, if the server reported one.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }
}

/// Registers the test application on behalf of an authenticated admin.
pub async fn create_enrollment(
    client: &AdminClient,
    session: &Session,
    app: &AppMetadata,
) -> Result<EnrollmentResult, ProvisionError> {
    let url = client.endpoint(ENROLLMENT_PATH)?;
    tracing::debug!(%url, client_name = %app.client_name, "Creating enrollment application");

    // `json` sets `Content-Type: application/json` for us.
    let response = client
        .http()
        .post(url)
        .header(header::AUTHORIZATION, session.bearer())
        .json(&EnrollmentRequest::from(app))
        .send()
        .await
        .map_err(|source| ProvisionError::Transport {
            stage: Stage::Enroll,
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = read_body(Stage::Enroll, response).await.unwrap_or_default();
        tracing::error!(
            %status,
            body = %String::from_utf8_lossy(&body),
            "Enrollment was rejected"
        );
        return Err(ProvisionError::Enrollment { status });
    }

    let body = read_body(Stage::Enroll, response).await?;
    let result = EnrollmentResult::from_body(body)?;
    tracing::info!(
        client_name = %app.client_name,
        client_id = result.client_id().unwrap_or("<unknown>"),
        "Created enrollment application"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvisionConfig;

    #[test]
    fn request_matches_the_expected_wire_format() {
        let config = ProvisionConfig::default();
        let json = serde_json::to_string(&EnrollmentRequest::from(&config.app)).unwrap();
        assert_eq!(
            json,
            r#"{"tag":"mobile","client_name":"test.magnet.com","client_description":"Test Application","owner_email":"no-reply@magnet.com","password":"password"}"#
        );
    }

    #[test]
    fn result_keeps_the_exact_bytes() {
        // Whitespace and key order would not survive a re-serialization.
        let body = b"{ \"client_secret\" : \"xyz\",\n  \"client_id\": \"abc\" }".to_vec();
        let result = EnrollmentResult::from_body(body.clone()).unwrap();
        assert_eq!(result.as_bytes(), body.as_slice());
        assert_eq!(result.client_id(), Some("abc"));
    }

    #[test]
    fn result_without_client_id_is_still_accepted() {
        let result = EnrollmentResult::from_body(b"[1, 2]".to_vec()).unwrap();
        assert_eq!(result.client_id(), None);
    }

    #[test]
    fn non_json_result_is_malformed() {
        match EnrollmentResult::from_body(b"created".to_vec()) {
            Err(ProvisionError::MalformedResponse {
                stage: Stage::Enroll,
                ..
            }) => {}
            other => panic!("expected malformed response, got {other:?}"),
        }
    }
}
