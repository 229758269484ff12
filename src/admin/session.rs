use super::{
    http_client::{read_body, AdminClient, SESSION_PATH},
    ProvisionError, Stage,
};
use crate::config::AdminCredentials;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;

/// The fields we need from the session endpoint's response.
/// Anything else the server sends alongside is ignored.
#[derive(Deserialize, Debug)]
struct SessionResponse {
    access_token: Option<String>,
}

/// An authenticated admin session.
///
/// Only [`authenticate`] creates one, so holding a `Session` means the
/// server accepted our credentials and handed back a usable token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
}

impl Session {
    /// The bearer token for subsequent admin requests.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    fn from_response_body(body: &[u8]) -> Result<Self, ProvisionError> {
        let parsed: SessionResponse =
            serde_json::from_slice(body).map_err(|source| ProvisionError::MalformedResponse {
                stage: Stage::Authenticate,
                source,
            })?;

        match parsed.access_token {
            Some(access_token) if !access_token.is_empty() => Ok(Self { access_token }),
            _ => Err(ProvisionError::MissingAccessToken),
        }
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Authenticates as the administrator, returning a session on success.
///
/// Credentials are sent form-encoded (`username=...&password=...`); `form`
/// sets the `application/x-www-form-urlencoded` content type for us.
pub async fn authenticate(
    client: &AdminClient,
    credentials: &AdminCredentials,
) -> Result<Session, ProvisionError> {
    let url = client.endpoint(SESSION_PATH)?;
    tracing::debug!(%url, username = %credentials.username, "Authenticating admin");

    let response = client
        .http()
        .post(url)
        .form(&[
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ])
        .send()
        .await
        .map_err(|source| ProvisionError::Transport {
            stage: Stage::Authenticate,
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = read_body(Stage::Authenticate, response).await.unwrap_or_default();
        tracing::error!(
            %status,
            body = %String::from_utf8_lossy(&body),
            "Admin authentication was rejected"
        );
        return Err(ProvisionError::Authentication { status });
    }

    let body = read_body(Stage::Authenticate, response).await?;
    let session = Session::from_response_body(&body)?;
    tracing::info!(username = %credentials.username, "Authenticated admin");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_taken_from_the_body() {
        let session =
            Session::from_response_body(br#"{"access_token":"abc123","token_type":"bearer"}"#)
                .unwrap();
        assert_eq!(session.access_token(), "abc123");
        assert_eq!(session.bearer(), "Bearer abc123");
    }

    #[test]
    fn absent_null_or_empty_token_is_missing() {
        for body in [
            r#"{"token_type":"bearer"}"#,
            r#"{"access_token":null}"#,
            r#"{"access_token":""}"#,
        ] {
            match Session::from_response_body(body.as_bytes()) {
                Err(ProvisionError::MissingAccessToken) => {}
                other => panic!("expected missing token for {body}, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_json_body_is_malformed() {
        for body in ["<html>ok</html>", r#"{"access_token":42}"#] {
            match Session::from_response_body(body.as_bytes()) {
                Err(ProvisionError::MalformedResponse {
                    stage: Stage::Authenticate,
                    ..
                }) => {}
                other => panic!("expected malformed response for {body}, got {other:?}"),
            }
        }
    }

    #[test]
    fn debug_output_hides_the_token() {
        let session = Session::from_response_body(br#"{"access_token":"s3cret"}"#).unwrap();
        assert!(!format!("{session:?}").contains("s3cret"));
    }
}
