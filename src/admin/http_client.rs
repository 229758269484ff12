use super::{ProvisionError, Stage};
use reqwest::Response;
use std::time::Duration;
use url::Url;

/// Path to the endpoint wiping all stored objects.
pub const RESET_DB_PATH: &str = "admin/com.magnet.server/db/objects";

/// Path to the endpoint issuing admin sessions.
pub const SESSION_PATH: &str = "admin/com.magnet.server/users/session";

/// Path to the endpoint registering client applications.
pub const ENROLLMENT_PATH: &str = "admin/com.magnet.server/apps/enrollment";

/// A thin wrapper around a `reqwest::Client` bound to one admin server.
/// The same connection pool is reused across every request of a run.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: reqwest::Client,
    base_url: Url,
}

impl AdminClient {
    /// Creates a client for the admin server at `server_url`.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, ProvisionError> {
        let mut base_url = Url::parse(server_url).map_err(|error| {
            ProvisionError::Config(format!("invalid server URL {server_url:?}: {error}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProvisionError::Config(format!(
                "server URL {server_url:?} cannot be used as a base"
            )));
        }

        // Without a trailing slash, `join` would replace the last path segment
        // (e.g. a reverse-proxy prefix) instead of appending to it.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        // Every stage gates on exactly 200, so a 3xx must come back to us as-is
        // rather than be chased (and downgraded to a bodiless GET).
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|error| {
                ProvisionError::Config(format!("unable to build HTTP client: {error}"))
            })?;

        Ok(Self { client, base_url })
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path against the server's base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ProvisionError> {
        self.base_url.join(path).map_err(|error| {
            ProvisionError::Config(format!("invalid endpoint path {path:?}: {error}"))
        })
    }
}

/// Reads the full body of a response, attributing failures to `stage`.
pub async fn read_body(stage: Stage, response: Response) -> Result<Vec<u8>, ProvisionError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ProvisionError::Transport { stage, source })?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_the_server_root() {
        let client = AdminClient::new("http://localhost:8888", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(RESET_DB_PATH).unwrap().as_str(),
            "http://localhost:8888/admin/com.magnet.server/db/objects"
        );
        assert_eq!(
            client.endpoint(ENROLLMENT_PATH).unwrap().as_str(),
            "http://localhost:8888/admin/com.magnet.server/apps/enrollment"
        );
    }

    #[test]
    fn endpoints_keep_a_path_prefix() {
        let client = AdminClient::new("http://example.test/mms", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(SESSION_PATH).unwrap().as_str(),
            "http://example.test/mms/admin/com.magnet.server/users/session"
        );
    }

    #[test]
    fn unparsable_server_url_is_a_config_error() {
        for url in ["localhost:8888 oops", "not a url", "mailto:admin@example.test"] {
            match AdminClient::new(url, Duration::from_secs(1)) {
                Err(ProvisionError::Config(_)) => {}
                other => panic!("expected config error for {url:?}, got {other:?}"),
            }
        }
    }
}
