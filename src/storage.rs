use crate::admin::{EnrollmentResult, ProvisionError};
use std::{io, path::Path};
use tokio::{fs::File, io::AsyncWriteExt};

/// Writes the enrollment response to `path`, replacing any previous contents.
///
/// Parent directories are not created: if they are missing, we are most
/// likely running from the wrong directory and should say so.
pub async fn write_keys(path: &Path, result: &EnrollmentResult) -> Result<(), ProvisionError> {
    let output_error = |source: io::Error| ProvisionError::Output {
        path: path.to_path_buf(),
        source,
    };

    // The handle is dropped at the end of this scope on every path.
    let mut file = File::create(path).await.map_err(output_error)?;
    file.write_all(result.as_bytes())
        .await
        .map_err(output_error)?;
    file.flush().await.map_err(output_error)?;

    tracing::info!(path = %path.display(), bytes = result.as_bytes().len(), "Wrote keys");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn overwrites_existing_contents() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("keys.json");
        std::fs::write(&path, "a much longer previous file that must not survive").unwrap();

        let result = EnrollmentResult::from_body(br#"{"client_id":"x"}"#.to_vec()).unwrap();
        write_keys(&path, &result).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), br#"{"client_id":"x"}"#);
    }

    #[tokio::test]
    async fn missing_directory_is_an_output_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("src/androidTest/res/raw/keys.json");

        let result = EnrollmentResult::from_body(b"{}".to_vec()).unwrap();
        match write_keys(&path, &result).await {
            Err(ProvisionError::Output { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected output error, got {other:?}"),
        }
        assert!(!path.exists());
    }
}
