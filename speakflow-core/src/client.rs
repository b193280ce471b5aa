//! HTTP client for the analysis backend
//!
//! Two endpoints are used:
//! - `POST /analyze/video`: multipart upload of a recording, answers with the
//!   raw analysis payload once speech and vision analysis finish
//! - `GET /feedback/summary`: stored, server-normalized summary of one
//!   presentation
//!
//! Both bodies are returned as [`RawRecord`]s; callers run
//! [`crate::normalize::normalize`] on them.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::RawRecord;

/// Content type sent for uploaded recordings.
pub const RECORDING_MIME: &str = "video/webm";

/// HTTP client for the analysis backend
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create a new client from configuration
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a recording for analysis.
    ///
    /// Blocks until the backend has finished analyzing, which can take
    /// minutes for long recordings.
    pub async fn analyze_video(
        &self,
        user_id: &str,
        project_id: &str,
        recording: &Path,
    ) -> Result<RawRecord> {
        let bytes = tokio::fs::read(recording).await?;
        let file_name = recording
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording.webm".to_string());

        tracing::info!(
            user_id,
            project_id,
            file = %recording.display(),
            size_bytes = bytes.len(),
            "Uploading recording for analysis"
        );

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(RECORDING_MIME)
            .map_err(|e| Error::Api(format!("invalid content type: {}", e)))?;

        // The backend route reads `user_id`; `userId`/`projectId` are what the
        // upload form has always sent.
        let form = Form::new()
            .text("userId", user_id.to_string())
            .text("user_id", user_id.to_string())
            .text("projectId", project_id.to_string())
            .part("file", part);

        let url = format!("{}/analyze/video", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Api(format!("HTTP request failed: {}", e)))?;

        read_json(response).await
    }

    /// Fetch the stored summary of one presentation.
    pub async fn fetch_summary(
        &self,
        user_id: &str,
        project_id: Option<&str>,
        presentation_id: &str,
    ) -> Result<RawRecord> {
        let url = self.summary_url(user_id, project_id, presentation_id);
        tracing::debug!(url = %url, "Fetching presentation summary");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Api(format!("HTTP request failed: {}", e)))?;

        read_json(response).await
    }

    fn summary_url(&self, user_id: &str, project_id: Option<&str>, presentation_id: &str) -> String {
        let mut url = format!(
            "{}/feedback/summary?user_id={}",
            self.base_url,
            urlencoding::encode(user_id)
        );
        if let Some(project_id) = project_id {
            url.push_str("&project_id=");
            url.push_str(&urlencoding::encode(project_id));
        }
        url.push_str("&presentation_id=");
        url.push_str(&urlencoding::encode(presentation_id));
        url
    }
}

async fn read_json(response: reqwest::Response) -> Result<RawRecord> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| Error::Api(format!("failed to parse response: {}", e)))
    } else {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown".to_string());
        Err(Error::Api(format!("API error ({}): {}", status, error_text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(base_url: &str) -> AnalysisClient {
        AnalysisClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    /// Multipart text field `name` carrying exactly `value`.
    fn form_field(name: &str, value: &str) -> Matcher {
        Matcher::Regex(format!(r#"name="{name}"\r\n\r\n{value}\r\n"#))
    }

    #[test]
    fn test_client_requires_valid_config() {
        let config = ApiConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(AnalysisClient::new(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_summary_url_is_encoded() {
        let client = client("https://api.example.com/");
        assert_eq!(client.base_url(), "https://api.example.com");
        assert_eq!(
            client.summary_url("user 1", Some("p&1"), "talk"),
            "https://api.example.com/feedback/summary?user_id=user%201&project_id=p%261&presentation_id=talk"
        );
        assert_eq!(
            client.summary_url("u", None, "t"),
            "https://api.example.com/feedback/summary?user_id=u&presentation_id=t"
        );
    }

    #[tokio::test]
    async fn test_fetch_summary() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/feedback/summary")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("user_id".into(), "u1".into()),
                Matcher::UrlEncoded("project_id".into(), "p1".into()),
                Matcher::UrlEncoded("presentation_id".into(), "talk".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"overallScore": 77, "scores": {"voice": 30}}).to_string())
            .create_async()
            .await;

        let raw = client(&server.url())
            .fetch_summary("u1", Some("p1"), "talk")
            .await
            .unwrap();
        assert_eq!(raw["overallScore"], json!(77));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_becomes_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/feedback/summary")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(json!({"detail": "missing"}).to_string())
            .create_async()
            .await;

        let err = client(&server.url())
            .fetch_summary("u1", None, "talk")
            .await
            .unwrap_err();
        match err {
            Error::Api(message) => {
                assert!(message.contains("404"), "{message}");
                assert!(message.contains("missing"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/feedback/summary")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = client(&server.url())
            .fetch_summary("u1", None, "talk")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(ref message) if message.contains("failed to parse")));
    }

    #[tokio::test]
    async fn test_analyze_video_uploads_multipart() {
        let dir = tempfile::TempDir::new().unwrap();
        let recording = dir.path().join("talk.webm");
        std::fs::write(&recording, b"not really a video").unwrap();

        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze/video")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".into()),
            )
            .match_body(Matcher::AllOf(vec![
                form_field("userId", "u1"),
                form_field("user_id", "u1"),
                form_field("projectId", "p1"),
                Matcher::Regex(r#"name="file"; filename="talk\.webm""#.into()),
                Matcher::Regex(r"(?i)content-type: video/webm".into()),
                Matcher::Regex("not really a video".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"stt_result": {"wpm": 140}}).to_string())
            .create_async()
            .await;

        let raw = client(&server.url())
            .analyze_video("u1", "p1", &recording)
            .await
            .unwrap();
        assert_eq!(raw["stt_result"]["wpm"], json!(140));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_recording_is_io_error() {
        let client = client("http://127.0.0.1:9");
        let err = client
            .analyze_video("u1", "p1", Path::new("/definitely/not/here.webm"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
