use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::upload::UploadCandidate;

/// File contents plus the metadata the upload control reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn candidate(&self) -> UploadCandidate {
        UploadCandidate {
            file_name: self.file_name.clone(),
            media_type: self.media_type.clone(),
            size_bytes: self.bytes.len() as u64,
        }
    }
}

/// Response body of the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAnalysis {
    pub message: String,
    pub word_count: u64,
    pub summary: String,
}

impl RemoteAnalysis {
    /// Text shown to the visitor once the endpoint answers.
    pub fn notice(&self) -> String {
        format!(
            "✅ {}\n\n📄 Word Count: {}\n📝 Summary:\n{}",
            self.message, self.word_count, self.summary
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteAnalysisError {
    /// Any transport or decoding failure. The detail is logged, never shown.
    #[error("Unable to connect to backend. Make sure the server is running!")]
    Unreachable { detail: String },
}

impl RemoteAnalysisError {
    pub fn detail(&self) -> &str {
        match self {
            Self::Unreachable { detail } => detail,
        }
    }
}

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, upload: &DocumentUpload) -> Result<RemoteAnalysis, RemoteAnalysisError>;
}

/// Posts the file as multipart field `file`. No retry and no timeout.
#[derive(Debug, Clone)]
pub struct HttpAnalysisBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn unreachable(&self, detail: String) -> RemoteAnalysisError {
        error!(endpoint = %self.endpoint, %detail, "analysis backend request failed");
        RemoteAnalysisError::Unreachable { detail }
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn analyze(&self, upload: &DocumentUpload) -> Result<RemoteAnalysis, RemoteAnalysisError> {
        let part = multipart::Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        let part = match upload
            .media_type
            .as_deref()
            .filter(|media_type| media_type.parse::<mime::Mime>().is_ok())
        {
            Some(media_type) => part
                .mime_str(media_type)
                .map_err(|err| self.unreachable(err.to_string()))?,
            None => part,
        };
        let form = multipart::Form::new().part("file", part);

        debug!(endpoint = %self.endpoint, file = %upload.file_name, "posting document for analysis");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| self.unreachable(err.to_string()))?;

        let status = response.status();
        response
            .json::<RemoteAnalysis>()
            .await
            .map_err(|err| self.unreachable(format!("{status}: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_uses_camel_case_fields() {
        let analysis: RemoteAnalysis = serde_json::from_str(
            r#"{"message":"Analysis done","wordCount":812,"summary":"Lease with two renewal options."}"#,
        )
        .expect("payload parses");

        assert_eq!(analysis.word_count, 812);
        assert_eq!(
            analysis.notice(),
            "✅ Analysis done\n\n📄 Word Count: 812\n📝 Summary:\nLease with two renewal options."
        );
    }

    #[test]
    fn unreachable_error_hides_detail() {
        let err = RemoteAnalysisError::Unreachable {
            detail: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to connect to backend. Make sure the server is running!"
        );
        assert_eq!(err.detail(), "connection refused");
    }

    #[tokio::test]
    async fn unreachable_endpoint_maps_to_connect_error() {
        let backend = HttpAnalysisBackend::new("http://127.0.0.1:9/analyze");
        let upload = DocumentUpload {
            file_name: "lease.pdf".to_string(),
            media_type: Some("application/pdf".to_string()),
            bytes: b"%PDF-1.4".to_vec(),
        };

        let err = backend.analyze(&upload).await.expect_err("port 9 refuses");
        assert!(matches!(err, RemoteAnalysisError::Unreachable { .. }));
    }
}
