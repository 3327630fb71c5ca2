//! Document upload and collection clearing.
//!
//! Uploads use the same overload failover as chat requests. Clearing the
//! collection is a single POST with no fallback.

use laws_types::config::FailoverEndpoints;
use laws_types::error::DispatchError;
use laws_types::http::{FilePart, RequestPayload};

use crate::chat::status;
use crate::dispatch::{FailoverDispatcher, HttpTransport};
use crate::effect::UiEffect;

/// Body sent to the delete endpoint to confirm clearing.
const CLEAR_CONFIRMATION: &str = "Yes";

/// A file chosen for upload.
#[derive(Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug)]
pub enum DocumentOutcome {
    Done,
    /// Input was invalid; nothing was sent.
    Rejected,
    Failed(DispatchError),
}

#[derive(Debug)]
pub struct DocumentReport {
    pub outcome: DocumentOutcome,
    pub status: String,
    pub effects: Vec<UiEffect>,
}

impl DocumentReport {
    fn new(outcome: DocumentOutcome, status: &str) -> Self {
        Self {
            outcome,
            status: status.to_string(),
            effects: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, DocumentOutcome::Done)
    }
}

/// Normalize an upload category: trimmed and lowercased.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Sends document management requests.
pub struct DocumentService<'d, T: HttpTransport> {
    dispatcher: &'d FailoverDispatcher<T>,
}

impl<'d, T: HttpTransport> DocumentService<'d, T> {
    pub fn new(dispatcher: &'d FailoverDispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Upload `file` under `category` as multipart `category` + `file`.
    pub async fn upload(
        &self,
        endpoints: &FailoverEndpoints,
        category: &str,
        file: Option<UploadFile>,
    ) -> DocumentReport {
        let Some(file) = file.filter(|f| !f.file_name.trim().is_empty()) else {
            return DocumentReport::new(DocumentOutcome::Rejected, status::MISSING_FILE);
        };
        let category = normalize_category(category);
        if category.is_empty() {
            return DocumentReport::new(DocumentOutcome::Rejected, status::MISSING_CATEGORY);
        }

        tracing::info!(
            file_name = %file.file_name,
            bytes = file.bytes.len(),
            category = %category,
            "Uploading document"
        );
        let payload = RequestPayload::Multipart {
            fields: vec![("category".to_string(), category)],
            file: FilePart {
                field: "file".to_string(),
                file_name: file.file_name,
                content_type: file.content_type,
                bytes: file.bytes,
            },
        };

        match self.dispatcher.send_to(endpoints, &payload).await {
            Ok(_) => DocumentReport::new(DocumentOutcome::Done, status::UPLOAD_OK),
            Err(error) => {
                tracing::warn!(error = %error, "Upload failed");
                let mut report = DocumentReport::new(DocumentOutcome::Failed(error), status::UPLOAD_FAILED);
                if let DocumentOutcome::Failed(DispatchError::BadRequest { message }) = &report.outcome
                {
                    report.effects.push(UiEffect::Alert(message.clone()));
                }
                report
            }
        }
    }

    /// Ask the backend to drop every uploaded document.
    pub async fn clear_collection(&self, delete_url: &str) -> DocumentReport {
        let payload = RequestPayload::Text(CLEAR_CONFIRMATION.to_string());
        match self.dispatcher.send_once(delete_url, &payload).await {
            Ok(_) => {
                tracing::info!(url = %delete_url, "Document collection cleared");
                DocumentReport::new(DocumentOutcome::Done, status::DELETE_OK)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Clearing document collection failed");
                DocumentReport::new(DocumentOutcome::Failed(error), status::DELETE_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    const UPLOAD: &str = "http://primary/upload";
    const UPLOAD_2: &str = "http://secondary/upload";
    const DELETE: &str = "http://primary/delete";

    fn endpoints() -> FailoverEndpoints {
        FailoverEndpoints::new(UPLOAD, Some(UPLOAD_2.to_string()))
    }

    fn pdf() -> Option<UploadFile> {
        Some(UploadFile {
            file_name: "lease.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: b"%PDF-1.4".to_vec(),
        })
    }

    #[tokio::test]
    async fn test_upload_sends_lowercased_category_and_file() {
        let dispatcher = FailoverDispatcher::new(MockTransport::new().respond(UPLOAD, 200, "{}"));
        let report = DocumentService::new(&dispatcher)
            .upload(&endpoints(), "  Tenancy ", pdf())
            .await;

        assert!(report.succeeded());
        assert_eq!(report.status, "Upload successful.");
        let calls = dispatcher.transport().calls();
        let RequestPayload::Multipart { fields, file } = &calls[0].1 else {
            panic!("upload must be multipart");
        };
        assert_eq!(fields, &vec![("category".to_string(), "tenancy".to_string())]);
        assert_eq!(file.field, "file");
        assert_eq!(file.file_name, "lease.pdf");
        assert_eq!(file.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_upload_validation_sends_nothing() {
        let dispatcher = FailoverDispatcher::new(MockTransport::new());
        let service = DocumentService::new(&dispatcher);

        let report = service.upload(&endpoints(), "tenancy", None).await;
        assert!(matches!(report.outcome, DocumentOutcome::Rejected));
        assert_eq!(report.status, "Please choose a file first.");

        let report = service.upload(&endpoints(), "   ", pdf()).await;
        assert_eq!(report.status, "Please enter a category.");

        assert!(dispatcher.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_bad_request_alerts_server_message() {
        let dispatcher = FailoverDispatcher::new(
            MockTransport::new().respond(UPLOAD, 400, r#""Unsupported file type""#),
        );
        let report = DocumentService::new(&dispatcher)
            .upload(&endpoints(), "tenancy", pdf())
            .await;

        assert_eq!(report.status, "Upload failed.");
        assert_eq!(
            report.effects,
            vec![UiEffect::Alert("Unsupported file type".to_string())]
        );
    }

    #[tokio::test]
    async fn test_upload_fails_over_with_identical_payload() {
        let dispatcher = FailoverDispatcher::new(
            MockTransport::new()
                .respond(UPLOAD, 503, "")
                .respond(UPLOAD_2, 200, "{}"),
        );
        let report = DocumentService::new(&dispatcher)
            .upload(&endpoints(), "tenancy", pdf())
            .await;

        assert!(report.succeeded());
        let calls = dispatcher.transport().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, calls[1].1);
    }

    #[tokio::test]
    async fn test_upload_generic_failure_has_no_alert() {
        let dispatcher = FailoverDispatcher::new(MockTransport::new().respond(UPLOAD, 500, "oops"));
        let report = DocumentService::new(&dispatcher)
            .upload(&endpoints(), "tenancy", pdf())
            .await;

        assert!(matches!(
            report.outcome,
            DocumentOutcome::Failed(DispatchError::Status { status: 500, .. })
        ));
        assert!(report.effects.is_empty());
    }

    #[tokio::test]
    async fn test_clear_collection_posts_confirmation_text() {
        let dispatcher = FailoverDispatcher::new(MockTransport::new().respond(DELETE, 200, "{}"));
        let report = DocumentService::new(&dispatcher).clear_collection(DELETE).await;

        assert!(report.succeeded());
        assert_eq!(report.status, "Delete successful.");
        assert_eq!(
            dispatcher.transport().calls()[0].1,
            RequestPayload::Text("Yes".to_string())
        );
    }

    #[tokio::test]
    async fn test_clear_collection_failure() {
        let dispatcher = FailoverDispatcher::new(MockTransport::new().respond(DELETE, 503, ""));
        let report = DocumentService::new(&dispatcher).clear_collection(DELETE).await;

        assert_eq!(report.status, "Delete failed.");
        assert_eq!(dispatcher.transport().calls().len(), 1);
    }
}
