//! Administrative document endpoints

use std::sync::Arc;

use tracing::debug;

use clinic_http::{ApiTransport, Request};

use crate::error::{ApiError, Result};
use crate::models::{ApiMessage, DocumentKind};

/// Upload and removal of administrative documents
pub struct DocumentsApi {
    transport: Arc<dyn ApiTransport>,
}

impl DocumentsApi {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Attach a document to a patient record
    ///
    /// Sent as `multipart/form-data` with the backend's field names:
    /// `document_type` and `file`. The part's content type is guessed from
    /// the file name.
    pub async fn upload(
        &self,
        patient_id: i64,
        kind: DocumentKind,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<ApiMessage> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        debug!(patient_id, kind = kind.as_str(), "uploading document");

        let request = Request::post(format!("/patients/upload/documents/create/{patient_id}"))
            .text_part("document_type", kind.as_str())
            .file_part("file", data, file_name, mime.essence_str());
        self.fetch(request).await
    }

    /// Remove an uploaded document
    pub async fn delete(&self, document_id: i64) -> Result<ApiMessage> {
        self.fetch(Request::delete(format!(
            "/patients/delete/documents/delete/{document_id}"
        )))
        .await
    }

    async fn fetch(&self, request: Request) -> Result<ApiMessage> {
        let value = self.transport.dispatch(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTransport;
    use clinic_http::{Body, Method, PartKind};
    use serde_json::json;

    #[tokio::test]
    async fn test_upload_builds_multipart_request() {
        let transport = Arc::new(StubTransport::replying(
            json!({"success": true, "message": "uploaded"}),
        ));
        let api = DocumentsApi::new(transport.clone());

        let message = api
            .upload(
                4,
                DocumentKind::AuthorizationForCare,
                "autorisation.pdf",
                b"%PDF-1.4".to_vec(),
            )
            .await
            .unwrap();
        assert!(message.success);

        let sent = transport.requests();
        assert_eq!(sent[0].path, "/patients/upload/documents/create/4");
        assert_eq!(sent[0].method, Method::POST);
        let Body::Multipart(parts) = &sent[0].body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts[0].name, "document_type");
        assert!(
            matches!(&parts[0].kind, PartKind::Text(value) if value == "authorization_for_care")
        );
        assert_eq!(parts[1].name, "file");
        match &parts[1].kind {
            PartKind::Bytes {
                file_name, mime, ..
            } => {
                assert_eq!(file_name, "autorisation.pdf");
                assert_eq!(mime, "application/pdf");
            }
            other => panic!("expected file part, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_uses_delete_route() {
        let transport = Arc::new(StubTransport::replying(
            json!({"success": true, "message": "removed"}),
        ));
        let api = DocumentsApi::new(transport.clone());

        api.delete(9).await.unwrap();
        let sent = transport.requests();
        assert_eq!(sent[0].path, "/patients/delete/documents/delete/9");
        assert_eq!(sent[0].method, Method::DELETE);
    }
}
