//! `/documents*`. Generation happens server-side; this side only asks for it
//! and hands out the resulting links.

use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::http::ApiClient;
use crate::models::{
    DocumentTemplate, DocumentType, GenerateDocumentRequest, GeneratedDocument, GenerationResult,
    ListParams, Page, PreviewResult,
};

use super::endpoint;

#[derive(Debug, Deserialize)]
struct Placeholders {
    #[serde(default)]
    placeholders: Vec<String>,
}

#[derive(Clone)]
pub struct DocumentService {
    client: ApiClient,
}

impl DocumentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Filters: `template_type`, `status`, `search`.
    pub async fn list(&self, params: &ListParams) -> Result<Page<GeneratedDocument>> {
        self.client.get("/documents", params.to_query()).await?.json()
    }

    pub async fn get(&self, id: &str) -> Result<GeneratedDocument> {
        self.client
            .get(&endpoint(&["documents", id])?, Vec::new())
            .await?
            .field("document")
    }

    pub async fn templates(&self) -> Result<Vec<DocumentTemplate>> {
        self.client
            .get("/documents/templates", Vec::new())
            .await?
            .field("templates")
    }

    pub async fn placeholders(&self, template_type: DocumentType) -> Result<Vec<String>> {
        let response = self
            .client
            .get(
                &endpoint(&["documents", "templates", &template_type.to_string(), "placeholders"])?,
                Vec::new(),
            )
            .await?;
        Ok(response.json::<Placeholders>()?.placeholders)
    }

    pub async fn preview(&self, request: &GenerateDocumentRequest) -> Result<PreviewResult> {
        self.client
            .post("/documents/generate/preview", request)
            .await?
            .json()
    }

    pub async fn generate(&self, request: &GenerateDocumentRequest) -> Result<GenerationResult> {
        let result: GenerationResult = self.client.post("/documents/generate", request).await?.json()?;
        tracing::info!(
            document_id = %result.document.id,
            template_type = %request.template_type,
            "Document generated"
        );
        Ok(result)
    }

    /// Re-render with the stored data, optionally overriding fields.
    pub async fn regenerate(&self, id: &str, overrides: &serde_json::Value) -> Result<GenerationResult> {
        self.client
            .post(&endpoint(&["documents", id, "regenerate"])?, overrides)
            .await?
            .json()
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&endpoint(&["documents", id])?).await?;
        Ok(())
    }

    /// The direct PDF link of a document, fetched if needed.
    pub async fn pdf_link(&self, id: &str) -> Result<String> {
        let document = self.get(id).await?;
        document
            .pdf_link()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode(format!("document {} has no PDF link", id)))
    }
}
