use std::fmt;

use serde::{Deserialize, Serialize};

use super::{id_string, opt_id_string};

const GOOGLE_DOCS_BASE: &str = "https://docs.google.com/document/d/";

/// Document kinds the backend can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Quote,
    WorkOrder,
    Invoice,
    CombinedInvoice,
    #[serde(other)]
    Unknown,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Quote,
        DocumentType::WorkOrder,
        DocumentType::Invoice,
        DocumentType::CombinedInvoice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Quote => "quote",
            DocumentType::WorkOrder => "work_order",
            DocumentType::Invoice => "invoice",
            DocumentType::CombinedInvoice => "combined_invoice",
            DocumentType::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
    Paid,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Sent => "sent",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Paid => "paid",
            DocumentStatus::Cancelled => "cancelled",
            DocumentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link to a Google Docs document by id.
pub fn google_doc_url(google_doc_id: &str) -> String {
    format!("{}{}", GOOGLE_DOCS_BASE, google_doc_id)
}

/// A rendered document. The artifact itself lives behind `pdf_url` and
/// `google_doc_id`; it is never rendered locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub template_type: Option<DocumentType>,
    #[serde(default)]
    pub document_type: Option<DocumentType>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub google_doc_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl GeneratedDocument {
    pub fn kind(&self) -> Option<DocumentType> {
        self.template_type.or(self.document_type)
    }

    /// Direct PDF link, falling back to the generic file URL.
    pub fn pdf_link(&self) -> Option<&str> {
        self.pdf_url.as_deref().or(self.file_url.as_deref())
    }

    pub fn google_doc_link(&self) -> Option<String> {
        self.google_doc_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(google_doc_url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    pub name: String,
    /// Database templates carry `document_type`, built-in ones `type`.
    #[serde(default, rename = "type")]
    pub template_type: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub google_doc_id: Option<String>,
    #[serde(default)]
    pub placeholders: Vec<String>,
    #[serde(default)]
    pub is_google_template: bool,
}

impl DocumentTemplate {
    pub fn kind(&self) -> Option<&str> {
        self.template_type.as_deref().or(self.document_type.as_deref())
    }

    pub fn google_doc_link(&self) -> Option<String> {
        self.google_doc_id.as_deref().map(google_doc_url)
    }
}

/// Body of `/documents/generate` and `/documents/generate/preview`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateDocumentRequest {
    pub template_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<serde_json::Value>,
    /// Extra placeholder values merged into the payload.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GenerateDocumentRequest {
    pub fn for_order(template_type: DocumentType, order_id: impl Into<String>) -> Self {
        Self {
            template_type,
            order_id: Some(order_id.into()),
            document_number: None,
            order_data: None,
            customer_data: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub message: Option<String>,
    pub document: GeneratedDocument,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub google_doc_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResult {
    #[serde(default)]
    pub template_info: serde_json::Value,
    #[serde(default)]
    pub document_data: serde_json::Value,
    #[serde(default)]
    pub validation: serde_json::Value,
    #[serde(default)]
    pub preview_ready: bool,
}

impl PreviewResult {
    /// Validation errors reported by the backend, if any.
    pub fn errors(&self) -> Vec<String> {
        self.validation
            .get("errors")
            .and_then(|v| v.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
