//! Typed services against a mocked API, with an authenticated session.

use std::sync::Arc;

use docgen_client::models::{DocumentType, GenerateDocumentRequest, ListParams};
use docgen_client::{ApiError, Body, ClientConfig, Docgen, MemoryStore, Method, RequestOptions};
use reqwest::StatusCode;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn signed_in(server: &MockServer) -> Docgen {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "t1",
            "user": {"id": 1, "role": "admin"}
        })))
        .mount(server)
        .await;

    let config = ClientConfig::new(&format!("{}/api/", server.uri()));
    let docgen = Docgen::connect(&config, Arc::new(MemoryStore::new())).unwrap();
    docgen.session.login("a@b.com", "pw").await.unwrap();
    docgen
}

#[tokio::test]
async fn customers_list_passes_query_and_decodes_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .and(query_param("page", "2"))
        .and(query_param("search", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{"id": 11, "company_name": "Acme BV"}],
            "pagination": {"page": 2, "per_page": 20, "total": 21, "pages": 2, "has_prev": true, "has_next": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let docgen = signed_in(&server).await;
    let page = docgen
        .api
        .customers()
        .list(&ListParams::new().page(2).search("acme"))
        .await
        .unwrap();

    assert_eq!(page.items[0].id, "11");
    assert_eq!(page.items[0].company_name, "Acme BV");
    assert!(page.pagination.has_prev);
}

#[tokio::test]
async fn single_records_are_unwrapped_from_their_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/customers/c-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "customer": {"id": "c-1", "company_name": "Bakkerij de Vries", "payment_terms": 30}
        })))
        .mount(&server)
        .await;

    let docgen = signed_in(&server).await;
    let customer = docgen.api.customers().get("c-1").await.unwrap();
    assert_eq!(customer.payment_terms, Some(30));
}

#[tokio::test]
async fn error_message_prefers_message_then_error_then_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Product niet gevonden", "error": "not_found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/2"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Ongeldige product ID"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/3"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let docgen = signed_in(&server).await;
    let products = docgen.api.products();

    match products.get("1").await.unwrap_err() {
        ApiError::RequestFailed { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Product niet gevonden");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(products.get("2").await.unwrap_err().user_message(), "Ongeldige product ID");
    assert_eq!(products.get("3").await.unwrap_err().user_message(), "HTTP 502: Bad Gateway");

    // Business errors do not end the session.
    assert!(docgen.session.is_authenticated());
}

#[tokio::test]
async fn attachment_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products/5/attachments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "attachment": {"id": 9, "file_name": "sheet.pdf", "file_url": "/uploads/sheet.pdf", "attachment_type": "datasheet"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("sheet.pdf");
    std::fs::write(&file, b"%PDF-1.4 test").unwrap();

    let docgen = signed_in(&server).await;
    let attachment = docgen
        .api
        .products()
        .upload_attachment("5", &file, "datasheet")
        .await
        .unwrap();
    assert_eq!(attachment.file_name, "sheet.pdf");

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/api/products/5/attachments")
        .unwrap();
    let content_type = upload.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert_eq!(upload.headers.get_all("authorization").iter().count(), 1);
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"attachment_type\""));
    assert!(body.contains("filename=\"sheet.pdf\""));
}

#[tokio::test]
async fn generate_document_posts_request_and_returns_links() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/generate"))
        .and(body_json(serde_json::json!({"template_type": "invoice", "order_id": "42"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "message": "Document succesvol gegenereerd",
            "document": {"id": 77, "document_type": "invoice", "status": "draft", "google_doc_id": "g-77",
                         "pdf_url": "https://files.example.nl/77.pdf"},
            "pdf_url": "https://files.example.nl/77.pdf",
            "google_doc_id": "g-77"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let docgen = signed_in(&server).await;
    let request = GenerateDocumentRequest::for_order(DocumentType::Invoice, "42");
    let result = docgen.api.documents().generate(&request).await.unwrap();

    assert_eq!(result.document.kind(), Some(DocumentType::Invoice));
    assert_eq!(result.document.pdf_link(), Some("https://files.example.nl/77.pdf"));
    assert_eq!(
        result.document.google_doc_link().as_deref(),
        Some("https://docs.google.com/document/d/g-77")
    );
}

#[tokio::test]
async fn download_writes_body_to_disk() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files/77.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 generated".to_vec()))
        .mount(&server)
        .await;

    let docgen = signed_in(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out").join("77.pdf");

    let written = docgen.client().download_file("/files/77.pdf", &dest).await.unwrap();
    assert_eq!(written, 18);
    assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.4 generated");
}

#[tokio::test]
async fn dashboard_stats_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "stats": {
                "overview": {"customers": 4, "products": 10, "orders": 3, "documents": 2},
                "monthly_revenue": [{"month": "2026-09", "revenue": 1200.5}, {"month": "2026-10", "revenue": 800.0}]
            }
        })))
        .mount(&server)
        .await;

    let docgen = signed_in(&server).await;
    let stats = docgen.api.dashboard().stats().await.unwrap();
    assert_eq!(stats.overview.customers, 4);
    assert_eq!(stats.total_revenue(), 2000.5);
}

#[tokio::test]
async fn download_below_base_url_carries_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files/77.pdf"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let docgen = signed_in(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/api/files/77.pdf", server.uri());
    let written = docgen.client().download_file(&url, &dir.path().join("77.pdf")).await.unwrap();
    assert_eq!(written, 4);
}

#[tokio::test]
async fn download_from_other_host_sends_no_credentials() {
    let server = MockServer::start().await;
    let files = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files/1.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .expect(1)
        .mount(&files)
        .await;

    let docgen = signed_in(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/api/files/1.pdf", files.uri());
    docgen.client().download_file(&url, &dir.path().join("1.pdf")).await.unwrap();

    let requests = files.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn unauthorized_from_other_host_keeps_session() {
    let server = MockServer::start().await;
    let files = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&files)
        .await;

    let docgen = signed_in(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/files/1.pdf", files.uri());
    let err = docgen
        .client()
        .download_file(&url, &dir.path().join("1.pdf"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(matches!(err, ApiError::RequestFailed { .. }));
    assert!(docgen.session.is_authenticated());
}

#[tokio::test]
async fn raw_body_is_sent_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/imports"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let docgen = signed_in(&server).await;
    let payload = b"naam;prijs\nschroef;0,10\n".to_vec();
    let response = docgen
        .client()
        .request("/imports", RequestOptions::new(Method::POST).body(Body::Raw(payload.clone())))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let requests = server.received_requests().await.unwrap();
    let import = requests.iter().find(|r| r.url.path() == "/api/imports").unwrap();
    assert_eq!(import.body, payload);
    assert!(import.headers.get("content-type").is_none());
    assert_eq!(import.headers.get_all("authorization").iter().count(), 1);
}

#[tokio::test]
async fn ids_stay_within_their_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Document not found"})))
        .mount(&server)
        .await;

    let docgen = signed_in(&server).await;
    let err = docgen.api.documents().get("1/regenerate").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    let requests = server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert_eq!(last.url.path(), "/api/documents/1%2Fregenerate");

    let before = requests.len();
    let err = docgen.api.orders().delete_item("..", "3").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidPath(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), before);
}
