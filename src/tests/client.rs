use super::{parse_envelope, remote_failure, Extractor, HttpExtractor, UPLOAD_FIELD};
use crate::error::ExtractionError;
use crate::upload::SelectedFile;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

/// Serves `app` on an ephemeral local port and returns its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn pdf_fixture() -> (NamedTempFile, SelectedFile) {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"%PDF-1.4\n%fake\n").unwrap();
    let selected = SelectedFile::from_path(file.path()).unwrap();
    (file, selected)
}

async fn echo_upload(mut multipart: Multipart) -> (StatusCode, String) {
    let mut fields = Vec::new();
    let mut file_name = String::new();
    let mut size = 0;

    while let Some(field) = multipart.next_field().await.unwrap() {
        fields.push(field.name().unwrap_or("").to_string());
        if let Some(name) = field.file_name() {
            file_name = name.to_string();
        }
        size += field.bytes().await.unwrap().len();
    }

    let body = json!({
        "ok": true,
        "duration_sec": 0.42,
        "hierarchy": {
            "metadata": { "source_file": file_name },
            "sections": [{ "title": fields.join(","), "pageNumber": size }]
        }
    });
    (StatusCode::OK, body.to_string())
}

#[test]
fn test_remote_failure_uses_detail() {
    let err = remote_failure(500, r#"{"detail":"OCR failed"}"#);
    assert_eq!(
        err,
        ExtractionError::RemoteFailure {
            status: 500,
            message: "OCR failed".to_string()
        }
    );
    assert_eq!(err.to_string(), "OCR failed");
}

#[test]
fn test_remote_failure_falls_back_to_status() {
    for body in ["<html>Internal Server Error</html>", "", r#"{"error":"x"}"#, r#"{"detail":7}"#] {
        let err = remote_failure(500, body);
        assert!(
            matches!(err, ExtractionError::RemoteFailure { status: 500, .. }),
            "unexpected classification for {body:?}"
        );
        assert!(err.to_string().contains("500"), "message for {body:?}: {err}");
    }
}

#[test]
fn test_envelope_requires_truthy_ok() {
    for body in [r#"{"ok": false}"#, r#"{"ok": false, "hierarchy": {}}"#, r#"{"hierarchy": {}}"#, r#"{"ok": 0, "hierarchy": {}}"#] {
        assert!(
            matches!(parse_envelope(body), Err(ExtractionError::InvalidResponse(_))),
            "{body} should be rejected"
        );
    }
}

#[test]
fn test_envelope_requires_hierarchy() {
    for body in [r#"{"ok": true}"#, r#"{"ok": true, "hierarchy": null}"#, r#"{"ok": true, "hierarchy": ""}"#] {
        assert!(
            matches!(parse_envelope(body), Err(ExtractionError::InvalidResponse(_))),
            "{body} should be rejected"
        );
    }
}

#[test]
fn test_envelope_rejects_non_json() {
    assert!(matches!(
        parse_envelope("not json"),
        Err(ExtractionError::InvalidResponse(_))
    ));
    assert!(matches!(
        parse_envelope("[1, 2]"),
        Err(ExtractionError::InvalidResponse(_))
    ));
}

#[test]
fn test_envelope_returns_hierarchy_untouched() {
    let hierarchy = parse_envelope(
        r#"{"ok": true, "hierarchy": {"sections": [{"title": "A", "extra": [1, 2]}]}}"#,
    )
    .unwrap();
    assert_eq!(
        hierarchy,
        json!({"sections": [{"title": "A", "extra": [1, 2]}]})
    );
}

#[tokio::test]
async fn test_extract_uploads_file_field() {
    let endpoint = serve(Router::new().route("/extract", post(echo_upload))).await;
    let (_file, selected) = pdf_fixture();

    let extractor = HttpExtractor::new(&endpoint).unwrap();
    let hierarchy = extractor.extract(&selected).await.unwrap();

    assert_eq!(hierarchy["sections"][0]["title"], UPLOAD_FIELD);
    assert_eq!(hierarchy["sections"][0]["pageNumber"], 15);
    assert_eq!(
        hierarchy["metadata"]["source_file"],
        selected.file_name.as_str()
    );
}

#[tokio::test]
async fn test_extract_surfaces_remote_detail() {
    let app = Router::new().route(
        "/extract",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"detail":"OCR failed"}"#,
            )
        }),
    );
    let endpoint = serve(app).await;
    let (_file, selected) = pdf_fixture();

    let err = HttpExtractor::new(&endpoint)
        .unwrap()
        .extract(&selected)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "OCR failed");
}

#[tokio::test]
async fn test_extract_unparsable_error_mentions_status() {
    let app = Router::new().route(
        "/extract",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
    );
    let endpoint = serve(app).await;
    let (_file, selected) = pdf_fixture();

    let err = HttpExtractor::new(&endpoint)
        .unwrap()
        .extract(&selected)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::RemoteFailure { status: 500, .. }));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_extract_not_ok_is_invalid_response() {
    let app = Router::new().route("/extract", post(|| async { r#"{"ok": false}"# }));
    let endpoint = serve(app).await;
    let (_file, selected) = pdf_fixture();

    let err = HttpExtractor::new(&endpoint)
        .unwrap()
        .extract(&selected)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_extract_connection_refused_is_transport() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (_file, selected) = pdf_fixture();

    let err = HttpExtractor::new(&format!("http://{addr}"))
        .unwrap()
        .extract(&selected)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::Transport(_)));
}

#[tokio::test]
async fn test_extract_missing_local_file_is_transport() {
    let (file, selected) = pdf_fixture();
    drop(file);

    let err = HttpExtractor::new("http://127.0.0.1:9")
        .unwrap()
        .extract(&selected)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::Transport(_)));
}

#[tokio::test]
async fn test_health_reports_status_and_version() {
    let app = Router::new().route(
        "/health",
        get(|| async { r#"{"status": "ok", "version": "0.1.0"}"# }),
    );
    let endpoint = serve(app).await;

    // Trailing slashes on the configured endpoint are tolerated.
    let health = HttpExtractor::new(&format!("{endpoint}/"))
        .unwrap()
        .health()
        .await
        .unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, "0.1.0");
}
