//! File relay endpoints.

mod helpers;

use axum::http::StatusCode;

use helpers::{ADMIN, CLERK, OUTSIDER, TestApp};

#[tokio::test]
async fn test_upload_download_and_delete() {
    let app = TestApp::new().await;

    let uploaded = app.upload(CLERK, "invoice 7.pdf", b"%PDF-1.7 ...", Some("globex")).await;
    assert_eq!(uploaded.status, StatusCode::CREATED, "{}", uploaded.body);
    let upload = &uploaded.body["data"];
    assert_eq!(upload["recipient_email"], "buyer@globex.test");
    assert_eq!(upload["file_name"], "invoice 7.pdf");
    let path = upload["file_path"].as_str().unwrap().to_string();
    let id = upload["id"].as_str().unwrap().to_string();
    assert!(path.ends_with("_invoice_7.pdf"));

    let link = app
        .request("GET", &format!("/download?path={path}"), None, Some("buyer@globex.test"))
        .await;
    assert_eq!(link.status, StatusCode::OK);
    assert_eq!(link.body["data"]["expires_in"], 3600);

    let denied = app
        .request("GET", &format!("/download?path={path}"), None, Some(OUTSIDER))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let missing = app.request("GET", "/download", None, Some(CLERK)).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let outsider_list = app.request("GET", "/files", None, Some(OUTSIDER)).await;
    assert_eq!(outsider_list.body["data"].as_array().unwrap().len(), 0);

    let forbidden = app.request("DELETE", &format!("/files/{id}"), None, Some(OUTSIDER)).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    app.objects.fail_deletes(true);
    let deleted = app
        .request("DELETE", &format!("/files/{id}"), None, Some("buyer@globex.test"))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let listed = app.request("GET", "/files", None, Some(CLERK)).await;
    assert_eq!(listed.body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_upload_defaults_to_admin_and_rejects_bad_input() {
    let app = TestApp::new().await;

    let uploaded = app.upload(CLERK, "a.txt", b"hello", None).await;
    assert_eq!(uploaded.status, StatusCode::CREATED);
    assert_eq!(uploaded.body["data"]["recipient_email"], ADMIN);

    let admin_list = app.request("GET", "/files", None, Some(ADMIN)).await;
    assert_eq!(admin_list.body["data"].as_array().unwrap().len(), 1);

    let empty = app.upload(CLERK, "empty.txt", b"", None).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let big = app.upload(CLERK, "big.bin", &[7u8; 5000], None).await;
    assert_eq!(big.status, StatusCode::BAD_REQUEST);

    let unknown = app.upload(CLERK, "a.txt", b"hello", Some("ghost")).await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.objects.len(), 1);
}
