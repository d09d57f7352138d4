use super::common::*;
use axum::http::{header, StatusCode};
use tower::ServiceExt;

const LEAVE: [(&str, &str); 3] = [
    ("request_type", "leave"),
    ("title", "Annual leave"),
    ("description", "Two weeks in August"),
];

#[tokio::test]
async fn request_routes_require_login() {
    let fixture = fixture();
    let router = routed(fixture.service);

    let response = router
        .oneshot(get_request("/get_requests", None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submitted_request_flows_to_administrator_decision() {
    let fixture = fixture();
    let router = routed(fixture.service);
    let clerk = login_cookie(&router, CLERK).await;
    let governor = login_cookie(&router, GOVERNOR).await;

    let submitted = router
        .clone()
        .oneshot(multipart_post(
            "/submit_request",
            &LEAVE,
            &[("form.pdf", &b"%PDF-1.4"[..])],
            &clerk,
        ))
        .await
        .expect("submit executes");
    assert_eq!(submitted.status(), StatusCode::CREATED);
    let request = read_json_body(submitted).await["request"].clone();
    let id = request["id"].as_i64().expect("request id");
    assert_eq!(request["status"], "pending");

    let refused = router
        .clone()
        .oneshot(form_post(
            &format!("/process_request/{id}"),
            &[("status", "approved")],
            &clerk,
        ))
        .await
        .expect("process executes");
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let approved = router
        .clone()
        .oneshot(form_post(
            &format!("/process_request/{id}"),
            &[("status", "approved"), ("notes", "granted")],
            &governor,
        ))
        .await
        .expect("process executes");
    assert_eq!(approved.status(), StatusCode::OK);

    let listing = router
        .oneshot(get_request("/get_requests", Some(&governor)))
        .await
        .expect("listing executes");
    let listing = read_json_body(listing).await;
    assert_eq!(listing["data"][0]["status"], "approved");
    assert_eq!(listing["data"][0]["user"], "Portal user 1");
    assert_eq!(listing["data"][0]["notes"], "granted");
}

#[tokio::test]
async fn attachments_view_inline_and_download_as_files() {
    let fixture = fixture();
    let router = routed(fixture.service);
    let clerk = login_cookie(&router, CLERK).await;
    let colleague = login_cookie(&router, COLLEAGUE).await;

    let submitted = router
        .clone()
        .oneshot(multipart_post(
            "/submit_request",
            &LEAVE,
            &[("form.pdf", &b"%PDF-1.4"[..]), ("letter.docx", &b"PK"[..])],
            &clerk,
        ))
        .await
        .expect("submit executes");
    let request = read_json_body(submitted).await["request"].clone();
    let id = request["id"].as_i64().expect("request id");
    let pdf = request["attachments"][0].as_str().expect("pdf name").to_string();
    let docx = request["attachments"][1].as_str().expect("docx name").to_string();

    let view = router
        .clone()
        .oneshot(get_request(
            &format!("/view_attachment/{id}/{pdf}"),
            Some(&clerk),
        ))
        .await
        .expect("view executes");
    assert_eq!(view.status(), StatusCode::OK);
    assert!(view.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("ascii header")
        .starts_with("inline;"));

    let docx_view = router
        .clone()
        .oneshot(get_request(
            &format!("/view_attachment/{id}/{docx}"),
            Some(&clerk),
        ))
        .await
        .expect("view executes");
    assert!(docx_view.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("ascii header")
        .starts_with("attachment;"));

    let foreign = router
        .clone()
        .oneshot(get_request(
            &format!("/download_attachment/{id}/{pdf}"),
            Some(&colleague),
        ))
        .await
        .expect("download executes");
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);

    let unknown = router
        .oneshot(get_request(
            &format!("/download_attachment/{id}/other.pdf"),
            Some(&clerk),
        ))
        .await
        .expect("download executes");
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forwarded_request_reaches_the_recipient_inbox() {
    let fixture = fixture();
    let router = routed(fixture.service);
    let clerk = login_cookie(&router, CLERK).await;
    let colleague = login_cookie(&router, COLLEAGUE).await;

    let submitted = router
        .clone()
        .oneshot(multipart_post("/submit_request", &LEAVE, &[], &clerk))
        .await
        .expect("submit executes");
    let id = read_json_body(submitted).await["request"]["id"]
        .as_i64()
        .expect("request id");

    let bad_date = router
        .clone()
        .oneshot(form_post(
            &format!("/forward_request/{id}"),
            &[("forward_to", "2"), ("due_date", "soon")],
            &clerk,
        ))
        .await
        .expect("forward executes");
    assert_eq!(bad_date.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let forwarded = router
        .clone()
        .oneshot(form_post(
            &format!("/forward_request/{id}"),
            &[
                ("forward_to", "2"),
                ("purpose", "review"),
                ("next_action", "sign"),
                ("due_date", "2024-05-01"),
            ],
            &clerk,
        ))
        .await
        .expect("forward executes");
    assert_eq!(forwarded.status(), StatusCode::OK);

    let inbox = router
        .clone()
        .oneshot(get_request("/inbox", Some(&colleague)))
        .await
        .expect("inbox executes");
    let inbox = read_json_body(inbox).await;
    assert_eq!(inbox["requests"][0]["status"], "forwarded");

    let returned = router
        .oneshot(form_post(
            &format!("/return_request/{id}"),
            &[("reason", "not mine")],
            &colleague,
        ))
        .await
        .expect("return executes");
    assert_eq!(returned.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_requests_are_not_found() {
    let fixture = fixture();
    let router = routed(fixture.service);
    let governor = login_cookie(&router, GOVERNOR).await;

    let response = router
        .oneshot(form_post(
            "/save_request/77",
            &[("notes", "hello")],
            &governor,
        ))
        .await
        .expect("save executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disallowed_attachment_is_reported_to_the_client() {
    let fixture = fixture();
    let router = routed(fixture.service);
    let clerk = login_cookie(&router, CLERK).await;

    let submitted = router
        .clone()
        .oneshot(multipart_post(
            "/submit_request",
            &LEAVE,
            &[("form.pdf", &b"%PDF-1.4"[..]), ("macro.exe", &b"MZ"[..])],
            &clerk,
        ))
        .await
        .expect("submit executes");
    assert_eq!(submitted.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(submitted).await;
    assert!(body["error"].as_str().expect("message").contains("macro.exe"));

    let listing = router
        .oneshot(get_request("/get_requests", Some(&clerk)))
        .await
        .expect("listing executes");
    let body = read_json_body(listing).await;
    assert!(body["data"].as_array().expect("data").is_empty());
}
