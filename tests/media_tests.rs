
use actix_web::{http::StatusCode, test};
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn deleted_object_disappears_from_listing() {
    let app = TestApp::spawn();
    app.bucket.seed("banner.png", 2048);
    app.bucket.seed("avatar.png", 512);
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/media")
        .insert_header(TestApp::bearer(&token))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::delete()
        .uri("/api/admin/media/banner.png?confirm=true")
        .insert_header(TestApp::bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/admin/media")
        .insert_header(TestApp::bearer(&token))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&svc, req).await;
    let names: Vec<&str> = listed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|o| o["name"].as_str())
        .collect();
    assert_eq!(names, vec!["avatar.png"]);
}

#[actix_rt::test]
async fn media_delete_requires_confirmation_and_existing_object() {
    let app = TestApp::spawn();
    app.bucket.seed("banner.png", 2048);
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::delete()
        .uri("/api/admin/media/banner.png")
        .insert_header(TestApp::bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(app.bucket.objects.lock().len(), 1);

    let req = test::TestRequest::delete()
        .uri("/api/admin/media/missing.png?confirm=true")
        .insert_header(TestApp::bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn listing_carries_public_urls() {
    let app = TestApp::spawn();
    app.bucket.seed("diagram.png", 100);
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/media/diagram.png")
        .insert_header(TestApp::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(body["public_url"], format!("{MEDIA_HOST}/diagram.png"));

    let req = test::TestRequest::get()
        .uri("/api/admin/media")
        .insert_header(TestApp::bearer(&token))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(listed[0]["public_url"], format!("{MEDIA_HOST}/diagram.png"));
}

#[actix_rt::test]
async fn dashboard_counts_every_collection() {
    let app = TestApp::spawn();
    app.bucket.seed("one.png", 1);
    app.bucket.seed("two.png", 1);
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/dashboard")
        .insert_header(TestApp::bearer(&token))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary["counts"]["media"], 2);
    assert_eq!(summary["counts"]["scrolls"], 0);
}
