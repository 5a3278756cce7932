
use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use test_utils::*;

fn draft(title: &str, slug: &str) -> Value {
    json!({
        "title": title,
        "slug": slug,
        "excerpt": "A short teaser",
        "content": "# Heading\n\nBody text.",
        "category": "Spellbook",
        "published": false
    })
}

#[actix_rt::test]
async fn scroll_is_public_only_while_published() {
    let app = TestApp::spawn();
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/scrolls")
        .insert_header(TestApp::bearer(&token))
        .set_json(draft("Hidden Runes", "hidden-runes"))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().expect("scroll id").to_string();

    let req = test::TestRequest::get().uri("/api/public/scrolls").to_request();
    let listed: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));

    let req = test::TestRequest::get().uri("/api/public/scrolls/hidden-runes").to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/admin/scrolls/{id}/published"))
        .insert_header(TestApp::bearer(&token))
        .set_json(json!({ "published": true }))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/public/scrolls").to_request();
    let listed: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(listed[0]["slug"], "hidden-runes");

    let req = test::TestRequest::get().uri("/api/public/scrolls/hidden-runes").to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn duplicate_slug_conflicts_and_keeps_the_first_scroll() {
    let app = TestApp::spawn();
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/scrolls")
        .insert_header(TestApp::bearer(&token))
        .set_json(draft("First Light", "first-light"))
        .to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/admin/scrolls")
        .insert_header(TestApp::bearer(&token))
        .set_json(draft("Second Light", "first-light"))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let scrolls = app.scrolls.scrolls.lock();
    assert_eq!(scrolls.len(), 1);
    assert_eq!(scrolls[0].title, "First Light");
}

#[actix_rt::test]
async fn slug_is_derived_from_title_when_missing() {
    let app = TestApp::spawn();
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/scrolls")
        .insert_header(TestApp::bearer(&token))
        .set_json(json!({ "title": "Notes On Rust Lifetimes", "content": "Body" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(created["slug"], "notes-on-rust-lifetimes");
    assert_eq!(created["read_time"], "5 min read");
}

#[actix_rt::test]
async fn delete_needs_confirmation() {
    let app = TestApp::spawn();
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/scrolls")
        .insert_header(TestApp::bearer(&token))
        .set_json(draft("Doomed Scroll", "doomed-scroll"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&svc, req).await;
    let id = created["id"].as_str().expect("scroll id").to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/scrolls/{id}"))
        .insert_header(TestApp::bearer(&token))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(app.scrolls.scrolls.lock().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/scrolls/{id}?confirm=true"))
        .insert_header(TestApp::bearer(&token))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(app.scrolls.scrolls.lock().is_empty());
}

#[actix_rt::test]
async fn public_listing_filters_by_category() {
    let app = TestApp::spawn();
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    for (title, slug, category) in [
        ("Spell One", "spell-one", "Spellbook"),
        ("Quiet Thoughts", "quiet-thoughts", "Reflections"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/admin/scrolls")
            .insert_header(TestApp::bearer(&token))
            .set_json(json!({
                "title": title,
                "slug": slug,
                "content": "Body",
                "category": category,
                "published": true
            }))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/public/scrolls?category=Reflections")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&svc, req).await;
    let slugs: Vec<&str> = listed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|s| s["slug"].as_str())
        .collect();
    assert_eq!(slugs, vec!["quiet-thoughts"]);

    let req = test::TestRequest::get().uri("/api/public/scrolls?category=all").to_request();
    let listed: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
}
