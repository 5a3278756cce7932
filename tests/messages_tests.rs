
use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn short_contact_message_is_rejected_before_storage() {
    let app = TestApp::spawn();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/public/messages/contact")
        .set_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "hi"
        }))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(app.messages.messages.lock().is_empty());
    assert_eq!(app.mailer.attempts(), 0);
}

#[actix_rt::test]
async fn contact_message_is_stored_and_announced() {
    let app = TestApp::spawn();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/public/messages/contact")
        .set_json(json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "subject": "Engines",
            "message": "I would love to talk about analytical engines."
        }))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["notification_sent"], true);

    assert_eq!(app.messages.messages.lock().len(), 1);
    let delivered = app.mailer.delivered.lock();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].to, OWNER_ADDRESS);
    assert_eq!(delivered[0].reply_to.as_deref(), Some("ada@example.com"));
}

#[actix_rt::test]
async fn demo_request_survives_a_failing_relay() {
    let app = TestApp::spawn();
    app.mailer.fail_relay();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/public/messages/demo")
        .set_json(json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "organization": "Navy",
            "details": "Walkthrough of the compiler pipeline please.",
            "projectTitle": "Compiler"
        }))
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["notification_sent"], false);

    let messages = app.messages.messages.lock();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].subject.as_deref(), Some("Demo Request: Compiler"));
    assert_eq!(app.mailer.attempts(), 1);
}

#[actix_rt::test]
async fn appointment_needs_a_real_date() {
    let app = TestApp::spawn();
    let svc = test::init_service(app.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/public/messages/appointment")
        .set_json(json!({
            "name": "Alan Turing",
            "email": "alan@example.com",
            "date": "next tuesday",
            "time": "14:30",
            "topic": "Machine intelligence"
        }))
        .to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/public/messages/appointment")
        .set_json(json!({
            "name": "Alan Turing",
            "email": "alan@example.com",
            "date": "2026-11-03",
            "time": "14:30",
            "topic": "Machine intelligence"
        }))
        .to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::CREATED);

    let messages = app.messages.messages.lock();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].preferred_date.as_deref(), Some("2026-11-03"));
}

#[actix_rt::test]
async fn submissions_are_rate_limited_per_client() {
    let mut config = test_config();
    config.contact_rate_limit_per_hour = 2;
    let app = TestApp::with_config(config);
    let svc = test::init_service(app.app()).await;

    let form = json!({
        "name": "Repeat Sender",
        "email": "repeat@example.com",
        "message": "Checking the submission limiter."
    });

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/public/messages/contact")
            .set_json(&form)
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/api/public/messages/contact")
        .set_json(&form)
        .to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(app.messages.messages.lock().len(), 2);
}

#[actix_rt::test]
async fn public_send_email_shares_the_submission_limit() {
    let mut config = test_config();
    config.contact_rate_limit_per_hour = 1;
    let app = TestApp::with_config(config);
    let svc = test::init_service(app.app()).await;

    let notification = json!({
        "name": "Repeat Sender",
        "email": "repeat@example.com",
        "type": "contact",
        "content": "Checking the relay limiter."
    });

    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .set_json(&notification)
        .to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/send-email")
        .set_json(&notification)
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));
    assert_eq!(app.mailer.attempts(), 1);
}

#[actix_rt::test]
async fn admin_can_search_and_delete_messages() {
    let app = TestApp::spawn();
    let token = app.admin_token();
    let svc = test::init_service(app.app()).await;

    for (name, text) in [
        ("Ada Lovelace", "Question about engines and looms."),
        ("Grace Hopper", "Question about compilers and bugs."),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/public/messages/contact")
            .set_json(json!({ "name": name, "email": "someone@example.com", "message": text }))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/admin/messages?q=compilers")
        .insert_header(TestApp::bearer(&token))
        .to_request();
    let found: Value = test::call_and_read_body_json(&svc, req).await;
    let found = found.as_array().expect("array");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Grace Hopper");

    let id = found[0]["id"].as_str().expect("message id").to_string();
    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/messages/{id}?confirm=true"))
        .insert_header(TestApp::bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.messages.messages.lock().len(), 1);
}
