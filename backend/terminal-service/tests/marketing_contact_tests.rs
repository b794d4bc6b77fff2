#[macro_use]
mod common;

use actix_web::http::{Method, StatusCode};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use common::{api, send, seed_user, test_state};

#[actix_web::test]
async fn subscribe_is_idempotent() {
    let state = test_state();
    let app = init_app!(state);

    let first = send(
        &app,
        api(Method::POST, "/api/marketing/subscribe", None)
            .set_json(json!({ "email": "  Newsletter@Example.com " }))
            .to_request(),
    )
    .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.json()["email"], "newsletter@example.com");
    assert_eq!(first.json()["active"], true);

    let second = send(
        &app,
        api(Method::POST, "/api/marketing/subscribe", None)
            .set_json(json!({ "email": "newsletter@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.json()["id"], first.json()["id"]);

    let invalid = send(
        &app,
        api(Method::POST, "/api/marketing/subscribe", None)
            .set_json(json!({ "email": "not-an-email" }))
            .to_request(),
    )
    .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unsubscribe_and_resubscribe() {
    let state = test_state();
    let app = init_app!(state);

    send(
        &app,
        api(Method::POST, "/api/marketing/subscribe", None)
            .set_json(json!({ "email": "reader@example.com" }))
            .to_request(),
    )
    .await;

    let unsubscribed = send(
        &app,
        api(Method::POST, "/api/marketing/unsubscribe", None)
            .set_json(json!({ "email": "READER@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(unsubscribed.status, StatusCode::OK);
    let body = unsubscribed.json();
    assert_eq!(body["active"], false);
    assert!(body["unsubscribedAt"].is_string());

    let unknown = send(
        &app,
        api(Method::POST, "/api/marketing/unsubscribe", None)
            .set_json(json!({ "email": "nobody@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let back = send(
        &app,
        api(Method::POST, "/api/marketing/subscribe", None)
            .set_json(json!({ "email": "reader@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(back.status, StatusCode::OK);
    assert_eq!(back.json()["active"], true);
    assert!(back.json()["unsubscribedAt"].is_null());
}

#[actix_web::test]
async fn subscriber_list_is_admin_only() {
    let state = test_state();
    let (_, user_token) = seed_user(&state, "reader", false, false).await;
    let (_, admin_token) = seed_user(&state, "admin", true, false).await;
    let app = init_app!(state);

    for email in ["a@example.com", "b@example.com"] {
        send(
            &app,
            api(Method::POST, "/api/marketing/subscribe", None)
                .set_json(json!({ "email": email }))
                .to_request(),
        )
        .await;
    }

    let anonymous = send(
        &app,
        api(Method::GET, "/api/marketing/subscribers", None).to_request(),
    )
    .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forbidden = send(
        &app,
        api(Method::GET, "/api/marketing/subscribers", Some(&user_token)).to_request(),
    )
    .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let listed = send(
        &app,
        api(Method::GET, "/api/marketing/subscribers", Some(&admin_token)).to_request(),
    )
    .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json()["total"], 2);
}

#[actix_web::test]
async fn contact_form_is_public_and_validated() {
    let state = test_state();
    let app = init_app!(state);

    let ok = send(
        &app,
        api(Method::POST, "/api/contact", None)
            .set_json(json!({
                "name": " Благој ",
                "email": "Blagoj@Example.com",
                "subject": "Соработка",
                "message": "Дали нудите обуки за е-документи?",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(ok.status, StatusCode::CREATED);
    let body = ok.json();
    assert_eq!(body["name"], "Благој");
    assert_eq!(body["email"], "blagoj@example.com");
    assert_eq!(body["handled"], false);

    let blank_message = send(
        &app,
        api(Method::POST, "/api/contact", None)
            .set_json(json!({
                "name": "Благој",
                "email": "blagoj@example.com",
                "subject": "Соработка",
                "message": "   ",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(blank_message.status, StatusCode::BAD_REQUEST);

    let bad_email = send(
        &app,
        api(Method::POST, "/api/contact", None)
            .set_json(json!({
                "name": "Благој",
                "email": "blagoj",
                "subject": "Соработка",
                "message": "Порака",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn admins_work_the_contact_inbox() {
    let state = test_state();
    let (_, user_token) = seed_user(&state, "reader", false, false).await;
    let (_, admin_token) = seed_user(&state, "admin", true, false).await;
    let app = init_app!(state);

    let created = send(
        &app,
        api(Method::POST, "/api/contact", None)
            .set_json(json!({
                "name": "Елена",
                "email": "elena@example.com",
                "subject": "Прашање",
                "message": "Како се генерира договор за вработување?",
            }))
            .to_request(),
    )
    .await;
    let id = created.json()["id"].as_str().unwrap().to_string();

    let forbidden = send(
        &app,
        api(Method::GET, "/api/contact/messages", Some(&user_token)).to_request(),
    )
    .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let inbox = send(
        &app,
        api(Method::GET, "/api/contact/messages", Some(&admin_token)).to_request(),
    )
    .await;
    assert_eq!(inbox.status, StatusCode::OK);
    assert_eq!(inbox.json()["items"][0]["id"], id.as_str());

    let handled = send(
        &app,
        api(
            Method::PATCH,
            &format!("/api/contact/messages/{id}/handled"),
            Some(&admin_token),
        )
        .to_request(),
    )
    .await;
    assert_eq!(handled.status, StatusCode::OK);

    let inbox = send(
        &app,
        api(Method::GET, "/api/contact/messages", Some(&admin_token)).to_request(),
    )
    .await;
    assert_eq!(inbox.json()["items"][0]["handled"], true);

    let missing = send(
        &app,
        api(
            Method::PATCH,
            &format!("/api/contact/messages/{}/handled", ObjectId::new().to_hex()),
            Some(&admin_token),
        )
        .to_request(),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
