#[macro_use]
mod common;

use actix_web::http::{Method, StatusCode};
use serde_json::json;

use common::{api, company_info, send, seed_user, test_state, STRONG_PASSWORD};
use terminal_service::models::{Page, PostType, SocialPost};

#[actix_web::test]
async fn profile_update_recomputes_completeness() {
    let state = test_state();
    let (_, token) = seed_user(&state, "dimitar", false, false).await;
    let app = init_app!(state);

    let before = send(
        &app,
        api(Method::GET, "/api/users/profile", Some(&token)).to_request(),
    )
    .await;
    assert_eq!(before.status, StatusCode::OK);
    assert_eq!(before.json()["profileComplete"], false);

    let resp = send(
        &app,
        api(Method::PUT, "/api/users/profile", Some(&token))
            .set_json(json!({
                "email": "Dimitar@Firma.mk",
                "companyInfo": {
                    "companyName": "  Димитар ДОО ",
                    "address": "бул. Партизански одреди 5, Битола",
                    "taxNumber": "4002000111222",
                    "manager": "Димитар Николов",
                    "phone": "+389 70 000 000",
                },
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["profileComplete"], true);
    assert_eq!(body["email"], "dimitar@firma.mk");
    assert_eq!(body["companyInfo"]["companyName"], "Димитар ДОО");

    // Clearing a required field makes the profile incomplete again
    let resp = send(
        &app,
        api(Method::PUT, "/api/users/profile", Some(&token))
            .set_json(json!({ "companyInfo": { "companyName": "Димитар ДОО" } }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["profileComplete"], false);
}

#[actix_web::test]
async fn profile_email_must_stay_unique() {
    let state = test_state();
    seed_user(&state, "first", false, false).await;
    let (_, token) = seed_user(&state, "second", false, false).await;
    let app = init_app!(state);

    let resp = send(
        &app,
        api(Method::PUT, "/api/users/profile", Some(&token))
            .set_json(json!({ "email": "FIRST@example.com", "companyInfo": company_info() }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn change_password_checks_current_password_and_strength() {
    let state = test_state();
    let app = init_app!(state);

    let registered = send(
        &app,
        api(Method::POST, "/api/auth/register", None)
            .set_json(json!({ "username": "vesna", "password": STRONG_PASSWORD }))
            .to_request(),
    )
    .await;
    let token = registered.json()["token"].as_str().unwrap().to_string();

    let wrong = send(
        &app,
        api(Method::PUT, "/api/users/password", Some(&token))
            .set_json(json!({ "currentPassword": "N0pe!nope", "newPassword": "N3w!Password" }))
            .to_request(),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let weak = send(
        &app,
        api(Method::PUT, "/api/users/password", Some(&token))
            .set_json(json!({ "currentPassword": STRONG_PASSWORD, "newPassword": "short" }))
            .to_request(),
    )
    .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);

    let ok = send(
        &app,
        api(Method::PUT, "/api/users/password", Some(&token))
            .set_json(json!({ "currentPassword": STRONG_PASSWORD, "newPassword": "N3w!Password" }))
            .to_request(),
    )
    .await;
    assert_eq!(ok.status, StatusCode::OK);

    let login = send(
        &app,
        api(Method::POST, "/api/auth/login", None)
            .set_json(json!({ "username": "vesna", "password": "N3w!Password" }))
            .to_request(),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[actix_web::test]
async fn admin_endpoints_reject_regular_users() {
    let state = test_state();
    let (_, token) = seed_user(&state, "regular", false, false).await;
    let (other, _) = seed_user(&state, "other", false, false).await;
    let app = init_app!(state);

    let list = send(&app, api(Method::GET, "/api/users", Some(&token)).to_request()).await;
    assert_eq!(list.status, StatusCode::FORBIDDEN);

    let promote = send(
        &app,
        api(
            Method::PATCH,
            &format!("/api/users/{}/admin", other.id.to_hex()),
            Some(&token),
        )
        .set_json(json!({ "isAdmin": true }))
        .to_request(),
    )
    .await;
    assert_eq!(promote.status, StatusCode::FORBIDDEN);

    let anonymous = send(&app, api(Method::GET, "/api/users", None).to_request()).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_lists_and_promotes_users() {
    let state = test_state();
    let (admin, admin_token) = seed_user(&state, "admin", true, false).await;
    for name in ["u1", "u2", "u3"] {
        seed_user(&state, name, false, false).await;
    }
    let (target, _) = seed_user(&state, "target", false, false).await;
    let app = init_app!(state);

    let page = send(
        &app,
        api(Method::GET, "/api/users?page=1&limit=2", Some(&admin_token)).to_request(),
    )
    .await;
    assert_eq!(page.status, StatusCode::OK);
    let body = page.json();
    assert_eq!(body["total"], 5);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let promoted = send(
        &app,
        api(
            Method::PATCH,
            &format!("/api/users/{}/admin", target.id.to_hex()),
            Some(&admin_token),
        )
        .set_json(json!({ "isAdmin": true }))
        .to_request(),
    )
    .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.json()["isAdmin"], true);

    let self_demote = send(
        &app,
        api(
            Method::PATCH,
            &format!("/api/users/{}/admin", admin.id.to_hex()),
            Some(&admin_token),
        )
        .set_json(json!({ "isAdmin": false }))
        .to_request(),
    )
    .await;
    assert_eq!(self_demote.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleting_a_user_removes_their_posts() {
    let state = test_state();
    let (admin, admin_token) = seed_user(&state, "admin", true, false).await;
    let (victim, _) = seed_user(&state, "victim", false, false).await;
    state
        .repos
        .posts
        .insert_post(&SocialPost::new(victim.id, "збогум".into(), PostType::UserPost))
        .await
        .unwrap();
    let app = init_app!(state);

    let self_delete = send(
        &app,
        api(
            Method::DELETE,
            &format!("/api/users/{}", admin.id.to_hex()),
            Some(&admin_token),
        )
        .to_request(),
    )
    .await;
    assert_eq!(self_delete.status, StatusCode::BAD_REQUEST);

    let resp = send(
        &app,
        api(
            Method::DELETE,
            &format!("/api/users/{}", victim.id.to_hex()),
            Some(&admin_token),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);

    assert!(state.repos.users.find_user(&victim.id).await.unwrap().is_none());
    let (posts, total) = state
        .repos
        .posts
        .feed(Some(&victim.id), Page::default())
        .await
        .unwrap();
    assert!(posts.is_empty());
    assert_eq!(total, 0);

    let again = send(
        &app,
        api(
            Method::DELETE,
            &format!("/api/users/{}", victim.id.to_hex()),
            Some(&admin_token),
        )
        .to_request(),
    )
    .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn bootstrap_admins_are_promoted() {
    let state = test_state();
    let (user, _) = seed_user(&state, "founder", false, false).await;

    let promoted = terminal_service::services::UserService::new(&state)
        .promote_bootstrap_admins(&["Founder".to_string(), "missing".to_string()])
        .await
        .unwrap();
    assert_eq!(promoted, 1);

    let stored = state.repos.users.find_user(&user.id).await.unwrap().unwrap();
    assert!(stored.is_admin);
}
