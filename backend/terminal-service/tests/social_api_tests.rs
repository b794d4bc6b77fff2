#[macro_use]
mod common;

use actix_web::http::{Method, StatusCode};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use common::{api, send, seed_user, test_state};

#[actix_web::test]
async fn post_content_is_validated() {
    let state = test_state();
    let (_, token) = seed_user(&state, "petar", false, false).await;
    let app = init_app!(state);

    let empty = send(
        &app,
        api(Method::POST, "/api/social/posts", Some(&token))
            .set_json(json!({ "content": "   " }))
            .to_request(),
    )
    .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let too_long = send(
        &app,
        api(Method::POST, "/api/social/posts", Some(&token))
            .set_json(json!({ "content": "ж".repeat(2001) }))
            .to_request(),
    )
    .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);

    let share = send(
        &app,
        api(Method::POST, "/api/social/posts", Some(&token))
            .set_json(json!({ "content": "Вест", "postType": "newsShare" }))
            .to_request(),
    )
    .await;
    assert_eq!(share.status, StatusCode::FORBIDDEN);

    let unknown_type = send(
        &app,
        api(Method::POST, "/api/social/posts", Some(&token))
            .set_json(json!({ "content": "Вест", "postType": "advert" }))
            .to_request(),
    )
    .await;
    assert_eq!(unknown_type.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn feed_shows_author_and_like_state() {
    let state = test_state();
    let (author, author_token) = seed_user(&state, "petar", false, true).await;
    let (_, reader_token) = seed_user(&state, "ivana", false, false).await;
    let app = init_app!(state);

    let created = send(
        &app,
        api(Method::POST, "/api/social/posts", Some(&author_token))
            .set_json(json!({ "content": "  Бараме партнер за извоз  " }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let post = created.json();
    assert_eq!(post["content"], "Бараме партнер за извоз");
    assert_eq!(post["postType"], "userPost");
    let post_id = post["id"].as_str().unwrap().to_string();

    let like_uri = format!("/api/social/posts/{post_id}/like");
    let liked = send(&app, api(Method::POST, &like_uri, Some(&reader_token)).to_request()).await;
    assert_eq!(liked.status, StatusCode::OK);
    assert_eq!(liked.json(), json!({ "liked": true, "likesCount": 1 }));

    let feed = send(
        &app,
        api(Method::GET, "/api/social/feed", Some(&reader_token)).to_request(),
    )
    .await;
    let entry = feed.json()["items"][0].clone();
    assert_eq!(entry["author"]["id"], author.id.to_hex());
    assert_eq!(entry["author"]["companyName"], "Некса Солушнс ДООЕЛ");
    assert_eq!(entry["author"]["isVerified"], false);
    assert_eq!(entry["likesCount"], 1);
    assert_eq!(entry["likedByMe"], true);

    // Same feed through the author's eyes
    let feed = send(
        &app,
        api(Method::GET, "/api/social/feed", Some(&author_token)).to_request(),
    )
    .await;
    assert_eq!(feed.json()["items"][0]["likedByMe"], false);

    let unliked = send(&app, api(Method::POST, &like_uri, Some(&reader_token)).to_request()).await;
    assert_eq!(unliked.json(), json!({ "liked": false, "likesCount": 0 }));
}

#[actix_web::test]
async fn comments_are_attached_to_posts() {
    let state = test_state();
    let (_, token) = seed_user(&state, "petar", false, false).await;
    let (_, commenter) = seed_user(&state, "marija", false, false).await;
    let app = init_app!(state);

    let created = send(
        &app,
        api(Method::POST, "/api/social/posts", Some(&token))
            .set_json(json!({ "content": "Кој доаѓа на саемот?" }))
            .to_request(),
    )
    .await;
    let post_id = created.json()["id"].as_str().unwrap().to_string();

    let comment = send(
        &app,
        api(
            Method::POST,
            &format!("/api/social/posts/{post_id}/comments"),
            Some(&commenter),
        )
        .set_json(json!({ "content": "Јас!" }))
        .to_request(),
    )
    .await;
    assert_eq!(comment.status, StatusCode::CREATED);
    assert_eq!(comment.json()["authorName"], "marija");

    let too_long = send(
        &app,
        api(
            Method::POST,
            &format!("/api/social/posts/{post_id}/comments"),
            Some(&commenter),
        )
        .set_json(json!({ "content": "a".repeat(501) }))
        .to_request(),
    )
    .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);

    let missing = send(
        &app,
        api(
            Method::POST,
            &format!("/api/social/posts/{}/comments", ObjectId::new().to_hex()),
            Some(&commenter),
        )
        .set_json(json!({ "content": "Ало?" }))
        .to_request(),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let feed = send(&app, api(Method::GET, "/api/social/feed", Some(&token)).to_request()).await;
    let comments = feed.json()["items"][0]["comments"].clone();
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["content"], "Јас!");
}

#[actix_web::test]
async fn user_posts_are_filtered_by_author() {
    let state = test_state();
    let (first, first_token) = seed_user(&state, "first", false, false).await;
    let (_, second_token) = seed_user(&state, "second", false, false).await;
    let app = init_app!(state);

    for (token, content) in [
        (&first_token, "прва објава"),
        (&second_token, "втора објава"),
        (&first_token, "трета објава"),
    ] {
        send(
            &app,
            api(Method::POST, "/api/social/posts", Some(token))
                .set_json(json!({ "content": content }))
                .to_request(),
        )
        .await;
    }

    let resp = send(
        &app,
        api(
            Method::GET,
            &format!("/api/social/users/{}/posts", first.id.to_hex()),
            Some(&second_token),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["total"], 2);
    // Newest first
    assert_eq!(body["items"][0]["content"], "трета објава");

    let unknown = send(
        &app,
        api(
            Method::GET,
            &format!("/api/social/users/{}/posts", ObjectId::new().to_hex()),
            Some(&second_token),
        )
        .to_request(),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn only_author_or_admin_delete_posts() {
    let state = test_state();
    let (_, author) = seed_user(&state, "author", false, false).await;
    let (_, stranger) = seed_user(&state, "stranger", false, false).await;
    let (_, admin) = seed_user(&state, "admin", true, false).await;
    let app = init_app!(state);

    let mut ids = Vec::new();
    for content in ["една", "две"] {
        let created = send(
            &app,
            api(Method::POST, "/api/social/posts", Some(&author))
                .set_json(json!({ "content": content }))
                .to_request(),
        )
        .await;
        ids.push(created.json()["id"].as_str().unwrap().to_string());
    }

    let uri = |id: &str| format!("/api/social/posts/{id}");

    let forbidden = send(&app, api(Method::DELETE, &uri(&ids[0]), Some(&stranger)).to_request()).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let own = send(&app, api(Method::DELETE, &uri(&ids[0]), Some(&author)).to_request()).await;
    assert_eq!(own.status, StatusCode::OK);

    let moderated = send(&app, api(Method::DELETE, &uri(&ids[1]), Some(&admin)).to_request()).await;
    assert_eq!(moderated.status, StatusCode::OK);

    let gone = send(&app, api(Method::DELETE, &uri(&ids[1]), Some(&admin)).to_request()).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn huge_page_numbers_return_an_empty_page() {
    let state = test_state();
    let (_, token) = seed_user(&state, "petar", false, false).await;
    let app = init_app!(state);

    send(
        &app,
        api(Method::POST, "/api/social/posts", Some(&token))
            .set_json(json!({ "content": "прва објава" }))
            .to_request(),
    )
    .await;

    let resp = send(
        &app,
        api(
            Method::GET,
            "/api/social/feed?page=18446744073709551615&limit=50",
            Some(&token),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["page"], 100_000);
    assert_eq!(body["total"], 1);
    assert!(body["items"].as_array().unwrap().is_empty());
}
