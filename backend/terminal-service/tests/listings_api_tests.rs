#[macro_use]
mod common;

use actix_web::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{api, send, seed_user, test_state};

fn news(title: &str) -> Value {
    json!({
        "title": title,
        "content": "Нови правила за е-фактурирање од јануари.",
        "category": "regulation",
        "tags": ["tax", " "],
    })
}

fn investment(title: &str) -> Value {
    json!({
        "title": title,
        "content": "Фотонапонска централа во Штип.",
        "category": "energy",
        "investment": {
            "amount": 250000.0,
            "currency": "EUR",
            "location": "Штип",
            "sector": "energy",
            "contactEmail": "invest@example.com",
        },
    })
}

#[actix_web::test]
async fn listings_require_a_token() {
    let state = test_state();
    let app = init_app!(state);

    let resp = send(&app, api(Method::GET, "/api/news", None).to_request()).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn only_admins_publish_news() {
    let state = test_state();
    let (_, token) = seed_user(&state, "reader", false, true).await;
    let app = init_app!(state);

    let resp = send(
        &app,
        api(Method::POST, "/api/news", Some(&token))
            .set_json(news("Нов закон"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn created_news_is_listed_and_shared_to_the_feed() {
    let state = test_state();
    let (admin, token) = seed_user(&state, "editor", true, true).await;
    let app = init_app!(state);

    // Prime the cache with an empty page
    let empty = send(&app, api(Method::GET, "/api/news", Some(&token)).to_request()).await;
    assert_eq!(empty.json()["total"], 0);

    let created = send(
        &app,
        api(Method::POST, "/api/news", Some(&token))
            .set_json(news("Нов закон за ДДВ"))
            .to_request(),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let body = created.json();
    assert_eq!(body["kind"], "news");
    assert_eq!(body["author"], admin.id.to_hex());
    assert_eq!(body["authorName"], "Некса Солушнс ДООЕЛ");
    assert_eq!(body["tags"], json!(["tax"]));
    let id = body["id"].as_str().unwrap().to_string();

    // The write invalidated the cached empty page
    let listed = send(&app, api(Method::GET, "/api/news", Some(&token)).to_request()).await;
    assert_eq!(listed.json()["total"], 1);

    let fetched = send(
        &app,
        api(Method::GET, &format!("/api/news/{id}"), Some(&token)).to_request(),
    )
    .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["title"], "Нов закон за ДДВ");

    let feed = send(&app, api(Method::GET, "/api/social/feed", Some(&token)).to_request()).await;
    let posts = feed.json()["items"].as_array().unwrap().clone();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["postType"], "newsShare");
    assert_eq!(posts[0]["listingId"], id.as_str());
    assert_eq!(posts[0]["content"], "News article: Нов закон за ДДВ");
}

#[actix_web::test]
async fn search_and_category_filters() {
    let state = test_state();
    let (_, token) = seed_user(&state, "editor", true, true).await;
    let app = init_app!(state);

    for title in ["Solar park Štip", "Wind farm Bogdanci", "Solar roofs Skopje"] {
        let resp = send(
            &app,
            api(Method::POST, "/api/investments", Some(&token))
                .set_json(investment(title))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status, StatusCode::CREATED);
    }

    let solar = send(
        &app,
        api(Method::GET, "/api/investments?search=SOLAR", Some(&token)).to_request(),
    )
    .await;
    assert_eq!(solar.json()["total"], 2);

    let other = send(
        &app,
        api(Method::GET, "/api/investments?category=mining", Some(&token)).to_request(),
    )
    .await;
    assert_eq!(other.json()["total"], 0);

    let clamped = send(
        &app,
        api(Method::GET, "/api/investments?limit=500&page=0", Some(&token)).to_request(),
    )
    .await;
    let body = clamped.json();
    assert_eq!(body["limit"], 50);
    assert_eq!(body["page"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn blogs_need_a_complete_profile() {
    let state = test_state();
    let (_, incomplete) = seed_user(&state, "newcomer", false, false).await;
    let (_, complete) = seed_user(&state, "writer", false, true).await;
    let app = init_app!(state);

    let blog = json!({ "title": "Како да почнете бизнис", "content": "Чекор по чекор." });

    let rejected = send(
        &app,
        api(Method::POST, "/api/blogs", Some(&incomplete))
            .set_json(&blog)
            .to_request(),
    )
    .await;
    assert_eq!(rejected.status, StatusCode::FORBIDDEN);

    let accepted = send(
        &app,
        api(Method::POST, "/api/blogs", Some(&complete))
            .set_json(&blog)
            .to_request(),
    )
    .await;
    assert_eq!(accepted.status, StatusCode::CREATED);
}

#[actix_web::test]
async fn listing_validation() {
    let state = test_state();
    let (_, token) = seed_user(&state, "editor", true, true).await;
    let app = init_app!(state);

    let short_title = send(
        &app,
        api(Method::POST, "/api/news", Some(&token))
            .set_json(news("  ab "))
            .to_request(),
    )
    .await;
    assert_eq!(short_title.status, StatusCode::BAD_REQUEST);

    let missing_details = send(
        &app,
        api(Method::POST, "/api/investments", Some(&token))
            .set_json(news("Investment without details"))
            .to_request(),
    )
    .await;
    assert_eq!(missing_details.status, StatusCode::BAD_REQUEST);

    let misplaced_details = send(
        &app,
        api(Method::POST, "/api/news", Some(&token))
            .set_json(investment("News with details"))
            .to_request(),
    )
    .await;
    assert_eq!(misplaced_details.status, StatusCode::BAD_REQUEST);

    let unknown = send(
        &app,
        api(
            Method::GET,
            &format!("/api/news/{}", mongodb::bson::oid::ObjectId::new().to_hex()),
            Some(&token),
        )
        .to_request(),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn only_author_or_admin_modify_blogs() {
    let state = test_state();
    let (_, author) = seed_user(&state, "author", false, true).await;
    let (_, stranger) = seed_user(&state, "stranger", false, true).await;
    let (_, admin) = seed_user(&state, "admin", true, false).await;
    let app = init_app!(state);

    let created = send(
        &app,
        api(Method::POST, "/api/blogs", Some(&author))
            .set_json(json!({ "title": "Прв блог", "content": "Содржина" }))
            .to_request(),
    )
    .await;
    let id = created.json()["id"].as_str().unwrap().to_string();
    let uri = format!("/api/blogs/{id}");
    let edit = json!({ "title": "Изменет блог", "content": "Нова содржина" });

    let foreign = send(
        &app,
        api(Method::PUT, &uri, Some(&stranger)).set_json(&edit).to_request(),
    )
    .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let own = send(
        &app,
        api(Method::PUT, &uri, Some(&author)).set_json(&edit).to_request(),
    )
    .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.json()["title"], "Изменет блог");

    let foreign_delete = send(&app, api(Method::DELETE, &uri, Some(&stranger)).to_request()).await;
    assert_eq!(foreign_delete.status, StatusCode::FORBIDDEN);

    let deleted = send(&app, api(Method::DELETE, &uri, Some(&admin)).to_request()).await;
    assert_eq!(deleted.status, StatusCode::OK);

    // The share post went with it
    let feed = send(&app, api(Method::GET, "/api/social/feed", Some(&author)).to_request()).await;
    assert_eq!(feed.json()["total"], 0);

    let gone = send(&app, api(Method::GET, &uri, Some(&author)).to_request()).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
