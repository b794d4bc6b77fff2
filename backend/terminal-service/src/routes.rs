/// Route table
///
/// Everything lives under `/api` behind the CSRF middleware. Protected
/// resources are wrapped with the JWT middleware individually so public
/// endpoints sharing a prefix (contact form, marketing, login) stay open.
/// Optional route groups follow `features.*`.
use actix_middleware::{CsrfMiddleware, JwtAuthMiddleware};
use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::error::{AppError, Result};
use crate::handlers::{
    auth, contact, csrf, documents, health, listings, marketing, social, users, verification,
};
use crate::models::ListingKind;
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    let jwt = JwtAuthMiddleware::new(state.jwt.clone());
    let features = &state.config.features;

    cfg.app_data(web::Data::new(state.clone()))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config());

    let mut api = web::scope("/api")
        .wrap(CsrfMiddleware::new(state.config.csrf.clone()))
        .route("/health", web::get().to(health::health))
        .route("/csrf-token", web::get().to(csrf::csrf_token))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .route("/oauth/{provider}", web::get().to(auth::oauth_start))
                .route(
                    "/oauth/{provider}/callback",
                    web::get().to(auth::oauth_callback),
                )
                .service(
                    web::resource("/me")
                        .wrap(jwt.clone())
                        .route(web::get().to(auth::me)),
                )
                .service(
                    web::resource("/logout")
                        .wrap(jwt.clone())
                        .route(web::post().to(auth::logout)),
                ),
        )
        .service(
            web::scope("/users")
                .wrap(jwt.clone())
                .service(
                    web::resource("/profile")
                        .route(web::get().to(users::get_profile))
                        .route(web::put().to(users::update_profile)),
                )
                .route("/password", web::put().to(users::change_password))
                .route("", web::get().to(users::list_users))
                .route("/{id}/admin", web::patch().to(users::set_admin))
                .route("/{id}", web::delete().to(users::delete_user)),
        );

    if features.documents {
        api = api.service(
            web::scope("/documents")
                .wrap(jwt.clone())
                .route("/templates", web::get().to(documents::list_templates))
                .route("/{template_id}", web::post().to(documents::generate)),
        );
    }

    for kind in ListingKind::ALL {
        let enabled = match kind {
            ListingKind::Investments => features.investments,
            ListingKind::News => features.news,
            ListingKind::Blogs => features.blogs,
        };
        if enabled {
            let jwt = jwt.clone();
            api = api.configure(move |cfg| listing_routes(cfg, kind, jwt));
        }
    }

    if features.social {
        api = api.service(
            web::scope("/social")
                .wrap(jwt.clone())
                .route("/feed", web::get().to(social::feed))
                .route("/users/{user_id}/posts", web::get().to(social::user_posts))
                .route("/posts", web::post().to(social::create_post))
                .route("/posts/{id}", web::delete().to(social::delete_post))
                .route("/posts/{id}/like", web::post().to(social::toggle_like))
                .route("/posts/{id}/comments", web::post().to(social::add_comment)),
        );
    }

    if features.verification {
        api = api.service(
            web::scope("/verification")
                .wrap(jwt.clone())
                .service(
                    web::resource("")
                        .route(web::post().to(verification::submit))
                        .route(web::get().to(verification::list)),
                )
                .route("/status", web::get().to(verification::status))
                .route("/{id}/approve", web::post().to(verification::approve))
                .route("/{id}/reject", web::post().to(verification::reject)),
        );
    }

    if features.marketing {
        api = api.service(
            web::scope("/marketing")
                .route("/subscribe", web::post().to(marketing::subscribe))
                .route("/unsubscribe", web::post().to(marketing::unsubscribe))
                .service(
                    web::resource("/subscribers")
                        .wrap(jwt.clone())
                        .route(web::get().to(marketing::list_subscribers)),
                ),
        );
    }

    if features.contact {
        api = api.service(
            web::scope("/contact")
                .route("", web::post().to(contact::submit))
                .service(
                    web::scope("/messages")
                        .wrap(jwt.clone())
                        .route("", web::get().to(contact::list_messages))
                        .route("/{id}/handled", web::patch().to(contact::mark_handled)),
                ),
        );
    }

    cfg.service(api);
}

/// One listing collection; the kind reaches handlers as `web::Data<ListingKind>`
fn listing_routes(cfg: &mut web::ServiceConfig, kind: ListingKind, jwt: JwtAuthMiddleware) {
    cfg.service(
        web::scope(&format!("/{kind}"))
            .app_data(web::Data::new(kind))
            .wrap(jwt)
            .service(
                web::resource("")
                    .route(web::get().to(listings::list))
                    .route(web::post().to(listings::create)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(listings::get))
                    .route(web::put().to(listings::update))
                    .route(web::delete().to(listings::delete)),
            ),
    );
}

/// Fallback for unmatched routes
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse> {
    Err(AppError::NotFound(format!("Route not found: {}", req.path())))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err, _req| {
            let message = match &err {
                error::JsonPayloadError::ContentType => {
                    "Expected a JSON request body".to_string()
                }
                other => format!("Invalid JSON body: {other}"),
            };
            AppError::BadRequest(message).into()
        })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid query: {err}")).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid path: {err}")).into())
}
