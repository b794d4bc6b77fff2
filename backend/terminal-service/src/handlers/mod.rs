/// HTTP handlers
///
/// Handlers stay thin: extract, build the service from `AppState`, map the
/// result to a response. Access rules live in the services.
pub mod auth;
pub mod contact;
pub mod csrf;
pub mod documents;
pub mod health;
pub mod listings;
pub mod marketing;
pub mod social;
pub mod users;
pub mod verification;
