/// Business logic layer
///
/// Services are cheap to construct from [`AppState`](crate::state::AppState)
/// and hold only `Arc` handles; handlers build one per request.
pub mod auth;
pub mod contact;
pub mod documents;
pub mod listings;
pub mod marketing;
pub mod oauth;
pub mod social;
pub mod users;
pub mod verification;

pub use auth::AuthService;
pub use contact::ContactService;
pub use documents::DocumentService;
pub use listings::ListingService;
pub use marketing::MarketingService;
pub use oauth::OAuthService;
pub use social::SocialService;
pub use users::UserService;
pub use verification::VerificationService;

use actix_middleware::AuthUser;
use mongodb::bson::oid::ObjectId;

use crate::error::{AppError, Result};

pub fn require_admin(user: &AuthUser) -> Result<()> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

/// Id of the authenticated user; a token with a malformed subject is rejected
pub fn user_id(user: &AuthUser) -> Result<ObjectId> {
    ObjectId::parse_str(&user.user_id)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
}

/// Trimmed value, `None` when blank
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
