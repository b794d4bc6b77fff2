/// Data models for terminal-service
///
/// Storage models mirror MongoDB documents (camelCase fields, `_id`
/// ObjectIds, BSON datetimes). Response DTOs expose ids as hex strings and
/// timestamps as RFC 3339.
pub mod contact;
pub mod listing;
pub mod marketing;
pub mod pagination;
pub mod social;
pub mod user;
pub mod verification;

pub use contact::{ContactMessage, ContactMessageResponse};
pub use listing::{InvestmentDetails, Listing, ListingFilter, ListingKind, ListingResponse};
pub use marketing::{Subscriber, SubscriberResponse};
pub use pagination::{Page, PageQuery, Paginated};
pub use social::{Comment, CommentResponse, FeedEntry, LikeResponse, PostResponse, PostType, SocialPost};
pub use user::{AuthProvider, CompanyInfo, User, UserResponse};
pub use verification::{
    CompanyVerification, VerificationDocument, VerificationResponse, VerificationStatus,
};

use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};

use crate::error::AppError;

/// Parse a 24-char hex id from a path segment
pub fn parse_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(format!("Invalid id: {raw}")))
}

pub(crate) fn to_utc(dt: bson::DateTime) -> DateTime<Utc> {
    dt.to_chrono()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(parse_id("42"), Err(AppError::BadRequest(_))));
    }
}
