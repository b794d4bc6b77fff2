use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::{to_utc, ListingKind, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PostType {
    #[default]
    UserPost,
    NewsShare,
    InvestmentShare,
    BlogShare,
}

impl From<ListingKind> for PostType {
    fn from(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Investments => PostType::InvestmentShare,
            ListingKind::News => PostType::NewsShare,
            ListingKind::Blogs => PostType::BlogShare,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub author: ObjectId,
    pub author_name: String,
    pub content: String,
    pub created_at: bson::DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub content: String,
    pub author: ObjectId,
    #[serde(default)]
    pub post_type: PostType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<ObjectId>,
    #[serde(default)]
    pub likes: Vec<ObjectId>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: bson::DateTime,
}

impl SocialPost {
    pub fn new(author: ObjectId, content: String, post_type: PostType) -> Self {
        Self {
            id: ObjectId::new(),
            content,
            author,
            post_type,
            listing_id: None,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: bson::DateTime::now(),
        }
    }
}

/// Post joined with its author, as returned by feed queries
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub post: SocialPost,
    /// `None` when the author account no longer exists
    pub author: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: String,
    pub username: String,
    pub company_name: String,
    pub is_verified: bool,
}

impl AuthorSummary {
    fn of(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            username: user.username.clone(),
            company_name: user.company_info.company_name.clone(),
            is_verified: user.is_verified,
        }
    }

    fn deleted(id: ObjectId) -> Self {
        Self {
            id: id.to_hex(),
            username: "[deleted]".to_string(),
            company_name: String::new(),
            is_verified: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub author: String,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(c: &Comment) -> Self {
        Self {
            id: c.id.to_hex(),
            author: c.author.to_hex(),
            author_name: c.author_name.clone(),
            content: c.content.clone(),
            created_at: to_utc(c.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub content: String,
    pub author: AuthorSummary,
    pub post_type: PostType,
    pub listing_id: Option<String>,
    pub likes_count: usize,
    pub liked_by_me: bool,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn build(entry: &FeedEntry, viewer: &ObjectId) -> Self {
        let post = &entry.post;
        Self {
            id: post.id.to_hex(),
            content: post.content.clone(),
            author: entry
                .author
                .as_ref()
                .map(AuthorSummary::of)
                .unwrap_or_else(|| AuthorSummary::deleted(post.author)),
            post_type: post.post_type,
            listing_id: post.listing_id.map(|id| id.to_hex()),
            likes_count: post.likes.len(),
            liked_by_me: post.likes.contains(viewer),
            comments: post.comments.iter().map(CommentResponse::from).collect(),
            created_at: to_utc(post.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthProvider;

    #[test]
    fn test_post_response_shape() {
        let viewer = ObjectId::new();
        let mut author = User::new("marko", None, AuthProvider::Local);
        author.company_info.company_name = "Марко ДООЕЛ".into();
        author.is_verified = true;

        let mut post = SocialPost::new(author.id, "Здраво".into(), PostType::UserPost);
        post.likes.push(viewer);

        let resp = PostResponse::build(
            &FeedEntry {
                post,
                author: Some(author),
            },
            &viewer,
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["author"]["companyName"], "Марко ДООЕЛ");
        assert_eq!(json["author"]["isVerified"], true);
        assert_eq!(json["likesCount"], 1);
        assert_eq!(json["likedByMe"], true);
        assert_eq!(json["postType"], "userPost");
    }

    #[test]
    fn test_missing_author_is_placeholder() {
        let post = SocialPost::new(ObjectId::new(), "x".into(), PostType::NewsShare);
        let resp = PostResponse::build(&FeedEntry { post, author: None }, &ObjectId::new());
        assert_eq!(resp.author.username, "[deleted]");
        assert!(!resp.liked_by_me);
    }
}
