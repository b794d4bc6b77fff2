/// Social feed: posts, likes and comments
use actix_middleware::AuthUser;
use mongodb::bson::{self, oid::ObjectId};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::{PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{
    Comment, CommentResponse, FeedEntry, LikeResponse, Page, Paginated, PostResponse, PostType,
    SocialPost,
};
use crate::services::{user_id, UserService};
use crate::state::AppState;

const MAX_POST_CHARS: usize = 2000;
const MAX_COMMENT_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub post_type: Option<PostType>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// Trimmed content between 1 and `max` characters
fn checked_content(raw: &str, max: usize, what: &str) -> Result<String> {
    let content = raw.trim();
    let chars = content.chars().count();
    if chars == 0 || chars > max {
        return Err(AppError::Validation(format!(
            "{what} must be between 1 and {max} characters"
        )));
    }
    Ok(content.to_string())
}

pub struct SocialService {
    posts: Arc<dyn PostRepository>,
    users_repo: Arc<dyn UserRepository>,
    users: UserService,
}

impl SocialService {
    pub fn new(state: &AppState) -> Self {
        Self {
            posts: state.repos.posts.clone(),
            users_repo: state.repos.users.clone(),
            users: UserService::new(state),
        }
    }

    fn post_not_found() -> AppError {
        AppError::NotFound("Post not found".to_string())
    }

    pub async fn feed(&self, auth: &AuthUser, page: Page) -> Result<Paginated<PostResponse>> {
        let viewer = user_id(auth)?;
        let (entries, total) = self.posts.feed(None, page).await?;
        Ok(Paginated::new(entries, page, total).map(|e| PostResponse::build(&e, &viewer)))
    }

    pub async fn user_posts(
        &self,
        auth: &AuthUser,
        author: &ObjectId,
        page: Page,
    ) -> Result<Paginated<PostResponse>> {
        let viewer = user_id(auth)?;
        if self.users_repo.find_user(author).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        let (entries, total) = self.posts.feed(Some(author), page).await?;
        Ok(Paginated::new(entries, page, total).map(|e| PostResponse::build(&e, &viewer)))
    }

    pub async fn create(&self, auth: &AuthUser, req: CreatePostRequest) -> Result<PostResponse> {
        let post_type = req.post_type.unwrap_or_default();
        if post_type != PostType::UserPost && !auth.is_admin {
            return Err(AppError::Forbidden(
                "Only administrators can publish share posts".to_string(),
            ));
        }
        let content = checked_content(&req.content, MAX_POST_CHARS, "Post content")?;

        let author = self.users.current(auth).await?;
        let post = SocialPost::new(author.id, content, post_type);
        self.posts.insert_post(&post).await?;

        tracing::info!(user_id = %author.id, post_id = %post.id, "Post created");

        let viewer = author.id;
        Ok(PostResponse::build(
            &FeedEntry {
                post,
                author: Some(author),
            },
            &viewer,
        ))
    }

    pub async fn toggle_like(&self, auth: &AuthUser, post_id: &ObjectId) -> Result<LikeResponse> {
        let viewer = user_id(auth)?;
        let (liked, likes_count) = self
            .posts
            .toggle_like(post_id, &viewer)
            .await?
            .ok_or_else(Self::post_not_found)?;

        tracing::debug!(user_id = %viewer, post_id = %post_id, liked, "Like toggled");
        Ok(LikeResponse { liked, likes_count })
    }

    pub async fn comment(
        &self,
        auth: &AuthUser,
        post_id: &ObjectId,
        req: CommentRequest,
    ) -> Result<CommentResponse> {
        let content = checked_content(&req.content, MAX_COMMENT_CHARS, "Comment")?;
        let author = self.users.current(auth).await?;

        let comment = Comment {
            id: ObjectId::new(),
            author: author.id,
            author_name: author.username.clone(),
            content,
            created_at: bson::DateTime::now(),
        };
        if !self.posts.add_comment(post_id, &comment).await? {
            return Err(Self::post_not_found());
        }

        tracing::info!(user_id = %author.id, post_id = %post_id, "Comment added");
        Ok(CommentResponse::from(&comment))
    }

    pub async fn delete(&self, auth: &AuthUser, post_id: &ObjectId) -> Result<()> {
        let post = self
            .posts
            .find_post(post_id)
            .await?
            .ok_or_else(Self::post_not_found)?;

        if !auth.is_admin && post.author != user_id(auth)? {
            return Err(AppError::Forbidden(
                "Only the author or an admin can delete this post".to_string(),
            ));
        }

        self.posts.delete_post(post_id).await?;
        tracing::info!(user_id = %auth.user_id, post_id = %post_id, "Post deleted");
        Ok(())
    }
}
