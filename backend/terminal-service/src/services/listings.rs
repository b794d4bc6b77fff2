/// Investments, news and blog listings
///
/// Listing pages are cached per kind; every write drops the cached pages of
/// its kind. Creating a listing also publishes a share post to the feed.
use actix_middleware::AuthUser;
use mongodb::bson::{self, oid::ObjectId};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::db::{ListingRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::models::{
    InvestmentDetails, Listing, ListingFilter, ListingKind, ListingResponse, Page, Paginated,
    PostType, SocialPost,
};
use crate::services::{non_blank, require_admin, user_id, UserService};
use crate::state::{AppState, ListingCache};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(nested)]
    pub investment: Option<InvestmentDetails>,
}

impl ListingRequest {
    fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.content = self.content.trim().to_string();
        self.category = self.category.trim().to_string();
        self.tags = self
            .tags
            .iter()
            .filter_map(|t| non_blank(Some(t)))
            .collect();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListingQuery {
    pub fn filter(&self) -> ListingFilter {
        ListingFilter {
            category: non_blank(self.category.as_deref()),
            search: non_blank(self.search.as_deref()),
        }
    }
}

pub struct ListingService {
    kind: ListingKind,
    listings: Arc<dyn ListingRepository>,
    posts: Arc<dyn PostRepository>,
    cache: Arc<ListingCache>,
    users: UserService,
}

/// Cache key for one listing page. Filter values are percent-encoded so a
/// `:` inside them cannot shift the key segments.
fn cache_key(kind: ListingKind, filter: &ListingFilter, page: Page) -> String {
    let search = filter
        .search
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();
    format!(
        "{}:{}:{}:{}:{}",
        kind,
        urlencoding::encode(filter.category.as_deref().unwrap_or_default()),
        urlencoding::encode(&search),
        page.page,
        page.limit
    )
}

impl ListingService {
    pub fn new(state: &AppState, kind: ListingKind) -> Self {
        Self {
            kind,
            listings: state.repos.listings.clone(),
            posts: state.repos.posts.clone(),
            cache: state.listing_cache.clone(),
            users: UserService::new(state),
        }
    }

    fn invalidate(&self) {
        self.cache.invalidate_prefix(&format!("{}:", self.kind));
    }

    fn not_found(&self) -> AppError {
        AppError::NotFound(format!("{} not found", self.kind.label()))
    }

    pub async fn list(
        &self,
        filter: &ListingFilter,
        page: Page,
    ) -> Result<Paginated<ListingResponse>> {
        let key = cache_key(self.kind, filter, page);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let (items, total) = self.listings.list_listings(self.kind, filter, page).await?;
        let kind = self.kind;
        let result = Paginated::new(items, page, total).map(|l| ListingResponse::build(kind, &l));

        self.cache.insert(key, result.clone());
        Ok(result)
    }

    pub async fn get(&self, id: &ObjectId) -> Result<ListingResponse> {
        let listing = self
            .listings
            .find_listing(self.kind, id)
            .await?
            .ok_or_else(|| self.not_found())?;
        Ok(ListingResponse::build(self.kind, &listing))
    }

    pub async fn create(&self, auth: &AuthUser, req: ListingRequest) -> Result<ListingResponse> {
        if self.kind.admin_only_writes() {
            require_admin(auth)?;
        }
        let author = self.users.current(auth).await?;
        if !self.kind.admin_only_writes() && !author.profile_complete {
            return Err(AppError::Forbidden(
                "Complete your company profile before publishing".to_string(),
            ));
        }

        let req = req.normalized();
        req.validate()?;
        self.check_investment(&req)?;

        let now = bson::DateTime::now();
        let author_name = non_blank(Some(&author.company_info.company_name))
            .unwrap_or_else(|| author.username.clone());
        let listing = Listing {
            id: ObjectId::new(),
            title: req.title,
            content: req.content,
            category: req.category,
            tags: req.tags,
            author: author.id,
            author_name,
            investment: req.investment,
            created_at: now,
            updated_at: now,
        };

        self.listings.insert_listing(self.kind, &listing).await?;
        self.invalidate();
        tracing::info!(
            user_id = %author.id,
            listing_id = %listing.id,
            kind = %self.kind,
            "Listing created"
        );

        self.publish_share(&listing).await;
        Ok(ListingResponse::build(self.kind, &listing))
    }

    pub async fn update(
        &self,
        auth: &AuthUser,
        id: &ObjectId,
        req: ListingRequest,
    ) -> Result<ListingResponse> {
        let mut listing = self.owned(auth, id).await?;

        let req = req.normalized();
        req.validate()?;
        self.check_investment(&req)?;

        listing.title = req.title;
        listing.content = req.content;
        listing.category = req.category;
        listing.tags = req.tags;
        listing.investment = req.investment;
        listing.updated_at = bson::DateTime::now();

        if !self.listings.update_listing(self.kind, &listing).await? {
            return Err(self.not_found());
        }
        self.invalidate();
        tracing::info!(user_id = %auth.user_id, listing_id = %listing.id, kind = %self.kind, "Listing updated");

        Ok(ListingResponse::build(self.kind, &listing))
    }

    pub async fn delete(&self, auth: &AuthUser, id: &ObjectId) -> Result<()> {
        let listing = self.owned(auth, id).await?;

        if !self.listings.delete_listing(self.kind, &listing.id).await? {
            return Err(self.not_found());
        }
        let shares = self.posts.delete_posts_by_listing(&listing.id).await?;
        self.invalidate();
        tracing::info!(
            user_id = %auth.user_id,
            listing_id = %listing.id,
            kind = %self.kind,
            shares_removed = shares,
            "Listing deleted"
        );
        Ok(())
    }

    /// Listing the caller may modify: its author or an admin
    async fn owned(&self, auth: &AuthUser, id: &ObjectId) -> Result<Listing> {
        let listing = self
            .listings
            .find_listing(self.kind, id)
            .await?
            .ok_or_else(|| self.not_found())?;

        if !auth.is_admin && listing.author != user_id(auth)? {
            return Err(AppError::Forbidden(format!(
                "Only the author or an admin can modify this {}",
                self.kind.label().to_lowercase()
            )));
        }
        Ok(listing)
    }

    fn check_investment(&self, req: &ListingRequest) -> Result<()> {
        match (self.kind, &req.investment) {
            (ListingKind::Investments, None) => Err(AppError::Validation(
                "Investment details are required".to_string(),
            )),
            (ListingKind::News | ListingKind::Blogs, Some(_)) => Err(AppError::Validation(
                "Investment details are only allowed on investments".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Share posts are best effort; the listing is already stored
    async fn publish_share(&self, listing: &Listing) {
        let mut post = SocialPost::new(
            listing.author,
            format!("{}: {}", self.kind.label(), listing.title),
            PostType::from(self.kind),
        );
        post.listing_id = Some(listing.id);

        if let Err(e) = self.posts.insert_post(&post).await {
            tracing::warn!(listing_id = %listing.id, error = %e, "Failed to publish share post");
        }
    }
}
