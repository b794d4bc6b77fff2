/// Storage layer
///
/// One repository trait per collection. `mongo::MongoStore` implements them
/// against MongoDB; `memory::MemoryStore` keeps everything in process and
/// backs the test suite and `database.driver = "memory"`.
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{
    Comment, CompanyVerification, ContactMessage, FeedEntry, Listing, ListingFilter, ListingKind,
    Page, SocialPost, Subscriber, User, VerificationStatus,
};

pub mod memory;
pub mod mongo;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique constraint violated; names the conflicting value kind
    #[error("Duplicate {0}")]
    Duplicate(String),

    #[error("Store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>>;
    /// Case-insensitive lookup
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    /// Lookup by normalized (lower-cased) email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Replace the stored user; `false` if it no longer exists
    async fn update_user(&self, user: &User) -> StoreResult<bool>;
    async fn delete_user(&self, id: &ObjectId) -> StoreResult<bool>;
    /// Users ordered by creation date, newest first
    async fn list_users(&self, page: Page) -> StoreResult<(Vec<User>, u64)>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert_post(&self, post: &SocialPost) -> StoreResult<()>;
    async fn find_post(&self, id: &ObjectId) -> StoreResult<Option<SocialPost>>;
    /// Posts newest first joined with their authors, optionally for one author
    async fn feed(
        &self,
        author: Option<&ObjectId>,
        page: Page,
    ) -> StoreResult<(Vec<FeedEntry>, u64)>;
    /// Like or unlike; `None` if the post does not exist.
    /// Returns whether the user now likes the post and the new like count.
    async fn toggle_like(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
    ) -> StoreResult<Option<(bool, usize)>>;
    async fn add_comment(&self, post_id: &ObjectId, comment: &Comment) -> StoreResult<bool>;
    async fn delete_post(&self, id: &ObjectId) -> StoreResult<bool>;
    async fn delete_posts_by_author(&self, author: &ObjectId) -> StoreResult<u64>;
    async fn delete_posts_by_listing(&self, listing_id: &ObjectId) -> StoreResult<u64>;
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert_listing(&self, kind: ListingKind, listing: &Listing) -> StoreResult<()>;
    async fn find_listing(&self, kind: ListingKind, id: &ObjectId)
        -> StoreResult<Option<Listing>>;
    /// Newest first
    async fn list_listings(
        &self,
        kind: ListingKind,
        filter: &ListingFilter,
        page: Page,
    ) -> StoreResult<(Vec<Listing>, u64)>;
    async fn update_listing(&self, kind: ListingKind, listing: &Listing) -> StoreResult<bool>;
    async fn delete_listing(&self, kind: ListingKind, id: &ObjectId) -> StoreResult<bool>;
}

#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Fails with `Duplicate` if the user already has a pending request
    async fn insert_verification(&self, request: &CompanyVerification) -> StoreResult<()>;
    async fn find_verification(&self, id: &ObjectId) -> StoreResult<Option<CompanyVerification>>;
    async fn latest_verification_for(
        &self,
        user_id: &ObjectId,
    ) -> StoreResult<Option<CompanyVerification>>;
    async fn has_pending_verification(&self, user_id: &ObjectId) -> StoreResult<bool>;
    /// Newest first, optionally filtered by status
    async fn list_verifications(
        &self,
        status: Option<VerificationStatus>,
        page: Page,
    ) -> StoreResult<(Vec<CompanyVerification>, u64)>;
    async fn update_verification(&self, request: &CompanyVerification) -> StoreResult<bool>;
}

#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    async fn find_subscriber(&self, email: &str) -> StoreResult<Option<Subscriber>>;
    async fn insert_subscriber(&self, subscriber: &Subscriber) -> StoreResult<()>;
    async fn update_subscriber(&self, subscriber: &Subscriber) -> StoreResult<bool>;
    async fn list_subscribers(&self, page: Page) -> StoreResult<(Vec<Subscriber>, u64)>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn insert_message(&self, message: &ContactMessage) -> StoreResult<()>;
    /// Newest first
    async fn list_messages(&self, page: Page) -> StoreResult<(Vec<ContactMessage>, u64)>;
    async fn mark_message_handled(&self, id: &ObjectId) -> StoreResult<bool>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}

/// Every repository a store provides
pub trait Store:
    UserRepository
    + PostRepository
    + ListingRepository
    + VerificationRepository
    + SubscriberRepository
    + ContactRepository
    + StoreHealth
    + 'static
{
}

impl<T> Store for T where
    T: UserRepository
        + PostRepository
        + ListingRepository
        + VerificationRepository
        + SubscriberRepository
        + ContactRepository
        + StoreHealth
        + 'static
{
}

/// Repository handles shared through application state
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub verifications: Arc<dyn VerificationRepository>,
    pub subscribers: Arc<dyn SubscriberRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub health: Arc<dyn StoreHealth>,
}

impl Repositories {
    pub fn from_store<S: Store>(store: Arc<S>) -> Self {
        Self {
            users: store.clone(),
            posts: store.clone(),
            listings: store.clone(),
            verifications: store.clone(),
            subscribers: store.clone(),
            contacts: store.clone(),
            health: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(memory::MemoryStore::default()))
    }
}
