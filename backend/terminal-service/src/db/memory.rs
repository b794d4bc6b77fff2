/// In-process store
///
/// Enforces the same unique constraints as the MongoDB indexes so services
/// behave identically against both backends.
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{
    ContactRepository, ListingRepository, PostRepository, StoreError, StoreHealth, StoreResult,
    SubscriberRepository, UserRepository, VerificationRepository,
};
use crate::models::{
    Comment, CompanyVerification, ContactMessage, FeedEntry, Listing, ListingFilter, ListingKind,
    Page, SocialPost, Subscriber, User, VerificationStatus,
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<ObjectId, User>>,
    posts: RwLock<HashMap<ObjectId, SocialPost>>,
    listings: RwLock<HashMap<(ListingKind, ObjectId), Listing>>,
    verifications: RwLock<HashMap<ObjectId, CompanyVerification>>,
    subscribers: RwLock<HashMap<ObjectId, Subscriber>>,
    contacts: RwLock<HashMap<ObjectId, ContactMessage>>,
}

/// Sort newest first (ties broken by id) and cut out one page
fn paginate<T, K: Ord>(mut items: Vec<T>, page: Page, key: impl Fn(&T) -> K) -> (Vec<T>, u64) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.skip() as usize)
        .take(page.limit as usize)
        .collect();
    (items, total)
}

fn user_conflict(existing: &User, candidate: &User) -> Option<StoreError> {
    if existing.id == candidate.id {
        return None;
    }
    if existing.username_key == candidate.username_key {
        return Some(StoreError::Duplicate("Username".to_string()));
    }
    match (&existing.email, &candidate.email) {
        (Some(a), Some(b)) if a == b => Some(StoreError::Duplicate("Email".to_string())),
        _ => None,
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(err) = users.values().find_map(|u| user_conflict(u, user)) {
            return Err(err);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let key = username.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username_key == key)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn update_user(&self, user: &User) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Ok(false);
        }
        if let Some(err) = users.values().find_map(|u| user_conflict(u, user)) {
            return Err(err);
        }
        users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn delete_user(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.users.write().await.remove(id).is_some())
    }

    async fn list_users(&self, page: Page) -> StoreResult<(Vec<User>, u64)> {
        let users: Vec<User> = self.users.read().await.values().cloned().collect();
        Ok(paginate(users, page, |u| (u.created_at, u.id)))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn insert_post(&self, post: &SocialPost) -> StoreResult<()> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_post(&self, id: &ObjectId) -> StoreResult<Option<SocialPost>> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn feed(
        &self,
        author: Option<&ObjectId>,
        page: Page,
    ) -> StoreResult<(Vec<FeedEntry>, u64)> {
        let posts: Vec<SocialPost> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| author.map_or(true, |a| &p.author == a))
            .cloned()
            .collect();
        let (posts, total) = paginate(posts, page, |p| (p.created_at, p.id));

        let users = self.users.read().await;
        let entries = posts
            .into_iter()
            .map(|post| FeedEntry {
                author: users.get(&post.author).cloned(),
                post,
            })
            .collect();
        Ok((entries, total))
    }

    async fn toggle_like(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
    ) -> StoreResult<Option<(bool, usize)>> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.get_mut(post_id) else {
            return Ok(None);
        };

        let liked = if let Some(pos) = post.likes.iter().position(|id| id == user_id) {
            post.likes.remove(pos);
            false
        } else {
            post.likes.push(*user_id);
            true
        };
        Ok(Some((liked, post.likes.len())))
    }

    async fn add_comment(&self, post_id: &ObjectId, comment: &Comment) -> StoreResult<bool> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(post_id) {
            Some(post) => {
                post.comments.push(comment.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_post(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.posts.write().await.remove(id).is_some())
    }

    async fn delete_posts_by_author(&self, author: &ObjectId) -> StoreResult<u64> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|_, p| &p.author != author);
        Ok((before - posts.len()) as u64)
    }

    async fn delete_posts_by_listing(&self, listing_id: &ObjectId) -> StoreResult<u64> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|_, p| p.listing_id.as_ref() != Some(listing_id));
        Ok((before - posts.len()) as u64)
    }
}

fn matches_filter(listing: &Listing, filter: &ListingFilter) -> bool {
    let category_ok = filter
        .category
        .as_ref()
        .map_or(true, |c| &listing.category == c);
    let search_ok = filter.search.as_ref().map_or(true, |s| {
        listing.title.to_lowercase().contains(&s.to_lowercase())
    });
    category_ok && search_ok
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn insert_listing(&self, kind: ListingKind, listing: &Listing) -> StoreResult<()> {
        self.listings
            .write()
            .await
            .insert((kind, listing.id), listing.clone());
        Ok(())
    }

    async fn find_listing(
        &self,
        kind: ListingKind,
        id: &ObjectId,
    ) -> StoreResult<Option<Listing>> {
        Ok(self.listings.read().await.get(&(kind, *id)).cloned())
    }

    async fn list_listings(
        &self,
        kind: ListingKind,
        filter: &ListingFilter,
        page: Page,
    ) -> StoreResult<(Vec<Listing>, u64)> {
        let listings: Vec<Listing> = self
            .listings
            .read()
            .await
            .iter()
            .filter(|((k, _), l)| *k == kind && matches_filter(l, filter))
            .map(|(_, l)| l.clone())
            .collect();
        Ok(paginate(listings, page, |l| (l.created_at, l.id)))
    }

    async fn update_listing(&self, kind: ListingKind, listing: &Listing) -> StoreResult<bool> {
        let mut listings = self.listings.write().await;
        match listings.get_mut(&(kind, listing.id)) {
            Some(existing) => {
                *existing = listing.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_listing(&self, kind: ListingKind, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.listings.write().await.remove(&(kind, *id)).is_some())
    }
}

#[async_trait]
impl VerificationRepository for MemoryStore {
    async fn insert_verification(&self, request: &CompanyVerification) -> StoreResult<()> {
        let mut requests = self.verifications.write().await;
        let pending_exists = requests.values().any(|r| {
            r.user_id == request.user_id && r.status == VerificationStatus::Pending
        });
        if pending_exists && request.status == VerificationStatus::Pending {
            return Err(StoreError::Duplicate("Pending verification".to_string()));
        }
        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_verification(&self, id: &ObjectId) -> StoreResult<Option<CompanyVerification>> {
        Ok(self.verifications.read().await.get(id).cloned())
    }

    async fn latest_verification_for(
        &self,
        user_id: &ObjectId,
    ) -> StoreResult<Option<CompanyVerification>> {
        Ok(self
            .verifications
            .read()
            .await
            .values()
            .filter(|r| &r.user_id == user_id)
            .max_by_key(|r| (r.submitted_at, r.id))
            .cloned())
    }

    async fn has_pending_verification(&self, user_id: &ObjectId) -> StoreResult<bool> {
        Ok(self
            .verifications
            .read()
            .await
            .values()
            .any(|r| &r.user_id == user_id && r.status == VerificationStatus::Pending))
    }

    async fn list_verifications(
        &self,
        status: Option<VerificationStatus>,
        page: Page,
    ) -> StoreResult<(Vec<CompanyVerification>, u64)> {
        let requests: Vec<CompanyVerification> = self
            .verifications
            .read()
            .await
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        Ok(paginate(requests, page, |r| (r.submitted_at, r.id)))
    }

    async fn update_verification(&self, request: &CompanyVerification) -> StoreResult<bool> {
        let mut requests = self.verifications.write().await;
        match requests.get_mut(&request.id) {
            Some(existing) => {
                *existing = request.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SubscriberRepository for MemoryStore {
    async fn find_subscriber(&self, email: &str) -> StoreResult<Option<Subscriber>> {
        Ok(self
            .subscribers
            .read()
            .await
            .values()
            .find(|s| s.email == email)
            .cloned())
    }

    async fn insert_subscriber(&self, subscriber: &Subscriber) -> StoreResult<()> {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.values().any(|s| s.email == subscriber.email) {
            return Err(StoreError::Duplicate("Subscriber".to_string()));
        }
        subscribers.insert(subscriber.id, subscriber.clone());
        Ok(())
    }

    async fn update_subscriber(&self, subscriber: &Subscriber) -> StoreResult<bool> {
        let mut subscribers = self.subscribers.write().await;
        match subscribers.get_mut(&subscriber.id) {
            Some(existing) => {
                *existing = subscriber.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_subscribers(&self, page: Page) -> StoreResult<(Vec<Subscriber>, u64)> {
        let subscribers: Vec<Subscriber> =
            self.subscribers.read().await.values().cloned().collect();
        Ok(paginate(subscribers, page, |s| (s.subscribed_at, s.id)))
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn insert_message(&self, message: &ContactMessage) -> StoreResult<()> {
        self.contacts
            .write()
            .await
            .insert(message.id, message.clone());
        Ok(())
    }

    async fn list_messages(&self, page: Page) -> StoreResult<(Vec<ContactMessage>, u64)> {
        let messages: Vec<ContactMessage> = self.contacts.read().await.values().cloned().collect();
        Ok(paginate(messages, page, |m| (m.created_at, m.id)))
    }

    async fn mark_message_handled(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut messages = self.contacts.write().await;
        match messages.get_mut(id) {
            Some(m) => {
                m.handled = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
