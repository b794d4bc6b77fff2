use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};

use super::{backend, find_page, write_error, MongoStore, CONTACTS, SUBSCRIBERS};
use crate::db::{ContactRepository, StoreResult, SubscriberRepository};
use crate::models::{ContactMessage, Page, Subscriber};

impl MongoStore {
    fn subscribers(&self) -> mongodb::Collection<Subscriber> {
        self.collection(SUBSCRIBERS)
    }

    fn contacts(&self) -> mongodb::Collection<ContactMessage> {
        self.collection(CONTACTS)
    }
}

#[async_trait]
impl SubscriberRepository for MongoStore {
    async fn find_subscriber(&self, email: &str) -> StoreResult<Option<Subscriber>> {
        self.subscribers()
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(backend)
    }

    async fn insert_subscriber(&self, subscriber: &Subscriber) -> StoreResult<()> {
        self.subscribers()
            .insert_one(subscriber, None)
            .await
            .map(|_| ())
            .map_err(write_error("Subscriber"))
    }

    async fn update_subscriber(&self, subscriber: &Subscriber) -> StoreResult<bool> {
        let result = self
            .subscribers()
            .replace_one(doc! { "_id": subscriber.id }, subscriber, None)
            .await
            .map_err(backend)?;
        Ok(result.matched_count > 0)
    }

    async fn list_subscribers(&self, page: Page) -> StoreResult<(Vec<Subscriber>, u64)> {
        find_page(
            &self.subscribers(),
            doc! {},
            doc! { "subscribedAt": -1, "_id": -1 },
            page,
        )
        .await
    }
}

#[async_trait]
impl ContactRepository for MongoStore {
    async fn insert_message(&self, message: &ContactMessage) -> StoreResult<()> {
        self.contacts()
            .insert_one(message, None)
            .await
            .map(|_| ())
            .map_err(backend)
    }

    async fn list_messages(&self, page: Page) -> StoreResult<(Vec<ContactMessage>, u64)> {
        find_page(
            &self.contacts(),
            doc! {},
            doc! { "createdAt": -1, "_id": -1 },
            page,
        )
        .await
    }

    async fn mark_message_handled(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self
            .contacts()
            .update_one(doc! { "_id": *id }, doc! { "$set": { "handled": true } }, None)
            .await
            .map_err(backend)?;
        Ok(result.matched_count > 0)
    }
}
