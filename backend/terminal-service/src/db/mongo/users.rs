use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};

use super::{backend, find_page, write_error, MongoStore, USERS};
use crate::db::{StoreResult, UserRepository};
use crate::models::{Page, User};

impl MongoStore {
    fn users(&self) -> mongodb::Collection<User> {
        self.collection(USERS)
    }
}

#[async_trait]
impl UserRepository for MongoStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.users()
            .insert_one(user, None)
            .await
            .map(|_| ())
            .map_err(write_error("User"))
    }

    async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>> {
        self.users()
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(backend)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.users()
            .find_one(doc! { "usernameKey": username.to_lowercase() }, None)
            .await
            .map_err(backend)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.users()
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(backend)
    }

    async fn update_user(&self, user: &User) -> StoreResult<bool> {
        let result = self
            .users()
            .replace_one(doc! { "_id": user.id }, user, None)
            .await
            .map_err(write_error("User"))?;
        Ok(result.matched_count > 0)
    }

    async fn delete_user(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self
            .users()
            .delete_one(doc! { "_id": *id }, None)
            .await
            .map_err(backend)?;
        Ok(result.deleted_count > 0)
    }

    async fn list_users(&self, page: Page) -> StoreResult<(Vec<User>, u64)> {
        find_page(
            &self.users(),
            doc! {},
            doc! { "createdAt": -1, "_id": -1 },
            page,
        )
        .await
    }
}
