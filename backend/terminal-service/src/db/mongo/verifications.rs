use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOneOptions,
};

use super::{backend, find_page, write_error, MongoStore, VERIFICATIONS};
use crate::db::{StoreResult, VerificationRepository};
use crate::models::{CompanyVerification, Page, VerificationStatus};

impl MongoStore {
    fn verifications(&self) -> mongodb::Collection<CompanyVerification> {
        self.collection(VERIFICATIONS)
    }
}

#[async_trait]
impl VerificationRepository for MongoStore {
    async fn insert_verification(&self, request: &CompanyVerification) -> StoreResult<()> {
        self.verifications()
            .insert_one(request, None)
            .await
            .map(|_| ())
            .map_err(write_error("Pending verification"))
    }

    async fn find_verification(&self, id: &ObjectId) -> StoreResult<Option<CompanyVerification>> {
        self.verifications()
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(backend)
    }

    async fn latest_verification_for(
        &self,
        user_id: &ObjectId,
    ) -> StoreResult<Option<CompanyVerification>> {
        let options = FindOneOptions::builder()
            .sort(doc! { "submittedAt": -1, "_id": -1 })
            .build();
        self.verifications()
            .find_one(doc! { "userId": *user_id }, options)
            .await
            .map_err(backend)
    }

    async fn has_pending_verification(&self, user_id: &ObjectId) -> StoreResult<bool> {
        let count = self
            .verifications()
            .count_documents(
                doc! { "userId": *user_id, "status": VerificationStatus::Pending.as_str() },
                None,
            )
            .await
            .map_err(backend)?;
        Ok(count > 0)
    }

    async fn list_verifications(
        &self,
        status: Option<VerificationStatus>,
        page: Page,
    ) -> StoreResult<(Vec<CompanyVerification>, u64)> {
        let filter = match status {
            Some(status) => doc! { "status": status.as_str() },
            None => doc! {},
        };
        find_page(
            &self.verifications(),
            filter,
            doc! { "submittedAt": -1, "_id": -1 },
            page,
        )
        .await
    }

    async fn update_verification(&self, request: &CompanyVerification) -> StoreResult<bool> {
        let result = self
            .verifications()
            .replace_one(doc! { "_id": request.id }, request, None)
            .await
            .map_err(write_error("Pending verification"))?;
        Ok(result.matched_count > 0)
    }
}
