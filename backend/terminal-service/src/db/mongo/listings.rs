use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};

use super::{backend, find_page, MongoStore};
use crate::db::{ListingRepository, StoreResult};
use crate::models::{Listing, ListingFilter, ListingKind, Page};

impl MongoStore {
    fn listings(&self, kind: ListingKind) -> mongodb::Collection<Listing> {
        self.collection(kind.as_str())
    }
}

fn listing_filter(filter: &ListingFilter) -> Document {
    let mut query = doc! {};
    if let Some(category) = &filter.category {
        query.insert("category", category.as_str());
    }
    if let Some(search) = &filter.search {
        query.insert(
            "title",
            doc! { "$regex": regex::escape(search), "$options": "i" },
        );
    }
    query
}

#[async_trait]
impl ListingRepository for MongoStore {
    async fn insert_listing(&self, kind: ListingKind, listing: &Listing) -> StoreResult<()> {
        self.listings(kind)
            .insert_one(listing, None)
            .await
            .map(|_| ())
            .map_err(backend)
    }

    async fn find_listing(
        &self,
        kind: ListingKind,
        id: &ObjectId,
    ) -> StoreResult<Option<Listing>> {
        self.listings(kind)
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(backend)
    }

    async fn list_listings(
        &self,
        kind: ListingKind,
        filter: &ListingFilter,
        page: Page,
    ) -> StoreResult<(Vec<Listing>, u64)> {
        find_page(
            &self.listings(kind),
            listing_filter(filter),
            doc! { "createdAt": -1, "_id": -1 },
            page,
        )
        .await
    }

    async fn update_listing(&self, kind: ListingKind, listing: &Listing) -> StoreResult<bool> {
        let result = self
            .listings(kind)
            .replace_one(doc! { "_id": listing.id }, listing, None)
            .await
            .map_err(backend)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_listing(&self, kind: ListingKind, id: &ObjectId) -> StoreResult<bool> {
        let result = self
            .listings(kind)
            .delete_one(doc! { "_id": *id }, None)
            .await
            .map_err(backend)?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_escaped_case_insensitive_regex() {
        let query = listing_filter(&ListingFilter {
            category: Some("tech".into()),
            search: Some("a+b".into()),
        });
        assert_eq!(query.get_str("category").unwrap(), "tech");
        let title = query.get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), "a\\+b");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }
}
