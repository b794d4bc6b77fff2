use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};

use super::{backend, decode_error, MongoStore, POSTS, USERS};
use crate::db::{PostRepository, StoreError, StoreResult};
use crate::models::{Comment, FeedEntry, Page, SocialPost, User};

impl MongoStore {
    fn posts(&self) -> mongodb::Collection<SocialPost> {
        self.collection(POSTS)
    }
}

/// Sorted page of posts with the author document joined in as `authorDoc`
fn feed_pipeline(filter: Document, page: Page) -> Vec<Document> {
    vec![
        doc! { "$match": filter },
        doc! { "$sort": { "createdAt": -1, "_id": -1 } },
        doc! { "$skip": i64::try_from(page.skip()).unwrap_or(i64::MAX) },
        doc! { "$limit": page.limit as i64 },
        doc! {
            "$lookup": {
                "from": USERS,
                "localField": "author",
                "foreignField": "_id",
                "as": "authorDoc",
            }
        },
        doc! { "$unwind": { "path": "$authorDoc", "preserveNullAndEmptyArrays": true } },
    ]
}

fn decode_feed_row(mut row: Document) -> StoreResult<FeedEntry> {
    let author = match row.remove("authorDoc") {
        Some(Bson::Document(author)) => {
            Some(bson::from_document::<User>(author).map_err(decode_error)?)
        }
        _ => None,
    };
    let post = bson::from_document::<SocialPost>(row).map_err(decode_error)?;
    Ok(FeedEntry { post, author })
}

#[async_trait]
impl PostRepository for MongoStore {
    async fn insert_post(&self, post: &SocialPost) -> StoreResult<()> {
        self.posts()
            .insert_one(post, None)
            .await
            .map(|_| ())
            .map_err(backend)
    }

    async fn find_post(&self, id: &ObjectId) -> StoreResult<Option<SocialPost>> {
        self.posts()
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(backend)
    }

    async fn feed(
        &self,
        author: Option<&ObjectId>,
        page: Page,
    ) -> StoreResult<(Vec<FeedEntry>, u64)> {
        let filter = match author {
            Some(author) => doc! { "author": *author },
            None => doc! {},
        };

        let total = self
            .posts()
            .count_documents(filter.clone(), None)
            .await
            .map_err(backend)?;

        let rows: Vec<Document> = self
            .posts()
            .aggregate(feed_pipeline(filter, page), None)
            .await
            .map_err(backend)?
            .try_collect()
            .await
            .map_err(backend)?;

        let entries = rows
            .into_iter()
            .map(decode_feed_row)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((entries, total))
    }

    async fn toggle_like(
        &self,
        post_id: &ObjectId,
        user_id: &ObjectId,
    ) -> StoreResult<Option<(bool, usize)>> {
        let posts = self.posts();

        // Each update matches only one state of the likes array
        let added = posts
            .update_one(
                doc! { "_id": *post_id, "likes": { "$ne": *user_id } },
                doc! { "$addToSet": { "likes": *user_id } },
                None,
            )
            .await
            .map_err(backend)?;

        let liked = if added.modified_count == 1 {
            true
        } else {
            posts
                .update_one(
                    doc! { "_id": *post_id, "likes": *user_id },
                    doc! { "$pull": { "likes": *user_id } },
                    None,
                )
                .await
                .map_err(backend)?;
            false
        };

        let post = posts
            .find_one(doc! { "_id": *post_id }, None)
            .await
            .map_err(backend)?;
        Ok(post.map(|p| (liked, p.likes.len())))
    }

    async fn add_comment(&self, post_id: &ObjectId, comment: &Comment) -> StoreResult<bool> {
        let comment = bson::to_bson(comment)
            .map_err(|e| StoreError::Backend(format!("Failed to encode comment: {e}")))?;
        let result = self
            .posts()
            .update_one(
                doc! { "_id": *post_id },
                doc! { "$push": { "comments": comment } },
                None,
            )
            .await
            .map_err(backend)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_post(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self
            .posts()
            .delete_one(doc! { "_id": *id }, None)
            .await
            .map_err(backend)?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_posts_by_author(&self, author: &ObjectId) -> StoreResult<u64> {
        let result = self
            .posts()
            .delete_many(doc! { "author": *author }, None)
            .await
            .map_err(backend)?;
        Ok(result.deleted_count)
    }

    async fn delete_posts_by_listing(&self, listing_id: &ObjectId) -> StoreResult<u64> {
        let result = self
            .posts()
            .delete_many(doc! { "listingId": *listing_id }, None)
            .await
            .map_err(backend)?;
        Ok(result.deleted_count)
    }
}
