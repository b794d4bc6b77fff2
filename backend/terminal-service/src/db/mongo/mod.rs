/// MongoDB store
///
/// A single `MongoStore` implements every repository trait; each collection
/// lives in its own submodule. Unique constraints are backed by indexes
/// created at startup by [`MongoStore::ensure_indexes`].
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{StoreError, StoreHealth, StoreResult};
use crate::config::DatabaseConfig;
use crate::models::{ListingKind, Page};

mod listings;
mod marketing;
mod posts;
mod users;
mod verifications;

pub(crate) const USERS: &str = "users";
pub(crate) const POSTS: &str = "socialposts";
pub(crate) const VERIFICATIONS: &str = "companyverifications";
pub(crate) const SUBSCRIBERS: &str = "subscribers";
pub(crate) const CONTACTS: &str = "contactmessages";

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect and verify the server answers a ping
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await.map_err(backend)?;
        options.app_name = Some("terminal-service".to_string());
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        options.server_selection_timeout = Some(Duration::from_secs(config.connect_timeout_secs));

        let client = Client::with_options(options).map_err(backend)?;
        let store = Self {
            db: client.database(&config.name),
        };
        store.ping().await?;

        tracing::info!(database = %config.name, "Connected to MongoDB");
        Ok(store)
    }

    pub(crate) fn collection<T>(&self, name: &str) -> Collection<T> {
        self.db.collection::<T>(name)
    }

    /// Create the indexes the repositories rely on. Idempotent.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let unique = |keys: Document| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };
        let plain = |keys: Document| IndexModel::builder().keys(keys).build();

        let users = self.collection::<Document>(USERS);
        users
            .create_index(unique(doc! { "usernameKey": 1 }), None)
            .await
            .map_err(backend)?;
        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .partial_filter_expression(doc! { "email": { "$type": "string" } })
                            .build(),
                    )
                    .build(),
                None,
            )
            .await
            .map_err(backend)?;

        let posts = self.collection::<Document>(POSTS);
        posts
            .create_indexes(
                vec![
                    plain(doc! { "createdAt": -1 }),
                    plain(doc! { "author": 1, "createdAt": -1 }),
                    plain(doc! { "listingId": 1 }),
                ],
                None,
            )
            .await
            .map_err(backend)?;

        for kind in ListingKind::ALL {
            self.collection::<Document>(kind.as_str())
                .create_indexes(
                    vec![
                        plain(doc! { "createdAt": -1 }),
                        plain(doc! { "category": 1, "createdAt": -1 }),
                    ],
                    None,
                )
                .await
                .map_err(backend)?;
        }

        // At most one pending request per user
        let verifications = self.collection::<Document>(VERIFICATIONS);
        verifications
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "userId": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .partial_filter_expression(doc! { "status": "pending" })
                            .name("userId_pending_unique".to_string())
                            .build(),
                    )
                    .build(),
                None,
            )
            .await
            .map_err(backend)?;
        verifications
            .create_index(plain(doc! { "status": 1, "submittedAt": -1 }), None)
            .await
            .map_err(backend)?;

        self.collection::<Document>(SUBSCRIBERS)
            .create_index(unique(doc! { "email": 1 }), None)
            .await
            .map_err(backend)?;

        self.collection::<Document>(CONTACTS)
            .create_index(plain(doc! { "createdAt": -1 }), None)
            .await
            .map_err(backend)?;

        tracing::info!("MongoDB indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(backend)
    }
}

pub(crate) fn backend(err: MongoError) -> StoreError {
    StoreError::Backend(err.to_string())
}

pub(crate) fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Map a write error, reporting duplicate keys as `Duplicate(label)`.
/// For users the offending index decides the label.
pub(crate) fn write_error(label: &'static str) -> impl FnOnce(MongoError) -> StoreError {
    move |err| {
        if !is_duplicate_key(&err) {
            return backend(err);
        }
        let message = err.to_string();
        let label = if message.contains("usernameKey") {
            "Username"
        } else if label == "User" && message.contains("email") {
            "Email"
        } else {
            label
        };
        StoreError::Duplicate(label.to_string())
    }
}

pub(crate) fn decode_error(err: mongodb::bson::de::Error) -> StoreError {
    StoreError::Backend(format!("Failed to decode document: {err}"))
}

/// Count matches and fetch one sorted page
pub(crate) async fn find_page<T>(
    collection: &Collection<T>,
    filter: Document,
    sort: Document,
    page: Page,
) -> StoreResult<(Vec<T>, u64)>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let total = collection
        .count_documents(filter.clone(), None)
        .await
        .map_err(backend)?;

    let options = FindOptions::builder()
        .sort(sort)
        .skip(page.skip())
        .limit(page.limit as i64)
        .build();
    let items: Vec<T> = collection
        .find(filter, options)
        .await
        .map_err(backend)?
        .try_collect()
        .await
        .map_err(backend)?;

    Ok((items, total))
}
