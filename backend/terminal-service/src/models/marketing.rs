use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::to_utc;

/// Newsletter subscriber, unique by email
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub active: bool,
    pub subscribed_at: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsubscribed_at: Option<bson::DateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberResponse {
    pub id: String,
    pub email: String,
    pub active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl From<&Subscriber> for SubscriberResponse {
    fn from(s: &Subscriber) -> Self {
        Self {
            id: s.id.to_hex(),
            email: s.email.clone(),
            active: s.active,
            subscribed_at: to_utc(s.subscribed_at),
            unsubscribed_at: s.unsubscribed_at.map(to_utc),
        }
    }
}
