use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::to_utc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub handled: bool,
    pub created_at: bson::DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub handled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&ContactMessage> for ContactMessageResponse {
    fn from(m: &ContactMessage) -> Self {
        Self {
            id: m.id.to_hex(),
            name: m.name.clone(),
            email: m.email.clone(),
            subject: m.subject.clone(),
            message: m.message.clone(),
            handled: m.handled,
            created_at: to_utc(m.created_at),
        }
    }
}
