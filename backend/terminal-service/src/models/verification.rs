use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use super::{to_utc, CompanyInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(VerificationStatus::Pending),
            "approved" => Ok(VerificationStatus::Approved),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(format!("Unknown verification status: {other}")),
        }
    }
}

/// Supporting document, referenced by URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDocument {
    #[validate(length(min = 1, max = 200, message = "Document name is required"))]
    pub name: String,
    #[validate(url(message = "Document url must be a valid URL"))]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyVerification {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub company_info: CompanyInfo,
    pub documents: Vec<VerificationDocument>,
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
    pub submitted_at: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<bson::DateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    pub id: String,
    pub user_id: String,
    pub company_info: CompanyInfo,
    pub documents: Vec<VerificationDocument>,
    pub status: VerificationStatus,
    pub reviewed_by: Option<String>,
    pub review_note: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<&CompanyVerification> for VerificationResponse {
    fn from(v: &CompanyVerification) -> Self {
        Self {
            id: v.id.to_hex(),
            user_id: v.user_id.to_hex(),
            company_info: v.company_info.clone(),
            documents: v.documents.clone(),
            status: v.status,
            reviewed_by: v.reviewed_by.map(|id| id.to_hex()),
            review_note: v.review_note.clone(),
            submitted_at: to_utc(v.submitted_at),
            reviewed_at: v.reviewed_at.map(to_utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("Pending".parse(), Ok(VerificationStatus::Pending));
        assert!("archived".parse::<VerificationStatus>().is_err());
        assert_eq!(VerificationStatus::Rejected.as_str(), "rejected");
    }
}
