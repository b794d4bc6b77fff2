use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::to_utc;

/// The three listing collections share one shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Investments,
    News,
    Blogs,
}

impl ListingKind {
    pub const ALL: [ListingKind; 3] = [
        ListingKind::Investments,
        ListingKind::News,
        ListingKind::Blogs,
    ];

    /// Collection name and URL segment
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Investments => "investments",
            ListingKind::News => "news",
            ListingKind::Blogs => "blogs",
        }
    }

    /// Only administrators may publish investments and news
    pub fn admin_only_writes(&self) -> bool {
        !matches!(self, ListingKind::Blogs)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListingKind::Investments => "Investment",
            ListingKind::News => "News article",
            ListingKind::Blogs => "Blog post",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentDetails {
    #[validate(range(min = 0.0, message = "Investment amount must not be negative"))]
    pub amount: f64,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub sector: String,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: ObjectId,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment: Option<InvestmentDetails>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

/// Filters for listing queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub category: Option<String>,
    /// Case-insensitive title substring
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub kind: ListingKind,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment: Option<InvestmentDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingResponse {
    pub fn build(kind: ListingKind, listing: &Listing) -> Self {
        Self {
            id: listing.id.to_hex(),
            kind,
            title: listing.title.clone(),
            content: listing.content.clone(),
            category: listing.category.clone(),
            tags: listing.tags.clone(),
            author: listing.author.to_hex(),
            author_name: listing.author_name.clone(),
            investment: listing.investment.clone(),
            created_at: to_utc(listing.created_at),
            updated_at: to_utc(listing.updated_at),
        }
    }
}
