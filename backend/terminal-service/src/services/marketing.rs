/// Newsletter subscriptions
use actix_middleware::AuthUser;
use mongodb::bson::{self, oid::ObjectId};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::db::{StoreError, SubscriberRepository};
use crate::error::{AppError, Result};
use crate::models::user::normalize_email;
use crate::models::{Page, Paginated, Subscriber, SubscriberResponse};
use crate::services::require_admin;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Outcome of a subscribe call; `created` is false for an existing address
#[derive(Debug)]
pub struct Subscription {
    pub subscriber: SubscriberResponse,
    pub created: bool,
}

pub struct MarketingService {
    subscribers: Arc<dyn SubscriberRepository>,
}

impl MarketingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            subscribers: state.repos.subscribers.clone(),
        }
    }

    pub async fn subscribe(&self, mut req: SubscribeRequest) -> Result<Subscription> {
        req.email = normalize_email(&req.email);
        req.validate()?;

        if let Some(mut existing) = self.subscribers.find_subscriber(&req.email).await? {
            if !existing.active {
                existing.active = true;
                existing.subscribed_at = bson::DateTime::now();
                existing.unsubscribed_at = None;
                self.subscribers.update_subscriber(&existing).await?;
                tracing::info!(subscriber_id = %existing.id, "Subscriber reactivated");
            }
            return Ok(Subscription {
                subscriber: SubscriberResponse::from(&existing),
                created: false,
            });
        }

        let subscriber = Subscriber {
            id: ObjectId::new(),
            email: req.email,
            active: true,
            subscribed_at: bson::DateTime::now(),
            unsubscribed_at: None,
        };
        match self.subscribers.insert_subscriber(&subscriber).await {
            Ok(()) => {}
            // Concurrent subscribe of the same address
            Err(StoreError::Duplicate(_)) => {
                return Ok(Subscription {
                    subscriber: SubscriberResponse::from(&subscriber),
                    created: false,
                })
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(subscriber_id = %subscriber.id, "Subscriber added");
        Ok(Subscription {
            subscriber: SubscriberResponse::from(&subscriber),
            created: true,
        })
    }

    pub async fn unsubscribe(&self, email: &str) -> Result<SubscriberResponse> {
        let email = normalize_email(email);
        let mut subscriber = self
            .subscribers
            .find_subscriber(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscriber not found".to_string()))?;

        if subscriber.active {
            subscriber.active = false;
            subscriber.unsubscribed_at = Some(bson::DateTime::now());
            self.subscribers.update_subscriber(&subscriber).await?;
            tracing::info!(subscriber_id = %subscriber.id, "Subscriber unsubscribed");
        }
        Ok(SubscriberResponse::from(&subscriber))
    }

    pub async fn list(
        &self,
        auth: &AuthUser,
        page: Page,
    ) -> Result<Paginated<SubscriberResponse>> {
        require_admin(auth)?;
        let (items, total) = self.subscribers.list_subscribers(page).await?;
        Ok(Paginated::new(items, page, total).map(|s| SubscriberResponse::from(&s)))
    }
}
