/// Public contact form and its admin inbox
use actix_middleware::AuthUser;
use mongodb::bson::{self, oid::ObjectId};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::db::ContactRepository;
use crate::error::{AppError, Result};
use crate::models::user::normalize_email;
use crate::models::{ContactMessage, ContactMessageResponse, Page, Paginated};
use crate::services::require_admin;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    pub message: String,
}

pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(state: &AppState) -> Self {
        Self {
            contacts: state.repos.contacts.clone(),
        }
    }

    pub async fn submit(&self, req: ContactRequest) -> Result<ContactMessageResponse> {
        let req = ContactRequest {
            name: req.name.trim().to_string(),
            email: normalize_email(&req.email),
            subject: req.subject.trim().to_string(),
            message: req.message.trim().to_string(),
        };
        req.validate()?;

        let message = ContactMessage {
            id: ObjectId::new(),
            name: req.name,
            email: req.email,
            subject: req.subject,
            message: req.message,
            handled: false,
            created_at: bson::DateTime::now(),
        };
        self.contacts.insert_message(&message).await?;

        tracing::info!(message_id = %message.id, "Contact message received");
        Ok(ContactMessageResponse::from(&message))
    }

    pub async fn list(
        &self,
        auth: &AuthUser,
        page: Page,
    ) -> Result<Paginated<ContactMessageResponse>> {
        require_admin(auth)?;
        let (items, total) = self.contacts.list_messages(page).await?;
        Ok(Paginated::new(items, page, total).map(|m| ContactMessageResponse::from(&m)))
    }

    pub async fn mark_handled(&self, auth: &AuthUser, id: &ObjectId) -> Result<()> {
        require_admin(auth)?;
        if !self.contacts.mark_message_handled(id).await? {
            return Err(AppError::NotFound("Message not found".to_string()));
        }
        tracing::info!(message_id = %id, by = %auth.user_id, "Contact message handled");
        Ok(())
    }
}
