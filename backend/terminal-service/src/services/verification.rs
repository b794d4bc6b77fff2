/// Company verification requests and their admin review
///
/// A request is created `pending` and moves once to `approved` or
/// `rejected`. Approval marks the user verified and copies the reviewed
/// company profile onto the account.
use actix_middleware::AuthUser;
use mongodb::bson::{self, oid::ObjectId};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::db::{UserRepository, VerificationRepository};
use crate::error::{AppError, Result};
use crate::models::{
    CompanyInfo, CompanyVerification, Page, Paginated, VerificationDocument,
    VerificationResponse, VerificationStatus,
};
use crate::services::{non_blank, require_admin, user_id, UserService};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVerificationRequest {
    #[validate(nested)]
    pub company_info: CompanyInfo,
    #[validate(
        length(min = 1, message = "At least one document is required"),
        nested
    )]
    #[serde(default)]
    pub documents: Vec<VerificationDocument>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerificationQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl VerificationQuery {
    pub fn status(&self) -> Result<Option<VerificationStatus>> {
        non_blank(self.status.as_deref())
            .map(|s| s.parse().map_err(AppError::BadRequest))
            .transpose()
    }
}

pub struct VerificationService {
    verifications: Arc<dyn VerificationRepository>,
    users_repo: Arc<dyn UserRepository>,
    users: UserService,
}

impl VerificationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            verifications: state.repos.verifications.clone(),
            users_repo: state.repos.users.clone(),
            users: UserService::new(state),
        }
    }

    pub async fn submit(
        &self,
        auth: &AuthUser,
        req: SubmitVerificationRequest,
    ) -> Result<VerificationResponse> {
        req.validate()?;
        let company_info = req.company_info.trimmed();
        if !company_info.is_complete() {
            return Err(AppError::Validation(
                "Company name, address, tax number and manager are required".to_string(),
            ));
        }

        let user = self.users.current(auth).await?;
        if user.is_verified {
            return Err(AppError::Conflict("Company is already verified".to_string()));
        }
        if self.verifications.has_pending_verification(&user.id).await? {
            return Err(AppError::Conflict(
                "A verification request is already pending".to_string(),
            ));
        }

        let request = CompanyVerification {
            id: ObjectId::new(),
            user_id: user.id,
            company_info,
            documents: req.documents,
            status: VerificationStatus::Pending,
            reviewed_by: None,
            review_note: None,
            submitted_at: bson::DateTime::now(),
            reviewed_at: None,
        };
        self.verifications.insert_verification(&request).await?;

        tracing::info!(user_id = %user.id, verification_id = %request.id, "Verification submitted");
        Ok(VerificationResponse::from(&request))
    }

    pub async fn status(&self, auth: &AuthUser) -> Result<VerificationResponse> {
        let id = user_id(auth)?;
        self.verifications
            .latest_verification_for(&id)
            .await?
            .map(|v| VerificationResponse::from(&v))
            .ok_or_else(|| AppError::NotFound("No verification request found".to_string()))
    }

    pub async fn list(
        &self,
        auth: &AuthUser,
        status: Option<VerificationStatus>,
        page: Page,
    ) -> Result<Paginated<VerificationResponse>> {
        require_admin(auth)?;
        let (items, total) = self.verifications.list_verifications(status, page).await?;
        Ok(Paginated::new(items, page, total).map(|v| VerificationResponse::from(&v)))
    }

    pub async fn approve(
        &self,
        auth: &AuthUser,
        id: &ObjectId,
        note: Option<String>,
    ) -> Result<VerificationResponse> {
        require_admin(auth)?;
        let reviewer = user_id(auth)?;
        let mut request = self.pending(id).await?;

        let mut user = self
            .users_repo
            .find_user(&request.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Requesting user no longer exists".to_string()))?;

        // The account is updated first; a failed request update restores it
        let previous = user.clone();
        user.is_verified = true;
        user.set_company_info(request.company_info.clone());
        user.touch();
        if !self.users_repo.update_user(&user).await? {
            return Err(AppError::NotFound("Requesting user no longer exists".to_string()));
        }

        request.status = VerificationStatus::Approved;
        request.reviewed_by = Some(reviewer);
        request.review_note = non_blank(note.as_deref());
        request.reviewed_at = Some(bson::DateTime::now());
        let recorded = match self.verifications.update_verification(&request).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::NotFound("Verification request not found".to_string())),
            Err(err) => Err(AppError::from(err)),
        };
        if let Err(err) = recorded {
            if let Err(restore) = self.users_repo.update_user(&previous).await {
                tracing::error!(
                    user_id = %previous.id,
                    error = %restore,
                    "Failed to restore user after aborted approval"
                );
            }
            return Err(err);
        }

        tracing::info!(
            user_id = %user.id,
            verification_id = %request.id,
            reviewer = %reviewer,
            "Verification approved"
        );
        Ok(VerificationResponse::from(&request))
    }

    pub async fn reject(
        &self,
        auth: &AuthUser,
        id: &ObjectId,
        reason: Option<String>,
    ) -> Result<VerificationResponse> {
        require_admin(auth)?;
        let reason = non_blank(reason.as_deref())
            .ok_or_else(|| AppError::Validation("A rejection reason is required".to_string()))?;
        let reviewer = user_id(auth)?;
        let mut request = self.pending(id).await?;

        request.status = VerificationStatus::Rejected;
        request.reviewed_by = Some(reviewer);
        request.review_note = Some(reason);
        request.reviewed_at = Some(bson::DateTime::now());
        self.verifications.update_verification(&request).await?;

        tracing::info!(
            user_id = %request.user_id,
            verification_id = %request.id,
            reviewer = %reviewer,
            "Verification rejected"
        );
        Ok(VerificationResponse::from(&request))
    }

    async fn pending(&self, id: &ObjectId) -> Result<CompanyVerification> {
        let request = self
            .verifications
            .find_verification(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Verification request not found".to_string()))?;

        if request.status != VerificationStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Verification request is already {}",
                request.status.as_str()
            )));
        }
        Ok(request)
    }
}
