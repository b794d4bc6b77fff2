/// Profile management and admin user operations
use actix_middleware::AuthUser;
use crypto_core::password;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::db::{PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::user::normalize_email;
use crate::models::{CompanyInfo, Page, Paginated, User, UserResponse};
use crate::services::{non_blank, require_admin, user_id};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(nested)]
    pub company_info: CompanyInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.repos.users.clone(),
            posts: state.repos.posts.clone(),
        }
    }

    /// Load the user behind a token; 404 if the account was deleted since
    pub async fn current(&self, auth: &AuthUser) -> Result<User> {
        let id = user_id(auth)?;
        self.users
            .find_user(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn profile(&self, auth: &AuthUser) -> Result<UserResponse> {
        Ok(UserResponse::from(self.current(auth).await?))
    }

    pub async fn update_profile(
        &self,
        auth: &AuthUser,
        mut req: UpdateProfileRequest,
    ) -> Result<UserResponse> {
        req.email = non_blank(req.email.as_deref());
        req.validate()?;

        let mut user = self.current(auth).await?;

        if let Some(email) = req.email.as_deref().map(normalize_email) {
            if user.email.as_deref() != Some(email.as_str()) {
                if let Some(other) = self.users.find_user_by_email(&email).await? {
                    if other.id != user.id {
                        return Err(AppError::Conflict("Email already registered".to_string()));
                    }
                }
                user.email = Some(email);
            }
        }

        user.set_company_info(req.company_info);
        user.touch();

        if !self.users.update_user(&user).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        tracing::info!(
            user_id = %user.id,
            profile_complete = user.profile_complete,
            "Profile updated"
        );

        Ok(UserResponse::from(user))
    }

    pub async fn change_password(&self, auth: &AuthUser, req: ChangePasswordRequest) -> Result<()> {
        let mut user = self.current(auth).await?;

        let hash = user.password.as_deref().ok_or_else(|| {
            AppError::BadRequest("Account has no password; sign in with your provider".to_string())
        })?;
        password::verify_password(&req.current_password, hash)?;

        user.password = Some(password::hash_password(&req.new_password)?);
        user.touch();
        if !self.users.update_user(&user).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    pub async fn list(&self, auth: &AuthUser, page: Page) -> Result<Paginated<UserResponse>> {
        require_admin(auth)?;
        let (users, total) = self.users.list_users(page).await?;
        Ok(Paginated::new(users, page, total).map(UserResponse::from))
    }

    pub async fn set_admin(
        &self,
        auth: &AuthUser,
        target: &ObjectId,
        is_admin: bool,
    ) -> Result<UserResponse> {
        require_admin(auth)?;
        if *target == user_id(auth)? {
            return Err(AppError::BadRequest(
                "Admins cannot change their own admin flag".to_string(),
            ));
        }

        let mut user = self
            .users
            .find_user(target)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.is_admin = is_admin;
        user.touch();
        if !self.users.update_user(&user).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(user_id = %user.id, is_admin, by = %auth.user_id, "Admin flag changed");
        Ok(UserResponse::from(user))
    }

    pub async fn delete(&self, auth: &AuthUser, target: &ObjectId) -> Result<()> {
        require_admin(auth)?;
        if *target == user_id(auth)? {
            return Err(AppError::BadRequest(
                "Admins cannot delete their own account".to_string(),
            ));
        }

        if !self.users.delete_user(target).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        let posts = self.posts.delete_posts_by_author(target).await?;

        tracing::info!(user_id = %target, posts_removed = posts, by = %auth.user_id, "User deleted");
        Ok(())
    }

    /// Grant admin to the configured accounts; unknown usernames are skipped
    pub async fn promote_bootstrap_admins(&self, usernames: &[String]) -> Result<usize> {
        let mut promoted = 0;
        for username in usernames {
            let Some(mut user) = self.users.find_user_by_username(username).await? else {
                tracing::warn!(username = %username, "Bootstrap admin not found");
                continue;
            };
            if user.is_admin {
                continue;
            }
            user.is_admin = true;
            user.touch();
            if !self.users.update_user(&user).await? {
                tracing::warn!(username = %user.username, "Bootstrap admin vanished before promotion");
                continue;
            }
            tracing::info!(user_id = %user.id, username = %user.username, "Bootstrap admin promoted");
            promoted += 1;
        }
        Ok(promoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::StoreResult;
    use crate::models::AuthProvider;
    use async_trait::async_trait;

    /// Reads succeed but every write finds the account already deleted
    struct DeletedOnWrite(MemoryStore);

    #[async_trait]
    impl UserRepository for DeletedOnWrite {
        async fn insert_user(&self, user: &User) -> StoreResult<()> {
            self.0.insert_user(user).await
        }
        async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>> {
            self.0.find_user(id).await
        }
        async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
            self.0.find_user_by_username(username).await
        }
        async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
            self.0.find_user_by_email(email).await
        }
        async fn update_user(&self, _user: &User) -> StoreResult<bool> {
            Ok(false)
        }
        async fn delete_user(&self, id: &ObjectId) -> StoreResult<bool> {
            self.0.delete_user(id).await
        }
        async fn list_users(&self, page: Page) -> StoreResult<(Vec<User>, u64)> {
            self.0.list_users(page).await
        }
    }

    async fn service_with(user: &User) -> UserService {
        let store = DeletedOnWrite(MemoryStore::default());
        store.insert_user(user).await.unwrap();
        UserService {
            users: Arc::new(store),
            posts: Arc::new(MemoryStore::default()),
        }
    }

    fn admin() -> AuthUser {
        AuthUser {
            user_id: ObjectId::new().to_hex(),
            username: "admin".into(),
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn test_set_admin_on_deleted_user_is_not_found() {
        let user = User::new("marko", None, AuthProvider::Local);
        let service = service_with(&user).await;

        let result = service.set_admin(&admin(), &user.id, true).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_change_password_on_deleted_user_is_not_found() {
        let mut user = User::new("marko", None, AuthProvider::Local);
        user.password = Some(password::hash_password("OldPass123!").unwrap());
        let service = service_with(&user).await;
        let auth = AuthUser {
            user_id: user.id.to_hex(),
            username: user.username.clone(),
            is_admin: false,
        };

        let result = service
            .change_password(
                &auth,
                ChangePasswordRequest {
                    current_password: "OldPass123!".into(),
                    new_password: "NewPass456!".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bootstrap_skips_vanished_accounts() {
        let user = User::new("marko", None, AuthProvider::Local);
        let service = service_with(&user).await;

        let promoted = service
            .promote_bootstrap_admins(&["marko".to_string()])
            .await
            .unwrap();
        assert_eq!(promoted, 0);
    }
}
