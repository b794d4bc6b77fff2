use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::to_utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    #[default]
    Local,
    Google,
    Linkedin,
}

/// Company profile embedded in a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    #[validate(length(max = 200, message = "Company name is too long"))]
    pub company_name: String,
    #[validate(length(max = 300, message = "Address is too long"))]
    pub address: String,
    #[validate(length(max = 50, message = "Tax number is too long"))]
    pub tax_number: String,
    pub registration_number: String,
    #[validate(length(max = 120, message = "Manager name is too long"))]
    pub manager: String,
    pub business_activity: String,
    pub industry: String,
    pub phone: String,
    pub website: String,
    pub email: String,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: String,
}

impl CompanyInfo {
    /// Fields needed to generate documents are present
    pub fn is_complete(&self) -> bool {
        [
            &self.company_name,
            &self.address,
            &self.tax_number,
            &self.manager,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Copy with surrounding whitespace removed from every field
    pub fn trimmed(&self) -> Self {
        let t = |s: &String| s.trim().to_string();
        Self {
            company_name: t(&self.company_name),
            address: t(&self.address),
            tax_number: t(&self.tax_number),
            registration_number: t(&self.registration_number),
            manager: t(&self.manager),
            business_activity: t(&self.business_activity),
            industry: t(&self.industry),
            phone: t(&self.phone),
            website: t(&self.website),
            email: t(&self.email),
            description: t(&self.description),
        }
    }

    pub fn document_details(&self) -> document_templates::CompanyDetails {
        document_templates::CompanyDetails {
            name: self.company_name.clone(),
            address: self.address.clone(),
            tax_number: self.tax_number.clone(),
            manager: self.manager.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    /// Lower-cased username, unique
    pub username_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Argon2 PHC string; absent for accounts created through OAuth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub company_info: CompanyInfo,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub profile_complete: bool,
    #[serde(default)]
    pub auth_provider: AuthProvider,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl User {
    pub fn new(username: &str, email: Option<String>, provider: AuthProvider) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: ObjectId::new(),
            username: username.to_string(),
            username_key: username.to_lowercase(),
            email: email.map(|e| normalize_email(&e)),
            password: None,
            company_info: CompanyInfo::default(),
            is_admin: false,
            is_verified: false,
            profile_complete: false,
            auth_provider: provider,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the company profile and recompute `profile_complete`
    pub fn set_company_info(&mut self, info: CompanyInfo) {
        self.company_info = info.trimmed();
        self.profile_complete = self.company_info.is_complete();
    }

    pub fn touch(&mut self) {
        self.updated_at = bson::DateTime::now();
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub company_info: CompanyInfo,
    pub is_admin: bool,
    pub is_verified: bool,
    pub profile_complete: bool,
    pub auth_provider: AuthProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            username: user.username.clone(),
            email: user.email.clone(),
            company_info: user.company_info.clone(),
            is_admin: user.is_admin,
            is_verified: user.is_verified,
            profile_complete: user.profile_complete,
            auth_provider: user.auth_provider,
            created_at: to_utc(user.created_at),
            updated_at: to_utc(user.updated_at),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CompanyInfo {
        CompanyInfo {
            company_name: "Некса ДООЕЛ".into(),
            address: "Скопје".into(),
            tax_number: "4030000000000".into(),
            manager: "Ана Петровска".into(),
            ..CompanyInfo::default()
        }
    }

    #[test]
    fn test_profile_complete_requires_four_fields() {
        assert!(complete().is_complete());

        let mut info = complete();
        info.manager = "   ".into();
        assert!(!info.is_complete());
    }

    #[test]
    fn test_set_company_info_recomputes_flag() {
        let mut user = User::new("ana", None, AuthProvider::Local);
        assert!(!user.profile_complete);

        user.set_company_info(complete());
        assert!(user.profile_complete);

        user.set_company_info(CompanyInfo::default());
        assert!(!user.profile_complete);
    }

    #[test]
    fn test_password_never_serialized_in_response() {
        let mut user = User::new("Ana.P", Some(" Ana@Example.MK ".into()), AuthProvider::Local);
        user.password = Some("$argon2id$...".into());
        assert_eq!(user.username_key, "ana.p");
        assert_eq!(user.email.as_deref(), Some("ana@example.mk"));

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "Ana.P");
        assert_eq!(json["companyInfo"]["companyName"], "");
        assert_eq!(json["authProvider"], "local");
    }
}
