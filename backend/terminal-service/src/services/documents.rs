/// Legal document generation from the signed-in company's profile
use actix_middleware::AuthUser;
use document_templates::{TemplateContext, TemplateError, TemplateInfo, TemplateRegistry};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::services::UserService;
use crate::state::AppState;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Rendered document ready to be sent as an attachment
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct DocumentService {
    templates: Arc<TemplateRegistry>,
    users: UserService,
}

impl DocumentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            templates: state.templates.clone(),
            users: UserService::new(state),
        }
    }

    pub fn templates(&self) -> Vec<TemplateInfo> {
        self.templates.list()
    }

    pub async fn generate(
        &self,
        auth: &AuthUser,
        template_id: &str,
        form: HashMap<String, Value>,
    ) -> Result<GeneratedDocument> {
        if self.templates.get(template_id).is_none() {
            return Err(TemplateError::UnknownTemplate(template_id.to_string()).into());
        }

        let user = self.users.current(auth).await?;
        if !user.company_info.is_complete() {
            return Err(AppError::Forbidden(
                "Complete your company profile before generating documents".to_string(),
            ));
        }

        let ctx = TemplateContext::new(user.company_info.document_details(), form_values(form));
        let bytes = self.templates.generate(template_id, &ctx)?;

        tracing::info!(
            user_id = %user.id,
            template = template_id,
            size = bytes.len(),
            "Document generated"
        );

        Ok(GeneratedDocument {
            filename: format!("{template_id}.docx"),
            bytes,
        })
    }
}

/// Flatten JSON form values to text; null becomes absent
fn form_values(form: HashMap<String, Value>) -> HashMap<String, String> {
    form.into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            };
            Some((key, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_values_flatten_json() {
        let form: HashMap<String, Value> = serde_json::from_value(json!({
            "employeeName": "Ана Петровска",
            "leaveDays": 20,
            "endDate": null,
        }))
        .unwrap();

        let values = form_values(form);
        assert_eq!(values["employeeName"], "Ана Петровска");
        assert_eq!(values["leaveDays"], "20");
        assert!(!values.contains_key("endDate"));
    }
}
