//! Input to template generation

use chrono::{Local, NaiveDate};
use std::collections::HashMap;

use crate::format::{format_amount, format_date, parse_amount, parse_date};
use crate::TemplateError;

/// Company fields printed in the header and signature block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyDetails {
    pub name: String,
    pub address: String,
    pub tax_number: String,
    pub manager: String,
}

/// Form values plus company details for a single generation request
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub company: CompanyDetails,
    pub form: HashMap<String, String>,
    /// Place printed on the date line; defaults to the city of the company address
    pub place: Option<String>,
    pub issued_on: NaiveDate,
}

impl TemplateContext {
    pub fn new(company: CompanyDetails, form: HashMap<String, String>) -> Self {
        Self {
            company,
            form,
            place: None,
            issued_on: Local::now().date_naive(),
        }
    }

    pub fn issued_on(mut self, date: NaiveDate) -> Self {
        self.issued_on = date;
        self
    }

    /// Trimmed value of a non-blank field
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.form
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn text(&self, key: &str) -> Result<&str, TemplateError> {
        self.optional(key)
            .ok_or_else(|| TemplateError::MissingField(key.to_string()))
    }

    pub fn date(&self, key: &str) -> Result<NaiveDate, TemplateError> {
        parse_date(self.text(key)?).ok_or_else(|| TemplateError::InvalidDate(key.to_string()))
    }

    /// Date rendered as `dd.mm.yyyy`
    pub fn date_text(&self, key: &str) -> Result<String, TemplateError> {
        self.date(key).map(format_date)
    }

    pub fn optional_date_text(&self, key: &str) -> Result<Option<String>, TemplateError> {
        match self.optional(key) {
            Some(_) => self.date_text(key).map(Some),
            None => Ok(None),
        }
    }

    pub fn amount(&self, key: &str) -> Result<f64, TemplateError> {
        parse_amount(self.text(key)?).ok_or_else(|| TemplateError::InvalidField {
            field: key.to_string(),
            reason: "expected a number between 0 and 1.000.000.000.000".to_string(),
        })
    }

    pub fn amount_text(&self, key: &str) -> Result<String, TemplateError> {
        self.amount(key).map(format_amount)
    }

    /// Place for the date line
    pub fn place(&self) -> String {
        if let Some(place) = self.place.as_deref().filter(|p| !p.trim().is_empty()) {
            return place.trim().to_string();
        }

        // "ул. Македонија 1, Скопје" -> "Скопје"
        self.company
            .address
            .rsplit(',')
            .map(str::trim)
            .find(|part| !part.is_empty())
            .unwrap_or("Скопје")
            .to_string()
    }
}
