//! # Document Templates
//!
//! Legal documents for Macedonian companies, generated from form data plus the
//! company profile of the requesting user.
//!
//! Generation happens in two steps:
//! 1. A [`DocumentTemplate`] turns a [`TemplateContext`] into a neutral
//!    [`Document`] block tree (header, title, body, signature).
//! 2. [`render::to_docx`] renders the block tree into DOCX bytes.
//!
//! Keeping the block tree separate from the DOCX writer lets the text content
//! be asserted in tests without unpacking a zip archive.
//!
//! ## Example
//!
//! ```rust
//! use document_templates::{CompanyDetails, TemplateContext, TemplateRegistry};
//! use std::collections::HashMap;
//!
//! let company = CompanyDetails {
//!     name: "Некса ДООЕЛ".into(),
//!     address: "ул. Македонија 1, Скопје".into(),
//!     tax_number: "4030000000000".into(),
//!     manager: "Ана Петровска".into(),
//! };
//! let mut form = HashMap::new();
//! form.insert("employeeName".to_string(), "Марко Марковски".to_string());
//! form.insert("employeePin".to_string(), "0101990450001".to_string());
//! form.insert("jobPosition".to_string(), "Сметководител".to_string());
//! form.insert("employedSince".to_string(), "2021-03-15".to_string());
//!
//! let registry = TemplateRegistry::with_builtin();
//! let ctx = TemplateContext::new(company, form);
//! let bytes = registry.generate("employment-confirmation", &ctx).unwrap();
//! assert!(bytes.starts_with(b"PK"));
//! ```

pub mod blocks;
pub mod context;
pub mod format;
pub mod registry;
pub mod render;
mod templates;

pub use blocks::{Align, Block, Document, Span};
pub use context::{CompanyDetails, TemplateContext};
pub use registry::{DocumentTemplate, FieldKind, FieldSpec, TemplateInfo, TemplateRegistry};

use thiserror::Error;

/// Errors produced while filling or rendering a template
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid date in field {0}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid value in field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Failed to render document: {0}")]
    Render(String),
}
