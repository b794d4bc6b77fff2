//! Template trait and the registry of built-in templates

use serde::Serialize;

use crate::blocks::{Align, Block, Document, Span};
use crate::context::TemplateContext;
use crate::format::format_date;
use crate::render;
use crate::templates;
use crate::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    /// `YYYY-MM-DD`
    Date,
    Number,
}

/// A form field a template reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    /// Macedonian label shown by the form
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    fn check(&self, ctx: &TemplateContext) -> Result<(), TemplateError> {
        if !self.required && ctx.optional(self.name).is_none() {
            return Ok(());
        }

        match self.kind {
            FieldKind::Text => ctx.text(self.name).map(|_| ()),
            FieldKind::Date => ctx.date(self.name).map(|_| ()),
            FieldKind::Number => ctx.amount(self.name).map(|_| ()),
        }
    }
}

/// A legal document that can be filled from a form
pub trait DocumentTemplate: Send + Sync {
    /// Stable identifier used in URLs
    fn id(&self) -> &'static str;

    /// Title printed at the top of the document
    fn title(&self) -> &'static str;

    fn fields(&self) -> &'static [FieldSpec];

    /// Body paragraphs between the title and the date line.
    /// Fields have already been checked against [`Self::fields`].
    fn body(&self, ctx: &TemplateContext) -> Result<Vec<Block>, TemplateError>;

    /// Left signature column; `None` when only the company signs
    fn counter_signature(&self, _ctx: &TemplateContext) -> Option<Vec<String>> {
        None
    }
}

/// Summary of a template for the catalogue endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub required_fields: Vec<&'static str>,
    pub fields: &'static [FieldSpec],
}

pub struct TemplateRegistry {
    templates: Vec<Box<dyn DocumentTemplate>>,
}

impl TemplateRegistry {
    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Registry with every template shipped in this crate
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        for template in templates::builtin() {
            registry.register(template);
        }
        registry
    }

    /// Add a template, replacing one with the same id
    pub fn register(&mut self, template: Box<dyn DocumentTemplate>) {
        self.templates.retain(|t| t.id() != template.id());
        self.templates.push(template);
    }

    pub fn get(&self, id: &str) -> Option<&dyn DocumentTemplate> {
        self.templates
            .iter()
            .find(|t| t.id() == id)
            .map(|t| t.as_ref())
    }

    pub fn list(&self) -> Vec<TemplateInfo> {
        self.templates
            .iter()
            .map(|t| TemplateInfo {
                id: t.id(),
                title: t.title(),
                required_fields: t
                    .fields()
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name)
                    .collect(),
                fields: t.fields(),
            })
            .collect()
    }

    /// Fill a template into a block tree
    pub fn compose(&self, id: &str, ctx: &TemplateContext) -> Result<Document, TemplateError> {
        let template = self
            .get(id)
            .ok_or_else(|| TemplateError::UnknownTemplate(id.to_string()))?;

        for field in template.fields() {
            field.check(ctx)?;
        }

        let company = &ctx.company;
        let mut doc = Document::new(template.title());

        doc.push(Block::Paragraph {
            spans: vec![Span::bold(company.name.clone())],
            align: Align::Left,
        })
        .push(Block::aligned(company.address.clone(), Align::Left))
        .push(Block::aligned(
            format!("ЕДБ: {}", company.tax_number),
            Align::Left,
        ))
        .push(Block::Spacer)
        .push(Block::Title(template.title().to_uppercase()))
        .push(Block::Spacer)
        .extend(template.body(ctx)?)
        .push(Block::Spacer)
        .push(Block::aligned(
            format!("{}, {} година", ctx.place(), format_date(ctx.issued_on)),
            Align::Left,
        ))
        .push(Block::Spacer)
        .push(Block::Signatures {
            left: template.counter_signature(ctx).unwrap_or_default(),
            right: vec![
                company.name.clone(),
                "Управител".to_string(),
                company.manager.clone(),
                "_____________________".to_string(),
            ],
        });

        Ok(doc)
    }

    /// Fill a template and render it to DOCX bytes
    pub fn generate(&self, id: &str, ctx: &TemplateContext) -> Result<Vec<u8>, TemplateError> {
        let doc = self.compose(id, ctx)?;
        render::to_docx(&doc)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids() {
        let ids: Vec<_> = TemplateRegistry::with_builtin()
            .list()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "employment-agreement",
                "annual-leave-decision",
                "employment-confirmation",
                "termination-agreement",
                "personal-data-consent",
                "disciplinary-decision",
            ]
        );
    }

    #[test]
    fn test_required_fields_exclude_optional() {
        let registry = TemplateRegistry::with_builtin();
        let info = registry
            .list()
            .into_iter()
            .find(|t| t.id == "employment-agreement")
            .unwrap();
        assert!(info.required_fields.contains(&"startDate"));
        assert!(!info.required_fields.contains(&"endDate"));
    }

    #[test]
    fn test_unknown_template() {
        let registry = TemplateRegistry::with_builtin();
        let ctx = TemplateContext::new(Default::default(), Default::default());
        assert_eq!(
            registry.compose("nope", &ctx).unwrap_err(),
            TemplateError::UnknownTemplate("nope".into())
        );
    }
}
