use super::BodyResult;
use crate::blocks::{Block, Span};
use crate::context::TemplateContext;
use crate::registry::{DocumentTemplate, FieldKind, FieldSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("employeeName", "Име и презиме на работникот", FieldKind::Text),
    FieldSpec::required("employeePin", "ЕМБГ", FieldKind::Text),
    FieldSpec::required("jobPosition", "Работно место", FieldKind::Text),
    FieldSpec::required("employedSince", "Вработен од", FieldKind::Date),
    FieldSpec::optional("purpose", "Намена на потврдата", FieldKind::Text),
];

pub struct EmploymentConfirmation;

impl DocumentTemplate for EmploymentConfirmation {
    fn id(&self) -> &'static str {
        "employment-confirmation"
    }

    fn title(&self) -> &'static str {
        "Потврда за вработување"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn body(&self, ctx: &TemplateContext) -> BodyResult {
        let purpose = ctx.optional("purpose").unwrap_or("лични потреби");

        Ok(vec![
            Block::spans(vec![
                Span::plain(format!("Со оваа потврда {} потврдува дека ", ctx.company.name)),
                Span::bold(ctx.text("employeeName")?.to_string()),
                Span::plain(format!(
                    ", ЕМБГ {}, е вработен/а на неопределено време на работното место {}, \
                     почнувајќи од {} година.",
                    ctx.text("employeePin")?,
                    ctx.text("jobPosition")?,
                    ctx.date_text("employedSince")?,
                )),
            ]),
            Block::text(format!(
                "Потврдата се издава на барање на работникот и служи за {purpose}."
            )),
        ])
    }
}
