use super::BodyResult;
use crate::blocks::{Align, Block, Span};
use crate::context::TemplateContext;
use crate::registry::{DocumentTemplate, FieldKind, FieldSpec};
use crate::TemplateError;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("employeeName", "Име и презиме на работникот", FieldKind::Text),
    FieldSpec::required("jobPosition", "Работно место", FieldKind::Text),
    FieldSpec::required("violationDate", "Датум на повредата", FieldKind::Date),
    FieldSpec::required("violationDescription", "Опис на повредата", FieldKind::Text),
    FieldSpec::required("measure", "Дисциплинска мерка", FieldKind::Text),
    FieldSpec::optional("salaryReductionPercent", "Намалување на плата (%)", FieldKind::Number),
];

/// Statutory ceiling for a salary reduction fine
const MAX_REDUCTION_PERCENT: f64 = 15.0;

pub struct DisciplinaryDecision;

impl DocumentTemplate for DisciplinaryDecision {
    fn id(&self) -> &'static str {
        "disciplinary-decision"
    }

    fn title(&self) -> &'static str {
        "Решение за дисциплинска мерка"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn body(&self, ctx: &TemplateContext) -> BodyResult {
        let mut measure = ctx.text("measure")?.to_string();
        if ctx.optional("salaryReductionPercent").is_some() {
            let percent = ctx.amount("salaryReductionPercent")?;
            if percent > MAX_REDUCTION_PERCENT {
                return Err(TemplateError::InvalidField {
                    field: "salaryReductionPercent".to_string(),
                    reason: format!("must not exceed {MAX_REDUCTION_PERCENT}"),
                });
            }
            measure = format!(
                "{measure}, со намалување на нето платата за {}% во траење од еден месец",
                ctx.amount_text("salaryReductionPercent")?
            );
        }

        Ok(vec![
            Block::text(format!(
                "Врз основа на член 81 од Законот за работните односи, управителот на {} \
                 го донесува следното:",
                ctx.company.name
            )),
            Block::Spacer,
            Block::Paragraph {
                spans: vec![Span::bold("РЕШЕНИЕ")],
                align: Align::Center,
            },
            Block::spans(vec![
                Span::plain("На работникот "),
                Span::bold(ctx.text("employeeName")?.to_string()),
                Span::plain(format!(
                    ", вработен на работното место {}, му се изрекува дисциплинска мерка: {}.",
                    ctx.text("jobPosition")?,
                    measure
                )),
            ]),
            Block::Heading("Образложение".to_string()),
            Block::text(format!(
                "На ден {} година работникот ја сторил следната повреда на работниот ред и \
                 дисциплина: {}",
                ctx.date_text("violationDate")?,
                ctx.text("violationDescription")?,
            )),
            Block::text(
                "Против ова решение работникот има право на приговор во рок од осум дена \
                 од денот на приемот.",
            ),
        ])
    }
}
