use super::{employee_signature, BodyResult};
use crate::blocks::{Align, Block, Span};
use crate::context::TemplateContext;
use crate::registry::{DocumentTemplate, FieldKind, FieldSpec};
use crate::TemplateError;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("employeeName", "Име и презиме на работникот", FieldKind::Text),
    FieldSpec::required("jobPosition", "Работно место", FieldKind::Text),
    FieldSpec::required("leaveYear", "Година за која се користи одморот", FieldKind::Number),
    FieldSpec::required("leaveDays", "Број на работни денови", FieldKind::Number),
    FieldSpec::required("startDate", "Почеток на одморот", FieldKind::Date),
    FieldSpec::required("endDate", "Крај на одморот", FieldKind::Date),
];

pub struct AnnualLeaveDecision;

impl DocumentTemplate for AnnualLeaveDecision {
    fn id(&self) -> &'static str {
        "annual-leave-decision"
    }

    fn title(&self) -> &'static str {
        "Решение за годишен одмор"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn body(&self, ctx: &TemplateContext) -> BodyResult {
        if ctx.date("endDate")? < ctx.date("startDate")? {
            return Err(TemplateError::InvalidField {
                field: "endDate".to_string(),
                reason: "must not be before startDate".to_string(),
            });
        }

        let employee = ctx.text("employeeName")?;
        let days = ctx.amount("leaveDays")?;
        let year = ctx.amount("leaveYear")?;

        Ok(vec![
            Block::text(format!(
                "Врз основа на член 137 од Законот за работните односи, управителот на {} \
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
                Span::bold(employee.to_string()),
                Span::plain(format!(
                    ", вработен на работното место {}, му се одобрува користење на годишен \
                     одмор за {} година во траење од {} работни дена.",
                    ctx.text("jobPosition")?,
                    year.trunc(),
                    days.trunc(),
                )),
            ]),
            Block::text(format!(
                "Годишниот одмор ќе се користи во периодот од {} до {} година.",
                ctx.date_text("startDate")?,
                ctx.date_text("endDate")?,
            )),
            Block::text(
                "За време на користењето на годишниот одмор работникот има право на \
                 надоместок на плата во висина на просечната плата.",
            ),
        ])
    }

    fn counter_signature(&self, ctx: &TemplateContext) -> Option<Vec<String>> {
        employee_signature(ctx)
    }
}
