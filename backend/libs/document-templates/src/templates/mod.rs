//! Built-in Macedonian templates

mod annual_leave;
mod data_consent;
mod disciplinary;
mod employment_agreement;
mod employment_confirmation;
mod termination;

use crate::blocks::Block;
use crate::context::TemplateContext;
use crate::registry::DocumentTemplate;
use crate::TemplateError;

pub(crate) fn builtin() -> Vec<Box<dyn DocumentTemplate>> {
    vec![
        Box::new(employment_agreement::EmploymentAgreement),
        Box::new(annual_leave::AnnualLeaveDecision),
        Box::new(employment_confirmation::EmploymentConfirmation),
        Box::new(termination::TerminationAgreement),
        Box::new(data_consent::PersonalDataConsent),
        Box::new(disciplinary::DisciplinaryDecision),
    ]
}

/// "Работник" column with the employee name under it
fn employee_signature(ctx: &TemplateContext) -> Option<Vec<String>> {
    ctx.text("employeeName").ok().map(|name| {
        vec![
            "Работник".to_string(),
            name.to_string(),
            "_____________________".to_string(),
        ]
    })
}

/// `Член N` heading followed by one paragraph
fn article(number: usize, text: String) -> [Block; 2] {
    [
        Block::Heading(format!("Член {number}")),
        Block::text(text),
    ]
}

type BodyResult = Result<Vec<Block>, TemplateError>;
