use super::{employee_signature, BodyResult};
use crate::blocks::Block;
use crate::context::TemplateContext;
use crate::registry::{DocumentTemplate, FieldKind, FieldSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("employeeName", "Име и презиме", FieldKind::Text),
    FieldSpec::required("employeePin", "ЕМБГ", FieldKind::Text),
    FieldSpec::required("processingPurpose", "Цел на обработката", FieldKind::Text),
];

pub struct PersonalDataConsent;

impl DocumentTemplate for PersonalDataConsent {
    fn id(&self) -> &'static str {
        "personal-data-consent"
    }

    fn title(&self) -> &'static str {
        "Согласност за обработка на лични податоци"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn body(&self, ctx: &TemplateContext) -> BodyResult {
        Ok(vec![
            Block::text(format!(
                "Јас, {}, ЕМБГ {}, согласно Законот за заштита на личните податоци, \
                 изјавувам дека се согласувам {} да ги обработува моите лични податоци \
                 за следната цел: {}.",
                ctx.text("employeeName")?,
                ctx.text("employeePin")?,
                ctx.company.name,
                ctx.text("processingPurpose")?,
            )),
            Block::text(
                "Запознаен/а сум со правото на пристап, исправка и бришење на личните \
                 податоци, како и со правото оваа согласност да ја повлечам во секое време.",
            ),
        ])
    }

    fn counter_signature(&self, ctx: &TemplateContext) -> Option<Vec<String>> {
        employee_signature(ctx)
    }
}
