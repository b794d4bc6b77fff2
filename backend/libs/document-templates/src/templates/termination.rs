use super::{article, employee_signature, BodyResult};
use crate::blocks::Block;
use crate::context::TemplateContext;
use crate::registry::{DocumentTemplate, FieldKind, FieldSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("employeeName", "Име и презиме на работникот", FieldKind::Text),
    FieldSpec::required("employeePin", "ЕМБГ", FieldKind::Text),
    FieldSpec::required("jobPosition", "Работно место", FieldKind::Text),
    FieldSpec::required("terminationDate", "Датум на престанок", FieldKind::Date),
    FieldSpec::optional("severancePay", "Отпремнина (денари)", FieldKind::Number),
];

pub struct TerminationAgreement;

impl DocumentTemplate for TerminationAgreement {
    fn id(&self) -> &'static str {
        "termination-agreement"
    }

    fn title(&self) -> &'static str {
        "Спогодба за престанок на работен однос"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn body(&self, ctx: &TemplateContext) -> BodyResult {
        let company = &ctx.company;

        let mut blocks = vec![Block::text(format!(
            "Склучена помеѓу {}, ЕДБ {}, застапувано од управителот {} и работникот {}, \
             ЕМБГ {}, вработен на работното место {}.",
            company.name,
            company.tax_number,
            company.manager,
            ctx.text("employeeName")?,
            ctx.text("employeePin")?,
            ctx.text("jobPosition")?,
        ))];

        blocks.extend(article(
            1,
            format!(
                "Договорните страни спогодбено утврдуваат дека работниот однос на работникот \
                 престанува на ден {} година, согласно член 70 од Законот за работните односи.",
                ctx.date_text("terminationDate")?
            ),
        ));

        let settlement = match ctx.optional("severancePay") {
            Some(_) => format!(
                "Работодавачот се обврзува на работникот да му исплати отпремнина во износ од \
                 {} денари најдоцна до денот на престанокот на работниот однос.",
                ctx.amount_text("severancePay")?
            ),
            None => "Договорните страни немаат меѓусебни парични побарувања по основ на \
                     работниот однос."
                .to_string(),
        };
        blocks.extend(article(2, settlement));
        blocks.extend(article(
            3,
            "Спогодбата е составена во два истоветни примероци, по еден за секоја страна, \
             и стапува на сила со денот на потпишувањето."
                .to_string(),
        ));

        Ok(blocks)
    }

    fn counter_signature(&self, ctx: &TemplateContext) -> Option<Vec<String>> {
        employee_signature(ctx)
    }
}
