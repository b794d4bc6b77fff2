use super::{article, employee_signature, BodyResult};
use crate::blocks::Block;
use crate::context::TemplateContext;
use crate::registry::{DocumentTemplate, FieldKind, FieldSpec};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("employeeName", "Име и презиме на работникот", FieldKind::Text),
    FieldSpec::required("employeeAddress", "Адреса на работникот", FieldKind::Text),
    FieldSpec::required("employeePin", "ЕМБГ", FieldKind::Text),
    FieldSpec::required("jobPosition", "Работно место", FieldKind::Text),
    FieldSpec::required("startDate", "Датум на започнување", FieldKind::Date),
    FieldSpec::required("netSalary", "Нето плата (денари)", FieldKind::Number),
    FieldSpec::optional("endDate", "Датум на истек (определено време)", FieldKind::Date),
    FieldSpec::optional("workingHours", "Работни часови неделно", FieldKind::Number),
];

pub struct EmploymentAgreement;

impl DocumentTemplate for EmploymentAgreement {
    fn id(&self) -> &'static str {
        "employment-agreement"
    }

    fn title(&self) -> &'static str {
        "Договор за вработување"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn body(&self, ctx: &TemplateContext) -> BodyResult {
        let company = &ctx.company;
        let employee = ctx.text("employeeName")?;
        let start = ctx.date_text("startDate")?;

        let duration = match ctx.optional_date_text("endDate")? {
            Some(end) => format!(
                "Договорот се склучува на определено време, од {start} до {end} година."
            ),
            None => format!("Договорот се склучува на неопределено време, почнувајќи од {start} година."),
        };
        let hours = match ctx.optional("workingHours") {
            Some(_) => ctx.amount_text("workingHours")?,
            None => "40".to_string(),
        };

        let mut blocks = vec![Block::text(format!(
            "Склучен помеѓу {}, со седиште на {}, ЕДБ {}, застапувано од управителот {} \
             (во понатамошниот текст: Работодавач) и {}, со живеалиште на {}, ЕМБГ {} \
             (во понатамошниот текст: Работник).",
            company.name,
            company.address,
            company.tax_number,
            company.manager,
            employee,
            ctx.text("employeeAddress")?,
            ctx.text("employeePin")?,
        ))];

        blocks.extend(article(
            1,
            format!(
                "Работникот се вработува на работното место {}.",
                ctx.text("jobPosition")?
            ),
        ));
        blocks.extend(article(2, duration));
        blocks.extend(article(
            3,
            format!("Работникот работи со полно работно време од {hours} часа неделно."),
        ));
        blocks.extend(article(
            4,
            format!(
                "За извршената работа Работникот има право на месечна нето плата во износ од {} денари.",
                ctx.amount_text("netSalary")?
            ),
        ));
        blocks.extend(article(
            5,
            "Работникот има право на платен годишен одмор во траење од најмалку 20 работни дена \
             во согласност со Законот за работните односи."
                .to_string(),
        ));
        blocks.extend(article(
            6,
            "За сè што не е уредено со овој договор се применуваат одредбите од Законот за \
             работните односи и колективниот договор. Договорот е составен во два истоветни \
             примероци, по еден за секоја страна."
                .to_string(),
        ));

        Ok(blocks)
    }

    fn counter_signature(&self, ctx: &TemplateContext) -> Option<Vec<String>> {
        employee_signature(ctx)
    }
}
