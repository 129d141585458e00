use crate::models::{PlanRequest, PlanResponse};

pub const PLAN_SYSTEM: &str = include_str!("../data/prompts/plan_system.txt");
pub const PLAN_USER: &str = include_str!("../data/prompts/plan_user.txt");
pub const FLYER_IMAGE: &str = include_str!("../data/prompts/flyer_image.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// The template is scanned once; substituted values are copied verbatim and
/// never scanned for placeholders themselves. Unknown keys are left as-is.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after_open[..end];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    result
}

/// Labeled block describing the requested event, sent as the user message.
pub fn plan_user_message(request: &PlanRequest) -> String {
    render(
        PLAN_USER,
        &[
            ("prompt", &request.prompt),
            ("date", &request.date),
            ("time", &request.time),
            ("location", &request.location),
            ("flyer_style", &request.flyer_style),
        ],
    )
}

/// Image prompt for the flyer, seeded from the parsed plan.
///
/// Style comes from the request; theme and flyer text come from the plan.
/// Location, date and time are taken from the request so the rendered flyer
/// shows exactly what the user asked for.
pub fn flyer_image_prompt(request: &PlanRequest, plan: &PlanResponse) -> String {
    render(
        FLYER_IMAGE,
        &[
            ("flyer_style", &request.flyer_style),
            ("theme", &plan.theme),
            ("flyer", &plan.flyer),
            ("location", &request.location),
            ("date", &request.date),
            ("time", &request.time),
        ],
    )
}
