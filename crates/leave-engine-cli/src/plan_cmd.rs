use std::fs;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use leave_engine::{
    plan_leave_with_overrides, to_csv, to_ical, Labels, LeavePlan, Overrides, PlanInput,
};
use tracing::info;

use crate::cli::{Format, PlanArgs};
use crate::input;

pub fn run(args: PlanArgs) -> Result<()> {
    let mut household = input::load(&args.input)?;
    apply_setting_flags(&mut household, &args);

    let mut overrides = household
        .overrides
        .as_ref()
        .map(Overrides::from_wire)
        .unwrap_or_default();
    for flag in &args.overrides {
        input::apply_override_flag(&mut overrides, flag)?;
    }

    let plan = plan_leave_with_overrides(&household, &overrides);
    info!(
        days = plan.plan.len(),
        used_a = plan.used_a,
        used_b = plan.used_b,
        uncovered = plan.still_uncovered,
        "plan built"
    );

    let rendered = render(&plan, &household, &args)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "plan written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Command-line settings win over the input file.
fn apply_setting_flags(household: &mut PlanInput, args: &PlanArgs) {
    if args.skip_weekends {
        household.skip_weekends = true;
    }
    if args.prioritize_seasons {
        household.prioritize_seasons = true;
    }
    if let Some(joint_days) = args.joint_days {
        household.joint_days = joint_days;
    }
}

fn render(plan: &LeavePlan, household: &PlanInput, args: &PlanArgs) -> Result<String> {
    let labels = Labels::from_input(household);
    match args.format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(plan).context("failed to encode plan")?;
            json.push('\n');
            Ok(json)
        }
        Format::Csv => to_csv(plan, &labels).context("failed to encode CSV"),
        Format::Ics => {
            let generated_at = match &args.generated_at {
                Some(s) => DateTime::parse_from_rfc3339(s)
                    .with_context(|| format!("invalid --generated-at '{s}'"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            Ok(to_ical(plan, &labels, generated_at))
        }
    }
}
