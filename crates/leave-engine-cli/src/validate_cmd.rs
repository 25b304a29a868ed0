use anyhow::{bail, Result};
use leave_engine::{parse_date_only, Override};

use crate::cli::ValidateArgs;
use crate::input;

pub fn run(args: ValidateArgs) -> Result<()> {
    let household = input::load(&args.input)?;
    let mut problems = Vec::new();

    for raw in &household.school_closed_dates {
        if let Err(e) = parse_date_only(raw) {
            problems.push(format!("closure date: {e}"));
        }
    }
    for raw in household.bank_holiday_set.iter().flatten() {
        if let Err(e) = parse_date_only(raw) {
            problems.push(format!("bank holiday: {e}"));
        }
    }
    for (date, directive) in household.overrides.iter().flatten() {
        if let Err(e) = parse_date_only(date) {
            problems.push(format!("override key: {e}"));
        }
        if let Err(e) = directive.parse::<Override>() {
            problems.push(format!("override {date}: {e}"));
        }
    }
    for (label, parent) in std::iter::once(("parentA", &household.parent_a))
        .chain(household.parent_b.as_ref().map(|b| ("parentB", b)))
    {
        for day in parent.off_days.iter().filter(|d| **d > 6) {
            problems.push(format!("{label}: off day {day} is not a weekday (0-6)"));
        }
    }

    println!(
        "{} closure date(s), {} override(s), {} parent(s)",
        household.school_closed_dates.len(),
        household.overrides.as_ref().map_or(0, |o| o.len()),
        1 + household.parent_b.is_some() as usize
    );
    for problem in &problems {
        println!("  {problem}");
    }

    if !problems.is_empty() {
        bail!("{} problem(s) found; the planner would ignore these entries", problems.len());
    }
    println!("ok");
    Ok(())
}
