//! CSV and iCalendar renderings of a [`LeavePlan`].

use chrono::{DateTime, Utc};

use crate::calendar::to_iso_date;
use crate::error::{LeaveError, Result};
use crate::plan::{Coverage, DayPlan, LeavePlan, PlanInput, Who};

/// Display names used in exported rows and event summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub parent_a: String,
    pub parent_b: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            parent_a: "Parent A".to_string(),
            parent_b: "Parent B".to_string(),
        }
    }
}

impl Labels {
    /// Use the parents' configured names, falling back to the defaults for
    /// blank or missing ones.
    pub fn from_input(input: &PlanInput) -> Self {
        let defaults = Self::default();
        let pick = |name: Option<&str>, fallback: String| match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => fallback,
        };
        Self {
            parent_a: pick(Some(input.parent_a.name.as_str()), defaults.parent_a),
            parent_b: pick(
                input.parent_b.as_ref().map(|b| b.name.as_str()),
                defaults.parent_b,
            ),
        }
    }

    fn who(&self, who: Who) -> String {
        match who {
            Who::A => self.parent_a.clone(),
            Who::B => self.parent_b.clone(),
            Who::Both => format!("{} & {}", self.parent_a, self.parent_b),
        }
    }
}

// ── CSV ─────────────────────────────────────────────────────────────────────

/// Render the plan as CSV with a `date,weekday,coverage,who` header.
///
/// # Errors
///
/// Returns [`LeaveError::Export`] if the CSV writer fails.
pub fn to_csv(plan: &LeavePlan, labels: &Labels) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["date", "weekday", "coverage", "who"])
        .map_err(|e| LeaveError::Export(e.to_string()))?;

    for day in &plan.plan {
        let (kind, who) = describe(&day.coverage, labels);
        writer
            .write_record([
                to_iso_date(day.date).as_str(),
                day.weekday.as_str(),
                kind,
                who.as_str(),
            ])
            .map_err(|e| LeaveError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LeaveError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| LeaveError::Export(e.to_string()))
}

fn describe(coverage: &Coverage, labels: &Labels) -> (&'static str, String) {
    match coverage {
        Coverage::None => ("none", String::new()),
        Coverage::Off { who } => ("off", labels.who(*who)),
        Coverage::Leave { who } => ("leave", labels.who(*who)),
        Coverage::Care { caregiver_id } => ("care", caregiver_id.clone()),
    }
}

// ── iCalendar ───────────────────────────────────────────────────────────────

/// Render the plan as an RFC 5545 calendar with one all-day event per day.
///
/// `generated_at` becomes every event's `DTSTAMP`; passing it in keeps the
/// output reproducible.
pub fn to_ical(plan: &LeavePlan, labels: &Labels, generated_at: DateTime<Utc>) -> String {
    let stamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//leave-engine//leave plan//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    for day in &plan.plan {
        push_event(&mut lines, day, labels, &stamp);
    }

    lines.push("END:VCALENDAR".to_string());
    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

fn push_event(lines: &mut Vec<String>, day: &DayPlan, labels: &Labels, stamp: &str) {
    let start = day.date.format("%Y%m%d").to_string();
    // DTEND is exclusive; the last representable date has no successor.
    let end = day
        .date
        .succ_opt()
        .map(|d| d.format("%Y%m%d").to_string());

    lines.push("BEGIN:VEVENT".to_string());
    lines.push(format!("UID:{}@leave-engine", to_iso_date(day.date)));
    lines.push(format!("DTSTAMP:{stamp}"));
    lines.push(format!("DTSTART;VALUE=DATE:{start}"));
    if let Some(end) = end {
        lines.push(format!("DTEND;VALUE=DATE:{end}"));
    }
    lines.push(format!("SUMMARY:{}", escape_text(&summary(&day.coverage, labels))));
    lines.push("TRANSP:TRANSPARENT".to_string());
    lines.push("END:VEVENT".to_string());
}

fn summary(coverage: &Coverage, labels: &Labels) -> String {
    match coverage {
        Coverage::None => "School closed: no cover".to_string(),
        Coverage::Off { who } => format!("Off: {}", labels.who(*who)),
        Coverage::Leave { who } => format!("Leave: {}", labels.who(*who)),
        Coverage::Care { caregiver_id } => format!("Care: {caregiver_id}"),
    }
}

/// Escape a TEXT value per RFC 5545 section 3.3.11.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{plan_leave, ParentConfig};
    use chrono::TimeZone;

    fn sample() -> (PlanInput, LeavePlan) {
        let input = PlanInput {
            parent_a: ParentConfig {
                name: "Alex".into(),
                off_days: vec![1],
                allowance_days: 1,
                ..Default::default()
            },
            parent_b: Some(ParentConfig {
                name: "Sam".into(),
                allowance_days: 0,
                ..Default::default()
            }),
            school_closed_dates: vec![
                "2025-02-17".into(),
                "2025-02-18".into(),
                "2025-02-19".into(),
                "2025-02-20".into(),
            ],
            overrides: Some(
                [("2025-02-19".to_string(), "C:Gran, Nan".to_string())]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        };
        let plan = plan_leave(&input);
        (input, plan)
    }

    #[test]
    fn test_labels_from_input() {
        let (input, _) = sample();
        let labels = Labels::from_input(&input);
        assert_eq!(labels.parent_a, "Alex");
        assert_eq!(labels.parent_b, "Sam");
    }

    #[test]
    fn test_labels_fall_back_for_blank_names() {
        let input = PlanInput {
            parent_a: ParentConfig {
                name: "  ".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(Labels::from_input(&input), Labels::default());
    }

    #[test]
    fn test_csv_rows() {
        let (input, plan) = sample();
        let csv = to_csv(&plan, &Labels::from_input(&input)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,weekday,coverage,who");
        assert_eq!(lines[1], "2025-02-17,Mon,off,Alex");
        assert_eq!(lines[2], "2025-02-18,Tue,leave,Alex");
        assert_eq!(lines[3], "2025-02-19,Wed,care,\"Gran, Nan\"");
        assert_eq!(lines[4], "2025-02-20,Thu,none,");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_csv_empty_plan_has_header_only() {
        let csv = to_csv(&LeavePlan::default(), &Labels::default()).unwrap();
        assert_eq!(csv, "date,weekday,coverage,who\n");
    }

    #[test]
    fn test_ical_events() {
        let (input, plan) = sample();
        let stamp = Utc.with_ymd_and_hms(2025, 1, 10, 8, 30, 0).unwrap();
        let ics = to_ical(&plan, &Labels::from_input(&input), stamp);

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 4);
        assert!(ics.contains("DTSTAMP:20250110T083000Z"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20250218\r\nDTEND;VALUE=DATE:20250219"));
        assert!(ics.contains("SUMMARY:Off: Alex"));
        assert!(ics.contains("SUMMARY:Leave: Alex"));
        assert!(ics.contains("SUMMARY:Care: Gran\\, Nan"));
        assert!(ics.contains("SUMMARY:School closed: no cover"));
        assert!(ics.contains("UID:2025-02-20@leave-engine"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a;b,c\\d\ne"), "a\\;b\\,c\\\\d\\ne");
    }
}
