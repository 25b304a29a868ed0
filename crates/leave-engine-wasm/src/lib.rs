//! WASM bindings for leave-engine.
//!
//! Every function takes and returns JSON strings in the same camelCase
//! shapes the engine serializes, so the web app never has to mirror the Rust
//! types. Errors surface as thrown JS strings.

use chrono::{DateTime, Utc};
use leave_engine::{plan_leave, to_csv, to_ical, Labels, LeavePlan, PlanInput};
use wasm_bindgen::prelude::*;

fn parse_input(input_json: &str) -> Result<PlanInput, JsValue> {
    serde_json::from_str(input_json)
        .map_err(|e| JsValue::from_str(&format!("invalid plan input: {e}")))
}

fn run(input_json: &str) -> Result<(PlanInput, LeavePlan), JsValue> {
    let input = parse_input(input_json)?;
    let plan = plan_leave(&input);
    Ok((input, plan))
}

/// Plan leave. Takes a `PlanInput` JSON string, returns a `LeavePlan` JSON string.
#[wasm_bindgen(js_name = "planLeave")]
pub fn plan_leave_json(input_json: &str) -> Result<String, JsValue> {
    let (_, plan) = run(input_json)?;
    serde_json::to_string(&plan).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Plan leave and render it as CSV.
#[wasm_bindgen(js_name = "planLeaveCsv")]
pub fn plan_leave_csv(input_json: &str) -> Result<String, JsValue> {
    let (input, plan) = run(input_json)?;
    to_csv(&plan, &Labels::from_input(&input)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Plan leave and render it as iCalendar. `generated_at` is an RFC 3339
/// timestamp (the browser's `new Date().toISOString()`).
#[wasm_bindgen(js_name = "planLeaveIcs")]
pub fn plan_leave_ics(input_json: &str, generated_at: &str) -> Result<String, JsValue> {
    let stamp = DateTime::parse_from_rfc3339(generated_at)
        .map_err(|e| JsValue::from_str(&format!("invalid generatedAt '{generated_at}': {e}")))?
        .with_timezone(&Utc);
    let (input, plan) = run(input_json)?;
    Ok(to_ical(&plan, &Labels::from_input(&input), stamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only success paths: constructing a JsValue panics off wasm32.

    const INPUT: &str = r#"{
        "parentA": { "name": "Alex", "allowanceDays": 2 },
        "parentB": { "name": "Sam", "allowanceDays": 3 },
        "schoolClosedDates": ["2025-04-07", "2025-04-08"]
    }"#;

    #[test]
    fn test_plan_leave_json_round_trips_through_engine_types() {
        let out = plan_leave_json(INPUT).unwrap();
        let plan: LeavePlan = serde_json::from_str(&out).unwrap();
        assert_eq!(plan.used_b, 2);
        assert_eq!(plan.remaining_b, 1);
    }

    #[test]
    fn test_plan_leave_csv_names_parents() {
        let out = plan_leave_csv(INPUT).unwrap();
        assert!(out.contains("2025-04-07,Mon,leave,Sam"));
    }

    #[test]
    fn test_plan_leave_ics_stamp() {
        let out = plan_leave_ics(INPUT, "2025-01-10T08:30:00.000Z").unwrap();
        assert!(out.contains("DTSTAMP:20250110T083000Z"));
    }
}
