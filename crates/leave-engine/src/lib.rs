//! # leave-engine
//!
//! Deterministic annual-leave planning for two-parent (or single-parent)
//! households.
//!
//! Given each parent's weekly off-days and leave allowance, a joint-leave
//! budget, and the days school is closed, the engine decides who covers each
//! closure day: a parent on a rest day, a parent on leave, both together, an
//! external caregiver, or nobody. Leave is spent in whole contiguous blocks
//! where possible, joint leave is steered into Christmas and Summer, and a
//! block is split between the parents only when neither can take it alone.
//!
//! ## Modules
//!
//! - [`calendar`] — Day-only date parsing, formatting, weekday queries, block grouping, season windows
//! - [`overrides`] — Typed per-date coverage requests parsed from their wire strings
//! - [`plan`] — The allocation engine and its input/output types
//! - [`export`] — CSV and iCalendar renderings of a plan
//! - [`error`] — Error types

pub mod calendar;
pub mod error;
pub mod export;
pub mod overrides;
pub mod plan;

pub use calendar::{
    add_days, group_consecutive_dates, is_weekend, parse_date_only, season_windows, to_iso_date,
    Season, SeasonWindow,
};
pub use error::LeaveError;
pub use export::{to_csv, to_ical, Labels};
pub use overrides::{Override, Overrides};
pub use plan::{
    plan_leave, plan_leave_with_overrides, Coverage, DayPlan, LeavePlan, ParentConfig, PlanInput,
    Who,
};
