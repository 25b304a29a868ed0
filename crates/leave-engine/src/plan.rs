//! Annual-leave allocation.
//!
//! [`plan_leave`] takes two parents' weekly off-days and leave allowances, a
//! joint-leave budget, and a list of school-closure dates, and decides who
//! covers each closure day. It is a pure function: no clock, no I/O, and the
//! caller's [`PlanInput`] is never modified.
//!
//! # Stages
//!
//! Each stage only touches days that are still [`Coverage::None`]:
//!
//! 1. Normalize closure dates (drop unparsable, optionally drop weekends,
//!    sort, dedup).
//! 2. Seed free coverage from weekly off-days and bank holidays.
//! 3. Apply per-date overrides, subject to remaining allowance.
//! 4. Seasonal joint pass: whole Christmas blocks, then whole Summer blocks,
//!    taken by both parents from the joint budget.
//! 5. General pass: each remaining block goes whole to one parent, or is
//!    split once between the two when neither can cover it alone.
//! 6. Tally usage from the finished plan.
//!
//! Blocks are re-derived from the current plan at the start of every pass
//! and always visited earliest first. Ties between parents go to parent A.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

use crate::calendar::{
    group_consecutive_dates, is_weekend, parse_date_only, season_windows, weekday_index,
    weekday_label, years_touched, Season, SeasonWindow,
};
use crate::overrides::{Override, Overrides};

// ── Input ───────────────────────────────────────────────────────────────────

/// One parent's working pattern and leave budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentConfig {
    /// Display label.
    pub name: String,
    /// Weekdays (0 = Sunday .. 6 = Saturday) this parent does not work.
    pub off_days: Vec<u8>,
    /// Leave days available. Zero or negative means no leave can be assigned.
    pub allowance_days: i32,
    /// Whether bank holidays are automatic off-days for this parent.
    pub gets_bank_holidays: bool,
}

impl ParentConfig {
    fn is_off(&self, date: NaiveDate, bank_holidays: &BTreeSet<NaiveDate>) -> bool {
        self.off_days.contains(&weekday_index(date))
            || (self.gets_bank_holidays && bank_holidays.contains(&date))
    }
}

/// Everything the engine needs for one planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub parent_a: ParentConfig,
    /// Absent for single-parent households.
    #[serde(default)]
    pub parent_b: Option<ParentConfig>,
    /// ISO dates needing cover. Unparsable entries are ignored.
    #[serde(default)]
    pub school_closed_dates: Vec<String>,
    /// Days both parents may take off together, spent in seasonal windows.
    #[serde(default)]
    pub joint_days: i32,
    /// Drop Saturday and Sunday closures before planning.
    #[serde(default)]
    pub skip_weekends: bool,
    /// Wire-form overrides keyed by ISO date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_holiday_set: Option<BTreeSet<String>>,
    /// Enables the seasonal joint-leave pass.
    #[serde(default)]
    pub prioritize_seasons: bool,
}

// ── Output ──────────────────────────────────────────────────────────────────

/// Which parent a coverage entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Who {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "both")]
    Both,
}

impl Who {
    pub fn includes_a(self) -> bool {
        matches!(self, Who::A | Who::Both)
    }

    pub fn includes_b(self) -> bool {
        matches!(self, Who::B | Who::Both)
    }
}

/// How a closure day is covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Coverage {
    /// Nobody is available.
    None,
    /// A weekly off-day or bank holiday; costs no allowance.
    Off { who: Who },
    /// Paid for from allowance.
    Leave { who: Who },
    /// An external caregiver, only ever set by an override.
    Care {
        #[serde(rename = "caregiverId")]
        caregiver_id: String,
    },
}

impl Coverage {
    pub fn is_none(&self) -> bool {
        matches!(self, Coverage::None)
    }
}

/// The decision for one closure day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    /// `"Sun"` through `"Sat"`.
    pub weekday: String,
    pub coverage: Coverage,
}

/// The full plan plus usage totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeavePlan {
    pub plan: Vec<DayPlan>,
    pub used_a: i32,
    pub used_b: i32,
    /// Original allowance minus `used_a`.
    pub remaining_a: i32,
    pub remaining_b: i32,
    pub still_uncovered: i32,
    /// Joint budget left after the seasonal pass.
    pub joint_days_remaining: i32,
}

impl LeavePlan {
    /// Coverage for `date`, if it is one of the planned closure days.
    pub fn coverage_on(&self, date: NaiveDate) -> Option<&Coverage> {
        self.plan
            .binary_search_by_key(&date, |day| day.date)
            .ok()
            .map(|i| &self.plan[i].coverage)
    }
}

// ── Entry points ────────────────────────────────────────────────────────────

/// Plan leave for a household, parsing the wire-form overrides in `input`.
///
/// Unparsable closure dates, bank holidays, and overrides are dropped, so
/// this never fails.
///
/// # Examples
///
/// ```
/// use leave_engine::{plan_leave, Coverage, ParentConfig, PlanInput, Who};
///
/// let input = PlanInput {
///     parent_a: ParentConfig {
///         name: "Alex".into(),
///         off_days: vec![0, 3],
///         allowance_days: 5,
///         ..Default::default()
///     },
///     school_closed_dates: vec!["2025-02-18".into(), "2025-02-19".into()],
///     ..Default::default()
/// };
///
/// let result = plan_leave(&input);
/// assert_eq!(result.plan[0].coverage, Coverage::Leave { who: Who::A });
/// assert_eq!(result.plan[1].coverage, Coverage::Off { who: Who::A });
/// assert_eq!(result.remaining_a, 4);
/// ```
pub fn plan_leave(input: &PlanInput) -> LeavePlan {
    let overrides = input
        .overrides
        .as_ref()
        .map(Overrides::from_wire)
        .unwrap_or_default();
    plan_leave_with_overrides(input, &overrides)
}

/// Plan leave using already-parsed overrides; `input.overrides` is ignored.
pub fn plan_leave_with_overrides(input: &PlanInput, overrides: &Overrides) -> LeavePlan {
    let _span = debug_span!(
        "plan_leave",
        closures = input.school_closed_dates.len(),
        two_parents = input.parent_b.is_some()
    )
    .entered();

    let dates = normalize_closure_dates(&input.school_closed_dates, input.skip_weekends);
    let bank_holidays = normalize_bank_holidays(input.bank_holiday_set.as_ref());
    let mut ledger = Ledger::new(input);

    let mut days = seed_off_days(
        &dates,
        &input.parent_a,
        input.parent_b.as_ref(),
        &bank_holidays,
    );
    apply_overrides(&mut days, overrides, &mut ledger);

    if input.prioritize_seasons && ledger.joint > 0 && ledger.b.is_some() {
        let windows = season_windows(&years_touched(&dates));
        assign_joint_blocks(&mut days, &windows, Season::Christmas, &mut ledger);
        assign_joint_blocks(&mut days, &windows, Season::Summer, &mut ledger);
    }

    assign_general_blocks(&mut days, &mut ledger);

    tally(days, input, ledger.joint)
}

// ── Ledger ──────────────────────────────────────────────────────────────────

/// Running allowance balances for one planning run.
#[derive(Debug, Clone)]
struct Ledger {
    a: i32,
    b: Option<i32>,
    joint: i32,
}

impl Ledger {
    fn new(input: &PlanInput) -> Self {
        Self {
            a: input.parent_a.allowance_days,
            b: input.parent_b.as_ref().map(|p| p.allowance_days),
            joint: input.joint_days,
        }
    }

    fn available_a(&self) -> i32 {
        self.a.max(0)
    }

    /// Zero when there is no parent B.
    fn available_b(&self) -> i32 {
        self.b.map_or(0, |b| b.max(0))
    }

    fn available(&self, who: Who) -> i32 {
        match who {
            Who::A => self.available_a(),
            Who::B => self.available_b(),
            Who::Both => self.available_a().min(self.available_b()),
        }
    }

    fn spend(&mut self, who: Who, days: i32) {
        if who.includes_a() {
            self.a -= days;
        }
        if who.includes_b() {
            if let Some(b) = self.b.as_mut() {
                *b -= days;
            }
        }
    }
}

// ── Stages ──────────────────────────────────────────────────────────────────

type DayMap = BTreeMap<NaiveDate, Coverage>;

fn normalize_closure_dates(raw: &[String], skip_weekends: bool) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = raw
        .iter()
        .filter_map(|s| match parse_date_only(s) {
            Ok(date) => Some(date),
            Err(e) => {
                trace!(error = %e, "dropping closure date");
                None
            }
        })
        .filter(|&date| !(skip_weekends && is_weekend(date)))
        .collect();

    debug!(
        kept = dates.len(),
        supplied = raw.len(),
        "normalized closure dates"
    );
    dates.into_iter().collect()
}

fn normalize_bank_holidays(raw: Option<&BTreeSet<String>>) -> BTreeSet<NaiveDate> {
    raw.into_iter()
        .flatten()
        .filter_map(|s| parse_date_only(s).ok())
        .collect()
}

fn seed_off_days(
    dates: &[NaiveDate],
    parent_a: &ParentConfig,
    parent_b: Option<&ParentConfig>,
    bank_holidays: &BTreeSet<NaiveDate>,
) -> DayMap {
    let days: DayMap = dates
        .iter()
        .map(|&date| {
            let a_off = parent_a.is_off(date, bank_holidays);
            let b_off = parent_b.is_some_and(|b| b.is_off(date, bank_holidays));
            let coverage = match (a_off, b_off) {
                (true, true) => Coverage::Off { who: Who::Both },
                (true, false) => Coverage::Off { who: Who::A },
                (false, true) => Coverage::Off { who: Who::B },
                (false, false) => Coverage::None,
            };
            (date, coverage)
        })
        .collect();

    debug!(
        off = days.values().filter(|c| !c.is_none()).count(),
        "seeded off-days"
    );
    days
}

fn apply_overrides(days: &mut DayMap, overrides: &Overrides, ledger: &mut Ledger) {
    if overrides.is_empty() {
        return;
    }

    let mut applied = 0;
    for (date, coverage) in days.iter_mut() {
        if !coverage.is_none() {
            continue;
        }
        let Some(directive) = overrides.get(*date) else {
            continue;
        };

        let who = match directive {
            Override::ParentA => Who::A,
            Override::ParentB if ledger.b.is_some() => Who::B,
            Override::Both if ledger.b.is_some() => Who::Both,
            Override::Caregiver(id) => {
                *coverage = Coverage::Care {
                    caregiver_id: id.clone(),
                };
                applied += 1;
                continue;
            }
            _ => continue,
        };

        if ledger.available(who) > 0 {
            ledger.spend(who, 1);
            *coverage = Coverage::Leave { who };
            applied += 1;
        } else {
            trace!(date = %date, "override skipped: no allowance left");
        }
    }

    debug!(applied, requested = overrides.len(), "applied overrides");
}

/// Maximal runs of consecutive days still needing cover, earliest first.
fn uncovered_blocks(days: &DayMap) -> Vec<Vec<NaiveDate>> {
    let open: Vec<NaiveDate> = days
        .iter()
        .filter(|(_, coverage)| coverage.is_none())
        .map(|(date, _)| *date)
        .collect();
    group_consecutive_dates(&open)
}

fn assign(days: &mut DayMap, block: &[NaiveDate], who: Who) {
    for date in block {
        days.insert(*date, Coverage::Leave { who });
    }
}

fn assign_joint_blocks(
    days: &mut DayMap,
    windows: &[SeasonWindow],
    season: Season,
    ledger: &mut Ledger,
) {
    let seasonal: Vec<&SeasonWindow> = windows.iter().filter(|w| w.season == season).collect();

    for block in uncovered_blocks(days) {
        if !seasonal.iter().any(|w| w.intersects(&block)) {
            continue;
        }
        let len = block.len() as i32;
        if len <= ledger.joint && ledger.available(Who::Both) >= len {
            assign(days, &block, Who::Both);
            ledger.spend(Who::Both, len);
            ledger.joint -= len;
            debug!(?season, start = %block[0], len, "joint block assigned");
        }
    }
}

fn assign_general_blocks(days: &mut DayMap, ledger: &mut Ledger) {
    for block in uncovered_blocks(days) {
        let len = block.len() as i32;
        let a = ledger.available_a();
        let b = ledger.available_b();

        let whole = match (a >= len, b >= len) {
            (true, false) => Some(Who::A),
            (false, true) => Some(Who::B),
            (true, true) if a >= b => Some(Who::A),
            (true, true) => Some(Who::B),
            (false, false) => None,
        };
        if let Some(who) = whole {
            assign(days, &block, who);
            ledger.spend(who, len);
            debug!(start = %block[0], len, ?who, "block assigned");
            continue;
        }

        if a == 0 && b == 0 {
            trace!(start = %block[0], len, "block left uncovered");
            continue;
        }

        let (primary, secondary) = if a >= b { (Who::A, Who::B) } else { (Who::B, Who::A) };
        let first = ledger.available(primary).min(len) as usize;
        assign(days, &block[..first], primary);
        ledger.spend(primary, first as i32);

        let rest = &block[first..];
        let second = (ledger.available(secondary).min(rest.len() as i32)) as usize;
        assign(days, &rest[..second], secondary);
        ledger.spend(secondary, second as i32);

        debug!(
            start = %block[0],
            len,
            ?primary,
            primary_days = first,
            secondary_days = second,
            "block split"
        );
    }
}

fn tally(days: DayMap, input: &PlanInput, joint_days_remaining: i32) -> LeavePlan {
    let mut result = LeavePlan {
        joint_days_remaining,
        ..LeavePlan::default()
    };

    for (date, coverage) in days {
        match &coverage {
            Coverage::Leave { who } => {
                result.used_a += who.includes_a() as i32;
                result.used_b += who.includes_b() as i32;
            }
            Coverage::None => result.still_uncovered += 1,
            Coverage::Off { .. } | Coverage::Care { .. } => {}
        }
        result.plan.push(DayPlan {
            date,
            weekday: weekday_label(date).to_string(),
            coverage,
        });
    }

    result.remaining_a = input.parent_a.allowance_days - result.used_a;
    result.remaining_b = input
        .parent_b
        .as_ref()
        .map_or(0, |b| b.allowance_days)
        - result.used_b;

    debug!(
        used_a = result.used_a,
        used_b = result.used_b,
        uncovered = result.still_uncovered,
        "plan complete"
    );
    result
}

// ── Tests ───────────────────────────────────────────────────────────────────
