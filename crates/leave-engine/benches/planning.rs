use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use chrono::NaiveDate;
use leave_engine::{plan_leave, ParentConfig, PlanInput};

/// A school year of closures: every holiday week plus scattered inset days.
fn school_year() -> PlanInput {
    let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let closures: Vec<String> = start
        .iter_days()
        .take(365)
        .enumerate()
        .filter(|&(i, _)| (i % 7 < 5 && (i / 7) % 6 == 5) || i % 29 == 0)
        .map(|(_, d)| d.format("%Y-%m-%d").to_string())
        .collect();

    PlanInput {
        parent_a: ParentConfig {
            name: "Alex".into(),
            off_days: vec![0, 6],
            allowance_days: 25,
            gets_bank_holidays: true,
        },
        parent_b: Some(ParentConfig {
            name: "Sam".into(),
            off_days: vec![0, 5, 6],
            allowance_days: 28,
            gets_bank_holidays: false,
        }),
        school_closed_dates: closures,
        joint_days: 10,
        skip_weekends: true,
        prioritize_seasons: true,
        ..Default::default()
    }
}

fn bench_plan(c: &mut Criterion) {
    let input = school_year();
    c.bench_function("plan_leave_school_year", |b| {
        b.iter(|| plan_leave(black_box(&input)))
    });
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
