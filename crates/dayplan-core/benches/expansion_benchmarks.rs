use chrono::{NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dayplan_core::models::{EventDraft, RepeatInfo, RepeatType};
use dayplan_core::recurrence::RecurrenceExpander;

fn create_test_draft(repeat: RepeatInfo) -> EventDraft {
    let mut draft = EventDraft::new(
        "Benchmark Event",
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    );
    draft.repeat = repeat;
    draft
}

fn bench_expand_daily_to_default_end(c: &mut Criterion) {
    let expander = RecurrenceExpander::with_defaults();
    let draft = create_test_draft(RepeatInfo::every(RepeatType::Daily, 1));

    c.bench_function("expand_daily_to_default_end", |b| {
        b.iter(|| expander.expand(black_box(&draft)).unwrap())
    });
}

fn bench_expand_monthly_31st(c: &mut Criterion) {
    let expander = RecurrenceExpander::with_defaults();
    let draft = create_test_draft(RepeatInfo::every(RepeatType::Monthly, 1));

    c.bench_function("expand_monthly_31st", |b| {
        b.iter(|| expander.expand(black_box(&draft)).unwrap())
    });
}

fn bench_occurrence_dates_only(c: &mut Criterion) {
    let expander = RecurrenceExpander::with_defaults();
    let anchor = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let rule = RepeatInfo::every(RepeatType::Yearly, 1);

    c.bench_function("occurrence_dates_leap_day", |b| {
        b.iter(|| expander.occurrences(black_box(anchor), black_box(&rule)).unwrap().count())
    });
}

criterion_group!(
    benches,
    bench_expand_daily_to_default_end,
    bench_expand_monthly_31st,
    bench_occurrence_dates_only
);
criterion_main!(benches);
