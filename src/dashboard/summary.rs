//! Interpretation sentences derived from each aggregate's extreme value.
//!
//! These are the one-liners shown under each chart. Sentinel outcomes
//! produce `None`; the presentation layer shows its own "no data" message in
//! that case.

use rustc_hash::FxHashMap;

use crate::aggregate::{
    AggregateOutcome, DiagnosisCount, DurationByDiagnosis, GenderCount, MonthlyVisits,
};

pub(crate) fn describe_diagnoses(
    outcome: &AggregateOutcome<Vec<DiagnosisCount>>,
) -> Option<String> {
    let top = outcome.computed()?.first()?;
    Some(format!(
        "{} appears most often in the filtered dataset, with {} visits.",
        top.diagnosis, top.visits
    ))
}

pub(crate) fn describe_monthly(outcome: &AggregateOutcome<Vec<MonthlyVisits>>) -> Option<String> {
    // Buckets are sorted by month, so a strict comparison keeps the earliest
    // month among equally busy ones
    let peak = outcome
        .computed()?
        .iter()
        .fold(None::<&MonthlyVisits>, |best, bucket| match best {
            Some(current) if current.visits >= bucket.visits => Some(current),
            _ => Some(bucket),
        })?;
    Some(format!(
        "The highest number of visits occurs in {} with {} visits for the selected filters.",
        peak.month.format("%Y-%m"),
        peak.visits
    ))
}

pub(crate) fn describe_ages(outcome: &AggregateOutcome<Vec<f64>>) -> Option<String> {
    let ages = outcome.computed()?;
    let min = ages.iter().copied().fold(f64::INFINITY, f64::min);
    let max = ages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(format!(
        "Ages range from {min:.0} to {max:.0} across {} patients in the filtered group.",
        ages.len()
    ))
}

pub(crate) fn describe_genders(outcome: &AggregateOutcome<Vec<GenderCount>>) -> Option<String> {
    let top = outcome.computed()?.first()?;
    Some(format!(
        "{} is the most represented gender with {} patients under the selected filters.",
        top.gender, top.count
    ))
}

pub(crate) fn describe_durations(
    outcome: &AggregateOutcome<Vec<DurationByDiagnosis>>,
) -> Option<String> {
    let longest = outcome.computed()?.first()?;
    Some(format!(
        "{} has the longest average treatment duration at about {:.1} weeks for the current filter selection.",
        longest.diagnosis, longest.mean_weeks
    ))
}

pub(crate) fn describe_satisfaction(outcome: &AggregateOutcome<Vec<f64>>) -> Option<String> {
    let scores = outcome.computed()?;
    let mut counts: FxHashMap<i64, u64> = FxHashMap::default();
    for score in scores {
        *counts.entry(score.round() as i64).or_insert(0) += 1;
    }
    // Deterministic mode: highest count, lowest score on ties
    let (score, count) = counts
        .into_iter()
        .min_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))?;
    Some(format!(
        "The most common satisfaction score is {score} with {count} patients in the filtered data."
    ))
}
