use std::collections::HashSet;
use chrono::NaiveDate;
use tracing::{debug, info};
use super::date_range::DateRange;
use super::rules::default_rules;
use super::types::{DayRules, Parent, RunOutcome, ScheduleResult, ScheduleRun, MAX_ACCEPTABLE_PREFERENCE};

/// Greedy day-by-day rota assignment over `start..=end`.
///
/// Each open day with a rule takes the parents that still have quota, orders
/// them by their preference for that weekday (input order breaks ties) and
/// fills the day up to the rule's capacity. Parents whose score marks the
/// weekday as unavailable are passed over, so a day can end up short.
///
/// The parents are taken by value and handed back in `ScheduleRun::parents`
/// with the new dates appended to `assigned`.
///
/// The run stops for good on the first scheduled day where nobody has quota
/// left; later dates are not visited and `outcome` records where it stopped.
/// This may have been intended as a per-day skip.
pub fn schedule(
    mut parents: Vec<Parent>,
    start: NaiveDate,
    end: NaiveDate,
    rules: Option<&DayRules>,
    closed_days: Option<&HashSet<NaiveDate>>,
) -> ScheduleRun {
    let default_table;
    let rules = match rules {
        Some(rules) => rules,
        None => {
            default_table = default_rules();
            &default_table
        }
    };

    let mut schedule = ScheduleResult::new();
    let mut outcome = RunOutcome::Complete;

    for day in DateRange::new(start, end) {
        if closed_days.is_some_and(|closed| closed.contains(&day)) {
            debug!(%day, "closed, skipping");
            continue;
        }

        let weekday = day.format("%A").to_string();
        let Some(rule) = rules.get(&weekday) else {
            continue; // no rule for this weekday
        };

        let mut candidates: Vec<usize> = parents
            .iter()
            .enumerate()
            .filter(|(_, p)| p.remaining_quota() > 0)
            .map(|(idx, _)| idx)
            .collect();

        if candidates.is_empty() {
            info!(%day, "no parent has quota left, stopping");
            outcome = RunOutcome::NoEligibleParents { stopped_at: day };
            break;
        }

        // Stable, so equal scores keep input order
        candidates.sort_by_key(|&idx| parents[idx].preference_for(&weekday));

        let mut assigned_today: Vec<String> = Vec::with_capacity(rule.capacity);
        for idx in candidates {
            if assigned_today.len() >= rule.capacity {
                break;
            }
            let parent = &mut parents[idx];
            if parent.preference_for(&weekday) > MAX_ACCEPTABLE_PREFERENCE {
                continue;
            }
            parent.assigned.push(day);
            assigned_today.push(parent.name.clone());
        }

        debug!(%day, %weekday, capacity = rule.capacity, assigned = ?assigned_today, "day scheduled");
        schedule.insert(day, assigned_today);
    }

    let run = ScheduleRun { schedule, parents, outcome };
    info!(
        days = run.schedule.len(),
        assignments = run.total_assignments(),
        outcome = ?run.outcome,
        "schedule finished"
    );
    run
}
