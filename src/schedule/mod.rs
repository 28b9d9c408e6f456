pub mod types;
pub mod rules;
pub mod date_range;
pub mod engine;

pub use types::{
    DayRule, DayRules, Parent, RunOutcome, ScheduleResult, ScheduleRun,
    MAX_ACCEPTABLE_PREFERENCE, NEUTRAL_PREFERENCE,
};
pub use rules::{default_rules, DEFAULT_RULES};
pub use date_range::DateRange;
pub use engine::schedule;
