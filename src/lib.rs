//! Parent rota scheduling.
//!
//! Parents with a quota and per-weekday preferences are spread over the open
//! weekdays of a date range by a greedy day-by-day engine ([`schedule::schedule`]).
//! The surrounding modules load the inputs (`config.json`, CSV rosters) and
//! render the result on the command line or through a small web page.

pub mod error;
pub mod schedule;
pub mod parser;
pub mod config;
pub mod display;
pub mod web;

pub use error::{Result, RotaError};
pub use schedule::{schedule, DayRule, DayRules, Parent, RunOutcome, ScheduleResult, ScheduleRun};
