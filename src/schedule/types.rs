use std::collections::{BTreeMap, HashMap};
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

/// Score applied to weekdays a parent left blank
pub const NEUTRAL_PREFERENCE: i32 = 3;

/// Highest score that still counts as "can work that day"; anything above means unavailable
pub const MAX_ACCEPTABLE_PREFERENCE: i32 = 3;

/// A parent taking part in the rota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    pub name: String,
    #[serde(default)]
    pub quota: u32,
    /// Weekday name (e.g. "Monday") -> priority, lower is more preferred
    #[serde(default)]
    pub preferences: HashMap<String, i32>,
    #[serde(default)]
    pub assigned: Vec<NaiveDate>,
}

impl Parent {
    pub fn new(name: impl Into<String>, quota: u32) -> Self {
        Self {
            name: name.into(),
            quota,
            preferences: HashMap::new(),
            assigned: Vec::new(),
        }
    }

    pub fn with_preference(mut self, weekday: impl Into<String>, score: i32) -> Self {
        self.preferences.insert(weekday.into(), score);
        self
    }

    /// Days this parent may still be given in the current run
    pub fn remaining_quota(&self) -> u32 {
        let used = u32::try_from(self.assigned.len()).unwrap_or(u32::MAX);
        self.quota.saturating_sub(used)
    }

    /// Preference for a weekday, falling back to the neutral score
    pub fn preference_for(&self, weekday: &str) -> i32 {
        self.preferences
            .get(weekday)
            .copied()
            .unwrap_or(NEUTRAL_PREFERENCE)
    }
}

/// How many parents a weekday needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRule {
    pub capacity: usize,
    #[serde(default)]
    pub full_day: bool,
}

/// Weekday name -> rule
pub type DayRules = HashMap<String, DayRule>;

/// Date -> names assigned that day, in assignment order
pub type ScheduleResult = BTreeMap<NaiveDate, Vec<String>>;

/// How a scheduling run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every date in the range was visited
    Complete,
    /// Nobody had quota left on `stopped_at`, so no later date was scheduled
    NoEligibleParents { stopped_at: NaiveDate },
}

/// Output of one engine call: the schedule plus the parents with their updated history
#[derive(Debug, Clone)]
pub struct ScheduleRun {
    pub schedule: ScheduleResult,
    pub parents: Vec<Parent>,
    pub outcome: RunOutcome,
}

impl ScheduleRun {
    pub fn total_assignments(&self) -> usize {
        self.schedule.values().map(Vec::len).sum()
    }

    /// Parents that still had quota left when the run ended
    pub fn underassigned(&self) -> impl Iterator<Item = &Parent> {
        self.parents.iter().filter(|p| p.remaining_quota() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_remaining_quota_never_negative() {
        let mut parent = Parent::new("A", 1);
        assert_eq!(parent.remaining_quota(), 1);
        parent.assigned.push(date(2024, 9, 2));
        assert_eq!(parent.remaining_quota(), 0);
        parent.assigned.push(date(2024, 9, 3));
        assert_eq!(parent.remaining_quota(), 0);
    }

    #[test]
    fn test_preference_defaults_to_neutral() {
        let parent = Parent::new("A", 1).with_preference("Monday", 1);
        assert_eq!(parent.preference_for("Monday"), 1);
        assert_eq!(parent.preference_for("Tuesday"), NEUTRAL_PREFERENCE);
    }

    #[test]
    fn test_parent_deserializes_with_defaults() {
        let parent: Parent = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(parent.name, "Ada");
        assert_eq!(parent.quota, 0);
        assert!(parent.preferences.is_empty());
        assert!(parent.assigned.is_empty());
    }

    #[test]
    fn test_parent_accepts_any_whole_number_preference() {
        let parent: Parent = serde_json::from_str(
            r#"{"name": "Ada", "quota": 1, "preferences": {"Monday": 300, "Friday": -1}}"#,
        )
        .unwrap();
        assert_eq!(parent.preference_for("Monday"), 300);
        assert_eq!(parent.preference_for("Friday"), -1);
    }

    #[test]
    fn test_day_rule_full_day_defaults_false() {
        let rule: DayRule = serde_json::from_str(r#"{"capacity": 2}"#).unwrap();
        assert_eq!(rule, DayRule { capacity: 2, full_day: false });
    }
}
