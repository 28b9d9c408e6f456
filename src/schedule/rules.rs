use super::types::{DayRule, DayRules};

/// Standard weekday table. Weekends have no entry and are never scheduled.
pub const DEFAULT_RULES: [(&str, DayRule); 5] = [
    ("Monday", DayRule { capacity: 1, full_day: false }),
    ("Tuesday", DayRule { capacity: 1, full_day: false }),
    ("Wednesday", DayRule { capacity: 1, full_day: true }),
    ("Thursday", DayRule { capacity: 1, full_day: false }),
    ("Friday", DayRule { capacity: 2, full_day: false }),
];

/// Builds a fresh copy of the standard weekday table
pub fn default_rules() -> DayRules {
    DEFAULT_RULES
        .iter()
        .map(|(weekday, rule)| (weekday.to_string(), *rule))
        .collect()
}
