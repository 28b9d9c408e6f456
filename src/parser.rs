use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Result, RotaError};
use crate::schedule::Parent;

/// Weekday columns read from a roster sheet
pub const WEEKDAY_COLUMNS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Parses a spreadsheet number cell. Exports often write whole numbers as
/// "2.0", so the value is read as a float and truncated.
fn parse_number(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let number: f64 = trimmed.parse().ok()?;
    if !number.is_finite() {
        return None;
    }
    Some(number.trunc() as i64)
}

/// Any whole number is kept as-is, so scores above the acceptable range still
/// mark the day unavailable. Non-numeric cells are dropped.
fn parse_preference(value: &str) -> Option<i32> {
    parse_number(value).and_then(|n| i32::try_from(n).ok())
}

/// Missing, invalid or negative quota falls back to 0
fn parse_quota(value: &str) -> u32 {
    parse_number(value)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Loads parents from a CSV roster file
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Parent>> {
    let csv_path = csv_path.as_ref();
    let file = std::fs::File::open(csv_path)?;
    let parents = read_roster(file)?;
    info!(path = %csv_path.display(), parents = parents.len(), "roster loaded");
    Ok(parents)
}

/// Reads parents from CSV data with a header row.
///
/// Columns are matched by header name regardless of order or case: `Name`
/// (required), `Quota` and one column per weekday. Rows without a name are
/// skipped. Bad preference cells are left out of the preference map and a bad
/// quota becomes 0.
pub fn read_roster<R: Read>(input: R) -> Result<Vec<Parent>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let name_col = find_column(&headers, "Name").ok_or(RotaError::MissingColumn("Name"))?;
    let quota_col = find_column(&headers, "Quota");
    let weekday_cols: Vec<(&str, usize)> = WEEKDAY_COLUMNS
        .iter()
        .filter_map(|day| find_column(&headers, day).map(|col| (*day, col)))
        .collect();

    let mut parents = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }

        let mut preferences = HashMap::new();
        for &(day, col) in &weekday_cols {
            let cell = record.get(col).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            match parse_preference(cell) {
                Some(score) => {
                    preferences.insert(day.to_string(), score);
                }
                None => warn!(line, parent = %name, column = day, value = cell, "dropping unreadable preference"),
            }
        }

        let quota_cell = quota_col.and_then(|col| record.get(col)).unwrap_or("");
        let quota = parse_quota(quota_cell);
        if quota == 0 && !quota_cell.is_empty() && parse_number(quota_cell) != Some(0) {
            warn!(line, parent = %name, value = quota_cell, "unreadable quota, using 0");
        }

        parents.push(Parent {
            name,
            quota,
            preferences,
            assigned: Vec::new(),
        });
    }

    Ok(parents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{schedule, DayRule, DayRules};

    #[test]
    fn test_reads_basic_roster() {
        let csv = "Name,Quota,Monday,Tuesday,Wednesday,Thursday,Friday\n\
                   Anna,2,1,2,3,,4\n\
                   Bo,1,,,1,,\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        assert_eq!(parents.len(), 2);
        assert_eq!(parents[0].name, "Anna");
        assert_eq!(parents[0].quota, 2);
        assert_eq!(parents[0].preferences.get("Monday"), Some(&1));
        assert_eq!(parents[0].preferences.get("Friday"), Some(&4));
        assert!(parents[0].preferences.get("Thursday").is_none());
        assert_eq!(parents[1].preferences.len(), 1);
        assert!(parents[1].assigned.is_empty());
    }

    #[test]
    fn test_headers_matched_by_name_in_any_order() {
        let csv = " friday ,NAME,quota\n1,Anna,2\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        assert_eq!(parents[0].name, "Anna");
        assert_eq!(parents[0].quota, 2);
        assert_eq!(parents[0].preferences.get("Friday"), Some(&1));
    }

    #[test]
    fn test_rows_without_name_skipped() {
        let csv = "Name,Quota\n,3\n  ,2\nCarl,1\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].name, "Carl");
    }

    #[test]
    fn test_only_non_numeric_preferences_dropped() {
        let csv = "Name,Quota,Monday,Tuesday,Wednesday\nAnna,1,x,-1,300\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        assert_eq!(parents[0].preferences.len(), 2);
        assert!(parents[0].preferences.get("Monday").is_none());
        assert_eq!(parents[0].preferences.get("Tuesday"), Some(&-1));
        assert_eq!(parents[0].preferences.get("Wednesday"), Some(&300));
    }

    #[test]
    fn test_out_of_range_preferences_drive_schedule() {
        // 2024-09-02 is a Monday
        let monday = chrono::NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let mut rules = DayRules::new();
        rules.insert("Monday".to_string(), DayRule { capacity: 2, full_day: false });

        let csv = "Name,Quota,Monday\nNever,1,300\nKeen,1,1\nKeenest,1,-1\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        let run = schedule(parents, monday, monday, Some(&rules), None);

        assert_eq!(run.schedule[&monday], vec!["Keenest".to_string(), "Keen".to_string()]);

        let csv = "Name,Quota,Monday\nNever,1,300\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        let run = schedule(parents, monday, monday, Some(&rules), None);
        assert_eq!(run.schedule.get(&monday), Some(&Vec::new()));
        assert_eq!(run.parents[0].remaining_quota(), 1);
    }

    #[test]
    fn test_decimal_cells_truncated() {
        let csv = "Name,Quota,Monday\nAnna,2.0,1.9\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        assert_eq!(parents[0].quota, 2);
        assert_eq!(parents[0].preferences.get("Monday"), Some(&1));
    }

    #[test]
    fn test_quota_defaults_to_zero() {
        let csv = "Name,Quota\nA,\nB,lots\nC,-3\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        assert!(parents.iter().all(|p| p.quota == 0));

        let csv = "Name\nA\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        assert_eq!(parents[0].quota, 0);
    }

    #[test]
    fn test_short_rows_tolerated() {
        let csv = "Name,Quota,Monday,Tuesday\nAnna,1\n";
        let parents = read_roster(csv.as_bytes()).unwrap();
        assert_eq!(parents[0].quota, 1);
        assert!(parents[0].preferences.is_empty());
    }

    #[test]
    fn test_missing_name_column_is_error() {
        let csv = "Who,Quota\nAnna,1\n";
        let err = read_roster(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RotaError::MissingColumn("Name")));
    }

    #[test]
    fn test_load_roster_missing_file() {
        let err = load_roster("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, RotaError::Io(_)));
    }
}
