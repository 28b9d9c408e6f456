use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::schedule::{RunOutcome, ScheduleRun};

/// Shown in place of names for a day nobody could take
pub const EMPTY_DAY_PLACEHOLDER: &str = "--";

/// Formats one schedule line: `2024-09-02 -> Anna, Bo`
pub fn format_day_line(day: NaiveDate, names: &[String]) -> String {
    if names.is_empty() {
        format!("{} -> {}", day, EMPTY_DAY_PLACEHOLDER)
    } else {
        format!("{} -> {}", day, names.join(", "))
    }
}

/// All schedule lines in date order
pub fn schedule_lines(run: &ScheduleRun) -> Vec<String> {
    run.schedule
        .iter()
        .map(|(day, names)| format_day_line(*day, names))
        .collect()
}

/// Writes the schedule lines to a file
pub fn write_schedule_to_file<P: AsRef<Path>>(
    run: &ScheduleRun,
    filename: P,
) -> Result<(), std::io::Error> {
    let mut file = File::create(filename)?;
    for line in schedule_lines(run) {
        writeln!(file, "{}", line)?;
    }
    Ok(())
}

/// Prints the schedule followed by a short per-parent summary
pub fn print_schedule(run: &ScheduleRun) {
    for line in schedule_lines(run) {
        println!("{}", line);
    }

    println!("\nAssigned days per parent:");
    for parent in &run.parents {
        println!("  {}: {}/{}", parent.name, parent.assigned.len(), parent.quota);
    }

    let short: Vec<&str> = run.underassigned().map(|p| p.name.as_str()).collect();
    if !short.is_empty() {
        println!("⚠️  Quota not filled ({}): {}", short.len(), short.join(", "));
    }

    if let RunOutcome::NoEligibleParents { stopped_at } = run.outcome {
        println!("Stopped at {}: no parent had quota left.", stopped_at);
    }
}
