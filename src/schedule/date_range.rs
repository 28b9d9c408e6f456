use chrono::NaiveDate;

/// Inclusive span of calendar days. Cheap to copy, and every call to `iter`
/// starts again from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn iter(&self) -> Days {
        Days {
            next: (self.start <= self.end).then_some(self.start),
            end: self.end,
        }
    }

    /// Number of days in the range, zero when `start > end`
    pub fn len(&self) -> usize {
        if self.start > self.end {
            return 0;
        }
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

/// Ascending day-by-day iterator over a `DateRange`
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|d| *d <= self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|d| (self.end - d).num_days() as usize + 1)
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Days {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_inclusive_bounds() {
        let days: Vec<_> = DateRange::new(date(2024, 9, 2), date(2024, 9, 4)).iter().collect();
        assert_eq!(days, vec![date(2024, 9, 2), date(2024, 9, 3), date(2024, 9, 4)]);
    }

    #[test]
    fn test_single_day() {
        let range = DateRange::new(date(2024, 9, 2), date(2024, 9, 2));
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![date(2024, 9, 2)]);
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = DateRange::new(date(2024, 9, 5), date(2024, 9, 2));
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.iter().count(), 0);
    }

    #[test]
    fn test_restartable() {
        let range = DateRange::new(date(2024, 9, 2), date(2024, 9, 6));
        let first: Vec<_> = range.iter().collect();
        let second: Vec<_> = range.into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), range.len());
    }

    #[test]
    fn test_crosses_month_and_leap_day() {
        let days: Vec<_> = DateRange::new(date(2024, 2, 28), date(2024, 3, 1)).iter().collect();
        assert_eq!(days, vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
    }

    #[test]
    fn test_ends_at_max_date() {
        let range = DateRange::new(NaiveDate::MAX.pred_opt().unwrap(), NaiveDate::MAX);
        assert_eq!(range.iter().count(), 2);
    }
}
