use chrono::{
    Days,
    NaiveDate
};

/// Every calendar day from `start_date` to `end_date`, both included.
#[derive(Clone, Copy, Debug)]
pub struct RangeOfDates {
    start_date: NaiveDate,
    end_date: NaiveDate
}

impl RangeOfDates {
    /// `None` when `end_date` precedes `start_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Option<RangeOfDates> {
        (start_date <= end_date).then_some(RangeOfDates { start_date, end_date })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn len(&self) -> usize {
        ((self.end_date - self.start_date).num_days() + 1) as usize
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        (d >= self.start_date) && (d <= self.end_date)
    }

    pub fn iter(&self) -> RangeOfDatesIterator {
        RangeOfDatesIterator {
            next: Some(self.start_date),
            end_date: self.end_date
        }
    }
}

impl IntoIterator for &RangeOfDates {
    type Item = NaiveDate;
    type IntoIter = RangeOfDatesIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct RangeOfDatesIterator {
    next: Option<NaiveDate>,
    end_date: NaiveDate
}

impl Iterator for RangeOfDatesIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|d| *d <= self.end_date)?;
        self.next = current.checked_add_days(Days::new(1));
        Some(current)
    }
}
