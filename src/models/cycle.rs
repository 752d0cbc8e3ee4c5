//! Billing cycle computation
//!
//! A cycle is identified by its reference month (the month it closes in).
//! Its window is `[opening_date, closing_date)`: a purchase made on the
//! closing day already belongs to the next statement.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::CreditCard;

/// One statement period of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingCycle {
    pub reference_year: i32,
    pub reference_month: u32,
    pub opening_date: NaiveDate,
    pub closing_date: NaiveDate,
    pub due_date: NaiveDate,
    closing_day: u32,
    due_day: u32,
}

impl BillingCycle {
    /// Build the cycle closing in the given month
    pub fn for_reference(closing_day: u32, due_day: u32, year: i32, month: u32) -> Self {
        let closing_date = clamped_date(year, month, closing_day);
        let (prev_year, prev_month) = add_months(year, month, -1);
        let opening_date = clamped_date(prev_year, prev_month, closing_day);

        let due_date = if due_day > closing_day {
            clamped_date(year, month, due_day)
        } else {
            let (due_year, due_month) = add_months(year, month, 1);
            clamped_date(due_year, due_month, due_day)
        };

        Self {
            reference_year: year,
            reference_month: month,
            opening_date,
            closing_date,
            due_date,
            closing_day,
            due_day,
        }
    }

    /// The cycle of `card` whose window contains `date`
    pub fn containing(card: &CreditCard, date: NaiveDate) -> Self {
        let this_month = Self::for_reference(card.closing_day, card.due_day, date.year(), date.month());
        if date < this_month.closing_date {
            this_month
        } else {
            this_month.shift(1)
        }
    }

    /// The cycle `months` later (or earlier, when negative)
    pub fn shift(&self, months: i32) -> Self {
        let (year, month) = add_months(self.reference_year, self.reference_month, months);
        Self::for_reference(self.closing_day, self.due_day, year, month)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.opening_date && date < self.closing_date
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.reference_month, self.reference_year)
    }
}

/// Add a (possibly negative) number of months to a year/month pair
pub fn add_months(year: i32, month: u32, months: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + months;
    (index.div_euclid(12), (index.rem_euclid(12) + 1) as u32)
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = add_months(year, month, 1);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// `day` of the given month, clamped to the month's last day
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
