use chrono::{Datelike, Days, NaiveDate};

/// How often a recurring activity repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Weekly,
    Biweekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::Weekly => "weekly",
            Recurrence::Biweekly => "biweekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "weekly" => Some(Recurrence::Weekly),
            "biweekly" => Some(Recurrence::Biweekly),
            "monthly" => Some(Recurrence::Monthly),
            _ => None,
        }
    }
}

// Day of week with Sunday = 0 .. Saturday = 6.
fn weekday_sun0(date: NaiveDate) -> i64 {
    date.weekday().num_days_from_sunday() as i64
}

/// First date on or after `start` falling on `day_of_week` (Sunday = 0).
pub fn first_on_or_after(start: NaiveDate, day_of_week: i64) -> NaiveDate {
    let offset = (day_of_week - weekday_sun0(start)).rem_euclid(7);
    start + Days::new(offset as u64)
}

// Which occurrence of its weekday within the month a date is (1-based).
fn nth_weekday_ordinal(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

// The nth `day_of_week` of a month, or None when the month has no nth
// occurrence (only possible for nth = 5).
fn nth_weekday_of_month(year: i32, month: u32, day_of_week: i64, nth: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (day_of_week - weekday_sun0(first)).rem_euclid(7) as u32;
    NaiveDate::from_ymd_opt(year, month, 1 + offset + (nth - 1) * 7)
}

/// Lazy, unbounded iterator over the occurrence dates a rule implies.
///
/// The first yielded date is the weekday-snap of the rule's start date. For
/// monthly rules the nth-weekday ordinal is pinned to the rule's original
/// start date, so a rule anchored on "the 1st Monday of March" targets the
/// 1st Monday of every later month; months without an nth occurrence are
/// skipped.
pub struct Occurrences {
    recurrence: Recurrence,
    day_of_week: i64,
    nth: u32,
    next: NaiveDate,
}

pub fn occurrences(
    start_date: NaiveDate,
    day_of_week: i64,
    recurrence: Recurrence,
) -> Occurrences {
    Occurrences {
        recurrence,
        day_of_week,
        nth: nth_weekday_ordinal(start_date),
        next: first_on_or_after(start_date, day_of_week),
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next;
        self.next = match self.recurrence {
            Recurrence::Weekly => current + Days::new(7),
            Recurrence::Biweekly => current + Days::new(14),
            Recurrence::Monthly => {
                let mut year = current.year();
                let mut month = current.month();
                loop {
                    if month == 12 {
                        year += 1;
                        month = 1;
                    } else {
                        month += 1;
                    }
                    if let Some(date) =
                        nth_weekday_of_month(year, month, self.day_of_week, self.nth)
                    {
                        break date;
                    }
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_dates_are_seven_days_apart_on_the_rule_weekday() {
        // 2024-01-01 is a Monday (day_of_week 1).
        let dates: Vec<_> = occurrences(date(2024, 1, 1), 1, Recurrence::Weekly)
            .take(4)
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 8),
                date(2024, 1, 15),
                date(2024, 1, 22),
            ]
        );
        for d in &dates {
            assert_eq!(d.weekday().num_days_from_sunday(), 1);
        }
    }

    #[test]
    fn start_date_snaps_forward_to_the_rule_weekday() {
        // 2024-01-03 is a Wednesday; first Monday on/after is 2024-01-08.
        let first = occurrences(date(2024, 1, 3), 1, Recurrence::Weekly)
            .next()
            .unwrap();
        assert_eq!(first, date(2024, 1, 8));
    }

    #[test]
    fn start_date_on_the_rule_weekday_is_not_skipped() {
        let first = occurrences(date(2024, 1, 1), 1, Recurrence::Weekly)
            .next()
            .unwrap();
        assert_eq!(first, date(2024, 1, 1));
    }

    #[test]
    fn biweekly_dates_are_fourteen_days_apart() {
        let dates: Vec<_> = occurrences(date(2024, 1, 1), 1, Recurrence::Biweekly)
            .take(3)
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 29)]
        );
    }

    #[test]
    fn monthly_pins_the_nth_weekday_of_the_original_start() {
        // 2024-03-04 is the 1st Monday of March.
        let dates: Vec<_> = occurrences(date(2024, 3, 4), 1, Recurrence::Monthly)
            .take(3)
            .collect();
        // April's 1st Monday is the 1st, May's is the 6th.
        assert_eq!(
            dates,
            vec![date(2024, 3, 4), date(2024, 4, 1), date(2024, 5, 6)]
        );
    }

    #[test]
    fn monthly_third_tuesday_stays_on_third_tuesdays() {
        // 2024-01-16 is the 3rd Tuesday of January (day_of_week 2).
        let dates: Vec<_> = occurrences(date(2024, 1, 16), 2, Recurrence::Monthly)
            .take(3)
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 16), date(2024, 2, 20), date(2024, 3, 19)]
        );
        for d in &dates {
            assert_eq!(nth_weekday_ordinal(*d), 3);
        }
    }

    #[test]
    fn monthly_fifth_occurrence_skips_short_months() {
        // 2024-03-29 is the 5th Friday of March; April 2024 has only four
        // Fridays, the next 5th Friday is 2024-05-31.
        let dates: Vec<_> = occurrences(date(2024, 3, 29), 5, Recurrence::Monthly)
            .take(2)
            .collect();
        assert_eq!(dates, vec![date(2024, 3, 29), date(2024, 5, 31)]);
    }

    #[test]
    fn recurrence_parse_round_trips_and_rejects_unknown() {
        for r in [Recurrence::Weekly, Recurrence::Biweekly, Recurrence::Monthly] {
            assert_eq!(Recurrence::parse(r.as_str()), Some(r));
        }
        assert_eq!(Recurrence::parse("daily"), None);
    }
}
