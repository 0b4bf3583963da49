use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::names;
use crate::domain::{CalendarDate, Dataset, NameDay};

/// "1 января: Илья, Вонифатий, ..."
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+[^:]+:\s+(.+)$").unwrap());

/// Scraped day numbers are only accepted within 1..=31.
pub fn day_number(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|d| (1..=31).contains(d))
}

/// Parse a month's worth of line-separated day entries.
/// Lines that are not day entries are skipped; an empty result is not an error.
pub fn parse(text: &str, month: u32, year: i32) -> Dataset {
    let mut result = Vec::new();

    for entry in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = ENTRY_RE.captures(entry) else {
            continue;
        };
        let Some(day) = day_number(&caps[1]) else {
            continue;
        };
        let names = names::clean(&caps[2]);
        if names.is_empty() {
            continue;
        }
        result.push(NameDay::new(CalendarDate::new(month, day), names));
    }

    trace!(month, year, entries = result.len(), "Parsed day entries");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_entry() {
        let r = parse("1 января: Илья, Пётр", 1, 2024);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].date, CalendarDate::new(1, 1));
        assert_eq!(r[0].names, vec!["Илья", "Пётр"]);
    }

    #[test]
    fn non_entry_yields_nothing() {
        assert!(parse("не дата", 1, 2024).is_empty());
        assert!(parse("", 1, 2024).is_empty());
    }

    #[test]
    fn month_comes_from_caller() {
        // The label is only checked for shape; the month number is given.
        let r = parse("5 мая: Ирина", 5, 2024);
        assert_eq!(r[0].date.code(), "0505");
    }

    #[test]
    fn multiple_lines_mixed_with_prose() {
        let text = "Святцы на январь\n\
                    1 января: Илья, Вонифатий, и иные\n\
                    \n\
                    2 января: Иван (Кронштадтский), Сергий\n\
                    Примечание: список неполный";
        let r = parse(text, 1, 2024);
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].names, vec!["Илья", "Вонифатий"]);
        assert_eq!(r[1].date.day(), 2);
        assert_eq!(r[1].names, vec!["Иван", "Сергий"]);
    }

    #[test]
    fn out_of_range_day_skipped() {
        let r = parse("0 января: Илья\n32 января: Пётр\n31 января: Кирилл", 1, 2024);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].date.day(), 31);
    }

    #[test]
    fn february_30_is_not_rejected() {
        let r = parse("30 февраля: Илья", 2, 2024);
        assert_eq!(r[0].date.code(), "0230");
    }

    #[test]
    fn entry_with_only_boilerplate_skipped() {
        assert!(parse("3 января: и иные", 1, 2024).is_empty());
    }

    #[test]
    fn day_number_bounds() {
        assert_eq!(day_number("1"), Some(1));
        assert_eq!(day_number("31"), Some(31));
        assert_eq!(day_number("0"), None);
        assert_eq!(day_number("99999999999999999999"), None);
    }
}
