use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

use super::Fetcher;
use crate::domain::{CalendarDate, Dataset, NameDay};
use crate::error::FetchError;
use crate::net::{block_text, inline_text, HttpClient};
use crate::parser::{days, months, names, scan_selectors, selectors, Pipeline, Strategy};

pub const BASE_URL: &str = "https://www.pravmir.ru/pravoslavnyj-kalendar-imenin/";

/// A full year has ~365 records; this many means the tables were enough.
const SUFFICIENT_RECORDS: usize = 200;
const PARAGRAPHS_STOP_AFTER: usize = 50;
const MONTH_BLOCKS_STOP_AFTER: usize = 100;

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static MONTH_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, h4, .title").unwrap());

static CONTENT_PARAGRAPHS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selectors(&[
        ".entry-content p",
        ".post-content p",
        ".article-content p",
        ".content p",
        "article p",
        ".text p",
    ])
});

static MONTH_BLOCKS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    selectors(&[
        ".month-block",
        ".calendar-month",
        ".month",
        "h2 + div",
        "h3 + div",
        ".namesBlock",
    ])
});

/// "1 января" in a table's first cell.
static DATE_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*([а-яА-Я]+)").unwrap());
/// "1 января: Илья, Пётр" anywhere in a paragraph line.
static DATED_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+([а-яА-Я]+):\s+(.+)").unwrap());
/// "1: Илья, Пётр" or "1 января: Илья, Пётр" up to a full stop, month known from context.
/// Runs over `entry_lines` output, where each line starts at most one day entry.
static BLOCK_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)[^:\n]*:[ \t]*([^.\n]+)").unwrap());

/// Single page whose layout has varied over time; tried as tables, then
/// content paragraphs, then month containers.
pub struct PravmirFetcher<'a> {
    client: &'a HttpClient,
    url: String,
}

impl<'a> PravmirFetcher<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        PravmirFetcher {
            client,
            url: BASE_URL.to_string(),
        }
    }
}

impl Fetcher for PravmirFetcher<'_> {
    fn name(&self) -> &'static str {
        "pravmir"
    }

    fn fetch_all(&self, year: i32) -> Result<Dataset, FetchError> {
        let doc = self.client.fetch_document(&self.url)?;
        let result = parse_document(&doc, year);
        info!(records = result.len(), "Parsed pravmir.ru");
        Ok(result)
    }
}

pub fn pipeline() -> Pipeline<'static, Html> {
    Pipeline::new(SUFFICIENT_RECORDS)
        .then(Strategy::new("tables", from_tables))
        .then(Strategy::new("content paragraphs", from_paragraphs))
        .then(Strategy::new("month blocks", from_month_blocks))
}

pub fn parse_document(doc: &Html, year: i32) -> Dataset {
    pipeline().extract(doc, year)
}

fn from_tables(doc: &Html, _year: i32) -> Dataset {
    let mut result = Vec::new();

    for table in doc.select(&TABLE) {
        for (i, row) in table.select(&ROW).enumerate() {
            if i == 0 && row.select(&HEADER_CELL).next().is_some() {
                continue;
            }
            if let Some(record) = table_row(row) {
                result.push(record);
            }
        }
    }

    result
}

/// First cell holds "day month", second the names.
fn table_row(row: ElementRef<'_>) -> Option<NameDay> {
    let mut cells = row.select(&CELL);
    let date_text = inline_text(cells.next()?);
    let caps = DATE_CELL_RE.captures(&date_text)?;
    let day = days::day_number(&caps[1])?;
    let month = months::resolve(&caps[2])?;

    // Names split across lines are separate names.
    let names = names::clean(&block_text(cells.next()?).replace('\n', ","));
    if names.is_empty() {
        return None;
    }
    Some(NameDay::new(CalendarDate::new(month, day), names))
}

fn from_paragraphs(doc: &Html, _year: i32) -> Dataset {
    scan_selectors(doc, &CONTENT_PARAGRAPHS, PARAGRAPHS_STOP_AFTER, |p, out| {
        let text = block_text(p);
        for caps in DATED_LINE_RE.captures_iter(&text) {
            let (Some(day), Some(month)) = (days::day_number(&caps[1]), months::resolve(&caps[2]))
            else {
                continue;
            };
            let names = names::clean(&caps[3]);
            if !names.is_empty() {
                out.push(NameDay::new(CalendarDate::new(month, day), names));
            }
        }
    })
}

fn from_month_blocks(doc: &Html, _year: i32) -> Dataset {
    scan_selectors(doc, &MONTH_BLOCKS, MONTH_BLOCKS_STOP_AFTER, |block, out| {
        let text = block_text(block);
        let Some(month) = block_month(block, &text) else {
            return;
        };

        for caps in BLOCK_ENTRY_RE.captures_iter(&entry_lines(&text)) {
            let Some(day) = days::day_number(&caps[1]) else {
                continue;
            };
            let names = names::clean(&caps[2]);
            if !names.is_empty() {
                out.push(NameDay::new(CalendarDate::new(month, day), names));
            }
        }
    })
}

/// Rejoin lines so that a name list wrapped over `<br>` stays on its entry's
/// line. Only a line opening with a day number starts a new line.
fn entry_lines(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !out.is_empty() {
            let starts_entry = line.starts_with(|c: char| c.is_ascii_digit());
            out.push(if starts_entry { '\n' } else { ' ' });
        }
        out.push_str(line);
    }
    out
}

/// Month from the block's own heading, else from anywhere in its text.
fn block_month(block: ElementRef<'_>, text: &str) -> Option<u32> {
    block
        .select(&MONTH_TITLE)
        .next()
        .map(inline_text)
        .filter(|t| !t.is_empty())
        .and_then(|t| months::resolve(&t))
        .or_else(|| months::resolve(text))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> Html {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        Html::parse_document(&html)
    }

    fn codes(data: &Dataset) -> Vec<String> {
        data.iter().map(|d| d.date.code()).collect()
    }

    #[test]
    fn tables() {
        let data = from_tables(&fixture("pravmir_tables"), 2024);
        assert_eq!(codes(&data), vec!["0101", "0102", "0415"]);
        assert_eq!(data[0].names, vec!["Илья", "Вонифатий"]);
        // <br>-separated names in the cell
        assert_eq!(data[2].names, vec!["Иван", "Пётр", "Мария"]);
    }

    #[test]
    fn content_paragraphs() {
        let data = from_paragraphs(&fixture("pravmir_paragraphs"), 2024);
        assert_eq!(codes(&data), vec!["0301", "0302", "0303"]);
        assert_eq!(data[1].names, vec!["Феодот", "Марина"]);
    }

    #[test]
    fn month_blocks() {
        let data = from_month_blocks(&fixture("pravmir_blocks"), 2024);
        assert_eq!(codes(&data), vec!["0601", "0602", "0701"]);
        assert_eq!(data[0].names, vec!["Фёдор", "Юстин"]);
        assert_eq!(data[2].names, vec!["Леонтий"]);
    }

    #[test]
    fn month_block_entries_after_nested_paragraphs() {
        let doc = Html::parse_document(
            r#"<div class="month-block"><h3>Июнь</h3><p>1 июня: Фёдор</p>2 июня: Юстин</div>"#,
        );
        let data = from_month_blocks(&doc, 2024);
        assert_eq!(codes(&data), vec!["0601", "0602"]);
        assert_eq!(data[1].names, vec!["Юстин"]);
    }

    #[test]
    fn month_block_names_wrapped_over_br() {
        let doc = Html::parse_document(
            r#"<div class="month-block"><h3>Июнь</h3>1 июня: Фёдор,<br>Юстин.<br>2 июня: Никифор</div>"#,
        );
        let data = from_month_blocks(&doc, 2024);
        assert_eq!(codes(&data), vec!["0601", "0602"]);
        assert_eq!(data[0].names, vec!["Фёдор", "Юстин"]);
        assert_eq!(data[1].names, vec!["Никифор"]);
    }

    #[test]
    fn continuation_lines_join_their_entry() {
        let text = "Июнь\n1 июня: Фёдор,\n  Юстин.\n\n2 июня: Никифор";
        assert_eq!(
            entry_lines(text),
            "Июнь\n1 июня: Фёдор, Юстин.\n2 июня: Никифор"
        );
    }

    #[test]
    fn falls_back_when_tables_are_thin() {
        let data = parse_document(&fixture("pravmir_paragraphs"), 2024);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn full_tables_skip_fallbacks() {
        let mut html = String::from("<html><body><table><tr><th>Дата</th><th>Имена</th></tr>");
        for month in ["января", "февраля", "марта", "апреля", "мая", "июня", "июля"] {
            for day in 1..=30 {
                html.push_str(&format!("<tr><td>{} {}</td><td>Илья</td></tr>", day, month));
            }
        }
        html.push_str("</table>");
        html.push_str(r#"<div class="entry-content"><p>5 декабря: Прокопий</p></div>"#);
        html.push_str("</body></html>");

        let data = parse_document(&Html::parse_document(&html), 2024);
        assert_eq!(data.len(), 210);
        assert!(data.iter().all(|d| d.date.month() <= 7));
    }
}
