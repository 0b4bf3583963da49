use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info};

use super::Fetcher;
use crate::domain::Dataset;
use crate::error::FetchError;
use crate::net::{block_text, HttpClient};
use crate::parser::{days, months};

pub const BASE_URL: &str = "https://www.krestilnoe.ru/svyattsy-kalendar-god/";

static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static SECTION_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\s").unwrap());
/// First "N <month>:" label of a section names its month.
static MONTH_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s+([^\s:]+):").unwrap());

/// Whole-year calendar on a single page, one paragraph per month.
pub struct KrestilnoeFetcher<'a> {
    client: &'a HttpClient,
    url: String,
}

impl<'a> KrestilnoeFetcher<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        KrestilnoeFetcher {
            client,
            url: BASE_URL.to_string(),
        }
    }
}

impl Fetcher for KrestilnoeFetcher<'_> {
    fn name(&self) -> &'static str {
        "krestilnoe"
    }

    fn fetch_all(&self, year: i32) -> Result<Dataset, FetchError> {
        let doc = self.client.fetch_document(&self.url)?;
        let result = parse_document(&doc, year);
        info!(records = result.len(), "Parsed krestilnoe.ru");
        Ok(result)
    }
}

/// Month sections are paragraphs whose text opens with a day number; entries
/// inside are separated by `<br>`.
pub fn parse_document(doc: &Html, year: i32) -> Dataset {
    let mut result = Vec::new();

    for paragraph in doc.select(&PARAGRAPH) {
        let text = block_text(paragraph);
        let text = text.trim();
        if !SECTION_START_RE.is_match(text) {
            continue;
        }

        let Some(month) = MONTH_LABEL_RE
            .captures(text)
            .and_then(|caps| months::resolve(&caps[1]))
        else {
            debug!("Section without a recognizable month label");
            continue;
        };

        let entries = days::parse(text, month, year);
        debug!(month, entries = entries.len(), "Month section");
        result.extend(entries);
    }

    result
}
