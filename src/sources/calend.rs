use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use super::Fetcher;
use crate::domain::{CalendarDate, Dataset, NameDay};
use crate::error::FetchError;
use crate::net::{inline_text, HttpClient};

pub const BASE_URL: &str = "https://www.calend.ru/names";

static NAME_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.title.name.M, a.title.name.F").unwrap());

/// One request per day of the year against calend.ru's per-day pages.
pub struct CalendFetcher<'a> {
    client: &'a HttpClient,
    base_url: String,
    delay: Duration,
}

impl<'a> CalendFetcher<'a> {
    pub fn new(client: &'a HttpClient, delay: Duration) -> Self {
        CalendFetcher {
            client,
            base_url: BASE_URL.to_string(),
            delay,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn day_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/{}-{}-{}/",
            self.base_url,
            date.year(),
            date.month(),
            date.day()
        )
    }
}

impl Fetcher for CalendFetcher<'_> {
    fn name(&self) -> &'static str {
        "calend"
    }

    /// The first failed day aborts the whole run.
    fn fetch_all(&self, year: i32) -> Result<Dataset, FetchError> {
        let days = days_of_year(year);
        let pb = progress_bar(days.len());
        let mut result = Vec::with_capacity(days.len());

        for (i, date) in days.into_iter().enumerate() {
            if i > 0 {
                thread::sleep(self.delay);
            }

            let url = self.day_url(date);
            let doc = match self.client.fetch_document(&url) {
                Ok(doc) => doc,
                Err(e) => {
                    pb.abandon();
                    warn!(%date, "Stopping calend run: {}", e);
                    return Err(e);
                }
            };

            let day = CalendarDate::from(date);
            let names = day_names(&doc);
            debug!(day = day.code(), names = names.len(), "Got names");
            result.push(NameDay::new(day, names));
            pb.inc(1);
        }

        pb.finish_and_clear();
        info!(records = result.len(), "Fetched calend.ru");
        Ok(result)
    }
}

/// Every date of `year`, stopping as soon as the walk rolls into the next year.
fn days_of_year(year: i32) -> Vec<NaiveDate> {
    let Some(start) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };
    start
        .iter_days()
        .take(366)
        .take_while(|d| d.year() == year)
        .collect()
}

/// Names listed on a single day's page.
pub fn day_names(doc: &Html) -> Vec<String> {
    doc.select(&NAME_LINK)
        .map(inline_text)
        .filter(|n| !n.is_empty())
        .collect()
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::stub::{stub_client, StubServer};

    #[test]
    fn day_page_names() {
        let html = std::fs::read_to_string("tests/fixtures/calend_day.html").unwrap();
        let doc = Html::parse_document(&html);
        assert_eq!(day_names(&doc), vec!["Илья", "Анастасия", "Пётр"]);
    }

    #[test]
    fn page_without_names() {
        let doc = Html::parse_document("<html><body><a class='title'>Илья</a></body></html>");
        assert!(day_names(&doc).is_empty());
    }

    #[test]
    fn leap_and_common_years() {
        assert_eq!(days_of_year(2024).len(), 366);
        assert_eq!(days_of_year(2023).len(), 365);
        let last = *days_of_year(2023).last().unwrap();
        assert_eq!(CalendarDate::from(last).code(), "1231");
    }

    #[test]
    fn url_is_unpadded() {
        let settings = crate::settings::Settings::for_tests();
        let client = HttpClient::new(&settings).unwrap();
        let f = CalendFetcher::new(&client, Duration::ZERO);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(f.day_url(date), "https://www.calend.ru/names/2024-3-5/");
    }

    #[test]
    fn first_failed_day_aborts_the_run() {
        let server = StubServer::start("503 Service Unavailable", "");
        let client = stub_client();
        let f = CalendFetcher::new(&client, Duration::ZERO).with_base_url(&server.url);

        let err = f.fetch_all(2024).unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }), "got {err:?}");
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn one_record_per_day() {
        let server = StubServer::start(
            "200 OK",
            r#"<html><body><a class="title name M">Илья</a></body></html>"#,
        );
        let client = stub_client();
        let f = CalendFetcher::new(&client, Duration::ZERO).with_base_url(&server.url);

        let data = f.fetch_all(2023).unwrap();
        assert_eq!(data.len(), 365);
        assert_eq!(server.hits(), 365);
        assert_eq!(data[0].date.code(), "0101");
        assert_eq!(data[364].date.code(), "1231");
        assert!(data.iter().all(|d| d.names == vec!["Илья"]));
    }
}
