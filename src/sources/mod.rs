pub mod calend;
pub mod krestilnoe;
pub mod pravmir;

use clap::ValueEnum;

use crate::domain::Dataset;
use crate::error::FetchError;
use crate::net::HttpClient;
use crate::settings::Settings;

/// A site adapter producing a full year of raw (possibly repeating) records.
pub trait Fetcher {
    fn name(&self) -> &'static str;

    fn fetch_all(&self, year: i32) -> Result<Dataset, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Krestilnoe,
    Calend,
    Pravmir,
    /// Merge previously fetched source files
    Merge,
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::Krestilnoe => "krestilnoe",
            Source::Calend => "calend",
            Source::Pravmir => "pravmir",
            Source::Merge => "merge",
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            Source::Merge => "merged_namedays.json".to_string(),
            _ => format!("{}_namedays.json", self.name()),
        }
    }

    /// `None` for merge mode, which reads files instead of the network.
    pub fn fetcher<'a>(
        &self,
        client: &'a HttpClient,
        settings: &Settings,
    ) -> Option<Box<dyn Fetcher + 'a>> {
        match self {
            Source::Krestilnoe => Some(Box::new(krestilnoe::KrestilnoeFetcher::new(client))),
            Source::Calend => Some(Box::new(calend::CalendFetcher::new(
                client,
                settings.request_delay(),
            ))),
            Source::Pravmir => Some(Box::new(pravmir::PravmirFetcher::new(client))),
            Source::Merge => None,
        }
    }
}
