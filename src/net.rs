use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Node};
use tracing::{debug, info};

use crate::error::FetchError;
use crate::settings::Settings;

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6", "section", "article",
];

/// Blocking HTTP client shared by all fetchers of one run.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(HttpClient { client })
    }

    /// GET `url` and parse the body into a queryable document.
    /// Any non-success status is treated like a transport failure.
    pub fn fetch_document(&self, url: &str) -> Result<Html, FetchError> {
        debug!(url, "GET");
        let resp = self.client.get(url).send().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.text().map_err(|source| FetchError::Parse {
            url: url.to_string(),
            source,
        })?;
        info!(url, bytes = body.len(), "Fetched document");
        Ok(Html::parse_document(&body))
    }
}

/// Text of an element with `<br>` and block boundaries rendered as newlines,
/// so that line-oriented parsers see one entry per line.
pub fn block_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_block_text(element, &mut out);
    out
}

fn push_block_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            Node::Element(el) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_TAGS.contains(&el.name());
                if block {
                    line_break(out);
                }
                push_block_text(child, out);
                if block {
                    line_break(out);
                }
            }
            _ => {}
        }
    }
}

fn line_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Plain concatenated text, trimmed.
pub fn inline_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

// ── Tests ──


/// Local HTTP server answering every request with a fixed response.
#[cfg(test)]
pub(crate) mod stub {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    use super::HttpClient;
    use crate::settings::Settings;

    pub struct StubServer {
        pub url: String,
        hits: Arc<AtomicUsize>,
    }

    impl StubServer {
        pub fn start(status: &'static str, body: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let url = format!("http://{}", listener.local_addr().unwrap());
            let hits = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&hits);

            thread::spawn(move || {
                for stream in listener.incoming() {
                    let Ok(mut stream) = stream else { break };
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf) {
                            Ok(0) | Err(_) => break,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    counter.fetch_add(1, Ordering::SeqCst);
                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes());
                }
            });

            StubServer { url, hits }
        }

        pub fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    /// Client that ignores proxy variables, so requests reach the stub.
    pub fn stub_client() -> HttpClient {
        let settings = Settings::for_tests();
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(settings.request_timeout())
            .user_agent(settings.user_agent)
            .build()
            .unwrap();
        HttpClient { client }
    }
}
