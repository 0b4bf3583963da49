use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::domain::Dataset;

type Extractor<'a, D> = Box<dyn Fn(&D, i32) -> Dataset + 'a>;

/// One extraction attempt under a single structural assumption.
pub struct Strategy<'a, D> {
    name: &'static str,
    extract: Extractor<'a, D>,
}

impl<'a, D> Strategy<'a, D> {
    pub fn new(name: &'static str, extract: impl Fn(&D, i32) -> Dataset + 'a) -> Self {
        Strategy {
            name,
            extract: Box::new(extract),
        }
    }
}

/// Strategies in priority order. Once the accumulated record count reaches
/// `sufficient`, the remaining strategies are not run.
pub struct Pipeline<'a, D> {
    strategies: Vec<Strategy<'a, D>>,
    sufficient: usize,
}

impl<'a, D> Pipeline<'a, D> {
    pub fn new(sufficient: usize) -> Self {
        Pipeline {
            strategies: Vec::new(),
            sufficient,
        }
    }

    pub fn then(mut self, strategy: Strategy<'a, D>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn extract(&self, document: &D, year: i32) -> Dataset {
        let mut result = Vec::new();

        for (i, strategy) in self.strategies.iter().enumerate() {
            if result.len() >= self.sufficient {
                let skipped: Vec<_> = self.strategies[i..].iter().map(|s| s.name).collect();
                debug!(records = result.len(), ?skipped, "Sufficient data, skipping fallbacks");
                break;
            }
            let found = (strategy.extract)(document, year);
            debug!(strategy = strategy.name, records = found.len(), "Strategy done");
            result.extend(found);
        }

        result
    }
}

/// Try selector variants in order, handing each match to `visit`.
/// Stops after the first variant that leaves more than `stop_after` records.
pub fn scan_selectors<F>(
    document: &Html,
    selectors: &[Selector],
    stop_after: usize,
    mut visit: F,
) -> Dataset
where
    F: FnMut(ElementRef<'_>, &mut Dataset),
{
    let mut result = Vec::new();
    for selector in selectors {
        for element in document.select(selector) {
            visit(element, &mut result);
        }
        if result.len() > stop_after {
            break;
        }
    }
    result
}

/// Parse static selector lists; a malformed entry is a programming error.
pub fn selectors(css: &[&str]) -> Vec<Selector> {
    css.iter()
        .map(|s| Selector::parse(s).unwrap_or_else(|e| panic!("bad selector {s:?}: {e}")))
        .collect()
}

// ── Tests ──
