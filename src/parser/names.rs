use super::months::MonthVocabulary;

/// Whole-candidate boilerplate ("and others", "etc.").
const BOILERPLATE: &[&str] = &["и иные", "и др.", "другие"];

/// Anything mentioning these is commentary, not a name.
const OFF_TOPIC: &[&str] = &["именины", "праздник", "день памяти"];

/// Split a comma-separated names blob into clean names, in source order.
/// Duplicates are kept; deduplication happens at merge time.
pub fn clean(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(clean_one).collect()
}

fn clean_one(candidate: &str) -> Option<String> {
    let name = candidate.trim();
    if name.is_empty()
        || BOILERPLATE.contains(&name)
        || name.starts_with("и ")
        || OFF_TOPIC.iter().any(|m| name.contains(m))
        || has_day_label(name)
    {
        return None;
    }

    // "Иван (мученик)" -> "Иван"
    let name = match name.find('(') {
        Some(idx) => name[..idx].trim(),
        None => name,
    };
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// A neighbouring "2 января:" entry glued onto the blob.
fn has_day_label(name: &str) -> bool {
    MonthVocabulary::global()
        .genitives()
        .any(|g| name.contains(&format!(" {}:", g)))
}
