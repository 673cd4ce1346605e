//! Text normalization helpers.

use std::collections::HashSet;

/// Collapse control characters and whitespace runs into single spaces and
/// trim the result. Applying it twice yields the same string.
pub fn clean_text(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean every text, drop empty and repeated ones (first occurrence wins) and
/// join the rest in source order.
pub fn merge_flavor_text<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for text in texts {
        let cleaned = clean_text(text);
        if !cleaned.is_empty() && seen.insert(cleaned.clone()) {
            merged.push(cleaned);
        }
    }

    merged.join(" ")
}

/// Uppercase the first letter of every alphabetic run and lowercase the rest
/// (`mr-mime` becomes `Mr-Mime`).
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Human-readable label for an API slug (`solar-power` becomes `Solar Power`).
pub fn display_label(slug: &str) -> String {
    title_case(&slug.replace('-', " "))
}
