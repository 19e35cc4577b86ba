/*!
 * Merging of alternative translations.
 *
 * A phrase can translate to several valid variants. Providers separate them
 * with `" / "`, and results of several providers are combined the same way.
 */

use std::collections::HashSet;

/// Separator between alternative phrasings
pub const ALTERNATIVE_SEPARATOR: &str = " / ";

/// Split each text on `" / "`, drop case-insensitive duplicates keeping the
/// first spelling, and join the rest in order
pub fn merge_alternatives<S: AsRef<str>>(texts: &[S]) -> String {
    let mut seen = HashSet::new();
    let mut merged: Vec<&str> = Vec::new();

    for text in texts {
        for part in text.as_ref().split(ALTERNATIVE_SEPARATOR) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if seen.insert(part.to_lowercase()) {
                merged.push(part);
            }
        }
    }

    merged.join(ALTERNATIVE_SEPARATOR)
}

/// Deduplicate the alternatives of a single text
pub fn dedup_alternatives(text: &str) -> String {
    merge_alternatives(&[text])
}
