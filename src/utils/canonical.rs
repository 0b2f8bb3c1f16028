//! Data-check-string canonicalization.

use std::fmt::Display;

/// Render `fields` as `key=value` lines sorted by key and joined with `\n`.
///
/// Keys are ordered byte-wise (case-sensitive), so the result does not depend
/// on the order the fields were supplied in. Values are rendered with their
/// `Display` form, without quoting or escaping. There is no trailing newline.
pub fn data_check_string<'a, I, V>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: Display,
{
    let mut pairs: Vec<(&str, V)> = fields.into_iter().collect();
    pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
