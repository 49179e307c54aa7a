//! Exact-match and wildcard filtering for [Store::get_all](crate::stores::Store::get_all).

use rusqlite::types::Value;

use crate::{Error, record::Record};

/// A set of field patterns that a record must all match.
///
/// Patterns follow SQLite `LIKE` semantics: `%` matches any run of
/// characters (including none), `_` matches exactly one character and
/// ASCII letters compare case-insensitively. A pattern without wildcards is
/// an exact match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    /// Create a filter that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the condition that `field` matches `pattern`.
    pub fn field(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.conditions.push((field.into(), pattern.into()));
        self
    }

    /// The `(field, pattern)` pairs in the order they were added.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conditions
            .iter()
            .map(|(field, pattern)| (field.as_str(), pattern.as_str()))
    }

    /// Whether the filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Check that every field in the filter is declared by `R`.
    ///
    /// # Errors
    /// Returns [Error::UnknownField] for the first field `R` does not declare.
    pub fn validate<R: Record>(&self) -> Result<(), Error> {
        match self.conditions().find(|(field, _)| !R::has_field(field)) {
            Some((field, _)) => Err(Error::UnknownField {
                table: R::TABLE,
                field: field.to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Whether `record` satisfies every condition.
    ///
    /// Conditions on undeclared fields never match; call [Filter::validate] first
    /// to report them as errors instead.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.conditions().all(|(field, pattern)| {
            record
                .value_of(field)
                .and_then(|value| value_as_text(&value))
                .is_some_and(|text| like(pattern, &text))
        })
    }

    /// The SQL `WHERE` clause for this filter with numbered parameters, or an
    /// empty string if there are no conditions.
    ///
    /// Field names are interpolated as-is, so the filter must be validated first.
    pub(crate) fn where_clause(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let predicates: Vec<String> = self
            .conditions()
            .enumerate()
            .map(|(index, (field, _))| format!("\"{field}\" LIKE ?{}", index + 1))
            .collect();

        format!(" WHERE {}", predicates.join(" AND "))
    }

    /// The patterns in parameter order for [Filter::where_clause].
    pub(crate) fn patterns(&self) -> Vec<&str> {
        self.conditions().map(|(_, pattern)| pattern).collect()
    }
}

impl<F, P> FromIterator<(F, P)> for Filter
where
    F: Into<String>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, P)>>(iter: I) -> Self {
        Self {
            conditions: iter
                .into_iter()
                .map(|(field, pattern)| (field.into(), pattern.into()))
                .collect(),
        }
    }
}

/// The text SQLite compares against a `LIKE` pattern, `None` for `NULL`.
fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(integer) => Some(integer.to_string()),
        Value::Real(real) => Some(real.to_string()),
        Value::Text(text) => Some(text.clone()),
        Value::Blob(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Match `text` against a SQL `LIKE` `pattern`.
///
/// `%` matches any run of characters, `_` matches exactly one character and
/// ASCII letters are compared case-insensitively. There is no escape character.
pub fn like(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut p = 0;
    let mut t = 0;
    // Position of the last `%` seen and the text position it is currently matched up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '_' || c.eq_ignore_ascii_case(&text[t]) => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((percent, matched_until)) => {
                    p = percent + 1;
                    t = matched_until + 1;
                    backtrack = Some((percent, matched_until + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}

#[cfg(test)]
mod like_tests {
    use super::like;

    #[test]
    fn pattern_without_wildcards_is_exact_match() {
        assert!(like("food", "food"));
        assert!(!like("food", "foods"));
        assert!(!like("food", "foo"));
    }

    #[test]
    fn ascii_letters_ignore_case() {
        assert!(like("FoOd", "food"));
    }

    #[test]
    fn non_ascii_letters_respect_case() {
        assert!(like("еда", "еда"));
        assert!(!like("ЕДА", "еда"));
    }

    #[test]
    fn percent_matches_any_run() {
        assert!(like("%", ""));
        assert!(like("%", "anything"));
        assert!(like("f%d", "fd"));
        assert!(like("f%d", "food"));
        assert!(like("%o%", "food"));
        assert!(!like("f%x", "food"));
    }

    #[test]
    fn percent_backtracks() {
        assert!(like("%ab%ab", "abxabab"));
        assert!(!like("%ab%ab", "abxab_"));
    }

    #[test]
    fn underscore_matches_exactly_one_character() {
        assert!(like("f__d", "food"));
        assert!(!like("f_d", "food"));
        assert!(!like("_", ""));
        assert!(like("_", "ж"));
    }

    #[test]
    fn empty_pattern_matches_only_empty_text() {
        assert!(like("", ""));
        assert!(!like("", "a"));
    }
}
