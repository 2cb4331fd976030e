//! Field access shared by every metadata source.
//!
//! A `song.ini` section and a DTA song entry store their values very
//! differently, but the resolvers only ever ask "value of `key` in `group`".
//! [`FieldSource`] is that question; the functions below layer the coercions
//! both resolvers need on top of it.

use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("required field `{key}` is missing")]
    Missing { key: String },

    #[error("field `{key}` has non-integer value `{value}`")]
    Malformed {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl FieldError {
    pub fn missing(key: impl Into<String>) -> Self {
        FieldError::Missing { key: key.into() }
    }

    pub fn malformed(key: impl Into<String>, value: impl Into<String>, source: ParseIntError) -> Self {
        FieldError::Malformed {
            key: key.into(),
            value: value.into(),
            source,
        }
    }
}

/// Anything that can answer "value of `key` in `group`"
pub trait FieldSource {
    fn try_get(&self, group: &str, key: &str) -> Option<String>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn try_get(&self, group: &str, key: &str) -> Option<String> {
        (**self).try_get(group, key)
    }
}

/// `"true"` in any casing, or `"1"`
pub fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

pub fn optional<S: FieldSource + ?Sized>(source: &S, group: &str, key: &str) -> Option<String> {
    source.try_get(group, key)
}

pub fn required<S: FieldSource + ?Sized>(
    source: &S,
    group: &str,
    key: &str,
) -> Result<String, FieldError> {
    source
        .try_get(group, key)
        .ok_or_else(|| FieldError::missing(key))
}

/// Value of the first key in `keys` that is present
pub fn first_of<S: FieldSource + ?Sized>(source: &S, group: &str, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| source.try_get(group, key))
}

/// Integer value of `key`, `None` when absent
pub fn int<T, S>(source: &S, group: &str, key: &str) -> Result<Option<T>, FieldError>
where
    T: FromStr<Err = ParseIntError>,
    S: FieldSource + ?Sized,
{
    source
        .try_get(group, key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| FieldError::malformed(key, value.as_str(), e))
        })
        .transpose()
}

/// Integer millisecond value of `key`, converted to seconds
pub fn millis_as_secs<S: FieldSource + ?Sized>(
    source: &S,
    group: &str,
    key: &str,
) -> Result<Option<f64>, FieldError> {
    Ok(int::<i64, S>(source, group, key)?.map(|millis| millis as f64 / 1000.0))
}

/// Whether `key` is present and truthy (see [`is_truthy`])
pub fn truthy<S: FieldSource + ?Sized>(source: &S, group: &str, key: &str) -> bool {
    source
        .try_get(group, key)
        .is_some_and(|value| is_truthy(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use std::collections::HashMap;

    struct Fields(HashMap<(&'static str, &'static str), &'static str>);

    impl FieldSource for Fields {
        fn try_get(&self, group: &str, key: &str) -> Option<String> {
            self.0
                .iter()
                .find(|((g, k), _)| *g == group && *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    fn fields(entries: &[(&'static str, &'static str, &'static str)]) -> Fields {
        Fields(entries.iter().map(|(g, k, v)| ((*g, *k), *v)).collect())
    }

    #[rstest]
    #[case("true", true)]
    #[case("TRUE", true)]
    #[case("True", true)]
    #[case("1", true)]
    #[case("0", false)]
    #[case("false", false)]
    #[case("yes", false)]
    #[case("", false)]
    fn truthiness(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_truthy(value), expected);
    }

    #[test]
    fn required_reports_the_missing_key() {
        let source = fields(&[("song", "name", "Test")]);
        assert_eq!(required(&source, "song", "name").unwrap(), "Test");
        assert_matches!(
            required(&source, "song", "artist"),
            Err(FieldError::Missing { key }) if key == "artist"
        );
    }

    #[test]
    fn groups_are_kept_apart() {
        let source = fields(&[("song", "name", "path"), ("", "name", "Title")]);
        assert_eq!(optional(&source, "", "name").as_deref(), Some("Title"));
        assert_eq!(optional(&source, "song", "name").as_deref(), Some("path"));
        assert_eq!(optional(&source, "rank", "name"), None);
    }

    #[test]
    fn first_of_respects_key_order() {
        let source = fields(&[("song", "frets", "B"), ("song", "charter", "A")]);
        assert_eq!(
            first_of(&source, "song", &["charter", "frets"]).as_deref(),
            Some("A")
        );
        assert_eq!(
            first_of(&source, "song", &["missing", "frets"]).as_deref(),
            Some("B")
        );
        assert_eq!(first_of(&source, "song", &["nope"]), None);
    }

    #[test]
    fn int_parses_signed_values() {
        let source = fields(&[("song", "delay", "-250"), ("song", "bad", "12ab")]);
        assert_eq!(int::<i64, _>(&source, "song", "delay").unwrap(), Some(-250));
        assert_eq!(int::<i32, _>(&source, "song", "absent").unwrap(), None);
        assert_matches!(
            int::<i32, _>(&source, "song", "bad"),
            Err(FieldError::Malformed { key, value, .. }) if key == "bad" && value == "12ab"
        );
    }

    #[test]
    fn millis_convert_to_seconds() {
        let source = fields(&[("song", "song_length", "150000")]);
        assert_eq!(
            millis_as_secs(&source, "song", "song_length").unwrap(),
            Some(150.0)
        );
    }

    #[test]
    fn truthy_requires_presence() {
        let source = fields(&[("song", "pro_drums", "True")]);
        assert!(truthy(&source, "song", "pro_drums"));
        assert!(!truthy(&source, "song", "five_lane_drums"));
    }
}
