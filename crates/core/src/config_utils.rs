//! Coercion of loosely-typed configuration values.
//!
//! Configuration reaches the server from two places: environment variables,
//! which are always strings, and an optional JSON file, whose values may
//! already be booleans or integers. [`RawConfig`] captures both so the
//! coercion helpers can convert strings while passing typed values through.

use std::fmt;

/// A configuration value before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawConfig {
    Text(String),
    Bool(bool),
    Integer(i64),
}

impl fmt::Display for RawConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawConfig::Text(s) => f.write_str(s),
            RawConfig::Bool(b) => write!(f, "{b}"),
            RawConfig::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for RawConfig {
    fn from(value: &str) -> Self {
        RawConfig::Text(value.to_string())
    }
}

impl From<String> for RawConfig {
    fn from(value: String) -> Self {
        RawConfig::Text(value)
    }
}

impl From<bool> for RawConfig {
    fn from(value: bool) -> Self {
        RawConfig::Bool(value)
    }
}

impl From<i64> for RawConfig {
    fn from(value: i64) -> Self {
        RawConfig::Integer(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}: expected a boolean, got {value}")]
    NotABoolean { key: String, value: String },

    #[error("{key}: expected an integer, got {value}")]
    NotAnInteger { key: String, value: String },

    #[error("{key}: value {value} is out of range")]
    OutOfRange { key: String, value: String },
}

/// Coerce a value into a boolean.
///
/// Only the exact string `"true"` is truthy; every other string is `false`.
/// Booleans pass through and an absent value stays absent.
///
/// ```
/// use notewell_core::config_utils::{to_boolean_config, RawConfig};
///
/// assert_eq!(to_boolean_config(Some(RawConfig::from("true"))), Ok(Some(true)));
/// assert_eq!(to_boolean_config(Some(RawConfig::from("yes"))), Ok(Some(false)));
/// assert_eq!(to_boolean_config(None), Ok(None));
/// ```
pub fn to_boolean_config(value: Option<RawConfig>) -> Result<Option<bool>, ConfigError> {
    match value {
        None => Ok(None),
        Some(RawConfig::Text(s)) => Ok(Some(s == "true")),
        Some(RawConfig::Bool(b)) => Ok(Some(b)),
        Some(RawConfig::Integer(n)) => Err(ConfigError::NotABoolean {
            key: String::new(),
            value: n.to_string(),
        }),
    }
}

/// Split a delimited string into trimmed items.
///
/// An absent or empty value yields `fallback`.
pub fn to_array_config(value: Option<&str>, separator: &str, fallback: Vec<String>) -> Vec<String> {
    match value {
        Some(s) if !s.is_empty() => s.split(separator).map(|item| item.trim().to_string()).collect(),
        _ => fallback,
    }
}

/// Coerce a value into an integer.
///
/// Strings are parsed from their leading integer prefix, so `"42px"` is
/// `42`. Integers pass through. Absent and empty values stay absent.
pub fn to_integer_config(value: Option<RawConfig>) -> Result<Option<i64>, ConfigError> {
    match value {
        None => Ok(None),
        Some(RawConfig::Integer(n)) => Ok(Some(n)),
        Some(RawConfig::Text(s)) if s.is_empty() => Ok(None),
        Some(RawConfig::Text(s)) => parse_int_prefix(&s).map(Some),
        Some(RawConfig::Bool(b)) => Err(ConfigError::NotAnInteger {
            key: String::new(),
            value: b.to_string(),
        }),
    }
}

fn parse_int_prefix(input: &str) -> Result<i64, ConfigError> {
    let trimmed = input.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits == 0 {
        return Err(ConfigError::NotAnInteger {
            key: String::new(),
            value: input.to_string(),
        });
    }

    trimmed[..sign_len + digits]
        .parse()
        .map_err(|_| ConfigError::OutOfRange {
            key: String::new(),
            value: input.to_string(),
        })
}

impl ConfigError {
    /// Attach the name of the offending key.
    pub fn for_key(self, key: &str) -> Self {
        match self {
            ConfigError::NotABoolean { value, .. } => ConfigError::NotABoolean {
                key: key.to_string(),
                value,
            },
            ConfigError::NotAnInteger { value, .. } => ConfigError::NotAnInteger {
                key: key.to_string(),
                value,
            },
            ConfigError::OutOfRange { value, .. } => ConfigError::OutOfRange {
                key: key.to_string(),
                value,
            },
        }
    }
}

/// Rewrite a GitHub remote into a browsable tree URL for `reference`.
///
/// SSH remotes (`git@github.com:` and `ssh://git@github.com:`) become HTTPS.
/// Remotes outside GitHub are returned unchanged.
///
/// ```
/// use notewell_core::config_utils::github_url;
///
/// assert_eq!(
///     github_url("git@github.com:org/repo.git", "main"),
///     "https://github.com/org/repo/tree/main"
/// );
/// ```
pub fn github_url(repo: &str, reference: &str) -> String {
    const SSH_PREFIXES: [&str; 2] = ["ssh://git@github.com:", "git@github.com:"];

    let is_github = repo.starts_with("https://github.com")
        || repo.starts_with("git@github.com")
        || repo.starts_with("ssh://git@github.com");
    if !is_github {
        return repo.to_string();
    }

    let mut url = SSH_PREFIXES
        .iter()
        .find_map(|prefix| repo.strip_prefix(prefix))
        .map(|path| format!("https://github.com/{path}"))
        .unwrap_or_else(|| repo.to_string());

    if let Some(stripped) = url.strip_suffix(".git") {
        url = format!("{stripped}/");
    } else if !url.ends_with('/') {
        url.push('/');
    }

    format!("{url}tree/{reference}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn boolean_only_true_string_is_truthy() {
        assert_eq!(to_boolean_config(Some("true".into())), Ok(Some(true)));
        assert_eq!(to_boolean_config(Some("false".into())), Ok(Some(false)));
        assert_eq!(to_boolean_config(Some("TRUE".into())), Ok(Some(false)));
        assert_eq!(to_boolean_config(Some("".into())), Ok(Some(false)));
    }

    #[test]
    fn boolean_passthrough() {
        assert_eq!(to_boolean_config(None), Ok(None));
        assert_eq!(to_boolean_config(Some(false.into())), Ok(Some(false)));
        assert_matches!(
            to_boolean_config(Some(3i64.into())),
            Err(ConfigError::NotABoolean { .. })
        );
    }

    #[test]
    fn array_splits_and_trims() {
        assert_eq!(to_array_config(Some("a, b ,c"), ",", vec![]), vec!["a", "b", "c"]);
        assert_eq!(to_array_config(Some("a;b"), ";", vec![]), vec!["a", "b"]);
    }

    #[test]
    fn array_uses_fallback_when_absent_or_empty() {
        assert_eq!(to_array_config(None, ",", vec!["x".into()]), vec!["x"]);
        assert_eq!(to_array_config(Some(""), ",", vec!["x".into()]), vec!["x"]);
        assert!(to_array_config(None, ",", Vec::new()).is_empty());
    }

    #[test]
    fn integer_parses_strings_and_passes_integers() {
        assert_eq!(to_integer_config(Some("42".into())), Ok(Some(42)));
        assert_eq!(to_integer_config(Some(7i64.into())), Ok(Some(7)));
        assert_eq!(to_integer_config(Some(" -12".into())), Ok(Some(-12)));
        assert_eq!(to_integer_config(Some("100kb".into())), Ok(Some(100)));
        assert_eq!(to_integer_config(Some("".into())), Ok(None));
        assert_eq!(to_integer_config(None), Ok(None));
    }

    #[test]
    fn integer_rejects_garbage() {
        assert_matches!(
            to_integer_config(Some("abc".into())),
            Err(ConfigError::NotAnInteger { .. })
        );
        assert_matches!(
            to_integer_config(Some("99999999999999999999".into())),
            Err(ConfigError::OutOfRange { .. })
        );
    }

    #[test]
    fn error_carries_key_name() {
        let err = to_integer_config(Some("abc".into()))
            .unwrap_err()
            .for_key("PORT");
        assert_eq!(err.to_string(), "PORT: expected an integer, got abc");
    }

    #[test]
    fn github_ssh_remote_is_rewritten() {
        assert_eq!(
            github_url("git@github.com:org/repo.git", "main"),
            "https://github.com/org/repo/tree/main"
        );
        assert_eq!(
            github_url("ssh://git@github.com:org/repo", "v1.0"),
            "https://github.com/org/repo/tree/v1.0"
        );
    }

    #[test]
    fn github_https_remote_gets_tree_suffix() {
        assert_eq!(
            github_url("https://github.com/org/repo/", "abc123"),
            "https://github.com/org/repo/tree/abc123"
        );
        assert_eq!(
            github_url("https://github.com/org/repo", "abc123"),
            "https://github.com/org/repo/tree/abc123"
        );
    }

    #[test]
    fn non_github_remote_is_unchanged() {
        assert_eq!(
            github_url("https://gitlab.com/org/repo.git", "main"),
            "https://gitlab.com/org/repo.git"
        );
    }
}
