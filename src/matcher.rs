//! Name matching.
//!
//! Matching is always against a bare entry name, never a full path.
//! - `Literal` patterns use shell-glob rules (`*`, `?`, `[abc]`, `[!abc]`);
//!   case-insensitive on Windows, case-sensitive elsewhere.
//! - `Regex` patterns use search semantics (no implicit anchoring) and fail
//!   closed: an invalid expression matches nothing instead of erroring.

use std::ffi::OsStr;

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use tracing::debug;

use crate::platform::Platform;

/// Pattern that accepts every name without consulting a matcher.
pub const MATCH_ALL: &str = "*";

/// How a pattern string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchKind {
    /// Shell glob.
    #[default]
    Literal,
    /// Regular expression, unanchored search.
    Regex,
}

/// Pattern string plus the rule used to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpec {
    pub pattern: String,
    pub kind: MatchKind,
}

impl Default for MatchSpec {
    fn default() -> Self {
        Self::any()
    }
}

impl MatchSpec {
    /// `'*'` literal: accepts everything.
    pub fn any() -> Self {
        Self::glob(MATCH_ALL)
    }

    pub fn glob(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            kind: MatchKind::Literal,
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            kind: MatchKind::Regex,
        }
    }

    /// True for the unfiltered `'*'` pattern, whatever the kind.
    pub fn is_any(&self) -> bool {
        self.pattern == MATCH_ALL
    }

    /// Compile once for repeated use over a listing.
    pub fn compile(&self) -> NameMatcher {
        NameMatcher::new(self, Platform::current())
    }
}

/// Compiled form of a [`MatchSpec`].
#[derive(Debug, Clone)]
pub enum NameMatcher {
    All,
    Glob(GlobMatcher),
    /// Glob text the glob engine rejected (e.g. an unclosed `[`); compared verbatim.
    Verbatim { text: String, case_insensitive: bool },
    Regex(Regex),
    /// Invalid regular expression.
    Never,
}

impl NameMatcher {
    pub fn new(spec: &MatchSpec, platform: Platform) -> Self {
        if spec.is_any() {
            return NameMatcher::All;
        }
        match spec.kind {
            MatchKind::Literal => compile_glob(&spec.pattern, platform.is_case_insensitive()),
            MatchKind::Regex => match Regex::new(&spec.pattern) {
                Ok(re) => NameMatcher::Regex(re),
                Err(e) => {
                    debug!(pattern = %spec.pattern, error = %e, "invalid regex; matching nothing");
                    NameMatcher::Never
                }
            },
        }
    }

    pub fn is_match(&self, name: &OsStr) -> bool {
        match self {
            NameMatcher::All => true,
            NameMatcher::Glob(g) => g.is_match(name),
            NameMatcher::Verbatim {
                text,
                case_insensitive,
            } => {
                let name = name.to_string_lossy();
                if *case_insensitive {
                    name.to_lowercase() == text.to_lowercase()
                } else {
                    name == text.as_str()
                }
            }
            NameMatcher::Regex(re) => re.is_match(&name.to_string_lossy()),
            NameMatcher::Never => false,
        }
    }
}

fn compile_glob(pattern: &str, case_insensitive: bool) -> NameMatcher {
    let built = GlobBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .backslash_escape(false)
        .build();
    match built {
        Ok(glob) => NameMatcher::Glob(glob.compile_matcher()),
        Err(e) => {
            debug!(pattern, error = %e, "glob rejected; comparing verbatim");
            NameMatcher::Verbatim {
                text: pattern.to_string(),
                case_insensitive,
            }
        }
    }
}

/// Does `name` match `pattern` read as `kind`?
pub fn matches(name: &OsStr, pattern: &str, kind: MatchKind) -> bool {
    let spec = MatchSpec {
        pattern: pattern.to_string(),
        kind,
    };
    spec.compile().is_match(name)
}

/// True if `name` matches any of the glob `patterns`, ignoring case.
///
/// An absent name is accepted unconditionally.
// TODO: decide whether an absent name should really be a wildcard-accept; callers rely on it today.
pub fn matches_any<S: AsRef<str>>(name: Option<&OsStr>, patterns: &[S]) -> bool {
    let Some(name) = name else {
        return true;
    };
    patterns
        .iter()
        .any(|p| compile_glob(p.as_ref(), true).is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    fn glob_basics() {
        assert!(matches(os("report.txt"), "*.txt", MatchKind::Literal));
        assert!(matches(os("a1"), "a?", MatchKind::Literal));
        assert!(matches(os("b"), "[abc]", MatchKind::Literal));
        assert!(!matches(os("d"), "[abc]", MatchKind::Literal));
        assert!(matches(os("d"), "[!abc]", MatchKind::Literal));
        assert!(!matches(os("report.txt.bak"), "*.txt", MatchKind::Literal));
    }

    #[test]
    fn glob_case_follows_platform() {
        let spec = MatchSpec::glob("*.TXT");
        assert!(NameMatcher::new(&spec, Platform::Windows).is_match(os("a.txt")));
        assert!(!NameMatcher::new(&spec, Platform::Unix).is_match(os("a.txt")));
    }

    #[test]
    fn backslash_is_not_an_escape() {
        let spec = MatchSpec::glob(r"a\b");
        assert!(NameMatcher::new(&spec, Platform::Unix).is_match(os(r"a\b")));
    }

    #[test]
    fn unclosed_class_compares_verbatim() {
        assert!(matches(os("[abc"), "[abc", MatchKind::Literal));
        assert!(!matches(os("a"), "[abc", MatchKind::Literal));
    }

    #[test]
    fn regex_uses_search_semantics() {
        assert!(matches(os("data_2024.csv"), r"\d{4}", MatchKind::Regex));
        assert!(!matches(os("data.csv"), r"^\d", MatchKind::Regex));
    }

    #[test]
    fn invalid_regex_fails_closed() {
        assert!(!matches(os("anything"), "([unclosed", MatchKind::Regex));
        assert!(!matches(os("("), "(", MatchKind::Regex));
    }

    #[test]
    fn star_matches_everything_for_both_kinds() {
        assert!(MatchSpec::any().is_any());
        assert!(MatchSpec::regex("*").is_any());
        assert!(matches(os(".hidden"), "*", MatchKind::Literal));
    }

    #[test]
    fn matches_any_is_case_insensitive() {
        assert!(matches_any(Some(os("PHOTO.JPG")), &["*.png", "*.jpg"]));
        assert!(!matches_any(Some(os("notes.md")), &["*.png", "*.jpg"]));
        let none: [&str; 0] = [];
        assert!(!matches_any(Some(os("x")), &none));
    }

    #[test]
    fn matches_any_accepts_absent_name() {
        assert!(matches_any::<&str>(None, &[]));
        assert!(matches_any(None, &["*.never"]));
    }
}
