//! Scoped Name Generation
//!
//! A generator maps `(local_name, input_path, source_text)` to the globally
//! unique name a keyframes rule is renamed to. Hosts inject their own
//! strategy through [`ScopedNameGenerator`]; any matching closure qualifies.

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::ConfigError;

lazy_static! {
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\[([^\]]*)\]").unwrap();
}

const DEFAULT_HASH_LEN: usize = 8;

pub trait ScopedNameGenerator: Send + Sync {
    fn generate(&self, local_name: &str, input_path: &str, source: &str) -> String;
}

impl<F> ScopedNameGenerator for F
where
    F: Fn(&str, &str, &str) -> String + Send + Sync,
{
    fn generate(&self, local_name: &str, input_path: &str, source: &str) -> String {
        self(local_name, input_path, source)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEFAULT STRATEGY
// ═══════════════════════════════════════════════════════════════════════════════

/// `__<sanitized file name>__<local>`, e.g. `path/to/_file.css` + `foo`
/// gives `__file_css__foo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNameGenerator;

impl ScopedNameGenerator for DefaultNameGenerator {
    fn generate(&self, local_name: &str, input_path: &str, _source: &str) -> String {
        format!("__{}__{}", sanitize(basename(input_path)), local_name)
    }
}

fn basename(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}

/// Lower-cases and collapses every run of non-alphanumerics (underscores
/// included) to a single `_`, trimming it from both ends.
fn sanitize(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

// ═══════════════════════════════════════════════════════════════════════════════
// PATTERN STRATEGY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Name,
    Local,
    Hash(usize),
}

/// Interpolating generator for host configuration.
///
/// Placeholders:
/// - `[name]`: sanitized file stem of the input path
/// - `[local]`: the local keyframes name
/// - `[hash]` / `[hash:N]`: hex SHA-256 of the input path and local name,
///   truncated to `N` characters (default 8, at most 64)
#[derive(Debug, Clone)]
pub struct PatternNameGenerator {
    segments: Vec<Segment>,
}

impl PatternNameGenerator {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(pattern) {
            let whole = caps.get(0).unwrap();
            if whole.start() > last {
                segments.push(Segment::Literal(pattern[last..whole.start()].to_string()));
            }
            segments.push(parse_placeholder(&caps[1])?);
            last = whole.end();
        }
        if last < pattern.len() {
            segments.push(Segment::Literal(pattern[last..].to_string()));
        }

        Ok(Self { segments })
    }
}

fn parse_placeholder(token: &str) -> Result<Segment, ConfigError> {
    match token {
        "name" => Ok(Segment::Name),
        "local" => Ok(Segment::Local),
        "hash" => Ok(Segment::Hash(DEFAULT_HASH_LEN)),
        _ => {
            let Some(len) = token.strip_prefix("hash:") else {
                return Err(ConfigError::UnknownPlaceholder(token.to_string()));
            };
            match len.parse::<usize>() {
                Ok(n) if (1..=64).contains(&n) => Ok(Segment::Hash(n)),
                _ => Err(ConfigError::InvalidHashLength(len.to_string())),
            }
        }
    }
}

fn file_stem(path: &str) -> &str {
    let base = basename(path);
    match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    }
}

fn compute_hash(input_path: &str, local_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input_path.as_bytes());
    hasher.update([0u8]);
    hasher.update(local_name.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl ScopedNameGenerator for PatternNameGenerator {
    fn generate(&self, local_name: &str, input_path: &str, _source: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Name => out.push_str(&sanitize(file_stem(input_path))),
                Segment::Local => out.push_str(local_name),
                Segment::Hash(len) => out.push_str(&compute_hash(input_path, local_name)[..*len]),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_generator() {
        let generator = DefaultNameGenerator;
        assert_eq!(generator.generate("foo", "path/to/_file.css", ""), "__file_css__foo");
        assert_eq!(
            generator.generate("foo", "path/to/_file.css", "@keyframes foo {}"),
            generator.generate("foo", "path/to/_file.css", "")
        );
        assert_eq!(generator.generate("spin", "C:\\src\\My-Button.CSS", ""), "__my_button_css__spin");
        assert_eq!(generator.generate("a", "", ""), "____a");
    }

    #[test]
    fn test_closure_is_generator() {
        let generator = |local: &str, _path: &str, _css: &str| format!("__scope__{}", local);
        assert_eq!(generator.generate("foo", "a.css", ""), "__scope__foo");
    }

    #[test]
    fn test_pattern_generator() {
        let generator = PatternNameGenerator::new("[name]__[local]").unwrap();
        assert_eq!(generator.generate("fade", "src/Button.module.css", ""), "button_module__fade");

        let hashed = PatternNameGenerator::new("[local]_[hash:6]").unwrap();
        let a = hashed.generate("fade", "a.css", "");
        let b = hashed.generate("fade", "b.css", "");
        assert!(a.starts_with("fade_"));
        assert_eq!(a.len(), "fade_".len() + 6);
        assert_ne!(a, b);
        assert_eq!(a, hashed.generate("fade", "a.css", "other source"));
    }

    #[test]
    fn test_pattern_errors() {
        assert_eq!(
            PatternNameGenerator::new("[path]_[local]").unwrap_err(),
            ConfigError::UnknownPlaceholder("path".to_string())
        );
        assert_eq!(
            PatternNameGenerator::new("[hash:0]").unwrap_err(),
            ConfigError::InvalidHashLength("0".to_string())
        );
        assert!(PatternNameGenerator::new("[hash:x]").is_err());
    }
}
