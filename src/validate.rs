use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// RESERVED NAMES
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    /// Keywords that can appear in the `animation` shorthand and therefore
    /// cannot name a keyframes rule.
    pub static ref RESERVED_NAMES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        // CSS-wide values
        s.insert("none");
        s.insert("inherit");
        s.insert("initial");
        s.insert("unset");

        // <single-timing-function>
        s.insert("linear");
        s.insert("ease");
        s.insert("ease-in");
        s.insert("ease-in-out");
        s.insert("ease-out");
        s.insert("step-start");
        s.insert("step-end");
        s.insert("start");
        s.insert("end");

        // <single-animation-iteration-count>
        s.insert("infinite");

        // <single-animation-direction>
        s.insert("normal");
        s.insert("reverse");
        s.insert("alternate");
        s.insert("alternate-reverse");

        // <single-animation-fill-mode>
        s.insert("forwards");
        s.insert("backwards");
        s.insert("both");

        // <single-animation-play-state>
        s.insert("running");
        s.insert("paused");
        s
    };

    /// `<custom-ident>`: optional single hyphen then a name-start code point
    /// (letter, underscore, non-ASCII or escape), or a leading `--`.
    static ref CUSTOM_IDENT_RE: Regex = Regex::new(
        r"(?s)^(?:--|-?(?:[A-Za-z_]|[^\x00-\x7F]|\\.))(?:[A-Za-z0-9_-]|[^\x00-\x7F]|\\.)*$"
    )
    .unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of checking a keyframes name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameClass {
    Reserved,
    InvalidIdentifier,
    Valid,
}

/// Classifies a candidate animation name. Reserved keywords are matched
/// case-sensitively and take priority over the identifier check.
pub fn classify(name: &str) -> NameClass {
    if RESERVED_NAMES.contains(name) {
        NameClass::Reserved
    } else if !CUSTOM_IDENT_RE.is_match(name) {
        NameClass::InvalidIdentifier
    } else {
        NameClass::Valid
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WARNINGS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    ReservedName,
    InvalidIdentifier,
    ExportKeyCollision,
}

/// A non-fatal problem found while scoping. The message text is consumed by
/// host tooling and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub kind: WarningKind,
    pub name: String,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, name: &str) -> Self {
        let message = match kind {
            WarningKind::ReservedName => {
                format!("Unable to use reserve '{}' animation name", name)
            }
            WarningKind::InvalidIdentifier => {
                format!("Invalid animation name identifier '{}'", name)
            }
            WarningKind::ExportKeyCollision => {
                format!("'{}' identifier is already declared and will be override", name)
            }
        };
        Warning {
            kind,
            name: name.to_string(),
            message,
        }
    }

    pub fn reserved_name(name: &str) -> Self {
        Self::new(WarningKind::ReservedName, name)
    }

    pub fn invalid_identifier(name: &str) -> Self {
        Self::new(WarningKind::InvalidIdentifier, name)
    }

    pub fn export_key_collision(name: &str) -> Self {
        Self::new(WarningKind::ExportKeyCollision, name)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
