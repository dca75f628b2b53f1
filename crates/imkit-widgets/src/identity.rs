//! Identity resolution for widget labels.
//!
//! A raw widget label carries both what the user sees and what the cache
//! keys on. The rules, applied at the first `##` in the label:
//!
//! | Raw label | Visible label | Key |
//! |-----------|---------------|-----|
//! | `"Save"` | `"Save"` | `"Save" + kind` |
//! | `"Save##toolbar"` | `"Save"` | `"Save##toolbar" + kind` |
//! | `"Save###btn"` | `"Save"` | `"btn" + kind` |
//!
//! `##` disambiguates two widgets that show the same text. `###` pins the key
//! so the visible text can change between frames (a counter in a button
//! label, a translated title) without losing state.
//!
//! # Design Invariants
//!
//! 1. **Kind isolation**: the same raw label under two kind tags yields two
//!    distinct keys, so a button and a text field labelled `"Name"` never
//!    share state.
//! 2. **Stability**: resolution is a pure function of `(raw, kind)`.

use std::fmt;

/// Kind tags used by the built-in widgets.
pub mod kind {
    pub const BUTTON: &str = "button";
    pub const TEXT: &str = "text";
    pub const INPUT_TEXT: &str = "inputtext";
    pub const SLIDER_FLOAT: &str = "sliderfloat";
    pub const DRAG_FLOAT: &str = "dragfloat";
    pub const DRAG_INT: &str = "dragint";
    pub const COLOR_EDIT: &str = "coloredit";
}

/// Resolved label/key pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Text to display.
    pub label: String,
    /// Cache and event key.
    pub key: String,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label, self.key)
    }
}

/// Split `raw` into visible label and stable key for a widget of `kind`.
#[must_use]
pub fn resolve(raw: &str, kind: &str) -> Identity {
    let Some(pos) = raw.find("##") else {
        return Identity {
            label: raw.to_owned(),
            key: format!("{raw}{kind}"),
        };
    };
    let label = raw[..pos].to_owned();
    let key = match raw[pos..].strip_prefix("###") {
        Some(pinned) => format!("{pinned}{kind}"),
        None => format!("{raw}{kind}"),
    };
    Identity { label, key }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_label() {
        let id = resolve("Save", kind::BUTTON);
        assert_eq!(id.label, "Save");
        assert_eq!(id.key, "Savebutton");
    }

    #[test]
    fn double_hash_keeps_full_raw_in_key() {
        let id = resolve("Save##toolbar", kind::BUTTON);
        assert_eq!(id.label, "Save");
        assert_eq!(id.key, "Save##toolbarbutton");
    }

    #[test]
    fn triple_hash_pins_key() {
        let a = resolve("Frame 1###fps", kind::TEXT);
        let b = resolve("Frame 2###fps", kind::TEXT);
        assert_eq!(a.label, "Frame 1");
        assert_eq!(a.key, "fpstext");
        assert_eq!(a.key, b.key);
    }

    #[test]
    fn first_occurrence_wins() {
        let id = resolve("a##b##c", kind::BUTTON);
        assert_eq!(id.label, "a");
        assert_eq!(id.key, "a##b##cbutton");
    }

    #[test]
    fn empty_prefix() {
        let id = resolve("###only", kind::SLIDER_FLOAT);
        assert_eq!(id.label, "");
        assert_eq!(id.key, "onlysliderfloat");
    }
}
