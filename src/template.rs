//! Input-deck templates and their rendering.
//!
//! External tools consume plain-text input decks with `{name}` placeholders.
//! Rendering is either strict ([`render`]: every placeholder occurring in
//! the template must be supplied) or tolerant ([`replace_optional`]: replace
//! when present, no-op otherwise). Optional capabilities such as anchored
//! docking or RMSD references are gated with [`require_placeholder`], so a
//! deck that does not declare support fails at render time, before any tool
//! is invoked.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Built-in deck templates shipped with the crate.
pub mod decks {
    /// Flexible docking, adapted FLX protocol.
    pub const FLX: &str = include_str!("../templates/FLX.in.template");
    /// Flexible docking with RMSD against a reference molecule.
    pub const FLX_RMSD_REFERENCE: &str =
        include_str!("../templates/FLX_rmsd_reference.in.template");
    /// Fixed anchor docking.
    pub const FAD: &str = include_str!("../templates/FAD.in.template");
    /// Fixed anchor docking with RMSD against a reference molecule.
    pub const FAD_RMSD_REFERENCE: &str =
        include_str!("../templates/FAD_rmsd_reference.in.template");
    /// Anchored de novo growth.
    pub const ANCHORED_DE_NOVO: &str = include_str!("../templates/anchored_de_novo.in.template");
    /// Fragment library generation.
    pub const FRAGMENT_GENERATION: &str =
        include_str!("../templates/fragment_generation.in.template");
    /// Grid calculation deck.
    pub const GRID: &str = include_str!("../templates/grid.in.template");
    /// Box generation deck, fed to showbox on stdin.
    pub const BOX: &str = include_str!("../templates/box.in.template");
    /// Sphere generation control file.
    pub const INSPH: &str = include_str!("../templates/INSPH.template");
    /// Sphere visualization deck, fed to showsphere on stdin.
    pub const SHOW_SPHERES: &str = include_str!("../templates/show_spheres.in.template");
    /// Headless viewer script for active site extraction.
    pub const WRITE_ACTIVE_SITE: &str =
        include_str!("../templates/write_active_site.py.template");
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read deck template '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("deck template contains unknown placeholder '{{{name}}}'")]
    UnknownPlaceholder { name: String },

    #[error("deck template does not support '{{{placeholder}}}'")]
    UnsupportedFeature { placeholder: &'static str },
}

/// Source of a deck template: a built-in deck or a user-supplied file.
#[derive(Debug, Clone)]
pub enum Deck {
    BuiltIn(&'static str),
    File(PathBuf),
}

impl Deck {
    pub fn load(&self) -> Result<String, Error> {
        match self {
            Deck::BuiltIn(text) => Ok((*text).to_string()),
            Deck::File(path) => fs::read_to_string(path).map_err(|source| Error::Read {
                path: path.clone(),
                source,
            }),
        }
    }

    /// The backing file, if any. File-backed decks take part in stage
    /// precondition checks; built-in decks do not.
    pub fn file(&self) -> Option<&Path> {
        match self {
            Deck::BuiltIn(_) => None,
            Deck::File(path) => Some(path),
        }
    }
}

fn is_placeholder_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Strict rendering: every `{name}` placeholder in the template must have a
/// value. Supplied values the template does not use are ignored.
pub fn render(template: &str, values: &[(&str, String)]) -> Result<String, Error> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let end = after
            .char_indices()
            .find(|(_, c)| !is_placeholder_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(after.len());
        if end > 0 && after[end..].starts_with('}') {
            let name = &after[..end];
            let value = values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value)
                .ok_or_else(|| Error::UnknownPlaceholder {
                    name: name.to_string(),
                })?;
            out.push_str(value);
            rest = &after[end + 1..];
        } else {
            // not a placeholder, keep the brace literally
            out.push('{');
            rest = after;
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Tolerant rendering: replaces `{name}` where present, leaves the text
/// unchanged otherwise. Used where a deck may legitimately lack optional
/// placeholders.
pub fn replace_optional(template: &str, name: &str, value: &str) -> String {
    template.replace(&format!("{{{name}}}"), value)
}

pub fn has_placeholder(template: &str, name: &str) -> bool {
    template.contains(&format!("{{{name}}}"))
}

/// Fails when a deck does not declare the given placeholder. This makes a
/// configuration mismatch attributable at render time rather than showing
/// up as an external tool failure.
pub fn require_placeholder(template: &str, placeholder: &'static str) -> Result<(), Error> {
    if has_placeholder(template, placeholder) {
        Ok(())
    } else {
        Err(Error::UnsupportedFeature { placeholder })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_every_placeholder() {
        let deck = "ligand {ligand}\nspheres {spheres}\nligand again {ligand}\n";
        let rendered = render(
            deck,
            &[
                ("ligand", "lig.mol2".to_string()),
                ("spheres", "sel.sph".to_string()),
                ("unused", "ignored".to_string()),
            ],
        )
        .unwrap();
        assert_eq!(rendered, "ligand lig.mol2\nspheres sel.sph\nligand again lig.mol2\n");
    }

    #[test]
    fn render_leaves_non_placeholder_text_unchanged() {
        let deck = "grid_score_vdw_scale 1\n";
        assert_eq!(render(deck, &[]).unwrap(), deck);
    }

    #[test]
    fn render_fails_on_unknown_placeholder() {
        let err = render("prefix {missing}\n", &[]).unwrap_err();
        match err {
            Error::UnknownPlaceholder { name } => assert_eq!(name, "missing"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn replace_optional_tolerates_absent_placeholder() {
        assert_eq!(replace_optional("no anchor here", "anchor", "C2,2"), "no anchor here");
        assert_eq!(replace_optional("atom {anchor}", "anchor", "C2,2"), "atom C2,2");
    }

    #[test]
    fn require_placeholder_flags_unsupported_decks() {
        assert!(require_placeholder("atom_in_anchor {anchor}", "anchor").is_ok());
        let err = require_placeholder("plain deck", "anchor").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFeature { placeholder: "anchor" }));
    }

    #[test]
    fn builtin_decks_declare_their_features() {
        assert!(has_placeholder(decks::FAD, "anchor"));
        assert!(has_placeholder(decks::FAD_RMSD_REFERENCE, "anchor"));
        assert!(has_placeholder(decks::FAD_RMSD_REFERENCE, "reference"));
        assert!(has_placeholder(decks::FLX_RMSD_REFERENCE, "reference"));
        assert!(!has_placeholder(decks::FLX, "anchor"));
        assert!(!has_placeholder(decks::FLX, "reference"));
    }

    #[test]
    fn file_deck_loads_from_disk() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"custom {ligand}\n").unwrap();
        let deck = Deck::File(file.path().to_path_buf());
        assert_eq!(deck.load().unwrap(), "custom {ligand}\n");
        assert!(deck.file().is_some());
        assert!(Deck::BuiltIn(decks::FLX).file().is_none());
    }
}
