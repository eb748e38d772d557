//! Anchor generation for fixed-anchor docking.
//!
//! A template structure marks its growth point with a synthetic linker
//! atom (`Du`). The single atom bonded to the linker is the anchor; the
//! same atom is located in the full ligand by exact textual equality of
//! its coordinate triple, and the resulting `name,sequence` token is
//! substituted into the docking deck.
//!
//! Coordinate matching is textual on purpose: both files are expected to
//! derive from a shared conformer, so the coordinate text is identical.
//! Any re-formatting of coordinates between the two files (for instance a
//! different decimal precision) breaks the match.

use std::path::{Path, PathBuf};

use crate::mol2::{self, AtomRecord, Records};
use crate::paths;
use crate::template::{self, decks, Deck};

use super::{ensure_dir, files_must_exist, Error, Stage};

pub struct AnchorGenerator {
    ligand: PathBuf,
    template: PathBuf,
    output_file: PathBuf,
    deck: Deck,
}

/// SYBYL type marking the synthetic linker placeholder.
const LINKER_TYPE: &str = "Du";

impl AnchorGenerator {
    /// Anchor generation matching `template`'s anchor atom into `ligand`,
    /// writing the anchored docking deck to `output_file`.
    pub fn new(ligand: &Path, template: &Path, output_file: &Path, deck: Option<Deck>) -> Self {
        Self {
            ligand: paths::absolute(ligand),
            template: paths::absolute(template),
            output_file: paths::absolute(output_file),
            deck: deck.unwrap_or(Deck::BuiltIn(decks::FAD)),
        }
    }

    /// The rendered anchored docking deck.
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// The template's anchor atom: the unique atom bonded to the unique
    /// linker. Zero or multiple candidates at any step are hard failures;
    /// downstream pose generation depends on unambiguous atom identity.
    fn anchor_atom_record<'r>(&self, records: &'r Records) -> Result<&'r AtomRecord, Error> {
        let mut linker_seq = None;
        for atom in &records.atoms {
            if atom.sybyl_type == LINKER_TYPE {
                if linker_seq.is_some() {
                    return Err(Error::MultipleLinkers(self.template.clone()));
                }
                linker_seq = Some(atom.seq);
            }
        }
        let linker_seq = linker_seq.ok_or_else(|| Error::LinkerNotFound(self.template.clone()))?;

        let mut anchor_seq = None;
        for bond in &records.bonds {
            if let Some(other) = bond.other(linker_seq) {
                if anchor_seq.is_some() {
                    return Err(Error::MultipleLinkerBonds(self.template.clone()));
                }
                anchor_seq = Some(other);
            }
        }
        let anchor_seq =
            anchor_seq.ok_or_else(|| Error::LinkerBondNotFound(self.template.clone()))?;

        // atom sequence numbers are 1-based positions in the atom block
        records
            .atoms
            .get(anchor_seq.wrapping_sub(1))
            .ok_or_else(|| Error::AnchorOutOfRange {
                seq: anchor_seq,
                atoms: records.atoms.len(),
                path: self.template.clone(),
            })
    }

    /// The ligand atom whose coordinate triple equals the anchor's,
    /// compared as exact text tokens.
    fn corresponding_atom_record<'r>(
        &self,
        anchor: &AtomRecord,
        records: &'r Records,
    ) -> Result<&'r AtomRecord, Error> {
        let mut found = None;
        for atom in &records.atoms {
            if atom.coords == anchor.coords {
                if found.is_some() {
                    return Err(Error::MultipleAnchorMatches(self.ligand.clone()));
                }
                found = Some(atom);
            }
        }
        found.ok_or_else(|| Error::AnchorNotFound(self.ligand.clone()))
    }
}

impl Stage for AnchorGenerator {
    fn run(&self, _recalculate: bool) -> Result<(), Error> {
        let mut inputs: Vec<&Path> = vec![&self.ligand, &self.template];
        if let Some(deck_file) = self.deck.file() {
            inputs.push(deck_file);
        }
        files_must_exist(&inputs)?;

        let ligand_records = mol2::read_records(&self.ligand)?;
        let template_records = mol2::read_records(&self.template)?;

        let anchor = self.anchor_atom_record(&template_records)?;
        let ligand_anchor = self.corresponding_atom_record(anchor, &ligand_records)?;
        let anchor_token = format!("{},{}", ligand_anchor.name, ligand_anchor.seq);
        log::debug!("anchor atom: {}", anchor_token);

        let deck_text = self.deck.load()?;
        // the deck may lack the anchor placeholder entirely; that is a
        // configuration error, not a rendering detail
        template::require_placeholder(&deck_text, "anchor")?;
        let anchored = template::replace_optional(&deck_text, "anchor", &anchor_token);

        if let Some(parent) = self.output_file.parent() {
            ensure_dir(parent)?;
        }
        super::write_file(&self.output_file, &anchored)?;
        Ok(())
    }

    fn output_exists(&self) -> bool {
        super::files_exist(&[&self.output_file])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TEMPLATE: &str = "\
@<TRIPOS>MOLECULE
core
3 2
SMALL
NO_CHARGES
@<TRIPOS>ATOM
      1 C1         -1.2700    0.2480    0.0000 C.3     1  CORE        0.0000
      2 C2          0.1390   -0.3080    0.0000 C.3     1  CORE        0.0000
      3 Du          1.0360    0.7890    0.0000 Du      1  CORE        0.0000
@<TRIPOS>BOND
     1    1    2 1
     2    2    3 1
";

    const LIGAND: &str = "\
@<TRIPOS>MOLECULE
ligand
4 3
SMALL
NO_CHARGES
@<TRIPOS>ATOM
      1 C1         -1.2700    0.2480    0.0000 C.3     1  LIG         0.0000
      2 C2          0.1390   -0.3080    0.0000 C.3     1  LIG         0.0000
      3 O1          1.0360    0.7890    0.0000 O.3     1  LIG         0.0000
      4 H1          1.9390    0.4730    0.0000 H       1  LIG         0.0000
@<TRIPOS>BOND
     1    1    2 1
     2    2    3 1
     3    3    4 1
";

    struct Fixture {
        dir: tempfile::TempDir,
        ligand: PathBuf,
        template: PathBuf,
    }

    fn fixture(ligand: &str, template: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let ligand_path = dir.path().join("ligand.mol2");
        let template_path = dir.path().join("core.mol2");
        fs::write(&ligand_path, ligand).unwrap();
        fs::write(&template_path, template).unwrap();
        Fixture {
            dir,
            ligand: ligand_path,
            template: template_path,
        }
    }

    #[test]
    fn resolves_the_anchor_into_the_deck() {
        let fix = fixture(LIGAND, TEMPLATE);
        let output_file = fix.dir.path().join("anchored_docking.in");
        let generator = AnchorGenerator::new(&fix.ligand, &fix.template, &output_file, None);
        generator.run(false).unwrap();
        assert!(generator.output_exists());
        let deck = fs::read_to_string(&output_file).unwrap();
        assert!(deck.contains("C2,2"));
        assert!(!deck.contains("{anchor}"));
    }

    #[test]
    fn custom_deck_without_anchor_placeholder_is_rejected() {
        let fix = fixture(LIGAND, TEMPLATE);
        let deck_path = fix.dir.path().join("plain.in.template");
        fs::write(&deck_path, "ligand_atom_file {ligand}\n").unwrap();
        let generator = AnchorGenerator::new(
            &fix.ligand,
            &fix.template,
            &fix.dir.path().join("out.in"),
            Some(Deck::File(deck_path)),
        );
        match generator.run(false).unwrap_err() {
            Error::Template(template::Error::UnsupportedFeature { placeholder }) => {
                assert_eq!(placeholder, "anchor")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn two_linkers_are_ambiguous() {
        let template = TEMPLATE.replace(
            "      1 C1         -1.2700    0.2480    0.0000 C.3     1  CORE        0.0000",
            "      1 Du         -1.2700    0.2480    0.0000 Du      1  CORE        0.0000",
        );
        let fix = fixture(LIGAND, &template);
        let generator = AnchorGenerator::new(
            &fix.ligand,
            &fix.template,
            &fix.dir.path().join("out.in"),
            None,
        );
        assert!(matches!(
            generator.run(false),
            Err(Error::MultipleLinkers(_))
        ));
    }

    #[test]
    fn missing_linker_is_an_error() {
        let template = TEMPLATE.replace(" Du  ", " C.3 ");
        let fix = fixture(LIGAND, &template);
        let generator = AnchorGenerator::new(
            &fix.ligand,
            &fix.template,
            &fix.dir.path().join("out.in"),
            None,
        );
        assert!(matches!(generator.run(false), Err(Error::LinkerNotFound(_))));
    }

    #[test]
    fn two_bonds_to_the_linker_are_ambiguous() {
        let template = TEMPLATE.replace(
            "     2    2    3 1",
            "     2    2    3 1\n     3    3    1 1",
        );
        let fix = fixture(LIGAND, &template);
        let generator = AnchorGenerator::new(
            &fix.ligand,
            &fix.template,
            &fix.dir.path().join("out.in"),
            None,
        );
        assert!(matches!(
            generator.run(false),
            Err(Error::MultipleLinkerBonds(_))
        ));
    }

    #[test]
    fn unbonded_linker_is_an_error() {
        let template = TEMPLATE.replace("     2    2    3 1\n", "");
        let fix = fixture(LIGAND, &template);
        let generator = AnchorGenerator::new(
            &fix.ligand,
            &fix.template,
            &fix.dir.path().join("out.in"),
            None,
        );
        assert!(matches!(
            generator.run(false),
            Err(Error::LinkerBondNotFound(_))
        ));
    }

    #[test]
    fn duplicate_ligand_coordinates_are_ambiguous() {
        let ligand = LIGAND.replace(
            "      4 H1          1.9390    0.4730    0.0000 H       1  LIG         0.0000",
            "      4 H1          0.1390   -0.3080    0.0000 H       1  LIG         0.0000",
        );
        let fix = fixture(&ligand, TEMPLATE);
        let generator = AnchorGenerator::new(
            &fix.ligand,
            &fix.template,
            &fix.dir.path().join("out.in"),
            None,
        );
        assert!(matches!(
            generator.run(false),
            Err(Error::MultipleAnchorMatches(_))
        ));
    }

    #[test]
    fn reformatted_coordinates_do_not_match() {
        // same value, different text: textual matching fails by design
        let ligand = LIGAND.replace("0.1390   -0.3080", "0.139    -0.308");
        let fix = fixture(&ligand, TEMPLATE);
        let generator = AnchorGenerator::new(
            &fix.ligand,
            &fix.template,
            &fix.dir.path().join("out.in"),
            None,
        );
        assert!(matches!(generator.run(false), Err(Error::AnchorNotFound(_))));
    }
}
