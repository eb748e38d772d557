//! Record-level reading of TRIPOS MOL2 atom and bond blocks.
//!
//! Anchor correspondence only needs the row structure of the
//! `@<TRIPOS>ATOM` and `@<TRIPOS>BOND` sections, not a full molecular
//! model. Rows are tokenized by collapsing whitespace and validated into
//! fixed-shape records as they are read, so malformed files are rejected
//! with a line number instead of surfacing later as a lookup failure.
//!
//! Coordinates are deliberately kept as their exact text tokens: anchor
//! matching compares them textually (see
//! [`AnchorGenerator`](crate::pipeline::AnchorGenerator)).

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

const ATOM_MARKER: &str = "@<TRIPOS>ATOM";
const BOND_MARKER: &str = "@<TRIPOS>BOND";

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse MOL2 data: {details} (at line {line})")]
    Parse { line: usize, details: String },
}

impl Error {
    fn parse(line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            line,
            details: details.into(),
        }
    }
}

/// One row of an `@<TRIPOS>ATOM` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomRecord {
    /// 1-based atom sequence number.
    pub seq: usize,
    /// Atom name, e.g. `C2`.
    pub name: String,
    /// Coordinate triple as exact text tokens.
    pub coords: [String; 3],
    /// SYBYL atom type, e.g. `C.3`; `Du` marks a linker placeholder.
    pub sybyl_type: String,
}

/// One row of an `@<TRIPOS>BOND` block, referencing 1-based atom sequence
/// numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondRecord {
    pub origin: usize,
    pub target: usize,
}

impl BondRecord {
    /// Whether either endpoint is the given atom sequence number.
    pub fn touches(&self, seq: usize) -> bool {
        self.origin == seq || self.target == seq
    }

    /// The endpoint opposite to `seq`, if the bond touches it.
    pub fn other(&self, seq: usize) -> Option<usize> {
        if self.origin == seq {
            Some(self.target)
        } else if self.target == seq {
            Some(self.origin)
        } else {
            None
        }
    }
}

/// Atom and bond records of a single structure file.
#[derive(Debug, Clone, Default)]
pub struct Records {
    pub atoms: Vec<AtomRecord>,
    pub bonds: Vec<BondRecord>,
}

/// Reads atom and bond records from a MOL2 file. Read fresh from disk on
/// every call; nothing is cached.
pub fn read_records(path: &Path) -> Result<Records, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&text)
}

fn parse_records(text: &str) -> Result<Records, Error> {
    let mut records = Records::default();
    let mut in_atom_block = false;
    let mut in_bond_block = false;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();

        if in_bond_block {
            if trimmed.starts_with('@') || trimmed.is_empty() {
                in_bond_block = false;
            } else {
                records.bonds.push(parse_bond(trimmed, line_no)?);
                continue;
            }
        }

        if in_atom_block {
            if trimmed.starts_with('@') {
                in_atom_block = false;
                in_bond_block = trimmed == BOND_MARKER;
                continue;
            }
            if !trimmed.is_empty() {
                records.atoms.push(parse_atom(trimmed, line_no)?);
            }
            continue;
        }

        if trimmed == ATOM_MARKER {
            in_atom_block = true;
        } else if trimmed == BOND_MARKER {
            in_bond_block = true;
        }
    }

    Ok(records)
}

fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

fn parse_atom(line: &str, line_no: usize) -> Result<AtomRecord, Error> {
    let tokens = tokenize(line);
    if tokens.len() < 6 {
        return Err(Error::parse(line_no, "atom record needs at least 6 columns"));
    }
    let seq = tokens[0]
        .parse::<usize>()
        .map_err(|_| Error::parse(line_no, "invalid atom sequence number"))?;
    Ok(AtomRecord {
        seq,
        name: tokens[1].to_string(),
        coords: [
            tokens[2].to_string(),
            tokens[3].to_string(),
            tokens[4].to_string(),
        ],
        sybyl_type: tokens[5].to_string(),
    })
}

fn parse_bond(line: &str, line_no: usize) -> Result<BondRecord, Error> {
    let tokens = tokenize(line);
    if tokens.len() < 3 {
        return Err(Error::parse(line_no, "bond record needs at least 3 columns"));
    }
    let origin = tokens[1]
        .parse::<usize>()
        .map_err(|_| Error::parse(line_no, "invalid origin atom sequence number"))?;
    let target = tokens[2]
        .parse::<usize>()
        .map_err(|_| Error::parse(line_no, "invalid target atom sequence number"))?;
    Ok(BondRecord { origin, target })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHANOL_CORE: &str = "\
@<TRIPOS>MOLECULE
core
3 2 1
SMALL
NO_CHARGES

@<TRIPOS>ATOM
      1 C1         -1.2700    0.2480    0.0000 C.3     1  CORE        0.0000
      2 C2          0.1390   -0.3080    0.0000 C.3     1  CORE        0.0000
      3 Du          1.0360    0.7890    0.0000 Du      1  CORE        0.0000
@<TRIPOS>BOND
     1    1    2 1
     2    2    3 1
@<TRIPOS>SUBSTRUCTURE
     1 CORE        1 GROUP
";

    #[test]
    fn parses_atom_and_bond_blocks() {
        let records = parse_records(ETHANOL_CORE).unwrap();
        assert_eq!(records.atoms.len(), 3);
        assert_eq!(records.bonds.len(), 2);

        let linker = &records.atoms[2];
        assert_eq!(linker.seq, 3);
        assert_eq!(linker.name, "Du");
        assert_eq!(linker.sybyl_type, "Du");
        assert_eq!(
            records.atoms[1].coords,
            ["0.1390".to_string(), "-0.3080".to_string(), "0.0000".to_string()]
        );
        assert_eq!(records.bonds[1], BondRecord { origin: 2, target: 3 });
    }

    #[test]
    fn bond_block_ends_at_blank_line() {
        let text = "@<TRIPOS>ATOM\n 1 C1 0.0 0.0 0.0 C.3\n@<TRIPOS>BOND\n 1 1 1 1\n\n 2 1 1 1\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records.bonds.len(), 1);
    }

    #[test]
    fn short_atom_row_is_rejected_with_line_number() {
        let text = "@<TRIPOS>ATOM\n 1 C1 0.0 0.0\n";
        match parse_records(text).unwrap_err() {
            Error::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_bond_endpoint_is_rejected() {
        let text = "@<TRIPOS>BOND\n 1 a 2 1\n";
        assert!(matches!(parse_records(text), Err(Error::Parse { .. })));
    }

    #[test]
    fn bond_endpoint_helpers() {
        let bond = BondRecord { origin: 2, target: 3 };
        assert!(bond.touches(2));
        assert!(bond.touches(3));
        assert!(!bond.touches(1));
        assert_eq!(bond.other(2), Some(3));
        assert_eq!(bond.other(3), Some(2));
        assert_eq!(bond.other(1), None);
    }
}
