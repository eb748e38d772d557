//! RMSD summary of the top pose in a scored pose file.
//!
//! The docking engine writes RMSD records into a `##########` comment
//! header in front of each pose. Only the top pose is read. Negative
//! values mean the engine could not compute that variant.

use std::fs;
use std::path::{Path, PathBuf};

use super::Error;

/// Heavy-atom RMSD values of the top pose against the reference molecule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RmsdSummary {
    /// Standard RMSD (`HA_RMSDs`).
    pub standard: f64,
    /// Graph-matched minimum RMSD (`HA_RMSDh`).
    pub graph_matched: f64,
    /// Greedy minimum RMSD (`HA_RMSDm`).
    pub greedy: f64,
}

const HEADER_SENTINEL: &str = "##########";

impl RmsdSummary {
    /// Parses the top pose header of a scored pose file.
    pub fn from_poses(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, Error> {
        let mut standard = None;
        let mut graph_matched = None;
        let mut greedy = None;

        let mut in_header = false;
        for line in text.lines() {
            if line.contains(HEADER_SENTINEL) && !in_header {
                in_header = true;
            }
            if in_header {
                if line.contains("HA_RMSDs") {
                    standard = Some(parse_value(line, "HA_RMSDs", path)?);
                }
                if line.contains("HA_RMSDh") {
                    graph_matched = Some(parse_value(line, "HA_RMSDh", path)?);
                }
                if line.contains("HA_RMSDm") {
                    greedy = Some(parse_value(line, "HA_RMSDm", path)?);
                }
                if !line.contains(HEADER_SENTINEL) {
                    // only the top pose header is read
                    break;
                }
            }
        }

        Ok(Self {
            standard: standard.ok_or_else(|| missing("HA_RMSDs", path))?,
            graph_matched: graph_matched.ok_or_else(|| missing("HA_RMSDh", path))?,
            greedy: greedy.ok_or_else(|| missing("HA_RMSDm", path))?,
        })
    }

    /// The preferred RMSD: graph-matched, then standard, then greedy,
    /// skipping negative (uncomputed) values.
    pub fn top(&self) -> f64 {
        if self.graph_matched < 0.0 && self.standard < 0.0 {
            self.greedy
        } else if self.graph_matched < 0.0 {
            self.standard
        } else {
            self.graph_matched
        }
    }
}

fn missing(label: &'static str, path: &Path) -> Error {
    Error::PoseRecordMissing {
        label,
        path: path.to_path_buf(),
    }
}

fn parse_value(line: &str, label: &'static str, path: &Path) -> Result<f64, Error> {
    // "##########  HA_RMSDh:  0.48" -> sentinel, label, value
    line.split_whitespace()
        .nth(2)
        .and_then(|token| token.parse::<f64>().ok())
        .ok_or_else(|| Error::PoseRecordMalformed {
            label,
            path: path.to_path_buf(),
        })
}
