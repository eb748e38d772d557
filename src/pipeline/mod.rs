//! Stage abstraction and incremental orchestration.
//!
//! A [`Stage`] is one unit of pipeline work: either a single external tool
//! invocation or a composite owning an ordered set of child stages. Every
//! stage declares its output artifact paths at construction time, purely as
//! a function of its output directory, so the contract of a stage can be
//! inspected before anything runs.
//!
//! Composites drive their children through [`run_steps`], the incremental
//! build policy: children run in declaration order (which is dependency
//! order by construction), a child whose declared outputs already exist is
//! skipped unless recalculation was requested, and designated terminal
//! children run unconditionally. File presence is the sole cache-validity
//! signal; there is no hashing and no timestamp comparison.

mod anchor;
mod de_novo;
mod docking;
mod fragments;
mod grid;
mod prepare;
mod protoss;
mod receptor;
mod rmsd;
mod spheres;

pub use anchor::AnchorGenerator;
pub use de_novo::AnchoredDeNovo;
pub use docking::DockingRun;
pub use fragments::{FragmentGeneration, FragmentLibrary};
pub use grid::GridGeneration;
pub use prepare::Preparation;
pub use protoss::ProtossRun;
pub use receptor::ReceptorPreparation;
pub use rmsd::RmsdSummary;
pub use spheres::SphereGeneration;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A declared input artifact is missing before a stage runs.
    #[error("missing input file '{0}'")]
    MissingInput(PathBuf),

    /// A declared output artifact is missing although the tool reported
    /// success.
    #[error("tool finished but output file '{0}' is missing")]
    MissingOutput(PathBuf),

    #[error(transparent)]
    Exec(#[from] crate::exec::Error),

    #[error(transparent)]
    Template(#[from] crate::template::Error),

    #[error(transparent)]
    Mol2(#[from] crate::mol2::Error),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no linker atom in template '{0}'")]
    LinkerNotFound(PathBuf),

    #[error("multiple linker atoms in template '{0}'")]
    MultipleLinkers(PathBuf),

    #[error("no bond to the linker atom in template '{0}'")]
    LinkerBondNotFound(PathBuf),

    #[error("multiple bonds to the linker atom in template '{0}'")]
    MultipleLinkerBonds(PathBuf),

    #[error("anchor atom {seq} is beyond the {atoms} atoms of template '{path}'")]
    AnchorOutOfRange {
        seq: usize,
        atoms: usize,
        path: PathBuf,
    },

    #[error("no atom in ligand '{0}' matches the anchor coordinates")]
    AnchorNotFound(PathBuf),

    #[error("multiple atoms in ligand '{0}' match the anchor coordinates")]
    MultipleAnchorMatches(PathBuf),

    #[error("no {label} record in pose header of '{path}'")]
    PoseRecordMissing { label: &'static str, path: PathBuf },

    #[error("malformed {label} record in pose header of '{path}'")]
    PoseRecordMalformed { label: &'static str, path: PathBuf },
}

/// One unit of pipeline work.
///
/// `run` must be safe to call repeatedly: given fixed inputs it redoes the
/// work and produces the same declared outputs. Deduplication is not the
/// stage's job — composites decide whether to run a child at all.
pub trait Stage {
    /// Runs the stage. `recalculate` is forwarded to nested composites so
    /// they rerun their children; leaf stages ignore it.
    fn run(&self, recalculate: bool) -> Result<(), Error>;

    /// Whether every declared output artifact is present on disk.
    fn output_exists(&self) -> bool;
}

/// Whether a composite may reuse a child's existing outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPolicy {
    /// Skip the child when its outputs exist and no recalculation was
    /// requested.
    Reusable,
    /// Run the child unconditionally. Used for terminal scoring stages
    /// whose inputs may change in ways invisible to a file-existence
    /// check.
    Always,
}

/// A named child of a composite stage, in declaration order.
pub struct Step<'a> {
    pub name: &'static str,
    pub stage: &'a dyn Stage,
    pub policy: RunPolicy,
}

impl<'a> Step<'a> {
    pub fn reusable(name: &'static str, stage: &'a dyn Stage) -> Self {
        Self {
            name,
            stage,
            policy: RunPolicy::Reusable,
        }
    }

    pub fn always(name: &'static str, stage: &'a dyn Stage) -> Self {
        Self {
            name,
            stage,
            policy: RunPolicy::Always,
        }
    }
}

/// Walks the children of a composite stage in order, consulting each
/// child's output existence to decide whether to rerun it. The first
/// failure aborts the walk; later siblings are not attempted.
pub fn run_steps(steps: &[Step<'_>], recalculate: bool) -> Result<(), Error> {
    for step in steps {
        let skip = step.policy == RunPolicy::Reusable && !recalculate && step.stage.output_exists();
        if skip {
            log::info!("{}: reusing existing output", step.name);
            continue;
        }
        log::info!("{}", step.name);
        step.stage.run(recalculate)?;
    }
    Ok(())
}

/// Read-only check that every path exists. All-or-nothing: a single
/// missing file yields false. Never errors.
pub fn files_exist(paths: &[&Path]) -> bool {
    paths.iter().all(|path| path.exists())
}

/// Precondition check: the first missing path fails the stage before any
/// tool is invoked.
pub fn files_must_exist(paths: &[&Path]) -> Result<(), Error> {
    for path in paths {
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Postcondition check: the tool claimed success, so a missing declared
/// output is its own failure class.
pub fn outputs_must_exist(paths: &[&Path]) -> Result<(), Error> {
    for path in paths {
        if !path.exists() {
            return Err(Error::MissingOutput(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Creates a stage output directory on demand. Stages never delete their
/// output directory.
pub(crate) fn ensure_dir(path: &Path) -> Result<(), Error> {
    fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_file(path: &Path, text: &str) -> Result<(), Error> {
    fs::write(path, text).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeStage {
        runs: Cell<usize>,
        exists: Cell<bool>,
    }

    impl FakeStage {
        fn new(exists: bool) -> Self {
            Self {
                runs: Cell::new(0),
                exists: Cell::new(exists),
            }
        }
    }

    impl Stage for FakeStage {
        fn run(&self, _recalculate: bool) -> Result<(), Error> {
            self.runs.set(self.runs.get() + 1);
            self.exists.set(true);
            Ok(())
        }

        fn output_exists(&self) -> bool {
            self.exists.get()
        }
    }

    struct FailingStage;

    impl Stage for FailingStage {
        fn run(&self, _recalculate: bool) -> Result<(), Error> {
            Err(Error::MissingOutput(PathBuf::from("never_written")))
        }

        fn output_exists(&self) -> bool {
            false
        }
    }

    #[test]
    fn cached_children_are_skipped() {
        let first = FakeStage::new(true);
        let second = FakeStage::new(true);
        let terminal = FakeStage::new(true);
        run_steps(
            &[
                Step::reusable("first", &first),
                Step::reusable("second", &second),
                Step::always("terminal", &terminal),
            ],
            false,
        )
        .unwrap();
        assert_eq!(first.runs.get(), 0);
        assert_eq!(second.runs.get(), 0);
        assert_eq!(terminal.runs.get(), 1);
    }

    #[test]
    fn recalculate_runs_every_child() {
        let first = FakeStage::new(true);
        let terminal = FakeStage::new(true);
        run_steps(
            &[Step::reusable("first", &first), Step::always("terminal", &terminal)],
            true,
        )
        .unwrap();
        assert_eq!(first.runs.get(), 1);
        assert_eq!(terminal.runs.get(), 1);
    }

    #[test]
    fn missing_output_triggers_a_run() {
        let stale = FakeStage::new(false);
        run_steps(&[Step::reusable("stale", &stale)], false).unwrap();
        assert_eq!(stale.runs.get(), 1);
        assert!(stale.output_exists());
    }

    #[test]
    fn failure_aborts_later_siblings() {
        let after = FakeStage::new(false);
        let result = run_steps(
            &[
                Step::reusable("failing", &FailingStage),
                Step::reusable("after", &after),
            ],
            false,
        );
        assert!(matches!(result, Err(Error::MissingOutput(_))));
        assert_eq!(after.runs.get(), 0);
    }

    #[test]
    fn files_exist_is_all_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present");
        std::fs::write(&present, "x").unwrap();
        let absent = dir.path().join("absent");

        assert!(files_exist(&[&present]));
        assert!(!files_exist(&[&present, &absent]));
        assert!(files_exist(&[]));
    }

    #[test]
    fn files_must_exist_reports_the_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent");
        match files_must_exist(&[&absent]).unwrap_err() {
            Error::MissingInput(path) => assert_eq!(path, absent),
            other => panic!("unexpected error: {other}"),
        }
    }
}
