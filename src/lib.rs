//! Incremental orchestration of a DOCK docking workflow around external
//! command-line tools: protonation, receptor preparation, sphere and grid
//! generation, docking, anchored docking and anchored de novo growing.
//!
//! # Features
//!
//! - **Incremental execution** — every stage declares its output artifact
//!   paths at construction time and can report whether they already exist;
//!   composite stages skip children whose artifacts are present and only
//!   rerun the terminal scoring stage unconditionally
//! - **Strict artifact contract** — declared inputs are checked before a
//!   tool runs, declared outputs after it claims success; a tool that exits
//!   zero without producing its artifacts is its own failure class
//! - **Anchored docking** — an anchor atom is resolved from a template
//!   structure via its linker bond and matched into the full ligand by
//!   textual coordinate equality, then rendered into the docking deck
//! - **Deck templates** — built-in input decks for all stages, each
//!   replaceable with a caller-supplied file
//!
//! # Quick Start
//!
//! The workflows in [`workflow`] are the main entry points:
//!
//! ```no_run
//! use std::path::Path;
//!
//! use dock_flow::config::RunConfig;
//! use dock_flow::pipeline::Stage;
//! use dock_flow::workflow::SelfDocking;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::load(Path::new("config.toml"))?;
//! let docking = SelfDocking::new(
//!     Path::new("1cps.pdb"),
//!     Path::new("1cps_ligand.sdf"),
//!     Path::new("out"),
//!     &config,
//!     None,
//! );
//! docking.run(false)?;
//! println!("{}", docking.docked().display());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`workflow`] — Self-docking, cross-docking, anchored docking and
//!   anchored growing compositions
//! - [`pipeline`] — The [`Stage`](pipeline::Stage) abstraction, the
//!   incremental run policy and the concrete tool-wrapping stages
//! - [`template`] — Input-deck templates and rendering
//! - [`exec`] — The external tool invocation boundary
//! - [`mol2`] — Record-level MOL2 atom/bond reading for anchor matching
//! - [`config`] — Tool locations and tunables, loaded once per run

pub mod config;
pub mod exec;
pub mod mol2;
pub mod paths;
pub mod pipeline;
pub mod template;
pub mod workflow;

pub use config::RunConfig;
pub use pipeline::{Error as PipelineError, Stage};
pub use template::Deck;
pub use workflow::{AnchoredDocking, AnchoredGrowing, CrossDocking, SelfDocking};
