//! Top-level docking workflows.
//!
//! Each workflow wires receptor preparation and its use-case specific
//! stages into one composite. Construction builds the whole stage graph
//! up front; `run` walks it with the incremental policy of
//! [`run_steps`](crate::pipeline::run_steps). The terminal docking or
//! growth stage always reruns: its inputs (a caller deck, a reference
//! structure) can change in ways a file-existence check cannot see.

mod anchored_docking;
mod anchored_growing;
mod cross_docking;
mod self_docking;

pub use anchored_docking::AnchoredDocking;
pub use anchored_growing::AnchoredGrowing;
pub use cross_docking::CrossDocking;
pub use self_docking::SelfDocking;
