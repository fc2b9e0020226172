//! Minimization of deterministic finite automata through Moore's partition refinement. The
//! refinement yields the whole sequence of partitions it passes through, the last of which
//! can be used to [`rebuild`] a minimal automaton.

mod partition_refinement;
pub use partition_refinement::{minimize, rebuild, refine, show_partitions};
