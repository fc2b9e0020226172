//! Library for converting nondeterministic finite automata into deterministic ones and for
//! minimizing the result.
//!
//! An automaton consists of a finite collection of named states, an alphabet of `char` symbols, a designated initial state and a set of accepting states. States are kept in an arena and addressed by a [`automaton::StateIndex`], while the name of a state is its identity: every lookup goes through a name/index bijection, so adding a state whose name exists already yields the existing state. Transitions are owned by their source state and only refer to their target through its index.
//!
//! The same structure [`automaton::Automaton`] serves both as [`NFA`] and as [`DFA`], the const parameter selecting whether a state may have several transitions on a symbol and whether epsilon transitions (labelled with [`alphabet::EPSILON`]) are admissible.
//!
//! The conversions form a pipeline, each stage producing a fresh automaton and leaving its input untouched:
//! - [`operations::eliminate_epsilon`] removes epsilon transitions by means of epsilon-closures.
//! - [`operations::to_dfa`] runs the powerset construction. A state of the resulting DFA stands for a set of NFA states and is named by the sorted concatenation of their names (`q0` and `q1` give `q0q1`). Missing transitions are completed with the dead state [`automaton::DEAD_STATE`].
//! - [`minimization::minimize`] computes the sequence of partitions that Moore's partition refinement passes through, and [`minimization::rebuild`] collapses each class of the final partition into a single state.
//!
//! ```
//! use finite_automata::prelude::*;
//!
//! let nfa = AutomatonBuilder::new()
//!     .with_transitions([("q0", 'a', "q0"), ("q0", 'a', "q1"), ("q0", 'b', "q0"), ("q1", 'b', "q2")])
//!     .with_initial("q0")
//!     .with_finals(["q2"])
//!     .into_nfa()
//!     .unwrap();
//! let dfa = nfa.to_dfa().unwrap();
//! assert!(dfa.index_of("q0q1").is_some());
//! assert!(dfa.accepts("ab"));
//! assert!(!dfa.accepts("a"));
//!
//! let minimal = dfa.minimized().unwrap();
//! assert!(minimal.size() <= dfa.size());
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use finite_automata::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "minimize")]
    pub use super::minimization::show_partitions;
    pub use super::{
        alphabet::{CharAlphabet, Symbol, EPSILON},
        automaton::{
            Automaton, AutomatonBuilder, AutomatonError, StateIndex, StateInfo, DEAD_STATE, DFA,
            NFA,
        },
        math::Partition,
        operations::{eliminate_epsilon, epsilon_closure, to_dfa, WorklistOrder},
        Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;

/// Defines the automaton data structure shared by nondeterministic and deterministic automata.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::{DFA, NFA};

/// Conversions between automata: epsilon elimination and the powerset construction.
pub mod operations;

/// Contains the minimization of deterministic automata. This is feature gated behind the `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

/// Helper trait which can be used to display states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`. This is mainly used for debugging purposes.
    fn show(&self) -> String;
}
