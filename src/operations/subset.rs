use std::{borrow::Cow, collections::VecDeque};

use bit_set::BitSet;
use itertools::Itertools;
use tracing::{debug, trace, warn};

use crate::{
    alphabet::Symbol,
    automaton::{AutomatonError, StateIndex, DEAD_STATE, DFA, NFA},
};

use super::eliminate_epsilon;

/// Determines in which order pending states are taken from the worklist. The resulting DFA
/// has the same states and transitions either way, only the order of its states differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WorklistOrder {
    /// Process states in the order in which they were discovered.
    #[default]
    Fifo,
    /// Process the most recently discovered state first.
    Lifo,
}

/// Converts `nfa` into an equivalent complete [`DFA`] through the powerset construction, epsilon
/// transitions are eliminated beforehand if necessary. Fails if `nfa` has no initial state.
///
/// States are identified by name. If two different sets of NFA states concatenate to the same
/// name (`{a, b}` and `{ab}` both give `ab`), the state created first is reused and a warning is
/// logged, in which case the result need not be equivalent to `nfa`. Contrary to
/// [`crate::minimization::rebuild`], which rejects such a clash, this does not fail.
pub fn to_dfa(nfa: &NFA) -> Result<DFA, AutomatonError> {
    to_dfa_with(nfa, WorklistOrder::Fifo)
}

/// Works as [`to_dfa`], but processes pending states in the given order.
pub fn to_dfa_with(nfa: &NFA, order: WorklistOrder) -> Result<DFA, AutomatonError> {
    let source = if nfa.has_epsilon() {
        Cow::Owned(eliminate_epsilon(nfa))
    } else {
        Cow::Borrowed(nfa)
    };
    SubsetConstruction::new(&source, order)?.run()
}

/// State of a single run of the powerset construction. Every state of the DFA under construction
/// corresponds to a set of states of the NFA and is named by the sorted concatenation of their
/// names. All lookups go through the name registry of the DFA, so the same set of NFA states
/// always ends up in the same DFA state, no matter in which order it is discovered.
pub struct SubsetConstruction<'a> {
    nfa: &'a NFA,
    dfa: DFA,
    subsets: Vec<BitSet>,
    pending: VecDeque<StateIndex>,
    handled: BitSet,
    dead_edges: Vec<(StateIndex, Symbol)>,
    order: WorklistOrder,
}

impl<'a> SubsetConstruction<'a> {
    /// Prepares the construction for an NFA without epsilon transitions. The initial state of
    /// `nfa` becomes the initial state of the DFA.
    pub fn new(nfa: &'a NFA, order: WorklistOrder) -> Result<Self, AutomatonError> {
        debug_assert!(!nfa.has_epsilon());
        let initial = nfa.require_initial()?;

        let mut construction = Self {
            nfa,
            dfa: DFA::for_alphabet(nfa.alphabet().clone()),
            subsets: vec![],
            pending: VecDeque::with_capacity(nfa.size()),
            handled: BitSet::with_capacity(nfa.size()),
            dead_edges: vec![],
            order,
        };
        let id = construction.resolve(BitSet::from_iter([initial]));
        construction.dfa.set_initial_index(id);
        Ok(construction)
    }

    /// The name of the DFA state for a set of NFA states.
    fn compose_name(&self, subset: &BitSet) -> String {
        subset.iter().map(|q| self.nfa.name(q)).sorted().join("")
    }

    /// Returns the DFA state for `subset`, creating and enqueueing it if no state of that name
    /// exists yet. A new state is accepting iff one of its constituents is.
    fn resolve(&mut self, subset: BitSet) -> StateIndex {
        let name = self.compose_name(&subset);
        if let Some(existing) = self.dfa.index_of(&name) {
            if self.subsets[existing] != subset {
                warn!("state name {name} is shared by two different sets of states");
            }
            return existing;
        }

        let accepting = subset.iter().any(|q| self.nfa.is_final(q));
        let id = self.dfa.insert_state(name.as_str());
        debug_assert_eq!(id, self.subsets.len());
        if accepting {
            self.dfa.add_final_index(id);
        }
        if subset.len() > 1 {
            debug!("created combined state {name}");
        }
        self.subsets.push(subset);
        self.pending.push_back(id);
        id
    }

    fn next_pending(&mut self) -> Option<StateIndex> {
        match self.order {
            WorklistOrder::Fifo => self.pending.pop_front(),
            WorklistOrder::Lifo => self.pending.pop_back(),
        }
    }

    /// Adds the outgoing transitions of the DFA state `id`.
    fn expand(&mut self, id: StateIndex) {
        trace!("expanding {}", self.dfa.name(id));
        let nfa = self.nfa;
        for symbol in nfa.alphabet().universe() {
            let reached = self.subsets[id]
                .iter()
                .flat_map(|q| nfa.successors(q, symbol))
                .collect::<BitSet>();

            if reached.is_empty() {
                self.dead_edges.push((id, symbol));
                continue;
            }
            let target = self.resolve(reached);
            self.dfa.push_transition(id, symbol, target);
        }
    }

    /// Drains the worklist and completes the result with the dead state if some transition
    /// is missing.
    pub fn run(mut self) -> Result<DFA, AutomatonError> {
        let nfa = self.nfa;
        while let Some(id) = self.next_pending() {
            if !self.handled.insert(id) {
                continue;
            }
            self.expand(id);
        }

        if !self.dead_edges.is_empty() {
            let dead = self.dfa.insert_state(DEAD_STATE);
            debug!(
                "completing {} missing transitions with the dead state",
                self.dead_edges.len()
            );
            for (q, symbol) in std::mem::take(&mut self.dead_edges) {
                self.dfa.push_transition(q, symbol, dead);
            }
            for symbol in nfa.alphabet().universe() {
                self.dfa.push_transition(dead, symbol, dead);
            }
        }

        debug!(
            "subset construction produced {} states from {}",
            self.dfa.size(),
            nfa.size()
        );
        Ok(self.dfa)
    }
}
