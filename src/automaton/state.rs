use crate::alphabet::{is_epsilon, Symbol};

use super::StateIndex;

/// An outgoing edge of a [`State`]. It stores the symbol it is labelled with and the index of the
/// state it leads to. The target is only an index into the arena of the owning automaton, states
/// never own each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transition {
    symbol: Symbol,
    target: StateIndex,
}

impl Transition {
    /// Creates a new transition on `symbol` to `target`.
    pub fn new(symbol: Symbol, target: StateIndex) -> Self {
        Self { symbol, target }
    }

    /// The symbol labelling the transition.
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Index of the state that the transition leads to.
    pub fn target(&self) -> StateIndex {
        self.target
    }

    /// Returns true if the transition can be taken without reading a symbol.
    pub fn is_epsilon(&self) -> bool {
        is_epsilon(self.symbol)
    }
}

/// Stores the outgoing transitions of a single state in the order in which they were added.
/// The name of the state is kept by the registry of the automaton it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    transitions: Vec<Transition>,
}

impl State {
    /// Creates a state without transitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `transition` unless a transition with the same symbol and target is already present.
    /// Returns `true` if the transition was inserted.
    pub fn add_transition(&mut self, transition: Transition) -> bool {
        if self.transitions.contains(&transition) {
            return false;
        }
        self.transitions.push(transition);
        true
    }

    /// All outgoing transitions.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Iterates over the targets of all transitions on `symbol`.
    pub fn successors(&self, symbol: Symbol) -> impl Iterator<Item = StateIndex> + '_ {
        self.transitions
            .iter()
            .filter(move |t| t.symbol == symbol)
            .map(|t| t.target)
    }

    /// Returns the target of the first transition on `symbol`, if there is one.
    pub fn successor(&self, symbol: Symbol) -> Option<StateIndex> {
        self.successors(symbol).next()
    }
}
