use std::collections::BTreeSet;

use thiserror::Error;
use tracing::trace;

use crate::{
    alphabet::{is_epsilon, CharAlphabet, Symbol, EPSILON},
    math::Bijection,
};

mod state;
pub use state::{State, Transition};

mod builder;
pub use builder::AutomatonBuilder;

mod dfa;
mod display;
mod nfa;

/// States are addressed by their position in the arena of the automaton.
pub type StateIndex = usize;

/// Name of the sentinel state that absorbs all transitions which would otherwise be undefined.
/// It can not be used as the name of a user supplied state.
pub const DEAD_STATE: &str = "∅";

/// Errors that can occur while assembling an automaton or converting between automata. All of
/// them indicate malformed input, the conversions themselves never fail on well-formed automata.
#[allow(missing_docs)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("no state named \"{0}\" exists")]
    UnknownState(String),
    #[error("\"{0}\" can not be used as a state name")]
    ReservedStateName(String),
    #[error("symbol '{0}' is not part of the alphabet")]
    UnknownSymbol(Symbol),
    #[error("the epsilon marker '{EPSILON}' can not be part of an alphabet")]
    EpsilonInAlphabet,
    #[error("a deterministic automaton can not have epsilon transitions")]
    EpsilonInDfa,
    #[error("state \"{state}\" already has a transition on '{symbol}' to \"{existing}\"")]
    NondeterministicTransition {
        state: String,
        symbol: Symbol,
        existing: String,
    },
    #[error("the automaton has no initial state")]
    MissingInitialState,
    #[error("invalid partition: {0}")]
    InvalidPartition(String),
    #[error("states of class \"{class}\" disagree on their transition on '{symbol}'")]
    UnstablePartition { class: String, symbol: Symbol },
    #[error("merged state \"{0}\" collides with an existing state name")]
    NameCollision(String),
}

/// A finite automaton over a [`CharAlphabet`]. The states are stored in an arena and every
/// lookup by name goes through a name/index bijection, so two states with the same name are
/// always the same state.
///
/// The const parameter selects the contract: with `DET = false` (see [`NFA`]) a state may have
/// several transitions on the same symbol as well as epsilon transitions, with `DET = true` (see
/// [`DFA`]) a state has at most one transition per symbol and no epsilon transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton<const DET: bool> {
    alphabet: CharAlphabet,
    states: Vec<State>,
    names: Bijection<String, StateIndex>,
    initial: Option<StateIndex>,
    finals: BTreeSet<StateIndex>,
}

/// A nondeterministic finite automaton, which may contain epsilon transitions.
pub type NFA = Automaton<false>;
/// A deterministic finite automaton.
pub type DFA = Automaton<true>;

/// A view on a single state as it is handed out to renderers: its name and whether it is
/// initial and/or accepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo<'a> {
    /// Position of the state in the arena.
    pub index: StateIndex,
    /// Name of the state.
    pub name: &'a str,
    /// Whether the state is the initial state.
    pub initial: bool,
    /// Whether the state is accepting.
    pub accepting: bool,
}

impl<const DET: bool> Default for Automaton<DET> {
    fn default() -> Self {
        Self {
            alphabet: CharAlphabet::default(),
            states: vec![],
            names: Bijection::new(),
            initial: None,
            finals: BTreeSet::new(),
        }
    }
}

impl<const DET: bool> Automaton<DET> {
    /// Creates an empty automaton without states and with an empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty automaton over the given symbols.
    pub fn with_alphabet<I: IntoIterator<Item = Symbol>>(
        symbols: I,
    ) -> Result<Self, AutomatonError> {
        let mut out = Self::new();
        out.set_alphabet(symbols)?;
        Ok(out)
    }

    pub(crate) fn for_alphabet(alphabet: CharAlphabet) -> Self {
        Self {
            alphabet,
            ..Self::default()
        }
    }

    /// Replaces the alphabet. Fails if one of the symbols is the epsilon marker or if a
    /// transition uses a symbol that is not part of the new alphabet.
    pub fn set_alphabet<I: IntoIterator<Item = Symbol>>(
        &mut self,
        symbols: I,
    ) -> Result<(), AutomatonError> {
        let alphabet = symbols.into_iter().collect::<CharAlphabet>();
        if alphabet.contains(EPSILON) {
            return Err(AutomatonError::EpsilonInAlphabet);
        }
        if let Some(t) = self
            .states
            .iter()
            .flat_map(|q| q.transitions())
            .find(|t| !t.is_epsilon() && !alphabet.contains(t.symbol()))
        {
            return Err(AutomatonError::UnknownSymbol(t.symbol()));
        }
        self.alphabet = alphabet;
        Ok(())
    }

    /// Adds a single symbol to the alphabet, returns `false` if it was already present.
    pub fn add_symbol(&mut self, symbol: Symbol) -> Result<bool, AutomatonError> {
        if is_epsilon(symbol) {
            return Err(AutomatonError::EpsilonInAlphabet);
        }
        Ok(self.alphabet.insert(symbol))
    }

    /// Adds a state with the given name and returns its index. If a state of that name exists
    /// already, its index is returned and nothing changes.
    pub fn add_state<S: Into<String>>(&mut self, name: S) -> Result<StateIndex, AutomatonError> {
        let name = name.into();
        if name.is_empty() || name == DEAD_STATE {
            return Err(AutomatonError::ReservedStateName(name));
        }
        Ok(self.insert_state(name))
    }

    /// Adds all given states, see [`Self::add_state`].
    pub fn add_states<I, S>(&mut self, names: I) -> Result<Vec<StateIndex>, AutomatonError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(|name| self.add_state(name)).collect()
    }

    /// Registers `name` without checking it against the reserved names.
    pub(crate) fn insert_state<S: Into<String>>(&mut self, name: S) -> StateIndex {
        let name = name.into();
        if let Some(&existing) = self.names.get_by_left(&name) {
            return existing;
        }
        let id = self.states.len();
        trace!("adding state {name} with index {id}");
        self.states.push(State::new());
        self.names.insert(name, id);
        id
    }

    /// Designates the state called `name` as the initial state.
    pub fn set_initial(&mut self, name: &str) -> Result<StateIndex, AutomatonError> {
        let id = self.lookup(name)?;
        self.initial = Some(id);
        Ok(id)
    }

    pub(crate) fn set_initial_index(&mut self, index: StateIndex) {
        debug_assert!(index < self.states.len());
        self.initial = Some(index);
    }

    /// Marks the state called `name` as accepting, returns `false` if it already was.
    pub fn add_final(&mut self, name: &str) -> Result<bool, AutomatonError> {
        let id = self.lookup(name)?;
        Ok(self.finals.insert(id))
    }

    pub(crate) fn add_final_index(&mut self, index: StateIndex) -> bool {
        debug_assert!(index < self.states.len());
        self.finals.insert(index)
    }

    /// Inserts a transition between two existing states without any validation.
    pub(crate) fn push_transition(
        &mut self,
        from: StateIndex,
        symbol: Symbol,
        to: StateIndex,
    ) -> bool {
        self.states[from].add_transition(Transition::new(symbol, to))
    }

    /// Resolves the endpoints of a transition given by name and checks the symbol against the
    /// alphabet. The epsilon marker passes this check, the caller decides whether it is allowed.
    pub(crate) fn resolve_transition(
        &self,
        from: &str,
        symbol: Symbol,
        to: &str,
    ) -> Result<(StateIndex, StateIndex), AutomatonError> {
        let source = self.lookup(from)?;
        let target = self.lookup(to)?;
        if !is_epsilon(symbol) && !self.alphabet.contains(symbol) {
            return Err(AutomatonError::UnknownSymbol(symbol));
        }
        Ok((source, target))
    }

    fn lookup(&self, name: &str) -> Result<StateIndex, AutomatonError> {
        self.index_of(name)
            .ok_or_else(|| AutomatonError::UnknownState(name.to_string()))
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the automaton has no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The alphabet of the automaton, which never contains the epsilon marker.
    pub fn alphabet(&self) -> &CharAlphabet {
        &self.alphabet
    }

    /// Looks up the index of the state called `name`.
    pub fn index_of(&self, name: &str) -> Option<StateIndex> {
        self.names.get_by_left(name).copied()
    }

    /// Returns the name of the state with the given index.
    pub fn state_name(&self, index: StateIndex) -> Option<&str> {
        self.names.get_by_right(&index).map(String::as_str)
    }

    /// Name of a state whose index is known to be valid.
    pub(crate) fn name(&self, index: StateIndex) -> &str {
        self.state_name(index)
            .expect("every state index must be registered with a name")
    }

    /// Returns the state with the given index.
    pub fn state(&self, index: StateIndex) -> Option<&State> {
        self.states.get(index)
    }

    /// Iterates over the indices of all states in the order in which they were added.
    pub fn state_indices(&self) -> std::ops::Range<StateIndex> {
        0..self.states.len()
    }

    /// Iterates over the names of all states in the order in which they were added.
    pub fn state_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.state_indices().map(|q| self.name(q))
    }

    /// Iterates over all states together with their initial/accepting flags.
    pub fn states(&self) -> impl Iterator<Item = StateInfo<'_>> + '_ {
        self.state_indices().map(|index| StateInfo {
            index,
            name: self.name(index),
            initial: self.initial == Some(index),
            accepting: self.finals.contains(&index),
        })
    }

    /// Index of the initial state, if one has been set.
    pub fn initial(&self) -> Option<StateIndex> {
        self.initial
    }

    /// Name of the initial state, if one has been set.
    pub fn initial_name(&self) -> Option<&str> {
        self.initial.map(|q| self.name(q))
    }

    /// Returns the initial state or fails with [`AutomatonError::MissingInitialState`].
    pub fn require_initial(&self) -> Result<StateIndex, AutomatonError> {
        self.initial.ok_or(AutomatonError::MissingInitialState)
    }

    /// Iterates over the indices of the accepting states in ascending order.
    pub fn finals(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.finals.iter().copied()
    }

    /// Returns true if the state with the given index is accepting.
    pub fn is_final(&self, index: StateIndex) -> bool {
        self.finals.contains(&index)
    }

    /// Returns true if the state with the given index is the initial state.
    pub fn is_initial(&self, index: StateIndex) -> bool {
        self.initial == Some(index)
    }

    /// Index of the dead state, if the automaton contains it.
    pub fn dead_state(&self) -> Option<StateIndex> {
        self.index_of(DEAD_STATE)
    }

    /// Iterates over the targets of all transitions leaving `from` on `symbol`. An unknown state
    /// or a missing transition simply results in an empty iterator.
    pub fn successors(
        &self,
        from: StateIndex,
        symbol: Symbol,
    ) -> impl Iterator<Item = StateIndex> + '_ {
        self.states
            .get(from)
            .into_iter()
            .flat_map(move |q| q.successors(symbol))
    }

    /// Returns all transitions as a flat list of `(from, symbol, to)` triples. States are visited
    /// in the order in which they were added, transitions of a state in insertion order.
    pub fn transitions(&self) -> Vec<(&str, Symbol, &str)> {
        self.states
            .iter()
            .enumerate()
            .flat_map(|(q, state)| {
                state
                    .transitions()
                    .iter()
                    .map(move |t| (self.name(q), t.symbol(), self.name(t.target())))
            })
            .collect()
    }
}
