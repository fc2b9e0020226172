use itertools::Itertools;

use crate::alphabet::{is_epsilon, Symbol};

use super::{Automaton, AutomatonError, DFA, NFA};

/// Helper struct for the construction of automata. It collects states, symbols, transitions,
/// the initial state and the accepting states and materializes them into an [`NFA`] or a [`DFA`].
/// States that only appear in a transition are created implicitly, as are the symbols
/// that label transitions (with the exception of the epsilon marker).
///
/// # Example
///
/// We want to create a DFA with two states `q0` and `q1` over the alphabet `['a', 'b']` which
/// accepts all words containing an odd number of `b`s.
/// ```
/// use finite_automata::prelude::*;
///
/// let dfa = AutomatonBuilder::new()
///     .with_transitions([("q0", 'a', "q0"), ("q0", 'b', "q1"), ("q1", 'a', "q1"), ("q1", 'b', "q0")])
///     .with_initial("q0")
///     .with_finals(["q1"])
///     .into_dfa()
///     .unwrap();
/// assert!(dfa.accepts("aba"));
/// assert!(!dfa.accepts("bb"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    states: Vec<String>,
    symbols: Vec<Symbol>,
    transitions: Vec<(String, Symbol, String)>,
    initial: Option<String>,
    finals: Vec<String>,
}

impl AutomatonBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given states, in order. This is only needed for states that have no
    /// transitions or to fix the order of the states.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// By default, the only alphabet symbols in the automaton that is built are the ones that
    /// appear on at least one transition. This method can be used to force additional alphabet
    /// symbols to appear.
    pub fn with_alphabet<I: IntoIterator<Item = Symbol>>(mut self, symbols: I) -> Self {
        self.symbols.extend(symbols);
        self
    }

    /// Adds a list of `(from, symbol, to)` transitions.
    pub fn with_transitions<I, S, T>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (S, Symbol, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        self.transitions.extend(
            transitions
                .into_iter()
                .map(|(from, symbol, to)| (from.into(), symbol, to.into())),
        );
        self
    }

    /// Sets the initial state.
    pub fn with_initial<S: Into<String>>(mut self, initial: S) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Adds the given states to the set of accepting states.
    pub fn with_finals<I, S>(mut self, finals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finals.extend(finals.into_iter().map(Into::into));
        self
    }

    /// Assembles everything but the transitions, which are added by the caller since NFAs and
    /// DFAs differ in which transitions they admit.
    fn skeleton<const DET: bool>(&self) -> Result<Automaton<DET>, AutomatonError> {
        let mut out = Automaton::with_alphabet(
            self.symbols
                .iter()
                .copied()
                .chain(
                    self.transitions
                        .iter()
                        .map(|(_, symbol, _)| *symbol)
                        .filter(|symbol| !is_epsilon(*symbol)),
                )
                .unique(),
        )?;
        out.add_states(&self.states)?;
        for (from, _, to) in &self.transitions {
            out.add_state(from.as_str())?;
            out.add_state(to.as_str())?;
        }
        if let Some(initial) = &self.initial {
            out.set_initial(initial)?;
        }
        for q in &self.finals {
            out.add_final(q)?;
        }
        Ok(out)
    }

    /// Builds a nondeterministic automaton.
    pub fn into_nfa(self) -> Result<NFA, AutomatonError> {
        let mut nfa: NFA = self.skeleton()?;
        for (from, symbol, to) in &self.transitions {
            nfa.add_transition(from, *symbol, to)?;
        }
        Ok(nfa)
    }

    /// Builds a deterministic automaton, which fails if two transitions leave the same state on
    /// the same symbol or if a transition is labelled with epsilon. The result need not be complete.
    pub fn into_dfa(self) -> Result<DFA, AutomatonError> {
        let mut dfa: DFA = self.skeleton()?;
        for (from, symbol, to) in &self.transitions {
            dfa.add_transition(from, *symbol, to)?;
        }
        Ok(dfa)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn builder_creates_states_in_order_of_appearance() {
        let nfa = AutomatonBuilder::new()
            .with_states(["z"])
            .with_alphabet(['c'])
            .with_transitions([("a", 'x', "b"), ("b", EPSILON, "a")])
            .with_initial("a")
            .into_nfa()
            .unwrap();
        assert_eq!(nfa.state_names().collect::<Vec<_>>(), vec!["z", "a", "b"]);
        assert_eq!(nfa.alphabet().universe().collect::<String>(), "cx");
        assert_eq!(nfa.initial(), Some(1));
    }

    #[test]
    fn builder_reports_configuration_errors() {
        assert_eq!(
            AutomatonBuilder::new()
                .with_transitions([("a", 'x', "b")])
                .with_finals(["c"])
                .into_nfa()
                .map(|_| ()),
            Err(AutomatonError::UnknownState("c".into()))
        );
        assert_eq!(
            AutomatonBuilder::new()
                .with_transitions([("a", 'x', "b"), ("a", 'x', "a")])
                .into_dfa()
                .map(|_| ()),
            Err(AutomatonError::NondeterministicTransition {
                state: "a".into(),
                symbol: 'x',
                existing: "b".into()
            })
        );
        assert_eq!(
            AutomatonBuilder::new()
                .with_transitions([("a", EPSILON, "b")])
                .into_dfa()
                .map(|_| ()),
            Err(AutomatonError::EpsilonInDfa)
        );
        assert_eq!(
            AutomatonBuilder::new()
                .with_alphabet([EPSILON])
                .into_nfa()
                .map(|_| ()),
            Err(AutomatonError::EpsilonInAlphabet)
        );
    }
}
