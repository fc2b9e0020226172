use std::collections::BTreeSet;

use crate::{
    alphabet::{Symbol, EPSILON},
    operations::{self, epsilon_closure_of},
};

use super::{AutomatonError, StateIndex, DFA, NFA};

impl NFA {
    /// Adds a transition from the state called `from` to the state called `to` on `symbol`,
    /// which may be the epsilon marker. Both states must exist and `symbol` must either be
    /// [`EPSILON`] or part of the alphabet. Returns `false` if the transition already existed.
    pub fn add_transition(
        &mut self,
        from: &str,
        symbol: Symbol,
        to: &str,
    ) -> Result<bool, AutomatonError> {
        let (source, target) = self.resolve_transition(from, symbol, to)?;
        Ok(self.push_transition(source, symbol, target))
    }

    /// Returns true if at least one transition is labelled with the epsilon marker.
    pub fn has_epsilon(&self) -> bool {
        self.states
            .iter()
            .any(|q| q.transitions().iter().any(|t| t.is_epsilon()))
    }

    /// Iterates over the targets of all epsilon transitions leaving `from`.
    pub fn epsilon_successors(&self, from: StateIndex) -> impl Iterator<Item = StateIndex> + '_ {
        self.successors(from, EPSILON)
    }

    /// Computes the set of states that are reached by reading `word` from the initial state,
    /// taking epsilon transitions into account. Returns `None` if no initial state is set.
    pub fn reached_states(&self, word: &str) -> Option<BTreeSet<StateIndex>> {
        let initial = self.initial?;
        let mut current = epsilon_closure_of(self, [initial]);
        for symbol in word.chars() {
            let step = current
                .iter()
                .flat_map(|&q| self.successors(q, symbol))
                .collect::<Vec<_>>();
            current = epsilon_closure_of(self, step);
            if current.is_empty() {
                break;
            }
        }
        Some(current)
    }

    /// Decides whether `word` is accepted, that is whether some run on it ends in an accepting
    /// state. Without an initial state nothing is accepted.
    pub fn accepts(&self, word: &str) -> bool {
        self.reached_states(word)
            .is_some_and(|reached| reached.iter().any(|&q| self.is_final(q)))
    }

    /// Produces an equivalent automaton without epsilon transitions, see
    /// [`operations::eliminate_epsilon`].
    pub fn eliminate_epsilon(&self) -> NFA {
        operations::eliminate_epsilon(self)
    }

    /// Produces an equivalent deterministic automaton, see [`operations::to_dfa`].
    pub fn to_dfa(&self) -> Result<DFA, AutomatonError> {
        operations::to_dfa(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn nfa_acceptance_follows_epsilon_edges() {
        let nfa = AutomatonBuilder::new()
            .with_transitions([
                ("p", EPSILON, "q"),
                ("q", 'a', "r"),
                ("r", EPSILON, "p"),
                ("q", 'b', "s"),
            ])
            .with_initial("p")
            .with_finals(["s"])
            .into_nfa()
            .unwrap();

        assert!(nfa.has_epsilon());
        assert!(nfa.accepts("b"));
        assert!(nfa.accepts("aab"));
        assert!(!nfa.accepts(""));
        assert!(!nfa.accepts("ba"));
        assert!(!nfa.accepts("c"));
        assert_eq!(nfa.epsilon_successors(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn without_initial_state_nothing_is_accepted() {
        let mut nfa = NFA::with_alphabet(['a']).unwrap();
        nfa.add_state("q0").unwrap();
        nfa.add_final("q0").unwrap();
        assert!(!nfa.accepts(""));
        assert_eq!(nfa.reached_states("a"), None);
        assert_eq!(nfa.to_dfa(), Err(AutomatonError::MissingInitialState));
    }
}
