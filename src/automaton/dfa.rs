use crate::alphabet::{is_epsilon, Symbol};

use super::{AutomatonError, StateIndex, DFA};

impl DFA {
    /// Adds a transition from the state called `from` to the state called `to` on `symbol`.
    /// Epsilon transitions are rejected, as is a transition on a symbol for which `from`
    /// already has a transition to a different state. Returns `false` if the very same
    /// transition already existed.
    pub fn add_transition(
        &mut self,
        from: &str,
        symbol: Symbol,
        to: &str,
    ) -> Result<bool, AutomatonError> {
        if is_epsilon(symbol) {
            return Err(AutomatonError::EpsilonInDfa);
        }
        let (source, target) = self.resolve_transition(from, symbol, to)?;
        match self.successor(source, symbol) {
            Some(existing) if existing != target => {
                Err(AutomatonError::NondeterministicTransition {
                    state: from.to_string(),
                    symbol,
                    existing: self.name(existing).to_string(),
                })
            }
            Some(_) => Ok(false),
            None => Ok(self.push_transition(source, symbol, target)),
        }
    }

    /// The unique successor of `from` on `symbol`, or `None` if there is no such transition.
    pub fn successor(&self, from: StateIndex, symbol: Symbol) -> Option<StateIndex> {
        self.states.get(from)?.successor(symbol)
    }

    /// Runs `word` from `origin` and returns the state that is reached. The run fails and
    /// `None` is returned as soon as a symbol has no transition.
    pub fn run_from(&self, origin: StateIndex, word: &str) -> Option<StateIndex> {
        word.chars()
            .try_fold(origin, |state, symbol| self.successor(state, symbol))
    }

    /// Runs `word` from the initial state, see [`Self::run_from`].
    pub fn run(&self, word: &str) -> Option<StateIndex> {
        self.run_from(self.initial?, word)
    }

    /// Decides whether `word` is accepted. A missing transition (which corresponds to an
    /// implicit dead state) rejects the word.
    pub fn accepts(&self, word: &str) -> bool {
        self.run(word).is_some_and(|q| self.is_final(q))
    }

    /// Returns true if every state has exactly one transition for every symbol of the alphabet.
    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|q| {
            q.transitions().len() == self.alphabet.size()
                && self
                    .alphabet
                    .universe()
                    .all(|symbol| q.successors(symbol).count() == 1)
        })
    }
}

#[cfg(feature = "minimize")]
impl DFA {
    /// Computes the successive partitions of Moore's partition refinement, see
    /// [`crate::minimization::minimize`]. The last partition is the coarsest stable one.
    pub fn minimize(&self) -> Vec<crate::math::Partition> {
        crate::minimization::minimize(self)
    }

    /// Rebuilds `self` from a partition of its states, see [`crate::minimization::rebuild`].
    pub fn rebuild(&self, partition: &crate::math::Partition) -> Result<DFA, AutomatonError> {
        crate::minimization::rebuild(self, partition)
    }

    /// Minimizes `self` by rebuilding it from the final partition of [`Self::minimize`].
    ///
    /// Merged states are named by concatenating the member names, so this fails with
    /// [`AutomatonError::NameCollision`] even on a complete DFA if such a name is already taken
    /// by another state, e.g. when `a` and `b` are merged while a state `ab` exists.
    pub fn minimized(&self) -> Result<DFA, AutomatonError> {
        let partitions = self.minimize();
        match partitions.last() {
            Some(stable) => self.rebuild(stable),
            None => Ok(self.clone()),
        }
    }
}
