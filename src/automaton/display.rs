use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::{
    alphabet::{Symbol, EPSILON},
    Show,
};

use super::{Automaton, StateIndex, DEAD_STATE};

impl<const DET: bool> Automaton<DET> {
    /// The columns of the transition table: all alphabet symbols, followed by the epsilon
    /// marker if some transition uses it.
    fn table_columns(&self) -> Vec<Symbol> {
        let uses_epsilon = self
            .states
            .iter()
            .any(|q| q.transitions().iter().any(|t| t.is_epsilon()));
        self.alphabet
            .universe()
            .chain(uses_epsilon.then_some(EPSILON))
            .collect()
    }

    fn decorated_name(&self, q: StateIndex) -> String {
        let mut out = String::new();
        if self.is_initial(q) {
            out.push('→');
        }
        if self.is_final(q) {
            out.push('*');
        }
        out.push_str(self.name(q));
        out
    }

    /// Returns a string representation of the transition table. There is one row per state, in
    /// the order in which the states were added, where the initial state is prefixed with `→`
    /// and accepting states with `*`. Each cell lists the sorted names of the targets, or `∅`
    /// if there are none.
    pub fn transition_table(&self) -> String {
        let columns = self.table_columns();
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(columns.iter().map(|s| s.to_string())),
        );
        for q in self.state_indices() {
            let mut row = vec![self.decorated_name(q)];
            for &symbol in &columns {
                let targets = self
                    .successors(q, symbol)
                    .map(|p| self.name(p))
                    .sorted()
                    .join(", ");
                row.push(if targets.is_empty() {
                    DEAD_STATE.to_string()
                } else {
                    targets
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<const DET: bool> Show for Automaton<DET> {
    fn show(&self) -> String {
        self.transition_table()
    }
}

impl<const DET: bool> Display for Automaton<DET> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}:", if DET { "DFA" } else { "NFA" })?;
        writeln!(f, "States: [{}]", self.state_names().join(", "))?;
        writeln!(f, "Alphabet: {}", self.alphabet.show())?;
        writeln!(f, "Initial State: {}", self.initial_name().unwrap_or("-"))?;
        writeln!(
            f,
            "Accepting States: [{}]",
            self.finals().map(|q| self.name(q)).join(", ")
        )?;
        for (q, state) in self.states.iter().enumerate() {
            if state.transitions().is_empty() {
                continue;
            }
            writeln!(f, "Transitions from {}:", self.name(q))?;
            for t in state.transitions() {
                writeln!(f, "  {} -> {}", t.symbol(), self.name(t.target()))?;
            }
        }
        Ok(())
    }
}
