use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::{
    alphabet::EPSILON,
    automaton::{StateIndex, NFA},
    math::Set,
};

/// Computes the epsilon-closure of `state`, i.e. all states that can be reached from it using
/// only epsilon transitions. The closure always contains `state` itself.
pub fn epsilon_closure(nfa: &NFA, state: StateIndex) -> BTreeSet<StateIndex> {
    epsilon_closure_of(nfa, [state])
}

/// Computes the union of the epsilon-closures of all given states. This is a depth-first search
/// over epsilon edges, the visited set makes it terminate on cyclic epsilon graphs.
pub fn epsilon_closure_of<I>(nfa: &NFA, states: I) -> BTreeSet<StateIndex>
where
    I: IntoIterator<Item = StateIndex>,
{
    let mut visited = Set::default();
    let mut stack = states.into_iter().collect::<Vec<_>>();
    let mut closure = BTreeSet::new();

    while let Some(q) = stack.pop() {
        if !visited.insert(q) {
            continue;
        }
        closure.insert(q);
        stack.extend(nfa.successors(q, EPSILON));
    }
    closure
}

/// Produces an NFA without epsilon transitions that accepts the same language as `nfa`. The result
/// has the same states, in the same order and with the same names, and the same initial state.
///
/// For a state `s` and a symbol `a`, the result has an `a`-transition from `s` to every state in
/// the epsilon-closure of the `a`-successors of the epsilon-closure of `s`. A state is accepting
/// if its epsilon-closure contains an accepting state. On an NFA without epsilon transitions this
/// is the identity up to the order of transitions, so applying it twice changes nothing.
pub fn eliminate_epsilon(nfa: &NFA) -> NFA {
    let closures = nfa
        .state_indices()
        .map(|q| epsilon_closure(nfa, q))
        .collect::<Vec<_>>();

    let mut out = NFA::for_alphabet(nfa.alphabet().clone());
    for q in nfa.state_indices() {
        let id = out.insert_state(nfa.name(q));
        debug_assert_eq!(id, q);
    }
    if let Some(initial) = nfa.initial() {
        out.set_initial_index(initial);
    }

    for (q, closure) in closures.iter().enumerate() {
        if closure.iter().any(|&p| nfa.is_final(p)) {
            out.add_final_index(q);
        }
        for symbol in nfa.alphabet().universe() {
            let reached = closure
                .iter()
                .flat_map(|&p| nfa.successors(p, symbol))
                .flat_map(|r| closures[r].iter().copied())
                .collect::<BTreeSet<_>>();
            for target in reached {
                trace!(
                    "adding {} --{symbol}--> {}",
                    nfa.name(q),
                    nfa.name(target)
                );
                out.push_transition(q, symbol, target);
            }
        }
    }

    debug!(
        "eliminated epsilon transitions, {} states and {} transitions remain",
        out.size(),
        out.transitions().len()
    );
    out
}
