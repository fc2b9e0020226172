use crate::prelude::*;
use tracing::debug;

fn state_name(i: usize) -> String {
    format!("q{i}")
}

/// Draws a random [`NFA`] with `size` states named `q0`, `q1`, ... over the first `symbols`
/// letters. For every pair of states and every symbol, a transition is inserted with probability
/// `density`, and an epsilon transition with probability `epsilon_probability`. The initial
/// state is `q0`, every state is accepting with probability one half.
pub fn generate_random_nfa(
    size: usize,
    symbols: usize,
    density: f64,
    epsilon_probability: f64,
) -> NFA {
    assert!(size > 0, "an automaton needs at least one state");
    let alphabet = CharAlphabet::of_size(symbols);
    let mut nfa = NFA::for_alphabet(alphabet.clone());
    for i in 0..size {
        nfa.insert_state(state_name(i));
        if fastrand::bool() {
            nfa.add_final_index(i);
        }
    }
    nfa.set_initial_index(0);

    for source in 0..size {
        for target in 0..size {
            for symbol in alphabet.universe() {
                if fastrand::f64() < density {
                    nfa.push_transition(source, symbol, target);
                }
            }
            if source != target && fastrand::f64() < epsilon_probability {
                nfa.push_transition(source, EPSILON, target);
            }
        }
    }
    debug!(
        "generated random NFA with {} states and {} transitions",
        size,
        nfa.transitions().len()
    );
    nfa
}

/// Draws a complete random [`DFA`] with `size` states named `q0`, `q1`, ... over the first
/// `symbols` letters by picking a uniformly random target for every state and symbol. Depending
/// on the draw, some states may be unreachable from the initial state `q0`.
pub fn generate_random_dfa(size: usize, symbols: usize) -> DFA {
    assert!(size > 0, "an automaton needs at least one state");
    let alphabet = CharAlphabet::of_size(symbols);
    let mut dfa = DFA::for_alphabet(alphabet.clone());
    for i in 0..size {
        dfa.insert_state(state_name(i));
        if fastrand::bool() {
            dfa.add_final_index(i);
        }
    }
    dfa.set_initial_index(0);
    for source in 0..size {
        for symbol in alphabet.universe() {
            dfa.push_transition(source, symbol, fastrand::usize(..size));
        }
    }
    dfa
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{math::Set, operations, prelude::*};

    use super::*;

    fn all_words(symbols: usize, max_len: usize) -> Vec<String> {
        let alphabet = CharAlphabet::of_size(symbols);
        std::iter::once(String::new())
            .chain((1..=max_len).flat_map(|len| {
                std::iter::repeat(alphabet.universe().collect_vec())
                    .take(len)
                    .multi_cartesian_product()
                    .map(String::from_iter)
                    .collect_vec()
            }))
            .collect()
    }

    #[test_log::test]
    fn random_conversions_preserve_the_language() {
        fastrand::seed(0xdfa);
        let words = all_words(2, 6);
        for _ in 0..40 {
            let nfa = generate_random_nfa(4, 2, 0.2, 0.1);
            let dfa = nfa.to_dfa().unwrap();
            assert!(dfa.is_complete());

            let partitions = dfa.minimize();
            assert!(partitions.len() <= dfa.size().max(1));
            assert!(partitions
                .iter()
                .tuple_windows()
                .all(|(p, q)| p.size() < q.size()));

            let minimal = dfa.minimized().unwrap();
            assert!(minimal.size() <= dfa.size());
            assert!(minimal.is_complete());

            for word in &words {
                let expected = nfa.accepts(word);
                assert_eq!(expected, dfa.accepts(word), "{word}\n{nfa}\n{dfa}");
                assert_eq!(expected, minimal.accepts(word), "{word}\n{dfa}\n{minimal}");
            }
        }
    }

    #[test]
    fn random_epsilon_elimination_is_idempotent() {
        fastrand::seed(0xe5);
        let words = all_words(2, 5);
        for _ in 0..40 {
            let nfa = generate_random_nfa(5, 2, 0.15, 0.2);
            let once = nfa.eliminate_epsilon();
            let twice = once.eliminate_epsilon();
            assert!(!once.has_epsilon());
            assert_eq!(once, twice);
            for word in &words {
                assert_eq!(nfa.accepts(word), once.accepts(word), "{word}");
            }
        }
    }

    #[test]
    fn random_naming_is_independent_of_processing_order() {
        fastrand::seed(0x5e7);
        for _ in 0..40 {
            let nfa = generate_random_nfa(5, 2, 0.25, 0.05);
            let fifo = operations::to_dfa_with(&nfa, WorklistOrder::Fifo).unwrap();
            let lifo = operations::to_dfa_with(&nfa, WorklistOrder::Lifo).unwrap();
            let names = |dfa: &DFA| dfa.state_names().map(String::from).collect::<Set<_>>();
            let edges = |dfa: &DFA| {
                dfa.transitions()
                    .into_iter()
                    .map(|(p, a, q)| (p.to_string(), a, q.to_string()))
                    .collect::<Set<_>>()
            };
            assert_eq!(names(&fifo), names(&lifo));
            assert_eq!(edges(&fifo), edges(&lifo));
            assert_eq!(fifo, nfa.to_dfa().unwrap());
        }
    }

    #[test]
    fn random_dfas_minimize_to_a_fixed_point() {
        fastrand::seed(0x3);
        let words = all_words(3, 4);
        for _ in 0..40 {
            let dfa = generate_random_dfa(6, 3);
            assert!(dfa.is_complete());
            let minimal = dfa.minimized().unwrap();
            assert!(minimal.size() <= dfa.size());
            let again = minimal.minimized().unwrap();
            assert_eq!(again.size(), minimal.size());
            for word in &words {
                assert_eq!(dfa.accepts(word), minimal.accepts(word), "{word}");
            }
        }
    }
}
