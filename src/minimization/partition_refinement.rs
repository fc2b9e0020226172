use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    automaton::{AutomatonError, StateIndex, DFA},
    math::{Map, Partition},
};

/// Splits the classes of `previous` such that two states stay together iff for every symbol
/// their successors lie in the same class of `previous`. A missing transition behaves like a
/// transition into the dead state, which belongs to no class. Classes with at most one state
/// are carried over unchanged, so the number of classes never decreases.
pub fn refine(dfa: &DFA, previous: &Partition) -> Partition {
    let class_of = previous
        .iter()
        .enumerate()
        .flat_map(|(i, class)| class.iter().map(move |&q| (q, i)))
        .collect::<Map<StateIndex, usize>>();

    let successor_class =
        |q: StateIndex, symbol| dfa.successor(q, symbol).and_then(|p| class_of.get(&p));
    let agree = |u: StateIndex, v: StateIndex| {
        dfa.alphabet()
            .universe()
            .all(|symbol| successor_class(u, symbol) == successor_class(v, symbol))
    };

    let mut next = Partition::default();
    for class in previous {
        if class.len() <= 1 {
            next.push(class.clone());
            continue;
        }

        let mut split: Vec<BTreeSet<StateIndex>> = vec![];
        for &q in class {
            match split
                .iter_mut()
                .find(|sub| agree(q, *sub.first().expect("sub-classes are never empty")))
            {
                Some(sub) => {
                    sub.insert(q);
                }
                None => split.push(BTreeSet::from([q])),
            }
        }
        if split.len() > 1 {
            trace!(
                "split class {{{}}} into {} classes",
                class.iter().map(|&q| dfa.name(q)).join(", "),
                split.len()
            );
        }
        for sub in split {
            next.push(sub);
        }
    }
    next
}

/// Runs Moore's partition refinement on `dfa` and returns every partition it passes through.
/// The first one separates rejecting from accepting states (either side may be empty), the
/// last one is the coarsest stable partition. The dead state takes no part in the refinement.
///
/// Refinement stops at the first round that does not increase the number of classes, so at
/// most as many partitions as there are states are produced.
pub fn minimize(dfa: &DFA) -> Vec<Partition> {
    let dead = dfa.dead_state();
    let (accepting, rejecting): (Vec<_>, Vec<_>) = dfa
        .state_indices()
        .filter(|&q| Some(q) != dead)
        .partition(|&q| dfa.is_final(q));

    let mut partitions = vec![Partition::new([rejecting, accepting])];
    loop {
        let last = partitions
            .last()
            .expect("there is always an initial partition");
        let next = refine(dfa, last);
        debug!(
            "refinement round {} produced {} classes",
            partitions.len(),
            next.size()
        );
        if next.size() == last.size() {
            break;
        }
        partitions.push(next);
    }
    partitions
}

/// Builds the quotient of `dfa` with respect to `partition`. A class with a single state keeps
/// that state and its name, a class with several states is replaced by one state whose name is
/// the concatenation of the member names. Transitions are redirected to the state replacing
/// their target, and a replacement state is initial (accepting) if some member was. Empty classes
/// are skipped.
///
/// Every state except the dead state has to appear in exactly one class. If the dead state is not
/// part of the partition but still reachable, it is carried over unchanged. Fails if the members of
/// a class disagree on where a symbol leads, or if a merged name collides with another name.
pub fn rebuild(dfa: &DFA, partition: &Partition) -> Result<DFA, AutomatonError> {
    let dead = dfa.dead_state();
    let mut covered = vec![false; dfa.size()];
    for q in partition.states() {
        if q >= dfa.size() {
            return Err(AutomatonError::InvalidPartition(format!(
                "state index {q} does not exist"
            )));
        }
        if std::mem::replace(&mut covered[q], true) {
            return Err(AutomatonError::InvalidPartition(format!(
                "state {} appears in more than one class",
                dfa.name(q)
            )));
        }
    }
    if let Some(q) = dfa
        .state_indices()
        .find(|&q| !covered[q] && Some(q) != dead)
    {
        return Err(AutomatonError::InvalidPartition(format!(
            "state {} is not covered",
            dfa.name(q)
        )));
    }

    for class in partition.merged_classes() {
        trace!(
            "merging {{{}}}",
            class.iter().map(|&q| dfa.name(q)).join(", ")
        );
    }

    let mut classes = partition
        .iter()
        .filter(|class| !class.is_empty())
        .map(|class| class.iter().copied().collect_vec())
        .collect_vec();
    if let Some(d) = dead.filter(|&d| !covered[d]) {
        let referenced = dfa.initial() == Some(d)
            || classes.iter().flatten().any(|&q| {
                dfa.alphabet()
                    .universe()
                    .any(|symbol| dfa.successor(q, symbol) == Some(d))
            });
        if referenced {
            classes.push(vec![d]);
        }
    }

    let mut replacement = vec![None; dfa.size()];
    for (i, class) in classes.iter().enumerate() {
        for &q in class {
            replacement[q] = Some(i);
        }
    }
    let names = classes
        .iter()
        .map(|class| class.iter().map(|&q| dfa.name(q)).join(""))
        .collect_vec();

    let mut out = DFA::for_alphabet(dfa.alphabet().clone());
    for (i, name) in names.iter().enumerate() {
        if out.insert_state(name.as_str()) != i {
            return Err(AutomatonError::NameCollision(name.clone()));
        }
    }

    for (i, class) in classes.iter().enumerate() {
        if class.iter().any(|&q| dfa.is_initial(q)) {
            out.set_initial_index(i);
        }
        if class.iter().any(|&q| dfa.is_final(q)) {
            out.add_final_index(i);
        }
        for symbol in dfa.alphabet().universe() {
            let targets = class
                .iter()
                .map(|&q| dfa.successor(q, symbol).map(|p| replacement[p]))
                .unique()
                .collect_vec();
            match targets.as_slice() {
                [None] => {}
                [Some(Some(target))] => {
                    out.push_transition(i, symbol, *target);
                }
                [Some(None)] => {
                    return Err(AutomatonError::InvalidPartition(format!(
                        "state {} leads to a state outside of the partition",
                        names[i]
                    )))
                }
                _ => {
                    return Err(AutomatonError::UnstablePartition {
                        class: names[i].clone(),
                        symbol,
                    })
                }
            }
        }
    }

    debug!(
        "rebuilt automaton with {} states from {} states",
        out.size(),
        dfa.size()
    );
    Ok(out)
}

/// Renders each partition on one line, e.g. `0 - Equivalence: [[q0, q1], [q2]]`.
pub fn show_partitions(dfa: &DFA, partitions: &[Partition]) -> Vec<String> {
    partitions
        .iter()
        .enumerate()
        .map(|(i, partition)| {
            format!(
                "{i} - Equivalence: {}",
                partition.show_with(|q| dfa.name(q).to_string())
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    use super::*;

    pub fn wiki_dfa() -> DFA {
        AutomatonBuilder::new()
            .with_transitions([
                ("a", 'a', "b"),
                ("a", 'b', "c"),
                ("b", 'a', "a"),
                ("b", 'b', "d"),
                ("c", 'a', "e"),
                ("c", 'b', "f"),
                ("d", 'a', "e"),
                ("d", 'b', "f"),
                ("e", 'a', "e"),
                ("e", 'b', "f"),
                ("f", 'a', "f"),
                ("f", 'b', "f"),
            ])
            .with_states(["a", "b", "c", "d", "e", "f"])
            .with_initial("a")
            .with_finals(["c", "d", "e"])
            .into_dfa()
            .unwrap()
    }

    fn all_words(max_len: usize) -> impl Iterator<Item = String> {
        std::iter::once(String::new()).chain((1..=max_len).flat_map(|len| {
            std::iter::repeat(['a', 'b'])
                .take(len)
                .multi_cartesian_product()
                .map(String::from_iter)
        }))
    }

    #[test_log::test]
    fn wiki_example_minimizes_to_three_states() {
        let dfa = wiki_dfa();
        let partitions = dfa.minimize();
        assert_eq!(
            show_partitions(&dfa, &partitions),
            vec![
                "0 - Equivalence: [[a, b, f], [c, d, e]]",
                "1 - Equivalence: [[a, b], [f], [c, d, e]]",
            ]
        );

        let minimal = dfa.rebuild(partitions.last().unwrap()).unwrap();
        assert_eq!(
            minimal.state_names().collect_vec(),
            vec!["ab", "f", "cde"]
        );
        assert_eq!(minimal.initial_name(), Some("ab"));
        assert_eq!(minimal.finals().map(|q| minimal.name(q)).collect_vec(), ["cde"]);
        assert!(minimal.is_complete());
        for word in all_words(6) {
            assert_eq!(dfa.accepts(&word), minimal.accepts(&word), "{word}");
        }
        assert_eq!(minimal, dfa.minimized().unwrap());
    }

    #[test_log::test]
    fn indistinguishable_states_are_merged() {
        let dfa = AutomatonBuilder::new()
            .with_transitions([
                ("s0", 'a', "s1"),
                ("s0", 'b', "s2"),
                ("s1", 'a', "s3"),
                ("s1", 'b', "s3"),
                ("s2", 'a', "s3"),
                ("s2", 'b', "s3"),
                ("s3", 'a', "s3"),
                ("s3", 'b', "s3"),
            ])
            .with_initial("s0")
            .with_finals(["s3"])
            .into_dfa()
            .unwrap();

        let minimal = dfa.minimized().unwrap();
        assert_eq!(minimal.size(), dfa.size() - 1);
        assert!(minimal.index_of("s1s2").is_some());
        assert_eq!(minimal.run("a"), minimal.run("b"));
        for word in all_words(5) {
            assert_eq!(dfa.accepts(&word), minimal.accepts(&word), "{word}");
        }
    }

    #[test]
    fn partitions_grow_and_converge() {
        let dfa = wiki_dfa();
        let partitions = minimize(&dfa);
        assert!(partitions.len() <= dfa.size());
        assert!(partitions
            .iter()
            .tuple_windows()
            .all(|(p, q)| p.size() < q.size()));
        let last = partitions.last().unwrap();
        assert_eq!(&refine(&dfa, last), last);
    }

    #[test]
    fn dead_state_is_carried_over() {
        let nfa = AutomatonBuilder::new()
            .with_transitions([("q0", 'a', "q1"), ("q1", 'a', "q1"), ("q0", 'b', "q0")])
            .with_initial("q0")
            .with_finals(["q1"])
            .into_nfa()
            .unwrap();
        let dfa = nfa.to_dfa().unwrap();
        let dead = dfa.dead_state().unwrap();

        let partitions = dfa.minimize();
        assert!(partitions.iter().all(|p| p.class_of(dead).is_none()));

        let minimal = dfa.minimized().unwrap();
        assert!(minimal.dead_state().is_some());
        assert!(minimal.is_complete());
        assert_eq!(minimal.size(), dfa.size());
        assert!(minimal.accepts("baa"));
        assert!(!minimal.accepts("ab"));
    }

    #[test]
    fn empty_classes_are_kept() {
        let dfa = AutomatonBuilder::new()
            .with_transitions([("p", 'a', "q"), ("q", 'a', "p")])
            .with_initial("p")
            .into_dfa()
            .unwrap();
        let partitions = dfa.minimize();
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].size(), 2);
        assert!(partitions[0][1].is_empty());

        let minimal = dfa.rebuild(&partitions[0]).unwrap();
        assert_eq!(minimal.state_names().collect_vec(), vec!["pq"]);
        assert_eq!(minimal.successor(0, 'a'), Some(0));
        assert!(!minimal.accepts("aaa"));
    }

    #[test]
    fn rebuild_validates_the_partition() {
        let dfa = wiki_dfa();
        assert!(matches!(
            dfa.rebuild(&Partition::new([vec![0, 1], vec![2, 3, 4]])),
            Err(AutomatonError::InvalidPartition(_))
        ));
        assert!(matches!(
            dfa.rebuild(&Partition::new([vec![0, 1, 5], vec![2, 3, 4], vec![1]])),
            Err(AutomatonError::InvalidPartition(_))
        ));
        assert!(matches!(
            dfa.rebuild(&Partition::new([vec![0, 1, 2, 3, 4, 5, 6]])),
            Err(AutomatonError::InvalidPartition(_))
        ));
        assert_eq!(
            dfa.rebuild(&Partition::new([vec![0, 1, 5], vec![2, 3, 4]])),
            Err(AutomatonError::UnstablePartition {
                class: "abf".into(),
                symbol: 'b'
            })
        );
    }

    #[test]
    fn merged_names_must_not_collide() {
        let dfa = AutomatonBuilder::new()
            .with_transitions([("a", 'x', "ab"), ("b", 'x', "ab"), ("ab", 'x', "ab")])
            .with_initial("a")
            .with_finals(["ab"])
            .into_dfa()
            .unwrap();
        assert_eq!(
            dfa.minimized(),
            Err(AutomatonError::NameCollision("ab".into()))
        );

        let complete = AutomatonBuilder::new()
            .with_transitions([
                ("a", 'x', "c"),
                ("b", 'x', "c"),
                ("ab", 'x', "ab"),
                ("c", 'x', "c"),
            ])
            .with_initial("a")
            .with_finals(["c"])
            .into_dfa()
            .unwrap();
        assert!(complete.is_complete());
        assert_eq!(complete.minimize().last().unwrap().size(), 3);
        assert_eq!(
            complete.minimized(),
            Err(AutomatonError::NameCollision("ab".into()))
        );
    }
}
