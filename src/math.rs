use std::collections::BTreeSet;

use itertools::Itertools;

use crate::automaton::StateIndex;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition groups the states of an automaton into classes. The order of the classes
/// is significant: it is the order in which classes are created during refinement, and
/// it determines the order in which a rebuilt automaton receives its states. Classes may be
/// empty, the initial split into rejecting and accepting states keeps an empty side.
#[derive(Debug, Clone, Default)]
pub struct Partition(Vec<BTreeSet<StateIndex>>);

impl std::ops::Deref for Partition {
    type Target = Vec<BTreeSet<StateIndex>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a BTreeSet<StateIndex>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<StateIndex>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl PartialEq for Partition {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl Eq for Partition {}

impl Partition {
    /// Returns the size of the partition, i.e. the number of classes (empty ones included).
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators of state indices.
    pub fn new<X: IntoIterator<Item = StateIndex>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .collect(),
        )
    }

    /// Returns the position of the class that contains `state`, if any.
    pub fn class_of(&self, state: StateIndex) -> Option<usize> {
        self.0.iter().position(|class| class.contains(&state))
    }

    /// Returns an iterator over all states that appear in some class.
    pub fn states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.0.iter().flatten().copied()
    }

    /// Returns the classes that contain more than one state.
    pub fn merged_classes(&self) -> impl Iterator<Item = &BTreeSet<StateIndex>> + '_ {
        self.0.iter().filter(|class| class.len() > 1)
    }

    pub(crate) fn push(&mut self, class: BTreeSet<StateIndex>) {
        self.0.push(class);
    }

    /// Renders the partition using the given naming function, e.g. `[[q0, q1], [q2]]`.
    pub fn show_with<F: Fn(StateIndex) -> String>(&self, name: F) -> String {
        format!(
            "[{}]",
            self.0
                .iter()
                .map(|class| format!("[{}]", class.iter().map(|&q| name(q)).join(", ")))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn partition_lookup() {
        let p = Partition::new([vec![0, 2], vec![], vec![1]]);
        assert_eq!(p.size(), 3);
        assert_eq!(p.class_of(2), Some(0));
        assert_eq!(p.class_of(1), Some(2));
        assert_eq!(p.class_of(7), None);
        assert_eq!(p.merged_classes().count(), 1);
        assert_eq!(p.states().count(), 3);
        assert_eq!(p.show_with(|q| format!("q{q}")), "[[q0, q2], [], [q1]]");
    }

    #[test]
    fn partition_equality_ignores_class_order() {
        let p = Partition::new([vec![0, 2], vec![1]]);
        let q = Partition::new([vec![1], vec![2, 0]]);
        assert_eq!(p, q);
        assert_ne!(p, Partition::new([vec![0], vec![1], vec![2]]));
    }
}
