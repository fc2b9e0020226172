use itertools::Itertools;

use crate::Show;

/// A symbol is just a single `char`.
pub type Symbol = char;

/// The reserved symbol that labels epsilon transitions. It may only appear on transitions
/// of an [`NFA`](crate::automaton::NFA) and is never a member of a [`CharAlphabet`].
pub const EPSILON: Symbol = 'ε';

/// Returns true if `symbol` is the reserved [`EPSILON`] marker.
pub fn is_epsilon(symbol: Symbol) -> bool {
    symbol == EPSILON
}

/// Represents an alphabet where a [`Symbol`] is just a single `char`. The symbols are kept
/// sorted and free of duplicates, so iterating over the alphabet always visits the symbols
/// in ascending order.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let alphabet = CharAlphabet::from_iter(['b', 'a', 'b']);
/// assert_eq!(alphabet.universe().collect::<Vec<_>>(), vec!['a', 'b']);
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord, Default)]
pub struct CharAlphabet(Vec<Symbol>);

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] alphabet of the given size. The symbols are just the first `size` letters
    /// of the alphabet, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the symbols in ascending order.
    pub fn universe(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }

    /// Returns true if `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.0.binary_search(&symbol).is_ok()
    }

    /// Inserts `symbol`, returns `false` if it was already present.
    pub(crate) fn insert(&mut self, symbol: Symbol) -> bool {
        match self.0.binary_search(&symbol) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, symbol);
                true
            }
        }
    }
}

impl std::ops::Index<usize> for CharAlphabet {
    type Output = Symbol;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<Symbol> for CharAlphabet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self(iter.into_iter().unique().sorted().collect())
    }
}

impl Show for CharAlphabet {
    fn show(&self) -> String {
        format!("{{{}}}", self.0.iter().join(", "))
    }
}
