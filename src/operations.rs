mod epsilon;
pub use epsilon::{eliminate_epsilon, epsilon_closure, epsilon_closure_of};

mod subset;
pub use subset::{to_dfa, to_dfa_with, SubsetConstruction, WorklistOrder};
