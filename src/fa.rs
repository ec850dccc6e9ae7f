use std::collections::BTreeSet;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Anything usable as a state label or an input symbol. Symbols are compared with `Ord` to fix
/// the order in which the alphabet is walked.
pub trait Label: Clone + Ord + Hash + Debug + Display {}

impl<T: Clone + Ord + Hash + Debug + Display> Label for T {}

/// Read-only view of a finite automaton, used by everything that only needs to look at one
/// (reporting, dot export) rather than run it.
pub trait FA {
    type State: Label;
    type Symbol: Label;

    fn get_num_states(&self) -> usize;
    fn get_num_transitions(&self) -> usize;
    fn get_states(&self) -> &BTreeSet<Self::State>;
    fn get_start_state(&self) -> &Self::State;
    fn get_alphabet(&self) -> &BTreeSet<Self::Symbol>;
    fn get_acceptor_states(&self) -> &BTreeSet<Self::State>;
    /// Outgoing transitions of `state`, ordered by symbol.
    fn get_state_transitions(&self, state: &Self::State) -> Vec<(&Self::Symbol, &Self::State)>;
}
