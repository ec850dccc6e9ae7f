//! # dfamin
//!
//! Minimization of deterministic finite automata.
//!
//! This library provides functionality to:
//! - Build (possibly partial) DFAs over arbitrary state labels and symbols
//! - Remove the states that are unreachable from the start state
//! - Merge indistinguishable states with Moore's partition refinement
//! - Describe automata as text or Graphviz dot and save/load them as JSON

pub mod description;
pub mod dfa;
pub mod fa;
pub mod minimizer;
pub mod partition;
pub mod report;

// Re-export commonly used items for convenience
pub use description::{load_dfa, save_dfa, DfaDescription};
pub use dfa::{Dfa, DfaError, StateId};
pub use fa::{Label, FA};
pub use minimizer::{
    construct_minimal_dfa, Minimizer, RefinementObserver, SilentObserver, TracingObserver,
};
pub use partition::Partition;
pub use report::{describe, describe_mapping, to_dot, Description, ReductionSummary};
