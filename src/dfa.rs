/* Deterministic finite automata over arbitrary state labels and symbols. The transition
 * function may be partial: a missing (state, symbol) entry is an implicit reject. */

use crate::fa::{Label, FA};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Label of a state in a minimized DFA. Rendered as `q0`, `q1`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    pub fn new(id: usize) -> Self {
        StateId(id)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// List of possible errors when building a DFA
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DfaError {
    /// The start state is not one of the states of the DFA
    UnknownStartState(String),
    /// An accepting state is not one of the states of the DFA
    UnknownAcceptingState(String),
    /// A transition leaves from or leads to a state that is not part of the DFA
    UnknownTransitionState(String),
    /// A transition is labelled with a symbol outside the alphabet
    UnknownSymbol(String),
    /// Two transitions leave the same state on the same symbol towards different targets
    ConflictingTransition { state: String, symbol: String },
}

impl fmt::Display for DfaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DfaError::UnknownStartState(state) => {
                write!(f, "Error: Start state {} is not a state of the DFA!", state)
            }
            DfaError::UnknownAcceptingState(state) => {
                write!(f, "Error: Accepting state {} is not a state of the DFA!", state)
            }
            DfaError::UnknownTransitionState(state) => write!(
                f,
                "Error: Transition refers to {} which is not a state of the DFA!",
                state
            ),
            DfaError::UnknownSymbol(symbol) => {
                write!(f, "Error: Symbol {} is not part of the alphabet!", symbol)
            }
            DfaError::ConflictingTransition { state, symbol } => write!(
                f,
                "Error: State {} has more than one transition on symbol {}!",
                state, symbol
            ),
        }
    }
}

impl std::error::Error for DfaError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa<Q, A> {
    states: BTreeSet<Q>,
    alphabet: BTreeSet<A>,
    transitions: BTreeMap<Q, BTreeMap<A, Q>>, // Outgoing edges per source state
    start: Q,
    accepting: BTreeSet<Q>,
}

impl<Q: Label, A: Label> Dfa<Q, A> {
    /// Build a DFA from its five components. Every state mentioned by the start state, the
    /// accepting set and the transitions must be listed in `states`, every transition symbol must
    /// be in `alphabet`, and no (state, symbol) pair may lead to two different targets.
    /// Listing the same transition twice is allowed.
    pub fn new<S, L, T, F>(
        states: S,
        alphabet: L,
        transitions: T,
        start: Q,
        accepting: F,
    ) -> Result<Self, DfaError>
    where
        S: IntoIterator<Item = Q>,
        L: IntoIterator<Item = A>,
        T: IntoIterator<Item = (Q, A, Q)>,
        F: IntoIterator<Item = Q>,
    {
        let states: BTreeSet<Q> = states.into_iter().collect();
        let alphabet: BTreeSet<A> = alphabet.into_iter().collect();

        if !states.contains(&start) {
            return Err(DfaError::UnknownStartState(start.to_string()));
        }

        let accepting: BTreeSet<Q> = accepting.into_iter().collect();

        if let Some(state) = accepting.iter().find(|state| !states.contains(*state)) {
            return Err(DfaError::UnknownAcceptingState(state.to_string()));
        }

        let mut table: BTreeMap<Q, BTreeMap<A, Q>> = BTreeMap::new();

        for (from, symbol, to) in transitions {
            for state in [&from, &to] {
                if !states.contains(state) {
                    return Err(DfaError::UnknownTransitionState(state.to_string()));
                }
            }

            if !alphabet.contains(&symbol) {
                return Err(DfaError::UnknownSymbol(symbol.to_string()));
            }

            match table.entry(from.clone()).or_default().entry(symbol) {
                Entry::Vacant(entry) => {
                    entry.insert(to);
                }
                Entry::Occupied(entry) if *entry.get() != to => {
                    return Err(DfaError::ConflictingTransition {
                        state: from.to_string(),
                        symbol: entry.key().to_string(),
                    });
                }
                Entry::Occupied(_) => {} // Same edge listed twice
            }
        }

        Ok(Self::from_parts(states, alphabet, table, start, accepting))
    }

    /// Assemble a DFA from parts that are already known to be consistent.
    pub(crate) fn from_parts(
        states: BTreeSet<Q>,
        alphabet: BTreeSet<A>,
        transitions: BTreeMap<Q, BTreeMap<A, Q>>,
        start: Q,
        accepting: BTreeSet<Q>,
    ) -> Self {
        Dfa {
            states,
            alphabet,
            transitions,
            start,
            accepting,
        }
    }

    /// The target of the transition from `state` on `symbol`, if there is one.
    pub fn transition(&self, state: &Q, symbol: &A) -> Option<&Q> {
        self.transitions.get(state)?.get(symbol)
    }

    pub fn is_accepting(&self, state: &Q) -> bool {
        self.accepting.contains(state)
    }

    /// Run the DFA on `input` from the start state. The input is rejected as soon as it contains
    /// a symbol outside the alphabet or a transition is missing.
    pub fn recognize<I, B>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = B>,
        B: Borrow<A>,
    {
        let mut current = &self.start;

        for symbol in input {
            let symbol = symbol.borrow();

            if !self.alphabet.contains(symbol) {
                return false;
            }

            current = match self.transition(current, symbol) {
                Some(next) => next,
                None => return false,
            };
        }

        self.is_accepting(current)
    }

    pub fn states(&self) -> &BTreeSet<Q> {
        &self.states
    }

    pub fn alphabet(&self) -> &BTreeSet<A> {
        &self.alphabet
    }

    pub fn start(&self) -> &Q {
        &self.start
    }

    pub fn accepting(&self) -> &BTreeSet<Q> {
        &self.accepting
    }

    /// All transitions as `(from, symbol, to)`, ordered by source state and then by symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (&Q, &A, &Q)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(from, row)| row.iter().map(move |(symbol, to)| (from, symbol, to)))
    }

    /// Outgoing transitions of `state` as `(symbol, to)`, ordered by symbol.
    pub fn outgoing(&self, state: &Q) -> impl Iterator<Item = (&A, &Q)> + '_ {
        self.transitions.get(state).into_iter().flat_map(|row| row.iter())
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.values().map(BTreeMap::len).sum()
    }
}

impl<Q: Label, A: Label> FA for Dfa<Q, A> {
    type State = Q;
    type Symbol = A;

    fn get_num_states(&self) -> usize {
        self.num_states()
    }

    fn get_num_transitions(&self) -> usize {
        self.num_transitions()
    }

    fn get_states(&self) -> &BTreeSet<Q> {
        &self.states
    }

    fn get_start_state(&self) -> &Q {
        &self.start
    }

    fn get_alphabet(&self) -> &BTreeSet<A> {
        &self.alphabet
    }

    fn get_acceptor_states(&self) -> &BTreeSet<Q> {
        &self.accepting
    }

    fn get_state_transitions(&self, state: &Q) -> Vec<(&A, &Q)> {
        self.outgoing(state).collect()
    }
}
