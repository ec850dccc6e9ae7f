/* Partitions of the state set of a DFA into groups of (so far) indistinguishable states, and
 * the refinement step used by Moore's minimization algorithm. */

use crate::dfa::Dfa;
use crate::fa::Label;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Reverse index of a partition: for every state, the position of the group holding it.
pub struct LookupTable<'a, Q> {
    state_to_group_map: HashMap<&'a Q, usize>,
}

impl<'a, Q: Label> LookupTable<'a, Q> {
    fn new(groups: &'a [BTreeSet<Q>]) -> Self {
        let mut state_to_group_map = HashMap::new();

        for (index, group) in groups.iter().enumerate() {
            for state in group {
                state_to_group_map.insert(state, index);
            }
        }

        LookupTable { state_to_group_map }
    }

    pub fn get_group_of_state(&self, state: &Q) -> Option<usize> {
        self.state_to_group_map.get(state).copied()
    }
}

/// Where the transitions of a state lead, one entry per alphabet symbol in alphabet order: the
/// group of the target, or `None` if the transition is undefined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<Option<usize>>);

impl Signature {
    pub fn of<Q: Label, A: Label>(dfa: &Dfa<Q, A>, state: &Q, table: &LookupTable<'_, Q>) -> Self {
        let entries = dfa
            .alphabet()
            .iter()
            .map(|symbol| {
                dfa.transition(state, symbol)
                    .and_then(|target| table.get_group_of_state(target))
            })
            .collect();

        Signature(entries)
    }
}

/// An ordered sequence of non-empty, pairwise disjoint groups of states. The order only fixes the
/// group indices used in signatures; two partitions with the same groups in a different order
/// classify states identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<Q> {
    groups: Vec<BTreeSet<Q>>,
}

impl<Q: Label> Partition<Q> {
    /// Wrap the given groups, dropping empty ones.
    pub fn new(groups: Vec<BTreeSet<Q>>) -> Self {
        let groups = groups.into_iter().filter(|group| !group.is_empty()).collect();
        Partition { groups }
    }

    /// Separate accepting from non-accepting states, accepting states first.
    pub fn initial<A: Label>(dfa: &Dfa<Q, A>) -> Self {
        let accepting = dfa.accepting().clone();
        let rejecting = dfa.states().difference(&accepting).cloned().collect();

        Self::new(vec![accepting, rejecting])
    }

    pub fn groups(&self) -> &[BTreeSet<Q>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn lookup_table(&self) -> LookupTable<'_, Q> {
        LookupTable::new(&self.groups)
    }

    /// One refinement round: every group with more than one state is split by signature, where
    /// signatures are taken with respect to `self`. Sub-groups keep the order in which their
    /// signature first shows up among the (sorted) states of the group.
    pub fn refine<A: Label>(&self, dfa: &Dfa<Q, A>) -> Self {
        let table = self.lookup_table();
        let mut next_groups: Vec<BTreeSet<Q>> = Vec::with_capacity(self.groups.len());

        for group in &self.groups {
            if group.len() == 1 {
                // Cannot split a group with only one state
                next_groups.push(group.clone());
                continue;
            }

            let first_split = next_groups.len();
            let mut signature_to_group: HashMap<Signature, usize> = HashMap::new();

            for state in group {
                let signature = Signature::of(dfa, state, &table);
                let next_index = first_split + signature_to_group.len();
                let index = *signature_to_group.entry(signature).or_insert(next_index);

                if index == next_groups.len() {
                    next_groups.push(BTreeSet::new());
                }
                next_groups[index].insert(state.clone());
            }
        }

        Partition {
            groups: next_groups,
        }
    }

    /// Whether both partitions classify states the same way: same number of groups, and every
    /// group of `self` is also a group of `other`, regardless of order.
    pub fn same_classes(&self, other: &Partition<Q>) -> bool {
        if self.groups.len() != other.groups.len() {
            return false;
        }

        let other_groups: HashSet<&BTreeSet<Q>> = other.groups.iter().collect();
        self.groups.iter().all(|group| other_groups.contains(group))
    }
}

impl<Q: Label> fmt::Display for Partition<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, group) in self.groups.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{")?;
            for (position, state) in group.iter().enumerate() {
                if position > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", state)?;
            }
            write!(f, "}}")?;
        }
        write!(f, "]")
    }
}
