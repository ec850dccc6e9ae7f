/* Minimization of (possibly partial) DFAs:
 * 1. drop the states that cannot be reached from the start state,
 * 2. refine the accepting / non-accepting partition until it stops changing (Moore),
 * 3. build the quotient automaton with one state per group. */

use crate::dfa::{Dfa, StateId};
use crate::fa::Label;
use crate::partition::Partition;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, trace};

/// Receives the intermediate partitions computed while refining. Observers only look; they
/// cannot influence the result.
pub trait RefinementObserver<Q> {
    /// Called with the states removed because they are unreachable from the start state.
    fn states_pruned(&mut self, _pruned: &BTreeSet<Q>) {}

    /// Called once with the accepting / non-accepting partition.
    fn initial_partition(&mut self, _partition: &Partition<Q>) {}

    /// Called after every refinement round, rounds are numbered from 1.
    fn round_completed(&mut self, _round: usize, _partition: &Partition<Q>) {}

    /// Called once the partition no longer changes, with the number of rounds it took.
    fn stabilized(&mut self, _rounds: usize, _partition: &Partition<Q>) {}

    /// Called with the state of the minimal DFA that every reachable state was merged into.
    fn states_merged(&mut self, _mapping: &BTreeMap<Q, StateId>) {}
}

/// Observer that reports every step as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl<Q: Label> RefinementObserver<Q> for TracingObserver {
    fn states_pruned(&mut self, pruned: &BTreeSet<Q>) {
        if !pruned.is_empty() {
            debug!(count = pruned.len(), "removed unreachable states {:?}", pruned);
        }
    }

    fn initial_partition(&mut self, partition: &Partition<Q>) {
        trace!("initial partition {}", partition);
    }

    fn round_completed(&mut self, round: usize, partition: &Partition<Q>) {
        trace!(round, groups = partition.len(), "new partition {}", partition);
    }

    fn stabilized(&mut self, rounds: usize, partition: &Partition<Q>) {
        debug!(rounds, groups = partition.len(), "partition stabilized {}", partition);
    }

    fn states_merged(&mut self, mapping: &BTreeMap<Q, StateId>) {
        for (state, id) in mapping {
            debug!("{} -> {}", state, id);
        }
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl<Q> RefinementObserver<Q> for SilentObserver {}

#[derive(Debug, Default, Clone, Copy)]
pub struct Minimizer;

impl Minimizer {
    pub fn new() -> Self {
        Minimizer
    }

    /// Compute the minimal DFA accepting the same language as `dfa`, logging the intermediate
    /// partitions through `tracing`.
    pub fn minimize<Q: Label, A: Label>(&self, dfa: &Dfa<Q, A>) -> Dfa<StateId, A> {
        self.minimize_with(dfa, &mut TracingObserver)
    }

    /// Like [`Minimizer::minimize`] but reporting progress to `observer`.
    pub fn minimize_with<Q, A, O>(&self, dfa: &Dfa<Q, A>, observer: &mut O) -> Dfa<StateId, A>
    where
        Q: Label,
        A: Label,
        O: RefinementObserver<Q>,
    {
        self.minimize_with_mapping(dfa, observer).0
    }

    /// Like [`Minimizer::minimize_with`], also returning the state of the minimal DFA that each
    /// reachable state of `dfa` was merged into. Unreachable states are not in the mapping.
    pub fn minimize_with_mapping<Q, A, O>(
        &self,
        dfa: &Dfa<Q, A>,
        observer: &mut O,
    ) -> (Dfa<StateId, A>, BTreeMap<Q, StateId>)
    where
        Q: Label,
        A: Label,
        O: RefinementObserver<Q>,
    {
        let reachable = self.remove_unreachable(dfa);

        let pruned: BTreeSet<Q> = dfa
            .states()
            .difference(reachable.states())
            .cloned()
            .collect();
        observer.states_pruned(&pruned);

        let partition = self.refine_partition(&reachable, observer);
        let mapping = self.state_mapping(&reachable, &partition);
        observer.states_merged(&mapping);

        let minimal = quotient_from_mapping(&reachable, &mapping);

        debug!(
            states_before = dfa.num_states(),
            states_after = minimal.num_states(),
            transitions_before = dfa.num_transitions(),
            transitions_after = minimal.num_transitions(),
            "minimized DFA"
        );

        (minimal, mapping)
    }

    /// Keep only the states reachable from the start state, together with the transitions and
    /// accepting states among them.
    pub fn remove_unreachable<Q: Label, A: Label>(&self, dfa: &Dfa<Q, A>) -> Dfa<Q, A> {
        let mut reachable: BTreeSet<Q> = BTreeSet::new();
        let mut queue: VecDeque<&Q> = VecDeque::new();

        reachable.insert(dfa.start().clone());
        queue.push_back(dfa.start());

        while let Some(state) = queue.pop_front() {
            for (_, target) in dfa.outgoing(state) {
                if reachable.insert(target.clone()) {
                    queue.push_back(target);
                }
            }
        }

        let mut transitions: BTreeMap<Q, BTreeMap<A, Q>> = BTreeMap::new();

        // Every target of a reachable state is reachable itself
        for (from, symbol, to) in dfa.transitions() {
            if reachable.contains(from) {
                transitions
                    .entry(from.clone())
                    .or_default()
                    .insert(symbol.clone(), to.clone());
            }
        }

        let accepting = dfa.accepting().intersection(&reachable).cloned().collect();

        Dfa::from_parts(
            reachable,
            dfa.alphabet().clone(),
            transitions,
            dfa.start().clone(),
            accepting,
        )
    }

    /// Refine the accepting / non-accepting partition of the states of `dfa` until a round
    /// leaves it unchanged. The result groups exactly the language-equivalent states of `dfa`
    /// (among its reachable ones).
    pub fn refine_partition<Q, A, O>(&self, dfa: &Dfa<Q, A>, observer: &mut O) -> Partition<Q>
    where
        Q: Label,
        A: Label,
        O: RefinementObserver<Q>,
    {
        let mut current = Partition::initial(dfa);
        observer.initial_partition(&current);

        let mut round = 1;

        loop {
            let next = current.refine(dfa);
            observer.round_completed(round, &next);

            if next.same_classes(&current) {
                break;
            }

            current = next;
            round += 1;
        }

        observer.stabilized(round, &current);
        current
    }

    /// Build the DFA whose states are the groups of `partition`, numbered as in
    /// [`Minimizer::state_mapping`].
    pub fn build_quotient<Q: Label, A: Label>(
        &self,
        dfa: &Dfa<Q, A>,
        partition: &Partition<Q>,
    ) -> Dfa<StateId, A> {
        let mapping = self.state_mapping(dfa, partition);
        quotient_from_mapping(dfa, &mapping)
    }

    /// Assign every state of `partition` the label of its group in the minimal DFA. Groups are
    /// numbered in the order a breadth-first walk from the start group (symbols in alphabet
    /// order) discovers them, so the start state is always `q0`.
    pub fn state_mapping<Q: Label, A: Label>(
        &self,
        dfa: &Dfa<Q, A>,
        partition: &Partition<Q>,
    ) -> BTreeMap<Q, StateId> {
        let table = partition.lookup_table();
        let groups = partition.groups();

        // Group level transitions, all members of a group agree on them
        let mut group_transitions: Vec<BTreeMap<&A, usize>> = vec![BTreeMap::new(); groups.len()];

        for (from, symbol, to) in dfa.transitions() {
            if let (Some(from_group), Some(to_group)) =
                (table.get_group_of_state(from), table.get_group_of_state(to))
            {
                group_transitions[from_group].insert(symbol, to_group);
            }
        }

        let mut reorder_map: Vec<Option<StateId>> = vec![None; groups.len()];
        let mut next_id = 0;
        let mut queue: VecDeque<usize> = VecDeque::new();

        if let Some(start_group) = table.get_group_of_state(dfa.start()) {
            reorder_map[start_group] = Some(StateId::new(next_id));
            next_id += 1;
            queue.push_back(start_group);
        }

        while let Some(group) = queue.pop_front() {
            for target in group_transitions[group].values() {
                if reorder_map[*target].is_none() {
                    reorder_map[*target] = Some(StateId::new(next_id));
                    next_id += 1;
                    queue.push_back(*target);
                }
            }
        }

        // Groups the walk did not reach only exist if unreachable states were left in `dfa`
        for id in reorder_map.iter_mut().filter(|id| id.is_none()) {
            *id = Some(StateId::new(next_id));
            next_id += 1;
        }

        groups
            .iter()
            .zip(reorder_map.into_iter().flatten())
            .flat_map(|(group, id)| group.iter().map(move |state| (state.clone(), id)))
            .collect()
    }
}

/// Map every state and transition of `dfa` onto the labels of `mapping`. States missing from the
/// mapping are dropped together with their transitions.
fn quotient_from_mapping<Q: Label, A: Label>(
    dfa: &Dfa<Q, A>,
    mapping: &BTreeMap<Q, StateId>,
) -> Dfa<StateId, A> {
    let mut transitions: BTreeMap<StateId, BTreeMap<A, StateId>> = BTreeMap::new();

    for (from, symbol, to) in dfa.transitions() {
        if let (Some(&from_id), Some(&to_id)) = (mapping.get(from), mapping.get(to)) {
            transitions
                .entry(from_id)
                .or_default()
                .insert(symbol.clone(), to_id);
        }
    }

    let accepting = dfa
        .accepting()
        .iter()
        .filter_map(|state| mapping.get(state))
        .copied()
        .collect();

    let start = mapping
        .get(dfa.start())
        .copied()
        .unwrap_or(StateId::new(0));

    Dfa::from_parts(
        mapping.values().copied().collect(),
        dfa.alphabet().clone(),
        transitions,
        start,
        accepting,
    )
}

/// Minimize `dfa` with the default [`Minimizer`].
pub fn construct_minimal_dfa<Q: Label, A: Label>(dfa: &Dfa<Q, A>) -> Dfa<StateId, A> {
    Minimizer::new().minimize(dfa)
}

#[cfg(test)]
mod minimizer_tests {
    use super::*;

    #[derive(Default)]
    struct RecordingObserver {
        pruned: Vec<&'static str>,
        initial: Option<Partition<&'static str>>,
        rounds: Vec<(usize, Partition<&'static str>)>,
        stabilized: Option<(usize, Partition<&'static str>)>,
        merged: BTreeMap<&'static str, StateId>,
    }

    impl RefinementObserver<&'static str> for RecordingObserver {
        fn states_pruned(&mut self, pruned: &BTreeSet<&'static str>) {
            self.pruned.extend(pruned.iter().copied());
        }

        fn initial_partition(&mut self, partition: &Partition<&'static str>) {
            self.initial = Some(partition.clone());
        }

        fn round_completed(&mut self, round: usize, partition: &Partition<&'static str>) {
            self.rounds.push((round, partition.clone()));
        }

        fn stabilized(&mut self, rounds: usize, partition: &Partition<&'static str>) {
            self.stabilized = Some((rounds, partition.clone()));
        }

        fn states_merged(&mut self, mapping: &BTreeMap<&'static str, StateId>) {
            self.merged = mapping.clone();
        }
    }

    fn set(states: &[&'static str]) -> BTreeSet<&'static str> {
        states.iter().copied().collect()
    }

    // a* b over {a, b} with a redundant copy of the start state and an unreachable state
    fn redundant_dfa() -> Dfa<&'static str, char> {
        Dfa::new(
            ["s0", "s1", "s2", "dead", "lost"],
            ['a', 'b'],
            [
                ("s0", 'a', "s1"),
                ("s0", 'b', "s2"),
                ("s1", 'a', "s0"),
                ("s1", 'b', "s2"),
                ("s2", 'a', "dead"),
                ("s2", 'b', "dead"),
                ("dead", 'a', "dead"),
                ("dead", 'b', "dead"),
                ("lost", 'a', "s0"),
            ],
            "s0",
            ["s2"],
        )
        .unwrap()
    }

    #[test]
    fn test_remove_unreachable() {
        let dfa = redundant_dfa();
        let pruned = Minimizer::new().remove_unreachable(&dfa);

        assert_eq!(pruned.states(), &set(&["dead", "s0", "s1", "s2"]));
        assert_eq!(pruned.num_transitions(), 8);
        assert_eq!(pruned.accepting(), &set(&["s2"]));
        assert_eq!(*pruned.start(), "s0");
        assert_eq!(pruned.alphabet(), dfa.alphabet());
    }

    #[test]
    fn test_remove_unreachable_drops_unreachable_accepting_states() {
        let dfa = Dfa::new(["a", "b"], ['x'], [("b", 'x', "a")], "a", ["b"]).unwrap();
        let pruned = Minimizer::new().remove_unreachable(&dfa);

        assert_eq!(pruned.states(), &set(&["a"]));
        assert!(pruned.accepting().is_empty());
        assert_eq!(pruned.num_transitions(), 0);
    }

    #[test]
    fn test_remove_unreachable_is_idempotent() {
        let minimizer = Minimizer::new();
        let once = minimizer.remove_unreachable(&redundant_dfa());
        let twice = minimizer.remove_unreachable(&once);

        assert_eq!(once, twice);
    }

    #[test_log::test]
    fn test_refine_partition() {
        let minimizer = Minimizer::new();
        let dfa = minimizer.remove_unreachable(&redundant_dfa());
        let mut observer = RecordingObserver::default();
        let partition = minimizer.refine_partition(&dfa, &mut observer);

        assert!(partition.same_classes(&Partition::new(vec![
            set(&["s2"]),
            set(&["s0", "s1"]),
            set(&["dead"]),
        ])));

        assert_eq!(
            observer.initial,
            Some(Partition::new(vec![set(&["s2"]), set(&["dead", "s0", "s1"])]))
        );
        // One splitting round and one confirming round
        assert_eq!(observer.rounds.len(), 2);
        assert_eq!(observer.rounds[0].0, 1);
        assert_eq!(observer.rounds[1].0, 2);
        assert_eq!(observer.stabilized, Some((2, partition)));
    }

    #[test_log::test]
    fn test_stable_partition_contains_every_new_group() {
        let minimizer = Minimizer::new();
        let dfa = minimizer.remove_unreachable(&redundant_dfa());
        let mut observer = RecordingObserver::default();
        let partition = minimizer.refine_partition(&dfa, &mut observer);

        let (_, last_round) = observer.rounds.last().unwrap();
        assert!(last_round.same_classes(&partition));
        assert!(partition.same_classes(last_round));
    }

    #[test]
    fn test_build_quotient_numbers_groups_from_start() {
        let minimizer = Minimizer::new();
        let dfa = minimizer.remove_unreachable(&redundant_dfa());
        let partition = Partition::new(vec![set(&["dead"]), set(&["s2"]), set(&["s0", "s1"])]);
        let quotient = minimizer.build_quotient(&dfa, &partition);

        let q0 = StateId::new(0);
        let q1 = StateId::new(1);
        let q2 = StateId::new(2);

        assert_eq!(*quotient.start(), q0);
        assert_eq!(quotient.num_states(), 3);
        // s0/s1 is discovered first, then s2 on 'b', then the dead state
        assert_eq!(quotient.accepting(), &BTreeSet::from([q1]));
        assert_eq!(quotient.transition(&q0, &'a'), Some(&q0));
        assert_eq!(quotient.transition(&q0, &'b'), Some(&q1));
        assert_eq!(quotient.transition(&q1, &'a'), Some(&q2));
        assert_eq!(quotient.transition(&q2, &'b'), Some(&q2));
        assert_eq!(quotient.num_transitions(), 6);
    }

    #[test_log::test]
    fn test_minimize_with_observer() {
        let mut observer = RecordingObserver::default();
        let minimal = Minimizer::new().minimize_with(&redundant_dfa(), &mut observer);

        assert_eq!(observer.pruned, vec!["lost"]);
        assert_eq!(minimal.num_states(), 3);
        assert!(minimal.recognize("aab".chars()));
        assert!(minimal.recognize("b".chars()));
        assert!(!minimal.recognize("ba".chars()));

        let q0 = StateId::new(0);
        let q1 = StateId::new(1);
        let q2 = StateId::new(2);
        assert_eq!(
            observer.merged,
            BTreeMap::from([("dead", q2), ("s0", q0), ("s1", q0), ("s2", q1)])
        );
    }

    #[test_log::test]
    fn test_minimize_with_mapping() {
        let dfa = redundant_dfa();
        let minimizer = Minimizer::new();
        let (minimal, mapping) = minimizer.minimize_with_mapping(&dfa, &mut TracingObserver);

        assert_eq!(minimal, minimizer.minimize(&dfa));
        assert!(!mapping.contains_key("lost"));
        assert_eq!(mapping[&"s0"], *minimal.start());
        assert_eq!(mapping[&"s0"], mapping[&"s1"]);

        // Every original transition lands where the mapping says it should
        for (from, symbol, to) in dfa.transitions() {
            if let Some(from_id) = mapping.get(from) {
                assert_eq!(minimal.transition(from_id, symbol), mapping.get(to));
            }
        }
        for state in dfa.accepting() {
            assert!(minimal.is_accepting(&mapping[state]));
        }
    }

    #[test_log::test]
    fn test_state_mapping_matches_quotient() {
        let minimizer = Minimizer::new();
        let dfa = minimizer.remove_unreachable(&redundant_dfa());
        let partition = minimizer.refine_partition(&dfa, &mut SilentObserver);
        let mapping = minimizer.state_mapping(&dfa, &partition);
        let quotient = minimizer.build_quotient(&dfa, &partition);

        assert_eq!(mapping.len(), dfa.num_states());
        let labels: BTreeSet<StateId> = mapping.values().copied().collect();
        assert_eq!(&labels, quotient.states());
    }

    #[test_log::test]
    fn test_observer_does_not_change_result() {
        let dfa = redundant_dfa();
        let minimizer = Minimizer::new();

        let traced = minimizer.minimize(&dfa);
        let silent = minimizer.minimize_with(&dfa, &mut SilentObserver);
        let recorded = minimizer.minimize_with(&dfa, &mut RecordingObserver::default());

        assert_eq!(traced, silent);
        assert_eq!(traced, recorded);
    }

    #[test_log::test]
    fn test_partial_states_are_not_merged_with_total_ones() {
        // x and y both accept, but only x can continue
        let dfa = Dfa::new(
            ["s", "x", "y"],
            ['a', 'b'],
            [("s", 'a', "x"), ("s", 'b', "y"), ("x", 'a', "x")],
            "s",
            ["x", "y"],
        )
        .unwrap();
        let minimal = construct_minimal_dfa(&dfa);

        assert_eq!(minimal.num_states(), 3);
        assert!(minimal.recognize("aaa".chars()));
        assert!(minimal.recognize("b".chars()));
        assert!(!minimal.recognize("ba".chars()));
    }

    #[test]
    fn test_single_state_without_transitions() {
        for accepting in [vec![], vec!["only"]] {
            let dfa = Dfa::new(["only"], ['a'], [], "only", accepting.clone()).unwrap();
            let minimal = construct_minimal_dfa(&dfa);

            assert_eq!(minimal.num_states(), 1);
            assert_eq!(minimal.num_transitions(), 0);
            assert_eq!(minimal.accepting().len(), accepting.len());
            assert_eq!(*minimal.start(), StateId::new(0));
        }
    }
}
