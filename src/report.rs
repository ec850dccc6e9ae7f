use crate::fa::FA;
use petgraph::dot::Dot;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::prelude::StableGraph;
use std::collections::BTreeMap;
use std::fmt::{self, Display};

fn format_set<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let items: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    format!("{{{}}}", items.join(", "))
}

/// Textual report of a finite automaton: states, alphabet, start state, accepting states and
/// every transition, ordered by state and then by symbol.
pub struct Description<'a, T>(pub &'a T);

impl<T: FA> Display for Description<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fa = self.0;

        writeln!(f, "States: {}", format_set(fa.get_states()))?;
        writeln!(f, "Alphabet: {}", format_set(fa.get_alphabet()))?;
        writeln!(f, "Start state: {}", fa.get_start_state())?;
        writeln!(f, "Accepting states: {}", format_set(fa.get_acceptor_states()))?;
        writeln!(f, "Transitions:")?;

        for state in fa.get_states() {
            for (symbol, target) in fa.get_state_transitions(state) {
                writeln!(f, "  δ({}, {}) = {}", state, symbol, target)?;
            }
        }

        Ok(())
    }
}

/// Describe the finite automaton provided, see [`Description`].
pub fn describe<T: FA>(fa: &T) -> String {
    Description(fa).to_string()
}

/// One `state -> label` line per original state, in state order.
pub fn describe_mapping<Q: Display, R: Display>(mapping: &BTreeMap<Q, R>) -> String {
    mapping
        .iter()
        .map(|(state, label)| format!("  {} -> {}\n", state, label))
        .collect()
}

/// Render the finite automaton provided in Graphviz dot format. Parallel edges between two
/// states are merged into one edge labelled with all of their symbols.
pub fn to_dot<T: FA>(fa: &T) -> String {
    let mut stable_graph: StableGraph<String, String> = StableGraph::new();

    let mut node_map: BTreeMap<&T::State, NodeIndex> = BTreeMap::new();

    for state in fa.get_states() {
        let mut node_label = state.to_string();

        if state == fa.get_start_state() {
            node_label = format!("→ {}", node_label);
        }
        if fa.get_acceptor_states().contains(state) {
            node_label = format!("({})", node_label);
        }

        node_map.insert(state, stable_graph.add_node(node_label));
    }

    let mut edge_map: BTreeMap<(NodeIndex, NodeIndex), EdgeIndex> = BTreeMap::new();

    for state in fa.get_states() {
        for (symbol, target) in fa.get_state_transitions(state) {
            let (Some(&source_node), Some(&target_node)) = (node_map.get(state), node_map.get(target))
            else {
                continue;
            };

            match edge_map.get(&(source_node, target_node)) {
                Some(&edge_idx) => {
                    let old_label = &stable_graph[edge_idx];
                    stable_graph[edge_idx] = format!("{}, {}", old_label, symbol);
                }
                None => {
                    let edge_idx =
                        stable_graph.add_edge(source_node, target_node, symbol.to_string());
                    edge_map.insert((source_node, target_node), edge_idx);
                }
            }
        }
    }

    Dot::new(&stable_graph).to_string()
}

/// State and transition counts before and after minimizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionSummary {
    pub states_before: usize,
    pub states_after: usize,
    pub transitions_before: usize,
    pub transitions_after: usize,
}

impl ReductionSummary {
    pub fn between<T: FA, U: FA>(before: &T, after: &U) -> Self {
        ReductionSummary {
            states_before: before.get_num_states(),
            states_after: after.get_num_states(),
            transitions_before: before.get_num_transitions(),
            transitions_after: after.get_num_transitions(),
        }
    }

    pub fn states_removed(&self) -> usize {
        self.states_before.saturating_sub(self.states_after)
    }

    pub fn transitions_removed(&self) -> usize {
        self.transitions_before.saturating_sub(self.transitions_after)
    }
}

impl Display for ReductionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "States: {} -> {}", self.states_before, self.states_after)?;
        write!(
            f,
            "Transitions: {} -> {}",
            self.transitions_before, self.transitions_after
        )
    }
}
