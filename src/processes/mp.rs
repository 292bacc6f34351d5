use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use itertools::Itertools;
use ndarray::Array2;
use petgraph::{Graph, graph::NodeIndex};
use tracing::{debug, trace, warn};

use super::error::{MrpError, Result};
use super::helper_methods::*;

const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// source -> destination -> probability
pub type Transitions<S> = HashMap<S, HashMap<S, f64>>;

/// A finite Markov process.
///
/// The state ordering is the sorted set of source states. It is fixed at
/// construction and indexes every matrix derived from the process.
#[derive(Debug, Clone)]
pub struct MP<S: Clone + Eq + Hash + Ord + Debug> {
    transitions: Transitions<S>,
    all_states: Vec<S>,
    state_index: HashMap<S, usize>,
    trans_matrix: Array2<f64>,
}

impl<S: Clone + Eq + Hash + Ord + Debug> MP<S> {

    /// Every destination must also appear as a source. Probabilities are checked for
    /// range only; rows that do not sum to one are accepted and reported with `warn!`.
    pub fn new(transitions: Transitions<S>) -> Result<MP<S>> {
        if transitions.is_empty() {
            return Err(MrpError::EmptyProcess);
        }
        for (s, v) in transitions.iter() {
            if v.is_empty() {
                return Err(MrpError::MalformedSpecification {
                    state: format!("{:?}", s),
                    reason: "state has no outgoing transitions".to_string()
                });
            }
            for p in v.values() {
                checked_value(s, *p, true)?;
            }
        }
        let all_states: Vec<S> = transitions.keys().cloned().sorted().collect();
        let state_index: HashMap<S, usize> = all_states.iter().cloned()
            .enumerate()
            .map(|(i, s)| (s, i))
            .collect();
        let trans_matrix = MP::build_trans_matrix(&all_states, &state_index, &transitions)?;
        let mp = MP { transitions, all_states, state_index, trans_matrix };
        for (i, dev) in row_deviations(&mp.trans_matrix).iter().enumerate() {
            if *dev > ROW_SUM_TOLERANCE {
                warn!("transitions out of {:?} sum to {}", mp.all_states[i], mp.trans_matrix.row(i).sum());
            }
        }
        debug!("built Markov process with {} states", mp.all_states.len());
        Ok(mp)
    }

    fn build_trans_matrix(all_states: &[S], state_index: &HashMap<S, usize>, transitions: &Transitions<S>)
        -> Result<Array2<f64>> {
        let n = all_states.len();
        let mut m: Array2<f64> = Array2::zeros((n, n));
        for (i, s) in all_states.iter().enumerate() {
            for (sprime, p) in transitions[s].iter() {
                let j = match state_index.get(sprime) {
                    None => {
                        return Err(MrpError::UnknownState {
                            state: format!("{:?}", sprime),
                            from: format!("{:?}", s)
                        })
                    }
                    Some(j) => *j
                };
                trace!("P({:?} -> {:?}) = {}", s, sprime, p);
                m[[i, j]] = *p;
            }
        }
        Ok(m)
    }

    pub fn all_states(&self) -> &[S] {
        &self.all_states
    }

    pub fn num_states(&self) -> usize {
        self.all_states.len()
    }

    pub fn state_index(&self, s: &S) -> Option<usize> {
        self.state_index.get(s).copied()
    }

    pub fn index_of(&self, s: &S) -> Result<usize> {
        self.state_index(s).ok_or_else(|| MrpError::StateNotFound(format!("{:?}", s)))
    }

    /// The full state -> position map, in the same ordering as `all_states`
    pub fn state_index_map(&self) -> &HashMap<S, usize> {
        &self.state_index
    }

    pub fn transitions(&self) -> &Transitions<S> {
        &self.transitions
    }

    pub fn trans_matrix(&self) -> &Array2<f64> {
        &self.trans_matrix
    }

    /// States whose only transition is back to themselves
    pub fn sink_states(&self) -> Vec<S> {
        self.all_states.iter()
            .filter(|s| {
                let v = &self.transitions[*s];
                v.len() == 1 && v.contains_key(*s)
            })
            .cloned()
            .collect()
    }

    pub fn row_sum_deviation(&self) -> f64 {
        max_row_deviation(&self.trans_matrix)
    }

    /// Fails on the first state (in canonical order) whose outgoing probabilities
    /// do not sum to one within `tolerance`.
    pub fn check_normalised(&self, tolerance: f64) -> Result<()> {
        for (i, dev) in row_deviations(&self.trans_matrix).iter().enumerate() {
            if *dev > tolerance {
                return Err(MrpError::NotNormalised {
                    state: format!("{:?}", self.all_states[i]),
                    sum: self.trans_matrix.row(i).sum(),
                    tolerance
                });
            }
        }
        Ok(())
    }

    /// Node i is the i-th state of the canonical ordering; edges carry the probability.
    pub fn generate_graph(&self) -> Graph<String, String> {
        let mut g: Graph<String, String> = Graph::new();
        for state in self.all_states.iter() {
            g.add_node(format!("{:?}", state));
        }
        for (i, s) in self.all_states.iter().enumerate() {
            for (sprime, p) in self.transitions[s].iter().sorted_by_key(|(x, _)| *x) {
                let j = self.state_index[sprime];
                g.add_edge(NodeIndex::new(i), NodeIndex::new(j), format!("{}", p));
            }
        }
        g
    }
}
