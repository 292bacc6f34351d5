use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use itertools::Itertools;
use ndarray::{Array1, Array2};
use tracing::{debug, trace};

use super::error::{MrpError, Result};
use super::helper_methods::checked_value;
use super::mp::{MP, Transitions};
use super::mrp::{MRP, MrpInfo, DEFAULT_GAMMA};

/// source -> destination -> (probability, reward)
pub type RefinedInfo<S> = HashMap<S, HashMap<S, (f64, f64)>>;

/// The three views derived from a refined specification
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo<S: Eq + Hash> {
    pub transitions: Transitions<S>,
    pub rewards_refined: Transitions<S>,
    pub rewards: HashMap<S, f64>,
}

/// Splits each (probability, reward) pair into a probability model and a reward
/// model with the same keys, and computes each source state's expected reward
/// as the probability weighted sum of its transition rewards, accumulated in
/// destination order so repeated splits agree bit for bit.
pub fn split_info<S: Clone + Eq + Hash + Ord + Debug>(info: &RefinedInfo<S>) -> Result<SplitInfo<S>> {
    let mut transitions: Transitions<S> = HashMap::with_capacity(info.len());
    let mut rewards_refined: Transitions<S> = HashMap::with_capacity(info.len());
    let mut rewards: HashMap<S, f64> = HashMap::with_capacity(info.len());
    for (s, v) in info.iter() {
        if v.is_empty() {
            return Err(MrpError::MalformedSpecification {
                state: format!("{:?}", s),
                reason: "state has no outgoing transitions".to_string()
            });
        }
        let mut p_s: HashMap<S, f64> = HashMap::with_capacity(v.len());
        let mut r_s: HashMap<S, f64> = HashMap::with_capacity(v.len());
        let mut expected: f64 = 0.0;
        for (sprime, (p, r)) in v.iter().sorted_by_key(|(x, _)| *x) {
            let p = checked_value(s, *p, true)?.into_inner();
            let r = checked_value(s, *r, false)?.into_inner();
            expected += p * r;
            p_s.insert(sprime.clone(), p);
            r_s.insert(sprime.clone(), r);
        }
        transitions.insert(s.clone(), p_s);
        rewards_refined.insert(s.clone(), r_s);
        rewards.insert(s.clone(), expected);
    }
    Ok(SplitInfo { transitions, rewards_refined, rewards })
}

/// Dense n x n matrix of transition rewards aligned to `all_states`; cells with
/// no transition stay 0. Every destination must be present in `state_index`.
pub fn rewards_refined_matrix<S: Eq + Hash + Debug>(all_states: &[S], state_index: &HashMap<S, usize>,
                                                    rewards_refined: &Transitions<S>) -> Result<Array2<f64>> {
    let n = all_states.len();
    let mut m: Array2<f64> = Array2::zeros((n, n));
    for (i, s) in all_states.iter().enumerate() {
        let row = match rewards_refined.get(s) {
            None => return Err(MrpError::StateNotFound(format!("{:?}", s))),
            Some(x) => x
        };
        for (sprime, r) in row.iter() {
            let j = match state_index.get(sprime) {
                None => {
                    return Err(MrpError::UnknownState {
                        state: format!("{:?}", sprime),
                        from: format!("{:?}", s)
                    })
                }
                Some(j) => *j
            };
            trace!("R({:?} -> {:?}) = {}", s, sprime, r);
            m[[i, j]] = *r;
        }
    }
    Ok(m)
}

/// A Markov reward process whose rewards are attached to individual
/// transitions rather than only to the source state.
///
/// The base process is built from the split probabilities and expected rewards
/// and owns the state ordering. The refined reward matrix reuses that ordering.
#[derive(Debug, Clone)]
pub struct MRPRefined<S: Clone + Eq + Hash + Ord + Debug> {
    mrp: MRP<S>,
    rewards_refined: Transitions<S>,
    rewards_refined_matrix: Array2<f64>,
}

impl<S: Clone + Eq + Hash + Ord + Debug> MRPRefined<S> {

    pub fn new(info: &RefinedInfo<S>, gamma: f64) -> Result<MRPRefined<S>> {
        let SplitInfo { transitions, rewards_refined, mut rewards } = split_info(info)?;
        let mrp_info: MrpInfo<S> = transitions.into_iter()
            .map(|(s, v)| {
                let r = rewards.remove(&s).unwrap_or(0.0);
                (s, (v, r))
            })
            .collect();
        let mrp = MRP::new(mrp_info, gamma)?;
        let rewards_refined_matrix = rewards_refined_matrix(
            mrp.all_states(), mrp.mp().state_index_map(), &rewards_refined)?;
        debug!("built refined reward process over {} states", mrp.all_states().len());
        Ok(MRPRefined { mrp, rewards_refined, rewards_refined_matrix })
    }

    pub fn with_default_gamma(info: &RefinedInfo<S>) -> Result<MRPRefined<S>> {
        MRPRefined::new(info, DEFAULT_GAMMA)
    }

    pub fn mrp(&self) -> &MRP<S> {
        &self.mrp
    }

    pub fn mp(&self) -> &MP<S> {
        self.mrp.mp()
    }

    pub fn all_states(&self) -> &[S] {
        self.mrp.all_states()
    }

    pub fn trans_matrix(&self) -> &Array2<f64> {
        self.mrp.trans_matrix()
    }

    pub fn rewards_vec(&self) -> &Array1<f64> {
        self.mrp.rewards_vec()
    }

    pub fn gamma(&self) -> f64 {
        self.mrp.gamma()
    }

    pub fn rewards_refined(&self) -> &Transitions<S> {
        &self.rewards_refined
    }

    pub fn rewards_refined_matrix(&self) -> &Array2<f64> {
        &self.rewards_refined_matrix
    }
}
