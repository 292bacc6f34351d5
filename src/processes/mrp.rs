use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use ndarray::Array1;
use tracing::debug;

use super::error::{MrpError, Result};
use super::helper_methods::checked_value;
use super::mp::{MP, Transitions};

/// source -> (destination -> probability, expected reward)
pub type MrpInfo<S> = HashMap<S, (HashMap<S, f64>, f64)>;

pub const DEFAULT_GAMMA: f64 = 1.0;

/// A Markov reward process: a Markov process plus one expected reward per state
/// and a discount factor.
#[derive(Debug, Clone)]
pub struct MRP<S: Clone + Eq + Hash + Ord + Debug> {
    mp: MP<S>,
    rewards: HashMap<S, f64>,
    rewards_vec: Array1<f64>,
    gamma: f64,
}

impl<S: Clone + Eq + Hash + Ord + Debug> MRP<S> {

    pub fn new(info: MrpInfo<S>, gamma: f64) -> Result<MRP<S>> {
        if !(gamma > 0.0 && gamma <= 1.0) {
            return Err(MrpError::InvalidDiscount(gamma));
        }
        let mut transitions: Transitions<S> = HashMap::with_capacity(info.len());
        let mut rewards: HashMap<S, f64> = HashMap::with_capacity(info.len());
        for (s, (v, r)) in info.into_iter() {
            let r = checked_value(&s, r, false)?.into_inner();
            rewards.insert(s.clone(), r);
            transitions.insert(s, v);
        }
        let mp = MP::new(transitions)?;
        let rewards_vec: Array1<f64> = mp.all_states().iter()
            .map(|s| rewards[s])
            .collect();
        debug!("built reward process over {} states, gamma = {}", mp.num_states(), gamma);
        Ok(MRP { mp, rewards, rewards_vec, gamma })
    }

    pub fn mp(&self) -> &MP<S> {
        &self.mp
    }

    pub fn all_states(&self) -> &[S] {
        self.mp.all_states()
    }

    pub fn trans_matrix(&self) -> &ndarray::Array2<f64> {
        self.mp.trans_matrix()
    }

    /// Expected reward per state
    pub fn rewards(&self) -> &HashMap<S, f64> {
        &self.rewards
    }

    /// Expected rewards in the canonical state ordering
    pub fn rewards_vec(&self) -> &Array1<f64> {
        &self.rewards_vec
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn info() -> MrpInfo<&'static str> {
        let mut info: MrpInfo<&'static str> = HashMap::new();
        info.insert("b", (vec![("a", 1.0)].into_iter().collect(), 2.0));
        info.insert("a", (vec![("a", 0.25), ("b", 0.75)].into_iter().collect(), -1.5));
        info
    }

    #[test]
    fn rewards_vec_follows_state_ordering() {
        let mrp = MRP::new(info(), 0.9).unwrap();
        assert_eq!(mrp.all_states(), &["a", "b"]);
        assert_eq!(mrp.rewards_vec(), &arr1(&[-1.5, 2.0]));
        assert_eq!(mrp.rewards()["b"], 2.0);
        assert_eq!(mrp.gamma(), 0.9);
        assert_eq!(mrp.trans_matrix()[[0, 1]], 0.75);
    }

    #[test]
    fn gamma_outside_unit_interval_is_rejected() {
        for gamma in &[0.0, -0.5, 1.01, f64::NAN] {
            assert!(matches!(MRP::new(info(), *gamma), Err(MrpError::InvalidDiscount(_))));
        }
        assert!(MRP::new(info(), DEFAULT_GAMMA).is_ok());
    }

    #[test]
    fn non_finite_reward_is_rejected() {
        let mut info = info();
        info.insert("b", (vec![("a", 1.0)].into_iter().collect(), f64::INFINITY));
        assert!(matches!(MRP::new(info, 1.0), Err(MrpError::MalformedSpecification { .. })));
    }
}
