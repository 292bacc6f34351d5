extern crate serde_json;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::fs::File;
use std::hash::Hash;
use std::io::BufReader;
use std::path::Path;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub mod processes;

pub use processes::error::{MrpError, Result};
pub use processes::mp::{MP, Transitions};
pub use processes::mrp::{MRP, MrpInfo, DEFAULT_GAMMA};
pub use processes::mrp_refined::{MRPRefined, RefinedInfo, SplitInfo, split_info, rewards_refined_matrix};

/// A refined reward process as read from JSON
/// ```text
/// {
///   "gamma": 0.95,
///   "transitions": [
///     {"s": 1, "s_prime": [{"s": 1, "p": 0.3, "r": 9.2}, {"s": 2, "p": 0.7, "r": 3.4}]},
///     {"s": 2, "s_prime": [{"s": 2, "p": 1.0, "r": 0.0}]}
///   ]
/// }
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct RefinedModel<S> {
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    pub transitions: Vec<RefinedTransition<S>>
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefinedTransition<S> {
    pub s: S,
    pub s_prime: Vec<RefinedTransitionPair<S>>
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefinedTransitionPair<S> {
    pub s: S,
    pub p: f64,
    pub r: f64
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

impl<S: Clone + Eq + Hash + Debug> RefinedModel<S> {
    /// Nested source -> destination -> (p, r) map; a source or a destination listed
    /// twice under the same source is an error.
    pub fn to_info(&self) -> Result<RefinedInfo<S>> {
        let mut info: RefinedInfo<S> = HashMap::with_capacity(self.transitions.len());
        for t in self.transitions.iter() {
            let mut v: HashMap<S, (f64, f64)> = HashMap::with_capacity(t.s_prime.len());
            for pair in t.s_prime.iter() {
                match v.entry(pair.s.clone()) {
                    Entry::Occupied(_) => {
                        return Err(MrpError::DuplicateState(format!("{:?} -> {:?}", t.s, pair.s)))
                    }
                    Entry::Vacant(e) => { e.insert((pair.p, pair.r)); }
                }
            }
            match info.entry(t.s.clone()) {
                Entry::Occupied(_) => return Err(MrpError::DuplicateState(format!("{:?}", t.s))),
                Entry::Vacant(e) => { e.insert(v); }
            }
        }
        Ok(info)
    }
}

impl<S: Clone + Eq + Hash + Ord + Debug> RefinedModel<S> {
    pub fn build(&self) -> Result<MRPRefined<S>> {
        MRPRefined::new(&self.to_info()?, self.gamma)
    }
}

pub fn read_refined_json<S: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<RefinedModel<S>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let u = serde_json::from_reader(reader)?;
    Ok(u)
}

pub fn parse_refined_json<S: DeserializeOwned>(s: &str) -> Result<RefinedModel<S>> {
    let u: RefinedModel<S> = serde_json::from_str(s)?;
    Ok(u)
}
