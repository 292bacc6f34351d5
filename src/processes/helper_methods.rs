use std::fmt::Debug;
use std::path::Path;
use ndarray::{Array1, Array2, Axis};
use ndarray_stats::QuantileExt;
use ordered_float::NotNan;
use super::error::{MrpError, Result};

/// Slack on the [0, 1] probability range for weights that were normalised in floating point
pub const PROBABILITY_TOLERANCE: f64 = 1e-12;

/// Reject NaN and infinite values, and probabilities outside [0, 1] (within
/// `PROBABILITY_TOLERANCE`). Infinite rewards are rejected because a zero
/// probability times an infinite reward makes the expected reward NaN.
pub fn checked_value<S: Debug>(state: &S, v: f64, probability: bool) -> Result<NotNan<f64>> {
    let value = NotNan::new(v).map_err(|_| MrpError::MalformedSpecification {
        state: format!("{:?}", state),
        reason: "value is NaN".to_string()
    })?;
    if !value.is_finite() {
        return Err(MrpError::MalformedSpecification {
            state: format!("{:?}", state),
            reason: format!("value {} is not finite", v)
        });
    }
    if probability && !(-PROBABILITY_TOLERANCE..=1.0 + PROBABILITY_TOLERANCE).contains(&value.into_inner()) {
        return Err(MrpError::MalformedSpecification {
            state: format!("{:?}", state),
            reason: format!("probability {} is outside [0, 1]", v)
        });
    }
    Ok(value)
}

/// Per-row |sum - 1| of a transition matrix
pub fn row_deviations(m: &Array2<f64>) -> Array1<f64> {
    (m.sum_axis(Axis(1)) - 1.0).mapv(f64::abs)
}

/// Largest row deviation, 0 for an empty matrix
pub fn max_row_deviation(m: &Array2<f64>) -> f64 {
    let dev = row_deviations(m);
    match dev.max() {
        Ok(x) => *x,
        Err(_) => 0.0
    }
}

/// Writes a square matrix labelled by the state ordering, one row per source state.
pub fn write_matrix_csv<S: Debug, P: AsRef<Path>>(path: P, states: &[S], m: &Array2<f64>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header: Vec<String> = vec![String::new()];
    header.extend(states.iter().map(|s| format!("{:?}", s)));
    wtr.write_record(&header)?;
    for (s, row) in states.iter().zip(m.outer_iter()) {
        let mut record: Vec<String> = vec![format!("{:?}", s)];
        record.extend(row.iter().map(|x| x.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_vector_csv<S: Debug, P: AsRef<Path>>(path: P, states: &[S], v: &Array1<f64>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&["state", "value"])?;
    for (s, x) in states.iter().zip(v.iter()) {
        wtr.write_record(&[format!("{:?}", s), x.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
