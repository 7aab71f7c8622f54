use crate::prelude::*;

/// Sum of squared differences between `actual` and `expected`.
pub fn squared_error(actual: &[f64], expected: &[f64]) -> Result<f64> {
    NNError::check_len("expected output", actual.len(), expected.len())?;
    Ok(actual
        .iter()
        .zip(expected)
        .map(|(a, e)| (e - a).powi(2))
        .sum())
}

/// Mean of the squared differences, averaged over every output unit.
pub fn mean_squared_error(actual: &[f64], expected: &[f64]) -> Result<f64> {
    if actual.is_empty() {
        return Err(NNError::EmptyDataset);
    }
    Ok(squared_error(actual, expected)? / actual.len() as f64)
}
