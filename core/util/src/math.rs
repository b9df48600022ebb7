//! Arithmetic helpers.

/// Arithmetic mean of the values, or `None` for an empty slice.
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_values() {
        assert_eq!(average(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_average_of_single_value() {
        assert_eq!(average(&[7.5]), Some(7.5));
    }

    #[test]
    fn test_average_of_mixed_signs() {
        assert_eq!(average(&[-2.0, 2.0]), Some(0.0));
    }

    #[test]
    fn test_average_of_empty_slice() {
        assert_eq!(average(&[]), None);
    }
}
