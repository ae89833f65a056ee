use crate::errors::ExeTreeError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

pub fn fmt_vec_output(v: &[f64]) -> String {
    let mut res = String::new();
    if let Some(last) = v.len().checked_sub(1) {
        if last == 0 {
            return format!("{:.4}", v[0]);
        }
        for n in &v[..last] {
            res.push_str(format!("{:.4}", n).as_str());
            res.push_str(", ");
        }
        res.push_str(format!("{:.4}", &v[last]).as_str());
    }
    res
}

// Validation
pub fn validate_min_usize_parameter(value: usize, min: usize, parameter: &str) -> Result<(), ExeTreeError> {
    if value < min {
        Err(ExeTreeError::InvalidParameter(
            parameter.to_string(),
            format!("an integer of at least {}", min),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_to_strings() {
        assert_eq!(items_to_strings(vec!["Value", "Path"]), "Value, Path, ");
    }

    #[test]
    fn test_fmt_vec_output() {
        assert_eq!(fmt_vec_output(&[]), "");
        assert_eq!(fmt_vec_output(&[1.0]), "1.0000");
        assert_eq!(fmt_vec_output(&[1.0, 0.25]), "1.0000, 0.2500");
    }

    #[test]
    fn test_validate_min_usize_parameter() {
        assert!(validate_min_usize_parameter(1, 1, "batch_size").is_ok());
        assert_eq!(
            validate_min_usize_parameter(0, 1, "batch_size"),
            Err(ExeTreeError::InvalidParameter(
                "batch_size".to_string(),
                "an integer of at least 1".to_string(),
                "0".to_string()
            ))
        );
    }
}
