use crate::utils::error::{Result, SchoolError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Printable characters in `value` after trimming. Control characters do not count.
pub fn printable_char_count(value: &str) -> usize {
    value.trim().chars().filter(|c| !c.is_control()).count()
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(SchoolError::Config {
            field: field_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SchoolError::Config {
            field: field_name.to_string(),
            message: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SchoolError::Config {
            field: field_name.to_string(),
            message: format!("Value must be at least {}, got {}", min_value, value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SchoolError::Config {
            field: field_name.to_string(),
            message: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(SchoolError::Config {
            field: field_name.to_string(),
            message: format!(
                "Unsupported value '{}'. Allowed values: {}",
                value,
                allowed.join(", ")
            ),
        });
    }
    Ok(())
}

/// Finite and strictly greater than zero.
pub fn validate_positive_distance(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SchoolError::Config {
            field: field_name.to_string(),
            message: format!("Distance must be a positive number of kilometers, got {}", value),
        });
    }
    Ok(())
}
