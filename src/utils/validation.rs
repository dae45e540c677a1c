use crate::utils::error::{Result, SignError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_port(field_name: &str, port: u16) -> Result<()> {
    if port == 0 {
        return Err(SignError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: port.to_string(),
            reason: "Port must be between 1 and 65535".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SignError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SignError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive, finite number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_finite_number(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SignError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value.to_ascii_lowercase().as_str()) {
        return Err(SignError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Supported values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_port() {
        assert!(validate_port("receiver.port", 5010).is_ok());
        assert!(validate_port("receiver.port", 0).is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("rotate", 2.0).is_ok());
        assert!(validate_positive_number("rotate", 0.0).is_err());
        assert!(validate_positive_number("rotate", -1.0).is_err());
        assert!(validate_positive_number("rotate", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_finite_and_one_of() {
        assert!(validate_finite_number("fps", 500.0).is_ok());
        assert!(validate_finite_number("fps", 0.0).is_ok());
        assert!(validate_finite_number("fps", f64::NAN).is_err());
        assert!(validate_one_of("transport", "UDP", &["udp", "tcp"]).is_ok());
        assert!(validate_one_of("transport", "serial", &["udp", "tcp"]).is_err());
    }
}
