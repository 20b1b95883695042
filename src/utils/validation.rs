use crate::utils::error::{Result, VocalisError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(VocalisError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(VocalisError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(VocalisError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    // 簡單格式檢查，不做 RFC 5322 全解析
    let re = regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    if re.is_match(email) {
        Ok(())
    } else {
        Err(VocalisError::ValidationError {
            message: format!("{field_name} is not a valid email address"),
        })
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VocalisError::ValidationError {
            message: format!("{field_name} cannot be empty or whitespace-only"),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(VocalisError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(VocalisError::ValidationError {
            message: format!("{field_name} must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("metronome.api_url", "https://api.metronome.com").is_ok());
        assert!(validate_url("metronome.api_url", "http://localhost:8000").is_ok());
        assert!(validate_url("metronome.api_url", "").is_err());
        assert!(validate_url("metronome.api_url", "invalid-url").is_err());
        assert!(validate_url("metronome.api_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "alex@example.com").is_ok());
        assert!(validate_email("email", "alex+tag@sub.example.co").is_ok());
        assert!(validate_email("email", "not-an-email").is_err());
        assert!(validate_email("email", "a b@example.com").is_err());
        assert!(validate_email("email", "missing@tld").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("full_name", "Alex Chen").is_ok());
        assert!(validate_non_empty_string("full_name", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("amount", 50.0, 5.0, 500.0).is_ok());
        assert!(validate_range("amount", 4.99, 5.0, 500.0).is_err());
        assert!(validate_range("amount", 500.01, 5.0, 500.0).is_err());
    }
}
