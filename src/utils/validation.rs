use crate::utils::error::{Result, ShowtimeError};
use chrono::NaiveDate;
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ShowtimeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ShowtimeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ShowtimeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ShowtimeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ShowtimeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    if files.is_empty() {
        return Err(ShowtimeError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(extension) {
                return Err(ShowtimeError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(ShowtimeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShowtimeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
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
        return Err(ShowtimeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Accepts both the dashed form Lotte uses and the compact form Megabox uses.
pub fn parse_play_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y%m%d"))
        .map_err(|_| ShowtimeError::InvalidDate {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("megabox.endpoint", "https://example.com").is_ok());
        assert!(validate_url("megabox.endpoint", "http://example.com").is_ok());
        assert!(validate_url("megabox.endpoint", "").is_err());
        assert!(validate_url("megabox.endpoint", "invalid-url").is_err());
        assert!(validate_url("megabox.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 30u64, 1, 300).is_ok());
        assert!(validate_range("timeout_seconds", 0u64, 1, 300).is_err());
        assert!(validate_range("timeout_seconds", 301u64, 1, 300).is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["megabox_movie.csv".to_string()];
        assert!(validate_file_extensions("movie.files", &files, &["csv"]).is_ok());

        let invalid_files = vec!["movies.xlsx".to_string()];
        assert!(validate_file_extensions("movie.files", &invalid_files, &["csv"]).is_err());

        assert!(matches!(
            validate_file_extensions("movie.files", &[], &["csv"]),
            Err(ShowtimeError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_parse_play_date_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        assert_eq!(parse_play_date("2026-01-14").unwrap(), expected);
        assert_eq!(parse_play_date("20260114").unwrap(), expected);
        assert_eq!(parse_play_date(" 20260114 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_play_date_rejects_garbage() {
        assert!(matches!(
            parse_play_date("2026/01/14"),
            Err(ShowtimeError::InvalidDate { .. })
        ));
        assert!(parse_play_date("20261340").is_err());
    }
}
