//! Input validation helpers
//!
//! Centralized text length constants and validation functions. Checks that
//! can fail together go through [`Checks`] so the client receives every
//! reason at once.

use shared::error::{AppError, AppResult, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, section, publisher, contributor, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, review text, order comments
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: ISBN, cover type, company id, city, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Trim and lower-case, then require `local@domain.tld`.
pub fn normalize_email(value: &str) -> AppResult<String> {
    let email = value.trim().to_lowercase();
    let valid = email.len() <= MAX_EMAIL_LEN
        && !email.chars().any(char::is_whitespace)
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain
                        .rsplit_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
            });
    if !valid {
        return Err(AppError::validation(format!("Invalid email: {value}")));
    }
    Ok(email)
}

/// Canonical `+<digits>` phone number.
///
/// Spaces, dashes, dots and parentheses are dropped, a leading `00` becomes
/// `+`, and the result must carry 10 to 15 digits.
pub fn normalize_phone(value: &str) -> AppResult<String> {
    let stripped: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    let digits = if let Some(rest) = stripped.strip_prefix('+') {
        rest
    } else if let Some(rest) = stripped.strip_prefix("00") {
        rest
    } else {
        stripped.as_str()
    };
    if !(10..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::with_message(
            ErrorCode::InvalidPhoneNumber,
            format!("Invalid phone number: {value}"),
        ));
    }
    Ok(format!("+{digits}"))
}

/// Whether `login` looks like an email rather than a phone number
pub fn is_email_login(login: &str) -> bool {
    login.contains('@')
}

pub fn validate_password(value: &str) -> AppResult<()> {
    let len = value.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::validation(format!(
            "password must be {MIN_PASSWORD_LEN} to {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Accumulates failed checks into one validation error
#[derive(Debug, Default)]
pub struct Checks {
    reasons: Vec<String>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failure of `result`, if any
    pub fn check(&mut self, result: AppResult<()>) -> &mut Self {
        if let Err(err) = result {
            if err.reasons.is_empty() {
                self.reasons.push(err.message);
            } else {
                self.reasons.extend(err.reasons);
            }
        }
        self
    }

    /// Record `reason` unless `ok`
    pub fn ensure(&mut self, ok: bool, reason: impl Into<String>) -> &mut Self {
        if !ok {
            self.reasons.push(reason.into());
        }
        self
    }

    pub fn finish(&mut self) -> AppResult<()> {
        if self.reasons.is_empty() {
            return Ok(());
        }
        Err(AppError::validation_many(std::mem::take(&mut self.reasons)))
    }
}
