//! Form validation with per-field messages.
//!
//! Each form deserializes loosely (all strings) and is then validated into a
//! typed value, collecting every failing field instead of stopping at the
//! first one.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use bistro_core::Email;

use crate::models::ProfileUpdate;

pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const PASSWORD_MAX_LENGTH: usize = 40;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("Invalid regex"));
static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5,10}$").expect("Invalid regex"));

/// Field name to the messages for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when no errors were collected.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.keys().copied().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

fn check_email(errors: &mut FieldErrors, raw: &str) -> Option<Email> {
    match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.add("email", "Please enter a valid email address");
            None
        }
    }
}

fn check_password(errors: &mut FieldErrors, field: &'static str, password: &str) {
    let length = password.chars().count();
    if length < PASSWORD_MIN_LENGTH {
        errors.add(
            field,
            format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"),
        );
    } else if length > PASSWORD_MAX_LENGTH {
        errors.add(
            field,
            format!("Password must be at most {PASSWORD_MAX_LENGTH} characters"),
        );
    }
}

fn check_name(errors: &mut FieldErrors, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        errors.add("name", "Name is required");
    }
    name.to_owned()
}

/// Trimmed value, or `None` when blank.
fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// Sign in
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct SignIn {
    pub email: Email,
    pub password: String,
}

impl SignInForm {
    /// # Errors
    ///
    /// Returns `FieldErrors` for an invalid email or out-of-range password.
    pub fn validate(self) -> Result<SignIn, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(&mut errors, &self.email);
        check_password(&mut errors, "password", &self.password);
        match email {
            Some(email) => errors.into_result(SignIn {
                email,
                password: self.password,
            }),
            None => Err(errors),
        }
    }
}

// =============================================================================
// Sign up
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Clone)]
pub struct SignUp {
    pub name: String,
    pub email: Email,
    pub password: String,
}

impl SignUpForm {
    /// # Errors
    ///
    /// Returns `FieldErrors` for a blank name, invalid email, out-of-range
    /// password, or a confirmation that does not match.
    pub fn validate(self) -> Result<SignUp, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = check_name(&mut errors, &self.name);
        let email = check_email(&mut errors, &self.email);
        check_password(&mut errors, "password", &self.password);
        if self.confirm_password.chars().count() < PASSWORD_MIN_LENGTH {
            errors.add("confirmPassword", "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.add("confirmPassword", "Passwords do not match");
        }
        match email {
            Some(email) => errors.into_result(SignUp {
                name,
                email,
                password: self.password,
            }),
            None => Err(errors),
        }
    }
}

// =============================================================================
// Profile
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    pub phone: Option<String>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns `FieldErrors` for a blank name or a malformed phone number or
    /// postal code. Blank optional fields are accepted and cleared.
    pub fn validate(self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = check_name(&mut errors, &self.name);

        let phone = optional(self.phone.as_deref());
        if phone.as_deref().is_some_and(|p| !PHONE_RE.is_match(p)) {
            errors.add("phone", "Please enter a valid phone number");
        }
        let postal_code = optional(self.postal_code.as_deref());
        if postal_code
            .as_deref()
            .is_some_and(|p| !POSTAL_CODE_RE.is_match(p))
        {
            errors.add("postalCode", "Postal code must be 5 to 10 digits");
        }

        errors.into_result(ProfileUpdate {
            name,
            phone,
            street_address: optional(self.street_address.as_deref()),
            postal_code,
            city: optional(self.city.as_deref()),
            country: optional(self.country.as_deref()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_valid() {
        let form = SignInForm {
            email: " sara@bistro.test ".into(),
            password: "secret1".into(),
        };
        let sign_in = form.validate().unwrap();
        assert_eq!(sign_in.email.as_str(), "sara@bistro.test");
    }

    #[test]
    fn test_sign_in_collects_all_errors() {
        let form = SignInForm {
            email: "nope".into(),
            password: "123".into(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
    }

    #[test]
    fn test_password_length_bounds() {
        let at = |len: usize| SignInForm {
            email: "a@b.co".into(),
            password: "x".repeat(len),
        };
        assert!(at(5).validate().is_err());
        assert!(at(6).validate().is_ok());
        assert!(at(40).validate().is_ok());
        assert!(at(41).validate().is_err());
    }

    #[test]
    fn test_sign_up_password_mismatch() {
        let form = SignUpForm {
            name: "Sara".into(),
            email: "sara@bistro.test".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("confirmPassword"),
            Some(&["Passwords do not match".to_string()][..])
        );
    }

    #[test]
    fn test_sign_up_requires_name() {
        let form = SignUpForm {
            name: "   ".into(),
            email: "sara@bistro.test".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        assert!(form.validate().unwrap_err().get("name").is_some());
    }

    #[test]
    fn test_profile_accepts_blank_optionals() {
        let form = ProfileForm {
            name: "Sara".into(),
            phone: Some("  ".into()),
            ..ProfileForm::default()
        };
        let update = form.validate().unwrap();
        assert_eq!(update.phone, None);
    }

    #[test]
    fn test_profile_phone_and_postal_code() {
        let valid = ProfileForm {
            name: "Sara".into(),
            phone: Some("+201234567890".into()),
            postal_code: Some("12345".into()),
            ..ProfileForm::default()
        };
        assert!(valid.validate().is_ok());

        let invalid = ProfileForm {
            name: "Sara".into(),
            phone: Some("0123".into()),
            postal_code: Some("12a45".into()),
            ..ProfileForm::default()
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.get("phone").is_some());
        assert!(errors.get("postalCode").is_some());
    }

    #[test]
    fn test_field_errors_serialize_as_object() {
        let mut errors = FieldErrors::default();
        errors.add("email", "bad");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "email": ["bad"] }));
    }
}
