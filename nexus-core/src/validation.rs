//! Client-side form validation
//!
//! Checked before any network call; a form that fails here never
//! reaches the credential or profile service. Rules and messages match
//! the dashboard's sign-in, registration and password forms.

use std::collections::BTreeMap;

/// Per-field error messages, keyed by field name
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required".into());
        }
        if self.password.is_empty() {
            errors.insert("password", "Password is required".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_terms: bool,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.username.trim().is_empty() {
            errors.insert("username", "Username is required".into());
        }

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required".into());
        } else if !looks_like_email(&self.email) {
            errors.insert("email", "Email is invalid".into());
        }

        if self.password.is_empty() {
            errors.insert("password", "Password is required".into());
        } else if self.password.len() < 8 {
            errors.insert("password", "Password must be at least 8 characters".into());
        }

        if self.password != self.confirm_password {
            errors.insert("confirm_password", "Passwords do not match".into());
        }

        if !self.agree_terms {
            errors.insert(
                "agree_terms",
                "You must agree to the terms and conditions".into(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub current: String,
    pub new_password: String,
    pub confirm: String,
}

impl PasswordChange {
    /// Single-message validation, matching the profile page behavior
    pub fn validate(&self) -> Result<(), String> {
        if self.new_password != self.confirm {
            return Err("New passwords do not match".into());
        }
        if self.new_password.len() < 8 {
            return Err("New password must be at least 8 characters long".into());
        }
        Ok(())
    }
}

/// Shape check only: non-space run, '@', non-space run, '.', non-space
/// run. Real address validation belongs to the server.
fn looks_like_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterForm {
        RegisterForm {
            username: "nova".into(),
            email: "nova@nexus.io".into(),
            password: "secret123".into(),
            confirm_password: "secret123".into(),
            agree_terms: true,
        }
    }

    #[test]
    fn test_valid_register_passes() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn test_register_collects_all_field_errors() {
        let form = RegisterForm::default();
        let errors = form.validate().unwrap_err();
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
        assert!(errors.contains_key("agree_terms"));
    }

    #[test]
    fn test_short_password_rejected() {
        let form = RegisterForm {
            password: "short".into(),
            confirm_password: "short".into(),
            ..valid_register()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("password").unwrap(),
            "Password must be at least 8 characters"
        );
    }

    #[test]
    fn test_password_mismatch_rejected() {
        let form = RegisterForm {
            confirm_password: "different1".into(),
            ..valid_register()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.contains_key("confirm_password"));
    }

    #[test]
    fn test_email_shapes() {
        assert!(looks_like_email("a@b.co"));
        assert!(looks_like_email("first.last@sub.domain.org"));
        assert!(!looks_like_email("missing-at.com"));
        assert!(!looks_like_email("@no-local.com"));
        assert!(!looks_like_email("no-dot@domain"));
        assert!(!looks_like_email("spaced out@domain.com"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(LoginForm {
            email: "a@b.co".into(),
            password: "pw".into(),
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_password_change_rules() {
        let ok = PasswordChange {
            current: "oldpassword".into(),
            new_password: "newpassword".into(),
            confirm: "newpassword".into(),
        };
        assert!(ok.validate().is_ok());

        let mismatch = PasswordChange {
            confirm: "other".into(),
            ..ok.clone()
        };
        assert_eq!(mismatch.validate().unwrap_err(), "New passwords do not match");

        let short = PasswordChange {
            new_password: "short".into(),
            confirm: "short".into(),
            ..ok
        };
        assert_eq!(
            short.validate().unwrap_err(),
            "New password must be at least 8 characters long"
        );
    }
}
