use serde::Deserialize;
use validator::Validate;

use crate::errors::FieldErrors;
use crate::names::title_case;

const REQUIRED: &str = "This field is required.";
const MIN_PASSWORD_LEN: usize = 8;

/// Raw signup submission. Every field defaults to empty so missing inputs
/// surface as field errors instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 30, message = "Ensure this value has 1 to 30 characters."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30, message = "Ensure this value has 1 to 30 characters."))]
    pub last_name: String,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Ensure this value has at most 254 characters.")
    )]
    pub email: String,
    pub password1: String,
    pub password2: String,
    pub class_year: String,
}

/// A signup that passed every check that does not need the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSignup {
    pub first_name: String,
    pub last_name: String,
    /// Trimmed and lower-cased.
    pub email: String,
    pub password: String,
    pub class_year: String,
}

impl SignupForm {
    /// Validates the form against the class-year choices offered right now.
    pub fn clean(self, class_year_choices: &[String]) -> Result<CleanSignup, FieldErrors> {
        let form = SignupForm {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            class_year: self.class_year.trim().to_string(),
            ..self
        };

        let mut errors = FieldErrors::new();
        if let Err(validation) = form.validate() {
            for (field, field_errors) in validation.field_errors() {
                // A blank email is reported once, as missing.
                if field == "email" && form.email.is_empty() {
                    continue;
                }
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({}).", error.code));
                    errors.add(&field, message);
                }
            }
        }
        if form.email.is_empty() {
            errors.add("email", REQUIRED);
        }

        for message in password_problems(&form.password1, &form.password2, &form.email) {
            errors.add(
                if form.password1.is_empty() { "password1" } else { "password2" },
                message,
            );
        }

        if form.class_year.is_empty() {
            errors.add("class_year", REQUIRED);
        } else if !class_year_choices.contains(&form.class_year) {
            errors.add(
                "class_year",
                format!(
                    "Select a valid choice. {} is not one of the available choices.",
                    form.class_year
                ),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CleanSignup {
            first_name: title_case(&form.first_name),
            last_name: title_case(&form.last_name),
            email: form.email,
            password: form.password1,
            class_year: form.class_year,
        })
    }
}

/// Credential policy: confirmation must match, at least eight characters,
/// not all digits, and not the email or its local part.
pub fn password_problems(password1: &str, password2: &str, email: &str) -> Vec<String> {
    if password1.is_empty() {
        return vec![REQUIRED.to_string()];
    }
    if password1 != password2 {
        return vec!["The two password fields didn't match.".to_string()];
    }

    let mut problems = Vec::new();
    if password1.chars().count() < MIN_PASSWORD_LEN {
        problems.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."
        ));
    }
    if password1.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }
    let lowered = password1.to_lowercase();
    let local_part = email.split('@').next().unwrap_or_default();
    if !email.is_empty() && (lowered == email || (!local_part.is_empty() && lowered == local_part))
    {
        problems.push("The password is too similar to the email address.".to_string());
    }
    problems
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// The account email.
    pub username: String,
    pub password: String,
}
