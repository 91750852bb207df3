use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::{FormError, trim_in_place};

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Credentials typed into the login prompt.
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body posted to the authentication endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

impl TryFrom<&LoginForm> for LoginPayload {
    type Error = FormError;

    /// The username is trimmed; the password is sent as typed but must not be
    /// blank.
    fn try_from(form: &LoginForm) -> Result<Self, Self::Error> {
        let mut username = form.username.clone();
        trim_in_place(&mut username);
        let checked = LoginForm {
            username,
            password: if form.password.trim().is_empty() {
                String::new()
            } else {
                form.password.clone()
            },
        };
        checked.validate()?;

        Ok(Self {
            username: checked.username,
            password: checked.password,
        })
    }
}
