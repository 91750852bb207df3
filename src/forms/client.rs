use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{Client, ClientFields};
use crate::forms::{FormError, trim_in_place};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Validate)]
/// Form data for adding or editing a client.
pub struct ClientForm {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub mobile_phone: String,
}

impl From<&Client> for ClientForm {
    /// Pre-populates the edit dialog from an existing record.
    fn from(client: &Client) -> Self {
        Self {
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            email: client.email.clone(),
            mobile_phone: client.mobile_phone.clone(),
        }
    }
}

impl TryFrom<&ClientForm> for ClientFields {
    type Error = FormError;

    fn try_from(form: &ClientForm) -> Result<Self, Self::Error> {
        let mut form = form.clone();
        trim_in_place(&mut form.first_name);
        trim_in_place(&mut form.last_name);
        trim_in_place(&mut form.email);
        trim_in_place(&mut form.mobile_phone);
        form.validate()?;

        Ok(Self {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            mobile_phone: form.mobile_phone,
        })
    }
}
