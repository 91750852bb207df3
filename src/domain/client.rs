use serde::{Deserialize, Serialize};

use crate::domain::Resource;
use crate::domain::types::ClientId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    #[serde(rename = "nome", default)]
    pub first_name: String,
    #[serde(rename = "cognome", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "cellulare", default)]
    pub mobile_phone: String,
}

impl Client {
    /// Name as shown in notifications and document titles.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Fields submitted when creating or updating a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientFields {
    #[serde(rename = "nome")]
    pub first_name: String,
    #[serde(rename = "cognome")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "cellulare")]
    pub mobile_phone: String,
}

impl Resource for Client {
    type Id = ClientId;
    type Scope = ();
    type Fields = ClientFields;

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn assemble(id: ClientId, fields: ClientFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            mobile_phone: fields.mobile_phone,
        }
    }

    fn belongs_to(&self, _scope: &()) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_reads_wire_names() {
        let client: Client = serde_json::from_str(
            r#"{"id": 1, "nome": "Mario", "cognome": "Rossi", "email": "mario.rossi@email.it", "cellulare": "333-1234567"}"#,
        )
        .unwrap();

        assert_eq!(client.id.as_str(), "1");
        assert_eq!(client.full_name(), "Mario Rossi");
        assert_eq!(client.mobile_phone, "333-1234567");
    }
}
