use crate::core::candidate::Candidate;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Company {
    pub name: String,
}

/// Entry of the remote user directory. Fields beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    #[serde(default)]
    pub phone: Option<String>,
    pub company: Company,
}

impl Candidate for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::User;
    use crate::core::candidate::Candidate;

    #[test]
    fn decodes_directory_entry_and_ignores_extra_fields() {
        let body = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": { "name": "Romaguera-Crona", "bs": "harness real-time e-markets" }
        }"#;

        let user: User = serde_json::from_str(body).expect("user should decode");
        assert_eq!(user.id(), 1);
        assert_eq!(user.name(), "Leanne Graham");
        assert_eq!(user.address.city, "Gwenborough");
        assert_eq!(user.company.name, "Romaguera-Crona");
        assert_eq!(user.phone.as_deref(), Some("1-770-736-8031 x56442"));
    }

    #[test]
    fn phone_is_optional() {
        let body = r#"{
            "id": 2,
            "name": "Ervin Howell",
            "username": "Antonette",
            "email": "Shanna@melissa.tv",
            "address": { "street": "Victor Plains", "suite": "Suite 879", "city": "Wisokyburgh" },
            "company": { "name": "Deckow-Crist" }
        }"#;

        let user: User = serde_json::from_str(body).expect("user should decode");
        assert_eq!(user.phone, None);
    }
}
