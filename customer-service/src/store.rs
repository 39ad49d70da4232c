use chrono::{DateTime, Utc};
use common_security::Owned;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl Owned for Customer {
    // Ownership is matched on the customer's email address.
    fn owner(&self) -> &str {
        &self.email
    }
}

/// Seeded in-memory customer store; stands in for the customer table.
pub struct CustomerStore {
    customers: Vec<Customer>,
}

impl CustomerStore {
    pub fn with_default_seed() -> Self {
        let seed = [
            (1, "Test User-unvrfd", "test.user-unvrfd@example.com", "+1234567891"),
            (2, "Test User-vrfd", "test.user-vrfd@example.com", "+1234567892"),
            (3, "Test User", "test.user@example.com", "+1234567893"),
            (4, "Test User-cm", "test.user-cm@example.com", "+1234567894"),
            (5, "Test User-pm", "test.user-pm@example.com", "+1234567895"),
            (6, "Test User-pcm", "test.user-pcm@example.com", "+1234567896"),
            (7, "Admin User", "admin.user@example.com", "+1234567897"),
        ];
        let customers = seed
            .into_iter()
            .map(|(id, name, email, phone)| Customer {
                id,
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                created_at: Utc::now(),
            })
            .collect();
        Self { customers }
    }

    pub fn all(&self) -> Vec<Customer> {
        self.customers.clone()
    }

    pub fn by_id(&self, id: u32) -> Option<Customer> {
        self.customers.iter().find(|c| c.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
