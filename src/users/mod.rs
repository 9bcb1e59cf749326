use async_trait::async_trait;
use serde::Serialize;

use crate::auth::Role;

#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub user_id: String,
    pub role: Role,
}

/// Credential lookup consulted by `POST /login`.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the matching user, or `None` when the email or password is wrong.
    async fn authenticate(&self, email: &str, password: &str) -> Option<UserRecord>;
}

/// Fixed in-memory user set. Plaintext, exact-match; for demos only.
#[derive(Debug, Clone)]
pub struct StaticUserDirectory {
    users: Vec<UserRecord>,
}

impl StaticUserDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    pub fn demo() -> Self {
        let user = |email: &str, password: &str, user_id: &str, role: Role| UserRecord {
            email: email.to_string(),
            password: password.to_string(),
            user_id: user_id.to_string(),
            role,
        };

        Self::new(vec![
            user("admin@example.com", "admin123", "admin-001", Role::Admin),
            user("user@example.com", "user123", "user-001", Role::User),
            user("user2@example.com", "user456", "user-002", Role::User),
        ])
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn authenticate(&self, email: &str, password: &str) -> Option<UserRecord> {
        self.users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned()
    }
}
