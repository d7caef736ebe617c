use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to every registered account.
pub const DEFAULT_ROLE: &str = "user";

/// User entity - an account the authentication gate can resolve.
///
/// Post handling never mutates users; they only back token issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(&email),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Roles embedded in the user's access tokens.
    pub fn roles(&self) -> Vec<String> {
        vec![DEFAULT_ROLE.to_string()]
    }
}

/// Canonical form under which emails are stored and looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Mask an email address for logging, e.g. `j***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let mut chars = local.chars();
            match (chars.next(), chars.next()) {
                (Some(first), Some(_)) => format!("{first}***@{domain}"),
                _ => format!("***@{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jane@example.com"), "j***@example.com");
        assert_eq!(mask_email("j@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_emails_are_stored_lowercased() {
        assert_eq!(normalize_email(" Ana@Example.COM "), "ana@example.com");

        let user = User::new("Ana@Example.com".to_string(), "hash".to_string());
        assert_eq!(user.email, "ana@example.com");
    }

    #[test]
    fn test_new_user_has_default_role() {
        let user = User::new("a@b.io".to_string(), "hash".to_string());
        assert_eq!(user.roles(), vec!["user".to_string()]);
        assert_eq!(user.created_at, user.updated_at);
    }
}
