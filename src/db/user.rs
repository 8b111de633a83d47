//! User model for filedepot.

/// A user owning files and a storage quota.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Username (unique).
    pub username: String,
    /// Remaining storage allowance in megabytes.
    pub remaining_size: f64,
    /// Account creation timestamp.
    pub created_at: String,
}

impl User {
    /// Check whether `size_mb` more megabytes fit in this user's quota.
    pub fn has_room_for(&self, size_mb: f64) -> bool {
        size_mb <= self.remaining_size
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Username.
    pub username: String,
    /// Initial storage allowance in megabytes.
    pub remaining_size: f64,
}

impl NewUser {
    /// Create a new NewUser.
    pub fn new(username: impl Into<String>, remaining_size: f64) -> Self {
        Self {
            username: username.into(),
            remaining_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = NewUser::new("alice", 10.0);
        assert_eq!(user.username, "alice");
        assert_eq!(user.remaining_size, 10.0);
    }

    #[test]
    fn test_has_room_for() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            remaining_size: 2.0,
            created_at: "2024-01-01 00:00:00".to_string(),
        };

        assert!(user.has_room_for(1.5));
        assert!(user.has_room_for(2.0));
        assert!(!user.has_room_for(2.01));
    }
}
