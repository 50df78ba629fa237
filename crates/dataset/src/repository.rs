//! Read access to the user population.

use skillrank_ranking::UserProfile;
use std::collections::HashMap;

/// Source of user profiles for a ranking pass.
pub trait UserRepository {
    /// Every user, in load order.
    fn all_users(&self) -> &[UserProfile];

    /// Look up one user by identity (case-insensitive).
    fn user_by_identity(&self, identity: &str) -> Option<&UserProfile>;

    /// Number of users.
    fn len(&self) -> usize {
        self.all_users().len()
    }

    /// True when there are no users.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Users held in memory with an identity index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    users: Vec<UserProfile>,
    by_identity: HashMap<String, usize>,
}

impl InMemoryRepository {
    /// Index a list of users. The first profile wins for a repeated identity.
    pub fn new(users: Vec<UserProfile>) -> Self {
        let mut by_identity = HashMap::with_capacity(users.len());
        for (position, user) in users.iter().enumerate() {
            by_identity
                .entry(user.identity.id.to_lowercase())
                .or_insert(position);
        }
        Self { users, by_identity }
    }
}

impl UserRepository for InMemoryRepository {
    fn all_users(&self) -> &[UserProfile] {
        &self.users
    }

    fn user_by_identity(&self, identity: &str) -> Option<&UserProfile> {
        self.by_identity
            .get(&identity.trim().to_lowercase())
            .and_then(|&i| self.users.get(i))
    }
}
