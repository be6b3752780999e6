//! In-process `UserStore` used by the unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo::UserStore;
use crate::users::repo_types::{NewUser, ProfileUpdate, StoreError, User};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flags the API never writes (admin grant, deactivation).
    pub fn set_flags(&self, id: Uuid, is_admin: bool, is_active: bool) {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.is_admin = is_admin;
            u.is_active = is_active;
        }
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

fn taken(users: &[User], exclude: Option<Uuid>, username: Option<&str>, email: Option<&str>) -> Option<User> {
    users
        .iter()
        .filter(|u| Some(u.id) != exclude)
        .find(|u| {
            username.is_some_and(|n| u.username == n) || email.is_some_and(|e| u.email == e)
        })
        .cloned()
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if taken(&users, None, Some(new_user.username.as_str()), Some(new_user.email.as_str())).is_some() {
            return Err(StoreError::Duplicate("users_unique".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_admin: false,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_conflicting(
        &self,
        exclude: Uuid,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        Ok(taken(&self.users.lock().unwrap(), Some(exclude), username, email))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().unwrap();
        if taken(&users, Some(id), update.username.as_deref(), update.email.as_deref()).is_some() {
            return Err(StoreError::Duplicate("users_unique".into()));
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn create_enforces_unique_email_and_username() {
        let store = MemoryUserStore::new();
        store.create(new_user("alice", "a@x.com")).await.unwrap();

        let dup_email = store.create(new_user("other", "a@x.com")).await;
        assert!(matches!(dup_email, Err(StoreError::Duplicate(_))));

        let dup_name = store.create(new_user("alice", "b@x.com")).await;
        assert!(matches!(dup_name, Err(StoreError::Duplicate(_))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn conflict_lookup_excludes_self() {
        let store = MemoryUserStore::new();
        let alice = store.create(new_user("alice", "a@x.com")).await.unwrap();
        let bob = store.create(new_user("bob", "b@x.com")).await.unwrap();

        let own = store
            .find_conflicting(alice.id, Some("alice"), Some("a@x.com"))
            .await
            .unwrap();
        assert!(own.is_none());

        let clash = store
            .find_conflicting(alice.id, Some("bob"), None)
            .await
            .unwrap();
        assert_eq!(clash.map(|u| u.id), Some(bob.id));
    }
}
