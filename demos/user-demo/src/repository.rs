//! 内存用户存储

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::model::User;

/// 内存用户存储，进程重启后数据丢失
#[derive(Debug)]
pub struct UserRepository {
    users: RwLock<HashMap<u64, User>>,
    next_id: RwLock<u64>,
}

impl Default for UserRepository {
    fn default() -> Self {
        let repository = Self {
            users: RwLock::new(HashMap::new()),
            next_id: RwLock::new(1),
        };

        // 预置演示数据
        repository.insert("Alice".to_string(), "alice@example.com".to_string());
        repository.insert("Bob".to_string(), "bob@example.com".to_string());

        repository
    }
}

impl UserRepository {
    pub fn find_all(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by_key(|user| user.id);
        users
    }

    pub fn find_by_id(&self, id: u64) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    pub fn email_exists(&self, email: &str, exclude_id: Option<u64>) -> bool {
        self.users
            .read()
            .values()
            .any(|user| user.email == email && Some(user.id) != exclude_id)
    }

    pub fn insert(&self, name: String, email: String) -> User {
        let mut next_id = self.next_id.write();
        let id = *next_id;
        *next_id += 1;

        let user = User { id, name, email };
        self.users.write().insert(id, user.clone());
        user
    }

    pub fn update(&self, user: User) -> Option<User> {
        let mut users = self.users.write();
        if users.contains_key(&user.id) {
            users.insert(user.id, user.clone());
            Some(user)
        } else {
            None
        }
    }

    pub fn delete(&self, id: u64) -> bool {
        self.users.write().remove(&id).is_some()
    }
}
