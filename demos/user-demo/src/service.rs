//! 用户业务逻辑

use glint_web::prelude::GlintError;
use glint_web_macros::service;

use crate::error;
use crate::model::{CreateUserRequest, UpdateUserRequest, User};
use crate::repository::UserRepository;

/// 用户服务
#[service(name = "userService", read_only = false)]
#[derive(Debug, Default)]
pub struct UserService {
    repository: UserRepository,
}

impl UserService {
    pub fn list_users(&self) -> Vec<User> {
        self.repository.find_all()
    }

    pub fn get_user(&self, id: u64) -> Result<User, GlintError> {
        self.repository
            .find_by_id(id)
            .ok_or_else(|| error::user_not_found(id))
    }

    pub fn create_user(&self, request: CreateUserRequest) -> Result<User, GlintError> {
        if self.repository.email_exists(&request.email, None) {
            return Err(error::email_taken(&request.email));
        }

        Ok(self.repository.insert(request.name, request.email))
    }

    pub fn update_user(&self, id: u64, request: UpdateUserRequest) -> Result<User, GlintError> {
        let mut user = self.get_user(id)?;

        if let Some(email) = &request.email {
            if self.repository.email_exists(email, Some(id)) {
                return Err(error::email_taken(email));
            }
        }

        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(email) = request.email {
            user.email = email;
        }

        self.repository
            .update(user)
            .ok_or_else(|| error::user_not_found(id))
    }

    pub fn delete_user(&self, id: u64) -> Result<(), GlintError> {
        if self.repository.delete(id) {
            Ok(())
        } else {
            Err(error::user_not_found(id))
        }
    }
}
