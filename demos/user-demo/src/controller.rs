//! 用户 REST 接口

use glint_web::prelude::*;
use glint_web_macros::{controller, Controller};

use crate::error;
use crate::model::{CreateUserRequest, UpdateUserRequest, User};
use crate::service::UserService;

/// 用户控制器
#[derive(Controller, Debug, Default)]
#[route("/api/v1/users")]
#[version("v1")]
pub struct UserController {
    service: UserService,
}

#[controller]
impl UserController {
    #[get_mapping("")]
    async fn list_users(&self) -> ResponseEntity<Vec<User>> {
        ResponseEntity::ok(self.service.list_users())
    }

    #[get_mapping("/:id")]
    async fn get_user(
        &self,
        PathVariable(id): PathVariable<i64>,
    ) -> Result<ResponseEntity<User>, WebError> {
        if id <= 0 {
            return Err(error::invalid_user_id(id).into());
        }

        let user = self.service.get_user(id as u64)?;
        Ok(ResponseEntity::ok(user))
    }

    #[post_mapping("")]
    async fn create_user(
        &self,
        ValidatedRequestBody(request): ValidatedRequestBody<CreateUserRequest>,
    ) -> Result<ResponseEntity<User>, WebError> {
        let user = self.service.create_user(request)?;
        Ok(ResponseEntity::created(user))
    }

    #[put_mapping("/:id")]
    async fn update_user(
        &self,
        PathVariable(id): PathVariable<i64>,
        ValidatedRequestBody(request): ValidatedRequestBody<UpdateUserRequest>,
    ) -> Result<ResponseEntity<User>, WebError> {
        if id <= 0 {
            return Err(error::invalid_user_id(id).into());
        }

        let user = self.service.update_user(id as u64, request)?;
        Ok(ResponseEntity::ok(user))
    }

    #[delete_mapping("/:id")]
    async fn delete_user(
        &self,
        PathVariable(id): PathVariable<i64>,
    ) -> Result<ResponseEntity<()>, WebError> {
        if id <= 0 {
            return Err(error::invalid_user_id(id).into());
        }

        self.service.delete_user(id as u64)?;
        Ok(ResponseEntity::<()>::no_content())
    }
}
