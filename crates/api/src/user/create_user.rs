use crate::error::CampanileError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campanile_api_structs::create_user::*;
use campanile_domain::{Role, User};
use campanile_infra::Context;

pub async fn create_user_admin_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, CampanileError> {
    protect_admin_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = CreateUserUseCase {
        name: body.name,
        email: body.email,
        role: body.role,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(CampanileError::from)
}

#[derive(Debug)]
pub struct CreateUserUseCase {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug)]
pub enum UseCaseError {
    EmailTaken(String),
    StorageError,
}

impl From<UseCaseError> for CampanileError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmailTaken(email) => Self::Conflict(format!(
                "A user with email: {} already exists",
                email
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find_by_email(&self.email).await.is_some() {
            return Err(UseCaseError::EmailTaken(self.email.clone()));
        }

        let user = User::new(
            self.name.clone(),
            self.email.clone(),
            self.role,
            ctx.sys.get_timestamp_millis(),
        );
        ctx.repos
            .users
            .insert(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(user)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn usecase() -> CreateUserUseCase {
        CreateUserUseCase {
            name: "Alan Turing".into(),
            email: "turing@example.edu".into(),
            role: Role::Staff,
        }
    }

    #[actix_web::test]
    async fn creates_user_with_default_preferences() {
        let ctx = Context::create_inmemory();
        let user = execute(usecase(), &ctx).await.unwrap();
        assert!(user.preferences.enabled);
        assert_eq!(user.preferences.lead_time_minutes, 15);
        assert!(ctx
            .repos
            .users
            .find_by_email("turing@example.edu")
            .await
            .is_some());
    }

    #[actix_web::test]
    async fn rejects_duplicate_email() {
        let ctx = Context::create_inmemory();
        execute(usecase(), &ctx).await.unwrap();
        assert!(matches!(
            execute(usecase(), &ctx).await,
            Err(UseCaseError::EmailTaken(_))
        ));
    }
}
