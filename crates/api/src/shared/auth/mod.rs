use crate::error::CampanileError;
use actix_web::HttpRequest;
use campanile_domain::User;
use campanile_infra::Context;

/// Admin routes are protected by the institution api key. The key is
/// generated at startup when none is configured.
pub async fn protect_admin_route(
    req: &HttpRequest,
    ctx: &Context,
) -> Result<(), CampanileError> {
    let api_key = match req.headers().get("x-api-key") {
        Some(api_key) => match api_key.to_str() {
            Ok(api_key) => api_key,
            Err(_) => {
                return Err(CampanileError::Unauthorized(
                    "Malformed api key provided".to_string(),
                ))
            }
        },
        None => {
            return Err(CampanileError::Unauthorized(
                "Unable to find api key in x-api-key header".to_string(),
            ))
        }
    };

    if api_key != ctx.config.admin_api_key {
        return Err(CampanileError::Unauthorized(
            "Invalid api key provided".to_string(),
        ));
    }

    Ok(())
}

/// Resolves the staff principal behind a request. Session and token
/// mechanics live in an upstream layer which is trusted to have
/// authenticated the caller and to set the `x-staff-email` header.
pub async fn protect_staff_route(
    req: &HttpRequest,
    ctx: &Context,
) -> Result<User, CampanileError> {
    let email = match req.headers().get("x-staff-email") {
        Some(email) => match email.to_str() {
            Ok(email) => email,
            Err(_) => {
                return Err(CampanileError::UnidentifiableClient(
                    "Malformed staff email header provided".to_string(),
                ))
            }
        },
        None => {
            return Err(CampanileError::UnidentifiableClient(
                "Unable to find staff email header".to_string(),
            ))
        }
    };

    match ctx.repos.users.find_by_email(email).await {
        Some(user) => Ok(user),
        None => Err(CampanileError::Unauthorized(format!(
            "Unable to find user with email: {}",
            email
        ))),
    }
}
