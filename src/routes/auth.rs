use actix_web::{
    cookie::{Cookie, SameSite},
    http::header,
    web, HttpResponse,
};
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::{AuthMiddleware, AuthUser};
use crate::models::{SessionResponse, SigninRequest, User, UserResponse};
use crate::services::{AuthService, UserService};
use crate::utils::auth::create_jwt;
use crate::AppState;

fn token_cookie(token: &str, expires_at: Option<i64>) -> Cookie<'static> {
    let mut cookie = Cookie::new("token", token.to_string());
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if let Some(exp) = expires_at {
        cookie.set_expires(time::OffsetDateTime::from_unix_timestamp(exp).ok());
    }
    cookie
}

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signin", web::post().to(signin))
        .route("/signout", web::get().to(signout))
        .service(
            web::resource("/session")
                .wrap(AuthMiddleware)
                .route(web::get().to(get_session_user)),
        );
}

fn session_response(user: User, token: String, expires_at: i64) -> SessionResponse {
    SessionResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_at: Some(expires_at),
        is_admin: user.is_admin(),
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    }
}

async fn signin(
    state: web::Data<AppState>,
    req: web::Json<SigninRequest>,
) -> AppResult<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_service = AuthService::new(&state.db);
    let user_service = UserService::new(&state.db);

    let user_id = auth_service
        .authenticate(&req.email.trim().to_lowercase(), &req.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let user = user_service
        .get_user_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    user_service.update_user_last_active(&user.id).await?;

    let (token, expires_at) = create_jwt(
        &user.id,
        &state.config.secret_key,
        &state.config.jwt_expires_in,
    )?;
    tracing::info!("{} signed in", user.email);

    let cookie = token_cookie(&token, Some(expires_at));
    Ok(HttpResponse::Ok()
        .append_header((header::SET_COOKIE, cookie.to_string()))
        .json(session_response(user, token, expires_at)))
}

async fn signout() -> HttpResponse {
    let mut cookie = token_cookie("", None);
    cookie.set_max_age(time::Duration::seconds(-1));

    HttpResponse::Ok()
        .append_header((header::SET_COOKIE, cookie.to_string()))
        .json(json!({"status": true}))
}

async fn get_session_user(auth_user: AuthUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from(auth_user.user)))
}
