use crate::error::AppError;
use crate::models::User;
use crate::services::user::UserService;
use crate::utils::auth::{extract_token, verify_jwt};
use crate::AppState;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::Error as ActixError,
    web, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

#[derive(Clone)]
pub struct AuthUser {
    pub user: User,
}

impl std::ops::Deref for AuthUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

// Extractor for AuthUser from request extensions
impl actix_web::FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(result)
    }
}

/// Resolves the signed-in user from the request's token.
async fn session_user(req: &ServiceRequest) -> Result<User, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalServerError("App state not found".to_string()))?;

    let token = extract_token(req.request())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

    let claims = verify_jwt(&token, &state.config.secret_key).map_err(|e| {
        tracing::debug!("JWT verification failed: {:?}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    UserService::new(&state.db)
        .get_active_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found or inactive".to_string()))
}

// Auth middleware factory
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let user = session_user(&req)
                .await
                .map_err(|e| e.during("verify session"))?;
            req.extensions_mut().insert(AuthUser { user });

            let res = service.call(req).await?;
            Ok(res)
        })
    }
}

/// Admin gate. Every way of not being a signed-in admin gets the same
/// response, pointing at the login page.
pub struct AdminMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AdminMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = AdminMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let login_path = req
                .app_data::<web::Data<AppState>>()
                .map(|state| state.config.admin_login_path.clone())
                .unwrap_or_else(|| "/admin/login".to_string());
            let admin_required = || AppError::AdminRequired {
                redirect: login_path.clone(),
            };

            let user = match session_user(&req).await {
                Ok(user) if user.is_admin() => user,
                Ok(user) => {
                    tracing::warn!("Non-admin user {} tried to reach {}", user.id, req.path());
                    return Err(admin_required().into());
                }
                Err(AppError::Unauthorized(reason)) => {
                    tracing::debug!("Admin request without session: {}", reason);
                    return Err(admin_required().into());
                }
                Err(e) => return Err(e.during("verify admin session").into()),
            };

            req.extensions_mut().insert(AuthUser { user });

            let res = service.call(req).await?;
            Ok(res)
        })
    }
}
