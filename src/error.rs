use actix_web::{
    cookie::{Cookie, SameSite},
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Missing session and non-admin session are reported the same way.
    #[error("Admin session required")]
    AdminRequired { redirect: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{operation} failed: {message}")]
    Operation { operation: String, message: String },

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Tags a store failure with the admin operation that triggered it so the
    /// operator sees which action failed along with the store's message.
    pub fn during(self, operation: &str) -> AppError {
        match self {
            AppError::Database(e) => AppError::Operation {
                operation: operation.to_string(),
                message: e.to_string(),
            },
            AppError::InternalServerError(message) => AppError::Operation {
                operation: operation.to_string(),
                message,
            },
            other => other,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Validation(ref e) => (StatusCode::BAD_REQUEST, e.clone()),
            AppError::NotFound(ref e) => (StatusCode::NOT_FOUND, e.clone()),
            AppError::Unauthorized(ref e) => (StatusCode::UNAUTHORIZED, e.clone()),
            AppError::AdminRequired { .. } => (
                StatusCode::UNAUTHORIZED,
                "Admin session required".to_string(),
            ),
            AppError::BadRequest(ref e) => (StatusCode::BAD_REQUEST, e.clone()),
            AppError::InternalServerError(ref e) => {
                tracing::error!("Internal server error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.clone())
            }
            AppError::Jwt(ref e) => {
                tracing::error!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AppError::Operation { .. } => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Upload(_) => {
                tracing::error!("{}", self);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
        };

        let redirect = match self {
            AppError::AdminRequired { redirect } => Some(redirect.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            detail: error_message,
            redirect,
        };

        let mut response_builder = HttpResponse::build(status);

        // Clear the session cookie whenever the caller is sent back to sign in
        if matches!(
            self,
            AppError::Unauthorized(_)
                | AppError::AdminRequired { .. }
                | AppError::Jwt(_)
                | AppError::InvalidCredentials
        ) {
            let mut token_cookie = Cookie::new("token", "");
            token_cookie.set_http_only(true);
            token_cookie.set_same_site(SameSite::Lax);
            token_cookie.set_path("/");
            token_cookie.set_max_age(time::Duration::seconds(-1));

            response_builder.insert_header((header::SET_COOKIE, token_cookie.to_string()));
        }

        response_builder.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::AdminRequired { .. } => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Operation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upload(_) => StatusCode::BAD_GATEWAY,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_during_names_the_operation() {
        let err = AppError::Database(sqlx::Error::RowNotFound).during("save service");
        match err {
            AppError::Operation { operation, message } => {
                assert_eq!(operation, "save service");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_during_keeps_not_found() {
        let err = AppError::NotFound("Service not found".to_string()).during("save service");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_admin_required_carries_redirect() {
        let err = AppError::AdminRequired {
            redirect: "/admin/login".to_string(),
        };
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }
}
