use crate::error::{AppError, AppResult};
use crate::models::Claims;
use actix_web::{http::header, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

pub fn create_jwt(user_id: &str, secret: &str, expires_in: &str) -> AppResult<(String, i64)> {
    let expiration = parse_duration(expires_in)?;
    let exp = Utc::now()
        .checked_add_signed(expiration)
        .ok_or_else(|| AppError::InternalServerError("Invalid expiration time".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        exp: Some(exp),
        iat: Some(Utc::now().timestamp()),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, exp))
}

pub fn verify_jwt(token: &str, secret: &str) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub fn parse_duration(duration_str: &str) -> AppResult<Duration> {
    let duration_str = duration_str.trim();

    let (amount, unit): (&str, fn(i64) -> Duration) =
        if let Some(hours) = duration_str.strip_suffix('h') {
            (hours, Duration::hours)
        } else if let Some(days) = duration_str.strip_suffix('d') {
            (days, Duration::days)
        } else if let Some(minutes) = duration_str.strip_suffix('m') {
            (minutes, Duration::minutes)
        } else {
            // Bare numbers are hours
            (duration_str, Duration::hours)
        };

    let amount: i64 = amount
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid duration format".to_string()))?;
    Ok(unit(amount))
}

/// Bearer token from the Authorization header, falling back to the `token` cookie.
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .or_else(|| req.cookie("token").map(|c| c.value().to_string()))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_round_trip() {
        let (token, exp) = create_jwt("user-1", "secret", "1h").unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp, Some(exp));
    }

    #[test]
    fn test_jwt_rejects_wrong_secret() {
        let (token, _) = create_jwt("user-1", "secret", "1h").unwrap();
        assert!(verify_jwt(&token, "other").is_err());
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
        assert_eq!(parse_duration("12h").unwrap(), Duration::hours(12));
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("2").unwrap(), Duration::hours(2));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_extract_token_prefers_header() {
        let req = actix_web::test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc"))
            .cookie(actix_web::cookie::Cookie::new("token", "cookie-token"))
            .to_http_request();
        assert_eq!(extract_token(&req).as_deref(), Some("abc"));

        let req = actix_web::test::TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new("token", "cookie-token"))
            .to_http_request();
        assert_eq!(extract_token(&req).as_deref(), Some("cookie-token"));

        let req = actix_web::test::TestRequest::default().to_http_request();
        assert_eq!(extract_token(&req), None);
    }
}
