use crate::config::AppConfig;
use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite};
use chrono::TimeDelta;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const REFRESH_COOKIE: &str = "refresh_token";

/// 令牌用途，防止 refresh token 被当作 access token 使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // 用户 ID
    // 角色被删除后用户可能没有角色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// refresh token 的有效期（秒），同时作为 cookie 的 max-age
    pub refresh_expires_in: i64,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static [u8] {
        AppConfig::get().jwt.secret.as_bytes()
    }

    fn access_ttl() -> TimeDelta {
        TimeDelta::minutes(AppConfig::get().jwt.access_token_expiry)
    }

    fn default_refresh_ttl() -> TimeDelta {
        TimeDelta::days(AppConfig::get().jwt.refresh_token_expiry)
    }

    /// 签发指定用途与有效期的令牌
    pub fn issue(
        user_id: i64,
        role: Option<&str>,
        kind: TokenKind,
        ttl: TimeDelta,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id,
            role: role.map(str::to_string),
            kind,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret()),
        )
    }

    /// 登录时签发 access + refresh，`refresh_ttl` 为空时使用默认有效期
    pub fn issue_pair(
        user_id: i64,
        role: Option<&str>,
        refresh_ttl: Option<TimeDelta>,
    ) -> Result<TokenPair, JwtError> {
        let refresh_ttl = refresh_ttl.unwrap_or_else(Self::default_refresh_ttl);
        Ok(TokenPair {
            access_token: Self::issue(user_id, role, TokenKind::Access, Self::access_ttl())?,
            refresh_token: Self::issue(user_id, role, TokenKind::Refresh, refresh_ttl)?,
            refresh_expires_in: refresh_ttl.num_seconds(),
        })
    }

    /// 校验签名、过期时间与令牌用途
    pub fn verify(token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret()),
            &Validation::default(),
        )?
        .claims;
        if claims.kind != expected {
            return Err(JwtError::from(ErrorKind::InvalidToken));
        }
        Ok(claims)
    }

    /// 用 refresh token 换取新的 access token
    pub fn refresh_access_token(refresh_token: &str) -> Result<String, JwtError> {
        let claims = Self::verify(refresh_token, TokenKind::Refresh)?;
        Self::issue(
            claims.sub,
            claims.role.as_deref(),
            TokenKind::Access,
            Self::access_ttl(),
        )
    }

    fn refresh_cookie(value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(max_age_secs))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// refresh token cookie，max-age 与令牌有效期一致（"记住我" 时更长）
    pub fn create_refresh_token_cookie(pair: &TokenPair) -> Cookie<'static> {
        Self::refresh_cookie(pair.refresh_token.clone(), pair.refresh_expires_in)
    }

    /// 立即过期的空 cookie，用于清除失效的 refresh token
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_cookie(String::new(), 0)
    }

    pub fn extract_refresh_token_from_cookie(req: &HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_carries_user_and_role() {
        let token = JwtUtils::issue(42, Some("teacher"), TokenKind::Access, TimeDelta::minutes(5))
            .unwrap();
        let claims = JwtUtils::verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role.as_deref(), Some("teacher"));
    }

    #[test]
    fn test_token_kind_is_enforced() {
        let pair = JwtUtils::issue_pair(7, None, None).unwrap();
        assert!(JwtUtils::verify(&pair.refresh_token, TokenKind::Access).is_err());
        assert!(JwtUtils::verify(&pair.access_token, TokenKind::Refresh).is_err());
        assert!(JwtUtils::refresh_access_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_refresh_issues_access_token_for_same_user() {
        let pair = JwtUtils::issue_pair(9, Some("student"), Some(TimeDelta::days(30))).unwrap();
        assert_eq!(pair.refresh_expires_in, 30 * 24 * 3600);

        let access = JwtUtils::refresh_access_token(&pair.refresh_token).unwrap();
        let claims = JwtUtils::verify(&access, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, 9);
        assert_eq!(claims.role.as_deref(), Some("student"));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token =
            JwtUtils::issue(1, None, TokenKind::Access, TimeDelta::minutes(-10)).unwrap();
        assert!(JwtUtils::verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = JwtUtils::issue(1, None, TokenKind::Access, TimeDelta::minutes(5)).unwrap();
        let mut tampered = token.into_bytes();
        let last = tampered.len() - 2;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(JwtUtils::verify(&tampered, TokenKind::Access).is_err());
    }
}
