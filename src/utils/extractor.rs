//! 路径参数安全提取
//!
//! 路径中的 ID 必须为正整数，解析失败直接返回 400 与统一的错误响应体。

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 解析正整数 ID
pub fn parse_positive_i64(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|v| *v > 0)
}

fn invalid_path_param(name: &str, raw: &str) -> actix_web::Error {
    let body = ApiResponse::<()>::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid path parameter '{name}': '{raw}'"),
    );
    actix_web::error::InternalError::from_response(
        format!("invalid path parameter {name}"),
        actix_web::HttpResponse::BadRequest().json(body),
    )
    .into()
}

/// 定义一个从路径参数中提取正整数 ID 的类型
///
/// 生成的类型既可以直接作为提取器使用，也可以放入 `web::Path<(A, B)>` 中反序列化。
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                std::future::ready($crate::utils::extractor::extract_path_i64(req, $param).map($name))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                $crate::utils::extractor::parse_positive_i64(&raw)
                    .map($name)
                    .ok_or_else(|| {
                        serde::de::Error::custom(format!(
                            "invalid path parameter '{}': '{}'",
                            $param, raw
                        ))
                    })
            }
        }
    };
}

/// 从 match_info 中读取指定参数
pub fn extract_path_i64(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(param).unwrap_or_default();
    parse_positive_i64(raw).ok_or_else(|| invalid_path_param(param, raw))
}

define_safe_i64_extractor!(SafeCourseIdI64, "course_id");
define_safe_i64_extractor!(SafeTopicIdI64, "topic_id");
define_safe_i64_extractor!(SafeDocumentIdI64, "document_id");
define_safe_i64_extractor!(SafePermissionIdI64, "permission_id");

/// 通用 `{id}` 路径参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_path_i64(req, "id").map(SafeIDI64))
    }
}

impl<'de> serde::Deserialize<'de> for SafeIDI64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        parse_positive_i64(&raw)
            .map(SafeIDI64)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid path parameter 'id': '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_i64() {
        assert_eq!(parse_positive_i64("42"), Some(42));
        assert_eq!(parse_positive_i64(" 7 "), Some(7));
        assert_eq!(parse_positive_i64("0"), None);
        assert_eq!(parse_positive_i64("-3"), None);
        assert_eq!(parse_positive_i64("abc"), None);
        assert_eq!(parse_positive_i64("1; DROP TABLE users"), None);
    }

    #[actix_web::test]
    async fn test_extract_from_match_info() {
        let req = TestRequest::default()
            .param("id", "15")
            .param("topic_id", "x")
            .to_http_request();
        assert_eq!(extract_path_i64(&req, "id").unwrap(), 15);
        assert!(extract_path_i64(&req, "topic_id").is_err());
        assert!(extract_path_i64(&req, "comment_id").is_err());
    }
}
