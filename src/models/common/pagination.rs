use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../bindings/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

/// 可选整数查询参数：兼容字符串形式（flatten 后查询参数均以字符串缓冲）
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: '{s}'"))),
    }
}

fn default_page() -> i64 {
    1
}

// 0 表示未指定，由各资源决定默认页大小
fn default_size() -> i64 {
    0
}

impl PaginationQuery {
    /// 计算 `(page, size)`，page 从 1 开始；未指定 size 时使用资源的默认页大小
    pub fn resolve(&self, default_size: u64) -> (u64, u64) {
        let size = if self.size <= 0 {
            default_size
        } else {
            self.size.min(100) as u64
        };
        (self.page.max(1) as u64, size.max(1))
    }
}

impl PaginationInfo {
    pub fn new(page: u64, size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_accepts_string_numbers() {
        let query: PaginationQuery = serde_json::from_str(r#"{"page":"3","size":"8"}"#).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.size, 8);
    }

    #[derive(Debug, Deserialize)]
    struct Filter {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        category: Option<i64>,
    }

    #[test]
    fn test_optional_i64_in_flattened_query() {
        let filter: Filter = serde_json::from_str(r#"{"page":"1","category":"42"}"#).unwrap();
        assert_eq!(filter.category, Some(42));
        assert_eq!(filter.pagination.page, 1);

        let filter: Filter = serde_json::from_str(r#"{"category":""}"#).unwrap();
        assert_eq!(filter.category, None);

        let filter: Filter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.category, None);
        assert!(serde_json::from_str::<Filter>(r#"{"category":"abc"}"#).is_err());
    }

    #[test]
    fn test_pagination_resolve_bounds() {
        let query = PaginationQuery { page: 0, size: 500 };
        assert_eq!(query.resolve(8), (1, 100));
    }

    #[test]
    fn test_pagination_resource_default_size() {
        let query: PaginationQuery = serde_json::from_str(r#"{"page":2}"#).unwrap();
        assert_eq!(query.resolve(6), (2, 6));
        assert_eq!(PaginationQuery::default().resolve(8), (1, 8));
    }
}
