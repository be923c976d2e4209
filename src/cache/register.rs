//! 对象缓存插件注册表
//!
//! 插件在加载期通过 `declare_object_cache_plugin!` 注册，启动时按名称取出构造器。

use crate::cache::traits::ObjectCache;
use crate::errors::Result;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::{future::Future, pin::Pin, sync::Arc};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<DashMap<&'static str, ObjectCacheConstructor>> =
    Lazy::new(DashMap::new);

/// 同名插件后注册者覆盖先注册者
pub fn register_object_cache_plugin(name: &'static str, constructor: ObjectCacheConstructor) {
    OBJECT_CACHE_REGISTRY.insert(name, constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .get(name)
        .map(|entry| entry.value().clone())
}

/// 已注册的插件名，按字母排序
pub fn registered_object_caches() -> Vec<&'static str> {
    let mut names: Vec<_> = OBJECT_CACHE_REGISTRY.iter().map(|e| *e.key()).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plugins_are_registered() {
        let names = registered_object_caches();
        assert!(names.contains(&"moka"));
        assert!(names.contains(&"redis"));
        assert!(get_object_cache_plugin("moka").is_some());
        assert!(get_object_cache_plugin("memcached").is_none());
    }

    #[tokio::test]
    async fn test_moka_constructor_builds_a_working_cache() {
        let constructor = get_object_cache_plugin("moka").unwrap();
        let cache = constructor().await.unwrap();
        cache.insert_raw("k".to_string(), "v".to_string(), 0).await;
        assert_eq!(
            cache.get_raw("k").await,
            crate::cache::CacheResult::Found("v".to_string())
        );
    }
}
