//! # Registry - 항목 등록 계층
//!
//! 컨테이너의 쓰기 측면을 담당합니다. 등록 요청을 받아 [`Item`]을 만들고
//! 공유 저장소에 키 중복 없이 삽입합니다.
//!
//! ## Spring Framework와의 비교
//!
//! | Spring 개념 | 이 시스템 | 비고 |
//! |-------------|-----------|------|
//! | `BeanDefinitionRegistry` | [`Registry`] | 교체 가능한 등록 전략 |
//! | `registerBeanDefinition` | [`Registry::register`] | 키 중복 시 에러 |
//! | `@Scope("singleton")` | `RegisterOptions::singleton` | 지연 초기화 + 1회 실행 |
//! | `@Scope("prototype")` | 팩토리 페이로드 | 조회마다 새 인스턴스 |
//!
//! ## 동작 원리
//!
//! ```text
//! register(store, key, payload, options)
//!    ├─ 키 정규화 (+ options.namespace 접두사)
//!    ├─ Item 생성 (InvalidRegistration 검증)
//!    └─ Store::insert_unique
//!         ├─ 쓰기 잠금 획득
//!         ├─ 동결 확인 → FrozenState
//!         ├─ 중복 확인 → DuplicateKey
//!         └─ 삽입 후 잠금 해제
//! ```
//!
//! 중복 검사와 삽입이 하나의 임계 구역이므로, 같은 키에 대한 두 등록이
//! 동시에 들어와도 정확히 하나만 성공하고 다른 하나는 `DuplicateKey`를 받습니다.
//!
//! ## 사용자 정의 Registry
//!
//! 메트릭 수집이나 검증이 필요하면 [`Registry`]를 구현하여
//! [`ContainerConfig::with_registry`](crate::config::ContainerConfig::with_registry)로 교체합니다.
//!
//! ```rust,ignore
//! struct CountingRegistry {
//!     inner: DefaultRegistry,
//!     count: AtomicUsize,
//! }
//!
//! impl Registry for CountingRegistry {
//!     fn register(&self, store: &Store, key: &str, payload: Payload, options: &RegisterOptions)
//!         -> ContainerResult<String>
//!     {
//!         self.count.fetch_add(1, Ordering::SeqCst);
//!         self.inner.register(store, key, payload, options)
//!     }
//! }
//! ```

use log::debug;

use crate::config::DEFAULT_NAMESPACE_SEPARATOR;
use crate::core::errors::ContainerResult;
use crate::core::item::{Item, Payload, RegisterOptions};
use crate::core::store::Store;
use crate::utils::string_utils::{join_namespace, normalize_key};

/// 등록 전략
pub trait Registry: Send + Sync {
    /// 항목을 저장소에 등록하고, 최종적으로 저장된 키를 반환합니다.
    ///
    /// # Errors
    ///
    /// * `DuplicateKey` - 키가 이미 존재하는 경우
    /// * `InvalidRegistration` - 옵션과 페이로드 종류가 맞지 않는 경우
    /// * `FrozenState` - 저장소가 동결된 경우
    fn register(
        &self,
        store: &Store,
        key: &str,
        payload: Payload,
        options: &RegisterOptions,
    ) -> ContainerResult<String>;
}

/// 기본 등록 전략
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRegistry;

impl DefaultRegistry {
    pub fn new() -> Self {
        Self
    }

    /// 옵션의 네임스페이스를 반영한 정규화된 키
    fn canonical_key(key: &str, options: &RegisterOptions) -> String {
        let key = normalize_key(key);
        match &options.namespace {
            Some(namespace) => {
                let separator = options
                    .namespace_separator
                    .as_deref()
                    .unwrap_or(DEFAULT_NAMESPACE_SEPARATOR);
                join_namespace(namespace, &key, separator)
            }
            None => key,
        }
    }
}

impl Registry for DefaultRegistry {
    fn register(
        &self,
        store: &Store,
        key: &str,
        payload: Payload,
        options: &RegisterOptions,
    ) -> ContainerResult<String> {
        let key = Self::canonical_key(key, options);
        let item = Item::new(&key, payload, options)?;
        let singleton = item.is_singleton();

        store.insert_unique(key.clone(), item)?;

        debug!("📦 Registered: {} (singleton: {})", key, singleton);
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ContainerError;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_register_inserts_item() {
        let store = Store::new();

        let key = DefaultRegistry
            .register(&store, "item", Payload::value("item"), &RegisterOptions::new())
            .unwrap();

        assert_eq!(key, "item");
        assert!(store.contains("item"));
    }

    #[test]
    fn test_register_applies_namespace_option() {
        let store = Store::new();
        let options = RegisterOptions::new().namespace("db").namespace_separator("::");

        let key = DefaultRegistry
            .register(&store, "pool", Payload::value(10), &options)
            .unwrap();

        assert_eq!(key, "db::pool");
        assert!(store.contains("db::pool"));
    }

    #[test]
    fn test_register_uses_default_separator_for_namespace_option() {
        let store = Store::new();
        let options = RegisterOptions::new().namespace("db");

        let key = DefaultRegistry
            .register(&store, "pool", Payload::value(10), &options)
            .unwrap();

        assert_eq!(key, "db.pool");
    }

    #[test]
    fn test_duplicate_key_fails_regardless_of_payload() {
        let store = Store::new();
        DefaultRegistry
            .register(&store, "item", Payload::factory(|| "item"), &RegisterOptions::new())
            .unwrap();

        let err = DefaultRegistry
            .register(&store, "item", Payload::value(1), &RegisterOptions::new())
            .unwrap_err();

        assert_eq!(err, ContainerError::DuplicateKey { key: "item".to_string() });
    }

    #[test]
    fn test_invalid_registration_leaves_store_untouched() {
        let store = Store::new();

        let result = DefaultRegistry.register(
            &store,
            "item",
            Payload::value(1),
            &RegisterOptions::new().singleton(true),
        );

        assert!(matches!(result, Err(ContainerError::InvalidRegistration { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_registration_of_same_key_has_one_winner() {
        const THREADS: usize = 8;
        let store = Arc::new(Store::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|n| {
                let store = store.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    DefaultRegistry.register(&store, "item", Payload::value(n), &RegisterOptions::new())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(ContainerError::DuplicateKey { .. })))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(duplicates, THREADS - 1);
    }
}
