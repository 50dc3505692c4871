//! # Mocking - Resolver 데코레이터
//!
//! 실제 Resolver를 감싸는 [`MockResolver`]로 목(mock) 항목을 제공합니다.
//! 목 항목은 컨테이너에 설정된 같은 [`Registry`]로 별도의 저장소에 등록되므로
//! 실제 항목과 동일한 `call`/`singleton` 의미를 갖습니다.
//!
//! ## 조회 순서
//!
//! ```text
//! resolve(key)
//!    ├─ 목 저장소에 key 존재 → inner.resolve(목 저장소, key)
//!    └─ 없음 → inner.resolve(실제 저장소, key)
//! ```
//!
//! 목이 설정된 동안 실제 항목은 조회되지도, 실체화되지도 않습니다.
//! 목 상태는 컨테이너 인스턴스마다 독립적이며 전역 목록에 등록되지 않습니다.
//! 여러 컨테이너를 한 번에 초기화해야 한다면 호출자가 직접 인스턴스를 추적해야 합니다.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::core::errors::{ContainerError, ContainerResult};
use crate::core::item::{Instance, Item, Payload, RegisterOptions};
use crate::core::registry::Registry;
use crate::core::resolver::Resolver;
use crate::core::store::Store;
use crate::utils::string_utils::normalize_key;

/// 목 저장소를 우선 조회하는 Resolver 데코레이터
pub struct MockResolver {
    inner: Arc<dyn Resolver>,
    mocks: Store,
}

/// 목 설치 결과: (키, 이전 목 항목)
pub(crate) type Installed = Vec<(String, Option<Arc<Item>>)>;

impl MockResolver {
    pub fn new(inner: Arc<dyn Resolver>) -> Self {
        Self {
            inner,
            mocks: Store::new(),
        }
    }

    /// 감싸고 있는 실제 Resolver
    pub fn inner(&self) -> &Arc<dyn Resolver> {
        &self.inner
    }

    pub fn is_mocked(&self, key: &str) -> bool {
        self.mocks.contains(&normalize_key(key))
    }

    pub fn mocked_keys(&self) -> Vec<String> {
        self.mocks.keys()
    }

    /// 목 항목을 등록합니다. 이미 목이 설정된 키는 새 목으로 교체됩니다.
    ///
    /// 임시 저장소에 먼저 등록하므로 등록 실패 시 기존 목은 그대로 유지됩니다.
    pub fn mock(
        &self,
        registry: &dyn Registry,
        key: &str,
        payload: Payload,
        options: &RegisterOptions,
    ) -> ContainerResult<Vec<String>> {
        let installed = self.install(registry, key, payload, options)?;
        Ok(installed.into_iter().map(|(key, _)| key).collect())
    }

    pub(crate) fn install(
        &self,
        registry: &dyn Registry,
        key: &str,
        payload: Payload,
        options: &RegisterOptions,
    ) -> ContainerResult<Installed> {
        let scratch = Store::new();
        registry.register(&scratch, key, payload, options)?;

        let mut installed = Vec::new();
        for (key, item) in scratch.entries() {
            let previous = self.mocks.put(key.clone(), item);
            debug!("🎭 Mocked: {}", key);
            installed.push((key, previous));
        }
        Ok(installed)
    }

    /// 설치 이전 상태로 되돌립니다.
    pub(crate) fn restore(&self, installed: Installed) {
        for (key, previous) in installed {
            match previous {
                Some(item) => {
                    self.mocks.put(key, item);
                }
                None => {
                    self.mocks.remove(&key);
                }
            }
        }
    }

    /// 주어진 키들의 목을 제거하고, 실제로 제거된 키를 반환합니다.
    /// 키가 비어 있으면 모든 목을 제거합니다.
    pub fn unmock<K: AsRef<str>>(&self, keys: &[K]) -> Vec<String> {
        if keys.is_empty() {
            return self.mocks.clear();
        }
        keys.iter()
            .map(|key| normalize_key(key.as_ref()))
            .filter(|key| self.mocks.remove(key).is_some())
            .collect()
    }

    /// 블록 범위 목을 설치하고, 가드가 해제될 때 설치 이전 상태로 복원합니다.
    pub(crate) fn scoped(
        &self,
        registry: &dyn Registry,
        key: &str,
        payload: Payload,
        options: &RegisterOptions,
    ) -> ContainerResult<MockGuard<'_>> {
        let installed = self.install(registry, key, payload, options)?;
        Ok(MockGuard {
            resolver: self,
            installed: Some(installed),
        })
    }

    /// 같은 Resolver를 감싸는, 목이 비어 있는 새 데코레이터
    pub fn fresh(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

/// 범위 목 가드
pub(crate) struct MockGuard<'a> {
    resolver: &'a MockResolver,
    installed: Option<Installed>,
}

impl Drop for MockGuard<'_> {
    fn drop(&mut self) {
        if let Some(installed) = self.installed.take() {
            self.resolver.restore(installed);
        }
    }
}

impl Resolver for MockResolver {
    fn resolve(&self, store: &Store, key: &str) -> ContainerResult<Instance> {
        if self.is_mocked(key) {
            // 확인 직후 unmock 되었다면 실제 저장소로 넘어간다
            match self.inner.resolve(&self.mocks, key) {
                Err(ContainerError::NotFound { key: missing, .. }) if missing == key => {}
                resolved => return resolved,
            }
        }
        self.inner.resolve(store, key)
    }

    fn has(&self, store: &Store, key: &str) -> bool {
        self.is_mocked(key) || self.inner.has(store, key)
    }

    fn keys(&self, store: &Store) -> Vec<String> {
        self.inner.keys(store)
    }

    fn for_each(&self, store: &Store, visitor: &mut dyn FnMut(&str, &Item)) {
        self.inner.for_each(store, visitor)
    }
}

impl fmt::Debug for MockResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockResolver")
            .field("mocks", &self.mocks.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::DefaultRegistry;
    use crate::core::resolver::DefaultResolver;
    use once_cell::sync::OnceCell;
    use std::sync::Weak;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn real_store() -> Store {
        let store = Store::new();
        DefaultRegistry
            .register(&store, "item", Payload::value("real"), &RegisterOptions::new())
            .unwrap();
        store
    }

    #[test]
    fn test_mock_shadows_real_item() {
        let store = real_store();
        let resolver = MockResolver::new(Arc::new(DefaultResolver));

        let keys = resolver
            .mock(&DefaultRegistry, "item", Payload::value("mock"), &RegisterOptions::new())
            .unwrap();

        assert_eq!(keys, vec!["item".to_string()]);
        let value = resolver.resolve(&store, "item").unwrap();
        assert_eq!(value.downcast_ref::<&str>(), Some(&"mock"));
    }

    #[test]
    fn test_mock_replaces_existing_mock() {
        let store = real_store();
        let resolver = MockResolver::new(Arc::new(DefaultResolver));

        resolver
            .mock(&DefaultRegistry, "item", Payload::value("first"), &RegisterOptions::new())
            .unwrap();
        resolver
            .mock(&DefaultRegistry, "item", Payload::value("second"), &RegisterOptions::new())
            .unwrap();

        let value = resolver.resolve(&store, "item").unwrap();
        assert_eq!(value.downcast_ref::<&str>(), Some(&"second"));
    }

    #[test]
    fn test_mock_singleton_semantics_follow_registry() {
        let store = Store::new();
        let resolver = MockResolver::new(Arc::new(DefaultResolver));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        resolver
            .mock(
                &DefaultRegistry,
                "service",
                Payload::factory(move || counter.fetch_add(1, Ordering::SeqCst)),
                &RegisterOptions::new().singleton(true),
            )
            .unwrap();
        resolver.resolve(&store, "service").unwrap();
        resolver.resolve(&store, "service").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(resolver.has(&store, "service"));
        assert!(resolver.keys(&store).is_empty());
    }

    #[test]
    fn test_unmock_restores_fall_through() {
        let store = real_store();
        let resolver = MockResolver::new(Arc::new(DefaultResolver));
        resolver
            .mock(&DefaultRegistry, "item", Payload::value("mock"), &RegisterOptions::new())
            .unwrap();

        let removed = resolver.unmock(&["item", "never_mocked"]);

        assert_eq!(removed, vec!["item".to_string()]);
        let value = resolver.resolve(&store, "item").unwrap();
        assert_eq!(value.downcast_ref::<&str>(), Some(&"real"));
    }

    #[test]
    fn test_failed_mock_keeps_previous_mock() {
        let store = real_store();
        let resolver = MockResolver::new(Arc::new(DefaultResolver));
        resolver
            .mock(&DefaultRegistry, "item", Payload::value("mock"), &RegisterOptions::new())
            .unwrap();

        let result = resolver.mock(
            &DefaultRegistry,
            "item",
            Payload::value("bad"),
            &RegisterOptions::new().singleton(true),
        );

        assert!(result.is_err());
        let value = resolver.resolve(&store, "item").unwrap();
        assert_eq!(value.downcast_ref::<&str>(), Some(&"mock"));
    }

    /// 목 저장소를 조회하기 직전에 같은 키의 목을 제거하는 Resolver
    struct UnmockingResolver {
        target: OnceCell<Weak<MockResolver>>,
    }

    impl Resolver for UnmockingResolver {
        fn resolve(&self, store: &Store, key: &str) -> ContainerResult<Instance> {
            if let Some(resolver) = self.target.get().and_then(Weak::upgrade) {
                resolver.unmock(&[key]);
            }
            DefaultResolver.resolve(store, key)
        }

        fn has(&self, store: &Store, key: &str) -> bool {
            DefaultResolver.has(store, key)
        }

        fn keys(&self, store: &Store) -> Vec<String> {
            DefaultResolver.keys(store)
        }

        fn for_each(&self, store: &Store, visitor: &mut dyn FnMut(&str, &Item)) {
            DefaultResolver.for_each(store, visitor)
        }
    }

    #[test]
    fn test_unmock_during_resolution_falls_through_to_real_item() {
        let store = real_store();
        let inner = Arc::new(UnmockingResolver { target: OnceCell::new() });
        let resolver = Arc::new(MockResolver::new(inner.clone()));
        inner.target.set(Arc::downgrade(&resolver)).unwrap();
        resolver
            .mock(&DefaultRegistry, "item", Payload::value("mock"), &RegisterOptions::new())
            .unwrap();

        let value = resolver.resolve(&store, "item").unwrap();

        assert_eq!(value.downcast_ref::<&str>(), Some(&"real"));
        assert!(!resolver.is_mocked("item"));
    }
}
