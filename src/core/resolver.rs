//! # Resolver - 항목 조회 계층
//!
//! 컨테이너의 읽기 측면입니다. 저장소에서 키를 찾아 항목을 실체화하고,
//! 키가 없으면 비슷한 키 제안이 담긴 `NotFound` 에러를 반환합니다.
//!
//! Resolver는 상태를 갖지 않으므로 하나의 인스턴스를 여러 컨테이너가 공유할 수 있습니다.
//! 목(mock) 계층도 Resolver를 교체하지 않고 감싸는 방식으로 동작합니다
//! ([`MockResolver`](crate::core::mocking::MockResolver) 참고).

use log::trace;

use crate::core::errors::{ContainerError, ContainerResult};
use crate::core::item::{Instance, Item};
use crate::core::store::Store;
use crate::utils::string_utils::normalize_key;

/// 조회 전략
pub trait Resolver: Send + Sync {
    /// 키에 해당하는 항목을 실체화합니다.
    ///
    /// 싱글톤 초기화나 팩토리 호출 같은 부수 효과는 이 시점에 발생합니다.
    fn resolve(&self, store: &Store, key: &str) -> ContainerResult<Instance>;

    /// 키 등록 여부. 팩토리를 호출하지 않습니다.
    fn has(&self, store: &Store, key: &str) -> bool;

    /// 등록 순서대로 정렬된 키 목록
    fn keys(&self, store: &Store) -> Vec<String>;

    /// 각 (키, 항목) 쌍에 대해 방문자를 호출합니다.
    fn for_each(&self, store: &Store, visitor: &mut dyn FnMut(&str, &Item));

    fn each_key(&self, store: &Store, visitor: &mut dyn FnMut(&str)) {
        for key in self.keys(store) {
            visitor(&key);
        }
    }
}

/// 기본 조회 전략
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResolver;

impl DefaultResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for DefaultResolver {
    fn resolve(&self, store: &Store, key: &str) -> ContainerResult<Instance> {
        let key = normalize_key(key);
        let item = store.get(&key).ok_or_else(|| {
            let existing = store.keys();
            ContainerError::not_found(&key, existing.iter().map(String::as_str))
        })?;

        trace!("Resolving: {} (singleton: {})", key, item.is_singleton());
        Ok(item.materialize())
    }

    fn has(&self, store: &Store, key: &str) -> bool {
        store.contains(&normalize_key(key))
    }

    fn keys(&self, store: &Store) -> Vec<String> {
        store.keys()
    }

    fn for_each(&self, store: &Store, visitor: &mut dyn FnMut(&str, &Item)) {
        for (key, item) in store.entries() {
            visitor(&key, &item);
        }
    }
}
