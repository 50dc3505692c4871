//! # Item Store
//!
//! 키 → [`Item`] 매핑을 보관하는 컨테이너의 유일한 공유 가변 상태입니다.
//!
//! - **삽입 순서 보존**: `IndexMap` 기반으로 열거 시 등록 순서를 유지합니다.
//! - **동시성**: `RwLock`으로 보호되며, 중복 검사와 삽입은 하나의 쓰기 구간에서 수행됩니다.
//! - **잠금 밖 실체화**: 조회는 읽기 잠금 안에서 `Arc<Item>`만 복제하고 즉시 해제합니다.
//!   팩토리가 같은 컨테이너를 재귀적으로 조회하거나 등록해도 교착 상태가 발생하지 않습니다.
//! - **동결**: `freeze` 이후 모든 변경 연산은 `FrozenState` 에러로 거부됩니다.
//!
//! 저장소를 복제하면 새로운 독립 맵이 만들어지고 항목(`Arc<Item>`)만 공유됩니다.
//! 복제 이후의 등록/삭제는 원본과 사본 사이에 전파되지 않습니다.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::core::errors::{ContainerError, ContainerResult};
use crate::core::item::Item;

type Entries = IndexMap<String, Arc<Item>>;

/// 컨테이너 저장소
pub struct Store {
    entries: RwLock<Entries>,
    frozen: AtomicBool,
}

impl Store {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
            frozen: AtomicBool::new(false),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<Arc<Item>> {
        self.read().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// 등록 순서대로 정렬된 키 목록
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// 등록 순서대로 정렬된 (키, 항목) 스냅샷
    pub fn entries(&self) -> Vec<(String, Arc<Item>)> {
        self.read()
            .iter()
            .map(|(key, item)| (key.clone(), item.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// 키가 없을 때만 항목을 삽입합니다.
    ///
    /// 동결 여부 확인, 중복 검사, 삽입이 하나의 쓰기 잠금 안에서 이루어지므로
    /// 같은 키에 대한 동시 등록 중 정확히 하나만 성공합니다.
    pub fn insert_unique(&self, key: String, item: Item) -> ContainerResult<()> {
        let mut entries = self.write();
        if self.is_frozen() {
            return Err(ContainerError::frozen("register", &key));
        }
        if entries.contains_key(&key) {
            return Err(ContainerError::DuplicateKey { key });
        }
        entries.insert(key, Arc::new(item));
        Ok(())
    }

    /// 여러 항목을 하나의 쓰기 구간에서 삽입합니다.
    ///
    /// 키가 이미 있으면 `on_conflict(키, 기존 항목, 새 항목)`이 남길 항목을 고릅니다.
    /// 덮어쓴 키도 원래 위치를 유지합니다.
    pub fn extend<F>(&self, incoming: Vec<(String, Arc<Item>)>, mut on_conflict: F) -> ContainerResult<()>
    where
        F: FnMut(&str, &Arc<Item>, &Arc<Item>) -> Arc<Item>,
    {
        let mut entries = self.write();
        if self.is_frozen() {
            let key = incoming.first().map(|(key, _)| key.as_str()).unwrap_or_default();
            return Err(ContainerError::frozen("merge", key));
        }
        for (key, item) in incoming {
            let item = match entries.get(&key) {
                Some(existing) => on_conflict(&key, existing, &item),
                None => item,
            };
            entries.insert(key, item);
        }
        Ok(())
    }

    /// 슬롯이 여전히 `expected`를 가리킬 때만 항목을 원자적으로 교체합니다.
    ///
    /// `expected`를 읽은 이후 다른 호출이 같은 키를 교체했다면 아무것도 바꾸지 않고
    /// `Conflict`를 반환합니다.
    ///
    /// # Errors
    ///
    /// * `FrozenState` - 저장소가 동결된 경우
    /// * `NotFound` - 키가 등록되어 있지 않은 경우
    /// * `Conflict` - 슬롯이 `expected`가 아닌 항목을 가리키는 경우
    pub fn replace(&self, key: &str, expected: &Arc<Item>, item: Item) -> ContainerResult<Arc<Item>> {
        let mut entries = self.write();
        if self.is_frozen() {
            return Err(ContainerError::frozen("decorate", key));
        }
        if let Some(slot) = entries.get_mut(key) {
            if !Arc::ptr_eq(slot, expected) {
                return Err(ContainerError::Conflict { key: key.to_string() });
            }
            return Ok(std::mem::replace(slot, Arc::new(item)));
        }
        Err(ContainerError::not_found(key, entries.keys().map(String::as_str)))
    }

    /// 동결 플래그를 확인하지 않고 삽입하거나 덮어씁니다. 목 저장소 전용입니다.
    pub(crate) fn put(&self, key: String, item: Arc<Item>) -> Option<Arc<Item>> {
        self.write().insert(key, item)
    }

    pub(crate) fn remove(&self, key: &str) -> Option<Arc<Item>> {
        self.write().shift_remove(key)
    }

    pub(crate) fn clear(&self) -> Vec<String> {
        self.write().drain(..).map(|(key, _)| key).collect()
    }

    /// 저장소를 영구적으로 읽기 전용으로 만듭니다.
    pub fn freeze(&self) {
        let _entries = self.write();
        self.frozen.store(true, Ordering::SeqCst);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    /// 동결되지 않은 독립 사본을 만듭니다.
    pub fn snapshot(&self) -> Store {
        Store {
            entries: RwLock::new(self.read().clone()),
            frozen: AtomicBool::new(false),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// 동결 상태를 유지하는 독립 사본
impl Clone for Store {
    fn clone(&self) -> Self {
        let copy = self.snapshot();
        copy.frozen.store(self.is_frozen(), Ordering::SeqCst);
        copy
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("keys", &self.keys())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::{Payload, RegisterOptions};

    fn value_item(value: i32) -> Item {
        Item::new("test", Payload::value(value), &RegisterOptions::new()).unwrap()
    }

    #[test]
    fn test_insert_unique_rejects_duplicates() {
        let store = Store::new();
        store.insert_unique("item".to_string(), value_item(1)).unwrap();

        let err = store.insert_unique("item".to_string(), value_item(2)).unwrap_err();

        assert_eq!(err, ContainerError::DuplicateKey { key: "item".to_string() });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_keys_preserve_insertion_order() {
        let store = Store::new();
        for key in ["zeta", "alpha", "mid"] {
            store.insert_unique(key.to_string(), value_item(0)).unwrap();
        }

        assert_eq!(store.keys(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_frozen_store_rejects_mutation() {
        let store = Store::new();
        store.insert_unique("item".to_string(), value_item(1)).unwrap();
        let original = store.get("item").unwrap();
        store.freeze();

        assert!(matches!(
            store.insert_unique("other".to_string(), value_item(2)),
            Err(ContainerError::FrozenState { .. })
        ));
        assert!(matches!(
            store.replace("item", &original, value_item(3)),
            Err(ContainerError::FrozenState { .. })
        ));
        assert!(store.get("item").is_some());
    }

    #[test]
    fn test_replace_missing_key_is_not_found() {
        let store = Store::new();
        store.insert_unique("item".to_string(), value_item(1)).unwrap();

        let original = store.get("item").unwrap();

        let err = store.replace("iten", &original, value_item(2)).unwrap_err();

        assert_eq!(
            err,
            ContainerError::NotFound {
                key: "iten".to_string(),
                suggestions: vec!["item".to_string()],
            }
        );
    }

    #[test]
    fn test_replace_rejects_stale_item() {
        let store = Store::new();
        store.insert_unique("item".to_string(), value_item(1)).unwrap();
        let stale = store.get("item").unwrap();
        let current = store.replace("item", &stale, value_item(2)).unwrap();
        assert!(Arc::ptr_eq(&current, &stale));

        let err = store.replace("item", &stale, value_item(3)).unwrap_err();

        assert_eq!(err, ContainerError::Conflict { key: "item".to_string() });
        let kept = store.get("item").unwrap().materialize();
        assert_eq!(kept.downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let store = Store::new();
        store.insert_unique("shared".to_string(), value_item(1)).unwrap();
        store.freeze();

        let copy = store.snapshot();
        copy.insert_unique("copy_only".to_string(), value_item(2)).unwrap();

        assert!(!copy.is_frozen());
        assert!(!store.contains("copy_only"));
        assert!(Arc::ptr_eq(&store.get("shared").unwrap(), &copy.get("shared").unwrap()));
    }

    #[test]
    fn test_clone_keeps_frozen_flag() {
        let store = Store::new();
        store.freeze();

        assert!(store.clone().is_frozen());
    }
}
