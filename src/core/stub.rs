//! # Stub Layer
//!
//! 테스트에서 특정 키의 조회 결과를 임시로 바꿔치기하는 오버라이드 맵입니다.
//! 스텁은 실제 저장소를 건드리지 않으며, 제거하면 원래 조회 동작으로 그대로 돌아갑니다.
//!
//! ```text
//! Unstubbed ──stub(key)──▶ Stubbed ──unstub(key) / 블록 종료──▶ Unstubbed
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use log::debug;

use crate::core::item::Instance;

/// 컨테이너별 스텁 맵
#[derive(Default)]
pub struct StubLayer {
    stubs: RwLock<HashMap<String, Instance>>,
}

impl StubLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 스텁을 추가하고 이전 스텁 값을 반환합니다.
    pub fn stub(&self, key: String, value: Instance) -> Option<Instance> {
        debug!("🧪 Stubbed: {}", key);
        self.stubs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<Instance> {
        self.stubs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn is_stubbed(&self, key: &str) -> bool {
        self.stubs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn stubbed_keys(&self) -> Vec<String> {
        self.stubs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// 주어진 키들의 스텁을 제거합니다. 키가 비어 있으면 모든 스텁을 제거합니다.
    pub fn unstub<K: AsRef<str>>(&self, keys: &[K]) {
        let mut stubs = self.stubs.write().unwrap_or_else(PoisonError::into_inner);
        if keys.is_empty() {
            stubs.clear();
            return;
        }
        for key in keys {
            stubs.remove(key.as_ref());
        }
    }

    /// 블록 범위 스텁을 설치하고, 가드가 해제될 때 이전 상태로 복원합니다.
    pub fn scoped(&self, key: String, value: Instance) -> StubGuard<'_> {
        let previous = self.stub(key.clone(), value);
        StubGuard {
            layer: self,
            key,
            previous,
        }
    }
}

/// 범위 스텁 가드
///
/// 블록이 정상 종료하든 패닉하든 `Drop`에서 무조건 복원됩니다.
pub struct StubGuard<'a> {
    layer: &'a StubLayer,
    key: String,
    previous: Option<Instance>,
}

impl Drop for StubGuard<'_> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => {
                self.layer.stub(self.key.clone(), previous);
            }
            None => self.layer.unstub(&[self.key.as_str()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_unstub_without_keys_clears_everything() {
        let layer = StubLayer::new();
        layer.stub("a".to_string(), Arc::new(1));
        layer.stub("b".to_string(), Arc::new(2));

        layer.unstub::<&str>(&[]);

        assert!(layer.stubbed_keys().is_empty());
    }

    #[test]
    fn test_scoped_stub_restores_previous_stub() {
        let layer = StubLayer::new();
        layer.stub("item".to_string(), Arc::new("outer"));

        {
            let _guard = layer.scoped("item".to_string(), Arc::new("inner"));
            let current = layer.get("item").unwrap();
            assert_eq!(current.downcast_ref::<&str>(), Some(&"inner"));
        }

        let restored = layer.get("item").unwrap();
        assert_eq!(restored.downcast_ref::<&str>(), Some(&"outer"));
    }

    #[test]
    fn test_scoped_stub_is_removed_after_guard() {
        let layer = StubLayer::new();

        {
            let _guard = layer.scoped("item".to_string(), Arc::new(1));
            assert!(layer.is_stubbed("item"));
        }

        assert!(!layer.is_stubbed("item"));
    }
}
