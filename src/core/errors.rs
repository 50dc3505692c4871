//! # Container Error Handling
//!
//! 서비스 컨테이너의 등록/조회/변경 연산에서 발생하는 모든 에러를 정의합니다.
//! `thiserror` 기반으로 `Error` trait을 자동 구현하며, 모든 연산은
//! [`ContainerResult`]를 반환하여 `?` 연산자로 자연스럽게 전파됩니다.
//!
//! ## 에러 분류
//!
//! | ContainerError | 발생 연산 | 복구 가능 여부 |
//! |----------------|-----------|----------------|
//! | `DuplicateKey` | register | 가능 (다른 키 사용 또는 `decorate`) |
//! | `NotFound` | resolve, decorate | 가능 (`resolve_or_else` 폴백) |
//! | `InvalidRegistration` | register, mock | 불가 (호출자 프로그래밍 오류) |
//! | `FrozenState` | register, merge, decorate | 불가 (생명주기 위반) |
//! | `TypeMismatch` | resolve_as, decorate | 불가 (타입 지정 오류) |
//!
//! 컨테이너는 에러를 내부에서 로깅하거나 삼키지 않습니다.
//! 네임스페이스와 오버라이드 계층도 에러를 변환 없이 그대로 전달합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use service_container::{Container, ContainerError};
//!
//! let container = Container::new();
//! match container.resolve("mailer") {
//!     Err(ContainerError::NotFound { key, suggestions }) => {
//!         eprintln!("{key} 없음, 후보: {suggestions:?}");
//!     }
//!     other => { /* ... */ }
//! }
//! ```

use thiserror::Error;

use crate::utils::string_utils::suggest_keys;

/// 컨테이너 연산 결과 타입
pub type ContainerResult<T> = Result<T, ContainerError>;

/// 서비스 컨테이너 에러 타입
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// 이미 등록된 키로 다시 등록을 시도한 경우
    ///
    /// 등록은 병합되거나 덮어써지지 않고 거부됩니다.
    /// 기존 키의 값을 교체하려면 `decorate`를 사용해야 합니다.
    #[error("There is already an item registered with the key {key:?}")]
    DuplicateKey { key: String },

    /// 등록되지 않은 키를 조회하거나 데코레이트한 경우
    ///
    /// `suggestions`에는 요청한 키와 철자가 비슷한 기존 키들이 담깁니다.
    #[error("Nothing registered with the key {key:?}{}", did_you_mean(.suggestions))]
    NotFound {
        key: String,
        suggestions: Vec<String>,
    },

    /// 등록 옵션과 페이로드 종류가 맞지 않는 경우
    ///
    /// # 발생 시나리오
    /// - 값 페이로드에 `singleton` 요청
    /// - `singleton`과 `call: false`를 동시에 지정
    /// - 값 페이로드에 `call: true` 강제
    #[error("Invalid registration for the key {key:?}: {reason}")]
    InvalidRegistration { key: String, reason: String },

    /// `freeze` 이후 저장소 변경을 시도한 경우
    #[error("Can't modify frozen container (when attempting to {operation} {key:?})")]
    FrozenState {
        operation: &'static str,
        key: String,
    },

    /// 데코레이트 도중 다른 호출이 같은 키의 항목을 먼저 교체한 경우
    ///
    /// 먼저 끝난 교체가 유지되며, 늦게 끝난 데코레이터의 결과는 버려집니다.
    #[error("The item registered with the key {key:?} was replaced while it was being decorated")]
    Conflict { key: String },

    /// 타입 지정 조회에서 등록된 값의 타입이 요청한 타입과 다른 경우
    #[error("Item registered with the key {key:?} is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

impl ContainerError {
    /// 기존 키 목록을 바탕으로 제안이 포함된 `NotFound` 에러를 생성합니다.
    pub fn not_found<'a, I>(key: &str, existing: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        ContainerError::NotFound {
            key: key.to_string(),
            suggestions: suggest_keys(key, existing),
        }
    }

    pub(crate) fn frozen(operation: &'static str, key: &str) -> Self {
        ContainerError::FrozenState {
            operation,
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ContainerError::InvalidRegistration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// 에러를 유발한 키
    pub fn key(&self) -> &str {
        match self {
            ContainerError::DuplicateKey { key }
            | ContainerError::NotFound { key, .. }
            | ContainerError::InvalidRegistration { key, .. }
            | ContainerError::FrozenState { key, .. }
            | ContainerError::Conflict { key }
            | ContainerError::TypeMismatch { key, .. } => key,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContainerError::NotFound { .. })
    }
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("{s:?}")).collect();
    format!(". Did you mean {}?", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_lists_suggestions() {
        let err = ContainerError::not_found("mailr", ["mailer", "logger"]);

        assert!(err.is_not_found());
        assert_eq!(err.key(), "mailr");
        assert_eq!(
            err.to_string(),
            "Nothing registered with the key \"mailr\". Did you mean \"mailer\"?"
        );
    }

    #[test]
    fn test_not_found_message_without_suggestions() {
        let err = ContainerError::not_found("database", ["cache"]);

        assert_eq!(err.to_string(), "Nothing registered with the key \"database\"");
    }

    #[test]
    fn test_frozen_message_names_operation() {
        let err = ContainerError::frozen("register", "item");

        assert_eq!(
            err.to_string(),
            "Can't modify frozen container (when attempting to register \"item\")"
        );
        assert!(!err.is_not_found());
    }
}
