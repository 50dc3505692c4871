//! # Container Item
//!
//! 컨테이너에 등록된 하나의 항목을 표현합니다.
//!
//! 등록 시점에 호출자가 페이로드 종류([`Payload::Value`] 또는
//! [`Payload::Factory`])를 명시하고, [`RegisterOptions`]의 `call`/`singleton`
//! 조합에 따라 조회 시 동작이 결정됩니다.
//!
//! | 페이로드 | call | singleton | 조회 결과 |
//! |----------|------|-----------|-----------|
//! | Value | - | - | 등록한 값 그대로 |
//! | Factory | true (기본값) | false | 매 조회마다 팩토리 호출 |
//! | Factory | false | false | 팩토리 자체 ([`Factory`]) |
//! | Factory | - | true | 최초 1회만 호출, 이후 캐시된 값 |
//!
//! 싱글톤 항목은 항목별 `OnceCell`로 보호되므로 서로 다른 키의 조회는 경합하지 않고,
//! 같은 키를 동시에 처음 조회해도 팩토리는 정확히 한 번만 실행됩니다.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::core::errors::{ContainerError, ContainerResult};

/// 컨테이너가 보관하고 반환하는 타입 소거된 인스턴스
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 인자 없는 팩토리
pub type Factory = Arc<dyn Fn() -> Instance + Send + Sync>;

/// 등록 페이로드
#[derive(Clone)]
pub enum Payload {
    /// 조회 시 그대로 반환되는 값
    Value(Instance),
    /// 조회 시 호출되는 인자 없는 팩토리
    Factory(Factory),
}

impl Payload {
    /// 임의의 값을 값 페이로드로 감쌉니다.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Payload::Value(Arc::new(value))
    }

    /// 이미 `Arc`로 공유 중인 값을 추가 래핑 없이 등록합니다.
    ///
    /// `Payload::value(arc)`는 `Arc<Arc<T>>`를 만들기 때문에,
    /// 공유 인스턴스는 이 생성자를 사용해야 `resolve_as::<T>`로 꺼낼 수 있습니다.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Payload::Value(value)
    }

    /// 타입이 지정된 팩토리를 팩토리 페이로드로 감쌉니다.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Payload::Factory(Arc::new(move || Arc::new(factory()) as Instance))
    }

    /// 인자를 받는 함수를 값으로 등록합니다.
    ///
    /// 컨테이너는 이 함수를 호출하지 않으며, 조회 결과는
    /// `Arc<dyn Fn(A) -> R + Send + Sync>` 타입의 값입니다.
    pub fn function<A, R, F>(function: F) -> Self
    where
        A: 'static,
        R: 'static,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let function: Arc<dyn Fn(A) -> R + Send + Sync> = Arc::new(function);
        Payload::Value(Arc::new(function))
    }

    /// 인자 없이 호출 가능한 페이로드인지 여부
    pub fn is_callable(&self) -> bool {
        matches!(self, Payload::Factory(_))
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Value(_) => f.write_str("Payload::Value(..)"),
            Payload::Factory(_) => f.write_str("Payload::Factory(..)"),
        }
    }
}

/// 등록 옵션
///
/// 모든 필드는 선택 사항이며, 지정하지 않은 값은 페이로드 종류에 따라 추론됩니다.
///
/// ```rust,ignore
/// let options = RegisterOptions::new()
///     .singleton(true)
///     .namespace("db")
///     .namespace_separator("::");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// 조회 시 페이로드를 호출할지 여부 (기본값: 팩토리이면 `true`)
    pub call: Option<bool>,
    /// 최초 1회만 호출하고 결과를 캐시할지 여부 (기본값: `false`)
    pub singleton: Option<bool>,
    /// 키 앞에 붙일 네임스페이스
    pub namespace: Option<String>,
    /// `namespace` 옵션에 사용할 구분자 (기본값: `"."`)
    pub namespace_separator: Option<String>,
}

impl RegisterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(mut self, call: bool) -> Self {
        self.call = Some(call);
        self
    }

    pub fn singleton(mut self, singleton: bool) -> Self {
        self.singleton = Some(singleton);
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn namespace_separator(mut self, separator: impl Into<String>) -> Self {
        self.namespace_separator = Some(separator.into());
        self
    }

    /// 지정되지 않은 필드를 `defaults`의 값으로 채운 새 옵션을 반환합니다.
    pub fn merged_over(&self, defaults: &RegisterOptions) -> RegisterOptions {
        RegisterOptions {
            call: self.call.or(defaults.call),
            singleton: self.singleton.or(defaults.singleton),
            namespace: self.namespace.clone().or_else(|| defaults.namespace.clone()),
            namespace_separator: self
                .namespace_separator
                .clone()
                .or_else(|| defaults.namespace_separator.clone()),
        }
    }
}

/// 등록된 하나의 항목
///
/// 싱글톤 캐시의 1회성 전이를 제외하면 불변입니다.
pub struct Item {
    payload: Payload,
    call: bool,
    memo: Option<OnceCell<Instance>>,
}

impl Item {
    /// 페이로드와 옵션으로 항목을 생성합니다.
    ///
    /// # Errors
    ///
    /// * `InvalidRegistration` - 값 페이로드에 싱글톤이나 `call: true`를 요청한 경우,
    ///   또는 싱글톤에 `call: false`를 함께 지정한 경우
    pub fn new(key: &str, payload: Payload, options: &RegisterOptions) -> ContainerResult<Self> {
        let singleton = options.singleton.unwrap_or(false);
        let call = options.call.unwrap_or(payload.is_callable());

        if singleton && !payload.is_callable() {
            return Err(ContainerError::invalid(key, "singleton requires a factory payload"));
        }
        if singleton && !call {
            return Err(ContainerError::invalid(key, "singleton items are always called"));
        }
        if call && !payload.is_callable() {
            return Err(ContainerError::invalid(key, "a value payload can't be called"));
        }

        Ok(Item {
            payload,
            call,
            memo: singleton.then(OnceCell::new),
        })
    }

    /// 호출되지 않는 일반 값 항목을 생성합니다.
    pub fn value(instance: Instance) -> Self {
        Item {
            payload: Payload::Value(instance),
            call: false,
            memo: None,
        }
    }

    /// 항목을 실체화합니다.
    ///
    /// 싱글톤은 최초 호출자만 팩토리를 실행하며, 동시에 진입한 다른 호출자는
    /// 초기화가 끝날 때까지 대기한 뒤 같은 인스턴스를 받습니다.
    pub fn materialize(&self) -> Instance {
        match (&self.payload, &self.memo) {
            (Payload::Factory(factory), Some(memo)) => memo.get_or_init(|| (**factory)()).clone(),
            (Payload::Factory(factory), None) if self.call => (**factory)(),
            (Payload::Factory(factory), None) => Arc::new(factory.clone()) as Instance,
            (Payload::Value(value), _) => value.clone(),
        }
    }

    /// 실체화한 값에 데코레이터를 적용한 새 값 항목을 만듭니다.
    pub fn decorated<F>(&self, decorator: F) -> ContainerResult<Item>
    where
        F: FnOnce(Instance) -> ContainerResult<Instance>,
    {
        decorator(self.materialize()).map(Item::value)
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// 조회 시 페이로드를 호출하는지 여부
    pub fn is_called(&self) -> bool {
        self.call
    }

    pub fn is_singleton(&self) -> bool {
        self.memo.is_some()
    }

    /// 싱글톤이 이미 실체화되었는지 여부 (싱글톤이 아니면 항상 `false`)
    pub fn is_resolved(&self) -> bool {
        self.memo.as_ref().is_some_and(|memo| memo.get().is_some())
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("payload", &self.payload)
            .field("call", &self.call)
            .field("singleton", &self.is_singleton())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
