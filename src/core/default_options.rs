//! 기본 등록 옵션을 적용하는 컨테이너 뷰

use std::any::Any;

use crate::core::container::Container;
use crate::core::errors::ContainerResult;
use crate::core::item::{Payload, RegisterOptions};

/// 모든 등록에 기본 옵션을 병합하는 뷰
///
/// 명시적으로 지정한 옵션이 기본 옵션보다 우선합니다.
///
/// ```rust,ignore
/// let services = container.with_defaults(RegisterOptions::new().namespace("services"));
/// services.register_factory("mailer", Mailer::new)?;
/// assert!(container.has("services.mailer"));
/// ```
pub struct DefaultOptions<'a> {
    container: &'a Container,
    defaults: RegisterOptions,
}

impl<'a> DefaultOptions<'a> {
    pub(crate) fn new(container: &'a Container, defaults: RegisterOptions) -> Self {
        Self { container, defaults }
    }

    pub fn defaults(&self) -> &RegisterOptions {
        &self.defaults
    }

    pub fn register<K: AsRef<str>>(
        &self,
        key: K,
        payload: Payload,
        options: RegisterOptions,
    ) -> ContainerResult<()> {
        self.container
            .register(key, payload, options.merged_over(&self.defaults))
    }

    pub fn register_value<K, T>(&self, key: K, value: T) -> ContainerResult<()>
    where
        K: AsRef<str>,
        T: Any + Send + Sync,
    {
        self.register(key, Payload::value(value), RegisterOptions::new())
    }

    pub fn register_factory<K, T, F>(&self, key: K, factory: F) -> ContainerResult<()>
    where
        K: AsRef<str>,
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(key, Payload::factory(factory), RegisterOptions::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ContainerError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults_apply_to_every_registration() {
        let container = Container::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let singletons = container.with_defaults(RegisterOptions::new().singleton(true).namespace("app"));

        singletons
            .register_factory("clock", move || counter.fetch_add(1, Ordering::SeqCst))
            .unwrap();
        container.resolve("app.clock").unwrap();
        container.resolve("app.clock").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_options_override_defaults() {
        let container = Container::new();
        let view = container.with_defaults(RegisterOptions::new().singleton(true));

        view.register("plain", Payload::value(1), RegisterOptions::new().singleton(false))
            .unwrap();
        let err = view.register_value("bad", 2).unwrap_err();

        assert!(container.has("plain"));
        assert!(matches!(err, ContainerError::InvalidRegistration { .. }));
    }
}
