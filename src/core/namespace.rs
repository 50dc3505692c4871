//! # Namespace DSL
//!
//! 등록/조회하는 모든 키 앞에 네임스페이스 경로를 붙여 주는 범위 뷰입니다.
//!
//! ```rust,ignore
//! container.namespace("db", |db| {
//!     db.register_value("url", "postgres://localhost")?;
//!     db.namespace("pool", |pool| pool.register_value("size", 10))
//! })?;
//!
//! assert!(container.has("db.url"));
//! assert!(container.has("db.pool.size"));
//! ```
//!
//! 미리 정의한 [`Namespace`]는 어느 깊이에서든 [`NamespaceDsl::import`]로 가져올 수 있으며,
//! `inventory::submit!`으로 제출한 [`NamespaceRegistration`]은
//! `Container::import_registered`로 한 번에 가져옵니다.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::core::container::Container;
use crate::core::errors::ContainerResult;
use crate::core::item::{Instance, Payload, RegisterOptions};
use crate::utils::string_utils::join_namespace;

/// 지연 실행되는 네임스페이스 등록 블록
pub type NamespaceBlock = Arc<dyn Fn(&NamespaceDsl<'_>) -> ContainerResult<()> + Send + Sync>;

/// 이름과 지연 블록으로 구성된 네임스페이스 정의
///
/// 정의 자체는 아무것도 등록하지 않으며, 가져오는 위치마다 블록이 다시 실행됩니다.
#[derive(Clone)]
pub struct Namespace {
    name: String,
    block: NamespaceBlock,
}

impl Namespace {
    pub fn new<F>(name: impl Into<String>, block: F) -> Self
    where
        F: Fn(&NamespaceDsl<'_>) -> ContainerResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            block: Arc::new(block),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn apply(&self, dsl: &NamespaceDsl<'_>) -> ContainerResult<()> {
        (self.block)(dsl)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace").field("name", &self.name).finish()
    }
}

/// 컴파일 타임에 수집되는 네임스페이스 정의
///
/// ```rust,ignore
/// fn mailer_namespace() -> Namespace {
///     Namespace::new("mailer", |ns| ns.register_value("from", "noreply@example.com"))
/// }
///
/// inventory::submit! {
///     NamespaceRegistration { build: mailer_namespace }
/// }
/// ```
pub struct NamespaceRegistration {
    pub build: fn() -> Namespace,
}

inventory::collect!(NamespaceRegistration);

/// 제출된 모든 네임스페이스 정의
pub fn registered_namespaces() -> Vec<Namespace> {
    inventory::iter::<NamespaceRegistration>
        .into_iter()
        .map(|registration| (registration.build)())
        .collect()
}

/// 키 접두사를 붙여 대상 컨테이너에 위임하는 범위 뷰
pub struct NamespaceDsl<'a> {
    container: &'a Container,
    path: String,
}

impl<'a> NamespaceDsl<'a> {
    pub(crate) fn new(container: &'a Container, path: String) -> Self {
        Self { container, path }
    }

    /// 현재 네임스페이스 경로 (예: `"one.two"`)
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn container(&self) -> &'a Container {
        self.container
    }

    fn namespaced(&self, key: &str) -> String {
        join_namespace(&self.path, key, self.container.namespace_separator())
    }

    pub fn register(&self, key: &str, payload: Payload, options: RegisterOptions) -> ContainerResult<()> {
        self.container.register(self.namespaced(key), payload, options)
    }

    pub fn register_value<T: Any + Send + Sync>(&self, key: &str, value: T) -> ContainerResult<()> {
        self.container.register_value(self.namespaced(key), value)
    }

    pub fn register_factory<T, F>(&self, key: &str, factory: F) -> ContainerResult<()>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.container.register_factory(self.namespaced(key), factory)
    }

    pub fn register_singleton<T, F>(&self, key: &str, factory: F) -> ContainerResult<()>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.container.register_singleton(self.namespaced(key), factory)
    }

    /// 현재 경로 아래에 중첩 네임스페이스를 엽니다.
    pub fn namespace<F>(&self, name: &str, block: F) -> ContainerResult<()>
    where
        F: FnOnce(&NamespaceDsl<'_>) -> ContainerResult<()>,
    {
        let nested = NamespaceDsl::new(self.container, self.namespaced(name));
        block(&nested)
    }

    /// 미리 정의한 네임스페이스를 현재 경로 아래로 가져옵니다.
    pub fn import(&self, namespace: &Namespace) -> ContainerResult<()> {
        self.namespace(namespace.name(), |dsl| namespace.apply(dsl))
    }

    /// 현재 네임스페이스 기준의 상대 키를 조회합니다.
    pub fn resolve(&self, key: &str) -> ContainerResult<Instance> {
        self.container.resolve(self.namespaced(key))
    }

    pub fn resolve_as<T: Any + Send + Sync>(&self, key: &str) -> ContainerResult<Arc<T>> {
        self.container.resolve_as::<T, _>(self.namespaced(key))
    }

    /// 접두사를 붙이지 않고 완전한 키를 그대로 조회합니다.
    pub fn resolve_absolute(&self, key: &str) -> ContainerResult<Instance> {
        self.container.resolve(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.container.has(self.namespaced(key))
    }
}

impl fmt::Debug for NamespaceDsl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceDsl").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContainerConfig;
    use crate::core::errors::ContainerError;

    fn audit_namespace() -> Namespace {
        Namespace::new("audit", |ns| ns.register_value("enabled", true))
    }

    inventory::submit! {
        NamespaceRegistration { build: audit_namespace }
    }

    #[test]
    fn test_register_inside_namespace() {
        let container = Container::new();

        container
            .namespace("one", |ns| ns.register_value("two", 2))
            .unwrap();

        assert_eq!(*container.resolve_as::<i32, _>("one.two").unwrap(), 2);
        assert!(!container.has("two"));
    }

    #[test]
    fn test_nested_namespaces_compose_prefixes() {
        let container = Container::new();

        container
            .namespace("one", |one| one.namespace("two", |two| two.register_value("three", 3)))
            .unwrap();

        assert_eq!(*container.resolve_as::<i32, _>("one.two.three").unwrap(), 3);
    }

    #[test]
    fn test_custom_separator() {
        let container = Container::with_config(ContainerConfig::default().with_namespace_separator("-"));

        container
            .namespace("one", |ns| ns.register_value("key", "item"))
            .unwrap();

        assert_eq!(*container.resolve_as::<&str, _>("one-key").unwrap(), "item");
    }

    #[test]
    fn test_resolve_is_relative_with_absolute_escape() {
        let container = Container::new();
        container.register_value("root", "top").unwrap();

        container
            .namespace("one", |ns| {
                ns.register_value("two", 2)?;
                assert_eq!(*ns.resolve_as::<i32>("two")?, 2);
                assert!(ns.has("two"));
                assert!(ns.resolve("root").unwrap_err().is_not_found());

                let root = ns.resolve_absolute("root")?;
                assert_eq!(root.downcast_ref::<&str>(), Some(&"top"));
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_import_at_top_level_and_nested() {
        let definition = Namespace::new("two", |ns| ns.register_value("three", 3));
        let container = Container::new();

        container.import(&definition).unwrap();
        container.namespace("one", |ns| ns.import(&definition)).unwrap();

        assert_eq!(*container.resolve_as::<i32, _>("two.three").unwrap(), 3);
        assert_eq!(*container.resolve_as::<i32, _>("one.two.three").unwrap(), 3);
    }

    #[test]
    fn test_errors_pass_through_unchanged() {
        let container = Container::new();
        container.register_value("one.two", 1).unwrap();

        let err = container
            .namespace("one", |ns| ns.register_value("two", 2))
            .unwrap_err();

        assert_eq!(err, ContainerError::DuplicateKey { key: "one.two".to_string() });
    }

    #[test]
    fn test_registered_namespaces_are_collected() {
        let container = Container::new();

        let imported = container.import_registered().unwrap();

        assert!(imported >= 1);
        assert!(*container.resolve_as::<bool, _>("audit.enabled").unwrap());
    }
}
