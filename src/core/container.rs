//! # Container - 서비스 컨테이너
//!
//! 저장소, 설정, 스텁 계층, 목 Resolver를 하나로 조합한 컨테이너입니다.
//! 상속이나 전역 상태 없이 매번 새로 생성하며, 파생 컨테이너가 필요하면
//! [`Container::derive_child`]로 저장소를 깊은 복사합니다.
//!
//! ## 조회 흐름
//!
//! ```text
//! resolve(key)
//!    ├─ 1. StubLayer       ── 스텁 존재 → 스텁 값 반환
//!    ├─ 2. MockResolver    ── 목 존재 → 목 항목 실체화
//!    └─ 3. 설정된 Resolver ── 저장소 항목 실체화 / NotFound
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use service_container::{Container, Payload, RegisterOptions};
//!
//! let container = Container::new();
//! container.register_value("config.name", "auth")?;
//! container.register_singleton("db.pool", || Pool::connect("postgres://localhost"))?;
//! container.register_factory("request.id", Uuid::new_v4)?;
//!
//! let pool = container.resolve_as::<Pool, _>("db.pool")?;
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use crate::config::ContainerConfig;
use crate::core::default_options::DefaultOptions;
use crate::core::errors::{ContainerError, ContainerResult};
use crate::core::item::{Instance, Item, Payload, RegisterOptions};
use crate::core::mocking::MockResolver;
use crate::core::namespace::{Namespace, NamespaceDsl, registered_namespaces};
use crate::core::resolver::Resolver;
use crate::core::store::Store;
use crate::core::stub::StubLayer;
use crate::utils::string_utils::{join_namespace, normalize_key};

/// 서비스 컨테이너
pub struct Container {
    store: Store,
    config: ContainerConfig,
    stubs: StubLayer,
    mocks: MockResolver,
}

impl Container {
    /// 기본 설정(구분자 `"."`, 기본 Registry/Resolver)으로 컨테이너를 생성합니다.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self::from_parts(Store::new(), config)
    }

    fn from_parts(store: Store, config: ContainerConfig) -> Self {
        let mocks = MockResolver::new(config.resolver.clone());
        Self {
            store,
            config,
            stubs: StubLayer::new(),
            mocks,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn namespace_separator(&self) -> &str {
        &self.config.namespace_separator
    }

    /// 실제 저장소. 사용자 정의 Registry/Resolver를 직접 호출할 때 사용합니다.
    pub fn store(&self) -> &Store {
        &self.store
    }

    // ---------------------------------------------------------------
    // 등록
    // ---------------------------------------------------------------

    /// 설정된 Registry로 페이로드를 등록합니다.
    ///
    /// # Errors
    ///
    /// * `DuplicateKey` - 키가 이미 존재하는 경우
    /// * `InvalidRegistration` - 옵션과 페이로드가 맞지 않는 경우
    /// * `FrozenState` - 컨테이너가 동결된 경우
    pub fn register<K: AsRef<str>>(
        &self,
        key: K,
        payload: Payload,
        options: RegisterOptions,
    ) -> ContainerResult<()> {
        let options = self.with_separator(options);
        self.config
            .registry
            .register(&self.store, key.as_ref(), payload, &options)
            .map(|_| ())
    }

    /// `namespace` 옵션의 구분자가 비어 있으면 컨테이너 구분자로 채웁니다.
    fn with_separator(&self, options: RegisterOptions) -> RegisterOptions {
        match options.namespace_separator {
            Some(_) => options,
            None => options.namespace_separator(self.namespace_separator()),
        }
    }

    pub fn register_value<K, T>(&self, key: K, value: T) -> ContainerResult<()>
    where
        K: AsRef<str>,
        T: Any + Send + Sync,
    {
        self.register(key, Payload::value(value), RegisterOptions::new())
    }

    /// 조회할 때마다 호출되는 팩토리를 등록합니다.
    pub fn register_factory<K, T, F>(&self, key: K, factory: F) -> ContainerResult<()>
    where
        K: AsRef<str>,
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(key, Payload::factory(factory), RegisterOptions::new())
    }

    /// 최초 조회 시 한 번만 호출되는 지연 싱글톤을 등록합니다.
    pub fn register_singleton<K, T, F>(&self, key: K, factory: F) -> ContainerResult<()>
    where
        K: AsRef<str>,
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(
            key,
            Payload::factory(factory),
            RegisterOptions::new().singleton(true),
        )
    }

    /// 기본 옵션이 적용되는 등록 뷰를 반환합니다.
    pub fn with_defaults(&self, defaults: RegisterOptions) -> DefaultOptions<'_> {
        DefaultOptions::new(self, defaults)
    }

    // ---------------------------------------------------------------
    // 조회
    // ---------------------------------------------------------------

    /// 키에 해당하는 인스턴스를 조회합니다.
    ///
    /// 스텁 → 목 → 실제 저장소 순서로 확인합니다.
    pub fn resolve<K: AsRef<str>>(&self, key: K) -> ContainerResult<Instance> {
        let key = normalize_key(key.as_ref());
        if let Some(stubbed) = self.stubs.get(&key) {
            return Ok(stubbed);
        }
        self.mocks.resolve(&self.store, &key)
    }

    /// 조회한 인스턴스를 구체 타입으로 변환합니다.
    ///
    /// # Errors
    ///
    /// * `NotFound` - 키가 없는 경우
    /// * `TypeMismatch` - 등록된 값이 `T`가 아닌 경우
    pub fn resolve_as<T, K>(&self, key: K) -> ContainerResult<Arc<T>>
    where
        T: Any + Send + Sync,
        K: AsRef<str>,
    {
        let key = key.as_ref();
        self.resolve(key)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// 키가 없을 때 `fallback`의 결과를 반환합니다.
    ///
    /// `NotFound` 외의 에러는 그대로 전달됩니다.
    pub fn resolve_or_else<K, F>(&self, key: K, fallback: F) -> ContainerResult<Instance>
    where
        K: AsRef<str>,
        F: FnOnce(&str) -> Instance,
    {
        let key = key.as_ref();
        match self.resolve(key) {
            Err(ContainerError::NotFound { .. }) => Ok(fallback(key)),
            other => other,
        }
    }

    /// 키 등록 여부. 팩토리를 호출하지 않습니다.
    pub fn has<K: AsRef<str>>(&self, key: K) -> bool {
        let key = normalize_key(key.as_ref());
        self.stubs.is_stubbed(&key) || self.mocks.has(&self.store, &key)
    }

    /// 등록 순서대로 정렬된 실제 저장소의 키 목록
    pub fn keys(&self) -> Vec<String> {
        self.mocks.keys(&self.store)
    }

    pub fn each_key<F: FnMut(&str)>(&self, mut visitor: F) {
        self.mocks.each_key(&self.store, &mut visitor)
    }

    pub fn for_each<F: FnMut(&str, &Item)>(&self, mut visitor: F) {
        self.mocks.for_each(&self.store, &mut visitor)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // ---------------------------------------------------------------
    // 병합 / 데코레이트 / 네임스페이스
    // ---------------------------------------------------------------

    /// 다른 컨테이너의 항목을 복사해 옵니다.
    ///
    /// `namespace`가 주어지면 모든 키 앞에 `namespace + 구분자`를 붙입니다.
    /// 키가 겹치면 `other`의 항목으로 덮어씁니다. `other`는 변경되지 않습니다.
    pub fn merge(&self, other: &Container, namespace: Option<&str>) -> ContainerResult<()> {
        self.merge_with(other, namespace, |_, _, incoming| incoming.clone())
    }

    /// 키 충돌 시 `on_conflict(키, 기존 항목, 새 항목)`이 남길 항목을 고르는 병합
    pub fn merge_with<F>(
        &self,
        other: &Container,
        namespace: Option<&str>,
        on_conflict: F,
    ) -> ContainerResult<()>
    where
        F: FnMut(&str, &Arc<Item>, &Arc<Item>) -> Arc<Item>,
    {
        let separator = self.namespace_separator();
        let incoming: Vec<(String, Arc<Item>)> = other
            .store
            .entries()
            .into_iter()
            .map(|(key, item)| match namespace {
                Some(namespace) => (join_namespace(namespace, &key, separator), item),
                None => (key, item),
            })
            .collect();
        let count = incoming.len();

        self.store.extend(incoming, on_conflict)?;

        info!("🔗 Merged {} items (namespace: {:?})", count, namespace);
        Ok(())
    }

    /// 등록된 값을 타입 지정 데코레이터로 교체합니다.
    ///
    /// ```rust,ignore
    /// container.register_value("k", 1)?;
    /// container.decorate("k", |value: Arc<i32>| vec![*value])?;
    /// assert_eq!(*container.resolve_as::<Vec<i32>, _>("k")?, vec![1]);
    /// ```
    pub fn decorate<T, U, K, F>(&self, key: K, decorator: F) -> ContainerResult<()>
    where
        T: Any + Send + Sync,
        U: Any + Send + Sync,
        K: AsRef<str>,
        F: FnOnce(Arc<T>) -> U,
    {
        let key_name = key.as_ref().to_string();
        self.decorate_with(key, move |instance| {
            let typed = instance
                .downcast::<T>()
                .map_err(|_| ContainerError::TypeMismatch {
                    key: key_name,
                    expected: type_name::<T>(),
                })?;
            Ok(Arc::new(decorator(typed)) as Instance)
        })
    }

    /// 등록된 항목을 실체화하고 데코레이터 결과로 원자적으로 교체합니다.
    ///
    /// 교체된 항목은 호출되지 않는 일반 값이며, 같은 키를 다시 데코레이트할 수 있습니다.
    ///
    /// # Errors
    ///
    /// * `FrozenState` - 컨테이너가 동결된 경우
    /// * `NotFound` - 키가 등록되어 있지 않은 경우
    /// * `Conflict` - 데코레이터가 실행되는 동안 같은 키가 먼저 교체된 경우
    /// * 데코레이터가 반환한 에러
    pub fn decorate_with<K, F>(&self, key: K, decorator: F) -> ContainerResult<()>
    where
        K: AsRef<str>,
        F: FnOnce(Instance) -> ContainerResult<Instance>,
    {
        let key = normalize_key(key.as_ref());
        if self.store.is_frozen() {
            return Err(ContainerError::frozen("decorate", &key));
        }

        let original = self.store.get(&key).ok_or_else(|| self.not_found(&key))?;
        let decorated = original.decorated(decorator)?;
        self.store.replace(&key, &original, decorated)?;

        debug!("🎨 Decorated: {}", key);
        Ok(())
    }

    fn not_found(&self, key: &str) -> ContainerError {
        let existing = self.store.keys();
        ContainerError::not_found(key, existing.iter().map(String::as_str))
    }

    /// 네임스페이스 안에서 블록을 실행합니다. 블록 안의 모든 키에 접두사가 붙습니다.
    pub fn namespace<F>(&self, name: &str, block: F) -> ContainerResult<()>
    where
        F: FnOnce(&NamespaceDsl<'_>) -> ContainerResult<()>,
    {
        let dsl = NamespaceDsl::new(self, normalize_key(name));
        block(&dsl)
    }

    /// 미리 정의한 네임스페이스를 가져옵니다.
    pub fn import(&self, namespace: &Namespace) -> ContainerResult<()> {
        self.namespace(namespace.name(), |dsl| namespace.apply(dsl))?;
        debug!("📥 Imported namespace: {}", namespace.name());
        Ok(())
    }

    /// `inventory`로 제출된 모든 네임스페이스를 가져오고, 가져온 개수를 반환합니다.
    pub fn import_registered(&self) -> ContainerResult<usize> {
        let namespaces = registered_namespaces();
        for namespace in &namespaces {
            self.import(namespace)?;
        }
        info!("📥 Imported {} registered namespaces", namespaces.len());
        Ok(namespaces.len())
    }

    // ---------------------------------------------------------------
    // 생명주기
    // ---------------------------------------------------------------

    /// 컨테이너를 영구적으로 동결합니다. 이후의 모든 등록은 `FrozenState`로 실패합니다.
    pub fn freeze(&self) -> &Self {
        self.store.freeze();
        info!("🧊 Container frozen with {} items", self.store.len());
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.store.is_frozen()
    }

    /// 저장소를 깊은 복사한, 동결되지 않은 파생 컨테이너를 만듭니다.
    ///
    /// 항목 객체는 공유되므로 이미 실체화된 싱글톤은 같은 인스턴스를 반환하지만,
    /// 이후의 등록은 서로에게 보이지 않습니다. 스텁과 목은 복사되지 않습니다.
    pub fn derive_child(&self) -> Container {
        Self::from_parts(self.store.snapshot(), self.config.clone())
    }

    // ---------------------------------------------------------------
    // 스텁 / 목
    // ---------------------------------------------------------------

    /// 키의 조회 결과를 `value`로 바꿔치기합니다.
    pub fn stub<K, T>(&self, key: K, value: T) -> &Self
    where
        K: AsRef<str>,
        T: Any + Send + Sync,
    {
        self.stubs.stub(normalize_key(key.as_ref()), Arc::new(value));
        self
    }

    /// 주어진 키들의 스텁을 제거합니다. 빈 슬라이스를 넘기면 모든 스텁을 제거합니다.
    pub fn unstub<K: AsRef<str>>(&self, keys: &[K]) -> &Self {
        let keys: Vec<String> = keys.iter().map(|key| normalize_key(key.as_ref())).collect();
        self.stubs.unstub(&keys);
        self
    }

    /// 블록을 실행하는 동안만 스텁을 적용합니다.
    ///
    /// 블록이 에러를 반환하거나 패닉해도 블록이 끝나면 반드시 복원됩니다.
    pub fn with_stub<K, T, R, F>(&self, key: K, value: T, block: F) -> R
    where
        K: AsRef<str>,
        T: Any + Send + Sync,
        F: FnOnce(&Self) -> R,
    {
        let _guard = self.stubs.scoped(normalize_key(key.as_ref()), Arc::new(value));
        block(self)
    }

    pub fn is_stubbed<K: AsRef<str>>(&self, key: K) -> bool {
        self.stubs.is_stubbed(&normalize_key(key.as_ref()))
    }

    /// 설정된 Registry로 목 항목을 등록하고, 목이 설정된 키 목록을 반환합니다.
    pub fn mock<K: AsRef<str>>(
        &self,
        key: K,
        payload: Payload,
        options: RegisterOptions,
    ) -> ContainerResult<Vec<String>> {
        let options = self.with_separator(options);
        self.mocks
            .mock(self.config.registry.as_ref(), key.as_ref(), payload, &options)
    }

    pub fn mock_value<K, T>(&self, key: K, value: T) -> ContainerResult<Vec<String>>
    where
        K: AsRef<str>,
        T: Any + Send + Sync,
    {
        self.mock(key, Payload::value(value), RegisterOptions::new())
    }

    /// 여러 목을 한 번에 등록합니다. 하나라도 실패하면 이번 호출로 설치한 목을 모두 되돌립니다.
    pub fn mock_many<I, K>(&self, entries: I) -> ContainerResult<Vec<String>>
    where
        I: IntoIterator<Item = (K, Payload)>,
        K: AsRef<str>,
    {
        let registry = self.config.registry.as_ref();
        let options = self.with_separator(RegisterOptions::new());
        let mut installed = Vec::new();
        for (key, payload) in entries {
            match self
                .mocks
                .install(registry, key.as_ref(), payload, &options)
            {
                Ok(mut batch) => installed.append(&mut batch),
                Err(err) => {
                    installed.reverse();
                    self.mocks.restore(installed);
                    return Err(err);
                }
            }
        }
        Ok(installed.into_iter().map(|(key, _)| key).collect())
    }

    /// 주어진 키들의 목을 제거하고, 실제로 제거된 키를 반환합니다.
    /// 빈 슬라이스를 넘기면 모든 목을 제거합니다.
    pub fn unmock<K: AsRef<str>>(&self, keys: &[K]) -> Vec<String> {
        self.mocks.unmock(keys)
    }

    /// 블록을 실행하는 동안만 목을 적용합니다.
    pub fn with_mock<K, R, F>(
        &self,
        key: K,
        payload: Payload,
        options: RegisterOptions,
        block: F,
    ) -> ContainerResult<R>
    where
        K: AsRef<str>,
        F: FnOnce(&Self) -> R,
    {
        let options = self.with_separator(options);
        let _guard = self.mocks.scoped(
            self.config.registry.as_ref(),
            key.as_ref(),
            payload,
            &options,
        )?;
        Ok(block(self))
    }

    pub fn is_mocked<K: AsRef<str>>(&self, key: K) -> bool {
        self.mocks.is_mocked(key.as_ref())
    }

    /// 이 컨테이너의 모든 스텁과 목을 제거합니다.
    pub fn clear_overrides(&self) {
        self.stubs.unstub::<String>(&[]);
        self.mocks.unmock::<String>(&[]);
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// 동결 상태를 유지하는 독립 사본. 스텁과 목은 복사되지 않습니다.
impl Clone for Container {
    fn clone(&self) -> Self {
        Self::from_parts(self.store.clone(), self.config.clone())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("store", &self.store)
            .field("namespace_separator", &self.config.namespace_separator)
            .field("stubs", &self.stubs.stubbed_keys())
            .field("mocks", &self.mocks)
            .finish()
    }
}
