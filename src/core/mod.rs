//! # Core Container Module
//!
//! 문자열 키 기반 서비스 컨테이너의 핵심 기능을 제공하는 모듈입니다.
//! Spring Framework의 `BeanFactory`와 비슷한 역할을 하지만, 타입 기반 자동 주입 대신
//! 명시적인 키로 값과 팩토리를 등록하고 조회합니다.
//!
//! ## 모듈 구성
//!
//! ### [`container`] - 컨테이너 파사드
//! - **등록/조회**: 값, 팩토리, 지연 싱글톤
//! - **조합**: 병합, 데코레이트, 네임스페이스, 동결, 파생
//! - **테스트 지원**: 스텁, 목, 범위 오버라이드
//!
//! ### [`registry`] / [`resolver`] - 교체 가능한 전략
//! - **Registry**: 쓰기 측면. 키 중복 없는 원자적 삽입
//! - **Resolver**: 읽기 측면. 실체화와 철자 제안이 담긴 `NotFound`
//!
//! ### [`store`] / [`item`] - 저장 계층
//! - **Store**: 등록 순서를 유지하는 잠금 보호 맵과 동결 플래그
//! - **Item**: 페이로드와 `call`/`singleton` 정책
//!
//! ### [`stub`] / [`mocking`] - 오버라이드 계층
//! - **StubLayer**: 키별 값 바꿔치기
//! - **MockResolver**: 별도 저장소를 우선 조회하는 Resolver 데코레이터
//!
//! ### [`namespace`] / [`default_options`] - 등록 뷰
//!
//! ### [`errors`] - 통합 에러 처리
//!
//! ## Spring Framework와의 비교
//!
//! | Spring | 이 컨테이너 |
//! |--------|-------------|
//! | `BeanFactory::getBean(name)` | `Container::resolve(key)` |
//! | `registerSingleton` | `Container::register_value` |
//! | `@Scope("singleton")` + `@Lazy` | `Container::register_singleton` |
//! | `@Scope("prototype")` | `Container::register_factory` |
//! | `BeanPostProcessor` | `Container::decorate` |
//! | `@MockBean` | `Container::mock` / `Container::with_mock` |
//! | `ConfigurableBeanFactory::freezeConfiguration` | `Container::freeze` |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use service_container::core::{Container, Namespace};
//!
//! let container = Container::new();
//! container.register_value("app.name", "auth-service")?;
//! container.namespace("db", |db| {
//!     db.register_singleton("pool", || Pool::connect("postgres://localhost"))
//! })?;
//! container.freeze();
//!
//! let pool = container.resolve_as::<Pool, _>("db.pool")?;
//! ```
//!
//! ## 트러블슈팅
//!
//! ### 미등록 키
//! ```text
//! Nothing registered with the key "db.pol". Did you mean "db.pool"?
//! ```
//! **해결**: 제안된 키를 확인하거나 `Container::keys()`로 등록된 키를 출력
//!
//! ### 동결 이후 등록
//! ```text
//! Can't modify frozen container (when attempting to register "late.service")
//! ```
//! **해결**: 모든 등록을 `freeze()` 이전으로 옮기거나 `derive_child()`로 파생 컨테이너 사용

pub mod container;
pub mod default_options;
pub mod errors;
pub mod item;
pub mod mocking;
pub mod namespace;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod stub;

pub use container::Container;
pub use default_options::DefaultOptions;
pub use errors::*;
pub use item::{Factory, Instance, Item, Payload, RegisterOptions};
pub use mocking::MockResolver;
pub use namespace::{Namespace, NamespaceDsl, NamespaceRegistration, registered_namespaces};
pub use registry::{DefaultRegistry, Registry};
pub use resolver::{DefaultResolver, Resolver};
pub use store::Store;
pub use stub::{StubGuard, StubLayer};
