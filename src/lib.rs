//! 서비스 컨테이너
//!
//! 문자열 키로 값과 팩토리를 등록하고 조회하는 스레드 안전한 IoC 컨테이너입니다.
//! 지연 싱글톤, 네임스페이스, 병합, 데코레이트, 동결, 그리고 테스트용
//! 스텁과 목을 제공합니다.
//!
//! # Features
//!
//! - **등록**: 값, 매 조회마다 호출되는 팩토리, 최초 1회만 호출되는 싱글톤
//! - **조회**: 철자 제안이 포함된 `NotFound` 에러, 타입 지정 조회
//! - **조합**: 네임스페이스 DSL, 컨테이너 병합, 데코레이터, 동결
//! - **테스트**: 스텁/목 오버라이드와 블록 범위 자동 복원
//! - **확장**: 교체 가능한 `Registry`/`Resolver` 전략
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    Container    │ ← 공개 API (등록/조회/조합/오버라이드)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Stub / Mock     │ ← 테스트 오버라이드 계층
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │Registry/Resolver│ ← 교체 가능한 쓰기/읽기 전략
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │      Store      │ ← 등록 순서 유지 + 동결 플래그
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use service_container::{Container, RegisterOptions, Payload};
//!
//! let container = Container::new();
//! container.register_value("app.name", "auth-service")?;
//! container.register_singleton("db.pool", || Pool::connect("postgres://localhost"))?;
//!
//! container.with_stub("db.pool", Pool::in_memory(), |c| {
//!     let pool = c.resolve_as::<Pool, _>("db.pool")?;
//!     run_migrations(&pool)
//! })?;
//! ```

pub mod config;
pub mod core;
pub mod utils;

pub use crate::config::{ContainerConfig, ContainerSettings};
pub use crate::core::{
    Container, ContainerError, ContainerResult, Instance, Namespace, NamespaceRegistration,
    Payload, RegisterOptions,
};
