//! # Configuration Module
//!
//! 서비스 컨테이너의 설정 관리를 담당하는 모듈입니다.
//! Spring Framework의 `@Configuration` 클래스와 유사하게, 컨테이너마다
//! 네임스페이스 구분자와 등록/조회 전략을 주입합니다.
//!
//! ## 모듈 구성
//!
//! - [`container_config`] - 구분자, Registry/Resolver 전략, 환경 변수/JSON 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{ContainerConfig, ContainerSettings};
//!
//! // 환경 변수 기반 설정
//! let settings = ContainerSettings::from_env();
//! let container = Container::with_config(ContainerConfig::from_settings(&settings));
//!
//! // 코드 기반 설정
//! let config = ContainerConfig::default().with_namespace_separator("::");
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 네임스페이스 구분자 (기본값: ".")
//! export CONTAINER_NAMESPACE_SEPARATOR="::"
//! ```
//!
//! ## Spring과의 비교
//!
//! | Spring | Rust (이 프로젝트) |
//! |--------|-------------------|
//! | `@Configuration` | `ContainerConfig` |
//! | `@Value("${property}")` | `env::var("PROPERTY")` |
//! | `@ConfigurationProperties` | `ContainerSettings` (serde) |
//! | `application.yml` | `.env` 파일 / JSON |

pub mod container_config;

pub use container_config::*;
