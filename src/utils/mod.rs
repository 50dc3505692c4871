//! 공통 유틸리티 함수 모듈
//!
//! 컨테이너 전체에서 사용되는 공통 유틸리티 함수들을 제공합니다.
//! 키 문자열 처리, 터미널 출력 등의 기능을 포함합니다.
//!
//! # Modules
//!
//! - [`string_utils`] - 키 정규화, 네임스페이스 결합, 철자 제안
//! - [`display_terminal`] - 터미널 출력 포맷팅 함수들
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::utils::string_utils::join_namespace;
//! use crate::utils::display_terminal::print_boxed_title;
//!
//! let key = join_namespace("db", "pool", ".");
//! print_boxed_title("Service Container");
//! ```

pub mod string_utils;
pub mod display_terminal;
