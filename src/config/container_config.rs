//! 컨테이너 설정 관리 모듈
//!
//! 네임스페이스 구분자와 교체 가능한 Registry/Resolver 전략을 관리합니다.

use std::env;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::registry::{DefaultRegistry, Registry};
use crate::core::resolver::{DefaultResolver, Resolver};

/// 기본 네임스페이스 구분자
pub const DEFAULT_NAMESPACE_SEPARATOR: &str = ".";

/// 네임스페이스 구분자를 덮어쓰는 환경 변수
pub const NAMESPACE_SEPARATOR_ENV: &str = "CONTAINER_NAMESPACE_SEPARATOR";

/// 컨테이너 인스턴스별 설정
///
/// 컨테이너 생성 시점에 고정되며, 복제와 파생 시 그대로 복사됩니다.
///
/// # Examples
///
/// ```rust,ignore
/// let config = ContainerConfig::default()
///     .with_namespace_separator("::")
///     .with_registry(Arc::new(AuditingRegistry::new()));
/// let container = Container::with_config(config);
/// ```
#[derive(Clone)]
pub struct ContainerConfig {
    /// 네임스페이스 경로와 키 사이에 넣는 구분자
    pub namespace_separator: String,
    pub registry: Arc<dyn Registry>,
    pub resolver: Arc<dyn Resolver>,
}

impl ContainerConfig {
    pub fn with_namespace_separator(mut self, separator: impl Into<String>) -> Self {
        self.namespace_separator = separator.into();
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// 직렬화 가능한 설정값으로 기본 전략을 사용하는 설정을 만듭니다.
    pub fn from_settings(settings: &ContainerSettings) -> Self {
        Self::default().with_namespace_separator(settings.namespace_separator.clone())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            namespace_separator: DEFAULT_NAMESPACE_SEPARATOR.to_string(),
            registry: Arc::new(DefaultRegistry),
            resolver: Arc::new(DefaultResolver),
        }
    }
}

impl fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("namespace_separator", &self.namespace_separator)
            .finish_non_exhaustive()
    }
}

/// 파일이나 환경 변수에서 읽어 오는 설정값
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    pub namespace_separator: String,
}

impl ContainerSettings {
    /// 환경 변수에서 설정을 읽습니다.
    ///
    /// # Environment Variables
    ///
    /// - `CONTAINER_NAMESPACE_SEPARATOR`: 네임스페이스 구분자 (기본값: `"."`, 빈 값은 무시)
    pub fn from_env() -> Self {
        match env::var(NAMESPACE_SEPARATOR_ENV) {
            Ok(separator) if !separator.is_empty() => Self {
                namespace_separator: separator,
            },
            _ => Self::default(),
        }
    }

    /// JSON 문서에서 설정을 읽습니다. 누락된 필드는 기본값을 사용합니다.
    ///
    /// ```rust,ignore
    /// let settings = ContainerSettings::from_json(r#"{ "namespace_separator": "::" }"#)?;
    /// ```
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            namespace_separator: DEFAULT_NAMESPACE_SEPARATOR.to_string(),
        }
    }
}
