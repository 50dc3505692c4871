//! 서비스 컨테이너 점검 도구
//!
//! 수집된 네임스페이스와 환경 설정으로 컨테이너를 구성하고,
//! 등록된 항목 목록을 출력합니다. 인자로 넘긴 키는 실제로 조회해 봅니다.

use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use service_container::core::registered_namespaces;
use service_container::utils::display_terminal::{
    print_boxed_title, print_final_summary, print_item, print_lookup_failure, print_step_complete,
    print_step_start,
};
use service_container::{
    Container, ContainerConfig, ContainerResult, ContainerSettings, Namespace,
    NamespaceRegistration,
};

/// 점검 도구 자체의 메타데이터 네임스페이스
fn app_namespace() -> Namespace {
    Namespace::new("app", |ns| {
        ns.register_value("name", env!("CARGO_PKG_NAME"))?;
        ns.register_value("version", env!("CARGO_PKG_VERSION"))
    })
}

inventory::submit! {
    NamespaceRegistration { build: app_namespace }
}

fn main() {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 서비스 컨테이너 구성 시작중...");

    let container = match build_container() {
        Ok(container) => container,
        Err(e) => {
            error!("❌ 컨테이너 구성 실패: {}", e);
            std::process::exit(1);
        }
    };

    let keys: Vec<String> = std::env::args().skip(1).collect();
    if !keys.is_empty() {
        resolve_requested(&container, &keys);
    }

    print_listing(&container);
}

/// 설정을 읽고, 수집된 네임스페이스를 가져온 뒤 컨테이너를 동결합니다
///
/// # Errors
///
/// * `ContainerError` - 네임스페이스 등록 중 키 충돌 등
fn build_container() -> ContainerResult<Container> {
    let settings = ContainerSettings::from_env();
    info!("⚙️ 네임스페이스 구분자: {:?}", settings.namespace_separator);

    let container = Container::with_config(ContainerConfig::from_settings(&settings));

    print_boxed_title("Service Container");
    print_step_start(1, "Importing registered namespaces");
    let imported = container.import_registered()?;
    for namespace in registered_namespaces() {
        info!("📥 {}", namespace.name());
    }
    print_step_complete(1, "Namespaces imported", imported);

    print_step_start(2, "Freezing container");
    container.freeze();
    print_step_complete(2, "Container frozen", container.len());

    info!("✅ 컨테이너 구성 완료");
    Ok(container)
}

/// 인자로 받은 키들을 조회하고, 실패한 키는 에러 메시지를 출력합니다
fn resolve_requested(container: &Container, keys: &[String]) {
    print_step_start(3, "Resolving requested keys");
    let mut resolved = 0;
    for key in keys {
        match container.resolve(key) {
            Ok(_) => resolved += 1,
            Err(e) => print_lookup_failure(key, &e.to_string()),
        }
    }
    print_step_complete(3, "Keys resolved", resolved);
}

fn print_listing(container: &Container) {
    let mut singletons = 0;
    container.for_each(|key, item| {
        if item.is_singleton() {
            singletons += 1;
        }
        print_item(key, item);
    });
    print_final_summary(container.len(), singletons, container.is_frozen());
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            let _ = dotenv::from_filename(".env.prod");
        }
        "dev" => {
            let _ = dotenv::from_filename(".env.dev");
        }
        _ => {
            // 기본 .env 파일 로드
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// # Environment Variables
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info")
///
/// ```bash
/// # 등록/조회 과정까지 출력
/// RUST_LOG=service_container=debug cargo run -- app.name db.pool
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
}
