//! 터미널 출력 포맷팅 유틸리티
//!
//! 컨테이너 구성 과정과 등록된 항목 목록을 터미널에 출력하는 함수들을 제공합니다.

use crate::core::item::Item;

/// 박스 형태로 둘러싸인 제목을 출력합니다
///
/// Unicode 박스 문자를 사용하여 시각적으로 눈에 띄는 제목을 출력합니다.
/// 텍스트는 자동으로 중앙 정렬됩니다.
///
/// # Examples
///
/// ```rust,ignore
/// print_boxed_title("Service Container");
/// ```
///
/// Output:
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                Service Container                 ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    // 고정 너비 50칸 사용 (박스 내부 콘텐츠)
    let content_width = 50;
    let border = "═".repeat(content_width);

    println!("╔{}╗", border);
    println!("║{:^49}║", title);
    println!("╚{}╝", border);
}

/// 진행 단계 시작을 표시합니다
///
/// Output:
/// ```text
/// → Step 1: Importing registered namespaces
/// ```
pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

/// 진행 단계 완료를 처리된 항목 수와 함께 표시합니다
///
/// Output:
/// ```text
/// ✓ Step 1: Namespaces imported (2 items)
/// ```
pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

/// 항목의 조회 방식을 짧은 이름으로 표현합니다
///
/// ```rust,ignore
/// assert_eq!(describe_item(&item), "singleton (resolved)");
/// ```
pub fn describe_item(item: &Item) -> &'static str {
    match (item.is_singleton(), item.is_resolved(), item.is_called()) {
        (true, true, _) => "singleton (resolved)",
        (true, false, _) => "singleton (lazy)",
        (false, _, true) => "factory",
        (false, _, false) if item.payload().is_callable() => "factory (uncalled)",
        (false, _, false) => "value",
    }
}

/// 등록된 항목 하나를 트리 형태로 출력합니다
///
/// Output:
/// ```text
///    ├─ db.pool: singleton (lazy)
///    ├─ app.name: value
/// ```
pub fn print_item(key: &str, item: &Item) {
    println!("   ├─ {}: {}", key, describe_item(item));
}

/// 조회에 실패한 키를 에러 메시지와 함께 출력합니다
pub fn print_lookup_failure(key: &str, message: &str) {
    println!("   ✗ {}: {}", key, message);
}

/// 최종 요약을 출력합니다
///
/// Output:
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║          🎉 SERVICE CONTAINER READY              ║
/// ╚══════════════════════════════════════════════════╝
///    📦 Items: 4
///    🔧 Singletons: 1
///    🧊 Frozen: true
/// ```
pub fn print_final_summary(items: usize, singletons: usize, frozen: bool) {
    println!();
    print_boxed_title("🎉 SERVICE CONTAINER READY");
    println!("   📦 Items: {}", items);
    println!("   🔧 Singletons: {}", singletons);
    println!("   🧊 Frozen: {}", frozen);
    println!();
}
