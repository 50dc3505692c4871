//! # 문자열 유틸리티
//!
//! 컨테이너 키 처리와 관련된 공통 유틸리티 함수들입니다.

/// 제안 목록의 최대 길이
const MAX_SUGGESTIONS: usize = 3;

/// 키를 정규화된 문자열 형태로 변환합니다.
///
/// 컨테이너의 모든 키는 소유된 `String`으로 저장되며, 등록과 조회 양쪽에서
/// 같은 함수를 거치므로 `&str`/`String` 구분 없이 동일한 키로 취급됩니다.
pub fn normalize_key(key: &str) -> String {
    key.to_string()
}

/// 네임스페이스와 키를 구분자로 연결합니다.
///
/// # 예제
/// ```rust,ignore
/// assert_eq!(join_namespace("one", "two", "."), "one.two");
/// assert_eq!(join_namespace("one", "two", "-"), "one-two");
/// ```
pub fn join_namespace(namespace: &str, key: &str, separator: &str) -> String {
    let mut joined = String::with_capacity(namespace.len() + separator.len() + key.len());
    joined.push_str(namespace);
    joined.push_str(separator);
    joined.push_str(key);
    joined
}

/// 요청한 키와 철자가 비슷한 기존 키들을 찾습니다.
///
/// 레벤슈타인 거리가 키 길이의 절반(최대 3) 이내인 후보를
/// 거리순, 같은 거리라면 사전순으로 최대 3개까지 반환합니다.
pub fn suggest_keys<'a, I>(key: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let threshold = (key.chars().count() / 2).clamp(1, 3);

    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|candidate| *candidate != key)
        .map(|candidate| (strsim::levenshtein(key, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .collect();

    scored.sort();
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_namespace_with_custom_separator() {
        assert_eq!(join_namespace("one", "two", "."), "one.two");
        assert_eq!(join_namespace("one.two", "three", "."), "one.two.three");
        assert_eq!(join_namespace("one", "two", "::"), "one::two");
    }

    #[test]
    fn test_suggest_keys_orders_by_distance() {
        let keys = ["users.repo", "users.repository", "user.repo", "tokens"];
        let suggestions = suggest_keys("users.rep", keys);

        assert_eq!(suggestions, vec!["users.repo".to_string(), "user.repo".to_string()]);
    }

    #[test]
    fn test_suggest_keys_ignores_distant_candidates() {
        assert!(suggest_keys("db", ["cache", "mailer"]).is_empty());
        assert!(suggest_keys("item", Vec::<&str>::new()).is_empty());
    }
}
