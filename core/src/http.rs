//! # HTTP Helpers
//!
//! Verb classification shared by the factory and the output generator.

/// Methods that never carry a documented request body.
pub const HTTP_METHODS_WITHOUT_BODY: [&str; 5] = ["HEAD", "GET", "DELETE", "TRACE", "CONNECT"];

/// Verbs an OpenAPI Path Item Object may hold.
pub const PATH_ITEM_VERBS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Returns true when an operation with this method may include a request body.
///
/// Comparison is case-insensitive.
pub fn method_permits_request_body(method: &str) -> bool {
    !HTTP_METHODS_WITHOUT_BODY
        .iter()
        .any(|m| m.eq_ignore_ascii_case(method))
}

/// Returns true for verbs that are valid Path Item Object keys.
pub fn is_path_item_verb(verb: &str) -> bool {
    PATH_ITEM_VERBS.contains(&verb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_gating_is_case_insensitive() {
        for method in ["get", "GET", "Head", "delete", "trace", "CONNECT"] {
            assert!(!method_permits_request_body(method), "{method}");
        }
        for method in ["post", "PUT", "patch", "options"] {
            assert!(method_permits_request_body(method), "{method}");
        }
    }

    #[test]
    fn test_path_item_verbs() {
        assert!(is_path_item_verb("patch"));
        assert!(!is_path_item_verb("connect"));
        assert!(!is_path_item_verb("GET"));
    }
}
