use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use tracing::warn;

use crate::error::NodeError;

/// Regular expression matching path placeholders in the format `{param_name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)}").expect("a valid regex"));

fn replace_path_param(path: &str, param_name: &str, value: &str) -> String {
    let pattern = ["{", param_name, "}"].concat();
    path.replace(&pattern, value)
}

/// URL-encode a path segment value so interpolated IDs cannot break the path.
fn encode_path_param_value(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Resolves a path template against named argument values.
///
/// Every `{name}` placeholder must have a matching argument; argument values
/// are percent-encoded before substitution so the resolved path never
/// contains empty or malformed segments. Arguments with no matching
/// placeholder are ignored with a warning.
///
/// # Errors
///
/// Returns [`NodeError::PathUnresolved`] listing the placeholders that had no
/// argument.
///
/// # Examples
///
/// ```rust
/// use indexmap::IndexMap;
/// use ionos_connect_core::resolve_path;
///
/// let mut args = IndexMap::new();
/// args.insert("datacenterId".to_string(), "dc-1".to_string());
/// args.insert("serverId".to_string(), "srv 2".to_string());
///
/// let path = resolve_path("/datacenters/{datacenterId}/servers/{serverId}", &args)
///     .expect("full resolve");
/// assert_eq!(path, "/datacenters/dc%2D1/servers/srv%202");
/// ```
pub fn resolve_path(
    template: &str,
    args: &IndexMap<String, String>,
) -> Result<String, NodeError> {
    let mut names: HashSet<String> = RE
        .captures_iter(template)
        .filter_map(|caps| caps.name("name"))
        .map(|m| m.as_str().to_string())
        .collect();

    let mut path = template.to_string();
    if names.is_empty() {
        return Ok(path);
    }

    for (name, value) in args {
        if !names.remove(name) {
            warn!(?name, "argument name not found in path template");
            continue;
        }

        let encoded = encode_path_param_value(value);
        path = replace_path_param(&path, name, &encoded);

        if names.is_empty() {
            return Ok(path);
        }
    }

    Err(NodeError::PathUnresolved {
        path,
        missing: names.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn should_resolve_multiple_parameters() {
        let path = resolve_path(
            "/datacenters/{datacenterId}/servers/{serverId}",
            &args(&[("datacenterId", "abc"), ("serverId", "123")]),
        )
        .expect("should resolve");
        insta::assert_snapshot!(path, @"/datacenters/abc/servers/123");
    }

    #[test]
    fn should_fail_on_missing_parameters() {
        let result = resolve_path(
            "/zones/{zoneId}/records/{recordId}",
            &args(&[("zoneId", "z1")]),
        );
        let error = result.expect_err("recordId is missing");
        let NodeError::PathUnresolved { missing, .. } = error else {
            panic!("expected PathUnresolved");
        };
        assert_eq!(missing, vec!["recordId".to_string()]);
    }

    #[test]
    fn should_url_encode_values() {
        let path = resolve_path("/search/{query}", &args(&[("query", "hello world")]))
            .expect("should resolve");
        assert_eq!(path, "/search/hello%20world");

        let path = resolve_path("/items/{name}", &args(&[("name", "test@example.com")]))
            .expect("should resolve");
        assert_eq!(path, "/items/test%40example%2Ecom");
    }

    #[test]
    fn should_handle_duplicate_placeholders() {
        let path = resolve_path("/test/{id}/{id}", &args(&[("id", "123")])).expect("should resolve");
        assert_eq!(path, "/test/123/123");
    }

    #[test]
    fn should_ignore_extra_arguments() {
        let path = resolve_path("/zones/{zoneId}", &args(&[("zoneId", "z1"), ("depth", "2")]))
            .expect("should resolve");
        assert_eq!(path, "/zones/z1");
    }

    #[test]
    fn should_pass_through_templates_without_placeholders() {
        let path = resolve_path("/datacenters", &IndexMap::new()).expect("no placeholders");
        assert_eq!(path, "/datacenters");
    }

    #[test]
    fn replace_is_exact_match_only() {
        let result = replace_path_param("/users/{user_id}/posts/{id}", "id", "123");
        assert_eq!(result, "/users/{user_id}/posts/123");
    }
}
