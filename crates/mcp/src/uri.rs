//! Resource URI handling.
//!
//! Tools accept either bare resource IDs or `xcode-cloud://` URIs, so the
//! calling agent can pass back identifiers exactly as it received them.

const SCHEME: &str = "xcode-cloud://";
const PRODUCT_PREFIX: &str = "xcode-cloud://product/";
const WORKFLOW_PREFIX: &str = "xcode-cloud://workflow/";
const BUILD_RUN_PREFIX: &str = "xcode-cloud://build-run/";

/// A fully qualified `xcode-cloud://` resource URI, broken into kind and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUri<'a> {
    Product(&'a str),
    Workflow(&'a str),
    BuildRun(&'a str),
}

/// Parse a full resource URI. Unlike the tool-argument parsers below this
/// rejects bare IDs, unknown kinds, and empty ids: `resources/read` only
/// accepts the URIs `resources/list` hands out.
pub fn parse_resource_uri(uri: &str) -> Option<ResourceUri<'_>> {
    let rest = uri.strip_prefix(SCHEME)?;
    let (kind, id) = rest.split_once('/')?;
    if id.is_empty() {
        return None;
    }
    match kind {
        "product" => Some(ResourceUri::Product(id)),
        "workflow" => Some(ResourceUri::Workflow(id)),
        "build-run" => Some(ResourceUri::BuildRun(id)),
        _ => None,
    }
}

/// Extract a product ID from a bare ID or `xcode-cloud://product/` URI.
pub fn parse_product_id(input: &str) -> &str {
    input.strip_prefix(PRODUCT_PREFIX).unwrap_or(input)
}

/// Extract a workflow ID from a bare ID or `xcode-cloud://workflow/` URI.
pub fn parse_workflow_id(input: &str) -> &str {
    input.strip_prefix(WORKFLOW_PREFIX).unwrap_or(input)
}

/// Extract a build run ID from a bare ID or `xcode-cloud://build-run/` URI.
pub fn parse_build_run_id(input: &str) -> &str {
    input.strip_prefix(BUILD_RUN_PREFIX).unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_ids_pass_through() {
        assert_eq!(parse_product_id("abc123"), "abc123");
        assert_eq!(parse_workflow_id("abc123"), "abc123");
        assert_eq!(parse_build_run_id("abc123"), "abc123");
    }

    #[test]
    fn test_uris_are_stripped() {
        assert_eq!(parse_product_id("xcode-cloud://product/abc123"), "abc123");
        assert_eq!(parse_workflow_id("xcode-cloud://workflow/abc123"), "abc123");
        assert_eq!(
            parse_build_run_id("xcode-cloud://build-run/abc123"),
            "abc123"
        );
    }

    #[test]
    fn test_resource_uri_parses_each_kind() {
        assert_eq!(
            parse_resource_uri("xcode-cloud://product/abc123"),
            Some(ResourceUri::Product("abc123"))
        );
        assert_eq!(
            parse_resource_uri("xcode-cloud://workflow/wf-1"),
            Some(ResourceUri::Workflow("wf-1"))
        );
        assert_eq!(
            parse_resource_uri("xcode-cloud://build-run/build-1"),
            Some(ResourceUri::BuildRun("build-1"))
        );
    }

    #[test]
    fn test_resource_uri_rejects_malformed_input() {
        assert_eq!(parse_resource_uri("abc123"), None);
        assert_eq!(parse_resource_uri("xcode-cloud://product/"), None);
        assert_eq!(parse_resource_uri("xcode-cloud://artifact/a1"), None);
        assert_eq!(parse_resource_uri("https://product/abc123"), None);
    }

    #[test]
    fn test_mismatched_prefix_is_left_alone() {
        // A workflow URI handed to the product parser is not a product URI;
        // it passes through untouched and the API rejects it downstream.
        assert_eq!(
            parse_product_id("xcode-cloud://workflow/abc123"),
            "xcode-cloud://workflow/abc123"
        );
    }
}
