// ABOUTME: Path builders for control-plane endpoints.
// ABOUTME: Percent-encodes identifiers before placing them in URL segments.

use crate::types::{FunctionId, VersionId};

fn seg(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

pub(crate) fn functions() -> String {
    "/nvcf/functions".to_string()
}

pub(crate) fn function_versions(function: &FunctionId) -> String {
    format!("/nvcf/functions/{}/versions", seg(function.as_str()))
}

pub(crate) fn function_version(function: &FunctionId, version: &VersionId) -> String {
    format!(
        "/nvcf/functions/{}/versions/{}",
        seg(function.as_str()),
        seg(version.as_str())
    )
}

pub(crate) fn function_metadata(function: &FunctionId, version: &VersionId) -> String {
    format!(
        "/nvcf/metadata/functions/{}/versions/{}",
        seg(function.as_str()),
        seg(version.as_str())
    )
}

pub(crate) fn deployment(function: &FunctionId, version: &VersionId) -> String {
    format!(
        "/nvcf/deployments/functions/{}/versions/{}",
        seg(function.as_str()),
        seg(version.as_str())
    )
}

pub(crate) fn authorization(function: &FunctionId, version: &VersionId) -> String {
    format!(
        "/nvcf/authorizations/functions/{}/versions/{}",
        seg(function.as_str()),
        seg(version.as_str())
    )
}
