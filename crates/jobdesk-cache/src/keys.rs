//! Cache key construction and invalidation helpers.
//!
//! All listing cache entries live under the `jobs:list:` namespace so a
//! single pattern sweep can drop every cached page after a job mutation.

use std::collections::{BTreeMap, HashMap};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::redis::{CacheError, RedisCache};

/// Namespace prefix for cached job listing pages.
pub const JOB_LIST_PREFIX: &str = "jobs:list:";

/// Query parameters that participate in the listing cache key.
///
/// Anything outside this whitelist cannot influence the key, so junk
/// parameters never fragment the cache.
const JOB_LIST_WHITELIST: &[&str] = &[
    "page",
    "limit",
    "sort",
    "order",
    "search",
    "location",
    "employmentType",
    "experienceLevel",
    "minSalary",
    "maxSalary",
];

/// Characters escaped in key values: everything outside RFC 3986
/// unreserved, so spaces become `%20` and `&`/`=` cannot collide with
/// the pair separators.
const VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builds the cache key for a job listing request.
///
/// Whitelisted parameters with non-empty values are percent-encoded and
/// joined as `key=value` pairs in ascending key order, so two requests
/// with the same effective filters produce byte-identical keys no matter
/// how the parameters were ordered on the wire. Callers merge the
/// normalized `page`/`limit`/`sort`/`order` into the raw query before
/// building the key.
#[must_use]
pub fn job_list(raw_query: &HashMap<String, String>) -> String {
    let normalized: BTreeMap<&str, &str> = JOB_LIST_WHITELIST
        .iter()
        .filter_map(|&name| {
            raw_query
                .get(name)
                .map(|v| v.as_str())
                .filter(|v| !v.is_empty())
                .map(|v| (name, v))
        })
        .collect();

    let encoded = normalized
        .iter()
        .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, VALUE_ENCODE_SET)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}{}", JOB_LIST_PREFIX, encoded)
}

/// Match pattern covering every cached listing page.
#[must_use]
pub fn job_list_pattern() -> String {
    format!("{}*", JOB_LIST_PREFIX)
}

/// Keys for one-time auth tokens, stored with explicit TTLs and deleted
/// on use.
pub mod auth {
    /// Key for an email verification token.
    #[must_use]
    pub fn email_verification(token: &str) -> String {
        format!("auth:verify:{}", token)
    }

    /// Key for a password reset token.
    #[must_use]
    pub fn password_reset(token: &str) -> String {
        format!("auth:reset:{}", token)
    }
}

/// High-level invalidation entry points.
pub mod invalidate {
    use super::*;

    /// Drops every cached job listing page.
    ///
    /// Called after each job create/update/delete. Errors are returned to
    /// the caller: a failed sweep leaves stale listings behind, and the
    /// triggering mutation must not report success silently in that case.
    /// With no cache configured this is a no-op.
    pub async fn job_listings(cache: Option<&RedisCache>) -> Result<u64, CacheError> {
        let Some(cache) = cache else { return Ok(0) };
        cache.scan_delete(&job_list_pattern()).await
    }
}
