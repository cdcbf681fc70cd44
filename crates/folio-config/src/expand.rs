//! `${VAR}` expansion in configuration strings.
//!
//! - `${VAR}` expands to the value of `VAR` and fails when it is unset
//! - `${VAR:-default}` falls back to `default` when `VAR` is unset
//!
//! Strings without `${` are returned as is, so a literal `$` in a URL or
//! password needs no escaping.

use crate::ConfigError;

/// Expand against the process environment.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |var| std::env::var(var).ok())
}

/// Expand using `lookup` to resolve variable names.
pub(crate) fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| match lookup(var) {
        Some(found) => Ok(Some(found)),
        None => Err(Unset),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.var_name),
    })
}

/// Lookup failure for a variable without a value.
struct Unset;
