//! Typed reads of `REVIEWCTX_*` (and `GITHUB_TOKEN`) environment overrides.
//!
//! [`Env::real`] reads the process environment; [`Env::mock`] is backed by
//! a map so config tests never touch the real one. Blank values count as
//! unset, and values that fail to parse are ignored with a warning so a
//! typo in the shell never aborts a run.

use std::collections::HashMap;
use std::str::FromStr;

/// Source of environment overrides.
#[derive(Clone, Debug, Default)]
pub struct Env {
    vars: Option<HashMap<String, String>>,
}

impl Env {
    /// Read from the process environment.
    pub fn real() -> Self {
        Self { vars: None }
    }

    /// Read only from `vars`.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Trimmed value of `name`, or `None` when absent or blank.
    pub fn var(&self, name: &str) -> Option<String> {
        let raw = match &self.vars {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }?;
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// First of `names` that is set, in order.
    pub fn first_of(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.var(name))
    }

    /// `name` parsed as `T`.
    pub fn parsed<T: FromStr>(&self, name: &str) -> Option<T> {
        let val = self.var(name)?;
        match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(var = name, value = %val, "ignoring invalid environment value");
                None
            }
        }
    }

    /// `name` read as an on/off switch (`true/1/yes/on`, `false/0/no/off`).
    pub fn flag(&self, name: &str) -> Option<bool> {
        let val = self.var(name)?;
        match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => {
                tracing::warn!(var = name, value = %val, "ignoring invalid environment switch");
                None
            }
        }
    }
}
