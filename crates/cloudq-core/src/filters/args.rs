//! Typed access to a filter's JSON argument object.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{LookupError, LookupResult};
use crate::lookup::Scope;

/// Region and profile used when a call does not name them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Keyword arguments of one filter call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    values: Map<String, Value>,
}

fn invalid(key: &str, expected: &str, got: &Value) -> LookupError {
    LookupError::InvalidArgument(format!("{key} must be {expected}, got {got}"))
}

impl FilterArgs {
    /// Accepts a JSON object; `null` is an empty argument set.
    pub fn from_value(value: Value) -> LookupResult<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::default()),
            other => Err(LookupError::InvalidArgument(format!(
                "filter arguments must be an object, got {other}"
            ))),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn str(&self, key: &str) -> LookupResult<&str> {
        self.opt_str(key)?
            .ok_or_else(|| LookupError::InvalidArgument(format!("missing argument {key}")))
    }

    pub fn opt_str(&self, key: &str) -> LookupResult<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(invalid(key, "a string", other)),
        }
    }

    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> LookupResult<&'a str> {
        Ok(self.opt_str(key)?.unwrap_or(default))
    }

    pub fn opt_bool(&self, key: &str) -> LookupResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(invalid(key, "a boolean", other)),
        }
    }

    /// A list of strings; a lone string is a one-element list.
    pub fn str_list(&self, key: &str) -> LookupResult<Vec<String>> {
        match self.get(key) {
            None => Err(LookupError::InvalidArgument(format!("missing argument {key}"))),
            Some(value) => string_list(key, value),
        }
    }

    /// A `{key: value}` tag object; absent means no tags.
    pub fn tags(&self, key: &str) -> LookupResult<BTreeMap<String, String>> {
        let Some(value) = self.get(key) else {
            return Ok(BTreeMap::new());
        };
        let Value::Object(map) = value else {
            return Err(invalid(key, "an object of tags", value));
        };
        map.iter()
            .map(|(k, v)| match v {
                Value::String(s) => Ok((k.clone(), s.clone())),
                other => Err(invalid(&format!("{key}.{k}"), "a string", other)),
            })
            .collect()
    }

    /// A tag object whose values may be a string or a list of strings.
    pub fn multi_tags(&self, key: &str) -> LookupResult<BTreeMap<String, Vec<String>>> {
        let Some(value) = self.get(key) else {
            return Ok(BTreeMap::new());
        };
        let Value::Object(map) = value else {
            return Err(invalid(key, "an object of tags", value));
        };
        map.iter()
            .map(|(k, v)| Ok((k.clone(), string_list(&format!("{key}.{k}"), v)?)))
            .collect()
    }

    /// `region`/`profile` arguments, falling back to `defaults`.
    pub fn scope(&self, defaults: &Defaults) -> LookupResult<Scope> {
        let region = match self.opt_str("region")? {
            Some(r) => r.to_string(),
            None => defaults.region.clone().ok_or_else(|| {
                LookupError::InvalidArgument("missing argument region".into())
            })?,
        };
        let profile = match self.opt_str("profile")? {
            Some(p) => Some(p.to_string()),
            None => defaults.profile.clone(),
        };
        Ok(Scope { region, profile })
    }
}

fn string_list(key: &str, value: &Value) -> LookupResult<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(invalid(key, "a list of strings", other)),
            })
            .collect(),
        other => Err(invalid(key, "a list of strings", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(v: Value) -> FilterArgs {
        FilterArgs::from_value(v).unwrap()
    }

    #[test]
    fn rejects_non_objects() {
        assert!(FilterArgs::from_value(json!([1])).is_err());
        assert_eq!(FilterArgs::from_value(Value::Null).unwrap(), FilterArgs::default());
    }

    #[test]
    fn strings_and_lists() {
        let a = args(json!({"name": "web", "cidrs": "10.0.0.0/24", "ids": ["a", "b"], "n": 3}));
        assert_eq!(a.str("name").unwrap(), "web");
        assert_eq!(a.str_list("cidrs").unwrap(), ["10.0.0.0/24"]);
        assert_eq!(a.str_list("ids").unwrap(), ["a", "b"]);
        assert!(matches!(a.str("n"), Err(LookupError::InvalidArgument(_))));
        assert!(matches!(a.str("missing"), Err(LookupError::InvalidArgument(m)) if m.contains("missing")));
        assert_eq!(a.str_or("key", "arn").unwrap(), "arn");
    }

    #[test]
    fn tags_accept_single_and_multi_values() {
        let a = args(json!({"tags": {"env": "prod"}, "multi": {"tier": ["web", "api"], "env": "prod"}}));
        assert_eq!(a.tags("tags").unwrap()["env"], "prod");
        assert!(a.tags("absent").unwrap().is_empty());
        let multi = a.multi_tags("multi").unwrap();
        assert_eq!(multi["tier"], ["web", "api"]);
        assert_eq!(multi["env"], ["prod"]);
        assert!(args(json!({"tags": {"n": 1}})).tags("tags").is_err());
    }

    #[test]
    fn bools_accept_strings() {
        let a = args(json!({"a": true, "b": "False", "c": 1}));
        assert_eq!(a.opt_bool("a").unwrap(), Some(true));
        assert_eq!(a.opt_bool("b").unwrap(), Some(false));
        assert!(a.opt_bool("c").is_err());
        assert_eq!(a.opt_bool("d").unwrap(), None);
    }

    #[test]
    fn scope_falls_back_to_defaults() {
        let defaults = Defaults {
            region: Some("us-west-2".into()),
            profile: Some("ops".into()),
        };
        let scope = args(json!({})).scope(&defaults).unwrap();
        assert_eq!(scope, Scope::new("us-west-2").with_profile("ops"));
        let scope = args(json!({"region": "eu-west-1"})).scope(&defaults).unwrap();
        assert_eq!(scope.region, "eu-west-1");
        assert!(args(json!({})).scope(&Defaults::default()).is_err());
    }
}
