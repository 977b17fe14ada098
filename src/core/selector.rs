//! Entity selectors: `@a[tag=x,team=y]` and friends.

use crate::error::{CompileError, Result};
use indexmap::IndexMap;
use std::fmt;

/// The base token of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorBase {
    Everyone,
    Everything,
    This,
    Random,
    NearestPlayer,
    /// Any other token (player name, UUID, `@n`, ...).
    Custom(String),
}

impl fmt::Display for SelectorBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Everyone => write!(f, "@a"),
            Self::Everything => write!(f, "@e"),
            Self::This => write!(f, "@s"),
            Self::Random => write!(f, "@r"),
            Self::NearestPlayer => write!(f, "@p"),
            Self::Custom(token) => write!(f, "{}", token),
        }
    }
}

impl From<&str> for SelectorBase {
    fn from(token: &str) -> Self {
        match token {
            "@a" => Self::Everyone,
            "@e" => Self::Everything,
            "@s" => Self::This,
            "@r" => Self::Random,
            "@p" => Self::NearestPlayer,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// A target selector: base token plus ordered `key=value` filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub base: SelectorBase,
    pub filters: IndexMap<String, String>,
}

impl Selector {
    pub fn new(base: impl Into<SelectorBase>) -> Self {
        Self {
            base: base.into(),
            filters: IndexMap::new(),
        }
    }

    /// `@a`
    pub fn everyone() -> Self {
        Self::new(SelectorBase::Everyone)
    }

    /// `@e`
    pub fn everything() -> Self {
        Self::new(SelectorBase::Everything)
    }

    /// `@s`
    pub fn this() -> Self {
        Self::new(SelectorBase::This)
    }

    /// `@r`
    pub fn random() -> Self {
        Self::new(SelectorBase::Random)
    }

    /// `@p`
    pub fn nearest_player() -> Self {
        Self::new(SelectorBase::NearestPlayer)
    }

    /// Add a filter. Re-adding a key replaces its value in place.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Build a selector from untyped manifest input.
    ///
    /// A plain string is taken as the base token. A mapping must carry
    /// `base` and may carry `filters`, whose keys and values must all be
    /// strings.
    pub fn from_yaml(value: &serde_yaml_ng::Value) -> Result<Self> {
        use serde_yaml_ng::Value;
        match value {
            Value::String(token) => Ok(Self::new(token.as_str())),
            Value::Mapping(map) => {
                let base = match map.get("base") {
                    Some(Value::String(b)) => b.as_str(),
                    Some(other) => {
                        return Err(CompileError::SelectorFilterType(format!(
                            "base {:?}",
                            other
                        )))
                    }
                    None => {
                        return Err(CompileError::Manifest(
                            "selector mapping needs a 'base'".to_string(),
                        ))
                    }
                };
                let mut selector = Self::new(base);
                match map.get("filters") {
                    None | Some(Value::Null) => {}
                    Some(Value::Mapping(filters)) => {
                        for (k, v) in filters {
                            let key = match k {
                                Value::String(s) => s.clone(),
                                other => {
                                    return Err(CompileError::SelectorFilterType(format!(
                                        "key {:?}",
                                        other
                                    )))
                                }
                            };
                            let val = match v {
                                Value::String(s) => s.clone(),
                                other => {
                                    return Err(CompileError::SelectorFilterType(format!(
                                        "value {:?} for '{}'",
                                        other, key
                                    )))
                                }
                            };
                            selector.filters.insert(key, val);
                        }
                    }
                    Some(_) => {
                        return Err(CompileError::Manifest(
                            "selector 'filters' must be a mapping".to_string(),
                        ))
                    }
                }
                Ok(selector)
            }
            other => Err(CompileError::Manifest(format!(
                "expected selector string or mapping, got {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if self.filters.is_empty() {
            return Ok(());
        }
        let parts: Vec<String> = self
            .filters
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(f, "[{}]", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_bases() {
        assert_eq!(Selector::everyone().render(), "@a");
        assert_eq!(Selector::everything().render(), "@e");
        assert_eq!(Selector::this().render(), "@s");
        assert_eq!(Selector::random().render(), "@r");
        assert_eq!(Selector::nearest_player().render(), "@p");
    }

    #[test]
    fn test_filters_keep_insertion_order() {
        let s = Selector::everyone()
            .filter("tag", "interested")
            .filter("team", "netherracks");
        assert_eq!(s.render(), "@a[tag=interested,team=netherracks]");

        let reversed = Selector::everyone()
            .filter("team", "netherracks")
            .filter("tag", "interested");
        assert_eq!(reversed.render(), "@a[team=netherracks,tag=interested]");
    }

    #[test]
    fn test_custom_base() {
        assert_eq!(Selector::new("Steve").render(), "Steve");
        assert_eq!(Selector::new("@s"), Selector::this());
    }

    #[test]
    fn test_from_yaml_string() {
        let v: serde_yaml_ng::Value = serde_yaml_ng::from_str("\"@p\"").unwrap();
        assert_eq!(Selector::from_yaml(&v).unwrap().render(), "@p");
    }

    #[test]
    fn test_from_yaml_mapping() {
        let v: serde_yaml_ng::Value =
            serde_yaml_ng::from_str("base: \"@a\"\nfilters:\n  distance: \"1..\"\n  tag: x\n")
                .unwrap();
        assert_eq!(Selector::from_yaml(&v).unwrap().render(), "@a[distance=1..,tag=x]");
    }

    #[test]
    fn test_from_yaml_non_string_value() {
        let v: serde_yaml_ng::Value =
            serde_yaml_ng::from_str("base: \"@e\"\nfilters:\n  limit: 1\n").unwrap();
        let err = Selector::from_yaml(&v).unwrap_err();
        assert!(matches!(err, CompileError::SelectorFilterType(_)));
    }

    #[test]
    fn test_from_yaml_non_string_key() {
        let v: serde_yaml_ng::Value =
            serde_yaml_ng::from_str("base: \"@e\"\nfilters:\n  3: x\n").unwrap();
        assert!(matches!(
            Selector::from_yaml(&v),
            Err(CompileError::SelectorFilterType(_))
        ));
    }

    #[test]
    fn test_from_yaml_missing_base() {
        let v: serde_yaml_ng::Value = serde_yaml_ng::from_str("filters: {}").unwrap();
        assert!(matches!(Selector::from_yaml(&v), Err(CompileError::Manifest(_))));
    }
}
