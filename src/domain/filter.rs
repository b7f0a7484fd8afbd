// Filter domain model - dimension selection constraints on a dashboard
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identity of a filter derived from its dimension and level ("dim" or "dim/level").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterKey(String);

impl FilterKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Datasource {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Value>>,
    #[serde(rename = "multiSelection", default)]
    pub multi_selection: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FilterClause {
    /// True for a clause with no members, no multi-selection and no other fields.
    pub fn is_empty(&self) -> bool {
        self.members.is_none() && !self.multi_selection && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jaql {
    pub dim: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<Datasource>,
    #[serde(default, skip_serializing_if = "FilterClause::is_empty")]
    pub filter: FilterClause,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(rename = "isCascading", default)]
    pub is_cascading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jaql: Option<Jaql>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dimension, level and derived key of a non-cascading filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDimension {
    pub dim: String,
    pub level: Option<String>,
    pub key: FilterKey,
}

impl Filter {
    /// Member filter on a single dimension, mostly useful for building fixtures.
    pub fn members(dim: &str, level: Option<&str>, members: Vec<Value>) -> Self {
        Self {
            is_cascading: false,
            jaql: Some(Jaql {
                dim: dim.to_string(),
                level: level.map(str::to_string),
                datasource: None,
                filter: FilterClause {
                    members: Some(members),
                    multi_selection: false,
                    extra: Map::new(),
                },
                extra: Map::new(),
            }),
            extra: Map::new(),
        }
    }

    /// Derive `{dim, level, key}`; cascading filters and filters without jaql have no key.
    pub fn dimension(&self) -> Option<FilterDimension> {
        if self.is_cascading {
            return None;
        }
        let jaql = self.jaql.as_ref()?;
        let key = match &jaql.level {
            Some(level) => format!("{}/{}", jaql.dim, level),
            None => jaql.dim.clone(),
        };

        Some(FilterDimension {
            dim: jaql.dim.clone(),
            level: jaql.level.clone(),
            key: FilterKey(key),
        })
    }

    pub fn key(&self) -> Option<FilterKey> {
        self.dimension().map(|d| d.key)
    }

    /// True for a non-cascading member filter that allows exactly one selection.
    pub fn is_single_select(&self) -> bool {
        if self.is_cascading {
            return false;
        }
        match &self.jaql {
            Some(jaql) => jaql.filter.members.is_some() && !jaql.filter.multi_selection,
            None => false,
        }
    }

    pub fn current_member(&self) -> Option<&Value> {
        self.jaql.as_ref()?.filter.members.as_ref()?.first()
    }

    /// Replace the selection with a single member.
    pub fn select_member(&mut self, value: Value) {
        if let Some(jaql) = self.jaql.as_mut() {
            jaql.filter.members = Some(vec![value]);
        }
    }

    pub fn datasource(&self) -> Option<&Datasource> {
        self.jaql.as_ref()?.datasource.as_ref()
    }
}
