// Dashboard domain model
use super::filter::{Datasource, Filter, FilterKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Name of the dashboard field holding the rotating filter key.
pub const ROTATING_FILTER_FIELD: &str = "xRotatingValuesFilter";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Owner,
    #[default]
    User,
    Proxy,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub oid: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "instanceType", default)]
    pub instance_type: InstanceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<Datasource>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(
        rename = "xRotatingValuesFilter",
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub rotating_filter: Option<FilterKey>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dashboard {
    pub fn is_owned(&self) -> bool {
        self.instance_type == InstanceType::Owner
    }

    /// True when the stored rotating filter key is exactly `key`.
    pub fn is_rotating(&self, key: &FilterKey) -> bool {
        self.rotating_filter.as_ref() == Some(key)
    }

    /// First filter whose derived key matches the stored rotating filter key.
    pub fn find_rotating_filter(&self) -> Option<&Filter> {
        self.find_filter(self.rotating_filter.as_ref()?)
    }

    pub fn find_filter(&self, key: &FilterKey) -> Option<&Filter> {
        self.filters
            .iter()
            .find(|filter| filter.key().as_ref() == Some(key))
    }

    /// Clear the stored key if it already is `key`, otherwise store `key`.
    /// Returns whether rotation is now enabled.
    pub fn toggle_rotating_filter(&mut self, key: FilterKey) -> bool {
        if self.is_rotating(&key) {
            self.rotating_filter = None;
            false
        } else {
            self.rotating_filter = Some(key);
            true
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<FilterKey>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(FilterKey::new))
}

fn none_as_empty<S>(key: &Option<FilterKey>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(key.as_ref().map(FilterKey::as_str).unwrap_or_default())
}
