// Repository trait for loading the candidate values of a filter
use crate::domain::dashboard::Dashboard;
use crate::domain::filter::{Datasource, Filter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("JAQL query failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JAQL request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Failed to decode JAQL response: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },

    #[error("Filter has no dimension to query")]
    MissingDimension,

    #[error("No datasource on filter or dashboard")]
    MissingDatasource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JaqlMetadata {
    pub dim: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub sort: String,
}

/// Query listing the distinct members of one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JaqlQuery {
    pub datasource: Datasource,
    pub metadata: Vec<JaqlMetadata>,
    pub offset: u32,
    pub count: u32,
}

impl JaqlQuery {
    /// Build the members query for a filter, falling back to the dashboard's datasource.
    pub fn for_filter(filter: &Filter, dashboard: &Dashboard, count: u32) -> Result<Self, RequestError> {
        let dimension = filter.dimension().ok_or(RequestError::MissingDimension)?;
        let datasource = filter
            .datasource()
            .or(dashboard.datasource.as_ref())
            .cloned()
            .ok_or(RequestError::MissingDatasource)?;

        Ok(Self {
            datasource,
            metadata: vec![JaqlMetadata {
                dim: dimension.dim,
                level: dimension.level,
                sort: "asc".to_string(),
            }],
            offset: 0,
            count,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct JaqlResponse {
    #[serde(default)]
    pub values: Vec<Value>,
}

impl JaqlResponse {
    pub fn into_members(self) -> Vec<Value> {
        self.values.into_iter().map(normalize_member).collect()
    }
}

/// Unwrap a result row such as `[{"data": "Spain", "text": "Spain"}]` into its member value.
pub fn normalize_member(row: Value) -> Value {
    match row {
        Value::Array(mut cells) if cells.len() == 1 => normalize_member(cells.remove(0)),
        Value::Object(mut cell) if cell.contains_key("data") => {
            cell.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[async_trait]
pub trait FilterValuesRepository: Send + Sync {
    /// Execute a members query and return the values in query order
    async fn query_values(&self, query: &JaqlQuery) -> Result<Vec<Value>, RequestError>;
}

/// Load up to `max_values` candidate values for a filter.
pub async fn fetch_filter_values(
    repository: &dyn FilterValuesRepository,
    filter: &Filter,
    dashboard: &Dashboard,
    max_values: u32,
) -> Result<Vec<Value>, RequestError> {
    let query = JaqlQuery::for_filter(filter, dashboard, max_values)?;
    repository.query_values(&query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dashboard_on(title: &str) -> Dashboard {
        Dashboard {
            datasource: Some(Datasource::new(title)),
            ..Default::default()
        }
    }

    #[test]
    fn test_query_uses_dashboard_datasource() {
        let filter = Filter::members("[Commerce.Country]", None, vec![json!("Spain")]);
        let query = JaqlQuery::for_filter(&filter, &dashboard_on("Sample ECommerce"), 100).unwrap();

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "datasource": { "title": "Sample ECommerce" },
                "metadata": [{ "dim": "[Commerce.Country]", "sort": "asc" }],
                "offset": 0,
                "count": 100
            })
        );
    }

    #[test]
    fn test_query_prefers_filter_datasource() {
        let mut filter = Filter::members("[Date.Date]", Some("years"), vec![json!("2024")]);
        filter.jaql.as_mut().unwrap().datasource = Some(Datasource::new("Finance"));

        let query = JaqlQuery::for_filter(&filter, &dashboard_on("Sample ECommerce"), 25).unwrap();
        assert_eq!(query.datasource.title, "Finance");
        assert_eq!(query.metadata[0].level.as_deref(), Some("years"));
        assert_eq!(query.count, 25);
    }

    #[test]
    fn test_query_requires_datasource() {
        let filter = Filter::members("[Commerce.Country]", None, vec![]);
        let err = JaqlQuery::for_filter(&filter, &Dashboard::default(), 100).unwrap_err();
        assert!(matches!(err, RequestError::MissingDatasource));

        let err = JaqlQuery::for_filter(&Filter::default(), &dashboard_on("x"), 100).unwrap_err();
        assert!(matches!(err, RequestError::MissingDimension));
    }

    #[test]
    fn test_normalize_member() {
        assert_eq!(normalize_member(json!([{ "data": "Spain", "text": "Spain" }])), json!("Spain"));
        assert_eq!(normalize_member(json!({ "data": 2024, "text": "2024" })), json!(2024));
        assert_eq!(normalize_member(json!("France")), json!("France"));
        assert_eq!(normalize_member(json!(["a", "b"])), json!(["a", "b"]));
    }

    #[test]
    fn test_response_into_members() {
        let response: JaqlResponse = serde_json::from_value(json!({
            "headers": ["Country"],
            "values": [
                [{ "data": "France", "text": "France" }],
                [{ "data": "Spain", "text": "Spain" }]
            ]
        }))
        .unwrap();

        assert_eq!(response.into_members(), vec![json!("France"), json!("Spain")]);
    }
}
