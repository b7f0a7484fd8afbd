// JAQL repository implementation over the BI server's REST API
use crate::application::values_repository::{FilterValuesRepository, JaqlQuery, JaqlResponse, RequestError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JaqlRepository {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl JaqlRepository {
    pub fn new(base_url: String, api_token: Option<String>, timeout: Duration) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn query_url(&self, datasource_title: &str) -> String {
        format!(
            "{}/api/datasources/{}/jaql",
            self.base_url,
            urlencoding::encode(datasource_title)
        )
    }
}

#[async_trait]
impl FilterValuesRepository for JaqlRepository {
    async fn query_values(&self, query: &JaqlQuery) -> Result<Vec<Value>, RequestError> {
        let url = self.query_url(&query.datasource.title);
        tracing::debug!("Executing JAQL members query: {}", url);

        let mut request = self.client.post(&url).json(query);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let data: JaqlResponse = serde_json::from_str(&body)?;
        Ok(data.into_members())
    }
}
