use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::forms::{EncodedForm, PartValue};
use crate::models::{DashboardData, Property, PropertyKind};
use crate::schema::FormMode;

/// The remote listing API. A trait seam so the store and any front-end
/// code can run against a fake in tests.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    async fn fetch_dashboard(&self) -> Result<DashboardData>;
    async fn fetch_all(&self) -> Result<Vec<Property>>;
    async fn create(&self, form: &EncodedForm) -> Result<()>;
    async fn update(&self, id: &str, form: &EncodedForm) -> Result<()>;
    async fn delete(&self, id: &str, kind: PropertyKind) -> Result<()>;
}

/// reqwest-backed implementation against the configured base URL.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("estate-desk/0.1")
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_multipart(form: &EncodedForm) -> Result<multipart::Form> {
        let mut body = multipart::Form::new();
        for part in &form.parts {
            body = match &part.value {
                PartValue::Text(text) => body.text(part.key.clone(), text.clone()),
                PartValue::File(file) => {
                    let file_part = multipart::Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime)
                        .with_context(|| format!("invalid mime type {}", file.mime))?;
                    body.part(part.key.clone(), file_part)
                }
            };
        }
        Ok(body)
    }
}

/// Pulls the message to surface from an error body: a JSON `detail`
/// field when the API sent one, the fallback otherwise.
pub fn error_detail(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}

async fn ensure_success(response: reqwest::Response, fallback: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("{}", error_detail(&body, fallback));
}

#[async_trait]
impl PropertyApi for HttpApi {
    async fn fetch_dashboard(&self) -> Result<DashboardData> {
        debug!("fetching dashboard stats");
        let response = self
            .client
            .get(self.url("/properties/dashboard"))
            .send()
            .await
            .context("Failed to fetch dashboard data")?;
        let response = ensure_success(response, "Failed to fetch dashboard data").await?;
        Ok(response.json().await?)
    }

    async fn fetch_all(&self) -> Result<Vec<Property>> {
        debug!("fetching all properties");
        let response = self
            .client
            .get(self.url("/properties/all"))
            .send()
            .await
            .context("Failed to fetch properties")?;
        let response = ensure_success(response, "Failed to fetch properties").await?;
        // Kind normalization happens in the Property deserializer.
        Ok(response.json().await?)
    }

    async fn create(&self, form: &EncodedForm) -> Result<()> {
        let url = self.url(&format!("/properties{}", form.kind.endpoint(FormMode::Create)));
        info!(kind = %form.kind, "posting new property");
        let response = self
            .client
            .post(url)
            .multipart(Self::build_multipart(form)?)
            .send()
            .await
            .context("Failed to post property")?;
        ensure_success(response, "Failed to post property").await?;
        Ok(())
    }

    async fn update(&self, id: &str, form: &EncodedForm) -> Result<()> {
        let url = self.url(&format!("/properties/update/{id}"));
        info!(kind = %form.kind, id, "updating property");
        let response = self
            .client
            .put(url)
            .multipart(Self::build_multipart(form)?)
            .send()
            .await
            .context("Failed to update property")?;
        ensure_success(response, "Failed to update property").await?;
        Ok(())
    }

    async fn delete(&self, id: &str, kind: PropertyKind) -> Result<()> {
        info!(kind = %kind, id, "deleting property");
        let response = self
            .client
            .delete(self.url(&format!("/properties/delete/{id}")))
            .query(&[("property_type", kind.backend_name())])
            .send()
            .await
            .context("Failed to delete property")?;
        ensure_success(response, "Failed to delete property").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_prefers_the_json_field() {
        let body = r#"{"detail": "Price must be a number"}"#;
        assert_eq!(error_detail(body, "Failed to post property"), "Price must be a number");
    }

    #[test]
    fn error_detail_falls_back_on_plain_bodies() {
        assert_eq!(
            error_detail("<html>502</html>", "Failed to post property"),
            "Failed to post property"
        );
        assert_eq!(
            error_detail(r#"{"message": "nope"}"#, "Failed to delete property"),
            "Failed to delete property"
        );
    }
}
