use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Client contract for an upstream SMM fulfillment provider.
///
/// The panel defines the full surface (balance / services / add order /
/// status / cancel / refill) but does not yet route order fulfillment
/// through it; order progress fields are maintained by admin tooling.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned an error: {0}")]
    Api(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderBalance {
    pub balance: String,
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderService {
    pub service: i64,
    pub name: String,
    pub category: String,
    pub rate: String,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderOrder {
    pub order: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderOrderStatus {
    pub status: String,
    pub charge: Option<String>,
    pub start_count: Option<i64>,
    pub remains: Option<i64>,
    pub currency: Option<String>,
}

#[async_trait]
pub trait SmmProvider {
    async fn balance(&self) -> Result<ProviderBalance, ProviderError>;
    async fn services(&self) -> Result<Vec<ProviderService>, ProviderError>;
    async fn add_order(
        &self,
        service: i64,
        link: &str,
        quantity: i32,
    ) -> Result<ProviderOrder, ProviderError>;
    async fn order_status(&self, order: i64) -> Result<ProviderOrderStatus, ProviderError>;
    async fn cancel(&self, order: i64) -> Result<(), ProviderError>;
    async fn refill(&self, order: i64) -> Result<(), ProviderError>;
}

/// reqwest-backed client speaking the conventional `key` + `action` form API
/// most SMM providers expose.
pub struct HttpSmmProvider {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpSmmProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            api_url: config.provider_api_url.clone(),
            api_key: config.provider_api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let mut form: Vec<(&str, String)> = vec![("key", self.api_key.clone())];
        form.extend_from_slice(params);

        let response = self
            .client
            .post(&self.api_url)
            .form(&form)
            .send()
            .await?;

        let body: serde_json::Value = response.json().await?;
        if let Some(error) = body.get("error").and_then(|e| e.as_str()) {
            return Err(ProviderError::Api(error.to_string()));
        }

        serde_json::from_value(body).map_err(|e| ProviderError::Api(e.to_string()))
    }
}

#[async_trait]
impl SmmProvider for HttpSmmProvider {
    async fn balance(&self) -> Result<ProviderBalance, ProviderError> {
        self.call(&[("action", "balance".to_string())]).await
    }

    async fn services(&self) -> Result<Vec<ProviderService>, ProviderError> {
        self.call(&[("action", "services".to_string())]).await
    }

    async fn add_order(
        &self,
        service: i64,
        link: &str,
        quantity: i32,
    ) -> Result<ProviderOrder, ProviderError> {
        self.call(&[
            ("action", "add".to_string()),
            ("service", service.to_string()),
            ("link", link.to_string()),
            ("quantity", quantity.to_string()),
        ])
        .await
    }

    async fn order_status(&self, order: i64) -> Result<ProviderOrderStatus, ProviderError> {
        self.call(&[
            ("action", "status".to_string()),
            ("order", order.to_string()),
        ])
        .await
    }

    async fn cancel(&self, order: i64) -> Result<(), ProviderError> {
        let _: serde_json::Value = self
            .call(&[
                ("action", "cancel".to_string()),
                ("order", order.to_string()),
            ])
            .await?;
        Ok(())
    }

    async fn refill(&self, order: i64) -> Result<(), ProviderError> {
        let _: serde_json::Value = self
            .call(&[
                ("action", "refill".to_string()),
                ("order", order.to_string()),
            ])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_services_listing() {
        let body = serde_json::json!([
            {"service": 1, "name": "Followers", "category": "Instagram", "rate": "0.90", "min": 50, "max": 10000},
            {"service": 2, "name": "Likes", "category": "Instagram", "rate": "0.20", "min": 10, "max": 50000}
        ]);

        let services: Vec<ProviderService> = serde_json::from_value(body).unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].service, 1);
        assert_eq!(services[1].max, 50000);
    }

    #[test]
    fn parses_an_order_status() {
        let body = serde_json::json!({
            "status": "Partial",
            "charge": "2.5",
            "start_count": 3572,
            "remains": 157,
            "currency": "USD"
        });

        let status: ProviderOrderStatus = serde_json::from_value(body).unwrap();
        assert_eq!(status.status, "Partial");
        assert_eq!(status.remains, Some(157));
    }

    #[test]
    fn client_uses_configured_endpoint() {
        let config = Config {
            database_url: String::new(),
            app_url: String::new(),
            jwt_secret: String::new(),
            jwt_maxage: 60,
            port: 8000,
            provider_api_url: "https://provider.test/api/v2".to_string(),
            provider_api_key: "key".to_string(),
        };

        let client = HttpSmmProvider::new(&config);
        assert_eq!(client.api_url, "https://provider.test/api/v2");
    }
}
