use super::payload::ShipmentPayload;
use super::response::{PackingResponse, ResponseEnvelope};
use crate::config::ApiSettings;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

const PACK_INTO_MANY_ENDPOINT: &str = "/packer/packIntoMany";

/// HTTP client for the 3D bin-packing API.
#[derive(Debug, Clone)]
pub struct BinPackingClient {
    client: Client,
    base_url: String,
    username: String,
    api_key: String,
}

impl BinPackingClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = settings.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            username: settings.username.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PACK_INTO_MANY_ENDPOINT)
    }

    /// Sends the shipment; non-2xx statuses and undecodable bodies are errors.
    pub async fn pack_shipment(&self, payload: ShipmentPayload) -> Result<PackingResponse> {
        let payload = payload.with_auth(&self.username, &self.api_key);
        let url = self.endpoint();

        tracing::debug!(
            "Packing {} items into {} candidate bins via {}",
            payload.items.len(),
            payload.bins.len(),
            url
        );
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Packing API response status: {}", response.status());
        let envelope: ResponseEnvelope = response.json().await?;
        Ok(envelope.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PackagingBox, Product};
    use crate::utils::error::PackingError;
    use httpmock::prelude::*;

    fn settings(base_url: String) -> ApiSettings {
        ApiSettings {
            base_url,
            username: "user".to_string(),
            api_key: "secret".to_string(),
            timeout_seconds: Some(5),
        }
    }

    fn payload() -> ShipmentPayload {
        ShipmentPayload::new(
            &[PackagingBox::new(3, 20.0, 20.0, 20.0, 100.0)],
            &[Product::new(1, 5.0, 5.0, 5.0, 1.0).unwrap()],
        )
    }

    #[tokio::test]
    async fn test_posts_authenticated_payload() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/packer/packIntoMany")
                .json_body_partial(r#"{"username": "user", "api_key": "secret"}"#);
            then.status(200).json_body(serde_json::json!({
                "response": {"status": 1, "errors": [], "not_packed_items": [],
                             "bins_packed": [{"bin_data": {"id": "3"}}]}
            }));
        });

        let client = BinPackingClient::new(&settings(server.base_url())).unwrap();
        let response = client.pack_shipment(payload()).await.unwrap();

        api_mock.assert();
        assert_eq!(response.status, 1);
        assert_eq!(response.bins_packed.len(), 1);
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let client = BinPackingClient::new(&settings("https://api.example.com/".to_string())).unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/packer/packIntoMany");
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/packer/packIntoMany");
            then.status(503);
        });

        let client = BinPackingClient::new(&settings(server.base_url())).unwrap();
        let err = client.pack_shipment(payload()).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, PackingError::Http(_)));
    }
}
