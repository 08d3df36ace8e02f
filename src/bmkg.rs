//! BMKG forecast API client
//!
//! Single-shot HTTP GETs with a bounded timeout. There is no retry: any
//! network error, non-success status or timeout is returned as a transport
//! failure for the caller to surface.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::ApiConfig;
use crate::models::{AdmEntry, AdmListResponse, ForecastResponse};
use crate::{DashboardError, Result};

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Where forecasts and the province table come from
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Forecast for every regency in one province
    async fn fetch_forecast(&self, adm1: &str) -> Result<ForecastResponse>;

    /// The ADM1 code table, in the service's own order
    async fn fetch_provinces(&self) -> Result<Vec<AdmEntry>>;
}

pub struct BmkgClient {
    client: Client,
    forecast_url: String,
    adm_list_url: String,
}

impl BmkgClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DashboardError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            forecast_url: config.forecast_url.clone(),
            adm_list_url: config.adm_list_url.clone(),
        })
    }

    #[must_use]
    pub fn forecast_request_url(&self, adm1: &str) -> String {
        format!("{}?adm1={}", self.forecast_url, urlencoding::encode(adm1))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("BMKG API request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body: T = response.json().await.map_err(|e| {
            if e.is_timeout() {
                DashboardError::from(e)
            } else {
                DashboardError::invalid_response(format!("{url}: {e}"))
            }
        })?;

        let total_duration = start_time.elapsed();
        if total_duration > SLOW_RESPONSE {
            warn!("Slow API response detected: {:.3}s", total_duration.as_secs_f64());
        } else {
            debug!("API response in {:.3}s", total_duration.as_secs_f64());
        }
        Ok(body)
    }
}

#[async_trait]
impl ForecastSource for BmkgClient {
    #[instrument(skip(self))]
    async fn fetch_forecast(&self, adm1: &str) -> Result<ForecastResponse> {
        info!("Fetching forecast for ADM1 {}", adm1);
        let url = self.forecast_request_url(adm1);
        let forecast: ForecastResponse = self.get_json(&url).await?;
        info!(
            "Received forecast with {} locations for ADM1 {}",
            forecast.data.len(),
            adm1
        );
        Ok(forecast)
    }

    #[instrument(skip(self))]
    async fn fetch_provinces(&self) -> Result<Vec<AdmEntry>> {
        info!("Fetching province table");
        let list: AdmListResponse = self.get_json(&self.adm_list_url).await?;
        info!("Received {} provinces", list.data.len());
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one connection and answer with `reply`, or hold it open
    /// without answering when `reply` is `None`.
    async fn serve_once(reply: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            match reply {
                Some(reply) => {
                    socket.write_all(reply.as_bytes()).await.unwrap();
                    socket.flush().await.unwrap();
                }
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
        });
        format!("http://{addr}/forecast")
    }

    fn client_for(forecast_url: String) -> BmkgClient {
        let config = ApiConfig {
            forecast_url,
            timeout_seconds: 1,
            ..ApiConfig::default()
        };
        BmkgClient::new(&config).unwrap()
    }

    #[test]
    fn test_forecast_url_is_encoded() {
        let client = BmkgClient::new(&ApiConfig::default()).unwrap();
        assert_eq!(
            client.forecast_request_url("32"),
            "https://cuaca.bmkg.go.id/api/df/v1/forecast/adm?adm1=32"
        );
        assert_eq!(
            client.forecast_request_url("3 2&x"),
            "https://cuaca.bmkg.go.id/api/df/v1/forecast/adm?adm1=3%202%26x"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let config = ApiConfig {
            forecast_url: "http://127.0.0.1:9/forecast".to_string(),
            timeout_seconds: 2,
            ..ApiConfig::default()
        };
        let client = BmkgClient::new(&config).unwrap();
        let err = client.fetch_forecast("32").await.unwrap_err();
        assert!(matches!(err, DashboardError::Transport { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_silent_server_times_out_as_transport_failure() {
        let client = client_for(serve_once(None).await);

        let err = client.fetch_forecast("32").await.unwrap_err();
        assert!(
            matches!(err, DashboardError::Transport { ref message } if message.contains("timed out")),
            "{err:?}"
        );
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_error_status_is_transport_failure() {
        let reply = "HTTP/1.1 500 Internal Server Error\r\n\
                     Content-Length: 0\r\n\
                     Connection: close\r\n\r\n";
        let client = client_for(serve_once(Some(reply)).await);

        let err = client.fetch_forecast("32").await.unwrap_err();
        assert!(
            matches!(err, DashboardError::Transport { ref message } if message.contains("500")),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let reply = "HTTP/1.1 200 OK\r\n\
                     Content-Type: text/plain\r\n\
                     Content-Length: 5\r\n\
                     Connection: close\r\n\r\n\
                     hello";
        let client = client_for(serve_once(Some(reply)).await);

        let err = client.fetch_forecast("32").await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidResponse { .. }), "{err:?}");
        assert!(err.is_transport());
    }
}
