//! Cached access to forecasts and the province table
//!
//! Forecasts are memoized per ADM1 code and the province table under a
//! single key, each with its own time-to-live.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::Result;
use crate::bmkg::ForecastSource;
use crate::cache::TtlCache;
use crate::config::CacheConfig;
use crate::dashboard::{DashboardRequest, LocationDashboard};
use crate::location_resolver::{LocationResolver, is_code};
use crate::models::{AdmEntry, ForecastResponse};

const PROVINCES_KEY: &str = "adm1";

pub struct ForecastService<S> {
    source: S,
    forecasts: TtlCache<Arc<ForecastResponse>>,
    provinces: TtlCache<Arc<Vec<AdmEntry>>>,
}

impl<S: ForecastSource> ForecastService<S> {
    #[must_use]
    pub fn new(source: S, cache: &CacheConfig) -> Self {
        Self {
            source,
            forecasts: TtlCache::new(cache.forecast_ttl()),
            provinces: TtlCache::new(cache.adm_list_ttl()),
        }
    }

    /// Forecast for one province, from cache while fresh
    #[instrument(skip(self))]
    pub async fn forecast(&mut self, adm1: &str) -> Result<Arc<ForecastResponse>> {
        if let Some(cached) = self.forecasts.get(adm1) {
            debug!("Serving forecast for {} from cache", adm1);
            return Ok(cached);
        }

        let forecast = Arc::new(self.source.fetch_forecast(adm1).await?);
        self.forecasts.purge_expired();
        self.forecasts.put(adm1, Arc::clone(&forecast));
        Ok(forecast)
    }

    /// Province table, from cache while fresh
    #[instrument(skip(self))]
    pub async fn provinces(&mut self) -> Result<Arc<Vec<AdmEntry>>> {
        if let Some(cached) = self.provinces.get(PROVINCES_KEY) {
            return Ok(cached);
        }

        let provinces = Arc::new(self.source.fetch_provinces().await?);
        self.provinces.put(PROVINCES_KEY, Arc::clone(&provinces));
        Ok(provinces)
    }

    /// Resolve a code or province name. Codes never trigger a table fetch.
    pub async fn resolve_region(&mut self, input: &str) -> Result<String> {
        if is_code(input) {
            return LocationResolver::resolve(input, &[]);
        }
        let provinces = self.provinces().await?;
        LocationResolver::resolve(input, &provinces)
    }

    /// Resolve, fetch and assemble the dashboard for one location.
    ///
    /// `Ok(None)` is the "no data" state: the province has no locations.
    pub async fn dashboard(
        &mut self,
        request: &DashboardRequest,
    ) -> Result<Option<LocationDashboard>> {
        let adm1 = self.resolve_region(&request.region).await?;
        let response = self.forecast(&adm1).await?;

        let Some(choice) = response.select_location(request.location.as_deref())? else {
            return Ok(None);
        };
        Ok(Some(LocationDashboard::build(
            &adm1,
            &response,
            &choice,
            &request.range,
        )))
    }
}
