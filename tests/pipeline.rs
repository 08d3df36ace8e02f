//! End-to-end pipeline tests against a stubbed forecast source

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use weatherdash::config::CacheConfig;
use weatherdash::export::{self, ExportFormat};
use weatherdash::timeline::parse_bound;
use weatherdash::{
    AdmEntry, DashboardError, DashboardRequest, DirectionSector, ForecastResponse,
    ForecastService, ForecastSource, Result, SpeedClass, TimeRange,
};

#[derive(Default)]
struct StubSource {
    forecast: Option<serde_json::Value>,
    forecast_calls: Arc<AtomicUsize>,
    province_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ForecastSource for StubSource {
    async fn fetch_forecast(&self, adm1: &str) -> Result<ForecastResponse> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        match &self.forecast {
            Some(body) if adm1 == "32" => serde_json::from_value(body.clone())
                .map_err(|e| DashboardError::invalid_response(e.to_string())),
            _ => Err(DashboardError::transport("server answered 404 Not Found")),
        }
    }

    async fn fetch_provinces(&self) -> Result<Vec<AdmEntry>> {
        self.province_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            AdmEntry::new("31", "DKI Jakarta"),
            AdmEntry::new("32", "Jawa Barat"),
            AdmEntry::new("33", "Jawa Tengah"),
        ])
    }
}

fn west_java() -> serde_json::Value {
    json!({
        "lokasi": { "adm1": "32", "provinsi": "Jawa Barat" },
        "data": [{
            "lokasi": {
                "adm1": "32", "adm2": "32.01", "provinsi": "Jawa Barat",
                "kotkab": "Kab. Bogor", "lat": -6.595, "lon": "106.8166",
                "timezone": "+0700"
            },
            "cuaca": [
                [{
                    "utc_datetime": "2025-01-01 00:00:00",
                    "local_datetime": "2025-01-01 07:00:00",
                    "t": 22, "hu": 90, "ws": 1.0, "wd_deg": 10, "tp": 0,
                    "weather_desc": "Berawan", "wd": "N"
                }],
                [{
                    "utc_datetime": "2025-01-01 03:00:00",
                    "local_datetime": "2025-01-01 10:00:00",
                    "t": "27.5", "hu": 70, "ws": 3.0, "wd_deg": 10, "tp": 1.2,
                    "weather_desc": "Hujan Ringan", "wd": "N"
                }]
            ]
        }, {
            "lokasi": { "adm2": "32.71", "kotkab": "Kota Bogor" },
            "cuaca": []
        }]
    })
}

fn service(source: StubSource) -> ForecastService<StubSource> {
    ForecastService::new(source, &CacheConfig::default())
}

fn request(region: &str) -> DashboardRequest {
    DashboardRequest {
        region: region.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_dashboard_by_province_name() {
    let mut service = service(StubSource {
        forecast: Some(west_java()),
        ..Default::default()
    });

    let dashboard = service
        .dashboard(&request("jawa barat"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(dashboard.adm1, "32");
    assert_eq!(dashboard.location_label, "Kab. Bogor");
    assert_eq!(dashboard.location_count, 2);
    assert_eq!(dashboard.selected.len(), 2);
    assert_eq!(dashboard.selected[1].temperature_c, Some(27.5));
    assert_eq!(dashboard.meta.coordinates(), Some((-6.595, 106.8166)));

    let rose = &dashboard.windrose;
    assert_eq!(rose.total(), 2);
    assert_eq!(rose.percent(DirectionSector::N, SpeedClass::Calm), 50.0);
    assert_eq!(rose.percent(DirectionSector::N, SpeedClass::Light), 50.0);
    let total: f64 = rose.cells().iter().map(|c| c.percent).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_forecast_is_cached_per_region() {
    let source = StubSource {
        forecast: Some(west_java()),
        ..Default::default()
    };
    let forecast_calls = Arc::clone(&source.forecast_calls);
    let province_calls = Arc::clone(&source.province_calls);
    let mut service = service(source);

    service.dashboard(&request("32")).await.unwrap();
    service.dashboard(&request("Jawa Barat")).await.unwrap();
    service.dashboard(&request("barat")).await.unwrap();

    assert_eq!(forecast_calls.load(Ordering::SeqCst), 1);
    // Codes skip the province table; the two names share one fetch.
    assert_eq!(province_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unresolvable_region_halts_before_fetch() {
    let source = StubSource {
        forecast: Some(west_java()),
        ..Default::default()
    };
    let forecast_calls = Arc::clone(&source.forecast_calls);
    let mut service = service(source);

    let err = service.dashboard(&request("Atlantis")).await.unwrap_err();
    assert!(matches!(err, DashboardError::RegionNotFound { .. }));
    assert_eq!(forecast_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_transport_failure_is_surfaced() {
    let mut service = service(StubSource {
        forecast: Some(west_java()),
        ..Default::default()
    });

    let err = service.dashboard(&request("99")).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_empty_province_is_no_data() {
    let mut service = service(StubSource {
        forecast: Some(json!({ "lokasi": { "adm1": "32" }, "data": [] })),
        ..Default::default()
    });

    assert!(service.dashboard(&request("32")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_location_and_time_range_selection() {
    let mut service = service(StubSource {
        forecast: Some(west_java()),
        ..Default::default()
    });

    let range = TimeRange::new(
        Some(parse_bound("2025-01-01 08:00").unwrap()),
        Some(parse_bound("2025-01-01 10:00").unwrap()),
    )
    .unwrap();
    let dashboard = service
        .dashboard(&DashboardRequest {
            region: "32".to_string(),
            location: Some("32.01".to_string()),
            range,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dashboard.selected.len(), 1);
    assert_eq!(dashboard.windrose.percent(DirectionSector::N, SpeedClass::Light), 100.0);

    let empty = service
        .dashboard(&DashboardRequest {
            region: "32".to_string(),
            location: Some("kota bogor".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();
    assert!(empty.is_empty());
    assert!(empty.windrose.is_empty());

    let err = service
        .dashboard(&DashboardRequest {
            region: "32".to_string(),
            location: Some("Kab. Garut".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::LocationNotFound { .. }));
}

#[tokio::test]
async fn test_csv_export_round_trip() {
    let mut service = service(StubSource {
        forecast: Some(west_java()),
        ..Default::default()
    });
    let dashboard = service.dashboard(&request("32")).await.unwrap().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(export::default_file_name(
        &dashboard.adm1,
        &dashboard.location_label,
        ExportFormat::Csv,
    ));
    export::write_file(&path, ExportFormat::Csv, &dashboard.selected).unwrap();

    let parsed = export::read_csv(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(parsed, dashboard.selected);
    assert_eq!(parsed[0].weather_desc.as_deref(), Some("Berawan"));
    assert_eq!(parsed[0].regency.as_deref(), Some("Kab. Bogor"));
}
