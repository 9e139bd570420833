//! JSON HTTP surface over the dashboard service

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::api::DataProvider;
use crate::dashboard::{AirQualityReport, DashboardService, DashboardSnapshot};
use crate::error::user_message;
use crate::location_resolver::{LocationParser, LocationSource};
use crate::{AirDashError, ErrorCode};

type Service<P> = Arc<DashboardService<P>>;
type ApiError = (StatusCode, Json<ErrorBody>);

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl DashboardQuery {
    /// City wins over coordinates; neither means last-known
    fn source(&self) -> Result<LocationSource> {
        if let Some(city) = &self.city {
            return LocationParser::parse(city);
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(LocationSource::Coordinates(
                LocationParser::validate_coordinates(lat, lon)?,
            )),
            (None, None) => Ok(LocationSource::LastKnown),
            _ => Err(AirDashError::validation("Both lat and lon are required").into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AqiQuery {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
}

pub fn router<P: DataProvider + 'static>(service: Service<P>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/dashboard", get(get_dashboard::<P>))
        .route("/api/aqi", get(get_aqi))
        .layer(cors)
        .with_state(service)
}

fn error_response(err: &anyhow::Error) -> ApiError {
    let status = match err.downcast_ref::<AirDashError>() {
        Some(AirDashError::Validation { .. }) => StatusCode::BAD_REQUEST,
        Some(e) if e.code() == Some(ErrorCode::ApiLocationNotFound) => StatusCode::NOT_FOUND,
        Some(AirDashError::Api { .. }) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: user_message(err),
        }),
    )
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn get_dashboard<P: DataProvider + 'static>(
    State(service): State<Service<P>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    let source = query.source().map_err(|e| error_response(&e))?;
    let snapshot = service
        .refresh(source)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(snapshot))
}

async fn get_aqi(Query(query): Query<AqiQuery>) -> Result<Json<AirQualityReport>, ApiError> {
    AirQualityReport::from_concentrations(query.pm25, query.pm10)
        .map(Json)
        .map_err(|e| error_response(&e))
}

/// Bind `addr` and serve until the process is stopped
pub async fn run<P: DataProvider + 'static>(service: Service<P>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, router(service))
        .await
        .with_context(|| "Web server stopped unexpectedly")?;
    Ok(())
}
