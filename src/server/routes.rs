//! Route handlers
//!
//! Every handler reads from the shared [`SourceRegistry`]; aggregation is
//! done per request over whatever the source currently holds.

use super::error::{unavailable_message, RouteError};
use super::views::{
    AmplitudeView, DashboardView, GtmContainerSummary, GtmDetailView, GtmView, HealthView,
    InsiderView, PlatformOverview, DASHBOARD_TITLE,
};
use super::AppState;
use crate::core::aggregate::{gtm, insider};
use crate::domain::{ContainerSide, EventRecord, SourceKey};
use axum::{
    extract::{Path, State},
    http::Uri,
    Json,
};
use std::str::FromStr;

/// GET /
///
/// One overview per available source. A usage source that fails to answer
/// is left off the dashboard rather than failing the page.
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let sources = &state.sources;
    let mut platforms = Vec::new();

    if let Some(usage) = sources.amplitude() {
        match usage.platform_overview().await {
            Ok(overview) => platforms.push(PlatformOverview::Usage(overview)),
            Err(e) => tracing::warn!(error = %e, "Amplitude overview unavailable"),
        }
    }

    if let Some(events) = sources.insider() {
        let events_summary = insider::events_summary(events);
        let params_summary = insider::parameters_summary(events);
        platforms.push(PlatformOverview::Insider(insider::platform_overview(
            &events_summary,
            &params_summary,
        )));
    }

    for side in [ContainerSide::Server, ContainerSide::Client] {
        if let Some(export) = sources.gtm(side) {
            platforms.push(PlatformOverview::Gtm(gtm::platform_overview(export)));
        }
    }

    Json(DashboardView {
        title: DASHBOARD_TITLE.to_string(),
        platforms,
    })
}

/// GET /amplitude
pub async fn amplitude_page(
    State(state): State<AppState>,
) -> Result<Json<AmplitudeView>, RouteError> {
    let usage = state
        .sources
        .amplitude()
        .ok_or_else(|| RouteError::page_unavailable(SourceKey::Amplitude))?;

    let records = usage.records().await?;
    let overview = usage.overview_of(&records);
    Ok(Json(AmplitudeView::new(overview, records)))
}

/// GET /insider
pub async fn insider_page(State(state): State<AppState>) -> Result<Json<InsiderView>, RouteError> {
    let events = state
        .sources
        .insider()
        .ok_or_else(|| RouteError::page_unavailable(SourceKey::Insider))?;
    Ok(Json(InsiderView::new(events)))
}

/// GET /gtm
///
/// Both containers side by side; answers as long as one of them loaded.
pub async fn gtm_page(State(state): State<AppState>) -> Result<Json<GtmView>, RouteError> {
    let server = state.sources.gtm(ContainerSide::Server);
    let client = state.sources.gtm(ContainerSide::Client);

    if server.is_none() && client.is_none() {
        return Err(RouteError::PageUnavailable(unavailable_message("GTM")));
    }

    Ok(Json(GtmView {
        server: server.map(GtmContainerSummary::new),
        client: client.map(GtmContainerSummary::new),
    }))
}

/// GET /gtm/:container
pub async fn gtm_detail_page(
    State(state): State<AppState>,
    Path(container): Path<String>,
) -> Result<Json<GtmDetailView>, RouteError> {
    let side = ContainerSide::from_str(&container).map_err(|_| {
        RouteError::PageNotFound(unavailable_message(&format!("GTM {container}")))
    })?;
    let export = state
        .sources
        .gtm(side)
        .ok_or_else(|| RouteError::page_unavailable(side.source_key()))?;

    Ok(Json(GtmDetailView::new(side.as_str(), export)))
}

/// GET /api/amplitude/events
pub async fn amplitude_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventRecord>>, RouteError> {
    let usage = state
        .sources
        .amplitude()
        .ok_or_else(|| RouteError::data_unavailable(SourceKey::Amplitude))?;
    Ok(Json(usage.events_list().await?))
}

/// GET /api/insider/events
pub async fn insider_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<insider::InsiderEventItem>>, RouteError> {
    let events = state
        .sources
        .insider()
        .ok_or_else(|| RouteError::data_unavailable(SourceKey::Insider))?;
    Ok(Json(insider::events_list(events)))
}

/// GET /api/gtm/:container/tags
pub async fn gtm_tags(
    State(state): State<AppState>,
    Path(container): Path<String>,
) -> Result<Json<Vec<gtm::TagItem>>, RouteError> {
    let side = ContainerSide::from_str(&container).map_err(|_| {
        RouteError::DataUnavailable(unavailable_message(&format!("GTM {container}")))
    })?;
    let export = state
        .sources
        .gtm(side)
        .ok_or_else(|| RouteError::data_unavailable(side.source_key()))?;
    Ok(Json(gtm::tags_list(export)))
}

/// GET /health
///
/// `ok` when every source loaded, `degraded` otherwise.
pub async fn health(State(state): State<AppState>) -> Json<HealthView> {
    let sources = state.sources.status();
    let status = if sources.values().all(|ready| *ready) {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthView {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sources,
    })
}

pub async fn not_found(uri: Uri) -> RouteError {
    tracing::debug!(path = %uri.path(), "No route");
    RouteError::PageNotFound("Page not found".to_string())
}
