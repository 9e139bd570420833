//! Fetch orchestration for dashboard refreshes

use super::{DashboardEvent, DashboardSnapshot, FetchedData, RequestToken, RequestTracker};
use crate::api::DataProvider;
use crate::error::user_message;
use crate::location_resolver::{LocationResolver, LocationSource};
use crate::models::Location;
use anyhow::Result;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Runs the fetch chain and folds its outcome into the current snapshot
pub struct DashboardService<P> {
    provider: P,
    fallback: Location,
    requests: RequestTracker,
    snapshot: RwLock<DashboardSnapshot>,
}

impl<P: DataProvider> DashboardService<P> {
    /// `fallback` is used for last-known refreshes before any refresh succeeded
    pub fn new(provider: P, fallback: Location) -> Self {
        Self {
            provider,
            fallback,
            requests: RequestTracker::new(),
            snapshot: RwLock::new(DashboardSnapshot::new()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().await.clone()
    }

    async fn apply(&self, event: DashboardEvent) -> DashboardSnapshot {
        let mut guard = self.snapshot.write().await;
        let next = guard.reduce(event);
        *guard = next.clone();
        next
    }

    /// Refresh the dashboard for `source`.
    ///
    /// Location, air quality and atmosphere are fetched one after another; the
    /// first failure aborts the chain, is recorded in the snapshot as a notice
    /// and returned. If a newer refresh started while this one was in flight,
    /// the shared snapshot is left alone and the caller gets a view built from
    /// its own data instead.
    #[instrument(skip(self))]
    pub async fn refresh(&self, source: LocationSource) -> Result<DashboardSnapshot> {
        let token = self.requests.begin();
        info!(
            "Refresh #{} started for {}",
            token.value(),
            source.describe()
        );
        let before = self
            .apply(DashboardEvent::RefreshStarted {
                token,
                source: source.clone(),
            })
            .await;

        match self.fetch(&source, before.last_known.as_ref()).await {
            Ok(data) => Ok(self.complete(token, source, data).await),
            Err(e) => {
                warn!("Refresh #{} failed: {:#}", token.value(), e);
                let event = DashboardEvent::RefreshFailed {
                    token,
                    message: user_message(&e),
                };
                self.apply(event).await;
                Err(e)
            }
        }
    }

    async fn complete(
        &self,
        token: RequestToken,
        source: LocationSource,
        data: FetchedData,
    ) -> DashboardSnapshot {
        let event = DashboardEvent::RefreshCompleted {
            token,
            data: Box::new(data),
        };

        let mut guard = self.snapshot.write().await;
        if guard.is_stale(token) {
            debug!(
                "Discarding stale response for refresh #{}",
                token.value()
            );
            let own = DashboardSnapshot {
                latest_request: Some(token),
                source: Some(source),
                ..guard.clone()
            };
            return own.reduce(event);
        }

        let next = guard.reduce(event);
        *guard = next.clone();
        next
    }

    async fn fetch(
        &self,
        source: &LocationSource,
        last_known: Option<&Location>,
    ) -> Result<FetchedData> {
        let location =
            LocationResolver::resolve(&self.provider, source, last_known, &self.fallback).await?;
        let air_quality = self.provider.air_quality(location.coordinates).await?;
        let atmosphere = self.provider.atmosphere(location.coordinates).await?;

        Ok(FetchedData {
            location,
            air_quality,
            atmosphere,
            fetched_at: Utc::now(),
        })
    }
}
