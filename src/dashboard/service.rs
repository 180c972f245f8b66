use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::config::DashboardConfig;
use crate::source::DataSource;

use super::orchestrator::compute_dashboard_summary_with;
use super::types::Summary;
use super::DashboardError;

/// A summary together with the ticket of the pass that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedSummary {
    pub ticket: u64,
    pub summary: Summary,
}

/// What happened to the summary a `refresh` computed.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Became the latest summary.
    Published(Summary),
    /// A more recently started pass had already published; this summary
    /// was returned to the caller but not stored.
    Superseded(Summary),
}

impl RefreshOutcome {
    pub fn summary(&self) -> &Summary {
        match self {
            RefreshOutcome::Published(s) | RefreshOutcome::Superseded(s) => s,
        }
    }

    pub fn into_summary(self) -> Summary {
        match self {
            RefreshOutcome::Published(s) | RefreshOutcome::Superseded(s) => s,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, RefreshOutcome::Published(_))
    }
}

/// Keeps the latest dashboard summary for a long-lived caller.
///
/// Passes may overlap. Each one takes a ticket when it starts and only
/// publishes if no pass with a later ticket has published first, so a slow
/// stale pass can never replace a fresher summary. A failed pass leaves the
/// published summary untouched.
pub struct DashboardService<S: DataSource> {
    source: S,
    config: DashboardConfig,
    next_ticket: AtomicU64,
    published: RwLock<Option<PublishedSummary>>,
}

impl<S: DataSource> DashboardService<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, DashboardConfig::default())
    }

    pub fn with_config(source: S, config: DashboardConfig) -> Self {
        Self {
            source,
            config,
            next_ticket: AtomicU64::new(1),
            published: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Run one pass for `now` and publish it unless a newer pass already has.
    pub async fn refresh(&self, now: DateTime<Utc>) -> Result<RefreshOutcome, DashboardError> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(ticket, "Dashboard refresh started");

        let summary = compute_dashboard_summary_with(&self.source, now, &self.config).await?;

        let mut published = self
            .published
            .write()
            .map_err(|_| DashboardError::LockPoisoned)?;

        if let Some(current) = published.as_ref() {
            if current.ticket > ticket {
                tracing::warn!(
                    ticket,
                    published_ticket = current.ticket,
                    "Discarding summary from superseded dashboard pass"
                );
                return Ok(RefreshOutcome::Superseded(summary));
            }
        }

        *published = Some(PublishedSummary {
            ticket,
            summary: summary.clone(),
        });
        Ok(RefreshOutcome::Published(summary))
    }

    /// The most recently published summary, if any pass has published.
    pub fn latest(&self) -> Result<Option<PublishedSummary>, DashboardError> {
        let published = self
            .published
            .read()
            .map_err(|_| DashboardError::LockPoisoned)?;
        Ok(published.clone())
    }
}
