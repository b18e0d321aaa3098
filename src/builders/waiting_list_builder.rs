//! Builders to construct a waiting list from configuration.

use std::sync::Arc;

use crate::config::WaitingListConfig;
use crate::core::{
    AllocationLedger, AuditSink, ResourceProvider, Spawn, WaitingList, WaitingListError,
    WaitingListStore,
};
use crate::util::clock::{Clock, TokioClock};

/// Build a waiting list from configuration with default clock and no audit sink.
///
/// Starts the periodic sweeper when `sweep_interval_secs` is set.
///
/// # Errors
///
/// `Backend` if the configuration does not validate.
pub fn build_waiting_list<St, R, L, S>(
    cfg: &WaitingListConfig,
    store: St,
    resources: R,
    ledger: L,
    spawner: S,
) -> Result<WaitingList<St, R, L, S>, WaitingListError>
where
    St: WaitingListStore + Send + 'static,
    R: ResourceProvider,
    L: AllocationLedger,
    S: Spawn + Send + Sync + 'static,
{
    WaitingListBuilder::new(cfg.clone()).build(store, resources, ledger, spawner)
}

/// Step-by-step waiting list construction.
pub struct WaitingListBuilder {
    config: WaitingListConfig,
    clock: Option<Arc<dyn Clock>>,
    audit: Option<Box<dyn AuditSink>>,
}

impl WaitingListBuilder {
    /// Start from a configuration.
    #[must_use]
    pub fn new(config: WaitingListConfig) -> Self {
        Self {
            config,
            clock: None,
            audit: None,
        }
    }

    /// Read time from `clock` instead of tokio's clock.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Record transitions into `audit`.
    #[must_use]
    pub fn audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validate the configuration and assemble the waiting list.
    ///
    /// # Errors
    ///
    /// `Backend` if the configuration does not validate.
    pub fn build<St, R, L, S>(
        self,
        store: St,
        resources: R,
        ledger: L,
        spawner: S,
    ) -> Result<WaitingList<St, R, L, S>, WaitingListError>
    where
        St: WaitingListStore + Send + 'static,
        R: ResourceProvider,
        L: AllocationLedger,
        S: Spawn + Send + Sync + 'static,
    {
        self.config
            .validate()
            .map_err(|e| WaitingListError::Backend(format!("config invalid: {e}")))?;

        let sweep_every = self.config.sweep_interval();
        let clock = self.clock.unwrap_or_else(|| Arc::new(TokioClock::new()));
        let mut list =
            WaitingList::with_clock(self.config, store, resources, ledger, spawner, clock);
        if let Some(audit) = self.audit {
            list = list.with_audit(audit);
        }
        if let Some(every) = sweep_every {
            list.spawn_sweeper(every);
        }
        tracing::info!(
            offer_ttl_secs = list.config().offer_ttl_secs,
            max_conflict_retries = list.config().max_conflict_retries,
            "waiting list built"
        );
        Ok(list)
    }
}
