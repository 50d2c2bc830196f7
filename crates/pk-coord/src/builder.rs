//! Fluent builder for constructing a [`Coordinator`].

use std::sync::Arc;

use pk_core::ParkConfig;
use pk_wire::Connector;

use crate::state::Shared;
use crate::{CoordResult, Coordinator, NoopObserver, ParkObserver};

/// Fluent builder for [`Coordinator<C, O>`].
///
/// # Required inputs
///
/// - [`ParkConfig`]: operating window, hour duration, capacity
/// - `C: Connector`: opens agents' reply channels at registration
///
/// # Optional inputs
///
/// | Method          | Default          |
/// |-----------------|------------------|
/// | `.observer(o)`  | [`NoopObserver`] |
///
/// # Example
///
/// ```rust,ignore
/// let coordinator = CoordinatorBuilder::new(config, FifoConnector)
///     .observer(HourPrinter)
///     .build()?;
/// let summary = coordinator.run(inbound)?;
/// println!("{}", summary.report);
/// ```
pub struct CoordinatorBuilder<C: Connector, O: ParkObserver = NoopObserver> {
    config:    ParkConfig,
    connector: C,
    observer:  O,
}

impl<C: Connector> CoordinatorBuilder<C, NoopObserver> {
    pub fn new(config: ParkConfig, connector: C) -> Self {
        Self { config, connector, observer: NoopObserver }
    }
}

impl<C: Connector, O: ParkObserver + 'static> CoordinatorBuilder<C, O> {
    /// Replace the observer.
    pub fn observer<P: ParkObserver + 'static>(self, observer: P) -> CoordinatorBuilder<C, P> {
        CoordinatorBuilder { config: self.config, connector: self.connector, observer }
    }

    /// Validate the configuration and return a ready-to-run coordinator.
    pub fn build(self) -> CoordResult<Coordinator<C, O>> {
        self.config.validate()?;
        let shared = Shared::new(&self.config, self.connector, self.observer);
        Ok(Coordinator { config: self.config, shared: Arc::new(shared) })
    }
}
