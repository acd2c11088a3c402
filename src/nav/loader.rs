use std::collections::HashMap;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use super::registry::{LoadFuture, Loader, RegistryDescriptor};
use super::ScreenId;
use crate::screens::ScreenFactory;
use crate::tui::Resource;

/// A resolved, mountable unit
pub type Unit = Arc<dyn ScreenFactory>;

/// A deferred load that finished during [`ScreenLoader::poll`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub screen: ScreenId,
    pub result: Result<(), String>,
}

struct InFlight {
    screen: ScreenId,
    future: LoadFuture,
    started: Instant,
}

/// Turns registry descriptors into mountable units.
///
/// Ready loaders resolve synchronously. Deferred loaders are started on first
/// request and polled cooperatively from the event loop; a successful load is
/// cached for the life of the loader, a failed one is remembered and
/// reported by [`resolve`](Self::resolve) until [`retry`](Self::retry) is
/// called for it. Loads are never cancelled.
#[derive(Default)]
pub struct ScreenLoader {
    cache: HashMap<ScreenId, Unit>,
    failed: HashMap<ScreenId, String>,
    in_flight: Vec<InFlight>,
}

impl ScreenLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Success` if the unit can be mounted now, `Failure` if its last load
    /// failed, `Loading` if a load is outstanding (starting one if needed)
    pub fn resolve(&mut self, descriptor: &RegistryDescriptor) -> Resource<Unit, String> {
        let load = match &descriptor.loader {
            Loader::Ready(factory) => return Resource::Success(factory.clone()),
            Loader::Deferred(load) => load,
        };

        if let Some(unit) = self.cache.get(&descriptor.screen) {
            return Resource::Success(unit.clone());
        }

        if let Some(message) = self.failed.get(&descriptor.screen) {
            return Resource::Failure(message.clone());
        }

        if !self.is_pending(descriptor.screen) {
            log::debug!("Starting deferred load of {}", descriptor.screen);
            self.in_flight.push(InFlight {
                screen: descriptor.screen,
                future: load(),
                started: Instant::now(),
            });
        }

        Resource::Loading
    }

    pub fn is_pending(&self, screen: ScreenId) -> bool {
        self.in_flight.iter().any(|load| load.screen == screen)
    }

    pub fn is_cached(&self, screen: ScreenId) -> bool {
        self.cache.contains_key(&screen)
    }

    pub fn is_failed(&self, screen: ScreenId) -> bool {
        self.failed.contains_key(&screen)
    }

    /// Forget a failed load so the next `resolve` starts a new one.
    /// Returns false if `screen` had not failed.
    pub fn retry(&mut self, screen: ScreenId) -> bool {
        let forgotten = self.failed.remove(&screen).is_some();
        if forgotten {
            log::info!("Retrying load of {}", screen);
        }
        forgotten
    }

    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Poll every outstanding load once and report the ones that finished
    pub fn poll(&mut self) -> Vec<LoadOutcome> {
        if self.in_flight.is_empty() {
            return Vec::new();
        }

        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut finished = Vec::new();

        self.in_flight.retain_mut(|load| {
            let polled = catch_unwind(AssertUnwindSafe(|| load.future.as_mut().poll(&mut cx)));
            let result = match polled {
                Ok(Poll::Pending) => return true,
                Ok(Poll::Ready(result)) => result.map_err(|e| format!("{:#}", e)),
                Err(panic) => Err(format!("loader panicked: {}", panic_message(&panic))),
            };
            finished.push((load.screen, load.started, result));
            false
        });

        finished
            .into_iter()
            .map(|(screen, started, result)| {
                let elapsed = started.elapsed();
                let result = match result {
                    Ok(unit) => {
                        log::info!("Loaded {} in {:?}", screen, elapsed);
                        self.cache.insert(screen, unit);
                        Ok(())
                    }
                    Err(message) => {
                        log::warn!("Loading {} failed after {:?}: {}", screen, elapsed, message);
                        self.failed.insert(screen, message.clone());
                        Err(message)
                    }
                };
                LoadOutcome { screen, result }
            })
            .collect()
    }
}

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
