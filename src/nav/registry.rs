use futures::future::BoxFuture;
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;

use super::{Params, ScreenId};
use crate::screens::ScreenFactory;

/// Future produced by a deferred loader
pub type LoadFuture = BoxFuture<'static, anyhow::Result<Arc<dyn ScreenFactory>>>;

/// How a screen's unit is obtained
#[derive(Clone)]
pub enum Loader {
    /// Already materialized, resolves synchronously
    Ready(Arc<dyn ScreenFactory>),

    /// Loaded on first use; may fail or never finish
    Deferred(Arc<dyn Fn() -> LoadFuture + Send + Sync>),
}

impl Loader {
    pub fn ready(factory: impl ScreenFactory + 'static) -> Self {
        Loader::Ready(Arc::new(factory))
    }

    pub fn deferred<F, Fut>(load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Arc<dyn ScreenFactory>>> + Send + 'static,
    {
        Loader::Deferred(Arc::new(move || Box::pin(load()) as LoadFuture))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Loader::Deferred(_))
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Loader::Ready(_) => f.write_str("Loader::Ready"),
            Loader::Deferred(_) => f.write_str("Loader::Deferred"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistryDescriptor {
    pub screen: ScreenId,
    pub loader: Loader,
    /// Lowest-precedence inputs, overridden by the entry's own params
    pub fixed_params: Params,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("screen '{0}' is registered more than once")]
    Duplicate(ScreenId),

    #[error("no registry entry for reachable screens: {}", list(.0))]
    Missing(Vec<ScreenId>),

    #[error("dashboard has no bottom navigation destinations")]
    NoDestinations,
}

fn list(screens: &[ScreenId]) -> String {
    screens.iter().map(ScreenId::as_str).collect::<Vec<_>>().join(", ")
}

/// Immutable lookup from screen id to descriptor, built once per dashboard
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    descriptors: HashMap<ScreenId, RegistryDescriptor>,
}

impl ViewRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, screen: ScreenId) -> Option<&RegistryDescriptor> {
        self.descriptors.get(&screen)
    }

    pub fn contains(&self, screen: ScreenId) -> bool {
        self.descriptors.contains_key(&screen)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Registered screens in declaration order of [`ScreenId`]
    pub fn screens(&self) -> Vec<ScreenId> {
        let mut screens: Vec<_> = self.descriptors.keys().copied().collect();
        screens.sort();
        screens
    }

    /// Fail if any screen in `required` has no descriptor
    pub fn validate(&self, required: impl IntoIterator<Item = ScreenId>) -> Result<(), RegistryError> {
        let missing: BTreeSet<ScreenId> = required
            .into_iter()
            .filter(|screen| !self.contains(*screen))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Missing(missing.into_iter().collect()))
        }
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    descriptors: HashMap<ScreenId, RegistryDescriptor>,
    duplicate: Option<ScreenId>,
}

impl RegistryBuilder {
    pub fn register(self, screen: ScreenId, loader: Loader) -> Self {
        self.register_with(screen, loader, Params::new())
    }

    pub fn register_with(mut self, screen: ScreenId, loader: Loader, fixed_params: impl Into<Params>) -> Self {
        let descriptor = RegistryDescriptor {
            screen,
            loader,
            fixed_params: fixed_params.into(),
        };
        if self.descriptors.insert(screen, descriptor).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(screen);
        }
        self
    }

    pub fn build(self) -> Result<ViewRegistry, RegistryError> {
        if let Some(screen) = self.duplicate {
            return Err(RegistryError::Duplicate(screen));
        }
        Ok(ViewRegistry {
            descriptors: self.descriptors,
        })
    }
}
