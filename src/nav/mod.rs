//! Hierarchical view-stack navigation.
//!
//! A dashboard owns one [`NavigationSession`] (stack, bottom nav, session
//! context), an immutable [`ViewRegistry`], a [`ScreenLoader`] and a
//! [`RenderHost`]. Screens only ever see a [`Navigator`].

mod bottom_nav;
pub mod chrome;
mod host;
mod loader;
mod navigator;
mod params;
mod registry;
mod screen_id;
mod session;
mod stack;

pub use bottom_nav::{BottomNav, Destination};
pub use chrome::{HeaderModel, SearchItem, SearchOutcome, SearchOverlay, SearchTarget};
pub use host::{HostStatus, MountId, RenderHost};
pub use loader::{LoadOutcome, ScreenLoader, Unit};
pub use navigator::{NavQueue, NavRequest, Navigator};
pub use params::Params;
pub use registry::{LoadFuture, Loader, RegistryBuilder, RegistryDescriptor, RegistryError, ViewRegistry};
pub use screen_id::{ScreenId, UnknownScreen};
pub use session::{NavigationSession, SessionContext, SessionEvent};
pub use stack::{EntryId, NavigationStack, RenderKey, StackEntry};
