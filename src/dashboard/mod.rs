//! One dashboard implementation, parameterised by [`Role`].
//!
//! A [`Dashboard`] is the static part: the registry, bottom navigation and
//! search catalogue for one logged in user. [`ActiveDashboard`] adds the live
//! navigation session and everything needed to drive it from the event loop.

mod active;
mod role;

pub use active::{ActiveDashboard, DashboardEvent};
pub use role::Role;

use anyhow::Result;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::nav::{
    BottomNav, Destination, Loader, Params, RegistryBuilder, RegistryError, ScreenId, SearchItem, SearchTarget, SessionContext,
    ViewRegistry,
};
use crate::screens::{
    ChatScreen, MessagesScreen, NotificationsScreen, OverviewScreen, RecordKind, RecordScreen, Screen, ScreenFactory,
    ScreenProps, SettingsScreen, StudentDetailScreen, StudentListScreen,
};
use crate::store::Stores;

#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    /// Artificial delay before a deferred screen finishes loading
    pub load_delay: Duration,
}

impl DashboardOptions {
    pub fn with_load_delay(load_delay: Duration) -> Self {
        Self { load_delay }
    }
}

/// Wrap a screen constructor as a factory holding its own handle on the stores
fn factory<S, F>(stores: &Stores, build: F) -> Arc<dyn ScreenFactory>
where
    S: Screen + 'static,
    F: Fn(ScreenProps, &Stores) -> Result<S> + Send + Sync + 'static,
{
    let stores = stores.clone();
    Arc::new(move |props: ScreenProps| -> Result<Box<dyn Screen>> {
        let screen = build(props, &stores)?;
        Ok(Box::new(screen) as Box<dyn Screen>)
    })
}

fn ready<S, F>(stores: &Stores, build: F) -> Loader
where
    S: Screen + 'static,
    F: Fn(ScreenProps, &Stores) -> Result<S> + Send + Sync + 'static,
{
    Loader::Ready(factory(stores, build))
}

/// Record screens are the heavy ones and load on first use
fn deferred_record(kind: RecordKind, stores: &Stores, delay: Duration) -> Loader {
    let stores = stores.clone();
    Loader::deferred(move || {
        let stores = stores.clone();
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok::<_, anyhow::Error>(factory(&stores, move |props, stores| RecordScreen::new(kind, props, stores)))
        }
    })
}

fn link(label: &str, screen: ScreenId, params: serde_json::Value) -> serde_json::Value {
    json!({ "label": label, "screen": screen.as_str(), "params": params })
}

fn overview_links(role: Role) -> serde_json::Value {
    let links = match role {
        Role::Admin => vec![
            link("Grade 10 students", ScreenId::StudentList, json!({ "filter": { "grade": 10 } })),
            link("School attendance", ScreenId::Attendance, json!({})),
            link("Fee balances", ScreenId::Fees, json!({})),
        ],
        Role::Parent => vec![
            link("My children", ScreenId::Children, json!({})),
            link("Fees", ScreenId::Fees, json!({})),
            link("Report cards", ScreenId::ReportCard, json!({})),
        ],
        Role::Student => vec![
            link("My profile", ScreenId::StudentDetail, json!({})),
            link("Report card", ScreenId::ReportCard, json!({})),
            link("Fees", ScreenId::Fees, json!({})),
        ],
    };
    serde_json::Value::Array(links)
}

/// Static description of one user's dashboard
#[derive(Debug, Clone)]
pub struct Dashboard {
    context: SessionContext,
    registry: ViewRegistry,
    bottom_nav: BottomNav,
    catalog: Vec<SearchItem>,
    stores: Stores,
}

impl Dashboard {
    /// Build and validate the dashboard for `context.role`.
    ///
    /// Fails if a screen reachable from the bottom nav, the header, or the
    /// search catalogue has no registry entry.
    pub fn build(context: SessionContext, stores: Stores, options: &DashboardOptions) -> Result<Self, RegistryError> {
        let role = context.role;
        let registry = Self::registry_for(&context, &stores, options)?;
        let bottom_nav = BottomNav::new(Self::destinations_for(role)).ok_or(RegistryError::NoDestinations)?;
        let catalog = Self::catalog_for(&context, &stores, &registry);

        let reachable: BTreeSet<ScreenId> = bottom_nav
            .destinations()
            .iter()
            .map(|d| d.screen)
            .chain(std::iter::once(ScreenId::Notifications))
            .chain(catalog.iter().map(|item| item.target.screen))
            .collect();
        registry.validate(reachable)?;

        log::info!(
            "Built {} dashboard for {} with {} screens",
            role.label(),
            context.user_id,
            registry.len()
        );
        Ok(Self {
            context,
            registry,
            bottom_nav,
            catalog,
            stores,
        })
    }

    fn registry_for(context: &SessionContext, stores: &Stores, options: &DashboardOptions) -> Result<ViewRegistry, RegistryError> {
        let role = context.role;
        let delay = options.load_delay;
        let chat = role.chat_screen();

        let builder: RegistryBuilder = ViewRegistry::builder()
            .register_with(
                ScreenId::Overview,
                ready(stores, OverviewScreen::new),
                json!({ "links": overview_links(role) }),
            )
            .register(ScreenId::StudentDetail, ready(stores, StudentDetailScreen::new))
            .register(ScreenId::Attendance, deferred_record(RecordKind::Attendance, stores, delay))
            .register(ScreenId::ReportCard, deferred_record(RecordKind::ReportCard, stores, delay))
            .register_with(
                ScreenId::Messages,
                ready(stores, MessagesScreen::new),
                json!({ "chat_screen": chat.as_str() }),
            )
            .register_with(
                chat,
                ready(stores, ChatScreen::new),
                json!({ "sender_id": context.user_id }),
            )
            .register(ScreenId::Notifications, ready(stores, NotificationsScreen::new))
            .register(ScreenId::Settings, ready(stores, |props, _| SettingsScreen::new(props)));

        let builder = match role {
            Role::Admin => builder
                .register(ScreenId::StudentList, ready(stores, StudentListScreen::new))
                .register(ScreenId::Fees, deferred_record(RecordKind::Fees, stores, delay)),
            Role::Parent => builder
                .register_with(
                    ScreenId::Children,
                    ready(stores, StudentListScreen::new),
                    json!({ "scope": "children" }),
                )
                .register(ScreenId::Fees, deferred_record(RecordKind::Fees, stores, delay)),
            // students have no fee screen of their own
            Role::Student => builder.register(
                ScreenId::Timetable,
                ready(stores, |props, stores| RecordScreen::new(RecordKind::Timetable, props, stores)),
            ),
        };
        builder.build()
    }

    fn destinations_for(role: Role) -> Vec<Destination> {
        let second = match role {
            Role::Admin => Destination::new("Students", ScreenId::StudentList),
            Role::Parent => Destination::new("Children", ScreenId::Children),
            Role::Student => Destination::new("Timetable", ScreenId::Timetable),
        };
        vec![
            Destination::new("Home", ScreenId::Overview),
            second,
            Destination::new("Messages", ScreenId::Messages),
            Destination::new("Settings", ScreenId::Settings),
        ]
    }

    fn catalog_for(context: &SessionContext, stores: &Stores, registry: &ViewRegistry) -> Vec<SearchItem> {
        let standalone = [
            ScreenId::Overview,
            ScreenId::StudentList,
            ScreenId::Children,
            ScreenId::Attendance,
            ScreenId::Fees,
            ScreenId::ReportCard,
            ScreenId::Timetable,
            ScreenId::Messages,
            ScreenId::Notifications,
            ScreenId::Settings,
        ];
        let mut catalog: Vec<SearchItem> = standalone
            .into_iter()
            .filter(|screen| registry.contains(*screen))
            .map(SearchItem::screen)
            .collect();

        let students = match context.role {
            Role::Admin => stores.students.list(),
            Role::Parent => stores.children_of(&context.user_id),
            Role::Student => Vec::new(),
        };
        catalog.extend(students.into_iter().map(|s| {
            SearchItem::new(
                s.name.clone(),
                "student",
                SearchTarget {
                    screen: ScreenId::StudentDetail,
                    title: s.name,
                    params: Params::from(json!({ "student_id": s.id })),
                },
            )
        }));
        catalog
    }

    pub fn role(&self) -> Role {
        self.context.role
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn bottom_nav(&self) -> &BottomNav {
        &self.bottom_nav
    }

    pub fn destinations(&self) -> &[Destination] {
        self.bottom_nav.destinations()
    }

    pub fn catalog(&self) -> &[SearchItem] {
        &self.catalog
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(role: Role) -> Dashboard {
        Dashboard::build(role.default_context(), Stores::seeded(), &DashboardOptions::default()).unwrap()
    }

    #[test]
    fn test_every_role_builds() {
        for role in Role::ALL {
            let dashboard = build(role);
            assert_eq!(dashboard.destinations().len(), 4);
            assert_eq!(dashboard.destinations()[0].screen, ScreenId::Overview);
            for destination in dashboard.destinations() {
                assert!(dashboard.registry().contains(destination.screen));
            }
        }
    }

    #[test]
    fn test_chat_is_registered_per_role_with_sender() {
        let dashboard = build(Role::Parent);
        let chat = dashboard.registry().get(ScreenId::ParentChat).unwrap();
        assert_eq!(chat.fixed_params.get_str("sender_id"), Some("parent-1"));
        assert!(!dashboard.registry().contains(ScreenId::AdminChat));

        let messages = dashboard.registry().get(ScreenId::Messages).unwrap();
        assert_eq!(messages.fixed_params.get_str("chat_screen"), Some("parent_chat"));
    }

    #[test]
    fn test_children_reuses_student_list_with_scope() {
        let dashboard = build(Role::Parent);
        let children = dashboard.registry().get(ScreenId::Children).unwrap();
        assert_eq!(children.fixed_params.get_str("scope"), Some("children"));
        assert!(!dashboard.registry().contains(ScreenId::StudentList));
    }

    #[test]
    fn test_student_dashboard_has_no_fees() {
        let dashboard = build(Role::Student);
        assert!(!dashboard.registry().contains(ScreenId::Fees));
        assert!(dashboard.catalog().iter().all(|item| item.target.screen != ScreenId::Fees));
    }

    #[test]
    fn test_record_screens_are_deferred() {
        let dashboard = build(Role::Admin);
        for screen in [ScreenId::Attendance, ScreenId::Fees, ScreenId::ReportCard] {
            assert!(dashboard.registry().get(screen).unwrap().loader.is_deferred());
        }
        assert!(!dashboard.registry().get(ScreenId::Overview).unwrap().loader.is_deferred());
    }

    #[test]
    fn test_catalog_includes_students_in_scope() {
        let admin = build(Role::Admin);
        assert!(admin.catalog().iter().any(|item| item.label == "Ben Okafor"));

        let parent = build(Role::Parent);
        let names: Vec<&str> = parent
            .catalog()
            .iter()
            .filter(|item| item.hint == "student")
            .map(|item| item.label.as_str())
            .collect();
        assert_eq!(names, vec!["Ada Lovelace", "Dev Lovelace"]);
    }
}
