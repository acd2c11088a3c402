use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use std::time::Duration;

use school_portal::dashboard::{ActiveDashboard, Dashboard, DashboardOptions, Role};
use school_portal::nav::{HostStatus, Params, ScreenId};
use school_portal::store::Stores;
use school_portal::tui::RuntimeConfig;

fn active(role: Role, options: DashboardOptions) -> ActiveDashboard {
    let dashboard = Dashboard::build(role.default_context(), Stores::seeded(), &options).unwrap();
    ActiveDashboard::new(dashboard)
}

fn navigate(dashboard: &mut ActiveDashboard, screen: ScreenId, params: serde_json::Value) {
    dashboard
        .session()
        .navigator()
        .navigate_to(screen, screen.label(), Params::from(params));
    dashboard.process();
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn test_drill_down_and_back_remounts_previous_screen() {
    let mut dashboard = active(Role::Admin, DashboardOptions::default());
    let first_mount = dashboard.host().mount_id();

    navigate(&mut dashboard, ScreenId::StudentList, json!({"filter": {"grade": 10}}));
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::StudentList));
    assert_eq!(dashboard.session().stack().len(), 2);
    assert!(dashboard.header_model().can_go_back);
    assert_eq!(
        dashboard.session().stack().top().params.pointer("filter/grade"),
        Some(&json!(10))
    );

    assert!(dashboard.back());
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Overview));
    assert_ne!(dashboard.host().mount_id(), first_mount);
    assert!(!dashboard.back());
}

#[test]
fn test_bottom_nav_resets_deep_stack() {
    let mut dashboard = active(Role::Admin, DashboardOptions::default());
    navigate(&mut dashboard, ScreenId::StudentList, json!({}));
    navigate(&mut dashboard, ScreenId::StudentDetail, json!({"student_id": "stu-1002"}));
    navigate(&mut dashboard, ScreenId::Attendance, json!({"student_id": "stu-1002"}));
    assert_eq!(dashboard.session().stack().len(), 4);
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Attendance));

    assert!(dashboard.select_destination(2));
    assert_eq!(dashboard.session().stack().screens(), vec![ScreenId::Messages]);
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Messages));
    assert!(!dashboard.header_model().can_go_back);
}

#[test]
fn test_unregistered_screen_shows_not_found_and_back_recovers() {
    let mut dashboard = active(Role::Student, DashboardOptions::default());
    navigate(&mut dashboard, ScreenId::Fees, json!({}));
    assert_eq!(dashboard.host().status(), HostStatus::NotFound(ScreenId::Fees));
    assert_eq!(dashboard.session().stack().len(), 2);

    let config = RuntimeConfig::default();
    dashboard.handle_key(key(KeyCode::Esc), &config);
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Overview));
}

#[test]
fn test_params_reach_the_stack_entry_unchanged() {
    let mut dashboard = active(Role::Parent, DashboardOptions::default());
    navigate(&mut dashboard, ScreenId::StudentDetail, json!({"student_id": "stu-1004", "a": 1}));
    let top = dashboard.session().stack().top();
    assert_eq!(top.params.get_i64("a"), Some(1));
    assert_eq!(top.params.get_str("student_id"), Some("stu-1004"));
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::StudentDetail));
}

#[test]
fn test_search_overlay_leaves_stack_alone_until_chosen() {
    let config = RuntimeConfig::default();
    let mut dashboard = active(Role::Admin, DashboardOptions::default());
    let before = dashboard.session().stack().render_key();

    dashboard.handle_key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL), &config);
    assert!(dashboard.search().is_open());
    dashboard.handle_key(key(KeyCode::Esc), &config);
    assert!(!dashboard.search().is_open());
    assert_eq!(dashboard.session().stack().render_key(), before);

    dashboard.open_search();
    for c in "farid".chars() {
        dashboard.handle_key(key(KeyCode::Char(c)), &config);
    }
    dashboard.handle_key(key(KeyCode::Enter), &config);
    assert!(!dashboard.search().is_open());
    let top = dashboard.session().stack().top();
    assert_eq!(top.screen, ScreenId::StudentDetail);
    assert_eq!(top.params.get_str("student_id"), Some("stu-1006"));
    assert_eq!(dashboard.session().stack().len(), 2);
}

#[tokio::test]
async fn test_deferred_screen_shows_loading_then_mounts() {
    let options = DashboardOptions::with_load_delay(Duration::from_millis(30));
    let mut dashboard = active(Role::Admin, options);
    navigate(&mut dashboard, ScreenId::Fees, json!({}));
    assert_eq!(dashboard.host().status(), HostStatus::Loading(ScreenId::Fees));
    assert!(dashboard.loader().is_pending(ScreenId::Fees));

    tokio::time::sleep(Duration::from_millis(80)).await;
    dashboard.process();
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Fees));
    assert!(dashboard.loader().is_cached(ScreenId::Fees));

    // Cached now; a second visit mounts straight away
    dashboard.back();
    navigate(&mut dashboard, ScreenId::Fees, json!({}));
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Fees));
}

#[tokio::test]
async fn test_back_during_load_discards_stale_result() {
    let options = DashboardOptions::with_load_delay(Duration::from_millis(30));
    let mut dashboard = active(Role::Admin, options);
    navigate(&mut dashboard, ScreenId::ReportCard, json!({}));
    assert_eq!(dashboard.host().status(), HostStatus::Loading(ScreenId::ReportCard));
    dashboard.back();
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Overview));

    tokio::time::sleep(Duration::from_millis(80)).await;
    dashboard.process();
    assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Overview));
    assert_eq!(dashboard.session().stack().len(), 1);
}
