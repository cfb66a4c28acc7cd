use super::super::{PlanningTool, ToolAction};
use super::TraceTool;
use glam::DVec2;
use utility_route_kernel::{
    AttachmentTarget, Building, GeoPoint, KernelConfig, LocalFrame, Mainline, ProjectSnapshot,
    RoutePlanner, SystemType, TargetKind,
};

const ORIGIN: GeoPoint = GeoPoint::new(52.52, 13.405);

fn at(east: f64, north: f64) -> GeoPoint {
    LocalFrame::new(ORIGIN).unproject(DVec2::new(east, north))
}

fn project() -> ProjectSnapshot {
    ProjectSnapshot {
        buildings: vec![Building::rectangle(1, ORIGIN, 20.0, 10.0)],
        mainlines: vec![Mainline::new(
            7,
            SystemType::Water,
            at(-100.0, -60.0),
            at(100.0, -60.0),
        )],
        ..ProjectSnapshot::default()
    }
}

#[test]
fn test_click_flow() {
    let config = KernelConfig::default();
    let snapshot = project();
    let planner = RoutePlanner::new(&config, &snapshot);
    let mut tool = TraceTool::new(SystemType::Water);

    assert!(!tool.is_ready());
    assert!(!tool.has_pending_input());

    let action = tool.on_click(at(2.0, -8.0), &planner);
    assert_eq!(action, ToolAction::Continue);
    assert!(tool.has_pending_input());
    assert!(!tool.is_ready());

    let action = tool.on_click(at(12.0, -50.0), &planner);
    assert_eq!(action, ToolAction::ReadyToExecute);
    assert!(tool.is_ready());

    let draft = tool.execute().expect("Entwurf erwartet");
    assert_eq!(draft.path.len(), 4);
    assert_eq!(draft.building_id(), Some(1));
    assert_eq!(draft.mainline_id(), None);
}

#[test]
fn test_start_snaps_to_wall() {
    let config = KernelConfig::default();
    let snapshot = project();
    let planner = RoutePlanner::new(&config, &snapshot);
    let mut tool = TraceTool::new(SystemType::Water);

    tool.on_click(at(2.0, -8.0), &planner);
    tool.on_click(at(12.0, -50.0), &planner);
    let draft = tool.execute().expect("Entwurf erwartet");

    let start = LocalFrame::new(ORIGIN).project(draft.path[0]);
    assert!((start - DVec2::new(2.0, -5.0)).length() < 1e-6);
}

#[test]
fn test_destination_snaps_to_mainline() {
    let config = KernelConfig::default();
    let snapshot = project();
    let planner = RoutePlanner::new(&config, &snapshot);
    let mut tool = TraceTool::new(SystemType::Water)
        .with_targets(TargetKind::Building, Some(TargetKind::Mainline));

    tool.on_click(at(2.0, -8.0), &planner);
    tool.on_click(at(30.0, -52.0), &planner);

    let draft = tool.execute().expect("Entwurf erwartet");
    let destination = draft.destination.expect("Hauptleitung erwartet");
    assert_eq!(destination.target, AttachmentTarget::Mainline(7));
    assert_eq!(draft.mainline_id(), Some(7));

    let end = LocalFrame::new(ORIGIN).project(*draft.path.last().expect("Endpunkt"));
    assert!((end.y + 60.0).abs() < 1e-6);
}

#[test]
fn test_preview_follows_cursor_and_shows_conductors() {
    let config = KernelConfig::default();
    let snapshot = project();
    let planner = RoutePlanner::new(&config, &snapshot);
    let mut tool = TraceTool::new(SystemType::Water);

    let idle = tool.preview(at(2.0, -8.0), &planner);
    assert_eq!(idle.path.len(), 1);
    assert!(idle.conductors.is_none());

    tool.on_click(at(2.0, -8.0), &planner);
    let preview = tool.preview(at(-20.0, -40.0), &planner);
    assert_eq!(preview.path.len(), 4);
    let (left, right) = preview.conductors.expect("Doppelleitung erwartet");
    assert_eq!(left.len(), 4);
    assert_eq!(right.len(), 4);
}

#[test]
fn test_single_line_system_has_no_conductors() {
    let config = KernelConfig::default();
    let snapshot = project();
    let planner = RoutePlanner::new(&config, &snapshot);
    let mut tool = TraceTool::new(SystemType::Telecom);

    tool.on_click(at(2.0, -8.0), &planner);
    let preview = tool.preview(at(-20.0, -40.0), &planner);
    assert!(preview.conductors.is_none());
}

#[test]
fn test_free_start_without_wall_in_range() {
    let config = KernelConfig::default();
    let snapshot = project();
    let planner = RoutePlanner::new(&config, &snapshot);
    let mut tool = TraceTool::new(SystemType::Power);

    tool.on_click(at(200.0, 200.0), &planner);
    tool.on_click(at(230.0, 180.0), &planner);

    let draft = tool.execute().expect("Entwurf erwartet");
    assert!(draft.attachment.is_none());
    assert_eq!(draft.path.len(), 3);
}

#[test]
fn test_reset() {
    let config = KernelConfig::default();
    let snapshot = project();
    let planner = RoutePlanner::new(&config, &snapshot);
    let mut tool = TraceTool::new(SystemType::Water);

    tool.on_click(at(2.0, -8.0), &planner);
    tool.on_click(at(12.0, -50.0), &planner);
    assert!(tool.is_ready());

    tool.reset();
    assert!(!tool.is_ready());
    assert!(tool.execute().is_none());
}

#[test]
fn test_click_after_ready_starts_new_trace() {
    let config = KernelConfig::default();
    let snapshot = project();
    let planner = RoutePlanner::new(&config, &snapshot);
    let mut tool = TraceTool::new(SystemType::Water);

    tool.on_click(at(2.0, -8.0), &planner);
    tool.on_click(at(12.0, -50.0), &planner);
    let action = tool.on_click(at(13.0, 2.0), &planner);

    assert_eq!(action, ToolAction::Continue);
    assert!(!tool.is_ready());
}
