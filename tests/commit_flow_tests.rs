//! Ablauf Werkzeug → Entwurf → Prüfung → Speichern über die Projekt-Datei.

use glam::DVec2;
use utility_route_planner::app::use_cases::{check_project, commit_route, remove_route};
use utility_route_planner::{
    Building, CommitOutcome, CommitPolicy, GeoPoint, LocalFrame, Mainline, PlannerOptions,
    PlanningTool, Project, RoutePlanner, SystemType, TargetKind, ToolAction, TraceTool,
};

const ORIGIN: GeoPoint = GeoPoint::new(50.9375, 6.9603);

fn at(east: f64, north: f64) -> GeoPoint {
    LocalFrame::new(ORIGIN).unproject(DVec2::new(east, north))
}

fn sample_project() -> Project {
    let mut project = Project::new("Siedlung Süd");
    project.snapshot.buildings = vec![
        Building::rectangle(1, ORIGIN, 20.0, 10.0),
        Building::rectangle(2, at(40.0, 0.0), 12.0, 12.0),
    ];
    project.snapshot.mainlines = vec![
        Mainline::new(1, SystemType::Water, at(-50.0, -40.0), at(100.0, -40.0)),
        Mainline::new(2, SystemType::Sewerage, at(-50.0, -43.0), at(100.0, -43.0)),
    ];
    project
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("{name}_{}.json", std::process::id()))
}

fn trace(
    project: &Project,
    options: &PlannerOptions,
    system: SystemType,
    from: GeoPoint,
    to: GeoPoint,
) -> utility_route_planner::RouteDraft {
    let config = options.to_kernel_config();
    let planner = RoutePlanner::new(&config, &project.snapshot);
    let mut tool =
        TraceTool::new(system).with_targets(TargetKind::Building, Some(TargetKind::Mainline));
    assert_eq!(tool.on_click(from, &planner), ToolAction::Continue);
    assert_eq!(tool.on_click(to, &planner), ToolAction::ReadyToExecute);
    tool.execute().expect("Entwurf erwartet")
}

#[test]
fn house_connections_roundtrip_through_project_file() {
    let options = PlannerOptions::default();
    let config = options.to_kernel_config();
    let mut project = sample_project();

    let water = trace(&project, &options, SystemType::Water, at(0.0, -7.0), at(0.0, -38.0));
    let outcome = commit_route(&mut project, &water, &config, CommitPolicy::Block)
        .expect("gültiger Entwurf");
    assert!(outcome.is_committed());

    let stored = project.snapshot.route(1).expect("Trasse erwartet");
    assert_eq!(stored.building_id, Some(1));
    assert_eq!(stored.mainline_id, Some(1));
    assert!(stored.dual_line);

    let path = temp_path("utility_route_planner_flow");
    project.save_to_file(&path).expect("speicherbar");
    let loaded = Project::load_from_file(&path).expect("lesbar");
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.snapshot.routes, project.snapshot.routes);
    assert!(check_project(&loaded, &config).is_empty());
}

#[test]
fn sewer_next_to_water_is_blocked_or_warned() {
    let options = PlannerOptions::default();
    let config = options.to_kernel_config();
    let mut project = sample_project();

    let water = trace(&project, &options, SystemType::Water, at(0.0, -7.0), at(0.0, -38.0));
    commit_route(&mut project, &water, &config, CommitPolicy::Block).expect("gültiger Entwurf");

    // Schmutzwasser 2 m neben dem Wasser-Hausanschluss
    let sewer = trace(&project, &options, SystemType::Sewerage, at(2.0, -7.0), at(2.0, -41.0));
    let blocked = commit_route(&mut project, &sewer, &config, CommitPolicy::Block)
        .expect("gültiger Entwurf");
    assert!(matches!(blocked, CommitOutcome::Rejected { .. }));
    assert!(!blocked.violations().is_empty());
    assert!(blocked
        .violations()
        .iter()
        .all(|v| v.required_m == 5.0 && v.distance_m < 5.0));
    assert_eq!(project.snapshot.routes.len(), 1);

    let warned = commit_route(&mut project, &sewer, &config, CommitPolicy::Warn)
        .expect("gültiger Entwurf");
    assert!(warned.is_committed());
    assert_eq!(project.snapshot.routes.len(), 2);
    assert!(!check_project(&project, &config).is_empty());

    remove_route(&mut project, 2).expect("Trasse erwartet");
    assert!(check_project(&project, &config).is_empty());
}

#[test]
fn building_tool_footprint_becomes_attachable() {
    let options = PlannerOptions::default();
    let config = options.to_kernel_config();
    let mut project = Project::new("Neubau");

    let mut tool = utility_route_planner::BuildingTool::new();
    for corner in [at(0.0, 0.0), at(15.0, 0.0), at(15.0, 10.0), at(0.0, 10.0)] {
        tool.add_corner(corner);
    }
    assert!(tool.finish());
    let id = project.add_building(tool.execute().expect("Grundriss erwartet"));

    let planner = RoutePlanner::new(&config, &project.snapshot);
    let attachment = planner
        .resolve_attachment(at(7.0, -4.0), TargetKind::Building, SystemType::Telecom)
        .expect("Anschluss erwartet");
    assert_eq!(
        attachment.target,
        utility_route_planner::AttachmentTarget::Building(id)
    );
}
