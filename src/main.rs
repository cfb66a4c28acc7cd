//! Utility Route Planner (CLI).
//!
//! Prüft Projekt-Dateien auf Mindestabstände und plant einzelne Trassen
//! rechtwinklig von Gebäudewänden, Hauptleitungen oder Trafo-Plätzen aus.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use utility_route_planner::app::tools::{BuildingTool, PlanningTool, ToolAction, TraceTool};
use utility_route_planner::app::use_cases::{check_project, commit_route, CommitOutcome};
use utility_route_planner::app::Project;
use utility_route_planner::shared::{CommitPolicy, PlannerOptions};
use utility_route_planner::{FootprintIndex, GeoPoint, RoutePlanner, SystemType, TargetKind};

/// Trassenplanung und Abstandsprüfung für Versorgungsnetze
#[derive(Parser, Debug)]
#[command(name = "utility-route-planner", version)]
#[command(about = "Rechtwinklige Trassen planen und Mindestabstände prüfen")]
struct Cli {
    /// Optionen-Datei (Standard: utility_route_planner.toml neben der Binary)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Alle gespeicherten Trassen paarweise prüfen
    Check {
        /// Projekt-Datei (JSON)
        project: PathBuf,
    },
    /// Eine Trasse planen, prüfen und optional speichern
    Route {
        /// Projekt-Datei (JSON)
        project: PathBuf,
        /// Versorgungssystem (water, sewerage, storm, heating, power, telecom)
        #[arg(long, value_parser = parse_system)]
        system: SystemType,
        /// Startpunkt als LAT,LNG
        #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
        from: GeoPoint,
        /// Zielpunkt als LAT,LNG
        #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
        to: GeoPoint,
        /// Anschluss am Start (building, mainline, pad)
        #[arg(long, value_parser = parse_target, default_value = "building")]
        target: TargetKind,
        /// Anschluss am Ziel (mainline, pad); ohne Angabe freier Punkt
        #[arg(long, value_parser = parse_target)]
        end_target: Option<TargetKind>,
        /// Trasse ins Projekt schreiben
        #[arg(long)]
        commit: bool,
        /// Trotz Abstandsverletzungen speichern
        #[arg(long, requires = "commit")]
        force: bool,
    },
    /// Ein Gebäude aus Eckpunkten anlegen
    AddBuilding {
        /// Projekt-Datei (JSON)
        project: PathBuf,
        /// Eckpunkte als LAT,LNG (mindestens drei)
        #[arg(long = "corner", value_parser = parse_geo_point, allow_hyphen_values = true, required = true)]
        corners: Vec<GeoPoint>,
    },
    /// Standard-Optionen als TOML schreiben
    InitConfig {
        /// Ziel-Datei (Standard: neben der Binary)
        path: Option<PathBuf>,
    },
}

fn parse_geo_point(value: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("'{value}' ist kein LAT,LNG-Paar"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("Breite '{lat}' ungültig: {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("Länge '{lng}' ungültig: {e}"))?;
    let point = GeoPoint::new(lat, lng);
    if !point.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0 {
        return Err(format!("'{value}' liegt außerhalb des gültigen Bereichs"));
    }
    Ok(point)
}

fn parse_system(value: &str) -> Result<SystemType, String> {
    SystemType::from_key(value).ok_or_else(|| format!("unbekanntes System '{value}'"))
}

fn parse_target(value: &str) -> Result<TargetKind, String> {
    TargetKind::from_key(value).ok_or_else(|| format!("unbekannte Anschlussart '{value}'"))
}

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    log::info!("Utility Route Planner v{} startet...", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.clone().unwrap_or_else(PlannerOptions::config_path);

    match cli.command {
        Command::Check { project } => run_check(&project, &config_path),
        Command::Route {
            project,
            system,
            from,
            to,
            target,
            end_target,
            commit,
            force,
        } => {
            let request = RouteRequest {
                system,
                from,
                to,
                target,
                end_target,
                commit,
                force,
            };
            run_route(&project, &config_path, &request)
        }
        Command::AddBuilding { project, corners } => run_add_building(&project, &corners),
        Command::InitConfig { path } => {
            let path = path.unwrap_or(config_path);
            PlannerOptions::default().save_to_file(&path)?;
            println!("Optionen geschrieben: {}", path.display());
            Ok(())
        }
    }
}

fn run_check(project_path: &std::path::Path, config_path: &std::path::Path) -> anyhow::Result<()> {
    let options = PlannerOptions::load_from_file(config_path);
    let project = Project::load_from_file(project_path)?;
    let violations = check_project(&project, &options.to_kernel_config());

    if violations.is_empty() {
        println!("Keine Abstandsverletzungen.");
    } else {
        for violation in &violations {
            println!("{violation}");
        }
        println!("{} Abstandsverletzung(en).", violations.len());
    }
    Ok(())
}

/// Parameter des `route`-Befehls.
struct RouteRequest {
    system: SystemType,
    from: GeoPoint,
    to: GeoPoint,
    target: TargetKind,
    end_target: Option<TargetKind>,
    commit: bool,
    force: bool,
}

fn run_route(
    project_path: &std::path::Path,
    config_path: &std::path::Path,
    request: &RouteRequest,
) -> anyhow::Result<()> {
    let options = PlannerOptions::load_from_file(config_path);
    let config = options.to_kernel_config();
    let mut project = Project::load_from_file(project_path)?;

    let draft = {
        let index = FootprintIndex::from_buildings(&project.snapshot.buildings);
        let planner = RoutePlanner::new(&config, &project.snapshot).with_footprint_index(&index);
        let mut tool = TraceTool::new(request.system)
            .with_targets(request.target, request.end_target);

        tool.on_click(request.from, &planner);
        if tool.on_click(request.to, &planner) != ToolAction::ReadyToExecute {
            anyhow::bail!("Trasse konnte nicht erzeugt werden");
        }
        let draft = tool.execute().context("Kein Trassen-Entwurf vorhanden")?;

        println!("Trasse ({}, {} Punkte):", draft.system, draft.path.len());
        for point in &draft.path {
            println!("  {point}");
        }
        if let Some((left, right)) = planner.offset_for_dual_line(&draft.path, draft.system) {
            println!("Leiter links:");
            left.iter().for_each(|p| println!("  {p}"));
            println!("Leiter rechts:");
            right.iter().for_each(|p| println!("  {p}"));
        }
        draft
    };

    if !request.commit {
        let planner = RoutePlanner::new(&config, &project.snapshot);
        let violations =
            planner.check_clearance(&draft.path, draft.system, &project.snapshot.routes);
        print_violations(&violations);
        return Ok(());
    }

    let policy = if request.force {
        CommitPolicy::Warn
    } else {
        options.commit_policy
    };
    match commit_route(&mut project, &draft, &config, policy)? {
        CommitOutcome::Committed {
            route_id,
            violations,
        } => {
            print_violations(&violations);
            project.save_to_file(project_path)?;
            println!("Trasse {route_id} gespeichert.");
        }
        CommitOutcome::Rejected { violations } => {
            print_violations(&violations);
            println!("Nicht gespeichert (--force zum Überschreiben).");
        }
    }
    Ok(())
}

fn print_violations(violations: &[utility_route_planner::Violation]) {
    for violation in violations {
        println!("{violation}");
    }
    if violations.is_empty() {
        println!("Keine Abstandsverletzungen.");
    }
}

fn run_add_building(project_path: &std::path::Path, corners: &[GeoPoint]) -> anyhow::Result<()> {
    let mut project = Project::load_from_file(project_path)?;
    let mut tool = BuildingTool::new();
    for corner in corners {
        tool.add_corner(*corner);
    }
    if !tool.finish() {
        anyhow::bail!(
            "Grundriss braucht mindestens drei gültige Eckpunkte ({} angegeben)",
            tool.corners().len()
        );
    }
    let polygon = tool.execute().context("Kein Grundriss vorhanden")?;
    let id = project.add_building(polygon);
    project.save_to_file(project_path)?;
    println!("Gebäude {id} angelegt.");
    Ok(())
}
