//! Use-Case: Trassen speichern, ändern und löschen.
//!
//! Prüfung und Einfügen laufen unter einer einzigen `&mut Project`-Ausleihe,
//! zwischen Prüfung und Einfügen kann also keine andere Trasse dazukommen.
//! Mehrere Prozesse auf derselben Projekt-Datei sind damit nicht abgesichert;
//! das bleibt Sache des Aufrufers.

use anyhow::bail;
use utility_route_kernel::{validate, GeoPoint, KernelConfig, Route, RoutePlanner, Violation};

use crate::app::tools::RouteDraft;
use crate::app::Project;
use crate::shared::CommitPolicy;

/// Ergebnis eines Speicherversuchs.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Gespeichert; `violations` ist bei `CommitPolicy::Warn` ggf. nicht leer
    Committed {
        /// ID der gespeicherten Trasse
        route_id: u64,
        /// Gemeldete Abstandsverletzungen
        violations: Vec<Violation>,
    },
    /// Wegen Abstandsverletzungen nicht gespeichert (`CommitPolicy::Block`)
    Rejected {
        /// Gemeldete Abstandsverletzungen
        violations: Vec<Violation>,
    },
}

impl CommitOutcome {
    /// Wurde gespeichert?
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }

    /// Gemeldete Abstandsverletzungen.
    pub fn violations(&self) -> &[Violation] {
        match self {
            CommitOutcome::Committed { violations, .. } | CommitOutcome::Rejected { violations } => {
                violations
            }
        }
    }
}

/// Prüft einen Entwurf gegen alle gespeicherten Trassen und fügt ihn ein.
pub fn commit_route(
    project: &mut Project,
    draft: &RouteDraft,
    config: &KernelConfig,
    policy: CommitPolicy,
) -> anyhow::Result<CommitOutcome> {
    if draft.path.len() < 2 {
        bail!("Trasse braucht mindestens zwei Punkte, hat {}", draft.path.len());
    }

    let violations = RoutePlanner::new(config, &project.snapshot).check_clearance(
        &draft.path,
        draft.system,
        &project.snapshot.routes,
    );
    if !violations.is_empty() && policy == CommitPolicy::Block {
        log::warn!(
            "{}-Trasse nicht gespeichert: {} Abstandsverletzung(en)",
            draft.system,
            violations.len()
        );
        return Ok(CommitOutcome::Rejected { violations });
    }

    let route_id = project.next_route_id();
    let mut route = Route::new(
        route_id,
        draft.system,
        draft.path.clone(),
        &config.profiles.get(draft.system),
    );
    route.building_id = draft.building_id();
    route.mainline_id = draft.mainline_id();
    route.pad_id = draft.pad_id();
    project.snapshot.routes.push(route);

    if violations.is_empty() {
        log::info!("{}-Trasse {route_id} gespeichert", draft.system);
    } else {
        log::warn!(
            "{}-Trasse {route_id} trotz {} Abstandsverletzung(en) gespeichert",
            draft.system,
            violations.len()
        );
    }
    Ok(CommitOutcome::Committed {
        route_id,
        violations,
    })
}

/// Ersetzt den Pfad einer gespeicherten Trasse nach erneuter Prüfung.
///
/// Geprüft wird gegen alle anderen Trassen des Projekts.
pub fn replace_route_path(
    project: &mut Project,
    route_id: u64,
    path: Vec<GeoPoint>,
    config: &KernelConfig,
    policy: CommitPolicy,
) -> anyhow::Result<CommitOutcome> {
    if path.len() < 2 {
        bail!("Trasse braucht mindestens zwei Punkte, hat {}", path.len());
    }
    let Some(system) = project.snapshot.route(route_id).map(|r| r.system) else {
        bail!("Trasse {route_id} nicht gefunden");
    };

    let others = project.routes_except(route_id);
    let violations = validate(system, &path, &others, &config.clearance);
    if !violations.is_empty() && policy == CommitPolicy::Block {
        log::warn!(
            "Pfad von Trasse {route_id} nicht geändert: {} Abstandsverletzung(en)",
            violations.len()
        );
        return Ok(CommitOutcome::Rejected { violations });
    }

    if let Some(route) = project.snapshot.routes.iter_mut().find(|r| r.id == route_id) {
        route.replace_path(path);
    }
    log::info!("Pfad von Trasse {route_id} ersetzt");
    Ok(CommitOutcome::Committed {
        route_id,
        violations,
    })
}

/// Löscht eine Trasse und gibt sie zurück.
pub fn remove_route(project: &mut Project, route_id: u64) -> Option<Route> {
    let index = project.snapshot.routes.iter().position(|r| r.id == route_id)?;
    let route = project.snapshot.routes.remove(index);
    log::info!("Trasse {route_id} gelöscht");
    Some(route)
}
