//! Use-Case: alle gespeicherten Trassen paarweise auf Mindestabstände prüfen.

use utility_route_kernel::{validate, KernelConfig, Violation};

use crate::app::Project;

/// Verletzung zwischen zwei gespeicherten Trassen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectViolation {
    /// Trasse, von der aus geprüft wurde
    pub route_id: u64,
    /// Details; `existing_route_id` ist die zweite Trasse
    pub violation: Violation,
}

impl std::fmt::Display for ProjectViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Trasse #{}: {}", self.route_id, self.violation)
    }
}

/// Prüft jedes Trassen-Paar genau einmal.
pub fn check_project(project: &Project, config: &KernelConfig) -> Vec<ProjectViolation> {
    let routes = &project.snapshot.routes;
    let found: Vec<ProjectViolation> = routes
        .iter()
        .enumerate()
        .flat_map(|(i, route)| {
            validate(route.system, &route.path, &routes[i + 1..], &config.clearance)
                .into_iter()
                .map(move |violation| ProjectViolation {
                    route_id: route.id,
                    violation,
                })
        })
        .collect();

    log::info!(
        "{} Trassen geprüft, {} Abstandsverletzung(en)",
        routes.len(),
        found.len()
    );
    found
}
