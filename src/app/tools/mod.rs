//! Zustandsbehaftete Planungs-Werkzeuge über der Kernel-Fassade.
//!
//! Jedes Werkzeug implementiert den `PlanningTool`-Trait. Werkzeuge erzeugen
//! reine Daten (Vorschau, Entwürfe); gespeichert wird zentral in den Use-Cases.

/// Grundriss-Werkzeug: sammelt Eckpunkte bis zum Schließen.
pub mod building;
/// PlanningTool-Trait: Schnittstelle für alle Werkzeuge.
mod planning_tool;
/// Trassen-Werkzeug: Anschluss, Ziel, Vorschau, Entwurf.
pub mod trace;

pub use building::BuildingTool;
pub use planning_tool::PlanningTool;
pub use trace::{RouteDraft, TraceTool};

use utility_route_kernel::GeoPoint;

/// Rückgabe von `on_click`, steuert den Werkzeug-Ablauf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAction {
    /// Punkt registriert, weitere Eingabe nötig
    Continue,
    /// Alle nötigen Punkte gesetzt, bereit zur Ausführung
    ReadyToExecute,
}

/// Vorschau-Geometrie für die Darstellung beim Aufrufer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolPreview {
    /// Mittellinie bzw. offener Grundriss-Zug
    pub path: Vec<GeoPoint>,
    /// Die beiden Leiter einer Doppelleitung
    pub conductors: Option<(Vec<GeoPoint>, Vec<GeoPoint>)>,
    /// Zug ist geschlossen (Grundriss)
    pub closed: bool,
}
