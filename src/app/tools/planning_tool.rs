//! PlanningTool-Trait: Schnittstelle für alle Werkzeuge.

use utility_route_kernel::{GeoPoint, RoutePlanner};

use super::{ToolAction, ToolPreview};

/// Schnittstelle für alle Planungs-Werkzeuge (Trasse, Grundriss, …).
///
/// Werkzeuge sind zustandsbehaftet (Klick-Phasen) und lesen das Projekt nur
/// über die [`RoutePlanner`]-Fassade.
pub trait PlanningTool {
    /// Anzeigename
    fn name(&self) -> &str;

    /// Statustext für die aktuelle Phase (z.B. "Startpunkt wählen")
    fn status_text(&self) -> &str;

    /// Klick verarbeiten. Gibt die nächste Aktion zurück.
    fn on_click(&mut self, pos: GeoPoint, planner: &RoutePlanner<'_>) -> ToolAction;

    /// Vorschau für die aktuelle Cursor-Position berechnen.
    fn preview(&self, cursor: GeoPoint, planner: &RoutePlanner<'_>) -> ToolPreview;

    /// Werkzeug-Zustand zurücksetzen (Escape / Werkzeug-Wechsel).
    fn reset(&mut self);

    /// Ist das Werkzeug bereit zur Ausführung?
    fn is_ready(&self) -> bool;

    /// Hat das Werkzeug angefangene Eingaben?
    fn has_pending_input(&self) -> bool {
        false
    }
}
