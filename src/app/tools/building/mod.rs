//! Grundriss-Werkzeug: sammelt Eckpunkte, bis der Zug geschlossen wird.

use utility_route_kernel::{distance_meters, GeoPoint, RoutePlanner};

use super::{PlanningTool, ToolAction, ToolPreview};
use crate::shared::BUILDING_CLOSE_RADIUS_M;


/// Mindestanzahl an Eckpunkten eines Grundrisses.
pub const MIN_CORNERS: usize = 3;

/// Klick-Phasen des Grundriss-Werkzeugs.
#[derive(Debug, Clone, PartialEq)]
enum BuildingPhase {
    /// Sammelt Eckpunkte; `n` bereits gesetzt
    AwaitingCorner(usize),
    /// Grundriss geschlossen
    Closed,
}

/// Grundriss-Werkzeug
#[derive(Debug, Clone)]
pub struct BuildingTool {
    phase: BuildingPhase,
    corners: Vec<GeoPoint>,
    /// Klick in diesem Abstand zum ersten Eckpunkt schließt den Zug (Meter)
    pub close_radius_m: f64,
}

impl Default for BuildingTool {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildingTool {
    /// Erstellt ein neues Grundriss-Werkzeug mit Standardwerten.
    pub fn new() -> Self {
        Self {
            phase: BuildingPhase::AwaitingCorner(0),
            corners: Vec::new(),
            close_radius_m: BUILDING_CLOSE_RADIUS_M,
        }
    }

    /// Bisher gesetzte Eckpunkte.
    pub fn corners(&self) -> &[GeoPoint] {
        &self.corners
    }

    /// Fügt einen Eckpunkt hinzu oder schließt den Zug.
    ///
    /// Braucht keinen Projekt-Kontext und wird auch von der CLI genutzt.
    pub fn add_corner(&mut self, pos: GeoPoint) -> ToolAction {
        let n = match self.phase {
            BuildingPhase::AwaitingCorner(n) => n,
            BuildingPhase::Closed => {
                self.corners.clear();
                0
            }
        };

        if !pos.is_finite() {
            log::warn!("Eckpunkt {pos} ignoriert: ungültige Koordinaten");
            self.phase = BuildingPhase::AwaitingCorner(n);
            return ToolAction::Continue;
        }

        if n >= MIN_CORNERS && distance_meters(self.corners[0], pos) <= self.close_radius_m {
            self.phase = BuildingPhase::Closed;
            return ToolAction::ReadyToExecute;
        }

        self.corners.push(pos);
        self.phase = BuildingPhase::AwaitingCorner(n + 1);
        ToolAction::Continue
    }

    /// Schließt den Zug ohne Klick auf den ersten Eckpunkt.
    ///
    /// Gibt `false` zurück, solange weniger als drei Eckpunkte gesetzt sind.
    pub fn finish(&mut self) -> bool {
        match self.phase {
            BuildingPhase::AwaitingCorner(n) if n >= MIN_CORNERS => {
                self.phase = BuildingPhase::Closed;
                true
            }
            BuildingPhase::Closed => true,
            BuildingPhase::AwaitingCorner(_) => false,
        }
    }

    /// Fertiger Grundriss (implizit geschlossen).
    pub fn execute(&self) -> Option<Vec<GeoPoint>> {
        match self.phase {
            BuildingPhase::Closed => Some(self.corners.clone()),
            BuildingPhase::AwaitingCorner(_) => None,
        }
    }
}

impl PlanningTool for BuildingTool {
    fn name(&self) -> &str {
        "Gebäude"
    }

    fn status_text(&self) -> &str {
        match self.phase {
            BuildingPhase::AwaitingCorner(0) => "Ersten Eckpunkt klicken",
            BuildingPhase::AwaitingCorner(n) if n < MIN_CORNERS => "Nächsten Eckpunkt klicken",
            BuildingPhase::AwaitingCorner(_) => {
                "Nächsten Eckpunkt klicken oder ersten Eckpunkt zum Schließen"
            }
            BuildingPhase::Closed => "Bereit: Enter zum Speichern, Escape zum Abbrechen",
        }
    }

    fn on_click(&mut self, pos: GeoPoint, _planner: &RoutePlanner<'_>) -> ToolAction {
        self.add_corner(pos)
    }

    fn preview(&self, cursor: GeoPoint, _planner: &RoutePlanner<'_>) -> ToolPreview {
        let mut path = self.corners.clone();
        let closed = matches!(self.phase, BuildingPhase::Closed);
        if !closed && !path.is_empty() {
            path.push(cursor);
        }
        ToolPreview {
            path,
            conductors: None,
            closed,
        }
    }

    fn reset(&mut self) {
        self.phase = BuildingPhase::AwaitingCorner(0);
        self.corners.clear();
    }

    fn is_ready(&self) -> bool {
        matches!(self.phase, BuildingPhase::Closed)
    }

    fn has_pending_input(&self) -> bool {
        !self.corners.is_empty()
    }
}
