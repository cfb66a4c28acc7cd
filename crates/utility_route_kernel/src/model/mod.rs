//! Domänentypen: Gebäude, Hauptleitungen, Trafo-Plätze, Trassen, Systemtypen.

mod building;
mod mainline;
mod pad;
mod route;
mod system;

pub use building::{Building, DEFAULT_BUILDING_HEIGHT, DEFAULT_BUILDING_WIDTH};
pub use mainline::Mainline;
pub use pad::{TransformerPad, DEFAULT_PAD_SIDE};
pub use route::{Route, MIN_TURN_ANGLE_DEG};
pub use system::{SystemProfile, SystemProfiles, SystemType};

use serde::{Deserialize, Serialize};

/// Read-only Momentaufnahme aller Objekte eines Projekts.
///
/// Der Kernel hält keinen eigenen Zustand; der Aufrufer reicht pro Operation
/// die aktuelle Aufnahme herein.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Gebäude mit Grundriss
    #[serde(default)]
    pub buildings: Vec<Building>,
    /// Hauptleitungen (Anschluss-Ziele für Hausanschlüsse)
    #[serde(default)]
    pub mainlines: Vec<Mainline>,
    /// Trafo-Plätze
    #[serde(default)]
    pub pads: Vec<TransformerPad>,
    /// Gespeicherte Trassen
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl ProjectSnapshot {
    /// Findet ein Gebäude per ID.
    pub fn building(&self, id: u64) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    /// Findet eine Hauptleitung per ID.
    pub fn mainline(&self, id: u64) -> Option<&Mainline> {
        self.mainlines.iter().find(|m| m.id == id)
    }

    /// Findet einen Trafo-Platz per ID.
    pub fn pad(&self, id: u64) -> Option<&TransformerPad> {
        self.pads.iter().find(|p| p.id == id)
    }

    /// Findet eine Trasse per ID.
    pub fn route(&self, id: u64) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }
}
