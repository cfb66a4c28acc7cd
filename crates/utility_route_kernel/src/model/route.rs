//! Gespeicherte Trasse eines Versorgungssystems.

use serde::{Deserialize, Serialize};

use super::{SystemProfile, SystemType};
use crate::geo::GeoPoint;

/// Minimaler Knickwinkel einer Trasse (nur rechte Winkel).
pub const MIN_TURN_ANGLE_DEG: f64 = 90.0;

fn default_min_turn_angle() -> f64 {
    MIN_TURN_ANGLE_DEG
}

/// Eine Trasse (Trace) mit Pfad und Herkunfts-Referenzen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Eindeutige ID
    pub id: u64,
    /// Versorgungssystem
    pub system: SystemType,
    /// Pfad mit mindestens zwei Punkten
    pub path: Vec<GeoPoint>,
    /// Gebäude, an dem die Trasse beginnt
    #[serde(default)]
    pub building_id: Option<u64>,
    /// Hauptleitung, an die die Trasse andockt
    #[serde(default)]
    pub mainline_id: Option<u64>,
    /// Trafo-Platz, an den die Trasse andockt
    #[serde(default)]
    pub pad_id: Option<u64>,
    /// Als Doppelleitung verlegt
    #[serde(default)]
    pub dual_line: bool,
    /// Achsabstand der Doppelleitung in Metern
    #[serde(default)]
    pub spacing_m: f64,
    /// Minimaler Knickwinkel in Grad
    #[serde(default = "default_min_turn_angle")]
    pub min_turn_angle_deg: f64,
}

impl Route {
    /// Erstellt eine Trasse mit den Doppelleitungs-Werten des Profils.
    pub fn new(id: u64, system: SystemType, path: Vec<GeoPoint>, profile: &SystemProfile) -> Self {
        Self {
            id,
            system,
            path,
            building_id: None,
            mainline_id: None,
            pad_id: None,
            dual_line: profile.dual_line,
            spacing_m: if profile.dual_line {
                profile.spacing_m
            } else {
                0.0
            },
            min_turn_angle_deg: MIN_TURN_ANGLE_DEG,
        }
    }

    /// Hat der Pfad mindestens ein Segment?
    pub fn is_valid(&self) -> bool {
        self.path.len() >= 2
    }

    /// Anzahl der Segmente.
    pub fn segment_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Ersetzt den Pfad; einzige erlaubte Änderung nach dem Speichern.
    pub fn replace_path(&mut self, path: Vec<GeoPoint>) {
        self.path = path;
    }
}
