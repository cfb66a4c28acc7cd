//! Hauptleitung: gerades Segment, an das Hausanschlüsse andocken.

use serde::{Deserialize, Serialize};

use super::SystemType;
use crate::geo::GeoPoint;

/// Eine Hauptleitung (Trunk) eines Systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mainline {
    /// Eindeutige ID
    pub id: u64,
    /// Versorgungssystem
    pub system: SystemType,
    /// Anfangspunkt
    pub start: GeoPoint,
    /// Endpunkt
    pub end: GeoPoint,
}

impl Mainline {
    /// Erstellt eine neue Hauptleitung.
    pub fn new(id: u64, system: SystemType, start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            id,
            system,
            start,
            end,
        }
    }
}
