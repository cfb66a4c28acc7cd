//! Umrechnung zwischen geographischen Grad und lokalen Metern.
//!
//! Flache Näherung für Baublock-Maßstab: ein Grad Breite ist konstant
//! [`METERS_PER_DEGREE_LAT`], ein Grad Länge skaliert mit `cos(Referenzbreite)`.
//! Jede Operation verwendet genau eine Referenzbreite, sonst verzerren sich
//! Normalen an konvergierenden Meridianen.
//!
//! Lokaler Meter-Frame: `x` = Ost, `y` = Nord.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Meter pro Grad geographischer Breite.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Untergrenze für `cos(Breite)`, verhindert Division durch Null an den Polen.
const MIN_LNG_SCALE: f64 = 1e-9;

/// Geographischer Punkt in Grad.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Breite (Grad)
    pub lat: f64,
    /// Länge (Grad)
    pub lng: f64,
}

impl GeoPoint {
    /// Erstellt einen neuen Punkt.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Beide Koordinaten endlich (kein NaN/Inf)?
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Verschiebt den Punkt um einen Meter-Vektor (Referenzbreite = eigene Breite).
    pub fn offset_by(&self, meters: DVec2) -> GeoPoint {
        let delta = to_degrees(meters, self.lat);
        GeoPoint::new(self.lat + delta.lat, self.lng + delta.lng)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.7},{:.7}", self.lat, self.lng)
    }
}

/// Meter pro Grad geographischer Länge bei der gegebenen Referenzbreite.
pub fn meters_per_degree_lng(reference_lat: f64) -> f64 {
    METERS_PER_DEGREE_LAT * reference_lat.to_radians().cos().abs().max(MIN_LNG_SCALE)
}

/// Grad-Differenz (`lat`, `lng` als Delta) → lokaler Meter-Vektor (Ost, Nord).
pub fn to_meters(delta: GeoPoint, reference_lat: f64) -> DVec2 {
    DVec2::new(
        delta.lng * meters_per_degree_lng(reference_lat),
        delta.lat * METERS_PER_DEGREE_LAT,
    )
}

/// Lokaler Meter-Vektor (Ost, Nord) → Grad-Differenz.
pub fn to_degrees(meters: DVec2, reference_lat: f64) -> GeoPoint {
    GeoPoint::new(
        meters.y / METERS_PER_DEGREE_LAT,
        meters.x / meters_per_degree_lng(reference_lat),
    )
}

/// Meter-Distanz zweier Punkte, referenziert auf deren mittlere Breite.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    LocalFrame::with_reference(a, (a.lat + b.lat) * 0.5)
        .project(b)
        .length()
}

/// Lokaler Meter-Frame mit festem Ursprung und fester Referenzbreite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    /// Ursprung des Frames (wird auf `DVec2::ZERO` abgebildet)
    pub origin: GeoPoint,
    /// Referenzbreite für die Längen-Skalierung
    pub reference_lat: f64,
}

impl LocalFrame {
    /// Frame mit Ursprung `origin`, Referenzbreite = `origin.lat`.
    pub fn new(origin: GeoPoint) -> Self {
        Self {
            origin,
            reference_lat: origin.lat,
        }
    }

    /// Frame mit explizit gewählter Referenzbreite.
    pub fn with_reference(origin: GeoPoint, reference_lat: f64) -> Self {
        Self {
            origin,
            reference_lat,
        }
    }

    /// Geographischer Punkt → lokale Meter.
    pub fn project(&self, point: GeoPoint) -> DVec2 {
        to_meters(
            GeoPoint::new(point.lat - self.origin.lat, point.lng - self.origin.lng),
            self.reference_lat,
        )
    }

    /// Lokale Meter → geographischer Punkt.
    pub fn unproject(&self, local: DVec2) -> GeoPoint {
        let delta = to_degrees(local, self.reference_lat);
        GeoPoint::new(self.origin.lat + delta.lat, self.origin.lng + delta.lng)
    }

    /// Projiziert eine Punktfolge.
    pub fn project_all(&self, points: &[GeoPoint]) -> Vec<DVec2> {
        points.iter().map(|p| self.project(*p)).collect()
    }

    /// Rückprojektion einer Punktfolge.
    pub fn unproject_all(&self, points: &[DVec2]) -> Vec<GeoPoint> {
        points.iter().map(|p| self.unproject(*p)).collect()
    }
}
