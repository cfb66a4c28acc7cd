//! Trafo-Platz: gedrehtes Quadrat als Anschluss-Ziel für Strom/Fernmelde.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, LocalFrame};

/// Standard-Kantenlänge eines Trafo-Platzes in Metern.
pub const DEFAULT_PAD_SIDE: f64 = 6.0;

fn default_side() -> f64 {
    DEFAULT_PAD_SIDE
}

/// Quadratischer Trafo-Platz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerPad {
    /// Eindeutige ID
    pub id: u64,
    /// Mittelpunkt
    pub center: GeoPoint,
    /// Kantenlänge in Metern
    #[serde(default = "default_side")]
    pub side_m: f64,
    /// Drehung in Grad, gegen den Uhrzeigersinn (Ost = 0°)
    #[serde(default)]
    pub rotation_deg: f64,
}

impl TransformerPad {
    /// Ungedrehter Platz mit Standard-Kantenlänge.
    pub fn new(id: u64, center: GeoPoint) -> Self {
        Self {
            id,
            center,
            side_m: DEFAULT_PAD_SIDE,
            rotation_deg: 0.0,
        }
    }

    /// Eckpunkte im lokalen Frame des Mittelpunkts (gegen den Uhrzeigersinn).
    pub fn local_vertices(&self) -> [DVec2; 4] {
        let half = self.side_m.abs() * 0.5;
        let rotation = DVec2::from_angle(self.rotation_deg.to_radians());
        [
            DVec2::new(-half, -half),
            DVec2::new(half, -half),
            DVec2::new(half, half),
            DVec2::new(-half, half),
        ]
        .map(|corner| rotation.rotate(corner))
    }

    /// Eckpunkte als geographische Punkte.
    pub fn vertices(&self) -> Vec<GeoPoint> {
        let frame = LocalFrame::new(self.center);
        self.local_vertices()
            .into_iter()
            .map(|v| frame.unproject(v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unrotated_pad_is_axis_aligned() {
        let pad = TransformerPad::new(1, GeoPoint::new(55.0, 37.0));
        let v = pad.local_vertices();
        assert_relative_eq!(v[0].x, -3.0);
        assert_relative_eq!(v[0].y, -3.0);
        assert_relative_eq!(v[2].x, 3.0);
        assert_relative_eq!(v[2].y, 3.0);
    }

    #[test]
    fn rotation_turns_corners_around_center() {
        let mut pad = TransformerPad::new(1, GeoPoint::new(55.0, 37.0));
        pad.rotation_deg = 45.0;
        let v = pad.local_vertices();
        let diag = 3.0 * 2.0f64.sqrt();
        assert_relative_eq!(v[0].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(v[0].y, -diag, epsilon = 1e-9);
        assert_relative_eq!(v[1].x, diag, epsilon = 1e-9);
    }

    #[test]
    fn side_defaults_when_missing_in_json() {
        let pad: TransformerPad =
            serde_json::from_str(r#"{"id":3,"center":{"lat":55.0,"lng":37.0}}"#)
                .expect("gültiges JSON");
        assert_eq!(pad.side_m, DEFAULT_PAD_SIDE);
        assert_eq!(pad.rotation_deg, 0.0);
    }
}
