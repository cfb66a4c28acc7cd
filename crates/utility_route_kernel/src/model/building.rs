//! Gebäude mit explizitem oder abgeleitetem Grundriss.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, LocalFrame};
use crate::geometry::{polygon_centroid, signed_area};

/// Standard-Breite (Ost-West) ohne Maßangabe, in Metern.
pub const DEFAULT_BUILDING_WIDTH: f64 = 10.0;
/// Standard-Tiefe (Nord-Süd) ohne Maßangabe, in Metern.
pub const DEFAULT_BUILDING_HEIGHT: f64 = 10.0;

/// Ein Gebäude im Projekt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Eindeutige ID
    pub id: u64,
    /// Lagepunkt (Mittelpunkt des abgeleiteten Rechtecks)
    pub anchor: GeoPoint,
    /// Breite Ost-West in Metern (nur ohne Polygon relevant)
    #[serde(default)]
    pub width_m: Option<f64>,
    /// Tiefe Nord-Süd in Metern (nur ohne Polygon relevant)
    #[serde(default)]
    pub height_m: Option<f64>,
    /// Expliziter Grundriss (≥ 3 Punkte, implizit geschlossen)
    #[serde(default)]
    pub polygon: Option<Vec<GeoPoint>>,
}

impl Building {
    /// Achsparalleles Rechteck um `anchor`.
    pub fn rectangle(id: u64, anchor: GeoPoint, width_m: f64, height_m: f64) -> Self {
        Self {
            id,
            anchor,
            width_m: Some(width_m),
            height_m: Some(height_m),
            polygon: None,
        }
    }

    /// Gebäude mit explizitem Grundriss; Lagepunkt = Eckpunkt-Mittel.
    pub fn with_polygon(id: u64, polygon: Vec<GeoPoint>) -> Self {
        let anchor = polygon_centroid(&polygon).unwrap_or_default();
        Self {
            id,
            anchor,
            width_m: None,
            height_m: None,
            polygon: Some(polygon),
        }
    }

    /// Grundriss als geschlossenes Polygon, gegen den Uhrzeigersinn orientiert.
    ///
    /// Ohne gültiges Polygon (< 3 Punkte) wird ein Rechteck aus Lagepunkt
    /// und Maßen abgeleitet.
    pub fn footprint(&self) -> Vec<GeoPoint> {
        let mut points = match &self.polygon {
            Some(polygon) if polygon.len() >= 3 => polygon.clone(),
            _ => self.derived_rectangle(),
        };

        let frame = LocalFrame::new(polygon_centroid(&points).unwrap_or(self.anchor));
        if signed_area(&frame.project_all(&points)) < 0.0 {
            points.reverse();
        }
        points
    }

    /// Eckpunkt-Mittel des Grundrisses.
    pub fn centroid(&self) -> GeoPoint {
        polygon_centroid(&self.footprint()).unwrap_or(self.anchor)
    }

    fn derived_rectangle(&self) -> Vec<GeoPoint> {
        let half_w = self.width_m.unwrap_or(DEFAULT_BUILDING_WIDTH).abs() * 0.5;
        let half_h = self.height_m.unwrap_or(DEFAULT_BUILDING_HEIGHT).abs() * 0.5;
        let frame = LocalFrame::new(self.anchor);
        [
            DVec2::new(-half_w, -half_h),
            DVec2::new(half_w, -half_h),
            DVec2::new(half_w, half_h),
            DVec2::new(-half_w, half_h),
        ]
        .into_iter()
        .map(|corner| frame.unproject(corner))
        .collect()
    }
}
