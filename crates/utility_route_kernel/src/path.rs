//! Rechtwinklige Trassen-Synthese vom Anschlusspunkt zum Ziel.
//!
//! Alle Konstruktionen laufen im lokalen Meter-Frame des Startpunkts und
//! werden danach in Grad zurückgerechnet. Entartete Eingaben (Nullvektoren,
//! NaN, nicht-endlicher Wandabstand) führen immer zum einfachen Knick
//! [`elbow_path`], nie zu einem Fehler.

use glam::DVec2;

use crate::geo::{GeoPoint, LocalFrame};

/// Unterhalb dieses Betrags gelten Normale und Tangente als parallel.
const ORTHOGONALITY_EPSILON: f64 = 1e-6;

/// Einfacher Zwei-Segment-Knick: erst entlang der Länge, dann entlang der Breite.
pub fn elbow_path(start: GeoPoint, end: GeoPoint) -> Vec<GeoPoint> {
    vec![start, GeoPoint::new(start.lat, end.lng), end]
}

/// Trasse `[start, p1, p2, end]`: Stich senkrecht von der Wand, parallel zur
/// Wand, dann senkrecht ins Ziel.
///
/// `p1 = start + n · standoff_m`, wobei `n` die um 90° gedrehte Tangente ist,
/// orientiert wie `outward_normal`. Damit ist jeder Knick exakt 90°.
pub fn synthesize_path(
    start: GeoPoint,
    outward_normal: DVec2,
    tangent: DVec2,
    end: GeoPoint,
    standoff_m: f64,
) -> Vec<GeoPoint> {
    if !start.is_finite() || !end.is_finite() || !standoff_m.is_finite() {
        log::debug!("Nicht-endliche Eingabe, Fallback auf Knick");
        return elbow_path(start, end);
    }
    let Some((t, n)) = wall_axes(outward_normal, tangent) else {
        log::debug!("Entartete Wand-Orientierung, Fallback auf Knick");
        return elbow_path(start, end);
    };

    let frame = LocalFrame::new(start);
    let p1 = n * standoff_m.max(0.0);
    let to_end = frame.project(end) - p1;
    let p2 = p1 + t * to_end.dot(t);

    vec![start, frame.unproject(p1), frame.unproject(p2), end]
}

/// Variante mit Umfahrung des Quell-Gebäudes (5 Punkte).
///
/// Die Hüllbox des Grundrisses wird in Wand-Achsen (Tangente / Normale)
/// bestimmt. Der Stich endet `half_height + standoff` vor der Box-Mitte, die
/// seitliche Umfahrung liegt `half_width + standoff` neben der Box-Mitte auf
/// der Seite des Ziels. Ob die Umfahrung ein anderes Gebäude schneidet, wird
/// nicht geprüft.
pub fn synthesize_avoiding_building(
    start: GeoPoint,
    outward_normal: DVec2,
    tangent: DVec2,
    end: GeoPoint,
    standoff_m: f64,
    footprint: &[GeoPoint],
) -> Vec<GeoPoint> {
    if footprint.len() < 3 {
        return synthesize_path(start, outward_normal, tangent, end, standoff_m);
    }
    if !start.is_finite()
        || !end.is_finite()
        || !standoff_m.is_finite()
        || footprint.iter().any(|p| !p.is_finite())
    {
        log::debug!("Nicht-endliche Eingabe bei Umfahrung, Fallback auf Knick");
        return elbow_path(start, end);
    }
    let Some((t, n)) = wall_axes(outward_normal, tangent) else {
        log::debug!("Entartete Wand-Orientierung bei Umfahrung, Fallback auf Knick");
        return elbow_path(start, end);
    };

    let frame = LocalFrame::new(start);
    let bounds = WallBounds::from_points(frame.project_all(footprint).into_iter(), t, n);
    let standoff = standoff_m.max(0.0);

    let target = frame.project(end);
    let (end_t, end_n) = (target.dot(t), target.dot(n));

    let stub_n = bounds.center_n() + bounds.half_height() + standoff;
    let side = if end_t >= bounds.center_t() { 1.0 } else { -1.0 };
    let lateral_t = bounds.center_t() + side * (bounds.half_width() + standoff);

    let p1 = n * stub_n;
    let p2 = t * lateral_t + n * stub_n;
    let p3 = t * lateral_t + n * end_n;

    vec![
        start,
        frame.unproject(p1),
        frame.unproject(p2),
        frame.unproject(p3),
        end,
    ]
}

/// Orthonormale Wand-Achsen (Tangente, Normale) oder `None` bei Entartung.
fn wall_axes(outward_normal: DVec2, tangent: DVec2) -> Option<(DVec2, DVec2)> {
    if !outward_normal.is_finite() || !tangent.is_finite() {
        return None;
    }
    let t = tangent.normalize_or_zero();
    let outward = outward_normal.normalize_or_zero();
    if t == DVec2::ZERO || outward == DVec2::ZERO {
        return None;
    }

    let n = t.perp();
    let alignment = n.dot(outward);
    if alignment.abs() < ORTHOGONALITY_EPSILON {
        return None;
    }
    Some((t, if alignment < 0.0 { -n } else { n }))
}

/// Hüllbox in Wand-Koordinaten.
#[derive(Debug, Clone, Copy)]
struct WallBounds {
    min_t: f64,
    max_t: f64,
    min_n: f64,
    max_n: f64,
}

impl WallBounds {
    fn from_points(points: impl Iterator<Item = DVec2>, t: DVec2, n: DVec2) -> Self {
        points.fold(
            Self {
                min_t: f64::INFINITY,
                max_t: f64::NEG_INFINITY,
                min_n: f64::INFINITY,
                max_n: f64::NEG_INFINITY,
            },
            |b, p| {
                let (pt, pn) = (p.dot(t), p.dot(n));
                Self {
                    min_t: b.min_t.min(pt),
                    max_t: b.max_t.max(pt),
                    min_n: b.min_n.min(pn),
                    max_n: b.max_n.max(pn),
                }
            },
        )
    }

    fn center_t(&self) -> f64 {
        (self.min_t + self.max_t) * 0.5
    }

    fn center_n(&self) -> f64 {
        (self.min_n + self.max_n) * 0.5
    }

    fn half_width(&self) -> f64 {
        (self.max_t - self.min_t) * 0.5
    }

    fn half_height(&self) -> f64 {
        (self.max_n - self.min_n) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{path_crosses_polygon, GEOMETRY_EPSILON};
    use approx::assert_relative_eq;

    const ORIGIN: GeoPoint = GeoPoint::new(55.756, 37.6175);

    fn at(east: f64, north: f64) -> GeoPoint {
        LocalFrame::new(ORIGIN).unproject(DVec2::new(east, north))
    }

    /// Richtungen aufeinanderfolgender Segmente im Frame des ersten Punkts.
    fn directions(path: &[GeoPoint]) -> Vec<DVec2> {
        let frame = LocalFrame::new(path[0]);
        frame
            .project_all(path)
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect()
    }

    fn assert_rectilinear(path: &[GeoPoint]) {
        for pair in directions(path).windows(2) {
            let scale = pair[0].length() * pair[1].length();
            if scale > GEOMETRY_EPSILON {
                assert!(
                    (pair[0].dot(pair[1]) / scale).abs() < 1e-6,
                    "Knick nicht rechtwinklig: {:?}",
                    pair
                );
            }
        }
    }

    #[test]
    fn stub_runs_along_normal_for_standoff() {
        let path = synthesize_path(
            ORIGIN,
            DVec2::new(0.0, -1.0),
            DVec2::new(1.0, 0.0),
            at(12.0, -50.0),
            5.0,
        );
        assert_eq!(path.len(), 4);
        let local = LocalFrame::new(ORIGIN).project_all(&path);
        assert_relative_eq!(local[1].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(local[1].y, -5.0, epsilon = 1e-9);
        assert_relative_eq!(local[2].x, 12.0, epsilon = 1e-6);
        assert_relative_eq!(local[2].y, -5.0, epsilon = 1e-6);
        assert_rectilinear(&path);
    }

    #[test]
    fn skewed_normal_is_corrected_to_tangent_perpendicular() {
        let path = synthesize_path(
            ORIGIN,
            DVec2::new(0.3, 1.0),
            DVec2::new(1.0, 1.0),
            at(-30.0, 40.0),
            3.0,
        );
        assert_eq!(path.len(), 4);
        assert_rectilinear(&path);
    }

    #[test]
    fn zero_vectors_fall_back_to_elbow() {
        let end = at(10.0, 10.0);
        let path = synthesize_path(ORIGIN, DVec2::ZERO, DVec2::new(1.0, 0.0), end, 5.0);
        assert_eq!(path, elbow_path(ORIGIN, end));

        let path = synthesize_path(ORIGIN, DVec2::new(0.0, 1.0), DVec2::ZERO, end, 5.0);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn parallel_normal_and_tangent_fall_back_to_elbow() {
        let end = at(10.0, 10.0);
        let path = synthesize_path(ORIGIN, DVec2::X, DVec2::X, end, 5.0);
        assert_eq!(path, elbow_path(ORIGIN, end));
    }

    #[test]
    fn nan_coordinates_do_not_panic() {
        let end = GeoPoint::new(f64::NAN, 37.0);
        let path = synthesize_path(ORIGIN, DVec2::Y, DVec2::X, end, 5.0);
        assert_eq!(path.len(), 3);

        let path = synthesize_path(ORIGIN, DVec2::Y, DVec2::X, at(5.0, 5.0), f64::INFINITY);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn elbow_is_rectilinear() {
        let path = elbow_path(ORIGIN, at(25.0, -13.0));
        assert_eq!(path.len(), 3);
        assert_rectilinear(&path);
    }

    #[test]
    fn avoidance_path_clears_footprint() {
        // Gebäude 20 × 10 m, Start an der Südwand, Ziel an der Nordwand
        let footprint = vec![at(-10.0, -5.0), at(10.0, -5.0), at(10.0, 5.0), at(-10.0, 5.0)];
        let start = at(2.0, -5.0);
        let end = at(6.0, 5.0);

        let direct = synthesize_path(start, DVec2::new(0.0, -1.0), DVec2::X, end, 5.0);
        let frame = LocalFrame::new(ORIGIN);
        assert!(path_crosses_polygon(
            &frame.project_all(&direct),
            &frame.project_all(&footprint)
        ));

        let path =
            synthesize_avoiding_building(start, DVec2::new(0.0, -1.0), DVec2::X, end, 5.0, &footprint);
        assert_eq!(path.len(), 5);
        assert_rectilinear(&path);
        assert!(!path_crosses_polygon(
            &frame.project_all(&path),
            &frame.project_all(&footprint)
        ));

        let local = frame.project_all(&path);
        assert_relative_eq!(local[1].y, -10.0, epsilon = 1e-3);
        assert_relative_eq!(local[2].x, 15.0, epsilon = 1e-3);
        assert_relative_eq!(local[3].y, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn avoidance_detours_on_side_of_target() {
        let footprint = vec![at(-10.0, -5.0), at(10.0, -5.0), at(10.0, 5.0), at(-10.0, 5.0)];
        let path = synthesize_avoiding_building(
            at(2.0, -5.0),
            DVec2::new(0.0, -1.0),
            DVec2::X,
            at(-7.0, 5.0),
            3.0,
            &footprint,
        );
        let local = LocalFrame::new(ORIGIN).project_all(&path);
        assert_relative_eq!(local[2].x, -13.0, epsilon = 1e-3);
    }

    #[test]
    fn avoidance_without_footprint_uses_direct_path() {
        let path =
            synthesize_avoiding_building(ORIGIN, DVec2::Y, DVec2::X, at(10.0, 30.0), 5.0, &[]);
        assert_eq!(path.len(), 4);
    }
}
