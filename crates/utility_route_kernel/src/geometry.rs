//! Geometrische Grundfunktionen: Projektion, Segment-Abstände, Polygon-Hilfen.
//!
//! Die `*_local`-Varianten und Polygon-Tests arbeiten im lokalen Meter-Frame
//! (`DVec2`, x = Ost, y = Nord). Die Funktionen auf `GeoPoint` bauen sich
//! ihren Frame selbst auf.

use glam::DVec2;

use crate::geo::{GeoPoint, LocalFrame};

/// Toleranz für Kollinearität und Null-Längen (Meter bzw. Meter²).
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Ergebnis von [`project_point_to_segment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Fußpunkt auf dem Segment
    pub projection: GeoPoint,
    /// Abstand Punkt → Fußpunkt in Metern
    pub distance: f64,
    /// Einheitsvektor a → b (lokaler Frame); `DVec2::ZERO` bei `a == b`
    pub tangent: DVec2,
}

/// Projiziert `p` auf das Segment `a`–`b` (Parameter auf [0, 1] geklemmt).
///
/// Referenzbreite ist die mittlere Breite des Segments. Bei `a == b` ist die
/// Distanz der Punkt-Punkt-Abstand und die Tangente der Nullvektor; der
/// Aufrufer darf sie nicht normalisieren.
pub fn project_point_to_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> SegmentProjection {
    let frame = LocalFrame::with_reference(a, (a.lat + b.lat) * 0.5);
    let ab = frame.project(b);
    let ap = frame.project(p);
    let (closest, _) = closest_point_on_segment(ap, DVec2::ZERO, ab);

    SegmentProjection {
        projection: frame.unproject(closest),
        distance: ap.distance(closest),
        tangent: ab.normalize_or_zero(),
    }
}

/// Minimaler Abstand zweier Segmente in Metern.
///
/// Sich schneidende oder berührende Segmente liefern 0, sonst das Minimum der
/// vier Endpunkt-zu-Segment-Abstände.
pub fn segment_to_segment_distance(a1: GeoPoint, a2: GeoPoint, b1: GeoPoint, b2: GeoPoint) -> f64 {
    let reference_lat = (a1.lat + a2.lat + b1.lat + b2.lat) * 0.25;
    let frame = LocalFrame::with_reference(a1, reference_lat);
    segment_distance_local(
        frame.project(a1),
        frame.project(a2),
        frame.project(b1),
        frame.project(b2),
    )
}

/// Arithmetisches Mittel der Eckpunkte (kein flächengewichteter Schwerpunkt).
pub fn polygon_centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(GeoPoint::new(lat / n, lng / n))
}

// ── Lokaler Meter-Frame ─────────────────────────────────────────────

/// Nächster Punkt auf `a`–`b` zu `p` und der geklemmte Parameter `t`.
pub fn closest_point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> (DVec2, f64) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < GEOMETRY_EPSILON {
        return (a, 0.0);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Abstand Punkt → Segment.
pub fn point_segment_distance_local(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let (closest, _) = closest_point_on_segment(p, a, b);
    p.distance(closest)
}

/// Abstand Segment → Segment (0 bei Schnitt oder Berührung).
pub fn segment_distance_local(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> f64 {
    if segments_intersect(p1, p2, q1, q2) {
        return 0.0;
    }
    point_segment_distance_local(p1, q1, q2)
        .min(point_segment_distance_local(p2, q1, q2))
        .min(point_segment_distance_local(q1, p1, p2))
        .min(point_segment_distance_local(q2, p1, p2))
}

fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

fn sign(value: f64) -> i8 {
    if value > GEOMETRY_EPSILON {
        1
    } else if value < -GEOMETRY_EPSILON {
        -1
    } else {
        0
    }
}

fn on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    p.x >= a.x.min(b.x) - GEOMETRY_EPSILON
        && p.x <= a.x.max(b.x) + GEOMETRY_EPSILON
        && p.y >= a.y.min(b.y) - GEOMETRY_EPSILON
        && p.y <= a.y.max(b.y) + GEOMETRY_EPSILON
}

/// Schneiden oder berühren sich die Segmente (inkl. kollinearer Überlappung)?
pub fn segments_intersect(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let d1 = sign(orientation(q1, q2, p1));
    let d2 = sign(orientation(q1, q2, p2));
    let d3 = sign(orientation(p1, p2, q1));
    let d4 = sign(orientation(p1, p2, q2));

    if d1 != d2 && d3 != d4 && d1 != 0 && d2 != 0 && d3 != 0 && d4 != 0 {
        return true;
    }

    (d1 == 0 && on_segment(p1, q1, q2))
        || (d2 == 0 && on_segment(p2, q1, q2))
        || (d3 == 0 && on_segment(q1, p1, p2))
        || (d4 == 0 && on_segment(q2, p1, p2))
}

/// Echter Durchstoß: die Segmente kreuzen sich im Inneren beider Segmente.
pub fn segments_cross_properly(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let d1 = sign(orientation(q1, q2, p1));
    let d2 = sign(orientation(q1, q2, p2));
    let d3 = sign(orientation(p1, p2, q1));
    let d4 = sign(orientation(p1, p2, q2));
    d1 * d2 < 0 && d3 * d4 < 0
}

/// Vorzeichenbehaftete Fläche (positiv = gegen den Uhrzeigersinn).
pub fn signed_area(polygon: &[DVec2]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice: f64 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum();
    twice * 0.5
}

/// Ray-Casting-Test; Punkte exakt auf dem Rand sind nicht eindeutig.
pub fn point_in_polygon(p: DVec2, polygon: &[DVec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Abstand eines Punkts zum Polygon-Rand.
pub fn distance_to_polygon_boundary(p: DVec2, polygon: &[DVec2]) -> f64 {
    polygon_edges(polygon)
        .map(|(a, b)| point_segment_distance_local(p, a, b))
        .fold(f64::INFINITY, f64::min)
}

/// Iterator über die Kanten eines implizit geschlossenen Polygons.
pub fn polygon_edges(polygon: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Durchquert der Pfad das Polygon-Innere?
///
/// Berührungen des Randes (z.B. Start- oder Endpunkt auf der Wand) zählen nicht.
pub fn path_crosses_polygon(path: &[DVec2], polygon: &[DVec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    path.windows(2).any(|seg| {
        let (a, b) = (seg[0], seg[1]);
        if a.distance_squared(b) < GEOMETRY_EPSILON {
            return false;
        }
        let crosses_edge =
            polygon_edges(polygon).any(|(e1, e2)| segments_cross_properly(a, b, e1, e2));
        let mid = (a + b) * 0.5;
        crosses_edge
            || (point_in_polygon(mid, polygon)
                && distance_to_polygon_boundary(mid, polygon) > GEOMETRY_EPSILON)
    })
}
