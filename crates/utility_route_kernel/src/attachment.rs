//! Anschlusspunkt-Suche an Gebäudewänden, Hauptleitungen und Trafo-Plätzen.
//!
//! Alle Resolver liefern `None` statt eines Fehlers, wenn nichts im Snap-Radius
//! liegt; der Aufrufer verwendet dann die rohe Cursor-Position.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, LocalFrame};
use crate::geometry::project_point_to_segment;
use crate::model::{Building, Mainline, SystemType, TransformerPad};

/// Standard-Snap-Radius in Metern.
pub const DEFAULT_SNAP_RADIUS: f64 = 20.0;

/// Kanten eines Trafo-Platzes, deren Abstand um weniger als diesen Wert
/// vom besten abweicht, gelten als gleich nah (Meter).
pub const PAD_TIE_TOLERANCE: f64 = 0.25;

/// Objekt, an dem ein Anschluss gefunden wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentTarget {
    /// Gebäudewand
    Building(u64),
    /// Hauptleitung
    Mainline(u64),
    /// Kante eines Trafo-Platzes
    Pad(u64),
}

/// Gefundener Anschlusspunkt mit lokaler Orientierung.
///
/// `normal` und `tangent` sind Einheitsvektoren im lokalen Meter-Frame
/// (x = Ost, y = Nord) oder `DVec2::ZERO` bei entarteter Geometrie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    /// Objekt, zu dem der Anschluss gehört
    pub target: AttachmentTarget,
    /// Fußpunkt auf Wand / Leitung / Kante
    pub point: GeoPoint,
    /// Nach außen (bzw. zum Cursor) zeigende Normale
    pub normal: DVec2,
    /// Richtung der Wand / Leitung
    pub tangent: DVec2,
    /// Abstand Cursor → Fußpunkt in Metern
    pub distance_m: f64,
}

/// Nächstgelegene Gebäudewand innerhalb von `max_snap_m` (inklusive).
///
/// Die Normale steht senkrecht auf der Wand und wird über das Vorzeichen von
/// `normal · (Fußpunkt − Schwerpunkt)` nach außen gedreht.
pub fn resolve_building_attachment(
    cursor: GeoPoint,
    buildings: &[Building],
    max_snap_m: f64,
) -> Option<Attachment> {
    let best = closest(buildings.iter().filter_map(|b| nearest_wall(cursor, b)));
    accept_within(best, max_snap_m)
}

/// Nächste Wand eines einzelnen Gebäudes (ohne Radius-Filter).
pub fn nearest_wall(cursor: GeoPoint, building: &Building) -> Option<Attachment> {
    let footprint = building.footprint();
    let centroid = building.centroid();
    closest(
        polygon_edge_candidates(cursor, &footprint, centroid)
            .map(|(point, normal, tangent, distance_m)| Attachment {
                target: AttachmentTarget::Building(building.id),
                point,
                normal,
                tangent,
                distance_m,
            }),
    )
}

/// Nächster Punkt auf einer Hauptleitung desselben Systems.
///
/// Die Normale zeigt zur Seite des Cursors.
pub fn resolve_mainline_attachment(
    cursor: GeoPoint,
    mainlines: &[Mainline],
    system: SystemType,
    max_snap_m: f64,
) -> Option<Attachment> {
    let candidates = mainlines
        .iter()
        .filter(|m| m.system == system)
        .map(|m| {
            let hit = project_point_to_segment(cursor, m.start, m.end);
            let mut normal = hit.tangent.perp();
            let to_cursor = LocalFrame::new(hit.projection).project(cursor);
            if normal.dot(to_cursor) < 0.0 {
                normal = -normal;
            }
            Attachment {
                target: AttachmentTarget::Mainline(m.id),
                point: hit.projection,
                normal,
                tangent: hit.tangent,
                distance_m: hit.distance,
            }
        });
    accept_within(closest(candidates), max_snap_m)
}

/// Nächste Kante eines (gedrehten) Trafo-Platzes.
///
/// Mit `reference_center` entscheidet bei annähernd gleich nahen Kanten die
/// Ausrichtung der Außennormalen zur Richtung Platz-Mitte → Referenz,
/// sonst allein der Abstand.
pub fn resolve_pad_edge(
    cursor: GeoPoint,
    pads: &[TransformerPad],
    reference_center: Option<GeoPoint>,
    max_snap_m: f64,
) -> Option<Attachment> {
    let candidates: Vec<(Attachment, f64)> = pads
        .iter()
        .flat_map(|pad| {
            let towards_reference = reference_center
                .map(|r| LocalFrame::new(pad.center).project(r).normalize_or_zero())
                .unwrap_or(DVec2::ZERO);
            let vertices = pad.vertices();
            polygon_edge_candidates(cursor, &vertices, pad.center)
                .map(move |(point, normal, tangent, distance_m)| {
                    let attachment = Attachment {
                        target: AttachmentTarget::Pad(pad.id),
                        point,
                        normal,
                        tangent,
                        distance_m,
                    };
                    (attachment, normal.dot(towards_reference))
                })
                .collect::<Vec<_>>()
        })
        .filter(|(a, _)| a.distance_m <= max_snap_m)
        .collect();

    let best_distance = candidates
        .iter()
        .map(|(a, _)| a.distance_m)
        .fold(f64::INFINITY, f64::min);

    let chosen = if reference_center.is_some() {
        candidates
            .into_iter()
            .filter(|(a, _)| a.distance_m - best_distance < PAD_TIE_TOLERANCE)
            .fold(None::<(Attachment, f64)>, |best, (a, align)| match best {
                Some((b, b_align)) if better_aligned(b_align, b.distance_m, align, a.distance_m) => {
                    Some((b, b_align))
                }
                _ => Some((a, align)),
            })
            .map(|(a, _)| a)
    } else {
        closest(candidates.into_iter().map(|(a, _)| a))
    };

    if chosen.is_none() {
        log::debug!("Kein Trafo-Platz im Snap-Radius ({max_snap_m} m)");
    }
    chosen
}

/// Behält der bisherige Kandidat (Ausrichtung, Abstand) gegenüber dem neuen die Oberhand?
fn better_aligned(kept_align: f64, kept_distance: f64, align: f64, distance: f64) -> bool {
    kept_align > align || (kept_align == align && kept_distance <= distance)
}

/// Projiziert den Cursor auf alle Kanten eines Polygons.
///
/// Liefert (Fußpunkt, Außennormale, Tangente, Abstand); entartete Kanten
/// ohne Richtung werden übersprungen.
fn polygon_edge_candidates<'a>(
    cursor: GeoPoint,
    polygon: &'a [GeoPoint],
    centroid: GeoPoint,
) -> impl Iterator<Item = (GeoPoint, DVec2, DVec2, f64)> + 'a {
    let n = polygon.len();
    let centroid_frame = LocalFrame::new(centroid);
    (0..n).filter_map(move |i| {
        let hit = project_point_to_segment(cursor, polygon[i], polygon[(i + 1) % n]);
        if hit.tangent == DVec2::ZERO {
            return None;
        }
        let mut normal = hit.tangent.perp();
        if normal.dot(centroid_frame.project(hit.projection)) < 0.0 {
            normal = -normal;
        }
        Some((hit.projection, normal, hit.tangent, hit.distance))
    })
}

/// Kandidat mit dem kleinsten Abstand; bei Gleichstand gewinnt der erste.
pub(crate) fn closest(candidates: impl Iterator<Item = Attachment>) -> Option<Attachment> {
    candidates.fold(None, |best: Option<Attachment>, candidate| match best {
        Some(b) if b.distance_m <= candidate.distance_m => Some(b),
        _ => Some(candidate),
    })
}

pub(crate) fn accept_within(best: Option<Attachment>, max_snap_m: f64) -> Option<Attachment> {
    match best {
        Some(a) if a.distance_m <= max_snap_m => Some(a),
        Some(a) => {
            log::debug!(
                "Nächster Anschluss {:.2} m entfernt, außerhalb Snap-Radius {max_snap_m} m",
                a.distance_m
            );
            None
        }
        None => None,
    }
}
