//! Parallelversatz von Trassen für Doppelleitungen.

use glam::DVec2;

use crate::geo::{GeoPoint, LocalFrame};

/// Versetzt jeden Punkt des Pfads um `offset_m` senkrecht zur Laufrichtung.
///
/// Positiver Versatz = links in Laufrichtung. An inneren Punkten wird der
/// Mittelwert der Normalen von ein- und auslaufendem Segment normalisiert,
/// Endpunkte nutzen die Normale ihres einzigen Segments. Null-Segmente
/// übernehmen die Normale des Nachbarn. Bei `offset_m == 0` oder weniger als
/// zwei Punkten bleibt der Pfad unverändert.
pub fn offset_path(path: &[GeoPoint], offset_m: f64) -> Vec<GeoPoint> {
    if path.len() < 2 || offset_m == 0.0 || !offset_m.is_finite() {
        return path.to_vec();
    }

    let frame = LocalFrame::new(path[0]);
    let local = frame.project_all(path);
    let Some(segment_normals) = segment_normals(&local) else {
        log::debug!("Pfad ohne Ausdehnung, Versatz übersprungen");
        return path.to_vec();
    };

    let last = local.len() - 1;
    local
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let normal = if i == 0 {
                segment_normals[0]
            } else if i == last {
                segment_normals[last - 1]
            } else {
                let averaged = (segment_normals[i - 1] + segment_normals[i]).normalize_or_zero();
                // Kehrtwende: Mittelwert verschwindet
                if averaged == DVec2::ZERO {
                    segment_normals[i]
                } else {
                    averaged
                }
            };
            frame.unproject(p + normal * offset_m)
        })
        .collect()
}

/// Die beiden Leiter einer Doppelleitung: Versatz `+spacing/2` und `−spacing/2`.
pub fn dual_line_paths(path: &[GeoPoint], spacing_m: f64) -> (Vec<GeoPoint>, Vec<GeoPoint>) {
    let half = spacing_m * 0.5;
    (offset_path(path, half), offset_path(path, -half))
}

/// Linke Einheitsnormale je Segment; Null-Segmente erben vom Nachbarn.
///
/// `None`, wenn alle Segmente Nulllänge haben.
fn segment_normals(local: &[DVec2]) -> Option<Vec<DVec2>> {
    let mut normals: Vec<DVec2> = local
        .windows(2)
        .map(|w| (w[1] - w[0]).normalize_or_zero().perp())
        .collect();

    let first_valid = normals.iter().position(|n| *n != DVec2::ZERO)?;
    let mut carry = normals[first_valid];
    for normal in normals.iter_mut() {
        if *normal == DVec2::ZERO {
            *normal = carry;
        } else {
            carry = *normal;
        }
    }
    Some(normals)
}
