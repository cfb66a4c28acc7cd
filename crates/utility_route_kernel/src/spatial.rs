//! Spatial-Index (KD-Tree) über Gebäude-Schwerpunkte.
//!
//! Dient nur als Vorfilter für die Wand-Suche in großen Projekten: das
//! Ergebnis ist identisch mit [`resolve_building_attachment`] über alle
//! Gebäude.
//!
//! [`resolve_building_attachment`]: crate::attachment::resolve_building_attachment

use indexmap::IndexMap;
use kiddo::{KdTree, SquaredEuclidean};

use crate::attachment::{accept_within, closest, nearest_wall, Attachment};
use crate::geo::{distance_meters, GeoPoint, LocalFrame};
use crate::model::Building;

/// Relativer Zuschlag auf den Suchradius für die Verzerrung des gemeinsamen Frames.
const FRAME_DISTORTION_MARGIN: f64 = 0.02;
/// Absoluter Zuschlag auf den Suchradius in Metern.
const SEARCH_SLACK_M: f64 = 1.0;

/// Read-only Index über die Grundrisse eines Projekts.
#[derive(Debug, Clone)]
pub struct FootprintIndex {
    tree: KdTree<f64, 2>,
    /// Position im Index → Positionen in der Gebäude-Liste (deckungsgleiche
    /// Schwerpunkte teilen sich einen Baum-Eintrag)
    slots: Vec<Vec<usize>>,
    /// Anzahl indexierter Gebäude
    count: usize,
    frame: LocalFrame,
    /// Größter Abstand Schwerpunkt → Eckpunkt über alle Gebäude
    max_reach_m: f64,
}

impl FootprintIndex {
    /// Leerer Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            slots: Vec::new(),
            count: 0,
            frame: LocalFrame::new(GeoPoint::default()),
            max_reach_m: 0.0,
        }
    }

    /// Baut den Index aus der Gebäude-Liste eines Projekts.
    ///
    /// Gebäude mit nicht-endlichen Koordinaten werden nicht indexiert.
    pub fn from_buildings(buildings: &[Building]) -> Self {
        let mut centroids = Vec::with_capacity(buildings.len());
        let mut slots = Vec::with_capacity(buildings.len());
        let mut max_reach_m: f64 = 0.0;

        for (slot, building) in buildings.iter().enumerate() {
            let footprint = building.footprint();
            let centroid = building.centroid();
            if !centroid.is_finite() || footprint.iter().any(|p| !p.is_finite()) {
                log::debug!("Gebäude {} mit ungültigen Koordinaten nicht indexiert", building.id);
                continue;
            }
            let reach = footprint
                .iter()
                .map(|p| distance_meters(centroid, *p))
                .fold(0.0, f64::max);
            max_reach_m = max_reach_m.max(reach);
            centroids.push(centroid);
            slots.push(slot);
        }

        if centroids.is_empty() {
            return Self::empty();
        }

        let mean_lat = centroids.iter().map(|c| c.lat).sum::<f64>() / centroids.len() as f64;
        let frame = LocalFrame::with_reference(centroids[0], mean_lat);

        // kiddo kann Buckets mit lauter gleichen Punkten nicht teilen
        let mut groups: IndexMap<(u64, u64), ([f64; 2], Vec<usize>)> = IndexMap::new();
        for (centroid, slot) in centroids.iter().zip(&slots) {
            let local = frame.project(*centroid);
            // +0.0 normalisiert -0.0, damit beide auf denselben Schlüssel fallen
            let point = [local.x + 0.0, local.y + 0.0];
            groups
                .entry((point[0].to_bits(), point[1].to_bits()))
                .or_insert_with(|| (point, Vec::new()))
                .1
                .push(*slot);
        }
        let (entries, grouped): (Vec<[f64; 2]>, Vec<Vec<usize>>) = groups.into_values().unzip();

        Self {
            tree: (&entries).into(),
            slots: grouped,
            count: slots.len(),
            frame,
            max_reach_m,
        }
    }

    /// Anzahl indexierter Gebäude.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Gibt `true` zurück, wenn keine Gebäude im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Listen-Positionen aller Gebäude, deren Wand näher als `max_distance_m`
    /// liegen könnte, aufsteigend sortiert.
    pub fn candidates(&self, cursor: GeoPoint, max_distance_m: f64) -> Vec<usize> {
        if self.is_empty() || !cursor.is_finite() || max_distance_m.is_sign_negative() {
            return Vec::new();
        }

        let radius = (max_distance_m + self.max_reach_m) * (1.0 + FRAME_DISTORTION_MARGIN)
            + SEARCH_SLACK_M;
        let query = self.frame.project(cursor);

        let mut slots: Vec<usize> = self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y], radius * radius)
            .into_iter()
            .filter_map(|entry| self.slots.get(entry.item as usize))
            .flatten()
            .copied()
            .collect();
        // Listen-Reihenfolge wie beim vollständigen Durchlauf (Gleichstand → erstes Gebäude)
        slots.sort_unstable();
        slots
    }

    /// Wand-Suche wie [`resolve_building_attachment`], aber nur über die
    /// Kandidaten des Index.
    ///
    /// `buildings` muss dieselbe Liste sein, aus der der Index gebaut wurde.
    ///
    /// [`resolve_building_attachment`]: crate::attachment::resolve_building_attachment
    pub fn resolve_building_attachment(
        &self,
        cursor: GeoPoint,
        buildings: &[Building],
        max_snap_m: f64,
    ) -> Option<Attachment> {
        let best = closest(
            self.candidates(cursor, max_snap_m)
                .into_iter()
                .filter_map(|slot| buildings.get(slot))
                .filter_map(|building| nearest_wall(cursor, building)),
        );
        accept_within(best, max_snap_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::{resolve_building_attachment, AttachmentTarget, DEFAULT_SNAP_RADIUS};
    use glam::DVec2;

    const ORIGIN: GeoPoint = GeoPoint::new(55.756, 37.6175);

    fn at(east: f64, north: f64) -> GeoPoint {
        LocalFrame::new(ORIGIN).unproject(DVec2::new(east, north))
    }

    /// Raster aus 10 × 10 Gebäuden im Abstand von 40 m.
    fn grid() -> Vec<Building> {
        (0..100u64)
            .map(|i| {
                let east = (i % 10) as f64 * 40.0;
                let north = (i / 10) as f64 * 40.0;
                Building::rectangle(i + 1, at(east, north), 16.0, 12.0)
            })
            .collect()
    }

    #[test]
    fn candidates_are_local_subset() {
        let buildings = grid();
        let index = FootprintIndex::from_buildings(&buildings);
        assert_eq!(index.len(), 100);

        let candidates = index.candidates(at(200.0, 200.0), 5.0);
        assert!(!candidates.is_empty());
        assert!(candidates.len() < 20);
        assert!(candidates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn indexed_lookup_matches_exhaustive_lookup() {
        let buildings = grid();
        let index = FootprintIndex::from_buildings(&buildings);

        for (east, north) in [(3.0, -9.0), (118.0, 77.0), (361.0, 365.0), (20.0, 20.0), (-50.0, -50.0)] {
            let cursor = at(east, north);
            let exhaustive = resolve_building_attachment(cursor, &buildings, DEFAULT_SNAP_RADIUS);
            let indexed = index.resolve_building_attachment(cursor, &buildings, DEFAULT_SNAP_RADIUS);
            assert_eq!(exhaustive, indexed, "Abweichung bei ({east}, {north})");
        }
    }

    #[test]
    fn tie_keeps_first_building() {
        // Deckungsgleiche Grundrisse, exakt gleicher Abstand
        let buildings = vec![
            Building::rectangle(7, at(30.0, 0.0), 10.0, 10.0),
            Building::rectangle(8, at(30.0, 0.0), 10.0, 10.0),
        ];
        let index = FootprintIndex::from_buildings(&buildings);
        let hit = index
            .resolve_building_attachment(at(30.0, -9.0), &buildings, DEFAULT_SNAP_RADIUS)
            .expect("Treffer erwartet");
        assert_eq!(hit.target, AttachmentTarget::Building(7));
    }

    #[test]
    fn coincident_buildings_share_one_entry() {
        let buildings: Vec<Building> = (0..40u64)
            .map(|i| Building::rectangle(i + 1, ORIGIN, 10.0, 10.0))
            .collect();
        let index = FootprintIndex::from_buildings(&buildings);
        assert_eq!(index.len(), 40);

        let candidates = index.candidates(ORIGIN, DEFAULT_SNAP_RADIUS);
        assert_eq!(candidates, (0..40).collect::<Vec<_>>());

        for (east, north) in [(0.0, -9.0), (7.0, 2.0), (-3.0, 8.0), (0.0, 0.0), (40.0, 40.0)] {
            let cursor = at(east, north);
            let exhaustive = resolve_building_attachment(cursor, &buildings, DEFAULT_SNAP_RADIUS);
            let indexed = index.resolve_building_attachment(cursor, &buildings, DEFAULT_SNAP_RADIUS);
            assert_eq!(exhaustive, indexed, "Abweichung bei ({east}, {north})");
        }
        let hit = index
            .resolve_building_attachment(at(0.0, -9.0), &buildings, DEFAULT_SNAP_RADIUS)
            .expect("Treffer erwartet");
        assert_eq!(hit.target, AttachmentTarget::Building(1));
    }

    #[test]
    fn duplicates_mixed_with_distinct_buildings() {
        let mut buildings = grid();
        let copies: Vec<Building> = (0..40u64)
            .map(|i| Building::rectangle(1000 + i, at(120.0, 80.0), 16.0, 12.0))
            .collect();
        buildings.extend(copies);
        let index = FootprintIndex::from_buildings(&buildings);
        assert_eq!(index.len(), 140);

        for (east, north) in [(120.0, 71.0), (118.0, 77.0), (3.0, -9.0), (361.0, 365.0)] {
            let cursor = at(east, north);
            let exhaustive = resolve_building_attachment(cursor, &buildings, DEFAULT_SNAP_RADIUS);
            let indexed = index.resolve_building_attachment(cursor, &buildings, DEFAULT_SNAP_RADIUS);
            assert_eq!(exhaustive, indexed, "Abweichung bei ({east}, {north})");
        }
    }

    #[test]
    fn empty_index_has_no_entries() {
        let index = FootprintIndex::from_buildings(&[]);
        assert!(index.is_empty());
        assert!(index.candidates(ORIGIN, 100.0).is_empty());
        assert!(index.resolve_building_attachment(ORIGIN, &[], 100.0).is_none());
    }
}
