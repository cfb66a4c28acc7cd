//! Aufrufer-Fassade: Anschluss finden, Trasse bauen, Doppelleitung ableiten,
//! Abstände prüfen.
//!
//! Die Fassade hält nur Referenzen auf unveränderliche Konfiguration und die
//! aktuelle Projekt-Aufnahme. Jede Operation ist eine reine Funktion davon.

use serde::{Deserialize, Serialize};

use crate::attachment::{
    resolve_building_attachment, resolve_mainline_attachment, resolve_pad_edge, Attachment,
    AttachmentTarget, DEFAULT_SNAP_RADIUS,
};
use crate::clearance::{validate, ClearanceMatrix, Violation};
use crate::geo::{GeoPoint, LocalFrame};
use crate::geometry::{distance_to_polygon_boundary, path_crosses_polygon};
use crate::model::{Building, ProjectSnapshot, Route, SystemProfiles, SystemType};
use crate::offset::dual_line_paths;
use crate::path::{elbow_path, synthesize_avoiding_building, synthesize_path};
use crate::spatial::FootprintIndex;

/// Standard-Toleranz, innerhalb der ein Ziel auf dem Gebäude-Umfang liegt (Meter).
pub const DEFAULT_PERIMETER_TOLERANCE: f64 = 0.5;

/// Unveränderliche Kernel-Konfiguration.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelConfig {
    /// Maximaler Abstand Cursor → Anschlusspunkt (Meter, inklusive)
    pub snap_radius_m: f64,
    /// Toleranz für "Ziel liegt auf dem Umfang des Quell-Gebäudes" (Meter)
    pub perimeter_tolerance_m: f64,
    /// Physikalische Parameter je Systemtyp
    pub profiles: SystemProfiles,
    /// Mindestabstände zwischen Systemtypen
    pub clearance: ClearanceMatrix,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            snap_radius_m: DEFAULT_SNAP_RADIUS,
            perimeter_tolerance_m: DEFAULT_PERIMETER_TOLERANCE,
            profiles: SystemProfiles::default(),
            clearance: ClearanceMatrix::default(),
        }
    }
}

/// Art des Objekts, an dem angeschlossen werden soll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Gebäudewand
    Building,
    /// Hauptleitung desselben Systems
    Mainline,
    /// Kante eines Trafo-Platzes
    Pad,
}

impl TargetKind {
    /// Parst einen Bezeichner (Groß-/Kleinschreibung egal).
    pub fn from_key(key: &str) -> Option<TargetKind> {
        match key.trim().to_ascii_lowercase().as_str() {
            "building" => Some(TargetKind::Building),
            "mainline" => Some(TargetKind::Mainline),
            "pad" => Some(TargetKind::Pad),
            _ => None,
        }
    }
}

/// Fassade über einer Projekt-Aufnahme.
#[derive(Debug, Clone, Copy)]
pub struct RoutePlanner<'a> {
    config: &'a KernelConfig,
    snapshot: &'a ProjectSnapshot,
    footprints: Option<&'a FootprintIndex>,
}

impl<'a> RoutePlanner<'a> {
    /// Erstellt die Fassade ohne Spatial-Index.
    pub fn new(config: &'a KernelConfig, snapshot: &'a ProjectSnapshot) -> Self {
        Self {
            config,
            snapshot,
            footprints: None,
        }
    }

    /// Nutzt einen vorab gebauten Index für die Gebäude-Suche.
    ///
    /// Der Index muss aus `snapshot.buildings` gebaut sein.
    pub fn with_footprint_index(mut self, index: &'a FootprintIndex) -> Self {
        self.footprints = Some(index);
        self
    }

    /// Aktive Konfiguration.
    pub fn config(&self) -> &'a KernelConfig {
        self.config
    }

    /// Aktuelle Projekt-Aufnahme.
    pub fn snapshot(&self) -> &'a ProjectSnapshot {
        self.snapshot
    }

    /// Sucht den Anschlusspunkt der gewünschten Art im Snap-Radius.
    ///
    /// Hauptleitungen anderer Systeme werden ignoriert. Bei Trafo-Plätzen
    /// entscheidet allein der Abstand, siehe [`RoutePlanner::resolve_pad_towards`].
    pub fn resolve_attachment(
        &self,
        cursor: GeoPoint,
        target_kind: TargetKind,
        system: SystemType,
    ) -> Option<Attachment> {
        let radius = self.config.snap_radius_m;
        match target_kind {
            TargetKind::Building => match self.footprints {
                Some(index) => {
                    index.resolve_building_attachment(cursor, &self.snapshot.buildings, radius)
                }
                None => resolve_building_attachment(cursor, &self.snapshot.buildings, radius),
            },
            TargetKind::Mainline => {
                resolve_mainline_attachment(cursor, &self.snapshot.mainlines, system, radius)
            }
            TargetKind::Pad => resolve_pad_edge(cursor, &self.snapshot.pads, None, radius),
        }
    }

    /// Trafo-Kante, bei Gleichstand die zur Referenz ausgerichtete.
    pub fn resolve_pad_towards(&self, cursor: GeoPoint, reference: GeoPoint) -> Option<Attachment> {
        resolve_pad_edge(
            cursor,
            &self.snapshot.pads,
            Some(reference),
            self.config.snap_radius_m,
        )
    }

    /// Baut die rechtwinklige Trasse von `start` nach `end`.
    ///
    /// Ohne Anschluss entsteht der einfache Knick. Mit Gebäude-Anschluss wird
    /// das Quell-Gebäude umfahren, wenn das Ziel auf seinem Umfang liegt oder
    /// die direkte Trasse seinen Grundriss schneidet. `start` ist im
    /// Normalfall `attachment.point`.
    pub fn build_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        system: SystemType,
        attachment: Option<&Attachment>,
    ) -> Vec<GeoPoint> {
        let Some(attachment) = attachment else {
            return elbow_path(start, end);
        };
        let standoff = self.config.profiles.get(system).standoff_m;
        let direct = synthesize_path(start, attachment.normal, attachment.tangent, end, standoff);

        let AttachmentTarget::Building(building_id) = attachment.target else {
            return direct;
        };
        let Some(building) = self.snapshot.building(building_id) else {
            log::debug!("Gebäude {building_id} nicht im Projekt, keine Umfahrung");
            return direct;
        };

        let footprint = building.footprint();
        if self.needs_detour(building, &footprint, &direct, end) {
            log::debug!("Umfahrung von Gebäude {building_id} für {system}-Trasse");
            synthesize_avoiding_building(
                start,
                attachment.normal,
                attachment.tangent,
                end,
                standoff,
                &footprint,
            )
        } else {
            direct
        }
    }

    fn needs_detour(
        &self,
        building: &Building,
        footprint: &[GeoPoint],
        direct: &[GeoPoint],
        end: GeoPoint,
    ) -> bool {
        if footprint.len() < 3 {
            return false;
        }
        let frame = LocalFrame::new(building.centroid());
        let polygon = frame.project_all(footprint);
        let end_on_perimeter = distance_to_polygon_boundary(frame.project(end), &polygon)
            <= self.config.perimeter_tolerance_m;
        end_on_perimeter || path_crosses_polygon(&frame.project_all(direct), &polygon)
    }

    /// Die beiden Leiter einer Doppelleitung oder `None` für Einfach-Systeme.
    pub fn offset_for_dual_line(
        &self,
        path: &[GeoPoint],
        system: SystemType,
    ) -> Option<(Vec<GeoPoint>, Vec<GeoPoint>)> {
        let profile = self.config.profiles.get(system);
        if !profile.dual_line || profile.spacing_m <= 0.0 || path.len() < 2 {
            return None;
        }
        Some(dual_line_paths(path, profile.spacing_m))
    }

    /// Prüft eine Kandidaten-Trasse gegen bestehende Trassen.
    pub fn check_clearance(
        &self,
        candidate_path: &[GeoPoint],
        system: SystemType,
        existing_routes: &[Route],
    ) -> Vec<Violation> {
        validate(system, candidate_path, existing_routes, &self.config.clearance)
    }
}
