//! Routing- und Abstandsprüfungs-Kernel für Versorgungstrassen.
//!
//! Reine, zustandslose Funktionen ohne I/O: Anschlusspunkt finden,
//! rechtwinklige Trasse erzeugen, Doppelleitung ableiten, Mindestabstände
//! gegen bestehende Trassen prüfen. Rendering und Persistenz liegen beim Aufrufer.

pub mod attachment;
pub mod clearance;
pub mod geo;
pub mod geometry;
pub mod model;
pub mod offset;
pub mod path;
pub mod planner;
pub mod spatial;

pub use attachment::{
    resolve_building_attachment, resolve_mainline_attachment, resolve_pad_edge, Attachment,
    AttachmentTarget, DEFAULT_SNAP_RADIUS,
};
pub use clearance::{validate, validate_pair, ClearanceMatrix, ClearanceRule, Violation};
pub use geo::{distance_meters, GeoPoint, LocalFrame, METERS_PER_DEGREE_LAT};
pub use geometry::{
    polygon_centroid, project_point_to_segment, segment_to_segment_distance, SegmentProjection,
};
pub use model::{
    Building, Mainline, ProjectSnapshot, Route, SystemProfile, SystemProfiles, SystemType,
    TransformerPad,
};
pub use offset::{dual_line_paths, offset_path};
pub use path::{elbow_path, synthesize_avoiding_building, synthesize_path};
pub use planner::{KernelConfig, RoutePlanner, TargetKind, DEFAULT_PERIMETER_TOLERANCE};
pub use spatial::FootprintIndex;
