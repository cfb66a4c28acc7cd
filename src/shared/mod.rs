//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die `app` und die CLI gemeinsam nutzen.

pub mod options;

pub use options::{CommitPolicy, PlannerOptions, ProfileEntry};
pub use options::{BUILDING_CLOSE_RADIUS_M, PERIMETER_TOLERANCE_M, SNAP_RADIUS_M};
