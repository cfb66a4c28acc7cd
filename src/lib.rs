//! Utility Route Planner Library.
//! Planungs-Werkzeuge, Use-Cases und Optionen über dem Routing-Kernel,
//! als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod shared;

pub use utility_route_kernel as kernel;

pub use app::tools::{BuildingTool, PlanningTool, RouteDraft, ToolAction, ToolPreview, TraceTool};
pub use app::use_cases::{CommitOutcome, ProjectViolation};
pub use app::Project;
pub use shared::{CommitPolicy, PlannerOptions};
pub use utility_route_kernel::{
    Attachment, AttachmentTarget, Building, ClearanceMatrix, ClearanceRule, FootprintIndex,
    GeoPoint, KernelConfig, LocalFrame, Mainline, ProjectSnapshot, Route, RoutePlanner,
    SystemProfile, SystemType, TargetKind, TransformerPad, Violation,
};
