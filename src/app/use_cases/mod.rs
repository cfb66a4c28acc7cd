//! Use-Cases der Application-Layer-Orchestrierung.

pub mod check_project;
pub mod commit_route;

pub use check_project::{check_project, ProjectViolation};
pub use commit_route::{commit_route, remove_route, replace_route_path, CommitOutcome};
