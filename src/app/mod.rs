//! Application-Layer: Projekt, Werkzeuge und Use-Cases.

mod project;
pub mod tools;
pub mod use_cases;

pub use project::Project;
