//! Projekt-Datei: Momentaufnahme aller Objekte plus ID-Vergabe.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use utility_route_kernel::{Building, GeoPoint, ProjectSnapshot, Route};

/// Ein Planungsprojekt, wie es als JSON gespeichert wird.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Anzeigename
    #[serde(default)]
    pub name: String,
    /// Gebäude, Hauptleitungen, Trafo-Plätze und Trassen
    #[serde(flatten)]
    pub snapshot: ProjectSnapshot,
}

impl Project {
    /// Leeres Projekt mit Namen.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            snapshot: ProjectSnapshot::default(),
        }
    }

    /// Lädt ein Projekt aus einer JSON-Datei.
    pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Projekt-Datei nicht lesbar: {}", path.display()))?;
        let project: Project = serde_json::from_str(&content)
            .with_context(|| format!("Projekt-Datei fehlerhaft: {}", path.display()))?;

        let invalid = project.snapshot.routes.iter().filter(|r| !r.is_valid()).count();
        if invalid > 0 {
            log::warn!("{invalid} Trasse(n) mit weniger als zwei Punkten im Projekt");
        }
        log::info!(
            "Projekt '{}' geladen: {} Gebäude, {} Hauptleitungen, {} Trafo-Plätze, {} Trassen",
            project.name,
            project.snapshot.buildings.len(),
            project.snapshot.mainlines.len(),
            project.snapshot.pads.len(),
            project.snapshot.routes.len()
        );
        Ok(project)
    }

    /// Speichert das Projekt als formatiertes JSON.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Projekt-Datei nicht schreibbar: {}", path.display()))?;
        log::info!("Projekt gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Nächste freie Trassen-ID.
    pub fn next_route_id(&self) -> u64 {
        self.snapshot.routes.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    /// Nächste freie Gebäude-ID.
    pub fn next_building_id(&self) -> u64 {
        self.snapshot.buildings.iter().map(|b| b.id).max().unwrap_or(0) + 1
    }

    /// Fügt ein Gebäude mit gezeichnetem Grundriss hinzu und gibt die ID zurück.
    pub fn add_building(&mut self, polygon: Vec<GeoPoint>) -> u64 {
        let id = self.next_building_id();
        self.snapshot.buildings.push(Building::with_polygon(id, polygon));
        log::info!("Gebäude {id} hinzugefügt");
        id
    }

    /// Alle Trassen außer der mit `id`.
    pub fn routes_except(&self, id: u64) -> Vec<Route> {
        self.snapshot
            .routes
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect()
    }
}
