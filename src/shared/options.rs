//! Zentrale Konfiguration für den Trassenplaner.
//!
//! `PlannerOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};
use utility_route_kernel::clearance::DEFAULT_RULES;
use utility_route_kernel::{
    ClearanceMatrix, ClearanceRule, KernelConfig, SystemProfile, SystemProfiles, SystemType,
    DEFAULT_PERIMETER_TOLERANCE, DEFAULT_SNAP_RADIUS,
};

// ── Werkzeuge ───────────────────────────────────────────────────────

/// Snap-Radius in Metern: Klick innerhalb dieses Radius rastet an Wand / Leitung / Kante ein.
pub const SNAP_RADIUS_M: f64 = DEFAULT_SNAP_RADIUS;
/// Ziel gilt innerhalb dieser Toleranz als auf dem Gebäude-Umfang liegend (Meter).
pub const PERIMETER_TOLERANCE_M: f64 = DEFAULT_PERIMETER_TOLERANCE;
/// Klick innerhalb dieses Radius um den ersten Eckpunkt schließt den Grundriss (Meter).
pub const BUILDING_CLOSE_RADIUS_M: f64 = 1.5;

// ── Speichern ───────────────────────────────────────────────────────

/// Verhalten beim Speichern einer Trasse mit Abstandsverletzungen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitPolicy {
    /// Verletzungen verhindern das Speichern
    Block,
    /// Verletzungen werden gemeldet, gespeichert wird trotzdem
    #[default]
    Warn,
}

// ── Systemprofile ───────────────────────────────────────────────────

/// Profil-Eintrag für ein System, als TOML-Tabelle `[[profiles]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    /// Systemtyp, für den der Eintrag gilt
    pub system: SystemType,
    /// Als Doppelleitung verlegen
    pub dual_line: bool,
    /// Achsabstand der Doppelleitung in Metern
    #[serde(default)]
    pub spacing_m: f64,
    /// Senkrechter Wandabstand vor dem ersten Knick in Metern
    pub standoff_m: f64,
}

impl ProfileEntry {
    fn profile(&self) -> SystemProfile {
        SystemProfile {
            dual_line: self.dual_line,
            spacing_m: self.spacing_m,
            standoff_m: self.standoff_m,
        }
    }
}

fn default_profiles() -> Vec<ProfileEntry> {
    SystemProfiles::default()
        .iter()
        .map(|(system, p)| ProfileEntry {
            system,
            dual_line: p.dual_line,
            spacing_m: p.spacing_m,
            standoff_m: p.standoff_m,
        })
        .collect()
}

fn default_clearance() -> Vec<ClearanceRule> {
    DEFAULT_RULES.to_vec()
}

/// Serde-Default für `perimeter_tolerance_m` (Abwärtskompatibilität).
fn default_perimeter_tolerance() -> f64 {
    PERIMETER_TOLERANCE_M
}

/// Serde-Default für `building_close_radius_m` (Abwärtskompatibilität).
fn default_building_close_radius() -> f64 {
    BUILDING_CLOSE_RADIUS_M
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Planer-Optionen.
/// Wird als `utility_route_planner.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerOptions {
    // ── Werkzeuge ───────────────────────────────────────────────
    /// Snap-Radius in Metern für Anschluss-Suche
    pub snap_radius_m: f64,
    /// Umfangs-Toleranz für die Gebäude-Umfahrung
    #[serde(default = "default_perimeter_tolerance")]
    pub perimeter_tolerance_m: f64,
    /// Schließradius beim Zeichnen von Grundrissen
    #[serde(default = "default_building_close_radius")]
    pub building_close_radius_m: f64,
    // ── Speichern ───────────────────────────────────────────────
    /// Umgang mit Abstandsverletzungen beim Speichern
    #[serde(default)]
    pub commit_policy: CommitPolicy,
    // ── Regelwerk ───────────────────────────────────────────────
    /// Profile je System; fehlende Systeme behalten die Werkseinstellung
    #[serde(default = "default_profiles")]
    pub profiles: Vec<ProfileEntry>,
    /// Mindestabstände; ein fehlendes Paar bedeutet keine Vorgabe
    #[serde(default = "default_clearance")]
    pub clearance: Vec<ClearanceRule>,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            snap_radius_m: SNAP_RADIUS_M,
            perimeter_tolerance_m: PERIMETER_TOLERANCE_M,
            building_close_radius_m: BUILDING_CLOSE_RADIUS_M,
            commit_policy: CommitPolicy::default(),
            profiles: default_profiles(),
            clearance: default_clearance(),
        }
    }
}

impl PlannerOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts.sanitized()
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("utility_route_planner"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("utility_route_planner.toml")
    }

    /// Ersetzt unbrauchbare Zahlenwerte durch Standardwerte.
    pub fn sanitized(mut self) -> Self {
        if !self.snap_radius_m.is_finite() || self.snap_radius_m < 0.0 {
            log::warn!("Ungültiger Snap-Radius {}, verwende {SNAP_RADIUS_M}", self.snap_radius_m);
            self.snap_radius_m = SNAP_RADIUS_M;
        }
        if !self.perimeter_tolerance_m.is_finite() || self.perimeter_tolerance_m < 0.0 {
            log::warn!(
                "Ungültige Umfangs-Toleranz {}, verwende {PERIMETER_TOLERANCE_M}",
                self.perimeter_tolerance_m
            );
            self.perimeter_tolerance_m = PERIMETER_TOLERANCE_M;
        }
        if !self.building_close_radius_m.is_finite() || self.building_close_radius_m <= 0.0 {
            self.building_close_radius_m = BUILDING_CLOSE_RADIUS_M;
        }
        self.profiles.retain(|entry| {
            let valid = entry.spacing_m.is_finite()
                && entry.spacing_m >= 0.0
                && entry.standoff_m.is_finite()
                && entry.standoff_m >= 0.0;
            if !valid {
                log::warn!("Profil für {} ignoriert: ungültige Werte", entry.system);
            }
            valid
        });
        self
    }

    /// Baut die unveränderliche Kernel-Konfiguration.
    pub fn to_kernel_config(&self) -> KernelConfig {
        let profiles = self
            .profiles
            .iter()
            .fold(SystemProfiles::default(), |acc, entry| {
                acc.with(entry.system, entry.profile())
            });

        KernelConfig {
            snap_radius_m: self.snap_radius_m,
            perimeter_tolerance_m: self.perimeter_tolerance_m,
            profiles,
            clearance: ClearanceMatrix::from_rules(self.clearance.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_kernel_defaults() {
        let config = PlannerOptions::default().to_kernel_config();
        assert_eq!(config, KernelConfig::default());
    }

    #[test]
    fn toml_roundtrip_keeps_rules_and_profiles() {
        let mut options = PlannerOptions::default();
        options.commit_policy = CommitPolicy::Block;
        options.clearance.retain(|r| r.a != SystemType::Power && r.b != SystemType::Power);

        let text = toml::to_string_pretty(&options).expect("serialisierbar");
        let back: PlannerOptions = toml::from_str(&text).expect("lesbar");

        assert_eq!(back, options);
        assert!(text.contains("[[profiles]]"));
        assert!(text.contains("[[clearance]]"));
    }

    #[test]
    fn partial_file_falls_back_per_field() {
        let options: PlannerOptions = toml::from_str(
            r#"
            snap_radius_m = 12.5

            [[profiles]]
            system = "telecom"
            dual_line = true
            spacing_m = 0.3
            standoff_m = 2.0
            "#,
        )
        .expect("lesbar");

        assert_eq!(options.commit_policy, CommitPolicy::Warn);
        assert_eq!(options.clearance.len(), 15);

        let config = options.to_kernel_config();
        assert_eq!(config.snap_radius_m, 12.5);
        assert!(config.profiles.get(SystemType::Telecom).dual_line);
        assert_eq!(config.profiles.get(SystemType::Water).spacing_m, 1.5);
    }

    #[test]
    fn invalid_values_are_replaced() {
        let mut options = PlannerOptions {
            snap_radius_m: -3.0,
            ..PlannerOptions::default()
        };
        options.profiles.push(ProfileEntry {
            system: SystemType::Storm,
            dual_line: false,
            spacing_m: 0.0,
            standoff_m: f64::NAN,
        });

        let options = options.sanitized();
        assert_eq!(options.snap_radius_m, SNAP_RADIUS_M);
        assert_eq!(options.profiles.len(), 6);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("utility_route_planner_missing_options.toml");
        let _ = std::fs::remove_file(&path);
        assert_eq!(PlannerOptions::load_from_file(&path), PlannerOptions::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "utility_route_planner_options_{}.toml",
            std::process::id()
        ));
        let options = PlannerOptions {
            snap_radius_m: 8.0,
            ..PlannerOptions::default()
        };
        options.save_to_file(&path).expect("speicherbar");
        let loaded = PlannerOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, options);
    }
}
