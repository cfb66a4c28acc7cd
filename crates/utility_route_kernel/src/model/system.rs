//! Systemtypen der Versorgungsnetze und ihre statischen Eigenschaften.

use serde::{Deserialize, Serialize};

/// Versorgungssystem einer Trasse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemType {
    /// Trinkwasser
    Water,
    /// Schmutzwasser-Kanal
    Sewerage,
    /// Regenwasser-Kanal
    Storm,
    /// Fernwärme
    Heating,
    /// Stromkabel
    Power,
    /// Fernmeldekabel
    Telecom,
}

impl SystemType {
    /// Alle Systemtypen in fester Reihenfolge.
    pub const ALL: [SystemType; 6] = [
        SystemType::Water,
        SystemType::Sewerage,
        SystemType::Storm,
        SystemType::Heating,
        SystemType::Power,
        SystemType::Telecom,
    ];

    /// Bezeichner wie in Projekt- und Optionsdateien.
    pub fn key(self) -> &'static str {
        match self {
            SystemType::Water => "water",
            SystemType::Sewerage => "sewerage",
            SystemType::Storm => "storm",
            SystemType::Heating => "heating",
            SystemType::Power => "power",
            SystemType::Telecom => "telecom",
        }
    }

    /// Parst einen Bezeichner (Groß-/Kleinschreibung egal).
    pub fn from_key(key: &str) -> Option<SystemType> {
        SystemType::ALL
            .into_iter()
            .find(|s| s.key().eq_ignore_ascii_case(key.trim()))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Physikalische Parameter eines Systemtyps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemProfile {
    /// Wird als zwei parallele Leitungen verlegt
    pub dual_line: bool,
    /// Achsabstand der beiden Leitungen (Meter), nur bei `dual_line`
    pub spacing_m: f64,
    /// Senkrechter Abstand von der Wand vor dem ersten Knick (Meter)
    pub standoff_m: f64,
}

/// Standard-Wandabstand vor dem ersten Knick.
pub const DEFAULT_STANDOFF: f64 = 5.0;
/// Wandabstand für Schmutzwasser-Kanäle.
pub const SEWERAGE_STANDOFF: f64 = 3.0;

impl SystemProfile {
    /// Werkseinstellung für einen Systemtyp.
    pub fn default_for(system: SystemType) -> Self {
        match system {
            SystemType::Water => Self {
                dual_line: true,
                spacing_m: 1.5,
                standoff_m: DEFAULT_STANDOFF,
            },
            SystemType::Heating => Self {
                dual_line: true,
                spacing_m: 1.0,
                standoff_m: DEFAULT_STANDOFF,
            },
            SystemType::Sewerage => Self {
                dual_line: false,
                spacing_m: 0.0,
                standoff_m: SEWERAGE_STANDOFF,
            },
            SystemType::Storm | SystemType::Power | SystemType::Telecom => Self {
                dual_line: false,
                spacing_m: 0.0,
                standoff_m: DEFAULT_STANDOFF,
            },
        }
    }
}

/// Unveränderliche Tabelle `SystemType → SystemProfile`.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemProfiles {
    profiles: [SystemProfile; 6],
}

impl Default for SystemProfiles {
    fn default() -> Self {
        Self {
            profiles: SystemType::ALL.map(SystemProfile::default_for),
        }
    }
}

impl SystemProfiles {
    /// Profil eines Systemtyps.
    pub fn get(&self, system: SystemType) -> SystemProfile {
        self.profiles[system.index()]
    }

    /// Liefert eine Kopie mit überschriebenem Profil (Builder-Stil).
    pub fn with(mut self, system: SystemType, profile: SystemProfile) -> Self {
        self.profiles[system.index()] = profile;
        self
    }

    /// Iterator über alle Systemtypen mit Profil.
    pub fn iter(&self) -> impl Iterator<Item = (SystemType, SystemProfile)> + '_ {
        SystemType::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_and_heating_are_dual() {
        let profiles = SystemProfiles::default();
        let dual: Vec<SystemType> = profiles
            .iter()
            .filter(|(_, p)| p.dual_line)
            .map(|(s, _)| s)
            .collect();
        assert_eq!(dual, vec![SystemType::Water, SystemType::Heating]);
    }

    #[test]
    fn sewerage_uses_short_standoff() {
        let profiles = SystemProfiles::default();
        assert_eq!(profiles.get(SystemType::Sewerage).standoff_m, 3.0);
        assert_eq!(profiles.get(SystemType::Water).standoff_m, 5.0);
    }

    #[test]
    fn override_replaces_single_profile() {
        let custom = SystemProfile {
            dual_line: true,
            spacing_m: 0.4,
            standoff_m: 2.0,
        };
        let profiles = SystemProfiles::default().with(SystemType::Telecom, custom);
        assert_eq!(profiles.get(SystemType::Telecom), custom);
        assert!(!profiles.get(SystemType::Power).dual_line);
    }

    #[test]
    fn keys_roundtrip() {
        for system in SystemType::ALL {
            assert_eq!(SystemType::from_key(system.key()), Some(system));
        }
        assert_eq!(SystemType::from_key(" Heating "), Some(SystemType::Heating));
        assert_eq!(SystemType::from_key("gas"), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&SystemType::Sewerage).expect("serialisierbar");
        assert_eq!(json, "\"sewerage\"");
    }
}
