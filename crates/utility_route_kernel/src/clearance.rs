//! Mindestabstands-Prüfung zwischen Trassen verschiedener Systeme.
//!
//! Die Prüfung ist beratend: sie zählt alle Unterschreitungen auf und
//! bricht nie vorzeitig ab. Ob trotzdem gespeichert wird, entscheidet der
//! Aufrufer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::geometry::segment_to_segment_distance;
use crate::model::{Route, SystemType};

/// Eine Abstandsregel für ein ungeordnetes Paar verschiedener Systeme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearanceRule {
    /// Erstes System
    pub a: SystemType,
    /// Zweites System
    pub b: SystemType,
    /// Mindestabstand in Metern
    pub min_distance_m: f64,
}

impl ClearanceRule {
    /// Erstellt eine neue Regel.
    pub const fn new(a: SystemType, b: SystemType, min_distance_m: f64) -> Self {
        Self { a, b, min_distance_m }
    }
}

/// Regelwerk-Vorgabe: alle 15 Paare der 6 Systemtypen.
pub const DEFAULT_RULES: [ClearanceRule; 15] = [
    ClearanceRule::new(SystemType::Water, SystemType::Sewerage, 5.0),
    ClearanceRule::new(SystemType::Water, SystemType::Storm, 1.5),
    ClearanceRule::new(SystemType::Water, SystemType::Heating, 1.5),
    ClearanceRule::new(SystemType::Water, SystemType::Power, 1.0),
    ClearanceRule::new(SystemType::Water, SystemType::Telecom, 0.5),
    ClearanceRule::new(SystemType::Sewerage, SystemType::Storm, 0.4),
    ClearanceRule::new(SystemType::Sewerage, SystemType::Heating, 1.0),
    ClearanceRule::new(SystemType::Sewerage, SystemType::Power, 0.5),
    ClearanceRule::new(SystemType::Sewerage, SystemType::Telecom, 0.5),
    ClearanceRule::new(SystemType::Storm, SystemType::Heating, 1.0),
    ClearanceRule::new(SystemType::Storm, SystemType::Power, 0.5),
    ClearanceRule::new(SystemType::Storm, SystemType::Telecom, 0.5),
    ClearanceRule::new(SystemType::Heating, SystemType::Power, 2.0),
    ClearanceRule::new(SystemType::Heating, SystemType::Telecom, 1.0),
    ClearanceRule::new(SystemType::Power, SystemType::Telecom, 0.5),
];

/// Symmetrische Abstandsmatrix; fehlender Eintrag = keine Vorgabe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ClearanceRule>", into = "Vec<ClearanceRule>")]
pub struct ClearanceMatrix {
    rules: IndexMap<(SystemType, SystemType), f64>,
}

impl Default for ClearanceMatrix {
    fn default() -> Self {
        Self::from_rules(DEFAULT_RULES)
    }
}

fn pair_key(a: SystemType, b: SystemType) -> (SystemType, SystemType) {
    if a <= b { (a, b) } else { (b, a) }
}

impl ClearanceMatrix {
    /// Leere Matrix ohne jede Vorgabe.
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Baut eine Matrix aus Regeln; spätere Regeln überschreiben frühere.
    pub fn from_rules(rules: impl IntoIterator<Item = ClearanceRule>) -> Self {
        let mut matrix = Self::empty();
        for rule in rules {
            matrix.set(rule.a, rule.b, rule.min_distance_m);
        }
        matrix
    }

    /// Setzt den Mindestabstand eines Paars.
    ///
    /// Gleiche Systeme und negative / nicht-endliche Werte werden verworfen
    /// (Rückgabe `false`).
    pub fn set(&mut self, a: SystemType, b: SystemType, min_distance_m: f64) -> bool {
        if a == b {
            log::warn!("Abstandsregel {a} ↔ {b} ignoriert: gleiches System");
            return false;
        }
        if !min_distance_m.is_finite() || min_distance_m < 0.0 {
            log::warn!("Abstandsregel {a} ↔ {b} ignoriert: ungültiger Wert {min_distance_m}");
            return false;
        }
        self.rules.insert(pair_key(a, b), min_distance_m);
        true
    }

    /// Entfernt die Vorgabe eines Paars.
    pub fn remove(&mut self, a: SystemType, b: SystemType) -> bool {
        self.rules.shift_remove(&pair_key(a, b)).is_some()
    }

    /// Mindestabstand eines Paars (reihenfolge-unabhängig).
    pub fn get(&self, a: SystemType, b: SystemType) -> Option<f64> {
        self.rules.get(&pair_key(a, b)).copied()
    }

    /// Mindestabstand oder 0 bei fehlender Vorgabe.
    pub fn required(&self, a: SystemType, b: SystemType) -> f64 {
        self.get(a, b).unwrap_or(0.0)
    }

    /// Anzahl der Regeln.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Keine Regeln vorhanden?
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Alle Regeln in Einfüge-Reihenfolge.
    pub fn rules(&self) -> Vec<ClearanceRule> {
        self.rules
            .iter()
            .map(|(&(a, b), &d)| ClearanceRule::new(a, b, d))
            .collect()
    }
}

impl From<Vec<ClearanceRule>> for ClearanceMatrix {
    fn from(rules: Vec<ClearanceRule>) -> Self {
        Self::from_rules(rules)
    }
}

impl From<ClearanceMatrix> for Vec<ClearanceRule> {
    fn from(matrix: ClearanceMatrix) -> Self {
        matrix.rules()
    }
}

/// Eine Unterschreitung des Mindestabstands zwischen zwei Segmenten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// System der geprüften Trasse
    pub candidate_system: SystemType,
    /// System der bestehenden Trasse
    pub existing_system: SystemType,
    /// ID der bestehenden Trasse (falls bekannt)
    pub existing_route_id: Option<u64>,
    /// Segment-Index in der geprüften Trasse
    pub candidate_segment: usize,
    /// Segment-Index in der bestehenden Trasse
    pub existing_segment: usize,
    /// Gemessener Abstand in Metern
    pub distance_m: f64,
    /// Geforderter Mindestabstand in Metern
    pub required_m: f64,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mindestabstand {} ↔ {} unterschritten: {:.2} m < {:.2} m",
            self.candidate_system, self.existing_system, self.distance_m, self.required_m
        )?;
        match self.existing_route_id {
            Some(id) => write!(
                f,
                " (Segment {} gegen Trasse #{id}, Segment {})",
                self.candidate_segment, self.existing_segment
            ),
            None => write!(
                f,
                " (Segment {} gegen Segment {})",
                self.candidate_segment, self.existing_segment
            ),
        }
    }
}

/// Prüft eine Kandidaten-Trasse gegen alle bestehenden Trassen.
///
/// Trassen desselben Systems und Paare ohne (oder mit 0) Vorgabe werden
/// übersprungen. Jedes Segment-Paar unter dem Mindestabstand ergibt genau
/// eine [`Violation`].
pub fn validate(
    candidate_system: SystemType,
    candidate_path: &[GeoPoint],
    existing: &[Route],
    matrix: &ClearanceMatrix,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for route in existing {
        check_paths(
            candidate_system,
            candidate_path,
            route.system,
            &route.path,
            Some(route.id),
            matrix,
            &mut violations,
        );
    }
    if !violations.is_empty() {
        log::debug!(
            "{} Abstandsverletzung(en) für {candidate_system}-Trasse",
            violations.len()
        );
    }
    violations
}

/// Prüft zwei freie Pfade gegeneinander.
pub fn validate_pair(
    a_system: SystemType,
    a_path: &[GeoPoint],
    b_system: SystemType,
    b_path: &[GeoPoint],
    matrix: &ClearanceMatrix,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_paths(a_system, a_path, b_system, b_path, None, matrix, &mut violations);
    violations
}

fn check_paths(
    candidate_system: SystemType,
    candidate_path: &[GeoPoint],
    existing_system: SystemType,
    existing_path: &[GeoPoint],
    existing_route_id: Option<u64>,
    matrix: &ClearanceMatrix,
    out: &mut Vec<Violation>,
) {
    if candidate_system == existing_system {
        return;
    }
    let Some(required_m) = matrix.get(candidate_system, existing_system) else {
        return;
    };
    if required_m <= 0.0 {
        return;
    }

    for (i, c) in candidate_path.windows(2).enumerate() {
        for (j, e) in existing_path.windows(2).enumerate() {
            let distance_m = segment_to_segment_distance(c[0], c[1], e[0], e[1]);
            if distance_m < required_m {
                out.push(Violation {
                    candidate_system,
                    existing_system,
                    existing_route_id,
                    candidate_segment: i,
                    existing_segment: j,
                    distance_m,
                    required_m,
                });
            }
        }
    }
}
