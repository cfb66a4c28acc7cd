//! Trassen-Werkzeug: erster Klick sucht den Anschluss, zweiter Klick setzt
//! das Ziel, danach liegt ein fertiger Entwurf bereit.

use utility_route_kernel::{
    Attachment, AttachmentTarget, GeoPoint, RoutePlanner, SystemType, TargetKind,
};

use super::{PlanningTool, ToolAction, ToolPreview};

#[cfg(test)]
mod tests;

/// Fertig synthetisierte, noch nicht gespeicherte Trasse.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDraft {
    /// Versorgungssystem
    pub system: SystemType,
    /// Rechtwinkliger Pfad
    pub path: Vec<GeoPoint>,
    /// Anschluss am Startpunkt (Gebäude, Hauptleitung oder Trafo-Platz)
    pub attachment: Option<Attachment>,
    /// Anschluss am Ziel (Hauptleitung oder Trafo-Platz)
    pub destination: Option<Attachment>,
}

impl RouteDraft {
    /// ID des Gebäudes, an dem die Trasse hängt.
    pub fn building_id(&self) -> Option<u64> {
        self.targets().find_map(|t| match t {
            AttachmentTarget::Building(id) => Some(id),
            _ => None,
        })
    }

    /// ID der angeschlossenen Hauptleitung.
    pub fn mainline_id(&self) -> Option<u64> {
        self.targets().find_map(|t| match t {
            AttachmentTarget::Mainline(id) => Some(id),
            _ => None,
        })
    }

    /// ID des angeschlossenen Trafo-Platzes.
    pub fn pad_id(&self) -> Option<u64> {
        self.targets().find_map(|t| match t {
            AttachmentTarget::Pad(id) => Some(id),
            _ => None,
        })
    }

    fn targets(&self) -> impl Iterator<Item = AttachmentTarget> + '_ {
        self.attachment
            .iter()
            .chain(self.destination.iter())
            .map(|a| a.target)
    }
}

/// Klick-Phasen des Trassen-Werkzeugs.
#[derive(Debug, Clone, PartialEq)]
enum TracePhase {
    /// Noch kein Klick
    Idle,
    /// Startpunkt gesetzt, Ziel fehlt
    AwaitingSecondPoint {
        start: GeoPoint,
        attachment: Option<Attachment>,
    },
    /// Entwurf vollständig
    Ready(RouteDraft),
}

/// Trassen-Werkzeug
#[derive(Debug, Clone)]
pub struct TraceTool {
    phase: TracePhase,
    /// System der zu zeichnenden Trasse
    pub system: SystemType,
    /// Woran der erste Klick andockt
    pub start_kind: TargetKind,
    /// Woran der zweite Klick andockt (`None` = freier Punkt)
    pub end_kind: Option<TargetKind>,
}

impl TraceTool {
    /// Werkzeug für einen Hausanschluss: Gebäudewand → freier Punkt.
    pub fn new(system: SystemType) -> Self {
        Self {
            phase: TracePhase::Idle,
            system,
            start_kind: TargetKind::Building,
            end_kind: None,
        }
    }

    /// Legt fest, woran Start und Ziel andocken.
    pub fn with_targets(mut self, start_kind: TargetKind, end_kind: Option<TargetKind>) -> Self {
        self.start_kind = start_kind;
        self.end_kind = end_kind;
        self
    }

    /// Fertiger Entwurf, sobald beide Punkte gesetzt sind.
    pub fn execute(&self) -> Option<RouteDraft> {
        match &self.phase {
            TracePhase::Ready(draft) => Some(draft.clone()),
            _ => None,
        }
    }

    /// Zielpunkt für eine Cursor-Position, ggf. an Leitung / Trafo-Kante gerastet.
    fn resolve_destination(
        &self,
        cursor: GeoPoint,
        start: GeoPoint,
        planner: &RoutePlanner<'_>,
    ) -> Option<Attachment> {
        match self.end_kind? {
            // Bei gleich nahen Kanten die zum Start zeigende wählen
            TargetKind::Pad => planner.resolve_pad_towards(cursor, start),
            kind => planner.resolve_attachment(cursor, kind, self.system),
        }
    }

    fn draft(
        &self,
        start: GeoPoint,
        attachment: Option<Attachment>,
        cursor: GeoPoint,
        planner: &RoutePlanner<'_>,
    ) -> RouteDraft {
        let destination = self.resolve_destination(cursor, start, planner);
        let end = destination.map(|d| d.point).unwrap_or(cursor);
        let path = planner.build_route(start, end, self.system, attachment.as_ref());
        RouteDraft {
            system: self.system,
            path,
            attachment,
            destination,
        }
    }
}

impl PlanningTool for TraceTool {
    fn name(&self) -> &str {
        "Trasse"
    }

    fn status_text(&self) -> &str {
        match self.phase {
            TracePhase::Idle => "Anschlusspunkt klicken",
            TracePhase::AwaitingSecondPoint { .. } => "Zielpunkt klicken",
            TracePhase::Ready(_) => "Bereit: Enter zum Speichern, Escape zum Abbrechen",
        }
    }

    fn on_click(&mut self, pos: GeoPoint, planner: &RoutePlanner<'_>) -> ToolAction {
        match &self.phase {
            TracePhase::Idle | TracePhase::Ready(_) => {
                let attachment = planner.resolve_attachment(pos, self.start_kind, self.system);
                if attachment.is_none() {
                    log::debug!("Kein Anschluss im Snap-Radius, freier Startpunkt");
                }
                let start = attachment.map(|a| a.point).unwrap_or(pos);
                self.phase = TracePhase::AwaitingSecondPoint { start, attachment };
                ToolAction::Continue
            }
            TracePhase::AwaitingSecondPoint { start, attachment } => {
                let draft = self.draft(*start, *attachment, pos, planner);
                self.phase = TracePhase::Ready(draft);
                ToolAction::ReadyToExecute
            }
        }
    }

    fn preview(&self, cursor: GeoPoint, planner: &RoutePlanner<'_>) -> ToolPreview {
        let draft = match &self.phase {
            TracePhase::Idle => {
                let snapped = planner
                    .resolve_attachment(cursor, self.start_kind, self.system)
                    .map(|a| a.point)
                    .unwrap_or(cursor);
                return ToolPreview {
                    path: vec![snapped],
                    ..ToolPreview::default()
                };
            }
            TracePhase::AwaitingSecondPoint { start, attachment } => {
                self.draft(*start, *attachment, cursor, planner)
            }
            TracePhase::Ready(draft) => draft.clone(),
        };

        let conductors = planner.offset_for_dual_line(&draft.path, self.system);
        ToolPreview {
            path: draft.path,
            conductors,
            closed: false,
        }
    }

    fn reset(&mut self) {
        self.phase = TracePhase::Idle;
    }

    fn is_ready(&self) -> bool {
        matches!(self.phase, TracePhase::Ready(_))
    }

    fn has_pending_input(&self) -> bool {
        !matches!(self.phase, TracePhase::Idle)
    }
}
