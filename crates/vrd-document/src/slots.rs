//! Typed slots and the static observation dispatch table.
//!
//! Classification never switches on raw code strings inline; every
//! recognized observation code routes through [`OBSERVATION_DISPATCH`] to an
//! [`ObservationSlot`], so the mapping is a single exhaustively-checkable
//! table.

use vrd_core::ResourceId;

/// Whether a graph is a full document or one of the scoped projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Full,
    Scoped,
}

/// The semantic slot an observation code routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationSlot {
    MannerOfDeath,
    DeathDate,
    CauseOfDeathPart1,
    TobaccoUse,
    PregnancyStatus,
    ExaminerContacted,
    AutopsyPerformed,
    AutopsyResultsAvailable,
    InjuryIncident,
    DispositionMethod,
    AgeAtDeath,
    EducationLevel,
    UsualWork,
    MilitaryService,
    BirthRecordIdentifier,
    EntityAxisCause,
    RecordAxisCause,
}

/// The fixed code → slot dispatch table. Codes not in this table are
/// ignored during classification.
pub const OBSERVATION_DISPATCH: &[(&str, ObservationSlot)] = &[
    ("69449-7", ObservationSlot::MannerOfDeath),
    ("81956-5", ObservationSlot::DeathDate),
    ("69453-9", ObservationSlot::CauseOfDeathPart1),
    ("69443-0", ObservationSlot::TobaccoUse),
    ("69442-2", ObservationSlot::PregnancyStatus),
    ("74497-9", ObservationSlot::ExaminerContacted),
    ("85699-7", ObservationSlot::AutopsyPerformed),
    ("69436-4", ObservationSlot::AutopsyResultsAvailable),
    ("11374-6", ObservationSlot::InjuryIncident),
    ("80905-3", ObservationSlot::DispositionMethod),
    ("39016-1", ObservationSlot::AgeAtDeath),
    ("80913-7", ObservationSlot::EducationLevel),
    ("21843-8", ObservationSlot::UsualWork),
    ("55280-2", ObservationSlot::MilitaryService),
    ("BR", ObservationSlot::BirthRecordIdentifier),
    ("80356-9", ObservationSlot::EntityAxisCause),
    ("80357-7", ObservationSlot::RecordAxisCause),
];

/// Component code carrying the Part I line number on a cause observation.
pub const LINE_NUMBER_COMPONENT: &str = "lineNumber";

/// Route an observation code to its slot.
pub fn classify_observation_code(code: &str) -> Option<ObservationSlot> {
    OBSERVATION_DISPATCH
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, slot)| *slot)
}

/// Every typed slot of a resolved document.
///
/// Ids, not owned resources: the graph stays the single owner and slots are
/// the cross-link index over it. Axis cause lists keep original bundle
/// order.
#[derive(Debug, Clone)]
pub struct ResolvedSlots {
    pub kind: DocumentKind,
    pub composition: Option<ResourceId>,
    pub decedent: Option<ResourceId>,
    pub certifier: Option<ResourceId>,
    pub certification: Option<ResourceId>,
    pub manner_of_death: Option<ResourceId>,
    pub death_date: Option<ResourceId>,
    /// Part I cause observations by line number (1–4 → index 0–3).
    pub cause_part1: [Option<ResourceId>; 4],
    pub tobacco_use: Option<ResourceId>,
    pub pregnancy_status: Option<ResourceId>,
    pub examiner_contacted: Option<ResourceId>,
    pub autopsy_performed: Option<ResourceId>,
    pub autopsy_results_available: Option<ResourceId>,
    pub injury_incident: Option<ResourceId>,
    pub disposition_method: Option<ResourceId>,
    pub age_at_death: Option<ResourceId>,
    pub education_level: Option<ResourceId>,
    pub usual_work: Option<ResourceId>,
    pub military_service: Option<ResourceId>,
    pub birth_record_identifier: Option<ResourceId>,
    pub entity_axis: Vec<ResourceId>,
    pub record_axis: Vec<ResourceId>,
    pub father: Option<ResourceId>,
    pub mother: Option<ResourceId>,
    pub spouse: Option<ResourceId>,
    pub death_location: Option<ResourceId>,
    pub disposition_location: Option<ResourceId>,
    pub injury_location: Option<ResourceId>,
    pub funeral_home: Option<ResourceId>,
    pub pathway_list: Option<ResourceId>,
    /// Pathway conditions in slot order, compacted (no empty interior slots).
    pub pathway: Vec<ResourceId>,
    pub contributing: Option<ResourceId>,
    /// Derived display identifier, recomputed on successful full-document
    /// resolution.
    pub display_identifier: Option<String>,
}

impl ResolvedSlots {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            composition: None,
            decedent: None,
            certifier: None,
            certification: None,
            manner_of_death: None,
            death_date: None,
            cause_part1: [None; 4],
            tobacco_use: None,
            pregnancy_status: None,
            examiner_contacted: None,
            autopsy_performed: None,
            autopsy_results_available: None,
            injury_incident: None,
            disposition_method: None,
            age_at_death: None,
            education_level: None,
            usual_work: None,
            military_service: None,
            birth_record_identifier: None,
            entity_axis: Vec::new(),
            record_axis: Vec::new(),
            father: None,
            mother: None,
            spouse: None,
            death_location: None,
            disposition_location: None,
            injury_location: None,
            funeral_home: None,
            pathway_list: None,
            pathway: Vec::new(),
            contributing: None,
            display_identifier: None,
        }
    }

    /// Assign a single-valued observation slot, keeping the first claimant.
    pub(crate) fn assign(&mut self, slot: ObservationSlot, id: ResourceId) {
        let target = match slot {
            ObservationSlot::MannerOfDeath => &mut self.manner_of_death,
            ObservationSlot::DeathDate => &mut self.death_date,
            ObservationSlot::TobaccoUse => &mut self.tobacco_use,
            ObservationSlot::PregnancyStatus => &mut self.pregnancy_status,
            ObservationSlot::ExaminerContacted => &mut self.examiner_contacted,
            ObservationSlot::AutopsyPerformed => &mut self.autopsy_performed,
            ObservationSlot::AutopsyResultsAvailable => &mut self.autopsy_results_available,
            ObservationSlot::InjuryIncident => &mut self.injury_incident,
            ObservationSlot::DispositionMethod => &mut self.disposition_method,
            ObservationSlot::AgeAtDeath => &mut self.age_at_death,
            ObservationSlot::EducationLevel => &mut self.education_level,
            ObservationSlot::UsualWork => &mut self.usual_work,
            ObservationSlot::MilitaryService => &mut self.military_service,
            ObservationSlot::BirthRecordIdentifier => &mut self.birth_record_identifier,
            // Multi-valued and line-numbered slots are handled by the caller.
            ObservationSlot::CauseOfDeathPart1
            | ObservationSlot::EntityAxisCause
            | ObservationSlot::RecordAxisCause => return,
        };
        if let Some(existing) = target {
            log::warn!("slot {slot:?} already bound to {existing}; ignoring duplicate {id}");
            return;
        }
        *target = Some(id);
    }
}
