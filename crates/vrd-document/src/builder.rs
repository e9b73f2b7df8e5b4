//! Document assembly: anchor resources, lazy auxiliary resources, and the
//! typed field accessors over the resolved slots.
//!
//! Builder mutations never fail. Anchor resources (composition, decedent,
//! certifier, certification) exist from document creation; auxiliary
//! resources are created on the first write of a corresponding field and
//! mutated in place afterwards. Value-level validation is not done here;
//! invalid codes are stored as opaque data for an external layer to judge.

use vrd_core::concept::{SYSTEM_LOCATION_TYPE, SYSTEM_LOINC, SYSTEM_ROLE_CODE, SYSTEM_SNOMED};
use vrd_core::graph::extension::{extension_or_insert, find_extension};
use vrd_core::partial::{
    self, effective_date_part, effective_time, new_partial_date_time, DatePart, PartialField,
    URL_PARTIAL_DATE_TIME,
};
use vrd_core::profiles;
use vrd_core::{
    Composition, Concept, ConceptCatalog, Condition, Extension, ExtensionValue, HumanName,
    GraphKind, Location, Observation, ObservationValue, Organization, Patient, Practitioner,
    Procedure, Reference, RelatedPerson, Resource, ResourceGraph, ResourceId, SectionCode,
};

use crate::codec;
use crate::error::DocumentError;
use crate::pathway::{self, CauseLine};
use crate::project::{self, ProjectionKind};
use crate::resolver;
use crate::slots::{DocumentKind, ResolvedSlots};

/// Semantic role of a lazily-created auxiliary resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxiliaryRole {
    MannerOfDeath,
    DeathDate,
    TobaccoUse,
    PregnancyStatus,
    ExaminerContacted,
    AutopsyPerformed,
    AutopsyResultsAvailable,
    InjuryIncident,
    DispositionMethod,
    AgeAtDeath,
    DeathLocation,
    DispositionLocation,
    InjuryLocation,
    Father,
    Mother,
    Spouse,
    FuneralHome,
}

impl AuxiliaryRole {
    /// The composition section this role's resource is registered under.
    pub fn section(self) -> SectionCode {
        match self {
            AuxiliaryRole::MannerOfDeath => SectionCode::DeathCertification,
            AuxiliaryRole::DeathDate
            | AuxiliaryRole::TobaccoUse
            | AuxiliaryRole::PregnancyStatus
            | AuxiliaryRole::ExaminerContacted
            | AuxiliaryRole::AutopsyPerformed
            | AuxiliaryRole::AutopsyResultsAvailable
            | AuxiliaryRole::InjuryIncident
            | AuxiliaryRole::DeathLocation
            | AuxiliaryRole::InjuryLocation => SectionCode::DeathInvestigation,
            AuxiliaryRole::DispositionMethod
            | AuxiliaryRole::DispositionLocation
            | AuxiliaryRole::FuneralHome => SectionCode::DecedentDisposition,
            AuxiliaryRole::AgeAtDeath
            | AuxiliaryRole::Father
            | AuxiliaryRole::Mother
            | AuxiliaryRole::Spouse => SectionCode::DecedentDemographics,
        }
    }

    /// The primary code of the role's observation, when the role is one.
    fn observation_code(self) -> Option<&'static str> {
        match self {
            AuxiliaryRole::MannerOfDeath => Some("69449-7"),
            AuxiliaryRole::DeathDate => Some("81956-5"),
            AuxiliaryRole::TobaccoUse => Some("69443-0"),
            AuxiliaryRole::PregnancyStatus => Some("69442-2"),
            AuxiliaryRole::ExaminerContacted => Some("74497-9"),
            AuxiliaryRole::AutopsyPerformed => Some("85699-7"),
            AuxiliaryRole::AutopsyResultsAvailable => Some("69436-4"),
            AuxiliaryRole::InjuryIncident => Some("11374-6"),
            AuxiliaryRole::DispositionMethod => Some("80905-3"),
            AuxiliaryRole::AgeAtDeath => Some("39016-1"),
            _ => None,
        }
    }
}

/// A death certificate document: the resource graph, its resolved-slot
/// index, and the injected concept catalog.
///
/// Single-threaded and in-memory; each instance exclusively owns its graph
/// and slot cache. Callers needing shared access serialize it externally.
#[derive(Debug, Clone)]
pub struct DeathDocument {
    graph: ResourceGraph,
    slots: ResolvedSlots,
    catalog: ConceptCatalog,
}

impl DeathDocument {
    /// Assemble a fresh empty document: composition, placeholder decedent,
    /// certifier and death certification, all cross-referenced and
    /// registered in their sections. Never fails.
    pub fn new(catalog: ConceptCatalog) -> Self {
        let mut graph = ResourceGraph::new(GraphKind::Document);
        graph
            .profiles
            .push(profiles::DEATH_CERTIFICATE_DOCUMENT.to_string());

        let mut decedent = Patient::new();
        decedent.profiles.push(profiles::DECEDENT.to_string());
        let decedent_ref = Reference::urn(decedent.id);

        let mut certifier = Practitioner::new();
        certifier.profiles.push(profiles::CERTIFIER.to_string());
        let certifier_ref = Reference::urn(certifier.id);

        let mut certification = Procedure::new(
            Concept::coded(SYSTEM_SNOMED, "308646001").with_display("Death certification"),
        );
        certification
            .profiles
            .push(profiles::DEATH_CERTIFICATION.to_string());
        certification.subject = Some(decedent_ref.clone());
        certification.performer = Some(certifier_ref.clone());

        let mut composition = Composition::new();
        composition
            .profiles
            .push(profiles::DEATH_CERTIFICATE.to_string());
        composition.subject = Some(decedent_ref.clone());
        composition.attester = Some(certifier_ref.clone());
        composition.register(SectionCode::DecedentDemographics, decedent_ref);
        composition.register(SectionCode::DeathCertification, certifier_ref);
        composition.register(
            SectionCode::DeathCertification,
            Reference::urn(certification.id),
        );

        let mut slots = ResolvedSlots::new(DocumentKind::Full);
        slots.composition = Some(composition.id);
        slots.decedent = Some(decedent.id);
        slots.certifier = Some(certifier.id);
        slots.certification = Some(certification.id);

        graph.push(Resource::Composition(composition));
        graph.push(Resource::Patient(decedent));
        graph.push(Resource::Practitioner(certifier));
        graph.push(Resource::Procedure(certification));

        Self {
            graph,
            slots,
            catalog,
        }
    }

    /// Resolve a previously-serialized graph into a document.
    pub fn parse(
        bytes: &[u8],
        permissive: bool,
        catalog: ConceptCatalog,
    ) -> Result<Self, DocumentError> {
        let graph = codec::from_json(bytes, permissive)?;
        let slots = resolver::resolve(&graph)?;
        Ok(Self {
            graph,
            slots,
            catalog,
        })
    }

    /// Serialize the graph to JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, DocumentError> {
        codec::to_json(&self.graph)
    }

    /// Derive a scoped projection of this document.
    pub fn project(&self, kind: ProjectionKind, alias_indicator: bool) -> ResourceGraph {
        project::project(&self.graph, &self.slots, kind, alias_indicator)
    }

    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    pub fn slots(&self) -> &ResolvedSlots {
        &self.slots
    }

    pub fn catalog(&self) -> &ConceptCatalog {
        &self.catalog
    }

    pub fn into_graph(self) -> ResourceGraph {
        self.graph
    }

    // --- Auxiliary resource attachment ---

    fn slot_of(&mut self, role: AuxiliaryRole) -> &mut Option<ResourceId> {
        match role {
            AuxiliaryRole::MannerOfDeath => &mut self.slots.manner_of_death,
            AuxiliaryRole::DeathDate => &mut self.slots.death_date,
            AuxiliaryRole::TobaccoUse => &mut self.slots.tobacco_use,
            AuxiliaryRole::PregnancyStatus => &mut self.slots.pregnancy_status,
            AuxiliaryRole::ExaminerContacted => &mut self.slots.examiner_contacted,
            AuxiliaryRole::AutopsyPerformed => &mut self.slots.autopsy_performed,
            AuxiliaryRole::AutopsyResultsAvailable => &mut self.slots.autopsy_results_available,
            AuxiliaryRole::InjuryIncident => &mut self.slots.injury_incident,
            AuxiliaryRole::DispositionMethod => &mut self.slots.disposition_method,
            AuxiliaryRole::AgeAtDeath => &mut self.slots.age_at_death,
            AuxiliaryRole::DeathLocation => &mut self.slots.death_location,
            AuxiliaryRole::DispositionLocation => &mut self.slots.disposition_location,
            AuxiliaryRole::InjuryLocation => &mut self.slots.injury_location,
            AuxiliaryRole::Father => &mut self.slots.father,
            AuxiliaryRole::Mother => &mut self.slots.mother,
            AuxiliaryRole::Spouse => &mut self.slots.spouse,
            AuxiliaryRole::FuneralHome => &mut self.slots.funeral_home,
        }
    }

    fn decedent_ref(&self) -> Option<Reference> {
        self.slots.decedent.map(Reference::urn)
    }

    fn build_auxiliary(&self, role: AuxiliaryRole) -> Resource {
        if let Some(code) = role.observation_code() {
            let mut obs = Observation::new(Concept::coded(SYSTEM_LOINC, code));
            obs.subject = self.decedent_ref();
            if role == AuxiliaryRole::DeathDate {
                obs.extensions.push(new_partial_date_time());
            }
            return Resource::Observation(obs);
        }
        match role {
            AuxiliaryRole::DeathLocation => {
                Resource::Location(Location::new(Concept::coded(SYSTEM_LOCATION_TYPE, "death")))
            }
            AuxiliaryRole::DispositionLocation => Resource::Location(Location::new(
                Concept::coded(SYSTEM_LOCATION_TYPE, "disposition"),
            )),
            AuxiliaryRole::InjuryLocation => Resource::Location(Location::new(
                Concept::coded(SYSTEM_LOCATION_TYPE, "injury"),
            )),
            AuxiliaryRole::Father | AuxiliaryRole::Mother | AuxiliaryRole::Spouse => {
                let code = match role {
                    AuxiliaryRole::Father => "FTH",
                    AuxiliaryRole::Mother => "MTH",
                    _ => "SPS",
                };
                let mut relationship = Concept::coded(SYSTEM_ROLE_CODE, code);
                self.catalog.fill_display(&mut relationship);
                Resource::RelatedPerson(RelatedPerson::new(relationship))
            }
            AuxiliaryRole::FuneralHome => {
                let mut org = Organization::new();
                org.profiles.push(profiles::FUNERAL_HOME.to_string());
                Resource::Organization(org)
            }
            _ => unreachable!("observation roles handled above"),
        }
    }

    /// Create-or-return the resource for a semantic role.
    ///
    /// The first call creates the resource and registers it once into the
    /// composition section matching the role; later calls return the
    /// existing resource for in-place mutation.
    pub fn attach(&mut self, role: AuxiliaryRole) -> ResourceId {
        if let Some(id) = *self.slot_of(role) {
            return id;
        }
        let resource = self.build_auxiliary(role);
        let id = resource.id();
        let reference = self.graph.push(resource);
        if let Some(composition) = self.graph.composition_mut() {
            composition.register(role.section(), reference);
        }
        *self.slot_of(role) = Some(id);
        id
    }

    // --- Observation access helpers ---

    fn observation(&self, id: Option<ResourceId>) -> Option<&Observation> {
        match id.and_then(|id| self.graph.get(id)) {
            Some(Resource::Observation(o)) => Some(o),
            _ => None,
        }
    }

    fn observation_for(&mut self, role: AuxiliaryRole) -> &mut Observation {
        let id = self.attach(role);
        match self.graph.get_mut(id) {
            Some(Resource::Observation(o)) => o,
            _ => unreachable!("role {role:?} is backed by an observation"),
        }
    }

    fn coded_value(&self, id: Option<ResourceId>) -> Option<&Concept> {
        self.observation(id)
            .and_then(|o| o.value.as_ref())
            .and_then(ObservationValue::as_concept)
    }

    // --- Identifier block ---

    pub fn certificate_number(&self) -> Option<&str> {
        self.graph.identifier.certificate_number.as_deref()
    }

    pub fn set_certificate_number(&mut self, number: &str) {
        self.graph.identifier.certificate_number = Some(number.to_string());
    }

    pub fn auxiliary_state_id(&self) -> Option<&str> {
        self.graph.identifier.auxiliary_state_id.as_deref()
    }

    pub fn set_auxiliary_state_id(&mut self, id: &str) {
        self.graph.identifier.auxiliary_state_id = Some(id.to_string());
    }

    // --- People ---

    pub fn decedent_name(&self) -> Option<&HumanName> {
        match self.slots.decedent.and_then(|id| self.graph.get(id)) {
            Some(Resource::Patient(p)) => p.name.as_ref(),
            _ => None,
        }
    }

    pub fn set_decedent_name(&mut self, name: HumanName) {
        if let Some(Resource::Patient(p)) =
            self.slots.decedent.and_then(|id| self.graph.get_mut(id))
        {
            p.name = Some(name);
        }
    }

    pub fn certifier_name(&self) -> Option<&HumanName> {
        match self.slots.certifier.and_then(|id| self.graph.get(id)) {
            Some(Resource::Practitioner(p)) => p.name.as_ref(),
            _ => None,
        }
    }

    pub fn set_certifier_name(&mut self, name: HumanName) {
        if let Some(Resource::Practitioner(p)) =
            self.slots.certifier.and_then(|id| self.graph.get_mut(id))
        {
            p.name = Some(name);
        }
    }

    fn related_name(&self, id: Option<ResourceId>) -> Option<&HumanName> {
        match id.and_then(|id| self.graph.get(id)) {
            Some(Resource::RelatedPerson(p)) => p.name.as_ref(),
            _ => None,
        }
    }

    fn set_related_name(&mut self, role: AuxiliaryRole, name: HumanName) {
        let id = self.attach(role);
        if let Some(Resource::RelatedPerson(p)) = self.graph.get_mut(id) {
            p.name = Some(name);
        }
    }

    pub fn father_name(&self) -> Option<&HumanName> {
        self.related_name(self.slots.father)
    }

    pub fn set_father_name(&mut self, name: HumanName) {
        self.set_related_name(AuxiliaryRole::Father, name);
    }

    pub fn mother_name(&self) -> Option<&HumanName> {
        self.related_name(self.slots.mother)
    }

    pub fn set_mother_name(&mut self, name: HumanName) {
        self.set_related_name(AuxiliaryRole::Mother, name);
    }

    pub fn spouse_name(&self) -> Option<&HumanName> {
        self.related_name(self.slots.spouse)
    }

    pub fn set_spouse_name(&mut self, name: HumanName) {
        self.set_related_name(AuxiliaryRole::Spouse, name);
    }

    // --- Death date and time ---

    /// The conventional date/time literal, verbatim, offset included.
    pub fn death_date_literal(&self) -> Option<&str> {
        self.observation(self.slots.death_date)
            .and_then(|o| o.value.as_ref())
            .and_then(ObservationValue::as_date_time)
    }

    /// Store a conventional date/time literal. The string is kept verbatim;
    /// its zone offset is never normalized.
    pub fn set_death_date_literal(&mut self, literal: &str) {
        let obs = self.observation_for(AuxiliaryRole::DeathDate);
        obs.value = Some(ObservationValue::DateTime(literal.to_string()));
    }

    fn death_date_parts(&self) -> (Option<&str>, Option<&Extension>) {
        let obs = self.observation(self.slots.death_date);
        let literal = obs
            .and_then(|o| o.value.as_ref())
            .and_then(ObservationValue::as_date_time);
        let ext = obs.and_then(|o| find_extension(&o.extensions, URL_PARTIAL_DATE_TIME));
        (literal, ext)
    }

    fn death_date_part(&self, part: DatePart) -> PartialField<u32> {
        let (literal, ext) = self.death_date_parts();
        effective_date_part(literal, ext, part)
    }

    fn set_death_date_part(&mut self, part: DatePart, state: PartialField<u32>) {
        let obs = self.observation_for(AuxiliaryRole::DeathDate);
        let ext = extension_or_insert(&mut obs.extensions, URL_PARTIAL_DATE_TIME);
        partial::set_date_part(ext, part, state);
    }

    pub fn death_year(&self) -> PartialField<u32> {
        self.death_date_part(DatePart::Year)
    }

    pub fn set_death_year(&mut self, state: PartialField<u32>) {
        self.set_death_date_part(DatePart::Year, state);
    }

    pub fn death_month(&self) -> PartialField<u32> {
        self.death_date_part(DatePart::Month)
    }

    pub fn set_death_month(&mut self, state: PartialField<u32>) {
        self.set_death_date_part(DatePart::Month, state);
    }

    pub fn death_day(&self) -> PartialField<u32> {
        self.death_date_part(DatePart::Day)
    }

    pub fn set_death_day(&mut self, state: PartialField<u32>) {
        self.set_death_date_part(DatePart::Day, state);
    }

    pub fn death_time(&self) -> PartialField<String> {
        let (literal, ext) = self.death_date_parts();
        effective_time(literal, ext)
    }

    pub fn set_death_time(&mut self, state: PartialField<String>) {
        let obs = self.observation_for(AuxiliaryRole::DeathDate);
        let ext = extension_or_insert(&mut obs.extensions, URL_PARTIAL_DATE_TIME);
        partial::set_time_part(ext, state);
    }

    // --- Coded observations ---

    pub fn manner_of_death(&self) -> Option<&Concept> {
        self.coded_value(self.slots.manner_of_death)
    }

    pub fn set_manner_of_death_code(&mut self, code: &str) {
        let mut concept = Concept::coded(SYSTEM_SNOMED, code);
        self.catalog.fill_display(&mut concept);
        let obs = self.observation_for(AuxiliaryRole::MannerOfDeath);
        obs.value = Some(ObservationValue::Concept(concept));
    }

    pub fn tobacco_use(&self) -> Option<&Concept> {
        self.coded_value(self.slots.tobacco_use)
    }

    pub fn set_tobacco_use_code(&mut self, code: &str) {
        let mut concept = Concept::coded(SYSTEM_SNOMED, code);
        self.catalog.fill_display(&mut concept);
        let obs = self.observation_for(AuxiliaryRole::TobaccoUse);
        obs.value = Some(ObservationValue::Concept(concept));
    }

    pub fn examiner_contacted(&self) -> Option<bool> {
        self.observation(self.slots.examiner_contacted)
            .and_then(|o| o.value.as_ref())
            .and_then(ObservationValue::as_bool)
    }

    pub fn set_examiner_contacted(&mut self, contacted: bool) {
        let obs = self.observation_for(AuxiliaryRole::ExaminerContacted);
        obs.value = Some(ObservationValue::Boolean(contacted));
    }

    pub fn autopsy_performed(&self) -> Option<bool> {
        self.observation(self.slots.autopsy_performed)
            .and_then(|o| o.value.as_ref())
            .and_then(ObservationValue::as_bool)
    }

    pub fn set_autopsy_performed(&mut self, performed: bool) {
        let obs = self.observation_for(AuxiliaryRole::AutopsyPerformed);
        obs.value = Some(ObservationValue::Boolean(performed));
    }

    // --- Cause of death ---

    fn ensure_pathway(&mut self) -> ResourceId {
        if let Some(id) = self.slots.pathway_list {
            return id;
        }
        let id = pathway::ensure_list(&mut self.graph);
        if let Some(composition) = self.graph.composition_mut() {
            composition.register(SectionCode::DeathCertification, Reference::urn(id));
        }
        self.slots.pathway_list = Some(id);
        id
    }

    /// The compacted cause lines, in pathway order.
    pub fn causes(&self) -> Vec<CauseLine> {
        self.slots
            .pathway_list
            .map_or_else(Vec::new, |id| pathway::lines(&self.graph, id))
    }

    /// Write one pathway slot (0-based, capacity 10).
    pub fn set_cause_line(&mut self, index: usize, line: &CauseLine) {
        let list_id = self.ensure_pathway();
        let subject = self.decedent_ref();
        let condition_id = pathway::set_line(&mut self.graph, list_id, index, line, subject);
        if let Some(composition) = self.graph.composition_mut() {
            composition.register(
                SectionCode::DeathCertification,
                Reference::urn(condition_id),
            );
        }
        self.refresh_pathway_slots();
    }

    /// Distribute an ordered list of cause lines positionally, leaving
    /// unsupplied trailing slots untouched.
    pub fn set_causes(&mut self, lines: &[CauseLine]) {
        for (index, line) in lines.iter().take(pathway::PATHWAY_CAPACITY).enumerate() {
            self.set_cause_line(index, line);
        }
    }

    fn refresh_pathway_slots(&mut self) {
        if let Some(list_id) = self.slots.pathway_list {
            if let Some(Resource::List(list)) = self.graph.get(list_id) {
                self.slots.pathway = pathway::condition_ids(&self.graph, list);
            }
        }
    }

    /// The single contributing condition's text, if any.
    pub fn contributing_condition_text(&self) -> Option<&str> {
        match self.slots.contributing.and_then(|id| self.graph.get(id)) {
            Some(Resource::Condition(c)) => c.text(),
            _ => None,
        }
    }

    /// Set the contributing condition (Part II). Created lazily; it is never
    /// referenced by the pathway list, which is what distinguishes it.
    pub fn set_contributing_condition_text(&mut self, text: &str) {
        let id = match self.slots.contributing {
            Some(id) => id,
            None => {
                let mut condition = Condition::new();
                condition
                    .profiles
                    .push(profiles::CONDITION_CONTRIBUTING_TO_DEATH.to_string());
                condition.subject = self.decedent_ref();
                let id = condition.id;
                let reference = self.graph.push(Resource::Condition(condition));
                if let Some(composition) = self.graph.composition_mut() {
                    composition.register(SectionCode::DeathCertification, reference);
                }
                self.slots.contributing = Some(id);
                id
            }
        };
        if let Some(Resource::Condition(c)) = self.graph.get_mut(id) {
            c.set_text(text);
        }
    }

    // --- Locations ---

    fn location(&self, id: Option<ResourceId>) -> Option<&Location> {
        match id.and_then(|id| self.graph.get(id)) {
            Some(Resource::Location(l)) => Some(l),
            _ => None,
        }
    }

    fn location_for(&mut self, role: AuxiliaryRole) -> &mut Location {
        let id = self.attach(role);
        match self.graph.get_mut(id) {
            Some(Resource::Location(l)) => l,
            _ => unreachable!("role {role:?} is backed by a location"),
        }
    }

    pub fn death_location_name(&self) -> Option<&str> {
        self.location(self.slots.death_location)
            .and_then(|l| l.name.as_deref())
    }

    pub fn set_death_location_name(&mut self, name: &str) {
        self.location_for(AuxiliaryRole::DeathLocation).name = Some(name.to_string());
    }

    /// The jurisdiction (state) of the death location; feeds the derived
    /// display identifier.
    pub fn death_location_jurisdiction(&self) -> Option<&str> {
        self.location(self.slots.death_location)
            .and_then(|l| l.address.as_ref())
            .and_then(|a| a.state.as_deref())
    }

    pub fn set_death_location_jurisdiction(&mut self, state: &str) {
        let location = self.location_for(AuxiliaryRole::DeathLocation);
        location.address.get_or_insert_with(Default::default).state = Some(state.to_string());
    }

    pub fn injury_location_name(&self) -> Option<&str> {
        self.location(self.slots.injury_location)
            .and_then(|l| l.name.as_deref())
    }

    pub fn set_injury_location_name(&mut self, name: &str) {
        self.location_for(AuxiliaryRole::InjuryLocation).name = Some(name.to_string());
    }

    // --- Disposition ---

    pub fn funeral_home_name(&self) -> Option<&str> {
        match self.slots.funeral_home.and_then(|id| self.graph.get(id)) {
            Some(Resource::Organization(o)) => o.name.as_deref(),
            _ => None,
        }
    }

    pub fn set_funeral_home_name(&mut self, name: &str) {
        let id = self.attach(AuxiliaryRole::FuneralHome);
        if let Some(Resource::Organization(o)) = self.graph.get_mut(id) {
            o.name = Some(name.to_string());
        }
    }

    // --- Certificate status ---

    pub fn replace_status(&self) -> Option<&str> {
        self.graph
            .composition()
            .and_then(|c| find_extension(&c.extensions, profiles::EXT_REPLACE_STATUS))
            .and_then(|e| e.value.as_ref())
            .and_then(ExtensionValue::as_str)
    }

    pub fn set_replace_status(&mut self, code: &str) {
        if let Some(composition) = self.graph.composition_mut() {
            let ext = extension_or_insert(&mut composition.extensions, profiles::EXT_REPLACE_STATUS);
            ext.value = Some(ExtensionValue::Code(code.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> DeathDocument {
        DeathDocument::new(ConceptCatalog::mortality_defaults())
    }

    #[test]
    fn empty_document_has_wired_anchors() {
        let doc = doc();
        let graph = doc.graph();
        assert_eq!(graph.len(), 4);
        assert!(graph.has_profile(profiles::DEATH_CERTIFICATE_DOCUMENT));

        let composition = graph.composition().unwrap();
        let subject = composition.subject.as_ref().unwrap().target_id().unwrap();
        assert_eq!(Some(subject), doc.slots().decedent);
        let attester = composition.attester.as_ref().unwrap().target_id().unwrap();
        assert_eq!(Some(attester), doc.slots().certifier);

        // anchors are registered in their sections
        let demographics = composition
            .section(SectionCode::DecedentDemographics)
            .unwrap();
        assert!(demographics.entries.iter().any(|r| r.points_to(subject)));
    }

    #[test]
    fn attach_is_idempotent_and_registers_once() {
        let mut doc = doc();
        let first = doc.attach(AuxiliaryRole::MannerOfDeath);
        let second = doc.attach(AuxiliaryRole::MannerOfDeath);
        assert_eq!(first, second);

        let composition = doc.graph().composition().unwrap();
        let section = composition.section(SectionCode::DeathCertification).unwrap();
        let count = section.entries.iter().filter(|r| r.points_to(first)).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn section_created_on_first_use() {
        let mut doc = doc();
        assert!(doc
            .graph()
            .composition()
            .unwrap()
            .section(SectionCode::DeathInvestigation)
            .is_none());
        doc.attach(AuxiliaryRole::DeathDate);
        assert!(doc
            .graph()
            .composition()
            .unwrap()
            .section(SectionCode::DeathInvestigation)
            .is_some());
    }

    #[test]
    fn manner_of_death_round_trip() {
        let mut doc = doc();
        doc.set_manner_of_death_code("38605008");
        let manner = doc.manner_of_death().unwrap();
        assert_eq!(manner.primary_code(), Some("38605008"));
        // display backfilled from the injected catalog
        assert_eq!(manner.display.as_deref(), Some("Natural death"));
    }

    #[test]
    fn death_date_literal_is_kept_verbatim() {
        let mut doc = doc();
        doc.set_death_date_literal("2018-02-19T16:48:06-05:00");
        assert_eq!(doc.death_date_literal(), Some("2018-02-19T16:48:06-05:00"));
        assert_eq!(doc.death_year(), PartialField::Known(2018));
        assert_eq!(doc.death_time(), PartialField::Known("16:48:06".to_string()));
    }

    #[test]
    fn tri_state_death_date_without_literal() {
        let mut doc = doc();
        doc.set_death_year(PartialField::Known(2021));
        doc.set_death_month(PartialField::ExplicitlyUnknown);
        assert_eq!(doc.death_year(), PartialField::Known(2021));
        assert_eq!(doc.death_month(), PartialField::ExplicitlyUnknown);
        assert_eq!(doc.death_day(), PartialField::NotYetKnown);
        assert_eq!(doc.death_time(), PartialField::NotYetKnown);
    }

    #[test]
    fn literal_overrides_partial_parts() {
        let mut doc = doc();
        doc.set_death_year(PartialField::Known(1990));
        doc.set_death_date_literal("2020-01-02T03:04:05+01:00");
        assert_eq!(doc.death_year(), PartialField::Known(2020));
        assert_eq!(doc.death_time(), PartialField::Known("03:04:05".to_string()));
    }

    #[test]
    fn cause_compaction_skips_empty_interior_slots() {
        let mut doc = doc();
        doc.set_cause_line(0, &CauseLine::new("Sepsis", "2 days"));
        doc.set_cause_line(2, &CauseLine::new("Pneumonia", "1 week"));
        let causes = doc.causes();
        assert_eq!(causes.len(), 2);
        assert_eq!(causes[0].text.as_deref(), Some("Sepsis"));
        assert_eq!(causes[1].text.as_deref(), Some("Pneumonia"));
    }

    #[test]
    fn set_causes_distributes_positionally_leaving_trailing_slots() {
        let mut doc = doc();
        doc.set_cause_line(3, &CauseLine::new("Old entry", "years"));
        doc.set_causes(&[
            CauseLine::new("A", "minutes"),
            CauseLine::new("B", "hours"),
        ]);
        let causes = doc.causes();
        assert_eq!(causes.len(), 3);
        assert_eq!(causes[0].text.as_deref(), Some("A"));
        assert_eq!(causes[1].text.as_deref(), Some("B"));
        assert_eq!(causes[2].text.as_deref(), Some("Old entry"));
    }

    #[test]
    fn contributing_condition_is_outside_the_pathway() {
        let mut doc = doc();
        doc.set_cause_line(0, &CauseLine::new("Sepsis", "2 days"));
        doc.set_contributing_condition_text("Type 2 diabetes");
        assert_eq!(doc.contributing_condition_text(), Some("Type 2 diabetes"));

        let contributing = doc.slots().contributing.unwrap();
        assert!(!doc.slots().pathway.contains(&contributing));
    }

    #[test]
    fn replace_status_round_trip() {
        let mut doc = doc();
        assert_eq!(doc.replace_status(), None);
        doc.set_replace_status("updated");
        assert_eq!(doc.replace_status(), Some("updated"));
        doc.set_replace_status("original");
        assert_eq!(doc.replace_status(), Some("original"));
    }

    #[test]
    fn names_round_trip() {
        let mut doc = doc();
        doc.set_decedent_name(HumanName {
            family: Some("Koury".to_string()),
            given: vec!["Madelyn".to_string()],
            suffix: None,
        });
        doc.set_father_name(HumanName {
            family: Some("Koury".to_string()),
            given: vec!["Aaron".to_string()],
            suffix: None,
        });
        assert_eq!(doc.decedent_name().unwrap().full(), "Madelyn Koury");
        assert_eq!(doc.father_name().unwrap().full(), "Aaron Koury");
        assert!(doc.mother_name().is_none());
    }

    #[test]
    fn jurisdiction_and_funeral_home() {
        let mut doc = doc();
        doc.set_death_location_jurisdiction("MA");
        doc.set_death_location_name("Example Hospital");
        doc.set_funeral_home_name("Riverside Funeral Home");
        assert_eq!(doc.death_location_jurisdiction(), Some("MA"));
        assert_eq!(doc.death_location_name(), Some("Example Hospital"));
        assert_eq!(doc.funeral_home_name(), Some("Riverside Funeral Home"));
    }
}
