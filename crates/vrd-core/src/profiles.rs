//! Profile tags: the closed taxonomy of document and resource roles.

/// Full death certificate document bundle.
pub const DEATH_CERTIFICATE_DOCUMENT: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-death-certificate-document";

/// The composition of a death certificate.
pub const DEATH_CERTIFICATE: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-death-certificate";

/// The decedent.
pub const DECEDENT: &str = "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-decedent";

/// The certifying practitioner.
pub const CERTIFIER: &str = "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-certifier";

/// The death certification procedure.
pub const DEATH_CERTIFICATION: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-death-certification";

/// The ordered cause-of-death pathway list.
pub const CAUSE_OF_DEATH_PATHWAY: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-cause-of-death-pathway";

/// A condition in the cause-of-death pathway.
pub const CAUSE_OF_DEATH_CONDITION: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-cause-of-death-condition";

/// The single contributing condition outside the pathway.
pub const CONDITION_CONTRIBUTING_TO_DEATH: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-condition-contributing-to-death";

/// The funeral home organization.
pub const FUNERAL_HOME: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-funeral-home";

/// Scoped projection: coded cause-of-death content.
pub const CAUSE_OF_DEATH_CODED_BUNDLE: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-cause-of-death-coded-content-bundle";

/// Scoped projection: coded demographic content.
pub const DEMOGRAPHIC_CODED_BUNDLE: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-demographic-coded-content-bundle";

/// Scoped projection: mortality roster.
pub const MORTALITY_ROSTER_BUNDLE: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-mortality-roster-bundle";

/// Bundle metadata extension: certificate replace status.
pub const EXT_REPLACE_STATUS: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-replace-status";

/// Bundle metadata extension: decedent alias indicator.
pub const EXT_ALIAS_STATUS: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/vrdr-alias-status";
