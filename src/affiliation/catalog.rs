//! Attribute Catalog - every field an affiliation record supports
//!
//! One table of (name, kind, cardinality, required) drives marshalling,
//! unmarshalling and the schema published to the host.

use crate::framework::{AttributeInfo, ObjectClassInfo, ScalarKind};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Object class name the host uses for affiliations
pub const OBJECT_CLASS: &str = "affiliation";

/// Collection path below the service address
pub const ENDPOINT: &str = "Affiliations";

/// Liveness probe path below the service address
pub const SERVICE_PROVIDER_CONFIG: &str = "ServiceProviderConfig";

/// Key holding the schema URNs of a record
pub const SCHEMAS_KEY: &str = "schemas";

/// Schema URN written on every create and update
pub const SCHEMA_URN: &str = "urn:mace:switch.ch:eduid:scim:1.0:affiliation";

/// Unique identifier field, also the connector `Uid` and name
pub const UID_FIELD: &str = "swissEduPersonUniqueID";

/// Single or multi-valued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multi,
}

/// Definition of one catalog field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub name: &'static str,
    pub kind: ScalarKind,
    pub cardinality: Cardinality,
    pub required: bool,
}

impl AttributeDefinition {
    const fn new(name: &'static str, kind: ScalarKind, cardinality: Cardinality, required: bool) -> Self {
        Self {
            name,
            kind,
            cardinality,
            required,
        }
    }

    pub fn is_multi(&self) -> bool {
        self.cardinality == Cardinality::Multi
    }

    /// Host-facing description of this field
    pub fn info(&self) -> AttributeInfo {
        AttributeInfo {
            name: self.name.to_string(),
            kind: self.kind,
            required: self.required,
            multi_valued: self.is_multi(),
        }
    }
}

const fn single_string(name: &'static str) -> AttributeDefinition {
    AttributeDefinition::new(name, ScalarKind::String, Cardinality::Single, false)
}

const fn required_string(name: &'static str) -> AttributeDefinition {
    AttributeDefinition::new(name, ScalarKind::String, Cardinality::Single, true)
}

const fn single_integer(name: &'static str) -> AttributeDefinition {
    AttributeDefinition::new(name, ScalarKind::Integer, Cardinality::Single, false)
}

const fn multi_string(name: &'static str) -> AttributeDefinition {
    AttributeDefinition::new(name, ScalarKind::String, Cardinality::Multi, false)
}

const fn required_multi_string(name: &'static str) -> AttributeDefinition {
    AttributeDefinition::new(name, ScalarKind::String, Cardinality::Multi, true)
}

const fn multi_integer(name: &'static str) -> AttributeDefinition {
    AttributeDefinition::new(name, ScalarKind::Integer, Cardinality::Multi, false)
}

/// The affiliation catalog
pub static CATALOG: &[AttributeDefinition] = &[
    // Single-valued strings
    required_string("id"),
    single_string("externalId"),
    required_string("givenName"),
    required_string("surname"),
    required_string("swissEduIDAffiliationStatus"),
    required_string("swissEduIDAffiliationPeriodBegin"),
    required_string(UID_FIELD),
    required_string("swissEduID"),
    single_string("swissEduPersonHomeOrganization"),
    single_string("swissEduPersonHomeOrganizationType"),
    single_string("displayName"),
    single_string("eduPersonUniqueId"),
    single_string("eduPersonPrincipalName"),
    single_string("schacHomeOrganization"),
    single_string("swissEduPersonDateOfBirth"),
    single_string("swissEduPersonMatriculationNumber"),
    single_string("employeeNumber"),
    single_string("eduPersonOrgDN"),
    single_string("preferredLanguage"),
    single_string("eduPersonPrimaryAffiliation"),
    single_string("eduPersonPrimaryOrgUnitDN"),
    single_string("uid"),
    single_string("fschImapPW"),
    // Single-valued integers
    single_integer("swissEduPersonGender"),
    // Multi-valued strings
    required_multi_string("eduPersonAffiliation"),
    required_multi_string("email"),
    multi_string("eduPersonScopedAffiliation"),
    multi_string("commonName"),
    multi_string("schacHomeOrganizationType"),
    multi_string("swissEduPersonCardUID"),
    multi_string("swissEduPersonStudyLevel"),
    multi_string("swissLibraryPersonAffiliation"),
    multi_string("swissLibraryPersonResidence"),
    multi_string("eduPersonAssurance"),
    multi_string("telephoneNumber"),
    multi_string("postalAddress"),
    multi_string("eduPersonEntitlement"),
    multi_string("homePostalAddress"),
    multi_string("isMemberOf"),
    multi_string("mobile"),
    multi_string("eduPersonNickname"),
    multi_string("ou"),
    multi_string("eduPersonOrgUnitDN"),
    multi_string("homePhone"),
    multi_string("eduPersonTargetedID"),
    // Multi-valued integers
    multi_integer("swissEduPersonStaffCategory"),
    multi_integer("swissEduPersonStudyBranch1"),
    multi_integer("swissEduPersonStudyBranch2"),
    multi_integer("swissEduPersonStudyBranch3"),
];

static INDEX: OnceLock<HashMap<&'static str, &'static AttributeDefinition>> = OnceLock::new();

fn index() -> &'static HashMap<&'static str, &'static AttributeDefinition> {
    INDEX.get_or_init(|| CATALOG.iter().map(|def| (def.name, def)).collect())
}

/// All definitions, in declaration order
pub fn definitions() -> &'static [AttributeDefinition] {
    CATALOG
}

/// Look up a definition by attribute name
pub fn definition(name: &str) -> Option<&'static AttributeDefinition> {
    index().get(name).copied()
}

/// Fields of one kind and cardinality
pub fn fields(
    kind: ScalarKind,
    cardinality: Cardinality,
) -> impl Iterator<Item = &'static AttributeDefinition> {
    CATALOG
        .iter()
        .filter(move |def| def.kind == kind && def.cardinality == cardinality)
}

/// Mandatory fields of one cardinality
pub fn required(cardinality: Cardinality) -> impl Iterator<Item = &'static AttributeDefinition> {
    CATALOG
        .iter()
        .filter(move |def| def.required && def.cardinality == cardinality)
}

/// Object class descriptor published to the host
pub fn object_class_info() -> ObjectClassInfo {
    ObjectClassInfo {
        type_name: OBJECT_CLASS.to_string(),
        attributes: CATALOG.iter().map(AttributeDefinition::info).collect(),
    }
}
