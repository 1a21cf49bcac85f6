//! Schema descriptors published to the host

use serde::Serialize;

/// Scalar type of an attribute's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Integer,
}

/// Description of one attribute of an object class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeInfo {
    pub name: String,
    pub kind: ScalarKind,
    pub required: bool,
    pub multi_valued: bool,
}

/// Description of one object class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectClassInfo {
    pub type_name: String,
    pub attributes: Vec<AttributeInfo>,
}

impl ObjectClassInfo {
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Everything a connector publishes about the records it manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub object_classes: Vec<ObjectClassInfo>,
}

impl Schema {
    pub fn object_class(&self, type_name: &str) -> Option<&ObjectClassInfo> {
        self.object_classes.iter().find(|oc| oc.type_name == type_name)
    }
}
