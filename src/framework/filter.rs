//! Query filter expressions

use super::attribute::AttributeValue;

/// Filter expression passed by the host to a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Attribute equals the given values.
    Equals {
        attribute: String,
        values: Vec<AttributeValue>,
    },
    Contains {
        attribute: String,
        value: AttributeValue,
    },
    StartsWith {
        attribute: String,
        value: AttributeValue,
    },
    GreaterThan {
        attribute: String,
        value: AttributeValue,
    },
    LessThan {
        attribute: String,
        value: AttributeValue,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Single-value equality filter.
    pub fn eq(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Filter::Equals {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    pub fn negate(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }
}
