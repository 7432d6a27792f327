// Fetch module - the in-memory model of a fetch request
// The tree is built bottom-up by the parser and never mutated afterwards

pub mod parser;
pub mod xml;

use serde::Serialize;

pub use parser::FetchParser;

/// The root of a fetch request
/// `top` of 0 means the row count is unbounded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    pub top: u32,
    /// Parsed for completeness, the renderer does not read it
    pub no_lock: bool,
    pub entity: Entity,
}

/// A named relational source
///
/// `linked_entities` and `orders` are `None` when the document has no such
/// children, never `Some` of an empty vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub name: String,
    /// Projection order, as written in the document
    pub attributes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_entities: Option<Vec<LinkedEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
}

/// A joined entity: a full entity plus the two columns of the join predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedEntity {
    pub join: JoinAttributes,
    #[serde(flatten)]
    pub entity: Entity,
}

/// Join columns of a link-entity, either may be absent in the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinAttributes {
    /// Column on the linked (child) side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Column on the parent side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// A non-empty list of conditions
/// An empty filter element is dropped by the parser, so `conditions` is never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

/// One filter predicate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Condition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Free-form operator text (`eq`, `lt`, `like`, ...), kept verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A sort order on one attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub descending: bool,
}

impl Entity {
    /// Linked entities as a slice, empty when there are none
    pub fn links(&self) -> &[LinkedEntity] {
        self.linked_entities.as_deref().unwrap_or_default()
    }

    /// Visit this entity and every nested linked entity, depth-first, parents first
    pub fn walk(&self) -> Vec<&Entity> {
        let mut out = vec![self];
        for link in self.links() {
            out.extend(link.entity.walk());
        }
        out
    }
}
