// Fetch parser
// This module converts a fetch document into a FetchRequest
// Numeric and boolean attributes are lenient: anything unreadable falls back to its default

use super::xml::XmlElement;
use super::{Condition, Entity, FetchRequest, Filter, JoinAttributes, LinkedEntity, Order};
use crate::error::{Result, TranslateError};
use tracing::{debug, trace};

/// The fetch parser
pub struct FetchParser;

impl FetchParser {
    /// Parse a fetch document into a FetchRequest
    /// This is the main entry point for parsing
    pub fn parse(xml: &str) -> Result<FetchRequest> {
        let fetch = XmlElement::parse_document(xml)?;
        if !fetch.is("fetch") {
            return Err(TranslateError::malformed(format!(
                "expected <fetch> as the root element, found <{}>",
                fetch.name
            )));
        }

        let entity_node = match fetch.children.first() {
            Some(node) if node.is("entity") => node,
            Some(node) => {
                return Err(TranslateError::malformed(format!(
                    "expected <entity> as the first child of <fetch>, found <{}>",
                    node.name
                )))
            }
            None => return Err(TranslateError::malformed("<fetch> has no <entity>")),
        };

        let request = FetchRequest {
            top: Self::parse_top(fetch.attribute("top")),
            no_lock: Self::parse_bool(fetch.attribute("no-lock")),
            entity: Self::parse_entity(entity_node)?,
        };

        debug!(
            entity = %request.entity.name,
            top = request.top,
            no_lock = request.no_lock,
            "parsed fetch request"
        );
        Ok(request)
    }

    /// Parse the fields every entity has, then recurse into link-entities
    fn parse_entity(node: &XmlElement) -> Result<Entity> {
        let name = node
            .attribute("name")
            .ok_or_else(|| TranslateError::missing(&node.name, "name"))?
            .to_string();

        let entity = Entity {
            attributes: Self::parse_attributes(node)?,
            filter: Self::parse_filter(node),
            linked_entities: Self::parse_linked_entities(node)?,
            orders: Self::parse_orders(node),
            name,
        };

        trace!(
            entity = %entity.name,
            attributes = entity.attributes.len(),
            links = entity.links().len(),
            "parsed entity"
        );
        Ok(entity)
    }

    fn parse_attributes(node: &XmlElement) -> Result<Vec<String>> {
        node.children_named("attribute")
            .map(|attr| {
                attr.attribute("name")
                    .map(str::to_string)
                    .ok_or_else(|| TranslateError::missing(&attr.name, "name"))
            })
            .collect()
    }

    /// Every child of the filter element counts as a condition, whatever its tag
    fn parse_filter(node: &XmlElement) -> Option<Filter> {
        let filter_node = node.child_by_name("filter")?;

        let conditions: Vec<Condition> = filter_node
            .children
            .iter()
            .map(|condition| Condition {
                attribute: condition.attribute("attribute").map(str::to_string),
                operator: condition.attribute("operator").map(str::to_string),
                value: condition.attribute("value").map(str::to_string),
            })
            .collect();

        if conditions.is_empty() {
            return None;
        }
        Some(Filter { conditions })
    }

    fn parse_linked_entities(node: &XmlElement) -> Result<Option<Vec<LinkedEntity>>> {
        let linked = node
            .children_named("link-entity")
            .map(Self::parse_linked_entity)
            .collect::<Result<Vec<_>>>()?;

        Ok(if linked.is_empty() { None } else { Some(linked) })
    }

    fn parse_linked_entity(node: &XmlElement) -> Result<LinkedEntity> {
        Ok(LinkedEntity {
            join: JoinAttributes {
                from: node.attribute("from").map(str::to_string),
                to: node.attribute("to").map(str::to_string),
            },
            entity: Self::parse_entity(node)?,
        })
    }

    fn parse_orders(node: &XmlElement) -> Option<Vec<Order>> {
        let orders: Vec<Order> = node
            .children_named("order")
            .map(|order| Order {
                attribute: order.attribute("attribute").map(str::to_string),
                descending: Self::parse_bool(order.attribute("descending")),
            })
            .collect();

        if orders.is_empty() {
            None
        } else {
            Some(orders)
        }
    }

    /// Helper: Row limit, 0 when missing, blank, not positive or not a 32-bit signed number
    fn parse_top(value: Option<&str>) -> u32 {
        value
            .map(str::trim)
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|top| *top > 0)
            .map(|top| top as u32)
            .unwrap_or(0)
    }

    /// Helper: `true`/`false` in any case, false for anything else
    fn parse_bool(value: Option<&str>) -> bool {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            _ => false,
        }
    }
}
