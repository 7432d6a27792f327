// SQL renderer
// This module turns a FetchRequest into query text
//
// Layout (one clause header per line, items indented on the lines below):
//
//   SELECT [TOP n]
//       col1,
//       col2
//   FROM
//       entity
//   WHERE
//       attr = 'value'
//
// Only the root entity is rendered. Linked entities, orders, no-lock and the
// condition operator are carried in the model but have no effect here.

use crate::fetch::{Condition, Entity, FetchRequest};
use tracing::debug;

/// Line terminator used between output lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    Lf,
    CrLf,
}

impl LineBreak {
    /// The convention of the platform we are running on
    pub fn native() -> Self {
        if cfg!(windows) {
            LineBreak::CrLf
        } else {
            LineBreak::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineBreak::Lf => "\n",
            LineBreak::CrLf => "\r\n",
        }
    }
}

impl Default for LineBreak {
    fn default() -> Self {
        Self::native()
    }
}

/// Output formatting knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub line_break: LineBreak,
    /// Spaces in front of every clause item
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_break: LineBreak::default(),
            indent: 4,
        }
    }
}

/// The SQL renderer
pub struct SqlRenderer {
    options: RenderOptions,
}

impl SqlRenderer {
    /// Create a renderer with the default options
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a fetch request as SELECT / FROM / WHERE text
    pub fn render(&self, request: &FetchRequest) -> String {
        let entity = &request.entity;
        let br = self.options.line_break.as_str();
        let indent = " ".repeat(self.options.indent);
        let separator = format!(",{}{}", br, indent);

        // The header keeps its trailing space when there is no TOP
        let mut query = String::from("SELECT ");
        if request.top > 0 {
            query.push_str(&format!("TOP {}", request.top));
        }

        // An entity without attributes still gets its (empty) column line
        query.push_str(br);
        query.push_str(&indent);
        query.push_str(&entity.attributes.join(separator.as_str()));

        query.push_str(br);
        query.push_str("FROM");
        query.push_str(br);
        query.push_str(&indent);
        query.push_str(&entity.name);

        if let Some(conditions) = Self::where_terms(entity) {
            query.push_str(br);
            query.push_str("WHERE");
            query.push_str(br);
            query.push_str(&indent);
            query.push_str(&conditions.join(separator.as_str()));
        }

        debug!(entity = %entity.name, bytes = query.len(), "rendered query");
        query
    }

    /// Helper: One `attr = 'value'` term per condition, None without a filter
    fn where_terms(entity: &Entity) -> Option<Vec<String>> {
        let filter = entity.filter.as_ref()?;
        if filter.conditions.is_empty() {
            return None;
        }
        Some(filter.conditions.iter().map(Self::equality).collect())
    }

    /// Every condition renders as equality, whatever its operator says
    /// Missing attribute or value render as empty text
    fn equality(condition: &Condition) -> String {
        format!(
            "{} = '{}'",
            condition.attribute.as_deref().unwrap_or_default(),
            condition.value.as_deref().unwrap_or_default()
        )
    }
}

impl Default for SqlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{Filter, JoinAttributes, LinkedEntity, Order};

    fn lf() -> SqlRenderer {
        SqlRenderer::with_options(RenderOptions {
            line_break: LineBreak::Lf,
            indent: 4,
        })
    }

    fn condition(attribute: &str, operator: &str, value: &str) -> Condition {
        Condition {
            attribute: Some(attribute.to_string()),
            operator: Some(operator.to_string()),
            value: Some(value.to_string()),
        }
    }

    fn request(top: u32, attributes: &[&str], conditions: Vec<Condition>) -> FetchRequest {
        FetchRequest {
            top,
            no_lock: false,
            entity: Entity {
                name: "account".to_string(),
                attributes: attributes.iter().map(|a| a.to_string()).collect(),
                filter: if conditions.is_empty() {
                    None
                } else {
                    Some(Filter { conditions })
                },
                linked_entities: None,
                orders: None,
            },
        }
    }

    #[test]
    fn test_render_with_top() {
        let sql = lf().render(&request(50, &["name", "address"], Vec::new()));
        assert_eq!(sql, "SELECT TOP 50\n    name,\n    address\nFROM\n    account");
    }

    #[test]
    fn test_render_without_top() {
        let sql = lf().render(&request(0, &["name"], Vec::new()));
        assert_eq!(sql, "SELECT \n    name\nFROM\n    account");
        assert!(!sql.contains("TOP"));
    }

    #[test]
    fn test_render_empty_column_list() {
        let sql = lf().render(&request(0, &[], Vec::new()));
        assert_eq!(sql, "SELECT \n    \nFROM\n    account");
    }

    #[test]
    fn test_every_operator_renders_as_equality() {
        let sql = lf().render(&request(
            0,
            &["name"],
            vec![
                condition("createdon", "lt", "2019-03-21"),
                condition("statecode", "ne", "1"),
                condition("name", "like", "A%"),
            ],
        ));

        assert_eq!(
            sql,
            "SELECT \n    name\nFROM\n    account\nWHERE\n    \
             createdon = '2019-03-21',\n    statecode = '1',\n    name = 'A%'"
        );
        assert_eq!(sql.matches("WHERE").count(), 1);
    }

    #[test]
    fn test_condition_without_attribute_or_value() {
        let sql = lf().render(&request(0, &["name"], vec![Condition::default()]));
        assert!(sql.ends_with("WHERE\n     = ''"));
    }

    #[test]
    fn test_empty_filter_renders_no_where() {
        let mut req = request(0, &["name"], Vec::new());
        req.entity.filter = Some(Filter {
            conditions: Vec::new(),
        });
        assert!(!lf().render(&req).contains("WHERE"));
    }

    #[test]
    fn test_unused_fields_do_not_affect_output() {
        let plain = request(10, &["name"], vec![condition("a", "eq", "1")]);

        let mut decorated = plain.clone();
        decorated.no_lock = true;
        decorated.entity.orders = Some(vec![Order {
            attribute: Some("name".to_string()),
            descending: true,
        }]);
        decorated.entity.linked_entities = Some(vec![LinkedEntity {
            join: JoinAttributes {
                from: Some("parentcustomerid".to_string()),
                to: Some("accountid".to_string()),
            },
            entity: Entity {
                name: "contact".to_string(),
                attributes: vec!["fullname".to_string()],
                filter: Some(Filter {
                    conditions: vec![condition("b", "eq", "2")],
                }),
                linked_entities: None,
                orders: None,
            },
        }]);

        let renderer = lf();
        assert_eq!(renderer.render(&plain), renderer.render(&decorated));
    }

    #[test]
    fn test_render_is_deterministic() {
        let req = request(5, &["a", "b"], vec![condition("c", "eq", "d")]);
        let renderer = lf();
        assert_eq!(renderer.render(&req), renderer.render(&req));
    }

    #[test]
    fn test_crlf_and_indent_options() {
        let renderer = SqlRenderer::with_options(RenderOptions {
            line_break: LineBreak::CrLf,
            indent: 2,
        });
        let sql = renderer.render(&request(0, &["a", "b"], vec![condition("c", "eq", "d")]));
        assert_eq!(sql, "SELECT \r\n  a,\r\n  b\r\nFROM\r\n  account\r\nWHERE\r\n  c = 'd'");
    }

    #[test]
    fn test_default_uses_native_line_break() {
        assert_eq!(SqlRenderer::default().options().line_break, LineBreak::native());
        assert_eq!(SqlRenderer::new().options().indent, 4);
        assert_eq!(LineBreak::default(), LineBreak::native());
        assert_eq!(RenderOptions::default().line_break, LineBreak::default());
    }

    #[test]
    fn test_header_without_top_keeps_trailing_space() {
        let sql = lf().render(&request(0, &["x"], Vec::new()));
        assert!(sql.starts_with("SELECT \n"));

        let sql = lf().render(&request(7, &["x"], Vec::new()));
        assert!(sql.starts_with("SELECT TOP 7\n"));
    }
}
