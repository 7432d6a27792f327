// fetchsql - translates fetch documents into SQL query text
// This is the library root that exposes the public API

pub mod error;
pub mod fetch;
pub mod sql;

// Re-export commonly used types for convenience
pub use error::TranslateError;
pub use fetch::{
    Condition, Entity, FetchParser, FetchRequest, Filter, JoinAttributes, LinkedEntity, Order,
};
pub use sql::{LineBreak, RenderOptions, SqlRenderer};

/// Parse a fetch document and render it with the default options
pub fn translate(xml: &str) -> Result<String, TranslateError> {
    translate_with(xml, &RenderOptions::default())
}

/// Parse a fetch document and render it with the given options
/// Either the whole query is returned or an error, never partial text
pub fn translate_with(xml: &str, options: &RenderOptions) -> Result<String, TranslateError> {
    let request = FetchParser::parse(xml)?;
    Ok(SqlRenderer::with_options(options.clone()).render(&request))
}
