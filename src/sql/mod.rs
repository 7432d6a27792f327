// SQL module - renders fetch requests as query text
pub mod renderer;

pub use renderer::{LineBreak, RenderOptions, SqlRenderer};
