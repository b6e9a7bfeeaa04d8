pub mod console;
pub mod html;
pub mod json;

pub use console::write_console;
pub use html::{escape_html, render_html};
pub use json::render_json;
