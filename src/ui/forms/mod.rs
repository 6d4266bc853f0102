//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `setup_form`: The initial setup form

mod field_renderer;
mod setup_form;

pub use setup_form::draw_setup_form;
