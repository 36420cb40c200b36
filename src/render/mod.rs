//! Rendering (centering arithmetic and frame construction).

pub mod layout;
pub mod renderer;

pub use renderer::render_centered;
