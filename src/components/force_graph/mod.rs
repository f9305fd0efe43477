mod component;
mod render;
mod state;

pub use component::ForceGraphCanvas;
pub use state::color_for_group;
