mod component;
mod controls;
mod details;

pub use component::GraphExplorer;
