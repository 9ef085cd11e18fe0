mod anchor;
mod component;
mod config;
mod controller;
mod entry_form;
mod error;
mod render;
mod state;
mod store;
mod types;
mod viewport;

pub use component::FlowCanvas;
pub use types::GraphSnapshot;
