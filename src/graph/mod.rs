// src/graph/mod.rs
pub mod layout;

pub use layout::{spring_layout, GraphLayout, LayoutSettings};
