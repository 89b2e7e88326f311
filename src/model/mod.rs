//src/model/mod.rs
pub mod elements;
pub mod structure;

// Re-exports for cleaner imports
pub use elements::{atomic_number, covalent_radius, cpk_color};
pub use structure::{Atom, Structure};
