// src/physics/mod.rs
pub mod neighbours;
pub mod symmetry;

pub use neighbours::{
    build_neighbourhood_map, estimate_cutoff, estimate_cutoff_for, MapParams, NeighbourError,
    NeighbourSearch, NeighbourhoodMap, PeriodicImageSearch,
};
