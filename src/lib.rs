//! Neighbourhood maps of atomistic structures: neighbour search over periodic
//! images, fixed-size attention-weighted neighbour matrices, and the
//! rendering used to inspect them.

pub mod config;
pub mod graph;
pub mod io;
pub mod model;
pub mod physics;
pub mod rendering;
pub mod utils;
