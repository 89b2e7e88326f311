pub mod export;
pub mod graph_view;
pub mod heatmap;
pub mod linked;
pub mod painter;
pub mod palette;
pub mod scene;

pub use export::{export_linked_plot, export_structure};
pub use graph_view::GraphFrame;
pub use heatmap::HeatmapFrame;
pub use linked::LinkedSelection;
pub use scene::{StructureScene, ViewState};
