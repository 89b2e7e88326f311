// src/state.rs

use nbmap::config::Config;
use nbmap::graph::{spring_layout, GraphLayout};
use nbmap::model::Structure;
use nbmap::physics::neighbours::{build_neighbourhood_map, NeighbourError, NeighbourhoodMap, PeriodicImageSearch};
use nbmap::rendering::{HeatmapFrame, LinkedSelection, ViewState};
use nbmap::utils::report;

pub struct AppState {
  pub structure: Option<Structure>,
  pub file_name: String,
  pub config: Config,
  pub view: ViewState,
  pub search: PeriodicImageSearch,

  // Linked plot
  pub map: Option<NeighbourhoodMap>,
  pub layout: GraphLayout,
  pub selection: LinkedSelection,
  /// Cell placement from the last image draw, for hit-testing
  pub heatmap_frame: Option<HeatmapFrame>,

  /// Atom under the cursor in the structure view
  pub hovered_atom: Option<usize>,
}

impl AppState {
  pub fn new() -> Self {
    Self {
      structure: None,
      file_name: String::new(),
      config: Config::default(),
      view: ViewState::default(),
      search: PeriodicImageSearch::new(),
      map: None,
      layout: GraphLayout::default(),
      selection: LinkedSelection::default(),
      heatmap_frame: None,
      hovered_atom: None,
    }
  }

  pub fn load_config(&mut self) -> String {
    let (config, msg) = Config::load();
    self.config = config;
    msg
  }

  /// Replaces the structure and drops everything derived from the old one.
  /// Returns the structure report.
  pub fn set_structure(&mut self, structure: Structure, file_name: &str) -> String {
    let summary = report::structure_summary(&structure, file_name);
    if self.config.map.target_atom >= structure.len() {
      self.config.map.target_atom = 0;
    }
    self.structure = Some(structure);
    self.file_name = file_name.to_string();
    self.view = ViewState::default();
    self.clear_map();
    summary
  }

  pub fn clear_map(&mut self) {
    self.map = None;
    self.layout = GraphLayout::default();
    self.selection.clear();
    self.heatmap_frame = None;
  }

  /// Builds the map for `config.map` and lays out its graph.
  pub fn build_map(&mut self) -> Result<String, NeighbourError> {
    let structure = self.structure.as_ref().ok_or(NeighbourError::EmptyStructure)?;
    let map = build_neighbourhood_map(structure, &self.search, &self.config.map)?;
    let layout = spring_layout(&map.graph, &self.config.layout);
    let summary = report::map_summary(&map);

    self.selection.clear();
    self.heatmap_frame = None;
    self.layout = layout;
    self.map = Some(map);
    Ok(summary)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use nbmap::model::Atom;

  fn chain() -> Structure {
    Structure::periodic(
      [[2.5, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]],
      vec![Atom::new("Cu", [0.0, 0.0, 0.0]), Atom::new("Cu", [1.25, 0.0, 0.0])],
    )
  }

  #[test]
  fn test_build_then_replace_structure() {
    let mut st = AppState::new();
    assert_eq!(st.build_map().unwrap_err(), NeighbourError::EmptyStructure);

    st.set_structure(chain(), "chain.vasp");
    st.config.map.target_size = 6;
    let summary = st.build_map().unwrap();
    assert!(summary.contains("size = 6"));

    let map = st.map.as_ref().unwrap();
    assert_eq!(st.layout.nodes, map.graph.nodes);

    st.selection.tap_node(Some(1));
    st.config.map.target_atom = 1;
    st.set_structure(chain(), "again.vasp");
    assert!(st.map.is_none());
    assert_eq!(st.selection, LinkedSelection::default());
    assert_eq!(st.config.map.target_atom, 1);

    st.set_structure(
      Structure::periodic([[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]], vec![Atom::new("Po", [0.0; 3])]),
      "po.vasp",
    );
    assert_eq!(st.config.map.target_atom, 0);
  }
}
