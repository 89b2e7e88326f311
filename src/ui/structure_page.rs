// src/ui/structure_page.rs

use crate::state::AppState;
use gtk4::prelude::*;
use gtk4::DrawingArea;
use nbmap::rendering::painter::draw_structure_scene;
use nbmap::rendering::StructureScene;
use std::cell::RefCell;
use std::rc::Rc;

pub fn build(state: Rc<RefCell<AppState>>) -> DrawingArea {
  let drawing_area = DrawingArea::new();
  drawing_area.set_hexpand(true);
  drawing_area.set_vexpand(true);

  drawing_area.set_draw_func(move |_, cr, w, h| {
    let st = state.borrow();
    let style = &st.config.viewer;

    let (r, g, b) = style.background_color;
    cr.set_source_rgb(r, g, b);
    if let Err(e) = cr.paint() {
      log::error!("Structure view paint failed: {}", e);
      return;
    }

    let Some(structure) = &st.structure else {
      return;
    };
    let scene = StructureScene::compute(structure, &st.view, style, w as f64, h as f64);
    let highlight = st.selection.selected_atom.or(st.hovered_atom);
    if let Err(e) = draw_structure_scene(cr, &scene, style, highlight) {
      log::error!("Structure view draw failed: {}", e);
    }
  });

  drawing_area
}
