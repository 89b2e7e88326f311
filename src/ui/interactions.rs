// src/ui/interactions.rs
//
// Pointer and keyboard controllers. Hit-testing lives in the library
// (StructureScene::pick, GraphFrame::node_at, HeatmapFrame::cell_at); this
// file only routes events into AppState and schedules redraws.

use crate::state::AppState;
use crate::ui::Views;
use gdk4 as gdk;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{
  ApplicationWindow, EventControllerKey, EventControllerMotion, EventControllerScroll,
  EventControllerScrollFlags, GestureClick, GestureDrag,
};
use nbmap::rendering::{GraphFrame, StructureScene};
use nbmap::utils::report;
use std::cell::RefCell;
use std::rc::Rc;

const DRAG_DEGREES_PER_PIXEL: f64 = 0.5;
const KEY_ROTATION_STEP: f64 = 5.0;

pub fn setup_interactions(window: &ApplicationWindow, state: Rc<RefCell<AppState>>, views: &Views) {
  structure_controllers(state.clone(), views);
  graph_controllers(state.clone(), views);
  image_controllers(state.clone(), views);
  keyboard_controller(window, state, views);
}

fn structure_controllers(state: Rc<RefCell<AppState>>, views: &Views) {
  let area = &views.structure;

  // Drag rotates
  let drag = GestureDrag::new();
  let last = Rc::new(RefCell::new((0.0, 0.0)));
  let l = last.clone();
  drag.connect_drag_begin(move |_, _, _| {
    *l.borrow_mut() = (0.0, 0.0);
  });
  let s = state.clone();
  let da = area.clone();
  drag.connect_drag_update(move |_, x, y| {
    let (px, py) = *last.borrow();
    *last.borrow_mut() = (x, y);
    s.borrow_mut()
      .view
      .rotate((x - px) * DRAG_DEGREES_PER_PIXEL, (y - py) * DRAG_DEGREES_PER_PIXEL);
    da.queue_draw();
  });
  area.add_controller(drag);

  // Scroll zooms
  let scroll = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL);
  let s = state.clone();
  let da = area.clone();
  scroll.connect_scroll(move |_, _, dy| {
    s.borrow_mut().view.zoom_by(if dy > 0.0 { 0.9 } else { 1.1 });
    da.queue_draw();
    glib::Propagation::Stop
  });
  area.add_controller(scroll);

  // Hover shows the atom tooltip
  let motion = EventControllerMotion::new();
  let s = state.clone();
  let da = area.clone();
  motion.connect_motion(move |_, x, y| {
    let mut st = s.borrow_mut();
    let picked = st.structure.as_ref().and_then(|structure| {
      let scene = StructureScene::compute(structure, &st.view, &st.config.viewer, da.width() as f64, da.height() as f64);
      scene
        .pick(x, y)
        .map(|i| (i, report::atom_tooltip(structure, i)))
    });
    let atom = picked.as_ref().map(|(i, _)| *i);
    da.set_tooltip_text(picked.and_then(|(_, tip)| tip).as_deref());
    if st.hovered_atom != atom {
      st.hovered_atom = atom;
      da.queue_draw();
    }
  });
  let s = state.clone();
  let da = area.clone();
  motion.connect_leave(move |_| {
    s.borrow_mut().hovered_atom = None;
    da.set_tooltip_text(None);
    da.queue_draw();
  });
  area.add_controller(motion);

  // Click selects the atom in the linked plot as well
  let click = GestureClick::new();
  let s = state;
  let v = views.clone();
  click.connect_released(move |_, _, x, y| {
    let mut st = s.borrow_mut();
    let Some(structure) = &st.structure else {
      return;
    };
    let scene = StructureScene::compute(structure, &st.view, &st.config.viewer, v.structure.width() as f64, v.structure.height() as f64);
    let atom = scene.pick(x, y);
    st.selection.tap_node(atom);
    v.queue_draw();
  });
  area.add_controller(click);
}

fn graph_controllers(state: Rc<RefCell<AppState>>, views: &Views) {
  let area = &views.graph;

  let motion = EventControllerMotion::new();
  let s = state.clone();
  let v = views.clone();
  motion.connect_motion(move |_, x, y| {
    let mut st = s.borrow_mut();
    if st.map.is_none() {
      return;
    }
    let frame = GraphFrame::new(v.graph.width() as f64, v.graph.height() as f64);
    let atom = frame.node_at(&st.layout, x, y);
    v.graph
      .set_tooltip_text(atom.map(report::node_tooltip).as_deref());
    if st.selection.hover_node(atom) {
      v.graph.queue_draw();
    }
  });
  let s = state.clone();
  let v = views.clone();
  motion.connect_leave(move |_| {
    v.graph.set_tooltip_text(None);
    if s.borrow_mut().selection.hover_node(None) {
      v.graph.queue_draw();
    }
  });
  area.add_controller(motion);

  let click = GestureClick::new();
  let s = state;
  let v = views.clone();
  click.connect_released(move |_, _, x, y| {
    let mut st = s.borrow_mut();
    if st.map.is_none() {
      return;
    }
    let frame = GraphFrame::new(v.graph.width() as f64, v.graph.height() as f64);
    let atom = frame.node_at(&st.layout, x, y);
    st.selection.tap_node(atom);
    v.queue_draw();
  });
  area.add_controller(click);
}

fn image_controllers(state: Rc<RefCell<AppState>>, views: &Views) {
  let area = &views.image;

  let motion = EventControllerMotion::new();
  let s = state.clone();
  let v = views.clone();
  motion.connect_motion(move |_, x, y| {
    let mut st = s.borrow_mut();
    let cell = st.heatmap_frame.and_then(|f| f.cell_at(x, y));
    let tip = match (&st.map, cell) {
      (Some(map), Some((r, c))) => report::cell_tooltip(map, r, c),
      _ => None,
    };
    v.image.set_tooltip_text(tip.as_deref());
    if st.selection.hover_cell(cell) {
      v.image.queue_draw();
    }
  });
  let s = state.clone();
  let v = views.clone();
  motion.connect_leave(move |_| {
    v.image.set_tooltip_text(None);
    if s.borrow_mut().selection.hover_cell(None) {
      v.image.queue_draw();
    }
  });
  area.add_controller(motion);

  let click = GestureClick::new();
  let s = state;
  let v = views.clone();
  click.connect_released(move |_, _, x, y| {
    let mut st = s.borrow_mut();
    let cell = st.heatmap_frame.and_then(|f| f.cell_at(x, y));
    let AppState { map, selection, .. } = &mut *st;
    if let Some(map) = map {
      selection.tap_cell(map, cell);
      v.queue_draw();
    }
  });
  area.add_controller(click);
}

fn keyboard_controller(window: &ApplicationWindow, state: Rc<RefCell<AppState>>, views: &Views) {
  let keys = EventControllerKey::new();
  let v = views.clone();
  keys.connect_key_pressed(move |_, keyval, _keycode, _modifiers| {
    let mut st = state.borrow_mut();
    if keyval == gdk::Key::Left {
      st.view.rotate(-KEY_ROTATION_STEP, 0.0);
    } else if keyval == gdk::Key::Right {
      st.view.rotate(KEY_ROTATION_STEP, 0.0);
    } else if keyval == gdk::Key::Up {
      st.view.rotate(0.0, -KEY_ROTATION_STEP);
    } else if keyval == gdk::Key::Down {
      st.view.rotate(0.0, KEY_ROTATION_STEP);
    } else if keyval == gdk::Key::plus || keyval == gdk::Key::KP_Add || keyval == gdk::Key::equal {
      st.view.zoom_by(1.1);
    } else if keyval == gdk::Key::minus || keyval == gdk::Key::KP_Subtract {
      st.view.zoom_by(0.9);
    } else if keyval == gdk::Key::Escape {
      st.selection.tap_node(None);
    } else {
      return glib::Propagation::Proceed;
    }
    v.queue_draw();
    glib::Propagation::Stop
  });
  window.add_controller(keys);
}
