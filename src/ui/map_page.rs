// src/ui/map_page.rs
//
// "Neighbour Map" page: parameter controls above the graph panel and the
// weight image side by side.

use crate::state::AppState;
use gtk4::prelude::*;
use gtk4::{
  Adjustment, Button, DrawingArea, Entry, FileChooserAction, FileChooserNative, FileFilter, Label,
  Orientation, ResponseType, SpinButton,
};
use nbmap::config::ExportFormat;
use nbmap::rendering::graph_view::{draw_graph, GraphFrame};
use nbmap::rendering::heatmap::draw_heatmap;
use nbmap::rendering::export_linked_plot;
use plotters::prelude::*;
use plotters_cairo::CairoBackend;
use std::cell::RefCell;
use std::rc::Rc;

pub struct MapPage {
  pub root: gtk4::Box,
  pub graph: DrawingArea,
  pub image: DrawingArea,
}

fn labelled(text: &str, widget: &impl IsA<gtk4::Widget>) -> gtk4::Box {
  let b = gtk4::Box::new(Orientation::Horizontal, 5);
  b.append(&Label::new(Some(text)));
  b.append(widget);
  b
}

fn placeholder(cr: &gtk4::cairo::Context, w: i32, h: i32, text: &str) {
  cr.set_source_rgb(1.0, 1.0, 1.0);
  let _ = cr.paint();
  cr.set_source_rgb(0.4, 0.4, 0.4);
  cr.set_font_size(14.0);
  cr.move_to(w as f64 / 2.0 - 90.0, h as f64 / 2.0);
  let _ = cr.show_text(text);
}

pub fn build(state: Rc<RefCell<AppState>>) -> MapPage {
  let root = gtk4::Box::new(Orientation::Vertical, 10);
  root.set_margin_top(10);
  root.set_margin_bottom(10);
  root.set_margin_start(10);
  root.set_margin_end(10);

  // --- Controls ---
  let params = state.borrow().config.map.clone();
  let controls = gtk4::Box::new(Orientation::Horizontal, 15);

  let spin_atom = SpinButton::new(
    Some(&Adjustment::new(params.target_atom as f64, 0.0, 100_000.0, 1.0, 10.0, 0.0)),
    1.0,
    0,
  );
  let spin_size = SpinButton::new(
    Some(&Adjustment::new(params.target_size as f64, 1.0, 512.0, 1.0, 8.0, 0.0)),
    1.0,
    0,
  );
  let entry_factor = Entry::new();
  entry_factor.set_text(&params.cutoff_factor.to_string());
  entry_factor.set_width_chars(6);

  let btn_build = Button::with_label("Build Map");
  let btn_export = Button::with_label("Export...");

  controls.append(&labelled("Target atom:", &spin_atom));
  controls.append(&labelled("Size:", &spin_size));
  controls.append(&labelled("Cutoff factor:", &entry_factor));
  controls.append(&btn_build);
  controls.append(&btn_export);
  root.append(&controls);

  // --- Panels ---
  let panels = gtk4::Box::new(Orientation::Horizontal, 10);
  let graph = DrawingArea::new();
  let image = DrawingArea::new();
  for da in [&graph, &image] {
    da.set_hexpand(true);
    da.set_vexpand(true);
    da.set_content_width(400);
    da.set_content_height(400);
    panels.append(da);
  }
  root.append(&panels);

  let s = state.clone();
  graph.set_draw_func(move |_, cr, w, h| {
    let st = s.borrow();
    let Some(map) = &st.map else {
      placeholder(cr, w, h, "No map. Click Build Map.");
      return;
    };
    cr.set_source_rgb(1.0, 1.0, 1.0);
    let _ = cr.paint();
    let frame = GraphFrame::new(w as f64, h as f64);
    if let Err(e) = draw_graph(cr, &frame, &map.graph, &st.layout, &st.selection) {
      log::error!("Graph draw failed: {}", e);
    }
  });

  let s = state.clone();
  image.set_draw_func(move |_, cr, w, h| {
    let frame = {
      let st = s.borrow();
      let Some(map) = &st.map else {
        placeholder(cr, w, h, "");
        return;
      };
      let backend = match CairoBackend::new(cr, (w as u32, h as u32)) {
        Ok(b) => b,
        Err(e) => {
          log::error!("Image backend failed: {}", e);
          return;
        }
      };
      let area = backend.into_drawing_area();
      if let Err(e) = area.fill(&WHITE) {
        log::error!("Image draw failed: {}", e);
        return;
      }
      match draw_heatmap(&area, map, &st.selection) {
        Ok(frame) => Some(frame),
        Err(e) => {
          log::error!("Image draw failed: {}", e);
          None
        }
      }
    };
    s.borrow_mut().heatmap_frame = frame;
  });

  // --- Build ---
  let s = state.clone();
  let (g, i) = (graph.clone(), image.clone());
  btn_build.connect_clicked(move |_| {
    let mut st = s.borrow_mut();
    st.config.map.target_atom = spin_atom.value_as_int().max(0) as usize;
    st.config.map.target_size = spin_size.value_as_int().max(1) as usize;
    match entry_factor.text().trim().parse::<f64>() {
      Ok(v) => st.config.map.cutoff_factor = v,
      Err(_) => {
        log::error!("Cutoff factor '{}' is not a number", entry_factor.text());
        return;
      }
    }

    match st.build_map() {
      Ok(summary) => log::info!("{}", summary.trim_end()),
      Err(e) => {
        st.clear_map();
        log::error!("Map not built: {}", e);
      }
    }
    g.queue_draw();
    i.queue_draw();
  });

  // --- Export ---
  let s = state.clone();
  btn_export.connect_clicked(move |btn| {
    if s.borrow().map.is_none() {
      log::warn!("Nothing to export; build a map first");
      return;
    }
    let window = btn.root().and_then(|root| root.downcast::<gtk4::Window>().ok());
    let dialog = FileChooserNative::new(
      Some("Export Neighbour Map"),
      window.as_ref(),
      FileChooserAction::Save,
      Some("Export"),
      Some("Cancel"),
    );
    let filter_png = FileFilter::new();
    filter_png.set_name(Some("PNG Image (*.png)"));
    filter_png.add_pattern("*.png");
    dialog.add_filter(&filter_png);
    let filter_pdf = FileFilter::new();
    filter_pdf.set_name(Some("PDF Document (*.pdf)"));
    filter_pdf.add_pattern("*.pdf");
    dialog.add_filter(&filter_pdf);

    let default_format = s.borrow().config.default_export_format;
    dialog.set_current_name(&format!("neighbour_map.{}", default_format.extension()));

    let s_inner = s.clone();
    dialog.connect_response(move |d, response| {
      if response == ResponseType::Accept {
        if let Some(path) = d.file().and_then(|f| f.path()) {
          let st = s_inner.borrow();
          if let Some(map) = &st.map {
            let format = ExportFormat::from_path(&path).unwrap_or(default_format);
            if let Err(e) = export_linked_plot(map, &st.layout, &st.selection, &path, format) {
              log::error!("Export failed: {}", e);
            }
          }
        }
      }
      d.destroy();
    });
    dialog.show();
  });

  MapPage { root, graph, image }
}
