use gtk4::prelude::*;
use gtk4::Box as GtkBox;
use gtk4::{
  gio, glib, Application, ApplicationWindow, Frame, Label, Notebook, Orientation, Paned, ScrolledWindow,
  TextView,
};
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

mod menu;
mod state;
mod ui;

use state::AppState;
use ui::interactions::setup_interactions;
use ui::Views;

const APP_ID: &str = "org.nbmap.NBMap";

fn main() -> glib::ExitCode {
  let app = Application::builder()
    .application_id(APP_ID)
    .flags(gio::ApplicationFlags::HANDLES_OPEN)
    .build();

  // One window per process: the logger is bound to its console
  let shell: Rc<OnceCell<Shell>> = Rc::new(OnceCell::new());

  let shell_activate = shell.clone();
  app.connect_activate(move |app| {
    window_for(app, &shell_activate);
  });
  app.connect_open(move |app, files, _hint| {
    let (state, views, console) = window_for(app, &shell);
    if let Some(path) = files.first().and_then(|f| f.path()) {
      ui::open_file(state, views, console, &path);
    }
  });
  app.run()
}

type Shell = (Rc<RefCell<AppState>>, Views, TextView);

fn window_for<'a>(app: &Application, shell: &'a OnceCell<Shell>) -> &'a Shell {
  let built = shell.get().is_some();
  let ui = get_or_build(shell, || build_ui(app));
  if built {
    if let Some(window) = app.active_window() {
      window.present();
    }
  }
  ui
}

/// Builds the value on first use and hands back the same one afterwards.
fn get_or_build<T>(slot: &OnceCell<T>, build: impl FnOnce() -> T) -> &T {
  slot.get_or_init(build)
}

fn build_ui(app: &Application) -> (Rc<RefCell<AppState>>, Views, TextView) {
  let window = ApplicationWindow::builder()
    .application(app)
    .title("NBMap - Neighbourhood Map Viewer")
    .default_width(1300)
    .default_height(850)
    .build();

  // Console first so the logger sees startup messages
  let console_view = TextView::builder()
    .editable(false)
    .cursor_visible(false)
    .monospace(true)
    .left_margin(10)
    .right_margin(10)
    .top_margin(10)
    .bottom_margin(10)
    .build();
  if nbmap::utils::logger::init(&console_view, log::LevelFilter::Info).is_err() {
    log::debug!("Logger already installed");
  }

  let mut initial_state = AppState::new();
  let msg = initial_state.load_config();
  log::info!("{}", msg);
  let state = Rc::new(RefCell::new(initial_state));

  // Pages
  let structure_area = ui::structure_page::build(state.clone());
  let map_page = ui::map_page::build(state.clone());
  let views = Views {
    structure: structure_area.clone(),
    graph: map_page.graph.clone(),
    image: map_page.image.clone(),
  };

  let notebook = Notebook::new();
  notebook.append_page(&structure_area, Some(&Label::new(Some("Structure"))));
  notebook.append_page(&map_page.root, Some(&Label::new(Some("Neighbour Map"))));

  let info_frame = Frame::new(Some("Console"));
  let scroll_win = ScrolledWindow::builder()
    .min_content_height(150)
    .child(&console_view)
    .build();
  info_frame.set_child(Some(&scroll_win));

  let paned = Paned::new(Orientation::Vertical);
  paned.set_start_child(Some(&notebook));
  paned.set_end_child(Some(&info_frame));
  paned.set_position(620);
  paned.set_vexpand(true);

  let menu_bar = menu::build_menu_and_actions(app, &window, state.clone(), &views, &console_view);

  let root_vbox = GtkBox::new(Orientation::Vertical, 0);
  root_vbox.append(&menu_bar);
  root_vbox.append(&paned);
  window.set_child(Some(&root_vbox));

  setup_interactions(&window, state.clone(), &views);

  window.present();
  (state, views, console_view)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;

  #[test]
  fn test_second_request_reuses_the_window() {
    let slot = OnceCell::new();
    let builds = Cell::new(0);
    let build = || {
      builds.set(builds.get() + 1);
      builds.get()
    };

    let first = *get_or_build(&slot, build);
    let second = *get_or_build(&slot, build);
    assert_eq!(first, 1);
    assert_eq!(second, 1);
    assert_eq!(builds.get(), 1);
  }
}
