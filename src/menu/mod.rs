// src/menu/mod.rs

use crate::state::AppState;
use crate::ui::Views;
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, TextView};
use std::cell::RefCell;
use std::rc::Rc;

pub mod actions_file;
pub mod actions_view;

pub fn build_menu_and_actions(
  app: &Application,
  window: &ApplicationWindow,
  state: Rc<RefCell<AppState>>,
  views: &Views,
  console_view: &TextView,
) -> gtk4::PopoverMenuBar {
  actions_file::setup(app, window, state.clone(), views, console_view);
  actions_view::setup(app, state, views);

  app.set_accels_for_action("app.open", &["<Primary>o"]);
  app.set_accels_for_action("app.save_as", &["<Primary><Shift>s"]);
  app.set_accels_for_action("app.export", &["<Primary>e"]);
  app.set_accels_for_action("app.quit", &["<Primary>q"]);
  app.set_accels_for_action("app.view_reset", &["<Primary>r"]);

  let root_model = gtk4::gio::Menu::new();

  let file_menu = gtk4::gio::Menu::new();
  file_menu.append(Some("Open..."), Some("app.open"));
  file_menu.append(Some("Save Structure As..."), Some("app.save_as"));
  file_menu.append(Some("Export Structure Image..."), Some("app.export"));
  file_menu.append(Some("Save Settings"), Some("app.save_settings"));
  file_menu.append(Some("Quit"), Some("app.quit"));
  root_model.append_submenu(Some("File"), &file_menu);

  let view_menu = gtk4::gio::Menu::new();
  view_menu.append(Some("Restore View"), Some("app.view_reset"));
  view_menu.append(Some("Toggle Unit Cell"), Some("app.toggle_cell"));
  view_menu.append(Some("Clear Selection"), Some("app.clear_selection"));
  root_model.append_submenu(Some("View"), &view_menu);

  gtk4::PopoverMenuBar::from_model(Some(&root_model))
}
