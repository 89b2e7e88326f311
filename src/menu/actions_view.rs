// src/menu/actions_view.rs

use crate::state::AppState;
use crate::ui::Views;
use gtk4::prelude::*;
use gtk4::Application;
use nbmap::rendering::ViewState;
use std::cell::RefCell;
use std::rc::Rc;

pub fn setup(app: &Application, state: Rc<RefCell<AppState>>, views: &Views) {
    let act_reset = gtk4::gio::SimpleAction::new("view_reset", None);
    let s = state.clone();
    let v = views.clone();
    act_reset.connect_activate(move |_, _| {
        s.borrow_mut().view = ViewState::default();
        v.structure.queue_draw();
    });
    app.add_action(&act_reset);

    let act_cell = gtk4::gio::SimpleAction::new("toggle_cell", None);
    let s = state.clone();
    let v = views.clone();
    act_cell.connect_activate(move |_, _| {
        let mut st = s.borrow_mut();
        st.config.viewer.show_unit_cell = !st.config.viewer.show_unit_cell;
        v.structure.queue_draw();
    });
    app.add_action(&act_cell);

    let act_clear = gtk4::gio::SimpleAction::new("clear_selection", None);
    let s = state;
    let v = views.clone();
    act_clear.connect_activate(move |_, _| {
        s.borrow_mut().selection.clear();
        v.queue_draw();
    });
    app.add_action(&act_clear);
}
