pub mod interactions;
pub mod map_page;
pub mod structure_page;

use crate::state::AppState;
use gtk4::prelude::*;
use gtk4::{DrawingArea, TextView};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Drawing areas that depend on the application state.
#[derive(Clone)]
pub struct Views {
    pub structure: DrawingArea,
    pub graph: DrawingArea,
    pub image: DrawingArea,
}

impl Views {
    pub fn queue_draw(&self) {
        self.structure.queue_draw();
        self.queue_draw_map();
    }

    pub fn queue_draw_map(&self) {
        self.graph.queue_draw();
        self.image.queue_draw();
    }
}

pub fn log_to_console(console_view: &TextView, message: &str) {
    let buffer = console_view.buffer();
    let mut end_iter = buffer.end_iter();
    if buffer.char_count() > 0 {
        buffer.insert(&mut end_iter, "\n--------------------------------\n");
    }
    buffer.insert(&mut end_iter, message);
    let mark = buffer.create_mark(None, &end_iter, false);
    console_view.scroll_to_mark(&mark, 0.0, true, 0.0, 1.0);
    buffer.delete_mark(&mark);
}

/// Loads a structure file into the state; failures are logged.
pub fn open_file(state: &Rc<RefCell<AppState>>, views: &Views, console: &TextView, path: &Path) {
    match nbmap::io::load_structure(path) {
        Ok(structure) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let summary = state.borrow_mut().set_structure(structure, &file_name);
            log_to_console(console, &summary);
            views.queue_draw();
        }
        Err(e) => log::error!("Error loading {:?}: {}", path, e),
    }
}
