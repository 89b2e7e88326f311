// src/menu/actions_file.rs

use crate::state::AppState;
use crate::ui::{self, Views};
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, FileChooserAction, FileChooserNative, FileFilter, ResponseType,
    TextView,
};
use nbmap::config::ExportFormat;
use nbmap::io;
use nbmap::rendering::export_structure;
use std::cell::RefCell;
use std::rc::Rc;

const EXPORT_SIZE: (u32, u32) = (1600, 1200);

fn filter(name: &str, patterns: &[&str]) -> FileFilter {
    let f = FileFilter::new();
    f.set_name(Some(name));
    for p in patterns {
        f.add_pattern(p);
    }
    f
}

pub fn setup(
    app: &Application,
    window: &ApplicationWindow,
    state: Rc<RefCell<AppState>>,
    views: &Views,
    console_view: &TextView,
) {
    // --- OPEN ACTION ---
    let open_action = gtk4::gio::SimpleAction::new("open", None);
    let win_weak = window.downgrade();
    let state_weak = Rc::downgrade(&state);
    let v = views.clone();
    let console_weak = console_view.downgrade();

    open_action.connect_activate(move |_, _| {
        let Some(win) = win_weak.upgrade() else { return };
        let dialog = FileChooserNative::new(
            Some("Open Structure File"),
            Some(&win),
            FileChooserAction::Open,
            Some("Open"),
            Some("Cancel"),
        );
        dialog.add_filter(&filter(
            "All Supported Files",
            &["*.xyz", "*.vasp", "POSCAR*", "CONTCAR*"],
        ));
        dialog.add_filter(&filter("All Files", &["*"]));

        let state_weak = state_weak.clone();
        let v = v.clone();
        let console_weak = console_weak.clone();
        dialog.connect_response(move |d, response| {
            if response == ResponseType::Accept {
                let path = d.file().and_then(|f| f.path());
                if let (Some(path), Some(st), Some(con)) =
                    (path, state_weak.upgrade(), console_weak.upgrade())
                {
                    ui::open_file(&st, &v, &con, &path);
                }
            }
            d.destroy();
        });
        dialog.show();
    });
    app.add_action(&open_action);

    // --- SAVE AS ACTION ---
    let save_action = gtk4::gio::SimpleAction::new("save_as", None);
    let win_weak = window.downgrade();
    let state_weak = Rc::downgrade(&state);

    save_action.connect_activate(move |_, _| {
        let Some(win) = win_weak.upgrade() else { return };
        let dialog = FileChooserNative::new(
            Some("Save Structure As"),
            Some(&win),
            FileChooserAction::Save,
            Some("Save"),
            Some("Cancel"),
        );
        dialog.add_filter(&filter("VASP POSCAR", &["POSCAR*", "*.vasp"]));
        dialog.add_filter(&filter("Extended XYZ (*.xyz)", &["*.xyz"]));
        dialog.set_current_name("POSCAR");

        let state_weak = state_weak.clone();
        dialog.connect_response(move |d, response| {
            if response == ResponseType::Accept {
                if let (Some(path), Some(st)) = (d.file().and_then(|f| f.path()), state_weak.upgrade()) {
                    let s = st.borrow();
                    match &s.structure {
                        Some(structure) => match io::save_structure(&path, structure) {
                            Ok(()) => log::info!("Saved to {:?}", path),
                            Err(e) => log::error!("Failed to save {:?}: {}", path, e),
                        },
                        None => log::warn!("No structure loaded"),
                    }
                }
            }
            d.destroy();
        });
        dialog.show();
    });
    app.add_action(&save_action);

    // --- EXPORT STRUCTURE IMAGE ---
    let export_action = gtk4::gio::SimpleAction::new("export", None);
    let win_weak = window.downgrade();
    let state_weak = Rc::downgrade(&state);

    export_action.connect_activate(move |_, _| {
        let Some(win) = win_weak.upgrade() else { return };
        let Some(st_rc) = state_weak.upgrade() else { return };

        let dialog = FileChooserNative::new(
            Some("Export Image"),
            Some(&win),
            FileChooserAction::Save,
            Some("Export"),
            Some("Cancel"),
        );
        let filter_png = filter("PNG Image (*.png)", &["*.png"]);
        let filter_pdf = filter("PDF Document (*.pdf)", &["*.pdf"]);
        dialog.add_filter(&filter_png);
        dialog.add_filter(&filter_pdf);

        let format = st_rc.borrow().config.default_export_format;
        match format {
            ExportFormat::Png => dialog.set_filter(&filter_png),
            ExportFormat::Pdf => dialog.set_filter(&filter_pdf),
        }
        dialog.set_current_name(&format!("structure.{}", format.extension()));

        let state_weak = state_weak.clone();
        dialog.connect_response(move |d, response| {
            if response == ResponseType::Accept {
                if let (Some(path), Some(st)) = (d.file().and_then(|f| f.path()), state_weak.upgrade()) {
                    let s = st.borrow();
                    if let Some(structure) = &s.structure {
                        let fmt = ExportFormat::from_path(&path).unwrap_or(format);
                        let highlight = s.selection.selected_atom;
                        if let Err(e) = export_structure(
                            structure,
                            &s.view,
                            &s.config.viewer,
                            highlight,
                            &path,
                            fmt,
                            EXPORT_SIZE,
                        ) {
                            log::error!("Export failed: {}", e);
                        }
                    }
                }
            }
            d.destroy();
        });
        dialog.show();
    });
    app.add_action(&export_action);

    // --- SAVE SETTINGS ---
    let settings_action = gtk4::gio::SimpleAction::new("save_settings", None);
    let s = state.clone();
    settings_action.connect_activate(move |_, _| {
        let msg = s.borrow().config.save();
        log::info!("{}", msg);
    });
    app.add_action(&settings_action);

    // --- QUIT ---
    let quit_action = gtk4::gio::SimpleAction::new("quit", None);
    let app_weak = app.downgrade();
    quit_action.connect_activate(move |_, _| {
        if let Some(app) = app_weak.upgrade() {
            app.quit();
        }
    });
    app.add_action(&quit_action);
}
