// src/utils/logger.rs
//
// log::Log implementation that appends records to the console TextView.

use gtk4::prelude::*;
use gtk4::{glib, TextView};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::sync::OnceLock;

static LOG_VIEW: OnceLock<glib::SendWeakRef<TextView>> = OnceLock::new();
static LOGGER: GtkLogger = GtkLogger;

struct GtkLogger;

const TAGS: [(&str, &str, bool); 4] = [
  ("error", "#ff4444", true),
  ("warn", "#ffbb33", false),
  ("info", "#33b5e5", false),
  ("debug", "#aaaaaa", false),
];

fn tag_for(level: Level) -> &'static str {
  match level {
    Level::Error => "error",
    Level::Warn => "warn",
    Level::Info => "info",
    Level::Debug | Level::Trace => "debug",
  }
}

/// Installs the logger; records above `level` are dropped.
pub fn init(view: &TextView, level: LevelFilter) -> Result<(), SetLoggerError> {
  let tag_table = view.buffer().tag_table();
  for (name, colour, bold) in TAGS {
    if tag_table.lookup(name).is_none() {
      let tag = gtk4::TextTag::new(Some(name));
      tag.set_property("foreground", colour);
      if bold {
        tag.set_property("weight", 700);
      }
      tag_table.add(&tag);
    }
  }

  let _ = LOG_VIEW.set(view.downgrade().into());
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

impl log::Log for GtkLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if !self.enabled(record.metadata()) {
      return;
    }
    let tag_name = tag_for(record.level());
    let msg = format!("[{:<5}] {}\n", record.level(), record.args());

    // Records may come from rayon workers; the buffer is touched on the main loop only
    glib::MainContext::default().invoke(move || {
      if let Some(view) = LOG_VIEW.get().and_then(|weak| weak.upgrade()) {
        let buffer = view.buffer();
        let mut end = buffer.end_iter();
        buffer.insert_with_tags_by_name(&mut end, &msg, &[tag_name]);

        let mark = buffer.create_mark(None, &buffer.end_iter(), false);
        view.scroll_to_mark(&mark, 0.0, true, 0.0, 1.0);
        buffer.delete_mark(&mark);
      }
    });
  }

  fn flush(&self) {}
}
