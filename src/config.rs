// src/config.rs

use crate::graph::LayoutSettings;
use crate::physics::neighbours::MapParams;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExportFormat {
  Png,
  Pdf,
}

impl ExportFormat {
  /// Format implied by the file extension, if it is one we write.
  pub fn from_path(path: &Path) -> Option<Self> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
      "png" => Some(Self::Png),
      "pdf" => Some(Self::Pdf),
      _ => None,
    }
  }

  pub fn extension(self) -> &'static str {
    match self {
      Self::Png => "png",
      Self::Pdf => "pdf",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerStyle {
  /// Multiplies covalent radii when drawing atoms
  pub radius_scale: f64,
  pub show_unit_cell: bool,
  pub background_color: (f64, f64, f64),
  pub cell_color: (f64, f64, f64),
}

impl Default for ViewerStyle {
  fn default() -> Self {
    Self {
      radius_scale: 0.5,
      show_unit_cell: true,
      background_color: (1.0, 1.0, 1.0),
      cell_color: (0.5, 0.5, 0.5),
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  #[serde(default)]
  pub map: MapParams,

  #[serde(default)]
  pub layout: LayoutSettings,

  #[serde(default)]
  pub viewer: ViewerStyle,

  #[serde(default = "default_export_format")]
  pub default_export_format: ExportFormat,
}

fn default_export_format() -> ExportFormat {
  ExportFormat::Png
}

impl Default for Config {
  fn default() -> Self {
    Self {
      map: MapParams::default(),
      layout: LayoutSettings::default(),
      viewer: ViewerStyle::default(),
      default_export_format: default_export_format(),
    }
  }
}

impl Config {
  /// Loads config from the standard OS location (e.g. ~/.config/nbmap/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  pub fn save(&self) -> String {
    self.save_to(&Self::get_path())
  }

  /// Never fails: a missing or broken file gives the defaults plus a message.
  pub fn load_from(path: &Path) -> (Self, String) {
    if !path.exists() {
      return (Self::default(), "No config found. Using defaults.".to_string());
    }
    match File::open(path) {
      Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
        Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
        Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
      },
      Err(e) => (Self::default(), format!("Error opening config: {}", e)),
    }
  }

  pub fn save_to(&self, path: &Path) -> String {
    if let Some(parent) = path.parent() {
      let _ = fs::create_dir_all(parent);
    }
    match File::create(path) {
      Ok(file) => match serde_json::to_writer_pretty(BufWriter::new(file), self) {
        Ok(_) => format!("Config saved to {:?}", path),
        Err(e) => format!("Failed to save config: {}", e),
      },
      Err(e) => format!("Could not create config file: {}", e),
    }
  }

  fn get_path() -> PathBuf {
    // Matches the application id in main.rs
    if let Some(proj) = ProjectDirs::from("org", "nbmap", "nbmap") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
