use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dataset::ColumnSpec;
use crate::error::ConfigError;
use crate::extract::ExtractOptions;

/// Runtime configuration, loaded from `config.toml`. Every field has a
/// default matching the known br.investing.com indices-table layout, so the
/// binary runs without any file present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub upstream_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Class on the quotes `<tbody>`; the page's structural marker.
    pub table_marker: String,
    pub min_columns: usize,
    pub numeric_columns: Vec<usize>,
    pub percent_columns: Vec<usize>,
    pub fallback_header: Vec<String>,
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: "https://br.investing.com/".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            request_timeout_secs: 15,
            table_marker: "datatable-v2_body__8TXQk".to_string(),
            min_columns: 2,
            numeric_columns: vec![1, 2, 3, 4],
            percent_columns: vec![5],
            fallback_header: ["Nome", "Último", "Máxima", "Mínima", "Variação", "Var. %"]
                .map(String::from)
                .to_vec(),
            csv_path: PathBuf::from("cotacoes.csv"),
            chart_path: PathBuf::from("static/variation.svg"),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    /// Loads the file at `path`, falling back to the defaults when it does
    /// not exist. A present-but-invalid file is an error, not a fallback.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            table_marker: self.table_marker.clone(),
            min_columns: self.min_columns,
            fallback_header: self.fallback_header.clone(),
        }
    }

    pub fn column_spec(&self) -> ColumnSpec {
        ColumnSpec {
            numeric: self.numeric_columns.clone(),
            percent: self.percent_columns.clone(),
        }
    }

    /// Column plotted by the variation chart: the first percent column.
    pub fn variation_column(&self) -> Option<usize> {
        self.percent_columns.first().copied()
    }

    /// URL path under which the HTML view references the chart artifact.
    pub fn chart_url(&self) -> String {
        format!("/{}", self.chart_path.display())
    }
}
