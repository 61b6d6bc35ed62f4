//! Variation bar chart. A pure read of the dataset; overwritten every cycle.

use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use tracing::info;

use crate::dataset::QuoteDataset;
use crate::error::ArtifactError;

const GAIN: RGBColor = RGBColor(0x4c, 0xaf, 0x50);
const LOSS: RGBColor = RGBColor(0xf4, 0x43, 0x36);

/// Renders a bar chart of the percentage-variation column, one bar per row,
/// green for gains and red for losses, with a dashed zero baseline.
pub fn render_variation_chart(
    dataset: &QuoteDataset,
    percent_column: usize,
    path: &Path,
) -> Result<(), ArtifactError> {
    let column_name = dataset
        .column_name(percent_column)
        .ok_or_else(|| ArtifactError::Chart(format!("no column at index {percent_column}")))?
        .to_string();
    let variations = dataset.numeric_column(&column_name).ok_or_else(|| {
        ArtifactError::Chart(format!("column '{column_name}' is not numeric"))
    })?;
    if variations.is_empty() {
        return Err(ArtifactError::Chart("dataset has no rows to plot".into()));
    }
    let names = dataset.category_column();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let low = variations.iter().cloned().fold(f64::INFINITY, f64::min).min(0.0);
    let high = variations.iter().cloned().fold(f64::NEG_INFINITY, f64::max).max(0.0);
    let pad = ((high - low) * 0.1).max(0.1);

    let root = SVGBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Variação Percentual dos Índices Globais", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(100)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..variations.len(), (low - pad)..(high + pad))
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(variations.len() + 1)
        .x_label_formatter(&|index: &usize| {
            names.get(*index).map(|name| name.to_string()).unwrap_or_default()
        })
        .y_desc("Variação (%)")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(variations.iter().enumerate().map(|(index, value)| {
            let color = if *value >= 0.0 { GAIN } else { LOSS };
            Rectangle::new([(index, 0.0), (index + 1, *value)], color.filled())
        }))
        .map_err(chart_error)?;

    // Zero baseline, dashed like the matplotlib original
    chart
        .draw_series(DashedLineSeries::new(
            [(0usize, 0.0), (variations.len(), 0.0)],
            6,
            4,
            BLACK.stroke_width(1),
        ))
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    info!(path = %path.display(), bars = variations.len(), "chart artifact written");
    Ok(())
}

fn chart_error<E: std::fmt::Display>(err: E) -> ArtifactError {
    ArtifactError::Chart(err.to_string())
}
