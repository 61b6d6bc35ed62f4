//! HTTP view collaborator: one page with the quotes table and the chart.
//!
//! Every request runs its own fetch cycle; concurrent requests interleave
//! artifact writes last-writer-wins, which matches how the artifacts are
//! consumed (each page load references whatever was written most recently).

use std::sync::Arc;

use askama::Template;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::services::ServeDir;
use tracing::error;

use crate::chart;
use crate::config::Config;
use crate::export;
use crate::pipeline::FetchPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    skipped_rows: usize,
    chart_url: String,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    message: String,
}

pub fn app_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    Router::new()
        .route("/", get(index))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let pipeline = match FetchPipeline::new(state.config.clone()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("failed to build pipeline: {}", e);
            return error_page(&e.to_string());
        }
    };

    let dataset = match pipeline.run().await {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("fetch cycle failed: {}", e);
            return error_page(&e.to_string());
        }
    };

    if let Err(e) = export::write_csv(&dataset, &state.config.csv_path) {
        error!("CSV write failed: {}", e);
        return error_page(&e.to_string());
    }

    let mut chart_url = String::new();
    if let Some(column) = state.config.variation_column() {
        match chart::render_variation_chart(&dataset, column, &state.config.chart_path) {
            Ok(()) => chart_url = state.config.chart_url(),
            Err(e) => {
                error!("chart rendering failed: {}", e);
                return error_page(&e.to_string());
            }
        }
    }

    let template = IndexTemplate {
        header: dataset.header().to_vec(),
        rows: dataset
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
        skipped_rows: dataset.skipped_rows(),
        chart_url,
    };
    Html(template.render().expect("Template rendering failed"))
}

fn error_page(message: &str) -> Html<String> {
    let template = ErrorTemplate {
        message: message.to_string(),
    };
    Html(template.render().expect("Template rendering failed"))
}
