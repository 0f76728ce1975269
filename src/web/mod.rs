//! Server-rendered variant: one form page re-rendered on every POST.

pub mod page;
pub mod render;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, State},
    response::Html,
    routing::get,
    Router,
};
use tokio::net::TcpListener;

use crate::data::model::Dataset;

use page::{render_page, DashboardForm};

/// The catalog is read-only after startup, so handlers share it without locking.
pub type SharedDataset = Arc<Dataset>;

pub fn router(dataset: SharedDataset) -> Router {
    Router::new()
        .route("/", get(serve_index).post(submit_index))
        .route("/health", get(health))
        .with_state(dataset)
}

pub async fn run(dataset: Dataset, bind: SocketAddr) -> anyhow::Result<()> {
    let app = router(Arc::new(dataset));
    let listener = TcpListener::bind(bind).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn serve_index(State(dataset): State<SharedDataset>) -> Html<String> {
    log::info!("GET /");
    Html(render_page(&dataset, &DashboardForm::default(), false))
}

/// A body that does not decode falls back to the unfiltered page.
async fn submit_index(
    State(dataset): State<SharedDataset>,
    form: Result<Form<DashboardForm>, FormRejection>,
) -> Html<String> {
    match form {
        Ok(Form(form)) => {
            log::info!("POST / {form:?}");
            Html(render_page(&dataset, &form, true))
        }
        Err(rejection) => {
            log::warn!("POST / with unreadable form: {rejection}");
            Html(render_page(&dataset, &DashboardForm::default(), false))
        }
    }
}

async fn health() -> &'static str {
    "ok"
}
