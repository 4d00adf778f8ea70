//! `sqldash` serves the parameter engine over HTTP.
//!
//! `POST /v1/form` answers with the typed parameters of a query and an input
//! control for each; `POST /v1/query` resolves the submitted values and runs
//! the query against the configured SQLite database.

use std::sync::Arc;

use tracing::info;

use sqldash::error::Result;
use sqldash::settings::Settings;
use sqldash::{logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    logging::init(&settings.log_filter);
    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    info!(address = %settings.bind_address, database = %settings.database, row_limit = settings.row_limit, "serving");
    axum::serve(listener, server::router(Arc::new(settings))).await?;
    Ok(())
}
