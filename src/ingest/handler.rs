//! Per-request ingestion flow
use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tokio::task::{spawn_blocking, JoinError};
use tokio::time::Instant;

use crate::data_mgmt::normalize;
use crate::helpers::sheet_timestamp;
use crate::interfaces::sheets::SheetsError;

use super::context::SharedContext;
use super::writes::{write_mirror, write_snapshot};

/// Failures that turn a request into an error response
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("could not authorize spreadsheet access: {0}")]
    Authorize(#[source] SheetsError),
    #[error("could not append to primary sheet: {0}")]
    Append(#[source] SheetsError),
    #[error("background task failed: {0}")]
    Task(#[from] JoinError),
}

/// Normalize a sensor payload, log it to both sheets, snapshot it if the save
/// gate is open, and mirror it to the pond document.
///
/// The latest values are updated before any network call, so they reflect the
/// reading even when the request fails afterwards.
pub async fn ingest(ctx: &SharedContext, payload: &Value) -> Result<(), IngestError> {
    let reading = normalize(payload);
    log::debug!("Normalized reading: {:?}", reading);
    ctx.latest.write().await.record(reading.clone(), Instant::now());

    let sheets = ctx.sheets.clone();
    let session = spawn_blocking(move || sheets.authorize())
        .await?
        .map_err(IngestError::Authorize)?;

    let row = reading.sheet_row(sheet_timestamp(Utc::now()));

    // Raw log is best-effort and not awaited
    {
        let session = session.clone();
        let row = row.clone();
        let sheet_raw_id = ctx.targets.sheet_raw_id.clone();
        spawn_blocking(move || match session.append_row(&sheet_raw_id, &row) {
            Ok(()) => log::info!("Raw sheet row saved"),
            Err(e) => log::error!("Could not save raw sheet row: {}", e),
        });
    }

    let sheet_id = ctx.targets.sheet_id.clone();
    spawn_blocking(move || session.append_row(&sheet_id, &row))
        .await?
        .map_err(IngestError::Append)?;
    log::info!("Primary sheet row saved");

    if ctx.save_gate.try_consume() {
        log::debug!("Save gate was open; storing snapshot");
        write_snapshot(ctx, reading.clone()).await;
    }

    write_mirror(ctx, reading).await;
    Ok(())
}
