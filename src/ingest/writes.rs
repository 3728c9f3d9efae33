//! Document store writes; failures are logged and never reach the caller
use chrono::Utc;

use crate::data_mgmt::{documents, Reading};
use crate::helpers::timestamp_key;
use crate::interfaces::firestore::{DocumentStore, StoreError};

use super::context::SharedContext;

fn merge_snapshot(
    store: &dyn DocumentStore,
    account: &str,
    reading: &Reading,
) -> Result<(), StoreError> {
    let key = timestamp_key(Utc::now());
    store.merge(
        &documents::snapshot_history_path(account),
        &documents::snapshot_history_fields(reading, key),
    )?;
    store.merge(
        &documents::account_summary_path(account),
        &documents::account_summary_fields(reading),
    )
}

/// Append a timestamp-keyed snapshot and refresh the account summary
pub async fn write_snapshot(ctx: &SharedContext, reading: Reading) {
    let store = ctx.store.clone();
    let account = ctx.targets.account.clone();
    let result = tokio::task::spawn_blocking(move || {
        merge_snapshot(store.as_ref(), &account, &reading)
    })
    .await;
    match result {
        Ok(Ok(())) => log::info!("Snapshot stored for {}", ctx.targets.account),
        Ok(Err(e)) => log::error!("Error storing snapshot: {}", e),
        Err(e) => log::error!("Snapshot task failed: {}", e),
    }
}

/// Overwrite the latest-values document read by the mobile client
pub async fn write_mirror(ctx: &SharedContext, reading: Reading) {
    let store = ctx.store.clone();
    let result = tokio::task::spawn_blocking(move || {
        store.merge(
            &documents::pond_mirror_path(),
            &documents::pond_mirror_fields(&reading, Utc::now()),
        )
    })
    .await;
    match result {
        Ok(Ok(())) => log::info!("Updated pond mirror document"),
        Ok(Err(e)) => log::error!("Error updating pond mirror document: {}", e),
        Err(e) => log::error!("Mirror task failed: {}", e),
    }
}
