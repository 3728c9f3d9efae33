use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;

use crate::argsets::ServeArgs;
use crate::config::Settings;
use crate::constants::scopes;
use crate::ingest::{self, AppContext, Scheduler, SharedContext, Targets};
use crate::interfaces::firestore::Firestore;
use crate::interfaces::google_auth::TokenSource;
use crate::interfaces::in_memory::{InMemorySheets, InMemoryStore};
use crate::interfaces::get_ureq_agent;
use crate::interfaces::sheets::GoogleSheets;

pub async fn serve(args: ServeArgs) -> Result<()> {
    let settings = Settings::from_env()?;
    let port = args.port.unwrap_or(settings.port);
    let ctx = build_context(&settings, args.dry_run);

    let mut scheduler = Scheduler::new();
    ingest::schedule_store_tasks(&mut scheduler, ctx.clone());

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("Server is listening on port {}", port);
    axum::serve(listener, ingest::router(ctx)).await?;

    drop(scheduler);
    Ok(())
}

fn build_context(settings: &Settings, dry_run: bool) -> SharedContext {
    let targets = Targets::from(settings);
    if dry_run {
        log::warn!("Dry run: sheet rows and documents are only logged");
        return AppContext::new(
            targets,
            Arc::new(InMemorySheets::logging_only()),
            Arc::new(InMemoryStore::logging_only()),
        );
    }

    let agent = get_ureq_agent();
    let endpoints = &settings.endpoints;
    let sheets = GoogleSheets::new(
        &endpoints.sheets_api,
        TokenSource::new(
            settings.credentials.clone(),
            &endpoints.token_uri,
            &[scopes::SPREADSHEETS],
            agent.clone(),
        ),
        agent.clone(),
    );
    let store = Firestore::new(
        &endpoints.firestore_api,
        TokenSource::new(
            settings.credentials.clone(),
            &endpoints.token_uri,
            &[scopes::DATASTORE],
            agent.clone(),
        ),
        agent,
    );
    AppContext::new(targets, Arc::new(sheets), Arc::new(store))
}
