mod context;
mod gate;
mod handler;
mod routes;
mod scheduler;
mod writes;

pub use context::{AppContext, SharedContext, Targets};
pub use gate::SaveGate;
pub use handler::{ingest, IngestError};
pub use routes::router;
pub use scheduler::{schedule_store_tasks, Scheduler};
