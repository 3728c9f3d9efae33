use anyhow::{anyhow, Result};
use env_logger::Env;

use pond_ingest::argsets::ServeArgs;
use pond_ingest::constants::{defaults, envvars};
use pond_ingest::{command, helpers};

const CMD_SERVE: &str = "serve";

#[tokio::main]
async fn main() -> Result<()> {
    helpers::load_dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();

    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        None | Some(CMD_SERVE) => {
            let serve_args = ServeArgs {
                port: args.opt_value_from_str("--port")?,
                dry_run: args.contains("--dry-run"),
            };
            let unused = args.finish();
            if !unused.is_empty() {
                log::warn!("Ignoring unrecognized arguments: {:?}", unused);
            }
            command::serve(serve_args).await
        }
        Some(other) => Err(anyhow!("Unknown subcommand '{other}'; expected 'serve'")),
    }
}
