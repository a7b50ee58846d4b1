pub mod db;
pub mod server;

use crate::cli::telemetry;
use anyhow::Result;

#[derive(Debug)]
pub enum Action {
    Server(server::Args),
    Db(db::Args),
}

impl Action {
    /// Run the action to completion, flushing traces on the way out.
    ///
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        let result = match self {
            Self::Server(args) => server::execute(args).await,
            Self::Db(args) => db::execute(args).await,
        };

        telemetry::shutdown_tracer();

        result
    }
}
