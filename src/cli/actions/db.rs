use crate::api::{self, storage};
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    Reset,
}

#[derive(Debug)]
pub struct Args {
    pub dsn: SecretString,
    pub operation: Operation,
}

/// Apply or drop the schema.
/// # Errors
/// Returns an error if the database is unreachable or a statement fails.
pub async fn execute(args: Args) -> Result<()> {
    let pool = api::connect(&args.dsn).await?;

    let statements = match args.operation {
        Operation::Init => storage::apply_schema(&pool).await?,
        Operation::Reset => storage::reset(&pool).await?,
    };

    info!("{:?}: executed {statements} statements", args.operation);
    println!("{:?} complete ({statements} statements)", args.operation);

    pool.close().await;

    Ok(())
}
