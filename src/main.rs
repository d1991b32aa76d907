use std::process::ExitCode;

use clap::Parser;
use s3_lister::{Lister, S3Store};

mod args;
mod logging;

use args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::init_logging(args.log_level)?;

    // The client lives for the whole run and is dropped on every return path.
    let store = S3Store::connect(&args.s3_config()).await;

    let mut lister = Lister::new(store, args.list_request())
        .verbose(args.verbose)
        .honor_truncation(args.stop_on_truncation);

    let mut stdout = std::io::stdout().lock();
    let status = lister.execute(&mut stdout).await;

    Ok(status.into())
}
