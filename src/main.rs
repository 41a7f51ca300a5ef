//! tablestate-rs: replays a table session and prints the fetches it issues.

use clap::Parser;
use std::io;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tablestate_rs::{
    load_events, read_events, Args, Config, JsonLinesResource, Session, TableState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging. Stdout carries the replay output, so logs go to stderr.
    let log_level = if args.debug {
        Level::DEBUG
    } else if args.silent {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let events = match &args.script {
        Some(path) => load_events(path)?,
        None => read_events(io::stdin().lock())?,
    };
    let realtime = args.realtime;

    // Create configuration from arguments
    let config = Config::from(args);
    let table = TableState::new(config, JsonLinesResource::new(io::stdout()))?;

    let mut session = Session::new(table, realtime);
    session.run(events).await?;

    let resource = session.into_resource();
    let (fetches, resets) = (resource.fetches(), resource.resets());
    resource.finish()?;
    info!(fetches, resets, "Session replayed");

    Ok(())
}
