//! rowpager - incremental terminal pager
//!
//! Pages through JSON documents and text files a screenful of rows at a time.
//! Nested JSON objects with an `items` array are paginated as panels that
//! share each page's row budget with their siblings.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! rowpager data.json -r 20
//!
//! # Print every page and exit
//! cat notes.txt | rowpager --dump -r 40
//! ```

use std::sync::Arc;

use futures::StreamExt;
use serde_json::Value;
use tracing::Level;

use rowpager::cli::CliInterface;
use rowpager::engine::{ItemStream, PagerHandle, PaginationNode, Paginator};
use rowpager::error::Result;
use rowpager::formatter::Formatter;
use rowpager::repl::{CommandOutcome, PagerSession, ReplEngine, SourceSpec, parse_command};
use rowpager::source::{self, JsonTemplate};
use rowpager::PagerError;

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands or open the input
/// 4. Dump every page, or start the interactive pager
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    let session = create_session(&cli).await?;

    if cli.args().dump {
        for page in session.dump_pages().await? {
            println!("{page}");
        }
        return Ok(());
    }

    if cli.input_path().is_none() {
        return Err(PagerError::Generic(
            "The interactive pager needs an input file; use --dump to page stdin".to_string(),
        ));
    }

    cli.print_banner();
    run_interactive_mode(&cli, &session).await
}

/// Open the input and build the paginator around it
async fn create_session(cli: &CliInterface) -> Result<PagerSession> {
    let config = cli.config();

    let (stream, spec): (ItemStream<Value>, Option<SourceSpec>) = match cli.input_path() {
        Some(path) => {
            let spec = SourceSpec::new(path, config.source.format, config.source_latency());
            (spec.open().await?, Some(spec))
        }
        None => {
            let lines = source::lines_from_reader(tokio::io::BufReader::new(tokio::io::stdin()));
            let stream = source::with_latency(lines, config.source_latency());
            (stream.map(|line| line.map(Value::String)).boxed(), None)
        }
    };

    let root = PaginationNode::new(stream).with_template(Arc::new(JsonTemplate));
    let paginator = Paginator::new(root, config.pagination.rows_per_page);
    Ok(PagerSession::new(
        PagerHandle::new(paginator),
        Formatter::new(&config.display),
        spec,
    ))
}

/// Run the pager in interactive mode
async fn run_interactive_mode(cli: &CliInterface, session: &PagerSession) -> Result<()> {
    session.start().await?;
    println!("{}", session.render().await);

    let mut repl = ReplEngine::new(&cli.config().history)?;

    while repl.is_running() {
        repl.set_status(session.status().await);

        let input = match repl.read_line()? {
            Some(line) => line,
            None => break,
        };

        let command = match parse_command(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match session.execute(command).await {
            Ok(CommandOutcome::Render) => println!("{}", session.render().await),
            Ok(CommandOutcome::Message(message)) => println!("{message}"),
            Ok(CommandOutcome::Quit) => repl.stop(),
            Err(e) => eprintln!("{e}"),
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// Logs go to stderr so pages on stdout stay clean.
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
