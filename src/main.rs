use std::{process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use openlibrary_search::{
    config::Config,
    covers::{Covers, DEFAULT_COVERS_BASE},
    logging,
    openlibrary::{client::DEFAULT_ENDPOINT, SearchClient},
    render::render_results,
    shell::{self, describe_failure, QUIT},
};
use tokio::io::BufReader;

#[derive(Parser)]
#[command(about = "Search Open Library from the terminal")]
struct Cli {
    /// Book search endpoint
    #[arg(long, env = "OPENLIBRARY_SEARCH_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Covers API base
    #[arg(long, env = "OPENLIBRARY_COVERS_URL", default_value = DEFAULT_COVERS_BASE)]
    covers_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single query and print the table
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Read queries from stdin, one per line
    Interactive,
}

// One-shot exit codes, so scripts can tell a network problem from an API change.
const EXIT_TRANSPORT: u8 = 2;
const EXIT_VALIDATION: u8 = 3;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let _sentry = logging::init();
    let cli = Cli::parse();

    let config = Config::new(&cli.endpoint, &cli.covers_url)?;
    let client = SearchClient::new(config.endpoint)?;
    let covers = Covers::new(&config.covers);

    match &cli.command {
        Commands::Search { query } => {
            let query = query.join(" ");
            match client.search(&query).await {
                Ok(results) => {
                    print!("{}", render_results(&results, &covers));
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("{}", describe_failure(&err));
                    let code = if err.is_transport() {
                        EXIT_TRANSPORT
                    } else {
                        EXIT_VALIDATION
                    };
                    Ok(ExitCode::from(code))
                }
            }
        }
        Commands::Interactive => {
            println!(
                "Type something and press enter to search ({} to quit). Examples: \"foundation asimov\" \"pride and prejudice\" \"william shakespeare\"",
                QUIT
            );
            let mut stdout = std::io::stdout();
            shell::run(
                Arc::new(client),
                BufReader::new(tokio::io::stdin()),
                &mut stdout,
                &covers,
            )
            .await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
