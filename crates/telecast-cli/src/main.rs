use clap::{Parser, Subcommand};

use telecast_api::types::Show;
use telecast_api::TvMazeClient;
use telecast_core::config::AppConfig;
use telecast_core::store::CatalogStore;
use telecast_core::TelecastError;

#[derive(Parser)]
#[command(name = "telecast", about = "Browse a TV-show catalog from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List shows from the index, grouped by genre.
    Browse {
        /// Index pages to load (defaults to the configured pages).
        #[arg(short, long)]
        pages: Vec<u32>,
    },
    /// Search shows by name.
    Search { query: String },
    /// Details for one show.
    Show { id: u64 },
    /// Episodes of a show, grouped by season.
    Episodes { id: u64 },
    /// Cast of a show.
    Cast { id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), TelecastError> {
    tracing_subscriber::fmt()
        .with_env_filter("telecast=info")
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let client = TvMazeClient::with_base_url(&config.api.base_url, config.api.timeout())?;
    let store = CatalogStore::new(client);

    match cli.command {
        Command::Browse { pages } => {
            let pages = if pages.is_empty() {
                config.catalog.index_pages.clone()
            } else {
                pages
            };
            store.load_index_pages(&pages).await;
            if let Some(error) = store.error() {
                eprintln!("warning: {error}");
            }
            for (genre, shows) in store.grouped_by_genre() {
                println!("{genre}");
                for show in shows {
                    println!("  {:>6}  {}  {}", show.id, rating_label(&show), show.name);
                }
            }
        }
        Command::Search { query } => {
            store.search(&query).await;
            if let Some(error) = store.search_error() {
                eprintln!("error: {error}");
                std::process::exit(1);
            }
            for show in store.search_results() {
                println!("{:>6}  {}  {}", show.id, rating_label(&show), show.name);
            }
        }
        Command::Show { id } => {
            let show = store.fetch_show_details(id).await?;
            println!("{}", show.name);
            println!("  genres:    {}", show.genres.join(", "));
            println!("  rating:    {}", rating_label(&show));
            if let Some(language) = &show.language {
                println!("  language:  {language}");
            }
            if let Some(status) = &show.status {
                println!("  status:    {status}");
            }
            if let Some(premiered) = &show.premiered {
                println!("  premiered: {premiered}");
            }
            if let Some(runtime) = show.runtime {
                println!("  runtime:   {runtime} min");
            }
            if let Some(site) = &show.official_site {
                println!("  site:      {site}");
            }
        }
        Command::Episodes { id } => {
            store.fetch_episodes(id).await?;
            for (season, episodes) in store.episodes_by_season(id) {
                println!("Season {season}");
                for episode in episodes {
                    let number = episode
                        .number
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "?".into());
                    println!("  {number:>3}  {}", episode.name);
                }
            }
        }
        Command::Cast { id } => {
            for member in store.fetch_cast(id).await? {
                let person = member.person.name.as_deref().unwrap_or("Unknown");
                println!("{person} as {}", member.character.name);
            }
        }
    }

    Ok(())
}

fn rating_label(show: &Show) -> String {
    show.rating
        .as_ref()
        .and_then(|r| r.average)
        .map(|avg| format!("{avg:.1}"))
        .unwrap_or_else(|| " --".into())
}
