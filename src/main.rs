use aptscope::{dashboard, App};
use aptscope_core::{create_listing_table, Credentials, KakaoGeocoder, Listing, Result, Session, Settings};
use aptscope_scrapers::{ScraperFactory, ScraperType};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search apartment complexes by name
    #[command(about = "Search apartment complexes by name")]
    #[command(long_about = "Search hogangnono.com by keyword and list the matching complexes with their links.")]
    Search(SearchCommand),

    /// Show the details of one complex
    #[command(about = "Show the details of one complex")]
    #[command(long_about = "Extract the details of one complex and show them with its price trend, region comparison and map. Optionally write an HTML dashboard, a CSV history or a PDF report.")]
    Detail(DetailCommand),

    /// Interactive dashboard
    #[command(about = "Interactive dashboard")]
    #[command(long_about = "Search, pick a result, view its details and export them from one interactive session.")]
    Dashboard,
}

#[derive(Parser)]
struct SearchCommand {
    /// Apartment name or keyword
    keyword: String,
}

#[derive(Parser)]
struct DetailCommand {
    /// Listing link as shown by `search` (URL or site path)
    reference: String,

    /// Name to show for the listing (-n, --name)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Write an HTML dashboard to this file (-H, --html)
    #[arg(short = 'H', long)]
    html: Option<PathBuf>,

    /// Write the transaction history to this CSV file (-c, --csv)
    #[arg(short = 'c', long)]
    csv: Option<PathBuf>,

    /// Export a PDF report into the output directory (-e, --export)
    #[arg(short = 'e', long)]
    export: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;

    // Nothing works without Kakao keys, so stop before touching the browser.
    let credentials = Credentials::load(&settings.credentials)?;
    let geocoder = Arc::new(KakaoGeocoder::new(&credentials));
    let source = ScraperFactory::create_scraper(ScraperType::Hogangnono, &settings);
    let app = App::new(source, geocoder, credentials, settings);

    match cli.command {
        Commands::Search(cmd) => {
            let listings = app.search(&cmd.keyword).await?;
            if listings.is_empty() {
                println!("No results for {}", cmd.keyword);
            } else {
                info!("Found {} listings for {}", listings.len(), cmd.keyword);
                println!("{}", create_listing_table(&listings));
            }
        }
        Commands::Detail(cmd) => {
            let listing = Listing {
                name: cmd.name.unwrap_or_else(|| cmd.reference.clone()),
                reference: cmd.reference,
                ..Listing::default()
            };
            let detail = app.detail(&listing).await?;
            let view = app.view(listing.clone(), detail.clone()).await;
            println!("{}", view.render_terminal());

            if let Some(path) = cmd.html {
                app.write_html(&view, &path)?;
                println!("{} {}", "Wrote".green(), path.display());
            }
            if let Some(path) = cmd.csv {
                app.write_csv(&detail, &path)?;
                println!("{} {}", "Wrote".green(), path.display());
            }
            if cmd.export {
                let path = app.export(&listing, &detail).await?;
                println!("{} {}", "Saved report".green(), path.display());
            }
        }
        Commands::Dashboard => {
            let mut session = Session::default();
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = io::stdout();
            dashboard::run(&app, &mut session, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}
