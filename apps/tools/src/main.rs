use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::Collection;
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/beers.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overwrite the menu with the starter dataset.
    Seed,
    /// Print a short summary of the stored menu.
    Show,
    /// Overwrite the menu with a JSON collection read from a file.
    Import { path: PathBuf },
    /// Print the stored menu as JSON.
    Export {
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::open(&cli.database_url).await?;
    let output = run(&storage, cli.command).await?;
    print!("{output}");
    Ok(())
}

async fn run(storage: &Storage, command: Command) -> Result<String> {
    let output = match command {
        Command::Seed => {
            storage.seed().await?;
            "seeded starter menu\n".to_string()
        }
        Command::Show => match storage.get().await? {
            None => "menu has not been seeded\n".to_string(),
            Some(beers) => summarize(&beers),
        },
        Command::Import { path } => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            let beers: Collection = serde_json::from_str(&raw)
                .with_context(|| format!("'{}' is not a beer collection", path.display()))?;
            storage.replace(&beers).await?;
            format!("imported {} beers\n", beers.len())
        }
        Command::Export { pretty } => {
            let beers = storage.load().await?;
            let mut json = if pretty {
                serde_json::to_string_pretty(&beers)?
            } else {
                serde_json::to_string(&beers)?
            };
            json.push('\n');
            json
        }
    };
    Ok(output)
}

fn summarize(beers: &Collection) -> String {
    let mut out = String::new();
    for (index, beer) in beers.iter().enumerate() {
        let style = beer.style.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "{index}: {} [{style}] {} fields\n",
            beer.name,
            beer.fields.len()
        ));
    }
    out
}
