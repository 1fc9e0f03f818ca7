use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{ArgGroup, Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tryon_app::notify::{ChannelNotifier, Notification, NotificationLevel};
use tryon_app::{Orchestrator, TryOnClient, TryOnConfig};
use tryon_core::{BinaryResource, CatalogItem, GarmentCategory, ProcessingOutcome};

#[derive(Parser)]
#[command(name = "tryon", version, about = "Virtual clothing try-on client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Put a garment on a person photo
    Run(RunArgs),
    /// List preset garments
    Catalog {
        /// Only show one category, e.g. "Top Body"
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("garment_source")
        .required(true)
        .args(["garment", "garment_url", "catalog"])
))]
struct RunArgs {
    /// Full body photo of the person
    #[arg(long)]
    person: PathBuf,

    /// Garment image file
    #[arg(long)]
    garment: Option<PathBuf>,

    /// Garment image URL
    #[arg(long)]
    garment_url: Option<String>,

    /// Catalog item id (see `tryon catalog`)
    #[arg(long)]
    catalog: Option<String>,

    /// Where to write the result, defaults to tryon-result.<ext>
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Catalog { category } => list_catalog(category.as_deref()),
        Command::Run(args) => run(args).await,
    }
}

fn list_catalog(category: Option<&str>) -> anyhow::Result<()> {
    let items: Vec<&CatalogItem> = match category {
        Some(label) => {
            let Some(category) = GarmentCategory::from_label(label) else {
                let known: Vec<&str> = GarmentCategory::all().iter().map(|c| c.label()).collect();
                bail!("Unknown category {label:?}, expected one of: {}", known.join(", "));
            };
            CatalogItem::in_category(category).collect()
        }
        None => CatalogItem::all().iter().collect(),
    };

    for item in items {
        let price = item
            .price
            .map(|price| format!("${price}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<14} {:<26} {:<10} {:<6} {}",
            item.id,
            item.name,
            item.category.label(),
            price,
            item.collection.name()
        );
    }

    Ok(())
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let conf = TryOnConfig::load()?;
    tracing::info!(endpoint = %conf.endpoint, "Using try-on endpoint");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Notification>();
    let printer = tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            match notification.level {
                NotificationLevel::Loading => println!("… {}", notification.message),
                NotificationLevel::Success => println!("✓ {}", notification.message),
                NotificationLevel::Error => eprintln!("✗ {}", notification.message),
            }
        }
    });

    let client = TryOnClient::from_config(&conf, Arc::new(ChannelNotifier::new(tx)))?;
    let orchestrator = Orchestrator::new(client, conf.max_upload_mb);

    orchestrator
        .select_person_image(BinaryResource::from_path(&args.person))
        .await?;
    if let Some(path) = &args.garment {
        orchestrator
            .select_garment_image(BinaryResource::from_path(path))
            .await?;
    } else if let Some(url) = &args.garment_url {
        orchestrator.select_garment_url(url)?;
    } else if let Some(id) = &args.catalog {
        orchestrator.select_catalog_garment_by_id(id)?;
    }

    let result = loop {
        match orchestrator.run().await? {
            ProcessingOutcome::Success { result_image } => break Ok(result_image),
            ProcessingOutcome::Failure { kind, message, .. } => {
                if kind.needs_new_input() || !ask_retry().await? {
                    break Err(message);
                }
            }
        }
    };

    // Dropping the orchestrator closes the channel so the printer can finish.
    drop(orchestrator);
    printer.await?;

    let image = match result {
        Ok(image) => image,
        Err(message) => bail!(message),
    };

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("tryon-result.{}", image.extension())));
    let bytes = image
        .bytes()
        .context("result image could not be decoded")?;
    tokio::fs::write(&out, &*bytes)
        .await
        .with_context(|| format!("failed writing {}", out.display()))?;
    println!("Saved try-on result to {}", out.display());

    Ok(())
}

async fn ask_retry() -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }

    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Retry? [y/N] ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
