use clap::{Parser, Subcommand};
use cloud_kitchen_menu::config::{ConvertConfig, ServeConfig, SourceLocation};
use cloud_kitchen_menu::{build_catalog, extract, server, write_catalog};

#[derive(Parser)]
#[command(name = "main", about = "Cloud kitchen menu PDF to JSON converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the menu PDFs and write the JSON catalog
    Convert(ConvertConfig),
    /// Serve the catalog and log orders over HTTP
    Serve(ServeConfig),
    /// Print every non-empty line extracted from one PDF
    Dump {
        /// Path or http(s) URL of the PDF
        location: SourceLocation,
    },
}

async fn convert(config: ConvertConfig) -> anyhow::Result<()> {
    println!("Cloud Kitchen Menu Converter");
    println!("{}", "=".repeat(50));

    let client = extract::build_client()?;
    let report = build_catalog(&client, &config.sources, config.debug_dir.as_deref()).await;

    for summary in &report.categories {
        if summary.loaded {
            println!("Found {} {} items", summary.items, summary.category);
        } else {
            println!("{} menu not loaded, no items added", summary.category);
        }
    }

    write_catalog(&config.output, &report.items)?;
    println!(
        "Successfully created catalog with {} items",
        report.items.len()
    );
    println!("Output saved to: {}", config.output.display());

    if !report.items.is_empty() {
        let shown = config.show.unwrap_or(report.items.len());
        println!("\nMenu items:");
        for item in report.items.iter().take(shown) {
            println!("  • {} - ₹{} ({})", item.name, item.price, item.category);
        }
    }

    Ok(())
}

async fn dump(location: SourceLocation) -> anyhow::Result<()> {
    let client = extract::build_client()?;
    let text = extract::load_menu_text(&client, &location).await?;

    println!("=== FULL PDF TEXT ===");
    for (i, line) in text.lines().enumerate() {
        if !line.trim().is_empty() {
            println!("{}: {:?}", i, line);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(config) => convert(config).await,
        Commands::Serve(config) => server::serve(&config).await,
        Commands::Dump { location } => dump(location).await,
    }
}
