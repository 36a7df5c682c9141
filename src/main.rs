use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use invoicer::config::{ConfigFile, CONFIG_TEMPLATE};
use invoicer::error::{InvoiceError, Result};
use invoicer::invoice::layout::Borders;
use invoicer::invoice::numbering::assign_numbers;
use invoicer::invoice::{parse_dates, Element, InvoiceGenerator};

#[derive(Parser)]
#[command(name = "invoicer")]
#[command(version, about = "Generate batches of PDF invoices from a config file", long_about = None)]
struct Cli {
    /// Location of config file
    #[arg(short, long, global = true, default_value = "config.ini")]
    config: PathBuf,

    /// Show diagnostic logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BatchArgs {
    /// Invoice type; must correspond to a section in the config file
    #[arg(short = 't', long)]
    invoice_type: Option<String>,

    /// Invoice number to start at
    #[arg(short = 'i', long, default_value_t = 1)]
    invoice_num: u64,

    /// Invoice dates, in YYYYMMDD format (can be repeated)
    #[arg(short, long, required = true, num_args = 1.., value_name = "YYYYMMDD")]
    dates: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file
    Init,

    /// Generate one PDF invoice per date
    Generate(BatchArgs),

    /// Show the invoices that would be generated without writing them
    Preview(BatchArgs),

    /// List the invoice types defined in the config file
    Types,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => cmd_init(&cli.config),
        Commands::Generate(args) => cmd_generate(&cli.config, &args),
        Commands::Preview(args) => cmd_preview(&cli.config, &args),
        Commands::Types => cmd_types(&cli.config),
    }
}

/// Write the starter config file
fn cmd_init(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(InvoiceError::AlreadyInitialized(path.to_path_buf()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, CONFIG_TEMPLATE)?;

    println!("Initialized invoice config at: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Fill in your details:  $EDITOR {}", path.display());
    println!("  2. Check invoice types:   invoicer -c {} types", path.display());
    println!();
    println!("Then generate your first invoices:");
    println!("  invoicer -c {} generate -t consulting -d <YYYYMMDD>", path.display());

    Ok(())
}

/// Validate dates and resolve the config; nothing is written if either fails.
fn load_batch(
    config_path: &Path,
    args: &BatchArgs,
) -> Result<(InvoiceGenerator, Vec<NaiveDate>)> {
    let dates = parse_dates(args.dates.as_slice())?;
    let config = ConfigFile::load(config_path)?.resolve(args.invoice_type.as_deref())?;
    tracing::debug!(count = dates.len(), start = args.invoice_num, "batch validated");
    Ok((InvoiceGenerator::new(config), dates))
}

/// Generate the batch of invoices
fn cmd_generate(config_path: &Path, args: &BatchArgs) -> Result<()> {
    let (generator, dates) = load_batch(config_path, args)?;
    generator.generate_batch(args.invoice_num, &dates)?;
    Ok(())
}

/// Print each composed invoice as text tables
fn cmd_preview(config_path: &Path, args: &BatchArgs) -> Result<()> {
    let (generator, dates) = load_batch(config_path, args)?;

    for (date, seq) in assign_numbers(&dates, args.invoice_num)? {
        let invoice = generator.prepare(date, seq)?;

        println!("Invoice {} ({})", invoice.number, invoice.date);
        println!("  File: {}", invoice.path.display());

        for element in &invoice.document.elements {
            match element {
                Element::Title(title) => println!("{:>60}", title.text),
                Element::Spacer { lines } => print!("{}", "\n".repeat(*lines)),
                Element::Table(table) => {
                    let mut builder = Builder::default();
                    for row in &table.rows {
                        builder.push_record(row.iter().map(|cell| cell.text.clone()));
                    }
                    let mut rendered = builder.build();
                    if table.rows.iter().flatten().any(|c| c.borders != Borders::NONE) {
                        rendered.with(Style::rounded());
                    } else {
                        rendered.with(Style::blank());
                    }
                    println!("{rendered}");
                }
            }
        }
        println!();
    }

    Ok(())
}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "TYPE")]
    name: String,
    #[tabled(rename = "OVERRIDES")]
    keys: String,
}

/// List invoice types
fn cmd_types(config_path: &Path) -> Result<()> {
    let config = ConfigFile::load(config_path)?;

    let rows: Vec<TypeRow> = config
        .sections()
        .map(|(name, keys)| TypeRow {
            name: name.to_string(),
            keys: keys.join(", "),
        })
        .collect();

    if rows.is_empty() {
        println!("No invoice types configured.");
        println!("Add sections to: {}", config.path().display());
        return Ok(());
    }

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}
