//! apriori-compress - mine frequent itemsets and use them to compress a
//! transaction file.
//!
//! Usage:
//!   apriori-compress --input D_small.dat --output D_small_compressed.dat --min-support 0.05 --max-len 2 --max-entries 100
//!   apriori-compress --input D_medium.dat --dictionary dictionary.json --json

use std::path::PathBuf;

use apriori_compress::{MiningConfig, Pipeline, RunSummary};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "apriori-compress")]
#[command(about = "Compress transactions with a dictionary of frequent itemsets")]
struct Args {
    /// Input file, one transaction per line
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the compressed transactions
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the dictionary as JSON
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum support, in (0, 1]
    #[arg(short = 's', long)]
    min_support: Option<f64>,

    /// Longest itemset to mine
    #[arg(short = 'k', long)]
    max_len: Option<usize>,

    /// Cap on dictionary entries
    #[arg(short = 'n', long)]
    max_entries: Option<usize>,

    /// Prefix for generated codes
    #[arg(long)]
    code_prefix: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn mining_config(&self) -> Result<MiningConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => MiningConfig::from_json_file(path)?,
            None => MiningConfig::default(),
        };
        if let Some(min_support) = self.min_support {
            config.min_support = min_support;
        }
        if self.max_len.is_some() {
            config.max_len = self.max_len;
        }
        if self.max_entries.is_some() {
            config.max_entries = self.max_entries;
        }
        if let Some(prefix) = &self.code_prefix {
            config.code_prefix = prefix.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn print_summary(summary: &RunSummary) {
    println!("Loaded {} transactions.", summary.loaded);
    println!("Frequent itemsets found: {}", summary.frequent_itemsets);
    println!("Mapping created with {} entries.", summary.dictionary_entries);
    println!("Compressed transactions count: {}", summary.compressed);
    println!("Decompressed transactions count: {}", summary.decompressed);
    println!(
        "Original Size: {}, Compressed Size: {}, Mapping Size: {}, Total Compressed Size: {}",
        summary.stats.original_size,
        summary.stats.compressed_size,
        summary.stats.dictionary_overhead,
        summary.stats.total_size
    );
    println!("Compression Ratio: {:.2}%", summary.stats.ratio);
    if !summary.lossless {
        println!("WARNING: decompressed transactions differ from the input");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = args.mining_config()?;
    let pipeline = Pipeline::new(config);
    let summary = pipeline.run(
        &args.input,
        args.output.as_deref(),
        args.dictionary.as_deref(),
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}
