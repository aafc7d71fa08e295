//! Croptrace CLI - Command-line interface for payload encoding and scan resolution.

use clap::{Parser, Subcommand, ValueEnum};
use croptrace_canonical::RecordKind;

mod commands;
mod output;

use commands::{encode, inspect, scan, verify};

#[derive(Parser)]
#[command(name = "croptrace")]
#[command(about = "Croptrace payload encoding, scanning, and verification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Record kind selector for the encode command.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// Produce batch snapshot.
    Batch,
    /// Supply-chain event.
    Event,
    /// Certificate.
    Certificate,
}

impl From<KindArg> for RecordKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Batch => RecordKind::Batch,
            KindArg::Event => RecordKind::Event,
            KindArg::Certificate => RecordKind::Certificate,
        }
    }
}

/// Base URLs for the canonical link set.
#[derive(clap::Args)]
struct UrlArgs {
    /// Base URL of the scan endpoint
    #[arg(long, default_value = "http://localhost:3002")]
    scan_base: String,
    /// Base URL of the REST API
    #[arg(long, default_value = "http://localhost:3000")]
    api_base: String,
    /// Base URL of the web dashboard
    #[arg(long, default_value = "http://localhost:5173")]
    web_base: String,
    /// Base URL of the block explorer
    #[arg(long, default_value = "https://sepolia.etherscan.io")]
    explorer_base: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a record into a signed payload and QR artifact
    Encode {
        /// Record kind to encode
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Input record JSON file (or stdin if not provided)
        input: Option<String>,
        /// Shared signing secret
        #[arg(long)]
        secret: String,
        #[command(flatten)]
        urls: UrlArgs,
        /// Target rendered size in pixels
        #[arg(long, default_value_t = 300)]
        width: u32,
        /// Attach a human-readable label to the artifact
        #[arg(long)]
        label: bool,
        /// Write the PNG data URL to this file
        #[arg(long)]
        image_out: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a payload string without verifying it
    Inspect {
        /// Payload file (or stdin if not provided)
        input: Option<String>,
    },
    /// Decode and verify a payload string
    Verify {
        /// Payload file (or stdin if not provided)
        input: Option<String>,
        /// Shared signing secret
        #[arg(long)]
        secret: String,
        /// Exit with error code unless the payload verifies
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the full scan pipeline over a payload string
    Scan {
        /// Payload file (or stdin if not provided)
        input: Option<String>,
        /// Shared signing secret
        #[arg(long)]
        secret: String,
        /// JSON file with an array of batch records for enrichment
        #[arg(long)]
        store: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            kind,
            input,
            secret,
            urls,
            width,
            label,
            image_out,
            json,
        } => encode::run(
            kind.into(),
            input,
            secret,
            urls.into_config(),
            width,
            label,
            image_out,
            json,
        ),
        Commands::Inspect { input } => inspect::run(input),
        Commands::Verify {
            input,
            secret,
            strict,
            json,
        } => verify::run(input, secret, strict, json),
        Commands::Scan {
            input,
            secret,
            store,
            json,
        } => scan::run(input, secret, store, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

impl UrlArgs {
    fn into_config(self) -> croptrace_core::CodecConfig {
        croptrace_core::CodecConfig {
            scan_base_url: self.scan_base,
            api_base_url: self.api_base,
            web_base_url: self.web_base,
            blockchain_explorer_url: self.explorer_base,
        }
    }
}
