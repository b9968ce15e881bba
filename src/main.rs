use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use eml_extractor::storage::S3ObjectStore;
use eml_extractor::{Extractor, ExtractorConfig, ReceiptEvent};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the receipt event JSON, or "-" for stdin.
    #[arg(long, env = "RECEIPT_EVENT_FILE", default_value = "-")]
    event_file: String,

    #[arg(long, env = "BUCKET_EMAILS")]
    bucket: String,

    #[arg(long, env = "FOLDER_INCOMING", default_value = "incoming")]
    incoming_prefix: String,

    #[arg(long, env = "FOLDER_ATTACHMENTS", default_value = "attachments")]
    attachments_prefix: String,

    #[arg(long, env = "FUNCTION_NAME", default_value = "eml-extractor")]
    function_name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let raw_event = if args.event_file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.event_file)
            .with_context(|| format!("read event file {}", args.event_file))?
    };
    let event: ReceiptEvent = serde_json::from_str(&raw_event).context("parse receipt event")?;

    let cfg = aws_config::load_from_env().await;
    let s3 = aws_sdk_s3::Client::new(&cfg);
    let store = Arc::new(S3ObjectStore::new(s3, args.bucket));

    let extractor = Extractor::new(
        store,
        ExtractorConfig {
            function_name: args.function_name,
            incoming_prefix: args.incoming_prefix,
            attachments_prefix: args.attachments_prefix,
        },
    );

    let result = extractor.process_event(&event).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
