//! Scan command implementation.

use croptrace_canonical::normalize_batch;
use croptrace_core::{CodecConfig, PayloadCodec, PayloadSigner, ScanResolver};
use croptrace_store::InMemoryBatchStore;
use serde_json::Value;

use super::read_input;
use crate::output;

pub fn run(
    input: Option<String>,
    secret: String,
    store_path: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = read_input(input)?;
    let codec = PayloadCodec::new(
        CodecConfig {
            scan_base_url: String::new(),
            api_base_url: String::new(),
            web_base_url: String::new(),
            blockchain_explorer_url: String::new(),
        },
        PayloadSigner::new(secret),
    );

    let store = store_path.map(load_store).transpose()?;
    let resolver = match &store {
        Some(store) => ScanResolver::with_store(&codec, store),
        None => ScanResolver::new(&codec),
    };

    let outcome = resolver.resolve(payload.trim());

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::outcome_json(&outcome))?
        );
    } else {
        output::print_outcome(&outcome);
    }

    Ok(())
}

/// Loads a JSON array of batch records into an in-memory store.
fn load_store(path: String) -> Result<InMemoryBatchStore, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read store file {}: {}", path, e))?;
    let raw: Vec<Value> =
        serde_json::from_str(&text).map_err(|e| format!("Invalid store file: {}", e))?;

    let store = InMemoryBatchStore::new();
    for entry in &raw {
        let record =
            normalize_batch(entry).map_err(|e| format!("Invalid batch in store file: {}", e))?;
        store
            .insert(record, None)
            .map_err(|e| format!("Failed to load store file: {}", e))?;
    }
    Ok(store)
}
