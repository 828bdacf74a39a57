//! Config command

use crate::app::OutputFormat;
use anyhow::Result;
use lica_core::LicaConfig;

pub async fn run(config: &LicaConfig, format: OutputFormat) -> Result<()> {
    let shown = config.redacted();
    let path = LicaConfig::default_path();

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "path": path,
                "exists": path.exists(),
                "config": shown,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Cli => {
            let status = if path.exists() { "" } else { " (not found, using defaults)" };
            println!("Config file:     {}{}", path.display(), status);
            println!();
            println!("LLM service:");
            println!("  URL:           {}", shown.llm_service.url);
            println!(
                "  API key:       {}",
                shown.llm_service.api_key.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  Timeout:       {}",
                shown
                    .llm_service
                    .timeout_secs
                    .map(|s| format!("{}s", s))
                    .unwrap_or_else(|| "none".to_string())
            );
            println!();
            println!("OCR:");
            println!("  Tesseract:     {}", shown.ocr.tesseract_cmd.display());
            println!(
                "  Language:      {}",
                shown.ocr.language.as_deref().unwrap_or("(tesseract default)")
            );
            println!();
            println!("Document parser:");
            println!("  Backend:       {}", shown.document_parser.backend.as_str());
            if shown.document_parser.backend == lica_core::ParserBackend::LlamaParse {
                println!("  URL:           {}", shown.document_parser.llama_parse_url);
                println!(
                    "  API key:       {}",
                    shown
                        .document_parser
                        .llama_parse_api_key
                        .as_deref()
                        .unwrap_or("(not set)")
                );
            }
        }
    }
    Ok(())
}
