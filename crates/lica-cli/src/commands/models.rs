//! Models command

use crate::app::OutputFormat;
use anyhow::Result;
use lica_core::{ModelRegistry, DEFAULT_MODEL};

pub async fn run(format: OutputFormat) -> Result<()> {
    let registry = ModelRegistry::new();

    match format {
        OutputFormat::Json => {
            let models: Vec<_> = registry
                .all()
                .iter()
                .map(|spec| {
                    serde_json::json!({
                        "id": spec.id,
                        "description": spec.description,
                        "supports_documents": spec.supports_documents,
                        "default": spec.id == DEFAULT_MODEL,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&models)?);
        }
        OutputFormat::Cli => {
            for spec in registry.all() {
                let marker = if spec.id == DEFAULT_MODEL { "*" } else { " " };
                let documents = if spec.supports_documents {
                    "documents: yes"
                } else {
                    "documents: no"
                };
                println!("{} {:<34} {:<15} {}", marker, spec.id, documents, spec.description);
            }
            println!();
            println!("* default. Uploads always use {}.", registry.document_model());
        }
    }
    Ok(())
}
