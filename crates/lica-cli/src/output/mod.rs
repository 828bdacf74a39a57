//! Output formatters

use crate::app::OutputFormat;
use anyhow::Result;
use lica_core::AssistantReply;

/// Format an assistant reply
pub fn format_reply(reply: &AssistantReply, requested_model: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Cli => Ok(reply.text.clone()),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "kind": reply.kind,
                "requested_model": requested_model,
                "effective_model": reply.effective_model,
                "text": reply.text,
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}
