//! Ask command

use crate::app::{AskArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use lica_core::{Assistant, LicaConfig, UploadedFile};
use std::io::{self, Write};
use std::sync::Arc;

pub async fn run(args: AskArgs, config: &LicaConfig, format: OutputFormat) -> Result<()> {
    let assistant = if args.stream {
        Assistant::from_config_with_observer(
            config,
            Arc::new(|fragment: &str| {
                eprint!("{}", fragment);
                io::stderr().flush().ok();
            }),
        )?
    } else {
        Assistant::from_config(config)?
    };

    let file = args.file.as_ref().map(UploadedFile::from_path);
    let query = args.query_text();

    let reply = assistant.reply(file.as_ref(), &query, &args.model).await;

    if args.stream {
        eprintln!();
    }

    println!("{}", output::format_reply(&reply, &args.model, format)?);
    Ok(())
}
