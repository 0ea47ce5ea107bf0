use crate::config::load_config;
use crate::errors::CourtifyError;
use crate::pipeline::{ChatPipeline, ChatTurnResult};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub(super) async fn chat(message: Option<String>) -> Result<()> {
    let config = load_config(None)?;
    let (chat, _) = crate::pipeline::from_config(&config)
        .map_err(categorized)
        .context("Failed to set up service pipelines")?;

    if let Some(msg) = message {
        let result = chat.run(&msg).await.map_err(categorized)?;
        print_turn(&result);
    } else {
        interactive_repl(&chat).await?;
    }

    Ok(())
}

/// Prefixes a typed failure with its category, e.g. `upstream error`.
pub(super) fn categorized(err: impl Into<CourtifyError>) -> anyhow::Error {
    let err = err.into();
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("{kind} error"))
}

fn print_turn(result: &ChatTurnResult) {
    println!("{}", result.reply);
    let sentiment = result
        .sentiment
        .top_label()
        .map_or_else(|| "n/a".to_string(), |(label, score)| {
            format!("{} ({:.2})", label, score)
        });
    println!(
        "  [language: {}, sentiment: {}]",
        result.detected_language, sentiment
    );
}

async fn interactive_repl(chat: &ChatPipeline) -> Result<()> {
    use std::io::{self, BufRead, Write};

    println!("Interactive mode (Ctrl+C to exit)\n");
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let stdin = io::stdin();
        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            return Ok(());
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        // A failed turn is reported and the session continues
        match chat.run(input).await {
            Ok(result) => {
                println!();
                print_turn(&result);
                println!();
            }
            Err(e) => eprintln!("\nerror: {}\n", e),
        }
    }
}

/// Text to summarize, from `--text` or `--file`.
pub(super) async fn read_summary_input(
    text: Option<String>,
    file: Option<PathBuf>,
) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => anyhow::bail!("either --text or --file is required"),
    }
}

pub(super) async fn summarize(text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let input = read_summary_input(text, file).await?;
    let config = load_config(None)?;
    let (_, summary) = crate::pipeline::from_config(&config)
        .map_err(categorized)
        .context("Failed to set up service pipelines")?;

    let result = summary.run(&input).await.map_err(categorized)?;
    println!("{}", result.summary);
    Ok(())
}

pub(super) fn credentials_command() -> Result<()> {
    use crate::config::credentials::{CREDENTIAL_ENV_VARS, detect_source};

    let config = load_config(None)?;
    println!("{:<22} {:<32} SOURCE", "SLOT", "ENV VAR");
    for (name, var) in CREDENTIAL_ENV_VARS {
        println!("{:<22} {:<32} {}", name, var, detect_source(name, &config));
    }
    println!(
        "\n{} fills empty Hugging Face slots (sentiment, generator, summarizer)",
        crate::config::credentials::SHARED_HF_ENV_VAR
    );
    Ok(())
}
