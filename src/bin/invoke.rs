//! Invoke binary - runs one request through the skill locally and prints the
//! response envelope, without starting the HTTP server
//!
//! Usage:
//!   cargo run --bin invoke -- request.json            # Envelope from a file
//!   cat request.json | cargo run --bin invoke         # Envelope from stdin
//!   cargo run --bin invoke -- --launch --locale es-MX
//!   cargo run --bin invoke -- --intent FrasesIntent --locale en-US
//!
//! Content is configured the same way as the server (DEFAULT_LOCALE,
//! LOCALE_BUNDLE_PATH, FACTS_PATH, USER_AGENT). Envelope verification is
//! skipped.

use anyhow::{bail, Context, Result};
use bear_facts_skill::config::Config;
use bear_facts_skill::skill::{Request, RequestEnvelope, Skill};
use std::io::Read;
use tracing::info;

/// What to send through the skill
enum Input {
    Envelope(String),
    Request(Request),
}

fn parse_args(args: &[String]) -> Result<Input> {
    let mut locale = "en-US".to_string();
    let mut launch = false;
    let mut intent: Option<String> = None;
    let mut path: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--launch" => launch = true,
            "--intent" => {
                intent = Some(iter.next().context("--intent requires a name")?.clone());
            }
            "--locale" => {
                locale = iter.next().context("--locale requires a tag")?.clone();
            }
            other if other.starts_with("--") => bail!("Unknown option: {}", other),
            other => path = Some(other.to_string()),
        }
    }

    match (launch, intent, path) {
        (true, None, None) => Ok(Input::Request(Request::launch(locale))),
        (false, Some(name), None) => Ok(Input::Request(Request::intent(&name, locale))),
        (false, None, Some(path)) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path))?;
            Ok(Input::Envelope(json))
        }
        (false, None, None) => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("Failed to read request from stdin")?;
            Ok(Input::Envelope(json))
        }
        _ => bail!("Use only one of --launch, --intent NAME or a request file"),
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bear_facts_skill=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = parse_args(&args)?;

    let config = Config::from_env()?;
    let skill = Skill::from_config(&config)?;

    let response = match input {
        Input::Envelope(json) => {
            let envelope: RequestEnvelope =
                serde_json::from_str(&json).context("Invalid request envelope")?;
            skill.handle_envelope(&envelope)
        }
        Input::Request(request) => {
            info!("Invoking {} request", request.kind());
            skill
                .handle(&request)
                .to_envelope(skill.user_agent())
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
