//! Interactive CLI: one prompt in, one answer out.
//!
//! Reads a single line from stdin, routes it through the two-branch
//! conversation graph, and prints the handler's result as one line on
//! stdout. Diagnostics and progress events go to stderr via tracing; set
//! `RUST_LOG` to adjust verbosity.

use std::io::Write as _;
use std::sync::Arc;

use miette::{IntoDiagnostic, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mathchat::agent::conversation_app;
use mathchat::channels::Channel;
use mathchat::completion::OllamaClient;
use mathchat::event_bus::StdErrSink;
use mathchat::state::ConversationState;

fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn,mathchat=info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    miette::set_panic_hook();

    let client = Arc::new(OllamaClient::from_env());
    tracing::debug!(model = client.model(), "completion client ready");
    let app = conversation_app(client)?;

    print!("You: ");
    std::io::stdout().flush().into_diagnostic()?;

    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    stdin.read_line(&mut line).await.into_diagnostic()?;
    let input = line.trim_end_matches(['\n', '\r']);

    // Stdout carries exactly the one answer line; progress events join
    // the tracing output on stderr instead.
    let final_state = app
        .invoke_with_sinks(
            ConversationState::new_with_input(input),
            vec![Box::new(StdErrSink::default())],
        )
        .await?;

    match final_state.output.snapshot() {
        Some(output) => println!("Agent: {output}"),
        // Unreachable with the two-branch topology.
        None => println!("Agent: (no output produced)"),
    }

    Ok(())
}
