use anyhow::{Context, Result};
use reqwest::Client;
use std::io::{self, Write};
use tracing::warn;

use crate::config::{Config, Credential};
use crate::dispatch::Dispatcher;
use crate::error::ChatError;

/// The program's top-level behavior: read a line, dispatch it, print the
/// reply or the error, repeat. Dispatch failures never stop the loop; only
/// stdin/stdout plumbing failures propagate.
pub async fn run_repl(client: &Client, cfg: &Config) -> Result<()> {
    // Resolved once per process. A missing credential is reported per
    // prompt instead of aborting, so the loop outlives it.
    let dispatcher = match Credential::resolve() {
        Ok(credential) => Some(Dispatcher::new(client, cfg, credential)),
        Err(err) => {
            warn!(error = %err, "starting without a usable credential");
            None
        }
    };

    println!("quip interactive chat");
    println!("model: {}", cfg.model);
    println!("type a prompt, or 'exit' to quit");

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read stdin")?;
        if read == 0 {
            // End of input: stop silently, no farewell.
            break;
        }

        let prompt = input.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt.eq_ignore_ascii_case("exit") || prompt.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            break;
        }

        let result = match &dispatcher {
            Some(dispatcher) => dispatcher.dispatch(prompt, cfg.system_prompt.as_deref()).await,
            None => Err(ChatError::MissingCredential),
        };
        match result {
            Ok(reply) => println!("assistant: {reply}\n"),
            Err(err) => {
                match &err {
                    ChatError::MissingCredential => warn!("prompt rejected without credential"),
                    ChatError::Upstream(cause) => {
                        warn!(error = %cause, "completion request failed");
                    }
                }
                println!("error: {err}\n");
            }
        }
    }

    Ok(())
}
