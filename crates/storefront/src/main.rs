//! Core X assistant - terminal chat client.
//!
//! Wires the catalog, the HTTP inference gateway, and a file-backed session
//! snapshot into an interactive assistant loop. Sessions survive restarts:
//! the log is rehydrated from `COREX_CHAT_HISTORY` when present.
//!
//! # Usage
//!
//! ```bash
//! COREX_ASSISTANT_URL=https://assist.corex.fit/v1/chat \
//! COREX_ASSISTANT_API_KEY=... \
//! corex-chat
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
// This is an interactive terminal binary; stdout is its UI.
#![allow(clippy::print_stdout)]

use std::io::{BufRead, Write};

use corex_storefront::catalog::Catalog;
use corex_storefront::chat::{ChatSession, FileSessionStore, HttpGateway, SubmitOutcome};
use corex_storefront::config::StorefrontConfig;

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info for our crate if
    // RUST_LOG is not set.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "corex_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    let catalog = Catalog::corex();
    let gateway = HttpGateway::new(&config.assistant);
    let store = FileSessionStore::new(&config.chat_history);
    let mut session = ChatSession::open(gateway, store, &catalog.product_names());

    tracing::info!(
        history = %config.chat_history.display(),
        products = catalog.products().len(),
        "assistant session ready"
    );

    println!("Core X assistant. Ask about products or fitness; 'quit' to exit.");

    // Replay prior turns so a rehydrated session reads like one conversation.
    for message in session.messages().iter().skip(1) {
        println!("[{:?}] {}", message.role, message.content);
    }

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "failed to read input");
                break;
            }
        }

        let input = line.trim();
        if matches!(input, "quit" | "exit") {
            break;
        }

        match session.submit(input).await {
            SubmitOutcome::Ignored => {}
            SubmitOutcome::Intercepted(_) | SubmitOutcome::Replied => {
                if let Some(reply) = session.messages().last() {
                    println!("corex> {}", reply.content);
                }
            }
        }
    }

    println!("Goodbye!");
}
