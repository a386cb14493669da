// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tanjiro shell` command implementation.
//!
//! Interactive REPL with a colored prompt and readline history over a single
//! in-process session. Meme results are shown as their image URL.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tanjiro_agent::{ReplyKind, SessionState, TurnReply};
use tanjiro_config::TanjiroConfig;
use tanjiro_core::TanjiroError;

use crate::serve::{build_turn_router, init_tracing};

/// Runs the `tanjiro shell` interactive REPL.
pub async fn run_shell(config: TanjiroConfig) -> Result<(), TanjiroError> {
    // Keep the terminal quiet unless something goes wrong.
    init_tracing("warn");

    let router = build_turn_router(&config).await?;
    let mut session = SessionState::new(config.memory.max_turns);

    let mut rl = DefaultEditor::new()
        .map_err(|e| TanjiroError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{} shell", config.agent.name.to_lowercase()).bold().green());
    println!(
        "Try {} or {}. Type {} to leave.\n",
        "meme nezuko".cyan(),
        "i like swords".cyan(),
        "exit".yellow()
    );

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if is_exit_command(trimmed) {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let reply = router.handle(&mut session, trimmed).await;
                println!("{}\n", render_reply(router.persona_name(), &reply));
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn is_exit_command(input: &str) -> bool {
    matches!(
        input.to_ascii_lowercase().as_str(),
        "exit" | "quit" | "/exit" | "/quit"
    )
}

/// Formats a reply for the terminal. Markdown bold markers are stripped.
fn render_reply(persona_name: &str, reply: &TurnReply) -> String {
    let text = reply.text.replace("**", "");
    let mut out = match reply.kind {
        ReplyKind::Chat => format!("{}: {text}", persona_name.cyan().bold()),
        _ => text,
    };
    if let Some(image) = &reply.image {
        out.push_str(&format!("\n{} {}", "image:".dimmed(), image.url.underline()));
    }
    out
}
