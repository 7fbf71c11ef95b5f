//! Subcommand handlers for render, chat and config actions.

use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::args::ConfigAction;
use crate::chat::ChatService;
use crate::config::{self, Config, DEFAULT_CONFIG_TOML};
use crate::render::{RenderRequest, Renderer};
use crate::session::Session;

/// Display width: `explicit` if given, otherwise `$COLUMNS`.
pub fn display_width(explicit: Option<u32>) -> Option<u32> {
    explicit
        .or_else(|| std::env::var("COLUMNS").ok()?.trim().parse().ok())
        .filter(|&w| w > 0)
}

/// Render one image and print the block to stdout.
pub async fn run_render(
    config: &Config,
    request: RenderRequest,
    display_width: Option<u32>,
) -> Result<(), Box<dyn Error>> {
    let renderer = Renderer::new(&config.render)?;
    let result = renderer.render(&request, display_width).await?;
    log::info!("{}", result.header());
    print!("{}", result.text);
    Ok(())
}

/// Line-based chat session on stdin/stdout until `/quit` or EOF.
pub async fn run_chat(
    config: &Config,
    name: &str,
    display_width: Option<u32>,
) -> Result<(), Box<dyn Error>> {
    let service = Arc::new(ChatService::start(&config.chat));
    let renderer = Arc::new(Renderer::new(&config.render)?);
    let session = Session::join(Arc::clone(&service), renderer, name).await;
    log::info!("Joined as {}", session.name());

    let stdin = BufReader::new(tokio::io::stdin());
    let result = chat_over(session, stdin, &mut std::io::stdout(), display_width).await;

    if let Some(stats) = service.shutdown().await {
        log::debug!(
            "Dispatcher stopped: {} messages, {} delivered, {} dropped",
            stats.messages,
            stats.delivered,
            stats.dropped
        );
    }
    result.map_err(Into::into)
}

/// Drive `session` from `input` lines, writing deliveries and replies to `out`.
///
/// The session always leaves before this returns, including when reading or
/// writing fails; the I/O error is returned afterwards.
pub async fn chat_over<R, W>(
    mut session: Session,
    input: R,
    out: &mut W,
    display_width: Option<u32>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut failure = None;

    loop {
        let step = tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let outcome = session.handle_line(&line, display_width).await;
                    emit(out, &outcome.replies).map(|()| !outcome.quit)
                }
                Ok(None) => Ok(false),
                Err(e) => Err(e),
            },
            message = session.recv() => match message {
                Some(message) => emit(out, &[message]).map(|()| true),
                None => Ok(false),
            },
        };

        match step {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                log::error!("Chat I/O failed: {}", e);
                failure = Some(e);
                break;
            }
        }
    }

    session.wait_for_renders().await;
    session.leave().await;
    while let Some(message) = session.recv().await {
        if failure.is_none() {
            if let Err(e) = emit(out, &[message]) {
                failure = Some(e);
            }
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn emit<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config_path = config::resolve_path(path);

    match action {
        ConfigAction::Path => println!("{}", config_path.display()),
        ConfigAction::Show => {
            let current = Config::load(Some(&config_path))?;
            println!("{}", toml::to_string_pretty(&current)?);

            if config_path.exists() {
                println!("# Config file: {} (exists)", config_path.display());
            } else {
                println!("# Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            init_config(&config_path)?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}

fn init_config(path: &Path) -> Result<(), Box<dyn Error>> {
    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()).into());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TOML)?;
    Ok(())
}
