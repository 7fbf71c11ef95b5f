//! One participant's view of the chat: turns input lines into broadcasts,
//! renames and renders, and hands back delivered messages.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::chat::{ChatService, Participant};
use crate::command::{
    parse_input, Command, Input, ASCII_USAGE, HELP_LINES, NICK_USAGE, UNKNOWN_HINT,
};
use crate::render::{spawn_render, Renderer};

/// Result of handling one input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Lines shown only to this participant.
    pub replies: Vec<String>,
    /// The participant asked to leave.
    pub quit: bool,
}

impl Outcome {
    fn reply(line: impl Into<String>) -> Self {
        Self {
            replies: vec![line.into()],
            quit: false,
        }
    }
}

/// Chat line as seen by everyone: `[<name>] <text>`.
pub fn chat_line(name: &str, text: &str) -> String {
    format!("[{}] {}", name, text)
}

/// A joined participant.
///
/// Call [`Session::leave`] when done. A session dropped without leaving is
/// removed by the registry the next time it is touched.
pub struct Session {
    service: Arc<ChatService>,
    renderer: Arc<Renderer>,
    participant: Participant,
    renders: Vec<JoinHandle<()>>,
}

impl Session {
    /// Register under `name` (or a unique variant of it).
    pub async fn join(service: Arc<ChatService>, renderer: Arc<Renderer>, name: &str) -> Self {
        let participant = service.register(name).await;
        Self {
            service,
            renderer,
            participant,
            renders: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.participant.name()
    }

    pub fn is_active(&self) -> bool {
        self.participant.is_active()
    }

    /// Handle one line of input. `display_width` is the caller's display
    /// width in columns, if known; it sizes `/ascii` output.
    pub async fn handle_line(&mut self, line: &str, display_width: Option<u32>) -> Outcome {
        match parse_input(line) {
            Input::Empty => Outcome::default(),
            Input::Chat(parts) => {
                for part in parts {
                    let message = chat_line(self.participant.name(), &part);
                    self.service.broadcast(message).await;
                }
                Outcome::default()
            }
            Input::Command(command) => self.run_command(command, display_width).await,
        }
    }

    async fn run_command(&mut self, command: Command, display_width: Option<u32>) -> Outcome {
        match command {
            Command::Help => Outcome {
                replies: HELP_LINES.iter().map(|l| l.to_string()).collect(),
                quit: false,
            },
            Command::List => {
                Outcome::reply(format!("* users: {}", self.service.list_names().join(", ")))
            }
            Command::Nick(None) => Outcome::reply(NICK_USAGE),
            Command::Nick(Some(name)) => {
                self.service.rename(&mut self.participant, &name).await;
                Outcome::default()
            }
            Command::Ascii(None) => Outcome::reply(ASCII_USAGE),
            Command::Ascii(Some(request)) => {
                log::debug!("{} requested a render of {}", self.name(), request.source);
                self.renders.retain(|handle| !handle.is_finished());
                self.renders.push(spawn_render(
                    Arc::clone(&self.renderer),
                    self.service.broadcaster(),
                    request,
                    display_width,
                ));
                Outcome::default()
            }
            Command::Quit => Outcome {
                replies: Vec::new(),
                quit: true,
            },
            Command::Unknown(_) => Outcome::reply(UNKNOWN_HINT),
        }
    }

    /// Next delivered message, or `None` once left and drained.
    pub async fn recv(&mut self) -> Option<String> {
        self.participant.recv().await
    }

    /// A delivered message if one is already queued.
    pub fn try_recv(&mut self) -> Option<String> {
        self.participant.try_recv()
    }

    /// Wait until every render this session started has posted its result.
    pub async fn wait_for_renders(&mut self) {
        for handle in self.renders.drain(..) {
            if let Err(e) = handle.await {
                log::warn!("Render task failed: {}", e);
            }
        }
    }

    /// Unregister. Renders already started still post their results.
    pub async fn leave(&mut self) {
        self.service.unregister(&mut self.participant).await;
    }
}
