//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::CharacterSet;
use crate::ascii::{MAX_WIDTH, MIN_WIDTH};

/// Multi-user chat with image-to-ASCII rendering
#[derive(Parser, Debug)]
#[command(name = "trashgang")]
#[command(version, about = "Text chat that can render images as ASCII art", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render an image file or URL to stdout
    Render {
        /// Local path or http(s) URL
        source: String,

        /// Output width in columns
        #[arg(long, short, value_parser = clap::value_parser!(u32).range(i64::from(MIN_WIDTH)..=i64::from(MAX_WIDTH)))]
        width: Option<u32>,

        /// Fit to the display width
        #[arg(long, conflicts_with = "width")]
        fit: bool,

        /// Emit 24-bit color
        #[arg(long)]
        color: bool,

        /// Invert brightness (for light terminals)
        #[arg(long)]
        invert: bool,

        /// Ramp preset
        #[arg(long, conflicts_with = "ramp")]
        charset: Option<CharacterSet>,

        /// Custom ramp, darkest first
        #[arg(long)]
        ramp: Option<String>,

        /// Display width in columns (default: $COLUMNS)
        #[arg(long)]
        columns: Option<u32>,
    },
    /// Join a local line-based chat session
    Chat {
        /// Name to join as
        #[arg(long, short, default_value = "anon")]
        name: String,

        /// Display width in columns (default: $COLUMNS)
        #[arg(long)]
        columns: Option<u32>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let args = Args::parse_from(["trashgang", "render", "cat.png"]);
        assert!(args.config.is_none());
        match args.command {
            Command::Render {
                source,
                width,
                fit,
                color,
                invert,
                charset,
                ramp,
                columns,
            } => {
                assert_eq!(source, "cat.png");
                assert!(width.is_none());
                assert!(!fit && !color && !invert);
                assert!(charset.is_none() && ramp.is_none() && columns.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_render_flags() {
        let args = Args::parse_from([
            "trashgang", "render", "x.png", "-w", "120", "--color", "--invert", "--charset",
            "blocks",
        ]);
        match args.command {
            Command::Render {
                width,
                color,
                invert,
                charset,
                ..
            } => {
                assert_eq!(width, Some(120));
                assert!(color && invert);
                assert_eq!(charset, Some(CharacterSet::Blocks));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_render_width_range() {
        assert!(Args::try_parse_from(["trashgang", "render", "x", "--width", "7"]).is_err());
        assert!(Args::try_parse_from(["trashgang", "render", "x", "--width", "401"]).is_err());
        assert!(Args::try_parse_from(["trashgang", "render", "x", "--width", "400"]).is_ok());
    }

    #[test]
    fn test_render_conflicts() {
        assert!(
            Args::try_parse_from(["trashgang", "render", "x", "--width", "40", "--fit"]).is_err()
        );
        assert!(Args::try_parse_from([
            "trashgang", "render", "x", "--charset", "minimal", "--ramp", "#."
        ])
        .is_err());
    }

    #[test]
    fn test_chat_name() {
        let args = Args::parse_from(["trashgang", "chat"]);
        assert!(matches!(args.command, Command::Chat { ref name, .. } if name == "anon"));

        let args = Args::parse_from(["trashgang", "chat", "-n", "bob"]);
        assert!(matches!(args.command, Command::Chat { ref name, .. } if name == "bob"));
    }

    #[test]
    fn test_config_subcommands() {
        let args = Args::parse_from(["trashgang", "config", "show"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));
        let args = Args::parse_from(["trashgang", "config", "path"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Path
            }
        ));
        let args = Args::parse_from(["trashgang", "config", "init"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Init
            }
        ));
    }

    #[test]
    fn test_global_config_option() {
        let args = Args::parse_from(["trashgang", "config", "show", "--config", "/tmp/c.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));

        let args = Args::parse_from(["trashgang", "-c", "/tmp/t.toml", "chat"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/t.toml")));
    }
}
