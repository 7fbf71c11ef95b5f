use clap::Parser;

use trashgang::ascii::CharSet;
use trashgang::ascii::WidthSpec;
use trashgang::cli::{self, Args, Command};
use trashgang::config::Config;
use trashgang::render::RenderRequest;

fn load_config(args: &Args) -> Config {
    // An explicit --config must load; the default location falls back to defaults.
    match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) if args.config.is_some() => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Warning: {}", e);
            eprintln!("Using default settings.\n");
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let result = match args.command {
        Command::Config { action } => cli::handle_config_action(action, args.config.as_deref()),
        Command::Render {
            ref source,
            width,
            fit,
            color,
            invert,
            charset,
            ref ramp,
            columns,
        } => {
            let config = load_config(&args);
            let request = RenderRequest {
                source: source.clone(),
                width: match (fit, width) {
                    (true, _) => WidthSpec::Fit,
                    (false, Some(w)) => WidthSpec::Columns(w),
                    (false, None) => WidthSpec::Default,
                },
                colorize: color,
                invert,
                charset: ramp
                    .clone()
                    .or_else(|| charset.map(|c| CharSet::from(c).chars().to_string())),
            };
            cli::run_render(&config, request, cli::display_width(columns)).await
        }
        Command::Chat { ref name, columns } => {
            let config = load_config(&args);
            cli::run_chat(&config, name, cli::display_width(columns)).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
