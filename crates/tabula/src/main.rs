use anyhow::Result;
use log::LevelFilter;
use std::{env, path::PathBuf};

use tabula::{CommandProcessor, Config, Editor, FileManager, StatusManager};

struct Args {
    file: Option<PathBuf>,
    commands: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut file = None;
    let mut commands = Vec::new();
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" => match args.next() {
                Some(command) => commands.push(command),
                None => return Err(anyhow::anyhow!("-c requires a command")),
            },
            "-h" | "--help" => {
                println!("usage: tabula [FILE] [-c COMMAND]...");
                std::process::exit(0);
            }
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => return Err(anyhow::anyhow!("unexpected argument: {}", arg)),
        }
    }

    Ok(Args { file, commands })
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("tabula", LevelFilter::Debug);
        logger.filter_module("linecore", LevelFilter::Debug);
    }
    logger.init();

    let args = parse_args()?;

    let config = match Config::load().await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    };

    let mut editor = Editor::with_config(&config);
    let mut file_manager = FileManager::new();
    let mut status = StatusManager::new();

    if let Some(path) = args.file {
        if path.exists() {
            let records = file_manager.open_file(path.clone()).await.map_err(|e| {
                log::error!("Failed to load file '{}': {}", path.display(), e);
                e
            })?;
            editor.set_lines(records);
            log::info!("Loaded {} lines from {}", editor.line_count(), path.display());
        } else {
            file_manager.new_file(path);
        }
    } else {
        log::info!("No file specified, starting with empty buffer");
    }

    let processor = CommandProcessor::new();
    let mut should_quit = false;

    for command in &args.commands {
        status.update();
        let result = processor
            .execute_command(command, &mut editor, &mut file_manager, &mut should_quit)
            .await;
        if let Err(ref e) = result {
            log::debug!("command '{}' failed: {}", command, e);
        }

        status.report(&result);
        if let Some(message) = status.get_current_message() {
            println!("{}", message);
        }

        if should_quit {
            break;
        }
    }

    if !should_quit && editor.is_modified() {
        log::warn!("Exiting with unsaved changes");
    }

    Ok(())
}
