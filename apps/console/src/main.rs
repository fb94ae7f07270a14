//! FILM07 auth console binary.

use std::sync::Arc;

use auth::schedule_redirect;
use console::{
    config::Config,
    init_tracing,
    page::{ChannelNavigator, Command, ConsolePage},
};
use storage::FileStore;
use tokio::io::{AsyncBufReadExt, BufReader};

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    let storage = Arc::new(FileStore::open(&config.storage_path)?);
    tracing::info!(path = %storage.path().display(), "Starting FILM07 auth console");

    let mut page = ConsolePage::new(storage, config.flow_config());
    let (navigator, mut navigations) = ChannelNavigator::channel();
    let navigator = Arc::new(navigator);

    print_lines(&page.render());
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let Some(command) = Command::parse(&line) else {
                    continue;
                };

                let response = page.handle(command);
                print_lines(&response.lines);
                if let Some(redirect) = response.redirect {
                    schedule_redirect(navigator.clone(), redirect);
                }
                if response.quit {
                    break;
                }
            }
            Some(target) = navigations.recv() => {
                println!("Navigating to {target}");
                break;
            }
        }
    }

    Ok(())
}
