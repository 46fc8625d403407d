use clap::Subcommand;
use studyverse_core::{Config, Theme};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Get,
    /// Switch theme; a running `watch` repaints as soon as the config is written
    Set {
        /// light or dark
        theme: Theme,
    },
}

pub fn run(action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    match action {
        ThemeAction::Get => println!("{}", config.ui.theme),
        ThemeAction::Set { theme } => {
            config.ui.theme = theme;
            config.save()?;
            println!("{theme}");
        }
    }
    Ok(())
}
