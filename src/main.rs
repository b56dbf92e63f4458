use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use typeahead::config::{Config, Overrides};
use typeahead::runtime::Runtime;
use typeahead::terminal::Terminal;
use typeahead::ui::span::{Span, SpanLine};
use typeahead::ui::style::{Color, Style};
use typeahead::widgets::autocomplete::EventLog;
use typeahead::{
    Autocomplete, CandidateStore, DataSource, HttpDataSource, StaticDataSource, User, logging,
    sample_users,
};

#[derive(Parser)]
#[command(name = "typeahead")]
#[command(about = "Search a user directory as you type")]
struct Cli {
    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base url of the user directory
    #[arg(long)]
    base_url: Option<String>,

    /// Delay between the last keystroke and filtering
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Default level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Use the bundled users instead of fetching
    #[arg(long)]
    offline: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            debounce_ms: self.debounce_ms,
            log_file: self.log_file.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?.with_overrides(cli.overrides());

    if let Some(log_file) = &config.log_file {
        logging::init_to_file(&config.log_level, log_file)?;
    }

    let source: Arc<dyn DataSource<User>> = if cli.offline {
        Arc::new(StaticDataSource::new(
            sample_users().context("bundled users are malformed")?,
        ))
    } else {
        Arc::new(HttpDataSource::new(
            &config.base_url,
            &config.endpoint,
            config.timeout(),
        ))
    };
    info!(source = %source.describe(), "starting typeahead");

    let selections = EventLog::new();
    let widget = Autocomplete::new("users", CandidateStore::from_arc(source))
        .with_placeholder(config.placeholder.clone())
        .with_debounce(config.debounce())
        .with_max_visible(config.max_visible_rows())
        .with_listener(selections.clone());

    let terminal = Terminal::new().context("failed to open terminal")?;
    let mut runtime = Runtime::new(Box::new(widget), terminal).with_header(header());
    runtime.run().context("terminal session failed")?;

    if let Some(user) = selections.last_selected() {
        info!(id = user.id, "selection confirmed");
        println!("{} <{}> ({})", user.name, user.email, user.company.name);
    }
    Ok(())
}

fn header() -> Vec<SpanLine> {
    let hint = Style::new().color(Color::DarkGrey);
    vec![
        vec![Span::styled("User search", Style::new().bold())],
        vec![Span::styled(
            "type to filter · ↑/↓ hover · enter select · esc clear · tab focus · ctrl+c quit",
            hint,
        )],
        Vec::new(),
    ]
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_become_config_overrides() {
        let cli = Cli::parse_from([
            "typeahead",
            "--base-url",
            "http://localhost:3000",
            "--debounce-ms",
            "250",
            "--offline",
        ]);
        let overrides = cli.overrides();
        assert!(cli.offline);
        assert_eq!(overrides.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(overrides.debounce_ms, Some(250));
        assert_eq!(overrides.log_file, None);
    }
}
