use cardchat::Provider;
use cardchat::core::config::{self, CliOverrides};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "cardchat", about = "Pocket-sized LLM chat for small screens")]
struct Args {
    /// LLM provider to use (overrides config file and env)
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Model name (overrides config file and env)
    #[arg(short, long)]
    model: Option<String>,

    /// Device screen width in columns, border included
    #[arg(long)]
    columns: Option<u16>,

    /// Device screen height in rows, border included
    #[arg(long)]
    rows: Option<u16>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to cardchat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("cardchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Session not started: {}", e);
            return cardchat::tui::show_config_error(
                args.columns.unwrap_or(config::DEFAULT_DISPLAY_COLUMNS),
                args.rows.unwrap_or(config::DEFAULT_DISPLAY_ROWS),
                &e,
            );
        }
    };

    let cli = CliOverrides {
        provider: args.provider,
        model: args.model,
        columns: args.columns,
        rows: args.rows,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "cardchat starting up with provider: {:?}, model: {}",
        resolved.provider,
        resolved.model_name
    );

    cardchat::tui::run(resolved)
}
