//! blockscript CLI: compile YAML pack manifests into Minecraft datapacks.

use blockscript::logging::{self, LogFormat, LoggingConfig};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "blockscript",
    version,
    about = "Composable Minecraft datapack commands: execute chains, branch lowering, datapack emission"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: blockscript::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    let config = LoggingConfig::from_verbosity(cli.verbose, cli.log_format);
    if let Err(e) = logging::init_logging(&config) {
        eprintln!("warning: {}", e);
    }
    if let Err(e) = blockscript::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
