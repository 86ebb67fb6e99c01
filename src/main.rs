use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// Roll dice and do arithmetic with the results
#[derive(Parser, Debug)]
#[command(name = "dice-calc")]
#[command(version)]
#[command(about = "Expands dice notation and evaluates the resulting arithmetic")]
pub struct Args {
    /// Path to configuration file (defaults to $DICE_CALC_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dice pattern, e.g. `2d6+3`, or `help`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub pattern: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    dice_calc::logging::init()?;

    let config = dice_calc::config::load_config_with_precedence(args.config)?;
    debug!(config = ?config, "configuration loaded");

    let command = args.pattern.join(" ");
    println!("{}", dice_calc::handle_command(&command, &config));

    Ok(())
}
