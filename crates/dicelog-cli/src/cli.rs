use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dicelog",
    about = "Dice Throw Simulator: structured event logging demo",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed the dice for a reproducible run
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Echo channel events into the log output
    #[arg(long, global = true)]
    pub echo: bool,

    /// Do not attach the debug sink
    #[arg(long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Throw two dice repeatedly and show the tally
    Roll(RollArgs),
    /// Divide by zero, log the fault, and exit with it
    Fault(FaultArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct RollArgs {
    #[arg(short = 'n', long, default_value = "100")]
    pub times: usize,
}

#[derive(Args)]
pub struct FaultArgs {}

#[derive(Args)]
pub struct ConfigArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roll_default() {
        let cli = Cli::try_parse_from(["dicelog", "roll"]).unwrap();
        if let Command::Roll(args) = cli.command {
            assert_eq!(args.times, 100);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_roll_times() {
        let cli = Cli::try_parse_from(["dicelog", "roll", "-n", "250"]).unwrap();
        if let Command::Roll(args) = cli.command {
            assert_eq!(args.times, 250);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_fault() {
        let cli = Cli::try_parse_from(["dicelog", "fault"]).unwrap();
        assert!(matches!(cli.command, Command::Fault(_)));
    }

    #[test]
    fn parse_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dicelog", "roll", "--seed", "9", "--echo", "--quiet", "-c", "demo.toml",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(9));
        assert!(cli.echo);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("demo.toml")));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["dicelog", "--verbose", "config"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Config(_)));
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["dicelog", "--format", "json", "roll"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(Cli::try_parse_from(["dicelog", "chart"]).is_err());
    }
}
