use colored::Colorize;
use tracing::info;

use dicelog_channel::{AttachedSinks, EventChannel};
use dicelog_dice::{DiceThrow, RollTally};

use crate::cli::*;
use crate::config::DemoConfig;

/// Widest bar drawn for a tally row.
const BAR_WIDTH: u64 = 40;

/// Channel, sinks, and producer wired for one run.
pub struct App {
    pub channel: EventChannel,
    pub sinks: AttachedSinks,
    pub dice: DiceThrow,
}

impl App {
    /// Attach sinks first so the debug sink sees the source being created.
    pub fn wire(config: &DemoConfig) -> Self {
        let channel = EventChannel::new();
        let sinks = config.channel.attach(&channel);
        let source = channel.create_source(&config.channel.source_name);
        let dice = match config.seed {
            Some(seed) => DiceThrow::with_seed(source, seed),
            None => DiceThrow::new(source),
        };
        Self { channel, sinks, dice }
    }

    pub fn debug_enabled(&self) -> bool {
        self.sinks.debug.as_ref().is_some_and(|sink| sink.is_enabled())
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = DemoConfig::resolve(&cli)?;
    match cli.command {
        Command::Roll(args) => cmd_roll(&App::wire(&config), args, &cli.format),
        Command::Fault(_) => cmd_fault(&App::wire(&config)),
        Command::Config(_) => cmd_config(&config),
    }
}

fn cmd_roll(app: &App, args: RollArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut tally = RollTally::new();
    tally.extend(app.dice.throw_many(args.times));
    info!(
        throws = app.dice.throw_count(),
        reported = app.dice.total_reported(),
        listeners = app.channel.listener_count(),
        debug_sink = app.debug_enabled(),
        "roll finished"
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tally)?),
        OutputFormat::Text => print_tally(&tally),
    }
    Ok(())
}

fn print_tally(tally: &RollTally) {
    println!("{} {}", tally.throws().to_string().bold(), "Total Rolls".bold());

    println!("\n{}", "Die Rolls".underline());
    let max_face = tally.faces().map(|(_, c)| c).max().unwrap_or(0);
    for (face, count) in tally.faces() {
        println!("  {face:>2} {:>6} {}", count, bar(count, max_face).cyan());
    }

    println!("\n{}", "Dice Totals".underline());
    let max_total = tally.totals().map(|(_, c)| c).max().unwrap_or(0);
    let mode = tally.mode_total();
    for (total, count) in tally.totals() {
        let line = bar(count, max_total);
        let line = if Some(total) == mode { line.green().bold() } else { line.yellow() };
        println!("  {total:>2} {:>6} {}", count, line);
    }
}

fn bar(count: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH).div_ceil(max);
    "#".repeat(width as usize)
}

fn cmd_fault(app: &App) -> anyhow::Result<()> {
    println!("{} Generating divide by zero...", "!".red().bold());
    let value = app.dice.divide_and_report()?;
    println!("{value}");
    Ok(())
}

fn cmd_config(config: &DemoConfig) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
