//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ScheduleConfig;
use crate::tasks::TaskKind;

#[derive(Parser, Debug)]
#[command(name = "testnet-cycler")]
#[command(about = "Automates testnet activity across a list of wallets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "cycler.toml")]
    pub config: PathBuf,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the `[schedule]` section.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq)]
pub struct ScheduleArgs {
    /// Cycles per wallet
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub cycles: Option<u32>,

    /// Repeat the whole run every N hours
    #[arg(long)]
    pub interval_hours: Option<f64>,
}

impl ScheduleArgs {
    /// Configured schedule with command line overrides applied.
    pub fn apply(&self, base: &ScheduleConfig) -> ScheduleConfig {
        ScheduleConfig {
            cycles: self.cycles.unwrap_or(base.cycles),
            interval_hours: self.interval_hours.or(base.interval_hours),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Deploy a random contract from each wallet
    Deploy {
        /// 1-based wallet ids; all wallets when omitted
        #[arg(long, num_args = 1..)]
        wallets: Vec<usize>,
    },
    /// Fund every wallet from the main wallet
    Send,
    /// Claim faucet funds for every wallet past its cooldown
    Faucet,
    /// Wrap and unwrap MON (floor sizing)
    Rubic(ScheduleArgs),
    /// Wrap and unwrap MON (strict sizing)
    Izumi(ScheduleArgs),
    /// Random pair swaps on Bean Exchange
    Beanswap(ScheduleArgs),
    /// Random pair swaps through Monorail
    Monorail(ScheduleArgs),
    /// Random pair swaps on Ambient
    Ambient(ScheduleArgs),
    /// Buy and sell a token basket on Uniswap
    Uniswap(ScheduleArgs),
    /// Stake and unstake on Magma
    Magma(ScheduleArgs),
    /// Stake, unstake and claim on Apriori
    Apriori(ScheduleArgs),
    /// Stake and unstake on Kintsu
    Kintsu(ScheduleArgs),
    /// Run every cycle task in sequence
    All(ScheduleArgs),
}

impl Command {
    /// The cycle task and its schedule overrides, if this is one.
    pub fn cycle_task(&self) -> Option<(TaskKind, ScheduleArgs)> {
        let pair = match self {
            Command::Rubic(args) => (TaskKind::Rubic, *args),
            Command::Izumi(args) => (TaskKind::Izumi, *args),
            Command::Beanswap(args) => (TaskKind::Beanswap, *args),
            Command::Monorail(args) => (TaskKind::Monorail, *args),
            Command::Ambient(args) => (TaskKind::Ambient, *args),
            Command::Uniswap(args) => (TaskKind::Uniswap, *args),
            Command::Magma(args) => (TaskKind::Magma, *args),
            Command::Apriori(args) => (TaskKind::Apriori, *args),
            Command::Kintsu(args) => (TaskKind::Kintsu, *args),
            _ => return None,
        };
        Some(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_wallet_ids() {
        let cli = Cli::try_parse_from(["testnet-cycler", "deploy", "--wallets", "1", "8", "6"]).unwrap();
        assert_eq!(cli.command, Command::Deploy { wallets: vec![1, 8, 6] });
        assert_eq!(cli.config, PathBuf::from("cycler.toml"));
    }

    #[test]
    fn test_cycle_task_overrides() {
        let cli = Cli::try_parse_from([
            "testnet-cycler",
            "--config",
            "custom.toml",
            "magma",
            "--cycles",
            "3",
            "--interval-hours",
            "2.5",
        ])
        .unwrap();
        let (kind, args) = cli.command.cycle_task().unwrap();
        assert_eq!(kind, TaskKind::Magma);

        let schedule = args.apply(&ScheduleConfig::default());
        assert_eq!(schedule.cycles, 3);
        assert_eq!(schedule.interval_hours, Some(2.5));
    }

    #[test]
    fn test_zero_cycles_rejected() {
        assert!(Cli::try_parse_from(["testnet-cycler", "rubic", "--cycles", "0"]).is_err());
    }

    #[test]
    fn test_defaults_kept_without_overrides() {
        let base = ScheduleConfig {
            cycles: 4,
            interval_hours: Some(1.0),
        };
        assert_eq!(ScheduleArgs::default().apply(&base).cycles, 4);
        assert_eq!(ScheduleArgs::default().apply(&base).interval_hours, Some(1.0));
        assert!(Command::Send.cycle_task().is_none());
    }
}
