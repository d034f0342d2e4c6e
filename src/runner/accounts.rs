//! Account iteration and scheduling.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use alloy::primitives::U256;

use crate::blockchain::units::format_amount;
use crate::blockchain::{load_wallets, WalletEntry};
use crate::config::ScheduleConfig;
use crate::observability::metrics;
use crate::runner::types::{RunSummary, Task, TaskContext, TaskError, TaskResult};
use crate::tasks::TaskKind;

/// Run `cycles` cycles of `task` for every wallet in the key file.
///
/// Fails only when the key file yields no wallets.
pub async fn run_accounts<T: Task>(task: &T, ctx: &TaskContext, cycles: u32) -> TaskResult<RunSummary> {
    let wallets = load_wallets(
        Path::new(&ctx.config.files.private_keys),
        ctx.config.chain.chain_id,
    )?;
    let total = wallets.len();
    let mut summary = RunSummary::default();

    tracing::info!(task = task.name(), accounts = total, cycles, "Starting run");

    for (index, entry) in wallets.iter().enumerate() {
        if ctx.is_shutting_down() {
            break;
        }
        summary.accounts += 1;

        tracing::info!(
            task = task.name(),
            account = format!("{}/{}", index + 1, total),
            id = entry.id,
            address = %entry.wallet.short_address(),
            "Processing account"
        );

        match run_account(task, ctx, entry, cycles, &mut summary).await {
            Ok(()) => {}
            Err(TaskError::Cancelled) => break,
            Err(e) => {
                tracing::error!(id = entry.id, error = %e, "Account failed, skipping");
            }
        }

        if index + 1 < total {
            let switch = Duration::from_secs(ctx.config.delays.account_switch_secs);
            tracing::info!(secs = switch.as_secs(), "Switching to next account");
            if ctx.pause(switch).await.is_err() {
                break;
            }
        }
    }

    tracing::info!(
        task = task.name(),
        accounts = summary.accounts,
        succeeded = summary.succeeded,
        cycles_ok = summary.cycles_ok,
        cycles_failed = summary.cycles_failed,
        "All accounts processed"
    );
    Ok(summary)
}

async fn run_account<T: Task>(
    task: &T,
    ctx: &TaskContext,
    entry: &WalletEntry,
    cycles: u32,
    summary: &mut RunSummary,
) -> TaskResult<()> {
    let account = ctx.connect(entry).await?;
    let symbol = &ctx.config.chain.symbol;

    let initial = account.sender.balance().await?;
    metrics::record_balance(account.address(), initial);
    tracing::info!(
        address = %account.address(),
        balance = %format!("{} {}", format_amount(initial, 18), symbol),
        "Account balance"
    );

    let mut failed = 0;
    for cycle in 1..=cycles {
        if ctx.is_shutting_down() {
            return Err(TaskError::Cancelled);
        }

        tracing::info!(task = task.name(), cycle = format!("{}/{}", cycle, cycles), "Starting cycle");
        match task.run_cycle(ctx, &account, cycle, cycles).await {
            Ok(()) => {
                summary.cycles_ok += 1;
                metrics::record_cycle(task.name(), true);
            }
            Err(TaskError::Cancelled) => return Err(TaskError::Cancelled),
            Err(e) => {
                failed += 1;
                summary.cycles_failed += 1;
                metrics::record_cycle(task.name(), false);
                tracing::warn!(task = task.name(), cycle, error = %e, "Cycle failed");
                if task.stops_on_failure() {
                    tracing::warn!(id = entry.id, "Skipping remaining cycles for this wallet");
                    break;
                }
            }
        }

        if cycle < cycles {
            task.pause_between_cycles(ctx).await?;
        }
    }

    if failed == 0 {
        summary.succeeded += 1;
    }

    if task.reports_profit() {
        let final_balance = account.sender.balance().await?;
        metrics::record_balance(account.address(), final_balance);
        tracing::info!(
            address = %account.address(),
            balance = %format!("{} {}", format_amount(final_balance, 18), symbol),
            change = %format!("{} {}", signed_difference(initial, final_balance, 18), symbol),
            "Final balance"
        );
    }

    Ok(())
}

/// `after - before` formatted with an explicit sign.
pub fn signed_difference(before: U256, after: U256, decimals: u8) -> String {
    if after >= before {
        format!("+{}", format_amount(after - before, decimals))
    } else {
        format!("-{}", format_amount(before - after, decimals))
    }
}

/// Run `pass`, then repeat it every `interval_hours` until shutdown.
///
/// Without an interval the pass runs once.
pub async fn repeat_on_interval<F, Fut>(
    ctx: &TaskContext,
    interval_hours: Option<f64>,
    label: &str,
    mut pass: F,
) -> TaskResult<RunSummary>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TaskResult<RunSummary>>,
{
    let interval = interval_duration(interval_hours)?;
    let mut total = RunSummary::default();
    let mut round = 1u32;

    loop {
        total.merge(pass().await?);

        let Some(interval) = interval else {
            return Ok(total);
        };
        if ctx.is_shutting_down() {
            return Ok(total);
        }

        tracing::info!(label, round, interval_secs = interval.as_secs(), "Pass complete, waiting for next run");
        if ctx.pause(interval).await.is_err() {
            return Ok(total);
        }
        round += 1;
    }
}

/// Repeat interval for `interval_hours`; zero or unset means run once.
pub fn interval_duration(interval_hours: Option<f64>) -> TaskResult<Option<Duration>> {
    match interval_hours {
        None => Ok(None),
        Some(hours) if hours == 0.0 => Ok(None),
        Some(hours) if hours < 0.0 || hours.is_nan() => Err(TaskError::InvalidSchedule(format!(
            "interval of {} hours",
            hours
        ))),
        Some(hours) => Duration::try_from_secs_f64(hours * 3600.0)
            .map(Some)
            .map_err(|e| TaskError::InvalidSchedule(format!("interval of {} hours: {}", hours, e))),
    }
}

/// Run one task on its configured schedule.
pub async fn run_scheduled<T: Task>(
    task: &T,
    ctx: &TaskContext,
    schedule: &ScheduleConfig,
) -> TaskResult<RunSummary> {
    repeat_on_interval(ctx, schedule.interval_hours, task.name(), || {
        run_accounts(task, ctx, schedule.cycles)
    })
    .await
}

/// Run every cycle task in sequence, repeating per schedule.
pub async fn run_all(ctx: &TaskContext, schedule: &ScheduleConfig) -> TaskResult<RunSummary> {
    repeat_on_interval(ctx, schedule.interval_hours, "all", || {
        run_sequence(ctx, schedule.cycles)
    })
    .await
}

async fn run_sequence(ctx: &TaskContext, cycles: u32) -> TaskResult<RunSummary> {
    let mut summary = RunSummary::default();
    let sequence = TaskKind::SEQUENCE;

    for (index, kind) in sequence.iter().enumerate() {
        if ctx.is_shutting_down() {
            break;
        }

        tracing::info!(task = kind.name(), step = format!("{}/{}", index + 1, sequence.len()), "Running task");
        match kind.run(ctx, cycles).await {
            Ok(result) => summary.merge(result),
            Err(TaskError::Cancelled) => break,
            Err(e) => tracing::error!(task = kind.name(), error = %e, "Task failed"),
        }

        if index + 1 < sequence.len() {
            let gap = Duration::from_secs(ctx.config.delays.task_gap_secs);
            if ctx.pause(gap).await.is_err() {
                break;
            }
        }
    }

    Ok(summary)
}
