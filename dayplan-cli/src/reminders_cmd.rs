use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use dayplan_core::{TaskStore, check_reminders, daily_summary, parse_timezone, reminder_message};

use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum RemindersCommand {
    /// Classify tasks against their lead windows and print notices
    Check,

    /// Today's pending tasks in the configured timezone
    Summary,
}

pub fn run(cmd: RemindersCommand, store: &mut TaskStore, cfg: &Config) -> Result<()> {
    match cmd {
        RemindersCommand::Check => check(store),
        RemindersCommand::Summary => summary(store, cfg),
    }
}

fn check(store: &mut TaskStore) -> Result<()> {
    let now = Utc::now();
    let mut tasks = store.get_all_tasks();
    let needing_attention = check_reminders(&mut tasks, now);

    if needing_attention.is_empty() {
        println!("No reminders due.");
        return Ok(());
    }

    for task in &needing_attention {
        println!("{}", reminder_message(task, now));
        // write the classification back so later listings can show it
        store.update_task(&task.id, task.clone())?;
    }

    println!("\n{} task(s) need attention.", needing_attention.len());
    Ok(())
}

fn summary(store: &TaskStore, cfg: &Config) -> Result<()> {
    let tz = parse_timezone(&cfg.timezone)?;
    let now = Utc::now().with_timezone(&tz);

    let s = daily_summary(&store.get_all_tasks(), now);

    println!("# Today ({})\n", now.format("%Y-%m-%d"));
    println!("Due today: {} ({} high priority)\n", s.count_today, s.high_priority_today);

    for task in &s.records_today {
        println!(
            "- [{}] {} (due {})",
            task.priority,
            task.title,
            task.due_date.with_timezone(&tz).format("%H:%M")
        );
    }

    Ok(())
}
