use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

use dayplan_core::{
    Task, TaskStatus, TaskStore, create_task, optimize_schedule, parse_local_deadline_to_utc,
    parse_timezone, schedule_task,
};

mod config;
mod reminders_cmd;
mod state;

#[derive(Parser, Debug)]
#[command(name = "dayplan", version, about = "Single-user task planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a task: plan it, schedule it, persist it
    Add {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Low, Medium or High
        #[arg(long)]
        priority: String,

        /// Local due date, "YYYY-MM-DD HH:MM"
        #[arg(long)]
        due: String,

        /// IANA timezone for --due (default: from config)
        #[arg(long)]
        tz: Option<String>,
    },

    /// List tasks, optionally filtered
    List {
        /// pending or completed
        #[arg(long)]
        status: Option<String>,

        /// Low, Medium or High
        #[arg(long)]
        priority: Option<String>,

        /// Only tasks past their due date
        #[arg(long, default_value_t = false)]
        overdue: bool,
    },

    /// Show one task in full
    Show {
        id: Uuid,

        /// Print the raw record as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Mark a task completed
    Complete { id: Uuid },

    /// Delete a task
    Delete { id: Uuid },

    /// Re-rank pending tasks by composite urgency and persist the scores
    Optimize,

    /// Reminder checks and the daily summary
    Reminders {
        #[command(subcommand)]
        command: reminders_cmd::RemindersCommand,
    },

    /// Store counters
    Stats,

    /// Write a backup of the current task set
    Backup {
        /// Target file (default: timestamped name next to the task file)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Replace the task set from a backup file
    Restore {
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let mut store = TaskStore::open(config::tasks_file(&cfg)?);

    match cli.command {
        Command::Add {
            title,
            description,
            priority,
            due,
            tz,
        } => {
            if title.trim().is_empty() {
                bail!("title must not be empty");
            }
            let priority = priority.parse()?;
            let tz = tz.unwrap_or_else(|| cfg.timezone.clone());
            let due_date = parse_local_deadline_to_utc(&due, &tz)
                .with_context(|| format!("parsing --due '{due}'"))?;

            let task = schedule_task(create_task(title, description, priority, due_date, Utc::now()));
            store.add_task(task.clone())?;

            println!("Added task {}", task.id);
            println!(
                "  estimated: {} min | prep: {} min | buffer: {} min",
                task.estimated_duration, task.preparation_time, task.buffer_time
            );
            if let Some(at) = task.scheduled_time {
                println!("  work on it from {}", at.to_rfc3339());
            }
            if !task.tags.is_empty() {
                println!("  tags: {}", task.tags.join(", "));
            }
        }

        Command::List {
            status,
            priority,
            overdue,
        } => {
            let tasks = if overdue {
                store.overdue_tasks(Utc::now())
            } else if let Some(s) = status {
                store.tasks_by_status(parse_status(&s)?)
            } else if let Some(p) = priority {
                store.tasks_by_priority(p.parse()?)
            } else {
                store.get_all_tasks()
            };

            if tasks.is_empty() {
                println!("No tasks.");
                return Ok(());
            }

            let tz = parse_timezone(&cfg.timezone)?;
            for t in &tasks {
                println!(
                    "{} [{}] {} | due {} | {}",
                    t.id,
                    t.priority,
                    t.status,
                    t.due_date.with_timezone(&tz).format("%Y-%m-%d %H:%M"),
                    t.title
                );
            }
        }

        Command::Show { id, json } => {
            let Some(task) = store.get_task_by_id(&id) else {
                bail!("no task with id {id}");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                print_task(&task, &cfg)?;
            }
        }

        Command::Complete { id } => {
            if !store.complete_task(&id, Utc::now())? {
                bail!("no task with id {id}");
            }
            println!("Completed {id}");
        }

        Command::Delete { id } => {
            if !store.delete_task(&id)? {
                bail!("no task with id {id}");
            }
            println!("Deleted {id}");
        }

        Command::Optimize => {
            let now = Utc::now();
            let ranked = optimize_schedule(store.get_all_tasks(), now);

            for task in &ranked {
                if task.is_pending() {
                    store.update_task(&task.id, task.clone())?;
                }
            }

            println!("Work order:\n");
            for (i, t) in ranked.iter().filter(|t| t.is_pending()).enumerate() {
                println!(
                    "{}. [score {}] [{}] {}",
                    i + 1,
                    t.optimization_score.unwrap_or_default(),
                    t.priority,
                    t.title
                );
            }
        }

        Command::Reminders { command } => {
            reminders_cmd::run(command, &mut store, &cfg)?;
        }

        Command::Stats => {
            let s = store.stats();
            println!("Tasks: {} total, {} pending, {} completed", s.total_tasks, s.pending_tasks, s.completed_tasks);
            println!(
                "Open by priority: {} high, {} medium, {} low",
                s.high_priority, s.medium_priority, s.low_priority
            );
            println!("Task file: {} ({} bytes)", store.path().display(), s.file_size);
        }

        Command::Backup { file } => {
            let written = store.backup(file, Utc::now())?;
            println!("Wrote backup {}", written.display());
        }

        Command::Restore { file } => {
            store.restore(&file)?;
            println!("Restored {} task(s) from {}", store.len(), file.display());
        }
    }

    Ok(())
}

fn parse_status(s: &str) -> Result<TaskStatus> {
    match s.to_ascii_lowercase().as_str() {
        "pending" => Ok(TaskStatus::Pending),
        "completed" => Ok(TaskStatus::Completed),
        other => bail!("unknown status: {other} (expected pending or completed)"),
    }
}

fn print_task(task: &Task, cfg: &config::Config) -> Result<()> {
    let tz = parse_timezone(&cfg.timezone)?;
    let local = |dt: chrono::DateTime<Utc>| dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string();

    println!("{}", task.title);
    if !task.description.is_empty() {
        println!("{}", task.description);
    }
    println!();
    println!("  id:        {}", task.id);
    println!("  priority:  {}", task.priority);
    println!("  status:    {}", task.status);
    println!("  due:       {}", local(task.due_date));
    println!("  created:   {}", local(task.created_date));
    if let Some(done) = task.completed_date {
        println!("  completed: {}", local(done));
    }
    println!("  estimate:  {} min (+{} prep, +{} buffer)", task.estimated_duration, task.preparation_time, task.buffer_time);
    if let Some(at) = task.scheduled_time {
        println!("  scheduled: {}", local(at));
    }
    if !task.tags.is_empty() {
        println!("  tags:      {}", task.tags.join(", "));
    }
    if let Some(score) = task.optimization_score {
        println!("  score:     {score}");
    }
    if let Some(kind) = task.reminder_type {
        println!("  reminder:  {kind}");
    }
    Ok(())
}
