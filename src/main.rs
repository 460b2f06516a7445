use clap::Parser;
use rowkit::config::{Cli, Command, LocalStorage, ReportConfig, TodoAction};
use rowkit::core::report::ReportPipeline;
use rowkit::core::todo::{self, format_task, NewTask, OrderBy, TaskFilter, TodoList};
use rowkit::utils::{logger, validation::Validate};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    match cli.command {
        Command::Todo { action } => run_todo(action)?,
        Command::Report { config, base_dir } => {
            let config = ReportConfig::from_file(&config)?;
            if let Err(e) = config.validate() {
                tracing::error!("configuration validation failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }

            let storage = LocalStorage::new(base_dir.to_string_lossy().into_owned());
            let pipeline = ReportPipeline::new(storage, config);
            match pipeline.run() {
                Ok(summary_path) => {
                    println!("✅ Report written to {}", summary_path);
                }
                Err(e) => {
                    tracing::error!("report pipeline failed: {}", e);
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn run_todo(action: TodoAction) -> anyhow::Result<()> {
    match action {
        TodoAction::Add {
            title,
            db,
            priority,
            due,
            tags,
        } => {
            let mut todo = TodoList::load_json(&db)?;
            let task = todo.add(&title, NewTask { priority, due, tags })?;
            todo.save_json(&db)?;
            println!("{}", format_task(&task));
        }
        TodoAction::List {
            db,
            open,
            tag,
            order_by,
        } => {
            let todo = TodoList::load_json(&db)?;
            let filter = TaskFilter {
                only_open: open.then_some(true),
                tag,
                order_by: order_by.parse::<OrderBy>()?,
            };
            for task in todo.list(&filter) {
                println!("{}", format_task(&task));
            }
        }
        TodoAction::Done { id, db, undo } => {
            let mut todo = TodoList::load_json(&db)?;
            if todo.toggle_done(id, !undo) {
                todo.save_json(&db)?;
            } else {
                eprintln!("no task with id {}", id);
                std::process::exit(1);
            }
        }
        TodoAction::Remove { id, db } => {
            let mut todo = TodoList::load_json(&db)?;
            if todo.remove(id) {
                todo.save_json(&db)?;
            } else {
                eprintln!("no task with id {}", id);
                std::process::exit(1);
            }
        }
        TodoAction::Stats { db } => {
            let todo = TodoList::load_json(&db)?;
            let stats = todo.stats();
            println!("total: {}", stats.total);
            println!("open:  {}", stats.open);
            println!("done:  {}", stats.done);
            for (tag, count) in &stats.by_tag {
                println!("  #{}: {}", tag, count);
            }
        }
        TodoAction::Demo { dir } => {
            let summary = todo::demo_scenario(&dir)?;
            println!(
                "imported {} duplicates, {} tasks total ({} open, {} done)",
                summary.imported, summary.stats.total, summary.stats.open, summary.stats.done
            );
            println!("json: {}", summary.json_path.display());
            println!("csv:  {}", summary.csv_path.display());
        }
    }
    Ok(())
}
