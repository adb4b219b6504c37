use std::io::IsTerminal;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::kv::DirStore;
use crate::model::config::Config;
use crate::model::filter::{PriorityFilter, TaskFilter};
use crate::model::task::{NewTask, Priority, Task, TaskId, TaskStatus};
use crate::model::theme::ThemeName;
use crate::store::TaskStore;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let mut ctx = Context::load(&cli)?;

    let result = match cli.command {
        None => cmd_board(&ctx, FilterArgs::default()),
        Some(cmd) => match cmd {
            // Read commands
            Commands::Board(args) => cmd_board(&ctx, args),
            Commands::List(args) => cmd_list(&ctx, args),
            Commands::Stats => cmd_stats(&ctx),

            // Write commands
            Commands::Add(args) => cmd_add(&mut ctx, args),
            Commands::Status(args) => cmd_status(&mut ctx, args),
            Commands::Priority(args) => cmd_priority(&mut ctx, args),
            Commands::Star(args) => cmd_star(&mut ctx, args),
            Commands::Rm(args) => cmd_rm(&mut ctx, args),
            Commands::Theme(args) => cmd_theme(&mut ctx, args),
        },
    };

    if let Some(e) = ctx.store.take_write_error() {
        eprintln!("warning: changes were not saved: {}", e);
    }
    result
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Everything a command needs: the opened store plus output settings
struct Context {
    store: TaskStore<DirStore>,
    config: Config,
    json: bool,
    color: bool,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let config = match &cli.config {
            Some(path) => config_io::read_config_from(path)?,
            None => config_io::read_config()?,
        };
        let data_dir = config_io::resolve_data_dir(&config, cli.data_dir.as_deref());
        tracing::debug!(data_dir = %data_dir.display(), "opening store");
        let store = TaskStore::open(DirStore::new(data_dir));

        let color = config.ui.color
            && !cli.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();

        Ok(Context {
            store,
            config,
            json: cli.json,
            color,
        })
    }

    fn renderer(&self) -> Renderer {
        Renderer::new(self.store.theme(), self.color, self.config.ui.max_text_width)
    }
}

fn parse_filter(args: &FilterArgs) -> Result<TaskFilter, Box<dyn std::error::Error>> {
    let priority = match args.priority.as_deref() {
        Some(p) => p.parse::<PriorityFilter>()?,
        None => PriorityFilter::All,
    };
    Ok(TaskFilter::new(args.search.clone().unwrap_or_default(), priority))
}

fn not_found(id: TaskId) {
    eprintln!("no task with ID {}", id);
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_board(ctx: &Context, args: FilterArgs) -> CmdResult {
    let filter = parse_filter(&args)?;
    if ctx.json {
        return print_json(&board_json(&ctx.store, &filter));
    }
    let lines = format_board(
        &ctx.store,
        &filter,
        &ctx.renderer(),
        ctx.config.ui.show_progress,
    );
    for line in &lines {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_list(ctx: &Context, args: ListArgs) -> CmdResult {
    let filter = parse_filter(&args.filter)?;
    let status = args
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?;

    let tasks: Vec<&Task> = match status {
        Some(status) => ctx.store.tasks_by_status(status, &filter),
        None => ctx.store.filtered_tasks(&filter),
    };

    if ctx.json {
        return print_json(&tasks);
    }
    let r = ctx.renderer();
    let id_width = id_column_width(&tasks);
    for task in &tasks {
        println!("{}", format_task_line(task, &r, id_width, status.is_none()));
    }
    Ok(())
}

fn cmd_stats(ctx: &Context) -> CmdResult {
    let stats = ctx.store.stats();
    let progress = ctx.store.progress_percent();
    if ctx.json {
        return print_json(&StatsJson { stats, progress });
    }
    println!("{}", format_stats(&stats));
    if let Some(pct) = progress {
        println!("{}", format_progress(pct, &ctx.renderer()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &mut Context, args: AddArgs) -> CmdResult {
    let priority = match args.priority.as_deref() {
        Some(p) => p.parse::<Priority>()?,
        None => Priority::default(),
    };
    let text = args.text.join(" ");
    let blank = text.trim().is_empty();
    let mut draft = NewTask::new(text).priority(priority);
    if let Some(category) = args.category {
        draft = draft.category(category);
    }

    match ctx.store.add_task(draft) {
        Some(id) => {
            if ctx.json {
                if let Some(task) = ctx.store.task(id) {
                    return print_json(task);
                }
            }
            println!("#{}", id);
        }
        None if blank => eprintln!("nothing added: task text is empty"),
        None => eprintln!("nothing added: no task IDs left"),
    }
    Ok(())
}

fn cmd_status(ctx: &mut Context, args: StatusArgs) -> CmdResult {
    let status: TaskStatus = args.status.parse()?;
    if ctx.store.set_status(args.id, status) {
        println!("#{} -> {}", args.id, status);
    } else {
        not_found(args.id);
    }
    Ok(())
}

fn cmd_priority(ctx: &mut Context, args: PriorityArgs) -> CmdResult {
    let priority: Priority = args.priority.parse()?;
    if ctx.store.set_priority(args.id, priority) {
        println!("#{} priority {}", args.id, priority);
    } else {
        not_found(args.id);
    }
    Ok(())
}

fn cmd_star(ctx: &mut Context, args: IdArgs) -> CmdResult {
    if !ctx.store.toggle_star(args.id) {
        not_found(args.id);
        return Ok(());
    }
    let starred = ctx.store.task(args.id).is_some_and(|t| t.is_starred);
    println!(
        "#{} {}",
        args.id,
        if starred { "starred" } else { "unstarred" }
    );
    Ok(())
}

fn cmd_rm(ctx: &mut Context, args: IdArgs) -> CmdResult {
    if ctx.store.delete_task(args.id) {
        println!("#{} deleted", args.id);
    } else {
        not_found(args.id);
    }
    Ok(())
}

fn cmd_theme(ctx: &mut Context, args: ThemeArgs) -> CmdResult {
    if let Some(name) = args.name {
        let theme: ThemeName = name.parse()?;
        ctx.store.set_theme(theme);
    }

    let theme = ctx.store.theme();
    if ctx.json {
        return print_json(&ThemeJson {
            theme,
            available: ThemeName::ALL.to_vec(),
        });
    }
    for t in ThemeName::ALL {
        let marker = if t == theme { "*" } else { " " };
        println!("{} {}", marker, t);
    }
    Ok(())
}
