mod resolve;
pub use resolve::{ResolveError, resolve_task};

use std::error::Error;
use std::path::PathBuf;

use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::paths;
use crate::io::store::FileStore;
use crate::logging::{self, LogTarget};
use crate::model::task::{Collection, TaskId};
use crate::model::theme::Palette;
use crate::ops::dispatch::{Action, Controller, Outcome};
use crate::ops::edit::CommitOutcome;
use crate::ops::repository::TaskError;
use crate::ops::theme_ops;

type HandlerResult = Result<(), Box<dyn Error>>;

/// Everything a subcommand needs: the controller over the file store and
/// the output mode.
struct Context {
    controller: Controller<FileStore>,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one subcommand, or the TUI when none is given
pub fn dispatch(cli: Cli) -> HandlerResult {
    let Some(command) = cli.command else {
        return crate::tui::run(cli.data_dir.as_deref(), cli.verbose, cli.quiet);
    };

    let data_dir: PathBuf = paths::resolve_data_dir(cli.data_dir.as_deref());
    let config = config_io::read_config(&data_dir)?;
    logging::init(
        LogTarget::Stderr,
        &logging::level_for(cli.verbose, cli.quiet, &config.log.level),
    )?;
    debug!(data_dir = %data_dir.display(), "running command");

    let mut ctx = Context {
        controller: Controller::open(FileStore::open(&data_dir)),
        json: cli.json,
    };

    let result = match command {
        Commands::Add(args) => cmd_add(&mut ctx, args),
        Commands::List(args) => cmd_list(&ctx, args),
        Commands::Done(args) => cmd_done(&mut ctx, args),
        Commands::Restore(args) => cmd_restore(&mut ctx, args),
        Commands::Edit(args) => cmd_edit(&mut ctx, args),
        Commands::Rm(args) => cmd_rm(&mut ctx, args),
        Commands::Theme(args) => cmd_theme(&mut ctx, args),
    };
    result?;

    if let Some(err) = ctx.controller.take_save_failure() {
        return Err(format!("change applied but could not be saved: {}", err).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_outcome(ctx: &Context, outcome: &Outcome) -> HandlerResult {
    if !ctx.json {
        println!("{}", outcome.message());
        return Ok(());
    }
    let task_json = |collection: Collection, id: &TaskId| {
        let snapshot = ctx.controller.snapshot();
        let tasks = snapshot.collection(collection);
        tasks
            .iter()
            .position(|t| &t.id == id)
            .map(|i| TaskJson {
                position: i + 1,
                collection,
                task: &tasks[i],
            })
            .map(|json| serde_json::to_string_pretty(&json))
    };
    let rendered = match outcome {
        Outcome::Added(task) | Outcome::Restored(task) => task_json(Collection::Active, &task.id),
        Outcome::Completed(task) => task_json(Collection::Archived, &task.id),
        Outcome::EditSaved { id, .. } => task_json(Collection::Active, id),
        Outcome::Deleted(task, _) => Some(serde_json::to_string_pretty(task)),
        _ => None,
    };
    if let Some(json) = rendered {
        println!("{}", json?);
    }
    Ok(())
}

fn joined(words: &[String]) -> String {
    words.join(" ")
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &mut Context, args: AddArgs) -> HandlerResult {
    let outcome = ctx.controller.dispatch(Action::Add(joined(&args.title)))?;
    print_outcome(ctx, &outcome)
}

fn cmd_list(ctx: &Context, args: ListArgs) -> HandlerResult {
    let snapshot = ctx.controller.snapshot();
    let show_active = !args.archived;
    let show_archived = args.archived || args.all;

    if ctx.json {
        let list = ListJson {
            active: show_active.then(|| tasks_to_json(snapshot.active, Collection::Active)),
            archived: show_archived.then(|| tasks_to_json(snapshot.archived, Collection::Archived)),
        };
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let mut lines = Vec::new();
    if show_active {
        lines.extend(format_task_list(Collection::Active, snapshot.active));
    }
    if show_archived {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(format_task_list(Collection::Archived, snapshot.archived));
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_done(ctx: &mut Context, args: TaskRefArg) -> HandlerResult {
    let id = resolve_task(ctx.controller.snapshot().active, &args.task, Collection::Active)?;
    let outcome = ctx.controller.dispatch(Action::Complete(id))?;
    print_outcome(ctx, &outcome)
}

fn cmd_restore(ctx: &mut Context, args: TaskRefArg) -> HandlerResult {
    let id = resolve_task(
        ctx.controller.snapshot().archived,
        &args.task,
        Collection::Archived,
    )?;
    let outcome = ctx.controller.dispatch(Action::Restore(id))?;
    print_outcome(ctx, &outcome)
}

fn cmd_edit(ctx: &mut Context, args: EditArgs) -> HandlerResult {
    let id = resolve_task(ctx.controller.snapshot().active, &args.task, Collection::Active)?;
    ctx.controller.dispatch(Action::BeginEdit(id.clone()))?;
    ctx.controller
        .edit_mut()
        .set_draft(&id, &joined(&args.title))?;
    let outcome = ctx.controller.dispatch(Action::SaveEdit(id))?;
    if let Outcome::EditSaved {
        result: CommitOutcome::Reverted { .. },
        ..
    } = outcome
    {
        return Err(TaskError::EmptyTitle.into());
    }
    print_outcome(ctx, &outcome)
}

fn cmd_rm(ctx: &mut Context, args: RmArgs) -> HandlerResult {
    let collection = if args.archived {
        Collection::Archived
    } else {
        Collection::Active
    };
    let id = resolve_task(
        ctx.controller.snapshot().collection(collection),
        &args.task,
        collection,
    )?;
    let outcome = ctx.controller.dispatch(Action::Delete(id, collection))?;
    print_outcome(ctx, &outcome)
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

fn cmd_theme(ctx: &mut Context, args: ThemeCmd) -> HandlerResult {
    let theme = match args.action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => theme_ops::load_theme(ctx.controller.store()),
        ThemeAction::Set(set) => {
            let preset = theme_ops::parse_preset(&set.preset)?;
            theme_ops::apply_preset(ctx.controller.store_mut(), preset)?
        }
        ThemeAction::Custom(custom) => {
            let palette = Palette {
                bg_color: custom.bg,
                panel_color: custom.panel,
                accent_color: custom.accent,
                text_color: custom.text,
            };
            theme_ops::apply_custom(ctx.controller.store_mut(), palette)?
        }
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&theme_to_json(&theme))?);
    } else {
        for line in format_theme(&theme) {
            println!("{}", line);
        }
    }
    Ok(())
}
