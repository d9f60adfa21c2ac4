use std::io::IsTerminal;

use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io::{self, BoardError};
use crate::io::prompt::{Prompt, PromptFilePicker, StdinPrompt};
use crate::io::store::TaskListStore;
use crate::model::board::Board;
use crate::model::task::Priority;
use crate::ops::detail_session::DetailSession;
use crate::ops::search;
use crate::ops::task_ops::TaskError;
use crate::util::clock::{Clock, SystemClock};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let data_dir = board_io::resolve_data_dir(cli.data_dir.as_deref())?;
    let board = board_io::load_board(&data_dir)?;

    match cli.command {
        // Read commands
        Commands::Categories => cmd_categories(&board, json),
        Commands::List(args) => cmd_list(&board, args, json),
        Commands::Show(args) => cmd_show(&board, args, json),
        Commands::Search(args) => cmd_search(&board, args, json),

        // Write commands
        Commands::Add(args) => cmd_add(&board, args, json),
        Commands::Edit(args) => cmd_edit(&board, args, json),
        Commands::Details(args) => cmd_details(&board, args, json),
        Commands::Done(args) => cmd_done(&board, args, json),
        Commands::Delete(args) => cmd_delete(&board, args, json),
        Commands::Up(args) => cmd_move(&board, args, MoveDirection::Up, json),
        Commands::Down(args) => cmd_move(&board, args, MoveDirection::Down, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(board: &Board, category: &str) -> Result<TaskListStore, BoardError> {
    board.open_store(category, Box::new(SystemClock))
}

fn use_color(json: bool) -> bool {
    !json && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

fn print_task_json(store: &TaskListStore, index: usize) -> CmdResult {
    if let Some(task) = store.get(index) {
        println!("{}", serde_json::to_string_pretty(&task_to_json(index, task))?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_categories(board: &Board, json: bool) -> CmdResult {
    let mut rows = Vec::new();
    for category in &board.config.categories {
        let store = open_store(board, &category.name)?;
        rows.push(CategoryJson {
            name: category.name.clone(),
            file: category.resource_file(),
            tasks: store.len(),
            completed: store.tasks().iter().filter(|t| t.is_completed()).count(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            println!(
                "{:<12} {:>3} tasks ({} completed)  {}",
                row.name, row.tasks, row.completed, row.file
            );
        }
    }
    Ok(())
}

fn cmd_list(board: &Board, args: CategoryArgs, json: bool) -> CmdResult {
    let store = open_store(board, &args.category)?;

    if json {
        let list = TaskListJson {
            category: store.category().to_string(),
            tasks: store
                .tasks()
                .iter()
                .enumerate()
                .map(|(i, t)| task_to_json(i, t))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{}", store.category());
    if store.is_empty() {
        println!("  (no tasks)");
        return Ok(());
    }
    let colors = PriorityColors::from_config(&board.config.ui);
    let color = use_color(json);
    for row in display_rows(store.tasks()) {
        if color {
            println!("{}", format_row_colored(&row, &colors));
        } else {
            println!("{}", format_row(&row));
        }
    }
    Ok(())
}

fn cmd_show(board: &Board, args: TaskRef, json: bool) -> CmdResult {
    let store = open_store(board, &args.category)?;
    let index = args.index();
    let task = store.get(index).ok_or(TaskError::Index {
        index,
        len: store.len(),
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(index, task))?);
    } else {
        for line in format_task_detail(index, task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(board: &Board, args: SearchArgs, json: bool) -> CmdResult {
    let re = Regex::new(&args.pattern)?;
    let categories: Vec<&str> = match args.category {
        Some(ref name) => vec![board.category(name)?.name.as_str()],
        None => board
            .config
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect(),
    };

    let mut hits = Vec::new();
    for name in categories {
        let store = open_store(board, name)?;
        hits.extend(search::search_tasks(&re, store.category(), store.tasks()));
    }

    if json {
        let out: Vec<SearchHitJson> = hits.iter().map(hit_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for hit in &hits {
            println!("{}", format_search_hit(hit));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(board: &Board, args: AddArgs, json: bool) -> CmdResult {
    let priority = Priority::parse_priority(&args.priority).ok_or_else(|| {
        format!(
            "invalid priority '{}' (expected low, medium or high)",
            args.priority
        )
    })?;
    let date = args.date.unwrap_or_else(|| SystemClock.today());

    let mut store = open_store(board, &args.category)?;
    let index = store.add(&args.description, &date, priority)?;

    if json {
        print_task_json(&store, index)?;
    } else {
        println!("added #{} to {}", index + 1, store.category());
    }
    Ok(())
}

fn cmd_edit(board: &Board, args: EditArgs, json: bool) -> CmdResult {
    let mut store = open_store(board, &args.task.category)?;
    let index = args.task.index();

    let description = match args.description {
        Some(d) => d,
        None => {
            // Check the position before asking
            store.get(index).ok_or(TaskError::Index {
                index,
                len: store.len(),
            })?;
            match StdinPrompt.prompt_string("Edit Task", "Enter new task description:") {
                Some(d) => d,
                None => {
                    eprintln!("edit cancelled");
                    return Ok(());
                }
            }
        }
    };

    store.edit_description(index, &description)?;
    if json {
        print_task_json(&store, index)?;
    } else {
        println!("#{} description updated", index + 1);
    }
    Ok(())
}

fn cmd_details(board: &Board, args: DetailsArgs, json: bool) -> CmdResult {
    let mut store = open_store(board, &args.task.category)?;
    let index = args.task.index();
    let mut session = DetailSession::open(&store, index)?;

    if let Some(progress) = args.progress {
        session.set_progress(progress);
    }
    if let Some(date) = args.date {
        session.set_date(date);
    }
    if args.clear_notes {
        session.set_notes("");
    } else if let Some(notes) = args.notes {
        session.set_notes(notes);
    }

    // Remove from the back so earlier positions stay valid
    let mut remove = args.remove_subtasks.clone();
    remove.sort_unstable_by(|a, b| b.cmp(a));
    remove.dedup();
    for position in remove {
        session.remove_subtask((position - 1) as usize)?;
    }
    let mut detach = args.detach.clone();
    detach.sort_unstable_by(|a, b| b.cmp(a));
    detach.dedup();
    for position in detach {
        session.remove_attachment((position - 1) as usize)?;
    }

    for subtask in args.subtasks {
        session.add_subtask(subtask);
    }
    for path in args.attachments {
        session.add_attachment(path);
    }
    if args.prompt_subtask && !session.prompt_subtask(&mut StdinPrompt) {
        eprintln!("no subtask added");
    }
    if args.pick_attachment
        && !session.pick_attachment(&mut PromptFilePicker::new(StdinPrompt))
    {
        eprintln!("no attachment added");
    }

    session.confirm(&mut store)?;
    if json {
        print_task_json(&store, index)?;
    } else {
        println!("#{} details saved", index + 1);
    }
    Ok(())
}

fn cmd_done(board: &Board, args: TaskRef, json: bool) -> CmdResult {
    let mut store = open_store(board, &args.category)?;
    let index = args.index();
    store.complete(index)?;
    if json {
        print_task_json(&store, index)?;
    } else {
        println!("#{} completed", index + 1);
    }
    Ok(())
}

fn cmd_delete(board: &Board, args: TaskRef, json: bool) -> CmdResult {
    let mut store = open_store(board, &args.category)?;
    let index = args.index();
    let removed = store.delete(index)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&task_to_json(index, &removed))?
        );
    } else {
        println!("deleted #{}: {}", index + 1, removed.description);
    }
    Ok(())
}

enum MoveDirection {
    Up,
    Down,
}

fn cmd_move(board: &Board, args: TaskRef, direction: MoveDirection, json: bool) -> CmdResult {
    let mut store = open_store(board, &args.category)?;
    let index = args.index();
    let (moved, target, edge) = match direction {
        MoveDirection::Up => (store.move_up(index)?, index.wrapping_sub(1), "top"),
        MoveDirection::Down => (store.move_down(index)?, index + 1, "bottom"),
    };
    if json {
        print_task_json(&store, if moved { target } else { index })?;
    } else if moved {
        println!("moved #{} to #{}", index + 1, target + 1);
    } else {
        println!("#{} is already at the {}", index + 1, edge);
    }
    Ok(())
}
