use crossterm::{
    cursor::MoveTo,
    execute,
    style::{style, Stylize},
    terminal::{Clear, ClearType},
};
use dict_core::{Config, DictError, DictionaryEngine, SortMode};
use std::io::{stdin, stdout, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "dict_tool.json";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mut config_path = PathBuf::from(CONFIG_PATH);
    let mut dictionary: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(p) => config_path = PathBuf::from(p),
                None => {
                    eprintln!("--config needs a path");
                    std::process::exit(2);
                }
            },
            _ => dictionary = Some(PathBuf::from(arg)),
        }
    }

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("[ERROR] {}", e).red());
            std::process::exit(2);
        }
    };
    let mut engine = DictionaryEngine::new(config);
    if let Some(path) = dictionary {
        open(&mut engine, &path);
    }

    println!("Dictionary maintenance tool. Type 'help' for commands, 'exit' to quit.");
    println!("---------------------------------------------------------------");

    loop {
        print!("\n{} ", prompt(&engine).bold());
        if let Err(e) = stdout().flush() {
            report(&format!("cannot write to terminal: {}", e));
        }

        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                report(&format!("cannot read input: {}", e));
                break;
            }
        }
        let mut parts = input.trim().splitn(3, ' ');
        let cmd = parts.next().unwrap_or("");
        let arg1 = parts.next().unwrap_or("");
        let arg2 = parts.next().unwrap_or("").trim();

        match cmd {
            "" => {}
            "exit" | "quit" => break,
            "help" => print_help(),
            "open" => open(&mut engine, Path::new(arg1)),
            "grid" => print_grid(&engine),
            "dups" => print_duplicates(&engine),
            "get" => match pair(arg1) {
                Some((r, c)) => print_cell(&engine, r, c),
                None => report("expected two glyphs, e.g. 'get ka'"),
            },
            "set" => match pair(arg1) {
                // no word means delete
                Some((r, c)) => match engine.set_cell_by_glyphs(r, c, arg2) {
                    Ok(()) => print_cell(&engine, r, c),
                    Err(e) => report(&e.to_string()),
                },
                None => report("expected two glyphs, e.g. 'set ka 蚊'"),
            },
            "filter" => {
                let request = match (arg1, arg2.chars().next()) {
                    ("off", _) | ("", _) => Some((0, None)),
                    (pos, Some(c)) => pos.parse::<usize>().ok().map(|pos| (pos, Some(c))),
                    // a bare glyph splices at the front
                    (c, None) if c.chars().count() == 1 => Some((0, c.chars().next())),
                    _ => None,
                };
                match request {
                    Some((pos, c)) => {
                        if let Err(e) = engine.set_filter(pos, c) {
                            report(&e.to_string());
                        }
                    }
                    None => report("usage: filter <position> <glyph> | filter off"),
                }
            }
            "sort" => match arg1 {
                "natural" => engine.set_sort_mode(SortMode::Natural),
                "vowels" | "vowels-last" => engine.set_sort_mode(SortMode::VowelsLast),
                _ => report("usage: sort natural | sort vowels-last"),
            },
            "save" => save(&mut engine, None),
            "saveas" => {
                if arg1.is_empty() {
                    report("usage: saveas <path>");
                } else {
                    save(&mut engine, Some(Path::new(arg1)));
                }
            }
            _ => report("unknown command; type 'help'"),
        }
    }
}

fn prompt(engine: &DictionaryEngine) -> String {
    let file = engine
        .current_file()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no file)".to_string());
    let filter = engine.filter();
    match filter.character {
        Some(c) => format!("{} [{}@{}]>", file, c, filter.position),
        None => format!("{}>", file),
    }
}

fn print_help() {
    println!("  open <path>          load a dictionary");
    println!("  grid                 show non-empty cells");
    println!("  dups                 list unresolved duplicate readings");
    println!("  get <rc>             show one cell, e.g. 'get ka'");
    println!("  set <rc> [word]      store a word; omit it to delete");
    println!("  filter <pos> <glyph> splice a glyph into every reading; 'filter off'");
    println!("  sort natural|vowels-last");
    println!("  save | saveas <path>");
    println!("  exit");
}

fn report(message: &str) {
    println!("{}", style(message).red());
}

fn pair(arg: &str) -> Option<(char, char)> {
    let mut chars = arg.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(r), Some(c), None) => Some((r, c)),
        _ => None,
    }
}

fn open(engine: &mut DictionaryEngine, path: &Path) {
    match engine.load_file(path) {
        Ok(summary) => {
            if let Err(e) = execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0)) {
                report(&format!("cannot clear terminal: {}", e));
            }
            println!(
                "Loaded {}: {} entries, {} duplicate readings, {}x{} grid",
                path.display(),
                summary.entry_count,
                summary.duplicate_count,
                summary.alphabet.len(),
                summary.alphabet.len()
            );
            let extra: String = engine.store().alphabet().additional().iter().collect();
            if !extra.is_empty() {
                println!("Additional glyphs: {}", extra);
            }
        }
        Err(e) => report(&e.to_string()),
    }
}

fn print_cell(engine: &DictionaryEngine, row: char, col: char) {
    let cell = match engine.cell_by_glyphs(row, col) {
        Ok(cell) => cell,
        Err(e) => return report(&e.to_string()),
    };
    if cell.is_conflict {
        let joined = cell.conflicting_words.join("／");
        println!("{} = {}", cell.reading, joined.on_red());
    } else if cell.word.is_empty() {
        println!("{} = {}", cell.reading, "(empty)".dark_grey());
    } else {
        println!("{} = {}", cell.reading, cell.word);
    }
}

fn print_grid(engine: &DictionaryEngine) {
    let glyphs = engine.grid_glyphs();
    let view = engine.grid_view();
    for (r, row) in view.iter().enumerate() {
        let filled: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(c, text)| {
                let conflict = engine
                    .cell_by_glyphs(glyphs[r], glyphs[c])
                    .map(|cell| cell.is_conflict)
                    .unwrap_or(false);
                if conflict {
                    format!("{}:{}", glyphs[c], text.clone().on_red())
                } else {
                    format!("{}:{}", glyphs[c], text)
                }
            })
            .collect();
        if filled.is_empty() {
            continue;
        }
        let label = glyphs[r].to_string();
        let label = if r % 2 == 0 { label.bold() } else { label.dark_grey() };
        println!("{} | {}", label, filled.join("  "));
    }
}

fn print_duplicates(engine: &DictionaryEngine) {
    let store = engine.store();
    let readings = store.duplicate_readings();
    if readings.is_empty() {
        println!("No unresolved duplicates.");
        return;
    }
    for reading in readings {
        let words = store.conflicts(reading).unwrap_or_default();
        println!("{} = {}", reading, words.join("／").on_red());
    }
}

fn save(engine: &mut DictionaryEngine, path: Option<&Path>) {
    let result = match engine.save_file(path, false) {
        Err(DictError::UnresolvedDuplicates { count }) => {
            print!(
                "{} reading(s) still have conflicting entries. Save anyway? [y/N] ",
                count
            );
            if let Err(e) = stdout().flush() {
                report(&format!("cannot write to terminal: {}", e));
            }
            let mut answer = String::new();
            if let Err(e) = stdin().read_line(&mut answer) {
                report(&format!("cannot read confirmation, save cancelled: {}", e));
                return;
            }
            if !answer.trim().eq_ignore_ascii_case("y") {
                println!("Save cancelled.");
                return;
            }
            engine.save_file(path, true)
        }
        other => other,
    };
    match result {
        Ok(Some(backup)) => println!("Saved. Previous file moved to '{}'", backup.display()),
        Ok(None) => println!("Saved."),
        Err(e) => report(&e.to_string()),
    }
}
