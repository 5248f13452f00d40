use std::path::PathBuf;
use std::process;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use minilisp::eval::{Machine, DEFAULT_HEAP_CAPACITY};
use minilisp::printer::print_val;
use minilisp::reader;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut load_files: Vec<String> = Vec::new();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--load" => {
                if i + 1 < args.len() {
                    load_files.push(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("--load requires a file path");
                    process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("Usage: minilisp [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --load <file>    Evaluate a source file before starting the REPL");
                println!("  --help, -h       Show this help message");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Try 'minilisp --help' for usage information.");
                process::exit(1);
            }
        }
    }

    let mut machine = Machine::new(DEFAULT_HEAP_CAPACITY).expect("failed to initialize machine");
    machine.load_prelude().expect("failed to load prelude");

    for path in &load_files {
        load_file(&mut machine, path);
    }

    println!("minilisp {}", env!("CARGO_PKG_VERSION"));
    println!(
        "  Heap: {} cells live, Symbols: {} interned",
        machine.heap.live_count(),
        machine.symbols.count()
    );
    println!("Type :q to quit, :env to list global bindings.\n");

    repl(&mut machine);
}

/// Evaluate a source file one expression at a time, so text not yet
/// parsed never holds hidden heap references across a collection.
fn load_file(machine: &mut Machine, path: &str) {
    let input = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading {}: {}", path, e);
            process::exit(1);
        }
    };

    let mut pos = 0;
    let mut count = 0;
    loop {
        match reader::read_one_at(&input, pos, &mut machine.heap, &mut machine.symbols) {
            Ok(Some((expr, next))) => {
                pos = next;
                count += 1;
                if let Err(e) = machine.eval(expr) {
                    eprintln!("{}: error at expression {}: {}", path, count, e);
                    process::exit(1);
                }
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("{}: read error at byte {}: {}", path, pos, e);
                process::exit(1);
            }
        }
    }
}

fn repl(machine: &mut Machine) {
    let mut rl = DefaultEditor::new().expect("failed to initialize line editor");
    let history = history_path();
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("λ> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    ":q" => {
                        println!("bye");
                        break;
                    }
                    ":env" => {
                        for name in machine.global_names() {
                            println!("{}", name);
                        }
                        continue;
                    }
                    _ => {}
                }

                eval_and_print(machine, line);
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted. Use :q or Ctrl-D to exit.");
            }
            Err(ReadlineError::Eof) => {
                println!("bye");
                break;
            }
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = rl.save_history(path);
    }
}

/// Evaluate every form on the line, printing each value. An error prints
/// one line and evaluation continues with the next form.
fn eval_and_print(machine: &mut Machine, input: &str) {
    let mut pos = 0;
    loop {
        match reader::read_one_at(input, pos, &mut machine.heap, &mut machine.symbols) {
            Ok(Some((expr, next))) => {
                pos = next;
                match machine.eval(expr) {
                    Ok(val) => {
                        println!("{}", print_val(val, &machine.heap, &machine.symbols));
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }
}

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".minilisp_history"))
}
