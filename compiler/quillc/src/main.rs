//! Quill CLI
//!
//! Runs, checks and inspects Quill scripts.

use std::path::Path;

use quillc::commands::{check_file, explain_error, lex_file, parse_file, run_file};
use quillc::{init_tracing, RunOptions};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let ok = match command.as_str() {
        "run" => match RunOptions::parse(&args[2..]) {
            Ok(options) => run_file(&options),
            Err(e) => {
                eprintln!("error: {e}");
                eprintln!("Usage: quill run <file.quill> [options]");
                std::process::exit(2);
            }
        },
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: quill check <file.quill>");
                std::process::exit(2);
            }
            check_file(Path::new(&args[2]))
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: quill lex <file.quill>");
                std::process::exit(2);
            }
            lex_file(Path::new(&args[2]));
            true
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: quill parse <file.quill>");
                std::process::exit(2);
            }
            parse_file(Path::new(&args[2]));
            true
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: quill --explain <ERROR_CODE>");
                eprintln!("Example: quill --explain E6004");
                std::process::exit(2);
            }
            explain_error(&args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            true
        }
        "version" | "--version" | "-V" => {
            println!("Quill {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            // A bare script path runs it
            if Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("quill"))
            {
                match RunOptions::parse(&args[1..]) {
                    Ok(options) => run_file(&options),
                    Err(e) => {
                        eprintln!("error: {e}");
                        std::process::exit(2);
                    }
                }
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(2);
            }
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("Quill");
    println!();
    println!("Usage: quill <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.quill>     Evaluate a script and print its output");
    println!("  check <file.quill>   Report syntax errors without running");
    println!("  parse <file.quill>   Parse and display the syntax tree");
    println!("  lex <file.quill>     Tokenize and display tokens");
    println!("  --explain <code>     Explain an error code (e.g., E6004)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run options:");
    println!("  --allow-write <dir>    Allow writing files under <dir>");
    println!("  --allow-execute <dir>  Allow importing modules under <dir>");
    println!("  --deny-read <dir>      Refuse reads under <dir>");
    println!("  --max-depth <n>        Nested call limit (default 2000)");
    println!();
    println!("Modules beside the script may always be imported.");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=quill_eval=debug     Trace evaluation to stderr");
    println!("  QUILL_LOG_TREE=1              Show spans as a call tree");
    println!();
    println!("Examples:");
    println!("  quill run site.quill");
    println!("  quill run site.quill --allow-write ./public");
    println!("  quill check lib.quill");
    println!("  quill --explain E7001");
}
