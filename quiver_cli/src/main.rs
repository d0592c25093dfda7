// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
mod helper;
mod theme;

use clap::{Parser as ClapParser, Subcommand};
use cliclack::{input, intro, set_theme};
use helper::{
    exit_with_parse_errors, exit_with_uncaught_exception, leak_script, print_parse_errors,
    print_uncaught_exception,
};
use quiver_vm::{Agent, AgentOptions, DefaultHostHooks, ScriptOptions, parse_script};
use theme::DefaultTheme;

/// A JavaScript interpreter for exploring how `this` is bound
#[derive(Debug, ClapParser)] // requires `derive` feature
#[command(name = "quiver")]
#[command(about = "A JavaScript interpreter for exploring how `this` is bound", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parses a file and logs out the AST
    Parse {
        /// The path of the file to parse
        path: String,
    },

    /// Evaluates files in one realm, then runs their timers
    Eval {
        #[arg(short, long)]
        verbose: bool,
        #[arg(short, long)]
        nogc: bool,

        /// Evaluate every file as strict mode code
        #[arg(short, long)]
        strict: bool,

        /// Virtual milliseconds to run timers for after the last file
        #[arg(short, long, default_value_t = 10_000)]
        run_for: u64,

        /// The files to evaluate
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Runs the REPL
    Repl {
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    match args.command {
        Command::Parse { path } => {
            let file: &'static str = Box::leak(std::fs::read_to_string(&path)?.into_boxed_str());
            let allocator = Default::default();
            let script = match parse_script(&allocator, file, ScriptOptions::default()) {
                Ok(script) => script,
                Err(errors) => exit_with_parse_errors(errors, &path, file),
            };
            println!("{:#?}", script.program());
        }
        Command::Eval {
            verbose,
            nogc,
            strict,
            run_for,
            paths,
        } => {
            let mut agent = Agent::new(
                AgentOptions {
                    disable_gc: nogc,
                    print_internals: verbose,
                },
                &DefaultHostHooks,
            );
            assert!(!paths.is_empty());
            let options = ScriptOptions { strict };
            let mut is_first = true;
            for path in paths {
                if is_first {
                    is_first = false;
                } else {
                    agent.gc();
                }
                let file: &'static str =
                    Box::leak(std::fs::read_to_string(&path)?.into_boxed_str());
                let script = leak_script(file, options)
                    .unwrap_or_else(|errors| exit_with_parse_errors(errors, &path, file));
                match agent.run_script(script) {
                    Ok(result) => {
                        if verbose {
                            println!("{}", result.string_repr(&agent));
                        }
                    }
                    Err(error) => exit_with_uncaught_exception(&mut agent, error),
                }
            }

            agent.gc();
            match agent.run_jobs_until(run_for) {
                Ok(count) => {
                    if verbose {
                        eprintln!(
                            "Ran {count} timer callbacks in {run_for} ms, {} still pending",
                            agent.pending_jobs()
                        );
                    }
                }
                Err(error) => exit_with_uncaught_exception(&mut agent, error),
            }
        }
        Command::Repl { verbose } => {
            let mut agent = Agent::new(
                AgentOptions {
                    disable_gc: false,
                    print_internals: verbose,
                },
                &DefaultHostHooks,
            );

            set_theme(DefaultTheme);
            println!("\n\n");
            let mut placeholder = "Enter a line of Javascript".to_string();

            loop {
                intro("Quiver Repl (type exit or ctrl+c to exit, tick <ms> to run timers)")?;
                let input: String = input("").placeholder(&placeholder).interact()?;

                let trimmed = input.trim();
                if trimmed == "exit" {
                    std::process::exit(0);
                } else if trimmed == "gc" {
                    agent.gc();
                    continue;
                } else if let Some(ms) = trimmed.strip_prefix("tick ") {
                    let Ok(ms) = ms.trim().parse::<u64>() else {
                        eprintln!("tick expects a number of milliseconds");
                        continue;
                    };
                    let deadline = agent.now() + ms;
                    match agent.run_jobs_until(deadline) {
                        Ok(count) => println!("Ran {count} timer callbacks, now at {deadline} ms\n"),
                        Err(error) => print_uncaught_exception(&mut agent, error),
                    }
                    continue;
                }
                placeholder = input.clone();
                let source: &'static str = Box::leak(input.into_boxed_str());
                let script = match leak_script(source, ScriptOptions::default()) {
                    Ok(script) => script,
                    Err(errors) => {
                        print_parse_errors(errors, "<stdin>", source);
                        continue;
                    }
                };
                match agent.run_script(script) {
                    Ok(result) => println!("{}\n", result.string_repr(&agent)),
                    Err(error) => print_uncaught_exception(&mut agent, error),
                }
            }
        }
    }
    Ok(())
}
