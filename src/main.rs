use crate::aircraft::AircraftHandle;
use crate::queue::AircraftQueue;
use crate::task::TaskType;
use crate::tower::ControlTower;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

mod aircraft;
mod error;
mod queue;
mod scenario;
mod task;
mod terminal;
mod tower;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Run this many ticks, print the tower and exit
    #[arg(short, long, value_name = "N")]
    ticks: Option<u64>,

    /// Log every landing, takeoff and loading
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();

        Ok((0, candidates))
    }
}

#[derive(Tabled)]
struct AircraftRow {
    #[tabled(rename = "Callsign")]
    callsign: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Task")]
    task: String,
    #[tabled(rename = "Fuel %")]
    fuel: u32,
    #[tabled(rename = "Cargo")]
    cargo: u32,
    #[tabled(rename = "Gate")]
    gate: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct TerminalRow {
    #[tabled(rename = "Terminal")]
    terminal: String,
    #[tabled(rename = "Gates")]
    gates: usize,
    #[tabled(rename = "Occupancy %")]
    occupancy: u32,
    #[tabled(rename = "Parked")]
    parked: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn aircraft_row(tower: &ControlTower, handle: &AircraftHandle) -> AircraftRow {
    let gate = tower
        .find_gate_of_aircraft(handle)
        .map(|loc| {
            let terminal = &tower.terminals()[loc.terminal];
            format!("{} {} / {}", terminal.kind(), terminal.number(), terminal.gates()[loc.gate].number())
        })
        .unwrap_or_else(|| "-".to_string());
    let a = handle.borrow();
    let status = if a.has_emergency() {
        "EMERGENCY".red().bold().to_string()
    } else if a.fuel_percent_remaining() <= 20 {
        "LOW FUEL".yellow().to_string()
    } else {
        "OK".green().to_string()
    };
    AircraftRow {
        callsign: a.callsign().to_string(),
        model: a.characteristics().to_string(),
        task: a.task_list().current_task().to_string(),
        fuel: a.fuel_percent_remaining(),
        cargo: a.cargo(),
        gate,
        status,
    }
}

fn terminal_rows(tower: &ControlTower) -> Vec<TerminalRow> {
    tower
        .terminals()
        .iter()
        .map(|t| TerminalRow {
            terminal: format!("{} {}", t.kind(), t.number()),
            gates: t.gates().len(),
            occupancy: t.occupancy_level(),
            parked: t
                .gates()
                .iter()
                .filter_map(|g| g.aircraft_at_gate().map(|a| a.callsign().to_string()))
                .collect::<Vec<_>>()
                .join(", "),
            status: if t.has_emergency() {
                "EMERGENCY".red().bold().to_string()
            } else {
                "OPEN".green().to_string()
            },
        })
        .collect()
}

fn print_table<T: Tabled>(rows: &[T], empty: &str) {
    if rows.is_empty() {
        println!("{}", empty);
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn paginate(content: String) {
    let spawned = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let mut pager = match spawned {
        Ok(pager) => pager,
        Err(_) => {
            println!("{}", content);
            return;
        }
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn run_ticks(tower: &mut ControlTower, n: u64) -> error::Result<()> {
    for _ in 0..n {
        tower.tick()?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "towersim=debug" } else { "towersim=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut tower = ControlTower::load_from_file(&args.scenario)?;
    println!("Tower online. Loaded scenario from {}", args.scenario.display());

    if let Some(n) = args.ticks {
        run_ticks(&mut tower, n)?;
        println!("{}", tower);
        println!("{}", tower.encode_queues());
        println!("{}", serde_json::to_string_pretty(&tower.snapshot())?);
        return Ok(());
    }

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "tick", "ls", "queues", "terminals", "status", "emergency", "clear", "save", "help", "exit",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "tick" => {
                        let n = match parts.get(1).map(|s| s.parse::<u64>()) {
                            None => 1,
                            Some(Ok(n)) => n,
                            Some(Err(_)) => {
                                println!("Usage: tick [n]");
                                continue;
                            }
                        };
                        match run_ticks(&mut tower, n) {
                            Ok(()) => println!("Tick {}. {}", tower.ticks_elapsed(), tower),
                            Err(e) => {
                                println!("{} {}", "Simulation halted:".red().bold(), e);
                                break;
                            }
                        }
                    },
                    "ls" => {
                        let sub = parts.get(1).copied().unwrap_or("a");
                        let rows: Vec<AircraftRow> = tower.aircraft().iter()
                            .filter(|a| match sub {
                                "l" | "landing" => a.current_task() == TaskType::Land,
                                "t" | "takeoff" => a.current_task() == TaskType::Takeoff,
                                "o" | "loading" => a.current_task() == TaskType::Load,
                                _ => true, // 'ls' or 'ls a'
                            })
                            .map(|a| aircraft_row(&tower, a))
                            .collect();
                        print_table(&rows, "No matching aircraft found.");
                    },
                    "queues" => {
                        println!("{}", tower.landing_queue());
                        println!("{}", tower.takeoff_queue());
                        let loading = tower.loading_aircraft().iter()
                            .map(|(a, ticks)| format!("{} ({} ticks)", a.callsign(), ticks))
                            .collect::<Vec<_>>()
                            .join(", ");
                        println!("LoadingAircraft [{}]", loading);
                    },
                    "terminals" => {
                        print_table(&terminal_rows(&tower), "No terminals.");
                    },
                    "status" => {
                        println!("{}", tower);
                        println!(
                            "Ticks elapsed: {}, next in landing queue: {}, next in takeoff queue: {}",
                            tower.ticks_elapsed(),
                            tower.landing_queue().peek_aircraft().map(|a| a.callsign().to_string()).unwrap_or_else(|| "-".to_string()),
                            tower.takeoff_queue().peek_aircraft().map(|a| a.callsign().to_string()).unwrap_or_else(|| "-".to_string()),
                        );
                    },
                    "emergency" | "clear" if parts.get(1) == Some(&"terminal") => {
                        match parts.get(2).and_then(|n| n.parse::<usize>().ok()).filter(|n| *n > 0) {
                            Some(n) => {
                                let found = if parts[0] == "emergency" {
                                    tower.declare_terminal_emergency(n - 1)
                                } else {
                                    tower.clear_terminal_emergency(n - 1)
                                };
                                match tower.terminals().get(n - 1) {
                                    Some(t) if found => println!("{}", t),
                                    _ => println!("{} {}", "Unknown terminal:".yellow(), n),
                                }
                            }
                            None => println!("Usage: {} terminal <n>", parts[0]),
                        }
                    },
                    "emergency" | "clear" => {
                        if let Some(callsign) = parts.get(1) {
                            let found = if parts[0] == "emergency" {
                                tower.declare_emergency(callsign)
                            } else {
                                tower.clear_emergency(callsign)
                            };
                            if found {
                                println!("{}", tower.find_aircraft(callsign).map(|a| a.to_string()).unwrap_or_default());
                            } else {
                                println!("{} {}", "Unknown aircraft:".yellow(), callsign);
                            }
                        } else {
                            println!("Usage: {} <callsign>", parts[0]);
                        }
                    },
                    "save" => {
                        if let Some(path) = parts.get(1) {
                            match tower.save_to_file(path) {
                                Ok(()) => println!("Saved scenario to {}", path),
                                Err(e) => println!("{} {}", "Save failed:".red(), e),
                            }
                        } else {
                            println!("Usage: save <file>");
                        }
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  tick [n]          - Advance the simulation by n ticks (default 1)");
                        println!("  ls [filter]       - List aircraft in a table or filter by task: l - landing, t - takeoff, o - loading");
                        println!("  queues            - Show the landing and takeoff queues and the aircraft loading at gates");
                        println!("  terminals         - List terminals with gate occupancy");
                        println!("  status            - Summarise the tower");
                        println!("  emergency <cs>    - Declare an emergency on aircraft <cs>");
                        println!("  clear <cs>        - Clear the emergency on aircraft <cs>");
                        println!("  emergency terminal <n> / clear terminal <n>");
                        println!("                    - Close or reopen the n-th terminal (as listed by 'terminals')");
                        println!("  save <file>       - Write the current state as a scenario file");
                        println!("  help / ?          - Show this help menu");
                        println!("  exit / quit       - Exit the simulator\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
