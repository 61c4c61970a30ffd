//! Interactive loop over the capability router.

use crate::render;
use nio_core::CapabilityRouter;
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

pub struct Repl {
    router: Arc<CapabilityRouter>,
}

impl Repl {
    pub fn new(router: Arc<CapabilityRouter>) -> Self {
        Self { router }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        println!("Nio capability router. Type 'help' for commands.");
        println!();

        let stdin = io::stdin();
        loop {
            print!("nio> ");
            io::stdout().flush()?;

            let mut input = String::new();
            if stdin.lock().read_line(&mut input)? == 0 {
                break;
            }
            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            match input {
                "exit" | "quit" => {
                    println!("Goodbye!");
                    break;
                }
                "help" => print_help(),
                "status" => println!("{}", render(&status_report(&self.router))),
                "batch" => {
                    let lines = read_block(&stdin)?;
                    let outcome = self.router.dispatch_batch(&lines).await;
                    println!("{}", render(&outcome));
                }
                text => {
                    let envelope = self.router.route(text).await;
                    println!("{}", render(&envelope));
                }
            }
        }
        Ok(())
    }
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  exit, quit  - Leave the REPL");
    println!("  help        - Show this message");
    println!("  status      - Capability availability and counters");
    println!("  batch       - Enter command lines, finish with an empty line");
    println!();
    println!("Anything else is classified and routed to a capability.");
    println!();
}

/// Lines until the first blank one.
fn read_block(stdin: &io::Stdin) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    loop {
        print!("...> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}

pub fn status_report(router: &CapabilityRouter) -> serde_json::Value {
    json!({
        "capabilities": router.status(),
        "strategies": router.strategies(),
        "intent_model": router.has_intent_model(),
        "metrics": router.metrics(),
    })
}
