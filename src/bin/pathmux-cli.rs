use std::process::ExitCode;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use pathmux::config::Variant;
use pathmux::demo;
use pathmux::routing::Dispatcher;

#[derive(Parser)]
#[command(name = "pathmux-cli")]
#[command(about = "Inspect the routes of a pathmux demo program", long_about = None)]
struct Cli {
    /// Demo program to inspect.
    #[arg(short, long, value_enum, default_value = "mux", global = true)]
    variant: Variant,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every route in match order
    Routes,
    /// Show which route a request would reach
    Match {
        /// HTTP method, e.g. GET
        method: String,
        /// Request path, e.g. /handle-vars/abc
        path: String,
    },
    /// Build the URL of a named route
    Url {
        /// Route name
        name: String,
        /// Variables as KEY=VALUE
        vars: Vec<String>,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let dispatcher = demo::build(cli.variant)?.into_dispatcher()?;

    match cli.command {
        Commands::Routes => {
            print_json(&serde_json::to_value(dispatcher.routes())?)?;
        }
        Commands::Match { method, path } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            match describe_match(&dispatcher, &method, &path) {
                Some(found) => print_json(&found)?,
                None => {
                    eprintln!("No route matched {} {}", method, path);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Url { name, vars } => {
            let pairs = vars
                .iter()
                .map(|kv| {
                    kv.split_once('=')
                        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", kv))
                })
                .collect::<Result<Vec<(&str, &str)>, _>>()?;
            println!("{}", dispatcher.url_for(&name, &pairs)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn describe_match(dispatcher: &Dispatcher, method: &Method, path: &str) -> Option<Value> {
    let found = dispatcher.match_route(method, path)?;
    let route = found.route();
    Some(json!({
        "pattern": route.pattern().template(),
        "methods": route.methods().iter().map(|m| m.to_string()).collect::<Vec<_>>(),
        "name": route.name(),
        "vars": found.vars(),
        "middleware": found.middleware_len(),
    }))
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
