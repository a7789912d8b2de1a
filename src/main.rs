use std::fs::File;
use std::io::{self, BufReader, Read};
use std::process::ExitCode;

use clap::Parser;
use colored::*;

use coderoom::cli::Args;
use coderoom::replay::{replay, ReplaySummary};
use coderoom::ConnectionState;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let summary = match run_replay(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&summary, args.quiet);
    }

    ExitCode::SUCCESS
}

fn run_replay(args: &Args) -> Result<ReplaySummary, coderoom::CoderoomError> {
    match &args.trace {
        Some(path) => {
            let file = File::open(path)?;
            replay(BufReader::new(file))
        }
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            replay(buf.as_bytes())
        }
    }
}

fn print_report(summary: &ReplaySummary, quiet: bool) {
    if !quiet {
        println!("{}", "── trace ──────────────────────────".dimmed());
        println!("  events applied: {}", summary.events);
        for (topic, count) in &summary.routed {
            println!("  {} {}", format!("{count:>4}×").cyan(), topic);
        }
        if summary.ignored > 0 {
            println!("  {} unrecognized messages ignored", summary.ignored);
        }
        if summary.dropped > 0 {
            println!(
                "  {}",
                format!("{} undecodable messages dropped", summary.dropped).yellow()
            );
        }
        for (tag, count) in &summary.outbound {
            println!("  {} {} (outbound)", format!("{count:>4}×").magenta(), tag);
        }
    }

    let state = &summary.final_state;
    let connection = match state.connection {
        ConnectionState::Connected => state.connection.to_string().green(),
        ConnectionState::Disconnected => state.connection.to_string().red(),
        _ => state.connection.to_string().yellow(),
    };

    println!("{}", "── final state ────────────────────".dimmed());
    println!("  connection:  {connection}");
    println!(
        "  question:    {}",
        if state.question_loaded { "loaded".normal() } else { "none".dimmed() }
    );
    println!("  feedback:    {}", state.feedback);
    if let Some(banner) = &state.banner {
        println!("  banner:      {}", banner.bold());
    }
    println!("  time left:   {}", state.time_display);
    println!("  transcript:  {} entries", state.transcript_entries);
    println!(
        "  code:        {} chars",
        state.code.chars().count()
    );
}
