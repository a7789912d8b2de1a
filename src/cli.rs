use clap::Parser;

#[derive(Parser)]
#[command(name = "coderoom")]
#[command(version)]
#[command(about = "Replay a recorded interview-session trace and report the resulting state")]
pub struct Args {
    /// Path to a JSONL trace file (reads stdin when omitted)
    pub trace: Option<String>,

    /// Emit the full summary as JSON instead of the colored report
    #[arg(long)]
    pub json: bool,

    /// Suppress the per-topic breakdown, print only the final state
    #[arg(long, short)]
    pub quiet: bool,
}
