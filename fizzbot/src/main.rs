//! fizzbot CLI.
//!
//! Fetches and answers fizzbot challenge questions. Progress is checkpointed
//! to `save/checkpoint.json` and answered stages are archived under `stages/`,
//! so `fizzbot run --resume` continues where the last run stopped.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fizzbot::core::rules::solve;
use fizzbot::core::transition::classify;
use fizzbot::io::api::{FizzbotApi, HttpApi};
use fizzbot::io::checkpoint::load_checkpoint;
use fizzbot::io::config::{Config, load_config};
use fizzbot::report::{render_outcome, render_question, render_result, render_step};
use fizzbot::session::{SessionConfig, SessionStart, record_stage, run_session};
use fizzbot::{FizzbotError, exit_codes, logging};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "fizzbot",
    version,
    about = "Client for the fizzbot FizzBuzz challenge"
)]
struct Cli {
    /// TOML configuration file (defaults apply when missing).
    #[arg(long, global = true, default_value = "fizzbot.toml")]
    config: PathBuf,

    /// Override the remote service root.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the checkpoint file.
    #[arg(long, global = true)]
    checkpoint: Option<PathBuf>,

    /// Override the stage archive directory.
    #[arg(long, global = true)]
    stages_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and print a question.
    Get {
        /// Stage id (hash) of the question.
        id: String,
    },
    /// Fetch a question and print the computed answer without submitting it.
    Solve { id: String },
    /// Submit an answer; on success archive the stage and advance the checkpoint.
    Answer { id: String, answer: String },
    /// Print the checkpointed stage and its question.
    Last,
    /// Answer questions until the interview is complete.
    Run {
        /// Continue from the existing checkpoint instead of the starter stage.
        #[arg(long)]
        resume: bool,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;
    debug!(base_url = %cfg.base_url, checkpoint = %cfg.checkpoint_path.display(), "config resolved");
    match cli.command {
        Command::Get { id } => cmd_get(&cfg, &id),
        Command::Solve { id } => cmd_solve(&cfg, &id),
        Command::Answer { id, answer } => cmd_answer(&cfg, &id, &answer),
        Command::Last => cmd_last(&cfg),
        Command::Run { resume } => cmd_run(&cfg, resume),
    }
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut cfg = load_config(&cli.config)?;
    if let Some(base_url) = &cli.base_url {
        cfg.base_url = base_url.clone();
    }
    if let Some(checkpoint) = &cli.checkpoint {
        cfg.checkpoint_path = checkpoint.clone();
    }
    if let Some(stages_dir) = &cli.stages_dir {
        cfg.stages_dir = stages_dir.clone();
    }
    cfg.validate().context("invalid command-line override")?;
    Ok(cfg)
}

fn http_api(cfg: &Config) -> Result<HttpApi> {
    HttpApi::new(&cfg.base_url, cfg.request_timeout()).context("build http client")
}

fn cmd_get(cfg: &Config, id: &str) -> Result<()> {
    let question = http_api(cfg)?.get_question(id)?;
    print!("{}", render_question(&question));
    Ok(())
}

fn cmd_solve(cfg: &Config, id: &str) -> Result<()> {
    let question = http_api(cfg)?.get_question(id)?;
    println!("{}", solve(&question.numbers, &question.rules));
    Ok(())
}

fn cmd_answer(cfg: &Config, id: &str, answer: &str) -> Result<()> {
    let api = http_api(cfg)?;
    let question = api.get_question(id)?;
    let result = api.submit_answer(id, answer)?;
    print!("{}", render_result(&result));

    let transition = classify(id, &question, answer, &result)?;
    record_stage(&SessionConfig::from_config(cfg), id, &question, answer, &transition)
        .with_context(|| format!("record stage {id}"))?;
    println!("Checkpoint: {}", transition.next_stage_id());
    Ok(())
}

fn cmd_last(cfg: &Config) -> Result<()> {
    let checkpoint = load_checkpoint(&cfg.checkpoint_path)
        .context("load checkpoint (run `fizzbot run` first)")?;
    if checkpoint.is_terminal() {
        println!("Last Stage: (interview complete)");
        return Ok(());
    }
    println!("Last Stage: {}\n", checkpoint.last_stage_id);
    let question = http_api(cfg)?.get_question(&checkpoint.last_stage_id)?;
    print!("{}", render_question(&question));
    Ok(())
}

fn cmd_run(cfg: &Config, resume: bool) -> Result<()> {
    let api = http_api(cfg)?;
    let start = if resume {
        SessionStart::Resume
    } else {
        SessionStart::Fresh
    };
    let outcome = run_session(&api, &SessionConfig::from_config(cfg), start, |step| {
        println!("{}", render_step(step));
    })?;
    println!("{}", render_outcome(&outcome));
    Ok(())
}

/// Map the underlying [`FizzbotError`] (if any) to its exit code.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<FizzbotError>()
        .map_or(exit_codes::FAILED, FizzbotError::exit_code)
}
