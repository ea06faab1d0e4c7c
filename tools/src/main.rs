//! fate-runner: headless session runner for the Fate Matcher engine.
//!
//! Usage:
//!   fate-runner --seed 42 --answers RRLRL [--fuzz 0] [--data-dir ./data]
//!   fate-runner --link "?a=blueprint&c=blueprint-eleven-mike&p=97.4"
//!   fate-runner --ipc-mode [--data-dir ./data]

use anyhow::Result;
use fate_core::{
    catalog::{Catalog, Direction},
    clock::{Clock, ManualClock, WallClock},
    codec,
    command::SessionCommand,
    config::EngineConfig,
    engine::SessionEngine,
    rng::{AmbientJitter, ClockSeeds, FixedJitter, FixedSeeds, Jitter},
    snapshot::SessionSnapshot,
    types::Millis,
};
use std::env;
use std::io::{self, BufRead, Write};

const DEFAULT_BASE_URL: &str = "https://fictional-fate.app/";

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Command { command: SessionCommand },
    Advance { ms: Millis },
    ShareLink {
        #[serde(default)]
        base_url: Option<String>,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct IpcResponse<'a> {
    state: &'a SessionSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    link:  Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = string_arg(&args, "--data-dir");
    let base_url = string_arg(&args, "--base-url").unwrap_or(DEFAULT_BASE_URL);

    let (config, catalog) = match data_dir {
        Some(dir) => (EngineConfig::load(dir)?, Catalog::load(dir)?),
        None => (EngineConfig::default(), Catalog::builtin()?),
    };

    if let Some(link) = string_arg(&args, "--link") {
        return print_link(link, &catalog);
    }

    if args.iter().any(|a| a == "--ipc-mode") {
        return run_ipc_loop(config, catalog);
    }

    let seed = parse_arg(&args, "--seed", 42u64);
    let answers = string_arg(&args, "--answers").unwrap_or("RRRRR");
    let jitter: Box<dyn Jitter> = match string_arg(&args, "--fuzz").and_then(|f| f.parse().ok()) {
        Some(fuzz) => Box::new(FixedJitter(fuzz)),
        None => Box::new(AmbientJitter),
    };

    println!("Fate Matcher — fate-runner");
    println!("  seed:      {seed}");
    println!("  answers:   {answers}");
    println!("  data_dir:  {}", data_dir.unwrap_or("(builtin)"));
    println!();

    run_scripted(config, catalog, seed, answers, jitter, base_url)
}

fn run_scripted(
    config: EngineConfig,
    catalog: Catalog,
    seed: u64,
    answers: &str,
    jitter: Box<dyn Jitter>,
    base_url: &str,
) -> Result<()> {
    let mut clock = ManualClock::starting_at(0);
    let step = config.answer_cooldown_ms + 50;
    let delay = config.simulation_delay_ms;

    let mut engine = SessionEngine::new(
        format!("run-{seed}"),
        config,
        catalog,
        Box::new(FixedSeeds::new([seed])),
        jitter,
        clock.now_ms(),
    )?;

    engine.handle(clock.now_ms(), SessionCommand::Start)?;
    for (i, q) in engine.questions().iter().enumerate() {
        println!("  Q{}: {} [{} | {}]", i + 1, q.prompt, q.left.label, q.right.label);
    }
    println!();

    for c in answers.chars() {
        let Some(direction) = Direction::from_char(c) else {
            log::warn!("Skipping unknown answer '{c}' (use L or R)");
            continue;
        };
        clock.advance(step);
        engine.handle(clock.now_ms(), SessionCommand::Answer { direction, question_id: None })?;
        if let Some(commentary) = engine.commentary() {
            println!("  {:?} -> {}: {}", direction, commentary.label, commentary.text);
        }
    }

    clock.advance(delay);
    engine.advance_to(clock.now_ms())?;
    print_summary(&engine, base_url);
    Ok(())
}

fn print_summary(engine: &SessionEngine, base_url: &str) {
    let snapshot = engine.snapshot();
    let s = &snapshot.scores;

    println!();
    println!("=== SESSION SUMMARY ===");
    println!("  session:       {}", snapshot.session_id);
    println!("  phase:         {:?}", snapshot.phase);
    println!(
        "  scores:        obsidian={} radiant={} blueprint={} kinetic={} sentimental={}",
        s.obsidian, s.radiant, s.blueprint, s.kinetic, s.sentimental
    );

    match (&snapshot.result, &snapshot.matched_candidate) {
        (Some(result), Some(candidate)) => {
            println!("  archetype:     {}", result.archetype.label());
            println!("  compatibility: {}%", result.compatibility);
            println!("  match:         {} ({})", candidate.name, candidate.origin);
            println!("  tagline:       {}", candidate.tagline);
            if let Some(link) = engine.share_link(base_url) {
                println!("  share link:    {link}");
            }
        }
        _ => println!("  (no result — answer every question to finish the quiz)"),
    }
}

fn print_link(link: &str, catalog: &Catalog) -> Result<()> {
    match codec::decode(link, catalog) {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            println!("invalid link: {e}");
        }
    }
    Ok(())
}

fn run_ipc_loop(config: EngineConfig, catalog: Catalog) -> Result<()> {
    let clock = WallClock;
    let session_id = uuid::Uuid::new_v4().to_string();
    let mut engine = SessionEngine::new(
        session_id,
        config,
        catalog,
        Box::new(ClockSeeds),
        Box::new(AmbientJitter),
        clock.now_ms(),
    )?;
    // Advance requests move a virtual offset on top of wall time so a
    // driver can skip the simulating delay.
    let mut offset: Millis = 0;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let now = clock.now_ms() + offset;
        let mut link = None;
        match request {
            IpcRequest::Quit => break,
            IpcRequest::GetState => {
                engine.advance_to(now)?;
            }
            IpcRequest::Command { command } => {
                engine.handle(now, command)?;
            }
            IpcRequest::Advance { ms } => {
                offset += ms;
                engine.advance_to(now + ms)?;
            }
            IpcRequest::ShareLink { base_url } => {
                engine.advance_to(now)?;
                link = engine.share_link(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));
            }
        }

        let state = engine.snapshot();
        writeln!(stdout, "{}", serde_json::to_string(&IpcResponse { state: &state, link })?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
