//! Headless harness: loads a scene from a data directory, ticks it at the
//! configured rate and reads player actions from stdin, one per line.
//!
//! ```text
//! enter <id> | exit <id> | key <name> | click [object [distance] [u v]]
//! inspect <slot> | hide | state | quit
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use adventure_interactions::{FrameInput, KeyCode, LogPresenter, NoRaycast, PointerHit, Scene};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Enter(String),
    Exit(String),
    Key(String),
    Click(Option<PointerHit>),
    Inspect(usize),
    Hide,
    State,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".to_string());
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb, args.as_slice()) {
            ("enter", [id]) => Command::Enter(id.to_string()),
            ("exit", [id]) => Command::Exit(id.to_string()),
            ("key", [name]) => Command::Key(name.to_string()),
            ("click", []) => Command::Click(None),
            ("click", [object]) => Command::Click(Some(PointerHit::new(object, 0.0))),
            ("click", [object, distance]) => {
                Command::Click(Some(PointerHit::new(object, parse_number(distance)?)))
            }
            ("click", [object, distance, u, v]) => Command::Click(Some(
                PointerHit::new(object, parse_number(distance)?)
                    .with_uv(parse_number(u)?, parse_number(v)?),
            )),
            ("inspect", [slot]) => Command::Inspect(
                slot.parse()
                    .map_err(|_| format!("invalid slot index '{}'", slot))?,
            ),
            ("hide", []) => Command::Hide,
            ("state", []) => Command::State,
            ("quit", []) => Command::Quit,
            _ => return Err(format!("unrecognized command '{}'", line.trim())),
        };
        Ok(command)
    }
}

fn parse_number(word: &str) -> Result<f32, String> {
    word.parse().map_err(|_| format!("invalid number '{}'", word))
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("adventure_interactions=info,adventure_harness=info")),
        )
        .init();

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let mut scene = match Scene::load(&data_dir) {
        Ok(scene) => scene,
        Err(e) => {
            error!("Failed to load scene: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut presenter = LogPresenter;
    scene.refresh_panels(&mut presenter);

    let tick_rate = scene.settings().harness.tick_rate;
    let mut interval = tokio::time::interval(Duration::from_secs_f32(1.0 / tick_rate));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = FrameInput::default();
    let mut last_tick = Instant::now();

    info!("Harness running at {} ticks/s", tick_rate);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f32();
                last_tick = now;
                scene.tick(dt, &pending, &mut presenter, &NoRaycast);
                pending.clear();
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read stdin: {}", e);
                        return ExitCode::FAILURE;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match Command::parse(&line) {
                    Ok(Command::Enter(id)) => {
                        scene.player_entered(&id, &mut presenter);
                    }
                    Ok(Command::Exit(id)) => {
                        scene.player_exited(&id, &mut presenter);
                    }
                    Ok(Command::Key(name)) => pending.keys_down.push(KeyCode::new(&name)),
                    Ok(Command::Click(hit)) => {
                        pending.primary_click = true;
                        pending.pointer_hit = hit;
                    }
                    Ok(Command::Inspect(slot)) => scene.inspect_slot(slot, &mut presenter),
                    Ok(Command::Hide) => scene.hide_item_description(&mut presenter),
                    Ok(Command::State) => match serde_json::to_string_pretty(&scene.snapshot()) {
                        Ok(json) => println!("{}", json),
                        Err(e) => error!("Failed to serialize state: {}", e),
                    },
                    Ok(Command::Quit) => break,
                    Err(e) => warn!("{}", e),
                }
            }
        }
    }

    info!("Harness stopped");
    ExitCode::SUCCESS
}
