use std::path::Path;

use chrono::{Duration, TimeZone, Utc};
use emoflow::prelude::*;

const DEMO_FRAMES: usize = 120;

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return;
    }
    if args.len() > 2 {
        eprintln!("Unexpected argument: {}", args[2]);
        print_help();
        std::process::exit(2);
    }

    let events = match args.get(1) {
        Some(path) => match load_events(Path::new(path)) {
            Ok(ev) => ev,
            Err(e) => {
                eprintln!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => demo_week(),
    };

    if let Err(e) = run(events) {
        eprintln!("emoflow: {e}");
        std::process::exit(1);
    }
}

fn print_help() {
    println!(
        r#"emoflow - emotion transition graph demo

USAGE:
  emoflow                 Synthesize a week of events and run the engine
  emoflow <events.json>   Load events from a JSON array
  emoflow --help          Show this help

EVENTS JSON:
  [{{"emotion": "happy", "timestamp": "2024-05-01T08:00:00Z"}}, ...]
  Labels go through the synonym table; unknown labels become neutral.

ENV:
  RUST_LOG=debug          Show recomputation and layout logs
"#
    );
}

fn load_events(path: &Path) -> Result<Vec<EmotionEvent>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Seven days, four check-ins a day, cycling through a fixed mood script.
fn demo_week() -> Vec<EmotionEvent> {
    use Emotion::*;
    const SCRIPT: [Emotion; 9] = [Neutral, Joy, Sadness, Neutral, Anger, Fear, Neutral, Love, Joy];
    const CHECK_IN_HOURS: [i64; 4] = [8, 13, 19, 23];

    let Some(monday) = Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).single() else {
        return Vec::new();
    };
    let mut events = Vec::with_capacity(28);
    for day in 0..7i64 {
        for (slot, hour) in CHECK_IN_HOURS.iter().enumerate() {
            let i = (day as usize * CHECK_IN_HOURS.len() + slot) % SCRIPT.len();
            let at = monday + Duration::days(day) + Duration::hours(*hour);
            events.push(EmotionEvent::new(SCRIPT[i], at));
        }
    }
    events
}

fn run(events: Vec<EmotionEvent>) -> Result<(), EngineError> {
    let current = events.last().map(|e| e.emotion);
    let engine = FlowEngine::new(EngineConfig::default().with_utc_offset_minutes(0))?;
    let mut view = FlowView::new(
        engine,
        Some(RecordingSurface::new(960.0, 720.0)),
        ManualScheduler::new(),
    )?;
    view.on_data_changed(events);
    view.set_current_emotion(current);
    view.start();

    let mut last = FrameStats::default();
    let mut peak_particles = 0;
    let mut commands = 0;
    for _ in 0..DEMO_FRAMES {
        let Some(handle) = view.scheduler_mut().fire() else {
            break;
        };
        if let Some(stats) = view.on_frame(handle) {
            peak_particles = peak_particles.max(stats.particles);
            last = stats;
            commands = view.surface_mut().take_commands().len();
        }
    }
    view.stop();

    println!("{}", view.engine().summary().to_json_pretty()?);
    println!(
        "frames={} edges={} badges={} particles(last/peak)={}/{} commands_per_frame={}",
        view.frames_rendered(),
        last.edges,
        last.badges,
        last.particles,
        peak_particles,
        commands,
    );
    Ok(())
}
