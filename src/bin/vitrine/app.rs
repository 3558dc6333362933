use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, stdin};
use tokio::signal;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, error, info, warn};
use vitrine::Result;
use vitrine::animation::Animation;
use vitrine::config::Config;
use vitrine::notify::{LogSink, NotificationCenter};
use vitrine::page::{Effect, Page};
use vitrine::scroll::SectionLayout;
use vitrine::stage::Stage;
use vitrine::telemetry::init_tracing;
use vitrine::theme::{PrefsStore, ThemeController};

use super::cli::Cli;
use super::script::{Line, parse_line};

const DEFAULT_CONFIG: &str = "vitrine.toml";
const FRAME_CHECK: Duration = Duration::from_millis(250);

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = Config::from_env_and_file(&config_path)?;

    if let Some(seed) = cli.seed {
        config.particles.seed = Some(seed);
    }
    if let Some(frame_interval) = cli.frame_interval {
        config.animation.frame_interval = frame_interval;
    }
    if let Some(state_dir) = cli.state_dir {
        config.prefs.state_dir = state_dir;
    }

    let store = if cli.dry_run {
        info!("dry run, preferences will not be saved");
        PrefsStore::ephemeral()
    } else {
        PrefsStore::open(&config.prefs.state_dir).unwrap_or_else(|err| {
            warn!(error = %err, "preferences unavailable, using defaults for this session");
            PrefsStore::ephemeral()
        })
    };
    let themes = ThemeController::load(store, config.prefs.default_theme);

    let center = NotificationCenter::spawn(&config.notify, LogSink);
    let seed = config.particles.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        particles = config.particles.count,
        policy = ?config.particles.policy,
        "starting page"
    );
    let stage = Stage::new(config.viewport, &config.particles, &config.animation, seed);
    let animation = Animation::spawn(
        stage,
        config.animation.frame_interval,
        Some(center.notifier()),
    );

    let mut page = Page::new(
        center.notifier(),
        themes,
        SectionLayout::uniform(config.page.section_height),
        config.viewport,
        config.contact.clone(),
    );
    apply(&animation, page.start());

    let mut lines = BufReader::new(stdin()).lines();
    let mut stdin_open = true;
    let mut frame_check = interval(FRAME_CHECK);
    frame_check.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("shutdown signal received, stopping page");
                break;
            }
            _ = frame_check.tick(), if cli.frames.is_some() => {
                let limit = cli.frames.unwrap_or(u64::MAX);
                match animation.snapshot().await {
                    Ok(snapshot) if snapshot.frames >= limit => {
                        info!(frames = snapshot.frames, "frame limit reached");
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        error!(error = %err, "frame loop is gone");
                        break;
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("end of script");
                        stdin_open = false;
                        if cli.once {
                            break;
                        }
                        if cli.frames.is_none() {
                            info!("script finished, waiting for ctrl-c");
                        }
                        continue;
                    }
                    Err(err) => {
                        warn!(error = %err, "cannot read script, ignoring stdin");
                        stdin_open = false;
                        continue;
                    }
                };
                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(Line::Input(input))) => apply(&animation, page.handle(input)),
                    Ok(Some(Line::Observe(id, rect))) => page.observe(id, rect),
                    Ok(Some(Line::Wait(pause))) => {
                        tokio::select! {
                            _ = signal::ctrl_c() => {
                                info!("shutdown signal received, stopping page");
                                break;
                            }
                            () = sleep(pause) => {}
                        }
                    }
                    Ok(Some(Line::Snapshot)) => match animation.snapshot().await {
                        Ok(snapshot) => info!(?snapshot, theme = %page.theme(), section = %page.current_section(), "snapshot"),
                        Err(err) => warn!(error = %err, "snapshot unavailable"),
                    },
                    Ok(Some(Line::Quit)) => break,
                    Err(err) => warn!(error = %err, line = %line, "skipping script line"),
                }
            }
        }
    }

    let stage = animation.dispose().await?;
    let snapshot = stage.snapshot();
    info!(
        frames = snapshot.frames,
        visible_particles = snapshot.visible_particles,
        reduced = snapshot.reduced,
        "animation stopped"
    );
    drop(page);
    let shown = center.shutdown().await;
    info!(shown, "notification center stopped");

    Ok(())
}

/// Forwards stage effects to the frame loop and logs the rest.
fn apply(animation: &Animation, effects: Vec<Effect>) {
    for effect in effects {
        let outcome = match effect {
            Effect::PauseAnimations => animation.pause(),
            Effect::ResumeAnimations => animation.resume(),
            Effect::ResizeStage(viewport) => animation.resize(viewport),
            Effect::MovePointer(x, y) => animation.pointer(x, y),
            Effect::OpenUrl(url) => {
                info!(%url, "open url");
                Ok(())
            }
            other => {
                info!(effect = ?other, "effect");
                Ok(())
            }
        };
        if let Err(err) = outcome {
            warn!(error = %err, "animation did not accept effect");
        }
    }
}
