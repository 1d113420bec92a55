//! Interactive terminal sessions, one per tool.
//!
//! Each session runs a single loop over three sources: ticks from the
//! tool's ticker, lines typed by the user, and Ctrl-C. A completion is
//! resolved inside the loop iteration that observes it, so no other command
//! can interleave with an open completion prompt. Ctrl-C still ends the
//! session while the prompt is open; the pending prompt is dropped, which
//! silences the alarm.

use std::future::Future;
use std::io::{self, BufRead};
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::clock::SystemClock;
use crate::config::{AppConfig, CountdownConfig};
use crate::engine::TimerEvent;
use crate::notifier::AlarmNotifier;
use crate::sound::{alarm_source, try_create_player, RodioSoundPlayer};
use crate::tools::{log_rejection, Countdown, PomodoroCycle, PomodoroPhase, Stopwatch};
use crate::types::TimerMode;

use super::display::Display;
use super::prompt::{next_line, SharedInput, TerminalPrompt};

type TerminalNotifier = AlarmNotifier<RodioSoundPlayer, TerminalPrompt>;

// ============================================================================
// Input
// ============================================================================

/// One command typed during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Toggle,
    Start,
    Pause,
    Reset,
    Lap(Option<String>),
    Laps,
    SetDuration(CountdownConfig),
    SwitchPhase(PomodoroPhase),
    StepFocus(i32),
    StepBreak(i32),
    SetFocus(u32),
    SetBreak(u32),
    Help,
    Quit,
    Unknown(String),
}

/// Parses one typed line.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" | "p" => Input::Toggle,
        "start" => Input::Start,
        "pause" => Input::Pause,
        "r" | "reset" => Input::Reset,
        "l" | "lap" => Input::Lap((!rest.is_empty()).then(|| rest.to_string())),
        "laps" => Input::Laps,
        "set" => parse_hms(rest).map_or_else(|| Input::Unknown(line.to_string()), Input::SetDuration),
        "f" => Input::SwitchPhase(PomodoroPhase::Focus),
        "b" => Input::SwitchPhase(PomodoroPhase::Break),
        "f+" => Input::StepFocus(1),
        "f-" => Input::StepFocus(-1),
        "b+" => Input::StepBreak(1),
        "b-" => Input::StepBreak(-1),
        "focus" => rest
            .parse()
            .map_or_else(|_| Input::Unknown(line.to_string()), Input::SetFocus),
        "break" => rest
            .parse()
            .map_or_else(|_| Input::Unknown(line.to_string()), Input::SetBreak),
        "h" | "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

/// Parses `H:M:S`, `M:S` or `S` (colons or spaces).
fn parse_hms(text: &str) -> Option<CountdownConfig> {
    let parts = text
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse::<u32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    match parts.as_slice() {
        [seconds] => Some(CountdownConfig::new(0, 0, *seconds)),
        [minutes, seconds] => Some(CountdownConfig::new(0, *minutes, *seconds)),
        [hours, minutes, seconds] => Some(CountdownConfig::new(*hours, *minutes, *seconds)),
        _ => None,
    }
}

// ============================================================================
// Plumbing
// ============================================================================

/// Starts a thread forwarding stdin lines into a shared channel.
///
/// A plain thread is used so a pending read never holds up shutdown.
pub fn spawn_input_reader() -> Result<SharedInput> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
        })
        .context("failed to spawn the input reader")?;
    Ok(Arc::new(Mutex::new(rx)))
}

/// Builds the alarm + terminal prompt notifier from the configuration.
fn build_notifier(config: &AppConfig, input: SharedInput) -> TerminalNotifier {
    let player = if config.sound_enabled {
        try_create_player()
    } else {
        None
    };
    let source = alarm_source(config.alarm_path.as_deref());
    AlarmNotifier::new(player, TerminalPrompt::new(input), source)
}

fn drain_events(events: &mut mpsc::UnboundedReceiver<TimerEvent>) {
    while let Ok(event) = events.try_recv() {
        debug!(?event, "timer event");
    }
}

/// Runs `work` unless `interrupt` fires first.
///
/// `work` is polled first on every wakeup. Returns None when interrupted;
/// `work` is dropped unfinished.
async fn unless_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: Pin<&mut impl Future<Output = io::Result<()>>>,
) -> Result<Option<T>> {
    tokio::select! {
        biased;

        output = work => Ok(Some(output)),
        result = interrupt => {
            result.context("failed to listen for Ctrl-C")?;
            debug!("interrupted while resolving a completion");
            Ok(None)
        }
    }
}

fn unsupported(input: &Input, mode: TimerMode) {
    Display::show_error(&format!(
        "{:?} is not available in the {} (h for help)",
        input, mode
    ));
}

// ============================================================================
// Sessions
// ============================================================================

/// Runs the stopwatch until the user quits.
pub async fn run_stopwatch(config: &AppConfig, start: bool) -> Result<()> {
    let input = spawn_input_reader()?;
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let (mut stopwatch, mut ticks) =
        Stopwatch::new(SystemClock, config.ticks.stopwatch_period(), event_tx);

    Display::show_help(TimerMode::Stopwatch);
    if start {
        log_rejection("start", stopwatch.start());
    }
    Display::show_sample(&stopwatch.sample());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                if let Some(sample) = stopwatch.handle_tick(tick) {
                    Display::show_sample(&sample);
                }
            }
            line = next_line(&input) => {
                let Some(line) = line else { break };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Toggle => { log_rejection("toggle", stopwatch.toggle()); }
                    Input::Start => { log_rejection("start", stopwatch.start()); }
                    Input::Pause => { log_rejection("pause", stopwatch.pause()); }
                    Input::Reset => stopwatch.reset(),
                    Input::Lap(label) => {
                        if let Ok(lap) = stopwatch.add_lap(label.as_deref()) {
                            Display::show_lap(&lap);
                        } else {
                            debug!("lap rejected at zero elapsed time");
                        }
                    }
                    Input::Laps => Display::show_laps(stopwatch.laps().iter()),
                    Input::Help => Display::show_help(TimerMode::Stopwatch),
                    Input::Unknown(text) => {
                        Display::show_error(&format!("unknown command `{}` (h for help)", text));
                    }
                    other => unsupported(&other, TimerMode::Stopwatch),
                }
                Display::show_sample(&stopwatch.sample());
            }
            result = &mut ctrl_c => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
        }
        drain_events(&mut events);
    }

    println!();
    Ok(())
}

/// Runs the countdown until the user quits.
pub async fn run_countdown(config: &AppConfig, start: bool) -> Result<()> {
    let input = spawn_input_reader()?;
    let notifier = build_notifier(config, Arc::clone(&input));
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let (mut countdown, mut ticks) = Countdown::new(
        SystemClock,
        config.countdown,
        config.ticks.countdown_period(),
        notifier,
        event_tx,
    );

    Display::show_help(TimerMode::Countdown);
    if start {
        log_rejection("start", countdown.start());
    }
    Display::show_sample(&countdown.sample());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                match unless_interrupted(countdown.handle_tick(tick), ctrl_c.as_mut()).await? {
                    Some(Some(sample)) => Display::show_sample(&sample),
                    Some(None) => {}
                    None => break,
                }
            }
            line = next_line(&input) => {
                let Some(line) = line else { break };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Toggle => { log_rejection("toggle", countdown.toggle()); }
                    Input::Start => { log_rejection("start", countdown.start()); }
                    Input::Pause => { log_rejection("pause", countdown.pause()); }
                    Input::Reset => countdown.reset(),
                    Input::SetDuration(duration) => {
                        log_rejection("set", countdown.set_duration(duration));
                    }
                    Input::Help => Display::show_help(TimerMode::Countdown),
                    Input::Unknown(text) => {
                        Display::show_error(&format!("unknown command `{}` (h for help)", text));
                    }
                    other => unsupported(&other, TimerMode::Countdown),
                }
                if unless_interrupted(countdown.poll(), ctrl_c.as_mut()).await?.is_none() {
                    break;
                }
                Display::show_sample(&countdown.sample());
            }
            result = &mut ctrl_c => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
        }
        drain_events(&mut events);
    }

    println!();
    Ok(())
}

/// Runs the Pomodoro cycle until the user quits.
pub async fn run_pomodoro(config: &AppConfig, start: bool) -> Result<()> {
    let input = spawn_input_reader()?;
    let notifier = build_notifier(config, Arc::clone(&input));
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let (mut cycle, mut ticks) = PomodoroCycle::new(
        SystemClock,
        config.pomodoro,
        config.ticks.pomodoro_period(),
        notifier,
        event_tx,
    );

    Display::show_help(TimerMode::Focus);
    if start {
        log_rejection("start", cycle.start());
    }
    Display::show_sample(&cycle.sample());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                match unless_interrupted(cycle.handle_tick(tick), ctrl_c.as_mut()).await? {
                    Some(Some(sample)) => Display::show_sample(&sample),
                    Some(None) => {}
                    None => break,
                }
            }
            line = next_line(&input) => {
                let Some(line) = line else { break };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Toggle => { log_rejection("toggle", cycle.toggle()); }
                    Input::Start => { log_rejection("start", cycle.start()); }
                    Input::Pause => { log_rejection("pause", cycle.pause()); }
                    Input::Reset => cycle.reset(),
                    Input::SwitchPhase(phase) => cycle.switch_mode(phase),
                    Input::StepFocus(steps) => { log_rejection("focus", cycle.step_focus(steps)); }
                    Input::StepBreak(steps) => { log_rejection("break", cycle.step_break(steps)); }
                    Input::SetFocus(minutes) => {
                        log_rejection("focus", cycle.set_focus_duration(minutes));
                    }
                    Input::SetBreak(minutes) => {
                        log_rejection("break", cycle.set_break_duration(minutes));
                    }
                    Input::Help => Display::show_help(TimerMode::Focus),
                    Input::Unknown(text) => {
                        Display::show_error(&format!("unknown command `{}` (h for help)", text));
                    }
                    other => unsupported(&other, TimerMode::Focus),
                }
                if unless_interrupted(cycle.poll(), ctrl_c.as_mut()).await?.is_none() {
                    break;
                }
                Display::show_sample(&cycle.sample());
            }
            result = &mut ctrl_c => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
        }
        drain_events(&mut events);
    }

    println!();
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_input_tests {
        use super::*;

        #[test]
        fn test_empty_line_toggles() {
            assert_eq!(parse_input(""), Input::Toggle);
            assert_eq!(parse_input("  p "), Input::Toggle);
        }

        #[test]
        fn test_lap_with_label() {
            assert_eq!(
                parse_input("l  first split "),
                Input::Lap(Some("first split".to_string()))
            );
            assert_eq!(parse_input("lap"), Input::Lap(None));
        }

        #[test]
        fn test_set_duration_forms() {
            assert_eq!(
                parse_input("set 1:02:03"),
                Input::SetDuration(CountdownConfig::new(1, 2, 3))
            );
            assert_eq!(
                parse_input("set 5 0"),
                Input::SetDuration(CountdownConfig::new(0, 5, 0))
            );
            assert_eq!(
                parse_input("set 90"),
                Input::SetDuration(CountdownConfig::new(0, 0, 59))
            );
            assert_eq!(
                parse_input("set soon"),
                Input::Unknown("set soon".to_string())
            );
        }

        #[test]
        fn test_pomodoro_commands() {
            assert_eq!(parse_input("b"), Input::SwitchPhase(PomodoroPhase::Break));
            assert_eq!(parse_input("f+"), Input::StepFocus(1));
            assert_eq!(parse_input("b-"), Input::StepBreak(-1));
            assert_eq!(parse_input("focus 45"), Input::SetFocus(45));
            assert_eq!(parse_input("break x"), Input::Unknown("break x".to_string()));
        }

        #[test]
        fn test_quit_and_help() {
            assert_eq!(parse_input("Q"), Input::Quit);
            assert_eq!(parse_input("?"), Input::Help);
            assert_eq!(parse_input("xyz"), Input::Unknown("xyz".to_string()));
        }
    }

    mod interrupt_tests {
        use std::rc::Rc;

        use super::*;
        use crate::notifier::{CompletionNotifier, ScriptedPrompt};
        use crate::sound::{default_alarm, MockSoundPlayer};
        use crate::types::Decision;

        #[tokio::test]
        async fn test_work_finishes_without_interrupt() {
            let interrupt = std::future::pending();
            tokio::pin!(interrupt);

            let output = unless_interrupted(async { 7 }, interrupt.as_mut())
                .await
                .unwrap();

            assert_eq!(output, Some(7));
        }

        #[tokio::test]
        async fn test_interrupt_releases_open_alarm() {
            let player = Rc::new(MockSoundPlayer::new());
            let mut notifier = AlarmNotifier::new(
                Some(Rc::clone(&player)),
                ScriptedPrompt::pending(),
                default_alarm(),
            );
            let interrupt = std::future::ready(Ok(()));
            tokio::pin!(interrupt);

            let output = unless_interrupted(notifier.notify(TimerMode::Focus), interrupt.as_mut())
                .await
                .unwrap();

            assert_eq!(output, None::<Decision>);
            assert_eq!(player.play_count(), 1);
            assert_eq!(player.active_count(), 0);
            assert!(!notifier.is_playing());
        }

        #[tokio::test]
        async fn test_interrupt_error_is_reported() {
            let interrupt = std::future::ready(Err(io::Error::other("no signal handler")));
            tokio::pin!(interrupt);

            let result = unless_interrupted(std::future::pending::<()>(), interrupt.as_mut()).await;

            assert!(result.is_err());
        }
    }
}
