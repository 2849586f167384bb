//! Script command implementation
//!
//! A script is a line-based list of reader commands replayed against one
//! session. The first command must be `work <kind> <id>`; blank lines and
//! lines starting with `#` are ignored.
//!
//! ```text
//! work manga m1
//! open 3
//! progress 42
//! set quality=low zoom=150
//! font +
//! next
//! status
//! ```

use super::display::print_snapshot;
use super::{open_session, parse_kind};
use anyhow::{bail, Context, Result};
use folio_core::{
    Catalog, Direction, FolioError, ReaderSession, SessionConfig, SettingsPatch, SleepDuration,
    WorkRef,
};
use std::fs;
use std::time::Duration;

/// One reader command
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Open(u32),
    Navigate(Direction),
    Retry,
    Progress(f64),
    Scrub(f64),
    Set(SettingsPatch),
    FontSize(Direction),
    AutoScroll(i64),
    ToggleAutoScroll,
    Sleep(Option<SleepDuration>),
    Play,
    Pause,
    Track(Direction),
    Volume(i64),
    Wait(Duration),
    Status,
}

/// A parsed script: the work to open and its steps with their line numbers
#[derive(Debug)]
struct Script {
    work: WorkRef,
    steps: Vec<(usize, Step)>,
}

/// Replay a script file and print the resulting session state
pub async fn script(input: &str, json: bool, config: SessionConfig) -> Result<()> {
    let text =
        fs::read_to_string(input).with_context(|| format!("Failed to read script: {}", input))?;
    let script = parse_script(&text).with_context(|| format!("Invalid script: {}", input))?;

    let catalog = Catalog::builtin();
    let session = open_session(&catalog, script.work.clone(), config)?;
    tracing::info!(
        work = %script.work.work_id,
        steps = script.steps.len(),
        "running script"
    );

    let mut failures = 0;
    for (line, step) in &script.steps {
        tracing::debug!(line, ?step, "step");
        match run_step(&session, step, json).await {
            Ok(()) => {}
            Err(FolioError::Fetch(error)) => {
                failures += 1;
                tracing::warn!(line, %error, "chapter failed to load");
                if !json {
                    println!("line {}: {}", line, error);
                }
            }
            Err(e) => return Err(e).with_context(|| format!("line {}", line)),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    } else {
        print_snapshot(&session.snapshot());
        if failures > 0 {
            println!("{} failed load(s)", failures);
        }
    }

    session.close();
    Ok(())
}

async fn run_step(session: &ReaderSession, step: &Step, json: bool) -> folio_core::Result<()> {
    match step {
        Step::Open(n) => {
            session.open_chapter(*n).await?;
        }
        Step::Navigate(direction) => {
            session.advance_chapter(*direction).await?;
        }
        Step::Retry => {
            session.retry().await?;
        }
        Step::Progress(p) => {
            session.update_progress(*p);
        }
        Step::Scrub(p) => {
            session.scrub_to(*p);
        }
        Step::Set(patch) => {
            session.update_settings(patch);
        }
        Step::FontSize(direction) => {
            session.step_font_size(*direction);
        }
        Step::AutoScroll(speed) => session.set_auto_scroll(*speed),
        Step::ToggleAutoScroll => session.toggle_auto_scroll(),
        Step::Sleep(duration) => session.set_sleep_timer(*duration),
        Step::Play => session.play(),
        Step::Pause => session.pause(),
        Step::Track(Direction::Next) => session.next_track(),
        Step::Track(Direction::Previous) => session.previous_track(),
        Step::Volume(v) => session.set_volume(*v),
        Step::Wait(duration) => tokio::time::sleep(*duration).await,
        Step::Status => {
            if !json {
                print_snapshot(&session.snapshot());
                println!();
            }
        }
    }
    Ok(())
}

fn parse_script(text: &str) -> Result<Script> {
    let mut work = None;
    let mut steps = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        let mut words = raw.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        if command == "work" {
            if work.is_some() {
                bail!("line {}: work is already set", line);
            }
            let [kind, id] = args.as_slice() else {
                bail!("line {}: expected 'work <kind> <id>'", line);
            };
            work = Some(WorkRef::new(*id, parse_kind(kind)?));
            continue;
        }
        if work.is_none() {
            bail!("line {}: script must start with 'work <kind> <id>'", line);
        }

        let step = parse_step(&command, &args).with_context(|| format!("line {}", line))?;
        steps.push((line, step));
    }

    match work {
        Some(work) => Ok(Script { work, steps }),
        None => bail!("script has no 'work <kind> <id>' line"),
    }
}

fn single<'a>(command: &str, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => bail!("'{}' takes exactly one argument", command),
    }
}

fn no_args(command: &str, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        bail!("'{}' takes no arguments", command)
    }
}

fn parse_step(command: &str, args: &[&str]) -> Result<Step> {
    let one = || single(command, args);
    let none = || no_args(command, args);

    let step = match command {
        "open" => Step::Open(parse_number(one()?)?),
        "next" => none().map(|_| Step::Navigate(Direction::Next))?,
        "prev" | "previous" => none().map(|_| Step::Navigate(Direction::Previous))?,
        "retry" => none().map(|_| Step::Retry)?,
        "progress" => Step::Progress(parse_number(one()?)?),
        "scrub" => Step::Scrub(parse_number(one()?)?),
        "set" => {
            if args.is_empty() {
                bail!("'set' needs at least one key=value");
            }
            let mut patch = SettingsPatch::new();
            for pair in args {
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("'{}' is not key=value", pair))?;
                patch.set_field(key, value).map_err(anyhow::Error::msg)?;
            }
            Step::Set(patch)
        }
        "font" => match one()? {
            "+" => Step::FontSize(Direction::Next),
            "-" => Step::FontSize(Direction::Previous),
            other => bail!("font takes '+' or '-', got '{}'", other),
        },
        "autoscroll" => match one()? {
            "toggle" => Step::ToggleAutoScroll,
            "off" => Step::AutoScroll(0),
            speed => Step::AutoScroll(parse_number(speed)?),
        },
        "sleep" => match one()? {
            "off" => Step::Sleep(None),
            minutes => Step::Sleep(Some(minutes.parse().map_err(anyhow::Error::msg)?)),
        },
        "play" => none().map(|_| Step::Play)?,
        "pause" => none().map(|_| Step::Pause)?,
        "track" => match one()? {
            "next" => Step::Track(Direction::Next),
            "prev" | "previous" => Step::Track(Direction::Previous),
            other => bail!("unknown track direction '{}'", other),
        },
        "volume" => Step::Volume(parse_number(one()?)?),
        "wait" => Step::Wait(parse_duration(one()?)?),
        "status" => none().map(|_| Step::Status)?,
        other => bail!("unknown command '{}'", other),
    };
    Ok(step)
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("'{}' is not a valid number", s))
}

/// `250ms`, `2s`, `1m`, or a bare number of milliseconds
fn parse_duration(s: &str) -> Result<Duration> {
    let (digits, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(split) => s.split_at(split),
        None => (s, "ms"),
    };
    let value: u64 = parse_number(digits)?;
    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .with_context(|| format!("duration '{}' is too large", s)),
        other => bail!("unknown duration unit '{}' (ms, s, m)", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::types::Quality;
    use folio_core::WorkKind;

    #[test]
    fn test_parse_script() {
        let script = parse_script(
            "# a comment\n\
             work manga m1\n\
             \n\
             open 3\n\
             set quality=low zoom=150\n\
             prev\n\
             sleep 15\n\
             wait 250ms\n",
        )
        .unwrap();

        assert_eq!(script.work, WorkRef::new("m1", WorkKind::Manga));
        assert_eq!(
            script.steps,
            vec![
                (4, Step::Open(3)),
                (
                    5,
                    Step::Set(SettingsPatch::new().with_quality(Quality::Low).with_zoom(150))
                ),
                (6, Step::Navigate(Direction::Previous)),
                (7, Step::Sleep(Some(SleepDuration::Fifteen))),
                (8, Step::Wait(Duration::from_millis(250))),
            ]
        );
    }

    #[test]
    fn test_work_line_required_first() {
        let err = parse_script("open 1\nwork novel n1\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
        assert!(parse_script("# nothing\n").is_err());
    }

    #[test]
    fn test_parse_step_errors() {
        assert!(parse_step("open", &[]).is_err());
        assert!(parse_step("next", &["2"]).is_err());
        assert!(parse_step("sleep", &["20"]).is_err());
        assert!(parse_step("set", &["zoom"]).is_err());
        assert!(parse_step("set", &["colour=red"]).is_err());
        assert!(parse_step("dance", &[]).is_err());
        assert!(parse_step("font", &["bigger"]).is_err());
        assert_eq!(
            parse_step("font", &["-"]).unwrap(),
            Step::FontSize(Direction::Previous)
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert!(parse_duration("999999999999999999m").is_err());
        assert!(parse_duration("5h").is_err());
        assert!(parse_duration("fast").is_err());
    }
}
