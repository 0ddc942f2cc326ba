//! Events command: the events recognized in one log, in discovery order.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use acplog_core::{EventPayload, EventType, Log, LogEvent};
use anyhow::Result;

use super::util::load_log;

fn describe(payload: &EventPayload) -> String {
    match payload {
        EventPayload::Duration(seconds) => format!("{seconds}s"),
        EventPayload::Measurement(value) => value.to_string(),
        EventPayload::Exposure(e) => format!("{}s {} bin {}", e.duration, e.filter, e.bin),
        EventPayload::Note(note) => note.clone(),
        EventPayload::Flag(true) => "continued unguided".to_string(),
        EventPayload::Flag(false) => "guiding resumed".to_string(),
        EventPayload::Empty => String::new(),
    }
}

pub fn format_events<'a>(log: &Log, events: impl IntoIterator<Item = &'a LogEvent>) -> String {
    let mut output = String::new();
    for event in events {
        let time = event
            .start
            .map_or_else(|| "--:--:--".to_string(), |t| t.format("%H:%M:%S").to_string());
        let target = event
            .target
            .and_then(|id| log.target(id))
            .map_or("-", |t| t.name());
        let outcome = if event.success { "" } else { " FAILED" };
        writeln!(
            output,
            "{:>5}  {time}  {:<28} {:<12} {}{outcome}",
            event.line + 1,
            event.kind,
            target,
            describe(&event.payload),
        )
        .unwrap();
    }
    output
}

pub fn run<W: Write>(writer: &mut W, file: &Path, kind: Option<EventType>, json: bool) -> Result<()> {
    let log = load_log(file)?;
    let events: Vec<&LogEvent> = log
        .events()
        .iter()
        .filter(|e| kind.is_none_or(|k| e.kind == k))
        .collect();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&events)?)?;
    } else {
        write!(writer, "{}", format_events(&log, events.iter().copied()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    const LOG: &str = "\
ACP Console log opened 01-Jan-2020 00:00:00
00:00:01 Starting target: M42
00:00:05 Start slew to M42
00:00:15 Slew complete
ACP Console log closed 01-Jan-2020 00:01:00
";

    #[test]
    fn test_lists_events_with_target() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a.log");
        std::fs::write(&path, LOG).unwrap();

        let mut output = Vec::new();
        run(&mut output, &path, Some(EventType::SlewTarget), false).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output.trim(), @"3  00:00:05  slew_target                  M42          10s");
    }

    #[test]
    fn test_json_lists_all_events() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a.log");
        std::fs::write(&path, LOG).unwrap();

        let mut output = Vec::new();
        run(&mut output, &path, None, true).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1]["kind"], "slew_target");
        assert_eq!(json[1]["payload"]["type"], "duration");
        assert_eq!(json[1]["payload"]["value"], 10.0);
    }

    #[test]
    fn test_rejects_files_that_are_not_logs() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a.log");
        std::fs::write(&path, "hello").unwrap();

        let err = run(&mut Vec::new(), &path, None, false).unwrap_err();
        assert!(err.to_string().contains("is not an ACP log"));
    }
}
