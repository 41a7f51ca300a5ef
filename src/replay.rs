//! Session replay: drives a [`TableState`] from a scripted list of UI events.
//!
//! Scripts are JSON lines, one event per line:
//!
//! ```text
//! {"event":"load"}
//! {"event":"search","term":"taco"}
//! {"event":"wait","ms":600}
//! {"event":"next"}
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::error::{TableError, TableResult};
use crate::models::{FetchParams, SelectionId, SortDirective};
use crate::resource::TableResource;
use crate::table::TableState;

/// A single UI event in a session script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The caller's initial load.
    Load,
    Next,
    Previous,
    Page { page: i64 },
    Limit { limit: u32 },
    Total { total: u64 },
    Sort { sort: Vec<SortDirective> },
    Search { term: String },
    ResetFilters,
    Select {
        #[serde(default)]
        id: Option<SelectionId>,
    },
    /// Lets time pass, firing any timers that come due.
    Wait { ms: u64 },
}

/// Parses a session script. Blank lines and `#` comments are skipped.
pub fn read_events<B: BufRead>(reader: B) -> TableResult<Vec<SessionEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|source| TableError::InvalidEvent {
            line: index + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

pub fn parse_events(script: &str) -> TableResult<Vec<SessionEvent>> {
    read_events(script.as_bytes())
}

pub fn load_events(path: &Path) -> TableResult<Vec<SessionEvent>> {
    read_events(BufReader::new(File::open(path)?))
}

/// Time source for a replay.
#[derive(Debug, Clone, Copy)]
enum Clock {
    /// Time only moves on `wait` events.
    Virtual(Instant),
    /// The tokio clock.
    Realtime,
}

/// Applies session events to a table in order.
pub struct Session<R> {
    table: TableState<R>,
    clock: Clock,
}

impl<R: TableResource> Session<R> {
    pub fn new(table: TableState<R>, realtime: bool) -> Self {
        let clock = if realtime {
            Clock::Realtime
        } else {
            Clock::Virtual(Instant::now())
        };
        Self { table, clock }
    }

    pub fn table(&self) -> &TableState<R> {
        &self.table
    }

    fn now(&self) -> Instant {
        match self.clock {
            Clock::Virtual(now) => now,
            Clock::Realtime => Instant::now(),
        }
    }

    pub async fn apply(&mut self, event: SessionEvent) -> TableResult<()> {
        debug!(?event, "replaying event");
        let now = self.now();
        match event {
            SessionEvent::Load => self.table.load(),
            SessionEvent::Next => self.table.next_page()?,
            SessionEvent::Previous => self.table.previous_page()?,
            SessionEvent::Page { page } => self.table.set_page(page)?,
            SessionEvent::Limit { limit } => self.table.set_limit(limit)?,
            SessionEvent::Total { total } => self.table.set_total(total)?,
            SessionEvent::Sort { sort } => self.table.set_sort(sort)?,
            SessionEvent::Search { term } => self.table.set_search_term_at(term, now)?,
            SessionEvent::ResetFilters => self.table.reset_filters_at(now)?,
            SessionEvent::Select { id } => self.table.set_selection_id(id),
            SessionEvent::Wait { ms } => self.advance(Duration::from_millis(ms)).await,
        }
        Ok(())
    }

    async fn advance(&mut self, duration: Duration) {
        match &mut self.clock {
            Clock::Virtual(now) => {
                *now += duration;
                let now = *now;
                self.table.poll_timers(now);
            }
            Clock::Realtime => {
                time::sleep(duration).await;
                self.table.poll_timers(Instant::now());
            }
        }
    }

    /// Fires whatever timers are still pending.
    pub async fn finish(&mut self) {
        match self.clock {
            Clock::Virtual(now) => {
                if let Some(deadline) = self.table.next_deadline() {
                    let deadline = deadline.max(now);
                    self.clock = Clock::Virtual(deadline);
                    self.table.poll_timers(deadline);
                }
            }
            Clock::Realtime => self.table.wait_for_timers().await,
        }
    }

    /// Applies every event, then lets pending timers fire.
    pub async fn run<I>(&mut self, events: I) -> TableResult<()>
    where
        I: IntoIterator<Item = SessionEvent>,
    {
        for event in events {
            self.apply(event).await?;
        }
        self.finish().await;
        Ok(())
    }

    /// Ends the session and hands the resource back.
    pub fn into_resource(self) -> R {
        self.table.unmount()
    }
}

/// Writes every fetch as a JSON line, and every reset as `{"reset":true}`.
///
/// The first write error stops all further output and is reported by
/// [`JsonLinesResource::finish`]. Counters only include lines that were
/// written.
pub struct JsonLinesResource<W> {
    out: W,
    fetches: usize,
    resets: usize,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesResource<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            fetches: 0,
            resets: 0,
            error: None,
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Flushes the output and returns it, or the first write error.
    pub fn finish(mut self) -> TableResult<W> {
        if let Some(e) = self.error.take() {
            return Err(TableError::Io(e));
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_line(&mut self, line: &str) -> bool {
        if self.error.is_some() {
            return false;
        }
        match writeln!(self.out, "{}", line) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write replay output: {}", e);
                self.error = Some(e);
                false
            }
        }
    }
}

impl<W: Write> TableResource for JsonLinesResource<W> {
    fn fetch(&mut self, params: &FetchParams) {
        let line = match serde_json::to_string(params) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to encode fetch params: {}", e);
                return;
            }
        };
        if self.write_line(&line) {
            self.fetches += 1;
        }
    }

    fn reset(&mut self) {
        if self.write_line(r#"{"reset":true}"#) {
            self.resets += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let script = r#"
# open the table
{"event":"load"}

{"event":"select","id":"venue-2"}
{"event":"select"}
{"event":"sort","sort":[{"field":"name","direction":"desc"}]}
"#;
        let events = parse_events(script).unwrap();
        assert_eq!(
            events,
            vec![
                SessionEvent::Load,
                SessionEvent::Select {
                    id: Some(SelectionId::from("venue-2"))
                },
                SessionEvent::Select { id: None },
                SessionEvent::Sort {
                    sort: vec![SortDirective::desc("name")]
                },
            ]
        );
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = parse_events("{\"event\":\"next\"}\n{\"event\":\"jump\"}\n").unwrap_err();
        assert!(matches!(err, TableError::InvalidEvent { line: 2, .. }));
    }

    /// Accepts `budget` lines, then fails every write.
    struct FailingWriter {
        budget: usize,
        lines: Vec<u8>,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.lines.extend_from_slice(buf);
            if buf.ends_with(b"\n") {
                self.budget -= 1;
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_stops_output_and_is_reported() {
        let mut resource = JsonLinesResource::new(FailingWriter {
            budget: 1,
            lines: Vec::new(),
        });
        let params = FetchParams::new(25, Some(SelectionId::from("venue-1")));

        resource.fetch(&params);
        resource.reset();
        resource.fetch(&params);

        assert_eq!(resource.fetches(), 1);
        assert_eq!(resource.resets(), 0);
        let err = resource.finish().err().unwrap();
        assert!(matches!(err, TableError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_finish_returns_output() {
        let mut resource = JsonLinesResource::new(Vec::new());
        resource.reset();

        let out = resource.finish().unwrap();
        assert_eq!(out, b"{\"reset\":true}\n");
    }
}
