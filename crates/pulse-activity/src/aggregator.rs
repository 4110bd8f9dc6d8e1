//! Activity aggregation engine.
//!
//! Classifies each document timestamp as a publication or update event and
//! attributes it to its calendar day in the ledger.
//!
//! - A document contributes at most one publication and one update record.
//! - Publish and update timestamps are checked against the window
//!   independently: an old post revised inside the window still counts.
//! - An update identical to the publish instant is not an update.
//! - An unparseable timestamp skips only that event; the rest of the
//!   document and the batch are unaffected.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace, warn};

use pulse_types::{ActivityKind, ActivityRecord, Document, PulseError, TimestampField};

use crate::calendar::Ledger;
use crate::config::AggregationWindow;

/// An event left out because its timestamp could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEvent {
    pub document_id: String,
    pub field: TimestampField,
    pub value: String,
}

/// What an aggregation run did with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    /// Publication records written
    pub publications: usize,
    /// Update records written
    pub updates: usize,
    /// Events outside the window or the ledger's days
    pub out_of_range: usize,
    /// Events dropped for malformed timestamps
    pub skipped: Vec<SkippedEvent>,
}

impl AggregationReport {
    /// Total records written.
    pub fn recorded(&self) -> usize {
        self.publications + self.updates
    }
}

/// Result of a full aggregation: the populated ledger plus its report.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub ledger: Ledger,
    pub report: AggregationReport,
}

/// Incremental aggregator over a ledger.
///
/// Owns the ledger while documents are added; call [`finish`] to take it.
///
/// [`finish`]: ActivityAggregator::finish
pub struct ActivityAggregator {
    window: AggregationWindow,
    ledger: Ledger,
    report: AggregationReport,
}

impl ActivityAggregator {
    /// Create an aggregator with a freshly seeded ledger for `window`.
    pub fn new(window: AggregationWindow) -> Self {
        let ledger = Ledger::for_window(&window);
        Self::with_ledger(window, ledger)
    }

    /// Create an aggregator over a pre-built ledger.
    pub fn with_ledger(window: AggregationWindow, ledger: Ledger) -> Self {
        Self {
            window,
            ledger,
            report: AggregationReport::default(),
        }
    }

    /// Attribute one document's events to the ledger.
    pub fn add_document(&mut self, document: &Document) {
        attribute(&mut self.ledger, &self.window, &mut self.report, document);
    }

    /// Attribute every document in `documents`.
    pub fn add_documents<'a, I>(&mut self, documents: I)
    where
        I: IntoIterator<Item = &'a Document>,
    {
        for document in documents {
            self.add_document(document);
        }
    }

    /// Ledger as populated so far.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Report as accumulated so far.
    pub fn report(&self) -> &AggregationReport {
        &self.report
    }

    /// Finish and hand back the ledger and report.
    pub fn finish(self) -> Aggregation {
        debug!(
            publications = self.report.publications,
            updates = self.report.updates,
            out_of_range = self.report.out_of_range,
            skipped = self.report.skipped.len(),
            active_days = self.ledger.active_days().count(),
            "Aggregation complete"
        );
        Aggregation {
            ledger: self.ledger,
            report: self.report,
        }
    }
}

/// Populate a pre-built ledger in place.
///
/// Days are cut in the ledger's timezone, whatever `window.timezone` says.
/// Days missing from `ledger` are clipped and counted as out of range.
pub fn aggregate_into<'a, I>(ledger: &mut Ledger, documents: I, window: &AggregationWindow) -> AggregationReport
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut window = *window;
    if window.timezone != ledger.timezone() {
        warn!(
            window_timezone = window.timezone.name(),
            ledger_timezone = ledger.timezone().name(),
            "Window timezone differs from ledger; using the ledger's"
        );
        window.timezone = ledger.timezone();
    }

    let mut report = AggregationReport::default();
    for document in documents {
        attribute(ledger, &window, &mut report, document);
    }
    report
}

/// Build a fresh ledger for `window` and aggregate `documents` into it.
pub fn aggregate_activity<'a, I>(documents: I, window: &AggregationWindow) -> Aggregation
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut aggregator = ActivityAggregator::new(*window);
    aggregator.add_documents(documents);
    aggregator.finish()
}

fn attribute(
    ledger: &mut Ledger,
    window: &AggregationWindow,
    report: &mut AggregationReport,
    document: &Document,
) {
    trace!(document_id = %document.id, "Processing document");

    let published = match document.published_at() {
        Ok(ts) => Some(ts),
        Err(err) => {
            skip(report, err);
            None
        }
    };

    if let Some(published) = published {
        record_event(ledger, window, report, document, ActivityKind::Publication, published);
    }

    if !window.include_updates {
        return;
    }

    match document.updated_at() {
        None => {}
        Some(Err(err)) => skip(report, err),
        Some(Ok(updated)) if Some(updated) == published => {
            trace!(document_id = %document.id, "Update equals publish time, ignoring");
        }
        Some(Ok(updated)) => {
            record_event(ledger, window, report, document, ActivityKind::Update, updated)
        }
    }
}

fn record_event(
    ledger: &mut Ledger,
    window: &AggregationWindow,
    report: &mut AggregationReport,
    document: &Document,
    kind: ActivityKind,
    at: DateTime<Utc>,
) {
    if !window.contains(at) {
        trace!(document_id = %document.id, %kind, at = %at, "Event outside window");
        report.out_of_range += 1;
        return;
    }

    let day = window.day_of(at);
    let record = ActivityRecord::new(day, kind, &document.id, &document.title)
        .with_tags(document.tags.clone())
        .with_word_count(document.word_count);

    if !ledger.record(record) {
        debug!(document_id = %document.id, %kind, day = %day, "Day not in ledger, clipped");
        report.out_of_range += 1;
        return;
    }

    match kind {
        ActivityKind::Publication => report.publications += 1,
        ActivityKind::Update => report.updates += 1,
    }
}

fn skip(report: &mut AggregationReport, err: PulseError) {
    if let PulseError::MalformedTimestamp {
        document_id,
        field,
        value,
    } = err
    {
        warn!(
            document_id = %document_id,
            field = %field,
            value = %value,
            "Skipping event with malformed timestamp"
        );
        report.skipped.push(SkippedEvent {
            document_id,
            field,
            value,
        });
    }
}
