use log::{debug, info};
use osmflow_core::{Handler, HandlerResult, ObjectKind, Point, Relation, Way};

/// Objects between two progress reports by default.
pub const DEFAULT_REPORT_INTERVAL: u64 = 100_000;

/// Delegating handler that logs how far a pass has got.
///
/// Every call is forwarded to the inner handler after counting, and a stop
/// requested by the inner handler is passed straight back to the reader.
///
/// # Examples
/// ```
/// use osmflow_input::{FileFormat, ProgressHandler, ReadOptions, SummaryHandler, read};
///
/// let document = r#"<osm><node id="1" lon="0" lat="0"/></osm>"#;
/// let mut progress = ProgressHandler::new(SummaryHandler::new());
/// read(document.as_bytes(), FileFormat::Xml, &mut progress, &ReadOptions::default())?;
/// assert_eq!(progress.count(osmflow_core::ObjectKind::Point), 1);
/// assert_eq!(progress.into_inner().summary().points, 1);
/// # Ok::<(), osmflow_input::ReadError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProgressHandler<H> {
    inner: H,
    interval: u64,
    counts: [u64; 3],
}

impl<H> ProgressHandler<H> {
    /// Wrap `inner`, reporting every [`DEFAULT_REPORT_INTERVAL`] objects.
    pub const fn new(inner: H) -> Self {
        Self::with_interval(inner, DEFAULT_REPORT_INTERVAL)
    }

    /// Wrap `inner`, reporting every `interval` objects. An interval of zero
    /// only reports section totals.
    pub const fn with_interval(inner: H, interval: u64) -> Self {
        Self {
            inner,
            interval,
            counts: [0; 3],
        }
    }

    /// Objects of `kind` seen so far.
    #[must_use]
    pub const fn count(&self, kind: ObjectKind) -> u64 {
        self.counts[slot(kind)]
    }

    /// Objects of every kind seen so far.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.counts[0] + self.counts[1] + self.counts[2]
    }

    /// The wrapped handler.
    pub const fn inner(&self) -> &H {
        &self.inner
    }

    /// Unwrap the inner handler.
    pub fn into_inner(self) -> H {
        self.inner
    }

    fn tick(&mut self, kind: ObjectKind) {
        self.counts[slot(kind)] += 1;
        let total = self.total();
        if self.interval > 0 && total % self.interval == 0 {
            info!("Read {total} objects, currently in {kind}s");
        }
    }

    fn section_done(&self, kind: ObjectKind) {
        info!("Finished {kind}s: {} read", self.count(kind));
    }
}

const fn slot(kind: ObjectKind) -> usize {
    match kind {
        ObjectKind::Point => 0,
        ObjectKind::Way => 1,
        ObjectKind::Relation => 2,
    }
}

impl<H: Handler> Handler for ProgressHandler<H> {
    fn before_points(&mut self) -> HandlerResult {
        debug!("Reading points");
        self.inner.before_points()
    }

    fn point(&mut self, point: &Point) -> HandlerResult {
        self.tick(ObjectKind::Point);
        self.inner.point(point)
    }

    fn after_points(&mut self) -> HandlerResult {
        self.section_done(ObjectKind::Point);
        self.inner.after_points()
    }

    fn before_ways(&mut self) -> HandlerResult {
        debug!("Reading ways");
        self.inner.before_ways()
    }

    fn way(&mut self, way: &Way) -> HandlerResult {
        self.tick(ObjectKind::Way);
        self.inner.way(way)
    }

    fn after_ways(&mut self) -> HandlerResult {
        self.section_done(ObjectKind::Way);
        self.inner.after_ways()
    }

    fn before_relations(&mut self) -> HandlerResult {
        debug!("Reading relations");
        self.inner.before_relations()
    }

    fn relation(&mut self, relation: &Relation) -> HandlerResult {
        self.tick(ObjectKind::Relation);
        self.inner.relation(relation)
    }

    fn after_relations(&mut self) -> HandlerResult {
        self.section_done(ObjectKind::Relation);
        self.inner.after_relations()
    }

    fn finished(&mut self) {
        info!("Pass finished after {} objects", self.total());
        self.inner.finished();
    }
}
