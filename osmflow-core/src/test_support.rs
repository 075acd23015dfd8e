//! Recording handlers used by unit and behaviour tests.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{Handler, HandlerResult, Point, Relation, StopRequested, Way};

/// One observed handler callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `before_points` was called.
    BeforePoints,
    /// `point` was called with this identifier.
    Point(i64),
    /// `after_points` was called.
    AfterPoints,
    /// `before_ways` was called.
    BeforeWays,
    /// `way` was called with this identifier.
    Way(i64),
    /// `after_ways` was called.
    AfterWays,
    /// `before_relations` was called.
    BeforeRelations,
    /// `relation` was called with this identifier.
    Relation(i64),
    /// `after_relations` was called.
    AfterRelations,
    /// `finished` was called.
    Finished,
}

/// Shared, thread-safe log of events.
///
/// Cloning yields another view of the same log, so a test can keep one
/// clone while the handler travels to a worker thread.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Copy of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of times `finished` was recorded.
    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == Event::Finished)
            .count()
    }
}

/// Handler that records every callback and keeps copies of the objects.
///
/// It can be told to request a stop after a number of objects.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    log: EventLog,
    /// Points received, in order.
    pub points: Vec<Point>,
    /// Ways received, in order.
    pub ways: Vec<Way>,
    /// Relations received, in order.
    pub relations: Vec<Relation>,
    stop_after: Option<usize>,
    delivered: usize,
}

impl RecordingHandler {
    /// Create a handler writing to a fresh log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler writing to `log`.
    #[must_use]
    pub fn with_log(log: EventLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Request a stop once `count` objects have been delivered.
    #[must_use]
    pub fn stop_after(mut self, count: usize) -> Self {
        self.stop_after = Some(count);
        self
    }

    /// The log this handler writes to.
    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Copy of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.log.events()
    }

    fn record(&mut self, event: Event) -> HandlerResult {
        self.log.push(event);
        Ok(())
    }

    fn object(&mut self, event: Event) -> HandlerResult {
        self.log.push(event);
        self.delivered += 1;
        match self.stop_after {
            Some(limit) if self.delivered >= limit => Err(StopRequested),
            _ => Ok(()),
        }
    }
}

impl Handler for RecordingHandler {
    fn before_points(&mut self) -> HandlerResult {
        self.record(Event::BeforePoints)
    }

    fn point(&mut self, point: &Point) -> HandlerResult {
        self.points.push(point.clone());
        self.object(Event::Point(point.meta.id))
    }

    fn after_points(&mut self) -> HandlerResult {
        self.record(Event::AfterPoints)
    }

    fn before_ways(&mut self) -> HandlerResult {
        self.record(Event::BeforeWays)
    }

    fn way(&mut self, way: &Way) -> HandlerResult {
        self.ways.push(way.clone());
        self.object(Event::Way(way.meta.id))
    }

    fn after_ways(&mut self) -> HandlerResult {
        self.record(Event::AfterWays)
    }

    fn before_relations(&mut self) -> HandlerResult {
        self.record(Event::BeforeRelations)
    }

    fn relation(&mut self, relation: &Relation) -> HandlerResult {
        self.relations.push(relation.clone());
        self.object(Event::Relation(relation.meta.id))
    }

    fn after_relations(&mut self) -> HandlerResult {
        self.record(Event::AfterRelations)
    }

    fn finished(&mut self) {
        self.log.push(Event::Finished);
    }
}

/// The events of a complete pass with no objects.
#[must_use]
pub fn empty_pass() -> Vec<Event> {
    vec![
        Event::BeforePoints,
        Event::AfterPoints,
        Event::BeforeWays,
        Event::AfterWays,
        Event::BeforeRelations,
        Event::AfterRelations,
        Event::Finished,
    ]
}
