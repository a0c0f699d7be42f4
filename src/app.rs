//! Main application module for the helmet overlay.

use crate::{
    pipeline::{OverlayPipeline, PipelineStats},
    provider::LandmarkProvider,
    sink::GraphicsSink,
    Error, Result,
};
use log::{debug, info};
use std::collections::VecDeque;
use std::str::FromStr;
use std::time::Instant;

/// What a scripted control event does to the faceplate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Flip between open and closed
    Toggle,
    /// Open (`true`) or close (`false`)
    SetOpen(bool),
    /// Move toward a progress value
    SetProgress {
        value: f64,
        duration_ms: Option<f64>,
    },
}

/// A control action at a point on the frame clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlEvent {
    pub at_ms: f64,
    pub action: ControlAction,
}

impl ControlEvent {
    #[must_use]
    pub const fn toggle(at_ms: f64) -> Self {
        Self {
            at_ms,
            action: ControlAction::Toggle,
        }
    }

    #[must_use]
    pub const fn set_open(at_ms: f64, open: bool) -> Self {
        Self {
            at_ms,
            action: ControlAction::SetOpen(open),
        }
    }

    #[must_use]
    pub const fn set_progress(at_ms: f64, value: f64) -> Self {
        Self {
            at_ms,
            action: ControlAction::SetProgress {
                value,
                duration_ms: None,
            },
        }
    }
}

/// Parses scrub events written as `<ms>:<value>`
impl FromStr for ControlEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (at, value) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidInput(format!("Expected <ms>:<value>, got '{s}'")))?;
        let at_ms = at
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidInput(format!("Invalid event time '{at}'")))?;
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidInput(format!("Invalid progress value '{value}'")))?;
        if !at_ms.is_finite() || !value.is_finite() {
            return Err(Error::InvalidInput(format!("Non-finite scrub event '{s}'")));
        }
        Ok(Self::set_progress(at_ms, value))
    }
}

/// Result of a complete run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub stats: PipelineStats,
    /// Control events applied during the run
    pub events_applied: usize,
    /// Control events scheduled after the last frame
    pub events_skipped: usize,
    /// Timestamp of the last frame
    pub last_timestamp_ms: Option<f64>,
}

/// Runs recorded landmarks through the overlay into a sink
pub struct OverlayApp {
    pipeline: OverlayPipeline,
    provider: Box<dyn LandmarkProvider>,
    sink: Box<dyn GraphicsSink>,
    events: VecDeque<ControlEvent>,
}

impl OverlayApp {
    /// Create the application; events are sorted by time
    #[must_use]
    pub fn new(
        pipeline: OverlayPipeline,
        provider: Box<dyn LandmarkProvider>,
        sink: Box<dyn GraphicsSink>,
        mut events: Vec<ControlEvent>,
    ) -> Self {
        info!("Initializing helmet overlay with {} control events", events.len());
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        Self {
            pipeline,
            provider,
            sink,
            events: events.into(),
        }
    }

    #[must_use]
    pub const fn pipeline(&self) -> &OverlayPipeline {
        &self.pipeline
    }

    fn apply_due_events(&mut self, timestamp_ms: f64) -> usize {
        let mut applied = 0;
        while self.events.front().is_some_and(|event| event.at_ms <= timestamp_ms) {
            let Some(event) = self.events.pop_front() else {
                break;
            };
            debug!("Applying {:?} at {:.1}ms", event.action, event.at_ms);
            match event.action {
                ControlAction::Toggle => {
                    self.pipeline.toggle(event.at_ms);
                }
                ControlAction::SetOpen(open) => self.pipeline.set_open(open, event.at_ms),
                ControlAction::SetProgress { value, duration_ms } => {
                    self.pipeline.set_progress(value, duration_ms, event.at_ms);
                }
            }
            applied += 1;
        }
        applied
    }

    /// Process every frame of the provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider or the sink fails
    pub fn run(&mut self) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary::default();
        let mut frame_index = 0;

        while let Some(frame) = self.provider.next_frame()? {
            summary.events_applied += self.apply_due_events(frame.timestamp_ms);

            let shapes = self.pipeline.process_frame(&frame);
            self.sink
                .draw(frame_index, frame.width, frame.height, shapes.as_ref())?;

            summary.last_timestamp_ms = Some(frame.timestamp_ms);
            frame_index += 1;
        }
        self.sink.finish()?;

        summary.events_skipped = self.events.len();
        summary.stats = self.pipeline.stats();

        info!(
            "Processed {} frames ({} with a face, {} drawn) in {:.2?}",
            summary.stats.frames,
            summary.stats.faces,
            summary.stats.drawn,
            started.elapsed()
        );
        if summary.events_skipped > 0 {
            info!("{} control events fell after the last frame", summary.events_skipped);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scrub_event() {
        let event: ControlEvent = "250:0.4".parse().unwrap();
        assert_eq!(event, ControlEvent::set_progress(250.0, 0.4));

        assert!("250".parse::<ControlEvent>().is_err());
        assert!("abc:0.4".parse::<ControlEvent>().is_err());
        assert!("250:x".parse::<ControlEvent>().is_err());
        assert!("inf:0.5".parse::<ControlEvent>().is_err());
    }
}
