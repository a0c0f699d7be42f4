//! End-to-end tests: provider → pipeline → sink

mod test_helpers;

use helmet_overlay::{
    animation::FaceplatePhase,
    app::{ControlAction, ControlEvent, OverlayApp},
    config::Config,
    pipeline::OverlayPipeline,
    provider::{FrameQueue, JsonLinesProvider},
    sink::{GraphicsSink, RecordingSink},
    geometry::HelmetShapeSet,
    Result,
};
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use test_helpers::{empty_frame, face_frame, to_json_line, FaceLayout};

/// Sink sharing its frames with the test after the app takes ownership
#[derive(Default, Clone)]
struct SharedSink(Rc<RefCell<Vec<Option<HelmetShapeSet>>>>);

impl GraphicsSink for SharedSink {
    fn draw(&mut self, _frame_index: usize, _width: u32, _height: u32, shapes: Option<&HelmetShapeSet>) -> Result<()> {
        self.0.borrow_mut().push(shapes.cloned());
        Ok(())
    }
}

fn frames_every_33ms(count: usize) -> FrameQueue {
    FrameQueue::new(
        (0..count)
            .map(|i| face_frame(i as f64 * 33.0, 640, 480, FaceLayout::level()))
            .collect(),
    )
}

#[test]
fn test_run_applies_toggle_before_frame() {
    let sink = SharedSink::default();
    let pipeline = OverlayPipeline::new(&Config::default()).unwrap();
    let mut app = OverlayApp::new(
        pipeline,
        Box::new(frames_every_33ms(20)),
        Box::new(sink.clone()),
        vec![ControlEvent::toggle(66.0)],
    );

    let summary = app.run().unwrap();
    assert_eq!(summary.stats.frames, 20);
    assert_eq!(summary.events_applied, 1);
    assert_eq!(summary.events_skipped, 0);

    let frames = sink.0.borrow();
    let progress: Vec<f64> = frames.iter().map(|f| f.as_ref().unwrap().progress).collect();
    assert_eq!(progress[0], 0.0);
    assert_eq!(progress[2], 0.0); // toggled at exactly this frame's time
    assert!(progress[3] > 0.0);
    assert!(progress.windows(2).all(|w| w[1] >= w[0]));
    // 66 + 350 < 19 * 33
    assert_eq!(*progress.last().unwrap(), 1.0);
    assert_eq!(app.pipeline().phase(), FaceplatePhase::Open);
}

#[test]
fn test_events_sorted_and_late_events_skipped() {
    let sink = SharedSink::default();
    let pipeline = OverlayPipeline::new(&Config::default()).unwrap();
    let events = vec![
        ControlEvent::set_progress(10_000.0, 0.2),
        ControlEvent {
            at_ms: 0.0,
            action: ControlAction::SetOpen(true),
        },
    ];
    let mut app = OverlayApp::new(pipeline, Box::new(frames_every_33ms(5)), Box::new(sink), events);

    let summary = app.run().unwrap();
    assert_eq!(summary.events_applied, 1);
    assert_eq!(summary.events_skipped, 1);
    assert_eq!(summary.last_timestamp_ms, Some(132.0));
}

#[test]
fn test_face_dropout_clears_overlay() {
    let mut queue = FrameQueue::default();
    queue.push(face_frame(0.0, 640, 480, FaceLayout::level()));
    queue.push(empty_frame(33.0, 640, 480));
    queue.push(face_frame(66.0, 640, 480, FaceLayout::level().shifted(0.05, 0.0)));

    let sink = SharedSink::default();
    let pipeline = OverlayPipeline::new(&Config::default()).unwrap();
    let mut app = OverlayApp::new(pipeline, Box::new(queue), Box::new(sink.clone()), Vec::new());
    let summary = app.run().unwrap();

    let frames = sink.0.borrow();
    assert!(frames[0].is_some());
    assert!(frames[1].is_none());
    // Smoothing resumes from the held pose rather than snapping
    let before = frames[0].as_ref().unwrap().pose.center_x;
    let after = frames[2].as_ref().unwrap().pose.center_x;
    assert!((after - before - 0.25 * 32.0).abs() < 1e-6);
    assert_eq!(summary.stats.faces, 2);
}

#[test]
fn test_json_lines_recording_runs_end_to_end() {
    let lines: Vec<String> = (0..4)
        .map(|i| {
            let frame = if i == 1 {
                empty_frame(f64::from(i) * 40.0, 320, 240)
            } else {
                face_frame(f64::from(i) * 40.0, 320, 240, FaceLayout::level())
            };
            to_json_line(&frame).unwrap()
        })
        .collect();
    let provider = JsonLinesProvider::new(Cursor::new(lines.join("\n")));

    let pipeline = OverlayPipeline::new(&Config::default()).unwrap();
    let mut app = OverlayApp::new(pipeline, Box::new(provider), Box::new(RecordingSink::default()), Vec::new());
    let summary = app.run().unwrap();

    assert_eq!(summary.stats.frames, 4);
    assert_eq!(summary.stats.drawn, 3);
}

#[test]
fn test_frames_after_bad_line_still_drawn() {
    let good = |ts: f64| to_json_line(&face_frame(ts, 100, 100, FaceLayout::level())).unwrap();
    let input = format!(
        "{}\n{{\"timestamp_ms\": 33, \"width\": 100, \"height\": 100, \"landmarks\": [{{\"x\": 0.5}}]}}\n{}\n",
        good(0.0),
        good(66.0)
    );
    let provider = JsonLinesProvider::new(Cursor::new(input));

    let sink = SharedSink::default();
    let pipeline = OverlayPipeline::new(&Config::default()).unwrap();
    let mut app = OverlayApp::new(pipeline, Box::new(provider), Box::new(sink.clone()), Vec::new());
    let summary = app.run().unwrap();

    assert_eq!(summary.stats.frames, 3);
    assert_eq!(summary.stats.drawn, 2);
    assert_eq!(summary.last_timestamp_ms, Some(66.0));
    let frames = sink.0.borrow();
    assert!(frames[0].is_some());
    assert!(frames[1].is_none());
    assert!(frames[2].is_some());
}

#[test]
fn test_headerless_line_skipped_mid_run() {
    let good = |ts: f64| to_json_line(&face_frame(ts, 100, 100, FaceLayout::level())).unwrap();
    let input = format!("{}\n{{broken\n{}\n", good(0.0), good(33.0));
    let provider = JsonLinesProvider::new(Cursor::new(input));

    let sink = SharedSink::default();
    let pipeline = OverlayPipeline::new(&Config::default()).unwrap();
    let mut app = OverlayApp::new(pipeline, Box::new(provider), Box::new(sink.clone()), Vec::new());
    let summary = app.run().unwrap();

    assert_eq!(summary.stats.frames, 2);
    assert!(sink.0.borrow().iter().all(Option::is_some));
}

#[test]
fn test_open_and_close_events() {
    let sink = SharedSink::default();
    let pipeline = OverlayPipeline::new(&Config::default()).unwrap();
    let events = vec![ControlEvent::set_open(0.0, true), ControlEvent::set_open(396.0, false)];
    let mut app = OverlayApp::new(pipeline, Box::new(frames_every_33ms(30)), Box::new(sink.clone()), events);

    let summary = app.run().unwrap();
    assert_eq!(summary.events_applied, 2);

    let frames = sink.0.borrow();
    // Fully open by 363 ms, closing from 396 ms, closed again by 746 ms
    assert_eq!(frames[11].as_ref().unwrap().progress, 1.0);
    assert!(frames[14].as_ref().unwrap().progress < 1.0);
    assert_eq!(frames[29].as_ref().unwrap().progress, 0.0);
    assert_eq!(app.pipeline().phase(), FaceplatePhase::Closed);
}

#[test]
fn test_independent_pipelines() {
    let mut a = OverlayPipeline::new(&Config::default()).unwrap();
    let mut b = OverlayPipeline::new(&Config::default()).unwrap();
    a.toggle(0.0);

    let frame = face_frame(500.0, 640, 480, FaceLayout::level());
    assert_eq!(a.process_frame(&frame).unwrap().progress, 1.0);
    assert_eq!(b.process_frame(&frame).unwrap().progress, 0.0);
}
