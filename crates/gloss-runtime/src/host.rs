#![forbid(unsafe_code)]

//! Host-driven event loop.
//!
//! The embedding environment pushes canonical [`Event`]s and decides when a
//! paint happens. [`Host`] owns everything a component needs to react:
//!
//! - the [`Document`] being edited,
//! - the document-level pointer [`EventBus`],
//! - the next-paint [`FrameScheduler`],
//! - the [`Layout`] pass that runs before every frame.
//!
//! Nothing blocks and nothing runs on its own: `dispatch` delivers one event,
//! `commit` lays out and runs one frame.

use std::collections::VecDeque;

use gloss_core::event::Event;
use gloss_core::geometry::Viewport;
use gloss_render::{Document, Layout, TextWidthLayout};

use crate::bus::EventBus;
use crate::frame::FrameScheduler;

/// Host configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Initial viewport width.
    pub viewport_width: f64,
    /// Initial viewport height.
    pub viewport_height: f64,
    /// Width of one text column for the default layout.
    pub cell_width: f64,
    /// Text padding for the default layout.
    pub padding: f64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            viewport_height: 768.0,
            cell_width: 8.0,
            padding: 0.0,
        }
    }
}

impl HostConfig {
    #[must_use]
    pub fn viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    #[must_use]
    pub fn cell_width(mut self, width: f64) -> Self {
        self.cell_width = width;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// The text-width layout this config describes.
    #[must_use]
    pub fn text_layout(&self) -> TextWidthLayout {
        TextWidthLayout::default()
            .cell_width(self.cell_width)
            .padding(self.padding)
    }
}

/// Result of offering an event to a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The component handled the event; later targets do not see it.
    pub consumed: bool,
    /// The host should suppress the event's default action.
    pub default_prevented: bool,
}

impl EventOutcome {
    /// Not handled.
    pub const IGNORED: Self = Self {
        consumed: false,
        default_prevented: false,
    };

    /// Handled, default action allowed.
    pub const CONSUMED: Self = Self {
        consumed: true,
        default_prevented: false,
    };

    /// Handled, default action suppressed.
    pub const PREVENTED: Self = Self {
        consumed: true,
        default_prevented: true,
    };
}

/// A component that reacts to host events.
pub trait Interactive {
    fn handle(&mut self, host: &mut Host, event: &Event) -> EventOutcome;
}

/// Owner of the document, pointer bus, frame queue and layout.
pub struct Host {
    document: Document,
    bus: EventBus,
    frames: FrameScheduler,
    layout: Box<dyn Layout>,
    config: HostConfig,
    queue: VecDeque<Event>,
}

impl Host {
    /// Host with the text-width layout described by `config`.
    #[must_use]
    pub fn new(config: HostConfig) -> Self {
        let layout = config.text_layout();
        Self::with_layout(config, layout)
    }

    /// Host with a custom layout pass.
    #[must_use]
    pub fn with_layout(config: HostConfig, layout: impl Layout + 'static) -> Self {
        let viewport = Viewport::new(config.viewport_width, config.viewport_height);
        Self {
            document: Document::new(viewport),
            bus: EventBus::new(),
            frames: FrameScheduler::new(),
            layout: Box::new(layout),
            config,
            queue: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    #[must_use]
    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.document.viewport()
    }

    /// Queue an event for [`Host::pump`].
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Deliver one event.
    ///
    /// Resize updates the viewport. Pointer events without a target are
    /// hit-tested, then go to the bus. Every event is then offered to
    /// `targets` in order until one consumes it.
    pub fn dispatch(&mut self, event: &Event, targets: &mut [&mut dyn Interactive]) -> EventOutcome {
        let event = match event {
            Event::Resize { width, height } => {
                self.document.set_viewport(Viewport::new(*width, *height));
                tracing::debug!(width, height, "viewport resized");
                event.clone()
            }
            Event::Pointer(pointer) if pointer.target.is_none() => {
                let (x, y) = pointer.position();
                Event::Pointer(pointer.with_target(self.document.hit_test(x, y)))
            }
            _ => event.clone(),
        };

        if let Event::Pointer(pointer) = &event {
            self.bus.dispatch(&mut self.document, pointer);
        }

        let mut outcome = EventOutcome::IGNORED;
        for target in targets.iter_mut() {
            let handled = target.handle(self, &event);
            outcome.default_prevented |= handled.default_prevented;
            if handled.consumed {
                outcome.consumed = true;
                break;
            }
        }
        outcome
    }

    /// Lay out the document, then run one frame. Returns callbacks run.
    ///
    /// Frame callbacks may restyle elements, so the document is laid out
    /// again after any of them ran. Boxes always match the styles when
    /// this returns.
    pub fn commit(&mut self) -> usize {
        self.layout.layout(&mut self.document);
        let ran = self.frames.run(&mut self.document);
        if ran > 0 {
            self.layout.layout(&mut self.document);
        }
        ran
    }

    /// Dispatch and commit every queued event. Returns events processed.
    pub fn pump(&mut self, targets: &mut [&mut dyn Interactive]) -> usize {
        let mut processed = 0;
        while let Some(event) = self.queue.pop_front() {
            self.dispatch(&event, targets);
            self.commit();
            processed += 1;
        }
        processed
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl core::fmt::Debug for Host {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Host")
            .field("config", &self.config)
            .field("nodes", &self.document.len())
            .field("bus", &self.bus)
            .field("frames", &self.frames)
            .field("queued", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::PointerKinds;
    use gloss_core::event::{KeyCode, NodeId, PointerEvent, PointerKind};
    use gloss_render::Tag;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counter {
        target: NodeId,
        seen: usize,
        consume: bool,
    }

    impl Interactive for Counter {
        fn handle(&mut self, _host: &mut Host, event: &Event) -> EventOutcome {
            if event.target() != Some(self.target) {
                return EventOutcome::IGNORED;
            }
            self.seen += 1;
            if self.consume {
                EventOutcome::PREVENTED
            } else {
                EventOutcome::IGNORED
            }
        }
    }

    fn host_with_span() -> (Host, NodeId) {
        let mut host = Host::new(HostConfig::default().viewport(200.0, 100.0));
        let root = host.document().root();
        let span = host.document_mut().create_element(Tag::Span);
        host.document_mut().set_text(span, "abcd").unwrap();
        host.document_mut().append_child(root, span).unwrap();
        host.commit();
        (host, span)
    }

    #[test]
    fn consumed_events_stop_at_first_target() {
        let (mut host, span) = host_with_span();
        let mut first = Counter { target: span, seen: 0, consume: true };
        let mut second = Counter { target: span, seen: 0, consume: true };

        let outcome = host.dispatch(&Event::key(span, KeyCode::Enter), &mut [&mut first, &mut second]);

        assert_eq!(outcome, EventOutcome::PREVENTED);
        assert_eq!((first.seen, second.seen), (1, 0));
    }

    #[test]
    fn resize_updates_viewport_only() {
        let mut host = Host::default();
        let outcome = host.dispatch(&Event::Resize { width: 320.0, height: 480.0 }, &mut []);
        assert_eq!(outcome, EventOutcome::IGNORED);
        assert_eq!(host.viewport(), Viewport::new(320.0, 480.0));
        assert_eq!(host.commit(), 0);
    }

    #[test]
    fn untargeted_pointer_is_hit_tested_before_bus() {
        let (mut host, span) = host_with_span();
        let seen = Rc::new(Cell::new(None));
        let s = Rc::clone(&seen);
        let _sub = host
            .bus()
            .subscribe(PointerKinds::MOUSE_DOWN, move |_, ev| s.set(ev.target));

        host.dispatch(
            &Event::Pointer(PointerEvent::new(PointerKind::MouseDown, 4.0, 4.0)),
            &mut [],
        );
        assert_eq!(seen.get(), Some(span));

        host.dispatch(
            &Event::Pointer(PointerEvent::new(PointerKind::MouseDown, 150.0, 50.0)),
            &mut [],
        );
        assert_eq!(seen.get(), Some(host.document().root()));
    }

    #[test]
    fn commit_lays_out_before_frames() {
        let (mut host, span) = host_with_span();
        host.document_mut().set_text(span, "abcdefgh").unwrap();
        let width = Rc::new(Cell::new(0.0));
        let w = Rc::clone(&width);
        let _frame = host
            .frames()
            .request(move |doc| w.set(doc.rect(span).map_or(0.0, |r| r.width)));

        assert_eq!(host.commit(), 1);
        assert_eq!(width.get(), 64.0);
    }

    #[test]
    fn boxes_follow_styles_written_by_frames() {
        let (mut host, span) = host_with_span();
        let _frame = host.frames().request(move |doc| {
            let _ = doc.set_text(span, "abcdefgh");
        });

        assert_eq!(host.commit(), 1);
        assert_eq!(host.document().rect(span).map(|r| r.width), Some(64.0));
    }

    #[test]
    fn pump_drains_queue() {
        let (mut host, span) = host_with_span();
        let mut counter = Counter { target: span, seen: 0, consume: false };
        host.push_event(Event::click(span));
        host.push_event(Event::key(span, KeyCode::Char(' ')));
        assert_eq!(host.pending_events(), 2);

        assert_eq!(host.pump(&mut [&mut counter]), 2);
        assert_eq!(counter.seen, 2);
        assert_eq!(host.pending_events(), 0);
    }
}
