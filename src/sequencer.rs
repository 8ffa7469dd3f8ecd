//! Paced replay of steps.
//!
//! The tree hands over its steps all at once; the [`Sequencer`] passes them to a
//! [`Renderer`] one by one, sleeping for the pacing interval after each, so the
//! observer sees the algorithm advance at a fixed rate. Step `n + 1` is never
//! rendered before step `n`'s delay has run out.

use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

use log::{trace, warn};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::step::{Shape, Step};

/// Something a renderer is asked to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum Frame<K> {
    /// One step of a running operation.
    Step(Step<K>),
    /// A full redraw outside of any operation, e.g. after an undo.
    Redraw { shape: Shape<K> },
}

impl<K> Frame<K> {
    pub fn shape(&self) -> &Shape<K> {
        match self {
            Frame::Step(step) => &step.shape,
            Frame::Redraw { shape } => shape,
        }
    }
}

/// Accepts a tree shape and draws it, however that is done.
pub trait Renderer<K> {
    fn render(&mut self, frame: Frame<K>);
}

impl<K, R: Renderer<K> + ?Sized> Renderer<K> for Box<R> {
    fn render(&mut self, frame: Frame<K>) {
        (**self).render(frame)
    }
}

/// Draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl<K> Renderer<K> for NullRenderer {
    fn render(&mut self, _frame: Frame<K>) {}
}

/// Forwards frames to another task.
#[derive(Debug)]
pub struct ChannelRenderer<K> {
    tx: UnboundedSender<Frame<K>>,
}

impl<K> ChannelRenderer<K> {
    pub fn new(tx: UnboundedSender<Frame<K>>) -> Self {
        Self { tx }
    }
}

impl<K> Renderer<K> for ChannelRenderer<K> {
    fn render(&mut self, frame: Frame<K>) {
        // the tree keeps going even if nobody is watching anymore
        if self.tx.send(frame).is_err() {
            warn!("renderer channel closed, dropping frame");
        }
    }
}

/// Writes one JSON object per frame, one per line.
#[derive(Debug)]
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<K: Serialize, W: Write> Renderer<K> for JsonRenderer<W> {
    fn render(&mut self, frame: Frame<K>) {
        let res = serde_json::to_writer(&mut self.out, &frame)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(e) = res {
            warn!("failed to write frame: {e}");
        }
    }
}

/// Prints a caption and the sideways tree for every frame.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<K: Display, W: Write> Renderer<K> for TextRenderer<W> {
    fn render(&mut self, frame: Frame<K>) {
        let caption = match &frame {
            Frame::Step(step) => format!("[{}] {}", step.index + 1, step.kind),
            Frame::Redraw { .. } => "restored".to_string(),
        };
        let res = write!(self.out, "{caption}\n{}\n", frame.shape().to_text())
            .and_then(|()| self.out.flush());
        if let Err(e) = res {
            warn!("failed to write frame: {e}");
        }
    }
}

/// Replays steps through a renderer at a fixed pace.
pub struct Sequencer<R> {
    renderer: R,
    pace: Duration,
}

impl<R> Sequencer<R> {
    pub fn new(renderer: R, pace: Duration) -> Self {
        Self { renderer, pace }
    }

    pub fn pace(&self) -> Duration {
        self.pace
    }

    pub fn set_pace(&mut self, pace: Duration) {
        self.pace = pace;
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Renders each step in order, waiting `pace` after every one of them.
    ///
    /// There is no cancellation: once started, every step is rendered.
    pub async fn play<K>(&mut self, steps: Vec<Step<K>>)
    where
        R: Renderer<K>,
    {
        for step in steps {
            trace!("rendering step {}", step.index);
            self.renderer.render(Frame::Step(step));
            if !self.pace.is_zero() {
                tokio::time::sleep(self.pace).await;
            }
        }
    }

    /// Draws `shape` immediately, without pacing.
    pub fn redraw<K>(&mut self, shape: Shape<K>)
    where
        R: Renderer<K>,
    {
        self.renderer.render(Frame::Redraw { shape });
    }
}
