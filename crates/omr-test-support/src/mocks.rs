//! In-memory implementations of the core ports.

use std::sync::{Mutex, PoisonError};

use omr_core::domain::{GradingResult, ImageInfo};
use omr_core::ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};

fn locked<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One item yielded by [`MockImageSource`].
#[derive(Clone)]
enum Item {
    Image(ImageInfo),
    Failure(String),
}

/// Image source over pre-built sheets, optionally interleaved with load
/// failures.
pub struct MockImageSource {
    items: Vec<Item>,
    iterations: Mutex<usize>,
}

impl MockImageSource {
    /// Creates a source yielding `images` in order.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            items: images.into_iter().map(Item::Image).collect(),
            iterations: Mutex::new(0),
        }
    }

    /// Creates a source with no images.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Appends an item that fails to load with `message`.
    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.items.push(Item::Failure(message.into()));
        self
    }

    /// Number of times `images()` was called.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *locked(&self.iterations)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<ImageInfo>> + Send + '_> {
        *locked(&self.iterations) += 1;
        Box::new(self.items.iter().map(|item| match item {
            Item::Image(image) => Ok(image.clone()),
            Item::Failure(message) => Err(anyhow::anyhow!("{message}")),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Result output that keeps everything written to it.
#[derive(Default)]
pub struct MockResultOutput {
    results: Mutex<Vec<GradingResult>>,
    flushes: Mutex<usize>,
}

impl MockResultOutput {
    /// Creates an empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Results written so far.
    #[must_use]
    pub fn results(&self) -> Vec<GradingResult> {
        locked(&self.results).clone()
    }

    /// Number of `flush()` calls.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *locked(&self.flushes)
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, result: &GradingResult) -> anyhow::Result<()> {
        locked(&self.results).push(result.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        *locked(&self.flushes) += 1;
        Ok(())
    }
}

/// Progress sink that records every event.
#[derive(Default)]
pub struct MockProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MockProgressSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        locked(&self.events).clone()
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        locked(&self.events).iter().filter(|e| pred(e)).count()
    }

    /// Number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Number of `Graded` events.
    #[must_use]
    pub fn graded_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Graded { .. }))
    }

    /// Number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Scores of the graded sheets, in order.
    #[must_use]
    pub fn scores(&self) -> Vec<u32> {
        locked(&self.events)
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Graded { result } => Some(result.score),
                _ => None,
            })
            .collect()
    }

    /// `(processed, skipped)` from the `Finished` event, if one arrived.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        locked(&self.events).iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        locked(&self.events).push(event);
    }
}
