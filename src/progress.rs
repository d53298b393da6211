// Progress module: a `Read` decorator that tells an observer how many bytes
// went through it. The uploader wraps the request body in it; what the
// observer does with the numbers (a terminal bar, a counter in tests) is
// not the uploader's concern.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Read};

/// Receives transfer progress.
pub trait TransferObserver: Send + 'static {
    /// `bytes` more were handed to the transport.
    fn advance(&self, bytes: u64);
    /// The transfer is over, successfully or not.
    fn finish(&self) {}
}

impl TransferObserver for ProgressBar {
    fn advance(&self, bytes: u64) {
        self.inc(bytes);
    }

    fn finish(&self) {
        ProgressBar::finish(self);
    }
}

/// Pass-through reader reporting every successful read to `observer`.
pub struct ProgressReader<R, O> {
    inner: R,
    observer: O,
}

impl<R: Read, O: TransferObserver> ProgressReader<R, O> {
    pub fn new(inner: R, observer: O) -> Self {
        ProgressReader { inner, observer }
    }
}

impl<R: Read, O: TransferObserver> Read for ProgressReader<R, O> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.observer.advance(n as u64);
        }
        Ok(n)
    }
}

/// Bar showing bytes sent, percentage, throughput and ETA on stderr.
/// With `visible == false` the bar is hidden but still counts.
pub fn upload_bar(total: u64, visible: bool) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(
        Some(total),
        if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        },
    );
    if let Ok(style) = ProgressStyle::with_template(
        "{bytes}/{total_bytes} [{bar:40.cyan/blue}] {percent}% {binary_bytes_per_sec} eta {eta}",
    ) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Counter(Arc<AtomicU64>);

    impl TransferObserver for Counter {
        fn advance(&self, bytes: u64) {
            self.0.fetch_add(bytes, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_reader_forwards_and_counts() {
        let counter = Counter::default();
        let data = vec![1u8; 10_000];
        let mut reader = ProgressReader::new(&data[..], counter.clone());

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(counter.0.load(Ordering::SeqCst), 10_000);
    }

    #[test]
    fn test_hidden_bar_tracks_position() {
        let bar = upload_bar(100, false);
        let mut reader = ProgressReader::new(&[0u8; 64][..], bar.clone());
        io::copy(&mut reader, &mut io::sink()).unwrap();
        assert_eq!(bar.position(), 64);
        assert_eq!(bar.length(), Some(100));
    }
}
