use tokio::time::Instant;
use tracing::trace;

/// Emits the elapsed time of one store call on drop, at `trace` level under
/// the `timing` target.
pub(crate) struct ScopedTimer<'a> {
    start: Instant,
    operation: &'static str,
    table: &'a str,
}

impl<'a> ScopedTimer<'a> {
    pub(crate) fn new(
        operation: &'static str,
        table: &'a str,
    ) -> Self {
        Self {
            start: Instant::now(),
            operation,
            table,
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        trace!(
            target: "timing",
            operation = self.operation,
            table = self.table,
            elapsed_ms = elapsed.as_millis() as u64,
            "[TIMING] {} on {} took {} ms",
            self.operation,
            self.table,
            elapsed.as_millis()
        );
    }
}
