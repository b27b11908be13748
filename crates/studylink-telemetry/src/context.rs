//! Invocation-level span carrying the build identifier.

use tracing::Span;

use crate::init::build_sha;

/// Span wrapping one CLI invocation. Every event emitted inside it carries the
/// command, the per-invocation trace id, and the build recorded by
/// [`init_logging`](crate::init_logging).
#[must_use]
pub fn command_span(command: &str, trace_id: &str) -> Span {
    tracing::info_span!(
        "studylink",
        command = %command,
        trace_id = %trace_id,
        build_sha = %build_sha()
    )
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex, PoisonError};

    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn events_inside_command_span_carry_build_sha() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let span = command_span("login", "trace-1");
            let _entered = span.enter();
            tracing::info!("command completed");
        });

        let output = String::from_utf8_lossy(
            &capture.0.lock().unwrap_or_else(PoisonError::into_inner),
        )
        .into_owned();
        assert!(output.contains(&format!("\"build_sha\":\"{}\"", build_sha())));
        assert!(output.contains("\"trace_id\":\"trace-1\""));
        assert!(output.contains("\"command\":\"login\""));
    }
}
