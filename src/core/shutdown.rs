// src/core/shutdown.rs
use futures::future::{self, BoxFuture, FutureExt};
use std::future::Future;
use std::task::Poll;

/// Polls `signal` once so whatever it registers on first poll is in place
/// before the caller goes on, then hands back the rest of it.
///
/// `tokio::signal::ctrl_c()` only installs its handler when first polled;
/// until then SIGINT still kills the process outright.
pub async fn arm<F>(signal: F) -> BoxFuture<'static, F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let mut signal = signal.boxed();
    match futures::poll!(&mut signal) {
        Poll::Ready(output) => future::ready(output).boxed(),
        Poll::Pending => signal,
    }
}

/// Ctrl+C with the handler already installed.
pub async fn ctrl_c() -> BoxFuture<'static, std::io::Result<()>> {
    arm(tokio::signal::ctrl_c()).await
}
