pub mod call_store;
pub mod message_queue;
pub mod object_source;
pub mod voice;

/// Runs an SDK future to completion from synchronous handler code.
///
/// Requires the multi-threaded tokio runtime the Lambda binaries start.
pub(crate) fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
