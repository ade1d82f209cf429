//! Task-local dispatcher for code that cannot take a handle parameter.

use std::future::Future;

use crate::dispatch::Dispatcher;
use crate::error::{InterceptError, Result};
use crate::request::RequestDescriptor;
use crate::response::ResponseDescriptor;

tokio::task_local! {
    static CURRENT: Dispatcher;
}

/// Run `fut` with `dispatcher` installed for the current task.
pub async fn scope<F: Future>(dispatcher: Dispatcher, fut: F) -> F::Output {
    CURRENT.scope(dispatcher, fut).await
}

/// The dispatcher installed for the current task, if any.
pub fn current() -> Option<Dispatcher> {
    CURRENT.try_with(Dispatcher::clone).ok()
}

/// Route `request` through the current task's dispatcher.
pub async fn intercept(request: &RequestDescriptor) -> Result<ResponseDescriptor> {
    let dispatcher = current().ok_or(InterceptError::NoDispatcher)?;
    dispatcher.intercept(request).await
}
