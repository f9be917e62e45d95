//! Action callables.
//!
//! An action is the caller-supplied behavior attached to an endpoint or an
//! authenticator. It reads the request, mutates the response, and signals
//! failure by returning an [`ExecutionError`](crate::error::ExecutionError):
//! a declared error for deliberate rejections, or the runtime variant for
//! anything else.

use crate::error::ExecutionResult;
use crate::request::Request;
use crate::response::Response;
use std::sync::Arc;

/// A type-erased, shareable action.
///
/// Actions may block or drive their own async runtime internally; the
/// pipeline treats completion of the call as the gate to the next phase and
/// imposes no scheduling of its own.
pub type Action = Arc<dyn Fn(&Request, &mut Response) -> ExecutionResult<()> + Send + Sync>;

/// Wraps a closure as an [`Action`].
pub fn action<F>(f: F) -> Action
where
    F: Fn(&Request, &mut Response) -> ExecutionResult<()> + Send + Sync + 'static,
{
    Arc::new(f)
}
