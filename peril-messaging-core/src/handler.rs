// peril-messaging-core/src/handler.rs
use async_trait::async_trait;

use crate::AckType;

/// Consumes one decoded message and decides its acknowledgement.
///
/// The dispatcher awaits `handle` to completion before settling the
/// delivery, so handlers on one subscription never overlap.
#[async_trait]
pub trait Handler<T: Send + 'static>: Send + Sync {
    async fn handle(&self, value: T) -> AckType;
}

/// Adapts a plain synchronous closure into a [`Handler`].
pub struct FnHandler<F>(F);

pub fn handler_fn<T, F>(f: F) -> FnHandler<F>
where
    F: Fn(T) -> AckType + Send + Sync,
{
    FnHandler(f)
}

#[async_trait]
impl<T, F> Handler<T> for FnHandler<F>
where
    T: Send + 'static,
    F: Fn(T) -> AckType + Send + Sync,
{
    async fn handle(&self, value: T) -> AckType {
        (self.0)(value)
    }
}

#[async_trait]
impl<T, H> Handler<T> for std::sync::Arc<H>
where
    T: Send + 'static,
    H: Handler<T> + ?Sized,
{
    async fn handle(&self, value: T) -> AckType {
        (**self).handle(value).await
    }
}
