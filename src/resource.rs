//! The external table resource: whatever fetches rows and caches them.

use crate::models::FetchParams;

/// External collaborator that loads table rows and owns their cache.
///
/// Both calls are fire-and-forget. Fetch failures and retries are the
/// resource's concern.
pub trait TableResource {
    /// Requests rows for the merged parameters.
    fn fetch(&mut self, params: &FetchParams);

    /// Clears any cached rows so the next fetch starts clean.
    fn reset(&mut self);
}

impl<R: TableResource + ?Sized> TableResource for &mut R {
    fn fetch(&mut self, params: &FetchParams) {
        (**self).fetch(params);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

impl<R: TableResource + ?Sized> TableResource for Box<R> {
    fn fetch(&mut self, params: &FetchParams) {
        (**self).fetch(params);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Adapts a pair of closures into a [`TableResource`].
pub struct FnResource<F, G> {
    fetch: F,
    reset: G,
}

impl<F, G> FnResource<F, G>
where
    F: FnMut(&FetchParams),
    G: FnMut(),
{
    pub fn new(fetch: F, reset: G) -> Self {
        Self { fetch, reset }
    }
}

impl<F, G> TableResource for FnResource<F, G>
where
    F: FnMut(&FetchParams),
    G: FnMut(),
{
    fn fetch(&mut self, params: &FetchParams) {
        (self.fetch)(params);
    }

    fn reset(&mut self) {
        (self.reset)();
    }
}
