use crate::storage::KeyValueStore;
use crate::transport::Transport;

pub struct MagicLinkClient<T, S> {
    pub(in crate::auth) transport: T,
    pub(in crate::auth) store: S,
}

impl<T: Transport, S: KeyValueStore> MagicLinkClient<T, S> {
    /// Creates a new client over the given backend transport and credential store
    pub fn new(transport: T, store: S) -> Self {
        MagicLinkClient { transport, store }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
