//! Fixed-capacity registry of event resources.
//!
//! Each resource the endpoint publishes is mirrored on the shield, which
//! stores the actual CoAP resource. Locally the registry keeps the URI,
//! the attribute string, the frame-length bound for future updates, and
//! an optional PUT handler.
//!
//! Creation is two-phase: [`create_local`](ResourceRegistry::create_local)
//! reserves the next handle, and a failed remote confirmation rolls the
//! reservation back. Handles are assigned sequentially from 0 and never
//! reused — there is no delete for the life of a session.

use log::warn;

use crate::error::{Error, Result};
use crate::link::codec::MAX_FRAME_LEN;

/// Hard bound on resources — the limit of the shield itself. The live
/// capacity is board-dependent (4, 6, or 8) and set at construction.
pub const MAX_RESOURCES: usize = 8;

/// Bound on URI and attribute strings.
pub const MAX_URI_LEN: usize = 32;

/// Bound on a PUT handler's returned value. Generous: a trigger frame
/// must also fit the resource's own frame-length bound.
pub const MAX_EVENT_LEN: usize = 56;

/// Integer identifier assigned to a resource at creation time.
pub type Handle = usize;

/// Owned value produced by a PUT handler for publication.
pub type EventValue = heapless::String<MAX_EVENT_LEN>;

type Uri = heapless::String<MAX_URI_LEN>;

/// Per-resource PUT capability, invoked when the peer pushes a value to
/// a registered URI. Returning `Some` of a non-empty value asks the
/// engine to publish it back as a resource event.
pub trait PutHandler {
    fn on_put(&mut self, value: &str) -> Option<EventValue>;
}

impl<F> PutHandler for F
where
    F: FnMut(&str) -> Option<EventValue>,
{
    fn on_put(&mut self, value: &str) -> Option<EventValue> {
        self(value)
    }
}

/// One registered resource.
pub struct Resource {
    uri: Uri,
    attribute: Uri,
    max_frame_len: u8,
    handler: Option<Box<dyn PutHandler>>,
}

impl Resource {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Bound on the encoded length of any trigger frame for this resource.
    pub fn max_frame_len(&self) -> u8 {
        self.max_frame_len
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub(crate) fn handler_mut(&mut self) -> Option<&mut Box<dyn PutHandler>> {
        self.handler.as_mut()
    }
}

/// Ordered, append-only resource table.
pub struct ResourceRegistry {
    entries: heapless::Vec<Resource, MAX_RESOURCES>,
    capacity: usize,
}

impl ResourceRegistry {
    /// An empty registry with a board-dependent capacity (clamped to the
    /// shield's own limit).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: heapless::Vec::new(),
            capacity: capacity.min(MAX_RESOURCES),
        }
    }

    /// The handle the next successful create will receive.
    pub fn next_handle(&self) -> Handle {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reserve the next handle and store the entry, pending remote
    /// confirmation.
    ///
    /// Rejects empty `uri`/`attribute`, a frame-length bound of 0 or
    /// beyond `MAX_FRAME_LEN - 1`, over-long strings, or a full table —
    /// all without touching the channel and without consuming a handle.
    pub fn create_local(&mut self, uri: &str, max_len: u8, attribute: &str) -> Result<Handle> {
        if uri.is_empty() || attribute.is_empty() {
            return Err(Error::InvalidArgument);
        }
        if max_len == 0 || usize::from(max_len) > MAX_FRAME_LEN - 1 {
            return Err(Error::InvalidArgument);
        }
        if self.entries.len() >= self.capacity {
            return Err(Error::CapacityExceeded);
        }

        let mut uri_buf = Uri::new();
        uri_buf.push_str(uri).map_err(|()| Error::InvalidArgument)?;
        let mut attr_buf = Uri::new();
        attr_buf
            .push_str(attribute)
            .map_err(|()| Error::InvalidArgument)?;

        let handle = self.entries.len();
        let entry = Resource {
            uri: uri_buf,
            attribute: attr_buf,
            max_frame_len: max_len,
            handler: None,
        };
        self.entries
            .push(entry)
            .map_err(|_| Error::CapacityExceeded)?;
        Ok(handle)
    }

    /// Discard the most recent reservation after a failed remote
    /// confirmation, releasing its handle for the next create.
    pub fn rollback(&mut self, handle: Handle) {
        if handle + 1 == self.entries.len() {
            let _ = self.entries.pop();
        } else {
            warn!("rollback of stale handle {} ignored", handle);
        }
    }

    /// First match in insertion order.
    pub fn lookup_by_uri(&self, uri: &str) -> Option<Handle> {
        self.entries.iter().position(|r| r.uri.as_str() == uri)
    }

    /// Attach a PUT handler to a live resource.
    pub fn set_handler(&mut self, handle: Handle, handler: Box<dyn PutHandler>) -> Result<()> {
        let entry = self.entries.get_mut(handle).ok_or(Error::InvalidHandle)?;
        entry.handler = Some(handler);
        Ok(())
    }

    pub fn get(&self, handle: Handle) -> Option<&Resource> {
        self.entries.get(handle)
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> Option<&mut Resource> {
        self.entries.get_mut(handle)
    }
}
