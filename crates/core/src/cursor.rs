//! Scoped, closeable scan cursors
//!
//! Range and history scans hand back a [`Cursor`]: a lazy iterator over
//! `Result<T>` items that owns a release action. The action runs exactly
//! once, either on [`Cursor::close`] or when the cursor is dropped, so a
//! cursor is released on every exit path of the code that opened it
//! (normal completion, early return, `?` propagation, unwinding).
//!
//! Stores count open cursors through a [`CursorRegistry`]; each cursor holds
//! a [`CursorLease`] that gives its slot back on release.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::Result;

type ReleaseFn = Box<dyn FnOnce() + Send>;

/// Lazy iterator over scan results with a scoped release action
pub struct Cursor<T> {
    items: Box<dyn Iterator<Item = Result<T>> + Send>,
    release: Option<ReleaseFn>,
    released: bool,
}

impl<T> Cursor<T> {
    /// Wrap an iterator of fallible items
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Result<T>>,
        I::IntoIter: Send + 'static,
    {
        Cursor {
            items: Box::new(items.into_iter()),
            release: None,
            released: false,
        }
    }

    /// Cursor over already-materialized items
    pub fn from_items(items: Vec<T>) -> Self
    where
        T: Send + 'static,
    {
        Cursor::new(items.into_iter().map(Ok))
    }

    /// Cursor that yields nothing
    pub fn empty() -> Self
    where
        T: Send + 'static,
    {
        Cursor::from_items(Vec::new())
    }

    /// Attach an action to run when the cursor is released
    ///
    /// Chained actions all run, most recently attached first.
    pub fn on_release<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let release: ReleaseFn = match self.release.take() {
            Some(previous) => Box::new(move || {
                f();
                previous();
            }),
            None => Box::new(f),
        };
        self.release = Some(release);
        self
    }

    /// Hold a registry lease for the lifetime of the cursor
    pub fn with_lease(self, lease: CursorLease) -> Self {
        self.on_release(move || drop(lease))
    }

    /// Release the cursor now
    pub fn close(mut self) {
        self.release_now();
    }

    /// Has the cursor been released?
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn release_now(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.released {
            return None;
        }
        self.items.next()
    }
}

impl<T> Drop for Cursor<T> {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

/// Counts cursors that have been opened and not yet released
#[derive(Debug, Clone, Default)]
pub struct CursorRegistry {
    open: Arc<AtomicUsize>,
}

impl CursorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a slot for a newly opened cursor
    pub fn acquire(&self) -> CursorLease {
        self.open.fetch_add(1, Ordering::AcqRel);
        CursorLease {
            open: Arc::clone(&self.open),
        }
    }

    /// Number of cursors currently open
    pub fn open_count(&self) -> usize {
        self.open.load(Ordering::Acquire)
    }
}

/// One open-cursor slot; dropping it gives the slot back
#[derive(Debug)]
pub struct CursorLease {
    open: Arc<AtomicUsize>,
}

impl Drop for CursorLease {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::AcqRel);
    }
}
