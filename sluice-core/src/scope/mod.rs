// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A watchable model with explicit update cycles.
//!
//! A [`Scope`] holds a JSON model. Watchers registered on an expression are
//! re-evaluated during a *digest*; each one whose value changed since the last
//! digest fires its handler. [`apply`](Scope::apply) runs a mutation inside an
//! update cycle on the root and digests the whole scope tree afterwards.
//!
//! ## Characteristics
//!
//! - **Initial fire**: a new watcher fires on the first digest after registration,
//!   with `Null` when the expression does not resolve.
//! - **Settling**: digests repeat until no watcher fires, giving up after
//!   [`DIGEST_TTL`] dirty passes.
//! - **One cycle at a time**: starting a cycle while this scope or its root is
//!   already in one fails with [`SluiceError::CycleInProgress`].
//! - **Destroy**: destroying a scope destroys its descendants and drops their watchers.
//!
//! ## Example
//!
//! ```
//! use sluice_core::Scope;
//! use serde_json::{json, Value};
//! use std::sync::{Arc, Mutex};
//!
//! let scope = Scope::new();
//! let seen = Arc::new(Mutex::new(Vec::<Value>::new()));
//!
//! scope
//!     .watch("search", {
//!         let seen = seen.clone();
//!         Arc::new(move |value: Value| seen.lock().unwrap().push(value))
//!     })
//!     .unwrap();
//!
//! scope.apply(|| scope.set("search", "rust")).unwrap();
//! assert_eq!(*seen.lock().unwrap(), vec![json!("rust")]);
//! ```

mod model;

use crate::guarded_effect::EffectContext;
use crate::logging::{debug, warn_log};
use crate::push_source::{Handler, PushSource, Unsubscribe};
use crate::{Result, SluiceError};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Maximum number of dirty digest passes before giving up.
pub const DIGEST_TTL: usize = 10;

static NEXT_WATCH_ID: AtomicU64 = AtomicU64::new(0);

/// The update cycle a scope is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Running a mutation passed to [`Scope::apply`].
    Apply,
    /// Re-evaluating watchers.
    Digest,
}

/// Identifies one registered watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

struct Watcher {
    id: WatchId,
    expr: String,
    last: Option<Value>,
    handler: Handler<Value>,
}

struct ScopeInner {
    root: Option<Scope>,
    destroyed: AtomicBool,
    phase: Mutex<Option<Phase>>,
    model: Mutex<Value>,
    watchers: Mutex<Vec<Watcher>>,
    children: Mutex<Vec<Weak<ScopeInner>>>,
}

/// A watchable JSON model with apply/digest update cycles.
///
/// Cheap to clone; clones share the same scope.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

// Clears the phase when the cycle ends, including by unwinding.
struct PhaseGuard<'a> {
    phase: &'a Mutex<Option<Phase>>,
}

impl PhaseGuard<'_> {
    fn enter(&self, phase: Phase) {
        *self.phase.lock() = Some(phase);
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock() = None;
    }
}

impl Scope {
    /// Creates a root scope with an empty object model.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(None)
    }

    fn with_root(root: Option<Scope>) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                root,
                destroyed: AtomicBool::new(false),
                phase: Mutex::new(None),
                model: Mutex::new(Value::Object(serde_json::Map::new())),
                watchers: Mutex::new(Vec::new()),
                children: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a child scope. Its watchers are digested whenever this scope's
    /// tree is digested. The child has its own model.
    #[must_use]
    pub fn child(&self) -> Self {
        let child = Self::with_root(Some(self.root()));
        self.inner
            .children
            .lock()
            .push(Arc::downgrade(&child.inner));
        if self.is_destroyed() {
            child.inner.destroyed.store(true, Ordering::Release);
        }
        child
    }

    /// The root of this scope's tree (itself for a root scope).
    #[must_use]
    pub fn root(&self) -> Scope {
        self.inner.root.clone().unwrap_or_else(|| self.clone())
    }

    /// Returns `true` for a scope created with [`Scope::new`].
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.inner.root.is_none()
    }

    /// Reads the value at `expr`, `Null` when absent.
    #[must_use]
    pub fn get(&self, expr: &str) -> Value {
        model::lookup(&self.inner.model.lock(), expr)
    }

    /// Writes `value` at `expr`. Watchers observe the change on the next digest.
    pub fn set(&self, expr: &str, value: impl Into<Value>) {
        model::assign(&mut self.inner.model.lock(), expr, value.into());
    }

    /// Registers `handler` to be called with the value of `expr` whenever it changes.
    ///
    /// # Errors
    /// Returns [`SluiceError::ScopeDestroyed`] if the scope is destroyed.
    pub fn watch(&self, expr: &str, handler: Handler<Value>) -> Result<WatchId> {
        if self.is_destroyed() {
            return Err(SluiceError::ScopeDestroyed);
        }

        let id = WatchId(NEXT_WATCH_ID.fetch_add(1, Ordering::Relaxed));
        self.inner.watchers.lock().push(Watcher {
            id,
            expr: expr.to_owned(),
            last: None,
            handler,
        });
        Ok(id)
    }

    /// Removes a watcher. Returns `false` if it was not registered here.
    pub fn unwatch(&self, id: WatchId) -> bool {
        let mut watchers = self.inner.watchers.lock();
        let before = watchers.len();
        watchers.retain(|watcher| watcher.id != id);
        watchers.len() != before
    }

    /// Number of watchers registered on this scope.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.inner.watchers.lock().len()
    }

    /// The cycle this scope itself is in, if any.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        *self.inner.phase.lock()
    }

    /// Returns `true` if this scope or its root is in an update cycle.
    #[must_use]
    pub fn cycle_active(&self) -> bool {
        self.phase().is_some() || self.root().phase().is_some()
    }

    /// Returns `true` once [`destroy`](Self::destroy) ran on this scope or an ancestor.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    /// Runs `f` inside an update cycle on the root, then digests the whole tree.
    ///
    /// # Errors
    /// - [`SluiceError::ScopeDestroyed`] if the scope is destroyed (`f` is not run).
    /// - [`SluiceError::CycleInProgress`] if a cycle is already active (`f` is not run).
    /// - [`SluiceError::DigestOverflow`] if the digest does not settle.
    pub fn apply<F: FnOnce()>(&self, f: F) -> Result<()> {
        if self.is_destroyed() {
            return Err(SluiceError::ScopeDestroyed);
        }

        if self.cycle_active() {
            return Err(SluiceError::CycleInProgress);
        }

        let root = self.root();
        let guard = root.begin(Phase::Apply)?;
        f();
        guard.enter(Phase::Digest);
        root.settle()
    }

    /// Digests this scope and its descendants until no watcher fires.
    ///
    /// # Errors
    /// - [`SluiceError::ScopeDestroyed`] if the scope is destroyed.
    /// - [`SluiceError::CycleInProgress`] if a cycle is already active.
    /// - [`SluiceError::DigestOverflow`] if the digest does not settle.
    pub fn digest(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(SluiceError::ScopeDestroyed);
        }

        let _guard = self.begin(Phase::Digest)?;
        self.settle()
    }

    /// Destroys this scope and its descendants, dropping all their watchers.
    pub fn destroy(&self) {
        for scope in self.subtree() {
            scope.inner.destroyed.store(true, Ordering::Release);
            scope.inner.watchers.lock().clear();
        }
        debug!("scope destroyed");
    }

    // Check and set under this scope's phase lock. Lock order is always child, then root.
    fn begin(&self, phase: Phase) -> Result<PhaseGuard<'_>> {
        let mut current = self.inner.phase.lock();
        let root_busy = !self.is_root() && self.root().phase().is_some();
        if current.is_some() || root_busy {
            return Err(SluiceError::CycleInProgress);
        }
        *current = Some(phase);
        drop(current);

        Ok(PhaseGuard {
            phase: &self.inner.phase,
        })
    }

    fn settle(&self) -> Result<()> {
        let mut dirty_passes = 0;
        loop {
            let fired: usize = self
                .subtree()
                .iter()
                .map(Scope::check_watchers)
                .sum();

            if fired == 0 {
                return Ok(());
            }

            dirty_passes += 1;
            if dirty_passes >= DIGEST_TTL {
                warn_log!("digest did not settle after {} passes", dirty_passes);
                return Err(SluiceError::DigestOverflow {
                    iterations: dirty_passes,
                });
            }
        }
    }

    // One pass over this scope's watchers. Handlers run after the locks are released.
    fn check_watchers(&self) -> usize {
        if self.is_destroyed() {
            return 0;
        }

        let changed: Vec<(Handler<Value>, Value)> = {
            let model = self.inner.model.lock();
            let mut watchers = self.inner.watchers.lock();
            watchers
                .iter_mut()
                .filter_map(|watcher| {
                    let current = model::lookup(&model, &watcher.expr);
                    if watcher.last.as_ref() == Some(&current) {
                        return None;
                    }
                    watcher.last = Some(current.clone());
                    Some((watcher.handler.clone(), current))
                })
                .collect()
        };

        let fired = changed.len();
        for (handler, value) in changed {
            handler(value);
        }
        fired
    }

    fn subtree(&self) -> Vec<Scope> {
        let mut scopes = vec![self.clone()];
        let mut index = 0;
        while index < scopes.len() {
            let children = scopes[index].live_children();
            scopes.extend(children);
            index += 1;
        }
        scopes
    }

    fn live_children(&self) -> Vec<Scope> {
        let mut children = self.inner.children.lock();
        children.retain(|child| child.strong_count() > 0);
        children
            .iter()
            .filter_map(Weak::upgrade)
            .map(|inner| Scope { inner })
            .collect()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl PushSource for Scope {
    type Item = Value;
    type Selector = str;

    fn subscribe(&self, expr: &str, handler: Handler<Value>) -> Result<Unsubscribe> {
        let id = self.watch(expr, handler)?;
        let scope = self.clone();
        Ok(Unsubscribe::new(move || {
            scope.unwatch(id);
        }))
    }
}

impl EffectContext for Scope {
    fn is_destroyed(&self) -> bool {
        Scope::is_destroyed(self)
    }

    fn cycle_active(&self) -> bool {
        Scope::cycle_active(self)
    }

    fn schedule_cycle<F: FnOnce()>(&self, effect: F) -> Result<()> {
        self.apply(effect)
    }
}
