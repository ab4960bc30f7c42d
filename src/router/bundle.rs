//! Closure-backed listener: register a handler per callback, and the
//! registration doubles as the capability declaration.

use super::TemplateListener;
use crate::bus::Event;
use crate::callback::{Callback, CallbackSet};
use crate::types::{Error, Result};
use std::fmt;

type Handler = Box<dyn Fn(&Event) -> Result<()> + Send + Sync>;

/// Plain bundle of per-callback handlers.
#[derive(Default)]
pub struct HandlerBundle {
    handlers: Vec<(Callback, Handler)>,
}

impl HandlerBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for `callback`.
    pub fn on<F>(mut self, callback: Callback, handler: F) -> Self
    where
        F: Fn(&Event) -> Result<()> + Send + Sync + 'static,
    {
        self.handlers.retain(|(c, _)| *c != callback);
        self.handlers.push((callback, Box::new(handler)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBundle")
            .field("callbacks", &self.capabilities().iter().collect::<Vec<_>>())
            .finish()
    }
}

impl TemplateListener for HandlerBundle {
    fn capabilities(&self) -> CallbackSet {
        self.handlers.iter().map(|(c, _)| *c).collect()
    }

    fn handle(&self, callback: Callback, event: &Event) -> Result<()> {
        let (_, handler) = self
            .handlers
            .iter()
            .find(|(c, _)| *c == callback)
            .ok_or_else(|| Error::not_found(format!("No handler for callback: {}", callback)))?;

        handler(event)
    }
}
