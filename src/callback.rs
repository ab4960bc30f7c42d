//! Callback mapping table — template fragment → callback name.
//!
//! The table is closed: supporting a new template means adding a variant here
//! and a handler on whichever listener wants it. Declaration order of
//! [`Callback::ALL`] is the emission order.
//!
//!   config/routes          → beforeRenderRoutes
//!   Controller/component   → beforeRenderComponent
//!   Controller/controller  → beforeRenderController
//!   Model/behavior         → beforeRenderBehavior
//!   Model/entity           → beforeRenderEntity
//!   Model/table            → beforeRenderTable
//!   Shell/shell            → beforeRenderShell
//!   View/cell              → beforeRenderCell
//!   View/helper            → beforeRenderHelper
//!   tests/test_case        → beforeRenderTestCase

use crate::types::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A logical render callback a listener can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Callback {
    BeforeRenderRoutes,
    BeforeRenderComponent,
    BeforeRenderController,
    BeforeRenderBehavior,
    BeforeRenderEntity,
    BeforeRenderTable,
    BeforeRenderShell,
    BeforeRenderCell,
    BeforeRenderHelper,
    BeforeRenderTestCase,
}

impl Callback {
    /// Every callback, in table declaration order.
    pub const ALL: [Callback; 10] = [
        Callback::BeforeRenderRoutes,
        Callback::BeforeRenderComponent,
        Callback::BeforeRenderController,
        Callback::BeforeRenderBehavior,
        Callback::BeforeRenderEntity,
        Callback::BeforeRenderTable,
        Callback::BeforeRenderShell,
        Callback::BeforeRenderCell,
        Callback::BeforeRenderHelper,
        Callback::BeforeRenderTestCase,
    ];

    /// Template fragment this callback reacts to.
    pub fn template(self) -> &'static str {
        match self {
            Callback::BeforeRenderRoutes => "config/routes",
            Callback::BeforeRenderComponent => "Controller/component",
            Callback::BeforeRenderController => "Controller/controller",
            Callback::BeforeRenderBehavior => "Model/behavior",
            Callback::BeforeRenderEntity => "Model/entity",
            Callback::BeforeRenderTable => "Model/table",
            Callback::BeforeRenderShell => "Shell/shell",
            Callback::BeforeRenderCell => "View/cell",
            Callback::BeforeRenderHelper => "View/helper",
            Callback::BeforeRenderTestCase => "tests/test_case",
        }
    }

    /// Callback name as it appears in event names.
    pub fn name(self) -> &'static str {
        match self {
            Callback::BeforeRenderRoutes => "beforeRenderRoutes",
            Callback::BeforeRenderComponent => "beforeRenderComponent",
            Callback::BeforeRenderController => "beforeRenderController",
            Callback::BeforeRenderBehavior => "beforeRenderBehavior",
            Callback::BeforeRenderEntity => "beforeRenderEntity",
            Callback::BeforeRenderTable => "beforeRenderTable",
            Callback::BeforeRenderShell => "beforeRenderShell",
            Callback::BeforeRenderCell => "beforeRenderCell",
            Callback::BeforeRenderHelper => "beforeRenderHelper",
            Callback::BeforeRenderTestCase => "beforeRenderTestCase",
        }
    }

    /// Look up the callback registered for a template fragment.
    pub fn for_template(fragment: &str) -> Option<Callback> {
        Self::ALL.into_iter().find(|c| c.template() == fragment)
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Callback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| Error::validation(format!("Unknown callback: {}", s)))
    }
}

// =============================================================================
// Capability declarations
// =============================================================================

/// Set of callbacks a listener declares it handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CallbackSet(u16);

impl CallbackSet {
    const ALL_BITS: u16 = (1 << Callback::ALL.len()) - 1;

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self(Self::ALL_BITS)
    }

    pub fn with(mut self, callback: Callback) -> Self {
        self.insert(callback);
        self
    }

    pub fn insert(&mut self, callback: Callback) {
        self.0 |= callback.bit();
    }

    pub fn contains(&self, callback: Callback) -> bool {
        self.0 & callback.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in table order.
    pub fn iter(&self) -> impl Iterator<Item = Callback> + '_ {
        Callback::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Callback> for CallbackSet {
    fn from_iter<I: IntoIterator<Item = Callback>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CallbackSet::empty(), |set, callback| set.with(callback))
    }
}
