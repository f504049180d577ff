//! Screen engine: list screens, attached capabilities and the navigation loop.
//!
//! A [`ListScreen`] renders a [`ListState`], shows the actions its
//! capabilities contribute, reads one choice and turns it into a
//! [`Transition`]. [`run`] drives screens until one stops; [`run_nested`]
//! drives a sub-flow (such as picking a site for a project) and hands
//! control back to its caller, along with any screen the sub-flow
//! navigated to.

pub mod action;
pub mod crud;
pub mod list;
pub mod pagination;
pub mod selection;

use odie_sqlite::Database;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::term::Terminal;

pub use action::{Action, Command};
pub use crud::{Crud, changed_fields};
pub use list::{Capability, Column, ColumnKind, ListScreen, ListState};
pub use pagination::Pagination;
pub use selection::{Picked, Selection, SelectionSlot, pick};

/// Everything a screen needs while it runs.
pub struct Session<'a> {
    pub db: &'a Database,
    pub term: &'a mut dyn Terminal,
    pub config: &'a Config,
}

impl<'a> Session<'a> {
    pub fn new(db: &'a Database, term: &'a mut dyn Terminal, config: &'a Config) -> Self {
        Self { db, term, config }
    }
}

/// What the loop does after an action.
pub enum Transition<'a> {
    /// Stay on the current screen and render it again.
    Continue,
    /// Replace the current screen.
    Navigate(Box<ListScreen<'a>>),
    /// Leave the current loop.
    Stop,
}

/// Runs screens starting at `start` until one returns [`Transition::Stop`].
///
/// # Errors
///
/// Only unrecoverable errors end the loop early; store failures and bad
/// selections are reported on screen.
pub fn run<'a>(session: &mut Session<'a>, start: ListScreen<'a>) -> Result<()> {
    let mut screen = Box::new(start);
    loop {
        match screen.step(session)? {
            Transition::Continue => {}
            Transition::Navigate(next) => {
                debug!(from = %screen.title(), to = %next.title(), "navigating");
                screen = next;
            }
            Transition::Stop => return Ok(()),
        }
    }
}

/// Runs `screen` as a sub-flow until it stops.
///
/// Navigating away ends the sub-flow and returns the target screen, which
/// the caller passes outward so the top-level loop lands on it.
pub fn run_nested<'a>(
    session: &mut Session<'a>,
    screen: &mut ListScreen<'a>,
) -> Result<Option<Box<ListScreen<'a>>>> {
    loop {
        match screen.step(session)? {
            Transition::Continue => {}
            Transition::Navigate(next) => {
                debug!(from = %screen.title(), to = %next.title(), "leaving sub-flow");
                return Ok(Some(next));
            }
            Transition::Stop => return Ok(None),
        }
    }
}
