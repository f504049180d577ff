//! Previous/next page actions.

use super::action::{Action, Command};
use super::list::{Capability, ListState};
use super::{Session, Transition};
use crate::error::Result;

/// Moves through the pages of a list.
pub struct Pagination;

impl<'a> Capability<'a> for Pagination {
    fn actions(&self, state: &ListState<'a>) -> Vec<Action> {
        vec![
            Action::new("P", "Prev Page", Command::PrevPage).enabled_if(state.has_prev()),
            Action::new("N", "Next Page", Command::NextPage).enabled_if(state.has_next()),
        ]
    }

    fn perform(
        &mut self,
        command: Command,
        state: &mut ListState<'a>,
        session: &mut Session<'a>,
    ) -> Result<Transition<'a>> {
        match command {
            Command::PrevPage if state.has_prev() => {
                state.page -= 1;
                session.term.info(&format!("Moved to page {}", state.page))?;
            }
            Command::PrevPage => session.term.info("Already at the first page.")?,
            Command::NextPage if state.has_next() => {
                state.page += 1;
                session.term.info(&format!("Moved to page {}", state.page))?;
            }
            Command::NextPage => session.term.info("Already at the last page.")?,
            _ => {}
        }
        Ok(Transition::Continue)
    }
}
