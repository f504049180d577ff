//! Picking one row of a table in a nested list.

use std::cell::RefCell;
use std::rc::Rc;

use odie_core::{Record, Table};

use super::action::{Action, Command};
use super::list::{Capability, ListScreen, ListState};
use super::pagination::Pagination;
use super::{Session, Transition, run_nested};
use crate::error::Result;
use crate::screens;

/// Shared holder for the row chosen in a selection screen.
#[derive(Debug, Clone, Default)]
pub struct SelectionSlot(Rc<RefCell<Option<Record>>>);

impl SelectionSlot {
    pub fn get(&self) -> Option<Record> {
        self.0.borrow().clone()
    }

    pub fn take(&self) -> Option<Record> {
        self.0.borrow_mut().take()
    }

    fn set(&self, record: Record) {
        *self.0.borrow_mut() = Some(record);
    }
}

/// Adds a Select action that records the chosen row and ends the sub-flow.
#[derive(Debug, Default)]
pub struct Selection {
    slot: SelectionSlot,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last selected row, if any.
    pub fn result(&self) -> Option<Record> {
        self.slot.get()
    }

    /// A handle that outlives the screen this capability is attached to.
    pub fn slot(&self) -> SelectionSlot {
        self.slot.clone()
    }
}

impl<'a> Capability<'a> for Selection {
    fn actions(&self, state: &ListState<'a>) -> Vec<Action> {
        vec![Action::new("S", "Select", Command::Select).enabled_if(!state.items.is_empty())]
    }

    fn perform(
        &mut self,
        command: Command,
        state: &mut ListState<'a>,
        session: &mut Session<'a>,
    ) -> Result<Transition<'a>> {
        if command != Command::Select {
            return Ok(Transition::Continue);
        }
        let record = state.prompt_for_item(session.term, "select")?;
        session
            .term
            .success(&format!("Selected item: {}", record.display("name")))?;
        self.slot.set(record);
        Ok(Transition::Stop)
    }
}

/// How a pick screen ended.
pub enum Picked<'a> {
    Selected(Record),
    /// Quit without choosing a row.
    Abandoned,
    /// The user left for another screen, usually Home.
    Navigate(Box<ListScreen<'a>>),
}

impl Picked<'_> {
    pub fn record(self) -> Option<Record> {
        match self {
            Picked::Selected(record) => Some(record),
            _ => None,
        }
    }
}

/// Lets the user choose one row of `table`.
pub fn pick<'a>(session: &mut Session<'a>, table: Table) -> Result<Picked<'a>> {
    let mut state = ListState::new(
        format!("Select {}", table.noun()),
        screens::columns(table),
        session.config.page_size,
    )
    .with_source(session.db.store(table)?);
    state.refresh()?;

    let selection = Selection::new();
    let slot = selection.slot();
    let mut screen = ListScreen::new(state).with(selection).with(Pagination);
    if let Some(next) = run_nested(session, &mut screen)? {
        return Ok(Picked::Navigate(next));
    }

    Ok(match slot.take() {
        Some(record) => Picked::Selected(record),
        None => Picked::Abandoned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::term::ScriptedTerminal;
    use odie_sqlite::Database;

    fn with_clients() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch(
                "INSERT INTO migrations (name, old_root, new_root, is_active) VALUES ('M1', '/o', '/n', 1);
                 INSERT INTO clients (name, migration_id) VALUES ('Acme', 1);
                 INSERT INTO clients (name, migration_id) VALUES ('Globex', 1);",
            )
            .unwrap();
        db
    }

    #[test]
    fn test_pick_returns_chosen_row() {
        let db = with_clients();
        let config = Config::default();
        let mut term = ScriptedTerminal::new(["S", "2"]);
        let mut session = Session::new(&db, &mut term, &config);

        let picked = pick(&mut session, Table::Clients).unwrap().record().unwrap();
        assert_eq!(picked.display("name"), "Globex");
        drop(session);
        assert!(term.saw("Selected item: Globex"));
    }

    #[test]
    fn test_pick_quit_returns_none() {
        let db = with_clients();
        let config = Config::default();
        let mut term = ScriptedTerminal::new(["Q"]);
        let mut session = Session::new(&db, &mut term, &config);
        assert!(matches!(pick(&mut session, Table::Clients).unwrap(), Picked::Abandoned));
    }

    #[test]
    fn test_pick_home_navigates_to_dashboard() {
        let db = with_clients();
        let config = Config::default();
        let mut term = ScriptedTerminal::new(["h"]);
        let mut session = Session::new(&db, &mut term, &config);
        match pick(&mut session, Table::Clients).unwrap() {
            Picked::Navigate(next) => assert_eq!(next.title(), "Dashboard"),
            _ => panic!("expected navigation"),
        }
    }

    #[test]
    fn test_invalid_index_keeps_screen_open() {
        let db = with_clients();
        let config = Config::default();
        let mut term = ScriptedTerminal::new(["s", "7", "s", "1"]);
        let mut session = Session::new(&db, &mut term, &config);

        let picked = pick(&mut session, Table::Clients).unwrap().record().unwrap();
        assert_eq!(picked.display("name"), "Acme");
        drop(session);
        assert!(term.saw("invalid selection '7'"));
    }

    #[test]
    fn test_select_disabled_on_empty_table() {
        let db = Database::open_in_memory().unwrap();
        let config = Config::default();
        let mut term = ScriptedTerminal::new(["S", "Q"]);
        let mut session = Session::new(&db, &mut term, &config);

        assert!(pick(&mut session, Table::Sites).unwrap().record().is_none());
        drop(session);
        assert!(term.saw("Select is not available right now."));
    }

    #[test]
    fn test_result_reflects_last_selection() {
        let selection = Selection::new();
        assert!(selection.result().is_none());
        selection.slot().set(Record::new().with("name", "HQ"));
        assert_eq!(selection.result().unwrap().display("name"), "HQ");
    }
}
