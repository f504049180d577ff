//! Top-level menu.

use odie_core::{Record, Table};

use crate::error::Result;
use crate::ui::{Action, Capability, Column, Command, ListScreen, ListState, Session, Transition};

const MENU: [(&str, Table); 5] = [
    ("1", Table::Migrations),
    ("2", Table::Sites),
    ("3", Table::Clients),
    ("4", Table::Projects),
    ("5", Table::Files),
];

/// The start screen, with a banner naming the active migration.
pub fn dashboard<'a>(session: &Session<'a>) -> Result<ListScreen<'a>> {
    let rows = MENU
        .iter()
        .map(|(_, table)| Record::new().with("name", format!("Go To {}", table.title())))
        .collect();

    let banner = match session.db.registry().active()? {
        Some(migration) => format!("Active migration: {}", migration.display("name")),
        None => "No active migration. Create and activate one under Migrations.".to_string(),
    };

    let state = ListState::new("Dashboard", vec![Column::plain("Menu", "name")], session.config.page_size)
        .with_items(rows)
        .with_banner(banner);
    Ok(ListScreen::new(state).with(Menu))
}

struct Menu;

impl<'a> Capability<'a> for Menu {
    fn actions(&self, _state: &ListState<'a>) -> Vec<Action> {
        MENU.iter()
            .map(|(key, table)| Action::new(*key, table.title(), Command::Open(*table)))
            .collect()
    }

    fn perform(
        &mut self,
        command: Command,
        _state: &mut ListState<'a>,
        session: &mut Session<'a>,
    ) -> Result<Transition<'a>> {
        let Command::Open(table) = command else {
            return Ok(Transition::Continue);
        };
        session
            .term
            .info(&format!("Loading {}...", table.title()))?;
        Ok(Transition::Navigate(Box::new(super::open(table, session)?)))
    }
}
