//! The application's screens, one per entity plus the dashboard.

mod dashboard;
mod entities;

use odie_core::Table;

use crate::error::Result;
use crate::ui::{Column, ListScreen, ListState, Session};

pub use dashboard::dashboard;
pub use entities::{clients, files, migrations, projects, sites};

/// Opens the list screen for `table`.
pub fn open<'a>(table: Table, session: &Session<'a>) -> Result<ListScreen<'a>> {
    match table {
        Table::Migrations => migrations(session),
        Table::Sites => sites(session),
        Table::Clients => clients(session),
        Table::Projects => projects(session),
        Table::Files => files(session),
    }
}

/// Columns shown when listing `table`.
pub fn columns(table: Table) -> Vec<Column> {
    match table {
        Table::Migrations => vec![
            Column::plain("Migration Name", "name"),
            Column::plain("Old Root", "old_root"),
            Column::plain("New Root", "new_root"),
            Column::flag("Active", "is_active"),
        ],
        Table::Sites => vec![Column::plain("Site Name", "name")],
        Table::Clients => vec![Column::plain("Client Name", "name")],
        Table::Projects => vec![
            Column::plain("Project Name", "name"),
            Column::lookup("Site", "site_id", Table::Sites),
            Column::lookup("Client", "client_id", Table::Clients),
        ],
        Table::Files => vec![
            Column::plain("File Name", "name"),
            Column::lookup("Project", "project_id", Table::Projects),
            Column::flag("Flagged", "flagged"),
        ],
    }
}

/// A refreshed list over `table`.
fn list_state<'a>(table: Table, session: &Session<'a>) -> Result<ListState<'a>> {
    let mut state = ListState::new(table.title(), columns(table), session.config.page_size)
        .with_source(session.db.store(table)?);
    state.refresh()?;
    Ok(state)
}
