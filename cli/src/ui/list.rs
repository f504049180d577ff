//! List state, rendering and action dispatch.

use std::collections::HashMap;
use std::io;

use colored::Colorize;
use odie_core::{Record, Table, Value};
use odie_sqlite::RecordStore;
use tracing::debug;

use super::action::{Action, Command};
use super::{Session, Transition};
use crate::error::{CliError, Result};
use crate::screens;
use crate::term::Terminal;

/// How a column's cells are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// The stored value as text.
    Plain,
    /// `Yes` or `No`.
    Flag,
    /// A foreign key shown as the referenced row's `name`.
    Lookup(Table),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub key: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub fn plain(header: &'static str, key: &'static str) -> Self {
        Self {
            header,
            key,
            kind: ColumnKind::Plain,
        }
    }

    pub fn flag(header: &'static str, key: &'static str) -> Self {
        Self {
            header,
            key,
            kind: ColumnKind::Flag,
        }
    }

    pub fn lookup(header: &'static str, key: &'static str, table: Table) -> Self {
        Self {
            header,
            key,
            kind: ColumnKind::Lookup(table),
        }
    }
}

/// Rows of one list plus the current page.
///
/// `items` always holds the full list; paging only changes which slice is
/// rendered. Row indices shown to the user are 1-based over the full list.
pub struct ListState<'a> {
    pub title: String,
    pub banner: Option<String>,
    pub columns: Vec<Column>,
    pub items: Vec<Record>,
    pub page: usize,
    pub page_size: usize,
    /// Id of the active migration as of the last refresh.
    pub active_migration: Option<i64>,
    source: Option<RecordStore<'a>>,
    lookups: HashMap<Table, HashMap<i64, String>>,
}

impl<'a> ListState<'a> {
    pub fn new(title: impl Into<String>, columns: Vec<Column>, page_size: usize) -> Self {
        Self {
            title: title.into(),
            banner: None,
            columns,
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            active_migration: None,
            source: None,
            lookups: HashMap::new(),
        }
    }

    /// Uses a fixed set of rows instead of a table.
    pub fn with_items(mut self, items: Vec<Record>) -> Self {
        self.items = items;
        self
    }

    /// Loads rows from `store` on every [`refresh`](Self::refresh).
    pub fn with_source(mut self, store: RecordStore<'a>) -> Self {
        self.source = Some(store);
        self
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

    /// Reloads rows and lookup names, keeping the page in range.
    pub fn refresh(&mut self) -> Result<()> {
        if let Some(store) = &self.source {
            self.items = store.get_all()?;

            let db = store.database();
            self.active_migration = db.registry().active_id()?;
            self.lookups.clear();
            for column in &self.columns {
                if let ColumnKind::Lookup(table) = column.kind {
                    let names = db
                        .store(table)?
                        .get_all()?
                        .into_iter()
                        .filter_map(|row| row.id().map(|id| (id, row.display("name"))))
                        .collect();
                    self.lookups.insert(table, names);
                }
            }
            debug!(list = %self.title, rows = self.items.len(), "refreshed list");
        }
        self.page = self.page.clamp(1, self.total_pages().max(1));
        Ok(())
    }

    /// Rows stamped with the active migration.
    pub fn active_items(&self) -> impl Iterator<Item = &Record> {
        self.items.iter().filter(move |row| {
            self.active_migration.is_some()
                && row.get("migration_id").and_then(Value::as_i64) == self.active_migration
        })
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Rows on the current page.
    pub fn page_items(&self) -> &[Record] {
        let start = (self.page - 1) * self.page_size;
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Text shown for `record` in `column`.
    pub fn cell(&self, record: &Record, column: &Column) -> String {
        match column.kind {
            ColumnKind::Plain => record.display(column.key),
            ColumnKind::Flag => match record.get(column.key) {
                Some(value) if value.is_truthy() => "Yes".to_string(),
                Some(_) => "No".to_string(),
                None => "N/A".to_string(),
            },
            ColumnKind::Lookup(table) => record
                .get(column.key)
                .and_then(Value::as_i64)
                .and_then(|id| self.lookups.get(&table)?.get(&id).cloned())
                .unwrap_or_else(|| record.display(column.key)),
        }
    }

    pub fn render(&self, term: &mut dyn Terminal) -> io::Result<()> {
        term.write_line(&self.title.bold().to_string())?;
        if let Some(banner) = &self.banner {
            term.write_line(&banner.yellow().to_string())?;
        }
        term.write_line(&format!(
            "Page {} of {} ({} items)",
            self.page,
            self.total_pages().max(1),
            self.items.len()
        ))?;
        let first_index = (self.page - 1) * self.page_size + 1;
        self.render_rows(term, self.page_items(), first_index)
    }

    fn render_rows(
        &self,
        term: &mut dyn Terminal,
        rows: &[Record],
        first_index: usize,
    ) -> io::Result<()> {
        if rows.is_empty() {
            return term.write_line(&"No items to display.".dimmed().to_string());
        }

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| self.columns.iter().map(|c| self.cell(row, c)).collect())
            .collect();

        let index_width = (first_index + rows.len() - 1).to_string().len().max(5);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(column.header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut header = format!("{:>index_width$}", "Index");
        for (column, width) in self.columns.iter().zip(widths.iter().copied()) {
            header.push_str(&format!("  {:<width$}", column.header));
        }
        term.write_line(&header.bold().to_string())?;

        for (offset, row) in cells.iter().enumerate() {
            let mut line = format!("{:>index_width$}", first_index + offset);
            for (cell, width) in row.iter().zip(widths.iter().copied()) {
                line.push_str(&format!("  {cell:<width$}"));
            }
            term.write_line(line.trim_end())?;
        }
        Ok(())
    }

    /// Shows the full list and reads a 1-based row index.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidSelection`] when the entry is not a number
    /// between 1 and the number of rows.
    pub fn prompt_for_item(&self, term: &mut dyn Terminal, verb: &str) -> Result<Record> {
        self.render_rows(term, &self.items, 1)?;
        let input = term.read_line(&format!("Select an item to {verb}"), "")?;
        let count = self.items.len();
        match input.trim().parse::<usize>() {
            Ok(index) if (1..=count).contains(&index) => Ok(self.items[index - 1].clone()),
            _ => Err(CliError::InvalidSelection {
                input: input.trim().to_string(),
                count,
            }),
        }
    }
}

/// Behaviour attached to a list screen.
///
/// Each capability contributes actions computed from the current state and
/// performs the commands behind them.
pub trait Capability<'a> {
    fn actions(&self, state: &ListState<'a>) -> Vec<Action>;

    fn perform(
        &mut self,
        command: Command,
        state: &mut ListState<'a>,
        session: &mut Session<'a>,
    ) -> Result<Transition<'a>>;
}

/// A list with its capabilities.
pub struct ListScreen<'a> {
    pub state: ListState<'a>,
    capabilities: Vec<Box<dyn Capability<'a> + 'a>>,
}

impl<'a> ListScreen<'a> {
    pub fn new(state: ListState<'a>) -> Self {
        Self {
            state,
            capabilities: Vec::new(),
        }
    }

    /// Attaches a capability; its actions follow those attached earlier.
    pub fn with(mut self, capability: impl Capability<'a> + 'a) -> Self {
        self.capabilities.push(Box::new(capability));
        self
    }

    pub fn title(&self) -> &str {
        &self.state.title
    }

    /// Capability actions in attachment order, then Home and Quit.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .capabilities
            .iter()
            .flat_map(|capability| capability.actions(&self.state))
            .collect();
        actions.push(Action::new("H", "Home", Command::Home));
        actions.push(Action::new("Q", "Quit", Command::Quit));
        actions
    }

    pub fn render(&self, term: &mut dyn Terminal) -> io::Result<()> {
        self.state.render(term)?;
        term.write_line("")?;
        term.write_line(&"Actions".bold().to_string())?;
        for action in self.actions() {
            term.write_line(&format_action(&action))?;
        }
        Ok(())
    }

    /// Renders, reads one choice and acts on it. An empty choice quits.
    pub fn step(&mut self, session: &mut Session<'a>) -> Result<Transition<'a>> {
        session.term.clear()?;
        self.render(session.term)?;
        let choice = session.term.read_line("Select an action", "Q")?;
        self.dispatch(&choice, session)
    }

    /// Acts on a typed action key.
    ///
    /// Unknown and disabled keys leave the screen unchanged. Recoverable
    /// errors from a capability are reported and the screen stays.
    pub fn dispatch(&mut self, choice: &str, session: &mut Session<'a>) -> Result<Transition<'a>> {
        let actions = self.actions();
        let Some(action) = actions.iter().find(|action| action.matches(choice)) else {
            session
                .term
                .warn(&format!("Unknown action '{}'.", choice.trim()))?;
            return Ok(Transition::Continue);
        };
        if !action.enabled {
            session
                .term
                .warn(&format!("{} is not available right now.", action.label))?;
            return Ok(Transition::Continue);
        }

        debug!(screen = %self.state.title, command = ?action.command, "dispatching action");
        match action.command {
            Command::Home => {
                session.term.info("Going to home dashboard...")?;
                Ok(Transition::Navigate(Box::new(screens::dashboard(session)?)))
            }
            Command::Quit => {
                session.term.info(&format!("Exiting {}", self.state.title))?;
                Ok(Transition::Stop)
            }
            command => self.perform(command, session),
        }
    }

    fn perform(&mut self, command: Command, session: &mut Session<'a>) -> Result<Transition<'a>> {
        let owner = self.capabilities.iter().position(|capability| {
            capability
                .actions(&self.state)
                .iter()
                .any(|action| action.command == command)
        });
        let Some(index) = owner else {
            return Ok(Transition::Continue);
        };

        match self.capabilities[index].perform(command, &mut self.state, session) {
            Err(err) if err.is_recoverable() => {
                session.term.error(&err.to_string())?;
                Ok(Transition::Continue)
            }
            other => other,
        }
    }
}

fn format_action(action: &Action) -> String {
    if action.enabled {
        format!(
            "{} {}",
            format!("[{}]", action.key).green().bold(),
            action.label
        )
    } else {
        format!("[{}] {}", action.key, action.label)
            .dimmed()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::term::ScriptedTerminal;
    use odie_sqlite::Database;

    fn named(count: usize) -> Vec<Record> {
        (1..=count)
            .map(|i| {
                Record::new()
                    .with("id", i as i64)
                    .with("name", format!("item {i}"))
            })
            .collect()
    }

    fn state(count: usize) -> ListState<'static> {
        ListState::new("Items", vec![Column::plain("Name", "name")], 10).with_items(named(count))
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(state(0).total_pages(), 0);
        assert_eq!(state(10).total_pages(), 1);
        assert_eq!(state(11).total_pages(), 2);
        assert_eq!(state(25).total_pages(), 3);
    }

    #[test]
    fn test_page_items_and_bounds() {
        let mut list = state(25);
        assert!(!list.has_prev());
        assert!(list.has_next());
        assert_eq!(list.page_items().len(), 10);

        list.page = 3;
        assert!(list.has_prev());
        assert!(!list.has_next());
        assert_eq!(list.page_items().len(), 5);
        assert_eq!(list.page_items()[0].display("name"), "item 21");
    }

    #[test]
    fn test_refresh_clamps_page() {
        let mut list = state(5);
        list.page = 4;
        list.refresh().unwrap();
        assert_eq!(list.page, 1);
    }

    #[test]
    fn test_render_uses_global_index() {
        let mut list = state(12);
        list.page = 2;
        let mut term = ScriptedTerminal::new(Vec::<String>::new());
        list.render(&mut term).unwrap();
        assert!(term.saw("Page 2 of 2 (12 items)"));
        assert!(term.transcript().iter().any(|l| l.trim_start().starts_with("11  item 11")));
        assert!(!term.transcript().iter().any(|l| l.trim() == "1  item 1"));
    }

    #[test]
    fn test_prompt_for_item() {
        let list = state(3);
        let mut term = ScriptedTerminal::new(["2", "0", "x"]);
        let record = list.prompt_for_item(&mut term, "edit").unwrap();
        assert_eq!(record.display("name"), "item 2");

        for _ in 0..2 {
            assert!(matches!(
                list.prompt_for_item(&mut term, "edit"),
                Err(CliError::InvalidSelection { count: 3, .. })
            ));
        }
    }

    #[test]
    fn test_flag_and_lookup_cells() {
        let list = ListState::new(
            "Files",
            vec![
                Column::flag("Flagged", "flagged"),
                Column::lookup("Project", "project_id", Table::Projects),
            ],
            10,
        );
        let row = Record::new().with("flagged", 1).with("project_id", 9);
        assert_eq!(list.cell(&row, &list.columns[0]), "Yes");
        // Unresolved lookups fall back to the raw key.
        assert_eq!(list.cell(&row, &list.columns[1]), "9");
        assert_eq!(list.cell(&Record::new(), &list.columns[0]), "N/A");
    }

    #[test]
    fn test_lookup_resolves_names_from_store() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch(
                "INSERT INTO migrations (name, old_root, new_root, is_active) VALUES ('M1', '/o', '/n', 1);
                 INSERT INTO sites (name, migration_id) VALUES ('HQ', 1);
                 INSERT INTO clients (name, migration_id) VALUES ('Acme', 1);
                 INSERT INTO projects (name, site_id, client_id, migration_id) VALUES ('Website', 1, 1, 1);",
            )
            .unwrap();

        let mut list = ListState::new(
            "Projects",
            vec![
                Column::plain("Project Name", "name"),
                Column::lookup("Site", "site_id", Table::Sites),
                Column::lookup("Client", "client_id", Table::Clients),
            ],
            10,
        )
        .with_source(db.store(Table::Projects).unwrap());
        list.refresh().unwrap();

        let row = &list.items[0];
        assert_eq!(list.cell(row, &list.columns[1]), "HQ");
        assert_eq!(list.cell(row, &list.columns[2]), "Acme");
    }

    struct Counter {
        hits: usize,
    }

    impl<'a> Capability<'a> for Counter {
        fn actions(&self, state: &ListState<'a>) -> Vec<Action> {
            vec![Action::new("X", "Count", Command::Create).enabled_if(!state.items.is_empty())]
        }

        fn perform(
            &mut self,
            _command: Command,
            _state: &mut ListState<'a>,
            _session: &mut Session<'a>,
        ) -> Result<Transition<'a>> {
            self.hits += 1;
            Ok(Transition::Continue)
        }
    }

    #[test]
    fn test_dispatch_unknown_disabled_and_quit() {
        let db = Database::open_in_memory().unwrap();
        let config = Config::default();
        let mut term = ScriptedTerminal::new(Vec::<String>::new());
        let mut session = Session::new(&db, &mut term, &config);

        let mut screen = ListScreen::new(ListState::new("Empty", vec![], 10)).with(Counter { hits: 0 });
        let keys: Vec<&str> = screen.actions().iter().map(|a| a.key).collect();
        assert_eq!(keys, vec!["X", "H", "Q"]);

        assert!(matches!(screen.dispatch("z", &mut session).unwrap(), Transition::Continue));
        assert!(matches!(screen.dispatch("x", &mut session).unwrap(), Transition::Continue));
        assert!(matches!(screen.dispatch("q", &mut session).unwrap(), Transition::Stop));
        drop(screen);
        drop(session);

        assert!(term.saw("Unknown action 'z'."));
        assert!(term.saw("Count is not available right now."));
    }
}
