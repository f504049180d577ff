//! Entity list screens and their extra actions.

use odie_core::{Fields, Table, Value};

use super::list_state;
use crate::error::Result;
use crate::fields::{FieldSchema, FieldSpec};
use crate::ui::{Action, Capability, Command, Crud, ListScreen, ListState, Pagination, Session, Transition};

fn crud<'a>(table: Table, session: &Session<'a>, fields: FieldSchema) -> Result<Crud<'a>> {
    Ok(Crud::new(session.db.store(table)?, table.noun(), fields))
}

/// Migration fields. Root paths default to the working directory.
fn migration_fields() -> FieldSchema {
    let cwd = std::env::current_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut old_root = FieldSpec::directory("old_root", "Old Root Path");
    let mut new_root = FieldSpec::directory("new_root", "New Root Path");
    if !cwd.is_empty() {
        old_root = old_root.with_default(cwd.clone());
        new_root = new_root.with_default(cwd);
    }
    vec![FieldSpec::required("name", "Migration Name"), old_root, new_root]
}

pub fn migrations<'a>(session: &Session<'a>) -> Result<ListScreen<'a>> {
    let state = list_state(Table::Migrations, session)?;
    Ok(ListScreen::new(state)
        .with(Activate)
        .with(crud(Table::Migrations, session, migration_fields())?)
        .with(Pagination))
}

pub fn sites<'a>(session: &Session<'a>) -> Result<ListScreen<'a>> {
    let state = list_state(Table::Sites, session)?;
    let fields = vec![FieldSpec::required("name", "Site Name")];
    Ok(ListScreen::new(state)
        .with(crud(Table::Sites, session, fields)?)
        .with(SeedSites)
        .with(Pagination))
}

pub fn clients<'a>(session: &Session<'a>) -> Result<ListScreen<'a>> {
    let state = list_state(Table::Clients, session)?;
    let fields = vec![FieldSpec::required("name", "Client Name")];
    Ok(ListScreen::new(state)
        .with(crud(Table::Clients, session, fields)?)
        .with(Pagination))
}

pub fn projects<'a>(session: &Session<'a>) -> Result<ListScreen<'a>> {
    let state = list_state(Table::Projects, session)?;
    let fields = vec![
        FieldSpec::required("name", "Project Name"),
        FieldSpec::select("site_id", "Site", Table::Sites),
        FieldSpec::select("client_id", "Client", Table::Clients),
    ];
    Ok(ListScreen::new(state)
        .with(crud(Table::Projects, session, fields)?)
        .with(Pagination))
}

pub fn files<'a>(session: &Session<'a>) -> Result<ListScreen<'a>> {
    let state = list_state(Table::Files, session)?;
    let fields = vec![
        FieldSpec::required("name", "File Name"),
        FieldSpec::select("project_id", "Project", Table::Projects),
        FieldSpec::flag("flagged", "Flagged (0/1)"),
    ];
    Ok(ListScreen::new(state)
        .with(crud(Table::Files, session, fields)?)
        .with(ToggleFlag)
        .with(Pagination))
}

/// Makes the chosen migration the active one.
struct Activate;

impl<'a> Capability<'a> for Activate {
    fn actions(&self, state: &ListState<'a>) -> Vec<Action> {
        vec![
            Action::new("A", "Activate Migration", Command::Activate)
                .enabled_if(!state.items.is_empty()),
        ]
    }

    fn perform(
        &mut self,
        _command: Command,
        state: &mut ListState<'a>,
        session: &mut Session<'a>,
    ) -> Result<Transition<'a>> {
        session.term.info("Activating migration...")?;
        let migration = state.prompt_for_item(session.term, "activate")?;
        if let Some(id) = migration.id() {
            session.db.registry().set_active(id)?;
            session.term.success(&format!(
                "Migration '{}' activated successfully.",
                migration.display("name")
            ))?;
            state.refresh()?;
        }
        Ok(Transition::Continue)
    }
}

/// Adds the configured default site names to an active migration that
/// has no sites yet.
struct SeedSites;

impl<'a> Capability<'a> for SeedSites {
    fn actions(&self, state: &ListState<'a>) -> Vec<Action> {
        vec![
            Action::new("S", "Seed Default Sites", Command::SeedSites)
                .enabled_if(state.active_items().next().is_none()),
        ]
    }

    fn perform(
        &mut self,
        _command: Command,
        state: &mut ListState<'a>,
        session: &mut Session<'a>,
    ) -> Result<Transition<'a>> {
        let store = session.db.store(Table::Sites)?;
        let mut added = 0;
        for name in &session.config.default_sites {
            let fields = Fields::from([("name".to_string(), Value::from(name.as_str()))]);
            if let Err(err) = store.add(fields) {
                state.refresh()?;
                return Err(err.into());
            }
            added += 1;
        }
        session.term.success(&format!("Added {added} default sites."))?;
        state.refresh()?;
        Ok(Transition::Continue)
    }
}

/// Flips the review flag of the chosen file.
struct ToggleFlag;

impl<'a> Capability<'a> for ToggleFlag {
    fn actions(&self, state: &ListState<'a>) -> Vec<Action> {
        vec![
            Action::new("F", "Toggle Flag", Command::ToggleFlag)
                .enabled_if(!state.items.is_empty()),
        ]
    }

    fn perform(
        &mut self,
        _command: Command,
        state: &mut ListState<'a>,
        session: &mut Session<'a>,
    ) -> Result<Transition<'a>> {
        let file = state.prompt_for_item(session.term, "flag")?;
        let Some(id) = file.id() else {
            return Ok(Transition::Continue);
        };
        let flagged = !file.get("flagged").is_some_and(Value::is_truthy);

        session
            .db
            .store(Table::Files)?
            .update(id, &Fields::from([("flagged".to_string(), Value::from(flagged))]))?;
        let verb = if flagged { "flagged" } else { "unflagged" };
        session
            .term
            .success(&format!("File '{}' {verb}.", file.display("name")))?;
        state.refresh()?;
        Ok(Transition::Continue)
    }
}
