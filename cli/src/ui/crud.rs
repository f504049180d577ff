//! Create, edit and delete actions bound to one table.

use odie_core::{Fields, Record, Value};
use odie_sqlite::RecordStore;
use tracing::debug;

use super::action::{Action, Command};
use super::list::{Capability, ListState};
use super::{Session, Transition};
use crate::error::Result;
use crate::fields::FieldSchema;
use crate::prompt::{Prompted, prompt_fields};

/// CRUD actions for the rows of one table.
///
/// Store failures are reported on screen and leave the list unchanged.
pub struct Crud<'a> {
    store: RecordStore<'a>,
    noun: &'static str,
    fields: FieldSchema,
}

impl<'a> Crud<'a> {
    pub fn new(store: RecordStore<'a>, noun: &'static str, fields: FieldSchema) -> Self {
        Self {
            store,
            noun,
            fields,
        }
    }

    fn key_of(&self, record: &Record) -> Option<i64> {
        record
            .get(self.store.spec().primary_key())
            .and_then(Value::as_i64)
    }

    fn label_of(&self, key: &str) -> String {
        self.fields
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.label.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    fn create(&self, state: &mut ListState<'a>, session: &mut Session<'a>) -> Result<Transition<'a>> {
        session.term.info(&format!("Creating new {}...", self.noun))?;
        let fields = match prompt_fields(session, &self.fields, None)? {
            Prompted::Complete(fields) => fields,
            Prompted::Aborted => {
                session.term.warn(&format!("{} was not created.", self.noun))?;
                return Ok(Transition::Continue);
            }
            Prompted::Navigate(next) => {
                session.term.warn(&format!("{} was not created.", self.noun))?;
                return Ok(Transition::Navigate(next));
            }
        };

        match self.store.add(fields) {
            Ok(()) => {
                session
                    .term
                    .success(&format!("{} created successfully.", self.noun))?;
                state.refresh()?;
            }
            Err(err) => {
                session
                    .term
                    .error(&format!("Error creating {}: {err}", self.noun))?;
            }
        }
        Ok(Transition::Continue)
    }

    fn edit(&self, state: &mut ListState<'a>, session: &mut Session<'a>) -> Result<Transition<'a>> {
        session.term.info(&format!("Editing {}...", self.noun))?;
        let current = state.prompt_for_item(session.term, "edit")?;
        let Some(id) = self.key_of(&current) else {
            session.term.error("Selected row has no primary key.")?;
            return Ok(Transition::Continue);
        };

        let updated = match prompt_fields(session, &self.fields, Some(&current))? {
            Prompted::Complete(fields) => fields,
            Prompted::Aborted => {
                session.term.warn("Edit cancelled.")?;
                return Ok(Transition::Continue);
            }
            Prompted::Navigate(next) => {
                session.term.warn("Edit cancelled.")?;
                return Ok(Transition::Navigate(next));
            }
        };

        let changes = changed_fields(&current, &updated);
        if changes.is_empty() {
            session.term.warn("No changes made.")?;
            return Ok(Transition::Continue);
        }

        for (key, new) in &changes {
            let old = current.display(key);
            session
                .term
                .write_line(&format!("{}: {old} -> {new}", self.label_of(key)))?;
        }
        if !session.term.confirm("Commit changes?", true)? {
            session.term.warn("Discarding changes.")?;
            return Ok(Transition::Continue);
        }

        debug!(table = %self.store.table(), id, changed = changes.len(), "committing edit");
        match self.store.update(id, &changes) {
            Ok(()) => {
                session
                    .term
                    .success(&format!("{} updated successfully.", self.noun))?;
                state.refresh()?;
            }
            Err(err) => {
                session
                    .term
                    .error(&format!("Error editing {}: {err}", self.noun))?;
            }
        }
        Ok(Transition::Continue)
    }

    fn delete(&self, state: &mut ListState<'a>, session: &mut Session<'a>) -> Result<()> {
        session.term.info(&format!("Deleting {}...", self.noun))?;
        let item = state.prompt_for_item(session.term, "delete")?;
        let Some(id) = self.key_of(&item) else {
            session.term.error("Selected row has no primary key.")?;
            return Ok(());
        };

        match self.store.delete(id) {
            Ok(()) => {
                session
                    .term
                    .success(&format!("{} deleted successfully.", self.noun))?;
                state.refresh()?;
            }
            Err(err) => {
                session
                    .term
                    .error(&format!("Error deleting {}: {err}", self.noun))?;
            }
        }
        Ok(())
    }
}

impl<'a> Capability<'a> for Crud<'a> {
    fn actions(&self, state: &ListState<'a>) -> Vec<Action> {
        let has_items = !state.items.is_empty();
        vec![
            Action::new("C", format!("Create {}", self.noun), Command::Create),
            Action::new("E", format!("Edit {}", self.noun), Command::Edit).enabled_if(has_items),
            Action::new("D", format!("Delete {}", self.noun), Command::Delete)
                .enabled_if(has_items),
        ]
    }

    fn perform(
        &mut self,
        command: Command,
        state: &mut ListState<'a>,
        session: &mut Session<'a>,
    ) -> Result<Transition<'a>> {
        match command {
            Command::Create => self.create(state, session),
            Command::Edit => self.edit(state, session),
            Command::Delete => {
                self.delete(state, session)?;
                Ok(Transition::Continue)
            }
            _ => Ok(Transition::Continue),
        }
    }
}

/// Entries of `updated` whose rendered value differs from `current`.
///
/// # Examples
///
/// ```
/// use odie_cli::ui::changed_fields;
/// use odie_core::{Fields, Record, Value};
///
/// let current = Record::new().with("id", 1).with("name", "HQ").with("site_id", 2);
/// let mut updated = Fields::new();
/// updated.insert("name".into(), Value::from("HQ"));
/// updated.insert("site_id".into(), Value::from("3"));
///
/// let changes = changed_fields(&current, &updated);
/// assert_eq!(changes.len(), 1);
/// assert_eq!(changes["site_id"], Value::from("3"));
/// ```
pub fn changed_fields(current: &Record, updated: &Fields) -> Fields {
    updated
        .iter()
        .filter(|(key, new)| {
            current
                .get(key.as_str())
                .is_none_or(|old| !old.same_as(new))
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
