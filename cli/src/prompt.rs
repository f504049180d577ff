//! Collecting field values for create and edit.

use std::path::Path;

use odie_core::{Fields, Record, Value};

use crate::error::Result;
use crate::fields::FieldSpec;
use crate::ui::{ListScreen, Picked, Session, pick};
use crate::validators::Verdict;

/// Outcome of prompting for a whole record.
pub enum Prompted<'a> {
    Complete(Fields),
    /// The user backed out of a selection or declined a recovery.
    Aborted,
    /// A selection screen was left for another screen; the record is
    /// dropped and the caller should move there.
    Navigate(Box<ListScreen<'a>>),
}

/// Prompts for each field in order.
///
/// When `current` is given its values become the defaults, otherwise each
/// field's own default is used. Selection fields open a nested pick screen
/// and store the chosen row's id.
///
/// # Errors
///
/// Only terminal failures and store errors raised while opening a pick
/// screen are returned; everything the user can fix is retried or aborts.
pub fn prompt_fields<'a>(
    session: &mut Session<'a>,
    schema: &[FieldSpec],
    current: Option<&Record>,
) -> Result<Prompted<'a>> {
    let mut fields = Fields::new();

    for spec in schema {
        if let Some(table) = spec.selection {
            session
                .term
                .info(&format!("Choose the {} for this record.", spec.label))?;
            let id = match pick(session, table)? {
                Picked::Selected(record) => record.id(),
                Picked::Abandoned => None,
                Picked::Navigate(next) => return Ok(Prompted::Navigate(next)),
            };
            let Some(id) = id else {
                return Ok(Prompted::Aborted);
            };
            fields.insert(spec.key.to_string(), Value::Integer(id));
            continue;
        }

        let default = match current {
            Some(record) => record.get(spec.key).map(Value::to_string).unwrap_or_default(),
            None => spec.default.clone().unwrap_or_default(),
        };

        loop {
            let mut value = session.term.read_line(spec.label, &default)?;
            if spec.is_path && !default.is_empty() && !Path::new(&value).is_absolute() {
                value = Path::new(&default).join(&value).to_string_lossy().into_owned();
            }

            match spec.validator.validate(&value, session.term)? {
                Verdict::Accepted => {
                    fields.insert(spec.key.to_string(), Value::from(value));
                    break;
                }
                Verdict::Retry => continue,
                Verdict::Rejected => return Ok(Prompted::Aborted),
            }
        }
    }

    Ok(Prompted::Complete(fields))
}
