//! Editor command line parsing.

use client_core::{EditableRecord, FormAction, FormState};
use shared::domain::FieldId;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  list                              show the menu
  add-beer                          append an empty beer
  remove-beer <beer>                remove a beer (later beers shift up)
  name <beer> <text>                rename a beer
  style <beer> [text]               set or clear a beer's style
  add-field <beer>                  append an empty field
  key <beer> <field> <text>         set a field's key
  value <beer> <field> <text>       set a field's value
  remove-field <beer> <field>       remove a field
  save                              write the whole menu to the server
  dismiss                           clear the last notice
  quit                              leave the editor
<beer> is a 0-based index. <field> is a 0-based position (up to 3 digits),
a field id, or an id prefix of 4 or more characters.";

const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    Help,
    List,
    Edit(FormAction),
    Save,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("'{0}' is not a beer index")]
    BadIndex(String),
    #[error("no field '{reference}' on beer {beer}")]
    NoSuchField { beer: usize, reference: String },
    #[error("field reference '{0}' is ambiguous")]
    AmbiguousField(String),
}

pub fn parse_command(line: &str, state: &FormState) -> Result<EditorCommand, CommandError> {
    let line = line.trim();
    let (verb, rest) = split_word(line);

    let command = match verb {
        "" | "list" | "ls" => EditorCommand::List,
        "help" | "?" => EditorCommand::Help,
        "save" => EditorCommand::Save,
        "quit" | "exit" => EditorCommand::Quit,
        "dismiss" => EditorCommand::Edit(FormAction::DismissNotice),
        "add-beer" => EditorCommand::Edit(FormAction::AddRecord),
        "remove-beer" => {
            let (beer, _) = beer_arg(rest, "remove-beer <beer>")?;
            EditorCommand::Edit(FormAction::RemoveRecord { record: beer })
        }
        "name" => {
            let (beer, text) = beer_arg(rest, "name <beer> <text>")?;
            EditorCommand::Edit(FormAction::SetName {
                record: beer,
                value: text.to_string(),
            })
        }
        "style" => {
            let (beer, text) = beer_arg(rest, "style <beer> [text]")?;
            let value = (!text.is_empty()).then(|| text.to_string());
            EditorCommand::Edit(FormAction::SetStyle {
                record: beer,
                value,
            })
        }
        "add-field" => {
            let (beer, _) = beer_arg(rest, "add-field <beer>")?;
            EditorCommand::Edit(FormAction::add_field(beer))
        }
        "key" | "value" | "remove-field" => {
            let usage = match verb {
                "key" => "key <beer> <field> <text>",
                "value" => "value <beer> <field> <text>",
                _ => "remove-field <beer> <field>",
            };
            let (beer, rest) = beer_arg(rest, usage)?;
            let (reference, text) = split_word(rest);
            if reference.is_empty() {
                return Err(CommandError::Usage(usage));
            }
            let field = resolve_field(state, beer, reference)?;
            let value = text.to_string();
            EditorCommand::Edit(match verb {
                "key" => FormAction::SetFieldKey {
                    record: beer,
                    field,
                    value,
                },
                "value" => FormAction::SetFieldValue {
                    record: beer,
                    field,
                    value,
                },
                _ => FormAction::RemoveField {
                    record: beer,
                    field,
                },
            })
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn beer_arg<'a>(input: &'a str, usage: &'static str) -> Result<(usize, &'a str), CommandError> {
    let (word, rest) = split_word(input);
    if word.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    let beer = word
        .parse::<usize>()
        .map_err(|_| CommandError::BadIndex(word.to_string()))?;
    Ok((beer, rest))
}

/// Resolves a position, full id, or id prefix to the field's id.
fn resolve_field(state: &FormState, beer: usize, reference: &str) -> Result<FieldId, CommandError> {
    let no_such_field = || CommandError::NoSuchField {
        beer,
        reference: reference.to_string(),
    };
    let record: &EditableRecord = state.record(beer).ok_or_else(no_such_field)?;

    // Short references are positions; longer ones are ids or id prefixes, even when all digits.
    if reference.len() < MIN_ID_PREFIX {
        return reference
            .parse::<usize>()
            .ok()
            .and_then(|position| record.fields.get(position))
            .map(|f| f.id)
            .ok_or_else(no_such_field);
    }
    if let Ok(id) = reference.parse::<FieldId>() {
        return record.field(id).map(|f| f.id).ok_or_else(no_such_field);
    }

    let needle = reference.to_ascii_lowercase();
    let mut matches = record
        .fields
        .iter()
        .filter(|f| f.id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(field), None) => Ok(field.id),
        (Some(_), Some(_)) => Err(CommandError::AmbiguousField(reference.to_string())),
        (None, _) => Err(no_such_field()),
    }
}
