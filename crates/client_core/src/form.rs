//! Local edit buffer for the beer menu.
//!
//! [`FormState`] is never mutated in place by callers: every edit goes through
//! [`FormState::reduce`], which returns the next state and leaves the previous
//! one untouched. Edits that point at a record index or field id that no longer
//! exists are silent no-ops, so a stale reference after a removal never fails.

use shared::domain::{BeerRecord, Collection, Field, FieldId};
use tracing::debug;

pub const SAVED_NOTICE: &str = "Data saved!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableField {
    pub id: FieldId,
    pub key: String,
    pub value: String,
}

impl EditableField {
    fn from_field(field: &Field) -> Self {
        Self {
            id: FieldId::generate(),
            key: field.key.clone(),
            value: field.value.clone(),
        }
    }

    fn to_field(&self) -> Field {
        Field::new(self.key.clone(), self.value.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableRecord {
    pub name: String,
    pub style: Option<String>,
    pub fields: Vec<EditableField>,
}

impl EditableRecord {
    fn from_record(record: &BeerRecord) -> Self {
        Self {
            name: record.name.clone(),
            style: record.style.clone(),
            fields: record.fields.iter().map(EditableField::from_field).collect(),
        }
    }

    fn to_record(&self) -> BeerRecord {
        BeerRecord {
            name: self.name.clone(),
            style: self.style.clone(),
            fields: self.fields.iter().map(EditableField::to_field).collect(),
        }
    }

    pub fn field(&self, id: FieldId) -> Option<&EditableField> {
        self.fields.iter().find(|f| f.id == id)
    }

    fn field_mut(&mut self, id: FieldId) -> Option<&mut EditableField> {
        self.fields.iter_mut().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved,
    SaveFailed(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Saved => SAVED_NOTICE.to_string(),
            Notice::SaveFailed(reason) => format!("Save failed: {reason}"),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::SaveFailed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SetName {
        record: usize,
        value: String,
    },
    SetStyle {
        record: usize,
        value: Option<String>,
    },
    SetFieldKey {
        record: usize,
        field: FieldId,
        value: String,
    },
    SetFieldValue {
        record: usize,
        field: FieldId,
        value: String,
    },
    RemoveField {
        record: usize,
        field: FieldId,
    },
    /// Carries the id of the new field so the reducer stays deterministic;
    /// use [`FormAction::add_field`] to mint one.
    AddField {
        record: usize,
        field: FieldId,
    },
    AddRecord,
    RemoveRecord {
        record: usize,
    },
    SaveSucceeded,
    SaveFailed(String),
    DismissNotice,
}

impl FormAction {
    pub fn add_field(record: usize) -> Self {
        FormAction::AddField {
            record,
            field: FieldId::generate(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FormAction::SetName { .. } => "set_name",
            FormAction::SetStyle { .. } => "set_style",
            FormAction::SetFieldKey { .. } => "set_field_key",
            FormAction::SetFieldValue { .. } => "set_field_value",
            FormAction::RemoveField { .. } => "remove_field",
            FormAction::AddField { .. } => "add_field",
            FormAction::AddRecord => "add_record",
            FormAction::RemoveRecord { .. } => "remove_record",
            FormAction::SaveSucceeded => "save_succeeded",
            FormAction::SaveFailed(_) => "save_failed",
            FormAction::DismissNotice => "dismiss_notice",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    records: Vec<EditableRecord>,
    saving: bool,
    notice: Option<Notice>,
}

impl FormState {
    /// Builds the edit buffer, giving every field a fresh session id.
    pub fn from_collection(collection: &Collection) -> Self {
        Self {
            records: collection.iter().map(EditableRecord::from_record).collect(),
            saving: false,
            notice: None,
        }
    }

    pub fn records(&self) -> &[EditableRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&EditableRecord> {
        self.records.get(index)
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn reduce(&self, action: FormAction) -> Self {
        let mut next = self.clone();
        let name = action.name();
        if !next.apply(action) {
            debug!(action = name, "form action had no target; ignored");
        }
        next
    }

    /// The collection to persist, with all session ids stripped.
    pub fn payload(&self) -> Collection {
        self.records.iter().map(EditableRecord::to_record).collect()
    }

    /// Returns `None` while a save is already in flight.
    pub fn begin_save(&self) -> Option<(Self, Collection)> {
        if self.saving {
            return None;
        }
        let mut next = self.clone();
        next.saving = true;
        Some((next, self.payload()))
    }

    fn apply(&mut self, action: FormAction) -> bool {
        match action {
            FormAction::SetName { record, value } => self.with_record(record, |r| r.name = value),
            FormAction::SetStyle { record, value } => {
                self.with_record(record, |r| r.style = value)
            }
            FormAction::SetFieldKey {
                record,
                field,
                value,
            } => self.with_field(record, field, |f| f.key = value),
            FormAction::SetFieldValue {
                record,
                field,
                value,
            } => self.with_field(record, field, |f| f.value = value),
            FormAction::RemoveField { record, field } => {
                let Some(r) = self.records.get_mut(record) else {
                    return false;
                };
                let before = r.fields.len();
                r.fields.retain(|f| f.id != field);
                r.fields.len() != before
            }
            FormAction::AddField { record, field } => self.with_record(record, |r| {
                r.fields.push(EditableField {
                    id: field,
                    key: String::new(),
                    value: String::new(),
                })
            }),
            FormAction::AddRecord => {
                self.records.push(EditableRecord::default());
                true
            }
            FormAction::RemoveRecord { record } => {
                if record >= self.records.len() {
                    return false;
                }
                self.records.remove(record);
                true
            }
            FormAction::SaveSucceeded => {
                self.saving = false;
                self.notice = Some(Notice::Saved);
                true
            }
            FormAction::SaveFailed(reason) => {
                self.saving = false;
                self.notice = Some(Notice::SaveFailed(reason));
                true
            }
            FormAction::DismissNotice => self.notice.take().is_some(),
        }
    }

    fn with_record(&mut self, index: usize, edit: impl FnOnce(&mut EditableRecord)) -> bool {
        match self.records.get_mut(index) {
            Some(record) => {
                edit(record);
                true
            }
            None => false,
        }
    }

    fn with_field(
        &mut self,
        index: usize,
        id: FieldId,
        edit: impl FnOnce(&mut EditableField),
    ) -> bool {
        match self.records.get_mut(index).and_then(|r| r.field_mut(id)) {
            Some(field) => {
                edit(field);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
