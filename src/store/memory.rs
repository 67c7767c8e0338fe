//! In-process store

use super::{check_value_length, AttrStore};
use crate::attr_value::AttrValue;
use crate::catalog::{validate_slug, Attribute, Choice, NewAttribute, NewChoice, NewUnit, Unit};
use crate::error::StoreError;
use crate::schema::AttrValueType;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    units: BTreeMap<i64, Unit>,
    attributes: BTreeMap<i64, Attribute>,
    choices: BTreeMap<i64, Choice>,
    /// Keyed by qualified table name, then `(attribute_id, object_id)`
    tables: HashMap<String, BTreeMap<(i64, i64), AttrValue>>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn table(
        &mut self,
        ty: &AttrValueType,
    ) -> Result<&mut BTreeMap<(i64, i64), AttrValue>, StoreError> {
        let name = ty.qualified_table_name();
        self.tables
            .get_mut(&name)
            .ok_or(StoreError::UnknownAttrTable(name))
    }
}

/// Store keeping everything in memory behind one mutex
///
/// Ids are assigned from a single increasing counter shared by all entities.
/// Every operation holds the lock for its whole duration, so get-or-create is
/// atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Operations never leave the maps half-updated, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AttrStore for MemoryStore {
    fn install(&self, ty: &AttrValueType) -> Result<(), StoreError> {
        self.lock()
            .tables
            .entry(ty.qualified_table_name())
            .or_default();
        Ok(())
    }

    fn create_unit(&self, unit: NewUnit) -> Result<Unit, StoreError> {
        let mut inner = self.lock();
        let id = inner.next_id();
        let unit = unit.into_unit(id);
        inner.units.insert(id, unit.clone());
        Ok(unit)
    }

    fn get_unit(&self, id: i64) -> Result<Unit, StoreError> {
        self.lock()
            .units
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("unit", id))
    }

    fn units(&self) -> Result<Vec<Unit>, StoreError> {
        Ok(self.lock().units.values().cloned().collect())
    }

    fn delete_unit(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner
            .units
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("unit", id))?;
        for attribute in inner.attributes.values_mut() {
            if attribute.unit_id == Some(id) {
                attribute.unit_id = None;
            }
        }
        Ok(())
    }

    fn create_attribute(&self, attribute: NewAttribute) -> Result<Attribute, StoreError> {
        validate_slug(&attribute.slug)?;
        let mut inner = self.lock();
        if inner.attributes.values().any(|a| a.slug == attribute.slug) {
            return Err(StoreError::DuplicateSlug(attribute.slug));
        }
        if let Some(unit_id) = attribute.unit_id {
            if !inner.units.contains_key(&unit_id) {
                return Err(StoreError::not_found("unit", unit_id));
            }
        }
        let id = inner.next_id();
        let attribute = attribute.into_attribute(id);
        inner.attributes.insert(id, attribute.clone());
        Ok(attribute)
    }

    fn get_attribute(&self, id: i64) -> Result<Attribute, StoreError> {
        self.lock()
            .attributes
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("attribute", id))
    }

    fn get_attribute_by_slug(&self, slug: &str) -> Result<Option<Attribute>, StoreError> {
        Ok(self
            .lock()
            .attributes
            .values()
            .find(|a| a.slug == slug)
            .cloned())
    }

    fn attributes(&self) -> Result<Vec<Attribute>, StoreError> {
        Ok(self.lock().attributes.values().cloned().collect())
    }

    fn delete_attribute(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner
            .attributes
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("attribute", id))?;
        inner.choices.retain(|_, c| c.attribute_id != id);
        for table in inner.tables.values_mut() {
            table.retain(|(attribute_id, _), _| *attribute_id != id);
        }
        Ok(())
    }

    fn create_choice(&self, choice: NewChoice) -> Result<Choice, StoreError> {
        let mut inner = self.lock();
        if !inner.attributes.contains_key(&choice.attribute_id) {
            return Err(StoreError::not_found("attribute", choice.attribute_id));
        }
        let id = inner.next_id();
        let choice = choice.into_choice(id);
        inner.choices.insert(id, choice.clone());
        Ok(choice)
    }

    fn get_choice(&self, id: i64) -> Result<Choice, StoreError> {
        self.lock()
            .choices
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("choice", id))
    }

    fn choices_for(&self, attribute_id: i64) -> Result<Vec<Choice>, StoreError> {
        let mut choices: Vec<Choice> = self
            .lock()
            .choices
            .values()
            .filter(|c| c.attribute_id == attribute_id)
            .cloned()
            .collect();
        choices.sort_by(Choice::canonical_cmp);
        Ok(choices)
    }

    fn delete_choice(&self, id: i64) -> Result<(), StoreError> {
        self.lock()
            .choices
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("choice", id))
    }

    fn get_or_create_value(
        &self,
        ty: &AttrValueType,
        attribute_id: i64,
        object_id: i64,
    ) -> Result<AttrValue, StoreError> {
        let mut inner = self.lock();
        if !inner.attributes.contains_key(&attribute_id) {
            return Err(StoreError::not_found("attribute", attribute_id));
        }
        if let Some(row) = inner.table(ty)?.get(&(attribute_id, object_id)) {
            return Ok(row.clone());
        }
        let id = inner.next_id();
        let row = AttrValue {
            id,
            attribute_id,
            object_id,
            value: String::new(),
        };
        inner.table(ty)?.insert((attribute_id, object_id), row.clone());
        Ok(row)
    }

    fn set_value(
        &self,
        ty: &AttrValueType,
        attribute_id: i64,
        object_id: i64,
        value: &str,
    ) -> Result<AttrValue, StoreError> {
        #[cfg(feature = "tracing")]
        let _span = crate::tracing_helpers::store_op_span("set_value", ty.table_name()).entered();

        check_value_length(value)?;
        let mut inner = self.lock();
        if !inner.attributes.contains_key(&attribute_id) {
            return Err(StoreError::not_found("attribute", attribute_id));
        }
        let id = inner.next_id();
        let row = inner
            .table(ty)?
            .entry((attribute_id, object_id))
            .or_insert_with(|| AttrValue {
                id,
                attribute_id,
                object_id,
                value: String::new(),
            });
        row.value = value.to_string();
        Ok(row.clone())
    }

    fn get_value(
        &self,
        ty: &AttrValueType,
        attribute_id: i64,
        object_id: i64,
    ) -> Result<Option<AttrValue>, StoreError> {
        Ok(self
            .lock()
            .table(ty)?
            .get(&(attribute_id, object_id))
            .cloned())
    }

    fn values_for(&self, ty: &AttrValueType, object_id: i64) -> Result<Vec<AttrValue>, StoreError> {
        Ok(self
            .lock()
            .table(ty)?
            .values()
            .filter(|row| row.object_id == object_id)
            .cloned()
            .collect())
    }

    fn delete_value(
        &self,
        ty: &AttrValueType,
        attribute_id: i64,
        object_id: i64,
    ) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .table(ty)?
            .remove(&(attribute_id, object_id))
            .is_some())
    }

    fn delete_values_for_object(
        &self,
        ty: &AttrValueType,
        object_id: i64,
    ) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let table = inner.table(ty)?;
        let before = table.len();
        table.retain(|(_, object), _| *object != object_id);
        Ok((before - table.len()) as u64)
    }
}
