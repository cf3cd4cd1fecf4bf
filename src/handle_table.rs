//! Fixed-slot object table mapping opaque ids to per-object state.
//!
//! Ids encode the object type in the upper bits and a 16-bit serial in the
//! lower bits. The slot index is `serial % capacity`. A freed slot is reused
//! only under a new serial, so an id that outlives its object is rejected
//! instead of silently resolving to whatever took the slot next.

use std::fmt;

use crate::error::{OsalError, OsalResult};

const SERIAL_BITS: u32 = 16;
const SERIAL_MASK: u32 = (1 << SERIAL_BITS) - 1;

/// The kind of object an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// An open file stream.
    Stream,
}

impl ObjectType {
    const fn tag(self) -> u32 {
        match self {
            Self::Stream => 0x01,
        }
    }
}

/// Opaque identifier handed out by a [`HandleTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    fn new(object_type: ObjectType, serial: u32) -> Self {
        Self((object_type.tag() << SERIAL_BITS) | (serial & SERIAL_MASK))
    }

    /// Wraps a raw id value, e.g. one parsed from user input.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    fn serial(self) -> u32 {
        self.0 & SERIAL_MASK
    }

    fn type_tag(self) -> u32 {
        self.0 >> SERIAL_BITS
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

struct Slot<T> {
    id: ObjectId,
    record: T,
}

/// A fixed-capacity table of records addressed by [`ObjectId`].
pub struct HandleTable<T> {
    object_type: ObjectType,
    slots: Vec<Option<Slot<T>>>,
    last_serial: u32,
}

impl<T> HandleTable<T> {
    /// Creates a table with `capacity` slots for objects of `object_type`.
    ///
    /// # Errors
    ///
    /// Returns `OsalError::Error` if `capacity` is zero or does not fit in
    /// the serial space.
    pub fn with_capacity(object_type: ObjectType, capacity: usize) -> OsalResult<Self> {
        if capacity == 0 || capacity > SERIAL_MASK as usize {
            return Err(OsalError::Error);
        }
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Ok(Self { object_type, slots, last_serial: 0 })
    }

    /// Number of slots in the table.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of allocated slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns `true` if no slot is allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated ids, in slot order.
    #[must_use]
    pub fn ids(&self) -> Vec<ObjectId> {
        self.slots.iter().flatten().map(|s| s.id).collect()
    }

    /// Stores `record` in a free slot and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns `OsalError::NoFreeIds` if every slot is occupied.
    pub fn allocate(&mut self, record: T) -> OsalResult<ObjectId> {
        let mut serial = self.last_serial;
        for _ in 0..self.slots.len() {
            serial = self.next_serial(serial);
            let index = self.index_of(serial);
            if self.slots[index].is_none() {
                let id = ObjectId::new(self.object_type, serial);
                self.slots[index] = Some(Slot { id, record });
                self.last_serial = serial;
                return Ok(id);
            }
        }
        Err(OsalError::NoFreeIds)
    }

    /// Returns the record for `id`.
    ///
    /// # Errors
    ///
    /// Returns `OsalError::InvalidId` if the id is not currently allocated.
    pub fn get(&self, id: ObjectId) -> OsalResult<&T> {
        let index = self.checked_index(id)?;
        match &self.slots[index] {
            Some(slot) if slot.id == id => Ok(&slot.record),
            _ => Err(OsalError::InvalidId),
        }
    }

    /// Returns the record for `id` mutably.
    ///
    /// # Errors
    ///
    /// Returns `OsalError::InvalidId` if the id is not currently allocated.
    pub fn get_mut(&mut self, id: ObjectId) -> OsalResult<&mut T> {
        let index = self.checked_index(id)?;
        match &mut self.slots[index] {
            Some(slot) if slot.id == id => Ok(&mut slot.record),
            _ => Err(OsalError::InvalidId),
        }
    }

    /// Frees the slot for `id` and returns its record.
    ///
    /// # Errors
    ///
    /// Returns `OsalError::InvalidId` if the id is not currently allocated,
    /// including a second release of the same id.
    pub fn release(&mut self, id: ObjectId) -> OsalResult<T> {
        let index = self.checked_index(id)?;
        match self.slots[index].take() {
            Some(slot) if slot.id == id => Ok(slot.record),
            other => {
                self.slots[index] = other;
                Err(OsalError::InvalidId)
            }
        }
    }

    fn checked_index(&self, id: ObjectId) -> OsalResult<usize> {
        if id.type_tag() != self.object_type.tag() || id.serial() == 0 {
            return Err(OsalError::InvalidId);
        }
        Ok(self.index_of(id.serial()))
    }

    fn index_of(&self, serial: u32) -> usize {
        serial as usize % self.slots.len()
    }

    /// Serial after `serial` whose slot index is one past the previous one.
    ///
    /// On wrap the walk resumes at the smallest nonzero serial with that
    /// index, so `capacity` successive candidates visit every slot once.
    fn next_serial(&self, serial: u32) -> u32 {
        if serial < SERIAL_MASK {
            return serial + 1;
        }
        let capacity = self.slots.len();
        let index = (serial as usize + 1) % capacity;
        let wrapped = if index == 0 { capacity } else { index };
        u32::try_from(wrapped).unwrap_or(1)
    }
}
