//! Ordered entity arena with generational handles
//!
//! Entities keep their insertion order for update and draw passes. Removal
//! during a pass is deferred: handles are queued and the slots are only
//! freed by [`Arena::flush_removals`], so a pass never sees its own
//! collection shift underneath it.

/// Stable reference to an arena entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

/// What an entity wants after its update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Expired,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Live slot indices in insertion order
    order: Vec<u32>,
    free: Vec<u32>,
    pending: Vec<Handle>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            order: Vec::new(),
            free: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Append an entity; it is last in iteration order
    pub fn insert(&mut self, value: T) -> Handle {
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize].value = Some(value);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.order.push(index);
        Handle {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live entities (pending removals still count)
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.order.iter().filter_map(move |&index| {
            let slot = &self.slots[index as usize];
            slot.value.as_ref().map(|value| {
                (
                    Handle {
                        index,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    /// Queue an entity for removal at the next flush
    pub fn mark_for_removal(&mut self, handle: Handle) {
        if self.contains(handle) && !self.pending.contains(&handle) {
            self.pending.push(handle);
        }
    }

    /// Free every queued entity. Returns how many were removed.
    pub fn flush_removals(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        let mut removed = 0;
        for handle in std::mem::take(&mut self.pending) {
            let slot = &mut self.slots[handle.index as usize];
            if slot.generation != handle.generation || slot.value.is_none() {
                continue;
            }
            slot.value = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(handle.index);
            self.order.retain(|&i| i != handle.index);
            removed += 1;
        }
        removed
    }

    /// Run `f` over every entity in order, then drop the ones that expired
    pub fn update_each(&mut self, mut f: impl FnMut(&mut T) -> Lifecycle) -> usize {
        for pos in 0..self.order.len() {
            let index = self.order[pos];
            let slot = &mut self.slots[index as usize];
            let generation = slot.generation;
            let expired = slot
                .value
                .as_mut()
                .is_some_and(|value| f(value) == Lifecycle::Expired);
            if expired {
                self.mark_for_removal(Handle { index, generation });
            }
        }
        self.flush_removals()
    }
}
