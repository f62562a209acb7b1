//! Accessor-keyed registry of per-instance attribute buffers.
//!
//! Each attribute is declared with an element size, the accessor it depends
//! on, and an update function. Invalidation is tracked per accessor: an
//! update pass recomputes only the attributes whose dependency changed and
//! reuses the rest, so a single changed input does not cost a full rebuild
//! every frame.

use std::collections::HashSet;

use bytemuck::Pod;

use crate::instances::BuildContext;

/// Dependency accessor names, as declared by the host's attribute
/// registration mechanism.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Accessor {
    Position,
    PositionsSquare,
    Size,
    Color,
    Icon,
}

impl Accessor {
    pub const ALL: [Accessor; 5] = [
        Accessor::Position,
        Accessor::PositionsSquare,
        Accessor::Size,
        Accessor::Color,
        Accessor::Icon,
    ];
}

/// One per-instance output buffer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeBuffer {
    data: Vec<u8>,
    element_size: usize,
    constant: bool,
}

impl AttributeBuffer {
    pub fn with_element_size(element_size: usize) -> Self {
        Self {
            data: Vec::new(),
            element_size,
            constant: false,
        }
    }

    /// Packed element bytes: one element per instance, or a single shared
    /// element when [`constant`](Self::is_constant).
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// A constant buffer holds one shared element that is uploaded once
    /// instead of once per instance.
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    pub fn element_count(&self) -> usize {
        if self.element_size == 0 {
            return 0;
        }
        self.data.len() / self.element_size
    }

    pub fn fill<T: Pod>(&mut self, values: &[T]) {
        debug_assert_eq!(size_of::<T>(), self.element_size);
        self.constant = false;
        self.data.clear();
        self.data.extend_from_slice(bytemuck::cast_slice(values));
    }

    pub fn fill_constant<T: Pod>(&mut self, value: T) {
        debug_assert_eq!(size_of::<T>(), self.element_size);
        self.constant = true;
        self.data.clear();
        self.data.extend_from_slice(bytemuck::bytes_of(&value));
    }

    /// Reads the buffer back as typed elements.
    pub fn as_slice<T: Pod>(&self) -> &[T] {
        bytemuck::cast_slice(&self.data)
    }
}

pub type UpdateFn = fn(&BuildContext, &mut AttributeBuffer);

#[derive(Debug)]
struct Registered {
    name: &'static str,
    accessor: Accessor,
    update: UpdateFn,
    buffer: AttributeBuffer,
}

#[derive(Debug, Default)]
pub struct AttributeManager {
    attributes: Vec<Registered>,
    dirty: HashSet<Accessor>,
}

impl AttributeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a per-instance attribute. Newly registered attributes are
    /// dirty until the first update pass.
    pub fn add_instanced(
        &mut self,
        name: &'static str,
        element_size: usize,
        accessor: Accessor,
        update: UpdateFn,
    ) {
        debug_assert!(self.attributes.iter().all(|a| a.name != name));
        self.dirty.insert(accessor);
        self.attributes.push(Registered {
            name,
            accessor,
            update,
            buffer: AttributeBuffer::with_element_size(element_size),
        });
    }

    /// Marks every attribute depending on `accessor` for recomputation.
    pub fn invalidate(&mut self, accessor: Accessor) {
        self.dirty.insert(accessor);
    }

    pub fn invalidate_all(&mut self) {
        self.dirty.extend(Accessor::ALL);
    }

    /// Recomputes the attributes whose accessor is dirty, reuses the rest.
    /// Returns how many were rebuilt.
    pub fn update(&mut self, context: &BuildContext) -> usize {
        let mut rebuilt = 0;
        for attribute in &mut self.attributes {
            if self.dirty.contains(&attribute.accessor) {
                (attribute.update)(context, &mut attribute.buffer);
                rebuilt += 1;
            }
        }
        self.dirty.clear();
        rebuilt
    }

    pub fn buffer(&self, name: &str) -> Option<&AttributeBuffer> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.buffer)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.iter().map(|a| a.name)
    }
}
