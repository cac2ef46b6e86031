//! # Buffer State Module
//!
//! This module provides a centralized system for managing GPU buffers.
//! It handles buffer creation, writing, removal and analytics so GPU memory use
//! can be inspected at runtime.
//!
//! ## Architecture
//!
//! The `BufferState` struct serves as a registry for all GPU buffers used by the renderer.
//! Buffers are referenced by name (static string). Replacing a buffer under an existing
//! name drops the old one.

use std::collections::{hash_map::Entry, HashMap};

use log::{debug, error};
use wgpu::{util::DeviceExt, Buffer, Device, Queue};

/// Analytics data for a GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// Actual memory used in the buffer in bytes (based on writes)
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
}

impl BufferAnalytics {
    /// Checks a write of `data_size` bytes at `offset` and records it.
    ///
    /// Returns `false` without recording anything if the write would overrun the buffer.
    fn record_write(&mut self, offset: u64, data_size: u64) -> bool {
        if offset + data_size > self.allocated_memory {
            return false;
        }
        self.used_memory = self.used_memory.max(offset + data_size);
        self.times_written += 1;
        true
    }
}

/// Central manager for GPU buffers
///
/// # Examples
///
/// ```ignore
/// let mut buffer_state = BufferState::new(device, queue);
///
/// buffer_state.create_buffer_init(
///     "vertex_buffer",
///     wgpu::util::BufferInitDescriptor {
///         label: Some("Vertex Buffer"),
///         contents: bytemuck::cast_slice(&vertices),
///         usage: wgpu::BufferUsages::VERTEX,
///     },
/// );
///
/// let vertex_buffer = buffer_state.get_buffer("vertex_buffer");
/// ```
pub struct BufferState {
    device: Device,
    queue: Queue,
    buffers: HashMap<&'static str, Buffer>,
    buffer_analytics: HashMap<&'static str, BufferAnalytics>,
}

impl BufferState {
    pub fn new(device: Device, queue: Queue) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            buffer_analytics: HashMap::new(),
        }
    }

    /// Creates a buffer and initializes it with data
    pub fn create_buffer_init(
        &mut self,
        buffer_name: &'static str,
        init_descriptor: wgpu::util::BufferInitDescriptor,
    ) -> &Buffer {
        let buffer_analytics = BufferAnalytics {
            allocated_memory: init_descriptor.contents.len() as u64,
            used_memory: init_descriptor.contents.len() as u64,
            times_written: 1,
        };
        let buffer = self.device.create_buffer_init(&init_descriptor);
        self.buffer_analytics.insert(buffer_name, buffer_analytics);

        match self.buffers.entry(buffer_name) {
            Entry::Occupied(mut entry) => {
                debug!("Replaced buffer '{}'", buffer_name);
                entry.insert(buffer);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(buffer),
        }
    }

    /// Writes raw byte data to a buffer
    ///
    /// Writes to unknown buffers or past the end of a buffer are logged and dropped.
    /// Returns whether the write was queued.
    pub fn write_buffer(
        &mut self,
        buffer_name: &'static str,
        offset: wgpu::BufferAddress,
        data: &[u8],
    ) -> bool {
        let (Some(buffer), Some(buffer_analytics)) = (
            self.buffers.get(buffer_name),
            self.buffer_analytics.get_mut(buffer_name),
        ) else {
            error!("Write to unknown buffer '{}'", buffer_name);
            return false;
        };

        if !buffer_analytics.record_write(offset, data.len() as u64) {
            error!(
                "Buffer write out of bounds for buffer name '{}'",
                buffer_name
            );
            return false;
        }

        self.queue.write_buffer(buffer, offset, data);
        true
    }

    /// Drops a buffer. Returns whether it existed.
    pub fn remove_buffer(&mut self, buffer_name: &'static str) -> bool {
        self.buffer_analytics.remove(buffer_name);
        self.buffers.remove(buffer_name).is_some()
    }

    /// Gets a reference to a buffer by name
    pub fn get_buffer(&self, buffer_name: &'static str) -> Option<&Buffer> {
        self.buffers.get(buffer_name)
    }

    /// Gets the total allocated memory across all buffers
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .map(|analytics| analytics.allocated_memory)
            .sum()
    }

    /// Gets the total used memory across all buffers
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .map(|analytics| analytics.used_memory)
            .sum()
    }
}
