//! Native-method checksum accumulator.
//!
//! Folds each body-bearing method descriptor into a running CRC32, in
//! registration order. The firmware recomputes the same value over its
//! native stub table; a mismatch at deploy time means image and firmware
//! were built from different interface revisions.

use crc32fast::Hasher;
use nutshell_image::MethodDescriptor;

/// Running checksum over registered method descriptors.
#[derive(Clone, Default)]
pub struct NativeChecksum {
    hasher: Hasher,
}

impl std::fmt::Debug for NativeChecksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeChecksum")
            .field("value", &self.finish())
            .finish()
    }
}

impl NativeChecksum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one method in. Called exactly once per body-bearing method, in
    /// registration order, with the pre-translation descriptor (never the
    /// generated bytes, which depend on table indices).
    pub fn update(&mut self, method: &MethodDescriptor) {
        self.hasher.update(method.name.as_bytes());
        self.hasher.update(&method.flags.to_le_bytes());
        self.hasher.update(&method.locals.to_le_bytes());
        let op_count = method.body.as_ref().map_or(0, |b| b.len()) as u32;
        self.hasher.update(&op_count.to_le_bytes());
    }

    /// Current checksum value.
    pub fn finish(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}
