//! Human-readable registry listing.
//!
//! Troubleshooting aid for image layout; the format carries no stability
//! guarantee.

use std::fmt::Write;

use crate::CodeTable;

/// Render the registry as a fixed-column listing, one method per line in
/// id order. Body-less methods show `----` in the offset column.
pub fn dump(table: &CodeTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:>6}  {:>5}  method", "id", "offset", "len");

    for record in table.records() {
        let offset = if record.has_body() {
            format!("{:04X}", record.offset().0)
        } else {
            "----".to_string()
        };
        let _ = writeln!(
            out,
            "{:>5}  {:>6}  {:>5}  {}",
            record.id().0,
            offset,
            record.len(),
            record.key()
        );
    }

    out
}
