//! Flatten address-space / memory-segment hierarchies into display rows.
//!
//! Rules per address space, in document order:
//! - no child segments: the space itself is emitted as a leaf row;
//! - exactly one child: only the child is emitted, the wrapper is elided;
//! - two or more children: an aggregate row for the space, then every child.

use tracing::{debug, warn};

use crate::model::{MemorySegment, SegmentAccess};

/// Address space as declared by a per-device document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressSpace {
    pub id: String,
    pub name: String,
    pub start: u64,
    pub size: u64,
    /// Type tag used when the space is emitted as a leaf.
    pub kind: String,
    pub segments: Vec<SegmentDecl>,
}

/// Memory segment nested in an address space.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SegmentDecl {
    pub name: String,
    pub start: u64,
    pub size: u64,
    pub page_size: Option<u64>,
    pub kind: String,
    pub access: SegmentAccess,
}

/// Parent/child invariant violation. Reported, never corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentViolation {
    EmptySegment {
        segment: String,
        parent: String,
    },
    StartsBeforeParent {
        segment: String,
        parent: String,
        start: u64,
        parent_start: u64,
    },
}

impl std::fmt::Display for SegmentViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentViolation::EmptySegment { segment, parent } => {
                write!(f, "segment {segment} in {parent} has zero size")
            }
            SegmentViolation::StartsBeforeParent {
                segment,
                parent,
                start,
                parent_start,
            } => write!(
                f,
                "segment {segment} starts at {start:#x}, before {parent} at {parent_start:#x}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciled {
    pub segments: Vec<MemorySegment>,
    pub violations: Vec<SegmentViolation>,
}

/// Check one child segment against its address space.
pub fn check_segment(space: &AddressSpace, segment: &SegmentDecl) -> Vec<SegmentViolation> {
    let mut violations = Vec::new();
    if segment.size == 0 {
        violations.push(SegmentViolation::EmptySegment {
            segment: segment.name.clone(),
            parent: space.id.clone(),
        });
    }
    if segment.start < space.start {
        violations.push(SegmentViolation::StartsBeforeParent {
            segment: segment.name.clone(),
            parent: space.id.clone(),
            start: segment.start,
            parent_start: space.start,
        });
    }
    violations
}

fn space_row(space: &AddressSpace, aggregate: bool) -> MemorySegment {
    MemorySegment {
        name: if space.name.is_empty() {
            space.id.clone()
        } else {
            space.name.clone()
        },
        start: space.start,
        size: space.size,
        page_size: None,
        kind: space.kind.clone(),
        access: SegmentAccess::empty(),
        parent: None,
        is_address_space: aggregate,
    }
}

fn child_row(space: &AddressSpace, segment: &SegmentDecl) -> MemorySegment {
    MemorySegment {
        name: segment.name.clone(),
        start: segment.start,
        size: segment.size,
        page_size: segment.page_size,
        kind: segment.kind.clone(),
        access: segment.access,
        parent: Some(space.id.clone()),
        is_address_space: false,
    }
}

/// Reconcile address spaces into an ordered segment list.
pub fn reconcile(spaces: &[AddressSpace]) -> Reconciled {
    let mut out = Reconciled::default();
    for space in spaces {
        for segment in &space.segments {
            for violation in check_segment(space, segment) {
                warn!(%violation, "memory segment invariant violated");
                out.violations.push(violation);
            }
        }
        match space.segments.as_slice() {
            [] => out.segments.push(space_row(space, false)),
            [only] => out.segments.push(child_row(space, only)),
            many => {
                out.segments.push(space_row(space, true));
                out.segments
                    .extend(many.iter().map(|segment| child_row(space, segment)));
            }
        }
        debug!(
            space = %space.id,
            children = space.segments.len(),
            "reconciled address space"
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(id: &str, start: u64, size: u64, children: &[(&str, u64, u64)]) -> AddressSpace {
        AddressSpace {
            id: id.into(),
            name: id.into(),
            start,
            size,
            kind: String::new(),
            segments: children
                .iter()
                .map(|(name, start, size)| SegmentDecl {
                    name: (*name).into(),
                    start: *start,
                    size: *size,
                    kind: "flash".into(),
                    ..SegmentDecl::default()
                })
                .collect(),
        }
    }

    #[test]
    fn childless_space_is_a_single_leaf() {
        let out = reconcile(&[space("io", 0, 0x40, &[])]);
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.segments[0].name, "io");
        assert!(!out.segments[0].is_address_space);
        assert!(out.segments[0].parent.is_none());
    }

    #[test]
    fn single_child_elides_wrapper() {
        let out = reconcile(&[space("prog", 0, 0x8000, &[("FLASH", 0, 0x8000)])]);
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.segments[0].name, "FLASH");
        assert_eq!(out.segments[0].parent.as_deref(), Some("prog"));
        assert!(out.violations.is_empty());
    }

    #[test]
    fn many_children_keep_document_order_after_aggregate() {
        let out = reconcile(&[
            space(
                "data",
                0,
                0x900,
                &[("REGISTERS", 0, 0x20), ("IO", 0x20, 0x40), ("IRAM", 0x100, 0x800)],
            ),
            space("eeprom", 0, 0x400, &[("EEPROM", 0, 0x400)]),
        ]);
        let names: Vec<_> = out.segments.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["data", "REGISTERS", "IO", "IRAM", "EEPROM"]);
        assert!(out.segments[0].is_address_space);
        assert!(out.segments[1..].iter().all(|s| !s.is_address_space));
    }

    #[test]
    fn row_counts_follow_child_counts() {
        for n in 0..5u64 {
            let children: Vec<(String, u64, u64)> =
                (0..n).map(|i| (format!("S{i}"), i * 16, 16)).collect();
            let refs: Vec<(&str, u64, u64)> = children
                .iter()
                .map(|(name, start, size)| (name.as_str(), *start, *size))
                .collect();
            let out = reconcile(&[space("s", 0, 0x100, &refs)]);
            let expected = if n < 2 { 1 } else { n as usize + 1 };
            assert_eq!(out.segments.len(), expected, "{n} children");
        }
    }

    #[test]
    fn violations_are_reported_not_corrected() {
        let out = reconcile(&[space("data", 0x100, 0x100, &[("LOW", 0x80, 0), ("OK", 0x100, 4)])]);
        assert_eq!(out.violations.len(), 2);
        assert!(matches!(out.violations[0], SegmentViolation::EmptySegment { .. }));
        assert!(matches!(
            out.violations[1],
            SegmentViolation::StartsBeforeParent { start: 0x80, parent_start: 0x100, .. }
        ));
        let low = out.segments.iter().find(|s| s.name == "LOW").expect("kept");
        assert_eq!((low.start, low.size), (0x80, 0));
    }
}
