// pass.rs — Pass descriptor module: identifiers and static metadata
//
// Declares the verifier's four analysis passes, which diagnostic category
// each produces and whether it needs a backend description. Used by the
// orchestrator to decide what to run and by the CLI for verbose output.
//
// Passes are independent: none consumes another pass's output.

use crate::diag::Category;

// ── Pass identifiers ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassId {
    TypeSafety,
    NullSafety,
    Endpoint,
    Exhaustiveness,
}

// ── Pass descriptor ────────────────────────────────────────────────────────

/// Static metadata about a verification pass.
pub struct PassDescriptor {
    /// Human-readable name for verbose output.
    pub name: &'static str,
    /// Category of every diagnostic the pass emits.
    pub category: Category,
    /// Runs only when the caller supplied a backend.
    pub needs_backend: bool,
    /// Statement kinds the pass looks at, reported in verbose output.
    pub inspects: &'static str,
}

/// Return the static descriptor for a given pass.
pub fn descriptor(id: PassId) -> PassDescriptor {
    match id {
        PassId::TypeSafety => PassDescriptor {
            name: "type_safety",
            category: Category::TypeSafety,
            needs_backend: false,
            inspects: "add",
        },
        PassId::NullSafety => PassDescriptor {
            name: "null_safety",
            category: Category::NullSafety,
            needs_backend: false,
            inspects: "add, call, load, if, guard, raw",
        },
        PassId::Endpoint => PassDescriptor {
            name: "endpoint",
            category: Category::Endpoint,
            needs_backend: true,
            inspects: "call, load",
        },
        PassId::Exhaustiveness => PassDescriptor {
            name: "exhaustiveness",
            category: Category::Exhaustiveness,
            needs_backend: false,
            inspects: "show",
        },
    }
}

/// All passes in execution order.
pub const ALL_PASSES: [PassId; 4] = [
    PassId::TypeSafety,
    PassId::NullSafety,
    PassId::Endpoint,
    PassId::Exhaustiveness,
];

/// Passes to run, in order, given whether a backend was supplied.
pub fn applicable_passes(has_backend: bool) -> Vec<PassId> {
    ALL_PASSES
        .iter()
        .copied()
        .filter(|&id| has_backend || !descriptor(id).needs_backend)
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_backend_endpoint_pass_is_skipped() {
        assert_eq!(
            applicable_passes(false),
            vec![PassId::TypeSafety, PassId::NullSafety, PassId::Exhaustiveness]
        );
    }

    #[test]
    fn with_backend_all_passes_run_in_order() {
        assert_eq!(applicable_passes(true), ALL_PASSES.to_vec());
    }

    #[test]
    fn descriptors_name_inspected_statements() {
        assert_eq!(descriptor(PassId::TypeSafety).inspects, "add");
        assert!(descriptor(PassId::NullSafety).inspects.contains("raw"));
        assert!(descriptor(PassId::Exhaustiveness).inspects.contains("show"));
    }

    #[test]
    fn categories_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for pass in &ALL_PASSES {
            assert!(
                seen.insert(descriptor(*pass).category),
                "pass {:?} shares a category",
                pass
            );
        }
    }
}
