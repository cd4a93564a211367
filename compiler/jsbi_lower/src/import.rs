//! Library import injection.

use jsbi_ir::{NodeArena, NodeId, NodeKind};

use crate::config::LibraryNames;

/// Prepends `import Lib from "source";` to a unit, at most once per run.
///
/// The import goes in whether or not anything is rewritten later.
#[derive(Debug, Default)]
pub struct ImportInjector {
    inserted: bool,
}

impl ImportInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inserted(&self) -> bool {
        self.inserted
    }

    /// Insert the import at the top of `root`'s body.
    ///
    /// Returns the new statement, or `None` if this injector already ran or
    /// `root` is not a program.
    pub(crate) fn inject(
        &mut self,
        arena: &mut NodeArena,
        root: NodeId,
        names: &LibraryNames,
    ) -> Option<NodeId> {
        if self.inserted {
            return None;
        }
        let NodeKind::Program { body } = *arena.kind(root) else {
            return None;
        };
        let import = arena.alloc_kind(
            NodeKind::ImportDefault {
                local: names.library,
                source: names.import_source,
            },
            arena.span(root),
        );
        let body = arena.prepend_to_list(body, import);
        arena.replace(root, NodeKind::Program { body });
        self.inserted = true;
        Some(import)
    }
}
