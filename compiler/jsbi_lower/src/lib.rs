//! Big-integer lowering.
//!
//! Rewrites native big-integer arithmetic into calls against the JSBI
//! library, for runtimes without native big-integer support:
//!
//! ```text
//! let a = 2n;              import JSBI from "jsbi/dist/jsbi.mjs";
//! let b = a * 3n;    →     let a = JSBI.BigInt("2");
//! b -= 1n;                 let b = JSBI.multiply(a, JSBI.BigInt("3"));
//!                          b = JSBI.subtract(b, JSBI.BigInt("1"));
//! ```
//!
//! # Components
//!
//! - [`classify`]: decides whether a node's value is a big integer, from its
//!   shape, recorded facts and binding resolution
//! - [`rewrite`]: the single-pass engine that replaces big-integer nodes with
//!   library calls and records facts for later nodes
//! - [`import`]: puts the library import at the top of the unit
//!
//! The analysis is local and syntactic. Values that only become big integers
//! through calls to unanalyzed functions are left alone, and the constructor
//! and math namespace are recognised by name even when shadowed.
//!
//! # Units
//!
//! All state (facts, scopes, the import marker) belongs to one unit and is
//! dropped with its [`LowerOutcome`]. Independent units can be lowered in
//! parallel with [`lower_batch`].

pub mod classify;
mod config;
pub mod facts;
pub mod import;
pub mod ops;
pub mod rewrite;

use std::sync::Once;

use jsbi_ir::{NodeArena, NodeId, NodeKind, ScopeTree, StringInterner};
use rayon::prelude::*;

pub use classify::Classifier;
pub use config::{LowerConfig, DEFAULT_IMPORT_SOURCE, DEFAULT_LIBRARY};
pub use facts::{FactFlags, FactStore};
pub use import::ImportInjector;
pub use rewrite::{Flow, RewriteStats, Rewriter, Rule};

/// Errors for trees that break the entry-point contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    /// Root id is not allocated in the arena.
    #[error("root {0:?} is not a node of this arena")]
    InvalidRoot(NodeId),

    /// Root node is not a program.
    #[error("expected a program at the root, found {found}")]
    NotAProgram { found: &'static str },
}

/// Result type for lowering operations.
pub type Result<T> = std::result::Result<T, LowerError>;

/// Result of lowering one unit.
#[derive(Debug)]
pub struct LowerOutcome {
    /// The injected import statement.
    pub import: NodeId,
    pub facts: FactStore,
    pub scopes: ScopeTree,
    pub stats: RewriteStats,
}

/// Lower one unit in place.
///
/// # Errors
///
/// Returns an error if `root` is not a program node of `arena`. The tree is
/// untouched in that case.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = arena.len()))]
pub fn lower_module(
    arena: &mut NodeArena,
    root: NodeId,
    interner: &StringInterner,
    config: &LowerConfig,
) -> Result<LowerOutcome> {
    if !arena.contains(root) {
        return Err(LowerError::InvalidRoot(root));
    }
    let root_kind = arena.kind(root);
    if !matches!(root_kind, NodeKind::Program { .. }) {
        return Err(LowerError::NotAProgram {
            found: root_kind.label(),
        });
    }

    let scopes = ScopeTree::build(arena, root);
    let names = config::LibraryNames::intern(config, interner);
    let mut injector = ImportInjector::new();
    let import = injector
        .inject(arena, root, &names)
        .ok_or(LowerError::InvalidRoot(root))?;

    let mut rewriter =
        Rewriter::with_names(arena, interner, scopes, names, config.math_affordance);
    rewriter.rewrite_subtree(root);
    let (facts, scopes, stats) = rewriter.finish();

    tracing::debug!(
        rewrites = stats.total(),
        literals = stats.literals,
        binary = stats.binary,
        compound = stats.compound_assignments,
        tainted_bindings = facts.tainted_binding_count(),
        "lowered unit"
    );

    Ok(LowerOutcome {
        import,
        facts,
        scopes,
        stats,
    })
}

/// One independent unit: its own arena and root.
#[derive(Debug)]
pub struct Unit {
    pub arena: NodeArena,
    pub root: NodeId,
}

impl Unit {
    pub fn new(arena: NodeArena, root: NodeId) -> Self {
        Unit { arena, root }
    }
}

/// Lower many units in parallel.
///
/// Units share nothing but the interner. Results come back in input order.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn lower_batch(
    units: &mut [Unit],
    interner: &StringInterner,
    config: &LowerConfig,
) -> Vec<Result<LowerOutcome>> {
    units
        .par_iter_mut()
        .map(|unit| lower_module(&mut unit.arena, unit.root, interner, config))
        .collect()
}

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber if `RUST_LOG` is set.
///
/// Safe to call repeatedly; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .try_init();
        }
    });
}
