//! Lowering configuration.

use jsbi_ir::{Name, StringInterner};

use crate::ops::LIBRARY_FACTORY;

/// Default namespace identifier of the library.
pub const DEFAULT_LIBRARY: &str = "JSBI";

/// Default module specifier of the injected import.
pub const DEFAULT_IMPORT_SOURCE: &str = "jsbi/dist/jsbi.mjs";

/// Configuration for one lowering run.
///
/// The defaults target the JSBI distribution build and the native
/// `BigInt`/`Math` globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerConfig {
    /// Namespace identifier every rewrite targets, bound by the injected import.
    pub library_ident: String,

    /// Module specifier of the injected import.
    pub import_source: String,

    /// Identifier recognised as the native big-integer constructor.
    pub ctor_name: String,

    /// Identifier recognised as the native math namespace.
    pub math_namespace: String,

    /// Rewrite member calls that receive big-integer arguments.
    pub math_affordance: bool,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            library_ident: DEFAULT_LIBRARY.to_owned(),
            import_source: DEFAULT_IMPORT_SOURCE.to_owned(),
            ctor_name: LIBRARY_FACTORY.to_owned(),
            math_namespace: "Math".to_owned(),
            math_affordance: true,
        }
    }
}

impl LowerConfig {
    /// Target a different library binding.
    pub fn with_library(ident: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            library_ident: ident.into(),
            import_source: source.into(),
            ..Default::default()
        }
    }

    /// Disable the member-call exit phase.
    #[must_use]
    pub fn without_math_affordance(mut self) -> Self {
        self.math_affordance = false;
        self
    }
}

/// Configuration names interned once per unit.
#[derive(Copy, Clone, Debug)]
pub(crate) struct LibraryNames {
    pub library: Name,
    pub import_source: Name,
    pub ctor: Name,
    pub factory: Name,
    pub math: Name,
}

impl LibraryNames {
    pub(crate) fn intern(config: &LowerConfig, interner: &StringInterner) -> Self {
        Self {
            library: interner.intern(&config.library_ident),
            import_source: interner.intern(&config.import_source),
            ctor: interner.intern(&config.ctor_name),
            factory: interner.intern(LIBRARY_FACTORY),
            math: interner.intern(&config.math_namespace),
        }
    }
}
