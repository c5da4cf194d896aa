//! Pass registry.
//!
//! Passes are registered under their command-line argument together with a
//! constructor, so drivers can build a pipeline from `--pass` flags.

use crate::core::adaptor::IrAdaptor;
use crate::core::error::{AnalysisError, AnalysisResult};
use crate::core::pass::{FunctionPass, PassInfo, PassOptions};
use crate::passes::FunctionInfo;
use hashbrown::HashMap;

/// Constructor for a registered pass.
pub type PassCtor<A> = fn(&PassOptions) -> Box<dyn FunctionPass<A>>;

struct Entry<A: IrAdaptor> {
    info: PassInfo,
    ctor: PassCtor<A>,
}

/// Registered passes keyed by argument.
pub struct PassRegistry<A: IrAdaptor> {
    entries: HashMap<&'static str, Entry<A>>,
}

impl<A: IrAdaptor> PassRegistry<A> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry with every pass shipped by this crate.
    pub fn with_builtin_passes() -> Self {
        let mut registry = Self::new();
        registry.entries.insert(
            FunctionInfo::INFO.arg,
            Entry { info: FunctionInfo::INFO, ctor: FunctionInfo::boxed::<A> },
        );
        registry
    }

    pub fn register(&mut self, info: PassInfo, ctor: PassCtor<A>) -> AnalysisResult<()> {
        if self.entries.contains_key(info.arg) {
            return Err(AnalysisError::DuplicatePass {
                name: info.arg.to_string(),
            });
        }
        log::trace!("Registered pass '{}' ({})", info.arg, info.name);
        self.entries.insert(info.arg, Entry { info, ctor });
        Ok(())
    }

    /// Instantiate the pass registered under `arg`.
    pub fn create(&self, arg: &str, options: &PassOptions) -> AnalysisResult<Box<dyn FunctionPass<A>>> {
        self.entries
            .get(arg)
            .map(|entry| (entry.ctor)(options))
            .ok_or_else(|| AnalysisError::UnknownPass {
                name: arg.to_string(),
            })
    }

    pub fn info(&self, arg: &str) -> Option<PassInfo> {
        self.entries.get(arg).map(|entry| entry.info)
    }

    /// All registered passes, sorted by argument.
    pub fn infos(&self) -> Vec<PassInfo> {
        let mut infos: Vec<_> = self.entries.values().map(|entry| entry.info).collect();
        infos.sort_by_key(|info| info.arg);
        infos
    }
}

impl<A: IrAdaptor> Default for PassRegistry<A> {
    fn default() -> Self {
        Self::with_builtin_passes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_ir::TestIRAdaptor;

    type Registry = PassRegistry<TestIRAdaptor<'static>>;

    #[test]
    fn test_builtin_function_info() {
        let registry = Registry::with_builtin_passes();
        let info = registry.info("function-info").unwrap();
        assert_eq!(info.name, "CSE521: Function Information");
        assert!(!info.cfg_only);
        assert!(!info.is_analysis);

        let pass = registry.create("function-info", &PassOptions::default()).unwrap();
        assert_eq!(pass.info(), info);
    }

    #[test]
    fn test_unknown_pass() {
        let registry = Registry::with_builtin_passes();
        let err = registry.create("dce", &PassOptions::default()).err().unwrap();
        assert!(matches!(err, AnalysisError::UnknownPass { ref name } if name == "dce"));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = Registry::with_builtin_passes();
        let err = registry
            .register(FunctionInfo::INFO, FunctionInfo::boxed)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::DuplicatePass { .. }));
        assert_eq!(registry.infos().len(), 1);
    }
}
