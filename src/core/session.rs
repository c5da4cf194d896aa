// This module provides arena-based session management using the bumpalo crate to keep
// the lifetime story of a run simple. AnalysisSession owns a reference to the arena and
// collects everything a run produces: interned function names and one FunctionReport per
// analyzed function, all allocated in the arena and sharing the session lifetime. It also
// tracks SessionStats, the running totals (functions visited, declarations skipped,
// arguments, calls, blocks and instructions) printed by the driver's --stats summary.
// Interior mutability via RefCell lets passes record results through a shared reference.

//! Arena-based analysis session.
//!
//! All reports are tied to the session lifetime, so passes can hand out
//! `&'arena` references without any lifetime plumbing of their own.

use bumpalo::Bump;
use hashbrown::HashMap;
use std::cell::{Ref, RefCell};
use std::fmt;

/// Raw counts gathered for one function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionCounts {
    pub args: usize,
    pub calls: usize,
    pub blocks: usize,
    pub insts: usize,
}

/// Counts for a named function, allocated in the session arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionReport<'arena> {
    pub name: &'arena str,
    pub counts: FunctionCounts,
}

/// Arena-based analysis session.
pub struct AnalysisSession<'arena> {
    arena: &'arena Bump,
    stats: RefCell<SessionStats>,
    reports: RefCell<Vec<&'arena FunctionReport<'arena>>>,
    interned_strings: RefCell<HashMap<String, &'arena str>>,
    current_function: RefCell<Option<&'arena str>>,
}

impl<'arena> AnalysisSession<'arena> {
    /// Create a new session with the given arena.
    pub fn new(arena: &'arena Bump) -> Self {
        Self {
            arena,
            stats: RefCell::new(SessionStats::default()),
            reports: RefCell::new(Vec::new()),
            interned_strings: RefCell::new(HashMap::new()),
            current_function: RefCell::new(None),
        }
    }

    /// Get access to the arena allocator.
    pub fn arena(&self) -> &'arena Bump {
        self.arena
    }

    /// Intern a string in the arena.
    pub fn intern_str(&self, s: &str) -> &'arena str {
        let mut strings = self.interned_strings.borrow_mut();
        if let Some(&interned) = strings.get(s) {
            return interned;
        }

        let interned = self.arena.alloc_str(s);
        strings.insert(s.to_string(), interned);
        interned
    }

    /// Mark the start of a function visit.
    pub fn start_function(&self, name: &str) {
        let name = self.intern_str(name);
        *self.current_function.borrow_mut() = Some(name);
        self.stats.borrow_mut().functions_visited += 1;
    }

    /// Name of the function currently being visited.
    pub fn current_function(&self) -> Option<&'arena str> {
        *self.current_function.borrow()
    }

    /// Mark the end of a function visit.
    pub fn end_function(&self) {
        *self.current_function.borrow_mut() = None;
    }

    /// Record that a declaration was skipped.
    pub fn skip_declaration(&self) {
        self.stats.borrow_mut().declarations_skipped += 1;
    }

    /// Store the counts of a function and fold them into the totals.
    pub fn record_function(&self, name: &str, counts: FunctionCounts) -> &'arena FunctionReport<'arena> {
        let report: &'arena FunctionReport<'arena> = self.arena.alloc(FunctionReport {
            name: self.intern_str(name),
            counts,
        });

        let mut stats = self.stats.borrow_mut();
        stats.total_args += counts.args;
        stats.total_calls += counts.calls;
        stats.total_blocks += counts.blocks;
        stats.total_insts += counts.insts;
        drop(stats);

        self.reports.borrow_mut().push(report);
        report
    }

    /// Reports in the order functions were recorded.
    pub fn functions(&self) -> Ref<'_, [&'arena FunctionReport<'arena>]> {
        Ref::map(self.reports.borrow(), |reports| reports.as_slice())
    }

    /// Look up the report of a function by name.
    pub fn function(&self, name: &str) -> Option<&'arena FunctionReport<'arena>> {
        self.reports.borrow().iter().copied().find(|r| r.name == name)
    }

    /// Snapshot of the running totals.
    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }
}

/// Totals accumulated over a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub functions_visited: usize,
    pub declarations_skipped: usize,
    pub total_args: usize,
    pub total_calls: usize,
    pub total_blocks: usize,
    pub total_insts: usize,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session Statistics:")?;
        writeln!(f, "  Functions visited: {}", self.functions_visited)?;
        writeln!(f, "  Declarations skipped: {}", self.declarations_skipped)?;
        writeln!(f, "  Arguments: {}", self.total_args)?;
        writeln!(f, "  Calls: {}", self.total_calls)?;
        writeln!(f, "  Basic blocks: {}", self.total_blocks)?;
        write!(f, "  Instructions: {}", self.total_insts)
    }
}
