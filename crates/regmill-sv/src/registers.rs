//! Register-group statement accumulation and process-block rendering
//!
//! Earlier passes hand each named register group the assignment
//! statements it should carry; this module collects them and renders the
//! group's combinational and synchronous process blocks, including reset
//! priority chains and asynchronous-reset sensitivity terms.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{RegisterError, Result};
use crate::reset::ResetRegistry;
use crate::writer::StatementWriter;
use crate::SvOptions;

/// Accumulated statements for one clocked/combinational process pair
///
/// A group is identified by name and bound to one clock and capture edge
/// for its whole lifetime. Statement lists preserve insertion order;
/// reset statement lists are additionally keyed by reset signal in
/// first-use order, which fixes the order of the rendered reset branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterGroup {
    name: String,
    clock: String,
    use_neg_edge: bool,
    reset_assigns: IndexMap<String, Vec<String>>,
    reg_assigns: Vec<String>,
    combin_assigns: Vec<String>,
    low_prec_combin: Vec<String>,
    high_prec_combin: Vec<String>,
}

impl RegisterGroup {
    fn new(name: &str, clock: &str, use_neg_edge: bool) -> Self {
        Self {
            name: name.to_string(),
            clock: clock.to_string(),
            use_neg_edge,
            reset_assigns: IndexMap::new(),
            reg_assigns: Vec::new(),
            combin_assigns: Vec::new(),
            low_prec_combin: Vec::new(),
            high_prec_combin: Vec::new(),
        }
    }

    /// Name of this register group
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clock driving this group's synchronous block
    pub fn clock(&self) -> &str {
        &self.clock
    }

    /// Whether the synchronous block captures on the negative clock edge
    pub fn use_neg_edge(&self) -> bool {
        self.use_neg_edge
    }

    /// Verify that this group was created with the given clock and edge
    fn check_clock(&self, clock: &str, use_neg_edge: bool) -> Result<()> {
        if self.clock != clock || self.use_neg_edge != use_neg_edge {
            return Err(RegisterError::ClockMismatch {
                group: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Add a reset assignment statement for the given reset signal
    ///
    /// The signal must already be declared in `resets`. An empty registry
    /// and an unknown signal are reported as distinct errors so a module
    /// with no resets configured at all can be told apart from a typo in
    /// a reset name.
    pub fn add_reset_assign(
        &mut self,
        resets: &ResetRegistry,
        reset: &str,
        stmt: &str,
    ) -> Result<()> {
        if resets.is_empty() {
            return Err(RegisterError::NoResetsDeclared);
        }
        if !resets.contains(reset) {
            return Err(RegisterError::UndeclaredReset {
                reset: reset.to_string(),
            });
        }
        self.reset_assigns
            .entry(reset.to_string())
            .or_default()
            .push(stmt.to_string());
        Ok(())
    }

    /// Add a synchronous register assignment statement
    pub fn add_reg_assign(&mut self, stmt: &str) {
        self.reg_assigns.push(stmt.to_string());
    }

    /// Add a list of synchronous register assignment statements
    pub fn add_reg_assigns(&mut self, stmts: impl IntoIterator<Item = String>) {
        self.reg_assigns.extend(stmts);
    }

    /// Add a combinational assignment statement
    pub fn add_combin_assign(&mut self, stmt: &str) {
        self.combin_assigns.push(stmt.to_string());
    }

    /// Add a list of combinational assignment statements
    pub fn add_combin_assigns(&mut self, stmts: impl IntoIterator<Item = String>) {
        self.combin_assigns.extend(stmts);
    }

    /// Add a combinational assignment to one of the precedence tiers
    ///
    /// High-tier statements are rendered after everything else in the
    /// combinational block, so under last-assignment-wins semantics they
    /// override plain and low-tier assigns to the same target.
    pub fn add_prec_combin_assign(&mut self, high_precedence: bool, stmt: &str) {
        if high_precedence {
            self.high_prec_combin.push(stmt.to_string());
        } else {
            self.low_prec_combin.push(stmt.to_string());
        }
    }

    /// Render this group's process blocks
    ///
    /// Rendering reads but never mutates the accumulated state, so
    /// repeated calls produce identical output.
    pub fn emit(
        &self,
        resets: &ResetRegistry,
        out: &mut dyn StatementWriter,
        indent: usize,
        opts: &SvOptions,
    ) {
        log::trace!("rendering register group '{}'", self.name);
        self.emit_combin_block(out, indent, opts);
        self.emit_sync_block(resets, out, indent, opts);
    }

    fn emit_combin_block(&self, out: &mut dyn StatementWriter, indent: usize, opts: &SvOptions) {
        // Precedence-tier statements only render alongside plain
        // combinational assigns; a group holding nothing but tiered
        // statements emits no block.
        if self.combin_assigns.is_empty() {
            return;
        }
        out.write_stmt(
            indent,
            &format!("//------- combinational assigns for {}", self.name),
        );
        if opts.legacy_verilog {
            out.write_stmt(indent, "always @ (*) begin");
        } else {
            out.write_stmt(indent, "always_comb begin");
        }
        for stmt in &self.combin_assigns {
            out.write_stmt(indent + 1, stmt);
        }
        // Low tier before high tier: the last assignment to a target
        // wins, so high-priority statements must land last.
        for stmt in &self.low_prec_combin {
            out.write_stmt(indent + 1, stmt);
        }
        for stmt in &self.high_prec_combin {
            out.write_stmt(indent + 1, stmt);
        }
        out.write_stmt(indent, "end");
        out.write_stmt(indent, "");
    }

    fn emit_sync_block(
        &self,
        resets: &ResetRegistry,
        out: &mut dyn StatementWriter,
        indent: usize,
        opts: &SvOptions,
    ) {
        if self.reg_assigns.is_empty() && self.reset_assigns.is_empty() {
            return;
        }
        out.write_stmt(indent, &format!("//------- reg assigns for {}", self.name));

        let clock_edge = if self.use_neg_edge { "negedge" } else { "posedge" };
        let mut sensitivity = format!("{} {}", clock_edge, self.clock);
        if opts.async_resets {
            for reset in self.reset_assigns.keys() {
                let reset_edge = if resets.active_low(reset) == Some(true) {
                    "negedge"
                } else {
                    "posedge"
                };
                sensitivity.push_str(&format!(" or {} {}", reset_edge, reset));
            }
        }

        let keyword = if opts.legacy_verilog { "always" } else { "always_ff" };
        out.write_stmt(indent, &format!("{} @ ({}) begin", keyword, sensitivity));
        let has_resets = self.emit_reset_chain(resets, out, indent + 1);
        self.emit_reg_assigns(out, indent + 1, has_resets);
        out.write_stmt(indent, "end");
        out.write_stmt(indent, "");
    }

    /// Render the `if`/`else if` reset branch chain
    ///
    /// Returns true if at least one branch was emitted.
    fn emit_reset_chain(
        &self,
        resets: &ResetRegistry,
        out: &mut dyn StatementWriter,
        indent: usize,
    ) -> bool {
        let mut has_resets = false;
        for (reset, stmts) in &self.reset_assigns {
            if stmts.is_empty() {
                continue;
            }
            let test = if resets.active_low(reset) == Some(true) {
                format!("! {}", reset)
            } else {
                reset.clone()
            };
            let prefix = if has_resets { "else " } else { "" };
            out.write_stmt(indent, &format!("{}if ({}) begin", prefix, test));
            for stmt in stmts {
                out.write_stmt(indent + 1, stmt);
            }
            out.write_stmt(indent, "end");
            has_resets = true;
        }
        has_resets
    }

    fn emit_reg_assigns(&self, out: &mut dyn StatementWriter, indent: usize, has_resets: bool) {
        if self.reg_assigns.is_empty() {
            return;
        }
        if has_resets {
            out.write_stmt(indent, "else begin");
            for stmt in &self.reg_assigns {
                out.write_stmt(indent + 1, stmt);
            }
            out.write_stmt(indent, "end");
        } else {
            for stmt in &self.reg_assigns {
                out.write_stmt(indent, stmt);
            }
        }
    }
}

/// The register groups of one output module
///
/// Owns the groups and the shared [`ResetRegistry`] they validate
/// against. One table lives for one module's generation pass and is
/// dropped once the module has been rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleRegisters {
    groups: IndexMap<String, RegisterGroup>,
    resets: ResetRegistry,
}

impl ModuleRegisters {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a reset signal in the shared registry
    pub fn declare_reset(&mut self, name: &str, active_low: bool) {
        self.resets.declare(name, active_low);
    }

    /// The shared reset polarity registry
    pub fn resets(&self) -> &ResetRegistry {
        &self.resets
    }

    /// Look up a register group by name, creating it on first use
    ///
    /// The clock name and capture edge are fixed when the group is
    /// created; a later request with different clocking is a consistency
    /// violation in the calling pass and is reported as
    /// [`RegisterError::ClockMismatch`]. The shared reset registry is
    /// returned alongside the group so the caller can add reset-bearing
    /// statements without re-borrowing the table.
    pub fn get_or_create(
        &mut self,
        name: &str,
        clock: &str,
        use_neg_edge: bool,
    ) -> Result<(&mut RegisterGroup, &ResetRegistry)> {
        let group = self.groups.entry(name.to_string()).or_insert_with(|| {
            log::debug!(
                "created register group '{}' on {} {}",
                name,
                if use_neg_edge { "negedge" } else { "posedge" },
                clock
            );
            RegisterGroup::new(name, clock, use_neg_edge)
        });
        group.check_clock(clock, use_neg_edge)?;
        Ok((group, &self.resets))
    }

    /// Iterate the groups in creation order
    pub fn groups(&self) -> impl Iterator<Item = &RegisterGroup> {
        self.groups.values()
    }

    /// Check whether any group has been created
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of register groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Render every group's process blocks in creation order
    pub fn emit_all(&self, out: &mut dyn StatementWriter, indent: usize, opts: &SvOptions) {
        for group in self.groups.values() {
            group.emit(&self.resets, out, indent, opts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::StringWriter;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut regs = ModuleRegisters::new();
        {
            let (group, _) = regs.get_or_create("grp", "clk", false).unwrap();
            group.add_reg_assign("a <= b;");
        }
        let (group, _) = regs.get_or_create("grp", "clk", false).unwrap();
        assert_eq!(group.name(), "grp");
        assert_eq!(regs.len(), 1);
    }

    #[test]
    fn test_clock_mismatch_names_group() {
        let mut regs = ModuleRegisters::new();
        regs.get_or_create("grp", "clk", false).unwrap();

        let err = regs.get_or_create("grp", "clk2", false).unwrap_err();
        assert!(matches!(
            err,
            RegisterError::ClockMismatch { ref group } if group == "grp"
        ));

        // Edge divergence alone is a mismatch too
        let err = regs.get_or_create("grp", "clk", true).unwrap_err();
        assert!(matches!(err, RegisterError::ClockMismatch { .. }));
    }

    #[test]
    fn test_reset_assign_without_any_declared_reset() {
        let mut regs = ModuleRegisters::new();
        let (group, resets) = regs.get_or_create("grp", "clk", false).unwrap();

        let err = group.add_reset_assign(resets, "rst_n", "a <= 1'b0;").unwrap_err();
        assert!(matches!(err, RegisterError::NoResetsDeclared));
    }

    #[test]
    fn test_reset_assign_with_undeclared_reset() {
        let mut regs = ModuleRegisters::new();
        regs.declare_reset("rst_n", true);
        let (group, resets) = regs.get_or_create("grp", "clk", false).unwrap();

        let err = group.add_reset_assign(resets, "por_n", "a <= 1'b0;").unwrap_err();
        assert!(matches!(
            err,
            RegisterError::UndeclaredReset { ref reset } if reset == "por_n"
        ));
    }

    #[test]
    fn test_precedence_buckets() {
        let mut regs = ModuleRegisters::new();
        let (group, resets) = regs.get_or_create("grp", "clk", false).unwrap();
        group.add_combin_assign("a = 1'b0;");
        group.add_prec_combin_assign(true, "a = hi;");
        group.add_prec_combin_assign(false, "a = lo;");

        let mut out = StringWriter::new();
        group.emit(resets, &mut out, 0, &SvOptions::default());

        let code = out.as_str();
        let plain = code.find("a = 1'b0;").unwrap();
        let lo = code.find("a = lo;").unwrap();
        let hi = code.find("a = hi;").unwrap();
        assert!(plain < lo && lo < hi);
    }

    #[test]
    fn test_reset_branches_follow_first_use_order() {
        let mut regs = ModuleRegisters::new();
        regs.declare_reset("soft_rst", false);
        regs.declare_reset("rst_n", true);
        let (group, resets) = regs.get_or_create("grp", "clk", false).unwrap();
        group.add_reset_assign(resets, "rst_n", "a <= 1'b0;").unwrap();
        group.add_reset_assign(resets, "soft_rst", "a <= 1'b1;").unwrap();
        group.add_reset_assign(resets, "rst_n", "b <= 1'b0;").unwrap();

        let mut out = StringWriter::new();
        group.emit(resets, &mut out, 0, &SvOptions::default());

        let code = out.as_str();
        let first = code.find("if (! rst_n) begin").unwrap();
        let second = code.find("else if (soft_rst) begin").unwrap();
        assert!(first < second);
    }
}
