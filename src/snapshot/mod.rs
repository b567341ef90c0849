// Output capture and execution trace for the trace viewer

use crate::memory::ScopeStack;
use crate::memory::ScopeId;
use crate::parser::ast::SourceLocation;

/// Captured program output, kept as raw bytes since `putchar` may emit any byte
#[derive(Debug, Clone, Default)]
pub struct Terminal {
    bytes: Vec<u8>,
}

impl Terminal {
    pub fn new() -> Self {
        Terminal { bytes: Vec::new() }
    }

    /// Print an integer in decimal
    pub fn print_int(&mut self, value: i32) {
        self.bytes.extend_from_slice(value.to_string().as_bytes());
    }

    pub fn newline(&mut self) {
        self.bytes.push(b'\n');
    }

    pub fn put_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Output as text; invalid UTF-8 is replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Output produced by the first `len` bytes, split into lines
    pub fn lines_up_to(&self, len: usize) -> Vec<String> {
        let end = len.min(self.bytes.len());
        let text = String::from_utf8_lossy(&self.bytes[..end]);
        let mut lines: Vec<String> = text.split('\n').map(|s| s.to_string()).collect();
        // Remove trailing empty string if text ended with newline
        if lines.last().is_some_and(|s| s.is_empty()) {
            lines.pop();
        }
        lines
    }
}

/// One scope as seen from the executing statement
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeView {
    pub depth: usize,
    pub declared_here: Vec<String>,
    pub values: Vec<(String, i32)>,
}

/// Interpreter state captured before a statement runs
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub step: u64,
    pub location: SourceLocation,
    pub statement: &'static str,
    pub function: String,
    pub call_depth: usize,
    /// Visible scopes, innermost first
    pub scopes: Vec<ScopeView>,
    /// Bytes of output produced before this statement
    pub output_len: usize,
}

impl Snapshot {
    /// Capture the scope chain visible from `current`
    pub fn capture_scopes(scopes: &ScopeStack, current: ScopeId) -> Vec<ScopeView> {
        scopes
            .chain(current)
            .into_iter()
            .filter_map(|id| {
                let scope = scopes.get_scope(id)?;
                let values = scope.sorted_values();
                let declared_here = values
                    .iter()
                    .filter(|(key, _)| scope.is_declared(key))
                    .map(|(key, _)| key.clone())
                    .collect();
                Some(ScopeView {
                    depth: id,
                    declared_here,
                    values,
                })
            })
            .collect()
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough estimate: fixed part plus 32 bytes per stored value
        let values: usize = self.scopes.iter().map(|s| s.values.len()).sum();
        std::mem::size_of::<Snapshot>() + self.function.len() + values * 32
    }
}

/// Manages the recorded execution history
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), usize> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(self.current_memory + snapshot_size);
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(step: u64) -> Snapshot {
        Snapshot {
            step,
            location: SourceLocation::new(1, 1),
            statement: "assignment",
            function: "main".to_string(),
            call_depth: 1,
            scopes: Vec::new(),
            output_len: 0,
        }
    }

    #[test]
    fn test_terminal_lines() {
        let mut terminal = Terminal::new();
        terminal.print_int(-12);
        terminal.newline();
        terminal.put_byte(b'A');

        assert_eq!(terminal.text(), "-12\nA");
        assert_eq!(terminal.lines_up_to(terminal.len()), vec!["-12", "A"]);
        assert_eq!(terminal.lines_up_to(4), vec!["-12"]);
        assert!(terminal.lines_up_to(0).is_empty());
    }

    #[test]
    fn test_manager_enforces_limit() {
        let size = snapshot(0).estimated_size();
        let mut manager = SnapshotManager::new(size * 2);

        assert!(manager.push(snapshot(0)).is_ok());
        assert!(manager.push(snapshot(1)).is_ok());
        assert!(manager.push(snapshot(2)).is_err());
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get(1).map(|s| s.step), Some(1));
    }

    #[test]
    fn test_capture_scopes_innermost_first() {
        let mut scopes = ScopeStack::new();
        let root = scopes.root();
        scopes.set(root, "g", 1);
        let child = scopes.push(root);
        scopes.declare(child, "x");

        let views = Snapshot::capture_scopes(&scopes, child);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].declared_here, vec!["x"]);
        assert_eq!(views[1].values, vec![("g".to_string(), 1)]);
    }
}
