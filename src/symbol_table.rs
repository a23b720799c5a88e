use std::collections::HashMap;

/// One entry per distinct identifier: its memory slot and every source line
/// that references it, in traversal order.
#[derive(Debug, Clone)]
pub struct VariableRecord {
    pub name: String,
    pub slot: usize,
    pub lines: Vec<usize>,
}

/// Maps identifier names to memory slots.
///
/// Slots are dense and handed out in first-appearance order, so the table
/// length doubles as the size of program memory. Re-inserting a known name
/// only appends a line reference; its slot never changes.
#[derive(Debug, Default)]
pub struct SymbolTable {
    records: HashMap<String, VariableRecord>,
    next_slot: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reference to `name` on `line`, creating the record with the
    /// next free slot the first time the name is seen.
    pub fn insert(&mut self, name: &str, line: usize) {
        if let Some(record) = self.records.get_mut(name) {
            record.lines.push(line);
            return;
        }
        let record = VariableRecord {
            name: name.to_string(),
            slot: self.next_slot,
            lines: vec![line],
        };
        self.next_slot += 1;
        self.records.insert(name.to_string(), record);
    }

    pub fn lookup(&self, name: &str) -> Option<&VariableRecord> {
        self.records.get(name)
    }

    /// Number of distinct identifiers, which is also the program memory size.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, ordered by slot number.
    pub fn records(&self) -> Vec<&VariableRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by_key(|record| record.slot);
        records
    }

    /// Debug dump, one line per variable in slot order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for record in self.records() {
            out.push_str(&format!("[Var={}][Slot={}]", record.name, record.slot));
            for line in &record.lines {
                out.push_str(&format!("[Line={}]", line));
            }
            out.push('\n');
        }
        out
    }
}
