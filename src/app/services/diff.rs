//! Line comparison of two text documents.
//!
//! The comparison is positional: line `i` of the left text is compared with
//! line `i` of the right text and nothing else. An inserted or deleted line
//! therefore shows up as a run of removed/added pairs for every line after it
//! instead of a minimal edit script.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStatus {
    Equal,
    Removed,
    Added,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    /// 1-based line index both sides were compared at.
    pub line_number: usize,
    pub left: Option<String>,
    pub right: Option<String>,
    pub status: DiffStatus,
}

impl DiffRow {
    /// The text shown for this row.
    pub fn text(&self) -> &str {
        match self.status {
            DiffStatus::Equal | DiffStatus::Removed => self.left.as_deref().unwrap_or_default(),
            DiffStatus::Added => self.right.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStats {
    pub equal: usize,
    pub removed: usize,
    pub added: usize,
}

impl DiffStats {
    pub fn is_identical(&self) -> bool {
        self.removed == 0 && self.added == 0
    }
}

pub fn compare(text_a: &str, text_b: &str) -> Vec<DiffRow> {
    let lines_a: Vec<&str> = text_a.split('\n').collect();
    let lines_b: Vec<&str> = text_b.split('\n').collect();
    let max = lines_a.len().max(lines_b.len());

    let mut rows = Vec::with_capacity(max);
    for i in 0..max {
        let a = lines_a.get(i).copied();
        let b = lines_b.get(i).copied();
        let line_number = i + 1;

        if let (Some(a), Some(b)) = (a, b)
            && a == b
        {
            rows.push(DiffRow {
                line_number,
                left: Some(a.to_string()),
                right: Some(b.to_string()),
                status: DiffStatus::Equal,
            });
            continue;
        }

        if let Some(a) = a {
            rows.push(DiffRow {
                line_number,
                left: Some(a.to_string()),
                right: None,
                status: DiffStatus::Removed,
            });
        }
        if let Some(b) = b {
            rows.push(DiffRow {
                line_number,
                left: None,
                right: Some(b.to_string()),
                status: DiffStatus::Added,
            });
        }
    }
    rows
}

pub fn stats(rows: &[DiffRow]) -> DiffStats {
    rows.iter().fold(DiffStats::default(), |mut acc, row| {
        match row.status {
            DiffStatus::Equal => acc.equal += 1,
            DiffStatus::Removed => acc.removed += 1,
            DiffStatus::Added => acc.added += 1,
        }
        acc
    })
}
