// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! Text rendering of a [`SkipList`] as a grid, one row per level with the top
//! level first. Every key column lines up with its level-0 node, so a tall
//! key reads as a vertical stack:
//!
//! ```text
//! 10
//! 10  20
//! 10  20  20  40
//! ```

use std::{
    collections::HashMap,
    fmt,
    fmt::Display,
};

use tracing::instrument;

use crate::skiplist::{
    NodeId,
    SkipList,
};

const CELL_SEPARATOR: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Top level first; `None` where a column does not reach the level.
    rows: Vec<Vec<Option<String>>>,
    widths: Vec<usize>,
}

impl Grid {
    #[instrument(level = "trace", skip_all, fields(levels = list.levels(), length = list.len()))]
    pub fn new<K: Display, G>(list: &SkipList<K, G>) -> Self {
        let columns: HashMap<NodeId, usize> = list
            .level(0)
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(col, entry)| (entry.id(), col))
            .collect();

        let mut widths = vec![0; columns.len()];
        let mut rows = Vec::with_capacity(list.levels());
        for level in (0..list.levels()).rev() {
            let mut row = vec![None; columns.len()];
            for entry in list.level(level).into_iter().flatten() {
                if let Some(&col) = columns.get(&entry.base()) {
                    let text = entry.key().to_string();
                    widths[col] = widths[col].max(text.chars().count());
                    row[col] = Some(text);
                }
            }
            rows.push(row);
        }

        Grid { rows, widths }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.widths.len()
    }

    /// The text at `row` (0 is the top level) and `col` (0 is the smallest
    /// key).
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line = row
                .iter()
                .zip(&self.widths)
                .map(|(cell, &width)| format!("{:<width$}", cell.as_deref().unwrap_or(""), width = width))
                .collect::<Vec<_>>()
                .join(CELL_SEPARATOR);
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
