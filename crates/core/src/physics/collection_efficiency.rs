//! Table-driven collection efficiency with a forward-only cursor
//!
//! Collection efficiency is the product of the collision efficiency,
//! tabulated against collector radius, and a fixed coalescence efficiency.
//! A single growing droplet only ever moves up the table, so lookup is a
//! cursor that advances at most one row per call and never moves back.
//!
//! No entry is active until the first comparison succeeds. Callers receive
//! `None` in that window and must decide what growth means there (see
//! `UninitializedEfficiencyPolicy`).

use tracing::debug;

use crate::core_types::{ConfigError, EfficiencyBreakpoint, LookupRule, Meters};

/// Forward-only position in the efficiency table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TableCursor {
    /// Row compared against on the next call
    next: usize,
    /// Row whose efficiency is currently in effect
    active: Option<usize>,
}

/// Collision efficiency breakpoints plus the cursor walking them
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEfficiencyTable {
    entries: Vec<EfficiencyBreakpoint>,
    coalescence: f64,
    rule: LookupRule,
    cursor: TableCursor,
}

impl CollectionEfficiencyTable {
    /// Create a table from ordered breakpoints.
    ///
    /// # Errors
    /// Returns `ConfigError` if the table is empty or its thresholds are
    /// not strictly increasing.
    pub fn new(
        entries: Vec<EfficiencyBreakpoint>,
        coalescence: f64,
        rule: LookupRule,
    ) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyEfficiencyTable);
        }
        if let Some(index) = entries
            .windows(2)
            .position(|pair| pair[1].radius <= pair[0].radius)
        {
            return Err(ConfigError::UnorderedEfficiencyTable { index: index + 1 });
        }
        Ok(Self {
            entries,
            coalescence,
            rule,
            cursor: TableCursor::default(),
        })
    }

    /// Create a table from separate threshold (µm) and efficiency columns.
    ///
    /// # Errors
    /// Returns `ConfigError::MismatchedEfficiencyTable` when the columns
    /// differ in length, plus any error from [`Self::new`].
    pub fn from_columns(
        thresholds_um: &[f64],
        efficiencies: &[f64],
        coalescence: f64,
        rule: LookupRule,
    ) -> Result<Self, ConfigError> {
        if thresholds_um.len() != efficiencies.len() {
            return Err(ConfigError::MismatchedEfficiencyTable {
                thresholds: thresholds_um.len(),
                efficiencies: efficiencies.len(),
            });
        }
        let entries = thresholds_um
            .iter()
            .zip(efficiencies)
            .map(|(&r, &e)| EfficiencyBreakpoint::from_micrometres(r, e))
            .collect();
        Self::new(entries, coalescence, rule)
    }

    /// Compare `radius` with the row under the cursor, advance if the rule
    /// fires, and return the collection efficiency now in effect.
    ///
    /// Returns `None` until some row has become active.
    pub fn advance_if_needed(&mut self, radius: Meters) -> Option<f64> {
        let next = self.cursor.next;
        let threshold = self.entries[next].radius;
        let fires = match self.rule {
            LookupRule::Threshold => radius >= threshold,
            LookupRule::UpperBound => radius <= threshold,
        };

        if fires {
            if self.cursor.active != Some(next) {
                debug!(
                    "Collection efficiency row {} active at r = {:.2} µm (threshold {:.0} µm)",
                    next,
                    radius.as_micrometres(),
                    threshold.as_micrometres()
                );
            }
            self.cursor.active = Some(next);
            if next + 1 < self.entries.len() {
                self.cursor.next = next + 1;
            }
        }

        self.current()
    }

    /// Collection efficiency currently in effect, without touching the cursor
    #[must_use]
    pub fn current(&self) -> Option<f64> {
        self.cursor
            .active
            .map(|index| self.entries[index].efficiency * self.coalescence)
    }

    /// Row compared against on the next call
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor.next
    }

    /// Row whose efficiency is in effect, if any
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.cursor.active
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: construction rejects empty tables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::default_efficiency_table;
    use approx::assert_relative_eq;

    fn table(rule: LookupRule) -> CollectionEfficiencyTable {
        CollectionEfficiencyTable::new(default_efficiency_table(), 0.7, rule).unwrap()
    }

    #[test]
    fn test_threshold_inactive_below_first_row() {
        let mut t = table(LookupRule::Threshold);
        assert_eq!(t.advance_if_needed(Meters::from_micrometres(15.0)), None);
        assert_eq!(t.cursor(), 0);
        assert_eq!(t.active_index(), None);
    }

    #[test]
    fn test_threshold_crossing_activates_row() {
        let mut t = table(LookupRule::Threshold);
        let e = t.advance_if_needed(Meters::from_micrometres(20.0)).unwrap();
        assert_relative_eq!(e, 0.17 * 0.7, max_relative = 1e-12);
        assert_eq!(t.cursor(), 1);

        // Still below the next threshold: value held, cursor unchanged
        let e = t.advance_if_needed(Meters::from_micrometres(25.0)).unwrap();
        assert_relative_eq!(e, 0.17 * 0.7, max_relative = 1e-12);
        assert_eq!(t.cursor(), 1);
    }

    /// A jump across several thresholds moves the cursor one row per call.
    #[test]
    fn test_threshold_advances_one_row_per_call() {
        let mut t = table(LookupRule::Threshold);
        let r = Meters::from_micrometres(100.0);
        t.advance_if_needed(r);
        assert_eq!(t.active_index(), Some(0));
        t.advance_if_needed(r);
        assert_eq!(t.active_index(), Some(1));
        for _ in 0..10 {
            t.advance_if_needed(r);
        }
        // Rows up to 100 µm (index 6) are crossed, 150 µm is not
        assert_eq!(t.active_index(), Some(6));
        assert_eq!(t.cursor(), 7);
    }

    #[test]
    fn test_cursor_never_decreases_and_clamps() {
        let mut t = table(LookupRule::Threshold);
        let last = t.len() - 1;
        let mut previous = t.cursor();
        for step in 0..5000 {
            let r = Meters::from_micrometres(10.0 + f64::from(step));
            t.advance_if_needed(r);
            assert!(t.cursor() >= previous);
            assert!(t.cursor() <= last);
            previous = t.cursor();
        }
        assert_eq!(t.cursor(), last);
        assert_eq!(t.active_index(), Some(last));
        assert_relative_eq!(t.current().unwrap(), 0.81 * 0.7, max_relative = 1e-12);
    }

    /// The upper-bound lookup runs through every row in 18 calls.
    #[test]
    fn test_upper_bound_sweeps_to_last_row() {
        let mut t = table(LookupRule::UpperBound);
        let r = Meters::from_micrometres(15.0);
        let first = t.advance_if_needed(r).unwrap();
        assert_relative_eq!(first, 0.17 * 0.7, max_relative = 1e-12);
        for _ in 0..17 {
            t.advance_if_needed(r);
        }
        assert_eq!(t.cursor(), 17);
        assert_eq!(t.active_index(), Some(17));
        let settled = t.advance_if_needed(r).unwrap();
        assert_relative_eq!(settled, 0.81 * 0.7, max_relative = 1e-12);
    }

    #[test]
    fn test_upper_bound_never_activates_above_first_bound() {
        let mut t = table(LookupRule::UpperBound);
        for _ in 0..10 {
            assert_eq!(t.advance_if_needed(Meters::from_micrometres(25.0)), None);
        }
        assert_eq!(t.cursor(), 0);
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert_eq!(
            CollectionEfficiencyTable::new(Vec::new(), 0.7, LookupRule::Threshold),
            Err(ConfigError::EmptyEfficiencyTable)
        );
        assert_eq!(
            CollectionEfficiencyTable::from_columns(
                &[20.0, 30.0],
                &[0.1],
                0.7,
                LookupRule::Threshold
            ),
            Err(ConfigError::MismatchedEfficiencyTable {
                thresholds: 2,
                efficiencies: 1
            })
        );
        assert_eq!(
            CollectionEfficiencyTable::from_columns(
                &[20.0, 20.0],
                &[0.1, 0.2],
                0.7,
                LookupRule::Threshold
            ),
            Err(ConfigError::UnorderedEfficiencyTable { index: 1 })
        );
    }
}
