pub use crate::config::*;

/// A builder for assembling a raw survey sheet in memory.
///
/// The three header rows are set first, then the schools one by one.
///
/// ```
/// pub use resource_balance::builder::SheetBuilder;
/// pub use resource_balance::RawValue;
/// # use resource_balance::BalanceErrors;
///
/// let mut builder = SheetBuilder::new()
///     .codes(&["", "4.1.", "5.1."])
///     .class_levels(&["", "1.kl.", "1.kl."])
///     .subjects(&["", "", "Matemātika"]);
///
/// builder.add_school_counts("Rīgas 1. vidusskola", &[Some(20.0), Some(18.0)])?;
/// let sheet = builder.build()?;
///
/// # Ok::<(), BalanceErrors>(())
/// ```
pub struct SheetBuilder {
    pub(crate) _codes: Vec<String>,
    pub(crate) _class_levels: Vec<String>,
    pub(crate) _subjects: Vec<String>,
    pub(crate) _rows: Vec<(String, Vec<RawValue>)>,
}

impl SheetBuilder {
    pub fn new() -> SheetBuilder {
        SheetBuilder {
            _codes: Vec::new(),
            _class_levels: Vec::new(),
            _subjects: Vec::new(),
            _rows: Vec::new(),
        }
    }

    /// The code row (row 0). The first entry belongs to the school-name
    /// column and is usually empty.
    pub fn codes(self, codes: &[&str]) -> SheetBuilder {
        SheetBuilder {
            _codes: codes.iter().map(|s| s.to_string()).collect(),
            ..self
        }
    }

    /// The class-level row (row 1).
    pub fn class_levels(self, class_levels: &[&str]) -> SheetBuilder {
        SheetBuilder {
            _class_levels: class_levels.iter().map(|s| s.to_string()).collect(),
            ..self
        }
    }

    /// The subject row (row 2).
    pub fn subjects(self, subjects: &[&str]) -> SheetBuilder {
        SheetBuilder {
            _subjects: subjects.iter().map(|s| s.to_string()).collect(),
            ..self
        }
    }

    /// Adds one school row. `values` covers every column except the school
    /// name.
    pub fn add_school(&mut self, name: &str, values: &[RawValue]) -> Result<(), BalanceErrors> {
        if values.len() + 1 != self._codes.len() {
            return Err(BalanceErrors::RaggedRow {
                row: 3 + self._rows.len(),
            });
        }
        self._rows.push((name.to_string(), values.to_vec()));
        Ok(())
    }

    /// Adds one school row of plain counts, `None` meaning a missing value.
    ///
    /// It is the simplest call for most cases.
    pub fn add_school_counts(
        &mut self,
        name: &str,
        counts: &[Option<f64>],
    ) -> Result<(), BalanceErrors> {
        let values: Vec<RawValue> = counts
            .iter()
            .map(|c| match c {
                Some(x) => RawValue::Number(*x),
                None => RawValue::Empty,
            })
            .collect();
        self.add_school(name, &values)
    }

    pub fn build(&self) -> Result<RawSheet, BalanceErrors> {
        if self._class_levels.len() != self._codes.len() {
            return Err(BalanceErrors::RaggedRow { row: 1 });
        }
        if self._subjects.len() != self._codes.len() {
            return Err(BalanceErrors::RaggedRow { row: 2 });
        }
        let header = |labels: &[String]| -> Vec<RawValue> {
            labels
                .iter()
                .map(|s| {
                    if s.is_empty() {
                        RawValue::Empty
                    } else {
                        RawValue::Text(s.clone())
                    }
                })
                .collect()
        };
        let mut rows: Vec<Vec<RawValue>> = vec![
            header(&self._codes),
            header(&self._class_levels),
            header(&self._subjects),
        ];
        for (name, values) in self._rows.iter() {
            let mut row: Vec<RawValue> = vec![RawValue::Text(name.clone())];
            row.extend(values.iter().cloned());
            rows.push(row);
        }
        Ok(RawSheet { rows })
    }
}

impl Default for SheetBuilder {
    fn default() -> Self {
        SheetBuilder::new()
    }
}
