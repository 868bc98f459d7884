//! Caller-facing data shapes: table descriptors, row mutations and row
//! results, plus their conversions to and from the wire messages.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;

use crate::proto;

/// Column family name -> per-family option name -> option value
pub type Families = BTreeMap<String, BTreeMap<String, String>>;

/// Schema of a table to create
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub families: Families,
}

impl TableDescriptor {
    pub fn new(
        name: impl Into<String>,
        families: Families,
    ) -> Self {
        Self {
            name: name.into(),
            families,
        }
    }

    /// Add a column family with default options
    pub fn with_family(
        mut self,
        family: impl Into<String>,
    ) -> Self {
        self.families.entry(family.into()).or_default();
        self
    }

    /// Set one option of a family, adding the family if needed.
    /// e.g. `("cf", "VERSIONS", "3")`
    pub fn with_family_option(
        mut self,
        family: impl Into<String>,
        option: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.families.entry(family.into()).or_default().insert(option.into(), value.into());
        self
    }
}

impl From<TableDescriptor> for proto::CreateTableRequest {
    fn from(descriptor: TableDescriptor) -> Self {
        let families = descriptor
            .families
            .into_iter()
            .map(|(name, options)| proto::ColumnFamilySchema {
                name,
                attributes: options.into_iter().collect(),
            })
            .collect();

        Self {
            table: descriptor.name,
            families,
        }
    }
}

/// Cells of one row addressed by family and qualifier.
///
/// Used as the payload of a put, and as a column selector for gets and
/// deletes (values are ignored there; a family with no qualifiers selects the
/// whole family).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMutation {
    families: BTreeMap<String, BTreeMap<String, Bytes>>,
}

impl RowMutation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(
        mut self,
        family: impl Into<String>,
        qualifier: impl Into<String>,
        value: impl Into<Bytes>,
    ) -> Self {
        self.insert(family, qualifier, value);
        self
    }

    /// Select a whole family. Only meaningful as a get or delete selector.
    pub fn with_family(
        mut self,
        family: impl Into<String>,
    ) -> Self {
        self.families.entry(family.into()).or_default();
        self
    }

    pub fn insert(
        &mut self,
        family: impl Into<String>,
        qualifier: impl Into<String>,
        value: impl Into<Bytes>,
    ) {
        self.families
            .entry(family.into())
            .or_default()
            .insert(qualifier.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Number of addressed cells
    pub fn cell_count(&self) -> usize {
        self.families.values().map(BTreeMap::len).sum()
    }

    pub fn families(&self) -> &BTreeMap<String, BTreeMap<String, Bytes>> {
        &self.families
    }

    pub fn get(
        &self,
        family: &str,
        qualifier: &str,
    ) -> Option<&Bytes> {
        self.families.get(family).and_then(|columns| columns.get(qualifier))
    }

    pub(crate) fn to_family_values(&self) -> Vec<proto::FamilyValues> {
        self.families
            .iter()
            .map(|(family, columns)| proto::FamilyValues {
                family: family.clone(),
                values: columns
                    .iter()
                    .map(|(qualifier, value)| proto::QualifierValue {
                        qualifier: qualifier.clone(),
                        value: value.to_vec(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub(crate) fn to_columns(&self) -> Vec<proto::Column> {
        self.families
            .iter()
            .map(|(family, columns)| proto::Column {
                family: family.clone(),
                qualifiers: columns.keys().cloned().collect(),
            })
            .collect()
    }
}

impl<F, Q, V> FromIterator<(F, Q, V)> for RowMutation
where
    F: Into<String>,
    Q: Into<String>,
    V: Into<Bytes>,
{
    fn from_iter<I: IntoIterator<Item = (F, Q, V)>>(iter: I) -> Self {
        let mut mutation = Self::new();
        for (family, qualifier, value) in iter {
            mutation.insert(family, qualifier, value);
        }
        mutation
    }
}

impl From<BTreeMap<String, BTreeMap<String, Bytes>>> for RowMutation {
    fn from(families: BTreeMap<String, BTreeMap<String, Bytes>>) -> Self {
        Self { families }
    }
}

/// One stored value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: Bytes,
    pub family: String,
    pub qualifier: String,
    pub value: Bytes,
    pub timestamp: u64,
}

impl From<proto::Cell> for Cell {
    fn from(cell: proto::Cell) -> Self {
        Self {
            row: Bytes::from(cell.row),
            family: cell.family,
            qualifier: cell.qualifier,
            value: Bytes::from(cell.value),
            timestamp: cell.timestamp,
        }
    }
}

/// Cells returned for one row, in store order (family, then qualifier)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowResult {
    cells: Vec<Cell>,
}

impl RowResult {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Row key of the first cell, `None` for an empty result
    pub fn row_key(&self) -> Option<&Bytes> {
        self.cells.first().map(|cell| &cell.row)
    }

    pub fn value(
        &self,
        family: &str,
        qualifier: &str,
    ) -> Option<&Bytes> {
        self.cells
            .iter()
            .find(|cell| cell.family == family && cell.qualifier == qualifier)
            .map(|cell| &cell.value)
    }

    /// The cells as a mutation, e.g. to copy a row or compare with a write
    pub fn to_mutation(&self) -> RowMutation {
        self.cells
            .iter()
            .map(|cell| (cell.family.clone(), cell.qualifier.clone(), cell.value.clone()))
            .collect()
    }
}

impl From<Vec<proto::Cell>> for RowResult {
    fn from(cells: Vec<proto::Cell>) -> Self {
        Self {
            cells: cells.into_iter().map(Cell::from).collect(),
        }
    }
}

impl IntoIterator for RowResult {
    type Item = Cell;
    type IntoIter = std::vec::IntoIter<Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl fmt::Display for RowResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.cells.is_empty() {
            return write!(f, "(no cells)");
        }
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "family: {} qualifier: {} value: {}",
                cell.family,
                cell.qualifier,
                String::from_utf8_lossy(&cell.value)
            )?;
        }
        Ok(())
    }
}
