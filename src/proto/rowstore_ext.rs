use super::filter;
use super::Column;
use super::ColumnPrefixFilter;
use super::DeleteRequest;
use super::Filter;
use super::GetRequest;
use super::PrefixFilter;
use super::PutRequest;
use super::ScanRequest;
use super::TableName;
use crate::RowMutation;

impl GetRequest {
    /// Read every family of `row`
    pub fn new(
        table: impl Into<String>,
        row: impl AsRef<[u8]>,
    ) -> Self {
        Self {
            table: table.into(),
            row: row.as_ref().to_vec(),
            columns: Vec::new(),
        }
    }

    /// Restrict the read to the families and qualifiers named by `selector`
    pub fn with_columns(
        mut self,
        selector: &RowMutation,
    ) -> Self {
        self.columns = selector.to_columns();
        self
    }
}

impl PutRequest {
    /// Write every cell of `mutation` into `row`
    pub fn new(
        table: impl Into<String>,
        row: impl AsRef<[u8]>,
        mutation: &RowMutation,
    ) -> Self {
        Self {
            table: table.into(),
            row: row.as_ref().to_vec(),
            values: mutation.to_family_values(),
        }
    }
}

impl DeleteRequest {
    /// Delete the cells of `row` selected by `selector`.
    ///
    /// Values in the selector are ignored. An empty selector deletes the
    /// whole row.
    pub fn new(
        table: impl Into<String>,
        row: impl AsRef<[u8]>,
        selector: &RowMutation,
    ) -> Self {
        Self {
            table: table.into(),
            row: row.as_ref().to_vec(),
            columns: selector.to_columns(),
        }
    }
}

impl ScanRequest {
    /// Full table scan
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(
        mut self,
        filter: Filter,
    ) -> Self {
        self.filters.push(filter);
        self
    }
}

impl Filter {
    /// Keep rows whose key starts with `prefix`
    pub fn prefix(prefix: impl AsRef<[u8]>) -> Self {
        Self {
            filter: Some(filter::Filter::Prefix(PrefixFilter {
                prefix: prefix.as_ref().to_vec(),
            })),
        }
    }

    /// Keep cells whose qualifier starts with `prefix`
    pub fn column_prefix(prefix: impl AsRef<[u8]>) -> Self {
        Self {
            filter: Some(filter::Filter::ColumnPrefix(ColumnPrefixFilter {
                prefix: prefix.as_ref().to_vec(),
            })),
        }
    }
}

impl Column {
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            qualifiers: Vec::new(),
        }
    }
}

impl TableName {
    pub fn new(
        namespace: impl Into<String>,
        qualifier: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            qualifier: qualifier.into(),
        }
    }
}
