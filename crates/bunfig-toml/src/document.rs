use std::fmt;
use std::str::FromStr;

use toml::{Table, Value};

use crate::error::BunfigTomlError;
use crate::schema::BUNFIG_SCHEMA;

/// A bunfig document as a plain TOML tree.
///
/// Anything is allowed in here; the schema is only applied when the document
/// is written back out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bunfig {
    table: Table,
}

impl Bunfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: impl AsRef<str>) -> Result<Self, BunfigTomlError> {
        Ok(Bunfig {
            table: toml::from_str(text.as_ref())?,
        })
    }

    /// Looks up a dotted path such as `install.scopes`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.table.get(segments.next()?)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }

    /// Removes a top-level table so it can be edited and put back with
    /// [`Bunfig::insert_section`]. A missing or non-table value yields an
    /// empty table.
    pub fn take_section(&mut self, key: &str) -> Table {
        take_table(&mut self.table, key)
    }

    pub fn insert_section(&mut self, key: &str, section: Table) {
        self.table.insert(key.into(), Value::Table(section));
    }
}

/// Removes `key` from `table`, replacing anything that isn't a table with
/// an empty one.
pub fn take_table(table: &mut Table, key: &str) -> Table {
    match table.remove(key) {
        Some(Value::Table(inner)) => inner,
        Some(other) => {
            tracing::warn!("key: {key} is not a table and was replaced: {other}");
            Table::new()
        }
        None => Table::new(),
    }
}

impl FromStr for Bunfig {
    type Err = BunfigTomlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bunfig::parse(s)
    }
}

impl fmt::Display for Bunfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::serialize(self, BUNFIG_SCHEMA))
    }
}
