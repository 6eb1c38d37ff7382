//! Entity mappings registered with a connection descriptor.

/// Column of a mapped table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnDef {
    /// A non-null column.
    pub const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Self {
            name,
            sql_type,
            nullable: false,
            primary_key: false,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    fn render(&self) -> String {
        let mut column = format!("{} {}", self.name, self.sql_type);
        if self.primary_key {
            column.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            column.push_str(" NOT NULL");
        }
        column
    }
}

/// Correspondence between an in-process type and a database table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMapping {
    pub name: &'static str,
    pub table: &'static str,
    pub columns: Vec<ColumnDef>,
}

impl EntityMapping {
    pub fn new(name: &'static str, table: &'static str, columns: Vec<ColumnDef>) -> Self {
        Self {
            name,
            table,
            columns,
        }
    }

    /// Idempotent DDL creating the mapped table.
    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(ColumnDef::render)
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({})", self.table, columns)
    }
}

/// Types persisted through a mapped table.
pub trait Entity {
    fn mapping() -> EntityMapping;
}
