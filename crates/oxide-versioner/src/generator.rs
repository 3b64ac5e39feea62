//! DDL statement synthesis.
//!
//! [`DdlGenerator`] turns schema object descriptions into SQL text for one
//! [`Dialect`]. It is pure: nothing is executed and no connection is held.
//!
//! Requests the dialect cannot express at all (altering a column on SQLite)
//! fail with [`MigrateError::Unsupported`]. Requests it can only partly
//! express (an autoincrement flag on Oracle, a cascade rule it lacks) still
//! produce a statement; the dropped part is reported in [`Ddl::degraded`]
//! and logged as a warning.

use std::fmt;

use tracing::warn;

use crate::dialect::{AutoIncrement, Dialect};
use crate::error::{MigrateError, Result};
use crate::schema::{CascadeRule, Column, ForeignKey, Index, Table};

/// Where `ADD COLUMN` should place the new column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnPosition {
    /// Append after the last column.
    #[default]
    End,
    /// Make it the first column.
    First,
    /// Place it after the named column.
    After(String),
    /// Place it at a zero-based position.
    Index(usize),
}

/// Part of a request that the dialect could not express and that was left
/// out of the generated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// An autoincrement flag was ignored.
    AutoIncrementIgnored {
        /// Column name.
        column: String,
    },
    /// A column position hint was ignored; the column is appended.
    ColumnPositionIgnored {
        /// Column name.
        column: String,
    },
    /// NOT NULL or DEFAULT could not be changed by this statement.
    ColumnModifiersIgnored {
        /// Column name.
        column: String,
    },
    /// The requested `ON DELETE` rule was left out.
    DeleteRuleDropped {
        /// Constraint name.
        constraint: String,
        /// Requested rule.
        rule: CascadeRule,
    },
    /// The requested `ON UPDATE` rule was left out.
    UpdateRuleDropped {
        /// Constraint name.
        constraint: String,
        /// Requested rule.
        rule: CascadeRule,
    },
    /// The primary key flag of an index was ignored.
    PrimaryKeyIndexIgnored {
        /// Index name.
        index: String,
    },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoIncrementIgnored { column } => {
                write!(f, "autoincrement on column {column} ignored")
            }
            Self::ColumnPositionIgnored { column } => {
                write!(f, "position of new column {column} ignored")
            }
            Self::ColumnModifiersIgnored { column } => {
                write!(f, "NOT NULL/DEFAULT change of column {column} ignored")
            }
            Self::DeleteRuleDropped { constraint, rule } => write!(
                f,
                "constraint {constraint} created without ON DELETE {}",
                rule.as_sql()
            ),
            Self::UpdateRuleDropped { constraint, rule } => write!(
                f,
                "constraint {constraint} created without ON UPDATE {}",
                rule.as_sql()
            ),
            Self::PrimaryKeyIndexIgnored { index } => {
                write!(f, "primary key property of index {index} ignored")
            }
        }
    }
}

/// A generated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ddl {
    /// Statement text, without a trailing semicolon.
    pub sql: String,
    /// Requested features that were left out.
    pub degraded: Vec<Degradation>,
}

impl Ddl {
    fn new(sql: String, degraded: Vec<Degradation>) -> Self {
        Self { sql, degraded }
    }

    fn plain(sql: String) -> Self {
        Self::new(sql, Vec::new())
    }

    /// Returns true when the statement is exactly what was requested.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.degraded.is_empty()
    }
}

impl fmt::Display for Ddl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl AsRef<str> for Ddl {
    fn as_ref(&self) -> &str {
        &self.sql
    }
}

/// Which optional parts of a column clause to render.
#[derive(Debug, Clone, Copy)]
struct ClauseOptions {
    primary_key: bool,
    modifiers: bool,
    autoincrement: bool,
}

impl ClauseOptions {
    const FULL: Self = Self {
        primary_key: true,
        modifiers: true,
        autoincrement: true,
    };
}

/// Generates DDL for one dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct DdlGenerator {
    dialect: Dialect,
}

impl DdlGenerator {
    /// Creates a generator for the given dialect.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn quote(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    fn quote_list(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|n| self.quote(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn degrade(&self, degraded: &mut Vec<Degradation>, degradation: Degradation) {
        warn!(dialect = %self.dialect, "{degradation}");
        degraded.push(degradation);
    }

    /// Records that an alteration can not add or keep auto-increment.
    fn ignore_autoincrement(&self, column: &Column, degraded: &mut Vec<Degradation>) {
        if column.autoincrement {
            self.degrade(
                degraded,
                Degradation::AutoIncrementIgnored {
                    column: column.name.clone(),
                },
            );
        }
    }

    fn unsupported(&self, feature: impl Into<String>) -> MigrateError {
        MigrateError::Unsupported {
            dialect: self.dialect.name(),
            feature: feature.into(),
        }
    }

    /// Generates `CREATE TABLE`.
    ///
    /// With more than one primary key column the inline `PRIMARY KEY`
    /// markers are suppressed and a `CONSTRAINT <table>_pk PRIMARY KEY(..)`
    /// clause is appended. `options` is appended verbatim.
    pub fn create_table(&self, table: &Table, options: Option<&str>) -> Result<Ddl> {
        require_name(&table.name, "Table name")?;
        if table.columns.is_empty() {
            return Err(MigrateError::validation(format!(
                "Table {} needs at least one column",
                table.name
            )));
        }

        let primary_keys: Vec<String> = table
            .primary_key_columns()
            .map(|c| c.name.clone())
            .collect();
        if let Some(max) = self.dialect.features().max_primary_key_columns {
            if primary_keys.len() > max {
                return Err(MigrateError::validation(format!(
                    "{} is limited to {max} PRIMARY KEY columns, table {} has {}",
                    self.dialect,
                    table.name,
                    primary_keys.len()
                )));
            }
        }
        let composite = primary_keys.len() > 1;

        let mut degraded = Vec::new();
        let options_for_columns = ClauseOptions {
            primary_key: !composite,
            ..ClauseOptions::FULL
        };
        let clauses = table
            .columns
            .iter()
            .map(|c| self.column_clause(c, options_for_columns, &mut degraded))
            .collect::<Result<Vec<_>>>()?;

        let mut sql = format!("CREATE TABLE {} (", self.quote(&table.name));
        sql.push_str(&clauses.join(", "));
        if composite {
            sql.push_str(&format!(
                ", CONSTRAINT {} PRIMARY KEY({})",
                self.quote(&format!("{}_pk", table.name)),
                self.quote_list(&primary_keys)
            ));
        }
        sql.push(')');

        if let Some(options) = options.map(str::trim).filter(|o| !o.is_empty()) {
            sql.push(' ');
            sql.push_str(options);
        }

        Ok(Ddl::new(sql, degraded))
    }

    /// Generates `DROP TABLE`.
    pub fn drop_table(&self, table: &str) -> Result<Ddl> {
        require_name(table, "Table name")?;
        Ok(Ddl::plain(format!("DROP TABLE {}", self.quote(table))))
    }

    /// Generates `ALTER TABLE .. ADD` for a new column.
    ///
    /// Dialects that always append new columns ignore `position`.
    pub fn add_column(&self, column: &Column, table: &str, position: &ColumnPosition) -> Result<Ddl> {
        require_name(table, "Table name")?;

        let mut degraded = Vec::new();
        let clause = self.column_clause(column, ClauseOptions::FULL, &mut degraded)?;
        let mut sql = format!(
            "ALTER TABLE {} {} {clause}",
            self.quote(table),
            self.dialect.features().add_column
        );

        if *position != ColumnPosition::End {
            let placement = if self.dialect.features().column_position {
                match position {
                    ColumnPosition::First | ColumnPosition::Index(0) => Some("FIRST".to_string()),
                    ColumnPosition::After(after) => {
                        require_name(after, "Preceding column name")?;
                        Some(format!("AFTER {}", self.quote(after)))
                    }
                    // Resolving a numeric position needs the live column list.
                    ColumnPosition::Index(_) | ColumnPosition::End => None,
                }
            } else {
                None
            };

            match placement {
                Some(placement) => {
                    sql.push(' ');
                    sql.push_str(&placement);
                }
                None => self.degrade(
                    &mut degraded,
                    Degradation::ColumnPositionIgnored {
                        column: column.name.clone(),
                    },
                ),
            }
        }

        Ok(Ddl::new(sql, degraded))
    }

    /// Generates a statement changing a column to the given definition.
    ///
    /// The primary key flag is not part of an alteration.
    pub fn alter_column(&self, column: &Column, table: &str) -> Result<Ddl> {
        require_name(table, "Table name")?;
        let t = self.quote(table);
        let mut degraded = Vec::new();

        let full = ClauseOptions {
            primary_key: false,
            ..ClauseOptions::FULL
        };

        let sql = match self.dialect {
            Dialect::Sqlite => return Err(self.unsupported("altering a column")),
            Dialect::Oracle => {
                let clause = self.column_clause(column, full, &mut degraded)?;
                format!("ALTER TABLE {t} MODIFY ({clause})")
            }
            Dialect::MySql => {
                let clause = self.column_clause(column, full, &mut degraded)?;
                format!("ALTER TABLE {t} MODIFY COLUMN {clause}")
            }
            Dialect::Postgres => {
                let c = self.quote(&column.name);
                self.ignore_autoincrement(column, &mut degraded);
                let data_type = self.type_clause(column, false, &mut degraded)?;
                let nullability = if column.nullable {
                    "DROP NOT NULL"
                } else {
                    "SET NOT NULL"
                };
                let mut sql = format!(
                    "ALTER TABLE {t} ALTER COLUMN {c} TYPE {data_type}, \
                     ALTER COLUMN {c} {nullability}"
                );
                // A serial column keeps its sequence default.
                match column.default.as_deref() {
                    Some(value) => sql.push_str(&format!(
                        ", ALTER COLUMN {c} SET DEFAULT {}",
                        self.dialect.quote_literal(value)
                    )),
                    None if !column.autoincrement => {
                        sql.push_str(&format!(", ALTER COLUMN {c} DROP DEFAULT"));
                    }
                    None => {}
                }
                sql
            }
            Dialect::Derby => {
                let c = self.quote(&column.name);
                self.ignore_autoincrement(column, &mut degraded);
                let data_type = self.type_clause(column, false, &mut degraded)?;
                if !column.nullable || column.default.is_some() {
                    self.degrade(
                        &mut degraded,
                        Degradation::ColumnModifiersIgnored {
                            column: column.name.clone(),
                        },
                    );
                }
                format!("ALTER TABLE {t} ALTER COLUMN {c} SET DATA TYPE {data_type}")
            }
            Dialect::SqlServer => {
                // Defaults are separate constraints and IDENTITY cannot be added later.
                if column.default.is_some() {
                    self.degrade(
                        &mut degraded,
                        Degradation::ColumnModifiersIgnored {
                            column: column.name.clone(),
                        },
                    );
                }
                self.ignore_autoincrement(column, &mut degraded);
                let without_default = Column {
                    default: None,
                    ..column.clone()
                };
                let clause = self.column_clause(
                    &without_default,
                    ClauseOptions {
                        primary_key: false,
                        modifiers: true,
                        autoincrement: false,
                    },
                    &mut degraded,
                )?;
                format!("ALTER TABLE {t} ALTER COLUMN {clause}")
            }
            Dialect::Generic | Dialect::H2 => {
                let clause = self.column_clause(column, full, &mut degraded)?;
                format!("ALTER TABLE {t} ALTER COLUMN {clause}")
            }
        };

        Ok(Ddl::new(sql, degraded))
    }

    /// Generates `ALTER TABLE .. DROP COLUMN`.
    pub fn drop_column(&self, column: &str, table: &str) -> Result<Ddl> {
        require_name(column, "Column name")?;
        require_name(table, "Table name")?;
        Ok(Ddl::plain(format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote(table),
            self.quote(column)
        )))
    }

    /// Generates a statement renaming a column.
    pub fn rename_column(&self, old_name: &str, new_name: &str, table: &str) -> Result<Ddl> {
        require_name(old_name, "Old column name")?;
        require_name(new_name, "New column name")?;
        require_name(table, "Table name")?;

        let sql = match self.dialect {
            Dialect::SqlServer => format!(
                "EXEC sp_rename {}, {}, 'COLUMN'",
                self.dialect.quote_literal(&format!("{table}.{old_name}")),
                self.dialect.quote_literal(new_name)
            ),
            Dialect::Derby => format!(
                "RENAME COLUMN {}.{} TO {}",
                self.quote(table),
                self.quote(old_name),
                self.quote(new_name)
            ),
            Dialect::H2 => format!(
                "ALTER TABLE {} ALTER COLUMN {} RENAME TO {}",
                self.quote(table),
                self.quote(old_name),
                self.quote(new_name)
            ),
            _ => format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                self.quote(table),
                self.quote(old_name),
                self.quote(new_name)
            ),
        };

        Ok(Ddl::plain(sql))
    }

    /// Generates a statement renaming a table.
    pub fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Ddl> {
        require_name(old_name, "Table name")?;
        require_name(new_name, "New table name")?;

        let (old, new) = (self.quote(old_name), self.quote(new_name));
        let sql = match self.dialect {
            Dialect::Oracle => format!("RENAME {old} TO {new}"),
            Dialect::MySql | Dialect::Derby => format!("RENAME TABLE {old} TO {new}"),
            Dialect::SqlServer => format!(
                "EXEC sp_rename {}, {}",
                self.dialect.quote_literal(old_name),
                self.dialect.quote_literal(new_name)
            ),
            _ => format!("ALTER TABLE {old} RENAME TO {new}"),
        };

        Ok(Ddl::plain(sql))
    }

    /// Generates `CREATE [UNIQUE] INDEX`.
    ///
    /// An index flagged as primary key becomes a primary key constraint on
    /// dialects that do not index primary keys on their own; elsewhere the
    /// flag is ignored.
    pub fn add_index(&self, index: &Index) -> Result<Ddl> {
        require_name(&index.name, "Index name")?;
        require_name(&index.table, "Table name")?;
        if index.columns.is_empty() {
            return Err(MigrateError::validation(format!(
                "Index {} needs at least one column",
                index.name
            )));
        }
        if let Some(max) = self.dialect.features().max_index_columns {
            if index.columns.len() > max {
                return Err(MigrateError::validation(format!(
                    "{} does not support indexes on more than {max} columns",
                    self.dialect
                )));
            }
        }

        let mut degraded = Vec::new();
        if index.primary_key {
            if !self.dialect.features().creates_primary_key_index {
                return Ok(Ddl::plain(format!(
                    "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY ({})",
                    self.quote(&index.table),
                    self.quote(&index.name),
                    self.quote_list(&index.columns)
                )));
            }
            self.degrade(
                &mut degraded,
                Degradation::PrimaryKeyIndexIgnored {
                    index: index.name.clone(),
                },
            );
        }

        let mut sql = String::from("CREATE ");
        if index.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str(&format!(
            "INDEX {} ON {} ({})",
            self.quote(&index.name),
            self.quote(&index.table),
            self.quote_list(&index.columns)
        ));

        Ok(Ddl::new(sql, degraded))
    }

    /// Generates `DROP INDEX`.
    pub fn drop_index(&self, index: &str, table: &str) -> Result<Ddl> {
        require_name(index, "Index name")?;
        let sql = match self.dialect {
            Dialect::MySql | Dialect::SqlServer => {
                require_name(table, "Table name")?;
                format!("DROP INDEX {} ON {}", self.quote(index), self.quote(table))
            }
            _ => format!("DROP INDEX {}", self.quote(index)),
        };
        Ok(Ddl::plain(sql))
    }

    /// Generates `ALTER TABLE .. ADD CONSTRAINT .. FOREIGN KEY`.
    ///
    /// Cascade rules the dialect lacks are left out and reported.
    pub fn add_foreign_key(&self, key: &ForeignKey) -> Result<Ddl> {
        require_name(&key.name, "Foreign key name")?;
        require_name(&key.child_table, "Child table name")?;
        require_name(&key.parent_table, "Parent table name")?;
        if key.child_columns.is_empty() || key.parent_columns.is_empty() {
            return Err(MigrateError::validation(format!(
                "Foreign key {} needs child and parent columns",
                key.name
            )));
        }
        if key.child_columns.len() != key.parent_columns.len() {
            return Err(MigrateError::validation(format!(
                "Foreign key {} has {} child columns but {} parent columns",
                key.name,
                key.child_columns.len(),
                key.parent_columns.len()
            )));
        }
        if self.dialect == Dialect::Sqlite {
            return Err(self.unsupported("adding a foreign key to an existing table"));
        }

        let mut degraded = Vec::new();
        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote(&key.child_table),
            self.quote(&key.name),
            self.quote_list(&key.child_columns),
            self.quote(&key.parent_table),
            self.quote_list(&key.parent_columns)
        );

        if key.on_delete != CascadeRule::None {
            if self.dialect.supports_delete_rule(key.on_delete) {
                sql.push_str(" ON DELETE ");
                sql.push_str(key.on_delete.as_sql());
            } else {
                self.degrade(
                    &mut degraded,
                    Degradation::DeleteRuleDropped {
                        constraint: key.name.clone(),
                        rule: key.on_delete,
                    },
                );
            }
        }

        if key.on_update != CascadeRule::None {
            if self.dialect.supports_update_rule(key.on_update) {
                sql.push_str(" ON UPDATE ");
                sql.push_str(key.on_update.as_sql());
            } else {
                self.degrade(
                    &mut degraded,
                    Degradation::UpdateRuleDropped {
                        constraint: key.name.clone(),
                        rule: key.on_update,
                    },
                );
            }
        }

        Ok(Ddl::new(sql, degraded))
    }

    /// Generates a statement dropping a foreign key constraint.
    pub fn drop_foreign_key(&self, name: &str, table: &str) -> Result<Ddl> {
        require_name(name, "Foreign key name")?;
        require_name(table, "Table name")?;
        let sql = match self.dialect {
            Dialect::Sqlite => return Err(self.unsupported("dropping a foreign key")),
            Dialect::MySql => format!(
                "ALTER TABLE {} DROP FOREIGN KEY {}",
                self.quote(table),
                self.quote(name)
            ),
            _ => format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                self.quote(table),
                self.quote(name)
            ),
        };
        Ok(Ddl::plain(sql))
    }

    /// Renders the clause for one column:
    /// `<name> <type>[(<len>)][(<p>[,<s>])] [NOT NULL] [DEFAULT '<v>'] [PRIMARY KEY]`.
    pub fn column_definition(&self, column: &Column) -> Result<Ddl> {
        let mut degraded = Vec::new();
        let sql = self.column_clause(column, ClauseOptions::FULL, &mut degraded)?;
        Ok(Ddl::new(sql, degraded))
    }

    fn column_clause(
        &self,
        column: &Column,
        options: ClauseOptions,
        degraded: &mut Vec<Degradation>,
    ) -> Result<String> {
        let features = self.dialect.features();
        let inline_primary_key = options.primary_key && column.primary_key;
        let autoincrement = column.autoincrement && options.autoincrement;

        let mut sql = format!(
            "{} {}",
            self.quote(&column.name),
            self.type_clause(column, autoincrement, degraded)?
        );

        let mut modifiers = Vec::new();
        if options.modifiers {
            let not_null = (!column.nullable).then(|| "NOT NULL".to_string());
            let default = column
                .default
                .as_deref()
                .map(|value| format!("DEFAULT {}", self.dialect.quote_literal(value)));
            modifiers.extend(not_null);
            modifiers.extend(default);
        }

        let mut autoincrement_suffix = None;
        if autoincrement {
            match features.autoincrement {
                AutoIncrement::Keyword(keyword) => modifiers.push(keyword.to_string()),
                AutoIncrement::PrimaryKeySuffix(keyword)
                    if inline_primary_key
                        && self.dialect.type_name(column.column_type) == "INTEGER" =>
                {
                    autoincrement_suffix = Some(keyword);
                }
                // Handled by `type_clause`.
                AutoIncrement::SerialType => {}
                AutoIncrement::Unsupported | AutoIncrement::PrimaryKeySuffix(_) => self.degrade(
                    degraded,
                    Degradation::AutoIncrementIgnored {
                        column: column.name.clone(),
                    },
                ),
            }
        }

        if inline_primary_key {
            modifiers.push("PRIMARY KEY".to_string());
        }
        modifiers.extend(autoincrement_suffix.map(str::to_string));

        for modifier in modifiers {
            sql.push(' ');
            sql.push_str(&modifier);
        }
        Ok(sql)
    }

    /// Renders the native type with its length or precision/scale clause.
    fn type_clause(
        &self,
        column: &Column,
        autoincrement: bool,
        degraded: &mut Vec<Degradation>,
    ) -> Result<String> {
        require_name(&column.name, "Column name")?;
        if column.scale.is_some() && column.precision.is_none() {
            return Err(MigrateError::validation(format!(
                "Scale of column {} is defined, but precision isn't",
                column.name
            )));
        }

        let ty = column.column_type;
        if autoincrement && self.dialect.features().autoincrement == AutoIncrement::SerialType {
            if let Some(serial) = self.dialect.serial_type(ty) {
                return Ok(serial.to_string());
            }
            self.degrade(
                degraded,
                Degradation::AutoIncrementIgnored {
                    column: column.name.clone(),
                },
            );
        }

        let mut sql = self.dialect.type_name(ty).to_string();
        if self.dialect.needs_length(ty) {
            if let Some(length) = column.length {
                sql.push_str(&format!("({length})"));
            }
        }
        if self.dialect.accepts_scale(ty) {
            if let Some(precision) = column.precision {
                match column.scale {
                    Some(scale) => sql.push_str(&format!("({precision},{scale})")),
                    None => sql.push_str(&format!("({precision})")),
                }
            }
        }
        Ok(sql)
    }
}

fn require_name(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MigrateError::validation(format!("{what} can not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn generator(dialect: Dialect) -> DdlGenerator {
        DdlGenerator::new(dialect)
    }

    fn id_desc_table(name: &str) -> Table {
        Table::new(name)
            .column(
                Column::new("id", ColumnType::Integer)
                    .primary_key()
                    .autoincrement(),
            )
            .column(Column::new("desc", ColumnType::Varchar).length(50))
    }

    #[test]
    fn test_column_clause_length_then_not_null() {
        let col = Column::new("name", ColumnType::Varchar).length(50).not_null();
        let ddl = generator(Dialect::Postgres).column_definition(&col).unwrap();

        assert_eq!(ddl.sql, "\"name\" VARCHAR(50) NOT NULL");
        assert_eq!(ddl.sql.matches('(').count(), 1);
    }

    #[test]
    fn test_column_clause_precision_and_scale() {
        let col = Column::new("amount", ColumnType::Decimal)
            .precision(10)
            .scale(2);
        let ddl = generator(Dialect::Generic).column_definition(&col).unwrap();
        assert_eq!(ddl.sql, "\"amount\" DECIMAL(10,2)");

        let col = Column::new("ratio", ColumnType::Numeric).precision(5);
        let ddl = generator(Dialect::Oracle).column_definition(&col).unwrap();
        assert_eq!(ddl.sql, "\"ratio\" NUMBER(5)");
    }

    #[test]
    fn test_scale_without_precision_rejected() {
        let col = Column::new("amount", ColumnType::Decimal).scale(2);
        for dialect in Dialect::ALL {
            let err = generator(dialect).column_definition(&col).unwrap_err();
            assert!(matches!(err, MigrateError::Validation(_)), "{dialect}");
        }

        let table = Table::new("prices").column(col);
        let err = generator(Dialect::MySql)
            .create_table(&table, None)
            .unwrap_err();
        assert!(matches!(err, MigrateError::Validation(_)));
    }

    #[test]
    fn test_column_clause_default_is_quoted() {
        let col = Column::new("status", ColumnType::Varchar)
            .length(10)
            .not_null()
            .default_value("new");
        let ddl = generator(Dialect::MySql).column_definition(&col).unwrap();
        assert_eq!(ddl.sql, "`status` VARCHAR(10) NOT NULL DEFAULT 'new'");
    }

    #[test]
    fn test_oracle_not_null_precedes_default() {
        let col = Column::new("status", ColumnType::Varchar)
            .length(10)
            .not_null()
            .default_value("it's");
        let ddl = generator(Dialect::Oracle).column_definition(&col).unwrap();
        assert_eq!(ddl.sql, "\"status\" VARCHAR2(10) NOT NULL DEFAULT 'it''s'");
    }

    #[test]
    fn test_create_table_oracle_ignores_autoincrement() {
        let ddl = generator(Dialect::Oracle)
            .create_table(&id_desc_table("oracle"), None)
            .unwrap();

        assert_eq!(
            ddl.sql,
            "CREATE TABLE \"oracle\" (\"id\" INTEGER NOT NULL PRIMARY KEY, \"desc\" VARCHAR2(50))"
        );
        assert_eq!(
            ddl.degraded,
            vec![Degradation::AutoIncrementIgnored {
                column: "id".to_string()
            }]
        );
    }

    #[test]
    fn test_create_table_autoincrement_per_dialect() {
        let table = id_desc_table("t");

        let mysql = generator(Dialect::MySql).create_table(&table, None).unwrap();
        assert!(mysql.sql.contains("`id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY"));
        assert!(mysql.is_exact());

        let pg = generator(Dialect::Postgres).create_table(&table, None).unwrap();
        assert!(pg.sql.contains("\"id\" SERIAL NOT NULL PRIMARY KEY"));

        let sqlite = generator(Dialect::Sqlite).create_table(&table, None).unwrap();
        assert!(sqlite
            .sql
            .contains("\"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT"));

        let mssql = generator(Dialect::SqlServer)
            .create_table(&table, None)
            .unwrap();
        assert!(mssql.sql.contains("[id] INT NOT NULL IDENTITY(1,1) PRIMARY KEY"));

        let derby = generator(Dialect::Derby).create_table(&table, None).unwrap();
        assert!(derby
            .sql
            .contains("GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY"));
    }

    #[test]
    fn test_create_table_composite_primary_key() {
        let table = Table::new("order_lines")
            .column(Column::new("order_id", ColumnType::Integer).primary_key())
            .column(Column::new("line_no", ColumnType::Integer).primary_key())
            .column(Column::new("qty", ColumnType::Integer));

        let ddl = generator(Dialect::Postgres)
            .create_table(&table, None)
            .unwrap();
        assert_eq!(
            ddl.sql,
            "CREATE TABLE \"order_lines\" (\"order_id\" INTEGER NOT NULL, \
             \"line_no\" INTEGER NOT NULL, \"qty\" INTEGER, \
             CONSTRAINT \"order_lines_pk\" PRIMARY KEY(\"order_id\", \"line_no\"))"
        );
    }

    #[test]
    fn test_sqlite_autoincrement_needs_inline_primary_key() {
        let table = Table::new("pairs")
            .column(
                Column::new("a", ColumnType::Integer)
                    .primary_key()
                    .autoincrement(),
            )
            .column(Column::new("b", ColumnType::Integer).primary_key());

        let ddl = generator(Dialect::Sqlite).create_table(&table, None).unwrap();
        assert!(!ddl.sql.contains("AUTOINCREMENT"));
        assert_eq!(ddl.degraded.len(), 1);
    }

    #[test]
    fn test_create_table_with_options() {
        let ddl = generator(Dialect::MySql)
            .create_table(&id_desc_table("t"), Some("ENGINE=InnoDB"))
            .unwrap();
        assert!(ddl.sql.ends_with(") ENGINE=InnoDB"));
    }

    #[test]
    fn test_create_table_requires_columns() {
        let err = generator(Dialect::Generic)
            .create_table(&Table::new("empty"), None)
            .unwrap_err();
        assert!(matches!(err, MigrateError::Validation(_)));
    }

    #[test]
    fn test_create_table_primary_key_ceiling() {
        let columns = (0..33)
            .map(|i| Column::new(format!("c{i}"), ColumnType::Integer).primary_key())
            .collect();
        let table = Table::with_columns("wide", columns);

        let err = generator(Dialect::Oracle)
            .create_table(&table, None)
            .unwrap_err();
        assert!(matches!(err, MigrateError::Validation(_)));

        // No ceiling on SQLite.
        assert!(generator(Dialect::Sqlite).create_table(&table, None).is_ok());
    }

    #[test]
    fn test_add_column_positioning() {
        let col = Column::new("email", ColumnType::Varchar).length(255);
        let after = ColumnPosition::After("name".to_string());

        let mysql = generator(Dialect::MySql)
            .add_column(&col, "users", &after)
            .unwrap();
        assert_eq!(
            mysql.sql,
            "ALTER TABLE `users` ADD COLUMN `email` VARCHAR(255) AFTER `name`"
        );
        assert!(mysql.is_exact());

        let first = generator(Dialect::H2)
            .add_column(&col, "users", &ColumnPosition::Index(0))
            .unwrap();
        assert!(first.sql.ends_with(" FIRST"));

        let oracle = generator(Dialect::Oracle)
            .add_column(&col, "users", &after)
            .unwrap();
        assert_eq!(oracle.sql, "ALTER TABLE \"users\" ADD \"email\" VARCHAR2(255)");
        assert_eq!(
            oracle.degraded,
            vec![Degradation::ColumnPositionIgnored {
                column: "email".to_string()
            }]
        );
    }

    #[test]
    fn test_add_column_at_end_is_exact_everywhere() {
        let col = Column::new("age", ColumnType::Integer);
        for dialect in Dialect::ALL {
            let ddl = generator(dialect)
                .add_column(&col, "users", &ColumnPosition::End)
                .unwrap();
            assert!(ddl.is_exact(), "{dialect}");
        }
    }

    #[test]
    fn test_alter_column_syntax() {
        let col = Column::new("name", ColumnType::Varchar).length(100).not_null();

        let oracle = generator(Dialect::Oracle).alter_column(&col, "users").unwrap();
        assert_eq!(
            oracle.sql,
            "ALTER TABLE \"users\" MODIFY (\"name\" VARCHAR2(100) NOT NULL)"
        );

        let mysql = generator(Dialect::MySql).alter_column(&col, "users").unwrap();
        assert_eq!(
            mysql.sql,
            "ALTER TABLE `users` MODIFY COLUMN `name` VARCHAR(100) NOT NULL"
        );

        let pg = generator(Dialect::Postgres).alter_column(&col, "users").unwrap();
        assert_eq!(
            pg.sql,
            "ALTER TABLE \"users\" ALTER COLUMN \"name\" TYPE VARCHAR(100), \
             ALTER COLUMN \"name\" SET NOT NULL, ALTER COLUMN \"name\" DROP DEFAULT"
        );

        let derby = generator(Dialect::Derby).alter_column(&col, "users").unwrap();
        assert_eq!(
            derby.sql,
            "ALTER TABLE \"users\" ALTER COLUMN \"name\" SET DATA TYPE VARCHAR(100)"
        );
        assert_eq!(derby.degraded.len(), 1);
    }

    #[test]
    fn test_alter_column_reports_dropped_autoincrement() {
        let col = Column::new("id", ColumnType::Integer)
            .not_null()
            .autoincrement();
        let ignored = vec![Degradation::AutoIncrementIgnored {
            column: "id".to_string(),
        }];

        let pg = generator(Dialect::Postgres).alter_column(&col, "t").unwrap();
        assert_eq!(
            pg.sql,
            "ALTER TABLE \"t\" ALTER COLUMN \"id\" TYPE INTEGER, \
             ALTER COLUMN \"id\" SET NOT NULL"
        );
        assert_eq!(pg.degraded, ignored);

        let mssql = generator(Dialect::SqlServer).alter_column(&col, "t").unwrap();
        assert_eq!(mssql.sql, "ALTER TABLE [t] ALTER COLUMN [id] INT NOT NULL");
        assert_eq!(mssql.degraded, ignored);

        let derby = generator(Dialect::Derby).alter_column(&col, "t").unwrap();
        assert!(derby.degraded.contains(&ignored[0]));

        let oracle = generator(Dialect::Oracle).alter_column(&col, "t").unwrap();
        assert_eq!(oracle.degraded, ignored);

        let mysql = generator(Dialect::MySql).alter_column(&col, "t").unwrap();
        assert!(mysql.sql.ends_with("NOT NULL AUTO_INCREMENT"));
        assert!(mysql.is_exact());
    }

    #[test]
    fn test_alter_column_postgres_sets_default() {
        let col = Column::new("status", ColumnType::Varchar)
            .length(10)
            .default_value("new");
        let pg = generator(Dialect::Postgres).alter_column(&col, "t").unwrap();
        assert_eq!(
            pg.sql,
            "ALTER TABLE \"t\" ALTER COLUMN \"status\" TYPE VARCHAR(10), \
             ALTER COLUMN \"status\" DROP NOT NULL, ALTER COLUMN \"status\" SET DEFAULT 'new'"
        );
        assert!(pg.is_exact());
    }

    #[test]
    fn test_alter_column_unsupported_on_sqlite() {
        let col = Column::new("name", ColumnType::Varchar);
        let err = generator(Dialect::Sqlite)
            .alter_column(&col, "users")
            .unwrap_err();
        assert!(matches!(
            err,
            MigrateError::Unsupported {
                dialect: "SQLite",
                ..
            }
        ));
    }

    #[test]
    fn test_drop_and_rename_column() {
        let g = generator(Dialect::Generic);
        assert_eq!(
            g.drop_column("email", "users").unwrap().sql,
            "ALTER TABLE \"users\" DROP COLUMN \"email\""
        );
        assert_eq!(
            g.rename_column("name", "full_name", "users").unwrap().sql,
            "ALTER TABLE \"users\" RENAME COLUMN \"name\" TO \"full_name\""
        );

        let mssql = generator(Dialect::SqlServer)
            .rename_column("name", "full_name", "users")
            .unwrap();
        assert_eq!(mssql.sql, "EXEC sp_rename 'users.name', 'full_name', 'COLUMN'");
    }

    #[test]
    fn test_rename_table_syntax() {
        assert_eq!(
            generator(Dialect::Oracle)
                .rename_table("users", "accounts")
                .unwrap()
                .sql,
            "RENAME \"users\" TO \"accounts\""
        );
        assert_eq!(
            generator(Dialect::MySql)
                .rename_table("users", "accounts")
                .unwrap()
                .sql,
            "RENAME TABLE `users` TO `accounts`"
        );
        assert_eq!(
            generator(Dialect::Postgres)
                .rename_table("users", "accounts")
                .unwrap()
                .sql,
            "ALTER TABLE \"users\" RENAME TO \"accounts\""
        );
    }

    #[test]
    fn test_add_index() {
        let index = Index::new("idx_users_email", "users", ["email"]).unique();
        let ddl = generator(Dialect::Postgres).add_index(&index).unwrap();
        assert_eq!(
            ddl.sql,
            "CREATE UNIQUE INDEX \"idx_users_email\" ON \"users\" (\"email\")"
        );
    }

    #[test]
    fn test_add_index_primary_key_flag() {
        let index = Index::new("users_pk", "users", ["id"]).primary_key();

        let oracle = generator(Dialect::Oracle).add_index(&index).unwrap();
        assert_eq!(oracle.sql, "CREATE INDEX \"users_pk\" ON \"users\" (\"id\")");
        assert_eq!(
            oracle.degraded,
            vec![Degradation::PrimaryKeyIndexIgnored {
                index: "users_pk".to_string()
            }]
        );

        let mysql = generator(Dialect::MySql).add_index(&index).unwrap();
        assert_eq!(
            mysql.sql,
            "ALTER TABLE `users` ADD CONSTRAINT `users_pk` PRIMARY KEY (`id`)"
        );
    }

    #[test]
    fn test_add_index_column_ceiling() {
        let columns: Vec<String> = (0..33).map(|i| format!("c{i}")).collect();
        let index = Index::new("idx_wide", "wide", columns);
        let err = generator(Dialect::Oracle).add_index(&index).unwrap_err();
        assert!(matches!(err, MigrateError::Validation(_)));

        let empty = Index::new("idx_none", "t", Vec::<String>::new());
        assert!(generator(Dialect::Generic).add_index(&empty).is_err());
    }

    #[test]
    fn test_foreign_key_cascade_supported() {
        let fk = ForeignKey::new("fk_posts_user", "posts", ["user_id"], "users", ["id"])
            .on_delete(CascadeRule::Cascade);

        for dialect in [Dialect::MySql, Dialect::Postgres, Dialect::Oracle] {
            let ddl = generator(dialect).add_foreign_key(&fk).unwrap();
            assert!(ddl.sql.ends_with(" ON DELETE CASCADE"), "{dialect}");
            assert!(ddl.is_exact());
        }
    }

    #[test]
    fn test_foreign_key_update_rule_degrades_on_oracle() {
        let fk = ForeignKey::new("fk_posts_user", "posts", ["user_id"], "users", ["id"])
            .on_delete(CascadeRule::SetNull)
            .on_update(CascadeRule::Cascade);

        let ddl = generator(Dialect::Oracle).add_foreign_key(&fk).unwrap();
        assert_eq!(
            ddl.sql,
            "ALTER TABLE \"posts\" ADD CONSTRAINT \"fk_posts_user\" FOREIGN KEY (\"user_id\") \
             REFERENCES \"users\" (\"id\") ON DELETE SET NULL"
        );
        assert_eq!(
            ddl.degraded,
            vec![Degradation::UpdateRuleDropped {
                constraint: "fk_posts_user".to_string(),
                rule: CascadeRule::Cascade,
            }]
        );

        let pg = generator(Dialect::Postgres).add_foreign_key(&fk).unwrap();
        assert!(pg.sql.ends_with("ON DELETE SET NULL ON UPDATE CASCADE"));
    }

    #[test]
    fn test_foreign_key_column_mismatch() {
        let fk = ForeignKey::new("fk", "a", ["x", "y"], "b", ["id"]);
        let err = generator(Dialect::Postgres).add_foreign_key(&fk).unwrap_err();
        assert!(matches!(err, MigrateError::Validation(_)));
    }

    #[test]
    fn test_drop_statements() {
        assert_eq!(
            generator(Dialect::MySql)
                .drop_index("idx", "users")
                .unwrap()
                .sql,
            "DROP INDEX `idx` ON `users`"
        );
        assert_eq!(
            generator(Dialect::Postgres)
                .drop_index("idx", "users")
                .unwrap()
                .sql,
            "DROP INDEX \"idx\""
        );
        assert_eq!(
            generator(Dialect::MySql)
                .drop_foreign_key("fk", "posts")
                .unwrap()
                .sql,
            "ALTER TABLE `posts` DROP FOREIGN KEY `fk`"
        );
        assert_eq!(
            generator(Dialect::Oracle)
                .drop_foreign_key("fk", "posts")
                .unwrap()
                .sql,
            "ALTER TABLE \"posts\" DROP CONSTRAINT \"fk\""
        );
        assert_eq!(
            generator(Dialect::Generic).drop_table("users").unwrap().sql,
            "DROP TABLE \"users\""
        );
    }

    #[test]
    fn test_empty_names_rejected() {
        let g = generator(Dialect::Generic);
        assert!(g.drop_table("").is_err());
        assert!(g.drop_column("", "users").is_err());
        assert!(g.rename_table("users", " ").is_err());
    }
}
