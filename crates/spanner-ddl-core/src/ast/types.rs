//! Column types and column definitions.

use core::fmt;

use super::clause::{quote_path, Expr, OptionList};

/// Scalar type names that are always rendered upper-case.
pub const BUILTIN_TYPES: &[&str] = &[
    "BOOL",
    "INT64",
    "FLOAT32",
    "FLOAT64",
    "NUMERIC",
    "STRING",
    "BYTES",
    "DATE",
    "TIMESTAMP",
    "JSON",
    "TOKENLIST",
    "UUID",
];

/// Length bound of a `STRING` or `BYTES` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLength {
    /// `MAX`
    Max,
    /// An explicit length.
    Limit(u64),
}

impl fmt::Display for TypeLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Max => f.write_str("MAX"),
            Self::Limit(n) => write!(f, "{n}"),
        }
    }
}

/// Shape of a column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// A scalar type such as `INT64`, or a proto/enum type name.
    Scalar(String),
    /// A length-bounded type, `STRING(n)` or `BYTES(MAX)`.
    Sized {
        /// Type name.
        name: String,
        /// Length bound.
        length: TypeLength,
    },
    /// `ARRAY<element>`, optionally with a vector length.
    Array {
        /// Element type.
        element: Box<ColumnType>,
        /// `vector_length` annotation of embedding columns.
        vector_length: Option<u64>,
    },
}

impl ColumnType {
    /// Creates a scalar type.
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }

    /// Creates an array type.
    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array {
            element: Box::new(element),
            vector_length: None,
        }
    }

    /// Returns how many `ARRAY<...>` levels wrap the innermost type.
    #[must_use]
    pub fn array_depth(&self) -> usize {
        match self {
            Self::Array { element, .. } => 1 + element.array_depth(),
            _ => 0,
        }
    }

    /// Returns the innermost non-array type.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Array { element, .. } => element.root(),
            other => other,
        }
    }

    /// Returns the type name, `ARRAY` for arrays.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(name) | Self::Sized { name, .. } => name,
            Self::Array { .. } => "ARRAY",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => f.write_str(name),
            Self::Sized { name, length } => write!(f, "{name}({length})"),
            Self::Array {
                element,
                vector_length,
            } => {
                write!(f, "ARRAY<{element}>")?;
                if let Some(len) = vector_length {
                    write!(f, "(vector_length=>{len})")?;
                }
                Ok(())
            }
        }
    }
}

/// Computed column clause, `AS (expr) [STORED]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Generating expression.
    pub expr: Expr,
    /// Whether the value is stored.
    pub stored: bool,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS ({})", self.expr)?;
        if self.stored {
            f.write_str(" STORED")?;
        }
        Ok(())
    }
}

/// A column definition inside `CREATE TABLE` or `ADD COLUMN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column type.
    pub column_type: ColumnType,
    /// `NOT NULL`
    pub not_null: bool,
    /// `DEFAULT (expr)`
    pub default: Option<Expr>,
    /// `AS (expr) [STORED]`
    pub generation: Option<Generation>,
    /// `HIDDEN`
    pub hidden: bool,
    /// Column options.
    pub options: Option<OptionList>,
}

impl ColumnDef {
    /// Creates a nullable column with no extra clauses.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            not_null: false,
            default: None,
            generation: None,
            hidden: false,
            options: None,
        }
    }

    /// Marks the column `NOT NULL`.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", quote_path(&self.name), self.column_type)?;
        if self.not_null {
            f.write_str(" NOT NULL")?;
        }
        if let Some(default) = &self.default {
            write!(f, " DEFAULT ({default})")?;
        }
        if let Some(generation) = &self.generation {
            write!(f, " {generation}")?;
        }
        if self.hidden {
            f.write_str(" HIDDEN")?;
        }
        if let Some(options) = &self.options {
            write!(f, " {options}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(name: &str, length: TypeLength) -> ColumnType {
        ColumnType::Sized {
            name: name.to_string(),
            length,
        }
    }

    #[test]
    fn test_type_rendering() {
        assert_eq!(ColumnType::scalar("INT64").to_string(), "INT64");
        assert_eq!(sized("STRING", TypeLength::Max).to_string(), "STRING(MAX)");
        assert_eq!(
            ColumnType::array(sized("BYTES", TypeLength::Limit(100))).to_string(),
            "ARRAY<BYTES(100)>"
        );
    }

    #[test]
    fn test_array_depth_and_root() {
        let nested = ColumnType::array(ColumnType::array(sized("STRING", TypeLength::Limit(10))));
        assert_eq!(nested.array_depth(), 2);
        assert_eq!(nested.root().type_name(), "STRING");
        assert_eq!(nested.type_name(), "ARRAY");
        assert_eq!(ColumnType::scalar("DATE").array_depth(), 0);
    }

    #[test]
    fn test_vector_length_rendering() {
        let embedding = ColumnType::Array {
            element: Box::new(ColumnType::scalar("FLOAT32")),
            vector_length: Some(128),
        };
        assert_eq!(embedding.to_string(), "ARRAY<FLOAT32>(vector_length=>128)");
    }

    #[test]
    fn test_column_def_rendering() {
        let mut column = ColumnDef::new("total", ColumnType::scalar("INT64")).not_null();
        column.generation = Some(Generation {
            expr: Expr::new("price * quantity"),
            stored: true,
        });
        assert_eq!(
            column.to_string(),
            "total INT64 NOT NULL AS (price * quantity) STORED"
        );

        let mut created = ColumnDef::new("created", ColumnType::scalar("TIMESTAMP"));
        created.default = Some(Expr::new("CURRENT_TIMESTAMP()"));
        created.hidden = true;
        assert_eq!(
            created.to_string(),
            "created TIMESTAMP DEFAULT (CURRENT_TIMESTAMP()) HIDDEN"
        );
    }
}
