//! DDL parser implementation.

use super::canonical::render_tokens;
use super::error::ParseError;
use crate::ast::{
    AlterDatabase, AlterTable, AlterTableAction, ChangeStreamFor, CheckConstraint, ColumnDef,
    ColumnType, CreateChangeStream, CreateIndex, CreateLocalityGroup, CreateSchema,
    CreateSearchIndex, CreateTable, Expr, ForeignKey, Generation, KeyPart, OnDelete, OptionList,
    OrderDirection, RowDeletionPolicy, Statement, TableConstraint, TableInterleave, TrackedTable,
    TypeLength, UnsupportedStatement, BUILTIN_TYPES,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// DDL parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
        }
    }

    /// Parses a whole DDL text: statements separated by `;`.
    ///
    /// Empty statements and stray semicolons are skipped.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` for the first statement that does not parse.
    pub fn parse_ddl(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        loop {
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            if self.current.is_eof() {
                break;
            }
            statements.push(self.parse_statement()?);
            if !self.check(&TokenKind::Semicolon) && !self.current.is_eof() {
                return Err(self.unexpected("';' or end of input"));
            }
        }
        Ok(statements)
    }

    /// Parses a single DDL statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a DDL statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.current.span.start;
        match self.current.as_keyword() {
            Some(Keyword::Create) => {
                self.advance();
                self.parse_create(start)
            }
            Some(Keyword::Alter) => {
                self.advance();
                self.parse_alter(start)
            }
            Some(
                kw @ (Keyword::Drop
                | Keyword::Grant
                | Keyword::Revoke
                | Keyword::Rename
                | Keyword::Analyze),
            ) => Ok(self.skip_unsupported(start, kw.as_str().to_string())),
            _ => Err(self.unexpected("CREATE or ALTER")),
        }
    }

    fn parse_create(&mut self, start: usize) -> Result<Statement, ParseError> {
        match self.current.as_keyword() {
            Some(Keyword::Table) => Ok(Statement::CreateTable(self.parse_create_table()?)),
            Some(Keyword::Unique | Keyword::NullFiltered | Keyword::Index) => {
                Ok(Statement::CreateIndex(self.parse_create_index()?))
            }
            Some(Keyword::Search) => {
                Ok(Statement::CreateSearchIndex(self.parse_create_search_index()?))
            }
            Some(Keyword::Change) => {
                Ok(Statement::CreateChangeStream(self.parse_create_change_stream()?))
            }
            Some(Keyword::Schema) => Ok(Statement::CreateSchema(self.parse_create_schema()?)),
            Some(Keyword::Locality) => Ok(Statement::CreateLocalityGroup(
                self.parse_create_locality_group()?,
            )),
            Some(Keyword::Or) => {
                self.advance();
                self.expect_keyword(Keyword::Replace)?;
                Ok(self.skip_unsupported(start, String::from("CREATE OR REPLACE")))
            }
            _ => match object_kind(&self.current.kind) {
                Some(kind) => Ok(self.skip_unsupported(start, format!("CREATE {kind}"))),
                None => Err(self.unexpected("object type after CREATE")),
            },
        }
    }

    fn parse_alter(&mut self, start: usize) -> Result<Statement, ParseError> {
        match self.current.as_keyword() {
            Some(Keyword::Table) => Ok(Statement::AlterTable(self.parse_alter_table()?)),
            Some(Keyword::Database) => Ok(Statement::AlterDatabase(self.parse_alter_database()?)),
            _ => match object_kind(&self.current.kind) {
                Some(kind) => Ok(self.skip_unsupported(start, format!("ALTER {kind}"))),
                None => Err(self.unexpected("object type after ALTER")),
            },
        }
    }

    /// Skips to the end of the statement, keeping its source text.
    fn skip_unsupported(&mut self, start: usize, kind: String) -> Statement {
        while !self.check(&TokenKind::Semicolon) && !self.current.is_eof() {
            self.advance();
        }
        let end = self.previous.span.end.max(start);
        let text = Span::new(start, end).text(self.lexer.source()).trim();
        Statement::Unsupported(UnsupportedStatement {
            kind,
            text: text.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // CREATE TABLE
    // ------------------------------------------------------------------

    fn parse_create_table(&mut self) -> Result<CreateTable, ParseError> {
        self.expect_keyword(Keyword::Table)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_path()?;

        let mut columns = Vec::new();
        let mut constraints = Vec::new();
        self.expect(&TokenKind::LeftParen)?;
        while !self.check(&TokenKind::RightParen) {
            if self.at_constraint_start() {
                constraints.push(self.parse_table_constraint()?);
            } else {
                columns.push(self.parse_column_def()?);
            }
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;

        self.expect_keyword(Keyword::Primary)?;
        self.expect_keyword(Keyword::Key)?;
        self.expect(&TokenKind::LeftParen)?;
        let primary_key = if self.check(&TokenKind::RightParen) {
            vec![]
        } else {
            self.parse_key_parts()?
        };
        self.expect(&TokenKind::RightParen)?;

        let mut interleave = None;
        let mut row_deletion_policy = None;
        while self.check(&TokenKind::Comma) {
            self.advance();
            if self.check_keyword(Keyword::Interleave) {
                interleave = Some(self.parse_table_interleave()?);
            } else if self.check_keyword(Keyword::Row) {
                row_deletion_policy = Some(self.parse_row_deletion_policy()?);
            } else {
                return Err(self.unexpected("INTERLEAVE or ROW DELETION POLICY"));
            }
        }

        Ok(CreateTable {
            if_not_exists,
            name,
            columns,
            constraints,
            primary_key,
            interleave,
            row_deletion_policy,
        })
    }

    /// `FOREIGN` and `CHECK` are not reserved, so they may also start a
    /// column definition; look at the following token to tell them apart.
    fn at_constraint_start(&self) -> bool {
        match self.current.as_keyword() {
            Some(Keyword::Constraint) => true,
            Some(Keyword::Foreign) => {
                matches!(self.peek_kind(), TokenKind::Keyword(Keyword::Key))
            }
            Some(Keyword::Check) => matches!(self.peek_kind(), TokenKind::LeftParen),
            _ => false,
        }
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.expect_identifier()?;
        let column_type = self.parse_column_type()?;
        let mut column = ColumnDef::new(name, column_type);

        loop {
            if self.check_keyword(Keyword::Not) {
                self.advance();
                self.expect_keyword(Keyword::Null)?;
                column.not_null = true;
            } else if self.check_keyword(Keyword::Default) {
                self.advance();
                column.default = Some(self.parse_parenthesized_expr()?);
            } else if self.check_keyword(Keyword::As) {
                self.advance();
                let expr = self.parse_parenthesized_expr()?;
                let stored = self.check_keyword(Keyword::Stored);
                if stored {
                    self.advance();
                }
                column.generation = Some(Generation { expr, stored });
            } else if self.check_keyword(Keyword::Hidden) {
                self.advance();
                column.hidden = true;
            } else if self.check_keyword(Keyword::Options) {
                column.options = Some(self.parse_options()?);
            } else {
                break;
            }
        }
        Ok(column)
    }

    fn parse_column_type(&mut self) -> Result<ColumnType, ParseError> {
        if self.check_keyword(Keyword::Array) {
            self.advance();
            self.expect(&TokenKind::Lt)?;
            let element = self.parse_column_type()?;
            self.expect_closing_angle()?;
            let vector_length = if self.check(&TokenKind::LeftParen) {
                self.advance();
                let option = self.expect_identifier()?;
                if !option.eq_ignore_ascii_case("vector_length") {
                    return Err(ParseError::new(
                        format!("Unknown array type option '{option}'"),
                        self.previous.span,
                    ));
                }
                self.expect(&TokenKind::Arrow)?;
                let length = self.expect_length()?;
                self.expect(&TokenKind::RightParen)?;
                Some(length)
            } else {
                None
            };
            return Ok(ColumnType::Array {
                element: Box::new(element),
                vector_length,
            });
        }

        let name = self.parse_path()?;
        let upper = name.to_ascii_uppercase();
        if !BUILTIN_TYPES.contains(&upper.as_str()) {
            // Proto and enum types keep their spelling.
            return Ok(ColumnType::Scalar(name));
        }
        if upper != "STRING" && upper != "BYTES" {
            return Ok(ColumnType::Scalar(upper));
        }

        self.expect(&TokenKind::LeftParen)?;
        let length = match &self.current.kind {
            TokenKind::Identifier(word) if word.eq_ignore_ascii_case("MAX") => {
                self.advance();
                TypeLength::Max
            }
            _ => TypeLength::Limit(self.expect_length()?),
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(ColumnType::Sized {
            name: upper,
            length,
        })
    }

    /// Consumes a `>`, splitting a `>>` token that closes nested arrays.
    fn expect_closing_angle(&mut self) -> Result<(), ParseError> {
        match self.current.kind {
            TokenKind::Gt => {
                self.advance();
                Ok(())
            }
            TokenKind::RightShift => {
                let span = self.current.span;
                self.previous = Token::new(TokenKind::Gt, Span::new(span.start, span.start + 1));
                self.current = Token::new(TokenKind::Gt, Span::new(span.start + 1, span.end));
                Ok(())
            }
            _ => Err(self.unexpected("'>'")),
        }
    }

    fn parse_table_interleave(&mut self) -> Result<TableInterleave, ParseError> {
        self.expect_keyword(Keyword::Interleave)?;
        self.expect_keyword(Keyword::In)?;
        let in_parent = self.check_keyword(Keyword::Parent);
        if in_parent {
            self.advance();
        }
        let parent = self.parse_path()?;
        let on_delete = self.parse_on_delete()?;
        Ok(TableInterleave {
            parent,
            on_delete: if in_parent {
                Some(on_delete.unwrap_or(OnDelete::NoAction))
            } else {
                on_delete
            },
        })
    }

    fn parse_on_delete(&mut self) -> Result<Option<OnDelete>, ParseError> {
        if !self.check_keyword(Keyword::On) {
            return Ok(None);
        }
        self.advance();
        self.expect_keyword(Keyword::Delete)?;
        if self.check_keyword(Keyword::Cascade) {
            self.advance();
            return Ok(Some(OnDelete::Cascade));
        }
        self.expect_keyword(Keyword::No)?;
        self.expect_keyword(Keyword::Action)?;
        Ok(Some(OnDelete::NoAction))
    }

    fn parse_row_deletion_policy(&mut self) -> Result<RowDeletionPolicy, ParseError> {
        self.expect_keyword(Keyword::Row)?;
        self.expect_keyword(Keyword::Deletion)?;
        self.expect_keyword(Keyword::Policy)?;
        self.expect(&TokenKind::LeftParen)?;
        let function = self.expect_identifier()?.to_ascii_uppercase();
        self.expect(&TokenKind::LeftParen)?;
        let column = self.parse_path()?;
        self.expect(&TokenKind::Comma)?;
        self.expect_keyword(Keyword::Interval)?;
        let days = self.expect_integer()?;
        self.expect_keyword(Keyword::Day)?;
        self.expect(&TokenKind::RightParen)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(RowDeletionPolicy {
            function,
            column,
            days,
        })
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraint, ParseError> {
        let name = if self.check_keyword(Keyword::Constraint) {
            self.advance();
            Some(self.parse_path()?)
        } else {
            None
        };

        if self.check_keyword(Keyword::Foreign) {
            self.advance();
            self.expect_keyword(Keyword::Key)?;
            let columns = self.parse_parenthesized_names()?;
            self.expect_keyword(Keyword::References)?;
            let referenced_table = self.parse_path()?;
            let referenced_columns = self.parse_parenthesized_names()?;
            let on_delete = self.parse_on_delete()?;
            Ok(TableConstraint::ForeignKey(ForeignKey {
                name,
                columns,
                referenced_table,
                referenced_columns,
                on_delete,
            }))
        } else if self.check_keyword(Keyword::Check) {
            self.advance();
            let expr = self.parse_parenthesized_expr()?;
            Ok(TableConstraint::Check(CheckConstraint { name, expr }))
        } else {
            Err(self.unexpected("FOREIGN KEY or CHECK"))
        }
    }

    // ------------------------------------------------------------------
    // Indexes
    // ------------------------------------------------------------------

    fn parse_create_index(&mut self) -> Result<CreateIndex, ParseError> {
        let mut unique = false;
        let mut null_filtered = false;
        loop {
            if self.check_keyword(Keyword::Unique) {
                unique = true;
            } else if self.check_keyword(Keyword::NullFiltered) {
                null_filtered = true;
            } else {
                break;
            }
            self.advance();
        }
        self.expect_keyword(Keyword::Index)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_path()?;
        self.expect_keyword(Keyword::On)?;
        let table = self.parse_path()?;
        self.expect(&TokenKind::LeftParen)?;
        let key_parts = self.parse_key_parts()?;
        self.expect(&TokenKind::RightParen)?;
        let storing = self.parse_storing()?;

        let interleave_in = if self.check(&TokenKind::Comma) {
            self.advance();
            self.expect_keyword(Keyword::Interleave)?;
            self.expect_keyword(Keyword::In)?;
            Some(self.parse_path()?)
        } else {
            None
        };

        Ok(CreateIndex {
            unique,
            null_filtered,
            if_not_exists,
            name,
            table,
            key_parts,
            storing,
            interleave_in,
        })
    }

    fn parse_create_search_index(&mut self) -> Result<CreateSearchIndex, ParseError> {
        self.expect_keyword(Keyword::Search)?;
        self.expect_keyword(Keyword::Index)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_path()?;
        self.expect_keyword(Keyword::On)?;
        let table = self.parse_path()?;
        let token_columns = self.parse_parenthesized_names()?;
        let storing = self.parse_storing()?;

        let partition_by = if self.check_keyword(Keyword::Partition) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_name_list()?
        } else {
            vec![]
        };

        let order_by = if self.check_keyword(Keyword::Order) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_key_parts()?
        } else {
            vec![]
        };

        let filter = if self.check_keyword(Keyword::Where) {
            self.advance();
            Some(self.collect_expression("filter expression", |kind| {
                matches!(
                    kind,
                    TokenKind::Comma | TokenKind::Keyword(Keyword::Options)
                )
            })?)
        } else {
            None
        };

        let interleave_in = if self.check(&TokenKind::Comma) {
            self.advance();
            self.expect_keyword(Keyword::Interleave)?;
            self.expect_keyword(Keyword::In)?;
            Some(self.parse_path()?)
        } else {
            None
        };

        let options = self.parse_optional_options()?;

        Ok(CreateSearchIndex {
            if_not_exists,
            name,
            table,
            token_columns,
            storing,
            partition_by,
            order_by,
            filter,
            interleave_in,
            options,
        })
    }

    fn parse_storing(&mut self) -> Result<Vec<String>, ParseError> {
        if self.check_keyword(Keyword::Storing) {
            self.advance();
            self.parse_parenthesized_names()
        } else {
            Ok(vec![])
        }
    }

    // ------------------------------------------------------------------
    // Other CREATE statements
    // ------------------------------------------------------------------

    fn parse_create_change_stream(&mut self) -> Result<CreateChangeStream, ParseError> {
        self.expect_keyword(Keyword::Change)?;
        self.expect_keyword(Keyword::Stream)?;
        let name = self.parse_path()?;

        let for_clause = if self.check_keyword(Keyword::For) {
            self.advance();
            if self.check_keyword(Keyword::All) {
                self.advance();
                Some(ChangeStreamFor::All)
            } else {
                let mut tables = vec![self.parse_tracked_table()?];
                while self.check(&TokenKind::Comma) {
                    self.advance();
                    tables.push(self.parse_tracked_table()?);
                }
                Some(ChangeStreamFor::Tables(tables))
            }
        } else {
            None
        };

        let options = self.parse_optional_options()?;
        Ok(CreateChangeStream {
            name,
            for_clause,
            options,
        })
    }

    fn parse_tracked_table(&mut self) -> Result<TrackedTable, ParseError> {
        let table = self.parse_path()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.advance();
            let columns = if self.check(&TokenKind::RightParen) {
                vec![]
            } else {
                self.parse_name_list()?
            };
            self.expect(&TokenKind::RightParen)?;
            Some(columns)
        } else {
            None
        };
        Ok(TrackedTable { table, columns })
    }

    fn parse_create_schema(&mut self) -> Result<CreateSchema, ParseError> {
        self.expect_keyword(Keyword::Schema)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_path()?;
        let options = self.parse_optional_options()?;
        Ok(CreateSchema {
            if_not_exists,
            name,
            options,
        })
    }

    fn parse_create_locality_group(&mut self) -> Result<CreateLocalityGroup, ParseError> {
        self.expect_keyword(Keyword::Locality)?;
        self.expect_keyword(Keyword::Group)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = if self.check_keyword(Keyword::Default) {
            self.advance();
            None
        } else {
            Some(self.parse_path()?)
        };
        let options = self.parse_optional_options()?;
        Ok(CreateLocalityGroup {
            if_not_exists,
            name,
            options,
        })
    }

    // ------------------------------------------------------------------
    // ALTER statements
    // ------------------------------------------------------------------

    fn parse_alter_table(&mut self) -> Result<AlterTable, ParseError> {
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_path()?;

        let action = if self.check_keyword(Keyword::Add) {
            match self.peek_kind() {
                TokenKind::Keyword(Keyword::Constraint | Keyword::Foreign | Keyword::Check) => {
                    self.advance();
                    AlterTableAction::AddConstraint(self.parse_table_constraint()?)
                }
                TokenKind::Keyword(Keyword::Row) => {
                    self.advance();
                    AlterTableAction::AddRowDeletionPolicy(self.parse_row_deletion_policy()?)
                }
                _ => self.parse_other_action()?,
            }
        } else {
            self.parse_other_action()?
        };
        Ok(AlterTable { table, action })
    }

    fn parse_other_action(&mut self) -> Result<AlterTableAction, ParseError> {
        let expr = self.collect_expression("ALTER TABLE action", |_| false)?;
        Ok(AlterTableAction::Other(expr.as_str().to_string()))
    }

    fn parse_alter_database(&mut self) -> Result<AlterDatabase, ParseError> {
        self.expect_keyword(Keyword::Database)?;
        let name = self.parse_path()?;
        self.expect_keyword(Keyword::Set)?;
        let options = self.parse_options()?;
        Ok(AlterDatabase { name, options })
    }

    // ------------------------------------------------------------------
    // Shared clauses
    // ------------------------------------------------------------------

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if !self.check_keyword(Keyword::If) {
            return Ok(false);
        }
        self.advance();
        self.expect_keyword(Keyword::Not)?;
        self.expect_keyword(Keyword::Exists)?;
        Ok(true)
    }

    fn parse_optional_options(&mut self) -> Result<Option<OptionList>, ParseError> {
        if self.check_keyword(Keyword::Options) {
            Ok(Some(self.parse_options()?))
        } else {
            Ok(None)
        }
    }

    /// Parses `OPTIONS (key = value, ...)`.
    fn parse_options(&mut self) -> Result<OptionList, ParseError> {
        self.expect_keyword(Keyword::Options)?;
        self.expect(&TokenKind::LeftParen)?;
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            let key = self.expect_identifier()?;
            self.expect(&TokenKind::Eq)?;
            let value =
                self.collect_expression("option value", |kind| matches!(kind, TokenKind::Comma))?;
            entries.push((key, value));
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(OptionList::new(entries))
    }

    fn parse_key_parts(&mut self) -> Result<Vec<KeyPart>, ParseError> {
        let mut parts = Vec::new();
        loop {
            let column = self.parse_path()?;
            let direction = if self.check_keyword(Keyword::Desc) {
                self.advance();
                OrderDirection::Desc
            } else {
                if self.check_keyword(Keyword::Asc) {
                    self.advance();
                }
                OrderDirection::Asc
            };
            parts.push(KeyPart { column, direction });
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(parts)
    }

    fn parse_parenthesized_names(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let names = self.parse_name_list()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(names)
    }

    fn parse_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.parse_path()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            names.push(self.parse_path()?);
        }
        Ok(names)
    }

    /// Parses a possibly dotted name such as `sch.tbl`.
    fn parse_path(&mut self) -> Result<String, ParseError> {
        let mut path = self.expect_identifier()?;
        while self.check(&TokenKind::Dot) {
            self.advance();
            path.push('.');
            path.push_str(&self.expect_identifier()?);
        }
        Ok(path)
    }

    fn parse_parenthesized_expr(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.collect_expression("expression", |_| false)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(expr)
    }

    /// Collects a balanced token run and renders it as canonical text.
    ///
    /// Stops before an unbalanced `)` or `]`, a `;`, end of input, or a
    /// token at nesting depth zero for which `stop` returns true.
    fn collect_expression(
        &mut self,
        what: &str,
        stop: fn(&TokenKind) -> bool,
    ) -> Result<Expr, ParseError> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        loop {
            match &self.current.kind {
                TokenKind::Eof | TokenKind::Semicolon => {
                    if depth > 0 {
                        return Err(self.unexpected("')'"));
                    }
                    break;
                }
                TokenKind::Error(_) => return Err(self.unexpected(what)),
                TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                kind if depth == 0 && stop(kind) => break,
                _ => {}
            }
            tokens.push(self.current.clone());
            self.advance();
        }

        if tokens.is_empty() {
            return Err(self.unexpected(what));
        }
        Ok(Expr::new(render_tokens(&tokens, self.lexer.source())))
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    /// Advances to the next token.
    fn advance(&mut self) {
        self.previous = core::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Returns the kind of the token after the current one.
    fn peek_kind(&self) -> TokenKind {
        self.lexer.clone().next_token().kind
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::unexpected(expected, self.current.kind.clone(), self.current.span)
    }

    /// Expects the current token to be the given kind.
    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    /// Expects the current token to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Expects and returns an identifier.
    ///
    /// Non-reserved keywords are accepted with their source spelling.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                self.current.span.text(self.lexer.source()).to_string()
            }
            _ => return Err(self.unexpected("identifier")),
        };
        self.advance();
        Ok(name)
    }

    fn expect_integer(&mut self) -> Result<i64, ParseError> {
        match self.current.kind {
            TokenKind::Integer(value) => {
                self.advance();
                Ok(value)
            }
            _ => Err(self.unexpected("integer")),
        }
    }

    fn expect_length(&mut self) -> Result<u64, ParseError> {
        let span = self.current.span;
        let value = self.expect_integer()?;
        u64::try_from(value).map_err(|_| ParseError::new("Length must not be negative", span))
    }
}

/// Names the object type of an unsupported `CREATE`/`ALTER` statement.
fn object_kind(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Keyword(Keyword::Search) => Some(String::from("SEARCH INDEX")),
        TokenKind::Keyword(Keyword::Change) => Some(String::from("CHANGE STREAM")),
        TokenKind::Keyword(Keyword::Locality) => Some(String::from("LOCALITY GROUP")),
        TokenKind::Keyword(Keyword::Proto) => Some(String::from("PROTO BUNDLE")),
        TokenKind::Keyword(kw) => Some(kw.as_str().to_string()),
        TokenKind::Identifier(name) => Some(name.to_ascii_uppercase()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(sql: &str) -> Result<Statement, ParseError> {
        Parser::new(sql).parse_statement()
    }

    fn create_table(sql: &str) -> CreateTable {
        match parse(sql).unwrap() {
            Statement::CreateTable(table) => table,
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_create_table() {
        let table = create_table("CREATE TABLE t (a INT64, b STRING(10) NOT NULL) PRIMARY KEY (a)");
        assert_eq!(table.name, "t");
        assert_eq!(table.columns.len(), 2);
        assert!(table.columns[1].not_null);
        assert_eq!(table.primary_key, vec![KeyPart::asc("a")]);
        assert!(table.interleave.is_none());
    }

    #[test]
    fn test_nested_array_closing_shift() {
        let table = create_table("CREATE TABLE t (a ARRAY<ARRAY<INT64>>) PRIMARY KEY ()");
        assert_eq!(table.columns[0].column_type.array_depth(), 2);
        assert!(table.primary_key.is_empty());
    }

    #[test]
    fn test_interleave_defaults_to_no_action() {
        let table = create_table(
            "CREATE TABLE c (a INT64, b INT64) PRIMARY KEY (a, b), INTERLEAVE IN PARENT p",
        );
        assert_eq!(
            table.interleave,
            Some(TableInterleave {
                parent: String::from("p"),
                on_delete: Some(OnDelete::NoAction),
            })
        );
    }

    #[test]
    fn test_constraint_versus_column_named_check() {
        let table = create_table(
            "CREATE TABLE t (Check INT64, CONSTRAINT ck CHECK (Check > 0)) PRIMARY KEY (Check)",
        );
        assert_eq!(table.columns[0].name, "Check");
        assert_eq!(table.constraints.len(), 1);
        assert_eq!(table.constraints[0].to_string(), "CONSTRAINT ck CHECK (Check > 0)");
    }

    #[test]
    fn test_alter_table_actions() {
        let Statement::AlterTable(alter) =
            parse("ALTER TABLE t ADD CONSTRAINT fk FOREIGN KEY (a) REFERENCES u (b)").unwrap()
        else {
            panic!("expected ALTER TABLE");
        };
        assert!(matches!(alter.action, AlterTableAction::AddConstraint(_)));

        let Statement::AlterTable(other) = parse("alter table t add column c int64").unwrap()
        else {
            panic!("expected ALTER TABLE");
        };
        assert_eq!(other.action, AlterTableAction::Other(String::from("add column c int64")));
    }

    #[test]
    fn test_unsupported_statements_keep_text() {
        let Statement::Unsupported(drop) = parse("DROP TABLE t").unwrap() else {
            panic!("expected unsupported statement");
        };
        assert_eq!(drop.kind, "DROP");
        assert_eq!(drop.text, "DROP TABLE t");

        let Statement::Unsupported(view) =
            parse("CREATE VIEW v SQL SECURITY INVOKER AS SELECT 1").unwrap()
        else {
            panic!("expected unsupported statement");
        };
        assert_eq!(view.kind, "CREATE VIEW");
    }

    #[test]
    fn test_parse_ddl_splits_statements() {
        let statements = Parser::new(
            ";CREATE TABLE a (x INT64) PRIMARY KEY (x);; -- trailing; comment\n\
             CREATE INDEX i ON a (x DESC);",
        )
        .parse_ddl()
        .unwrap();
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[1], Statement::CreateIndex(_)));
    }

    #[test]
    fn test_missing_separator_is_an_error() {
        let err = Parser::new("CREATE SCHEMA a CREATE SCHEMA b")
            .parse_ddl()
            .unwrap_err();
        assert_eq!(err.expected.as_deref(), Some("';' or end of input"));
    }
}
