//! Recursive-descent parser producing [`Statement`](crate::ast::Statement) trees.

use crate::ast::{
    ColumnRef, CompareOp, CreateTableStatement, DeleteStatement, DropTableStatement,
    InsertStatement, JoinClause, OrderByItem, OrderDirection, Pred, SelectColumns,
    SelectStatement, Statement, UpdateStatement,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::schema::{Column, DataType};
use crate::value::Value;

use super::error::SyntaxError;

/// Parses a single SQL statement out of `sql`.
///
/// # Errors
///
/// Returns a [`SyntaxError`] if the text cannot be tokenized or does not
/// match the grammar.
pub fn parse(sql: &str) -> Result<Statement, SyntaxError> {
    let tokens = Lexer::new(sql).tokenize()?;
    Parser::new(tokens).parse_statement()
}

/// A recursive-descent parser over a pre-tokenized input.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a parser over an already-tokenized input.
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        self.current().as_keyword() == Some(kw)
    }

    fn match_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<(), SyntaxError> {
        if self.match_keyword(kw) {
            Ok(())
        } else {
            Err(self.unexpected(kw.as_str()))
        }
    }

    fn expect_kind(&mut self, kind: &TokenKind) -> Result<(), SyntaxError> {
        if &self.current().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(format!("{kind:?}")))
        }
    }

    fn unexpected(&self, expected: impl std::fmt::Display) -> SyntaxError {
        if self.current().is_eof() {
            SyntaxError::unexpected_eof(expected, self.current_span())
        } else {
            SyntaxError::unexpected(expected, format!("{:?}", self.current().kind), self.current_span())
        }
    }

    fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        match self.current().kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// Parses one statement, including the trailing `;` if present.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] on any grammar mismatch.
    pub fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        let stmt = match self.current().as_keyword() {
            Some(Keyword::Create) => Statement::CreateTable(self.parse_create_table()?),
            Some(Keyword::Drop) => Statement::DropTable(self.parse_drop_table()?),
            Some(Keyword::Insert) => Statement::Insert(self.parse_insert()?),
            Some(Keyword::Select) => Statement::Select(self.parse_select()?),
            Some(Keyword::Update) => Statement::Update(self.parse_update()?),
            Some(Keyword::Delete) => Statement::Delete(self.parse_delete()?),
            _ => return Err(self.unexpected("a statement keyword")),
        };
        // A trailing semicolon is optional.
        if matches!(self.current().kind, TokenKind::Semicolon) {
            self.advance();
        }
        Ok(stmt)
    }

    fn parse_create_table(&mut self) -> Result<CreateTableStatement, SyntaxError> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.expect_identifier()?;
        self.expect_kind(&TokenKind::LeftParen)?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_def()?);
            if matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        self.expect_kind(&TokenKind::RightParen)?;

        Ok(CreateTableStatement { table, columns })
    }

    fn parse_column_def(&mut self) -> Result<Column, SyntaxError> {
        let name = self.expect_identifier()?;
        let dtype = self.parse_data_type()?;
        let mut column = Column::new(name, dtype);

        loop {
            if self.match_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                column = column.primary_key();
            } else if self.match_keyword(Keyword::Unique) {
                column = column.unique();
            } else if self.match_keyword(Keyword::Not) {
                self.expect_keyword(Keyword::Null)?;
                column = column.not_null();
            } else {
                break;
            }
        }

        Ok(column)
    }

    fn parse_data_type(&mut self) -> Result<DataType, SyntaxError> {
        match self.current().as_keyword() {
            Some(Keyword::Integer) => {
                self.advance();
                Ok(DataType::Integer)
            }
            Some(Keyword::Float) => {
                self.advance();
                Ok(DataType::Float)
            }
            Some(Keyword::Text) => {
                self.advance();
                Ok(DataType::Text)
            }
            Some(Keyword::Boolean) => {
                self.advance();
                Ok(DataType::Boolean)
            }
            _ => Err(self.unexpected("a data type")),
        }
    }

    fn parse_drop_table(&mut self) -> Result<DropTableStatement, SyntaxError> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.expect_identifier()?;
        Ok(DropTableStatement { table })
    }

    fn parse_insert(&mut self) -> Result<InsertStatement, SyntaxError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.expect_identifier()?;

        let columns = if matches!(self.current().kind, TokenKind::LeftParen) {
            self.advance();
            let mut names = Vec::new();
            loop {
                names.push(self.expect_identifier()?);
                if matches!(self.current().kind, TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
            self.expect_kind(&TokenKind::RightParen)?;
            Some(names)
        } else {
            None
        };

        self.expect_keyword(Keyword::Values)?;
        self.expect_kind(&TokenKind::LeftParen)?;
        let mut values = Vec::new();
        loop {
            values.push(self.parse_value()?);
            if matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        self.expect_kind(&TokenKind::RightParen)?;

        Ok(InsertStatement {
            table,
            columns,
            values,
        })
    }

    fn parse_value(&mut self) -> Result<Value, SyntaxError> {
        let value = match self.current().kind.clone() {
            TokenKind::String(s) => {
                self.advance();
                Value::Text(s)
            }
            TokenKind::Integer(i) => {
                self.advance();
                Value::Integer(i)
            }
            TokenKind::Float(f) => {
                self.advance();
                Value::Float(f)
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Value::Null
            }
            TokenKind::Identifier(ident) => {
                self.advance();
                match ident.to_ascii_lowercase().as_str() {
                    "true" => Value::Boolean(true),
                    "false" => Value::Boolean(false),
                    _ => Value::Text(ident),
                }
            }
            _ => return Err(self.unexpected("a literal value")),
        };
        Ok(value)
    }

    fn parse_select(&mut self) -> Result<SelectStatement, SyntaxError> {
        self.expect_keyword(Keyword::Select)?;

        let columns = if matches!(self.current().kind, TokenKind::Star) {
            self.advance();
            SelectColumns::All
        } else {
            let mut names = Vec::new();
            loop {
                names.push(self.parse_column_ref()?.display_name());
                if matches!(self.current().kind, TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
            SelectColumns::List(names)
        };

        self.expect_keyword(Keyword::From)?;
        let from = self.expect_identifier()?;
        let from_alias = self.parse_optional_alias()?;

        let mut joins = Vec::new();
        loop {
            let is_join = if self.match_keyword(Keyword::Inner) {
                self.expect_keyword(Keyword::Join)?;
                true
            } else {
                self.match_keyword(Keyword::Join)
            };
            if !is_join {
                break;
            }
            let table = self.expect_identifier()?;
            let alias = self.parse_optional_alias()?;
            self.expect_keyword(Keyword::On)?;
            let left = self.parse_column_ref()?;
            self.expect_kind(&TokenKind::Eq)?;
            let right = self.parse_column_ref()?;
            joins.push(JoinClause {
                table,
                alias,
                left,
                right,
            });
        }

        let where_clause = if self.match_keyword(Keyword::Where) {
            Some(self.parse_condition()?)
        } else {
            None
        };

        let mut order_by = Vec::new();
        if self.match_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            loop {
                let column = self.parse_column_ref()?.display_name();
                let direction = if self.match_keyword(Keyword::Asc) {
                    OrderDirection::Asc
                } else if self.match_keyword(Keyword::Desc) {
                    OrderDirection::Desc
                } else {
                    OrderDirection::Asc
                };
                order_by.push(OrderByItem { column, direction });
                if matches!(self.current().kind, TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }

        let limit = if self.match_keyword(Keyword::Limit) {
            match self.current().kind.clone() {
                TokenKind::Integer(n) => {
                    self.advance();
                    Some(n)
                }
                _ => return Err(self.unexpected("an integer")),
            }
        } else {
            None
        };

        Ok(SelectStatement {
            columns,
            from,
            from_alias,
            joins,
            where_clause,
            order_by,
            limit,
        })
    }

    /// Parses `AS alias` or a bare `alias`, distinguishing it from a
    /// following clause keyword (`JOIN`, `WHERE`, `ORDER`, `LIMIT`) or
    /// statement terminator.
    fn parse_optional_alias(&mut self) -> Result<Option<String>, SyntaxError> {
        if self.match_keyword(Keyword::As) {
            return Ok(Some(self.expect_identifier()?));
        }
        if let TokenKind::Identifier(_) = self.current().kind.clone() {
            return Ok(Some(self.expect_identifier()?));
        }
        Ok(None)
    }

    fn parse_column_ref(&mut self) -> Result<ColumnRef, SyntaxError> {
        let first = self.expect_identifier()?;
        if matches!(self.current().kind, TokenKind::Dot) {
            self.advance();
            let column = self.expect_identifier()?;
            Ok(ColumnRef::qualified(first, column))
        } else {
            Ok(ColumnRef::unqualified(first))
        }
    }

    /// Parses a left-associative chain of `AND`/`OR` comparisons.
    ///
    /// Both connectives share one precedence level: `a OR b AND c` parses
    /// as `(a OR b) AND c`, not the usual AND-binds-tighter rule.
    fn parse_condition(&mut self) -> Result<Pred, SyntaxError> {
        let mut left = self.parse_comparison()?;
        loop {
            if self.match_keyword(Keyword::And) {
                let right = self.parse_comparison()?;
                left = Pred::And(Box::new(left), Box::new(right));
            } else if self.match_keyword(Keyword::Or) {
                let right = self.parse_comparison()?;
                left = Pred::Or(Box::new(left), Box::new(right));
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Pred, SyntaxError> {
        let column = self.parse_column_ref()?;
        let op = self.parse_compare_op()?;
        let value = self.parse_value()?;
        Ok(Pred::Cmp { column, op, value })
    }

    fn parse_compare_op(&mut self) -> Result<CompareOp, SyntaxError> {
        let op = match self.current().kind {
            TokenKind::Eq => CompareOp::Eq,
            TokenKind::NotEq => CompareOp::NotEq,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::LtEq => CompareOp::LtEq,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::GtEq => CompareOp::GtEq,
            _ => return Err(self.unexpected("a comparison operator")),
        };
        self.advance();
        Ok(op)
    }

    fn parse_update(&mut self) -> Result<UpdateStatement, SyntaxError> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.expect_identifier()?;
        self.expect_keyword(Keyword::Set)?;

        let mut assignments = Vec::new();
        loop {
            let column = self.expect_identifier()?;
            self.expect_kind(&TokenKind::Eq)?;
            let value = self.parse_value()?;
            assignments.push((column, value));
            if matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }

        let where_clause = if self.match_keyword(Keyword::Where) {
            Some(self.parse_condition()?)
        } else {
            None
        };

        Ok(UpdateStatement {
            table,
            assignments,
            where_clause,
        })
    }

    fn parse_delete(&mut self) -> Result<DeleteStatement, SyntaxError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_identifier()?;

        let where_clause = if self.match_keyword(Keyword::Where) {
            Some(self.parse_condition()?)
        } else {
            None
        };

        Ok(DeleteStatement {
            table,
            where_clause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_table_with_constraints() {
        let stmt = parse("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
            .unwrap();
        let Statement::CreateTable(create) = stmt else {
            panic!("expected CreateTable");
        };
        assert_eq!(create.table, "users");
        assert_eq!(create.columns.len(), 2);
        assert!(create.columns[0].primary_key);
        assert!(create.columns[1].not_null);
    }

    #[test]
    fn parses_insert_with_explicit_columns() {
        let stmt = parse("INSERT INTO users (id, name) VALUES (1, 'Ada')").unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected Insert");
        };
        assert_eq!(insert.table, "users");
        assert_eq!(insert.columns, Some(vec!["id".to_string(), "name".to_string()]));
        assert_eq!(insert.values, vec![Value::Integer(1), Value::Text("Ada".into())]);
    }

    #[test]
    fn parses_select_star_with_where_and_order_by() {
        let stmt = parse("SELECT * FROM users WHERE id = 1 ORDER BY name DESC LIMIT 10").unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected Select");
        };
        assert_eq!(select.columns, SelectColumns::All);
        assert_eq!(select.from, "users");
        assert!(select.where_clause.is_some());
        assert_eq!(select.order_by.len(), 1);
        assert_eq!(select.order_by[0].direction, OrderDirection::Desc);
        assert_eq!(select.limit, Some(10));
    }

    #[test]
    fn and_or_share_precedence_left_associatively() {
        let stmt = parse("SELECT * FROM t WHERE a = 1 OR b = 2 AND c = 3").unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected Select");
        };
        match select.where_clause.unwrap() {
            Pred::And(lhs, _) => {
                assert!(matches!(*lhs, Pred::Or(_, _)));
            }
            other => panic!("expected And at top, got {other:?}"),
        }
    }

    #[test]
    fn parses_join_with_qualified_columns() {
        let stmt = parse(
            "SELECT * FROM orders JOIN users ON orders.user_id = users.id",
        )
        .unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected Select");
        };
        assert_eq!(select.joins.len(), 1);
        assert_eq!(select.joins[0].table, "users");
    }

    #[test]
    fn parses_qualified_columns_in_select_list() {
        let stmt = parse("SELECT a.id, b.tag FROM a JOIN b ON a.b_id = b.id ORDER BY a.id")
            .unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected Select");
        };
        assert_eq!(
            select.columns,
            SelectColumns::List(vec!["a.id".to_string(), "b.tag".to_string()])
        );
    }

    #[test]
    fn unterminated_string_surfaces_as_syntax_error() {
        let err = parse("SELECT * FROM t WHERE name = 'oops").unwrap_err();
        assert!(err.message.contains("string"));
    }

    #[test]
    fn missing_into_is_a_syntax_error() {
        assert!(parse("INSERT users VALUES (1)").is_err());
    }
}
