//! Immutable query specification for list endpoints.
//!
//! A [`QuerySpec`] is built once from caller-supplied filter, sort, and
//! pagination options and rendered into a count + select statement pair.
//! Field names are module-owned `&'static str` constants; every
//! user-supplied value travels as a bind parameter, never as query text.

use serde_json::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A single ordering term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: Direction,
}

impl OrderBy {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// The `(skip, limit)` pair selecting one slice of the matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u64,
    pub limit: u64,
}

impl Window {
    pub const fn new(start: u64, limit: u64) -> Self {
        Self { start, limit }
    }
}

/// One constraint on the result set. Conditions are AND-composed.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Exact match on a field.
    Eq(&'static str, Value),
    /// Inclusive lower bound.
    Gte(&'static str, Value),
    /// Inclusive upper bound.
    Lte(&'static str, Value),
    /// Case-insensitive substring match on a single field.
    ContainsCi(&'static str, String),
    /// Case-insensitive substring match against any of the listed fields
    /// (OR group sharing one bind parameter).
    AnyContainsCi(&'static [&'static str], String),
}

impl Condition {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Eq(field, value.into())
    }

    pub fn gte(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Gte(field, value.into())
    }

    pub fn lte(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Lte(field, value.into())
    }

    pub fn contains_ci(field: &'static str, needle: impl Into<String>) -> Self {
        Self::ContainsCi(field, needle.into())
    }

    pub fn any_contains_ci(fields: &'static [&'static str], needle: impl Into<String>) -> Self {
        Self::AnyContainsCi(fields, needle.into())
    }
}

/// A rendered statement plus its bind parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<(String, Value)>,
}

/// Immutable description of one list query over a table.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    table: &'static str,
    conditions: Vec<Condition>,
    order: Vec<OrderBy>,
    window: Option<Window>,
}

impl QuerySpec {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            conditions: Vec::new(),
            order: Vec::new(),
            window: None,
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn filter_opt(self, condition: Option<Condition>) -> Self {
        match condition {
            Some(condition) => self.filter(condition),
            None => self,
        }
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    pub fn order_all(mut self, order: Vec<OrderBy>) -> Self {
        self.order.extend(order);
        self
    }

    pub fn window(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }

    /// Render the fetch statement: `SELECT * FROM {table} [WHERE ...]
    /// [ORDER BY ...] [LIMIT n START s]`.
    pub fn select_statement(&self) -> Statement {
        let (where_clause, binds) = self.render_where();
        let mut sql = format!("SELECT * FROM {}", self.table);
        if let Some(where_clause) = &where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(where_clause);
        }
        if !self.order.is_empty() {
            let terms: Vec<String> = self
                .order
                .iter()
                .map(|o| format!("{} {}", o.field, o.direction.keyword()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
        if let Some(window) = self.window {
            sql.push_str(&format!(" LIMIT {} START {}", window.limit, window.start));
        }
        Statement { sql, binds }
    }

    /// Render the companion count statement over the same conditions.
    pub fn count_statement(&self) -> Statement {
        let (where_clause, binds) = self.render_where();
        let mut sql = format!("SELECT count() AS total FROM {}", self.table);
        if let Some(where_clause) = &where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(where_clause);
        }
        sql.push_str(" GROUP ALL");
        Statement { sql, binds }
    }

    fn render_where(&self) -> (Option<String>, Vec<(String, Value)>) {
        if self.conditions.is_empty() {
            return (None, Vec::new());
        }

        let mut fragments = Vec::with_capacity(self.conditions.len());
        let mut binds = Vec::with_capacity(self.conditions.len());

        for condition in &self.conditions {
            let param = format!("p{}", binds.len());
            match condition {
                Condition::Eq(field, value) => {
                    fragments.push(format!("{field} = ${param}"));
                    binds.push((param, value.clone()));
                }
                Condition::Gte(field, value) => {
                    fragments.push(format!("{field} >= ${param}"));
                    binds.push((param, value.clone()));
                }
                Condition::Lte(field, value) => {
                    fragments.push(format!("{field} <= ${param}"));
                    binds.push((param, value.clone()));
                }
                Condition::ContainsCi(field, needle) => {
                    fragments.push(format!(
                        "string::contains(string::lowercase({field} ?? ''), ${param})"
                    ));
                    binds.push((param, Value::from(needle.to_lowercase())));
                }
                Condition::AnyContainsCi(fields, needle) => {
                    let alternatives: Vec<String> = fields
                        .iter()
                        .map(|field| {
                            format!(
                                "string::contains(string::lowercase({field} ?? ''), ${param})"
                            )
                        })
                        .collect();
                    fragments.push(format!("({})", alternatives.join(" OR ")));
                    binds.push((param, Value::from(needle.to_lowercase())));
                }
            }
        }

        (Some(fragments.join(" AND ")), binds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_spec_renders_plain_select() {
        let statement = QuerySpec::table("todo").select_statement();
        assert_eq!(statement.sql, "SELECT * FROM todo");
        assert!(statement.binds.is_empty());
    }

    #[test]
    fn conditions_are_and_composed_with_positional_binds() {
        let statement = QuerySpec::table("book")
            .filter(Condition::eq("genre", "Fiction"))
            .filter(Condition::gte("price", 5.0))
            .filter(Condition::lte("price", 20.0))
            .select_statement();

        assert_eq!(
            statement.sql,
            "SELECT * FROM book WHERE genre = $p0 AND price >= $p1 AND price <= $p2"
        );
        assert_eq!(
            statement.binds,
            vec![
                ("p0".to_string(), json!("Fiction")),
                ("p1".to_string(), json!(5.0)),
                ("p2".to_string(), json!(20.0)),
            ]
        );
    }

    #[test]
    fn contains_lowercases_the_needle() {
        let statement = QuerySpec::table("book")
            .filter(Condition::contains_ci("author", "TOLKien"))
            .select_statement();

        assert_eq!(
            statement.sql,
            "SELECT * FROM book WHERE string::contains(string::lowercase(author ?? ''), $p0)"
        );
        assert_eq!(statement.binds[0].1, json!("tolkien"));
    }

    #[test]
    fn any_contains_renders_or_group_with_shared_bind() {
        let statement = QuerySpec::table("book")
            .filter(Condition::any_contains_ci(
                &["title", "author", "description"],
                "Ring",
            ))
            .select_statement();

        assert_eq!(
            statement.sql,
            "SELECT * FROM book WHERE (string::contains(string::lowercase(title ?? ''), $p0) \
             OR string::contains(string::lowercase(author ?? ''), $p0) \
             OR string::contains(string::lowercase(description ?? ''), $p0))"
        );
        assert_eq!(statement.binds.len(), 1);
    }

    #[test]
    fn order_and_window_render_in_sequence() {
        let statement = QuerySpec::table("todo")
            .order(OrderBy::desc("created_at"))
            .order(OrderBy::asc("title"))
            .window(Window::new(20, 10))
            .select_statement();

        assert_eq!(
            statement.sql,
            "SELECT * FROM todo ORDER BY created_at DESC, title ASC LIMIT 10 START 20"
        );
    }

    #[test]
    fn count_statement_shares_conditions_and_drops_window() {
        let spec = QuerySpec::table("book")
            .filter(Condition::eq("genre", "History"))
            .order(OrderBy::desc("created_at"))
            .window(Window::new(0, 10));
        let statement = spec.count_statement();

        assert_eq!(
            statement.sql,
            "SELECT count() AS total FROM book WHERE genre = $p0 GROUP ALL"
        );
        assert_eq!(statement.binds.len(), 1);
    }

    #[test]
    fn filter_opt_skips_absent_conditions() {
        let statement = QuerySpec::table("book")
            .filter_opt(None)
            .filter_opt(Some(Condition::eq("genre", "Fantasy")))
            .select_statement();

        assert_eq!(statement.sql, "SELECT * FROM book WHERE genre = $p0");
    }
}
