//! Rendering of [`PredicateSet`]s into parameterized SQL.

use sqlx::{Postgres, QueryBuilder};

use usermgmt_core::error::AppError;
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{FilterField, FilterOp, FilterValue, Predicate, PredicateSet, SortField};

/// Columns a table allows in predicates and `ORDER BY`.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSet {
    pub filterable: &'static [&'static str],
    pub sortable: &'static [&'static str],
    /// Used when no sort is requested or the requested column is not sortable.
    pub default_sort: &'static str,
}

impl ColumnSet {
    fn column(&self, field: &str) -> AppResult<&'static str> {
        self.filterable
            .iter()
            .copied()
            .find(|c| *c == field)
            .ok_or_else(|| AppError::validation(format!("Unknown filter field: {field}")))
    }
}

/// Append ` AND <predicate>` for every conjunct in `predicates`.
///
/// The builder must already end inside a `WHERE` clause.
pub fn push_predicates(
    builder: &mut QueryBuilder<'_, Postgres>,
    predicates: &PredicateSet,
    columns: &ColumnSet,
) -> AppResult<()> {
    for predicate in predicates.predicates() {
        builder.push(" AND ");
        match predicate {
            Predicate::Field(field) => push_field(builder, field, columns)?,
            Predicate::AnyOf(fields) if fields.is_empty() => {
                builder.push("FALSE");
            }
            Predicate::AnyOf(fields) => {
                builder.push("(");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        builder.push(" OR ");
                    }
                    push_field(builder, field, columns)?;
                }
                builder.push(")");
            }
            Predicate::Never => {
                builder.push("FALSE");
            }
        }
    }
    Ok(())
}

/// Append `ORDER BY ... LIMIT ... OFFSET ...`.
pub fn push_order_and_page(
    builder: &mut QueryBuilder<'_, Postgres>,
    sort: Option<&SortField>,
    columns: &ColumnSet,
    limit: u64,
    offset: u64,
) {
    let (column, direction) = sort
        .and_then(|s| {
            columns
                .sortable
                .iter()
                .find(|c| **c == s.field)
                .map(|c| (*c, s.direction.as_sql()))
        })
        .unwrap_or((columns.default_sort, "ASC"));

    builder.push(format!(" ORDER BY {column} {direction}, id ASC LIMIT "));
    builder.push_bind(bind_count(limit));
    builder.push(" OFFSET ");
    builder.push_bind(bind_count(offset));
}

/// Postgres `LIMIT`/`OFFSET` take `BIGINT`.
fn bind_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn push_field(
    builder: &mut QueryBuilder<'_, Postgres>,
    field: &FilterField,
    columns: &ColumnSet,
) -> AppResult<()> {
    let column = columns.column(&field.field)?;
    match (field.op, &field.value) {
        (FilterOp::In, FilterValue::UuidList(ids)) => {
            builder.push(format!("{column} = ANY("));
            builder.push_bind(ids.clone());
            builder.push(")");
        }
        (FilterOp::Eq | FilterOp::Ne, FilterValue::Uuid(id)) => {
            builder.push(format!("{column} {} ", comparison(field.op)));
            builder.push_bind(*id);
        }
        (FilterOp::Eq | FilterOp::Ne, FilterValue::String(text)) => {
            builder.push(format!("{column}::text {} ", comparison(field.op)));
            builder.push_bind(text.clone());
        }
        (FilterOp::Eq | FilterOp::Ne, FilterValue::Boolean(flag)) => {
            builder.push(format!("{column} {} ", comparison(field.op)));
            builder.push_bind(*flag);
        }
        (FilterOp::ILike, FilterValue::String(pattern)) => {
            builder.push(format!("{column}::text ILIKE "));
            builder.push_bind(pattern.clone());
            builder.push(r" ESCAPE '\'");
        }
        (op, value) => {
            return Err(AppError::validation(format!(
                "Unsupported filter {op:?} on {column} with value {value:?}"
            )));
        }
    }
    Ok(())
}

fn comparison(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Ne => "<>",
        _ => "=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usermgmt_core::types::SortDirection;
    use uuid::Uuid;

    const COLUMNS: ColumnSet = ColumnSet {
        filterable: &["profile_id", "user_id", "access_level"],
        sortable: &["created_at", "access_level"],
        default_sort: "created_at",
    };

    fn render(predicates: &PredicateSet) -> AppResult<String> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM profile_link WHERE TRUE");
        push_predicates(&mut builder, predicates, &COLUMNS)?;
        Ok(builder.sql().to_string())
    }

    #[test]
    fn test_renders_conjunction_with_binds() {
        let predicates = PredicateSet::new()
            .and(FilterField::eq("profile_id", Uuid::new_v4()))
            .and(FilterField::in_ids("user_id", vec![Uuid::new_v4()]))
            .and(FilterField::ne("access_level", "AGENCY_READONLY"));

        assert_eq!(
            render(&predicates).unwrap(),
            "SELECT * FROM profile_link WHERE TRUE AND profile_id = $1 \
             AND user_id = ANY($2) AND access_level::text <> $3"
        );
    }

    #[test]
    fn test_renders_never_as_false() {
        let predicates = PredicateSet::new()
            .and(Predicate::Never)
            .and(Predicate::AnyOf(Vec::new()));
        assert_eq!(
            render(&predicates).unwrap(),
            "SELECT * FROM profile_link WHERE TRUE AND FALSE AND FALSE"
        );
    }

    #[test]
    fn test_renders_disjunction_group() {
        let predicates = PredicateSet::new().and(Predicate::AnyOf(vec![
            FilterField::eq("profile_id", "a"),
            FilterField::eq("user_id", "b"),
        ]));
        assert_eq!(
            render(&predicates).unwrap(),
            "SELECT * FROM profile_link WHERE TRUE AND (profile_id::text = $1 OR user_id::text = $2)"
        );
    }

    #[test]
    fn test_contains_renders_escape_clause() {
        let predicates = PredicateSet::new().and(FilterField::contains("access_level", "100%"));
        assert_eq!(
            render(&predicates).unwrap(),
            r"SELECT * FROM profile_link WHERE TRUE AND access_level::text ILIKE $1 ESCAPE '\'"
        );
    }

    #[test]
    fn test_bind_count_saturates() {
        assert_eq!(bind_count(25), 25);
        assert_eq!(bind_count(u64::MAX), i64::MAX);
    }

    #[test]
    fn test_rejects_unknown_column() {
        let predicates = PredicateSet::new().and(FilterField::eq("password", "x"));
        assert!(render(&predicates).is_err());
    }

    #[test]
    fn test_order_falls_back_to_default_column() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM profile_link WHERE TRUE");
        let sort = SortField::new("email; DROP TABLE users", SortDirection::Desc);
        push_order_and_page(&mut builder, Some(&sort), &COLUMNS, 10, 20);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM profile_link WHERE TRUE ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2"
        );
    }
}
