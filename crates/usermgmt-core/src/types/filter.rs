//! Filter predicates for dynamic query building.
//!
//! A [`PredicateSet`] is a conjunction of [`Predicate`]s. Repositories render
//! it to SQL; in-memory stores evaluate it directly against any
//! [`FilterTarget`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal. A missing value never matches.
    Ne,
    /// SQL `ILIKE` case-insensitive pattern match (`%`, `_`, `\` escape).
    ILike,
    /// List membership.
    In,
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A UUID value.
    Uuid(Uuid),
    /// A string value (enum labels, names, patterns).
    String(String),
    /// A boolean value.
    Boolean(bool),
    /// A list of UUIDs (for the `In` operator).
    UuidList(Vec<Uuid>),
}

impl FilterValue {
    /// Textual form used for equality and pattern comparisons.
    fn as_text(&self) -> Option<String> {
        match self {
            Self::Uuid(u) => Some(u.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::UuidList(_) => None,
        }
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column or field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value.into())
    }

    /// Shorthand for an inequality filter.
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Ne, value.into())
    }

    /// Shorthand for a case-insensitive "contains" filter.
    pub fn contains(field: impl Into<String>, text: &str) -> Self {
        Self::new(
            field,
            FilterOp::ILike,
            FilterValue::String(format!("%{}%", escape_like(text))),
        )
    }

    /// Shorthand for a UUID membership filter.
    pub fn in_ids(field: impl Into<String>, ids: Vec<Uuid>) -> Self {
        Self::new(field, FilterOp::In, FilterValue::UuidList(ids))
    }

    /// Evaluate this condition against a target row.
    pub fn matches<T: FilterTarget + ?Sized>(&self, target: &T) -> bool {
        let Some(actual) = target.filter_value(&self.field) else {
            return false;
        };
        match (self.op, &self.value) {
            (FilterOp::In, FilterValue::UuidList(ids)) => match actual {
                FilterValue::Uuid(u) => ids.contains(&u),
                _ => false,
            },
            (FilterOp::In, _) => false,
            (FilterOp::Eq, expected) => actual.as_text() == expected.as_text(),
            (FilterOp::Ne, expected) => actual.as_text() != expected.as_text(),
            (FilterOp::ILike, FilterValue::String(pattern)) => actual
                .as_text()
                .is_some_and(|text| like_matches(&pattern.to_lowercase(), &text.to_lowercase())),
            (FilterOp::ILike, _) => false,
        }
    }
}

/// One conjunct of a [`PredicateSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    /// A single field condition.
    Field(FilterField),
    /// A disjunction of field conditions. An empty group never matches.
    AnyOf(Vec<FilterField>),
    /// A structurally false predicate.
    Never,
}

impl Predicate {
    /// Whether this predicate can never match any row.
    pub fn is_unsatisfiable(&self) -> bool {
        match self {
            Self::Field(_) => false,
            Self::AnyOf(fields) => fields.is_empty(),
            Self::Never => true,
        }
    }

    /// Evaluate this predicate against a target row.
    pub fn matches<T: FilterTarget + ?Sized>(&self, target: &T) -> bool {
        match self {
            Self::Field(field) => field.matches(target),
            Self::AnyOf(fields) => fields.iter().any(|f| f.matches(target)),
            Self::Never => false,
        }
    }
}

impl From<FilterField> for Predicate {
    fn from(field: FilterField) -> Self {
        Self::Field(field)
    }
}

/// A conjunction of predicates. The empty set matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    /// Create an empty (unconstrained) set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a conjunct.
    pub fn and(mut self, predicate: impl Into<Predicate>) -> Self {
        self.push(predicate);
        self
    }

    /// Add a conjunct in place.
    pub fn push(&mut self, predicate: impl Into<Predicate>) {
        self.predicates.push(predicate.into());
    }

    /// Return the conjuncts in insertion order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Whether the set has no conjuncts.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Number of conjuncts.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether any conjunct is structurally false.
    pub fn is_unsatisfiable(&self) -> bool {
        self.predicates.iter().any(Predicate::is_unsatisfiable)
    }

    /// Evaluate every conjunct against a target row.
    pub fn matches<T: FilterTarget + ?Sized>(&self, target: &T) -> bool {
        self.predicates.iter().all(|p| p.matches(target))
    }
}

/// A row whose named fields can be inspected by a [`PredicateSet`].
pub trait FilterTarget {
    /// Return the value of `field`, or `None` if the field is unknown or
    /// null.
    fn filter_value(&self, field: &str) -> Option<FilterValue>;
}

/// Escapes `\`, `%` and `_` so `text` matches literally inside a LIKE pattern
/// rendered with `ESCAPE '\'`.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    AnyRun,
    AnyChar,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => LikeToken::AnyRun,
            '_' => LikeToken::AnyChar,
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

/// SQL `LIKE` with `\` as the escape character. Both inputs are expected to
/// be already case-folded.
fn like_matches(pattern: &str, text: &str) -> bool {
    let tokens = like_tokens(pattern);
    let text: Vec<char> = text.chars().collect();

    let (mut t, mut c) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while c < text.len() {
        match tokens.get(t) {
            Some(LikeToken::AnyRun) => {
                backtrack = Some((t, c));
                t += 1;
            }
            Some(LikeToken::AnyChar) => {
                t += 1;
                c += 1;
            }
            Some(LikeToken::Literal(l)) if *l == text[c] => {
                t += 1;
                c += 1;
            }
            _ => match backtrack {
                Some((bt, bc)) => {
                    t = bt + 1;
                    c = bc + 1;
                    backtrack = Some((bt, bc + 1));
                }
                None => return false,
            },
        }
    }
    tokens[t..].iter().all(|token| *token == LikeToken::AnyRun)
}
