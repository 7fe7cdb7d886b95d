//! Rich-query evaluation for the in-memory state database.
//!
//! Queries are JSON documents in the Mango style used by document-backed
//! ledgers: `{"selector": {"type": "PDF", "id": {"$regex": "^ASSET_1"}}}`.
//! Only the `selector` member is interpreted; the other standard members are
//! accepted and ignored, since result order and projection are fixed by the
//! store (key order, whole documents).

use std::cmp::Ordering;

use chainav_core::state::StoreError;
use regex::Regex;
use serde_json::{Map, Value};

/// Top-level query members that are tolerated but have no effect here.
const IGNORED_MEMBERS: &[&str] = &[
    "fields",
    "sort",
    "limit",
    "skip",
    "use_index",
    "bookmark",
    "execution_stats",
    "r",
    "conflicts",
];

/// A parsed `selector`.
#[derive(Debug)]
pub struct Selector {
    root: Condition,
}

#[derive(Debug)]
enum Condition {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Nor(Vec<Condition>),
    Not(Box<Condition>),
    Field { path: Vec<String>, op: FieldOp },
}

#[derive(Debug)]
enum FieldOp {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
    Regex(Regex),
}

impl Selector {
    /// Parse a full query document.
    pub fn parse(query: &str) -> Result<Self, StoreError> {
        let doc: Value = serde_json::from_str(query)
            .map_err(|e| invalid(format!("query is not valid JSON: {e}")))?;
        let Value::Object(members) = doc else {
            return Err(invalid("query must be a JSON object"));
        };

        let mut selector = None;
        for (name, value) in &members {
            match name.as_str() {
                "selector" => selector = Some(value),
                other if IGNORED_MEMBERS.contains(&other) => {}
                other => return Err(invalid(format!("unknown query member '{other}'"))),
            }
        }

        let Some(Value::Object(selector)) = selector else {
            return Err(invalid("query must contain a 'selector' object"));
        };

        Ok(Self {
            root: parse_object(selector, &[])?,
        })
    }

    /// Whether `doc` satisfies the selector.
    pub fn matches(&self, doc: &Value) -> bool {
        self.root.matches(doc)
    }
}

fn invalid(msg: impl Into<String>) -> StoreError {
    StoreError::InvalidQuery(msg.into())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn parse_object(map: &Map<String, Value>, prefix: &[String]) -> Result<Condition, StoreError> {
    let mut conditions = Vec::with_capacity(map.len());

    for (key, value) in map {
        let condition = match key.as_str() {
            "$and" => Condition::And(parse_list(key, value, prefix)?),
            "$or" => Condition::Or(parse_list(key, value, prefix)?),
            "$nor" => Condition::Nor(parse_list(key, value, prefix)?),
            "$not" => match value {
                Value::Object(inner) => Condition::Not(Box::new(parse_object(inner, prefix)?)),
                _ => return Err(invalid("'$not' requires an object")),
            },
            op if op.starts_with('$') => {
                if prefix.is_empty() {
                    return Err(invalid(format!("operator '{op}' must apply to a field")));
                }
                Condition::Field {
                    path: prefix.to_vec(),
                    op: parse_operator(op, value)?,
                }
            }
            field => {
                let mut path = prefix.to_vec();
                path.extend(field.split('.').map(str::to_string));
                parse_field(path, value)?
            }
        };
        conditions.push(condition);
    }

    Ok(match conditions.len() {
        1 => conditions.remove(0),
        _ => Condition::And(conditions),
    })
}

fn parse_list(key: &str, value: &Value, prefix: &[String]) -> Result<Vec<Condition>, StoreError> {
    let Value::Array(items) = value else {
        return Err(invalid(format!("'{key}' requires an array")));
    };
    if items.is_empty() {
        return Err(invalid(format!("'{key}' requires a non-empty array")));
    }
    items
        .iter()
        .map(|item| match item {
            Value::Object(map) => parse_object(map, prefix),
            _ => Err(invalid(format!("'{key}' entries must be objects"))),
        })
        .collect()
}

fn parse_field(path: Vec<String>, value: &Value) -> Result<Condition, StoreError> {
    match value {
        // `{"a": {"b": 1}}` is shorthand for `{"a.b": 1}`; an operator object
        // applies to the field itself.
        Value::Object(map) if !map.is_empty() => parse_object(map, &path),
        other => Ok(Condition::Field {
            path,
            op: FieldOp::Eq(other.clone()),
        }),
    }
}

fn parse_operator(op: &str, value: &Value) -> Result<FieldOp, StoreError> {
    let parsed = match op {
        "$eq" => FieldOp::Eq(value.clone()),
        "$ne" => FieldOp::Ne(value.clone()),
        "$gt" => FieldOp::Gt(value.clone()),
        "$gte" => FieldOp::Gte(value.clone()),
        "$lt" => FieldOp::Lt(value.clone()),
        "$lte" => FieldOp::Lte(value.clone()),
        "$in" | "$nin" => {
            let Value::Array(items) = value else {
                return Err(invalid(format!("'{op}' requires an array")));
            };
            if op == "$in" {
                FieldOp::In(items.clone())
            } else {
                FieldOp::Nin(items.clone())
            }
        }
        "$exists" => match value {
            Value::Bool(b) => FieldOp::Exists(*b),
            _ => return Err(invalid("'$exists' requires a boolean")),
        },
        "$regex" => match value {
            Value::String(pattern) => FieldOp::Regex(
                Regex::new(pattern).map_err(|e| invalid(format!("invalid '$regex': {e}")))?,
            ),
            _ => return Err(invalid("'$regex' requires a string")),
        },
        other => return Err(invalid(format!("unsupported operator '{other}'"))),
    };
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl Condition {
    fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::And(all) => all.iter().all(|c| c.matches(doc)),
            Self::Or(any) => any.iter().any(|c| c.matches(doc)),
            Self::Nor(none) => !none.iter().any(|c| c.matches(doc)),
            Self::Not(inner) => !inner.matches(doc),
            Self::Field { path, op } => op.matches(lookup(doc, path)),
        }
    }
}

impl FieldOp {
    /// Every operator except `$exists` requires the field to be present.
    fn matches(&self, field: Option<&Value>) -> bool {
        let Some(actual) = field else {
            return matches!(self, Self::Exists(false));
        };
        match self {
            Self::Eq(expected) => json_eq(actual, expected),
            Self::Ne(expected) => !json_eq(actual, expected),
            Self::Gt(bound) => json_cmp(actual, bound) == Some(Ordering::Greater),
            Self::Gte(bound) => matches!(
                json_cmp(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt(bound) => json_cmp(actual, bound) == Some(Ordering::Less),
            Self::Lte(bound) => matches!(
                json_cmp(actual, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::In(options) => options.iter().any(|o| json_eq(actual, o)),
            Self::Nin(options) => !options.iter().any(|o| json_eq(actual, o)),
            Self::Exists(expected) => *expected,
            Self::Regex(re) => actual.as_str().is_some_and(|s| re.is_match(s)),
        }
    }
}

fn lookup<'a>(doc: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |node, segment| node.get(segment))
}

fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => json_cmp(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Ordering within one JSON type. Mixed types do not compare.
fn json_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
