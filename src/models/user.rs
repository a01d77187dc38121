use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// Name accepted by the name check, from either the query string or the body
#[derive(Debug, Default, Deserialize)]
pub struct NameInput {
    pub name: Option<String>,
}

/// Query parameters for integer division
#[derive(Debug, Deserialize)]
pub struct DivideQuery {
    pub a: i64,
    pub b: i64,
}
