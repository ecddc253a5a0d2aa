//! Translation of listing query parameters into a store filter.

use serde::Deserialize;

use roster_core::query::{Expr, Filter};

use crate::mapper::{ADDRESS_COUNTRY, AGE};

/// Query parameters accepted by the listing endpoint.
///
/// `age` is a minimum age, kept under its public query-string name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentFilter {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, rename = "age")]
    pub min_age: Option<i64>,
}

impl StudentFilter {
    /// Builds the filter predicate, or `None` to match every student.
    ///
    /// Presence alone decides whether a condition applies, so `age=0` and an
    /// empty `country` still filter.
    pub fn to_expr(&self) -> Option<Expr> {
        let conditions = [
            self.country
                .as_deref()
                .map(|country| Filter::eq(ADDRESS_COUNTRY, country)),
            self.min_age.map(|min_age| Filter::gte(AGE, min_age)),
        ];

        conditions
            .into_iter()
            .flatten()
            .reduce(Expr::and)
    }
}
