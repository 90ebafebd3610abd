//! SQL rendering of the search access predicate.
//!
//! Produces the WHERE fragment shared by every search strategy:
//!
//! ```text
//! (c.visibility = ANY($n::text[]) OR c.user_id = $n+1::uuid) AND c.id = ANY($n+2::uuid[])
//! ```
//!
//! The owner branch is only emitted for callers with a user id and the id
//! branch only for a non-empty restriction list. The fragment must accept
//! exactly the rows [`hub_core::SearchPlan::admits`] accepts.

use uuid::Uuid;

use hub_core::SearchPlan;

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Single UUID parameter.
    Uuid(Uuid),
    /// Array of UUIDs (for ANY operations).
    UuidArray(Vec<Uuid>),
    /// Array of strings.
    StringArray(Vec<String>),
}

/// Builds the access/id WHERE fragment for a [`SearchPlan`].
///
/// # Example
///
/// ```rust,ignore
/// let (sql, params) = AccessFilterQueryBuilder::new(&plan, 1).build();
/// // sql: "(c.visibility = ANY($2::text[]) OR c.user_id = $3::uuid)"
/// ```
pub struct AccessFilterQueryBuilder<'a> {
    plan: &'a SearchPlan,
    param_offset: usize,
}

impl<'a> AccessFilterQueryBuilder<'a> {
    /// `param_offset` is the number of parameters already bound before this
    /// fragment.
    pub fn new(plan: &'a SearchPlan, param_offset: usize) -> Self {
        Self { plan, param_offset }
    }

    /// Returns the SQL fragment and its parameters in placeholder order.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut params = Vec::new();
        let mut idx = self.param_offset;

        idx += 1;
        let mut visibility = format!("c.visibility = ANY(${}::text[])", idx);
        params.push(QueryParam::StringArray(self.plan.scope.to_db_values()));

        if let Some(caller_id) = self.plan.caller_id {
            idx += 1;
            visibility = format!("({} OR c.user_id = ${}::uuid)", visibility, idx);
            params.push(QueryParam::Uuid(caller_id));
        } else {
            visibility = format!("({})", visibility);
        }

        let mut clauses = vec![visibility];

        if let Some(ids) = self.plan.id_restriction() {
            idx += 1;
            clauses.push(format!("c.id = ANY(${}::uuid[])", idx));
            params.push(QueryParam::UuidArray(ids.to_vec()));
        }

        (clauses.join(" AND "), params)
    }
}

/// Bind builder parameters onto a query in order.
pub(crate) fn bind_params<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    params: &'q [QueryParam],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for param in params {
        q = match param {
            QueryParam::Uuid(id) => q.bind(id),
            QueryParam::UuidArray(ids) => q.bind(ids),
            QueryParam::StringArray(values) => q.bind(values),
        };
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::{Caller, VisibilityScope, ADVANCED_SEARCH_LIMIT};

    fn plan(caller: &Caller, ids: Option<Vec<Uuid>>) -> SearchPlan {
        SearchPlan {
            raw_query: "lambda".to_string(),
            ts_query: "lambda".to_string(),
            scope: VisibilityScope::for_caller(caller),
            caller_id: caller.user_id,
            restrict_to_ids: ids,
            limit: ADVANCED_SEARCH_LIMIT,
        }
    }

    #[test]
    fn test_anonymous_visibility_only() {
        let plan = plan(&Caller::anonymous(), None);
        let (sql, params) = AccessFilterQueryBuilder::new(&plan, 1).build();

        assert_eq!(sql, "(c.visibility = ANY($2::text[]))");
        assert_eq!(
            params,
            vec![QueryParam::StringArray(vec!["public".to_string()])]
        );
    }

    #[test]
    fn test_authenticated_adds_owner_branch() {
        let user = Uuid::new_v4();
        let plan = plan(&Caller::authenticated(user), None);
        let (sql, params) = AccessFilterQueryBuilder::new(&plan, 1).build();

        assert_eq!(
            sql,
            "(c.visibility = ANY($2::text[]) OR c.user_id = $3::uuid)"
        );
        assert_eq!(params.len(), 2);
        assert_eq!(params[1], QueryParam::Uuid(user));
    }

    #[test]
    fn test_id_restriction_appended() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let plan = plan(&Caller::privileged(Uuid::new_v4()), Some(ids.clone()));
        let (sql, params) = AccessFilterQueryBuilder::new(&plan, 1).build();

        assert!(sql.ends_with(" AND c.id = ANY($4::uuid[])"));
        assert_eq!(params[2], QueryParam::UuidArray(ids));
        assert_eq!(
            params[0],
            QueryParam::StringArray(vec![
                "public".to_string(),
                "aws_community".to_string(),
                "aws_only".to_string()
            ])
        );
    }

    #[test]
    fn test_empty_id_list_is_no_restriction() {
        let plan = plan(&Caller::anonymous(), Some(vec![]));
        let (sql, params) = AccessFilterQueryBuilder::new(&plan, 1).build();

        assert!(!sql.contains("c.id"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_param_offset_respected() {
        let plan = plan(&Caller::authenticated(Uuid::new_v4()), Some(vec![Uuid::nil()]));
        let (sql, _) = AccessFilterQueryBuilder::new(&plan, 5).build();

        assert!(sql.contains("$6::text[]"));
        assert!(sql.contains("$7::uuid"));
        assert!(sql.contains("$8::uuid[]"));
    }
}
