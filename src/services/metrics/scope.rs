//! Typed visibility filters for each domain's raw-data reads.
//!
//! A requested id narrows what the caller can already see. Asking for an id
//! outside the caller's assignments yields a filter that matches nothing,
//! which produces an all-zero series rather than an error.

use crate::auth::{AuthenticatedUser, Visibility};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeRequest {
    pub venture_id: Option<i64>,
    pub office_id: Option<i64>,
    pub property_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFilter {
    Any,
    OneOf(Vec<i64>),
}

impl IdFilter {
    fn narrow(visibility: Visibility, assigned: &[i64], requested: Option<i64>) -> Self {
        match (visibility, requested) {
            (Visibility::All, None) => Self::Any,
            (Visibility::All, Some(id)) => Self::OneOf(vec![id]),
            (Visibility::Assigned, None) => Self::OneOf(assigned.to_vec()),
            (Visibility::Assigned, Some(id)) if assigned.contains(&id) => Self::OneOf(vec![id]),
            (Visibility::Assigned, Some(_)) => Self::OneOf(Vec::new()),
        }
    }

    fn requested(requested: Option<i64>) -> Self {
        match requested {
            Some(id) => Self::OneOf(vec![id]),
            None => Self::Any,
        }
    }

    /// SQL bind form: `None` disables the predicate.
    pub fn as_bind(&self) -> Option<Vec<i64>> {
        match self {
            Self::Any => None,
            Self::OneOf(ids) => Some(ids.clone()),
        }
    }

    pub fn matches(&self, id: Option<i64>) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(ids) => id.is_some_and(|id| ids.contains(&id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreightScope {
    pub venture_ids: IdFilter,
    pub office_ids: IdFilter,
    pub created_by_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelScope {
    pub venture_ids: IdFilter,
    pub property_ids: IdFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BpoScope {
    pub venture_ids: IdFilter,
    pub office_ids: IdFilter,
}

fn venture_filter(user: &AuthenticatedUser, request: &ScopeRequest) -> IdFilter {
    IdFilter::narrow(
        user.role.venture_visibility(),
        &user.venture_ids,
        request.venture_id,
    )
}

fn office_filter(user: &AuthenticatedUser, request: &ScopeRequest) -> IdFilter {
    IdFilter::narrow(
        user.role.office_visibility(),
        &user.office_ids,
        request.office_id,
    )
}

pub fn freight_scope(user: &AuthenticatedUser, request: &ScopeRequest) -> FreightScope {
    FreightScope {
        venture_ids: venture_filter(user, request),
        office_ids: office_filter(user, request),
        created_by_id: request.user_id,
    }
}

/// Hotel KPI rows carry no office, so `office_id` is ignored here.
pub fn hotel_scope(user: &AuthenticatedUser, request: &ScopeRequest) -> HotelScope {
    HotelScope {
        venture_ids: venture_filter(user, request),
        property_ids: IdFilter::requested(request.property_id),
    }
}

pub fn bpo_scope(user: &AuthenticatedUser, request: &ScopeRequest) -> BpoScope {
    BpoScope {
        venture_ids: venture_filter(user, request),
        office_ids: office_filter(user, request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::test_support::test_user;

    #[test]
    fn global_role_without_narrowing_is_unrestricted() {
        let user = test_user(Role::Ceo, &[], &[]);
        let scope = freight_scope(&user, &ScopeRequest::default());
        assert_eq!(scope.venture_ids, IdFilter::Any);
        assert_eq!(scope.office_ids, IdFilter::Any);
        assert_eq!(scope.created_by_id, None);
        assert_eq!(scope.venture_ids.as_bind(), None);
    }

    #[test]
    fn assigned_role_is_limited_to_assignments() {
        let user = test_user(Role::Other, &[1, 2], &[10]);
        let scope = bpo_scope(&user, &ScopeRequest::default());
        assert_eq!(scope.venture_ids, IdFilter::OneOf(vec![1, 2]));
        assert_eq!(scope.office_ids, IdFilter::OneOf(vec![10]));
    }

    #[test]
    fn requesting_foreign_venture_matches_nothing() {
        let user = test_user(Role::Other, &[1], &[10]);
        let request = ScopeRequest {
            venture_id: Some(99),
            ..ScopeRequest::default()
        };
        let scope = freight_scope(&user, &request);
        assert_eq!(scope.venture_ids, IdFilter::OneOf(vec![]));
        assert!(!scope.venture_ids.matches(Some(1)));
        assert!(!scope.venture_ids.matches(Some(99)));
    }

    #[test]
    fn venture_head_narrows_offices_only_on_request() {
        let user = test_user(Role::VentureHead, &[3], &[]);
        let scope = freight_scope(&user, &ScopeRequest::default());
        assert_eq!(scope.venture_ids, IdFilter::OneOf(vec![3]));
        assert_eq!(scope.office_ids, IdFilter::Any);

        let request = ScopeRequest {
            office_id: Some(7),
            user_id: Some(42),
            ..ScopeRequest::default()
        };
        let scope = freight_scope(&user, &request);
        assert_eq!(scope.office_ids, IdFilter::OneOf(vec![7]));
        assert_eq!(scope.created_by_id, Some(42));
    }

    #[test]
    fn hotel_scope_uses_property_not_office() {
        let user = test_user(Role::Admin, &[], &[]);
        let request = ScopeRequest {
            office_id: Some(5),
            property_id: Some(12),
            ..ScopeRequest::default()
        };
        let scope = hotel_scope(&user, &request);
        assert_eq!(scope.venture_ids, IdFilter::Any);
        assert_eq!(scope.property_ids, IdFilter::OneOf(vec![12]));
        assert!(scope.property_ids.matches(Some(12)));
        assert!(!scope.property_ids.matches(None));
    }
}
