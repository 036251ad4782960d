//! Built-in permission predicates.

use super::context::AccessContext;
use super::expr::{atomic, or_, PermissionNode};

/// Grants access to everybody.
pub fn allow_any() -> PermissionNode {
    atomic("AllowAny", |_ctx: &AccessContext| true)
}

/// Grants access to authenticated requesters only.
pub fn is_authenticated() -> PermissionNode {
    atomic("IsAuthenticated", |ctx: &AccessContext| ctx.is_authenticated)
}

/// Grants access to staff requesters only.
pub fn is_staff() -> PermissionNode {
    atomic("IsStaff", |ctx: &AccessContext| {
        ctx.is_authenticated && ctx.is_staff
    })
}

/// Grants access to admin requesters only.
pub fn is_admin() -> PermissionNode {
    atomic("IsAdmin", |ctx: &AccessContext| {
        ctx.is_authenticated && ctx.is_admin
    })
}

/// Grants access to read-only operations.
pub fn is_read_only() -> PermissionNode {
    atomic("IsReadOnly", |ctx: &AccessContext| ctx.operation.is_read())
}

/// Grants write access to authenticated requesters and read access to
/// everybody.
pub fn is_authenticated_or_read_only() -> PermissionNode {
    or_(is_authenticated(), is_read_only())
}
