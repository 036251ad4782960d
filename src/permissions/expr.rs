//! Permission expression tree.
//!
//! Trees are pure data built via explicit constructor functions and
//! evaluated repeatedly against different contexts. `And`/`Or`
//! short-circuit on the left operand; `Xor` evaluates both operands
//! unconditionally.
//!
//! Conjunction operand order is an implicit contract: a right operand
//! may assume a precondition its left operand established (e.g. "the
//! requester is authenticated"). Predicates that rely on optional
//! context state must still deny safely when evaluated standalone.

use std::fmt;
use std::sync::Arc;

use super::context::AccessContext;

/// Atomic capability check over an access context.
pub type PermissionPredicate = Arc<dyn Fn(&AccessContext) -> bool + Send + Sync>;

/// Boolean permission expression.
///
/// Immutable after construction; evaluation never mutates the tree.
#[derive(Clone)]
pub enum PermissionNode {
    /// Leaf predicate with a display name
    Atomic {
        /// Name rendered by `Display`, e.g. `IsAuthenticated`
        name: String,
        /// The capability check itself
        predicate: PermissionPredicate,
    },
    /// Both operands must grant; right operand skipped on false left
    And(Box<PermissionNode>, Box<PermissionNode>),
    /// Either operand grants; right operand skipped on true left
    Or(Box<PermissionNode>, Box<PermissionNode>),
    /// Exactly one operand grants; both always evaluated
    Xor(Box<PermissionNode>, Box<PermissionNode>),
    /// Inverts the child's decision
    Not(Box<PermissionNode>),
}

/// Build an atomic predicate node.
pub fn atomic(
    name: impl Into<String>,
    predicate: impl Fn(&AccessContext) -> bool + Send + Sync + 'static,
) -> PermissionNode {
    PermissionNode::Atomic {
        name: name.into(),
        predicate: Arc::new(predicate),
    }
}

/// Conjunction; short-circuits on a false left operand.
pub fn and_(left: PermissionNode, right: PermissionNode) -> PermissionNode {
    PermissionNode::And(Box::new(left), Box::new(right))
}

/// Disjunction; short-circuits on a true left operand.
pub fn or_(left: PermissionNode, right: PermissionNode) -> PermissionNode {
    PermissionNode::Or(Box::new(left), Box::new(right))
}

/// Exclusive disjunction; evaluates both operands unconditionally.
pub fn xor_(left: PermissionNode, right: PermissionNode) -> PermissionNode {
    PermissionNode::Xor(Box::new(left), Box::new(right))
}

/// Negation.
pub fn not_(child: PermissionNode) -> PermissionNode {
    PermissionNode::Not(Box::new(child))
}

impl PermissionNode {
    /// Evaluate the tree against a context; `false` means deny.
    pub fn evaluate(&self, ctx: &AccessContext) -> bool {
        match self {
            PermissionNode::Atomic { predicate, .. } => predicate(ctx),
            PermissionNode::And(left, right) => left.evaluate(ctx) && right.evaluate(ctx),
            PermissionNode::Or(left, right) => left.evaluate(ctx) || right.evaluate(ctx),
            PermissionNode::Xor(left, right) => {
                // No short-circuit: both sides always run.
                let l = left.evaluate(ctx);
                let r = right.evaluate(ctx);
                l ^ r
            }
            PermissionNode::Not(child) => !child.evaluate(ctx),
        }
    }
}

impl fmt::Display for PermissionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionNode::Atomic { name, .. } => write!(f, "{}", name),
            PermissionNode::And(l, r) => write!(f, "({}_AND_{})", l, r),
            PermissionNode::Or(l, r) => write!(f, "({}_OR_{})", l, r),
            PermissionNode::Xor(l, r) => write!(f, "({}_XOR_{})", l, r),
            PermissionNode::Not(c) => write!(f, "(NOT_{})", c),
        }
    }
}

impl fmt::Debug for PermissionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PermissionNode({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::context::Operation;

    fn constant(name: &str, value: bool) -> PermissionNode {
        atomic(name, move |_ctx| value)
    }

    #[test]
    fn test_truth_tables() {
        let ctx = AccessContext::anonymous(Operation::Read);
        for (l, r) in [(false, false), (false, true), (true, false), (true, true)] {
            assert_eq!(and_(constant("l", l), constant("r", r)).evaluate(&ctx), l && r);
            assert_eq!(or_(constant("l", l), constant("r", r)).evaluate(&ctx), l || r);
            assert_eq!(xor_(constant("l", l), constant("r", r)).evaluate(&ctx), l ^ r);
        }
        assert!(not_(constant("f", false)).evaluate(&ctx));
        assert!(!not_(constant("t", true)).evaluate(&ctx));
    }

    #[test]
    fn test_display_composes_names() {
        let expr = or_(
            and_(constant("IsReadOnly", true), not_(constant("IsAuthenticated", true))),
            constant("IsAdmin", false),
        );
        assert_eq!(
            expr.to_string(),
            "((IsReadOnly_AND_(NOT_IsAuthenticated))_OR_IsAdmin)"
        );
    }

    #[test]
    fn test_idempotent_composition() {
        let ctx = AccessContext::anonymous(Operation::Read);
        let read_only = |v| constant("IsReadOnly", v);
        for value in [true, false] {
            assert_eq!(and_(read_only(value), read_only(value)).evaluate(&ctx), value);
            assert_eq!(or_(read_only(value), read_only(value)).evaluate(&ctx), value);
        }
    }
}
