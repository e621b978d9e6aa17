//! Set-algebra combinators: negation, intersection, union and exclusive union.

use crate::assign::{assignable_with, reverse, DeepAssignable, ReverseAssignable};
use crate::guard::{RecursionGuard, Seen};
use crate::kernel::equal::slice_equal;
use crate::kernel::hash::{deep_hash, mix};
use crate::tag::Tag;
use crate::value::Heap;
use crate::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    AllOf,
    AnyOf,
    OneOf,
}

/// An n-ary combinator over member types.
///
/// Equality and hashing are sensitive to member order; assignability is not.
#[derive(Clone, Debug)]
pub struct Logical {
    op: LogicalOp,
    members: Vec<Value>,
}

impl Logical {
    #[inline]
    pub fn op(&self) -> LogicalOp {
        self.op
    }

    #[inline]
    pub fn members(&self) -> &[Value] {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut Vec<Value> {
        &mut self.members
    }

    pub(crate) fn deep_equal(&self, guard: &mut RecursionGuard, other: &Logical) -> bool {
        self.op == other.op && slice_equal(guard, &self.members, &other.members)
    }

    pub(crate) fn deep_hash(&self, seen: &mut Seen, tag: Tag) -> u64 {
        self.members
            .iter()
            .fold(tag as u64, |h, m| mix(h, deep_hash(seen, m)))
    }
}

impl DeepAssignable for Logical {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        let accepted = match self.op {
            LogicalOp::AnyOf => {
                self.members.iter().any(|m| assignable_with(guard, m, candidate))
                    || reverse(guard, candidate, declared)
            }
            LogicalOp::AllOf => {
                self.members.iter().all(|m| assignable_with(guard, m, candidate))
                    || reverse(guard, candidate, declared)
            }
            LogicalOp::OneOf => {
                let mut found = 0;
                for m in &self.members {
                    if assignable_with(guard, m, candidate) {
                        found += 1;
                        if found > 1 {
                            break;
                        }
                    }
                }
                match found {
                    0 => reverse(guard, candidate, declared),
                    1 => true,
                    _ => false,
                }
            }
        };
        // The guard already holds (declared, candidate); equality gets its own.
        accepted || declared.equals(candidate)
    }
}

impl ReverseAssignable for Logical {
    fn assignable_to(&self, guard: &mut RecursionGuard, _candidate: &Value, declared: &Value) -> bool {
        if self.members.is_empty() {
            return false;
        }
        match self.op {
            // Every value of a union lies in some member.
            LogicalOp::AnyOf | LogicalOp::OneOf => self
                .members
                .iter()
                .all(|m| assignable_with(guard, declared, m)),
            // Every value of an intersection lies in each member.
            LogicalOp::AllOf => self
                .members
                .iter()
                .any(|m| assignable_with(guard, declared, m)),
        }
    }
}

/// Complement of a type.
#[derive(Clone, Debug)]
pub struct Negation {
    negated: Value,
}

impl Negation {
    #[inline]
    pub fn negated(&self) -> &Value {
        &self.negated
    }

    pub(crate) fn negated_mut(&mut self) -> &mut Value {
        &mut self.negated
    }
}

impl DeepAssignable for Negation {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        match candidate {
            // !A accepts !B when B accepts A.
            Value::Not(other) => assignable_with(guard, other.negated(), &self.negated),
            Value::Logical(l) => match l.op() {
                LogicalOp::AnyOf | LogicalOp::OneOf => {
                    !l.members().is_empty()
                        && l.members().iter().all(|m| assignable_with(guard, declared, m))
                }
                LogicalOp::AllOf => l.members().iter().any(|m| assignable_with(guard, declared, m)),
            },
            _ => !assignable_with(guard, &self.negated, candidate),
        }
    }
}

/// Complement of `t`. Negating a negation yields the original type.
pub fn not(t: Value) -> Value {
    match t {
        Value::Not(n) => n.negated.clone(),
        t => Value::Not(Heap::new(Negation { negated: t })),
    }
}

fn logical(op: LogicalOp, members: Vec<Value>) -> Value {
    Value::Logical(Heap::new(Logical { op, members }))
}

/// Values matching every member. No members accepts everything.
pub fn all_of(members: Vec<Value>) -> Value {
    logical(LogicalOp::AllOf, members)
}

/// Values matching at least one member. No members accepts nothing.
pub fn any_of(members: Vec<Value>) -> Value {
    logical(LogicalOp::AnyOf, members)
}

/// Values matching exactly one member.
pub fn one_of(members: Vec<Value>) -> Value {
    logical(LogicalOp::OneOf, members)
}

/// Integers and floats.
pub fn number() -> Value {
    any_of(vec![Value::IntegerType, Value::FloatType])
}

/// Union of the distinct `types`, collapsing the trivial cases: no types is
/// `Any`, a single distinct type is that type.
pub fn union_of_distinct<'a>(types: impl IntoIterator<Item = &'a Value>) -> Value {
    let mut distinct: Vec<Value> = Vec::new();
    for t in types {
        if !distinct.iter().any(|d| d.equals(t)) {
            distinct.push(t.clone());
        }
    }
    match distinct.len() {
        0 => Value::AnyType,
        1 => distinct.pop().unwrap_or(Value::AnyType),
        _ => any_of(distinct),
    }
}
