/*!
Named short-circuit rewrites installed over specific term shapes, grounded exactly on
`original_source/src/zerkel/interpreter/functions.py`
*/

use super::{Expression, Interpreter, Stack};
use crate::set::Set;
use crate::term::Node;

/// The signature of a specialised node's evaluator: given the interpreter, the run's stack, the
/// lazy expression being reduced, and its parameters, it must push, assign, or change the node of
/// `expression` exactly as a regular node-kind evaluator would.
pub type Callback = fn(&Interpreter, &mut Stack, &Expression, &[Expression]);

/// `R?`: the general conditional-recursion pattern, `Recursion(IfThenElse)`. Parameters
/// `(x, u, v)`. Shortcuts forcing `u`/`v` when `u == v`, and returns ∅ as soon as membership is
/// decided without needing to force `x`.
pub fn r_question() -> Node {
    let plain = Node::recursion(Node::if_then_else());
    Node::specialise(plain, r_ite)
}

/// `R>I`: `Recursion(Projection(Identity, 0, 1))`, constant ∅ for any input
pub fn r_gt_identity() -> Node {
    let plain = Node::recursion(Node::projection(Node::identity(), 0, 1));
    Node::specialise(plain, constant_empty)
}

/// `RR?`: `Recursion(Recursion(IfThenElse))`, constant ∅ for any input
pub fn rr_question() -> Node {
    let plain = Node::recursion(Node::recursion(Node::if_then_else()));
    Node::specialise(plain, constant_empty)
}

/// Install every required specialisation, exactly once per process
/// (`original_source`'s `compile_functions`, run once at interpreter module load).
pub fn install_all() {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        r_question();
        r_gt_identity();
        rr_question();
    });
}

fn constant_empty(_: &Interpreter, _stack: &mut Stack, expression: &Expression, _: &[Expression]) {
    expression.assign(Set::empty());
}

fn r_ite(_: &Interpreter, stack: &mut Stack, expression: &Expression, parameters: &[Expression]) {
    let (x, u, v) = (&parameters[0], &parameters[1], &parameters[2]);
    if u == v {
        if !x.is_closed() {
            stack.push(x.clone());
        } else {
            expression.assign(x.value().unwrap());
        }
    } else if !u.is_closed() {
        stack.push(u.clone());
    } else if !v.is_closed() {
        stack.push(v.clone());
    } else if v.value().unwrap().contains(&u.value().unwrap()) {
        expression.assign(Set::empty());
    } else if !x.is_closed() {
        stack.push(x.clone());
    } else {
        expression.assign(x.value().unwrap());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{Argument, Interpreter as Interp};

    #[test]
    fn r_question_short_circuits_equal_branches() {
        let node = r_question();
        let mut interpreter = Interp::new(node);
        let set = Set::generate_ordinal(3);
        let result = interpreter
            .interpret(&[Argument::Set(set.clone()), Argument::Set(set.clone()), Argument::Set(set)])
            .expect("interpret");
        assert_eq!(result.ordinal(), Some(3));
    }

    #[test]
    fn r_gt_identity_is_constant_empty() {
        let node = r_gt_identity();
        let mut interpreter = Interp::new(node);
        let result = interpreter
            .interpret(&[Argument::Ordinal(5)])
            .expect("interpret");
        assert_eq!(result, Set::empty());
    }
}
