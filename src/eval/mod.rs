/*!
The lazy evaluator: a stack-driven, cache-memoised reducer for terms over hereditarily finite sets
*/

pub mod error;
pub mod observer;
pub mod specialised;

pub use error::EvalError;
pub use observer::Observer;

use crate::set::Set;
use crate::term::{Kind, Node};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// An argument to [`Interpreter::interpret`]: a Set used as-is, a string parsed as a set literal,
/// or a non-negative integer interpreted as an ordinal
#[derive(Clone, Debug)]
pub enum Argument {
    /// Used as-is
    Set(Set),
    /// Parsed via [`Set::parse`]
    Text(String),
    /// Interpreted via [`Set::generate_ordinal`]
    Ordinal(usize),
}

impl From<Set> for Argument {
    fn from(s: Set) -> Argument {
        Argument::Set(s)
    }
}

impl From<&str> for Argument {
    fn from(s: &str) -> Argument {
        Argument::Text(s.to_string())
    }
}

impl From<usize> for Argument {
    fn from(n: usize) -> Argument {
        Argument::Ordinal(n)
    }
}

enum ExprState {
    Closed(Set),
    Lazy(Node, Vec<Expression>),
}

/// A runtime wrapper over a term and its pending argument vector: either *closed* (carries a
/// concrete Set) or *lazy* (carries a node and an argument tuple of Expressions). Expressions are
/// interned per-[`Interpreter`]: structural equality (`x == y` in the evaluation rules) reduces
/// to this handle's identity.
#[derive(Clone)]
pub struct Expression(Rc<RefCell<ExprState>>);

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

impl Expression {
    /// Whether this expression already carries a concrete value
    pub fn is_closed(&self) -> bool {
        matches!(&*self.0.borrow(), ExprState::Closed(_))
    }

    /// The carried value, if closed
    pub fn value(&self) -> Option<Set> {
        match &*self.0.borrow() {
            ExprState::Closed(set) => Some(set.clone()),
            ExprState::Lazy(..) => None,
        }
    }

    /// The node and parameters, if lazy
    fn node_and_params(&self) -> Option<(Node, Vec<Expression>)> {
        match &*self.0.borrow() {
            ExprState::Lazy(node, params) => Some((node.clone(), params.clone())),
            ExprState::Closed(_) => None,
        }
    }

    /// The node, if lazy (used by [`observer::AtomicStepCounter`])
    pub fn lazy_node(&self) -> Option<Node> {
        match &*self.0.borrow() {
            ExprState::Lazy(node, _) => Some(node.clone()),
            ExprState::Closed(_) => None,
        }
    }

    fn assign(&self, set: Set) {
        *self.0.borrow_mut() = ExprState::Closed(set);
    }

    fn change_node(&self, node: Node, params: Vec<Expression>) {
        *self.0.borrow_mut() = ExprState::Lazy(node, params);
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &*self.0.borrow() {
            ExprState::Closed(set) => write!(f, "{}", set),
            ExprState::Lazy(node, params) => {
                write!(f, "{}(", node)?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ")")
            }
        }
    }
}

crate::debug_from_display!(Expression);

/// The operand stack driving reduction. `push`/`pop`/`peek` act on the top (the most recently
/// pushed expression); `head` is the bottom — the first expression ever pushed, representing the
/// program's final answer.
pub struct Stack(Vec<Expression>);

impl Stack {
    fn new() -> Stack {
        Stack(Vec::new())
    }

    fn push(&mut self, expression: Expression) {
        self.0.push(expression);
    }

    fn pop(&mut self) {
        self.0.pop();
    }

    /// The topmost expression
    pub fn peek(&self) -> Expression {
        self.0.last().expect("stack is never empty mid-run").clone()
    }

    /// The bottommost expression: the program's final answer once closed
    pub fn head(&self) -> Expression {
        self.0[0].clone()
    }

    /// Every expression currently on the stack, bottom to top
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Expression> {
        self.0.iter()
    }
}

type LazyKey = (Node, Vec<Expression>);

/// Evaluates one program (a closed [`Node`]) against argument tuples, with per-instance
/// memoisation so that no (node, argument-tuple) shape is reduced more than once.
pub struct Interpreter {
    root: Node,
    observers: Vec<Box<dyn Observer>>,
    closed_cache: RefCell<HashMap<Set, Expression>>,
    lazy_cache: RefCell<HashMap<LazyKey, Expression>>,
}

impl Interpreter {
    /// Build an interpreter for the given (already semantically analysed) program
    pub fn new(root: Node) -> Interpreter {
        specialised::install_all();
        Interpreter {
            root,
            observers: Vec::new(),
            closed_cache: RefCell::new(HashMap::new()),
            lazy_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Register an observer; `setup` is invoked immediately
    pub fn add_observer(&mut self, mut observer: Box<dyn Observer>) {
        observer.setup(self);
        self.observers.push(observer);
    }

    /// Drop every memoised expression; in-flight handles remain valid
    pub fn clear_cache(&self) {
        self.closed_cache.borrow_mut().clear();
        self.lazy_cache.borrow_mut().clear();
    }

    fn closed(&self, set: Set) -> Expression {
        if let Some(e) = self.closed_cache.borrow().get(&set) {
            return e.clone();
        }
        let expression = Expression(Rc::new(RefCell::new(ExprState::Closed(set.clone()))));
        self.closed_cache
            .borrow_mut()
            .insert(set, expression.clone());
        expression
    }

    fn lazy(&self, node: Node, params: Vec<Expression>) -> Expression {
        let key = (node.clone(), params.clone());
        if let Some(e) = self.lazy_cache.borrow().get(&key) {
            return e.clone();
        }
        let expression = Expression(Rc::new(RefCell::new(ExprState::Lazy(node, params))));
        self.lazy_cache
            .borrow_mut()
            .insert(key, expression.clone());
        expression
    }

    fn coerce(&self, argument: &Argument) -> Result<Expression, EvalError> {
        Ok(match argument {
            Argument::Set(set) => self.closed(set.clone()),
            Argument::Text(text) => self.closed(Set::parse(text)?),
            Argument::Ordinal(n) => self.closed(Set::generate_ordinal(*n)),
        })
    }

    /// Run the program against the given arguments, returning the resulting set.
    pub fn interpret(&mut self, arguments: &[Argument]) -> Result<Set, EvalError> {
        if arguments.len() != self.root.arity() {
            return Err(EvalError::MismatchedNumberOfArguments {
                expected: self.root.arity(),
                actual: arguments.len(),
            });
        }
        let params = arguments
            .iter()
            .map(|a| self.coerce(a))
            .collect::<Result<Vec<_>, _>>()?;
        let root_expression = self.lazy(self.root.clone(), params);
        let mut stack = Stack::new();
        stack.push(root_expression);
        Ok(self.run(&mut stack))
    }

    fn run(&mut self, stack: &mut Stack) -> Set {
        for observer in self.observers.iter_mut() {
            observer.init();
        }
        while !stack.head().is_closed() {
            for observer in self.observers.iter_mut() {
                observer.notify(stack);
            }
            if stack.peek().is_closed() {
                stack.pop();
            } else {
                self.step(stack);
            }
        }
        stack.head().value().expect("head is closed")
    }

    fn step(&self, stack: &mut Stack) {
        let top = stack.peek();
        let (node, params) = top
            .node_and_params()
            .expect("step is only called on a lazy expression");
        match node.kind().clone() {
            Kind::EmptySet => top.assign(Set::empty()),
            Kind::Identity => {
                let x = &params[0];
                if !x.is_closed() {
                    stack.push(x.clone());
                } else {
                    top.assign(x.value().unwrap());
                }
            }
            Kind::UnionPlus => {
                let (x, y) = (&params[0], &params[1]);
                if !x.is_closed() {
                    stack.push(x.clone());
                } else if !y.is_closed() {
                    stack.push(y.clone());
                } else {
                    let mut elements: Vec<Set> = x.value().unwrap().elements().cloned().collect();
                    elements.push(y.value().unwrap());
                    top.assign(Set::new(elements));
                }
            }
            Kind::IfThenElse => {
                let (x, y, u, v) = (&params[0], &params[1], &params[2], &params[3]);
                if x == y {
                    if !x.is_closed() {
                        stack.push(x.clone());
                    } else {
                        top.assign(x.value().unwrap());
                    }
                } else if u == v {
                    if !y.is_closed() {
                        stack.push(y.clone());
                    } else {
                        top.assign(y.value().unwrap());
                    }
                } else if !u.is_closed() {
                    stack.push(u.clone());
                } else if !v.is_closed() {
                    stack.push(v.clone());
                } else if v.value().unwrap().contains(&u.value().unwrap()) {
                    if !x.is_closed() {
                        stack.push(x.clone());
                    } else {
                        top.assign(x.value().unwrap());
                    }
                } else if !y.is_closed() {
                    stack.push(y.clone());
                } else {
                    top.assign(y.value().unwrap());
                }
            }
            Kind::In(f, g) => {
                let n = params.len();
                let (u, v) = (&params[n - 2], &params[n - 1]);
                if f == g {
                    top.change_node(f, params);
                } else if u == v {
                    top.change_node(g, params);
                } else if !u.is_closed() {
                    stack.push(u.clone());
                } else if !v.is_closed() {
                    stack.push(v.clone());
                } else if v.value().unwrap().contains(&u.value().unwrap()) {
                    top.change_node(f, params);
                } else {
                    top.change_node(g, params);
                }
            }
            Kind::Projection(f, l, r) => {
                let n = params.len();
                let sliced = params[l..n - r].to_vec();
                top.change_node(f, sliced);
            }
            Kind::Composition(f, compounds) => {
                let new_params: Vec<Expression> = compounds
                    .iter()
                    .map(|g| self.lazy(g.clone(), params.clone()))
                    .collect();
                top.change_node(f, new_params);
            }
            Kind::Recursion(g) => {
                let union_node = Node::union(node.clone());
                let union_expression = self.lazy(union_node, params.clone());
                let mut new_params = vec![union_expression, params[0].clone()];
                new_params.extend(params[1..].iter().cloned());
                top.change_node(g, new_params);
            }
            Kind::Union(h) => {
                let z = params[0].clone();
                if !z.is_closed() {
                    stack.push(z);
                } else {
                    let z_value = z.value().unwrap();
                    let tail = &params[1..];
                    let new_params: Vec<Expression> = z_value
                        .elements()
                        .map(|u| {
                            let mut p = vec![self.closed(u.clone())];
                            p.extend(tail.iter().cloned());
                            self.lazy(h.clone(), p)
                        })
                        .collect();
                    top.change_node(Node::merge(), new_params);
                }
            }
            Kind::Merge => {
                let mut result: Vec<Set> = Vec::new();
                for p in params.iter() {
                    if !p.is_closed() {
                        stack.push(p.clone());
                        return;
                    }
                    result.extend(p.value().unwrap().elements().cloned());
                }
                stack.peek().assign(Set::new(result));
            }
            Kind::Function(_, specialised) => {
                (specialised.0)(self, stack, &top, &params);
            }
        }
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Interpreter({})", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn successor() -> Node {
        Node::composition(Node::union_plus(), vec![Node::identity(), Node::identity()])
    }

    #[test]
    fn identity_returns_its_argument() {
        let mut interpreter = Interpreter::new(Node::identity());
        let result = interpreter
            .interpret(&[Argument::Ordinal(3)])
            .expect("interpret");
        assert_eq!(result.ordinal(), Some(3));
    }

    #[test]
    fn successor_adds_one() {
        let mut interpreter = Interpreter::new(successor());
        let result = interpreter
            .interpret(&[Argument::Ordinal(4)])
            .expect("interpret");
        assert_eq!(result.ordinal(), Some(5));
    }

    #[test]
    fn union_plus_example() {
        let composed = Node::composition(
            Node::union_plus(),
            vec![Node::identity(), Node::identity()],
        );
        let mut interpreter = Interpreter::new(composed);
        let arg: Set = Set::new(vec![Set::empty()]);
        let result = interpreter
            .interpret(&[Argument::Set(arg.clone())])
            .expect("interpret");
        let expected = Set::new(vec![Set::empty(), Set::new(vec![Set::empty()])]);
        assert_eq!(result, expected);
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let mut interpreter = Interpreter::new(Node::identity());
        let err = interpreter.interpret(&[]).unwrap_err();
        assert_eq!(
            err,
            EvalError::MismatchedNumberOfArguments {
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn recursion_over_union_plus_enumerates_elements() {
        // R+: recursive union, applied to {{{{}}}} yields {{}, {{}}, {{{}}}, {{{{}}}}}
        let r_plus = Node::recursion(Node::union_plus());
        let mut interpreter = Interpreter::new(r_plus);
        let arg = Set::generate_singleton(4);
        let result = interpreter
            .interpret(&[Argument::Set(arg)])
            .expect("interpret");
        let expected = Set::new(vec![
            Set::generate_singleton(1),
            Set::generate_singleton(2),
            Set::generate_singleton(3),
            Set::generate_singleton(4),
        ]);
        assert_eq!(result, expected);
    }
}
