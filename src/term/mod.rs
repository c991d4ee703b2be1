/*!
The term language: a hash-consed AST of primitive combinators over hereditarily finite sets
*/

pub mod analyse;
pub mod error;

pub use analyse::analyse;
pub use error::TermError;

use crate::debug_from_display;
use crate::util::cache::Cache;
use ahash::RandomState;
use dashmap::DashMap;
use elysees::Arc;
use lazy_static::lazy_static;
use once_cell::sync::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

lazy_static! {
    /// The process-wide node intern table
    static ref NODE_CACHE: Cache<NodeData> = Cache::new();

    /// Maps a plain node shape to its installed specialisation, if any. Consulted by
    /// [`Node::intern`] so that constructing a shape which has been specialised transparently
    /// returns the `Function`-wrapped node instead — "installing into the interning slot".
    static ref SPECIALISATIONS: DashMap<Node, Node, RandomState> = DashMap::default();
}

/// A callback installed by [`crate::eval::specialised`] to short-circuit evaluation of a
/// particular node shape. Compared and hashed by function pointer identity only: two
/// `Specialised` values are equal iff they wrap the same function.
#[derive(Clone, Copy)]
pub struct Specialised(pub(crate) crate::eval::specialised::Callback);

impl PartialEq for Specialised {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0 as *const (), other.0 as *const ())
    }
}
impl Eq for Specialised {}

impl Hash for Specialised {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0 as *const ()).hash(state);
    }
}

impl fmt::Debug for Specialised {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<specialised function>")
    }
}

/// A node's kind: the closed set of primitive combinators plus the two internal evaluator-only
/// shapes (`Union`, `Merge`) and the optional specialisation wrapper (`Function`)
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    /// `E`: the nullary constant ∅
    EmptySet,
    /// `I`: λx.x
    Identity,
    /// `+`: λx y. x ∪ {y}
    UnionPlus,
    /// `?`: λx y u v. if u ∈ v then x else y
    IfThenElse,
    /// `!`(f, g): λ…u v. if u ∈ v then f(…) else g(…)
    In(Node, Node),
    /// Projection(f, ℓ, r): drop ℓ leading and r trailing arguments, then apply f
    Projection(Node, usize, usize),
    /// Composition(f, g₁…gₖ): λx̄. f(g₁(x̄),…,gₖ(x̄))
    Composition(Node, Box<[Node]>),
    /// Recursion(g): primitive recursion on ∈
    Recursion(Node),
    /// internal: unions h over the elements of the recursion variable
    Union(Node),
    /// internal: unions the values of its runtime parameters
    Merge,
    /// a specialised rewrite installed over an existing node shape
    Function(Node, Specialised),
}

struct NodeData {
    kind: Kind,
    memo: Memo,
}

#[derive(Default)]
struct Memo {
    arity: OnceCell<usize>,
    size: OnceCell<usize>,
}

impl PartialEq for NodeData {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}
impl Eq for NodeData {}

impl Hash for NodeData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

/// A term of the combinator language: a cheap-to-clone handle onto a process-wide interned node.
/// As with [`crate::set::Set`], structural equality reduces to pointer equality.
#[derive(Clone)]
pub struct Node(Arc<NodeData>);

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

debug_from_display!(Node);

impl Node {
    fn intern(kind: Kind) -> Node {
        let candidate = Arc::new(NodeData {
            kind,
            memo: Memo::default(),
        });
        let node = Node(NODE_CACHE.intern(candidate));
        match SPECIALISATIONS.get(&node) {
            Some(specialised) => specialised.clone(),
            None => node,
        }
    }

    /// The empty-set constant `E`
    pub fn empty_set() -> Node {
        Node::intern(Kind::EmptySet)
    }

    /// The identity `I`
    pub fn identity() -> Node {
        Node::intern(Kind::Identity)
    }

    /// `+`
    pub fn union_plus() -> Node {
        Node::intern(Kind::UnionPlus)
    }

    /// `?`
    pub fn if_then_else() -> Node {
        Node::intern(Kind::IfThenElse)
    }

    /// `In(f, g)`
    pub fn in_operator(f: Node, g: Node) -> Node {
        Node::intern(Kind::In(f, g))
    }

    /// `Projection(f, l, r)`
    pub fn projection(f: Node, l: usize, r: usize) -> Node {
        if l == 0 && r == 0 {
            return f;
        }
        Node::intern(Kind::Projection(f, l, r))
    }

    /// `Composition(f, g1..gk)`
    pub fn composition(f: Node, g: Vec<Node>) -> Node {
        Node::intern(Kind::Composition(f, g.into_boxed_slice()))
    }

    /// `Recursion(g)`
    pub fn recursion(g: Node) -> Node {
        Node::intern(Kind::Recursion(g))
    }

    /// internal-only: `Union(h)`
    pub(crate) fn union(h: Node) -> Node {
        Node::intern(Kind::Union(h))
    }

    /// internal-only: `Merge`
    pub(crate) fn merge() -> Node {
        Node::intern(Kind::Merge)
    }

    /// Install a specialised evaluator over `node`; the new node replaces `node`'s interning
    /// slot, so every existing and future reference to that shape observes the specialisation.
    pub fn specialise(node: Node, callback: crate::eval::specialised::Callback) -> Node {
        let wrapped = Node::intern(Kind::Function(node.clone(), Specialised(callback)));
        SPECIALISATIONS.insert(node, wrapped.clone());
        wrapped
    }

    /// This node's kind
    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }

    /// The number of set arguments this term consumes
    pub fn arity(&self) -> usize {
        *self.0.memo.arity.get_or_init(|| match &self.0.kind {
            Kind::EmptySet => 0,
            Kind::Identity => 1,
            Kind::UnionPlus => 2,
            Kind::IfThenElse => 4,
            Kind::In(f, _) => f.arity(),
            Kind::Projection(f, l, r) => l + r + f.arity(),
            Kind::Composition(_, g) => g[0].arity(),
            Kind::Recursion(g) => g.arity() - 1,
            Kind::Union(h) => h.arity(),
            Kind::Merge => 0,
            Kind::Function(node, _) => node.arity(),
        })
    }

    /// `1 + sum(size of children)`
    pub fn size(&self) -> usize {
        *self.0.memo.size.get_or_init(|| match &self.0.kind {
            Kind::EmptySet | Kind::Identity | Kind::UnionPlus | Kind::IfThenElse | Kind::Merge => {
                1
            }
            Kind::In(f, g) => 1 + f.size() + g.size(),
            Kind::Projection(f, _, _) => 1 + f.size(),
            Kind::Composition(f, g) => 1 + f.size() + g.iter().map(Node::size).sum::<usize>(),
            Kind::Recursion(g) => 1 + g.size(),
            Kind::Union(h) => 1 + h.size(),
            Kind::Function(node, _) => node.size(),
        })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.0.kind {
            Kind::EmptySet => write!(f, "E"),
            Kind::Identity => write!(f, "I"),
            Kind::UnionPlus => write!(f, "+"),
            Kind::IfThenElse => write!(f, "?"),
            Kind::In(g, h) => write!(f, "!{}{}", g, h),
            Kind::Projection(node, l, r) => {
                write!(f, "{}{}{}", "<".repeat(*l), ">".repeat(*r), node)
            }
            Kind::Composition(head, args) => {
                write!(f, "o{}", head)?;
                for a in args.iter() {
                    write!(f, "{}", a)?;
                }
                Ok(())
            }
            Kind::Recursion(g) => write!(f, "R{}", g),
            Kind::Union(h) => write!(f, "Union({})", h),
            Kind::Merge => write!(f, "Merge"),
            Kind::Function(node, _) => write!(f, "{}", node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedupes_identical_shapes() {
        assert_eq!(Node::identity(), Node::identity());
        let a = Node::composition(Node::union_plus(), vec![Node::identity(), Node::identity()]);
        let b = Node::composition(Node::union_plus(), vec![Node::identity(), Node::identity()]);
        assert_eq!(a, b);
    }

    #[test]
    fn arity_matches_table() {
        assert_eq!(Node::empty_set().arity(), 0);
        assert_eq!(Node::identity().arity(), 1);
        assert_eq!(Node::union_plus().arity(), 2);
        assert_eq!(Node::if_then_else().arity(), 4);
        let successor = Node::composition(
            Node::union_plus(),
            vec![Node::identity(), Node::identity()],
        );
        assert_eq!(successor.arity(), 1);
    }

    #[test]
    fn projection_collapses_when_trivial() {
        assert_eq!(Node::projection(Node::identity(), 0, 0), Node::identity());
    }

    #[test]
    fn recursion_arity_is_one_less_than_g() {
        let g = Node::union_plus();
        let r = Node::recursion(g);
        assert_eq!(r.arity(), 1);
    }

    #[test]
    fn display_round_trips_primitive_syntax() {
        assert_eq!(Node::empty_set().to_string(), "E");
        assert_eq!(
            Node::composition(Node::union_plus(), vec![Node::identity(), Node::identity()])
                .to_string(),
            "o+II"
        );
    }
}
