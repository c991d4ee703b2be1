/*!
Enumerates every term of a given size and arity, applying the redundancy-elimination rules of
`original_source/src/zerkel/generation/generator.py`: terms equal to a smaller or
already-produced term are skipped, and a handful of known-redundant shapes are blacklisted
outright.
*/

pub mod blacklist;

use crate::eval::Interpreter;
use crate::set::Set;
use crate::term::{Kind, Node};
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

static BLACKLISTED: Lazy<HashSet<Node>> = Lazy::new(|| {
    blacklist::BLACKLIST
        .iter()
        .map(|(text, _)| crate::parser::parse(text).expect("blacklist entry must parse"))
        .collect()
});

fn is_blacklisted(node: &Node) -> bool {
    BLACKLISTED.contains(node)
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Direction {
    LeftRight,
    NoLeft,
    NoLeftNorRight,
}

type Key = (usize, usize, Direction, bool, bool);

/// Enumerates terms by size (node count) and arity. `use_in_operator` selects between a grammar
/// that includes the `In` shorthand and the plain `IfThenElse`-only grammar.
pub struct Enumerator {
    use_in_operator: bool,
    cache: RefCell<HashMap<Key, Vec<Node>>>,
    constant_cache: RefCell<HashMap<Set, Node>>,
}

impl std::fmt::Debug for Enumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Enumerator")
            .field("use_in_operator", &self.use_in_operator)
            .finish()
    }
}

impl Enumerator {
    pub fn new(use_in_operator: bool) -> Enumerator {
        crate::eval::specialised::install_all();
        let mut constant_cache = HashMap::new();
        constant_cache.insert(Set::empty(), Node::empty_set());
        Enumerator {
            use_in_operator,
            cache: RefCell::new(HashMap::new()),
            constant_cache: RefCell::new(constant_cache),
        }
    }

    /// Every term of exactly `size` nodes and `arity` parameters, smallest substructures first.
    pub fn generate(&self, size: usize, arity: usize) -> Vec<Node> {
        self.generate_with(size, arity, Direction::NoLeftNorRight, true, true)
    }

    fn generate_with(
        &self,
        size: usize,
        arity: usize,
        lr: Direction,
        composition_allowed: bool,
        in_op_allowed: bool,
    ) -> Vec<Node> {
        let key = (size, arity, lr, composition_allowed, in_op_allowed);
        if let Some(cached) = self.cache.borrow().get(&key) {
            return cached.clone();
        }
        let result = self.generate_uncached(size, arity, lr, composition_allowed, in_op_allowed);
        self.cache.borrow_mut().insert(key, result.clone());
        result
    }

    fn generate_checked(&self, size: i64, arity: usize, lr: Direction) -> Vec<Node> {
        if size < 0 {
            return Vec::new();
        }
        self.generate_with(size as usize, arity, lr, true, true)
    }

    fn generate_uncached(
        &self,
        size: usize,
        arity: usize,
        lr: Direction,
        composition_allowed: bool,
        in_op_allowed: bool,
    ) -> Vec<Node> {
        let t = (arity as i64 - 3).max(1);
        if (size as i64) < t {
            return Vec::new();
        }
        let mut out = Vec::new();
        if size == 1 {
            match arity {
                0 => out.push(Node::empty_set()),
                1 => out.push(Node::identity()),
                2 => out.push(Node::union_plus()),
                4 if !self.use_in_operator => out.push(Node::if_then_else()),
                _ => {}
            }
        } else {
            if self.use_in_operator && in_op_allowed && arity > 1 && size > 3 {
                out.extend(self.generate_in_operator(arity, size));
            }
            match lr {
                Direction::LeftRight => out.extend(self.generate_left_right(arity, size)),
                Direction::NoLeft => out.extend(self.generate_right(arity, size)),
                Direction::NoLeftNorRight => {}
            }
            if arity > 0 {
                out.extend(self.generate_recursion(arity, size));
            }
            if composition_allowed {
                out.extend(self.generate_composition(arity, size));
            }
        }
        out
    }

    fn generate_in_operator(&self, arity: usize, size: usize) -> Vec<Node> {
        let mut out = Vec::new();
        for f_size in 1..size - 1 {
            for f in self.generate_with(f_size, arity, Direction::LeftRight, true, false) {
                for g in
                    self.generate_with(size - f_size - 1, arity, Direction::LeftRight, true, false)
                {
                    if !in_constructor_can_be_simplified(&f, &g) {
                        out.push(Node::in_operator(f.clone(), g));
                    }
                }
            }
        }
        out
    }

    fn generate_left_right(&self, arity: usize, size: usize) -> Vec<Node> {
        let mut out = Vec::new();
        let upper = (arity + 1).min(size);
        for n in 1..upper {
            for f in self.generate_with(size - n, arity - n, Direction::NoLeftNorRight, true, true)
            {
                if n == arity {
                    out.push(Node::projection(f, n, 0));
                } else {
                    for r in 0..=n {
                        out.push(Node::projection(f.clone(), n - r, r));
                    }
                }
            }
        }
        out
    }

    fn generate_right(&self, arity: usize, size: usize) -> Vec<Node> {
        let mut out = Vec::new();
        let upper = arity.min(size);
        for r in 1..upper {
            for f in self.generate_with(size - r, arity - r, Direction::NoLeftNorRight, true, true)
            {
                out.push(Node::projection(f, 0, r));
            }
        }
        out
    }

    fn generate_recursion(&self, arity: usize, size: usize) -> Vec<Node> {
        let lr = if arity > 1 {
            Direction::NoLeftNorRight
        } else {
            Direction::NoLeft
        };
        let mut out = Vec::new();
        for g in self.generate_with(size - 1, arity + 1, lr, true, true) {
            let p = Node::recursion(g);
            if !is_blacklisted(&p) {
                out.push(p);
            }
        }
        out
    }

    fn generate_composition(&self, arity: usize, size: usize) -> Vec<Node> {
        let t = (arity as i64 - 3).max(1);
        let mut out = Vec::new();
        if (size as i64) <= t {
            return out;
        }
        for f_size in 1..(size as i64 - t) {
            let f_size = f_size as usize;
            let g_size = size as i64 - f_size as i64 - 1;
            if g_size < 0 {
                continue;
            }
            let max_arity = (f_size as i64 + 3).min(g_size / t + 1);
            let start_arity: i64 = if f_size == 1 { 2 } else { 1 };
            let mut f_arity = start_arity;
            while f_arity <= max_arity {
                let f_programs =
                    self.generate_with(f_size, f_arity as usize, Direction::NoLeftNorRight, true, true);
                if !f_programs.is_empty() {
                    let v = g_size - f_arity * t;
                    for r in stars_and_bars(v, f_arity as usize, t) {
                        let per_position: Vec<Vec<Node>> = r
                            .iter()
                            .map(|&l| self.generate_checked(l, arity, Direction::LeftRight))
                            .collect();
                        if per_position.iter().any(Vec::is_empty) {
                            continue;
                        }
                        for compounds in per_position.into_iter().multi_cartesian_product() {
                            if compounds_can_be_simplified(&compounds) {
                                continue;
                            }
                            for f in &f_programs {
                                let candidate = Node::composition(f.clone(), compounds.clone());
                                if composition_can_be_simplified(&candidate) {
                                    continue;
                                }
                                if candidate.arity() > 0 {
                                    out.push(candidate);
                                } else if let Some(constant) = self.accept_constant(candidate) {
                                    out.push(constant);
                                }
                            }
                        }
                    }
                }
                f_arity += 1;
            }
        }
        out
    }

    fn accept_constant(&self, p: Node) -> Option<Node> {
        let mut interpreter = Interpreter::new(p.clone());
        let value = interpreter.interpret(&[]).ok()?;
        let mut cache = self.constant_cache.borrow_mut();
        match cache.get(&value).cloned() {
            Some(existing) => {
                if p.size() < existing.size() {
                    cache.insert(value, p.clone());
                    Some(p)
                } else if existing == p {
                    Some(p)
                } else {
                    None
                }
            }
            None => {
                cache.insert(value, p.clone());
                Some(p)
            }
        }
    }
}

/// Distribute `v` bonus points over `n` parts with an initial value of `t` each.
fn stars_and_bars(v: i64, n: usize, t: i64) -> Vec<Vec<i64>> {
    if n == 1 {
        return vec![vec![v + t]];
    }
    if v < 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for u in 0..=v {
        for rest in stars_and_bars(v - u, n - 1, t) {
            let mut row = vec![t + u];
            row.extend(rest);
            out.push(row);
        }
    }
    out
}

fn in_constructor_can_be_simplified(p: &Node, q: &Node) -> bool {
    if p == q {
        return true;
    }
    if is_blacklisted(p) || is_blacklisted(q) {
        return true;
    }
    if let (Kind::Projection(_, pl, _), Kind::Projection(_, ql, _)) = (p.kind(), q.kind()) {
        if *pl > 0 && *ql > 0 && p.arity() > 2 {
            return true;
        }
    }
    false
}

fn compounds_can_be_simplified(compounds: &[Node]) -> bool {
    if compounds.len() == 1 {
        match compounds[0].kind() {
            Kind::Identity | Kind::Composition(_, _) => return true,
            _ => {}
        }
    }
    if compounds
        .iter()
        .all(|c| matches!(c.kind(), Kind::Projection(_, _, _)))
    {
        let contains_left = compounds.iter().all(|c| match c.kind() {
            Kind::Projection(f, l, _) => *l > 0 || f.arity() == 0,
            _ => false,
        });
        let contains_right = compounds.iter().all(|c| match c.kind() {
            Kind::Projection(f, _, r) => *r > 0 || f.arity() == 0,
            _ => false,
        });
        return contains_left || contains_right;
    }
    false
}

fn composition_can_be_simplified(p: &Node) -> bool {
    if is_blacklisted(p) {
        return true;
    }
    if let Kind::Composition(f, g) = p.kind() {
        if matches!(f.kind(), Kind::IfThenElse) && g.len() >= 4 && (g[0] == g[1] || g[2] == g[3]) {
            return true;
        }
        if *f == Node::recursion(Node::if_then_else()) && g.len() >= 3 {
            let first_is_empty_projection = matches!(
                g[0].kind(),
                Kind::Projection(inner, _, _) if matches!(inner.kind(), Kind::EmptySet)
            );
            if first_is_empty_projection || g[1] == g[2] {
                return true;
            }
        }
        if matches!(f.kind(), Kind::In(_, _)) && g.len() >= 2 {
            if g[g.len() - 2..].iter().all(|c| c.arity() == 0) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_the_three_size_one_primitives_at_their_arity() {
        let enumerator = Enumerator::new(true);
        assert_eq!(enumerator.generate(1, 0), vec![Node::empty_set()]);
        assert_eq!(enumerator.generate(1, 1), vec![Node::identity()]);
        assert_eq!(enumerator.generate(1, 2), vec![Node::union_plus()]);
    }

    #[test]
    fn if_then_else_only_appears_without_in_operator() {
        let with_in = Enumerator::new(true);
        assert!(with_in.generate(1, 4).is_empty());
        let without_in = Enumerator::new(false);
        assert_eq!(without_in.generate(1, 4), vec![Node::if_then_else()]);
    }

    #[test]
    fn blacklisted_recursion_is_never_produced() {
        let enumerator = Enumerator::new(true);
        let r_gt_identity = crate::eval::specialised::r_gt_identity();
        for size in 1..6 {
            for arity in 0..4 {
                assert!(!enumerator.generate(size, arity).contains(&r_gt_identity));
            }
        }
    }

    #[test]
    fn stars_and_bars_matches_known_distribution() {
        let result = stars_and_bars(4, 2, 9);
        assert_eq!(result, vec![vec![9, 13], vec![10, 12], vec![11, 11], vec![12, 10], vec![13, 9]]);
    }

    #[test]
    fn generate_two_node_size_two_arity_one_program_includes_self_duplication() {
        let enumerator = Enumerator::new(true);
        let programs = enumerator.generate(4, 1);
        assert!(programs.contains(&crate::parser::parse("o+II").unwrap()));
    }
}
