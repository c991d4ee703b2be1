/*!
The semantic analyser: a recursive visitor that revalidates the arity-consistency invariants of
§3 on a whole term before it may be passed to the evaluator.
*/

use super::{Kind, Node, TermError};

/// Validate every arity invariant, recursively, bottom-up. A term which fails any check here must
/// never reach [`crate::eval`].
pub fn analyse(node: &Node) -> Result<(), TermError> {
    match node.kind() {
        Kind::EmptySet | Kind::Identity | Kind::UnionPlus | Kind::IfThenElse | Kind::Merge => {
            Ok(())
        }
        Kind::In(f, g) => {
            analyse(f)?;
            analyse(g)?;
            if f.arity() != g.arity() {
                return Err(TermError::MismatchedArity);
            }
            if f.arity() < 2 {
                return Err(TermError::InvalidInOperatorArity);
            }
            Ok(())
        }
        Kind::Projection(f, _, _) => analyse(f),
        Kind::Composition(f, compounds) => {
            analyse(f)?;
            match compounds.len() {
                0 => return Err(TermError::RequireAtLeastOneCompound),
                n if n < f.arity() => return Err(TermError::NotEnoughCompounds),
                n if n > f.arity() => return Err(TermError::TooManyCompounds),
                _ => {}
            }
            for g in compounds.iter() {
                analyse(g)?;
            }
            let arity = compounds[0].arity();
            if compounds.iter().any(|g| g.arity() != arity) {
                return Err(TermError::OneCompoundMismatchedArity);
            }
            Ok(())
        }
        Kind::Recursion(g) => {
            analyse(g)?;
            if g.arity() < 2 {
                return Err(TermError::InvalidRecursionArity);
            }
            Ok(())
        }
        Kind::Union(h) => analyse(h),
        Kind::Function(node, _) => analyse(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_and_constants_are_valid() {
        assert!(analyse(&Node::identity()).is_ok());
        assert!(analyse(&Node::empty_set()).is_ok());
    }

    #[test]
    fn successor_composition_is_valid() {
        let successor =
            Node::composition(Node::union_plus(), vec![Node::identity(), Node::identity()]);
        assert!(analyse(&successor).is_ok());
    }

    #[test]
    fn in_operator_rejects_mismatched_arity() {
        let f = Node::union_plus();
        let g = Node::identity();
        let bad = Node::in_operator(f, g);
        assert_eq!(analyse(&bad), Err(TermError::MismatchedArity));
    }

    #[test]
    fn in_operator_rejects_arity_below_two() {
        let f = Node::identity();
        let g = Node::identity();
        let bad = Node::in_operator(f, g);
        assert_eq!(analyse(&bad), Err(TermError::InvalidInOperatorArity));
    }

    #[test]
    fn composition_rejects_mismatched_compound_arity() {
        let f = Node::in_operator(Node::union_plus(), Node::union_plus());
        let compounds = vec![Node::identity(), Node::projection(Node::identity(), 1, 0)];
        let bad = Node::composition(f, compounds);
        assert_eq!(analyse(&bad), Err(TermError::OneCompoundMismatchedArity));
    }

    #[test]
    fn composition_rejects_zero_compounds() {
        let bad = Node::composition(Node::union_plus(), vec![]);
        assert_eq!(analyse(&bad), Err(TermError::RequireAtLeastOneCompound));
    }

    #[test]
    fn recursion_rejects_low_arity_operand() {
        let bad = Node::recursion(Node::identity());
        assert_eq!(analyse(&bad), Err(TermError::InvalidRecursionArity));
    }
}
