// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Binding analysis for variable declarations.
//!
//! One `let`/`var` statement can introduce several names, either as a comma
//! separated list (`var a = 1, b: Int`) or by destructuring a tuple
//! (`let (x, y) = (1, 2)`). [`analyze_bindings`] flattens a statement into
//! one [`Binding`] per introduced name.
//!
//! ## Rules
//!
//! - A simple binding takes its type from its annotation. A binding with
//!   neither annotation nor initializer shares the annotation of the next
//!   binding that has one, so `var a, b: Int` types both names.
//! - A tuple binding pairs pattern elements with the elements of a tuple
//!   initializer by position. A labeled element `(x: Int, y: Int)` names the
//!   label and treats the written pattern as a type hint. Otherwise the type
//!   comes from a tuple type annotation, then from a constructor-call
//!   initializer such as `Point()`.
//! - If any tuple pattern and its tuple initializer differ in length, the
//!   whole statement yields no bindings.
//! - A binding is mutable when declared with `var` and either it has no
//!   accessor block or its accessors include `set`, `willSet` or `didSet`.
//!   `let` bindings are never mutable.

use tugmacro_syntax::{
    AccessorKind, Accessors, Codegen, Expr, Pattern, PatternBinding, TupleExpr, TupleType,
    TypeNode, VariableDecl,
};
use tracing::trace;

use crate::reader::expr::ExprReader;
use crate::reader::{Reader, SyntaxNode};

/// One name introduced by a variable declaration.
#[derive(Debug, Clone)]
pub struct Binding<'a> {
    name: String,
    type_name: Option<String>,
    initializer: Option<String>,
    is_mutable: bool,
    decl: &'a VariableDecl,
    binding: &'a PatternBinding,
    pattern: &'a Pattern,
}

impl<'a> Binding<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared or inferred type, as written.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// The initializer for this name, as written.
    pub fn initializer(&self) -> Option<&str> {
        self.initializer.as_deref()
    }

    pub fn is_mutable(&self) -> bool {
        self.is_mutable
    }

    /// The declaration statement this name came from.
    pub fn decl(&self) -> &'a VariableDecl {
        self.decl
    }

    pub fn pattern_binding(&self) -> &'a PatternBinding {
        self.binding
    }

    /// The pattern for this name. For destructured names this is the tuple
    /// element's own pattern.
    pub fn pattern(&self) -> &'a Pattern {
        self.pattern
    }

    pub fn is_let(&self) -> bool {
        self.decl.is_let()
    }

    /// `static` or `class` on the declaration.
    pub fn is_type_member(&self) -> bool {
        self.decl
            .modifiers
            .iter()
            .any(|m| m.name.is("static") || m.name.is("class"))
    }

    /// Accessor kinds in the accessor block, `get` for the getter shorthand.
    pub fn accessor_kinds(&self) -> Vec<AccessorKind> {
        match self.binding.accessor_block.as_ref().map(|b| &b.accessors) {
            None => Vec::new(),
            Some(Accessors::Getter(_)) => vec![AccessorKind::Get],
            Some(Accessors::Explicit(decls)) => decls.iter().map(|d| d.kind).collect(),
        }
    }

    /// Whether the binding computes its value instead of storing it.
    pub fn is_computed(&self) -> bool {
        self.accessor_kinds()
            .iter()
            .any(|k| matches!(k, AccessorKind::Get | AccessorKind::Read))
    }

    /// Whether the binding has storage: no accessors, or observers only.
    pub fn is_stored(&self) -> bool {
        !self.is_computed()
    }

    pub fn has_observers(&self) -> bool {
        self.accessor_kinds()
            .iter()
            .any(|k| matches!(k, AccessorKind::WillSet | AccessorKind::DidSet))
    }
}

impl<'a> Reader<'a> for Binding<'a> {
    type Node = PatternBinding;

    fn node(&self) -> &'a PatternBinding {
        self.binding
    }
}

/// Flatten a variable declaration into one [`Binding`] per introduced name.
pub fn analyze_bindings(decl: &VariableDecl) -> Vec<Binding<'_>> {
    let is_var = !decl.is_let();
    let mut bindings = Vec::new();
    for binding in &decl.bindings {
        match &binding.pattern {
            Pattern::Tuple(_) => {
                let mut analyzer = TupleAnalyzer {
                    decl,
                    binding,
                    is_var,
                    out: &mut bindings,
                };
                let initializer = binding.initializer.as_ref().map(Expr::unparenthesized);
                if analyzer
                    .walk(&binding.pattern, initializer, binding.type_annotation.as_ref())
                    .is_err()
                {
                    trace!(
                        decl = %decl.node_span(),
                        "tuple pattern and initializer differ in length; statement skipped"
                    );
                    return Vec::new();
                }
            }
            pattern => {
                if let Some(name) = pattern.identifier() {
                    bindings.push(Binding {
                        name: name.text.clone(),
                        type_name: binding.type_annotation.as_ref().map(Codegen::to_source),
                        initializer: binding.initializer.as_ref().map(Codegen::to_source),
                        is_mutable: is_var && accessors_allow_mutation(binding),
                        decl,
                        binding,
                        pattern,
                    });
                }
            }
        }
    }
    share_trailing_annotation(&mut bindings);
    bindings
}

/// `var a, b: Int` declares both names as `Int`.
fn share_trailing_annotation(bindings: &mut [Binding<'_>]) {
    let mut next_type: Option<String> = None;
    for binding in bindings.iter_mut().rev() {
        let simple = !matches!(binding.binding.pattern, Pattern::Tuple(_));
        if simple && binding.binding.type_annotation.is_some() {
            next_type = binding.type_name.clone();
        } else if simple && binding.initializer.is_none() && binding.type_name.is_none() {
            binding.type_name = next_type.clone();
        } else {
            next_type = None;
        }
    }
}

fn accessors_allow_mutation(binding: &PatternBinding) -> bool {
    match &binding.accessor_block {
        None => true,
        Some(block) => block
            .accessor_decls()
            .iter()
            .any(|d| matches!(d.kind, AccessorKind::Set | AccessorKind::WillSet | AccessorKind::DidSet)),
    }
}

struct ArityMismatch;

struct TupleAnalyzer<'a, 'o> {
    decl: &'a VariableDecl,
    binding: &'a PatternBinding,
    is_var: bool,
    out: &'o mut Vec<Binding<'a>>,
}

impl<'a> TupleAnalyzer<'a, '_> {
    fn walk(
        &mut self,
        pattern: &'a Pattern,
        initializer: Option<&'a Expr>,
        annotation: Option<&'a TypeNode>,
    ) -> Result<(), ArityMismatch> {
        let Pattern::Tuple(tuple) = pattern else {
            if let Some(name) = pattern.identifier() {
                self.push(name.text.clone(), pattern, initializer, annotation, None);
            }
            return Ok(());
        };

        let init_slots = match initializer {
            Some(Expr::Tuple(init)) => Some(tuple_slots(init)),
            _ => None,
        };
        if let Some(slots) = &init_slots {
            if slots.len() != tuple.elements.len() {
                return Err(ArityMismatch);
            }
        }
        let type_slots = annotation
            .and_then(tuple_type)
            .map(|t| t.elements.iter().map(|e| &e.ty).collect::<Vec<_>>())
            .filter(|slots| slots.len() == tuple.elements.len());

        for (i, element) in tuple.elements.iter().enumerate() {
            let slot_init = init_slots.as_ref().map(|slots| slots[i]);
            let slot_type = type_slots.as_ref().map(|slots| slots[i]);
            match &element.label {
                Some(label) => self.push(
                    label.text.clone(),
                    &element.pattern,
                    slot_init,
                    None,
                    Some(element.pattern.to_source()),
                ),
                None => self.walk(&element.pattern, slot_init, slot_type)?,
            }
        }
        Ok(())
    }

    fn push(
        &mut self,
        name: String,
        pattern: &'a Pattern,
        initializer: Option<&'a Expr>,
        annotation: Option<&'a TypeNode>,
        hint: Option<String>,
    ) {
        let type_name = hint
            .or_else(|| annotation.map(Codegen::to_source))
            .or_else(|| initializer.and_then(|e| ExprReader::from_node(e).constructed_type()));
        self.out.push(Binding {
            name,
            type_name,
            initializer: initializer.map(Codegen::to_source),
            is_mutable: self.is_var && self.binding.accessor_block.is_none(),
            decl: self.decl,
            binding: self.binding,
            pattern,
        });
    }
}

fn tuple_slots(init: &TupleExpr) -> Vec<&Expr> {
    init.elements.iter().map(|e| e.expr.unparenthesized()).collect()
}

fn tuple_type(ty: &TypeNode) -> Option<&TupleType> {
    match ty {
        TypeNode::Tuple(tuple) => Some(tuple),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugmacro_syntax::{parse_decl, Decl};

    fn with_bindings(source: &str, check: impl FnOnce(Vec<Binding<'_>>)) {
        let decl = parse_decl(source).unwrap();
        let Decl::Variable(var) = &decl else {
            panic!("expected a variable declaration: {source}");
        };
        check(analyze_bindings(var));
    }

    fn summary(bindings: &[Binding<'_>]) -> Vec<(String, Option<String>, bool)> {
        bindings
            .iter()
            .map(|b| (b.name().to_string(), b.type_name().map(str::to_string), b.is_mutable()))
            .collect()
    }

    #[test]
    fn simple_bindings() {
        with_bindings("var a = 1, b: String = \"two\", c: Double", |bindings| {
            assert_eq!(
                summary(&bindings),
                [
                    ("a".into(), None, true),
                    ("b".into(), Some("String".into()), true),
                    ("c".into(), Some("Double".into()), true),
                ]
            );
            assert_eq!(bindings[0].initializer(), Some("1"));
            assert_eq!(bindings[2].initializer(), None);
        });
    }

    #[test]
    fn trailing_annotation_is_shared() {
        with_bindings("var x, y, z: Int", |bindings| {
            let types: Vec<_> = bindings.iter().map(|b| b.type_name()).collect();
            assert_eq!(types, [Some("Int"), Some("Int"), Some("Int")]);
        });
        with_bindings("var x = 0, y: Int", |bindings| {
            assert_eq!(bindings[0].type_name(), None);
        });
    }

    #[test]
    fn let_is_never_mutable() {
        with_bindings("let limit: Int = 10", |bindings| {
            assert_eq!(summary(&bindings), [("limit".into(), Some("Int".into()), false)]);
        });
    }

    #[test]
    fn accessors_decide_mutability() {
        with_bindings("var doubled: Int { value * 2 }", |bindings| {
            assert!(!bindings[0].is_mutable());
            assert!(bindings[0].is_computed());
        });
        with_bindings("var total: Int { get set }", |bindings| {
            assert!(bindings[0].is_mutable());
        });
        with_bindings("var name: String { get }", |bindings| {
            assert!(!bindings[0].is_mutable());
        });
        with_bindings("var score = 0 {\n    didSet {\n        log()\n    }\n}", |bindings| {
            assert!(bindings[0].is_mutable());
            assert!(bindings[0].is_stored());
            assert!(bindings[0].has_observers());
        });
    }

    #[test]
    fn tuple_destructuring_pairs_positionally() {
        with_bindings("let (width, height) = (10, 20)", |bindings| {
            let pairs: Vec<_> = bindings
                .iter()
                .map(|b| (b.name().to_string(), b.initializer().map(str::to_string)))
                .collect();
            assert_eq!(
                pairs,
                [
                    ("width".to_string(), Some("10".to_string())),
                    ("height".to_string(), Some("20".to_string()))
                ]
            );
            assert!(bindings.iter().all(|b| !b.is_mutable()));
        });
    }

    #[test]
    fn tuple_labels_are_type_hints() {
        with_bindings("var (x: Int, y: Double) = (1, 2.0)", |bindings| {
            assert_eq!(
                summary(&bindings),
                [
                    ("x".into(), Some("Int".into()), true),
                    ("y".into(), Some("Double".into()), true),
                ]
            );
        });
    }

    #[test]
    fn tuple_types_from_constructors_and_annotations() {
        with_bindings("let (origin, size, count) = (Point(), Size(width: 1), 3)", |bindings| {
            let types: Vec<_> = bindings.iter().map(|b| b.type_name()).collect();
            assert_eq!(types, [Some("Point"), Some("Size"), None]);
        });
        with_bindings("let (a, b): (Int, String) = (1, \"x\")", |bindings| {
            let types: Vec<_> = bindings.iter().map(|b| b.type_name()).collect();
            assert_eq!(types, [Some("Int"), Some("String")]);
        });
    }

    #[test]
    fn wildcards_and_nested_tuples() {
        with_bindings("let (a, _, (b, c)) = (1, 2, (3, 4))", |bindings| {
            let names: Vec<_> = bindings.iter().map(|b| b.name()).collect();
            assert_eq!(names, ["a", "b", "c"]);
            assert_eq!(bindings[2].initializer(), Some("4"));
        });
    }

    #[test]
    fn tuple_from_non_literal_keeps_names() {
        with_bindings("let (x, y) = point", |bindings| {
            let names: Vec<_> = bindings.iter().map(|b| b.name()).collect();
            assert_eq!(names, ["x", "y"]);
            assert!(bindings.iter().all(|b| b.initializer().is_none()));
        });
    }

    #[test]
    fn tuple_arity_mismatch_drops_whole_statement() {
        with_bindings("let (a, b) = (1, 2, 3)", |bindings| assert!(bindings.is_empty()));
        with_bindings("let first = 0, (a, b) = (1, 2, 3)", |bindings| {
            assert!(bindings.is_empty())
        });
        with_bindings("let (a, (b, c)) = (1, (2, 3, 4))", |bindings| {
            assert!(bindings.is_empty())
        });
    }

    #[test]
    fn bindings_share_the_statement() {
        with_bindings("static var a = 1, b = 2", |bindings| {
            assert_eq!(bindings[0].decl().id, bindings[1].decl().id);
            assert_ne!(bindings[0].pattern_binding().id, bindings[1].pattern_binding().id);
            assert!(bindings.iter().all(|b| b.is_type_member()));
            assert_eq!(bindings[1].text(), "b = 2");
        });
    }
}
