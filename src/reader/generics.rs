// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tugmacro_syntax::GenericParameter;

use crate::reader::types::TypeReader;

node_reader!(
    /// One generic parameter: `T`, `T: Equatable` or `each Item`.
    GenericParameterRef => GenericParameter
);

impl<'a> GenericParameterRef<'a> {
    /// The inline constraint after the colon.
    pub fn constraint(&self) -> Option<TypeReader<'a>> {
        self.node.inherited_type.as_ref().map(TypeReader::from_node)
    }

    /// Whether this is a parameter pack (`each T`).
    pub fn is_pack(&self) -> bool {
        self.node.each_keyword.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::reader::{FunctionReader, GenericParameterReader, NamedReader, Reader};
    use tugmacro_syntax::parse_decl;

    #[test]
    fn generic_parameters() {
        let decl = parse_decl("func zip<each T, U: Sequence>(_ u: U) {}").unwrap();
        let function = FunctionReader::new(&decl).unwrap();
        let params = function.generic_parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name(), "T");
        assert!(params[0].is_pack());
        assert!(params[0].constraint().is_none());
        assert_eq!(params[1].name(), "U");
        assert!(!params[1].is_pack());
        assert_eq!(params[1].constraint().unwrap().text(), "Sequence");
    }
}
