use tree_sitter::Parser;

pub fn parse_python(code: &str) -> tree_sitter::Tree {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .expect("error loading Python grammar");
    parser.parse(code, None).unwrap()
}
