//! Identifier utilities shared by the synthesis stages

/// Words that cannot be used as parameter identifiers in generated code
const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "true", "try", "void", "volatile", "while",
    // names taken by locals of every synthesized method
    "context", "requestOptions",
];

/// Whether `name` collides with a reserved word
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Identifier a wire parameter is exposed under in generated code
pub fn escape_reserved_parameter_name(name: &str) -> String {
    if is_reserved(name) {
        format!("{name}Parameter")
    } else {
        name.to_string()
    }
}
