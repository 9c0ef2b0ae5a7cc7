//! Local type inference for returned expressions.
//!
//! Only facts visible inside one function definition are used: literal
//! forms, operators, casts, and the declared types of parameters and local
//! variables. Anything else is unknown, and an unknown type never matches.

use std::collections::HashMap;

use refract_syntax::{Node, SyntaxTree};

/// Node kinds whose bodies belong to a different function or class.
const OPAQUE_KINDS: &[&str] = &[
    "lambda_expression",
    "class_specifier",
    "struct_specifier",
    "union_specifier",
];

/// Integer types that promote to `int` in arithmetic.
const PROMOTED_TO_INT: &[&str] = &[
    "bool",
    "char",
    "signed char",
    "unsigned char",
    "short",
    "unsigned short",
    "wchar_t",
    "char8_t",
    "char16_t",
    "char32_t",
];

/// Arithmetic types that survive promotion unchanged.
const ARITHMETIC: &[&str] = &[
    "int",
    "unsigned int",
    "long",
    "unsigned long",
    "long long",
    "unsigned long long",
    "float",
    "double",
    "long double",
];

const CASTS: &[&str] = &["static_cast", "const_cast", "reinterpret_cast", "dynamic_cast"];

/// Collects the `return` statements that belong to `body` itself, skipping
/// nested lambdas and local classes.
pub(crate) fn own_returns<'tree>(tree: &SyntaxTree, body: Node<'tree>) -> Vec<Node<'tree>> {
    let mut found = Vec::new();
    let mut pending = vec![body];
    while let Some(node) = pending.pop() {
        for child in tree.children(node).into_iter().rev() {
            match child.kind() {
                "return_statement" => found.push(child),
                kind if OPAQUE_KINDS.contains(&kind) => {}
                _ => pending.push(child),
            }
        }
    }
    found.sort_by_key(Node::start_byte);
    found
}

/// Returns the value expression of a `return` statement, if any.
pub(crate) fn returned_value<'tree>(tree: &SyntaxTree, statement: Node<'tree>) -> Option<Node<'tree>> {
    tree.named_children(statement).into_iter().next()
}

/// Declared types of the names visible in one function definition.
pub(crate) struct Scope {
    declared: HashMap<String, Vec<Option<String>>>,
}

impl Scope {
    /// Builds the scope of `function`, a `function_definition` node.
    pub(crate) fn of_function(tree: &SyntaxTree, function: Node<'_>) -> Self {
        let mut scope = Self {
            declared: HashMap::new(),
        };

        let parameters = tree
            .field(function, "declarator")
            .and_then(|declarator| tree.field(declarator, "parameters"));
        if let Some(list) = parameters {
            for parameter in tree.named_children(list) {
                scope.declare(tree, parameter);
            }
        }

        if let Some(body) = tree.field(function, "body") {
            let mut pending = vec![body];
            while let Some(node) = pending.pop() {
                for child in tree.named_children(node) {
                    match child.kind() {
                        "declaration" => scope.declare(tree, child),
                        kind if OPAQUE_KINDS.contains(&kind) => {}
                        _ => pending.push(child),
                    }
                }
            }
        }
        scope
    }

    fn declare(&mut self, tree: &SyntaxTree, declaration: Node<'_>) {
        let Some(type_node) = tree.field(declaration, "type") else {
            return;
        };
        let base = concrete_type_name(tree, type_node);
        let qualifiers: Vec<&str> = tree
            .children(declaration)
            .into_iter()
            .filter(|child| child.kind() == "type_qualifier")
            .map(|child| tree.text(child))
            .collect();

        let mut cursor = declaration.walk();
        for declarator in declaration.children_by_field_name("declarator", &mut cursor) {
            let Some((name, indirection)) = declared_name(tree, declarator) else {
                continue;
            };
            let declared = base.as_ref().map(|base_name| {
                if indirection == 0 {
                    base_name.clone()
                } else {
                    let mut pointee = qualifiers.clone();
                    pointee.push(base_name);
                    format!("{}{}", pointee.join(" "), "*".repeat(indirection))
                }
            });
            self.declared.entry(name.to_owned()).or_default().push(declared);
        }
    }

    /// Returns the declared type of `name` when every declaration agrees.
    fn lookup(&self, name: &str) -> Option<&str> {
        let candidates = self.declared.get(name)?;
        let first = candidates.first()?.as_deref()?;
        candidates
            .iter()
            .all(|candidate| candidate.as_deref() == Some(first))
            .then_some(first)
    }
}

/// Walks a declarator down to its identifier, counting pointer and array
/// levels. References are transparent.
fn declared_name<'tree>(tree: &'tree SyntaxTree, declarator: Node<'_>) -> Option<(&'tree str, usize)> {
    let mut current = declarator;
    let mut indirection: usize = 0;
    loop {
        match current.kind() {
            "identifier" => return Some((tree.text(current), indirection)),
            "init_declarator" => current = tree.field(current, "declarator")?,
            "pointer_declarator" | "array_declarator" => {
                indirection = indirection.saturating_add(1);
                current = tree.field(current, "declarator")?;
            }
            "reference_declarator" => current = tree.named_children(current).into_iter().last()?,
            _ => return None,
        }
    }
}

/// Returns the normalised name of a type node, or `None` for placeholders.
pub(crate) fn concrete_type_name(tree: &SyntaxTree, type_node: Node<'_>) -> Option<String> {
    if matches!(type_node.kind(), "placeholder_type_specifier" | "auto" | "decltype") {
        return None;
    }
    Some(normalise_type(tree.text(type_node)))
}

/// Collapses whitespace and maps spelling variants of builtin types to one
/// canonical form.
pub(crate) fn normalise_type(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let canonical = match collapsed.as_str() {
        "signed" | "signed int" => "int",
        "unsigned" => "unsigned int",
        "short int" | "signed short" | "signed short int" => "short",
        "unsigned short int" => "unsigned short",
        "long int" | "signed long" | "signed long int" => "long",
        "unsigned long int" => "unsigned long",
        "long long int" | "signed long long" | "signed long long int" => "long long",
        "unsigned long long int" => "unsigned long long",
        _ => return collapsed,
    };
    canonical.to_owned()
}

/// Infers the type of `expr` from local information only.
pub(crate) fn infer(tree: &SyntaxTree, scope: &Scope, expr: Node<'_>) -> Option<String> {
    match expr.kind() {
        "number_literal" => number_type(tree.text(expr)),
        "char_literal" => char_type(tree.text(expr)),
        "string_literal" | "raw_string_literal" => string_type(tree.text(expr)),
        "concatenated_string" => {
            let first = tree.named_children(expr).into_iter().next()?;
            infer(tree, scope, first)
        }
        "true" | "false" => Some("bool".to_owned()),
        "null" | "nullptr" if tree.text(expr) == "nullptr" => Some("std::nullptr_t".to_owned()),
        "parenthesized_expression" => match tree.named_children(expr).as_slice() {
            [inner] => infer(tree, scope, *inner),
            _ => None,
        },
        "unary_expression" => unary_type(tree, scope, expr),
        "binary_expression" => binary_type(tree, scope, expr),
        "conditional_expression" => {
            let consequence = infer(tree, scope, tree.field(expr, "consequence")?)?;
            let alternative = infer(tree, scope, tree.field(expr, "alternative")?)?;
            (consequence == alternative).then_some(consequence)
        }
        "cast_expression" => {
            let target = tree.field(expr, "type")?;
            Some(normalise_type(tree.text(target)))
        }
        "call_expression" => named_cast_type(tree, expr),
        "identifier" => scope.lookup(tree.text(expr)).map(str::to_owned),
        _ => None,
    }
}

fn unary_type(tree: &SyntaxTree, scope: &Scope, expr: Node<'_>) -> Option<String> {
    let operator = tree.text(tree.field(expr, "operator")?);
    if operator == "!" {
        return Some("bool".to_owned());
    }
    let operand = infer(tree, scope, tree.field(expr, "argument")?)?;
    promote(&operand)
}

fn binary_type(tree: &SyntaxTree, scope: &Scope, expr: Node<'_>) -> Option<String> {
    let operator = tree.text(tree.field(expr, "operator")?);
    match operator {
        "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" => Some("bool".to_owned()),
        "<<" | ">>" => {
            let left = infer(tree, scope, tree.field(expr, "left")?)?;
            promote(&left)
        }
        "+" | "-" | "*" | "/" | "%" | "&" | "|" | "^" => {
            let left = promote(&infer(tree, scope, tree.field(expr, "left")?)?)?;
            let right = promote(&infer(tree, scope, tree.field(expr, "right")?)?)?;
            (left == right).then_some(left)
        }
        _ => None,
    }
}

fn named_cast_type(tree: &SyntaxTree, expr: Node<'_>) -> Option<String> {
    let function = tree.field(expr, "function")?;
    if function.kind() != "template_function" {
        return None;
    }
    let name = tree.field(function, "name")?;
    if !CASTS.contains(&tree.text(name)) {
        return None;
    }
    let arguments = tree.field(function, "arguments")?;
    match tree.named_children(arguments).as_slice() {
        [target] => Some(normalise_type(tree.text(*target))),
        _ => None,
    }
}

/// Applies integral promotion; non-arithmetic types have no promoted form.
fn promote(type_name: &str) -> Option<String> {
    if PROMOTED_TO_INT.contains(&type_name) {
        Some("int".to_owned())
    } else if ARITHMETIC.contains(&type_name) {
        Some(type_name.to_owned())
    } else {
        None
    }
}

fn number_type(text: &str) -> Option<String> {
    let literal: String = text
        .chars()
        .filter(|c| *c != '\'')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let hex = literal.starts_with("0x");
    let floating = if hex {
        literal.contains('p')
    } else {
        literal.contains('.') || literal.contains('e')
    };

    if floating {
        let name = match literal.chars().last() {
            Some('f') => "float",
            Some('l') => "long double",
            _ => "double",
        };
        return Some(name.to_owned());
    }

    let digits = literal.trim_end_matches(['u', 'l', 'z']);
    let suffix = literal.get(digits.len()..)?;
    let (unsigned, min_rank) = match suffix {
        "" => (false, 0),
        "u" => (true, 0),
        "l" => (false, 1),
        "ul" | "lu" => (true, 1),
        "ll" => (false, 2),
        "ull" | "llu" => (true, 2),
        _ => return None,
    };
    let (value, decimal) = integer_value(digits)?;

    INTEGER_TYPES
        .iter()
        .filter(|candidate| candidate.rank >= min_rank)
        .filter(|candidate| {
            if unsigned {
                !candidate.signed
            } else {
                candidate.signed || !decimal
            }
        })
        .find(|candidate| value <= candidate.max)
        .map(|candidate| candidate.name.to_owned())
}

/// One standard integer type an unsuffixed or suffixed literal may take.
struct IntegerType {
    name: &'static str,
    rank: u8,
    signed: bool,
    max: u64,
}

impl IntegerType {
    const fn new(name: &'static str, rank: u8, signed: bool, max: u64) -> Self {
        Self {
            name,
            rank,
            signed,
            max,
        }
    }
}

/// Candidate types in the order C++ tries them, for an LP64 data model.
const INTEGER_TYPES: [IntegerType; 6] = [
    IntegerType::new("int", 0, true, 0x7fff_ffff),
    IntegerType::new("unsigned int", 0, false, 0xffff_ffff),
    IntegerType::new("long", 1, true, 0x7fff_ffff_ffff_ffff),
    IntegerType::new("unsigned long", 1, false, u64::MAX),
    IntegerType::new("long long", 2, true, 0x7fff_ffff_ffff_ffff),
    IntegerType::new("unsigned long long", 2, false, u64::MAX),
];

/// Parses the digits of a lower-cased integer literal, returning its value
/// and whether it was written in decimal.
fn integer_value(digits: &str) -> Option<(u64, bool)> {
    let (body, radix) = if let Some(hex) = digits.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(binary) = digits.strip_prefix("0b") {
        (binary, 2)
    } else if digits.len() > 1
        && let Some(octal) = digits.strip_prefix('0')
    {
        (octal, 8)
    } else {
        (digits, 10)
    };
    let value = u64::from_str_radix(body, radix).ok()?;
    Some((value, radix == 10))
}

fn literal_prefix(text: &str, quote: char) -> Option<&str> {
    text.find(quote).and_then(|index| text.get(..index))
}

fn char_type(text: &str) -> Option<String> {
    let name = match literal_prefix(text, '\'')? {
        "" => "char",
        "L" => "wchar_t",
        "u8" => "char8_t",
        "u" => "char16_t",
        "U" => "char32_t",
        _ => return None,
    };
    Some(name.to_owned())
}

fn string_type(text: &str) -> Option<String> {
    let prefix = literal_prefix(text, '"')?;
    let encoding = prefix.strip_suffix('R').unwrap_or(prefix);
    let element = match encoding {
        "" | "u8" => "char",
        "L" => "wchar_t",
        "u" => "char16_t",
        "U" => "char32_t",
        _ => return None,
    };
    Some(format!("const {element}*"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", Some("int"))]
    #[case("0x2Au", Some("unsigned int"))]
    #[case("7L", Some("long"))]
    #[case("7ul", Some("unsigned long"))]
    #[case("1'000'000LL", Some("long long"))]
    #[case("3ULL", Some("unsigned long long"))]
    #[case("1.5", Some("double"))]
    #[case("1e3", Some("double"))]
    #[case("2.5f", Some("float"))]
    #[case("2.5L", Some("long double"))]
    #[case("0x1p3", Some("double"))]
    #[case("0xff", Some("int"))]
    #[case("5uz", None)]
    #[case("2147483647", Some("int"))]
    #[case("3000000000", Some("long"))]
    #[case("3000000000LL", Some("long long"))]
    #[case("0xFFFFFFFF", Some("unsigned int"))]
    #[case("0x80000000", Some("unsigned int"))]
    #[case("4294967296u", Some("unsigned long"))]
    #[case("0xFFFFFFFFFFFFFFFF", Some("unsigned long"))]
    #[case("0b101", Some("int"))]
    #[case("017", Some("int"))]
    #[case("037777777777", Some("unsigned int"))]
    #[case("9223372036854775808", None)]
    #[case("0x1'0000'0000'0000'0000", None)]
    fn number_literals_follow_suffix_and_value_rules(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(number_type(text).as_deref(), expected);
    }

    #[rstest]
    #[case("'a'", Some("char"))]
    #[case("L'a'", Some("wchar_t"))]
    #[case("u8'a'", Some("char8_t"))]
    #[case("U'a'", Some("char32_t"))]
    fn char_literals_follow_prefix(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(char_type(text).as_deref(), expected);
    }

    #[rstest]
    #[case("\"hi\"", Some("const char*"))]
    #[case("L\"hi\"", Some("const wchar_t*"))]
    #[case("R\"(raw)\"", Some("const char*"))]
    #[case("uR\"(raw)\"", Some("const char16_t*"))]
    fn string_literals_decay_to_pointers(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(string_type(text).as_deref(), expected);
    }

    #[rstest]
    #[case("unsigned", "unsigned int")]
    #[case("long   int", "long")]
    #[case("std::vector<int>", "std::vector<int>")]
    fn normalises_type_spellings(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(normalise_type(text), expected);
    }
}
