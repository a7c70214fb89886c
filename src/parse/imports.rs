//! Import and export extraction via tree-sitter queries.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Bindings pulled out of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModule {
    pub static_imports: Vec<String>,
    pub dynamic_imports: Vec<String>,
    pub exports: Vec<String>,
}

const JS_QUERY: &str = r#"
(import_statement source: (string) @import)
(call_expression function: (identifier) @func arguments: (arguments (string) @import) (#eq? @func "require"))
(call_expression function: (import) arguments: (arguments (string) @dynamic))
(export_statement declaration: (function_declaration name: (identifier) @export))
(export_statement declaration: (class_declaration name: (identifier) @export))
(export_statement declaration: (lexical_declaration (variable_declarator name: (identifier) @export)))
"#;

// Near-identical to JS_QUERY, but class names are `type_identifier` nodes
// in the TypeScript grammar; the shared pattern would fail query
// compilation outright.
const TS_QUERY: &str = r#"
(import_statement source: (string) @import)
(call_expression function: (identifier) @func arguments: (arguments (string) @import) (#eq? @func "require"))
(call_expression function: (import) arguments: (arguments (string) @dynamic))
(export_statement declaration: (function_declaration name: (identifier) @export))
(export_statement declaration: (class_declaration name: (type_identifier) @export))
(export_statement declaration: (lexical_declaration (variable_declarator name: (identifier) @export)))
"#;

/// Extracts static imports, dynamic imports and exported bindings from
/// file content. Unsupported extensions yield an empty result; nothing
/// here fails outward.
pub fn parse_module(content: &str, extension: &str) -> ParsedModule {
    let mut parsed = ParsedModule::default();
    let mut parser = Parser::new();

    let (language, query_str): (tree_sitter::Language, &str) = match extension {
        "rs" => (
            tree_sitter_rust::LANGUAGE.into(),
            r#"
            (use_declaration argument: (_) @import)
            (mod_item name: (_) @import)
            "#,
        ),
        "py" => (
            tree_sitter_python::LANGUAGE.into(),
            r#"
            (import_statement name: (_) @import)
            (import_from_statement module_name: (_) @import)
            "#,
        ),
        "js" | "jsx" => (tree_sitter_javascript::LANGUAGE.into(), JS_QUERY),
        "ts" => (tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), TS_QUERY),
        "tsx" => (tree_sitter_typescript::LANGUAGE_TSX.into(), TS_QUERY),
        "go" => (
            tree_sitter_go::LANGUAGE.into(),
            r#"
            (import_spec path: (string_literal) @import)
            "#,
        ),
        _ => return parsed,
    };

    if parser.set_language(&language).is_err() {
        return parsed;
    }

    let tree = match parser.parse(content, None) {
        Some(t) => t,
        None => return parsed,
    };

    let query = match Query::new(&language, query_str) {
        Ok(q) => q,
        Err(_) => return parsed,
    };

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), content.as_bytes());

    while let Some(m) = matches.next() {
        // The cursor does not apply #eq? predicates itself, so the
        // require() pattern is checked by hand via the @func capture.
        let mut func_ok = true;
        for capture in m.captures {
            if query.capture_names()[capture.index as usize] == "func" {
                func_ok = capture
                    .node
                    .utf8_text(content.as_bytes())
                    .is_ok_and(|text| text == "require");
            }
        }

        for capture in m.captures {
            let capture_name = query.capture_names()[capture.index as usize];
            let Ok(text) = capture.node.utf8_text(content.as_bytes()) else {
                continue;
            };
            let mut clean = text.trim_matches(|c| c == '"' || c == '\'').to_string();

            match capture_name {
                "import" if func_ok => {
                    if extension == "py" {
                        if let Some(idx) = clean.find(" as ") {
                            clean = clean[..idx].to_string();
                        }
                    }
                    push_unique(&mut parsed.static_imports, clean);
                }
                "dynamic" => push_unique(&mut parsed.dynamic_imports, clean),
                "export" => push_unique(&mut parsed.exports, clean),
                _ => {}
            }
        }
    }

    parsed
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}
