//! TypeScript-subset grammar.
//!
//! Built with [`GrammarBuilder`]; reshapes render JavaScript text directly,
//! so the value of a successful program parse is the output code.
//!
//! Supported:
//!
//! - `interface` and `type` declarations, type-only imports/exports and
//!   `declare` statements (erased)
//! - `let`/`const`/`var` declarations with optional type annotations
//! - function declarations with typed parameters, optional parameters,
//!   defaults, rest parameters, generics and return types
//! - arrow function heads with typed parameters inside expressions
//! - `if`/`else`, `while`, `for`, `return`, blocks, expression statements
//! - line and block comments
//!
//! Expressions are otherwise copied verbatim, line breaks included. A newline
//! outside brackets ends an expression unless the line ends in an operator or
//! the next line starts with one (`.`, `?.`, `?`, `:`, a binary operator). An
//! operator with no operand after it is a syntax error.

use core_types::Value;
use parser::{GrammarBuilder, Node};

const IDENT: &str = r"[A-Za-z_$][A-Za-z0-9_$]*";
const PARAM_NAME: &str = r"(?:\.\.\.)?[A-Za-z_$][A-Za-z0-9_$]*";
const TYPE_NAME: &str =
    r"(?:(?:keyof|typeof|readonly|unique|infer)\s+)*[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*";
const STRING: &str = r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\[\s\S])*`"#;
const COMMENT: &str = r"//[^\n]*|/\*[\s\S]*?\*/";
const GROUP_CHUNK: &str = r#"[^()\[\]{}"'`]+"#;
const BLOCK_COMMENT: &str = r"/\*[\s\S]*?\*/";
const WORD_CHUNK: &str = r#"(?:[^-+*%&|^<>=?:,.;{}()\[\]"'`\n/]|\+\+|--)+"#;
const OPERATOR: &str = r"(?:[-+*%&|^<>=?:,.]+(?:\s|//[^\n]*)*)+";
const SLASH: &str = r"/=?\s*(?:[-+]\s*)*";
const LINE_BREAK: &str = r"[ \t]*\r?\n\s*";
const REGEX_LITERAL: &str = r"/(?:[^/*\\\n\[;]|\\.|\[(?:[^\]\\\n]|\\.)*\])(?:[^/\\\n\[;]|\\.|\[(?:[^\]\\\n]|\\.)*\])*/[A-Za-z]*";
const DEFAULT_CHUNK: &str = r#"[^,;{}()\[\]"'`\n/]+"#;

/// Entry points of the grammar.
#[derive(Debug, Clone)]
pub struct TypeScriptGrammar {
    /// A whole source file. Its value is the JavaScript output.
    pub program: Node,
    /// Leading whitespace and a single statement. Used to explain failures.
    pub statement: Node,
}

/// Builds the grammar into `g` and returns its entry points.
pub fn typescript_grammar(g: &GrammarBuilder) -> TypeScriptGrammar {
    let ws = g.regex(r"\s*");
    let ws1 = g.regex(r"\s+");
    let ident = g.regex(IDENT);
    let string = g.regex(STRING);
    let comment = g.regex(COMMENT);
    let terminator = g.regex(r"[ \t]*;").nullable();

    // Balanced groups, copied verbatim.
    let chunk = g.regex(GROUP_CHUNK);
    let delimited = |name: &str, open: &str, close: &str| {
        g.symbol(name, |g| {
            g.sequence([
                g.literal(open),
                g.repetition(g.choice([string.clone(), g.reference("group"), chunk.clone()])),
                g.literal(close),
            ])
        })
    };
    let parens = delimited("parens", "(", ")");
    let brackets = delimited("brackets", "[", "]");
    let braces = delimited("braces", "{", "}");
    let group = g.symbol("group", |g| {
        g.choice([parens.clone(), brackets.clone(), braces.clone()])
    });

    let angles = g.symbol("angles", |g| {
        g.sequence([
            g.literal("<"),
            g.repetition(g.choice([g.regex(r"[^<>]+"), g.reference("angles")])),
            g.literal(">"),
        ])
    });

    let primary = g.symbol("type_primary", |g| {
        g.choice([
            group.clone(),
            string.clone(),
            g.regex(r"-?[0-9]+(?:\.[0-9]+)?"),
            g.sequence([
                g.regex(TYPE_NAME),
                g.sequence([ws.clone(), angles.clone()]).nullable(),
            ]),
        ])
    });
    let array_suffix = g.regex(r"(?:\s*\[\])*");
    let union = |name: &str, term: Node| {
        g.symbol(name, |g| {
            g.sequence([
                g.regex(r"(?:\|\s*)?"),
                term.clone(),
                g.repetition(g.sequence([ws.clone(), g.regex(r"[|&]"), ws.clone(), term])),
            ])
        })
    };
    let function_type_return = g
        .sequence([ws.clone(), g.literal("=>"), ws.clone(), g.reference("type")])
        .nullable();
    let ty = union(
        "type",
        g.sequence([primary.clone(), array_suffix.clone(), function_type_return]),
    );
    // No function types at the top level, so an arrow's `=>` is not taken
    // as part of its return type.
    let arrow_return_type = union("arrow_return_type", g.sequence([primary, array_suffix]));
    let annotation = g
        .sequence([ws.clone(), g.literal(":"), ws.clone(), ty.clone()])
        .nullable();

    let default_value = verbatim_run(g, &[string.clone(), group.clone(), g.regex(DEFAULT_CHUNK)]);
    let param = g
        .sequence([
            g.choice([g.regex(PARAM_NAME), group.clone()]).with_capture("name"),
            g.regex(r"\s*\?").nullable(),
            annotation.clone(),
            g.sequence([
                ws.clone(),
                g.literal("="),
                ws.clone(),
                default_value.with_capture("value"),
            ])
            .nullable()
            .with_capture("default"),
        ])
        .map(render_param);
    let params = g
        .sequence([
            param.with_capture("first"),
            g.repetition(
                g.sequence([ws.clone(), g.literal(","), ws.clone(), param.with_capture("param")])
                    .map(|v| field(&v, "param")),
            )
            .with_capture("rest"),
            g.sequence([ws.clone(), g.literal(",")]).nullable(),
        ])
        .map(render_params)
        .nullable();

    let arrow_head = g
        .sequence([
            g.literal("("),
            ws.clone(),
            params.with_capture("params"),
            ws.clone(),
            g.literal(")"),
            g.sequence([ws.clone(), g.literal(":"), ws.clone(), arrow_return_type])
                .nullable(),
            ws.clone(),
            g.literal("=>"),
        ])
        .map(|v| Value::from(format!("({}) =>", text(&v, "params"))));
    // Anything an operator may be applied to. Operators never end an
    // expression: each one carries the operand that follows it, possibly on
    // the next line.
    let block_comment = g.regex(BLOCK_COMMENT);
    let regex_literal = g.regex(REGEX_LITERAL);
    let word = g.regex(WORD_CHUNK);
    let operand = g.choice([
        string.clone(),
        block_comment.clone(),
        arrow_head.clone(),
        group.clone(),
        word.clone(),
        regex_literal.clone(),
    ]);
    let joined = |lead: Node, rest: Node| {
        g.sequence([lead.map(reindent).with_capture("lead"), rest.with_capture("rest")])
            .map(|v| Value::from(format!("{}{}", text(&v, "lead"), text(&v, "rest"))))
    };
    let operation = joined(g.regex(OPERATOR), operand.clone());
    let expression = verbatim_run(
        g,
        &[
            string.clone(),
            block_comment,
            arrow_head,
            group.clone(),
            word,
            regex_literal,
            joined(g.regex(SLASH), operand),
            operation.clone(),
            joined(g.regex(LINE_BREAK), operation),
        ],
    )
    .map(|v| Value::from(v.flatten_text().trim_end()));

    let statements = g.repetition(
        g.sequence([ws.clone(), g.reference("statement").with_capture("statement")])
            .map(|v| field(&v, "statement")),
    );
    let block = g.symbol("block", |g| {
        g.sequence([
            g.literal("{"),
            statements.with_capture("body"),
            ws.clone(),
            g.literal("}"),
        ])
        .map(render_block)
    });

    let interface_decl = g
        .sequence([
            g.regex(r"(?:export\s+)?(?:declare\s+)?interface\b"),
            ws1.clone(),
            ident.clone(),
            ws.clone(),
            angles.nullable(),
            ws.clone(),
            g.regex(r"extends\b[^{]*").nullable(),
            braces.clone(),
        ])
        .map(erase);

    let type_alias = g
        .sequence([
            g.regex(r"(?:export\s+)?(?:declare\s+)?type\b"),
            ws1.clone(),
            ident.clone(),
            ws.clone(),
            angles.nullable(),
            ws.clone(),
            g.literal("="),
            ws.clone(),
            ty,
            terminator.clone(),
        ])
        .map(erase);

    let type_only = g
        .sequence([
            g.regex(r"(?:import|export)\s+type\b[^;\n]*"),
            terminator.clone(),
        ])
        .map(erase);

    let ambient = g
        .sequence([
            g.regex(r"(?:export\s+)?declare\b[^;{\n]*"),
            braces.nullable(),
            terminator.clone(),
        ])
        .map(erase);

    let function_decl = g
        .sequence([
            g.regex(r"(?:export\s+)?(?:default\s+)?(?:async\s+)?function\b")
                .with_capture("head"),
            g.regex(r"\s*\*").nullable().with_capture("star"),
            ws.clone(),
            ident.nullable().with_capture("name"),
            ws.clone(),
            angles.nullable(),
            ws.clone(),
            g.literal("("),
            ws.clone(),
            params.with_capture("params"),
            ws.clone(),
            g.literal(")"),
            annotation.clone(),
            ws.clone(),
            block.with_capture("body"),
        ])
        .map(render_function);

    let if_stmt = g
        .sequence([
            g.regex(r"if\b"),
            ws.clone(),
            parens.with_capture("test"),
            ws.clone(),
            g.reference("statement").with_capture("then"),
            g.sequence([
                ws.clone(),
                g.regex(r"else\b"),
                ws.clone(),
                g.reference("statement").with_capture("statement"),
            ])
            .nullable()
            .with_capture("otherwise"),
        ])
        .map(render_if);

    let loop_stmt = g
        .sequence([
            g.regex(r"(?:while|for)\b").with_capture("keyword"),
            ws.clone(),
            parens.with_capture("head"),
            ws.clone(),
            g.reference("statement").with_capture("body"),
        ])
        .map(|v| {
            Value::from(format!(
                "{} {} {}",
                text(&v, "keyword"),
                text(&v, "head"),
                text(&v, "body")
            ))
        });

    let var_decl = g
        .sequence([
            g.regex(r"(?:export\s+)?(?:let|const|var)\b").with_capture("kind"),
            ws1,
            g.choice([ident.clone(), group.clone()]).with_capture("name"),
            g.regex(r"!").nullable(),
            annotation,
            g.sequence([
                ws.clone(),
                g.literal("="),
                ws.clone(),
                expression.with_capture("value"),
            ])
            .nullable()
            .with_capture("init"),
            terminator.clone(),
        ])
        .map(render_var);

    let return_stmt = g
        .sequence([
            g.regex(r"return\b"),
            g.sequence([g.regex(r"[ \t]*"), expression.with_capture("value")])
                .nullable()
                .with_capture("argument"),
            terminator.clone(),
        ])
        .map(|v| match v.get("argument").and_then(|a| a.get("value")) {
            Some(value) => Value::from(format!("return {};", value.flatten_text())),
            None => Value::from("return;"),
        });

    let expression_stmt = g
        .sequence([expression.with_capture("expression"), terminator])
        .map(|v| Value::from(format!("{};", text(&v, "expression"))));

    let statement = g.symbol("statement", |g| {
        g.choice([
            comment.clone(),
            interface_decl,
            type_alias,
            type_only,
            ambient,
            function_decl,
            if_stmt,
            loop_stmt,
            var_decl,
            return_stmt,
            block.clone(),
            g.literal(";").map(erase),
            expression_stmt,
        ])
    });

    let program = g
        .sequence([statements.with_capture("body"), ws.clone()])
        .map(render_program);

    TypeScriptGrammar {
        program,
        statement: g.sequence([ws, statement.with_capture("statement")]),
    }
}

/// One or more `atoms`, valued as the concatenation of their values.
fn verbatim_run(g: &GrammarBuilder, atoms: &[Node]) -> Node {
    let atom = g.choice(atoms.iter().cloned());
    g.sequence([atom.with_capture("head"), g.repetition(atom).with_capture("tail")])
        .map(|v| Value::from(format!("{}{}", text(&v, "head"), text(&v, "tail"))))
}

fn field(value: &Value, key: &str) -> Value {
    value.get(key).cloned().unwrap_or_default()
}

fn text(value: &Value, key: &str) -> String {
    value.get(key).map(Value::flatten_text).unwrap_or_default()
}

fn erase(_: Value) -> Value {
    Value::from("")
}

/// Puts every line after a break at a two-space continuation indent.
///
/// Only whitespace, operators and line comments reach this, never string
/// contents.
fn reindent(v: Value) -> Value {
    let raw = v.flatten_text();
    let mut lines = raw.split('\n');
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();
    let Some((last, middle)) = rest.split_last() else {
        return Value::from(raw);
    };
    let mut out = first.trim_end().to_string();
    for line in middle.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out.push_str("\n  ");
    out.push_str(last.trim());
    Value::from(out)
}

fn normalize_space(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn render_param(v: Value) -> Value {
    match v.get("default").and_then(|d| d.get("value")) {
        Some(default) => Value::from(format!(
            "{} = {}",
            text(&v, "name"),
            default.flatten_text().trim_end()
        )),
        None => Value::from(text(&v, "name")),
    }
}

fn render_params(v: Value) -> Value {
    let mut names = vec![text(&v, "first")];
    if let Some(rest) = v.get("rest").and_then(Value::as_list) {
        names.extend(rest.iter().map(Value::flatten_text));
    }
    Value::from(names.join(", "))
}

fn render_function(v: Value) -> Value {
    let star = if v.get("star").is_some_and(|s| !s.is_null()) {
        "*"
    } else {
        ""
    };
    let name = text(&v, "name");
    let name = if name.is_empty() { name } else { format!(" {}", name) };
    Value::from(format!(
        "{}{}{}({}) {}",
        normalize_space(&text(&v, "head")),
        star,
        name,
        text(&v, "params"),
        text(&v, "body")
    ))
}

fn render_if(v: Value) -> Value {
    let mut out = format!("if {} {}", text(&v, "test"), text(&v, "then"));
    if let Some(alt) = v.get("otherwise").and_then(|o| o.get("statement")) {
        out.push_str(" else ");
        out.push_str(&alt.flatten_text());
    }
    Value::from(out)
}

fn render_var(v: Value) -> Value {
    let init = match v.get("init").and_then(|i| i.get("value")) {
        Some(value) => format!(" = {}", value.flatten_text()),
        None => String::new(),
    };
    Value::from(format!(
        "{} {}{};",
        normalize_space(&text(&v, "kind")),
        text(&v, "name"),
        init
    ))
}

/// Non-empty statement texts of a `body` list.
fn statement_lines(v: &Value) -> Vec<String> {
    v.get("body")
        .and_then(Value::as_list)
        .unwrap_or_default()
        .iter()
        .map(Value::flatten_text)
        .filter(|s| !s.is_empty())
        .collect()
}

fn render_block(v: Value) -> Value {
    let lines = statement_lines(&v);
    if lines.is_empty() {
        return Value::from("{}");
    }
    let body: Vec<String> = lines.iter().map(|line| indent(line)).collect();
    Value::from(format!("{{\n{}\n}}", body.join("\n")))
}

fn render_program(v: Value) -> Value {
    let lines = statement_lines(&v);
    if lines.is_empty() {
        return Value::from("");
    }
    Value::from(format!("{}\n", lines.join("\n")))
}

/// Indents every line by two spaces, leaving lines that continue a template
/// literal untouched.
fn indent(code: &str) -> String {
    let mut out = String::with_capacity(code.len() + 8);
    out.push_str("  ");
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in code.chars() {
        out.push(c);
        if escaped {
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', Some(_)) => escaped = true,
            ('"' | '\'' | '`', None) => quote = Some(c),
            (c, Some(q)) if c == q => quote = None,
            ('\n', Some('`')) => {}
            ('\n', _) => {
                quote = None;
                out.push_str("  ");
            }
            _ => {}
        }
    }
    out
}
