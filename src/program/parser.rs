use super::ast::{
    Assign, AssignValue, CallArg, ClassDef, ClassStmt, Decorator, DottedName, MethodDef, Module,
    TopLevel,
};
use super::{CLASS_BODY_INDENT, METHOD_BODY_INDENT};
use crate::error::{Result, StructureError, TutorialError};

/// Parse one snapshot's source text into a dialect [`Module`].
pub fn parse_module(source: &str) -> Result<Module> {
    Parser::new(source).parse_module()
}

fn syntax(line: usize, detail: impl Into<String>) -> TutorialError {
    StructureError::Syntax {
        line,
        detail: detail.into(),
    }
    .into()
}

/// Line-oriented parser for the dialect. Logical lines may span physical
/// lines while brackets are open (multi-line `def` headers, list literals,
/// call-form decorators); strings never span lines and there are no
/// triple-quoted strings in the dialect.
struct Parser<'a> {
    lines: Vec<&'a str>,
    index: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            index: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.index).copied()
    }

    fn line_no(&self) -> usize {
        self.index + 1
    }

    fn advance(&mut self) {
        if self.index < self.lines.len() {
            self.index += 1;
        }
    }

    fn parse_module(&mut self) -> Result<Module> {
        let mut body = Vec::new();
        while let Some(raw) = self.peek() {
            if is_blank_or_comment(raw) {
                self.advance();
                continue;
            }
            if indent_width(raw, self.line_no())? != 0 {
                return Err(syntax(self.line_no(), "unexpected indentation at top level"));
            }
            if starts_with_keyword(raw, "class") {
                body.push(TopLevel::Class(self.parse_class()?));
            } else {
                let line = self.line_no();
                self.skip_statement(0)?;
                body.push(TopLevel::Other { line });
            }
        }
        Ok(Module { body })
    }

    /// Consume one logical line plus any more-deeply indented block under
    /// it. Used for top-level statements the extractor ignores and for
    /// class-body statements it rejects later.
    fn skip_statement(&mut self, indent: usize) -> Result<()> {
        self.logical_line()?;
        loop {
            let Some(raw) = self.peek() else { break };
            if is_blank_or_comment(raw) {
                self.advance();
                continue;
            }
            if indent_width(raw, self.line_no())? > indent {
                self.logical_line()?;
                continue;
            }
            break;
        }
        Ok(())
    }

    /// Join physical lines into one logical line: comments stripped,
    /// continuation lines absorbed while brackets are open. Returns the
    /// joined text and its starting line number.
    fn logical_line(&mut self) -> Result<(String, usize)> {
        let start_line = self.line_no();
        let raw = self
            .peek()
            .ok_or_else(|| syntax(start_line, "unexpected end of input"))?;
        let (code, mut depth) = scan_code_part(raw, self.line_no())?;
        self.advance();
        let mut text = code.trim_end().to_string();
        while depth > 0 {
            let raw = self
                .peek()
                .ok_or_else(|| syntax(start_line, "unterminated bracket"))?;
            let (code, delta) = scan_code_part(raw, self.line_no())?;
            self.advance();
            depth += delta;
            text.push(' ');
            text.push_str(code.trim());
        }
        if depth < 0 {
            return Err(syntax(start_line, "unbalanced closing bracket"));
        }
        Ok((text, start_line))
    }

    fn parse_class(&mut self) -> Result<ClassDef> {
        let (header, line) = self.logical_line()?;
        let mut cursor = Cursor::new(&header);
        if !cursor.eat_keyword("class") {
            return Err(syntax(line, "malformed class header"));
        }
        cursor.skip_ws();
        let name = cursor
            .identifier()
            .ok_or_else(|| syntax(line, "expected a class name"))?;
        let mut bases = Vec::new();
        cursor.skip_ws();
        if cursor.eat('(') {
            loop {
                cursor.skip_ws();
                if cursor.eat(')') {
                    break;
                }
                let base = cursor
                    .dotted_name()
                    .ok_or_else(|| syntax(line, "expected a base-class reference"))?;
                bases.push(base);
                cursor.skip_ws();
                if cursor.eat(',') {
                    continue;
                }
                if cursor.eat(')') {
                    break;
                }
                return Err(syntax(line, "expected ',' or ')' in class bases"));
            }
        }
        cursor.skip_ws();
        if !cursor.eat(':') || !cursor.rest().is_empty() {
            return Err(syntax(line, "malformed class header"));
        }
        let body = self.parse_class_body()?;
        Ok(ClassDef {
            name,
            bases,
            body,
            line,
        })
    }

    fn parse_class_body(&mut self) -> Result<Vec<ClassStmt>> {
        let mut body = Vec::new();
        loop {
            let Some(raw) = self.peek() else { break };
            if is_blank_or_comment(raw) {
                self.advance();
                continue;
            }
            let indent = indent_width(raw, self.line_no())?;
            if indent == 0 {
                break;
            }
            if indent != CLASS_BODY_INDENT {
                return Err(syntax(
                    self.line_no(),
                    format!(
                        "expected a class-body statement indented by {} spaces",
                        CLASS_BODY_INDENT
                    ),
                ));
            }
            let trimmed = raw.trim_start();
            if trimmed.starts_with('@') || starts_with_keyword(trimmed, "def") {
                body.push(ClassStmt::Method(self.parse_method()?));
            } else if looks_like_assignment(trimmed) {
                body.push(ClassStmt::Assign(self.parse_assign()?));
            } else {
                let line = self.line_no();
                self.skip_statement(CLASS_BODY_INDENT)?;
                body.push(ClassStmt::Other { line });
            }
        }
        Ok(body)
    }

    fn parse_method(&mut self) -> Result<MethodDef> {
        let mut decorators = Vec::new();
        loop {
            let Some(raw) = self.peek() else {
                return Err(syntax(
                    self.line_no(),
                    "decorator is not followed by a method definition",
                ));
            };
            if is_blank_or_comment(raw) {
                self.advance();
                continue;
            }
            let trimmed = raw.trim_start();
            if trimmed.starts_with('@') {
                if indent_width(raw, self.line_no())? != CLASS_BODY_INDENT {
                    return Err(syntax(self.line_no(), "misindented decorator"));
                }
                decorators.push(self.parse_decorator()?);
                continue;
            }
            if starts_with_keyword(trimmed, "def")
                && indent_width(raw, self.line_no())? == CLASS_BODY_INDENT
            {
                break;
            }
            return Err(syntax(
                self.line_no(),
                "decorator is not followed by a method definition",
            ));
        }

        let (header, line) = self.logical_line()?;
        let mut cursor = Cursor::new(header.trim());
        if !cursor.eat_keyword("def") {
            return Err(syntax(line, "malformed method definition"));
        }
        cursor.skip_ws();
        let name = cursor
            .identifier()
            .ok_or_else(|| syntax(line, "expected a method name"))?;
        if !header.trim_end().ends_with(':') {
            return Err(syntax(line, "malformed method definition"));
        }
        let body_lines = self.collect_method_body(&name, line)?;
        Ok(MethodDef {
            name,
            decorators,
            body_lines,
            line,
        })
    }

    /// Capture the raw lines of a method body: every following line that is
    /// blank or indented at least to the method-body depth, with trailing
    /// blank lines trimmed off.
    fn collect_method_body(&mut self, name: &str, header_line: usize) -> Result<Vec<String>> {
        let mut lines: Vec<String> = Vec::new();
        loop {
            let Some(raw) = self.peek() else { break };
            if raw.trim().is_empty() {
                lines.push(raw.to_string());
                self.advance();
                continue;
            }
            if indent_width(raw, self.line_no())? < METHOD_BODY_INDENT {
                break;
            }
            lines.push(raw.to_string());
            self.advance();
        }
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(syntax(
                header_line,
                format!("method \"{}\" has no indented body", name),
            ));
        }
        Ok(lines)
    }

    fn parse_decorator(&mut self) -> Result<Decorator> {
        let (text, line) = self.logical_line()?;
        let mut cursor = Cursor::new(text.trim());
        if !cursor.eat('@') {
            return Err(syntax(line, "malformed decorator"));
        }
        let name = cursor
            .dotted_name()
            .ok_or_else(|| syntax(line, "expected a decorator name"))?;
        cursor.skip_ws();
        if cursor.rest().is_empty() {
            return Ok(Decorator::Bare(name));
        }
        if !cursor.eat('(') {
            return Err(syntax(line, "malformed decorator"));
        }
        let mut args = Vec::new();
        loop {
            cursor.skip_ws();
            if cursor.eat(')') {
                break;
            }
            match cursor.peek() {
                Some('"') | Some('\'') => {
                    let value = cursor
                        .string_literal()
                        .map_err(|detail| syntax(line, detail))?;
                    args.push(CallArg::Str(value));
                }
                Some(_) => {
                    let raw = cursor.raw_argument();
                    if raw.is_empty() {
                        return Err(syntax(line, "malformed decorator argument"));
                    }
                    args.push(CallArg::Other(raw));
                }
                None => return Err(syntax(line, "unterminated decorator arguments")),
            }
            cursor.skip_ws();
            if cursor.eat(',') {
                continue;
            }
            if cursor.eat(')') {
                break;
            }
            return Err(syntax(line, "expected ',' or ')' in decorator arguments"));
        }
        cursor.skip_ws();
        if !cursor.rest().is_empty() {
            return Err(syntax(line, "unexpected text after decorator"));
        }
        Ok(Decorator::Call { callee: name, args })
    }

    fn parse_assign(&mut self) -> Result<Assign> {
        let (text, line) = self.logical_line()?;
        let mut cursor = Cursor::new(text.trim());
        let target = cursor
            .identifier()
            .ok_or_else(|| syntax(line, "malformed assignment"))?;
        cursor.skip_ws();
        if !cursor.eat('=') {
            return Err(syntax(line, "malformed assignment"));
        }
        cursor.skip_ws();
        let value = parse_assign_value(&mut cursor);
        Ok(Assign {
            target,
            value,
            line,
        })
    }
}

/// Classify an assignment right-hand side. Only a clean list literal of
/// string literals becomes [`AssignValue::StringList`]; everything else is
/// [`AssignValue::Other`], to be judged by the extractor against the target
/// name.
fn parse_assign_value(cursor: &mut Cursor) -> AssignValue {
    if !cursor.eat('[') {
        return AssignValue::Other;
    }
    let mut items = Vec::new();
    loop {
        cursor.skip_ws();
        if cursor.eat(']') {
            break;
        }
        match cursor.peek() {
            Some('"') | Some('\'') => match cursor.string_literal() {
                Ok(value) => items.push(value),
                Err(_) => return AssignValue::Other,
            },
            _ => return AssignValue::Other,
        }
        cursor.skip_ws();
        if cursor.eat(',') {
            continue;
        }
        if cursor.eat(']') {
            break;
        }
        return AssignValue::Other;
    }
    cursor.skip_ws();
    if !cursor.rest().is_empty() {
        return AssignValue::Other;
    }
    AssignValue::StringList(items)
}

/// Strip the comment from one physical line (string-aware) and report the
/// bracket-depth delta it contributes. Errors if the line ends inside a
/// string literal.
fn scan_code_part(line: &str, line_no: usize) -> Result<(String, i32)> {
    let mut code = String::new();
    let mut depth = 0i32;
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '#' => break,
            '\'' | '"' => {
                code.push(ch);
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    code.push(inner);
                    if inner == '\\' {
                        if let Some(escaped) = chars.next() {
                            code.push(escaped);
                        }
                        continue;
                    }
                    if inner == ch {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(syntax(line_no, "unterminated string literal"));
                }
            }
            '(' | '[' | '{' => {
                depth += 1;
                code.push(ch);
            }
            ')' | ']' | '}' => {
                depth -= 1;
                code.push(ch);
            }
            _ => code.push(ch),
        }
    }
    Ok((code, depth))
}

fn indent_width(line: &str, line_no: usize) -> Result<usize> {
    let mut width = 0;
    for ch in line.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => return Err(syntax(line_no, "tab character in indentation")),
            _ => break,
        }
    }
    Ok(width)
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    match text.strip_prefix(keyword) {
        Some(rest) => !rest.chars().next().is_some_and(is_identifier_char),
        None => false,
    }
}

fn looks_like_assignment(text: &str) -> bool {
    let mut cursor = Cursor::new(text);
    if cursor.identifier().is_none() {
        return false;
    }
    cursor.skip_ws();
    cursor.eat('=') && cursor.peek() != Some('=')
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Character cursor over one logical line.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|ch| ch.is_whitespace()) {
            self.advance();
        }
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest: String = self.chars[self.pos..].iter().collect();
        if starts_with_keyword(&rest, keyword) {
            self.pos += keyword.chars().count();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> Option<String> {
        if !self.peek().is_some_and(is_identifier_start) {
            return None;
        }
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if is_identifier_char(ch) {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Some(name)
    }

    fn dotted_name(&mut self) -> Option<DottedName> {
        let mut parts = vec![self.identifier()?];
        while self.peek() == Some('.') {
            self.advance();
            parts.push(self.identifier()?);
        }
        Some(DottedName { parts })
    }

    /// Parse a string literal starting at the current position. The caller
    /// has already checked that the next character is a quote.
    fn string_literal(&mut self) -> std::result::Result<String, String> {
        let quote = self.peek().ok_or_else(|| "expected a string".to_string())?;
        self.advance();
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == quote {
                return Ok(value);
            }
            if ch == '\\' {
                let escaped = self
                    .peek()
                    .ok_or_else(|| "incomplete escape in string literal".to_string())?;
                self.advance();
                let resolved = match escaped {
                    '"' => '"',
                    '\'' => '\'',
                    '\\' => '\\',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => return Err(format!("unknown escape: \\{}", other)),
                };
                value.push(resolved);
                continue;
            }
            value.push(ch);
        }
        Err("unterminated string literal".to_string())
    }

    /// Capture a non-string decorator argument as raw text, up to the next
    /// comma or closing parenthesis at the current nesting depth.
    fn raw_argument(&mut self) -> String {
        let mut depth = 0i32;
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            match ch {
                ',' | ')' if depth == 0 => break,
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                _ => {}
            }
            text.push(ch);
            self.advance();
        }
        text.trim().to_string()
    }

    fn rest(&self) -> String {
        self.chars[self.pos..].iter().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sole_class(source: &str) -> ClassDef {
        let module = parse_module(source).expect("parse");
        let classes: Vec<_> = module
            .body
            .into_iter()
            .filter_map(|top| match top {
                TopLevel::Class(class) => Some(class),
                TopLevel::Other { .. } => None,
            })
            .collect();
        assert_eq!(classes.len(), 1);
        classes.into_iter().next().unwrap()
    }

    #[test]
    fn parses_class_with_base_and_costumes() {
        let class = sole_class(concat!(
            "import pytch\n",
            "\n",
            "class Bowl(pytch.Sprite):\n",
            "    Costumes = [\"bowl.png\", 'basket.png']\n",
        ));
        assert_eq!(class.name, "Bowl");
        assert_eq!(class.bases.len(), 1);
        assert_eq!(class.bases[0].to_string(), "pytch.Sprite");
        match &class.body[0] {
            ClassStmt::Assign(assign) => {
                assert_eq!(assign.target, "Costumes");
                assert_eq!(
                    assign.value,
                    AssignValue::StringList(vec!["bowl.png".into(), "basket.png".into()])
                );
            }
            other => panic!("expected assignment, found {:?}", other),
        }
    }

    #[test]
    fn parses_method_with_multi_line_header() {
        let class = sole_class(concat!(
            "class Bowl(pytch.Sprite):\n",
            "    @pytch.when_green_flag_clicked\n",
            "    def move_with_keys(\n",
            "        self\n",
            "    ):\n",
            "        pass\n",
        ));
        match &class.body[0] {
            ClassStmt::Method(method) => {
                assert_eq!(method.name, "move_with_keys");
                assert_eq!(method.decorators.len(), 1);
                assert_eq!(method.body_lines, vec!["        pass".to_string()]);
            }
            other => panic!("expected method, found {:?}", other),
        }
    }

    #[test]
    fn captures_nested_body_lines_raw() {
        let module = parse_module(concat!(
            "class Bowl(pytch.Sprite):\n",
            "    @pytch.when_green_flag_clicked\n",
            "    def run(self):\n",
            "        while True:\n",
            "            self.change_x(2)\n",
            "\n",
            "class Marker(pytch.Sprite):\n",
            "    pass_marker = 1\n",
        ))
        .expect("parse");
        let TopLevel::Class(class) = &module.body[0] else {
            panic!("expected a class");
        };
        match &class.body[0] {
            ClassStmt::Method(method) => {
                assert_eq!(
                    method.body_lines,
                    vec![
                        "        while True:".to_string(),
                        "            self.change_x(2)".to_string(),
                    ]
                );
            }
            other => panic!("expected method, found {:?}", other),
        }
    }

    #[test]
    fn parses_call_form_decorator() {
        let class = sole_class(concat!(
            "class Apple(pytch.Sprite):\n",
            "    @pytch.when_I_receive(\"drop-apple\")\n",
            "    def move_down_stage(self):\n",
            "        pass\n",
        ));
        match &class.body[0] {
            ClassStmt::Method(method) => match &method.decorators[0] {
                Decorator::Call { callee, args } => {
                    assert_eq!(callee.last(), "when_I_receive");
                    assert_eq!(args, &vec![CallArg::Str("drop-apple".into())]);
                }
                other => panic!("expected call decorator, found {:?}", other),
            },
            other => panic!("expected method, found {:?}", other),
        }
    }

    #[test]
    fn captures_non_string_decorator_argument() {
        let class = sole_class(concat!(
            "class Apple(pytch.Sprite):\n",
            "    @pytch.when_I_receive(some_name)\n",
            "    def go(self):\n",
            "        pass\n",
        ));
        match &class.body[0] {
            ClassStmt::Method(method) => match &method.decorators[0] {
                Decorator::Call { args, .. } => {
                    assert_eq!(args, &vec![CallArg::Other("some_name".into())]);
                }
                other => panic!("expected call decorator, found {:?}", other),
            },
            other => panic!("expected method, found {:?}", other),
        }
    }

    #[test]
    fn ignores_non_class_top_level_statements() {
        let module = parse_module(concat!(
            "import pytch\n",
            "\n",
            "def helper():\n",
            "    return 1\n",
            "\n",
            "class Apple(pytch.Sprite):\n",
            "    Costumes = []\n",
        ))
        .expect("parse");
        let kinds: Vec<bool> = module
            .body
            .iter()
            .map(|top| matches!(top, TopLevel::Class(_)))
            .collect();
        assert_eq!(kinds, vec![false, false, true]);
    }

    #[test]
    fn rejects_tab_indentation() {
        let err = parse_module("class A(pytch.Sprite):\n\tCostumes = []\n").unwrap_err();
        assert!(err.to_string().contains("tab character"));
    }

    #[test]
    fn rejects_decorator_without_method() {
        let err = parse_module(concat!(
            "class A(pytch.Sprite):\n",
            "    @pytch.when_green_flag_clicked\n",
            "    Costumes = []\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("not followed by a method"));
    }

    #[test]
    fn rejects_method_with_no_body() {
        let err = parse_module(concat!(
            "class A(pytch.Sprite):\n",
            "    @pytch.when_green_flag_clicked\n",
            "    def go(self):\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("no indented body"));
    }

    #[test]
    fn rejects_unterminated_bracket() {
        let err = parse_module("class A(pytch.Sprite:\n").unwrap_err();
        assert!(err.to_string().contains("unterminated bracket"));
    }

    #[test]
    fn classifies_non_list_assignment_as_other_value() {
        let class = sole_class(concat!(
            "class A(pytch.Sprite):\n",
            "    speed = 3\n",
        ));
        match &class.body[0] {
            ClassStmt::Assign(assign) => assert_eq!(assign.value, AssignValue::Other),
            other => panic!("expected assignment, found {:?}", other),
        }
    }
}
