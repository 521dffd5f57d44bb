//! Decoder for the Token-Oriented Object Notation subset models emit.
//!
//! Supported: `key: value` lines, indentation-nested objects, inline
//! primitive arrays (`tags[2]: a,b`), dash lists (`tags[2]:` then `- a`) and
//! tabular arrays (`words[2]{raw,x}:` followed by one row per item). Array
//! lengths are checked against their headers.

use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ToonError {
    pub line: usize,
    pub message: String,
}

impl ToonError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    content: &'a str,
}

#[derive(Debug)]
struct ArrayHeader {
    len: usize,
    delimiter: char,
    fields: Option<Vec<String>>,
}

#[derive(Debug)]
struct Entry<'a> {
    key: String,
    header: Option<ArrayHeader>,
    rest: &'a str,
}

pub fn decode(input: &str) -> Result<Value, ToonError> {
    let lines = split_lines(strip_fences(input))?;
    let Some(first) = lines.first().copied() else {
        return Ok(Value::Object(Map::new()));
    };

    let mut parser = Parser { lines, pos: 0 };

    let value = if first.content.starts_with('[') {
        let entry = split_entry(first.content, first.number)?;
        let header = entry
            .header
            .ok_or_else(|| ToonError::new(first.number, "expected an array header"))?;
        parser.pos = 1;
        parser.array(header, entry.rest, first.indent, first.number)?
    } else if parser.lines.len() == 1 && find_unquoted(first.content, ':').is_none() {
        parser.pos = 1;
        parse_primitive(first.content, first.number)?
    } else {
        Value::Object(parser.object(first.indent)?)
    };

    if let Some(extra) = parser.lines.get(parser.pos) {
        return Err(ToonError::new(extra.number, "unexpected content"));
    }

    Ok(value)
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn object(&mut self, indent: usize) -> Result<Map<String, Value>, ToonError> {
        let mut map = Map::new();

        while let Some(line) = self.peek() {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(ToonError::new(line.number, "unexpected indentation"));
            }

            let entry = split_entry(line.content, line.number)?;
            self.pos += 1;

            let value = match entry.header {
                Some(header) => self.array(header, entry.rest, indent, line.number)?,
                None if entry.rest.is_empty() => Value::Object(self.nested_object(indent)?),
                None => parse_primitive(entry.rest, line.number)?,
            };
            map.insert(entry.key, value);
        }

        Ok(map)
    }

    fn nested_object(&mut self, indent: usize) -> Result<Map<String, Value>, ToonError> {
        match self.peek() {
            Some(child) if child.indent > indent => self.object(child.indent),
            _ => Ok(Map::new()),
        }
    }

    /// Lines indented deeper than `indent`, which must share one depth
    fn children(&mut self, indent: usize) -> Result<Vec<Line<'a>>, ToonError> {
        let mut children = Vec::new();
        let mut depth = None;

        while let Some(line) = self.peek() {
            if line.indent <= indent {
                break;
            }
            match depth {
                None => depth = Some(line.indent),
                Some(d) if d != line.indent => {
                    return Err(ToonError::new(line.number, "inconsistent indentation"));
                }
                Some(_) => {}
            }
            children.push(line);
            self.pos += 1;
        }

        Ok(children)
    }

    fn array(
        &mut self,
        header: ArrayHeader,
        rest: &str,
        indent: usize,
        line: usize,
    ) -> Result<Value, ToonError> {
        let items: Vec<Value> = match &header.fields {
            Some(fields) => {
                if !rest.is_empty() {
                    return Err(ToonError::new(line, "tabular header must end the line"));
                }
                self.children(indent)?
                    .into_iter()
                    .map(|row| {
                        let cells = split_values(row.content, header.delimiter, row.number)?;
                        if cells.len() != fields.len() {
                            return Err(ToonError::new(
                                row.number,
                                format!("expected {} values, found {}", fields.len(), cells.len()),
                            ));
                        }
                        let mut object = Map::new();
                        for (field, cell) in fields.iter().zip(cells) {
                            object.insert(field.clone(), parse_primitive(cell, row.number)?);
                        }
                        Ok(Value::Object(object))
                    })
                    .collect::<Result<_, _>>()?
            }
            None if !rest.is_empty() => split_values(rest, header.delimiter, line)?
                .into_iter()
                .map(|cell| parse_primitive(cell, line))
                .collect::<Result<_, _>>()?,
            None => self
                .children(indent)?
                .into_iter()
                .map(|item| {
                    let value = item
                        .content
                        .strip_prefix('-')
                        .ok_or_else(|| ToonError::new(item.number, "expected a `- ` list item"))?;
                    parse_primitive(value, item.number)
                })
                .collect::<Result<_, _>>()?,
        };

        if items.len() != header.len {
            return Err(ToonError::new(
                line,
                format!("declared {} items, found {}", header.len, items.len()),
            ));
        }

        Ok(Value::Array(items))
    }
}

fn strip_fences(input: &str) -> &str {
    let trimmed = input.trim();
    let Some(fenced) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string line, e.g. "```toon"
    let body = fenced.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body)
}

fn split_lines(body: &str) -> Result<Vec<Line<'_>>, ToonError> {
    let mut lines = Vec::new();

    for (index, raw) in body.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let content = raw.trim_start_matches(' ');
        if content.starts_with('\t') {
            return Err(ToonError::new(index + 1, "tabs are not valid indentation"));
        }
        lines.push(Line {
            number: index + 1,
            indent: raw.len() - content.len(),
            content: content.trim_end(),
        });
    }

    Ok(lines)
}

fn split_entry(content: &str, line: usize) -> Result<Entry<'_>, ToonError> {
    let (key, after_key) = if content.starts_with('"') {
        let (key, end) = parse_quoted(content, line)?;
        (key, &content[end..])
    } else {
        let end = content
            .find(['[', ':'])
            .ok_or_else(|| ToonError::new(line, "expected `key: value`"))?;
        (content[..end].trim().to_string(), &content[end..])
    };

    let (header, after_header) = match after_key.strip_prefix('[') {
        Some(bracketed) => {
            let (header, rest) = parse_header(bracketed, line)?;
            (Some(header), rest)
        }
        None => (None, after_key),
    };

    let rest = after_header
        .strip_prefix(':')
        .ok_or_else(|| ToonError::new(line, "expected `:` after key"))?;

    Ok(Entry {
        key,
        header,
        rest: rest.trim(),
    })
}

/// Parse `N<delim?>]{fields}` following the opening bracket
fn parse_header(input: &str, line: usize) -> Result<(ArrayHeader, &str), ToonError> {
    let close = input
        .find(']')
        .ok_or_else(|| ToonError::new(line, "unterminated array length"))?;
    let inside = &input[..close];

    let (digits, delimiter) = match inside.chars().last() {
        Some('|') => (&inside[..inside.len() - 1], '|'),
        Some('\t') => (&inside[..inside.len() - 1], '\t'),
        _ => (inside, ','),
    };
    let len = digits
        .trim()
        .parse::<usize>()
        .map_err(|_| ToonError::new(line, format!("invalid array length `{digits}`")))?;

    let mut rest = &input[close + 1..];
    let fields = match rest.strip_prefix('{') {
        Some(braced) => {
            let end = braced
                .find('}')
                .ok_or_else(|| ToonError::new(line, "unterminated field list"))?;
            let fields = split_values(&braced[..end], delimiter, line)?
                .into_iter()
                .map(|field| match parse_primitive(field, line)? {
                    Value::String(name) => Ok(name),
                    other => Ok(other.to_string()),
                })
                .collect::<Result<Vec<_>, ToonError>>()?;
            rest = &braced[end + 1..];
            Some(fields)
        }
        None => None,
    };

    Ok((
        ArrayHeader {
            len,
            delimiter,
            fields,
        },
        rest,
    ))
}

/// Split on `delimiter` outside of quotes
fn split_values(input: &str, delimiter: char, line: usize) -> Result<Vec<&str>, ToonError> {
    let mut values = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (index, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                values.push(input[start..index].trim());
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }

    if in_quotes {
        return Err(ToonError::new(line, "unterminated string"));
    }
    values.push(input[start..].trim());

    Ok(values)
}

fn find_unquoted(input: &str, needle: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (index, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == needle && !in_quotes => return Some(index),
            _ => {}
        }
    }
    None
}

/// Parse a quoted string at the start of `input`; returns it and the byte
/// offset just past the closing quote
fn parse_quoted(input: &str, line: usize) -> Result<(String, usize), ToonError> {
    let mut out = String::new();
    let mut chars = input.char_indices().skip(1);

    while let Some((index, c)) = chars.next() {
        match c {
            '"' => return Ok((out, index + 1)),
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| ToonError::new(line, "dangling escape"))?;
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '"' => '"',
                    '\\' => '\\',
                    other => {
                        return Err(ToonError::new(line, format!("invalid escape `\\{other}`")));
                    }
                });
            }
            c => out.push(c),
        }
    }

    Err(ToonError::new(line, "unterminated string"))
}

fn parse_primitive(token: &str, line: usize) -> Result<Value, ToonError> {
    let token = token.trim();

    if token.starts_with('"') {
        let (text, end) = parse_quoted(token, line)?;
        if end != token.len() {
            return Err(ToonError::new(line, "unexpected text after string"));
        }
        return Ok(Value::String(text));
    }

    match token {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" => return Ok(Value::Null),
        _ => {}
    }

    if looks_numeric(token) {
        if let Ok(integer) = token.parse::<i64>() {
            return Ok(Value::Number(integer.into()));
        }
        if let Some(number) = token.parse::<f64>().ok().and_then(Number::from_f64) {
            return Ok(Value::Number(number));
        }
    }

    Ok(Value::String(token.to_string()))
}

/// Decimal literal without leading zeros; "007" stays a string
fn looks_numeric(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    let mut chars = digits.chars();
    match (chars.next(), chars.next()) {
        (Some('0'), Some(c)) if c.is_ascii_digit() => false,
        (Some(c), _) => c.is_ascii_digit(),
        (None, _) => false,
    }
}
