//! The reader: a lexer and recursive-descent parser from source text to
//! heap values.
//!
//! Tokens are `(`, `)`, `'`, `` ` ``, `,`, `,@`, and atoms, where an
//! atom is the maximal run of characters outside `(`, `)`, and
//! whitespace. A `;`
//! starts a comment that runs to the end of the line. Atom names are
//! uppercased before interning, so the surface syntax is
//! case-insensitive; an atom that parses entirely as a base-10 integer
//! (sign included, making `-12` one token) is an Integer, and the atom
//! `NIL` denotes the Nil value itself.

use crate::error::{LispError, LispResult};
use crate::heap::Heap;
use crate::symbol::{sym, SymbolTable};
use crate::value::{PairId, SymbolId, Value};

pub struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
    heap: &'a mut Heap,
    symbols: &'a mut SymbolTable,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str, heap: &'a mut Heap, symbols: &'a mut SymbolTable) -> Self {
        Reader {
            input: input.as_bytes(),
            pos: 0,
            heap,
            symbols,
        }
    }

    /// Read one expression. Returns None when only whitespace and
    /// comments remain.
    pub fn read(&mut self) -> LispResult<Option<Value>> {
        self.skip_whitespace_and_comments();
        if self.pos >= self.input.len() {
            return Ok(None);
        }
        let val = self.read_expr()?;
        Ok(Some(val))
    }

    /// Read all expressions from the input.
    pub fn read_all(&mut self) -> LispResult<Vec<Value>> {
        let mut results = Vec::new();
        while let Some(val) = self.read()? {
            results.push(val);
        }
        Ok(results)
    }

    /// Current byte position in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        if self.pos < self.input.len() {
            Some(self.input[self.pos])
        } else {
            None
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while let Some(ch) = self.peek() {
                if is_whitespace(ch) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            if self.peek() == Some(b';') {
                while self.pos < self.input.len() && self.input[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Scan the next token. Returns None at end of input. The token
    /// borrows the source text, not the reader, so the caller can keep
    /// it across further reads.
    fn lex(&mut self) -> LispResult<Option<&'a str>> {
        let input = self.input;
        self.skip_whitespace_and_comments();
        if self.pos >= input.len() {
            return Ok(None);
        }

        let start = self.pos;
        match input[self.pos] {
            b'(' | b')' | b'\'' | b'`' => self.pos += 1,
            b',' => {
                self.pos += 1;
                if self.peek() == Some(b'@') {
                    self.pos += 1;
                }
            }
            _ => {
                while self.pos < input.len() && !is_delimiter(input[self.pos]) {
                    self.pos += 1;
                }
            }
        }

        let token = std::str::from_utf8(&input[start..self.pos])
            .map_err(|_| LispError::Syntax("invalid UTF-8 in input".into()))?;
        Ok(Some(token))
    }

    fn read_expr(&mut self) -> LispResult<Value> {
        let token = self
            .lex()?
            .ok_or_else(|| LispError::Syntax("unexpected end of input".into()))?;
        self.parse_from_token(token)
    }

    fn parse_from_token(&mut self, token: &str) -> LispResult<Value> {
        match token {
            "(" => self.read_list(),
            ")" => Err(LispError::Syntax("unexpected ')'".into())),
            "'" => self.read_prefixed(sym::QUOTE),
            "`" => self.read_prefixed(sym::QUASIQUOTE),
            "," => self.read_prefixed(sym::UNQUOTE),
            ",@" => self.read_prefixed(sym::UNQUOTE_SPLICING),
            _ => self.parse_atom(token),
        }
    }

    /// Read a list: (a b c), (a . b), or (a b . c). Items are appended
    /// through a moving tail cursor, so the list is built left-to-right
    /// with no final reversal.
    fn read_list(&mut self) -> LispResult<Value> {
        let mut head = Value::Nil;
        let mut tail: Option<PairId> = None;

        loop {
            let token = self
                .lex()?
                .ok_or_else(|| LispError::Syntax("unterminated list".into()))?;

            if token == ")" {
                return Ok(head);
            }

            if token == "." {
                let Some(last) = tail else {
                    return Err(LispError::Syntax("'.' before any list item".into()));
                };
                let item = self.read_expr()?;
                self.heap.set_cdr(last, item);
                return match self.lex()? {
                    Some(")") => Ok(head),
                    _ => Err(LispError::Syntax("expected ')' after dotted tail".into())),
                };
            }

            let item = self.parse_from_token(token)?;
            let cell = self.heap.alloc(item, Value::Nil)?;
            match tail {
                None => head = Value::Pair(cell),
                Some(prev) => self.heap.set_cdr(prev, Value::Pair(cell)),
            }
            tail = Some(cell);
        }
    }

    /// Read `'x`, `` `x ``, `,x`, or `,@x` as `(tag x)`.
    fn read_prefixed(&mut self, tag: SymbolId) -> LispResult<Value> {
        let expr = self.read_expr()?;
        let inner = self.heap.alloc(expr, Value::Nil)?;
        let outer = self.heap.alloc(Value::Symbol(tag), Value::Pair(inner))?;
        Ok(Value::Pair(outer))
    }

    fn parse_atom(&mut self, token: &str) -> LispResult<Value> {
        if let Ok(n) = token.parse::<i64>() {
            return Ok(Value::Integer(n));
        }
        let name = token.to_ascii_uppercase();
        if name == "NIL" {
            return Ok(Value::Nil);
        }
        Ok(Value::Symbol(self.symbols.intern(&name)))
    }
}

fn is_whitespace(ch: u8) -> bool {
    ch == b' ' || ch == b'\t' || ch == b'\n' || ch == b'\r'
}

fn is_delimiter(ch: u8) -> bool {
    ch == b'(' || ch == b')' || is_whitespace(ch)
}

/// Read a single expression from a string.
pub fn read_str(input: &str, heap: &mut Heap, symbols: &mut SymbolTable) -> LispResult<Value> {
    let mut reader = Reader::new(input, heap, symbols);
    reader
        .read()?
        .ok_or_else(|| LispError::Syntax("empty input".into()))
}

/// Read all expressions from a string.
pub fn read_all(input: &str, heap: &mut Heap, symbols: &mut SymbolTable) -> LispResult<Vec<Value>> {
    let mut reader = Reader::new(input, heap, symbols);
    reader.read_all()
}

/// Read one expression starting at byte offset `pos`.
/// Returns `Ok(Some((value, new_pos)))`, or `Ok(None)` if only
/// whitespace and comments remain. Evaluating one expression at a time
/// keeps unconsumed text from pinning hidden heap references.
pub fn read_one_at(
    input: &str,
    pos: usize,
    heap: &mut Heap,
    symbols: &mut SymbolTable,
) -> LispResult<Option<(Value, usize)>> {
    let mut reader = Reader::new(&input[pos..], heap, symbols);
    match reader.read()? {
        Some(val) => Ok(Some((val, pos + reader.position()))),
        None => Ok(None),
    }
}
