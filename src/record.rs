//! Classification records: the line-oriented text format, its JSON
//! equivalent, and the one-line label output.
//!
//! Text layout, whitespace free between tokens:
//!
//! ```text
//! n_groups=2
//! label=A length=2 (0,0) (1,0)
//! label=B length=2 (5,5) (6,6)
//! k=3
//! (0.1,0)
//! ```

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::{Group, Point};

/// Everything one classification needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub groups: Vec<Group<char>>,
    pub k: usize,
    pub query: Point,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Text,
    Json,
}

pub fn read_problem<R: Read>(mut r: R, format: InputFormat) -> Result<Problem, ParseError> {
    let mut src = String::new();
    r.read_to_string(&mut src)?;
    match format {
        InputFormat::Text => parse_text(&src),
        InputFormat::Json => parse_json(&src),
    }
}

pub fn parse_json(src: &str) -> Result<Problem, ParseError> {
    Ok(serde_json::from_str(src)?)
}

pub fn parse_text(src: &str) -> Result<Problem, ParseError> {
    let mut s = Scanner { src, pos: 0 };

    s.expect("n_groups=")?;
    let n_groups = s.read_count("n_groups")?;
    // counts come from untrusted input; let the Vec grow past this
    let mut groups = Vec::with_capacity(n_groups.min(1 << 16));
    for _ in 0..n_groups {
        s.expect("label=")?;
        let label = s.read_label()?;
        s.expect("length=")?;
        let len = s.read_count("length")?;
        let mut points = Vec::with_capacity(len.min(1 << 16));
        for _ in 0..len { points.push(s.read_point()?); }
        groups.push(Group { label, points });
    }

    s.expect("k=")?;
    let k = s.read_count("k")?;
    let query = s.read_point()?;
    s.finish()?;
    Ok(Problem { groups, k, query })
}

/// Write the winning label as a single line.
pub fn write_label<W: Write>(mut w: W, label: char) -> io::Result<()> {
    writeln!(w, "{label}")
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str { &self.src[self.pos..] }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn line_col(&self) -> (usize, usize) {
        let before = &self.src[..self.pos];
        let line = before.matches('\n').count() + 1;
        let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        (line, col)
    }

    fn fail(&self, expected: &'static str) -> ParseError {
        if self.rest().is_empty() { return ParseError::UnexpectedEof { expected }; }
        let (line, col) = self.line_col();
        ParseError::Expected { expected, line, col }
    }

    fn expect(&mut self, lit: &'static str) -> Result<(), ParseError> {
        self.skip_ws();
        if !self.rest().starts_with(lit) { return Err(self.fail(lit)); }
        self.pos += lit.len();
        Ok(())
    }

    /// The character right after `label=`, as `%c` reads it.
    fn read_label(&mut self) -> Result<char, ParseError> {
        match self.rest().chars().next() {
            Some(c) if !c.is_whitespace() => { self.pos += c.len_utf8(); Ok(c) }
            _ => Err(self.fail("label character")),
        }
    }

    /// Take the longest run of characters that may belong to a number.
    fn number_token(&mut self, allowed: impl Fn(char) -> bool) -> &'a str {
        self.skip_ws();
        let rest = self.rest();
        let end = rest.find(|c: char| !allowed(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn read_count(&mut self, field: &'static str) -> Result<usize, ParseError> {
        let (line, col) = { self.skip_ws(); self.line_col() };
        let tok = self.number_token(|c| c.is_ascii_digit() || c == '-' || c == '+');
        if tok.is_empty() { return Err(self.fail(field)); }
        let value: i64 = tok.parse().map_err(|_| ParseError::InvalidNumber { text: tok.to_string(), line, col })?;
        usize::try_from(value).map_err(|_| ParseError::Negative { field, value })
    }

    fn read_float(&mut self) -> Result<f32, ParseError> {
        let (line, col) = { self.skip_ws(); self.line_col() };
        let tok = self.number_token(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '+');
        if tok.is_empty() { return Err(self.fail("number")); }
        tok.parse().map_err(|_| ParseError::InvalidNumber { text: tok.to_string(), line, col })
    }

    fn read_point(&mut self) -> Result<Point, ParseError> {
        self.expect("(")?;
        let x = self.read_float()?;
        self.expect(",")?;
        let y = self.read_float()?;
        self.expect(")")?;
        Ok(Point::new(x, y))
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        self.skip_ws();
        if self.rest().is_empty() { return Ok(()); }
        let (line, col) = self.line_col();
        Err(ParseError::TrailingInput { line, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "n_groups=2\nlabel=A length=2 (0,0) (1,0)\nlabel=B\nlength=2\n(5,5)\n(6,6)\nk=3\n(0.1,0)\n";

    #[test]
    fn parses_sample_record() {
        let p = parse_text(SAMPLE).unwrap();
        assert_eq!(p.k, 3);
        assert_eq!(p.query, Point::new(0.1, 0.0));
        assert_eq!(p.groups.len(), 2);
        assert_eq!(p.groups[0].label, 'A');
        assert_eq!(p.groups[1].points, vec![Point::new(5.0, 5.0), Point::new(6.0, 6.0)]);
    }

    #[test]
    fn whitespace_is_free_between_tokens() {
        let src = "  n_groups= 1 label=Z length= 2 ( -1.5 , 2e1 )(3,4) k= 1 ( 0 ,0 )  \n\n";
        let p = parse_text(src).unwrap();
        assert_eq!(p.groups[0].label, 'Z');
        assert_eq!(p.groups[0].points[0], Point::new(-1.5, 20.0));
        assert_eq!(p.groups[0].points[1], Point::new(3.0, 4.0));
    }

    #[test]
    fn empty_groups_and_zero_groups() {
        let p = parse_text("n_groups=1 label=A length=0 k=1 (0,0)").unwrap();
        assert!(p.groups[0].points.is_empty());
        let p = parse_text("n_groups=0 k=2 (1,1)").unwrap();
        assert!(p.groups.is_empty());
        assert_eq!(p.k, 2);
    }

    #[test]
    fn malformed_records_are_rejected() {
        let cases = [
            "",
            "groups=1",
            "n_groups=x",
            "n_groups=1 label=A length=2 (0,0) k=1 (0,0)",
            "n_groups=1 label=A length=1 (0;0) k=1 (0,0)",
            "n_groups=1 label=A length=1 (abc,0) k=1 (0,0)",
            "n_groups=1 label= length=1 (0,0) k=1 (0,0)",
            "n_groups=1 label=A length=1 (0,0) k=1",
            "n_groups=1 label=A length=1 (0,0) k=1 (0,0) extra",
        ];
        for src in cases {
            assert!(parse_text(src).is_err(), "accepted {src:?}");
        }
    }

    #[test]
    fn error_kinds_and_positions() {
        assert!(matches!(parse_text("n_groups=-1"), Err(ParseError::Negative { field: "n_groups", value: -1 })));
        assert!(matches!(parse_text("n_groups=1 label=A length=-3"), Err(ParseError::Negative { field: "length", .. })));
        assert!(matches!(parse_text("n_groups=1\nlabel=A length=1 (0,0)\nk=1 (0,0) ?"), Err(ParseError::TrailingInput { line: 3, col: 11 })));
        assert!(matches!(parse_text("n_groups=1\n  lebel=A"), Err(ParseError::Expected { expected: "label=", line: 2, col: 3 })));
        assert!(matches!(parse_text("n_groups=1 label=A length=1 (1.2.3,0)"), Err(ParseError::InvalidNumber { .. })));
        assert!(matches!(parse_text("n_groups=1 label=A length=1"), Err(ParseError::UnexpectedEof { expected: "(" })));
    }

    #[test]
    fn json_record() {
        let src = r#"{"groups":[{"label":"A","points":[[0,0],[1,0]]},{"label":"B","points":[[5,5]]}],"k":2,"query":[0.1,0]}"#;
        let p = parse_json(src).unwrap();
        assert_eq!(p.groups[1].label, 'B');
        assert_eq!(p.query, Point::new(0.1, 0.0));
        assert!(matches!(parse_json(r#"{"groups":[],"k":-1,"query":[0,0]}"#), Err(ParseError::Json(_))));
    }

    #[test]
    fn text_and_json_agree() {
        let text = parse_text(SAMPLE).unwrap();
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(read_problem(json.as_bytes(), InputFormat::Json).unwrap(), text);
    }

    #[test]
    fn label_is_one_line() {
        let mut out = Vec::new();
        write_label(&mut out, 'A').unwrap();
        assert_eq!(out, b"A\n");
    }
}
