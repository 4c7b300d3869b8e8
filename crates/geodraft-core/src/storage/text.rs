//! Line-oriented text encoding of a document.
//!
//! ```text
//! left right bottom top
//! shape_count
//! kind r g b <kind-specific fields>     (one line per shape)
//! ```
//!
//! Kind tags follow [`ShapeKind`]. Booleans are `0`/`1`. Point names have
//! whitespace replaced by `_`; a missing name is the token `null`. Names made
//! of underscores followed by `null` get one extra leading `_` on write.

use super::{StorageError, StorageResult};
use crate::camera::ViewRect;
use crate::document::Document;
use crate::shapes::{MIN_TESSELLATION, Rgb, Shape, ShapeKind};
use kurbo::Point;
use std::str::SplitWhitespace;

/// Token written for a point without a name.
pub const NULL_NAME: &str = "null";

fn collides_with_null(token: &str) -> bool {
    token.trim_start_matches('_') == NULL_NAME
}

/// Accumulates the fields of one record.
#[derive(Debug, Default)]
pub struct FieldWriter {
    fields: Vec<String>,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(&mut self, value: f64) {
        self.fields.push(value.to_string());
    }

    pub fn channel(&mut self, value: f32) {
        self.fields.push(value.to_string());
    }

    pub fn point(&mut self, point: Point) {
        self.number(point.x);
        self.number(point.y);
    }

    pub fn count(&mut self, value: usize) {
        self.fields.push(value.to_string());
    }

    pub fn flag(&mut self, value: bool) {
        self.fields.push(if value { "1" } else { "0" }.to_string());
    }

    pub fn name(&mut self, name: Option<&str>) {
        let token = match name {
            Some(n) if !n.trim().is_empty() => {
                let token = n.split_whitespace().collect::<Vec<_>>().join("_");
                if collides_with_null(&token) {
                    format!("_{token}")
                } else {
                    token
                }
            }
            _ => NULL_NAME.to_string(),
        };
        self.fields.push(token);
    }

    pub fn finish(self) -> String {
        self.fields.join(" ")
    }
}

/// Reads the fields of one record, reporting failures against its line.
pub struct FieldReader<'a> {
    tokens: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> FieldReader<'a> {
    /// `line` is 1-based and only used in error messages.
    pub fn new(text: &'a str, line: usize) -> Self {
        Self {
            tokens: text.split_whitespace(),
            line,
        }
    }

    pub fn malformed(&self, reason: impl Into<String>) -> StorageError {
        StorageError::MalformedRecord {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn token(&mut self, field: &str) -> StorageResult<&'a str> {
        self.tokens
            .next()
            .ok_or_else(|| self.malformed(format!("missing {field}")))
    }

    /// A finite floating-point field.
    pub fn number(&mut self, field: &str) -> StorageResult<f64> {
        let token = self.token(field)?;
        match token.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.malformed(format!("invalid {field}: {token:?}"))),
        }
    }

    /// A color channel, clamped into `[0, 1]`.
    pub fn channel(&mut self, field: &str) -> StorageResult<f32> {
        let token = self.token(field)?;
        match token.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v.clamp(0.0, 1.0)),
            _ => Err(self.malformed(format!("invalid {field}: {token:?}"))),
        }
    }

    pub fn point(&mut self, field: &str) -> StorageResult<Point> {
        let x = self.number(field)?;
        let y = self.number(field)?;
        Ok(Point::new(x, y))
    }

    pub fn count(&mut self, field: &str) -> StorageResult<usize> {
        let token = self.token(field)?;
        token
            .parse::<usize>()
            .map_err(|_| self.malformed(format!("invalid {field}: {token:?}")))
    }

    /// Segment count of a closed curve, at least 3.
    pub fn tessellation(&mut self) -> StorageResult<u32> {
        let token = self.token("segment count")?;
        match token.parse::<u32>() {
            Ok(v) if v >= MIN_TESSELLATION => Ok(v),
            _ => Err(self.malformed(format!("invalid segment count: {token:?}"))),
        }
    }

    pub fn flag(&mut self, field: &str) -> StorageResult<bool> {
        match self.token(field)? {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(self.malformed(format!("invalid {field}: {other:?}"))),
        }
    }

    pub fn name(&mut self) -> StorageResult<Option<String>> {
        let token = self.token("name")?;
        if token == NULL_NAME {
            return Ok(None);
        }
        let name = match token.strip_prefix('_') {
            Some(rest) if collides_with_null(rest) => rest,
            _ => token,
        };
        Ok(Some(name.to_string()))
    }

    /// Fail if the record has fields left over.
    pub fn finish(mut self) -> StorageResult<()> {
        match self.tokens.next() {
            Some(extra) => Err(self.malformed(format!("unexpected trailing field {extra:?}"))),
            None => Ok(()),
        }
    }
}

fn write_record(shape: &Shape) -> String {
    let mut out = FieldWriter::new();
    out.count(shape.kind().tag() as usize);
    let color = shape.color();
    out.channel(color.r);
    out.channel(color.g);
    out.channel(color.b);
    shape.write_fields(&mut out);
    out.finish()
}

fn read_record(text: &str, line: usize) -> StorageResult<Shape> {
    let mut reader = FieldReader::new(text, line);
    let tag = reader.count("kind")?;
    let kind = u8::try_from(tag)
        .ok()
        .and_then(ShapeKind::from_tag)
        .ok_or_else(|| reader.malformed(format!("unknown kind tag {tag}")))?;
    let r = reader.channel("red")?;
    let g = reader.channel("green")?;
    let b = reader.channel("blue")?;
    let shape = Shape::read_fields(kind, Rgb::new(r, g, b), &mut reader)?;
    reader.finish()?;
    Ok(shape)
}

/// Encode a document.
pub fn write_document(document: &Document) -> String {
    let view = document.view();
    let mut header = FieldWriter::new();
    header.number(view.left());
    header.number(view.right());
    header.number(view.bottom());
    header.number(view.top());

    let mut out = String::new();
    out.push_str(&header.finish());
    out.push('\n');
    out.push_str(&document.len().to_string());
    out.push('\n');
    for shape in document.shapes() {
        out.push_str(&write_record(shape));
        out.push('\n');
    }
    out
}

/// Decode a document.
///
/// Any missing or invalid field aborts the whole read; nothing partial is
/// ever returned. Blank lines are ignored.
pub fn read_document(text: &str) -> StorageResult<Document> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let (line_no, view_line) = lines.next().ok_or_else(|| StorageError::MalformedRecord {
        line: 1,
        reason: "missing view rectangle".to_string(),
    })?;
    let mut reader = FieldReader::new(view_line, line_no);
    let left = reader.number("left")?;
    let right = reader.number("right")?;
    let bottom = reader.number("bottom")?;
    let top = reader.number("top")?;
    let view = ViewRect::new(left, right, bottom, top).map_err(|e| reader.malformed(e.to_string()))?;
    reader.finish()?;

    let (line_no, count_line) = lines.next().ok_or_else(|| StorageError::MalformedRecord {
        line: line_no + 1,
        reason: "missing shape count".to_string(),
    })?;
    let mut reader = FieldReader::new(count_line, line_no);
    let count = reader.count("shape count")?;
    reader.finish()?;

    let mut shapes = Vec::with_capacity(count.min(4096));
    let mut last_line = line_no;
    for (line_no, record) in lines.by_ref().take(count) {
        shapes.push(read_record(record, line_no)?);
        last_line = line_no;
    }
    if shapes.len() < count {
        return Err(StorageError::MalformedRecord {
            line: last_line + 1,
            reason: format!("expected {count} shapes, found {}", shapes.len()),
        });
    }
    if let Some((line, _)) = lines.next() {
        return Err(StorageError::MalformedRecord {
            line,
            reason: format!("more records than the declared {count}"),
        });
    }

    Ok(Document::from_parts(shapes, view))
}
