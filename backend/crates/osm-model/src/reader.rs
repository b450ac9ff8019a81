//! OSM text reader.
//!
//! Objects are written as a class name followed by comma-separated fields and
//! terminated by `;`. A `!-` comment after the values of a line names those
//! values; a plain `!` comment is ignored.

use crate::error::{Error, Result};
use crate::model::{Field, Handle, ModelObject};

const CLASS_PREFIX: &str = "OS:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Class,
    Field,
}

struct Piece {
    role: Role,
    value: String,
    ends_object: bool,
}

struct Pending {
    class: String,
    line: usize,
    fields: Vec<Field>,
}

pub(crate) fn read_objects(text: &str) -> Result<Vec<ModelObject>> {
    let mut objects = Vec::new();
    let mut pending: Option<Pending> = None;
    // Value text not yet terminated by `,` or `;`
    let mut carry = String::new();
    let mut carry_line = 0;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx + 1;
        let (code, comment) = split_comment(raw_line);

        let mut expect_class = pending.is_none();
        let mut pieces = Vec::new();
        let mut current = std::mem::take(&mut carry);
        let mut continues_carry = !current.is_empty();
        for ch in code.chars() {
            match ch {
                ',' | ';' => {
                    let role = if expect_class { Role::Class } else { Role::Field };
                    let ends_object = ch == ';';
                    expect_class = ends_object;
                    pieces.push(Piece {
                        role,
                        value: current.trim().to_string(),
                        ends_object,
                    });
                    current.clear();
                    continues_carry = false;
                }
                _ => current.push(ch),
            }
        }
        if !current.trim().is_empty() {
            if !continues_carry {
                carry_line = line;
            }
            carry = current.trim_start().to_string();
        }

        let field_count = pieces.iter().filter(|p| p.role == Role::Field).count();
        let mut names = field_names(comment, field_count).into_iter();

        for piece in pieces {
            match piece.role {
                Role::Class => {
                    if piece.value.is_empty() {
                        return Err(Error::Syntax {
                            line,
                            message: "expected an object class name".to_string(),
                        });
                    }
                    if !piece.value.starts_with(CLASS_PREFIX) {
                        return Err(Error::UnknownClass {
                            class: piece.value,
                            line,
                        });
                    }
                    if piece.ends_object {
                        return Err(Error::MissingHandle {
                            class: piece.value,
                            line,
                        });
                    }
                    pending = Some(Pending {
                        class: piece.value,
                        line,
                        fields: Vec::new(),
                    });
                }
                Role::Field => {
                    let Some(object) = pending.as_mut() else {
                        return Err(Error::Syntax {
                            line,
                            message: "field outside of an object".to_string(),
                        });
                    };
                    object
                        .fields
                        .push(Field::new(piece.value, names.next().flatten()));
                    if piece.ends_object {
                        if let Some(done) = pending.take() {
                            objects.push(finish(done)?);
                        }
                    }
                }
            }
        }
    }

    if let Some(open) = pending {
        return Err(Error::Syntax {
            line: open.line,
            message: format!("object '{}' is not terminated by ';'", open.class),
        });
    }
    if !carry.trim().is_empty() {
        return Err(Error::Syntax {
            line: carry_line,
            message: format!("unexpected text '{}'", carry.trim()),
        });
    }

    Ok(objects)
}

fn finish(pending: Pending) -> Result<ModelObject> {
    let handle = pending
        .fields
        .first()
        .and_then(|f| Handle::parse(&f.value))
        .ok_or_else(|| Error::MissingHandle {
            class: pending.class.clone(),
            line: pending.line,
        })?;
    Ok(ModelObject::new(
        pending.class,
        handle,
        pending.fields,
        pending.line,
    ))
}

/// Split a line into its value text and the name carried by a `!-` comment.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find('!') {
        None => (line, None),
        Some(pos) => {
            let (code, comment) = line.split_at(pos);
            let name = comment
                .strip_prefix("!-")
                .map(str::trim)
                .filter(|n| !n.is_empty());
            (code, name)
        }
    }
}

/// Names for the `count` values of one line.
///
/// `X,Y,Z Vertex 1 {m}` over three values expands to `X Vertex 1 {m}`,
/// `Y Vertex 1 {m}` and `Z Vertex 1 {m}`; other multi-value comments are
/// numbered.
fn field_names(comment: Option<&str>, count: usize) -> Vec<Option<String>> {
    let Some(comment) = comment else {
        return vec![None; count];
    };
    if count <= 1 {
        return vec![Some(comment.to_string()); count];
    }

    let (head, tail) = comment.split_once(' ').unwrap_or((comment, ""));
    let parts: Vec<&str> = head.split(',').collect();
    if parts.len() == count && parts.iter().all(|p| !p.is_empty()) {
        parts
            .into_iter()
            .map(|p| {
                if tail.is_empty() {
                    Some(p.to_string())
                } else {
                    Some(format!("{} {}", p, tail))
                }
            })
            .collect()
    } else {
        (1..=count).map(|i| Some(format!("{} {}", comment, i))).collect()
    }
}
