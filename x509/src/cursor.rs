use kensa_der::{Tag, Tlv};

use crate::error::Error;

/// Children of a SEQUENCE node, or an error naming the field that was expected.
pub(crate) fn sequence<'a>(tlv: &'a Tlv, field: &'static str) -> Result<&'a [Tlv], Error> {
    match tlv.children() {
        Some(children) if tlv.tag() == Tag::SEQUENCE => Ok(children),
        _ => Err(Error::UnexpectedElement {
            field,
            expected: "SEQUENCE",
        }),
    }
}

/// Walks the children of a constructed node one field at a time.
///
/// Optional fields shift every later position, so fields are consumed in
/// order rather than addressed by index.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    items: &'a [Tlv],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(items: &'a [Tlv]) -> Self {
        Cursor { items, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<&'a Tlv> {
        self.items.get(self.pos)
    }

    pub(crate) fn take(&mut self, field: &'static str) -> Result<&'a Tlv, Error> {
        let item = self.peek().ok_or(Error::MissingField(field))?;
        self.pos += 1;
        Ok(item)
    }

    pub(crate) fn take_if(&mut self, pred: impl Fn(&Tlv) -> bool) -> Option<&'a Tlv> {
        let item = self.peek().filter(|tlv| pred(tlv))?;
        self.pos += 1;
        Some(item)
    }

    pub(crate) fn take_sequence(&mut self, field: &'static str) -> Result<&'a [Tlv], Error> {
        sequence(self.take(field)?, field)
    }

    pub(crate) fn remaining(&self) -> &'a [Tlv] {
        self.items.get(self.pos..).unwrap_or_default()
    }
}
