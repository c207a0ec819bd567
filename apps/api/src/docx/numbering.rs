//! List numbering definitions.

use std::collections::HashMap;

use docx_rs::{
    AbstractNumbering, Docx, Level, LevelJc, LevelOverride, LevelText, NumberFormat, Numbering,
    SpecialIndentType, Start,
};

use crate::convert::ListKind;

/// Ids below this are left to the writer's built-in default numbering.
const FIRST_NUMBERING_ID: usize = 2;
/// OOXML supports list levels 0..=8.
pub const MAX_LIST_LEVEL: usize = 8;
const INDENT_STEP: i32 = 720;
const HANGING: i32 = 360;

/// Hands out numbering ids while the body is written. All bullet lists share
/// one definition; every ordered list gets its own, so each restarts at 1.
#[derive(Debug)]
pub struct ListNumbering {
    next_id: usize,
    bullet: Option<usize>,
    ordered: HashMap<u32, usize>,
}

impl Default for ListNumbering {
    fn default() -> Self {
        Self {
            next_id: FIRST_NUMBERING_ID,
            bullet: None,
            ordered: HashMap::new(),
        }
    }
}

impl ListNumbering {
    /// Numbering id for an item of list `list_id`, adding the definition to
    /// `docx` the first time the list is seen.
    pub fn num_id(
        &mut self,
        docx: Docx,
        kind: ListKind,
        list_id: u32,
        level: usize,
    ) -> (Docx, usize) {
        match kind {
            ListKind::Bullet => match self.bullet {
                Some(id) => (docx, id),
                None => {
                    let id = self.allocate();
                    self.bullet = Some(id);
                    let docx = docx
                        .add_abstract_numbering(bullet_definition(id))
                        .add_numbering(Numbering::new(id, id));
                    (docx, id)
                }
            },
            ListKind::Ordered => match self.ordered.get(&list_id) {
                Some(&id) => (docx, id),
                None => {
                    let id = self.allocate();
                    self.ordered.insert(list_id, id);
                    let numbering = Numbering::new(id, id)
                        .add_override(LevelOverride::new(level.min(MAX_LIST_LEVEL)).start(1));
                    let docx = docx
                        .add_abstract_numbering(ordered_definition(id))
                        .add_numbering(numbering);
                    (docx, id)
                }
            },
        }
    }

    fn allocate(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// ● then ○, alternating with depth.
fn bullet_definition(id: usize) -> AbstractNumbering {
    (0..=MAX_LIST_LEVEL).fold(AbstractNumbering::new(id), |def, lvl| {
        let glyph = if lvl % 2 == 0 { "\u{25CF}" } else { "\u{25CB}" };
        def.add_level(list_level(lvl, "bullet", glyph))
    })
}

/// `1.` then `a.`, alternating with depth.
fn ordered_definition(id: usize) -> AbstractNumbering {
    (0..=MAX_LIST_LEVEL).fold(AbstractNumbering::new(id), |def, lvl| {
        let format = if lvl % 2 == 0 { "decimal" } else { "lowerLetter" };
        def.add_level(list_level(lvl, format, &format!("%{}.", lvl + 1)))
    })
}

fn list_level(lvl: usize, format: &str, text: &str) -> Level {
    Level::new(
        lvl,
        Start::new(1),
        NumberFormat::new(format),
        LevelText::new(text),
        LevelJc::new("left"),
    )
    .indent(
        Some(INDENT_STEP * (lvl as i32 + 1)),
        Some(SpecialIndentType::Hanging(HANGING)),
        None,
        None,
    )
}
