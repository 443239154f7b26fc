//! Text edits produced by assists.

use relay_source::TextRange;

/// Replace the text in `delete` with `insert`. Pure insertions have an empty range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEdit {
    pub delete: TextRange,
    pub insert: String,
}

impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        TextEdit {
            delete: TextRange::empty(offset),
            insert: text.into(),
        }
    }

    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        TextEdit {
            delete: range,
            insert: text.into(),
        }
    }
}

/// An ordered list of non-overlapping edits against one snapshot of a file.
///
/// Edits at the same offset are applied in list order, so the text of an earlier
/// edit ends up before the text of a later one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditPlan {
    edits: Vec<TextEdit>,
}

impl EditPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// `(offset, text)` pairs of the pure insertions, in order.
    pub fn insertions(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.edits
            .iter()
            .filter(|edit| edit.delete.is_empty())
            .map(|edit| (edit.delete.start(), edit.insert.as_str()))
    }

    /// Applies every edit to `text`, which must be the text the plan was computed against.
    pub fn apply(&self, text: &str) -> String {
        let mut order: Vec<usize> = (0..self.edits.len()).collect();
        // Back to front keeps earlier offsets valid; ties go last-first so that list
        // order survives.
        order.sort_by(|&a, &b| {
            let (ea, eb) = (&self.edits[a], &self.edits[b]);
            eb.delete.start().cmp(&ea.delete.start()).then(b.cmp(&a))
        });
        let mut out = text.to_string();
        for index in order {
            let edit = &self.edits[index];
            let end = edit.delete.end().min(out.len());
            let start = edit.delete.start().min(end);
            out.replace_range(start..end, &edit.insert);
        }
        out
    }
}

impl FromIterator<TextEdit> for EditPlan {
    fn from_iter<I: IntoIterator<Item = TextEdit>>(iter: I) -> Self {
        EditPlan {
            edits: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_offset_insertions_keep_their_order() {
        let plan: EditPlan = [TextEdit::insert(3, "A"), TextEdit::insert(3, "B")].into_iter().collect();
        assert_eq!(plan.apply("xyz!"), "xyzAB!");
    }

    #[test]
    fn replacements_and_insertions_combine() {
        let plan: EditPlan = [
            TextEdit::insert(0, "<"),
            TextEdit::replace(TextRange::new(2, 4), "__"),
            TextEdit::insert(6, ">"),
        ]
        .into_iter()
        .collect();
        assert_eq!(plan.apply("abcdef"), "<ab__ef>");
    }

    #[test]
    fn insertions_are_listed_in_plan_order() {
        let mut plan = EditPlan::new();
        plan.push(TextEdit::insert(5, "one"));
        plan.push(TextEdit::replace(TextRange::new(0, 1), "x"));
        plan.push(TextEdit::insert(5, "two"));
        let pairs: Vec<_> = plan.insertions().collect();
        assert_eq!(pairs, [(5, "one"), (5, "two")]);
    }
}
