use std::collections::BTreeMap;

use crate::{
    region::Region,
    word::{LineKey, Word},
};

/// The words of one text line, in OCR emission order.
#[derive(Debug, Default, Clone)]
pub struct LineGroup {
    pub texts: Vec<String>,
    pub confidences: Vec<i32>,
    pub boxes: Vec<Region>,
}

impl LineGroup {
    /// The line's text, space joined.
    pub fn combined_text(&self) -> String {
        self.texts.join(" ")
    }

    /// Arithmetic mean of the per-word confidences.
    pub fn mean_confidence(&self) -> f32 {
        self.confidences.iter().sum::<i32>() as f32 / self.confidences.len() as f32
    }

    /// The smallest box enclosing every word of the line.
    pub fn bounding_box(&self) -> Region {
        // a group only exists once a word was pushed, so boxes is non-empty
        let mut bounds = self.boxes[0];
        for b in &self.boxes[1..] {
            bounds = bounds.union(b);
        }
        bounds
    }
}

/// Partition raw OCR words into line groups.
///
/// Words with a negative confidence (the engine's "no detection" marker) or
/// whitespace-only text are dropped before grouping. Word order within each
/// group follows the input order.
pub fn group_words(words: Vec<Word>) -> BTreeMap<LineKey, LineGroup> {
    let mut lines: BTreeMap<LineKey, LineGroup> = BTreeMap::new();

    for word in words {
        let text = word.text.trim();
        if text.is_empty() || word.confidence < 0 {
            continue;
        }

        let group = lines.entry(word.line).or_default();
        group.texts.push(text.to_owned());
        group.confidences.push(word.confidence);
        group.boxes.push(word.bounds);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, confidence: i32, left: f32, line: LineKey) -> Word {
        Word {
            text: text.to_owned(),
            confidence,
            bounds: Region::new(left, 10.0, 30.0, 12.0),
            line,
        }
    }

    fn key(block: i32, paragraph: i32, line: i32) -> LineKey {
        LineKey {
            block,
            paragraph,
            line,
        }
    }

    #[test]
    fn groups_by_line_key() {
        let words = vec![
            word("Abductor", 90, 10.0, key(1, 1, 1)),
            word("pollicis", 85, 45.0, key(1, 1, 1)),
            word("brevis", 88, 20.0, key(1, 1, 2)),
        ];

        let lines = group_words(words);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[&key(1, 1, 1)].combined_text(), "Abductor pollicis");
        assert_eq!(lines[&key(1, 1, 2)].combined_text(), "brevis");
    }

    #[test]
    fn drops_non_detections_and_blank_text() {
        let words = vec![
            word("", 95, 10.0, key(1, 1, 1)),
            word("   ", 95, 10.0, key(1, 1, 1)),
            word("ghost", -1, 10.0, key(1, 1, 1)),
            word("real", 70, 10.0, key(1, 1, 1)),
        ];

        let lines = group_words(words);

        assert_eq!(lines.len(), 1);
        let group = &lines[&key(1, 1, 1)];
        assert_eq!(group.texts, vec!["real"]);
        assert_eq!(group.confidences, vec![70]);
    }

    #[test]
    fn grouping_is_input_order_independent() {
        let a = word("left", 80, 10.0, key(1, 1, 1));
        let b = word("text", 60, 50.0, key(1, 2, 1));
        let c = word("label", 90, 10.0, key(2, 1, 1));

        let forward = group_words(vec![a.clone(), b.clone(), c.clone()]);
        let backward = group_words(vec![c, b, a]);

        assert_eq!(forward.len(), backward.len());
        for (key, group) in &forward {
            assert_eq!(group.texts, backward[key].texts);
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(group_words(Vec::new()).is_empty());
    }

    #[test]
    fn bounding_box_encloses_all_words() {
        let mut words = vec![
            word("a", 80, 10.0, key(1, 1, 1)),
            word("b", 80, 100.0, key(1, 1, 1)),
        ];
        words[1].bounds = Region::new(100.0, 5.0, 40.0, 25.0);

        let lines = group_words(words);
        let bounds = lines[&key(1, 1, 1)].bounding_box();

        assert_eq!(bounds, Region::new(10.0, 5.0, 130.0, 25.0));
    }

    #[test]
    fn mean_confidence_uses_floating_division() {
        let words = vec![
            word("a", 50, 10.0, key(1, 1, 1)),
            word("b", 45, 50.0, key(1, 1, 1)),
        ];

        let lines = group_words(words);

        assert_eq!(lines[&key(1, 1, 1)].mean_confidence(), 47.5);
    }
}
