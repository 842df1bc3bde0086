use std::collections::BTreeMap;

use crate::{config::DetectionConfig, region::Region, word::LineKey};

use super::grouping::LineGroup;

/// Minimum combined text length for this invocation, derived from the mean
/// text length across all lines: `max(min(avg / 2, 3), 1)`.
///
/// The threshold is corpus-relative, so the same line can pass or fail
/// depending on what else was found on the image.
fn min_text_length(lines: &BTreeMap<LineKey, LineGroup>) -> f32 {
    let lengths: Vec<usize> = lines
        .values()
        .map(|line| line.combined_text().chars().count())
        .collect();

    let avg = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f32 / lengths.len() as f32
    };

    (avg / 2.0).min(3.0).max(1.0)
}

/// Reduce each line group to its bounding box, dropping lines which fail the
/// confidence, text length, size or area thresholds.
pub fn filter_lines(
    lines: &BTreeMap<LineKey, LineGroup>,
    img_width: u32,
    img_height: u32,
    config: &DetectionConfig,
) -> Vec<Region> {
    let min_area = img_width as f32 * img_height as f32 * config.min_area_percent;
    let min_text_length = min_text_length(lines);

    let mut regions = Vec::new();

    for line in lines.values() {
        let bounds = line.bounding_box();

        if line.mean_confidence() < config.min_confidence as f32 {
            continue;
        }

        if (line.combined_text().chars().count() as f32) < min_text_length {
            continue;
        }

        if bounds.width < config.min_width || bounds.height < config.min_height {
            continue;
        }

        if bounds.area() < min_area {
            continue;
        }

        regions.push(bounds);
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, confidence: i32, bounds: Region) -> LineGroup {
        LineGroup {
            texts: text.split(' ').map(str::to_owned).collect(),
            confidences: vec![confidence],
            boxes: vec![bounds],
        }
    }

    fn lines_from(groups: Vec<LineGroup>) -> BTreeMap<LineKey, LineGroup> {
        groups
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                (
                    LineKey {
                        block: i as i32,
                        paragraph: 1,
                        line: 1,
                    },
                    group,
                )
            })
            .collect()
    }

    #[test]
    fn low_confidence_lines_are_dropped() {
        let lines = lines_from(vec![
            line("confident text", 80, Region::new(10.0, 10.0, 100.0, 20.0)),
            line("noisy smudge", 20, Region::new(10.0, 50.0, 100.0, 20.0)),
        ]);

        let regions = filter_lines(&lines, 1000, 1000, &DetectionConfig::default());

        assert_eq!(regions, vec![Region::new(10.0, 10.0, 100.0, 20.0)]);
    }

    #[test]
    fn all_lines_below_threshold_is_a_valid_empty_result() {
        let lines = lines_from(vec![
            line("faint", 10, Region::new(10.0, 10.0, 100.0, 20.0)),
            line("fainter", 5, Region::new(10.0, 50.0, 100.0, 20.0)),
        ]);

        let regions = filter_lines(&lines, 1000, 1000, &DetectionConfig::default());

        assert!(regions.is_empty());
    }

    #[test]
    fn raising_min_confidence_never_adds_regions() {
        let lines = lines_from(vec![
            line("alpha label", 55, Region::new(10.0, 10.0, 100.0, 20.0)),
            line("beta label", 75, Region::new(10.0, 50.0, 100.0, 20.0)),
            line("gamma label", 95, Region::new(10.0, 90.0, 100.0, 20.0)),
        ]);

        let mut config = DetectionConfig::default();
        let mut last_count = usize::MAX;
        for min_confidence in [40, 60, 80, 100] {
            config.min_confidence = min_confidence;
            let count = filter_lines(&lines, 1000, 1000, &config).len();
            assert!(count <= last_count);
            last_count = count;
        }
    }

    #[test]
    fn text_length_threshold_is_corpus_relative() {
        // avg length (2 + 34) / 2 = 18, so min_text_length caps at 3 and the
        // two-character line fails
        let crowded = lines_from(vec![
            line("ab", 90, Region::new(10.0, 10.0, 40.0, 20.0)),
            line(
                "a considerably longer caption here",
                90,
                Region::new(10.0, 50.0, 300.0, 20.0),
            ),
        ]);
        let regions = filter_lines(&crowded, 1000, 1000, &DetectionConfig::default());
        assert_eq!(regions.len(), 1);

        // alone on the image, the same short line passes: avg = 2,
        // min_text_length = max(min(1, 3), 1) = 1
        let alone = lines_from(vec![line("ab", 90, Region::new(10.0, 10.0, 40.0, 20.0))]);
        let regions = filter_lines(&alone, 1000, 1000, &DetectionConfig::default());
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn undersized_boxes_are_dropped() {
        let lines = lines_from(vec![
            line("thin mark", 90, Region::new(10.0, 10.0, 3.0, 20.0)),
            line("flat mark", 90, Region::new(10.0, 50.0, 20.0, 3.0)),
        ]);

        let regions = filter_lines(&lines, 1000, 1000, &DetectionConfig::default());

        assert!(regions.is_empty());
    }

    #[test]
    fn area_threshold_scales_with_image_size() {
        // 1000x1000 image: min area = 1_000_000 * 0.0001 = 100px^2. Both
        // boxes clear the width/height minimums, so area alone decides.
        let lines = lines_from(vec![
            line("okay text", 90, Region::new(10.0, 10.0, 30.0, 10.0)),
            line("tiny text", 90, Region::new(10.0, 50.0, 20.0, 4.5)),
        ]);

        let regions = filter_lines(&lines, 1000, 1000, &DetectionConfig::default());

        // 300px^2 passes the 100px^2 threshold, 90px^2 does not
        assert_eq!(regions, vec![Region::new(10.0, 10.0, 30.0, 10.0)]);
    }

    #[test]
    fn lowering_min_area_percent_never_removes_regions() {
        let lines = lines_from(vec![
            line("first label", 90, Region::new(10.0, 10.0, 30.0, 10.0)),
            line("second label", 90, Region::new(10.0, 50.0, 8.0, 8.0)),
        ]);

        let mut config = DetectionConfig::default();
        let mut last_count = 0;
        for min_area_percent in [0.01, 0.001, 0.0001, 0.0] {
            config.min_area_percent = min_area_percent;
            let count = filter_lines(&lines, 500, 500, &config).len();
            assert!(count >= last_count);
            last_count = count;
        }
    }
}
