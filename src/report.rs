use crate::stats::OutcomeStats;

const LINE_WIDTH: usize = 80;
const LABEL_WIDTH: usize = 30;

pub fn banner(title: &str) -> String {
    format!(
        "\n{}\n{:^width$}\n{}\n",
        "-".repeat(LINE_WIDTH),
        title,
        "-".repeat(LINE_WIDTH),
        width = LINE_WIDTH
    )
}

pub fn footer() -> String {
    format!("{:-^width$}\n", " End ", width = LINE_WIDTH)
}

/// Describe the run before the first attempt.
pub fn problem_description(file: &str, iterations: usize, unassigned: usize, save: bool) -> String {
    let mut content = String::new();
    content.push_str(&format!("  Processing file \"{}\"\n", file));

    if unassigned > 0 {
        content.push_str(&format!(
            "  Trying for solutions with {} or less unassigned students.\n",
            unassigned
        ));
    } else {
        content.push_str("  Trying for solutions with no unassigned students.\n");
    }

    if iterations != 1 {
        content.push_str(&format!("  Performing up to {} iterations.\n", iterations));
    } else {
        content.push_str("  Performing 1 iteration.\n");
    }

    if save {
        content.push_str("  Result if found will be saved to a file.\n");
    }
    content
}

/// Aligned text rendering of the result table.
pub fn result_table(header: [&str; 3], rows: &[[String; 3]]) -> String {
    let mut widths = header.map(|cell| cell.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut content = String::new();
    let mut push_row = |cells: [&str; 3]| {
        content.push_str(&format!(
            "  {:<w0$}  {:<w1$}  {:>w2$}\n",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        ));
    };

    push_row(header);
    for row in rows {
        push_row([row[0].as_str(), row[1].as_str(), row[2].as_str()]);
    }
    content
}

fn ordinal(rank: usize) -> String {
    match rank {
        1 => "First".to_string(),
        2 => "Second".to_string(),
        3 => "Third".to_string(),
        4 => "Fourth".to_string(),
        5 => "Fifth".to_string(),
        n => {
            let suffix = match (n % 10, n % 100) {
                (_, 11..=13) => "th",
                (1, _) => "st",
                (2, _) => "nd",
                (3, _) => "rd",
                _ => "th",
            };
            format!("{}{}", n, suffix)
        }
    }
}

/// Per-rank counts, unassigned count and quality factor.
pub fn summary(rank_vector: &[usize], stats: &OutcomeStats, weighted_ranks: usize) -> String {
    let mut content = String::new();

    for (i, (count, percent)) in rank_vector
        .iter()
        .zip(&stats.rank_percentages)
        .take(weighted_ranks)
        .enumerate()
    {
        let label = format!("{} choices assigned:", ordinal(i + 1));
        content.push_str(&format!(
            "{:<width$} {}  ({:.0}%)\n",
            label,
            count,
            percent,
            width = LABEL_WIDTH
        ));
    }
    content.push('\n');

    content.push_str(&format!(
        "{:<width$} {}\n",
        "Unassigned students:",
        stats.unassigned,
        width = LABEL_WIDTH
    ));

    let quality = match stats.quality_factor {
        Some(q) => format!("{:.1}", q),
        None => "n/a".to_string(),
    };
    content.push_str(&format!(
        "{:<width$} {}\n",
        "Quality factor (>=1):",
        quality,
        width = LABEL_WIDTH
    ));
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_matches_the_run_parameters() {
        let text = problem_description("class.csv", 1, 0, false);
        assert!(text.contains("no unassigned students"));
        assert!(text.contains("Performing 1 iteration."));
        assert!(!text.contains("saved"));

        let text = problem_description("class.csv", 500, 2, true);
        assert!(text.contains("2 or less unassigned students"));
        assert!(text.contains("up to 500 iterations"));
        assert!(text.contains("saved to a file"));
    }

    #[test]
    fn summary_lists_weighted_ranks_and_quality() {
        let stats = OutcomeStats {
            rank_percentages: vec![75.0, 25.0, 0.0, 0.0],
            unassigned: 1,
            quality_factor: Some(4.0 / 3.0),
        };
        let text = summary(&[3, 1, 0, 0], &stats, 3);

        assert!(text.contains("First choices assigned:        3  (75%)"));
        assert!(text.contains("Second choices assigned:       1  (25%)"));
        assert!(text.contains("Third choices assigned:"));
        assert!(!text.contains("Fourth"));
        assert!(text.contains("Unassigned students:           1"));
        assert!(text.contains("Quality factor (>=1):          1.3"));
    }

    #[test]
    fn summary_handles_no_considered_entities() {
        let stats = OutcomeStats {
            rank_percentages: vec![0.0],
            unassigned: 0,
            quality_factor: None,
        };
        assert!(summary(&[0], &stats, 3).contains("n/a"));
    }

    #[test]
    fn ordinals_beyond_words() {
        assert_eq!(ordinal(6), "6th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn table_columns_are_aligned() {
        let rows = vec![
            ["Joe".to_string(), "Mexico".to_string(), "1".to_string()],
            ["Maximilian".to_string(), "<< None >>".to_string(), "-".to_string()],
        ];
        let text = result_table(["Name", "Selection", "Choice"], &rows);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  Name        Selection   Choice");
        assert_eq!(lines[1], "  Joe         Mexico           1");
        assert_eq!(lines[2], "  Maximilian  << None >>       -");
    }
}
