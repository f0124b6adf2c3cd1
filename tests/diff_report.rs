//! Comparing charts and rendering the report.

use maidata_diff::prelude::*;
use pretty_assertions::assert_eq;

fn level(n: u8) -> Level {
    Level::try_from(n).expect("valid level")
}

fn chart(label: &str, source: &str) -> Chart {
    Chart::load(label, source, level(5)).expect("chart must load")
}

fn report_text(left: &str, right: &str) -> String {
    let left = chart("txt1", left);
    let right = chart("txt2", right);
    diff_charts(&left, &right).to_string()
}

#[test]
fn identical_charts() {
    let source = "&inote_5=(120){4}1,2h[2:1],3/4,E";
    assert_eq!(report_text(source, source), "No difference found.\n");
}

#[test]
fn synonyms_only() {
    assert_eq!(
        report_text(
            "&inote_5=(120){4}1xh[4:1],2-6>,C1,3$,E",
            "&inote_5=(120){4}1hx[4:1],2-6<,c2,3,E",
        ),
        "No difference found.\n"
    );
}

#[test]
fn reflowed_notation_is_equal() {
    assert_eq!(
        report_text(
            "&inote_5=(120){4}1,2,3,E",
            "&inote_5=(120)\n{8}1,,\n|| same notes\n(120){4}2,3,E",
        ),
        "No difference found.\n"
    );
}

#[test]
fn single_difference() {
    let expected = [
        "Error group 1:",
        "  Line 1  : (120){4}1,2,3,E",
        "                      ^    ",
        "    diff2: '2': bpm-120, delay-1/4",
        "",
        "  Line 1  : (120){4}1,4,3,E",
        "                      ^    ",
        "    diff2: '4': bpm-120, delay-1/4",
        "",
        "Reach end of inote.",
        "",
    ]
    .join("\n");
    assert_eq!(
        report_text("&inote_5=(120){4}1,2,3,E", "&inote_5=(120){4}1,4,3,E"),
        expected
    );
}

#[test]
fn distant_differences_are_separate_groups() {
    let left = chart("txt1", "&inote_5=(120){4}1,2,3,4,5,6,7,8,1,2,3,4,5,6,7,8,E");
    let right = chart("txt2", "&inote_5=(120){4}8,2,3,4,5,6,7,8,1,2,3,4,5,6,7,1,E");
    let report = diff_charts(&left, &right);
    assert_eq!(report.groups().len(), 2);

    let text = report.to_string();
    assert!(text.contains("Error group 1:"));
    assert!(text.contains("Error group 2:"));
    assert!(text.contains("    diff1: '1': bpm-120, delay-1/4"));
    assert!(text.contains("    diff16: '1': bpm-120, delay-0"));
    assert!(text.ends_with("Reach end of inote.\n"));
}

#[test]
fn adjacent_differences_share_a_group() {
    let left = chart("txt1", "&inote_5=(120){4}1,2,3,4,E");
    let right = chart("txt2", "&inote_5=(120){4}1,5,6,4,E");
    let report = diff_charts(&left, &right);
    assert_eq!(report.groups().len(), 1);
    let indices: Vec<usize> = report.groups()[0]
        .records()
        .iter()
        .map(|record| record.index)
        .collect();
    assert_eq!(indices, vec![2, 3]);
}

#[test]
fn grouping_distance_counts_bytes() {
    // 9 bytes but 5 chars apart
    let left = chart("txt1", "&inote_5=(120){4}1,2,ああ,3,E");
    let right = chart("txt2", "&inote_5=(120){4}1,5,ああ,6,E");
    let report = diff_charts(&left, &right);
    let offsets: Vec<Vec<usize>> = report
        .groups()
        .iter()
        .map(|group| group.records().iter().map(|r| r.left.offset).collect())
        .collect();
    assert_eq!(offsets, vec![vec![10], vec![19]]);
}

#[test]
fn longer_side_reports_absent_slots() {
    let left = chart("txt1", "&inote_5=(120){4}1,2,3,E");
    let right = chart("txt2", "&inote_5=(120){4}1,2,E");
    let text = diff_charts(&left, &right).to_string();
    assert!(text.contains("    diff3: '3': bpm-120, delay-0"));
    assert!(text.contains("    diff3: None"));
}

#[test]
fn line_numbers_follow_the_file() {
    let left = chart("txt1", "&title=x\n&inote_5=(120){4}1,2,\n3,4,E");
    let right = chart("txt2", "&title=x\n&inote_5=(120){4}1,2,\n3,5,E");
    let text = diff_charts(&left, &right).to_string();
    assert!(text.contains("  Line 3  : "), "{text}");
    assert!(text.contains("    diff4: '4': bpm-120, delay-0"));
    assert!(text.contains("    diff4: '5': bpm-120, delay-0"));
}
