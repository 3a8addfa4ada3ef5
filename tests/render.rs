use covpr::model::{FileCoverageResult, FilesCoverage};
use covpr::render;

fn file(name: &str, missed: u64, covered: u64, percentage: f64) -> FileCoverageResult {
    FileCoverageResult {
        file_path: format!("src/{name}"),
        url: format!("http://x/{name}"),
        name: name.to_string(),
        missed,
        covered,
        percentage,
    }
}

/// A file at exactly the threshold passes; one unit below fails.
#[test]
fn threshold_boundary_is_inclusive() {
    let coverage = FilesCoverage {
        files: vec![file("Exact.java", 20, 80, 80.0), file("Below.java", 21, 79, 79.0)],
        percentage: 79.5,
    };

    let table = render::file_table(&coverage, 80.0);
    assert!(table.contains("|[Exact.java](http://x/Exact.java)|80%|:white_check_mark:|"));
    assert!(table.contains("|[Below.java](http://x/Below.java)|79%|:x:|"));
    // The header row is marked against the same threshold.
    assert!(table.starts_with("|File|Coverage [79.5%]|:x:|\n|:-|:-:|:-:|"));
}

#[test]
fn percentages_render_without_trailing_zeros() {
    let coverage = FilesCoverage {
        files: vec![file("Half.java", 1, 7, 87.5), file("Full.java", 0, 4, 100.0)],
        percentage: 91.67,
    };

    let table = render::file_table(&coverage, 50.0);
    assert!(table.contains("|87.5%|"));
    assert!(table.contains("|100%|"));
    assert!(table.contains("Coverage [91.67%]"));
}

#[test]
fn comment_sections_in_order() {
    let coverage = FilesCoverage {
        files: vec![file("Foo.java", 0, 10, 100.0)],
        percentage: 100.0,
    };

    let body = render::pr_comment(85.25, &coverage, 80.0, 80.0, "Coverage Report");
    let title_pos = body.find("### Coverage Report").unwrap();
    let table_pos = body.find("|File|").unwrap();
    let overall_pos = body.find("|Total Project Coverage|85.25%|").unwrap();
    assert!(title_pos < table_pos);
    assert!(table_pos < overall_pos);
    // Blank-line separator between the two tables.
    assert!(body.contains("|\n\n|Total Project Coverage|"));
}

#[test]
fn comment_without_title_has_no_heading() {
    let coverage = FilesCoverage {
        files: vec![],
        percentage: 100.0,
    };

    let body = render::pr_comment(90.0, &coverage, 80.0, 80.0, "");
    assert!(!body.contains('#'));
    assert!(body.starts_with("> There is no coverage information"));
}
