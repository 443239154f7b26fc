use std::path::Path;

use expect_test::expect;
use relay_assists::{AbortReason, DelegateRequest, ExpandError, FieldTarget};
use relay_db::{AnalysisHost, DbError};

const SHAPES: &str = r#"
pub trait Shape {
    fn area(&self) -> f64;
}
pub struct Circle;
impl Shape for Circle {
    fn area(&self) -> f64 { 0.0 }
}
"#;

const LABELED: &str = "struct Labeled {\n    shape: Circle,\n    label: String,\n}\n";

fn field(path: &str) -> FieldTarget {
    FieldTarget::parse_path(path).unwrap()
}

fn host() -> AnalysisHost {
    let mut host = AnalysisHost::default();
    host.add_files([
        ("src/shapes.rs".into(), SHAPES.to_string()),
        ("src/labeled.rs".into(), LABELED.to_string()),
    ]);
    host
}

#[test]
fn delegates_to_a_type_from_another_file() {
    let host = host();
    let analysis = host.analysis();
    let path = Path::new("src/labeled.rs");
    let outcome = analysis
        .delegate(path, &DelegateRequest::new(field("Labeled.shape")))
        .unwrap();
    let text = analysis.file_text(path).unwrap();
    expect![[r#"
        struct Labeled {
            shape: Circle,
            label: String,
        }

        impl Shape for Labeled {
            fn area(&self) -> f64 {
                <Circle as Shape>::area(&self.shape)
            }
        }
    "#]]
    .assert_eq(&outcome.plan.apply(&text));
}

#[test]
fn edits_advance_the_generation() {
    let mut host = host();
    let path = Path::new("src/labeled.rs");
    let before = host.generation().current();
    host.set_file_text(path, "struct Labeled { shape: Circle }").unwrap();
    assert!(host.generation().current() > before);

    let analysis = host.analysis();
    assert_eq!(analysis.file_text(path).unwrap(), "struct Labeled { shape: Circle }");
    let report = analysis.traits(path, &field("Labeled.shape")).unwrap();
    assert_eq!(report.candidates, ["Shape"]);
}

#[test]
fn snapshot_taken_before_an_edit_is_stale() {
    let host = host();
    let analysis = host.analysis();
    host.generation().advance();
    let err = analysis
        .delegate(Path::new("src/labeled.rs"), &DelegateRequest::new(field("Labeled.shape")))
        .unwrap_err();
    assert!(matches!(err, DbError::Delegate(AbortReason::SnapshotStale(_))), "{err:?}");
}

#[test]
fn unknown_files_are_reported() {
    let host = host();
    let err = host
        .analysis()
        .traits(Path::new("src/missing.rs"), &field("Labeled.shape"))
        .unwrap_err();
    assert!(matches!(err, DbError::UnknownFile(_)));
}

#[test]
fn expand_goes_through_the_snapshot() {
    let mut host = AnalysisHost::default();
    host.add_file("lib.rs", "struct Point { x: i32, y: i32 }\nstruct Line { start: Point }\n");
    let analysis = host.analysis();
    let outcome = analysis.expand(Path::new("lib.rs"), &field("Line.start")).unwrap();
    assert_eq!(outcome.fields, ["start_x", "start_y"]);

    let err = analysis.expand(Path::new("lib.rs"), &field("Point.x")).unwrap_err();
    assert!(matches!(err, DbError::Expand(ExpandError::NotAStruct { .. })));
}

#[test]
fn loads_a_directory_with_its_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("relay.toml"), "[assist]\nskip_traits = [\"Shape\"]\n").unwrap();
    std::fs::write(dir.path().join("shapes.rs"), SHAPES).unwrap();
    std::fs::write(dir.path().join("labeled.rs"), LABELED).unwrap();

    let host = AnalysisHost::load(dir.path()).unwrap();
    assert_eq!(host.config().skip_traits, ["Shape"]);
    assert_eq!(host.files().count(), 2);

    let err = host
        .analysis()
        .delegate(&dir.path().join("labeled.rs"), &DelegateRequest::new(field("Labeled.shape")))
        .unwrap_err();
    let DbError::Delegate(AbortReason::NoDelegatableInterfaces { exclusions, .. }) = err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(exclusions.len(), 1);
    assert_eq!(exclusions[0].trait_name(), "Shape");
}
