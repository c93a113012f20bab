use docx_shrink::*;
use std::path::PathBuf;

fn expect_config_error(result: Result<()>, needle: &str) {
    match result {
        Err(ShrinkError::Config(msg)) => {
            assert!(msg.contains(needle), "unexpected message: {}", msg);
        }
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_defaults_are_valid() {
    let options = ShrinkOptions::default();
    assert!(options.validate().is_ok());

    assert_eq!(options.max_columns, 4);
    assert_eq!(options.order, SearchOrder::LevelMajor);
    assert_eq!(options.layout.line_spacing_pt, 7.0);
    assert_eq!(options.layout.max_font_size_pt, 8.0);
    assert_eq!(options.layout.paper, PaperSize::A4);
    assert_eq!(options.render.converter, PathBuf::from("soffice"));
}

#[test]
fn test_validation_zero_columns() {
    let options = ShrinkOptions {
        max_columns: 0,
        ..Default::default()
    };
    expect_config_error(options.validate(), "column count");
}

#[test]
fn test_validation_layout_values() {
    let mut layout = LayoutOptions::default();

    layout.line_spacing_pt = 0.0;
    expect_config_error(layout.validate(), "Line spacing");
    layout.line_spacing_pt = f32::NAN;
    expect_config_error(layout.validate(), "Line spacing");
    layout.line_spacing_pt = 7.0;

    layout.max_font_size_pt = -1.0;
    expect_config_error(layout.validate(), "Font size cap");
    layout.max_font_size_pt = 8.0;

    layout.cjk_max_font_size_pt = Some(0.0);
    expect_config_error(layout.validate(), "CJK");
    layout.cjk_max_font_size_pt = Some(6.5);
    assert!(layout.validate().is_ok());

    layout.paragraph_indent_pt = Some(-2.0);
    expect_config_error(layout.validate(), "indent");
    layout.paragraph_indent_pt = Some(0.0);
    assert!(layout.validate().is_ok());

    layout.column_gap_pt = -1.0;
    expect_config_error(layout.validate(), "column gap");
    layout.column_gap_pt = 6.0;
    assert!(layout.validate().is_ok());
}

#[test]
fn test_validation_margin_must_leave_printable_area() {
    let mut layout = LayoutOptions::default();

    // A4 is 210mm wide
    layout.margin_mm = 105.0;
    expect_config_error(layout.validate(), "printable area");

    layout.margin_mm = 50.0;
    assert!(layout.validate().is_ok());

    layout.margin_mm = -1.0;
    assert!(layout.validate().is_err());
}

#[test]
fn test_validation_column_level_threshold() {
    let mut layout = LayoutOptions::default();

    for level in 1..=4 {
        layout.column_min_level = level;
        assert!(layout.validate().is_ok());
    }

    layout.column_min_level = 0;
    expect_config_error(layout.validate(), "Column level");
    layout.column_min_level = 5;
    expect_config_error(layout.validate(), "Column level");
}

#[test]
fn test_validation_render_values() {
    let mut render = RenderOptions::default();
    assert!(render.validate().is_ok());

    render.converter = PathBuf::new();
    expect_config_error(render.validate(), "converter");
    render.converter = PathBuf::from("/opt/libreoffice/program/soffice");

    render.timeout_secs = 0;
    expect_config_error(render.validate(), "timeout");
    render.timeout_secs = 30;

    render.poll_interval_ms = 0;
    expect_config_error(render.validate(), "Poll interval");
}

#[test]
fn test_nested_errors_surface_from_top_level() {
    let mut options = ShrinkOptions::default();
    options.render.timeout_secs = 0;
    assert!(options.validate().is_err());

    let mut options = ShrinkOptions::default();
    options.layout.max_font_size_pt = 0.0;
    assert!(options.validate().is_err());
}

#[test]
fn test_render_durations() {
    let render = RenderOptions {
        timeout_secs: 90,
        artifact_wait_ms: 1500,
        poll_interval_ms: 50,
        ..Default::default()
    };

    assert_eq!(render.timeout().as_secs(), 90);
    assert_eq!(render.artifact_wait().as_millis(), 1500);
    assert_eq!(render.poll_interval().as_millis(), 50);
}

#[tokio::test]
async fn test_shrink_rejects_invalid_options_before_work() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.docx");
    let options = ShrinkOptions {
        max_columns: 0,
        ..Default::default()
    };

    let mut calls = 0;
    let result = shrink_to_pages(dir.path().join("missing.docx"), 1, &output, &options, |_| {
        calls += 1;
    })
    .await;

    assert!(matches!(result, Err(ShrinkError::Config(_))));
    assert_eq!(calls, 0);
    assert!(!output.exists());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let mut options = ShrinkOptions::default();
    options.max_columns = 3;
    options.order = SearchOrder::ColumnMajor;
    options.layout.paragraph_indent_pt = Some(1.5);
    options.layout.cjk_max_font_size_pt = Some(6.5);
    options.layout.cjk_font = Some("SimSun".to_string());
    options.layout.paper = PaperSize::Custom {
        width_mm: 200.0,
        height_mm: 280.0,
    };
    options.layout.column_min_level = 4;
    options.render.converter = PathBuf::from("/usr/bin/libreoffice");
    options.render.isolated_profile = false;

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Save
    options.save(path).await.unwrap();

    // Load
    let loaded = ShrinkOptions::load(path).await.unwrap();

    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_config_fills_defaults() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        temp_file.path(),
        r#"{ "max_columns": 2, "layout": { "margin_mm": 10.0 }, "render": { "timeout_secs": 30 } }"#,
    )
    .unwrap();

    let loaded = ShrinkOptions::load(temp_file.path()).await.unwrap();

    assert_eq!(loaded.max_columns, 2);
    assert_eq!(loaded.layout.margin_mm, 10.0);
    assert_eq!(loaded.layout.line_spacing_pt, 7.0);
    assert_eq!(loaded.render.timeout_secs, 30);
    assert_eq!(loaded.render.converter, PathBuf::from("soffice"));
    assert_eq!(loaded.order, SearchOrder::LevelMajor);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_malformed_config() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "{ not json").unwrap();

    let result = ShrinkOptions::load(temp_file.path()).await;
    assert!(matches!(result, Err(ShrinkError::Config(_))));
}
