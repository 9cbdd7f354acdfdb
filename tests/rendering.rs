use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempfile::{TempDir, tempdir};
use treecat::output::OutputFormat;
use treecat::{
    DirStats, DirStatsCache, LineKind, RenderConfigBuilder, TreeOptionsBuilder, TreeWalker,
    TreecatError, format_bytes, treecat,
};
fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    fs::create_dir(dir.path().join("empty")).unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("b.txt"), "x\n").unwrap();
    fs::write(dir.path().join(".hidden"), "secret\n").unwrap();
    dir
}
fn render(builder: TreeOptionsBuilder) -> Vec<String> {
    let mut out = Vec::new();
    TreeWalker::new(builder.color(false).build())
        .walk(&mut out)
        .unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
fn options(root: &Path) -> TreeOptionsBuilder {
    TreeOptionsBuilder::new(root)
}
#[test]
fn test_tree_places_previews_under_entries() {
    let dir = fixture();
    let lines = render(options(dir.path()));
    assert!(lines[0].contains("4 children"));
    assert!(lines[0].contains("2 subdirs"));
    assert!(lines[1].starts_with("├── a.txt"));
    assert!(lines[1].contains("6   B"));
    assert_eq!(lines[2], "│   1│ hello");
    assert!(lines[3].starts_with("├── empty"));
    assert!(lines[3].contains("[📂 empty]"));
    assert!(lines[4].starts_with("└── sub"));
    assert!(lines[5].starts_with("    └── b.txt"));
    assert_eq!(lines[6], "        1│ x");
    assert_eq!(lines.len(), 7);
}
#[test]
fn test_walk_summary_counts_entries() {
    let dir = fixture();
    let mut out = Vec::new();
    let summary = treecat(options(dir.path()).build(), &mut out).unwrap();
    assert_eq!(summary.dirs, 2);
    assert_eq!(summary.files, 2);
    assert!(String::from_utf8(out).unwrap().contains("\x1b["));
}
#[test]
fn test_summary_mode_omits_contents() {
    let dir = fixture();
    let lines = render(options(dir.path()).summary(true));
    assert_eq!(lines.len(), 5);
    assert!(!lines.iter().any(|l| l.contains("1│")));
}
#[test]
fn test_no_files_shows_directories_only() {
    let dir = fixture();
    let lines = render(options(dir.path()).no_files(true));
    assert!(!lines.iter().any(|l| l.contains(".txt")));
    assert!(lines.iter().any(|l| l.contains("sub")));
    assert!(lines.iter().any(|l| l.contains("empty")));
}
#[test]
fn test_ignore_patterns_and_hidden_files() {
    let dir = fixture();
    let lines = render(options(dir.path()).ignore_patterns(vec!["*.txt".to_string()]));
    assert!(!lines.iter().any(|l| l.contains(".txt")));
    assert!(!lines.iter().any(|l| l.contains(".hidden")));
    let lines = render(options(dir.path()).include_hidden(true));
    assert!(lines.iter().any(|l| l.contains(".hidden")));
    assert!(lines.iter().any(|l| l.contains("1│ secret")));
}
#[test]
fn test_max_depth_limits_descent() {
    let dir = fixture();
    let lines = render(options(dir.path()).max_depth(1));
    assert!(lines.iter().any(|l| l.contains("sub")));
    assert!(!lines.iter().any(|l| l.contains("b.txt")));
}
#[test]
fn test_render_config_reaches_previews() {
    let dir = tempdir().unwrap();
    let content: String = (1..=50).map(|i| format!("{i}\n")).collect();
    fs::write(dir.path().join("n.txt"), content).unwrap();
    let config = RenderConfigBuilder::new().max_lines(3).build();
    let lines = render(options(dir.path()).sums(false).render(config));
    assert_eq!(lines[2], "    1│ 1");
    assert_eq!(lines[5], "    ... [50 lines total]");
}
#[test]
fn test_json_format_emits_one_record_per_file() {
    let dir = fixture();
    let mut out = Vec::new();
    TreeWalker::new(options(dir.path()).format(OutputFormat::Json).build())
        .walk(&mut out)
        .unwrap();
    let records: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert!(first["path"].as_str().unwrap().ends_with("a.txt"));
    assert_eq!(first["lines"][0]["kind"], "text");
    assert_eq!(first["lines"][0]["number"], 1);
    assert_eq!(first["lines"][0]["text"], "1│ hello");
}
#[test]
fn test_dir_stats_are_recursive_and_cached() {
    let dir = fixture();
    let mut cache = DirStatsCache::new();
    let stats = cache.stats(dir.path()).unwrap();
    assert_eq!(
        stats,
        DirStats {
            subdirs: 2,
            files: 3,
            total_bytes: 6 + 2 + 7,
        }
    );
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats(dir.path()).unwrap(), stats);
    assert_eq!(cache.len(), 3);
}
#[test]
fn test_cancelled_walk_stops() {
    let dir = fixture();
    let flag = Arc::new(AtomicBool::new(true));
    let mut out = Vec::new();
    let result = TreeWalker::new(options(dir.path()).build())
        .with_cancel_flag(flag)
        .walk(&mut out);
    assert!(matches!(result, Err(TreecatError::Interrupted)));
    assert!(out.is_empty());
}
#[test]
fn test_missing_root_is_rejected() {
    let dir = tempdir().unwrap();
    let mut out = Vec::new();
    let result = treecat(options(&dir.path().join("gone")).build(), &mut out);
    assert!(matches!(result, Err(TreecatError::InvalidPath(_))));
}
#[test]
fn test_format_bytes_treats_buffer_as_complete() {
    let config = RenderConfigBuilder::new().max_lines(1).build();
    let lines: Vec<_> = format_bytes(b"a\nb\nc", &config).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].kind, LineKind::Truncated);
    assert_eq!(lines[1].plain(), "... [3 lines total]");
}
