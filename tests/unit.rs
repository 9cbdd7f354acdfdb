use treecat::style::{
    Color, Color8, RESET, Style, cube_256, meta, rgb_from_hsv, strip_ansi, visible_width,
};
use treecat::text::{escape_line_breaks, fit_width};
use treecat::{BinaryRenderer, Classification, TextRenderer, classify};
#[test]
fn test_classify_empty_only_for_empty_buffer() {
    assert_eq!(classify(b""), Classification::Empty);
    assert_ne!(classify(b"\n"), Classification::Empty);
    assert_ne!(classify(&[0u8]), Classification::Empty);
}
#[test]
fn test_classify_plain_text() {
    match classify("hello world\nzweite Zeile ü\n".as_bytes()) {
        Classification::Text(text) => assert!(text.starts_with("hello")),
        other => panic!("expected text, got {:?}", other),
    }
}
#[test]
fn test_classify_invalid_utf8_is_binary() {
    assert_eq!(classify(&[0x48, 0x65, 0x6c, 0x6c, 0x80, 0x6f]), Classification::Binary);
    assert_eq!(classify(&[0xff, 0xfe, 0xfd]), Classification::Binary);
}
#[test]
fn test_classify_control_heavy_utf8_is_binary() {
    // 10 punctuation marks and 1 NUL: printable share 1/11, control share 1/11.
    let mut data = b"{}[]();:,.".to_vec();
    data.push(0);
    assert_eq!(classify(&data), Classification::Binary);
}
#[test]
fn test_classify_punctuation_without_controls_falls_back_to_text() {
    let data = b"{}[]();:,.!?";
    assert!(matches!(classify(data), Classification::Text(_)));
}
#[test]
fn test_classify_nul_in_mostly_text_stays_text() {
    let data = b"abcdefghij\0";
    assert!(matches!(classify(data), Classification::Text(_)));
}
#[test]
fn test_classify_printable_ratio_at_threshold_falls_through() {
    // 3 letters, 2 punctuation: printable share exactly 0.6, no controls.
    assert!(matches!(classify(b"abc{}"), Classification::Text(_)));
}
#[test]
fn test_classify_printable_ratio_at_threshold_with_controls_is_binary() {
    // 2 letters, 2 punctuation, 1 NUL: printable 0.6, control 0.2.
    assert_eq!(classify(b"ab{}\0"), Classification::Binary);
}
#[test]
fn test_classify_control_ratio_at_threshold_is_text() {
    // 19 punctuation, 1 NUL: printable 0.05, control exactly 0.05.
    let mut data = b"{}[]();:,.!?{}[]();".to_vec();
    data.push(0);
    assert_eq!(data.len(), 20);
    assert!(matches!(classify(&data), Classification::Text(_)));
}
#[test]
fn test_rgb_from_hsv_reference_points() {
    assert_eq!(rgb_from_hsv(0.0, 0.0, 0.0), (0.0, 0.0, 0.0));
    assert_eq!(rgb_from_hsv(0.0, 0.0, 1.0), (1.0, 1.0, 1.0));
    assert_eq!(rgb_from_hsv(60.0, 1.0, 0.75), (0.75, 0.75, 0.0));
}
#[test]
fn test_style_render_and_paint() {
    let style = Style::fg(Color::Basic(Color8::Green)).bold();
    assert_eq!(style.paint("x"), format!("\x1b[1;32mx{RESET}"));
    assert_eq!(cube_256((1.0, 0.0, 0.0)), Color::Ansi256(196));
}
#[test]
fn test_visible_width_ignores_escapes_and_widens_tabs() {
    assert_eq!(visible_width("\x1b[31mabc\x1b[0m"), 3);
    assert_eq!(visible_width("a\tb"), 8);
    assert_eq!(visible_width(&meta(" [5 chars]")), 10);
    assert_eq!(strip_ansi(&meta("x")), "x");
}
#[test]
fn test_binary_renderer_full_byte_range() {
    let data: Vec<u8> = (0..=255u8).collect();
    let renderer = BinaryRenderer::new(16);
    let rows: Vec<(usize, String)> = renderer.rows(&data).collect();
    assert_eq!(rows.len(), 16);
    for (i, (offset, row)) in rows.iter().enumerate() {
        assert_eq!(*offset, i * 16);
        let plain = strip_ansi(row);
        let (hex, glyphs) = plain.split_once(" │ ").unwrap();
        assert_eq!(hex.split_whitespace().count(), 16);
        assert_eq!(glyphs.chars().count(), 16);
    }
    let offsets: Vec<String> = rows
        .iter()
        .map(|(o, _)| treecat::binary::format_offset(*o, treecat::binary::offset_digits(0xf0)))
        .collect();
    assert_eq!(offsets.first().unwrap(), "00");
    assert_eq!(offsets[1], "10");
    assert_eq!(offsets.last().unwrap(), "f0");
}
#[test]
fn test_binary_renderer_is_deterministic() {
    let data = b"\x00\x01ABC  xyz\x7f\x80\xff".repeat(7);
    let renderer = BinaryRenderer::new(12);
    let first: Vec<_> = renderer.rows(&data).collect();
    let second: Vec<_> = renderer.rows(&data).collect();
    assert_eq!(first, second);
}
#[test]
fn test_binary_renderer_coalesces_identical_styles() {
    let renderer = BinaryRenderer::new(8);
    let hex = renderer.hex_half(b"aaaa");
    assert_eq!(hex.matches("\x1b[38;5;").count(), 1);
    let glyphs = renderer.glyph_half(b"aaaa");
    assert_eq!(glyphs.matches("\x1b[38;5;").count(), 1);
    assert_eq!(strip_ansi(&glyphs), "aaaa");
}
#[test]
fn test_binary_renderer_pads_short_rows() {
    let renderer = BinaryRenderer::new(8);
    let full = strip_ansi(&renderer.hex_half(b"abcdefgh")).chars().count();
    let short = strip_ansi(&renderer.hex_half(b"ab")).chars().count();
    assert_eq!(full, 24);
    assert_eq!(short, 24);
}
#[test]
fn test_binary_renderer_width_from_line_budget() {
    assert_eq!(BinaryRenderer::for_width(0, 0).bytes_per_row(), 32);
    assert_eq!(BinaryRenderer::for_width(80, 0).bytes_per_row(), 16);
    assert_eq!(BinaryRenderer::for_width(32, 0).bytes_per_row(), 4);
    assert_eq!(BinaryRenderer::for_width(28, 0).bytes_per_row(), 3);
    assert_eq!(BinaryRenderer::for_width(10, 0).bytes_per_row(), 1);
}
#[test]
fn test_fit_width_boundary() {
    let exact = "x".repeat(80);
    assert_eq!(fit_width("", &exact, 80), exact.as_str());
    let over = "x".repeat(81);
    let fitted = fit_width("", &over, 80);
    assert!(visible_width(&fitted) <= 80);
    assert!(strip_ansi(&fitted).ends_with(" [81 chars]"));
}
#[test]
fn test_fit_width_counts_prefix() {
    let body = "y".repeat(20);
    assert_eq!(fit_width("│   ", &body, 24), body.as_str());
    let fitted = fit_width("│   ", &body, 23);
    assert!(visible_width(&format!("│   {fitted}")) <= 23);
}
#[test]
fn test_fit_width_never_splits_escapes() {
    let body = format!("{}{}", Style::fg(Color::Ansi256(200)).paint(&"é".repeat(50)), "z".repeat(50));
    let fitted = fit_width("", &body, 40);
    assert!(visible_width(&fitted) <= 40);
    let plain = strip_ansi(&fitted);
    assert!(!plain.contains('\x1b'));
    assert!(plain.ends_with(" [100 chars]"));
    assert!(plain.starts_with("ééé"));
}
#[test]
fn test_escape_line_breaks() {
    assert_eq!(escape_line_breaks("a\rb"), "a␍b");
    assert_eq!(escape_line_breaks("plain"), "plain");
}
#[test]
fn test_text_renderer_line_numbers() {
    let renderer = TextRenderer::new("", 0, true, 120);
    let line = renderer.render_line(7, "let x = 1;\r\n");
    assert_eq!(strip_ansi(&line), "007│ let x = 1;");
    assert!(line.ends_with(RESET));
    let renderer = TextRenderer::new("> ", 0, false, 5);
    assert_eq!(strip_ansi(&renderer.render_line(1, "body\n")), "> body");
}
