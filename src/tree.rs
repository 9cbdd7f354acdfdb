//! Directory tree rendering with inline file previews.

use crate::engine::ContentFormatter;
use crate::error::TreecatError;
use crate::highlight::Highlighter;
use crate::meta::{human_size, is_previewable, mime_label, mime_type};
use crate::options::TreeOptions;
use crate::output::{OutputFormat, file_record, write_line, write_record};
use crate::style::{Color, Color8, Style, meta, visible_width};
use crate::types::DirStats;
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod sign {
    pub const BRANCH: &str = "├── ";
    pub const LAST: &str = "└── ";
    pub const VERT: &str = "│   ";
    pub const BLANK: &str = "    ";
    pub const FILLER: char = '┈';
    pub const FOLDER: &str = "📂";
}

/// Recursive directory totals, memoized by canonical path for the lifetime
/// of the walk.
#[derive(Debug, Default)]
pub struct DirStatsCache {
    cache: HashMap<PathBuf, DirStats>,
}

impl DirStatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Counts subdirectories, files and file bytes below `dir`.
    ///
    /// Children that resolve outside `dir`, or back to it, are counted but
    /// not descended into. Unreadable entries are skipped.
    pub fn stats(&mut self, dir: &Path) -> Result<DirStats, TreecatError> {
        let dir = dir
            .canonicalize()
            .map_err(|e| TreecatError::io(dir, e))?;
        if let Some(stats) = self.cache.get(&dir) {
            return Ok(*stats);
        }

        let mut stats = DirStats::default();
        let entries = fs::read_dir(&dir).map_err(|e| TreecatError::io(&dir, e))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                stats.files += 1;
                if let Ok(meta) = fs::metadata(&path) {
                    stats.total_bytes += meta.len();
                }
                continue;
            }
            stats.subdirs += 1;
            let Ok(resolved) = path.canonicalize() else {
                continue;
            };
            if !resolved.starts_with(&dir) || resolved == dir {
                continue;
            }
            if let Ok(child) = self.stats(&resolved) {
                stats.subdirs += child.subdirs;
                stats.files += child.files;
                stats.total_bytes += child.total_bytes;
            }
        }
        self.cache.insert(dir, stats);
        Ok(stats)
    }
}

/// Entry counts for a finished walk, root excluded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub dirs: usize,
    pub files: usize,
}

struct Entry {
    path: PathBuf,
    depth: usize,
    is_dir: bool,
    is_symlink: bool,
    is_last: bool,
}

/// Marks each entry that is the last child of its parent. Entries are in
/// depth-first order.
fn mark_last_children(entries: &mut [Entry]) {
    let mut seen: Vec<bool> = Vec::new();
    for entry in entries.iter_mut().rev() {
        let depth = entry.depth;
        if seen.len() <= depth {
            seen.resize(depth + 1, false);
        }
        entry.is_last = !seen[depth];
        seen[depth] = true;
        seen.truncate(depth + 1);
    }
}

/// Tree prefix for an entry and the prefix its content lines go under,
/// given whether each ancestor below the root was a last child.
fn prefixes(ancestors_last: &[bool], entry: &Entry) -> (String, String) {
    if entry.depth == 0 {
        return (String::new(), String::new());
    }
    let mut base = String::new();
    for &last in ancestors_last {
        base.push_str(if last { sign::BLANK } else { sign::VERT });
    }
    let head = format!("{base}{}", if entry.is_last { sign::LAST } else { sign::BRANCH });
    let child = format!("{base}{}", if entry.is_last { sign::BLANK } else { sign::VERT });
    (head, child)
}

fn name_style(path: &Path, is_symlink: bool) -> Style {
    if is_symlink {
        Style::fg(Color::Basic(Color8::Cyan)).bold()
    } else if path.is_file() {
        Style::fg(Color::Basic(Color8::Green)).bold()
    } else if path.is_dir() {
        Style::fg(Color::Basic(Color8::Blue)).on(Color::Basic(Color8::Green))
    } else {
        Style::fg(Color::Basic(Color8::Red)).bold()
    }
}

/// Walks a directory and writes the tree, with file previews, to `out`.
pub struct TreeWalker {
    options: TreeOptions,
    formatter: ContentFormatter,
    stats: DirStatsCache,
    cancelled: Option<Arc<AtomicBool>>,
}

impl TreeWalker {
    pub fn new(options: TreeOptions) -> Self {
        let formatter = ContentFormatter::new(options.render.clone());
        Self {
            options,
            formatter,
            stats: DirStatsCache::new(),
            cancelled: None,
        }
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.formatter = self.formatter.with_highlighter(highlighter);
        self
    }

    /// Stops the walk before the next entry once `flag` becomes true.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    fn collect_entries(&self) -> Result<Vec<Entry>, TreecatError> {
        let root = &self.options.root;
        if fs::symlink_metadata(root).is_err() {
            return Err(TreecatError::InvalidPath(root.display().to_string()));
        }
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(!self.options.include_hidden)
            .git_ignore(self.options.respect_gitignore)
            .max_depth(self.options.max_depth)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        if !self.options.ignore_patterns.is_empty() {
            let mut glob_builder = globset::GlobSetBuilder::new();
            for pattern in &self.options.ignore_patterns {
                let glob = globset::Glob::new(pattern).map_err(|e| {
                    TreecatError::Walk(format!("Invalid glob pattern '{}': {}", pattern, e))
                })?;
                glob_builder.add(glob);
            }
            let matcher = glob_builder
                .build()
                .map_err(|e| TreecatError::Walk(format!("Failed to build glob set: {}", e)))?;
            builder.filter_entry(move |entry| {
                entry.depth() == 0 || !matcher.is_match(entry.file_name())
            });
        }

        let mut entries = Vec::new();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping entry: {e}");
                    continue;
                }
            };
            let is_symlink = entry.path_is_symlink();
            let is_dir = !is_symlink && entry.path().is_dir();
            if self.options.no_files && !is_dir && entry.depth() > 0 {
                continue;
            }
            entries.push(Entry {
                depth: entry.depth(),
                path: entry.into_path(),
                is_dir,
                is_symlink,
                is_last: false,
            });
        }
        mark_last_children(&mut entries);
        Ok(entries)
    }

    /// Renders the whole tree.
    pub fn walk<W: Write>(&mut self, out: &mut W) -> Result<WalkSummary, TreecatError> {
        let entries = self.collect_entries()?;
        tracing::debug!(entries = entries.len(), "walk collected");
        let mut summary = WalkSummary::default();
        let mut ancestors_last: Vec<bool> = Vec::new();

        for entry in &entries {
            if self
                .cancelled
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
            {
                return Err(TreecatError::Interrupted);
            }
            if entry.depth > 0 {
                ancestors_last.truncate(entry.depth - 1);
                if entry.is_dir {
                    summary.dirs += 1;
                } else {
                    summary.files += 1;
                }
            }
            let (head, child) = prefixes(&ancestors_last, entry);
            match self.options.format {
                OutputFormat::Tree => self.write_entry(out, entry, &head, &child)?,
                OutputFormat::Json => self.write_json(out, entry)?,
            }
            if entry.depth > 0 {
                ancestors_last.push(entry.is_last);
            }
        }
        Ok(summary)
    }

    fn display_name(&self, entry: &Entry) -> String {
        if entry.depth == 0 {
            return entry.path.display().to_string();
        }
        entry
            .path
            .file_name()
            .map_or_else(|| entry.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    fn right_align(&self, left: &str, annotation: &str, filler: char) -> String {
        let width = self.options.render.max_line_width;
        let used = visible_width(left) + visible_width(annotation);
        let pad = width.saturating_sub(used).max(1);
        let fill: String = std::iter::repeat_n(filler, pad).collect();
        if filler == ' ' {
            format!("{left}{fill}{annotation}")
        } else {
            format!("{left}{}{annotation}", Style::plain().dim().paint(&fill))
        }
    }

    fn write_entry<W: Write>(
        &mut self,
        out: &mut W,
        entry: &Entry,
        head: &str,
        child: &str,
    ) -> Result<(), TreecatError> {
        let color = self.options.color;
        let name = name_style(&entry.path, entry.is_symlink).paint(&self.display_name(entry));
        let left = format!("{head}{name}");

        if entry.is_symlink && entry.depth > 0 {
            return write_line(out, &format!("{left}{}", symlink_target(&entry.path)), color);
        }
        if entry.is_dir {
            let annotation = self.dir_annotation(&entry.path);
            return write_line(out, &self.right_align(&left, &annotation, ' '), color);
        }

        let mime = mime_type(&entry.path);
        let size = fs::metadata(&entry.path).map(|m| m.len()).unwrap_or(0);
        let annotation = meta(&format!(" [{}, {}]", mime_label(&mime), human_size(size, true)));
        write_line(out, &self.right_align(&left, &annotation, sign::FILLER), color)?;

        if !self.options.summary && is_previewable(&mime) {
            for line in self.formatter.format(&entry.path, child) {
                write_line(out, &line.text, color)?;
            }
        }
        Ok(())
    }

    fn dir_annotation(&mut self, path: &Path) -> String {
        let children = fs::read_dir(path).map(|it| it.count());
        let body = match children {
            Err(e) => {
                let msg = TreecatError::io(path, e).display_message();
                return format!(" {}", Style::bg(Color::Basic(Color8::Red)).bold().paint(&msg));
            }
            Ok(0) => format!(" [{} {}", sign::FOLDER, human_size(0, true)),
            Ok(n) if self.options.sums => match self.stats.stats(path) {
                Ok(stats) => format!(
                    " [{} {n:3} children, {:6} subdirs, {:6} files, total size: {}",
                    sign::FOLDER,
                    stats.subdirs,
                    stats.files,
                    human_size(stats.total_bytes, false)
                ),
                Err(e) => {
                    tracing::warn!("directory totals unavailable: {e}");
                    format!(" [{} {n:3} children", sign::FOLDER)
                }
            },
            Ok(n) => format!(" [{} {n:3} children", sign::FOLDER),
        };
        meta(&format!("{body}]"))
    }

    fn write_json<W: Write>(&self, out: &mut W, entry: &Entry) -> Result<(), TreecatError> {
        if entry.is_dir || entry.is_symlink || self.options.summary {
            return Ok(());
        }
        if !is_previewable(&mime_type(&entry.path)) {
            return Ok(());
        }
        let record = file_record(&entry.path, self.formatter.format(&entry.path, ""));
        write_record(out, &record)
    }
}

fn symlink_target(path: &Path) -> String {
    let arrow = " ⇨ ";
    match path.canonicalize() {
        Ok(target) => {
            let base = path.parent().and_then(|p| p.canonicalize().ok());
            let shown = base
                .as_deref()
                .and_then(|b| target.strip_prefix(b).ok())
                .map_or_else(|| target.clone(), Path::to_path_buf);
            let style = name_style(&target, false);
            format!("{arrow}{}", style.paint(&shown.display().to_string()))
        }
        Err(_) => {
            let raw = fs::read_link(path)
                .map(|t| t.display().to_string())
                .unwrap_or_else(|e| e.to_string());
            let style = Style::bg(Color::Basic(Color8::Red)).bold();
            format!("{arrow}{}", style.paint(&raw))
        }
    }
}

/// Walks `options.root` and writes the rendered tree to `out`.
pub fn treecat<W: Write>(options: TreeOptions, out: &mut W) -> Result<WalkSummary, TreecatError> {
    TreeWalker::new(options).walk(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(depth: usize) -> Entry {
        Entry {
            path: PathBuf::new(),
            depth,
            is_dir: false,
            is_symlink: false,
            is_last: false,
        }
    }

    #[test]
    fn last_children_are_marked_per_parent() {
        // root, a/, a/x, a/y, b
        let mut entries = vec![entry(0), entry(1), entry(2), entry(2), entry(1)];
        mark_last_children(&mut entries);
        let last: Vec<bool> = entries.iter().map(|e| e.is_last).collect();
        assert_eq!(last, vec![true, false, false, true, true]);
    }

    #[test]
    fn prefixes_follow_ancestors() {
        let mut e = entry(2);
        e.is_last = true;
        let (head, child) = prefixes(&[false], &e);
        assert_eq!(head, "│   └── ");
        assert_eq!(child, "│       ");
    }
}
