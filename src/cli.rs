//! Command-line front end: lay out a directory of images as a waterfall.
//!
//! The binary scans a directory, mounts a gallery over the images it found,
//! resolves their dimensions, and prints the resulting columns. With
//! `--select` it also opens the viewer and prints the dock window.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::GalleryConfig;
use crate::gallery::{Gallery, GalleryProps, GalleryView};
use crate::metadata::FileProbe;
use crate::models::{MediaId, MediaItem};

const DEFAULT_WIDTH: f32 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub path: PathBuf,
    pub width: f32,
    pub select: Option<MediaId>,
    pub insert_at_start: bool,
    pub recursive: bool,
    pub empty_message: Option<String>,
}

pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut path: Option<PathBuf> = None;
    let mut width = DEFAULT_WIDTH;
    let mut select = None;
    let mut insert_at_start = false;
    let mut recursive = false;
    let mut empty_message = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" => {
                let value = args.next().context("Missing value for --width")?;
                width = value
                    .parse::<f32>()
                    .context("Failed to parse --width as a number of pixels")?;
            }
            "--select" => {
                let value = args.next().context("Missing value for --select")?;
                select = Some(
                    value
                        .parse::<MediaId>()
                        .context("Failed to parse --select as an item id")?,
                );
            }
            "--insert-at-start" => insert_at_start = true,
            "--recursive" | "-r" => recursive = true,
            "--empty-message" => {
                empty_message = Some(args.next().context("Missing value for --empty-message")?);
            }
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            _ => {
                if path.is_some() {
                    bail!("Unexpected extra argument: {}", arg);
                }
                path = Some(PathBuf::from(arg));
            }
        }
    }

    if !width.is_finite() || width <= 0.0 {
        bail!("--width must be greater than 0");
    }
    let path = path.context("Usage: waterfall <directory> [--width <px>] [--select <id>] [--insert-at-start] [--recursive]")?;

    Ok(CliArgs {
        path,
        width,
        select,
        insert_at_start,
        recursive,
        empty_message,
    })
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            matches!(
                e.to_ascii_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif"
            )
        })
        .unwrap_or(false)
}

/// Image files under `dir`, sorted by path, numbered from 1.
pub fn discover_images(dir: &Path, recursive: bool) -> Result<Vec<MediaItem>> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).max_depth(max_depth) {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if entry.file_type().is_file() && is_image_path(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    debug!(count = paths.len(), "Discovered images");

    Ok(paths
        .iter()
        .enumerate()
        .map(|(i, path)| MediaItem::from_path(i as MediaId + 1, path))
        .collect())
}

/// Plain-text rendering of the grid and, if open, the viewer.
pub fn render_report(gallery: &Gallery) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", gallery.title());
    if !gallery.description().is_empty() {
        let _ = writeln!(out, "{}", gallery.description());
    }

    match gallery.view() {
        GalleryView::Empty { message } => {
            let _ = writeln!(out, "{}", message);
        }
        GalleryView::Columns(columns) => {
            let _ = writeln!(
                out,
                "{} of {} items in {} columns ({}px wide)",
                columns.item_count(),
                gallery.items().len(),
                columns.column_count(),
                columns.column_width
            );
            for column in &columns.columns {
                let ids: Vec<String> = column.ids().iter().map(|id| id.to_string()).collect();
                let _ = writeln!(
                    out,
                    "  column {}: [{}] height {:.1}",
                    column.column_index,
                    ids.join(", "),
                    column.height_px
                );
            }
        }
    }

    if let Some(item) = gallery.selected_item() {
        let viewer = gallery.viewer();
        let window = viewer.window();
        let dock: Vec<String> = gallery
            .dock_items()
            .iter()
            .map(|i| {
                if i.id == item.id {
                    format!("[{}]", i.id)
                } else {
                    i.id.to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "viewing {} \"{}\" at {}%", item.id, item.title, viewer.transform().zoom_percent());
        let _ = writeln!(
            out,
            "dock {}{}{}",
            if window.has_before() { "< " } else { "" },
            dock.join(" "),
            if window.has_after(gallery.items().len()) { " >" } else { "" }
        );
    }

    out
}

pub fn run(args: CliArgs) -> Result<i32> {
    let config = GalleryConfig::from_env();
    let items = discover_images(&args.path, args.recursive)?;
    info!(path = %args.path.display(), items = items.len(), "Scanned directory");

    let title = args
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.path.display().to_string());
    let mut props = GalleryProps::new(items, title, args.path.display().to_string())
        .insert_at_start(args.insert_at_start);
    if let Some(message) = args.empty_message.clone() {
        props = props.empty_state_message(message);
    }

    let mut gallery = Gallery::mount_with_config(props, Arc::new(FileProbe), &config);
    gallery.resize(args.width);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    runtime.block_on(gallery.load());
    let resolved = gallery.poll_loaded();
    info!(resolved, "Resolved image dimensions");

    if let Some(id) = args.select {
        if gallery.items().iter().all(|item| item.id != id) {
            bail!("No item with id {}", id);
        }
        gallery.select(id);
    }

    print!("{}", render_report(&gallery));
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::fs;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
        img.save(path).unwrap();
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = parse_args(args(&["photos"])).unwrap();
        assert_eq!(parsed.path, PathBuf::from("photos"));
        assert_eq!(parsed.width, DEFAULT_WIDTH);
        assert_eq!(parsed.select, None);
        assert!(!parsed.insert_at_start);
        assert!(!parsed.recursive);
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = parse_args(args(&[
            "--width",
            "1400",
            "photos",
            "--select",
            "4",
            "--insert-at-start",
            "-r",
            "--empty-message",
            "Nothing yet",
        ]))
        .unwrap();
        assert_eq!(parsed.width, 1400.0);
        assert_eq!(parsed.select, Some(4));
        assert!(parsed.insert_at_start);
        assert!(parsed.recursive);
        assert_eq!(parsed.empty_message.as_deref(), Some("Nothing yet"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["photos", "--width"])).is_err());
        assert!(parse_args(args(&["photos", "--width", "wide"])).is_err());
        assert!(parse_args(args(&["photos", "--width", "0"])).is_err());
        assert!(parse_args(args(&["photos", "--select", "-1"])).is_err());
        assert!(parse_args(args(&["photos", "--bogus"])).is_err());
        assert!(parse_args(args(&["photos", "more"])).is_err());
    }

    #[test]
    fn test_discover_images_filters_and_numbers() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write_png(&dir.path().join("b.png"), 4, 3);
        write_png(&dir.path().join("a.png"), 3, 4);
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        write_png(&nested.join("c.png"), 2, 2);

        let flat = discover_images(dir.path(), false).unwrap();
        let titles: Vec<&str> = flat.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(flat[0].id, 1);
        assert_eq!(flat[1].id, 2);

        let deep = discover_images(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_discover_rejects_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.png");
        write_png(&file, 1, 1);
        assert!(discover_images(&file, false).is_err());
    }

    #[test]
    fn test_report_lists_columns_and_dock() {
        let dir = tempdir().unwrap();
        for (i, (w, h)) in [(16, 9), (1, 1), (3, 4), (21, 9), (9, 16), (4, 3), (2, 3)]
            .iter()
            .enumerate()
        {
            write_png(&dir.path().join(format!("{:02}.png", i + 1)), *w * 10, *h * 10);
        }
        let items = discover_images(dir.path(), false).unwrap();
        let mut gallery = Gallery::mount(GalleryProps::new(items, "Demo", ""), Arc::new(FileProbe));
        gallery.resize(1000.0);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(gallery.load());
        gallery.poll_loaded();
        gallery.select(4);

        let report = render_report(&gallery);
        assert!(report.contains("7 of 7 items in 3 columns"), "{}", report);
        assert!(report.contains("column 0: [1, 4, 5]"), "{}", report);
        assert!(report.contains("dock < 2 3 [4] 5 6 >"), "{}", report);
    }

    #[test]
    fn test_report_empty_state() {
        let gallery = Gallery::mount(
            GalleryProps::new(Vec::new(), "Nothing", "").empty_state_message("Drop some photos here"),
            Arc::new(FileProbe),
        );
        let report = render_report(&gallery);
        assert!(report.contains("Drop some photos here"));
    }
}
