use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::analysis::{analyze_file, frames_dir, ConsonanceReport};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::visual::{FrameDumper, NullVisualizer, Visualizer};

pub const AUDIO_EXTENSIONS: &[&str] = &["wav"];

/// Expands directories (recursively) into their audio files. Plain file
/// arguments are kept as given. Output is sorted and de-duplicated.
pub fn collect_audio_files(inputs: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            walk(input, &mut files)?;
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(&path, out)?;
        } else if has_audio_extension(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Analyses every file independently and in parallel. One file failing never
/// affects the others; results come back in input order.
pub fn analyze_all<F>(
    files: &[PathBuf],
    config: &AnalysisConfig,
    dump_frames: bool,
    on_done: F,
) -> Vec<(PathBuf, Result<ConsonanceReport>)>
where
    F: Fn(&Path) + Sync,
{
    files
        .par_iter()
        .map(|path| {
            let mut visualizer: Box<dyn Visualizer> = if dump_frames {
                Box::new(FrameDumper::new(frames_dir(path)))
            } else {
                Box::new(NullVisualizer)
            };
            let result = analyze_file(path, config, visualizer.as_mut());
            if let Err(ref e) = result {
                log::error!("{}: {}", path.display(), e);
            }
            on_done(path);
            (path.clone(), result)
        })
        .collect()
}

/// Orders reports most consonant first; undefined scores go last, ties keep
/// path order.
pub fn rank(reports: &mut [ConsonanceReport]) {
    reports.sort_by(|a, b| match (a.score.value(), b.score.value()) {
        (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.path.cmp(&b.path)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.path.cmp(&b.path),
    });
}
