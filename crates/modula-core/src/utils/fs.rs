use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Names of the immediate subdirectories of `path` accepted by `filter`, sorted.
/// A missing directory yields an empty list.
pub fn subdirectory_names<P, F>(path: P, filter: &F) -> io::Result<Vec<String>>
where
    P: AsRef<Path>,
    F: Fn(&str) -> bool + ?Sized,
{
    let mut names = Vec::new();

    if !path.as_ref().is_dir() {
        return Ok(names);
    }

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        // Non UTF-8 names can't be module or locale names
        if let Some(name) = entry.file_name().to_str() {
            if filter(name) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Immediate subdirectories of `path` accepted by `filter`, as (name, path) pairs sorted by name
pub fn find_subdirectories<P, F>(path: P, filter: &F) -> io::Result<Vec<(String, PathBuf)>>
where
    P: AsRef<Path>,
    F: Fn(&str) -> bool + ?Sized,
{
    let base = path.as_ref();
    Ok(subdirectory_names(base, filter)?
        .into_iter()
        .map(|name| {
            let dir = base.join(&name);
            (name, dir)
        })
        .collect())
}

/// Whether `path` is an existing file
pub fn is_readable_file<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}
