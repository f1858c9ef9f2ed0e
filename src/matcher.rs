//! Match prompt records to files in the source directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::extract::{extract_numeric_id, normalize_stem};
use crate::prompt::PromptRecord;
use crate::{path_to_file_stem_string, path_to_filename_string};

/// One regular file in the source directory with its matching keys.
///
/// The normalized stem doubles as the file's URL stem: a bare filename is a
/// single path segment, so the URL stem rule reduces to stripping the
/// extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Filename including extension.
    pub name: String,
    /// Normalized (NFC + lowercase) filename stem.
    pub stem: String,
    /// First standalone digit run in the filename stem.
    pub numeric_id: Option<u64>,
}

impl SourceFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let name = path_to_filename_string(&path);
        let stem = normalize_stem(&path_to_file_stem_string(&path));
        let numeric_id = extract_numeric_id(&stem);
        Self {
            path,
            name,
            stem,
            numeric_id,
        }
    }
}

/// How a prompt claimed its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBasis {
    NumericId,
    UrlStem,
}

/// A claimed source file together with the rule that claimed it.
#[derive(Debug, Clone)]
pub struct Match {
    pub file: SourceFile,
    pub basis: MatchBasis,
}

/// Outcome of matching a single prompt. `matched` is `None` when no
/// unclaimed file satisfied either rule.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub prompt: PromptRecord,
    pub matched: Option<Match>,
}

/// All match results in prompt order plus the files no prompt claimed.
#[derive(Debug, Default)]
pub struct MatchSet {
    pub results: Vec<MatchResult>,
    pub unused: Vec<SourceFile>,
}

impl MatchSet {
    /// Number of prompts that claimed a file.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.results.iter().filter(|result| result.matched.is_some()).count()
    }
}

/// List regular files in the source directory, sorted by filename.
///
/// Non-recursive. Hidden files (leading dot) are skipped.
///
/// # Errors
/// Returns an error if the directory does not exist or cannot be read.
pub fn list_source_files(dir: &Path) -> Result<Vec<SourceFile>> {
    if !dir.is_dir() {
        anyhow::bail!("Source directory does not exist: '{}'", dir.display());
    }

    let mut files: Vec<SourceFile> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to read source directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name_bytes = entry.file_name().as_encoded_bytes();
        if !name_bytes.is_empty() && name_bytes[0] == b'.' {
            continue;
        }
        files.push(SourceFile::new(entry.into_path()));
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Match each prompt to at most one source file.
///
/// Single pass in prompt order: a numeric ID match is tried first, then a
/// URL stem match against the normalized filename stems. Claims are
/// irrevocable, so an earlier prompt always wins over a later one even if
/// the later prompt would fit better. Ties between files sharing a key go
/// to the lexicographically smallest filename. Greedy and order-dependent
/// on purpose: rerunning on identical input must reproduce identical
/// claims.
#[must_use]
pub fn match_prompts(prompts: &[PromptRecord], files: Vec<SourceFile>) -> MatchSet {
    let mut pool = files;
    // Claiming below takes the first hit, so keep the pool sorted by name
    // to resolve ties deterministically.
    pool.sort_by(|a, b| a.name.cmp(&b.name));

    let mut results = Vec::with_capacity(prompts.len());
    for prompt in prompts {
        let matched = claim(&mut pool, prompt);
        results.push(MatchResult {
            prompt: prompt.clone(),
            matched,
        });
    }

    MatchSet { results, unused: pool }
}

/// Remove and return the first unclaimed file satisfying the prompt's keys.
fn claim(pool: &mut Vec<SourceFile>, prompt: &PromptRecord) -> Option<Match> {
    if let Some(id) = prompt.numeric_id
        && let Some(position) = pool.iter().position(|file| file.numeric_id == Some(id))
    {
        return Some(Match {
            file: pool.remove(position),
            basis: MatchBasis::NumericId,
        });
    }
    if let Some(ref stem) = prompt.url_stem
        && let Some(position) = pool.iter().position(|file| &file.stem == stem)
    {
        return Some(Match {
            file: pool.remove(position),
            basis: MatchBasis::UrlStem,
        });
    }
    None
}

#[cfg(test)]
mod matcher_tests {
    use super::*;

    use std::fs::File;

    use tempfile::tempdir;

    use crate::prompt::parse_prompts;

    fn source_file(name: &str) -> SourceFile {
        SourceFile::new(PathBuf::from(name))
    }

    fn source_files(names: &[&str]) -> Vec<SourceFile> {
        names.iter().map(|name| source_file(name)).collect()
    }

    #[test]
    fn source_file_keys_from_filename() {
        let file = source_file("001_photo.jpg");
        assert_eq!(file.name, "001_photo.jpg");
        assert_eq!(file.stem, "001_photo");
        assert_eq!(file.numeric_id, Some(1));
    }

    #[test]
    fn matches_by_numeric_id_and_url_stem() {
        // Worked example: numeric id, url stem, no keys at all
        let prompts = parse_prompts("cat_001 a cute cat\nhttp://x.test/dog-7.png\nno id here\n");
        let files = source_files(&["001_photo.jpg", "dog-7.jpg", "unrelated.png"]);

        let set = match_prompts(&prompts, files);

        assert_eq!(set.results.len(), 3);
        let first = set.results[0].matched.as_ref().unwrap();
        assert_eq!(first.file.name, "001_photo.jpg");
        assert_eq!(first.basis, MatchBasis::NumericId);

        let second = set.results[1].matched.as_ref().unwrap();
        assert_eq!(second.file.name, "dog-7.jpg");
        assert_eq!(second.basis, MatchBasis::UrlStem);

        assert!(set.results[2].matched.is_none());
        assert_eq!(set.unused.len(), 1);
        assert_eq!(set.unused[0].name, "unrelated.png");
    }

    #[test]
    fn url_stem_match_is_case_insensitive() {
        let prompts = parse_prompts("https://x.test/My-Dog.png\n");
        let files = source_files(&["MY-DOG.JPG"]);

        let set = match_prompts(&prompts, files);
        assert_eq!(set.results[0].matched.as_ref().unwrap().file.name, "MY-DOG.JPG");
    }

    #[test]
    fn tie_break_takes_lexicographically_smallest() {
        let prompts = parse_prompts("photo number 5\n");
        let files = source_files(&["5_b.jpg", "5_a.jpg"]);

        let set = match_prompts(&prompts, files);
        assert_eq!(set.results[0].matched.as_ref().unwrap().file.name, "5_a.jpg");
        assert_eq!(set.unused.len(), 1);
        assert_eq!(set.unused[0].name, "5_b.jpg");
    }

    #[test]
    fn first_claim_wins_over_later_prompts() {
        // Both prompts carry id 3; only one file has it. The earlier prompt
        // keeps the claim even though the later one repeats the filename
        // stem exactly.
        let prompts = parse_prompts("3 anything\nwildcat 3 http://x.test/wildcat_3.png\n");
        let files = source_files(&["wildcat_3.png"]);

        let set = match_prompts(&prompts, files);
        assert!(set.results[0].matched.is_some());
        assert!(set.results[1].matched.is_none());
        assert!(set.unused.is_empty());
    }

    #[test]
    fn numeric_id_comparison_ignores_leading_zeros() {
        let prompts = parse_prompts("take 7\n");
        let files = source_files(&["img_0007.png"]);

        let set = match_prompts(&prompts, files);
        assert!(set.results[0].matched.is_some());
    }

    #[test]
    fn every_file_is_claimed_or_unused_never_both() {
        let prompts = parse_prompts("1 one\n2 two\nno keys\n");
        let files = source_files(&["1.png", "2.png", "3.png", "4.png"]);

        let set = match_prompts(&prompts, files);
        assert_eq!(set.results.len(), 3);

        let claimed: Vec<&str> = set
            .results
            .iter()
            .filter_map(|result| result.matched.as_ref())
            .map(|m| m.file.name.as_str())
            .collect();
        let unused: Vec<&str> = set.unused.iter().map(|file| file.name.as_str()).collect();

        assert_eq!(claimed.len() + unused.len(), 4);
        for name in &claimed {
            assert!(!unused.contains(name));
        }
    }

    #[test]
    fn matching_is_deterministic() {
        let prompts = parse_prompts("5 five\nhttp://x.test/dog-7.png\nnothing\n");
        let names = ["5_a.jpg", "5_b.jpg", "dog-7.jpg", "spare.png"];

        let first = match_prompts(&prompts, source_files(&names));
        let second = match_prompts(&prompts, source_files(&names));

        let claims = |set: &MatchSet| -> Vec<Option<String>> {
            set.results
                .iter()
                .map(|result| result.matched.as_ref().map(|m| m.file.name.clone()))
                .collect()
        };
        assert_eq!(claims(&first), claims(&second));
        let unused_names = |set: &MatchSet| -> Vec<String> { set.unused.iter().map(|f| f.name.clone()).collect() };
        assert_eq!(unused_names(&first), unused_names(&second));
    }

    #[test]
    fn list_source_files_skips_directories_and_hidden_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.png")).unwrap();
        File::create(dir.path().join("a.png")).unwrap();
        File::create(dir.path().join(".hidden.png")).unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        File::create(dir.path().join("subdir").join("nested.png")).unwrap();

        let files = list_source_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn list_source_files_missing_directory_is_error() {
        let dir = tempdir().unwrap();
        let result = list_source_files(&dir.path().join("missing"));
        assert!(result.is_err());
    }
}
